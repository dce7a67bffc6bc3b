use chrono::Utc;
use tracing::info;

use super::{require_partition, Store};
use crate::error::StoreResult;
use crate::models::{Country, CreateProject, EntityKind, Project, ProjectFilter, UpdateProject};

impl Store {
    pub async fn get_projects(&self, country: Country, filter: &ProjectFilter) -> Vec<Project> {
        self.collection::<Project>()
            .list(Some(country), &filter.to_filter())
            .await
    }

    pub async fn find_project(&self, country: Country, id: &str) -> Option<Project> {
        self.collection::<Project>().find(Some(country), id).await
    }

    /// Creates a project in `input.country`
    ///
    /// # Errors
    ///
    /// `InvalidPartition` without a country, `Validation` for rule violations,
    /// or the backend's write error.
    pub async fn create_project(&self, input: CreateProject) -> StoreResult<Project> {
        let country = require_partition(EntityKind::Project, input.country)?;
        let project = input.into_record(country, Utc::now())?;

        self.collection::<Project>().insert(&project).await?;
        info!(kind = "projects", country = %country, id = %project.id, "Record created");
        Ok(project)
    }

    pub async fn update_project(
        &self,
        id: &str,
        country: Country,
        patch: UpdateProject,
    ) -> StoreResult<Option<Project>> {
        let now = Utc::now();
        let updated = self
            .collection::<Project>()
            .modify(country, id, |project| patch.apply(project, now))
            .await?;

        if updated.is_some() {
            info!(kind = "projects", country = %country, id = %id, "Record updated");
        }
        Ok(updated)
    }

    /// Hard-deletes a project; its sections and linked records stay in place
    pub async fn delete_project(&self, id: &str, country: Country) -> StoreResult<bool> {
        let removed = self.collection::<Project>().remove(country, id).await?;
        if removed {
            info!(kind = "projects", country = %country, id = %id, "Record deleted");
        }
        Ok(removed)
    }
}
