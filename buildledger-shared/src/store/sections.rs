use chrono::Utc;
use tracing::info;

use super::{require_partition, Store};
use crate::error::StoreResult;
use crate::models::{Country, CreateSection, EntityKind, Section, SectionFilter, UpdateSection};

impl Store {
    pub async fn get_sections(&self, country: Country, filter: &SectionFilter) -> Vec<Section> {
        self.collection::<Section>()
            .list(Some(country), &filter.to_filter())
            .await
    }

    pub async fn find_section(&self, country: Country, id: &str) -> Option<Section> {
        self.collection::<Section>().find(Some(country), id).await
    }

    /// Creates a section; `progress` is derived from its quantities
    pub async fn create_section(&self, input: CreateSection) -> StoreResult<Section> {
        let country = require_partition(EntityKind::Section, input.country)?;
        let section = input.into_record(country, Utc::now())?;

        self.collection::<Section>().insert(&section).await?;
        info!(
            kind = "sections",
            country = %country,
            id = %section.id,
            project_id = %section.project_id,
            progress = section.progress,
            "Record created"
        );
        Ok(section)
    }

    /// Merges `patch` and recomputes `progress`
    pub async fn update_section(
        &self,
        id: &str,
        country: Country,
        patch: UpdateSection,
    ) -> StoreResult<Option<Section>> {
        let now = Utc::now();
        let updated = self
            .collection::<Section>()
            .modify(country, id, |section| patch.apply(section, now))
            .await?;

        if let Some(section) = &updated {
            info!(
                kind = "sections",
                country = %country,
                id = %id,
                progress = section.progress,
                "Record updated"
            );
        }
        Ok(updated)
    }

    pub async fn delete_section(&self, id: &str, country: Country) -> StoreResult<bool> {
        let removed = self.collection::<Section>().remove(country, id).await?;
        if removed {
            info!(kind = "sections", country = %country, id = %id, "Record deleted");
        }
        Ok(removed)
    }
}
