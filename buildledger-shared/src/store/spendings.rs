use chrono::Utc;
use tracing::info;

use super::{require_country, Store};
use crate::error::StoreResult;
use crate::models::{Country, CreateSpending, Spending, SpendingFilter, UpdateSpending};

impl Store {
    /// Lists spendings; `None` spans both countries of the shared file
    pub async fn get_spendings(
        &self,
        country: Option<Country>,
        filter: &SpendingFilter,
    ) -> Vec<Spending> {
        self.collection::<Spending>()
            .list(country, &filter.to_filter())
            .await
    }

    pub async fn find_spending(&self, country: Country, id: &str) -> Option<Spending> {
        self.collection::<Spending>().find(Some(country), id).await
    }

    /// Creates a spending
    ///
    /// Spendings share one file across countries, so a missing country is a
    /// validation failure rather than a partition error.
    pub async fn create_spending(&self, input: CreateSpending) -> StoreResult<Spending> {
        let country = require_country(input.country)?;
        let spending = input.into_record(country, Utc::now())?;

        self.collection::<Spending>().insert(&spending).await?;
        info!(
            kind = "spendings",
            country = %country,
            id = %spending.id,
            project_id = %spending.project_id,
            amount = %spending.amount,
            source = ?spending.source_type,
            "Record created"
        );
        Ok(spending)
    }

    pub async fn update_spending(
        &self,
        id: &str,
        country: Country,
        patch: UpdateSpending,
    ) -> StoreResult<Option<Spending>> {
        let now = Utc::now();
        let updated = self
            .collection::<Spending>()
            .modify(country, id, |spending| patch.apply(spending, now))
            .await?;

        if updated.is_some() {
            info!(kind = "spendings", country = %country, id = %id, "Record updated");
        }
        Ok(updated)
    }

    pub async fn delete_spending(&self, id: &str, country: Country) -> StoreResult<bool> {
        let removed = self.collection::<Spending>().remove(country, id).await?;
        if removed {
            info!(kind = "spendings", country = %country, id = %id, "Record deleted");
        }
        Ok(removed)
    }
}
