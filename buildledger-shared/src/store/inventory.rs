use chrono::Utc;
use tracing::{error, info};

use super::{require_partition, Store};
use crate::aggregation::spending::spending_for_inventory;
use crate::error::StoreResult;
use crate::models::{
    Country, CreateInventoryItem, EntityKind, InventoryFilter, InventoryItem, UpdateInventoryItem,
};

impl Store {
    pub async fn get_inventory(&self, country: Country, filter: &InventoryFilter) -> Vec<InventoryItem> {
        self.collection::<InventoryItem>()
            .list(Some(country), &filter.to_filter())
            .await
    }

    pub async fn find_inventory_item(&self, country: Country, id: &str) -> Option<InventoryItem> {
        self.collection::<InventoryItem>().find(Some(country), id).await
    }

    /// Creates an inventory item
    ///
    /// An item linked to a project with a positive total value also produces
    /// one `materials` spending for that project. If that spending cannot be
    /// written the error is returned; the item itself is already stored.
    pub async fn create_inventory_item(&self, input: CreateInventoryItem) -> StoreResult<InventoryItem> {
        let country = require_partition(EntityKind::Inventory, input.country)?;
        let item = input.into_record(country, Utc::now())?;

        self.collection::<InventoryItem>().insert(&item).await?;
        info!(
            kind = "inventory",
            country = %country,
            id = %item.id,
            total_value = %item.total_value,
            status = item.status.as_str(),
            "Record created"
        );

        if let Some(spending) = spending_for_inventory(&item) {
            if let Err(e) = self.create_spending(spending).await {
                error!(
                    country = %country,
                    inventory_id = %item.id,
                    error = %e,
                    "Failed to record spending for inventory purchase"
                );
                return Err(e);
            }
        }

        Ok(item)
    }

    /// Merges `patch` and recomputes value and status
    ///
    /// Spendings derived when the item was created are left as they are.
    pub async fn update_inventory_item(
        &self,
        id: &str,
        country: Country,
        patch: UpdateInventoryItem,
    ) -> StoreResult<Option<InventoryItem>> {
        let now = Utc::now();
        let updated = self
            .collection::<InventoryItem>()
            .modify(country, id, |item| patch.apply(item, now))
            .await?;

        if updated.is_some() {
            info!(kind = "inventory", country = %country, id = %id, "Record updated");
        }
        Ok(updated)
    }

    pub async fn delete_inventory_item(&self, id: &str, country: Country) -> StoreResult<bool> {
        let removed = self.collection::<InventoryItem>().remove(country, id).await?;
        if removed {
            info!(kind = "inventory", country = %country, id = %id, "Record deleted");
        }
        Ok(removed)
    }
}
