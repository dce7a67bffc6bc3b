/// Inventory item model
///
/// Stock held by a branch, optionally earmarked for a project or section.
/// `totalValue` and `status` are derived from quantity, unit price and the
/// reorder threshold on every save:
///
/// | quantity              | status         |
/// |-----------------------|----------------|
/// | 0                     | `out_of_stock` |
/// | ≤ `minQuantity`       | `low_stock`    |
/// | > `minQuantity`       | `in_stock`     |

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{enum_value, new_id, Country, EntityKind, Filter, Record};
use crate::error::{StoreError, StoreResult, Violations};

/// Derived stock level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    #[default]
    InStock,
    LowStock,
    OutOfStock,
}

impl InventoryStatus {
    pub const ALL: [InventoryStatus; 3] = [
        InventoryStatus::InStock,
        InventoryStatus::LowStock,
        InventoryStatus::OutOfStock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::InStock => "in_stock",
            InventoryStatus::LowStock => "low_stock",
            InventoryStatus::OutOfStock => "out_of_stock",
        }
    }

    /// Classifies a quantity against its reorder threshold
    pub fn classify(quantity: Decimal, min_quantity: Decimal) -> Self {
        if quantity <= Decimal::ZERO {
            InventoryStatus::OutOfStock
        } else if quantity <= min_quantity {
            InventoryStatus::LowStock
        } else {
            InventoryStatus::InStock
        }
    }
}

/// Stored inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,

    pub country: Country,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default)]
    pub quantity: Decimal,

    #[serde(default)]
    pub min_quantity: Decimal,

    #[serde(default)]
    pub unit_price: Decimal,

    /// Derived: `quantity × unitPrice`
    #[serde(default)]
    pub total_value: Decimal,

    /// Derived from quantity and `minQuantity`
    #[serde(default)]
    pub status: InventoryStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    fn recompute(&mut self) -> StoreResult<()> {
        self.total_value = self
            .quantity
            .checked_mul(self.unit_price)
            .ok_or_else(|| StoreError::validation("totalValue", "Total value is out of range"))?;
        self.status = InventoryStatus::classify(self.quantity, self.min_quantity);
        Ok(())
    }

    /// True when stock is at or below the reorder threshold
    pub fn needs_restock(&self) -> bool {
        self.status != InventoryStatus::InStock
    }

    fn check_rules(&self) -> StoreResult<()> {
        let mut v = Violations::new();
        v.check(!self.name.trim().is_empty(), "name", "Name is required");
        v.check(
            self.quantity >= Decimal::ZERO,
            "quantity",
            "Quantity must not be negative",
        );
        v.check(
            self.min_quantity >= Decimal::ZERO,
            "minQuantity",
            "Minimum quantity must not be negative",
        );
        v.check(
            self.unit_price >= Decimal::ZERO,
            "unitPrice",
            "Unit price must not be negative",
        );
        v.into_result()
    }
}

impl Record for InventoryItem {
    const KIND: EntityKind = EntityKind::Inventory;

    fn id(&self) -> &str {
        &self.id
    }

    fn country(&self) -> Country {
        self.country
    }
}

/// Input for creating an inventory item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryItem {
    #[serde(default)]
    pub country: Option<Country>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    pub category: Option<String>,

    pub unit: Option<String>,

    #[serde(default)]
    pub quantity: Decimal,

    #[serde(default)]
    pub min_quantity: Decimal,

    #[serde(default)]
    pub unit_price: Decimal,

    pub supplier: Option<String>,

    pub location: Option<String>,

    pub project_id: Option<String>,

    pub section_id: Option<String>,
}

impl CreateInventoryItem {
    pub(crate) fn into_record(
        self,
        country: Country,
        now: DateTime<Utc>,
    ) -> StoreResult<InventoryItem> {
        self.validate()?;

        let mut item = InventoryItem {
            id: new_id(),
            country,
            name: self.name.trim().to_string(),
            category: self.category,
            unit: self.unit,
            quantity: self.quantity,
            min_quantity: self.min_quantity,
            unit_price: self.unit_price,
            total_value: Decimal::ZERO,
            status: InventoryStatus::default(),
            supplier: self.supplier,
            location: self.location,
            project_id: self.project_id,
            section_id: self.section_id,
            created_at: now,
            updated_at: now,
        };
        item.check_rules()?;
        item.recompute()?;
        Ok(item)
    }
}

/// Partial update for an inventory item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryItem {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    pub category: Option<String>,

    pub unit: Option<String>,

    pub quantity: Option<Decimal>,

    pub min_quantity: Option<Decimal>,

    pub unit_price: Option<Decimal>,

    pub supplier: Option<String>,

    pub location: Option<String>,

    pub project_id: Option<String>,

    pub section_id: Option<String>,
}

impl UpdateInventoryItem {
    pub(crate) fn apply(self, item: &mut InventoryItem, now: DateTime<Utc>) -> StoreResult<()> {
        self.validate()?;

        if let Some(name) = self.name {
            item.name = name.trim().to_string();
        }
        if self.category.is_some() {
            item.category = self.category;
        }
        if self.unit.is_some() {
            item.unit = self.unit;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(min_quantity) = self.min_quantity {
            item.min_quantity = min_quantity;
        }
        if let Some(unit_price) = self.unit_price {
            item.unit_price = unit_price;
        }
        if self.supplier.is_some() {
            item.supplier = self.supplier;
        }
        if self.location.is_some() {
            item.location = self.location;
        }
        if self.project_id.is_some() {
            item.project_id = self.project_id;
        }
        if self.section_id.is_some() {
            item.section_id = self.section_id;
        }
        item.updated_at = now;

        item.check_rules()?;
        item.recompute()?;
        Ok(())
    }
}

/// Query filter for inventory items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryFilter {
    pub project_id: Option<String>,
    pub section_id: Option<String>,
    pub status: Option<InventoryStatus>,
}

impl InventoryFilter {
    pub fn for_project(project_id: &str) -> Self {
        Self {
            project_id: Some(project_id.to_string()),
            ..Default::default()
        }
    }

    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt("projectId", self.project_id.clone())
            .eq_opt("sectionId", self.section_id.clone())
            .eq_opt("status", self.status.as_ref().map(enum_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(quantity: Decimal, min_quantity: Decimal) -> CreateInventoryItem {
        CreateInventoryItem {
            name: "Cement bags".to_string(),
            unit: Some("bag".to_string()),
            quantity,
            min_quantity,
            unit_price: dec!(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(
            InventoryStatus::classify(dec!(0), dec!(10)),
            InventoryStatus::OutOfStock
        );
        assert_eq!(
            InventoryStatus::classify(dec!(5), dec!(10)),
            InventoryStatus::LowStock
        );
        assert_eq!(
            InventoryStatus::classify(dec!(10), dec!(10)),
            InventoryStatus::LowStock
        );
        assert_eq!(
            InventoryStatus::classify(dec!(20), dec!(10)),
            InventoryStatus::InStock
        );
    }

    #[test]
    fn test_create_derives_value_and_status() {
        let item = input(dec!(10), dec!(0))
            .into_record(Country::Egypt, Utc::now())
            .unwrap();
        assert_eq!(item.total_value, dec!(50));
        assert_eq!(item.status, InventoryStatus::InStock);
        assert!(!item.needs_restock());
    }

    #[test]
    fn test_caller_derived_fields_ignored() {
        let json = serde_json::json!({
            "name": "Rebar",
            "quantity": 0,
            "unitPrice": 12,
            "totalValue": 999,
            "status": "in_stock"
        });
        let input: CreateInventoryItem = serde_json::from_value(json).unwrap();
        let item = input.into_record(Country::Libya, Utc::now()).unwrap();
        assert_eq!(item.total_value, dec!(0));
        assert_eq!(item.status, InventoryStatus::OutOfStock);
    }

    #[test]
    fn test_update_recomputes() {
        let mut item = input(dec!(20), dec!(10))
            .into_record(Country::Egypt, Utc::now())
            .unwrap();
        assert_eq!(item.status, InventoryStatus::InStock);

        UpdateInventoryItem {
            quantity: Some(dec!(4)),
            unit_price: Some(dec!(7.5)),
            ..Default::default()
        }
        .apply(&mut item, Utc::now())
        .unwrap();

        assert_eq!(item.status, InventoryStatus::LowStock);
        assert_eq!(item.total_value, dec!(30));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        assert!(input(dec!(-1), dec!(0))
            .into_record(Country::Egypt, Utc::now())
            .is_err());
    }

    #[test]
    fn test_total_value_overflow_rejected() {
        let mut huge = input(dec!(1_000_000_000_000_000), dec!(0));
        huge.unit_price = dec!(1_000_000_000_000_000);
        match huge.into_record(Country::Egypt, Utc::now()) {
            Err(StoreError::Validation(failures)) => assert_eq!(failures[0].field, "totalValue"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_update_overflow_rejected() {
        let mut item = input(dec!(10), dec!(0))
            .into_record(Country::Egypt, Utc::now())
            .unwrap();

        let result = UpdateInventoryItem {
            quantity: Some(dec!(1_000_000_000_000_000)),
            unit_price: Some(dec!(1_000_000_000_000_000)),
            ..Default::default()
        }
        .apply(&mut item, Utc::now());

        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert_eq!(item.total_value, dec!(50));
    }

    #[test]
    fn test_status_json_names() {
        assert_eq!(
            serde_json::to_value(InventoryStatus::OutOfStock).unwrap(),
            "out_of_stock"
        );
    }
}
