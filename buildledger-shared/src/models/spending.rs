/// Spending model
///
/// Spendings are the single source of truth for "money spent on a project".
/// They are created directly by users or synthesised by the store when a
/// payment or inventory item linked to a project is created; synthesised rows
/// carry `sourceType`/`sourceId` pointing back at their origin.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{enum_value, new_id, Country, EntityKind, Filter, Record};
use crate::error::{StoreResult, Violations};

/// Spending category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingCategory {
    Materials,
    Labor,
    Equipment,
    Overhead,
    #[default]
    Other,
}

impl SpendingCategory {
    pub const ALL: [SpendingCategory; 5] = [
        SpendingCategory::Materials,
        SpendingCategory::Labor,
        SpendingCategory::Equipment,
        SpendingCategory::Overhead,
        SpendingCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpendingCategory::Materials => "materials",
            SpendingCategory::Labor => "labor",
            SpendingCategory::Equipment => "equipment",
            SpendingCategory::Overhead => "overhead",
            SpendingCategory::Other => "other",
        }
    }
}

/// Origin of an auto-derived spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingSource {
    Payment,
    Inventory,
}

/// Stored spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spending {
    pub id: String,

    pub country: Country,

    pub project_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,

    pub amount: Decimal,

    #[serde(default)]
    pub category: SpendingCategory,

    #[serde(default)]
    pub description: String,

    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SpendingSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Spending {
    /// True when the row was synthesised from a payment or inventory item
    pub fn is_auto_derived(&self) -> bool {
        self.source_type.is_some()
    }

    fn check_rules(&self) -> StoreResult<()> {
        let mut v = Violations::new();
        v.check(
            !self.project_id.trim().is_empty(),
            "projectId",
            "Project is required",
        );
        v.check(
            self.amount > Decimal::ZERO,
            "amount",
            "Amount must be greater than zero",
        );
        v.into_result()
    }
}

impl Record for Spending {
    const KIND: EntityKind = EntityKind::Spending;

    fn id(&self) -> &str {
        &self.id
    }

    fn country(&self) -> Country {
        self.country
    }
}

/// Input for creating a spending
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpending {
    #[serde(default)]
    pub country: Option<Country>,

    pub project_id: String,

    pub section_id: Option<String>,

    pub amount: Decimal,

    #[serde(default)]
    pub category: SpendingCategory,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    #[serde(default)]
    pub description: String,

    /// Defaults to the creation day
    pub date: Option<NaiveDate>,

    /// Set only by auto-derivation
    #[serde(skip_deserializing)]
    pub source_type: Option<SpendingSource>,

    #[serde(skip_deserializing)]
    pub source_id: Option<String>,

    pub created_by: Option<String>,
}

impl CreateSpending {
    pub(crate) fn into_record(self, country: Country, now: DateTime<Utc>) -> StoreResult<Spending> {
        self.validate()?;

        let spending = Spending {
            id: new_id(),
            country,
            project_id: self.project_id,
            section_id: self.section_id,
            amount: self.amount,
            category: self.category,
            description: self.description,
            date: self.date.unwrap_or_else(|| now.date_naive()),
            source_type: self.source_type,
            source_id: self.source_id,
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
        };
        spending.check_rules()?;
        Ok(spending)
    }
}

/// Partial update for a spending
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpending {
    pub project_id: Option<String>,

    pub section_id: Option<String>,

    pub amount: Option<Decimal>,

    pub category: Option<SpendingCategory>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub date: Option<NaiveDate>,
}

impl UpdateSpending {
    pub(crate) fn apply(self, spending: &mut Spending, now: DateTime<Utc>) -> StoreResult<()> {
        self.validate()?;

        if let Some(project_id) = self.project_id {
            spending.project_id = project_id;
        }
        if self.section_id.is_some() {
            spending.section_id = self.section_id;
        }
        if let Some(amount) = self.amount {
            spending.amount = amount;
        }
        if let Some(category) = self.category {
            spending.category = category;
        }
        if let Some(description) = self.description {
            spending.description = description;
        }
        if let Some(date) = self.date {
            spending.date = date;
        }
        spending.updated_at = now;

        spending.check_rules()
    }
}

/// Query filter for spendings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingFilter {
    pub project_id: Option<String>,
    pub section_id: Option<String>,
    pub category: Option<SpendingCategory>,
}

impl SpendingFilter {
    pub fn for_project(project_id: &str) -> Self {
        Self {
            project_id: Some(project_id.to_string()),
            ..Default::default()
        }
    }

    pub fn for_section(section_id: &str) -> Self {
        Self {
            section_id: Some(section_id.to_string()),
            ..Default::default()
        }
    }

    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt("projectId", self.project_id.clone())
            .eq_opt("sectionId", self.section_id.clone())
            .eq_opt("category", self.category.as_ref().map(enum_value))
    }
}
