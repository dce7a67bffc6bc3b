/// Section model
///
/// A section is a measurable slice of a project (a floor, a block, a road
/// segment). Its `progress` is derived from target and completed quantities and
/// recomputed on every save.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{new_id, Country, EntityKind, Filter, Record};
use crate::error::{StoreResult, Violations};

/// Stored section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,

    pub country: Country,

    pub project_id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit of work (m², m³, units...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default)]
    pub target_quantity: Decimal,

    #[serde(default)]
    pub completed_quantity: Decimal,

    /// Derived: `round(completed / target * 100)`, within 0..=100
    #[serde(default)]
    pub progress: u8,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Computes section progress as a whole percentage
///
/// Returns 0 for a zero target. Stored quantities may be inconsistent
/// (completed above target, negative legacy values), so the result is clamped
/// to 0..=100.
pub fn compute_progress(target: Decimal, completed: Decimal) -> u8 {
    if target <= Decimal::ZERO {
        return 0;
    }
    // A ratio too large for Decimal is far above 100 either way
    let Some(percent) = completed
        .checked_div(target)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    else {
        return if completed > Decimal::ZERO { 100 } else { 0 };
    };
    percent
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .max(Decimal::ZERO)
        .min(Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0)
}

impl Section {
    fn recompute(&mut self) {
        self.progress = compute_progress(self.target_quantity, self.completed_quantity);
    }

    fn check_rules(&self) -> StoreResult<()> {
        let mut v = Violations::new();
        v.check(!self.name.trim().is_empty(), "name", "Name is required");
        v.check(
            !self.project_id.trim().is_empty(),
            "projectId",
            "Project is required",
        );
        v.check(
            self.target_quantity >= Decimal::ZERO,
            "targetQuantity",
            "Target quantity must not be negative",
        );
        v.check(
            self.completed_quantity >= Decimal::ZERO,
            "completedQuantity",
            "Completed quantity must not be negative",
        );
        v.into_result()
    }
}

impl Record for Section {
    const KIND: EntityKind = EntityKind::Section;

    fn id(&self) -> &str {
        &self.id
    }

    fn country(&self) -> Country {
        self.country
    }
}

/// Input for creating a section
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSection {
    #[serde(default)]
    pub country: Option<Country>,

    pub project_id: String,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    pub description: Option<String>,

    pub unit: Option<String>,

    #[serde(default)]
    pub target_quantity: Decimal,

    #[serde(default)]
    pub completed_quantity: Decimal,
}

impl CreateSection {
    pub(crate) fn into_record(self, country: Country, now: DateTime<Utc>) -> StoreResult<Section> {
        self.validate()?;

        let mut section = Section {
            id: new_id(),
            country,
            project_id: self.project_id,
            name: self.name.trim().to_string(),
            description: self.description,
            unit: self.unit,
            target_quantity: self.target_quantity,
            completed_quantity: self.completed_quantity,
            progress: 0,
            created_at: now,
            updated_at: now,
        };
        section.check_rules()?;
        section.recompute();
        Ok(section)
    }
}

/// Partial update for a section
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSection {
    pub project_id: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    pub unit: Option<String>,

    pub target_quantity: Option<Decimal>,

    pub completed_quantity: Option<Decimal>,
}

impl UpdateSection {
    pub(crate) fn apply(self, section: &mut Section, now: DateTime<Utc>) -> StoreResult<()> {
        self.validate()?;

        if let Some(project_id) = self.project_id {
            section.project_id = project_id;
        }
        if let Some(name) = self.name {
            section.name = name.trim().to_string();
        }
        if self.description.is_some() {
            section.description = self.description;
        }
        if self.unit.is_some() {
            section.unit = self.unit;
        }
        if let Some(target) = self.target_quantity {
            section.target_quantity = target;
        }
        if let Some(completed) = self.completed_quantity {
            section.completed_quantity = completed;
        }
        section.updated_at = now;

        section.check_rules()?;
        section.recompute();
        Ok(())
    }
}

/// Query filter for sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFilter {
    pub project_id: Option<String>,
}

impl SectionFilter {
    pub fn for_project(project_id: &str) -> Self {
        Self {
            project_id: Some(project_id.to_string()),
        }
    }

    pub fn to_filter(&self) -> Filter {
        Filter::new().eq_opt("projectId", self.project_id.clone())
    }
}
