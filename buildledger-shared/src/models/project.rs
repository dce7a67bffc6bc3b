/// Project model
///
/// A project is the top-level unit of construction work in a branch. It owns
/// zero or more sections and is the target of spendings, payments and
/// inventory items.
///
/// # Example
///
/// ```
/// use buildledger_shared::models::{CreateProject, Country, ProjectStatus};
/// use rust_decimal::Decimal;
///
/// let input = CreateProject {
///     country: Some(Country::Egypt),
///     name: "Nasr City Tower".to_string(),
///     budget: Decimal::new(2_500_000, 0),
///     ..Default::default()
/// };
/// assert_eq!(input.status, ProjectStatus::Planning);
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{enum_value, new_id, Country, EntityKind, Filter, Record};
use crate::error::{StoreResult, Violations};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Planning,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

/// Stored project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,

    pub country: Country,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    /// Planned budget in the branch's accounting currency
    #[serde(default)]
    pub budget: Decimal,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Project {
    fn check_rules(&self) -> StoreResult<()> {
        let mut v = Violations::new();
        v.check(!self.name.trim().is_empty(), "name", "Name is required");
        v.check(
            self.budget >= Decimal::ZERO,
            "budget",
            "Budget must not be negative",
        );
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            v.check(end >= start, "endDate", "End date must not precede start date");
        }
        v.into_result()
    }
}

impl Record for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn id(&self) -> &str {
        &self.id
    }

    fn country(&self) -> Country {
        self.country
    }
}

/// Input for creating a project
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    /// Partition; overwritten by the isolation layer with the caller's country
    #[serde(default)]
    pub country: Option<Country>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub location: Option<String>,

    pub client_name: Option<String>,

    #[serde(default)]
    pub budget: Decimal,

    #[serde(default)]
    pub status: ProjectStatus,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,
}

impl CreateProject {
    pub(crate) fn into_record(self, country: Country, now: DateTime<Utc>) -> StoreResult<Project> {
        self.validate()?;

        let project = Project {
            id: new_id(),
            country,
            name: self.name.trim().to_string(),
            description: self.description,
            location: self.location,
            client_name: self.client_name,
            budget: self.budget,
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: now,
            updated_at: now,
        };
        project.check_rules()?;
        Ok(project)
    }
}

/// Partial update for a project
///
/// Only `Some` fields are merged into the stored record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub location: Option<String>,

    pub client_name: Option<String>,

    pub budget: Option<Decimal>,

    pub status: Option<ProjectStatus>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,
}

impl UpdateProject {
    pub(crate) fn apply(self, project: &mut Project, now: DateTime<Utc>) -> StoreResult<()> {
        self.validate()?;

        if let Some(name) = self.name {
            project.name = name.trim().to_string();
        }
        if self.description.is_some() {
            project.description = self.description;
        }
        if self.location.is_some() {
            project.location = self.location;
        }
        if self.client_name.is_some() {
            project.client_name = self.client_name;
        }
        if let Some(budget) = self.budget {
            project.budget = budget;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if self.start_date.is_some() {
            project.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            project.end_date = self.end_date;
        }
        project.updated_at = now;

        project.check_rules()
    }
}

/// Query filter for projects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
}

impl ProjectFilter {
    pub fn to_filter(&self) -> Filter {
        Filter::new().eq_opt("status", self.status.as_ref().map(enum_value))
    }
}
