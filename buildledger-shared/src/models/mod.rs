/// Entity schemas for BuildLedger
///
/// This module contains the seven entity kinds held by the record store, their
/// creation inputs, partial-update patches and query filters.
///
/// # Models
///
/// - `project`: Construction projects with budget and status
/// - `section`: Work sections of a project with derived progress
/// - `spending`: Money spent on a project (manual or auto-derived)
/// - `employee`: Monthly or daily workers, soft-deleted
/// - `payment`: Money paid to an employee, single or split currency
/// - `inventory`: Stock items with derived value and status
/// - `user`: Back-office accounts, unique per (username, country)
///
/// All entities share `id`, `country`, `createdAt` and `updatedAt`. Derived
/// fields are recomputed by the entity itself on every create and update, so
/// the store never trusts caller-supplied values for them.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod country;
pub mod employee;
pub mod inventory;
pub mod payment;
pub mod project;
pub mod section;
pub mod spending;
pub mod user;

pub use country::Country;
pub use employee::{CreateEmployee, Employee, EmployeeFilter, EmployeeType, UpdateEmployee};
pub use inventory::{
    CreateInventoryItem, InventoryFilter, InventoryItem, InventoryStatus, UpdateInventoryItem,
};
pub use payment::{CreatePayment, Currency, Payment, PaymentFilter, PaymentType, UpdatePayment};
pub use project::{CreateProject, Project, ProjectFilter, ProjectStatus, UpdateProject};
pub use section::{CreateSection, Section, SectionFilter, UpdateSection};
pub use spending::{
    CreateSpending, Spending, SpendingCategory, SpendingFilter, SpendingSource, UpdateSpending,
};
pub use user::{CreateUser, UpdateUser, User, UserFilter, UserProfile, UserRole};

/// The seven stored entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Section,
    Spending,
    User,
    Employee,
    Payment,
    Inventory,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Project,
        EntityKind::Section,
        EntityKind::Spending,
        EntityKind::User,
        EntityKind::Employee,
        EntityKind::Payment,
        EntityKind::Inventory,
    ];

    /// Collection name, used as the file stem and the remote table name
    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityKind::Project => "projects",
            EntityKind::Section => "sections",
            EntityKind::Spending => "spendings",
            EntityKind::User => "users",
            EntityKind::Employee => "employees",
            EntityKind::Payment => "payments",
            EntityKind::Inventory => "inventory",
        }
    }

    /// Whether records of this kind live in one file per country
    ///
    /// Users and spendings are held in a single shared file and filtered by
    /// their `country` field instead.
    pub fn is_partitioned(&self) -> bool {
        !matches!(self, EntityKind::User | EntityKind::Spending)
    }

    /// File name holding this kind's records for `country` in file mode
    pub fn file_name(&self, country: Option<Country>) -> String {
        match (self.is_partitioned(), country) {
            (true, Some(country)) => format!("{}_{}.json", self.collection_name(), country),
            _ => format!("{}.json", self.collection_name()),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}

/// A storable entity
///
/// Implemented by every model; lets the typed collection layer route a value to
/// the right partition without knowing its concrete type.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn country(&self) -> Country;
}

/// Generates a new opaque record id
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Equality predicates applied to stored documents
///
/// Field names are the camelCase JSON names. File mode compares them in memory;
/// remote mode turns them into a JSONB containment predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, serde_json::Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality predicate
    pub fn eq(mut self, field: &str, value: impl Into<serde_json::Value>) -> Self {
        self.conditions.push((field.to_string(), value.into()));
        self
    }

    /// Adds an equality predicate only when `value` is present
    pub fn eq_opt<V: Into<serde_json::Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[(String, serde_json::Value)] {
        &self.conditions
    }

    /// Checks a document against every predicate
    pub fn matches(&self, doc: &serde_json::Value) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }

    /// Renders the predicates as a single JSON object for containment queries
    pub fn to_document(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> =
            self.conditions.iter().cloned().collect();
        serde_json::Value::Object(map)
    }
}

/// Serialises a unit-only enum variant to its JSON string
pub(crate) fn enum_value<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}
