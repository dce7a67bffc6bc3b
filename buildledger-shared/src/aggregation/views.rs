/// Enriched record views
///
/// Each view is the stored record plus the names of the records it points at,
/// resolved through [`Lookups`]. Construction is a pure function of the
/// record and the lookups; an id with no match leaves its name `None`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Employee, InventoryItem, Payment, Project, Section, Spending};

/// Id → name maps of one country
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    projects: HashMap<String, String>,
    sections: HashMap<String, String>,
    employees: HashMap<String, String>,
}

impl Lookups {
    pub fn new(projects: &[Project], sections: &[Section], employees: &[Employee]) -> Self {
        Self {
            projects: projects.iter().map(|p| (p.id.clone(), p.name.clone())).collect(),
            sections: sections.iter().map(|s| (s.id.clone(), s.name.clone())).collect(),
            employees: employees.iter().map(|e| (e.id.clone(), e.name.clone())).collect(),
        }
    }

    pub fn project_name(&self, id: Option<&str>) -> Option<String> {
        id.and_then(|id| self.projects.get(id)).cloned()
    }

    pub fn section_name(&self, id: Option<&str>) -> Option<String> {
        id.and_then(|id| self.sections.get(id)).cloned()
    }

    pub fn employee_name(&self, id: Option<&str>) -> Option<String> {
        id.and_then(|id| self.employees.get(id)).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: Payment,
    pub employee_name: Option<String>,
    pub project_name: Option<String>,
    pub section_name: Option<String>,
}

impl PaymentView {
    pub fn new(payment: Payment, lookups: &Lookups) -> Self {
        Self {
            employee_name: lookups.employee_name(Some(payment.employee_id.as_str())),
            project_name: lookups.project_name(payment.project_id.as_deref()),
            section_name: lookups.section_name(payment.section_id.as_deref()),
            payment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingView {
    #[serde(flatten)]
    pub spending: Spending,
    pub project_name: Option<String>,
    pub section_name: Option<String>,
}

impl SpendingView {
    pub fn new(spending: Spending, lookups: &Lookups) -> Self {
        Self {
            project_name: lookups.project_name(Some(spending.project_id.as_str())),
            section_name: lookups.section_name(spending.section_id.as_deref()),
            spending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: Employee,
    pub project_name: Option<String>,
    pub section_name: Option<String>,
    pub estimated_monthly_cost: Decimal,
}

impl EmployeeView {
    pub fn new(employee: Employee, lookups: &Lookups) -> Self {
        Self {
            project_name: lookups.project_name(employee.project_id.as_deref()),
            section_name: lookups.section_name(employee.section_id.as_deref()),
            estimated_monthly_cost: employee.estimated_monthly_cost(),
            employee,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    #[serde(flatten)]
    pub section: Section,
    pub project_name: Option<String>,
}

impl SectionView {
    pub fn new(section: Section, lookups: &Lookups) -> Self {
        Self {
            project_name: lookups.project_name(Some(section.project_id.as_str())),
            section,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub project_name: Option<String>,
    pub section_name: Option<String>,
}

impl InventoryView {
    pub fn new(item: InventoryItem, lookups: &Lookups) -> Self {
        Self {
            project_name: lookups.project_name(item.project_id.as_deref()),
            section_name: lookups.section_name(item.section_id.as_deref()),
            item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Country, CreatePayment, CreateProject, CreateSpending, Currency, PaymentType};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payment_view_resolves_names() {
        let now = Utc::now();
        let project = CreateProject {
            name: "Tower".to_string(),
            ..Default::default()
        }
        .into_record(Country::Egypt, now)
        .unwrap();

        let mut input = CreatePayment::new("missing-employee", PaymentType::Loan, Currency::Usd);
        input.amount = Some(dec!(10));
        input.project_id = Some(project.id.clone());
        let payment = input.into_record(Country::Egypt, now).unwrap();

        let lookups = Lookups::new(&[project], &[], &[]);
        let view = PaymentView::new(payment, &lookups);

        assert_eq!(view.project_name.as_deref(), Some("Tower"));
        assert_eq!(view.employee_name, None);
        assert_eq!(view.section_name, None);
    }

    #[test]
    fn test_view_serialises_flat() {
        let spending = CreateSpending {
            project_id: "gone".to_string(),
            amount: dec!(75),
            ..Default::default()
        }
        .into_record(Country::Libya, Utc::now())
        .unwrap();

        let view = SpendingView::new(spending, &Lookups::default());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["projectId"], "gone");
        assert_eq!(json["country"], "libya");
        assert!(json["projectName"].is_null());
    }
}
