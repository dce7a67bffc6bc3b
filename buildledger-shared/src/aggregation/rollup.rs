/// Full-expense rollups
///
/// ```text
/// total = directSpendings + inventoryCosts + paymentsCosts + salaryCosts
/// ```
///
/// - `directSpendings`: spendings of the project (or section)
/// - `inventoryCosts`: total value of linked inventory items
/// - `paymentsCosts`: amounts of linked payments
/// - `salaryCosts`: estimated monthly cost of active employees assigned to
///   the section, or to any section of the project
///
/// Auto-derived spendings already mirror some payments and inventory items,
/// so those appear both in `directSpendings` and in their own bucket. The
/// total keeps both. Budget figures use `directSpendings` only.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{percentage, total};
use crate::models::{Employee, InventoryItem, Payment, Project, Section, Spending};

/// Full expenses of one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectExpenses {
    pub project_id: String,
    pub project_name: String,
    pub budget: Decimal,
    pub direct_spendings: Decimal,
    pub inventory_costs: Decimal,
    pub payments_costs: Decimal,
    pub salary_costs: Decimal,
    pub total_expenses: Decimal,
    /// `directSpendings / budget × 100`, two places
    pub budget_utilization: Decimal,
    pub remaining_budget: Decimal,
    pub active_employees: usize,
}

/// Full costs of one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionCosts {
    pub section_id: String,
    pub section_name: String,
    pub project_id: String,
    pub progress: u8,
    pub direct_spendings: Decimal,
    pub inventory_costs: Decimal,
    pub payments_costs: Decimal,
    pub salary_costs: Decimal,
    pub total_costs: Decimal,
    pub active_employees: usize,
}

impl ProjectExpenses {
    /// Rolls up everything linked to `project`
    ///
    /// The slices may hold records of other projects; only rows pointing at
    /// `project` (or at one of its sections, for employees) are counted.
    pub fn compute(
        project: &Project,
        sections: &[Section],
        spendings: &[Spending],
        inventory: &[InventoryItem],
        payments: &[Payment],
        employees: &[Employee],
    ) -> Self {
        let project_id = project.id.as_str();
        let section_ids: HashSet<&str> = sections
            .iter()
            .filter(|s| s.project_id == project_id)
            .map(|s| s.id.as_str())
            .collect();

        let direct_spendings = total(
            spendings
                .iter()
                .filter(|s| s.project_id == project_id)
                .map(|s| s.amount),
        );
        let inventory_costs = total(
            inventory
                .iter()
                .filter(|i| i.project_id.as_deref() == Some(project_id))
                .map(|i| i.total_value),
        );
        let payments_costs = total(
            payments
                .iter()
                .filter(|p| p.project_id.as_deref() == Some(project_id))
                .map(|p| p.amount),
        );
        let (salary_costs, active_employees) = salary_costs(employees, |section_id| {
            section_ids.contains(section_id)
        });

        Self {
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            budget: project.budget,
            direct_spendings,
            inventory_costs,
            payments_costs,
            salary_costs,
            total_expenses: total([direct_spendings, inventory_costs, payments_costs, salary_costs]),
            budget_utilization: percentage(direct_spendings, project.budget),
            remaining_budget: project.budget.saturating_sub(direct_spendings),
            active_employees,
        }
    }
}

impl SectionCosts {
    /// Rolls up everything linked to `section`
    pub fn compute(
        section: &Section,
        spendings: &[Spending],
        inventory: &[InventoryItem],
        payments: &[Payment],
        employees: &[Employee],
    ) -> Self {
        let section_id = Some(section.id.as_str());

        let direct_spendings = total(
            spendings
                .iter()
                .filter(|s| s.section_id.as_deref() == section_id)
                .map(|s| s.amount),
        );
        let inventory_costs = total(
            inventory
                .iter()
                .filter(|i| i.section_id.as_deref() == section_id)
                .map(|i| i.total_value),
        );
        let payments_costs = total(
            payments
                .iter()
                .filter(|p| p.section_id.as_deref() == section_id)
                .map(|p| p.amount),
        );
        let (salary_costs, active_employees) =
            salary_costs(employees, |id| id == section.id.as_str());

        Self {
            section_id: section.id.clone(),
            section_name: section.name.clone(),
            project_id: section.project_id.clone(),
            progress: section.progress,
            direct_spendings,
            inventory_costs,
            payments_costs,
            salary_costs,
            total_costs: total([direct_spendings, inventory_costs, payments_costs, salary_costs]),
            active_employees,
        }
    }
}

/// Monthly cost and head count of active employees whose section matches
fn salary_costs(employees: &[Employee], in_scope: impl Fn(&str) -> bool) -> (Decimal, usize) {
    employees
        .iter()
        .filter(|e| e.active)
        .filter(|e| e.section_id.as_deref().is_some_and(&in_scope))
        .fold((Decimal::ZERO, 0), |(cost, count), e| {
            (cost.saturating_add(e.estimated_monthly_cost()), count + 1)
        })
}
