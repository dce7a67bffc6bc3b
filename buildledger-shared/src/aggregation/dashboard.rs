/// Dashboard and reports
///
/// Grouping and summation over one country's full record set. The whole
/// snapshot is held in memory; there is no pagination at this step.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::balance::{compute_balance, EmployeeBalance};
use super::{percentage, total, CountrySnapshot};
use crate::models::{Country, InventoryStatus, ProjectStatus, Section};

/// Payment totals of a country
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTotals {
    pub count: usize,

    #[serde(rename = "totalEGP")]
    pub total_egp: Decimal,

    #[serde(rename = "totalUSD")]
    pub total_usd: Decimal,

    /// Sum of `amount` per payment type
    pub by_type: BTreeMap<String, Decimal>,
}

/// Inventory item at or below its reorder threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub id: String,
    pub name: String,
    pub quantity: Decimal,
    pub min_quantity: Decimal,
    pub status: InventoryStatus,
}

/// Country dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub country: Country,

    pub total_projects: usize,
    pub projects_by_status: BTreeMap<String, usize>,
    pub total_budget: Decimal,

    /// Sum of all spendings; auto-derived rows included
    pub total_spent: Decimal,
    pub budget_utilization: Decimal,
    pub spending_by_category: BTreeMap<String, Decimal>,

    /// Keyed by `YYYY-MM`
    pub spending_by_month: BTreeMap<String, Decimal>,

    pub active_employees: usize,
    pub inactive_employees: usize,
    pub estimated_monthly_payroll: Decimal,

    pub payments: PaymentTotals,

    pub inventory_by_status: BTreeMap<String, usize>,
    pub total_inventory_value: Decimal,
    pub low_stock_items: Vec<LowStockItem>,

    pub total_sections: usize,
    pub average_section_progress: Decimal,
}

impl DashboardSummary {
    pub fn compute(snapshot: &CountrySnapshot) -> Self {
        let mut projects_by_status: BTreeMap<String, usize> = ProjectStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for project in &snapshot.projects {
            *projects_by_status
                .entry(project.status.as_str().to_string())
                .or_default() += 1;
        }
        let total_budget = total(snapshot.projects.iter().map(|p| p.budget));

        let mut spending_by_category = BTreeMap::new();
        let mut spending_by_month = BTreeMap::new();
        let mut total_spent = Decimal::ZERO;
        for spending in &snapshot.spendings {
            total_spent = total_spent.saturating_add(spending.amount);
            add_to(
                &mut spending_by_category,
                spending.category.as_str().to_string(),
                spending.amount,
            );
            add_to(
                &mut spending_by_month,
                spending.date.format("%Y-%m").to_string(),
                spending.amount,
            );
        }

        let active: Vec<_> = snapshot.employees.iter().filter(|e| e.active).collect();
        let estimated_monthly_payroll = total(active.iter().map(|e| e.estimated_monthly_cost()));

        let mut payments = PaymentTotals::default();
        for payment in &snapshot.payments {
            let (egp, usd) = payment.currency_split();
            payments.count += 1;
            payments.total_egp = payments.total_egp.saturating_add(egp);
            payments.total_usd = payments.total_usd.saturating_add(usd);
            add_to(
                &mut payments.by_type,
                payment.payment_type.as_str().to_string(),
                payment.amount,
            );
        }

        let mut inventory_by_status: BTreeMap<String, usize> = InventoryStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        let mut low_stock_items = Vec::new();
        for item in &snapshot.inventory {
            *inventory_by_status
                .entry(item.status.as_str().to_string())
                .or_default() += 1;
            if item.needs_restock() {
                low_stock_items.push(LowStockItem {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    min_quantity: item.min_quantity,
                    status: item.status,
                });
            }
        }

        Self {
            country: snapshot.country,
            total_projects: snapshot.projects.len(),
            projects_by_status,
            total_budget,
            total_spent,
            budget_utilization: percentage(total_spent, total_budget),
            spending_by_category,
            spending_by_month,
            active_employees: active.len(),
            inactive_employees: snapshot.employees.len() - active.len(),
            estimated_monthly_payroll,
            payments,
            inventory_by_status,
            total_inventory_value: total(snapshot.inventory.iter().map(|i| i.total_value)),
            low_stock_items,
            total_sections: snapshot.sections.len(),
            average_section_progress: average_progress(snapshot.sections.iter()),
        }
    }
}

/// One project in the projects report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReportRow {
    pub project_id: String,
    pub project_name: String,
    pub status: ProjectStatus,
    pub budget: Decimal,
    pub spent: Decimal,
    pub budget_utilization: Decimal,
    pub remaining_budget: Decimal,
    pub section_count: usize,
    pub average_progress: Decimal,
}

/// Per-project budget report of a country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub country: Country,
    pub projects: Vec<ProjectReportRow>,
    pub total_budget: Decimal,
    pub total_spent: Decimal,
}

impl ProjectReport {
    pub fn compute(snapshot: &CountrySnapshot) -> Self {
        let projects: Vec<ProjectReportRow> = snapshot
            .projects
            .iter()
            .map(|project| {
                let spent = total(
                    snapshot
                        .spendings
                        .iter()
                        .filter(|s| s.project_id == project.id)
                        .map(|s| s.amount),
                );
                let sections: Vec<&Section> = snapshot
                    .sections
                    .iter()
                    .filter(|s| s.project_id == project.id)
                    .collect();

                ProjectReportRow {
                    project_id: project.id.clone(),
                    project_name: project.name.clone(),
                    status: project.status,
                    budget: project.budget,
                    spent,
                    budget_utilization: percentage(spent, project.budget),
                    remaining_budget: project.budget.saturating_sub(spent),
                    section_count: sections.len(),
                    average_progress: average_progress(sections.into_iter()),
                }
            })
            .collect();

        Self {
            country: snapshot.country,
            total_budget: total(projects.iter().map(|r| r.budget)),
            total_spent: total(projects.iter().map(|r| r.spent)),
            projects,
        }
    }
}

/// One employee in the balance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReportRow {
    pub employee_name: String,

    #[serde(flatten)]
    pub balance: EmployeeBalance,
}

/// Balances of every active employee of a country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub country: Country,
    pub as_of: NaiveDate,
    pub employees: Vec<BalanceReportRow>,
    pub total_earned: Decimal,
    pub total_paid: Decimal,
    pub total_balance: Decimal,
}

impl BalanceReport {
    pub fn compute(snapshot: &CountrySnapshot, as_of: NaiveDate) -> Self {
        let employees: Vec<BalanceReportRow> = snapshot
            .employees
            .iter()
            .filter(|e| e.active)
            .map(|employee| BalanceReportRow {
                employee_name: employee.name.clone(),
                balance: compute_balance(employee, &snapshot.payments, as_of),
            })
            .collect();

        Self {
            country: snapshot.country,
            as_of,
            total_earned: total(employees.iter().map(|r| r.balance.total_earned)),
            total_paid: total(employees.iter().map(|r| r.balance.total_paid)),
            total_balance: total(employees.iter().map(|r| r.balance.balance)),
            employees,
        }
    }
}

fn add_to(totals: &mut BTreeMap<String, Decimal>, key: String, amount: Decimal) {
    let entry = totals.entry(key).or_insert(Decimal::ZERO);
    *entry = entry.saturating_add(amount);
}

fn average_progress<'a>(sections: impl Iterator<Item = &'a Section>) -> Decimal {
    let (sum, count) = sections.fold((0u32, 0u32), |(sum, count), s| {
        (sum + u32::from(s.progress), count + 1)
    });
    if count == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(sum) / Decimal::from(count))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CreateEmployee, CreateInventoryItem, CreatePayment, CreateProject, CreateSection,
        CreateSpending, Currency, EmployeeType, PaymentType, SpendingCategory,
    };
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> CountrySnapshot {
        let now = Utc::now();
        let country = Country::Egypt;
        let mut snap = CountrySnapshot::empty(country);

        let tower = CreateProject {
            name: "Tower".to_string(),
            budget: dec!(10000),
            status: ProjectStatus::InProgress,
            ..Default::default()
        }
        .into_record(country, now)
        .unwrap();
        let villa = CreateProject {
            name: "Villa".to_string(),
            budget: dec!(5000),
            status: ProjectStatus::Completed,
            ..Default::default()
        }
        .into_record(country, now)
        .unwrap();

        for (target, done) in [(dec!(30), dec!(18)), (dec!(10), dec!(10))] {
            snap.sections.push(
                CreateSection {
                    project_id: tower.id.clone(),
                    name: "Works".to_string(),
                    target_quantity: target,
                    completed_quantity: done,
                    ..Default::default()
                }
                .into_record(country, now)
                .unwrap(),
            );
        }

        for (amount, category, day) in [
            (dec!(1000), SpendingCategory::Materials, date(2025, 1, 10)),
            (dec!(500), SpendingCategory::Labor, date(2025, 1, 20)),
            (dec!(1500), SpendingCategory::Materials, date(2025, 2, 5)),
        ] {
            snap.spendings.push(
                CreateSpending {
                    project_id: tower.id.clone(),
                    amount,
                    category,
                    date: Some(day),
                    ..Default::default()
                }
                .into_record(country, now)
                .unwrap(),
            );
        }

        let engineer = CreateEmployee {
            name: "Engineer".to_string(),
            monthly_salary: Some(dec!(6000)),
            hire_date: Some(date(2025, 1, 1)),
            ..Default::default()
        }
        .into_record(country, now)
        .unwrap();
        let mut retired = CreateEmployee {
            name: "Retired".to_string(),
            employee_type: EmployeeType::Daily,
            daily_rate: Some(dec!(100)),
            ..Default::default()
        }
        .into_record(country, now)
        .unwrap();
        retired.active = false;

        let mut salary = CreatePayment::new(&engineer.id, PaymentType::Salary, Currency::Egp);
        salary.amount = Some(dec!(6000));
        let mut split = CreatePayment::new(&engineer.id, PaymentType::Advance, Currency::Split);
        split.amount_egp = Some(dec!(100));
        split.amount_usd = Some(dec!(50));
        snap.payments.push(salary.into_record(country, now).unwrap());
        snap.payments.push(split.into_record(country, now).unwrap());

        for (quantity, min) in [(dec!(0), dec!(5)), (dec!(5), dec!(10)), (dec!(20), dec!(10))] {
            snap.inventory.push(
                CreateInventoryItem {
                    name: "Bricks".to_string(),
                    quantity,
                    min_quantity: min,
                    unit_price: dec!(2),
                    ..Default::default()
                }
                .into_record(country, now)
                .unwrap(),
            );
        }

        snap.projects = vec![tower, villa];
        snap.employees = vec![engineer, retired];
        snap
    }

    #[test]
    fn test_dashboard_summary() {
        let summary = DashboardSummary::compute(&snapshot());

        assert_eq!(summary.total_projects, 2);
        assert_eq!(summary.projects_by_status["in_progress"], 1);
        assert_eq!(summary.projects_by_status["completed"], 1);
        assert_eq!(summary.projects_by_status["planning"], 0);
        assert_eq!(summary.total_budget, dec!(15000));
        assert_eq!(summary.total_spent, dec!(3000));
        assert_eq!(summary.budget_utilization, dec!(20));

        assert_eq!(summary.spending_by_category["materials"], dec!(2500));
        assert_eq!(summary.spending_by_category["labor"], dec!(500));
        assert_eq!(summary.spending_by_month["2025-01"], dec!(1500));
        assert_eq!(summary.spending_by_month["2025-02"], dec!(1500));

        assert_eq!(summary.active_employees, 1);
        assert_eq!(summary.inactive_employees, 1);
        assert_eq!(summary.estimated_monthly_payroll, dec!(6000));

        assert_eq!(summary.payments.count, 2);
        assert_eq!(summary.payments.total_egp, dec!(6100));
        assert_eq!(summary.payments.total_usd, dec!(50));
        assert_eq!(summary.payments.by_type["salary"], dec!(6000));
        assert_eq!(summary.payments.by_type["advance"], dec!(150));

        assert_eq!(summary.inventory_by_status["out_of_stock"], 1);
        assert_eq!(summary.inventory_by_status["low_stock"], 1);
        assert_eq!(summary.inventory_by_status["in_stock"], 1);
        assert_eq!(summary.total_inventory_value, dec!(50));
        assert_eq!(summary.low_stock_items.len(), 2);

        assert_eq!(summary.total_sections, 2);
        assert_eq!(summary.average_section_progress, dec!(80));
    }

    #[test]
    fn test_empty_dashboard() {
        let summary = DashboardSummary::compute(&CountrySnapshot::empty(Country::Libya));
        assert_eq!(summary.country, Country::Libya);
        assert_eq!(summary.total_projects, 0);
        assert_eq!(summary.budget_utilization, Decimal::ZERO);
        assert_eq!(summary.average_section_progress, Decimal::ZERO);
        assert!(summary.low_stock_items.is_empty());
    }

    #[test]
    fn test_project_report() {
        let report = ProjectReport::compute(&snapshot());
        assert_eq!(report.projects.len(), 2);

        let tower = &report.projects[0];
        assert_eq!(tower.project_name, "Tower");
        assert_eq!(tower.spent, dec!(3000));
        assert_eq!(tower.budget_utilization, dec!(30));
        assert_eq!(tower.remaining_budget, dec!(7000));
        assert_eq!(tower.section_count, 2);
        assert_eq!(tower.average_progress, dec!(80));

        let villa = &report.projects[1];
        assert_eq!(villa.spent, Decimal::ZERO);
        assert_eq!(villa.section_count, 0);

        assert_eq!(report.total_budget, dec!(15000));
        assert_eq!(report.total_spent, dec!(3000));
    }

    #[test]
    fn test_balance_report_lists_active_employees() {
        let report = BalanceReport::compute(&snapshot(), date(2025, 3, 1));
        assert_eq!(report.employees.len(), 1);

        let row = &report.employees[0];
        assert_eq!(row.employee_name, "Engineer");
        assert_eq!(row.balance.months_worked, Some(2));
        assert_eq!(row.balance.total_earned, dec!(12000));
        assert_eq!(row.balance.total_paid, dec!(6150));
        assert_eq!(report.total_balance, dec!(5850));

        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json["employeeName"], "Engineer");
        assert_eq!(json["totalEarned"], serde_json::json!(12000.0));
    }
}
