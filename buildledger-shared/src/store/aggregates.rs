use chrono::{NaiveDate, Utc};
use tracing::debug;

use super::Store;
use crate::aggregation::{
    compute_balance, BalanceReport, CountrySnapshot, DashboardSummary, EmployeeBalance,
    EmployeeView, InventoryView, Lookups, PaymentView, ProjectExpenses, ProjectReport,
    SectionCosts, SectionView, SpendingView,
};
use crate::models::{
    Country, EmployeeFilter, InventoryFilter, PaymentFilter, ProjectFilter, SectionFilter,
    SpendingFilter,
};

impl Store {
    /// Loads every partitioned record of `country`
    pub async fn snapshot(&self, country: Country) -> CountrySnapshot {
        let project_filter = ProjectFilter::default();
        let section_filter = SectionFilter::default();
        let spending_filter = SpendingFilter::default();
        let employee_filter = EmployeeFilter::default();
        let payment_filter = PaymentFilter::default();
        let inventory_filter = InventoryFilter::default();

        let (projects, sections, spendings, employees, payments, inventory) = tokio::join!(
            self.get_projects(country, &project_filter),
            self.get_sections(country, &section_filter),
            self.get_spendings(Some(country), &spending_filter),
            self.get_employees(country, &employee_filter),
            self.get_payments(country, &payment_filter),
            self.get_inventory(country, &inventory_filter),
        );
        debug!(
            country = %country,
            projects = projects.len(),
            spendings = spendings.len(),
            payments = payments.len(),
            "Loaded country snapshot"
        );

        CountrySnapshot {
            country,
            projects,
            sections,
            spendings,
            employees,
            payments,
            inventory,
        }
    }

    /// Id → name maps for enriching records of `country`
    pub async fn lookups(&self, country: Country) -> Lookups {
        let project_filter = ProjectFilter::default();
        let section_filter = SectionFilter::default();
        let employee_filter = EmployeeFilter::default();

        let (projects, sections, employees) = tokio::join!(
            self.get_projects(country, &project_filter),
            self.get_sections(country, &section_filter),
            self.get_employees(country, &employee_filter),
        );
        Lookups::new(&projects, &sections, &employees)
    }

    /// Balance of an employee as of today
    pub async fn get_employee_balance(&self, country: Country, employee_id: &str) -> Option<EmployeeBalance> {
        self.get_employee_balance_as_of(country, employee_id, Utc::now().date_naive())
            .await
    }

    pub async fn get_employee_balance_as_of(
        &self,
        country: Country,
        employee_id: &str,
        as_of: NaiveDate,
    ) -> Option<EmployeeBalance> {
        let employee = self.find_employee(country, employee_id).await?;
        let payments = self
            .get_payments(country, &PaymentFilter::for_employee(employee_id))
            .await;
        Some(compute_balance(&employee, &payments, as_of))
    }

    /// Full expenses of a project; `None` when the project does not exist
    pub async fn get_project_full_expenses(&self, country: Country, project_id: &str) -> Option<ProjectExpenses> {
        let project = self.find_project(country, project_id).await?;

        let section_filter = SectionFilter::for_project(project_id);
        let spending_filter = SpendingFilter {
            project_id: Some(project_id.to_string()),
            ..Default::default()
        };
        let inventory_filter = InventoryFilter::for_project(project_id);
        let payment_filter = PaymentFilter {
            project_id: Some(project_id.to_string()),
            ..Default::default()
        };
        let employee_filter = EmployeeFilter::active();

        let (sections, spendings, inventory, payments, employees) = tokio::join!(
            self.get_sections(country, &section_filter),
            self.get_spendings(Some(country), &spending_filter),
            self.get_inventory(country, &inventory_filter),
            self.get_payments(country, &payment_filter),
            self.get_employees(country, &employee_filter),
        );

        Some(ProjectExpenses::compute(
            &project, &sections, &spendings, &inventory, &payments, &employees,
        ))
    }

    /// Full costs of a section; `None` when the section does not exist
    pub async fn get_section_full_costs(&self, country: Country, section_id: &str) -> Option<SectionCosts> {
        let section = self.find_section(country, section_id).await?;
        let by_section = Some(section_id.to_string());
        let spending_filter = SpendingFilter {
            section_id: by_section.clone(),
            ..Default::default()
        };
        let inventory_filter = InventoryFilter {
            section_id: by_section.clone(),
            ..Default::default()
        };
        let payment_filter = PaymentFilter {
            section_id: by_section.clone(),
            ..Default::default()
        };
        let employee_filter = EmployeeFilter {
            section_id: by_section,
            active: Some(true),
            ..Default::default()
        };

        let (spendings, inventory, payments, employees) = tokio::join!(
            self.get_spendings(Some(country), &spending_filter),
            self.get_inventory(country, &inventory_filter),
            self.get_payments(country, &payment_filter),
            self.get_employees(country, &employee_filter),
        );

        Some(SectionCosts::compute(
            &section, &spendings, &inventory, &payments, &employees,
        ))
    }

    pub async fn get_dashboard(&self, country: Country) -> DashboardSummary {
        DashboardSummary::compute(&self.snapshot(country).await)
    }

    pub async fn get_project_report(&self, country: Country) -> ProjectReport {
        ProjectReport::compute(&self.snapshot(country).await)
    }

    pub async fn get_balance_report(&self, country: Country, as_of: NaiveDate) -> BalanceReport {
        BalanceReport::compute(&self.snapshot(country).await, as_of)
    }

    pub async fn get_payment_views(&self, country: Country, filter: &PaymentFilter) -> Vec<PaymentView> {
        let (payments, lookups) = tokio::join!(self.get_payments(country, filter), self.lookups(country));
        payments
            .into_iter()
            .map(|p| PaymentView::new(p, &lookups))
            .collect()
    }

    pub async fn get_spending_views(&self, country: Country, filter: &SpendingFilter) -> Vec<SpendingView> {
        let (spendings, lookups) = tokio::join!(
            self.get_spendings(Some(country), filter),
            self.lookups(country)
        );
        spendings
            .into_iter()
            .map(|s| SpendingView::new(s, &lookups))
            .collect()
    }

    pub async fn get_employee_views(&self, country: Country, filter: &EmployeeFilter) -> Vec<EmployeeView> {
        let (employees, lookups) = tokio::join!(self.get_employees(country, filter), self.lookups(country));
        employees
            .into_iter()
            .map(|e| EmployeeView::new(e, &lookups))
            .collect()
    }

    pub async fn get_section_views(&self, country: Country, filter: &SectionFilter) -> Vec<SectionView> {
        let (sections, lookups) = tokio::join!(self.get_sections(country, filter), self.lookups(country));
        sections
            .into_iter()
            .map(|s| SectionView::new(s, &lookups))
            .collect()
    }

    pub async fn get_inventory_views(&self, country: Country, filter: &InventoryFilter) -> Vec<InventoryView> {
        let (items, lookups) = tokio::join!(self.get_inventory(country, filter), self.lookups(country));
        items
            .into_iter()
            .map(|i| InventoryView::new(i, &lookups))
            .collect()
    }
}
