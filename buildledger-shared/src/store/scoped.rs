/// Country-scoped store access
///
/// [`ScopedStore`] is the store as seen by one authenticated caller. No
/// operation takes a country: reads use the caller's country, and every create
/// input has its `country` overwritten with it, whatever the client sent.

use chrono::NaiveDate;

use super::Store;
use crate::aggregation::{
    BalanceReport, DashboardSummary, EmployeeBalance, EmployeeView, InventoryView, PaymentView,
    ProjectExpenses, ProjectReport, SectionCosts, SectionView, SpendingView,
};
use crate::error::StoreResult;
use crate::isolation::CallerIdentity;
use crate::models::{
    Country, CreateEmployee, CreateInventoryItem, CreatePayment, CreateProject, CreateSection,
    CreateSpending, CreateUser, Employee, EmployeeFilter, InventoryFilter, InventoryItem, Payment,
    PaymentFilter, Project, ProjectFilter, Section, SectionFilter, Spending, SpendingFilter,
    UpdateEmployee, UpdateInventoryItem, UpdatePayment, UpdateProject, UpdateSection,
    UpdateSpending, UpdateUser, User, UserFilter,
};

/// Store bound to a caller's country
#[derive(Clone, Copy)]
pub struct ScopedStore<'a> {
    store: &'a Store,
    caller: &'a CallerIdentity,
}

impl<'a> ScopedStore<'a> {
    pub(crate) fn new(store: &'a Store, caller: &'a CallerIdentity) -> Self {
        Self { store, caller }
    }

    pub fn caller(&self) -> &CallerIdentity {
        self.caller
    }

    pub fn country(&self) -> Country {
        self.caller.country()
    }

    // Projects

    pub async fn projects(&self, filter: &ProjectFilter) -> Vec<Project> {
        self.store.get_projects(self.country(), filter).await
    }

    pub async fn project(&self, id: &str) -> Option<Project> {
        self.store.find_project(self.country(), id).await
    }

    pub async fn create_project(&self, mut input: CreateProject) -> StoreResult<Project> {
        input.country = Some(self.country());
        self.store.create_project(input).await
    }

    pub async fn update_project(&self, id: &str, patch: UpdateProject) -> StoreResult<Option<Project>> {
        self.store.update_project(id, self.country(), patch).await
    }

    pub async fn delete_project(&self, id: &str) -> StoreResult<bool> {
        self.store.delete_project(id, self.country()).await
    }

    // Sections

    pub async fn sections(&self, filter: &SectionFilter) -> Vec<SectionView> {
        self.store.get_section_views(self.country(), filter).await
    }

    pub async fn section(&self, id: &str) -> Option<Section> {
        self.store.find_section(self.country(), id).await
    }

    pub async fn create_section(&self, mut input: CreateSection) -> StoreResult<Section> {
        input.country = Some(self.country());
        self.store.create_section(input).await
    }

    pub async fn update_section(&self, id: &str, patch: UpdateSection) -> StoreResult<Option<Section>> {
        self.store.update_section(id, self.country(), patch).await
    }

    pub async fn delete_section(&self, id: &str) -> StoreResult<bool> {
        self.store.delete_section(id, self.country()).await
    }

    // Spendings

    pub async fn spendings(&self, filter: &SpendingFilter) -> Vec<SpendingView> {
        self.store.get_spending_views(self.country(), filter).await
    }

    pub async fn spending(&self, id: &str) -> Option<Spending> {
        self.store.find_spending(self.country(), id).await
    }

    /// Records a manual spending; `createdBy` is the caller
    pub async fn create_spending(&self, mut input: CreateSpending) -> StoreResult<Spending> {
        input.country = Some(self.country());
        input.created_by = Some(self.caller.user_id().to_string());
        self.store.create_spending(input).await
    }

    pub async fn update_spending(&self, id: &str, patch: UpdateSpending) -> StoreResult<Option<Spending>> {
        self.store.update_spending(id, self.country(), patch).await
    }

    pub async fn delete_spending(&self, id: &str) -> StoreResult<bool> {
        self.store.delete_spending(id, self.country()).await
    }

    // Employees

    pub async fn employees(&self, filter: &EmployeeFilter) -> Vec<EmployeeView> {
        self.store.get_employee_views(self.country(), filter).await
    }

    pub async fn employee(&self, id: &str) -> Option<Employee> {
        self.store.find_employee(self.country(), id).await
    }

    pub async fn create_employee(&self, mut input: CreateEmployee) -> StoreResult<Employee> {
        input.country = Some(self.country());
        self.store.create_employee(input).await
    }

    pub async fn update_employee(&self, id: &str, patch: UpdateEmployee) -> StoreResult<Option<Employee>> {
        self.store.update_employee(id, self.country(), patch).await
    }

    pub async fn delete_employee(&self, id: &str) -> StoreResult<bool> {
        self.store.delete_employee(id, self.country()).await
    }

    pub async fn employee_balance(&self, id: &str) -> Option<EmployeeBalance> {
        self.store.get_employee_balance(self.country(), id).await
    }

    // Payments

    pub async fn payments(&self, filter: &PaymentFilter) -> Vec<PaymentView> {
        self.store.get_payment_views(self.country(), filter).await
    }

    pub async fn payment(&self, id: &str) -> Option<Payment> {
        self.store.find_payment(self.country(), id).await
    }

    pub async fn create_payment(&self, mut input: CreatePayment) -> StoreResult<Payment> {
        input.country = Some(self.country());
        self.store.create_payment(input).await
    }

    pub async fn update_payment(&self, id: &str, patch: UpdatePayment) -> StoreResult<Option<Payment>> {
        self.store.update_payment(id, self.country(), patch).await
    }

    pub async fn delete_payment(&self, id: &str) -> StoreResult<bool> {
        self.store.delete_payment(id, self.country()).await
    }

    // Inventory

    pub async fn inventory(&self, filter: &InventoryFilter) -> Vec<InventoryView> {
        self.store.get_inventory_views(self.country(), filter).await
    }

    pub async fn inventory_item(&self, id: &str) -> Option<InventoryItem> {
        self.store.find_inventory_item(self.country(), id).await
    }

    pub async fn create_inventory_item(&self, mut input: CreateInventoryItem) -> StoreResult<InventoryItem> {
        input.country = Some(self.country());
        self.store.create_inventory_item(input).await
    }

    pub async fn update_inventory_item(
        &self,
        id: &str,
        patch: UpdateInventoryItem,
    ) -> StoreResult<Option<InventoryItem>> {
        self.store.update_inventory_item(id, self.country(), patch).await
    }

    pub async fn delete_inventory_item(&self, id: &str) -> StoreResult<bool> {
        self.store.delete_inventory_item(id, self.country()).await
    }

    // Users

    pub async fn users(&self, filter: &UserFilter) -> Vec<User> {
        self.store.get_users(Some(self.country()), filter).await
    }

    pub async fn user(&self, id: &str) -> Option<User> {
        self.store.find_user(self.country(), id).await
    }

    pub async fn create_user(&self, mut input: CreateUser) -> StoreResult<User> {
        input.country = Some(self.country());
        self.store.create_user(input).await
    }

    pub async fn update_user(&self, id: &str, patch: UpdateUser) -> StoreResult<Option<User>> {
        self.store.update_user(id, self.country(), patch).await
    }

    pub async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        self.store.delete_user(id, self.country()).await
    }

    // Aggregates

    pub async fn project_full_expenses(&self, project_id: &str) -> Option<ProjectExpenses> {
        self.store
            .get_project_full_expenses(self.country(), project_id)
            .await
    }

    pub async fn section_full_costs(&self, section_id: &str) -> Option<SectionCosts> {
        self.store.get_section_full_costs(self.country(), section_id).await
    }

    pub async fn dashboard(&self) -> DashboardSummary {
        self.store.get_dashboard(self.country()).await
    }

    pub async fn project_report(&self) -> ProjectReport {
        self.store.get_project_report(self.country()).await
    }

    pub async fn balance_report(&self, as_of: NaiveDate) -> BalanceReport {
        self.store.get_balance_report(self.country(), as_of).await
    }
}
