use chrono::Utc;
use tracing::info;

use super::{require_partition, Store};
use crate::error::StoreResult;
use crate::models::{
    Country, CreateEmployee, Employee, EmployeeFilter, EntityKind, UpdateEmployee,
};

impl Store {
    /// Lists employees, inactive ones included unless the filter says otherwise
    pub async fn get_employees(&self, country: Country, filter: &EmployeeFilter) -> Vec<Employee> {
        self.collection::<Employee>()
            .list(Some(country), &filter.to_filter())
            .await
    }

    pub async fn find_employee(&self, country: Country, id: &str) -> Option<Employee> {
        self.collection::<Employee>().find(Some(country), id).await
    }

    pub async fn create_employee(&self, input: CreateEmployee) -> StoreResult<Employee> {
        let country = require_partition(EntityKind::Employee, input.country)?;
        let employee = input.into_record(country, Utc::now())?;

        self.collection::<Employee>().insert(&employee).await?;
        info!(
            kind = "employees",
            country = %country,
            id = %employee.id,
            employee_type = employee.employee_type.as_str(),
            "Record created"
        );
        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        id: &str,
        country: Country,
        patch: UpdateEmployee,
    ) -> StoreResult<Option<Employee>> {
        let now = Utc::now();
        let updated = self
            .collection::<Employee>()
            .modify(country, id, |employee| patch.apply(employee, now))
            .await?;

        if updated.is_some() {
            info!(kind = "employees", country = %country, id = %id, "Record updated");
        }
        Ok(updated)
    }

    /// Soft-deletes an employee by setting `active = false`
    ///
    /// The record stays retrievable by id so payment history keeps its name.
    pub async fn delete_employee(&self, id: &str, country: Country) -> StoreResult<bool> {
        let now = Utc::now();
        let deactivated = self
            .collection::<Employee>()
            .modify(country, id, |employee| {
                employee.active = false;
                employee.updated_at = now;
                Ok(())
            })
            .await?;

        if deactivated.is_some() {
            info!(kind = "employees", country = %country, id = %id, "Record deactivated");
        }
        Ok(deactivated.is_some())
    }
}
