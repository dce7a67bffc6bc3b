/// Employee model
///
/// Employees are paid either a monthly salary or a daily rate. They are never
/// hard-deleted: deleting an employee flips `active` to false so payment
/// history keeps resolving.
///
/// The legacy employee type `piecework` is read as `daily`; its
/// `pieceworkRate` stands in for `dailyRate` when the latter is missing.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{enum_value, new_id, Country, EntityKind, Filter, Record};
use crate::error::{StoreResult, Violations};

/// Working days assumed per month when estimating a daily worker's cost
pub const WORKING_DAYS_PER_MONTH: u32 = 22;

/// How an employee is paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeType {
    #[default]
    Monthly,
    #[serde(alias = "piecework")]
    Daily,
}

impl EmployeeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeType::Monthly => "monthly",
            EmployeeType::Daily => "daily",
        }
    }
}

/// Stored employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,

    pub country: Country,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,

    #[serde(default)]
    pub employee_type: EmployeeType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_salary: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_rate: Option<Decimal>,

    /// Legacy rate of `piecework` employees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piecework_rate: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Daily rate, falling back to the legacy piecework rate
    pub fn effective_daily_rate(&self) -> Option<Decimal> {
        self.daily_rate.or(self.piecework_rate)
    }

    /// Estimated cost of this employee for one month
    ///
    /// Monthly employees cost their salary; daily employees cost their rate
    /// times [`WORKING_DAYS_PER_MONTH`]. Missing rates count as zero.
    pub fn estimated_monthly_cost(&self) -> Decimal {
        match self.employee_type {
            EmployeeType::Monthly => self.monthly_salary.unwrap_or_default(),
            EmployeeType::Daily => {
                self.effective_daily_rate()
                    .unwrap_or_default()
                    .saturating_mul(Decimal::from(WORKING_DAYS_PER_MONTH))
            }
        }
    }

    /// Keeps exactly one of the two rates, matching the employee type
    fn normalize(&mut self) {
        match self.employee_type {
            EmployeeType::Monthly => {
                self.daily_rate = None;
            }
            EmployeeType::Daily => {
                if self.daily_rate.is_none() {
                    self.daily_rate = self.piecework_rate;
                }
                self.monthly_salary = None;
            }
        }
    }

    fn check_rules(&self) -> StoreResult<()> {
        let mut v = Violations::new();
        v.check(!self.name.trim().is_empty(), "name", "Name is required");
        match self.employee_type {
            EmployeeType::Monthly => match self.monthly_salary {
                None => v.push("monthlySalary", "Monthly employees require a monthly salary"),
                Some(salary) => v.check(
                    salary >= Decimal::ZERO,
                    "monthlySalary",
                    "Monthly salary must not be negative",
                ),
            },
            EmployeeType::Daily => match self.daily_rate {
                None => v.push("dailyRate", "Daily employees require a daily rate"),
                Some(rate) => v.check(
                    rate >= Decimal::ZERO,
                    "dailyRate",
                    "Daily rate must not be negative",
                ),
            },
        }
        v.into_result()
    }
}

impl Record for Employee {
    const KIND: EntityKind = EntityKind::Employee;

    fn id(&self) -> &str {
        &self.id
    }

    fn country(&self) -> Country {
        self.country
    }
}

/// Input for creating an employee
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    #[serde(default)]
    pub country: Option<Country>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    pub position: Option<String>,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,

    pub national_id: Option<String>,

    #[serde(default)]
    pub employee_type: EmployeeType,

    pub monthly_salary: Option<Decimal>,

    pub daily_rate: Option<Decimal>,

    pub piecework_rate: Option<Decimal>,

    pub hire_date: Option<NaiveDate>,

    pub section_id: Option<String>,

    pub project_id: Option<String>,
}

impl CreateEmployee {
    pub(crate) fn into_record(self, country: Country, now: DateTime<Utc>) -> StoreResult<Employee> {
        self.validate()?;

        let mut employee = Employee {
            id: new_id(),
            country,
            name: self.name.trim().to_string(),
            position: self.position,
            phone: self.phone,
            national_id: self.national_id,
            employee_type: self.employee_type,
            monthly_salary: self.monthly_salary,
            daily_rate: self.daily_rate,
            piecework_rate: self.piecework_rate,
            hire_date: self.hire_date,
            active: true,
            section_id: self.section_id,
            project_id: self.project_id,
            created_at: now,
            updated_at: now,
        };
        employee.normalize();
        employee.check_rules()?;
        Ok(employee)
    }
}

/// Partial update for an employee
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    pub position: Option<String>,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,

    pub national_id: Option<String>,

    pub employee_type: Option<EmployeeType>,

    pub monthly_salary: Option<Decimal>,

    pub daily_rate: Option<Decimal>,

    pub hire_date: Option<NaiveDate>,

    /// Re-activates (or deactivates) an employee
    pub active: Option<bool>,

    pub section_id: Option<String>,

    pub project_id: Option<String>,
}

impl UpdateEmployee {
    pub(crate) fn apply(self, employee: &mut Employee, now: DateTime<Utc>) -> StoreResult<()> {
        self.validate()?;

        if let Some(name) = self.name {
            employee.name = name.trim().to_string();
        }
        if self.position.is_some() {
            employee.position = self.position;
        }
        if self.phone.is_some() {
            employee.phone = self.phone;
        }
        if self.national_id.is_some() {
            employee.national_id = self.national_id;
        }
        if let Some(employee_type) = self.employee_type {
            employee.employee_type = employee_type;
        }
        if self.monthly_salary.is_some() {
            employee.monthly_salary = self.monthly_salary;
        }
        if self.daily_rate.is_some() {
            employee.daily_rate = self.daily_rate;
        }
        if self.hire_date.is_some() {
            employee.hire_date = self.hire_date;
        }
        if let Some(active) = self.active {
            employee.active = active;
        }
        if self.section_id.is_some() {
            employee.section_id = self.section_id;
        }
        if self.project_id.is_some() {
            employee.project_id = self.project_id;
        }
        employee.updated_at = now;

        employee.normalize();
        employee.check_rules()
    }
}

/// Query filter for employees
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFilter {
    pub section_id: Option<String>,
    pub project_id: Option<String>,
    pub active: Option<bool>,
    pub employee_type: Option<EmployeeType>,
}

impl EmployeeFilter {
    pub fn active() -> Self {
        Self {
            active: Some(true),
            ..Default::default()
        }
    }

    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt("sectionId", self.section_id.clone())
            .eq_opt("projectId", self.project_id.clone())
            .eq_opt("active", self.active)
            .eq_opt("employeeType", self.employee_type.as_ref().map(enum_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn monthly() -> CreateEmployee {
        CreateEmployee {
            name: "Karim Adel".to_string(),
            employee_type: EmployeeType::Monthly,
            monthly_salary: Some(dec!(6000)),
            ..Default::default()
        }
    }

    fn daily() -> CreateEmployee {
        CreateEmployee {
            name: "Salem Omar".to_string(),
            employee_type: EmployeeType::Daily,
            daily_rate: Some(dec!(100)),
            ..Default::default()
        }
    }

    #[test]
    fn test_piecework_alias_reads_as_daily() {
        let json = serde_json::json!({
            "name": "Legacy worker",
            "employeeType": "piecework",
            "pieceworkRate": 80
        });
        let input: CreateEmployee = serde_json::from_value(json).unwrap();
        assert_eq!(input.employee_type, EmployeeType::Daily);

        let employee = input.into_record(Country::Egypt, Utc::now()).unwrap();
        assert_eq!(employee.daily_rate, Some(dec!(80)));
        assert_eq!(employee.effective_daily_rate(), Some(dec!(80)));
    }

    #[test]
    fn test_monthly_requires_salary() {
        let mut bad = monthly();
        bad.monthly_salary = None;
        assert!(bad.into_record(Country::Egypt, Utc::now()).is_err());
    }

    #[test]
    fn test_daily_requires_rate() {
        let mut bad = daily();
        bad.daily_rate = None;
        assert!(bad.into_record(Country::Egypt, Utc::now()).is_err());
    }

    #[test]
    fn test_rates_are_exclusive() {
        let mut input = monthly();
        input.daily_rate = Some(dec!(50));
        let employee = input.into_record(Country::Egypt, Utc::now()).unwrap();
        assert_eq!(employee.daily_rate, None);
        assert_eq!(employee.monthly_salary, Some(dec!(6000)));
    }

    #[test]
    fn test_new_employee_is_active() {
        let employee = daily().into_record(Country::Libya, Utc::now()).unwrap();
        assert!(employee.active);
    }

    #[test]
    fn test_estimated_monthly_cost() {
        let m = monthly().into_record(Country::Egypt, Utc::now()).unwrap();
        assert_eq!(m.estimated_monthly_cost(), dec!(6000));

        let d = daily().into_record(Country::Egypt, Utc::now()).unwrap();
        assert_eq!(d.estimated_monthly_cost(), dec!(2200));
    }

    #[test]
    fn test_switch_type_on_update() {
        let mut employee = monthly().into_record(Country::Egypt, Utc::now()).unwrap();
        UpdateEmployee {
            employee_type: Some(EmployeeType::Daily),
            daily_rate: Some(dec!(120)),
            ..Default::default()
        }
        .apply(&mut employee, Utc::now())
        .unwrap();

        assert_eq!(employee.employee_type, EmployeeType::Daily);
        assert_eq!(employee.monthly_salary, None);
        assert_eq!(employee.daily_rate, Some(dec!(120)));
    }

    #[test]
    fn test_switch_type_without_rate_fails() {
        let mut employee = monthly().into_record(Country::Egypt, Utc::now()).unwrap();
        let result = UpdateEmployee {
            employee_type: Some(EmployeeType::Daily),
            ..Default::default()
        }
        .apply(&mut employee, Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_active_defaults_true() {
        let json = serde_json::json!({
            "id": "E1",
            "country": "egypt",
            "name": "Old record",
            "employeeType": "monthly",
            "monthlySalary": 100,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        });
        let employee: Employee = serde_json::from_value(json).unwrap();
        assert!(employee.active);
    }
}
