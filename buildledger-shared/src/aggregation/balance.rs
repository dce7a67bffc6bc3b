/// Employee balance
///
/// What an employee has earned against what they have been paid:
///
/// ```text
/// monthly: earned = monthlySalary × max(1, whole months since hire)
/// daily:   earned = dailyRate × Σ workQuantity of daily payments
///
/// paid    = Σ EGP leg + Σ USD leg
/// balance = earned − paid
/// ```
///
/// EGP and USD legs are added at face value; no exchange rate is applied.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::total;
use crate::models::{Employee, EmployeeType, Payment, PaymentType};

/// Point-in-time balance of one employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeBalance {
    pub employee_id: String,

    pub employee_type: EmployeeType,

    pub total_earned: Decimal,

    #[serde(rename = "totalPaidEGP")]
    pub total_paid_egp: Decimal,

    #[serde(rename = "totalPaidUSD")]
    pub total_paid_usd: Decimal,

    pub total_paid: Decimal,

    pub balance: Decimal,

    /// Months counted for monthly employees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months_worked: Option<u32>,

    /// Units worked, for daily employees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_work_quantity: Option<Decimal>,
}

/// Whole calendar months from `hire_date` to `as_of`, at least 1
///
/// A month only counts once its day-of-month has been reached: hired on the
/// 15th, the first month completes on the 15th of the next month. A missing
/// or future hire date counts as one month.
pub fn months_since_hire(hire_date: Option<NaiveDate>, as_of: NaiveDate) -> u32 {
    let Some(hired) = hire_date else {
        return 1;
    };

    let mut months = (as_of.year() - hired.year()) * 12 + as_of.month() as i32
        - hired.month() as i32;
    if as_of.day() < hired.day() {
        months -= 1;
    }
    u32::try_from(months.max(1)).unwrap_or(1)
}

/// Computes the balance of `employee` from its payments
///
/// Payments for other employees are ignored, so callers may pass a wider
/// list.
pub fn compute_balance(employee: &Employee, payments: &[Payment], as_of: NaiveDate) -> EmployeeBalance {
    let own: Vec<&Payment> = payments
        .iter()
        .filter(|p| p.employee_id == employee.id)
        .collect();

    let (total_earned, months_worked, total_work_quantity) = match employee.employee_type {
        EmployeeType::Monthly => {
            let months = months_since_hire(employee.hire_date, as_of);
            let earned = employee
                .monthly_salary
                .unwrap_or_default()
                .saturating_mul(Decimal::from(months));
            (earned, Some(months), None)
        }
        EmployeeType::Daily => {
            let worked = total(
                own.iter()
                    .filter(|p| p.payment_type == PaymentType::Daily)
                    .filter_map(|p| p.work_quantity),
            );
            let earned = employee
                .effective_daily_rate()
                .unwrap_or_default()
                .saturating_mul(worked);
            (earned, None, Some(worked))
        }
    };

    let (total_paid_egp, total_paid_usd) = own.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(egp, usd), payment| {
            let (e, u) = payment.currency_split();
            (egp.saturating_add(e), usd.saturating_add(u))
        },
    );
    let total_paid = total_paid_egp.saturating_add(total_paid_usd);

    EmployeeBalance {
        employee_id: employee.id.clone(),
        employee_type: employee.employee_type,
        total_earned,
        total_paid_egp,
        total_paid_usd,
        total_paid,
        balance: total_earned.saturating_sub(total_paid),
        months_worked,
        total_work_quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Country, Currency};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn employee(employee_type: EmployeeType) -> Employee {
        let now = Utc::now();
        Employee {
            id: "emp-1".to_string(),
            country: Country::Egypt,
            name: "Hassan".to_string(),
            position: None,
            phone: None,
            national_id: None,
            employee_type,
            monthly_salary: None,
            daily_rate: None,
            piecework_rate: None,
            hire_date: None,
            active: true,
            section_id: None,
            project_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn payment(payment_type: PaymentType, currency: Currency, amount: Decimal) -> Payment {
        let now = Utc::now();
        let (amount_egp, amount_usd) = match currency {
            Currency::Egp => (amount, Decimal::ZERO),
            Currency::Usd => (Decimal::ZERO, amount),
            Currency::Split => (Decimal::ZERO, Decimal::ZERO),
        };
        Payment {
            id: crate::models::new_id(),
            country: Country::Egypt,
            employee_id: "emp-1".to_string(),
            payment_type,
            currency,
            amount,
            amount_egp,
            amount_usd,
            project_id: None,
            section_id: None,
            work_quantity: None,
            work_unit: None,
            daily_rate: None,
            date: now.date_naive(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_months_since_hire_counts_whole_months() {
        let hired = Some(date(2025, 1, 15));
        assert_eq!(months_since_hire(hired, date(2025, 4, 14)), 2);
        assert_eq!(months_since_hire(hired, date(2025, 4, 15)), 3);
        assert_eq!(months_since_hire(hired, date(2026, 1, 15)), 12);
    }

    #[test]
    fn test_months_since_hire_minimum_one() {
        assert_eq!(months_since_hire(None, date(2025, 1, 1)), 1);
        assert_eq!(months_since_hire(Some(date(2025, 3, 10)), date(2025, 3, 20)), 1);
        assert_eq!(months_since_hire(Some(date(2026, 1, 1)), date(2025, 1, 1)), 1);
    }

    #[test]
    fn test_daily_balance() {
        let mut worker = employee(EmployeeType::Daily);
        worker.daily_rate = Some(dec!(100));

        let mut day1 = payment(PaymentType::Daily, Currency::Egp, Decimal::ZERO);
        day1.work_quantity = Some(dec!(3));
        let mut day2 = payment(PaymentType::Daily, Currency::Egp, Decimal::ZERO);
        day2.work_quantity = Some(dec!(2));
        let cash = payment(PaymentType::Advance, Currency::Egp, dec!(200));

        let balance = compute_balance(&worker, &[day1, day2, cash], date(2025, 6, 1));
        assert_eq!(balance.total_earned, dec!(500));
        assert_eq!(balance.total_paid, dec!(200));
        assert_eq!(balance.balance, dec!(300));
        assert_eq!(balance.total_work_quantity, Some(dec!(5)));
        assert_eq!(balance.months_worked, None);
    }

    #[test]
    fn test_monthly_balance() {
        let mut engineer = employee(EmployeeType::Monthly);
        engineer.monthly_salary = Some(dec!(8000));
        engineer.hire_date = Some(date(2025, 1, 1));

        let salary = payment(PaymentType::Salary, Currency::Egp, dec!(8000));
        let balance = compute_balance(&engineer, &[salary], date(2025, 4, 1));
        assert_eq!(balance.months_worked, Some(3));
        assert_eq!(balance.total_earned, dec!(24000));
        assert_eq!(balance.balance, dec!(16000));
    }

    #[test]
    fn test_split_and_usd_payments_counted_per_currency() {
        let mut engineer = employee(EmployeeType::Monthly);
        engineer.monthly_salary = Some(dec!(1000));

        let mut split = payment(PaymentType::Salary, Currency::Split, dec!(150));
        split.amount_egp = dec!(100);
        split.amount_usd = dec!(50);
        let usd = payment(PaymentType::Loan, Currency::Usd, dec!(20));

        let balance = compute_balance(&engineer, &[split, usd], date(2025, 1, 1));
        assert_eq!(balance.total_paid_egp, dec!(100));
        assert_eq!(balance.total_paid_usd, dec!(70));
        assert_eq!(balance.total_paid, dec!(170));
    }

    #[test]
    fn test_oversized_payments_saturate() {
        let mut engineer = employee(EmployeeType::Monthly);
        engineer.monthly_salary = Some(Decimal::MAX);
        engineer.hire_date = Some(date(2024, 1, 1));

        let first = payment(PaymentType::Salary, Currency::Egp, Decimal::MAX);
        let second = payment(PaymentType::Salary, Currency::Usd, Decimal::MAX);
        let balance = compute_balance(&engineer, &[first, second], date(2025, 1, 1));

        assert_eq!(balance.total_earned, Decimal::MAX);
        assert_eq!(balance.total_paid, Decimal::MAX);
        assert_eq!(balance.balance, Decimal::ZERO);
    }

    #[test]
    fn test_other_employees_payments_ignored() {
        let mut engineer = employee(EmployeeType::Monthly);
        engineer.monthly_salary = Some(dec!(1000));

        let mut foreign = payment(PaymentType::Salary, Currency::Egp, dec!(999));
        foreign.employee_id = "emp-2".to_string();

        let balance = compute_balance(&engineer, &[foreign], date(2025, 1, 1));
        assert_eq!(balance.total_paid, Decimal::ZERO);
        assert_eq!(balance.balance, dec!(1000));
    }

    #[test]
    fn test_serialises_currency_totals_in_upper_case() {
        let balance = compute_balance(&employee(EmployeeType::Monthly), &[], date(2025, 1, 1));
        let json = serde_json::to_value(&balance).unwrap();
        assert!(json.get("totalPaidEGP").is_some());
        assert!(json.get("totalPaidUSD").is_some());
        assert_eq!(json["employeeType"], "monthly");
    }
}
