/// Derived financial views
///
/// Everything here is a pure function over already loaded records. The store
/// loads the inputs (see `store::aggregates`) and nothing computed here is
/// ever persisted, so a value is always recomputed from current records.
///
/// # Modules
///
/// - `balance`: Earned vs paid per employee
/// - `spending`: Spendings synthesised from payments and inventory purchases
/// - `rollup`: Full expenses of a project or section
/// - `dashboard`: Per-country dashboard and reports
/// - `views`: Records enriched with related names
///
/// Missing related records never fail a computation; they only leave names
/// empty or exclude the dangling row from a join.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Country, Employee, InventoryItem, Payment, Project, Section, Spending};

pub mod balance;
pub mod dashboard;
pub mod rollup;
pub mod spending;
pub mod views;

pub use balance::{compute_balance, months_since_hire, EmployeeBalance};
pub use dashboard::{
    BalanceReport, BalanceReportRow, DashboardSummary, LowStockItem, PaymentTotals, ProjectReport,
    ProjectReportRow,
};
pub use rollup::{ProjectExpenses, SectionCosts};
pub use views::{EmployeeView, InventoryView, Lookups, PaymentView, SectionView, SpendingView};

/// Every partitioned record of one country, loaded together
///
/// Reads are independent, so a write landing between them can make one
/// derived value slightly stale until the next read.
#[derive(Debug, Clone)]
pub struct CountrySnapshot {
    pub country: Country,
    pub projects: Vec<Project>,
    pub sections: Vec<Section>,
    pub spendings: Vec<Spending>,
    pub employees: Vec<Employee>,
    pub payments: Vec<Payment>,
    pub inventory: Vec<InventoryItem>,
}

impl CountrySnapshot {
    pub fn empty(country: Country) -> Self {
        Self {
            country,
            projects: Vec::new(),
            sections: Vec::new(),
            spendings: Vec::new(),
            employees: Vec::new(),
            payments: Vec::new(),
            inventory: Vec::new(),
        }
    }
}

/// `part / whole × 100` rounded to two places, 0 when `whole` is 0
///
/// Saturates at the `Decimal` bounds when the ratio is not representable.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    match part
        .checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    {
        Some(percent) => {
            percent.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        }
        None if part.is_sign_negative() != whole.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Saturating sum of money values
///
/// Stored amounts are only bounded individually, so a column total may not
/// fit in a `Decimal`.
pub fn total(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |sum, value| sum.saturating_add(value))
}
