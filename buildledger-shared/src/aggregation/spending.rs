/// Spendings synthesised from other records
///
/// A payment or inventory item created against a project also counts as money
/// spent on that project. These functions build the matching spending input;
/// the store writes it right after the originating record. Derivation happens
/// once, at creation; later edits of the origin do not touch the spending.

use rust_decimal::Decimal;

use crate::models::{
    CreateSpending, Employee, InventoryItem, Payment, PaymentType, SpendingCategory, SpendingSource,
};

/// Spending for a newly created payment
///
/// `None` unless the payment is linked to a project and its amount is
/// positive. Salary and daily payments are `labor`; the rest are `other`.
pub fn spending_for_payment(payment: &Payment, employee: &Employee) -> Option<CreateSpending> {
    let project_id = payment.project_id.as_ref().filter(|id| !id.trim().is_empty())?;
    if payment.amount <= Decimal::ZERO {
        return None;
    }

    let mut description = format!("{} payment - {}", payment.payment_type.label(), employee.name);
    if payment.payment_type == PaymentType::Daily {
        if let Some(quantity) = payment.work_quantity {
            description.push_str(&quantity_suffix(quantity, payment.work_unit.as_deref()));
        }
    }

    Some(CreateSpending {
        country: Some(payment.country),
        project_id: project_id.clone(),
        section_id: payment.section_id.clone(),
        amount: payment.amount,
        category: payment.payment_type.spending_category(),
        description,
        date: Some(payment.date),
        source_type: Some(SpendingSource::Payment),
        source_id: Some(payment.id.clone()),
        created_by: None,
    })
}

/// Spending for a newly created inventory item
///
/// `None` unless the item is linked to a project and its total value is
/// positive. Always `materials`.
pub fn spending_for_inventory(item: &InventoryItem) -> Option<CreateSpending> {
    let project_id = item.project_id.as_ref().filter(|id| !id.trim().is_empty())?;
    if item.total_value <= Decimal::ZERO {
        return None;
    }

    let description = format!(
        "Inventory purchase - {}{}",
        item.name,
        quantity_suffix(item.quantity, item.unit.as_deref())
    );

    Some(CreateSpending {
        country: Some(item.country),
        project_id: project_id.clone(),
        section_id: item.section_id.clone(),
        amount: item.total_value,
        category: SpendingCategory::Materials,
        description,
        date: Some(item.created_at.date_naive()),
        source_type: Some(SpendingSource::Inventory),
        source_id: Some(item.id.clone()),
        created_by: None,
    })
}

fn quantity_suffix(quantity: Decimal, unit: Option<&str>) -> String {
    match unit.map(str::trim).filter(|u| !u.is_empty()) {
        Some(unit) => format!(" ({} {})", quantity.normalize(), unit),
        None => format!(" ({})", quantity.normalize()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Country, CreateInventoryItem, CreatePayment, CreateEmployee, Currency, EmployeeType};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn worker() -> Employee {
        CreateEmployee {
            name: "Mahmoud Ali".to_string(),
            employee_type: EmployeeType::Daily,
            daily_rate: Some(dec!(100)),
            ..Default::default()
        }
        .into_record(Country::Egypt, Utc::now())
        .unwrap()
    }

    fn payment(payment_type: PaymentType, amount: Decimal, project: Option<&str>) -> Payment {
        let mut input = CreatePayment::new("emp-1", payment_type, Currency::Egp);
        input.amount = Some(amount);
        input.project_id = project.map(str::to_string);
        input.into_record(Country::Egypt, Utc::now()).unwrap()
    }

    #[test]
    fn test_salary_payment_becomes_labor() {
        let payment = payment(PaymentType::Salary, dec!(500), Some("P1"));
        let spending = spending_for_payment(&payment, &worker()).unwrap();

        assert_eq!(spending.category, SpendingCategory::Labor);
        assert_eq!(spending.project_id, "P1");
        assert_eq!(spending.amount, dec!(500));
        assert_eq!(spending.country, Some(Country::Egypt));
        assert_eq!(spending.description, "Salary payment - Mahmoud Ali");
        assert_eq!(spending.source_type, Some(SpendingSource::Payment));
        assert_eq!(spending.source_id.as_deref(), Some(payment.id.as_str()));
    }

    #[test]
    fn test_advance_payment_becomes_other() {
        let payment = payment(PaymentType::Advance, dec!(50), Some("P1"));
        let spending = spending_for_payment(&payment, &worker()).unwrap();
        assert_eq!(spending.category, SpendingCategory::Other);
        assert_eq!(spending.description, "Advance payment - Mahmoud Ali");
    }

    #[test]
    fn test_daily_payment_description_carries_quantity() {
        let mut input = CreatePayment::new("emp-1", PaymentType::Daily, Currency::Egp);
        input.amount = Some(dec!(300));
        input.work_quantity = Some(dec!(3));
        input.work_unit = Some("days".to_string());
        input.project_id = Some("P1".to_string());
        let payment = input.into_record(Country::Egypt, Utc::now()).unwrap();

        let spending = spending_for_payment(&payment, &worker()).unwrap();
        assert_eq!(spending.category, SpendingCategory::Labor);
        assert_eq!(spending.description, "Daily wage payment - Mahmoud Ali (3 days)");
    }

    #[test]
    fn test_payment_without_project_or_amount_derives_nothing() {
        assert!(spending_for_payment(&payment(PaymentType::Salary, dec!(500), None), &worker()).is_none());
        assert!(spending_for_payment(&payment(PaymentType::Salary, Decimal::ZERO, Some("P1")), &worker()).is_none());
    }

    #[test]
    fn test_inventory_becomes_materials() {
        let item = CreateInventoryItem {
            name: "Cement".to_string(),
            unit: Some("bags".to_string()),
            quantity: dec!(10),
            unit_price: dec!(5),
            project_id: Some("P1".to_string()),
            ..Default::default()
        }
        .into_record(Country::Libya, Utc::now())
        .unwrap();

        let spending = spending_for_inventory(&item).unwrap();
        assert_eq!(spending.category, SpendingCategory::Materials);
        assert_eq!(spending.amount, dec!(50));
        assert_eq!(spending.country, Some(Country::Libya));
        assert_eq!(spending.description, "Inventory purchase - Cement (10 bags)");
        assert_eq!(spending.source_type, Some(SpendingSource::Inventory));
    }

    #[test]
    fn test_unpriced_inventory_derives_nothing() {
        let item = CreateInventoryItem {
            name: "Gloves".to_string(),
            quantity: dec!(10),
            project_id: Some("P1".to_string()),
            ..Default::default()
        }
        .into_record(Country::Egypt, Utc::now())
        .unwrap();
        assert!(spending_for_inventory(&item).is_none());
    }
}
