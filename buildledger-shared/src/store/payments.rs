use chrono::Utc;
use tracing::{error, info};

use super::{require_partition, Store};
use crate::aggregation::spending::spending_for_payment;
use crate::error::{StoreError, StoreResult};
use crate::models::{Country, CreatePayment, EntityKind, Payment, PaymentFilter, UpdatePayment};

impl Store {
    pub async fn get_payments(&self, country: Country, filter: &PaymentFilter) -> Vec<Payment> {
        self.collection::<Payment>()
            .list(Some(country), &filter.to_filter())
            .await
    }

    pub async fn find_payment(&self, country: Country, id: &str) -> Option<Payment> {
        self.collection::<Payment>().find(Some(country), id).await
    }

    /// Creates a payment for an employee of the same country
    ///
    /// A payment linked to a project with a positive amount also produces one
    /// spending for that project (`labor` for salary and daily payments,
    /// `other` otherwise). If that spending cannot be written the error is
    /// returned; the payment itself is already stored.
    ///
    /// # Errors
    ///
    /// `Validation` when the employee does not exist in the payment's country
    /// or the amounts are inconsistent.
    pub async fn create_payment(&self, input: CreatePayment) -> StoreResult<Payment> {
        let country = require_partition(EntityKind::Payment, input.country)?;

        let employee = self
            .find_employee(country, &input.employee_id)
            .await
            .ok_or_else(|| StoreError::validation("employeeId", "Employee not found"))?;

        let payment = input.into_record(country, Utc::now())?;

        self.collection::<Payment>().insert(&payment).await?;
        info!(
            kind = "payments",
            country = %country,
            id = %payment.id,
            employee_id = %payment.employee_id,
            payment_type = payment.payment_type.as_str(),
            currency = payment.currency.as_str(),
            amount = %payment.amount,
            "Record created"
        );

        if let Some(spending) = spending_for_payment(&payment, &employee) {
            if let Err(e) = self.create_spending(spending).await {
                error!(
                    country = %country,
                    payment_id = %payment.id,
                    error = %e,
                    "Failed to record spending for payment"
                );
                return Err(e);
            }
        }

        Ok(payment)
    }

    /// Merges `patch` and re-derives the amounts
    ///
    /// Spendings derived when the payment was created are left as they are.
    pub async fn update_payment(
        &self,
        id: &str,
        country: Country,
        patch: UpdatePayment,
    ) -> StoreResult<Option<Payment>> {
        let now = Utc::now();
        let updated = self
            .collection::<Payment>()
            .modify(country, id, |payment| patch.apply(payment, now))
            .await?;

        if updated.is_some() {
            info!(kind = "payments", country = %country, id = %id, "Record updated");
        }
        Ok(updated)
    }

    pub async fn delete_payment(&self, id: &str, country: Country) -> StoreResult<bool> {
        let removed = self.collection::<Payment>().remove(country, id).await?;
        if removed {
            info!(kind = "payments", country = %country, id = %id, "Record deleted");
        }
        Ok(removed)
    }
}
