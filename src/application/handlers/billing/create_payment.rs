//! CreatePaymentHandler - starts a Mini App checkout.

use serde_json::json;
use std::sync::Arc;

use crate::application::handlers::record_activity;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::billing::{BillingError, BillingPolicy, NewPayment, Payment};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{ActivityLog, InvoiceRequest, PaymentGateway, PaymentRepository};

#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct CreatePaymentResult {
    pub payment: Payment,
    pub payment_url: String,
}

/// Creates a pending payment for one period and asks Click for an invoice.
pub struct CreatePaymentHandler {
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    activity: Arc<dyn ActivityLog>,
    policy: BillingPolicy,
}

impl CreatePaymentHandler {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        activity: Arc<dyn ActivityLog>,
        policy: BillingPolicy,
    ) -> Self {
        Self {
            payments,
            gateway,
            activity,
            policy,
        }
    }

    pub async fn handle(&self, cmd: CreatePaymentCommand) -> Result<CreatePaymentResult, BillingError> {
        // 1. Pending payment at the configured price
        let mut payment = self
            .payments
            .create(NewPayment::manual(cmd.user_id, self.policy.monthly_price, Timestamp::now()))
            .await?;

        // 2. Invoice
        let invoice = match self
            .gateway
            .create_invoice(InvoiceRequest {
                payment_id: payment.id,
                amount: payment.amount,
            })
            .await
        {
            Ok(invoice) => invoice,
            Err(err) => {
                tracing::error!(payment_id = %payment.id, error = %err, "invoice creation failed");
                payment.fail(json!({ "invoice_error": err.to_string() }), Timestamp::now())?;
                if let Err(store_err) = self.payments.update(&payment).await {
                    tracing::warn!(payment_id = %payment.id, error = %store_err, "failed to mark payment failed");
                }
                return Err(BillingError::gateway(err.to_string()));
            }
        };

        // 3. Keep the invoice reference on the payment
        payment.metadata = json!({
            "invoice_id": invoice.invoice_id,
            "payment_url": invoice.payment_url,
        });
        payment.updated_at = Timestamp::now();
        self.payments.update(&payment).await?;

        record_activity(
            self.activity.as_ref(),
            UserActivity::new(
                cmd.user_id,
                ActivityKind::PaymentInitiated,
                json!({ "payment_id": payment.id, "amount": payment.amount.to_string() }),
            ),
        )
        .await;

        tracing::info!(payment_id = %payment.id, user_id = %cmd.user_id, "checkout started");
        Ok(CreatePaymentResult {
            payment,
            payment_url: invoice.payment_url,
        })
    }
}
