//! PrepareClickPaymentHandler - first phase of the Click handshake.

use secrecy::SecretString;
use std::sync::Arc;

use super::click_callback::{storage_fault, validate_callback};
use crate::domain::billing::{ClickAction, ClickCallback, ClickErrorCode, ClickResponse};
use crate::domain::foundation::Timestamp;
use crate::ports::PaymentRepository;

/// Answers Click's prepare request.
///
/// On success only Click's transaction id is stored; the payment stays pending
/// until the complete phase.
pub struct PrepareClickPaymentHandler {
    payments: Arc<dyn PaymentRepository>,
    secret_key: SecretString,
}

impl PrepareClickPaymentHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>, secret_key: SecretString) -> Self {
        Self {
            payments,
            secret_key,
        }
    }

    /// Always produces a gateway response; failures become error codes.
    pub async fn handle(&self, callback: ClickCallback) -> ClickResponse {
        match self.prepare(&callback).await {
            Ok(response) => response,
            Err(code) => {
                tracing::info!(
                    merchant_trans_id = %callback.merchant_trans_id,
                    error = code.code(),
                    "click prepare rejected"
                );
                ClickResponse::error(code)
            }
        }
    }

    async fn prepare(&self, callback: &ClickCallback) -> Result<ClickResponse, ClickErrorCode> {
        let payment = validate_callback(
            self.payments.as_ref(),
            callback,
            &self.secret_key,
            ClickAction::Prepare,
        )
        .await?;

        let attached = self
            .payments
            .attach_click_transaction(payment.id, &callback.click_trans_id, Timestamp::now())
            .await
            .map_err(storage_fault)?;
        if !attached {
            return Err(ClickErrorCode::AlreadyPaid);
        }

        tracing::info!(
            payment_id = %payment.id,
            click_trans_id = %callback.click_trans_id,
            "click prepare accepted"
        );
        Ok(ClickResponse::prepared(callback, payment.id))
    }
}
