//! Checks shared by the Click prepare and complete phases.

use secrecy::{ExposeSecret, SecretString};

use crate::domain::billing::{ClickAction, ClickCallback, ClickErrorCode, Payment, PaymentStatus};
use crate::domain::foundation::DomainError;
use crate::ports::PaymentRepository;

/// Runs the checks in the order Click expects and returns the pending payment.
///
/// Nothing is written here, so every rejection leaves state untouched.
pub(crate) async fn validate_callback(
    payments: &dyn PaymentRepository,
    callback: &ClickCallback,
    secret_key: &SecretString,
    expected_action: ClickAction,
) -> Result<Payment, ClickErrorCode> {
    // 1. Sign
    if !callback.verify_sign(secret_key.expose_secret()) {
        tracing::warn!(
            click_trans_id = %callback.click_trans_id,
            merchant_trans_id = %callback.merchant_trans_id,
            "click sign check failed"
        );
        return Err(ClickErrorCode::SignCheckFailed);
    }

    // 2. Phase
    if callback.action() != Some(expected_action) {
        return Err(ClickErrorCode::ActionNotFound);
    }

    // 3. Payment lookup
    let payment_id = callback.payment_id().ok_or(ClickErrorCode::PaymentNotFound)?;
    let payment = payments
        .find_by_id(payment_id)
        .await
        .map_err(storage_fault)?
        .ok_or(ClickErrorCode::PaymentNotFound)?;

    // 4. Terminal states
    match payment.status {
        PaymentStatus::Completed => return Err(ClickErrorCode::AlreadyPaid),
        PaymentStatus::Failed => return Err(ClickErrorCode::TransactionCancelled),
        PaymentStatus::Pending => {}
    }

    // 5. Exact amount
    let amount = callback.amount().ok_or(ClickErrorCode::IncorrectAmount)?;
    if !payment.amount_matches(amount) {
        tracing::warn!(
            payment_id = %payment.id,
            expected = %payment.amount,
            received = %callback.amount,
            "click amount mismatch"
        );
        return Err(ClickErrorCode::IncorrectAmount);
    }

    Ok(payment)
}

/// Storage failures surface to Click as a request error.
pub(crate) fn storage_fault(err: DomainError) -> ClickErrorCode {
    tracing::error!(error = %err, "storage failure while handling click callback");
    ClickErrorCode::BadRequest
}
