//! Payment entity and its status machine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    PaymentId, StateMachine, SubscriptionId, Timestamp, UserId, ValidationError,
};

/// Payment lifecycle.
///
/// ```text
/// Pending ──► Completed
///    │
///    └──────► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown payment status '{}'", other),
            )),
        }
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            PaymentStatus::Pending => vec![PaymentStatus::Completed, PaymentStatus::Failed],
            PaymentStatus::Completed | PaymentStatus::Failed => vec![],
        }
    }
}

/// One attempted charge.
///
/// The numeric `id` doubles as the merchant transaction id exchanged with Click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    pub subscription_id: Option<SubscriptionId>,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub click_trans_id: Option<String>,
    pub transaction_id: Option<String>,
    pub is_auto_payment: bool,
    pub auto_payment_attempt: i32,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// Insert data for a pending payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub user_id: UserId,
    pub subscription_id: Option<SubscriptionId>,
    pub amount: Decimal,
    pub is_auto_payment: bool,
    pub auto_payment_attempt: i32,
    pub created_at: Timestamp,
}

impl NewPayment {
    /// Payment started by the user from the Mini App.
    pub fn manual(user_id: UserId, amount: Decimal, now: Timestamp) -> Self {
        Self {
            user_id,
            subscription_id: None,
            amount,
            is_auto_payment: false,
            auto_payment_attempt: 0,
            created_at: now,
        }
    }

    /// Charge against a stored card for an existing subscription.
    pub fn automatic(
        user_id: UserId,
        subscription_id: SubscriptionId,
        amount: Decimal,
        attempt: i32,
        now: Timestamp,
    ) -> Self {
        Self {
            user_id,
            subscription_id: Some(subscription_id),
            amount,
            is_auto_payment: true,
            auto_payment_attempt: attempt,
            created_at: now,
        }
    }

    pub fn into_payment(self, id: PaymentId) -> Payment {
        Payment {
            id,
            user_id: self.user_id,
            subscription_id: self.subscription_id,
            amount: self.amount,
            status: PaymentStatus::Pending,
            click_trans_id: None,
            transaction_id: None,
            is_auto_payment: self.is_auto_payment,
            auto_payment_attempt: self.auto_payment_attempt,
            metadata: serde_json::Value::Object(Default::default()),
            created_at: self.created_at,
            updated_at: self.created_at,
            completed_at: None,
        }
    }
}

impl Payment {
    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pending
    }

    /// Exact decimal comparison; scale is ignored so `67000` equals `67000.00`.
    pub fn amount_matches(&self, amount: Decimal) -> bool {
        self.amount == amount
    }

    pub fn complete(
        &mut self,
        transaction_id: Option<String>,
        metadata: serde_json::Value,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(PaymentStatus::Completed)?;
        if transaction_id.is_some() {
            self.transaction_id = transaction_id;
        }
        self.metadata = metadata;
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn fail(&mut self, metadata: serde_json::Value, now: Timestamp) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(PaymentStatus::Failed)?;
        self.metadata = metadata;
        self.updated_at = now;
        Ok(())
    }

    pub fn link_subscription(&mut self, subscription_id: SubscriptionId) {
        self.subscription_id = Some(subscription_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pending() -> Payment {
        NewPayment::manual(UserId::new(1), Decimal::new(6_700_000, 2), Timestamp::now())
            .into_payment(PaymentId::new(10))
    }

    #[test]
    fn pending_payment_completes_once() {
        let mut payment = pending();
        payment
            .complete(Some("555".to_string()), json!({"click_trans_id": "555"}), Timestamp::now())
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.transaction_id.as_deref(), Some("555"));
        assert!(payment.completed_at.is_some());

        let before = payment.clone();
        assert!(payment.fail(json!({}), Timestamp::now()).is_err());
        assert_eq!(payment, before);
    }

    #[test]
    fn failed_payment_is_terminal() {
        let mut payment = pending();
        payment.fail(json!({"error": "-5017"}), Timestamp::now()).unwrap();
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(payment.complete(None, json!({}), Timestamp::now()).is_err());
        assert_eq!(payment.status, PaymentStatus::Failed);
    }

    #[test]
    fn amount_comparison_ignores_scale() {
        let payment = pending();
        assert!(payment.amount_matches(Decimal::from(67_000)));
        assert!(!payment.amount_matches(Decimal::from(50_000)));
        assert!(!payment.amount_matches(Decimal::new(6_700_001, 2)));
    }

    #[test]
    fn status_parses_from_storage() {
        assert_eq!("completed".parse::<PaymentStatus>().unwrap(), PaymentStatus::Completed);
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }
}
