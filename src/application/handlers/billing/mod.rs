//! Billing handlers - Click callbacks, checkout, stored cards, subscription
//! management and the renewal jobs.

mod click_callback;
mod complete_click_payment;
mod create_payment;
mod deactivate_expired;
mod get_subscription;
mod manage_subscription;
mod payment_history;
mod payment_methods;
mod prepare_click_payment;
mod process_auto_renewals;
mod send_expiry_reminders;

pub use complete_click_payment::CompleteClickPaymentHandler;
pub use create_payment::{CreatePaymentCommand, CreatePaymentHandler, CreatePaymentResult};
pub use deactivate_expired::{DeactivateExpiredCommand, DeactivateExpiredHandler};
pub use get_subscription::{GetSubscriptionHandler, GetSubscriptionQuery, SubscriptionOverview};
pub use manage_subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, SetAutoRenewCommand, SetAutoRenewHandler,
};
pub use payment_history::{PaymentHistoryHandler, PaymentHistoryQuery};
pub use payment_methods::{RemoveCardCommand, RemoveCardHandler, SaveCardCommand, SaveCardHandler};
pub use prepare_click_payment::PrepareClickPaymentHandler;
pub use process_auto_renewals::{
    ProcessAutoRenewalsCommand, ProcessAutoRenewalsHandler, RenewalReport,
};
pub use send_expiry_reminders::{SendExpiryRemindersCommand, SendExpiryRemindersHandler};

use crate::application::handlers::notify;
use crate::domain::foundation::UserId;
use crate::ports::{Notifier, OutgoingMessage, ProfileRepository};

/// Sends an HTML notice to the user's Telegram chat.
///
/// Lookup and delivery problems are logged; billing never fails because a
/// message could not be sent.
pub(crate) async fn notify_user(
    profiles: &dyn ProfileRepository,
    notifier: &dyn Notifier,
    user_id: UserId,
    text: String,
) {
    match profiles.find_by_id(user_id).await {
        Ok(Some(profile)) => {
            notify(notifier, profile.telegram_id, OutgoingMessage::html(text)).await;
        }
        Ok(None) => tracing::warn!(user_id = %user_id, "no profile to notify"),
        Err(err) => tracing::warn!(user_id = %user_id, error = %err, "profile lookup for notice failed"),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for billing handler tests.

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::{Arc, Mutex};

    use crate::adapters::memory::{
        InMemoryActivityLog, InMemoryPaymentMethodRepository, InMemoryPaymentRepository,
        InMemoryProfileRepository, InMemorySubscriptionRepository, RecordingNotifier,
    };
    use crate::domain::billing::{compute_sign, ClickCallback};
    use crate::domain::foundation::{TelegramId, UserId};
    use crate::domain::profile::NewUserProfile;
    use crate::ports::{
        ChargeOutcome, ChargeRequest, Invoice, InvoiceRequest, PaymentError, PaymentGateway,
        ProfileRepository,
    };

    pub const SECRET: &str = "click-secret";
    pub const SERVICE_ID: &str = "30001";

    pub struct BillingFixture {
        pub profiles: Arc<InMemoryProfileRepository>,
        pub subscriptions: Arc<InMemorySubscriptionRepository>,
        pub payments: Arc<InMemoryPaymentRepository>,
        pub methods: Arc<InMemoryPaymentMethodRepository>,
        pub activity: Arc<InMemoryActivityLog>,
        pub notifier: Arc<RecordingNotifier>,
    }

    impl BillingFixture {
        pub fn new() -> Self {
            Self {
                profiles: Arc::new(InMemoryProfileRepository::new()),
                subscriptions: Arc::new(InMemorySubscriptionRepository::new()),
                payments: Arc::new(InMemoryPaymentRepository::new()),
                methods: Arc::new(InMemoryPaymentMethodRepository::new()),
                activity: Arc::new(InMemoryActivityLog::new()),
                notifier: Arc::new(RecordingNotifier::new()),
            }
        }

        /// Creates a profile and returns its user id and chat id.
        pub async fn user(&self, telegram_id: i64) -> (UserId, TelegramId) {
            let chat = TelegramId::new(telegram_id).unwrap();
            let profile = self
                .profiles
                .create(NewUserProfile::new(chat, None, None))
                .await
                .unwrap();
            (profile.id, chat)
        }
    }

    /// A correctly signed callback.
    pub fn callback(payment_id: i64, amount: &str, action: &str, error: &str) -> ClickCallback {
        let click_trans_id = format!("ct-{}", payment_id);
        let merchant_trans_id = payment_id.to_string();
        let sign_time = "2024-05-20 10:00:00";
        ClickCallback {
            sign_string: compute_sign(
                &click_trans_id,
                SERVICE_ID,
                SECRET,
                &merchant_trans_id,
                amount,
                action,
                sign_time,
            ),
            click_trans_id,
            service_id: SERVICE_ID.to_string(),
            click_paydoc_id: Some("9001".to_string()),
            merchant_trans_id,
            merchant_prepare_id: None,
            amount: amount.to_string(),
            action: action.to_string(),
            error: Some(error.to_string()),
            error_note: None,
            sign_time: sign_time.to_string(),
        }
    }

    pub fn price() -> Decimal {
        Decimal::new(6_700_000, 2)
    }

    /// Gateway double that answers every charge the same way.
    pub struct StubGateway {
        pub approve: bool,
        pub unreachable: bool,
        pub charges: Mutex<Vec<ChargeRequest>>,
    }

    impl StubGateway {
        pub fn approving() -> Self {
            Self {
                approve: true,
                unreachable: false,
                charges: Mutex::new(Vec::new()),
            }
        }

        pub fn declining() -> Self {
            Self {
                approve: false,
                ..Self::approving()
            }
        }

        pub fn unreachable() -> Self {
            Self {
                unreachable: true,
                ..Self::approving()
            }
        }

        pub fn charges(&self) -> Vec<ChargeRequest> {
            self.charges.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn create_invoice(&self, request: InvoiceRequest) -> Result<Invoice, PaymentError> {
            if self.unreachable {
                return Err(PaymentError::network("connection refused"));
            }
            Ok(Invoice {
                invoice_id: Some(format!("inv-{}", request.payment_id)),
                payment_url: format!("https://pay.example/{}", request.payment_id),
            })
        }

        async fn charge_card(&self, request: ChargeRequest) -> Result<ChargeOutcome, PaymentError> {
            if self.unreachable {
                return Err(PaymentError::network("connection refused"));
            }
            let id = request.payment_id;
            self.charges.lock().unwrap().push(request);
            Ok(ChargeOutcome {
                approved: self.approve,
                click_trans_id: self.approve.then(|| format!("auto-{}", id)),
                error_code: if self.approve { 0 } else { -5017 },
                error_note: if self.approve { "Success" } else { "Insufficient funds" }.to_string(),
                raw: serde_json::json!({"payment_id": id.as_i64()}),
            })
        }
    }
}
