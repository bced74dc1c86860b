//! PaymentHistoryHandler - the user's payments, newest first.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Payment};
use crate::domain::foundation::UserId;
use crate::ports::PaymentRepository;

#[derive(Debug, Clone)]
pub struct PaymentHistoryQuery {
    pub user_id: UserId,
}

pub struct PaymentHistoryHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl PaymentHistoryHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    pub async fn handle(&self, query: PaymentHistoryQuery) -> Result<Vec<Payment>, BillingError> {
        Ok(self.payments.list_by_user(query.user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{price, BillingFixture};
    use super::*;
    use crate::domain::billing::NewPayment;
    use crate::domain::foundation::Timestamp;

    #[tokio::test]
    async fn lists_only_own_payments_newest_first() {
        let fixture = BillingFixture::new();
        let (me, _) = fixture.user(1).await;
        let (other, _) = fixture.user(2).await;
        let now = Timestamp::now();
        let older = fixture
            .payments
            .create(NewPayment::manual(me, price(), now.add_days(-1)))
            .await
            .unwrap();
        let newer = fixture
            .payments
            .create(NewPayment::manual(me, price(), now))
            .await
            .unwrap();
        fixture
            .payments
            .create(NewPayment::manual(other, price(), now))
            .await
            .unwrap();

        let history = PaymentHistoryHandler::new(fixture.payments.clone())
            .handle(PaymentHistoryQuery { user_id: me })
            .await
            .unwrap();

        let ids: Vec<_> = history.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }
}
