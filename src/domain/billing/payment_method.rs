//! Stored card token used for automatic renewals.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PaymentMethodId, Timestamp, UserId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub user_id: UserId,
    #[serde(skip_serializing)]
    pub card_token: String,
    pub card_last_four: String,
    pub card_type: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Card details posted after Click tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub card_token: String,
    pub card_last_four: String,
    pub card_type: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
}

impl CardDetails {
    /// Validates the posted card. `card_number` may be a masked PAN; only its
    /// last four characters are kept.
    pub fn new(
        card_token: &str,
        card_number: &str,
        card_type: &str,
        expiry_month: u32,
        expiry_year: i32,
    ) -> Result<Self, ValidationError> {
        let card_token = card_token.trim();
        if card_token.is_empty() {
            return Err(ValidationError::empty_field("card_token"));
        }
        let chars: Vec<char> = card_number.trim().chars().collect();
        if chars.is_empty() {
            return Err(ValidationError::empty_field("card_number"));
        }
        let last_four: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        if !(1..=12).contains(&expiry_month) {
            return Err(ValidationError::out_of_range(
                "expiry_month",
                1,
                12,
                i64::from(expiry_month),
            ));
        }
        if !(2000..=2100).contains(&expiry_year) {
            return Err(ValidationError::out_of_range(
                "expiry_year",
                2000,
                2100,
                i64::from(expiry_year),
            ));
        }
        let card_type = card_type.trim().to_lowercase();
        Ok(Self {
            card_token: card_token.to_string(),
            card_last_four: last_four,
            card_type: if card_type.is_empty() {
                "uzcard".to_string()
            } else {
                card_type
            },
            expiry_month,
            expiry_year,
        })
    }

    /// A card expiring this month is still usable.
    pub fn is_expired_at(expiry_month: u32, expiry_year: i32, now: Timestamp) -> bool {
        let (year, month) = now.year_month();
        (expiry_year, expiry_month) < (year, month)
    }

    pub fn into_method(self, id: PaymentMethodId, user_id: UserId, now: Timestamp) -> PaymentMethod {
        PaymentMethod {
            id,
            user_id,
            card_token: self.card_token,
            card_last_four: self.card_last_four,
            card_type: self.card_type,
            expiry_month: self.expiry_month,
            expiry_year: self.expiry_year,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl PaymentMethod {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        CardDetails::is_expired_at(self.expiry_month, self.expiry_year, now)
    }

    pub fn is_usable(&self, now: Timestamp) -> bool {
        self.is_active && !self.is_expired(now)
    }

    /// Replaces the stored card and reactivates it.
    pub fn replace(&mut self, card: CardDetails, now: Timestamp) {
        self.card_token = card.card_token;
        self.card_last_four = card.card_last_four;
        self.card_type = card.card_type;
        self.expiry_month = card.expiry_month;
        self.expiry_year = card.expiry_year;
        self.is_active = true;
        self.updated_at = now;
    }

    pub fn deactivate(&mut self, now: Timestamp) {
        self.is_active = false;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(year: i32, month: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap())
    }

    fn card(month: u32, year: i32) -> PaymentMethod {
        CardDetails::new("tok_1", "8600 **** **** 1234", "UzCard", month, year)
            .unwrap()
            .into_method(PaymentMethodId::new(1), UserId::new(1), at(2024, 1))
    }

    #[test]
    fn keeps_last_four_of_masked_number() {
        let method = card(12, 2026);
        assert_eq!(method.card_last_four, "1234");
        assert_eq!(method.card_type, "uzcard");
    }

    #[test]
    fn expiry_compares_year_then_month() {
        let method = card(6, 2025);
        assert!(!method.is_expired(at(2025, 6)));
        assert!(method.is_expired(at(2025, 7)));
        assert!(method.is_expired(at(2026, 1)));
        assert!(!method.is_expired(at(2024, 12)));
    }

    #[test]
    fn rejects_bad_expiry_and_missing_token() {
        assert!(CardDetails::new("tok", "1234", "humo", 13, 2026).is_err());
        assert!(CardDetails::new("  ", "1234", "humo", 1, 2026).is_err());
    }

    #[test]
    fn deactivated_card_is_not_usable() {
        let mut method = card(12, 2030);
        assert!(method.is_usable(at(2025, 1)));
        method.deactivate(at(2025, 1));
        assert!(!method.is_usable(at(2025, 1)));
    }
}
