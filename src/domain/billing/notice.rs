//! Telegram notification texts for billing events (HTML parse mode).

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::foundation::Timestamp;

/// Formats an amount as whole UZS with thousands separators, e.g. `67,000 UZS`.
pub fn format_uzs(amount: Decimal) -> String {
    let whole = amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .abs()
        .trunc()
        .to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}{} UZS", sign, grouped)
}

fn format_date(ts: Timestamp) -> String {
    ts.as_datetime().format("%d.%m.%Y").to_string()
}

fn end_line(end_date: Option<Timestamp>) -> String {
    end_date
        .map(|end| format!("📅 Subscription ends: <b>{}</b>\n", format_date(end)))
        .unwrap_or_default()
}

pub fn payment_received(amount: Decimal, end_date: Option<Timestamp>) -> String {
    format!(
        "✅ <b>Payment received!</b>\n\n💰 Amount: <b>{}</b>\n{}\nPremium is active. Thank you! 🎉",
        format_uzs(amount),
        end_line(end_date)
    )
}

pub fn auto_renewal_succeeded(amount: Decimal, end_date: Option<Timestamp>) -> String {
    format!(
        "✅ <b>Subscription renewed!</b>\n\n💰 Amount: <b>{}</b>\n{}\nThank you! 🎉",
        format_uzs(amount),
        end_line(end_date)
    )
}

pub fn auto_renewal_failed(attempt: i32, max_attempts: i32, retry_hours: i64) -> String {
    format!(
        "⚠️ <b>Payment failed!</b>\n\n🔄 Attempt: {}/{}\n⏰ Next attempt in {} hours\n\n\
         Please make sure your card has enough funds.",
        attempt, max_attempts, retry_hours
    )
}

pub fn subscription_cancelled_after_failures(attempts: i32) -> String {
    format!(
        "❌ <b>Subscription cancelled!</b>\n\n{} payment attempts failed.\n\
         Premium features are now closed.\n\nSubscribe again: /start",
        attempts
    )
}

pub fn card_expired(card_last_four: &str) -> String {
    format!(
        "⚠️ <b>Your card has expired!</b>\n\n💳 Card: ****{}\n\nPlease add a new card: /start",
        card_last_four
    )
}

pub fn expiry_reminder(days_left: i64, end_date: Timestamp, auto_renew: bool) -> String {
    let tail = if auto_renew {
        "Auto-renewal is on ✅"
    } else {
        "Extend your subscription: /start"
    };
    format!(
        "🔔 <b>Reminder</b>\n\nYour subscription ends in <b>{} days</b>.\n📅 End date: {}\n\n{}",
        days_left,
        format_date(end_date),
        tail
    )
}

pub fn subscription_expired() -> String {
    "⏰ <b>Your subscription has ended</b>\n\nPremium features are now closed.\n\n\
     Subscribe again: /start"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn groups_thousands() {
        assert_eq!(format_uzs(Decimal::new(6_700_000, 2)), "67,000 UZS");
        assert_eq!(format_uzs(Decimal::from(1_234_567)), "1,234,567 UZS");
        assert_eq!(format_uzs(Decimal::from(999)), "999 UZS");
        assert_eq!(format_uzs(Decimal::ZERO), "0 UZS");
    }

    #[test]
    fn reminder_text_depends_on_auto_renew() {
        let end = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 7, 3, 8, 0, 0).unwrap());
        let on = expiry_reminder(3, end, true);
        let off = expiry_reminder(3, end, false);
        assert!(on.contains("03.07.2024"));
        assert!(on.contains("Auto-renewal is on"));
        assert!(off.contains("/start"));
        assert!(!off.contains("Auto-renewal is on"));
    }

    #[test]
    fn failure_text_shows_attempt_counter() {
        assert!(auto_renewal_failed(2, 3, 24).contains("Attempt: 2/3"));
    }
}
