//! BillingScheduler - periodic subscription maintenance.
//!
//! Each tick runs three passes in order:
//! 1. Auto-renewals (charge stored cards for subscriptions due within a day)
//! 2. Expiry reminders (subscriptions ending in `reminder_days`)
//! 3. Expiry sweep (switch off subscriptions past their end date)
//!
//! Renewals run first so a successful charge moves the end date before the
//! sweep looks at it.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `subscription.renewal_job_enabled` | false | Spawn the scheduler at startup |
//! | `subscription.renewal_job_interval_secs` | 3600 | Time between ticks |
//!
//! Reminders match on the calendar date, so with the default hourly interval
//! a subscription is reminded on every tick of that day. Deployments that
//! want exactly one reminder run the job daily.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::application::handlers::billing::{
    DeactivateExpiredCommand, DeactivateExpiredHandler, ProcessAutoRenewalsCommand,
    ProcessAutoRenewalsHandler, RenewalReport, SendExpiryRemindersCommand,
    SendExpiryRemindersHandler,
};
use crate::domain::foundation::Timestamp;

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub renewals: RenewalReport,
    pub reminders_sent: usize,
    pub deactivated: usize,
}

pub struct BillingScheduler {
    renewals: Arc<ProcessAutoRenewalsHandler>,
    reminders: Arc<SendExpiryRemindersHandler>,
    sweep: Arc<DeactivateExpiredHandler>,
    interval: Duration,
}

impl BillingScheduler {
    pub fn new(
        renewals: Arc<ProcessAutoRenewalsHandler>,
        reminders: Arc<SendExpiryRemindersHandler>,
        sweep: Arc<DeactivateExpiredHandler>,
        interval: Duration,
    ) -> Self {
        Self {
            renewals,
            reminders,
            sweep,
            interval,
        }
    }

    /// Run until the shutdown channel flips to `true`.
    ///
    /// Pass failures are logged; the loop keeps going.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        tracing::info!(interval_secs = self.interval.as_secs(), "billing scheduler started");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("billing scheduler stopped");
                        return;
                    }
                }
                _ = interval.tick() => {
                    self.tick(Timestamp::now()).await;
                }
            }
        }
    }

    /// One full maintenance pass at `now`.
    pub async fn tick(&self, now: Timestamp) -> TickReport {
        let mut report = TickReport::default();

        match self.renewals.handle(ProcessAutoRenewalsCommand { now }).await {
            Ok(renewals) => report.renewals = renewals,
            Err(err) => tracing::error!(error = %err, "auto-renewal pass failed"),
        }

        match self.reminders.handle(SendExpiryRemindersCommand { now }).await {
            Ok(sent) => report.reminders_sent = sent,
            Err(err) => tracing::error!(error = %err, "expiry reminder pass failed"),
        }

        match self.sweep.handle(DeactivateExpiredCommand { now }).await {
            Ok(count) => report.deactivated = count,
            Err(err) => tracing::error!(error = %err, "expiry sweep failed"),
        }

        tracing::debug!(
            renewed = report.renewals.renewed,
            reminders = report.reminders_sent,
            deactivated = report.deactivated,
            "billing tick finished"
        );
        report
    }
}
