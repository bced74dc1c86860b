//! In-memory adapters.
//!
//! Thread-safe via internal `Mutex`. Used by tests and by local runs without
//! a database. Ids are handed out from per-store counters starting at 1.

mod activity;
mod billing;
mod catalog;
mod favorites;
mod notifier;
mod profiles;
mod workouts;

pub use activity::InMemoryActivityLog;
pub use billing::{
    InMemoryPaymentMethodRepository, InMemoryPaymentRepository, InMemorySubscriptionRepository,
};
pub use catalog::InMemoryCatalog;
pub use favorites::InMemoryFavoriteRepository;
pub use notifier::RecordingNotifier;
pub use profiles::InMemoryProfileRepository;
pub use workouts::InMemoryWorkoutSessionRepository;

use std::sync::{Mutex, MutexGuard};

use crate::domain::foundation::{DomainError, ErrorCode};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, DomainError> {
    mutex
        .lock()
        .map_err(|_| DomainError::new(ErrorCode::InternalError, "in-memory store lock poisoned"))
}

/// Monotonic id source for one store.
#[derive(Debug, Default)]
pub(crate) struct Sequence(Mutex<i64>);

impl Sequence {
    pub(crate) fn next(&self) -> Result<i64, DomainError> {
        let mut guard = lock(&self.0)?;
        *guard += 1;
        Ok(*guard)
    }
}
