//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repositories
//!
//! - `ProfileRepository`, `FavoriteRepository`, `WorkoutSessionRepository`
//! - `SubscriptionRepository`, `PaymentRepository`, `PaymentMethodRepository`
//! - `CatalogReader` - read-only catalog of exercises and programs
//!
//! ## Outbound services
//!
//! - `PaymentGateway` - invoices and card-token charges
//! - `Notifier` - Telegram messages to users
//! - `ActivityLog` - append-only user events
//! - `SessionIssuer` / `SessionValidator` - bearer session tokens

mod activity_log;
mod catalog_reader;
mod favorite_repository;
mod notifier;
mod payment_gateway;
mod payment_method_repository;
mod payment_repository;
mod profile_repository;
mod session_validator;
mod subscription_repository;
mod workout_session_repository;

pub use activity_log::ActivityLog;
pub use catalog_reader::CatalogReader;
pub use favorite_repository::FavoriteRepository;
pub use notifier::{MessageButton, Notifier, NotifyError, OutgoingMessage};
pub use payment_gateway::{
    ChargeOutcome, ChargeRequest, Invoice, InvoiceRequest, PaymentError, PaymentErrorCode,
    PaymentGateway,
};
pub use payment_method_repository::PaymentMethodRepository;
pub use payment_repository::PaymentRepository;
pub use profile_repository::ProfileRepository;
pub use session_validator::{SessionIssuer, SessionValidator};
pub use subscription_repository::SubscriptionRepository;
pub use workout_session_repository::WorkoutSessionRepository;
