//! Fitness Hub - backend for a Telegram Mini App fitness tracker.
//!
//! Onboarding questionnaire, exercise catalog, favorites, workout sessions
//! and premium subscriptions paid through the Click gateway, plus the
//! Telegram bot webhook.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
