//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `profile` - User profile, onboarding answers and Telegram init data
//! - `activity` - Append-only user activity events
//! - `catalog` - Muscle groups, exercises, programs and editions
//! - `favorites` - Favorite exercises and collections
//! - `workout` - Workout sessions and progress statistics
//! - `billing` - Subscriptions, payments and the Click protocol

pub mod activity;
pub mod billing;
pub mod catalog;
pub mod favorites;
pub mod foundation;
pub mod profile;
pub mod workout;
