//! Larder
//!
//! Larder is a basket composition engine for meal-subscription plans: it
//! reconciles meal, drink and free-dessert selections against weekly quotas
//! and membership entitlements, tracks a single applied free-meal reward,
//! and produces the normalized selection state an ordering backend consumes.
//!
//! The engine is pure and synchronous: catalog, membership and rewards are
//! read-only snapshots handed in by the caller, and all state lives in one
//! caller-owned [`session::BasketSession`]. Mutations never panic and never
//! fail — they clamp to the governing caps and report what happened through
//! typed outcomes.

pub mod catalog;
pub mod fixtures;
pub mod membership;
pub mod plan;
pub mod prelude;
pub mod pricing;
pub mod rewards;
pub mod selection;
pub mod session;
pub mod wire;
