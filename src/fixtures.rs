//! Fixtures
//!
//! In-memory sample data for tests and examples: a small menu, an active
//! membership and a redeemable reward.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::GBP};
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError, CatalogItem, CategoryId, ItemId, ItemKind},
    membership::{Membership, MembershipPlan, MembershipStatus},
    plan::PlanConfig,
    rewards::{Reward, RewardId, RewardKind},
    session::BasketSession,
};

/// Fixture construction errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The sample catalog failed to build.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A sample catalog item.
#[must_use]
pub fn menu_item(
    id: u64,
    name: &str,
    category: u64,
    kind: ItemKind,
    is_membership: bool,
    price_minor: i64,
) -> CatalogItem {
    CatalogItem {
        id: ItemId(id),
        name: name.to_owned(),
        description: format!("{name} (fixture)"),
        image: Some(format!("{id}.jpg")),
        calories: 500,
        protein: 30,
        category: CategoryId(category),
        kind,
        is_membership,
        price: Money::from_minor(price_minor, GBP),
    }
}

/// A sample menu: four main meals (one membership-gated), a side, and three
/// drinks.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the catalog rejects the sample data.
pub fn sample_catalog() -> Result<Catalog, FixtureError> {
    let meals = [
        menu_item(10, "Grilled Salmon", 1, ItemKind::Main, false, 1299),
        menu_item(11, "Chicken Teriyaki", 1, ItemKind::Main, false, 1099),
        menu_item(12, "Vegan Buddha Bowl", 2, ItemKind::Main, false, 999),
        menu_item(13, "Wagyu Steak", 1, ItemKind::Main, true, 2499),
        menu_item(14, "Garden Salad", 1, ItemKind::Other(2), false, 499),
    ];

    let drinks = [
        menu_item(7, "Fresh Orange Juice", 5, ItemKind::Other(3), false, 349),
        menu_item(8, "Iced Matcha Latte", 5, ItemKind::Other(3), false, 425),
        menu_item(9, "Sparkling Water", 5, ItemKind::Other(3), false, 199),
    ];

    Ok(Catalog::new(meals, drinks, GBP)?)
}

/// An active membership granting two free desserts a month (one already
/// used) and a 10 % discount.
#[must_use]
pub fn active_membership() -> Membership {
    Membership {
        status: MembershipStatus::Active,
        plan: MembershipPlan {
            includes_free_desserts: true,
            free_desserts_quantity: 2,
            free_desserts_used_this_month: 1,
            discount: Percentage::from(0.1),
        },
    }
}

/// An unused free-meal reward.
#[must_use]
pub fn free_meal_reward(id: u64) -> Reward {
    Reward {
        id: RewardId(id),
        kind: RewardKind::FreeMeal,
        is_used: false,
        value: Decimal::new(1099, 2),
        description: Some("Free meal on us".to_owned()),
    }
}

/// An empty session over the sample catalog with the given weekly quota.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the sample catalog fails to build.
pub fn sample_session(meals_per_week: u32) -> Result<BasketSession, FixtureError> {
    Ok(BasketSession::new(
        sample_catalog()?,
        PlanConfig::new(meals_per_week),
    ))
}
