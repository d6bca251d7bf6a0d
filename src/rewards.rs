//! Rewards
//!
//! Free-meal rewards and the session's single applied-reward slot.

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogItem, ItemId};

/// Backend-assigned identifier of a reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardId(pub u64);

impl fmt::Display for RewardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reward classification. Only free-meal rewards are redeemable in a basket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardKind {
    /// Redeemable against one eligible meal in the basket.
    FreeMeal,

    /// Any other reward type the backend may issue.
    Other(String),
}

impl RewardKind {
    /// Map the backend's reward type string.
    #[must_use]
    pub fn from_type(kind: &str) -> Self {
        if kind == "free_meal" {
            RewardKind::FreeMeal
        } else {
            RewardKind::Other(kind.to_owned())
        }
    }
}

/// A reward as supplied by the rewards source.
#[derive(Debug, Clone)]
pub struct Reward {
    /// Reward identifier.
    pub id: RewardId,

    /// Reward classification.
    pub kind: RewardKind,

    /// Whether the reward has already been redeemed.
    pub is_used: bool,

    /// Nominal value of the reward.
    pub value: Decimal,

    /// Display description.
    pub description: Option<String>,
}

impl Reward {
    /// Whether this reward can be applied to a basket.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.kind == RewardKind::FreeMeal && !self.is_used
    }
}

/// Display fields of a meal, captured when a reward is applied to it.
///
/// The snapshot is taken at apply time and does not track later catalog
/// edits.
#[derive(Debug, Clone, PartialEq)]
pub struct MealSnapshot {
    /// Meal name at apply time.
    pub name: String,

    /// Meal price at apply time.
    pub price: Money<'static, Currency>,

    /// Meal image at apply time.
    pub image: Option<String>,

    /// Calories per serving at apply time.
    pub calories: u32,

    /// Protein per serving at apply time, in grams.
    pub protein: u32,

    /// Meal description at apply time.
    pub description: String,
}

impl From<&CatalogItem> for MealSnapshot {
    fn from(meal: &CatalogItem) -> Self {
        MealSnapshot {
            name: meal.name.clone(),
            price: meal.price,
            image: meal.image.clone(),
            calories: meal.calories,
            protein: meal.protein,
            description: meal.description.clone(),
        }
    }
}

/// The single reward-to-meal pairing a session holds. Re-application
/// overwrites it; rewards never stack.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedReward {
    /// The applied reward.
    pub reward: RewardId,

    /// The meal the reward is attached to.
    pub meal: ItemId,

    /// The meal's display fields at apply time.
    pub meal_snapshot: MealSnapshot,
}
