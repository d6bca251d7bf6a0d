//! Plan configuration

use serde::{Deserialize, Serialize};

use crate::catalog::CategoryId;

/// Subscription plan configuration: the weekly meal quota and an optional
/// category restriction on which meals are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Cap on the total quantity across selected meals.
    pub meals_per_week: u32,

    /// When set, only meals in this category are selectable.
    pub category: Option<CategoryId>,
}

impl PlanConfig {
    /// Create an unrestricted plan with the given weekly quota.
    #[must_use]
    pub fn new(meals_per_week: u32) -> Self {
        PlanConfig {
            meals_per_week,
            category: None,
        }
    }

    /// Create a plan restricted to one menu category.
    #[must_use]
    pub fn with_category(meals_per_week: u32, category: CategoryId) -> Self {
        PlanConfig {
            meals_per_week,
            category: Some(category),
        }
    }
}
