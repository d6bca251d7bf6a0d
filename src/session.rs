//! Basket session
//!
//! The composition engine: one owned session per basket, mutated through
//! discrete operations and read back as derived values or a handoff
//! snapshot. Nothing here performs I/O; catalog, membership and rewards are
//! read-only snapshots supplied by the caller.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogItem, ItemId},
    membership::Membership,
    plan::PlanConfig,
    pricing::{PricingError, apply_discount, line_total},
    rewards::{AppliedReward, MealSnapshot, Reward, RewardId},
    selection::{Adjusted, QuantityCap, SelectionMap},
};

/// Why a mutation was refused outright (no state change).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The meal id does not resolve in the catalog.
    #[error("meal {0} is not in the catalog")]
    UnknownMeal(ItemId),

    /// The drink id does not resolve in the catalog.
    #[error("drink {0} is not in the catalog")]
    UnknownDrink(ItemId),

    /// The reward id does not resolve in the rewards snapshot.
    #[error("reward {0} is not in the rewards snapshot")]
    UnknownReward(RewardId),

    /// The meal requires an active membership the caller does not hold.
    #[error("meal {0} requires an active membership")]
    MembershipRequired(ItemId),

    /// The membership does not currently grant free desserts.
    #[error("no free-dessert entitlement is currently granted")]
    NoDessertEntitlement,

    /// The reward is not a free-meal reward, or is already used.
    #[error("reward {0} is not available")]
    RewardUnavailable(RewardId),

    /// The meal is outside the filtered meal set or membership-gated.
    #[error("meal {0} is not eligible for a reward")]
    MealNotEligible(ItemId),
}

/// Outcome of a quantity mutation.
///
/// The state transition is always best-effort (clamp rather than fail); the
/// outcome reports what actually happened so callers can render precise
/// feedback without re-deriving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The full delta was applied; the entry now holds this quantity.
    Applied {
        /// Quantity after the mutation.
        quantity: u32,
    },

    /// The delta was cut short by a cap or the zero floor.
    Clamped {
        /// Quantity after the mutation.
        quantity: u32,
    },

    /// Nothing changed.
    Rejected(RejectReason),
}

impl Mutation {
    fn from_adjusted(adjusted: Adjusted) -> Self {
        if adjusted.clamped {
            Mutation::Clamped {
                quantity: adjusted.quantity,
            }
        } else {
            Mutation::Applied {
                quantity: adjusted.quantity,
            }
        }
    }
}

/// Outcome of applying a reward to a meal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardApplication {
    /// The reward slot now holds this pairing (first application, or an
    /// identical re-application).
    Applied,

    /// A different pairing was overwritten.
    Replaced {
        /// The reward that previously occupied the slot.
        previous: RewardId,
    },

    /// Nothing changed.
    Rejected(RejectReason),
}

/// Quantities restored from a persisted plan draft.
#[derive(Debug, Clone, Default)]
pub struct SelectionSeed {
    /// Seeded meal quantities.
    pub meals: Vec<(ItemId, u32)>,

    /// Seeded drink quantities.
    pub drinks: Vec<(ItemId, u32)>,

    /// Seeded free-dessert quantities.
    pub free_desserts: Vec<(ItemId, u32)>,
}

/// One selected item in a handoff snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLine {
    /// Selected catalog item.
    pub item: ItemId,

    /// Selected quantity (always positive).
    pub quantity: u32,
}

/// Normalized selection state handed to the order-submission collaborator.
///
/// Lines are sorted by item id so repeated snapshots of the same state are
/// identical.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    /// Selected meals.
    pub meals: Vec<SelectionLine>,

    /// Selected drinks.
    pub drinks: Vec<SelectionLine>,

    /// Selected free desserts.
    pub free_desserts: Vec<SelectionLine>,

    /// The applied reward, if any.
    pub applied_reward: Option<AppliedReward>,
}

/// A basket composition session.
///
/// Owns the three selection mappings and the applied-reward slot, and
/// enforces the plan and membership invariants at every mutation:
///
/// - meal quantities never sum past the plan's weekly quota;
/// - free-dessert quantities never sum past the membership's remaining
///   monthly allotment;
/// - mappings never hold zero-quantity entries;
/// - membership-gated meals cannot be increased without an active
///   membership;
/// - at most one reward is applied, overwrite-only.
#[derive(Debug)]
pub struct BasketSession {
    catalog: Catalog,
    plan: PlanConfig,
    membership: Option<Membership>,
    rewards: FxHashMap<RewardId, Reward>,
    selected_meals: SelectionMap,
    selected_drinks: SelectionMap,
    selected_free_desserts: SelectionMap,
    applied_reward: Option<AppliedReward>,
}

impl BasketSession {
    /// Create an empty session over a catalog snapshot and plan.
    #[must_use]
    pub fn new(catalog: Catalog, plan: PlanConfig) -> Self {
        BasketSession {
            catalog,
            plan,
            membership: None,
            rewards: FxHashMap::default(),
            selected_meals: SelectionMap::new(),
            selected_drinks: SelectionMap::new(),
            selected_free_desserts: SelectionMap::new(),
            applied_reward: None,
        }
    }

    /// Replace the membership snapshot.
    ///
    /// Returns the ids of selected membership-gated meals the new snapshot
    /// no longer authorizes. They are surfaced, not removed; the caller
    /// decides the removal policy.
    pub fn set_membership(&mut self, membership: Option<Membership>) -> Vec<ItemId> {
        self.membership = membership;
        self.invalid_selections()
    }

    /// Replace the rewards snapshot.
    pub fn set_rewards(&mut self, rewards: impl IntoIterator<Item = Reward>) {
        self.rewards = rewards
            .into_iter()
            .map(|reward| (reward.id, reward))
            .collect();
    }

    /// Restore quantities from a persisted plan draft.
    ///
    /// Entries are inserted as-is: a stale draft may exceed the current
    /// quota, in which case mutations can only shrink it. Zero quantities
    /// and ids that no longer resolve in the catalog are dropped.
    pub fn seed(&mut self, seed: &SelectionSeed) {
        for &(id, quantity) in &seed.meals {
            if self.catalog.meal(id).is_some() {
                self.selected_meals.seed(id, quantity);
            }
        }

        for &(id, quantity) in &seed.drinks {
            if self.catalog.drink(id).is_some() {
                self.selected_drinks.seed(id, quantity);
            }
        }

        for &(id, quantity) in &seed.free_desserts {
            if self.catalog.drink(id).is_some() {
                self.selected_free_desserts.seed(id, quantity);
            }
        }
    }

    /// Adjust a meal's quantity by a signed delta.
    ///
    /// The new quantity is clamped so the mapping total never exceeds the
    /// plan's weekly quota. Increasing a membership-gated meal requires an
    /// active membership; decreases are always allowed so a lapsed member
    /// can remove items.
    pub fn set_meal_quantity(&mut self, id: ItemId, delta: i64) -> Mutation {
        let gated = match self.catalog.meal(id) {
            Some(meal) => meal.is_membership,
            None => return Mutation::Rejected(RejectReason::UnknownMeal(id)),
        };

        if delta > 0 && gated && !self.has_active_membership() {
            return Mutation::Rejected(RejectReason::MembershipRequired(id));
        }

        let adjusted = self.selected_meals.adjust(
            id,
            delta,
            QuantityCap::Total(self.plan.meals_per_week),
        );

        Mutation::from_adjusted(adjusted)
    }

    /// Adjust a drink's quantity by a signed delta; bounded only by
    /// non-negativity.
    pub fn set_drink_quantity(&mut self, id: ItemId, delta: i64) -> Mutation {
        if self.catalog.drink(id).is_none() {
            return Mutation::Rejected(RejectReason::UnknownDrink(id));
        }

        let adjusted = self.selected_drinks.adjust(id, delta, QuantityCap::Unbounded);

        Mutation::from_adjusted(adjusted)
    }

    /// Adjust a free dessert's quantity by a signed delta.
    ///
    /// Free desserts resolve against the drinks side of the catalog.
    /// Increases require a membership that currently grants free desserts;
    /// the mapping total is capped by the remaining monthly allotment.
    pub fn set_free_dessert_quantity(&mut self, id: ItemId, delta: i64) -> Mutation {
        if self.catalog.drink(id).is_none() {
            return Mutation::Rejected(RejectReason::UnknownDrink(id));
        }

        let grants = self
            .membership
            .as_ref()
            .is_some_and(Membership::grants_free_desserts);

        if delta > 0 && !grants {
            return Mutation::Rejected(RejectReason::NoDessertEntitlement);
        }

        let allotment = self
            .membership
            .as_ref()
            .map_or(0, Membership::remaining_free_desserts);

        let adjusted = self
            .selected_free_desserts
            .adjust(id, delta, QuantityCap::Total(allotment));

        Mutation::from_adjusted(adjusted)
    }

    /// Whether the caller may select this meal: always true for ungated
    /// meals, otherwise only with an active membership.
    ///
    /// Pure predicate for UI affordances; the quantity mutations enforce the
    /// same rule themselves.
    #[must_use]
    pub fn can_select(&self, meal: &CatalogItem) -> bool {
        !meal.is_membership || self.has_active_membership()
    }

    /// Apply a free-meal reward to a meal, overwriting any prior pairing.
    ///
    /// The reward must resolve and be available; the meal must belong to the
    /// plan-filtered meal set and not be membership-gated. Price is
    /// deliberately not a criterion. The meal's display fields are
    /// snapshotted at apply time.
    pub fn apply_reward(&mut self, meal_id: ItemId, reward_id: RewardId) -> RewardApplication {
        let Some(reward) = self.rewards.get(&reward_id) else {
            return RewardApplication::Rejected(RejectReason::UnknownReward(reward_id));
        };

        if !reward.is_available() {
            return RewardApplication::Rejected(RejectReason::RewardUnavailable(reward_id));
        }

        let Some(meal) = self.catalog.meal(meal_id) else {
            return RewardApplication::Rejected(RejectReason::UnknownMeal(meal_id));
        };

        if !self.is_reward_eligible(meal) {
            return RewardApplication::Rejected(RejectReason::MealNotEligible(meal_id));
        }

        let applied = AppliedReward {
            reward: reward_id,
            meal: meal_id,
            meal_snapshot: MealSnapshot::from(meal),
        };

        match self.applied_reward.replace(applied) {
            Some(previous) if previous.reward == reward_id && previous.meal == meal_id => {
                RewardApplication::Applied
            }
            Some(previous) => RewardApplication::Replaced {
                previous: previous.reward,
            },
            None => RewardApplication::Applied,
        }
    }

    /// Clear the applied-reward slot.
    pub fn clear_reward(&mut self) -> Option<AppliedReward> {
        self.applied_reward.take()
    }

    /// The applied reward, if any.
    #[must_use]
    pub fn applied_reward(&self) -> Option<&AppliedReward> {
        self.applied_reward.as_ref()
    }

    /// Meals a free-meal reward may be attached to, sorted by id.
    ///
    /// All free-meal rewards share the same eligibility rule, so this is
    /// independent of any particular reward.
    #[must_use]
    pub fn eligible_reward_meals(&self) -> SmallVec<[&CatalogItem; 8]> {
        let mut meals: SmallVec<[&CatalogItem; 8]> = self
            .catalog
            .filtered_meals(&self.plan)
            .filter(|meal| !meal.is_membership)
            .collect();

        meals.sort_unstable_by_key(|meal| meal.id);
        meals
    }

    /// Rewards in the snapshot that are still redeemable.
    pub fn available_rewards(&self) -> impl Iterator<Item = &Reward> {
        self.rewards.values().filter(|reward| reward.is_available())
    }

    /// Meals visible under the plan's filters.
    pub fn filtered_meals(&self) -> impl Iterator<Item = &CatalogItem> {
        self.catalog.filtered_meals(&self.plan)
    }

    /// Sum of quantities across selected meals.
    #[must_use]
    pub fn total_selected_meals(&self) -> u32 {
        self.selected_meals.total()
    }

    /// Weekly meal slots still open; 0 when the quota is reached.
    #[must_use]
    pub fn remaining_meals(&self) -> u32 {
        self.plan
            .meals_per_week
            .saturating_sub(self.selected_meals.total())
    }

    /// Free desserts still addable this month: the membership's remaining
    /// allotment minus what is already selected, clamped non-negative.
    #[must_use]
    pub fn remaining_free_desserts(&self) -> u32 {
        self.membership
            .as_ref()
            .map_or(0, Membership::remaining_free_desserts)
            .saturating_sub(self.selected_free_desserts.total())
    }

    /// Selected membership-gated meals the current membership snapshot does
    /// not authorize, sorted by id.
    #[must_use]
    pub fn invalid_selections(&self) -> Vec<ItemId> {
        if self.has_active_membership() {
            return Vec::new();
        }

        let mut invalid: Vec<ItemId> = self
            .selected_meals
            .iter()
            .filter_map(|(id, _)| self.catalog.meal(id))
            .filter(|meal| meal.is_membership)
            .map(|meal| meal.id)
            .collect();

        invalid.sort_unstable();
        invalid
    }

    /// The selected-meals mapping.
    #[must_use]
    pub fn selected_meals(&self) -> &SelectionMap {
        &self.selected_meals
    }

    /// The selected-drinks mapping.
    #[must_use]
    pub fn selected_drinks(&self) -> &SelectionMap {
        &self.selected_drinks
    }

    /// The selected-free-desserts mapping.
    #[must_use]
    pub fn selected_free_desserts(&self) -> &SelectionMap {
        &self.selected_free_desserts
    }

    /// The catalog snapshot this session composes against.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The plan configuration.
    #[must_use]
    pub fn plan(&self) -> &PlanConfig {
        &self.plan
    }

    /// The membership snapshot, if any.
    #[must_use]
    pub fn membership(&self) -> Option<&Membership> {
        self.membership.as_ref()
    }

    /// Snapshot the normalized selection state for submission.
    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        SelectionState {
            meals: lines(&self.selected_meals),
            drinks: lines(&self.selected_drinks),
            free_desserts: lines(&self.selected_free_desserts),
            applied_reward: self.applied_reward.clone(),
        }
    }

    /// Subtotal of selected meals and drinks at their catalog prices; free
    /// desserts contribute nothing. An empty basket totals zero in the
    /// catalog currency.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if minor-unit arithmetic overflows.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        let mut total = Money::from_minor(0, self.catalog.currency());

        for (id, quantity) in self.selected_meals.iter() {
            if let Some(meal) = self.catalog.meal(id) {
                total = total.add(line_total(meal.price, quantity)?)?;
            }
        }

        for (id, quantity) in self.selected_drinks.iter() {
            if let Some(drink) = self.catalog.drink(id) {
                total = total.add(line_total(drink.price, quantity)?)?;
            }
        }

        Ok(total)
    }

    /// Subtotal with the membership discount applied, when the membership is
    /// active.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if minor-unit or percentage arithmetic
    /// fails.
    pub fn discounted_subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        let subtotal = self.subtotal()?;

        match &self.membership {
            Some(membership) if membership.is_active() => {
                apply_discount(subtotal, &membership.plan.discount)
            }
            _ => Ok(subtotal),
        }
    }

    fn has_active_membership(&self) -> bool {
        self.membership.as_ref().is_some_and(Membership::is_active)
    }

    fn is_reward_eligible(&self, meal: &CatalogItem) -> bool {
        !meal.is_membership
            && meal.kind.is_main()
            && self
                .plan
                .category
                .is_none_or(|category| meal.category == category)
    }
}

/// Sorted handoff lines for one mapping.
fn lines(map: &SelectionMap) -> Vec<SelectionLine> {
    map.to_lines()
        .into_iter()
        .map(|(item, quantity)| SelectionLine { item, quantity })
        .collect()
}
