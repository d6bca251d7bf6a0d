//! Larder prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, CatalogError, CatalogItem, CategoryId, ItemId, ItemKind},
    membership::{Membership, MembershipPlan, MembershipStatus},
    plan::PlanConfig,
    pricing::PricingError,
    rewards::{AppliedReward, MealSnapshot, Reward, RewardId, RewardKind},
    selection::{Adjusted, QuantityCap, SelectionMap},
    session::{
        BasketSession, Mutation, RejectReason, RewardApplication, SelectionLine, SelectionSeed,
        SelectionState,
    },
    wire::{
        DraftEntryRecord, MembershipPlanRecord, MembershipRecord, MenuItemRecord,
        PlanDraftRecord, RewardRecord, RewardsRecord, WireError,
    },
};
