//! Wire records
//!
//! Serde mirrors of the backend's JSON documents: catalog items, the
//! membership record, the rewards payload and the persisted plan draft.
//! Field names match the backend; conversions produce the domain types the
//! session works with.

use std::collections::BTreeMap;

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::{CatalogItem, CategoryId, ItemId, ItemKind},
    membership::{Membership, MembershipPlan, MembershipStatus},
    rewards::{Reward, RewardId, RewardKind},
    session::{BasketSession, SelectionSeed},
};

/// Errors converting wire records into domain types.
#[derive(Debug, Error)]
pub enum WireError {
    /// An item's price cannot be represented in the currency's minor units.
    #[error("price of item {0} cannot be represented in {1} minor units")]
    Price(u64, &'static str),
}

/// A meal or drink as the catalog endpoints serve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemRecord {
    /// Item id.
    pub id: u64,

    /// Display name.
    pub name: String,

    /// Display description.
    #[serde(default)]
    pub description: String,

    /// Image reference.
    #[serde(default)]
    pub image: Option<String>,

    /// Calories per serving.
    #[serde(default)]
    pub calories: u32,

    /// Protein per serving, in grams.
    #[serde(default)]
    pub protein: u32,

    /// Menu category id.
    pub category_id: u64,

    /// Menu type id; `1` denotes a main meal.
    pub type_id: u16,

    /// Whether the item is membership-gated.
    #[serde(default)]
    pub is_membership: bool,

    /// Price as a decimal major-unit amount.
    pub price: Decimal,
}

impl MenuItemRecord {
    /// Convert into a catalog item priced in the given currency.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Price`] if the price does not fit the currency's
    /// minor units.
    pub fn into_item(self, currency: &'static Currency) -> Result<CatalogItem, WireError> {
        let price = to_minor(self.price, currency).ok_or(WireError::Price(
            self.id,
            currency.iso_alpha_code,
        ))?;

        Ok(CatalogItem {
            id: ItemId(self.id),
            name: self.name,
            description: self.description,
            image: self.image,
            calories: self.calories,
            protein: self.protein,
            category: CategoryId(self.category_id),
            kind: ItemKind::from_type_id(self.type_id),
            is_membership: self.is_membership,
            price: Money::from_minor(price, currency),
        })
    }
}

/// Scale a major-unit decimal amount to minor units, rounding half away
/// from zero.
fn to_minor(amount: Decimal, currency: &'static Currency) -> Option<i64> {
    let scale = 10i64.checked_pow(currency.exponent)?;

    amount
        .checked_mul(Decimal::from_i64(scale)?)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// The membership plan document nested in a membership record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipPlanRecord {
    /// Whether the plan includes free desserts.
    #[serde(default)]
    pub includes_free_desserts: bool,

    /// Monthly free-dessert allotment.
    #[serde(default)]
    pub free_desserts_quantity: u32,

    /// Free desserts already consumed this month.
    #[serde(default)]
    pub free_desserts_used_this_month: u32,

    /// Whole-number member discount percent (`10` means 10 %).
    #[serde(default)]
    pub discount_percentage: Decimal,
}

/// A membership record as the membership endpoint serves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRecord {
    /// Account status; only `"active"` grants entitlements.
    pub status: String,

    /// The granted plan.
    pub membership_plan: MembershipPlanRecord,
}

impl From<MembershipRecord> for Membership {
    fn from(record: MembershipRecord) -> Self {
        let status = if record.status == "active" {
            MembershipStatus::Active
        } else {
            MembershipStatus::Inactive
        };

        Membership {
            status,
            plan: MembershipPlan {
                includes_free_desserts: record.membership_plan.includes_free_desserts,
                free_desserts_quantity: record.membership_plan.free_desserts_quantity,
                free_desserts_used_this_month: record
                    .membership_plan
                    .free_desserts_used_this_month,
                discount: Percentage::from(
                    record.membership_plan.discount_percentage / Decimal::ONE_HUNDRED,
                ),
            },
        }
    }
}

/// A reward as the rewards endpoint serves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRecord {
    /// Reward id.
    pub id: u64,

    /// Reward type; only `"free_meal"` is redeemable in a basket.
    #[serde(rename = "type")]
    pub kind: String,

    /// Whether the reward has already been redeemed.
    #[serde(default)]
    pub is_used: bool,

    /// Nominal value of the reward.
    #[serde(default)]
    pub value: Decimal,

    /// Display description.
    #[serde(default)]
    pub description: Option<String>,
}

impl From<RewardRecord> for Reward {
    fn from(record: RewardRecord) -> Self {
        Reward {
            id: RewardId(record.id),
            kind: RewardKind::from_type(&record.kind),
            is_used: record.is_used,
            value: record.value,
            description: record.description,
        }
    }
}

/// The rewards payload: the backend returns either a single object or an
/// array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RewardsRecord {
    /// A single reward object.
    One(RewardRecord),

    /// An array of rewards.
    Many(Vec<RewardRecord>),
}

impl RewardsRecord {
    /// Normalize to a list of domain rewards.
    #[must_use]
    pub fn into_rewards(self) -> Vec<Reward> {
        match self {
            RewardsRecord::One(record) => vec![record.into()],
            RewardsRecord::Many(records) => records.into_iter().map(Into::into).collect(),
        }
    }
}

/// One entry of a persisted selection mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEntryRecord {
    /// Persisted quantity.
    pub quantity: u32,
}

/// The plan-draft store document: three id-keyed selection objects.
///
/// JSON object keys are item ids; `BTreeMap` keeps serialized drafts in a
/// stable order for the fire-and-forget persistence side channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDraftRecord {
    /// Persisted meal selections.
    #[serde(default)]
    pub selected_meals: BTreeMap<u64, DraftEntryRecord>,

    /// Persisted drink selections.
    #[serde(default)]
    pub selected_drinks: BTreeMap<u64, DraftEntryRecord>,

    /// Persisted free-dessert selections.
    #[serde(default)]
    pub selected_free_desserts: BTreeMap<u64, DraftEntryRecord>,
}

impl PlanDraftRecord {
    /// Convert into quantities the session can restore.
    #[must_use]
    pub fn into_seed(self) -> SelectionSeed {
        SelectionSeed {
            meals: entries(self.selected_meals),
            drinks: entries(self.selected_drinks),
            free_desserts: entries(self.selected_free_desserts),
        }
    }

    /// Capture a session's current mappings for persistence.
    #[must_use]
    pub fn from_session(session: &BasketSession) -> Self {
        PlanDraftRecord {
            selected_meals: draft(session.selected_meals().iter()),
            selected_drinks: draft(session.selected_drinks().iter()),
            selected_free_desserts: draft(session.selected_free_desserts().iter()),
        }
    }
}

fn entries(map: BTreeMap<u64, DraftEntryRecord>) -> Vec<(ItemId, u32)> {
    map.into_iter()
        .map(|(id, entry)| (ItemId(id), entry.quantity))
        .collect()
}

fn draft(entries: impl Iterator<Item = (ItemId, u32)>) -> BTreeMap<u64, DraftEntryRecord> {
    entries
        .map(|(id, quantity)| (id.0, DraftEntryRecord { quantity }))
        .collect()
}
