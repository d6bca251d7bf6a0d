//! Membership
//!
//! Snapshot of the caller's membership entitlement, as supplied by the
//! membership source. The session treats it as read-only; replacing it goes
//! through [`crate::session::BasketSession::set_membership`].

use decimal_percentage::Percentage;

/// Membership account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    /// Membership is current; entitlements apply.
    Active,

    /// Lapsed, cancelled or otherwise not in good standing.
    Inactive,
}

/// The entitlements a membership plan grants.
#[derive(Debug, Clone)]
pub struct MembershipPlan {
    /// Whether the plan includes a monthly free-dessert allotment.
    pub includes_free_desserts: bool,

    /// Monthly free-dessert allotment.
    pub free_desserts_quantity: u32,

    /// Free desserts already consumed this month.
    pub free_desserts_used_this_month: u32,

    /// Discount applied to the member's order total.
    pub discount: Percentage,
}

/// A membership record: status plus the plan it grants.
#[derive(Debug, Clone)]
pub struct Membership {
    /// Account status.
    pub status: MembershipStatus,

    /// Granted plan.
    pub plan: MembershipPlan,
}

impl Membership {
    /// Whether the membership is in good standing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }

    /// Free desserts still available this month, clamped non-negative.
    #[must_use]
    pub fn remaining_free_desserts(&self) -> u32 {
        self.plan
            .free_desserts_quantity
            .saturating_sub(self.plan.free_desserts_used_this_month)
    }

    /// Whether free desserts can currently be added at all: active status,
    /// a plan that includes them, and allotment left this month.
    #[must_use]
    pub fn grants_free_desserts(&self) -> bool {
        self.is_active()
            && self.plan.includes_free_desserts
            && self.remaining_free_desserts() > 0
    }
}
