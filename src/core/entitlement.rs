use crate::core::PlanType;
use serde::{Deserialize, Serialize};

pub const MIB: u64 = 1024 * 1024;
pub const FREE_MAX_FILE_BYTES: u64 = 10 * MIB;
pub const PREMIUM_MAX_FILE_BYTES: u64 = 100 * MIB;
pub const FREE_DAILY_LIMIT: u64 = 5;

/// Limits derived from the caller's tier. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub plan: PlanType,
    pub is_premium: bool,
    pub max_file_bytes: u64,
    pub daily_limit: Option<u64>,
    pub show_ads: bool,
}

impl Entitlement {
    pub fn for_plan(plan: PlanType) -> Self {
        let is_premium = plan == PlanType::Premium;
        Self {
            plan,
            is_premium,
            max_file_bytes: max_file_bytes(is_premium),
            daily_limit: (!is_premium).then_some(FREE_DAILY_LIMIT),
            show_ads: !is_premium,
        }
    }

    /// A missing subscription record counts as free.
    pub fn from_subscription(plan: Option<PlanType>) -> Self {
        Self::for_plan(plan.unwrap_or_default())
    }

    pub fn size_limit_label(&self) -> &'static str {
        size_limit_label(self.is_premium)
    }

    pub fn allows_size(&self, size_bytes: u64) -> bool {
        size_bytes <= self.max_file_bytes
    }
}

pub fn max_file_bytes(is_premium: bool) -> u64 {
    if is_premium {
        PREMIUM_MAX_FILE_BYTES
    } else {
        FREE_MAX_FILE_BYTES
    }
}

pub fn size_limit_label(is_premium: bool) -> &'static str {
    if is_premium {
        "100MB"
    } else {
        "10MB"
    }
}
