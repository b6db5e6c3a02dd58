use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BwStatus {
    #[default]
    Draft,
    Active,
    Suspended,
}

impl Display for BwStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            BwStatus::Draft => "draft",
            BwStatus::Active => "active",
            BwStatus::Suspended => "suspended",
        };
        write!(f, "{}", status)
    }
}

impl BwStatus {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(BwStatus::Draft),
            "active" => Some(BwStatus::Active),
            "suspended" => Some(BwStatus::Suspended),
            _ => None,
        }
    }

    /// Business walls are never deleted: DRAFT -> ACTIVE -> SUSPENDED.
    pub fn can_transition_to(&self, next: BwStatus) -> bool {
        matches!(
            (self, next),
            (BwStatus::Draft, BwStatus::Active) | (BwStatus::Active, BwStatus::Suspended)
        )
    }
}
