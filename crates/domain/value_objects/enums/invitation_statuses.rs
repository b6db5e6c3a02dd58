use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Expired,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvitationAction {
    Accept,
    Reject,
}

/// Result of applying an action to an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationTransition {
    Applied(InvitationStatus),
    AlreadyProcessed(InvitationStatus),
}

impl Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Rejected => "rejected",
            InvitationStatus::Expired => "expired",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(InvitationStatus::Pending),
            "accepted" => Some(InvitationStatus::Accepted),
            "rejected" => Some(InvitationStatus::Rejected),
            "expired" => Some(InvitationStatus::Expired),
            _ => None,
        }
    }

    /// `PENDING -[accept]-> ACCEPTED`, `PENDING -[reject]-> REJECTED`.
    /// Any other source state is left untouched.
    pub fn apply(self, action: InvitationAction) -> InvitationTransition {
        match (self, action) {
            (InvitationStatus::Pending, InvitationAction::Accept) => {
                InvitationTransition::Applied(InvitationStatus::Accepted)
            }
            (InvitationStatus::Pending, InvitationAction::Reject) => {
                InvitationTransition::Applied(InvitationStatus::Rejected)
            }
            (status, _) => InvitationTransition::AlreadyProcessed(status),
        }
    }
}

impl InvitationAction {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "accept" => Some(InvitationAction::Accept),
            "reject" => Some(InvitationAction::Reject),
            _ => None,
        }
    }
}
