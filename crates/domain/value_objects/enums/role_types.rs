use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Governance roles on a business wall. The wire codes match the stored values
/// and the segment used in invitation links.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BwRoleType {
    #[serde(rename = "BW_OWNER")]
    BwOwner,
    #[serde(rename = "BWMi")]
    Bwmi,
    #[serde(rename = "BWPRi")]
    Bwpri,
}

impl BwRoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BwRoleType::BwOwner => "BW_OWNER",
            BwRoleType::Bwmi => "BWMi",
            BwRoleType::Bwpri => "BWPRi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BwRoleType::BwOwner => "Propriétaire du Business Wall",
            BwRoleType::Bwmi => "Business Wall Manager interne",
            BwRoleType::Bwpri => "PR Manager interne",
        }
    }

    /// Roles that must go through the invitation round-trip.
    pub fn is_invitable(&self) -> bool {
        !matches!(self, BwRoleType::BwOwner)
    }
}

impl Display for BwRoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BwRoleType {
    type Err = String;

    /// Case-insensitive: links written as `BWMI` are accepted too.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "BW_OWNER" => Ok(BwRoleType::BwOwner),
            "BWMI" => Ok(BwRoleType::Bwmi),
            "BWPRI" => Ok(BwRoleType::Bwpri),
            other => Err(format!("Unknown role type: {}", other)),
        }
    }
}
