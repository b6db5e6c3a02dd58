use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BwType {
    Media,
    Micro,
    CorporateMedia,
    Union,
    Academics,
    Pr,
    LeadersExperts,
    Transformers,
}

impl BwType {
    pub const ALL: [BwType; 8] = [
        BwType::Media,
        BwType::Micro,
        BwType::CorporateMedia,
        BwType::Union,
        BwType::Academics,
        BwType::Pr,
        BwType::LeadersExperts,
        BwType::Transformers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BwType::Media => "media",
            BwType::Micro => "micro",
            BwType::CorporateMedia => "corporate_media",
            BwType::Union => "union",
            BwType::Academics => "academics",
            BwType::Pr => "pr",
            BwType::LeadersExperts => "leaders_experts",
            BwType::Transformers => "transformers",
        }
    }

    /// Free types activate without going through the payment provider.
    pub fn is_free(&self) -> bool {
        matches!(
            self,
            BwType::Media
                | BwType::Micro
                | BwType::CorporateMedia
                | BwType::Union
                | BwType::Academics
        )
    }
}

impl Display for BwType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BwType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "media" => Ok(BwType::Media),
            "micro" => Ok(BwType::Micro),
            "corporate_media" => Ok(BwType::CorporateMedia),
            "union" => Ok(BwType::Union),
            "academics" => Ok(BwType::Academics),
            "pr" => Ok(BwType::Pr),
            "leaders_experts" => Ok(BwType::LeadersExperts),
            "transformers" => Ok(BwType::Transformers),
            other => Err(format!("Unknown business wall type: {}", other)),
        }
    }
}
