use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Error flag left in the session before redirecting to the not-authorized page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorToken {
    BwNotFound,
    InvitationNotFound,
    WrongValidationLink,
    NotManager,
    UnknownAction,
    NoOrganisation,
    ActivationFailed,
    InternalError,
}

impl ErrorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorToken::BwNotFound => "bw_not_found",
            ErrorToken::InvitationNotFound => "invitation_not_found",
            ErrorToken::WrongValidationLink => "wrong_validation_link",
            ErrorToken::NotManager => "not_manager",
            ErrorToken::UnknownAction => "unknown_action",
            ErrorToken::NoOrganisation => "no_organisation",
            ErrorToken::ActivationFailed => "activation_failed",
            ErrorToken::InternalError => "internal_error",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorToken::BwNotFound => "Ce Business Wall est introuvable.",
            ErrorToken::InvitationNotFound => {
                "Cette invitation est introuvable ou n'est plus valide."
            }
            ErrorToken::WrongValidationLink => "Ce lien de validation ne vous est pas destiné.",
            ErrorToken::NotManager => "Vous n'êtes pas gestionnaire de ce Business Wall.",
            ErrorToken::UnknownAction => "Action inconnue.",
            ErrorToken::NoOrganisation => {
                "Vous devez être rattaché à une organisation pour activer un Business Wall."
            }
            ErrorToken::ActivationFailed => {
                "L'activation du Business Wall a échoué. Veuillez réessayer depuis la désignation des contacts."
            }
            ErrorToken::InternalError => {
                "Une erreur interne est survenue. Veuillez réessayer plus tard."
            }
        }
    }
}

impl Display for ErrorToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shown when the not-authorized page is reached without a token.
pub const DEFAULT_ERROR_MESSAGE: &str = "Vous n'êtes pas autorisé à accéder à cette page.";
