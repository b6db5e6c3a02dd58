use axum::http::StatusCode;
use crates::domain::value_objects::enums::error_tokens::ErrorToken;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusinessWallError {
    #[error("business wall not found")]
    BwNotFound,
    #[error("role invitation not found")]
    InvitationNotFound,
    #[error("invitation belongs to another user")]
    WrongValidationLink,
    #[error("user is not a manager of this business wall")]
    NotManager,
    #[error("unknown action")]
    UnknownAction,
    #[error("user has no organisation")]
    NoOrganisation,
    #[error("organisation already has an active business wall")]
    AlreadyActivated,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BusinessWallError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BusinessWallError::BwNotFound | BusinessWallError::InvitationNotFound => {
                StatusCode::NOT_FOUND
            }
            BusinessWallError::WrongValidationLink | BusinessWallError::NotManager => {
                StatusCode::FORBIDDEN
            }
            BusinessWallError::UnknownAction | BusinessWallError::NoOrganisation => {
                StatusCode::BAD_REQUEST
            }
            BusinessWallError::AlreadyActivated => StatusCode::CONFLICT,
            BusinessWallError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Token stored in the session before redirecting to the error page.
    pub fn error_token(&self) -> ErrorToken {
        match self {
            BusinessWallError::BwNotFound => ErrorToken::BwNotFound,
            BusinessWallError::InvitationNotFound => ErrorToken::InvitationNotFound,
            BusinessWallError::WrongValidationLink => ErrorToken::WrongValidationLink,
            BusinessWallError::NotManager => ErrorToken::NotManager,
            BusinessWallError::UnknownAction => ErrorToken::UnknownAction,
            BusinessWallError::NoOrganisation => ErrorToken::NoOrganisation,
            BusinessWallError::AlreadyActivated => ErrorToken::ActivationFailed,
            BusinessWallError::Internal(_) => ErrorToken::InternalError,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, BusinessWallError>;
