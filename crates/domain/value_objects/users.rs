use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::users::UserEntity;

/// The authenticated caller, loaded once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organisation_id: Option<Uuid>,
}

impl CurrentUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl From<UserEntity> for CurrentUser {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            organisation_id: value.organisation_id,
        }
    }
}

/// Owner or payer contact as submitted on the nomination form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl ContactDetails {
    pub fn from_user(user: &CurrentUser) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: String::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && self.email.contains('@')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberView {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
}

impl From<&UserEntity> for MemberView {
    fn from(value: &UserEntity) -> Self {
        Self {
            user_id: value.id,
            email: value.email.clone(),
            full_name: format!("{} {}", value.first_name, value.last_name)
                .trim()
                .to_string(),
        }
    }
}
