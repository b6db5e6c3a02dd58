use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::business_walls::BusinessWallEntity,
    value_objects::{
        enums::{bw_statuses::BwStatus, bw_types::BwType, error_tokens::ErrorToken},
        users::ContactDetails,
    },
};

/// Default suggestion for users whose profile gives no hint.
pub const DEFAULT_SUGGESTED_BW_TYPE: BwType = BwType::Media;

/// In-flight onboarding state of one authenticated user.
///
/// Flags only move forward: going back to an earlier step keeps them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BwProgress {
    pub user_id: Option<Uuid>,
    pub bw_type: Option<BwType>,
    pub bw_type_confirmed: bool,
    pub suggested_bw_type: Option<BwType>,
    pub contacts_confirmed: bool,
    pub owner: Option<ContactDetails>,
    pub payer: Option<ContactDetails>,
    pub bw_activated: bool,
    pub error: Option<ErrorToken>,
}

impl BwProgress {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Progress stored for another identity is discarded.
    pub fn belongs_to(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }

    pub fn suggested_or_default(&self) -> BwType {
        self.suggested_bw_type.unwrap_or(DEFAULT_SUGGESTED_BW_TYPE)
    }

    pub fn select_bw_type(&mut self, bw_type: BwType) {
        self.bw_type = Some(bw_type);
        self.bw_type_confirmed = true;
    }

    pub fn confirm_contacts(&mut self, owner: ContactDetails, payer: ContactDetails) {
        self.owner = Some(owner);
        self.payer = Some(payer);
        self.contacts_confirmed = true;
    }

    /// Rebuilds the flags from the organisation's business wall. A wall
    /// that is not active clears the activation flag.
    pub fn restore_from(&mut self, business_wall: &BusinessWallEntity) {
        let active = BwStatus::from_str(&business_wall.status) == Some(BwStatus::Active);
        let Some(bw_type) = business_wall
            .bw_type
            .parse::<BwType>()
            .ok()
            .filter(|_| active)
        else {
            self.bw_activated = false;
            return;
        };

        self.bw_type = Some(bw_type);
        self.suggested_bw_type = Some(bw_type);
        self.bw_type_confirmed = true;
        self.contacts_confirmed = true;
        self.bw_activated = true;
    }

    pub fn take_error(&mut self) -> Option<ErrorToken> {
        self.error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn business_wall(bw_type: &str, status: &str) -> BusinessWallEntity {
        let owner_id = Uuid::new_v4();
        BusinessWallEntity {
            id: Uuid::new_v4(),
            bw_type: bw_type.to_string(),
            status: status.to_string(),
            is_free: true,
            owner_id,
            payer_id: owner_id,
            organisation_id: Some(Uuid::new_v4()),
            activated_at: Some(Utc::now()),
            payer_first_name: String::new(),
            payer_last_name: String::new(),
            payer_email: String::new(),
            payer_phone: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn flags_survive_going_back_to_type_selection() {
        let mut progress = BwProgress::for_user(Uuid::new_v4());
        progress.select_bw_type(BwType::Media);
        progress.confirm_contacts(ContactDetails::default(), ContactDetails::default());

        progress.select_bw_type(BwType::Union);

        assert_eq!(progress.bw_type, Some(BwType::Union));
        assert!(progress.bw_type_confirmed);
        assert!(progress.contacts_confirmed);
    }

    #[test]
    fn restore_from_active_wall_sets_every_flag() {
        let mut progress = BwProgress::default();
        progress.restore_from(&business_wall("academics", "active"));

        assert_eq!(progress.bw_type, Some(BwType::Academics));
        assert!(progress.bw_type_confirmed);
        assert!(progress.contacts_confirmed);
        assert!(progress.bw_activated);
    }

    #[test]
    fn draft_wall_does_not_mark_activation() {
        let mut progress = BwProgress::default();
        progress.restore_from(&business_wall("pr", "draft"));

        assert!(!progress.bw_activated);
        assert_eq!(progress.bw_type, None);
    }

    #[test]
    fn suspended_wall_clears_a_stale_activation() {
        let mut progress = BwProgress::default();
        progress.restore_from(&business_wall("media", "active"));
        assert!(progress.bw_activated);

        progress.restore_from(&business_wall("media", "suspended"));

        assert!(!progress.bw_activated);
        assert!(progress.bw_type_confirmed);
    }

    #[test]
    fn progress_is_bound_to_its_user() {
        let user_id = Uuid::new_v4();
        let progress = BwProgress::for_user(user_id);
        assert!(progress.belongs_to(user_id));
        assert!(!progress.belongs_to(Uuid::new_v4()));
        assert_eq!(progress.suggested_or_default(), BwType::Media);
    }
}
