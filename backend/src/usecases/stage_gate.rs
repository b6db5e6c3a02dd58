//! Linear gate of the onboarding wizard.
//!
//! The gate only reads the session progress; it never mutates it.

use crates::domain::value_objects::{bw_progress::BwProgress, enums::bw_types::BwType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ConfirmSubscription,
    SelectSubscription,
    NominateContacts,
    SubmitContacts,
    ActivateFree,
    Pay,
    Dashboard,
    Information,
    InviteOrgMembers,
    ManageOrgMembers,
    ManageInternalRoles,
    ManageExternalPartners,
    AssignMissions,
    ConfigureContent,
    NotAuthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    RedirectTo(Stage),
}

impl Stage {
    /// The six management stages (B1 to B6).
    pub const MANAGEMENT: [Stage; 6] = [
        Stage::InviteOrgMembers,
        Stage::ManageOrgMembers,
        Stage::ManageInternalRoles,
        Stage::ManageExternalPartners,
        Stage::AssignMissions,
        Stage::ConfigureContent,
    ];

    pub fn is_management(&self) -> bool {
        Stage::MANAGEMENT.contains(self)
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Stage::Start => "",
            Stage::ConfirmSubscription => "confirm-subscription",
            Stage::SelectSubscription => "select-subscription",
            Stage::NominateContacts => "nominate-contacts",
            Stage::SubmitContacts => "submit-contacts",
            Stage::ActivateFree => "activate-free",
            Stage::Pay => "pricing",
            Stage::Dashboard => "dashboard",
            Stage::Information => "information",
            Stage::InviteOrgMembers => "invite-organisation-members",
            Stage::ManageOrgMembers => "manage-organisation-members",
            Stage::ManageInternalRoles => "manage-internal-roles",
            Stage::ManageExternalPartners => "manage-external-partners",
            Stage::AssignMissions => "assign-missions",
            Stage::ConfigureContent => "configure-content",
            Stage::NotAuthorized => "not-authorized",
        }
    }

    /// Absolute path of the stage. Stages keyed by type fall back to the
    /// type selection when no type is known.
    pub fn location(&self, bw_type: Option<BwType>) -> String {
        match (self, bw_type) {
            (Stage::SelectSubscription | Stage::ActivateFree | Stage::Pay, Some(bw_type)) => {
                format!("/BW/{}/{}", self.slug(), bw_type)
            }
            (Stage::SelectSubscription | Stage::ActivateFree | Stage::Pay, None) => {
                Stage::ConfirmSubscription.location(None)
            }
            (Stage::Start, _) => "/BW/".to_string(),
            _ => format!("/BW/{}", self.slug()),
        }
    }
}

/// Decides whether `stage` may be entered with the given progress.
///
/// `bw_exists` tells whether the caller's organisation already has a
/// business wall.
pub fn can_enter(stage: Stage, progress: &BwProgress, bw_exists: bool) -> GateDecision {
    use GateDecision::{Allowed, RedirectTo};

    match stage {
        Stage::Start
        | Stage::ConfirmSubscription
        | Stage::SelectSubscription
        | Stage::NotAuthorized => Allowed,
        Stage::NominateContacts | Stage::SubmitContacts => {
            if progress.bw_type_confirmed {
                Allowed
            } else {
                RedirectTo(Stage::ConfirmSubscription)
            }
        }
        Stage::ActivateFree | Stage::Pay => {
            if progress.contacts_confirmed {
                Allowed
            } else {
                RedirectTo(Stage::NominateContacts)
            }
        }
        Stage::Dashboard | Stage::Information => {
            if bw_exists {
                Allowed
            } else {
                RedirectTo(Stage::ConfirmSubscription)
            }
        }
        Stage::InviteOrgMembers
        | Stage::ManageOrgMembers
        | Stage::ManageInternalRoles
        | Stage::ManageExternalPartners
        | Stage::AssignMissions
        | Stage::ConfigureContent => {
            if progress.bw_activated {
                Allowed
            } else if bw_exists {
                RedirectTo(Stage::Dashboard)
            } else {
                RedirectTo(Stage::NotAuthorized)
            }
        }
    }
}

/// Where `GET /BW/` sends a caller without an existing business wall.
pub fn first_unmet_stage(progress: &BwProgress) -> Stage {
    if progress.bw_activated {
        return Stage::Dashboard;
    }
    if !progress.bw_type_confirmed {
        return Stage::ConfirmSubscription;
    }
    if !progress.contacts_confirmed {
        return Stage::NominateContacts;
    }
    match progress.bw_type {
        Some(bw_type) if bw_type.is_free() => Stage::ActivateFree,
        Some(_) => Stage::Pay,
        None => Stage::ConfirmSubscription,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(type_confirmed: bool, contacts: bool, activated: bool) -> BwProgress {
        BwProgress {
            bw_type: type_confirmed.then_some(BwType::Media),
            bw_type_confirmed: type_confirmed,
            contacts_confirmed: contacts,
            bw_activated: activated,
            ..BwProgress::default()
        }
    }

    #[test]
    fn nominate_contacts_requires_a_confirmed_type() {
        assert_eq!(
            can_enter(Stage::NominateContacts, &progress(false, false, false), false),
            GateDecision::RedirectTo(Stage::ConfirmSubscription)
        );
        assert_eq!(
            can_enter(Stage::NominateContacts, &progress(true, false, false), false),
            GateDecision::Allowed
        );
    }

    #[test]
    fn activation_requires_confirmed_contacts() {
        assert_eq!(
            can_enter(Stage::ActivateFree, &progress(true, false, false), false),
            GateDecision::RedirectTo(Stage::NominateContacts)
        );
        assert_eq!(
            can_enter(Stage::Pay, &progress(true, false, false), false),
            GateDecision::RedirectTo(Stage::NominateContacts)
        );
        assert_eq!(
            can_enter(Stage::ActivateFree, &progress(true, true, false), false),
            GateDecision::Allowed
        );
    }

    #[test]
    fn management_stages_require_activation() {
        for stage in Stage::MANAGEMENT {
            assert_eq!(
                can_enter(stage, &progress(true, true, false), true),
                GateDecision::RedirectTo(Stage::Dashboard),
                "{stage:?}"
            );
            assert_eq!(
                can_enter(stage, &progress(true, true, false), false),
                GateDecision::RedirectTo(Stage::NotAuthorized),
                "{stage:?}"
            );
            assert_eq!(
                can_enter(stage, &progress(true, true, true), true),
                GateDecision::Allowed,
                "{stage:?}"
            );
        }
    }

    #[test]
    fn confirm_subscription_is_always_allowed() {
        assert_eq!(
            can_enter(Stage::ConfirmSubscription, &BwProgress::default(), false),
            GateDecision::Allowed
        );
    }

    #[test]
    fn first_unmet_stage_follows_the_wizard_order() {
        assert_eq!(first_unmet_stage(&progress(false, false, false)), Stage::ConfirmSubscription);
        assert_eq!(first_unmet_stage(&progress(true, false, false)), Stage::NominateContacts);
        assert_eq!(first_unmet_stage(&progress(true, true, false)), Stage::ActivateFree);
        assert_eq!(first_unmet_stage(&progress(true, true, true)), Stage::Dashboard);

        let mut paid = progress(true, true, false);
        paid.bw_type = Some(BwType::Pr);
        assert_eq!(first_unmet_stage(&paid), Stage::Pay);
    }

    #[test]
    fn typed_locations_include_the_type() {
        assert_eq!(
            Stage::ActivateFree.location(Some(BwType::CorporateMedia)),
            "/BW/activate-free/corporate_media"
        );
        assert_eq!(Stage::Pay.location(Some(BwType::Pr)), "/BW/pricing/pr");
        assert_eq!(Stage::ActivateFree.location(None), "/BW/confirm-subscription");
        assert_eq!(Stage::Start.location(None), "/BW/");
        assert_eq!(Stage::ManageInternalRoles.location(None), "/BW/manage-internal-roles");
    }
}
