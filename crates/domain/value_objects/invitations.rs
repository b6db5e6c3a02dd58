use serde::Serialize;
use uuid::Uuid;

use crate::domain::value_objects::enums::{
    invitation_statuses::InvitationStatus, role_types::BwRoleType,
};

/// Result of viewing or answering a role invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationOutcome {
    pub business_wall_id: Uuid,
    pub bw_name: String,
    pub bw_type: String,
    pub role_type: BwRoleType,
    pub role_label: &'static str,
    pub status: InvitationStatus,
    /// The invitation was no longer pending when the action arrived.
    pub already_processed: bool,
}

/// Summary of a bulk invitation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvitationBatchReport {
    pub invited: Vec<String>,
    pub already_invited: Vec<String>,
    pub refused: Vec<String>,
}
