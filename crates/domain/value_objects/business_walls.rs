use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    entities::business_walls::BusinessWallEntity,
    value_objects::{
        bw_catalogue::BwTypeInfo,
        enums::{bw_types::BwType, invitation_statuses::InvitationStatus},
        users::{ContactDetails, MemberView},
    },
};

/// Name shown when the organisation behind a business wall is gone.
pub const UNKNOWN_BW_NAME: &str = "(Nom inconnu)";

#[derive(Debug, Clone, Serialize)]
pub struct BusinessWallView {
    pub id: Uuid,
    pub name: String,
    pub bw_type: String,
    pub status: String,
    pub is_free: bool,
    pub owner_id: Uuid,
    pub payer_id: Uuid,
    pub organisation_id: Option<Uuid>,
    pub activated_at: Option<DateTime<Utc>>,
    pub is_owner: bool,
    pub is_manager: bool,
}

impl BusinessWallView {
    pub fn new(entity: BusinessWallEntity, name: String, is_owner: bool, is_manager: bool) -> Self {
        Self {
            id: entity.id,
            name,
            bw_type: entity.bw_type,
            status: entity.status,
            is_free: entity.is_free,
            owner_id: entity.owner_id,
            payer_id: entity.payer_id,
            organisation_id: entity.organisation_id,
            activated_at: entity.activated_at,
            is_owner,
            is_manager,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmSubscriptionView {
    pub suggested_bw_type: BwType,
    pub catalogue: Vec<BwTypeInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NominateContactsView {
    pub bw_type: BwType,
    pub bw_type_info: BwTypeInfo,
    pub owner: ContactDetails,
    pub payer: ContactDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct PricingView {
    pub bw_type: BwType,
    pub bw_type_info: BwTypeInfo,
}

/// Internal governance roles of one business wall.
#[derive(Debug, Clone, Serialize)]
pub struct InternalRolesView {
    pub business_wall_id: Uuid,
    pub owner: Option<MemberView>,
    pub bwmi_members: Vec<MemberView>,
    pub bwpri_members: Vec<MemberView>,
    pub bwmi_pending: Vec<PendingInvitationView>,
    pub bwpri_pending: Vec<PendingInvitationView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingInvitationView {
    pub email: String,
    pub status: InvitationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganisationMembersView {
    pub business_wall_id: Uuid,
    pub organisation_id: Uuid,
    pub members: Vec<MemberView>,
}

/// Management stage placeholder payload for stages without their own data yet.
#[derive(Debug, Clone, Serialize)]
pub struct ManagementStageView {
    pub business_wall_id: Uuid,
    pub stage: &'static str,
    pub is_manager: bool,
}
