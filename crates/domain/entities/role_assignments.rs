use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::{
        invitation_statuses::InvitationStatus, role_types::BwRoleType,
    },
    infra::db::postgres::schema::bw_role_assignments,
};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = bw_role_assignments)]
pub struct RoleAssignmentEntity {
    pub id: Uuid,
    pub business_wall_id: Uuid,
    pub user_id: Uuid,
    pub role_type: String,
    pub invitation_status: String,
    pub invited_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoleAssignmentEntity {
    pub fn role(&self) -> Option<BwRoleType> {
        self.role_type.parse().ok()
    }

    /// Unknown values are treated as expired so they can never be answered.
    pub fn status(&self) -> InvitationStatus {
        InvitationStatus::from_str(&self.invitation_status).unwrap_or(InvitationStatus::Expired)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bw_role_assignments)]
pub struct InsertRoleAssignmentEntity {
    pub business_wall_id: Option<Uuid>,
    pub user_id: Uuid,
    pub role_type: String,
    pub invitation_status: String,
    pub invited_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}
