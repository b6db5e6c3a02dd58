//! Row builders shared by the use case tests.

use chrono::Utc;
use crates::domain::{
    entities::{
        business_walls::BusinessWallEntity, organisations::OrganisationEntity,
        role_assignments::RoleAssignmentEntity, users::UserEntity,
    },
    value_objects::{
        enums::{
            bw_statuses::BwStatus, invitation_statuses::InvitationStatus, role_types::BwRoleType,
        },
        users::CurrentUser,
    },
};
use uuid::Uuid;

pub fn business_wall(owner_id: Uuid, organisation_id: Uuid) -> BusinessWallEntity {
    let now = Utc::now();
    BusinessWallEntity {
        id: Uuid::new_v4(),
        bw_type: "media".to_string(),
        status: BwStatus::Active.to_string(),
        is_free: true,
        owner_id,
        payer_id: owner_id,
        organisation_id: Some(organisation_id),
        activated_at: Some(now),
        payer_first_name: "Ada".to_string(),
        payer_last_name: "Lovelace".to_string(),
        payer_email: "ada@x.com".to_string(),
        payer_phone: String::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn role_assignment(
    business_wall_id: Uuid,
    user_id: Uuid,
    role_type: BwRoleType,
    status: InvitationStatus,
) -> RoleAssignmentEntity {
    let now = Utc::now();
    RoleAssignmentEntity {
        id: Uuid::new_v4(),
        business_wall_id,
        user_id,
        role_type: role_type.as_str().to_string(),
        invitation_status: status.as_str().to_string(),
        invited_at: now,
        accepted_at: (status == InvitationStatus::Accepted).then_some(now),
        rejected_at: (status == InvitationStatus::Rejected).then_some(now),
        created_at: now,
        updated_at: now,
    }
}

pub fn organisation(is_auto: bool) -> OrganisationEntity {
    let now = Utc::now();
    OrganisationEntity {
        id: Uuid::new_v4(),
        name: "Le Quotidien".to_string(),
        is_auto,
        created_at: now,
        updated_at: now,
    }
}

pub fn user(email: &str, organisation_id: Option<Uuid>) -> UserEntity {
    let now = Utc::now();
    UserEntity {
        id: Uuid::new_v4(),
        email: email.to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        organisation_id,
        is_manager: false,
        is_leader: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn current_user(organisation_id: Option<Uuid>) -> CurrentUser {
    CurrentUser {
        id: Uuid::new_v4(),
        email: "owner@x.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        organisation_id,
    }
}
