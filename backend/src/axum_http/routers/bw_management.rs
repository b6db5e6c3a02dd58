use axum::{
    Form, Json, Router,
    extract::State,
    response::Response,
    routing::get,
};
use axum_extra::extract::SignedCookieJar;
use crates::domain::{
    entities::business_walls::BusinessWallEntity,
    value_objects::{business_walls::ManagementStageView, enums::role_types::BwRoleType},
};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::AuthUser,
    axum_http::routers::{BwContext, BwState, gate_redirect},
    usecases::{errors::BusinessWallError, stage_gate::Stage},
};

pub fn routes() -> Router<BwState> {
    Router::new()
        .route(
            "/manage-internal-roles",
            get(internal_roles).post(change_internal_roles),
        )
        .route(
            "/manage-organisation-members",
            get(organisation_members).post(change_organisation_members),
        )
        .route("/invite-organisation-members", get(invite_organisation_members))
        .route("/manage-external-partners", get(manage_external_partners))
        .route("/assign-missions", get(assign_missions))
        .route("/configure-content", get(configure_content))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManagementActionForm {
    pub action: String,
    pub emails: String,
}

/// Role targeted by a manage-internal-roles action.
pub fn invitation_role(action: &str) -> Option<BwRoleType> {
    match action {
        "change_bwmi_invitations" => Some(BwRoleType::Bwmi),
        "change_bwpri_invitations" => Some(BwRoleType::Bwpri),
        _ => None,
    }
}

/// Restores the progress from the organisation's wall, then checks the
/// caller is a manager and the stage is open.
async fn enter(
    state: &BwState,
    auth: AuthUser,
    jar: SignedCookieJar,
    stage: Stage,
) -> Result<(BwContext, BusinessWallEntity), Response> {
    let BwContext { user, mut session } = state.context(&auth, jar).await?;

    let business_wall = match state.business_walls.current_business_wall(&user).await {
        Ok(Some(business_wall)) => business_wall,
        Ok(None) => return Err(session.fail(BusinessWallError::BwNotFound)),
        Err(err) => return Err(session.fail(err)),
    };

    session.progress.restore_from(&business_wall);

    if let Err(err) = state.business_walls.ensure_manager(&business_wall, user.id).await {
        return Err(session.fail(err));
    }
    if let Some(location) = gate_redirect(stage, &session.progress, true) {
        return Err(session.redirect(&location));
    }

    Ok((BwContext { user, session }, business_wall))
}

pub async fn internal_roles(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Response {
    let (BwContext { session, .. }, business_wall) =
        match enter(&state, auth, jar, Stage::ManageInternalRoles).await {
            Ok(entered) => entered,
            Err(response) => return response,
        };

    match state.invitations.internal_roles_view(&business_wall).await {
        Ok(view) => session.respond(Json(view)),
        Err(err) => session.fail(err),
    }
}

pub async fn change_internal_roles(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Form(form): Form<ManagementActionForm>,
) -> Response {
    let (BwContext { user, session }, business_wall) =
        match enter(&state, auth, jar, Stage::ManageInternalRoles).await {
            Ok(entered) => entered,
            Err(response) => return response,
        };

    let Some(role_type) = invitation_role(&form.action) else {
        return session.fail(BusinessWallError::UnknownAction);
    };

    match state
        .invitations
        .invite_internal_role(&business_wall, &form.emails, role_type, &user)
        .await
    {
        Ok(report) => {
            info!(
                business_wall_id = %business_wall.id,
                %role_type,
                invited = report.invited.len(),
                already_invited = report.already_invited.len(),
                refused = report.refused.len(),
                "bw_management: internal role invitations processed"
            );
            session.redirect(&Stage::ManageInternalRoles.location(None))
        }
        Err(err) => session.fail(err),
    }
}

pub async fn organisation_members(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Response {
    let (BwContext { session, .. }, business_wall) =
        match enter(&state, auth, jar, Stage::ManageOrgMembers).await {
            Ok(entered) => entered,
            Err(response) => return response,
        };

    match state.business_walls.organisation_members_view(&business_wall).await {
        Ok(view) => session.respond(Json(view)),
        Err(err) => session.fail(err),
    }
}

pub async fn change_organisation_members(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Form(form): Form<ManagementActionForm>,
) -> Response {
    let (BwContext { session, .. }, business_wall) =
        match enter(&state, auth, jar, Stage::ManageOrgMembers).await {
            Ok(entered) => entered,
            Err(response) => return response,
        };

    if form.action != "change_emails" {
        return session.fail(BusinessWallError::UnknownAction);
    }

    match state
        .business_walls
        .change_members_emails(&business_wall, &form.emails)
        .await
    {
        Ok(removed) => {
            info!(
                business_wall_id = %business_wall.id,
                removed = removed.len(),
                "bw_management: members updated",
            );
            session.redirect(&Stage::ManageOrgMembers.location(None))
        }
        Err(err) => session.fail(err),
    }
}

pub async fn invite_organisation_members(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Response {
    management_stage(state, auth, jar, Stage::InviteOrgMembers).await
}

pub async fn manage_external_partners(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Response {
    management_stage(state, auth, jar, Stage::ManageExternalPartners).await
}

pub async fn assign_missions(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Response {
    management_stage(state, auth, jar, Stage::AssignMissions).await
}

pub async fn configure_content(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Response {
    management_stage(state, auth, jar, Stage::ConfigureContent).await
}

async fn management_stage(
    state: BwState,
    auth: AuthUser,
    jar: SignedCookieJar,
    stage: Stage,
) -> Response {
    let (BwContext { session, .. }, business_wall) = match enter(&state, auth, jar, stage).await {
        Ok(entered) => entered,
        Err(response) => return response,
    };

    session.respond(Json(ManagementStageView {
        business_wall_id: business_wall.id,
        stage: stage.slug(),
        is_manager: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_known_actions_target_a_role() {
        assert_eq!(invitation_role("change_bwmi_invitations"), Some(BwRoleType::Bwmi));
        assert_eq!(invitation_role("change_bwpri_invitations"), Some(BwRoleType::Bwpri));
        assert_eq!(invitation_role("change_owner"), None);
        assert_eq!(invitation_role(""), None);
    }
}
