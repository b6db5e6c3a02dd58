use axum::{
    Form, Json, Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use axum_extra::extract::SignedCookieJar;
use crates::domain::value_objects::enums::{
    invitation_statuses::InvitationAction, role_types::BwRoleType,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::routers::{BwContext, BwState},
    usecases::errors::BusinessWallError,
};

pub fn routes() -> Router<BwState> {
    Router::new().route(
        "/confirm-role-invitation/:business_wall_id/:role_type/:user_id",
        get(show_invitation).post(answer_invitation),
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InvitationAnswerForm {
    pub action: String,
}

/// Path segments of an invitation link.
pub struct InvitationLink {
    pub business_wall_id: Uuid,
    pub role_type: BwRoleType,
    pub user_id: Uuid,
}

impl InvitationLink {
    /// The user segment must name the caller before anything else is read.
    /// Malformed wall or role segments then count as unknown invitations.
    pub fn parse(
        business_wall_id: &str,
        role_type: &str,
        user_id: &str,
        requesting_user_id: Uuid,
    ) -> Result<Self, BusinessWallError> {
        let user_id = Uuid::parse_str(user_id)
            .ok()
            .filter(|user_id| *user_id == requesting_user_id)
            .ok_or(BusinessWallError::WrongValidationLink)?;
        let business_wall_id =
            Uuid::parse_str(business_wall_id).map_err(|_| BusinessWallError::BwNotFound)?;
        let role_type = role_type
            .parse::<BwRoleType>()
            .map_err(|_| BusinessWallError::InvitationNotFound)?;

        Ok(Self {
            business_wall_id,
            role_type,
            user_id,
        })
    }

    pub fn location(&self) -> String {
        format!(
            "/BW/confirm-role-invitation/{}/{}/{}",
            self.business_wall_id, self.role_type, self.user_id
        )
    }
}

pub async fn show_invitation(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Path((business_wall_id, role_type, user_id)): Path<(String, String, String)>,
) -> Response {
    let BwContext { user, session } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    let link = match InvitationLink::parse(&business_wall_id, &role_type, &user_id, user.id) {
        Ok(link) => link,
        Err(err) => return session.fail(err),
    };

    match state
        .invitations
        .respond_to_invitation(link.business_wall_id, link.role_type, link.user_id, user.id, None)
        .await
    {
        Ok(outcome) => session.respond(Json(outcome)),
        Err(err) => session.fail(err),
    }
}

pub async fn answer_invitation(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Path((business_wall_id, role_type, user_id)): Path<(String, String, String)>,
    Form(form): Form<InvitationAnswerForm>,
) -> Response {
    let BwContext { user, session } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    let link = match InvitationLink::parse(&business_wall_id, &role_type, &user_id, user.id) {
        Ok(link) => link,
        Err(err) => return session.fail(err),
    };
    let Some(action) = InvitationAction::from_str(form.action.trim()) else {
        return session.fail(BusinessWallError::UnknownAction);
    };

    match state
        .invitations
        .respond_to_invitation(
            link.business_wall_id,
            link.role_type,
            link.user_id,
            user.id,
            Some(action),
        )
        .await
    {
        Ok(_) => session.redirect(&link.location()),
        Err(err) => session.fail(err),
    }
}
