use axum::{
    Form, Json, Router,
    extract::{Path, State},
    response::Response,
    routing::{get, post},
};
use axum_extra::extract::SignedCookieJar;
use crates::domain::value_objects::{
    business_walls::{ConfirmSubscriptionView, NominateContactsView, PricingView},
    bw_catalogue::{bw_type_info, catalogue},
    bw_progress::DEFAULT_SUGGESTED_BW_TYPE,
    enums::{
        bw_types::BwType,
        error_tokens::{DEFAULT_ERROR_MESSAGE, ErrorToken},
    },
    users::ContactDetails,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    auth::AuthUser,
    axum_http::routers::{BwContext, BwState, gate_redirect},
    usecases::stage_gate::{Stage, first_unmet_stage},
};

pub fn routes() -> Router<BwState> {
    Router::new()
        .route("/", get(start))
        .route(
            "/confirm-subscription",
            get(confirm_subscription).post(choose_subscription),
        )
        .route("/select-subscription/:bw_type", post(select_subscription))
        .route("/nominate-contacts", get(nominate_contacts))
        .route("/submit-contacts", post(submit_contacts))
        .route("/activate-free/:bw_type", get(activate_free))
        .route("/pricing/:bw_type", get(pricing))
        .route("/dashboard", get(dashboard))
        .route("/information", get(information))
        .route("/not-authorized", get(not_authorized))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChooseSubscriptionForm {
    pub bw_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitContactsForm {
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_email: String,
    pub owner_phone: String,
    pub payer_first_name: String,
    pub payer_last_name: String,
    pub payer_email: String,
    pub payer_phone: String,
    pub same_as_owner: Option<String>,
}

impl SubmitContactsForm {
    pub fn owner(&self) -> ContactDetails {
        ContactDetails {
            first_name: self.owner_first_name.trim().to_string(),
            last_name: self.owner_last_name.trim().to_string(),
            email: self.owner_email.trim().to_lowercase(),
            phone: self.owner_phone.trim().to_string(),
        }
    }

    pub fn payer(&self) -> ContactDetails {
        let same_as_owner = matches!(self.same_as_owner.as_deref(), Some("on" | "true" | "1"));
        if same_as_owner {
            return self.owner();
        }

        ContactDetails {
            first_name: self.payer_first_name.trim().to_string(),
            last_name: self.payer_last_name.trim().to_string(),
            email: self.payer_email.trim().to_lowercase(),
            phone: self.payer_phone.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotAuthorizedResponse {
    pub error: Option<ErrorToken>,
    pub message: &'static str,
}

pub async fn start(State(state): State<BwState>, auth: AuthUser, jar: SignedCookieJar) -> Response {
    let BwContext { user, mut session } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    match state.business_walls.current_business_wall(&user).await {
        Err(err) => session.fail(err),
        Ok(Some(business_wall)) if business_wall.owner_id == user.id => {
            session.progress.restore_from(&business_wall);
            info!(
                user_id = %user.id,
                business_wall_id = %business_wall.id,
                "bw_activation: session restored",
            );
            session.redirect(&Stage::Dashboard.location(None))
        }
        Ok(Some(_)) => session.redirect(&Stage::Information.location(None)),
        Ok(None) => {
            if session.progress.suggested_bw_type.is_none() {
                session.progress.suggested_bw_type = Some(DEFAULT_SUGGESTED_BW_TYPE);
            }
            let stage = first_unmet_stage(&session.progress);
            let location = stage.location(session.progress.bw_type);
            session.redirect(&location)
        }
    }
}

pub async fn confirm_subscription(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Response {
    let BwContext { session, .. } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    let view = ConfirmSubscriptionView {
        suggested_bw_type: session.progress.suggested_or_default(),
        catalogue: catalogue(),
    };
    session.respond(Json(view))
}

pub async fn choose_subscription(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Form(form): Form<ChooseSubscriptionForm>,
) -> Response {
    let BwContext { session, .. } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    match form.bw_type.parse::<BwType>() {
        Ok(bw_type) => session.forward(&Stage::SelectSubscription.location(Some(bw_type))),
        Err(_) => session.redirect(&Stage::ConfirmSubscription.location(None)),
    }
}

pub async fn select_subscription(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Path(bw_type): Path<String>,
) -> Response {
    let BwContext { user, mut session } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    let Ok(bw_type) = bw_type.parse::<BwType>() else {
        warn!(user_id = %user.id, %bw_type, "bw_activation: unknown business wall type");
        return session.redirect(&Stage::ConfirmSubscription.location(None));
    };

    session.progress.select_bw_type(bw_type);
    info!(user_id = %user.id, %bw_type, "bw_activation: type selected");
    session.redirect(&Stage::NominateContacts.location(None))
}

pub async fn nominate_contacts(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Response {
    let BwContext { user, session } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    if let Some(location) = gate_redirect(Stage::NominateContacts, &session.progress, false) {
        return session.redirect(&location);
    }
    let Some(bw_type) = session.progress.bw_type else {
        return session.redirect(&Stage::ConfirmSubscription.location(None));
    };

    let owner = session
        .progress
        .owner
        .clone()
        .unwrap_or_else(|| ContactDetails::from_user(&user));
    let payer = session.progress.payer.clone().unwrap_or_else(|| owner.clone());
    let view = NominateContactsView {
        bw_type,
        bw_type_info: bw_type_info(bw_type),
        owner,
        payer,
    };
    session.respond(Json(view))
}

pub async fn submit_contacts(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Form(form): Form<SubmitContactsForm>,
) -> Response {
    let BwContext { user, mut session } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    if let Some(location) = gate_redirect(Stage::SubmitContacts, &session.progress, false) {
        return session.redirect(&location);
    }
    let Some(bw_type) = session.progress.bw_type else {
        return session.redirect(&Stage::ConfirmSubscription.location(None));
    };

    let (owner, payer) = (form.owner(), form.payer());
    if !owner.is_complete() || !payer.is_complete() {
        info!(user_id = %user.id, "bw_activation: incomplete contacts submitted");
        return session.redirect(&Stage::NominateContacts.location(None));
    }

    session.progress.confirm_contacts(owner, payer);
    info!(user_id = %user.id, %bw_type, "bw_activation: contacts confirmed");

    let next = if bw_type.is_free() {
        Stage::ActivateFree
    } else {
        Stage::Pay
    };
    session.redirect(&next.location(Some(bw_type)))
}

pub async fn activate_free(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Path(bw_type): Path<String>,
) -> Response {
    let BwContext { user, mut session } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    let Ok(bw_type) = bw_type.parse::<BwType>() else {
        return session.redirect(&Stage::ConfirmSubscription.location(None));
    };
    if let Some(location) = gate_redirect(Stage::ActivateFree, &session.progress, false) {
        return session.redirect(&location);
    }
    if session.progress.bw_type != Some(bw_type) {
        warn!(user_id = %user.id, %bw_type, "bw_activation: type differs from the selected one");
        return session.redirect(&Stage::ConfirmSubscription.location(None));
    }
    if !bw_type.is_free() {
        return session.redirect(&Stage::Pay.location(Some(bw_type)));
    }
    if session.progress.bw_activated {
        return session.redirect(&Stage::Dashboard.location(None));
    }

    session.progress.bw_activated = true;
    match state.activation.activate_free(&session.progress, &user).await {
        Ok(true) => session.redirect(&Stage::Dashboard.location(None)),
        Ok(false) => {
            session.progress.bw_activated = false;
            session.redirect(&Stage::ConfirmSubscription.location(None))
        }
        Err(err) => {
            session.progress.bw_activated = false;
            session.fail(err)
        }
    }
}

pub async fn pricing(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Path(bw_type): Path<String>,
) -> Response {
    let BwContext { session, .. } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    let Ok(bw_type) = bw_type.parse::<BwType>() else {
        return session.redirect(&Stage::ConfirmSubscription.location(None));
    };
    if let Some(location) = gate_redirect(Stage::Pay, &session.progress, false) {
        return session.redirect(&location);
    }
    if bw_type.is_free() {
        return session.redirect(&Stage::ActivateFree.location(Some(bw_type)));
    }

    session.respond(Json(PricingView {
        bw_type,
        bw_type_info: bw_type_info(bw_type),
    }))
}

pub async fn dashboard(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Response {
    business_wall_page(state, auth, jar, Stage::Dashboard).await
}

pub async fn information(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Response {
    business_wall_page(state, auth, jar, Stage::Information).await
}

async fn business_wall_page(
    state: BwState,
    auth: AuthUser,
    jar: SignedCookieJar,
    stage: Stage,
) -> Response {
    let BwContext { user, session } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    let business_wall = match state.business_walls.current_business_wall(&user).await {
        Ok(business_wall) => business_wall,
        Err(err) => return session.fail(err),
    };
    if let Some(location) = gate_redirect(stage, &session.progress, business_wall.is_some()) {
        return session.redirect(&location);
    }
    let Some(business_wall) = business_wall else {
        return session.redirect(&Stage::ConfirmSubscription.location(None));
    };

    match state.business_walls.business_wall_view(business_wall, &user).await {
        Ok(view) => session.respond(Json(view)),
        Err(err) => session.fail(err),
    }
}

pub async fn not_authorized(
    State(state): State<BwState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Response {
    let BwContext { mut session, .. } = match state.context(&auth, jar).await {
        Ok(context) => context,
        Err(response) => return response,
    };

    let error = session.progress.take_error();
    let message = error.map(|token| token.message()).unwrap_or(DEFAULT_ERROR_MESSAGE);
    session.respond(Json(NotAuthorizedResponse { error, message }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        axum_http::routers::test_support::{Browser, MockStores, json, location},
        usecases::test_support::user,
    };
    use crates::infra::db::postgres::postgres_connection::unique_violation;
    use uuid::Uuid;

    const CONTACTS: &str = "owner_first_name=Ada&owner_last_name=Lovelace\
        &owner_email=ada%40x.com&owner_phone=0102030405&same_as_owner=on";

    fn signed_in(stores: &mut MockStores) -> Uuid {
        let member = user("ada@x.com", Some(Uuid::new_v4()));
        let user_id = member.id;
        stores
            .users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(member.clone())));
        user_id
    }

    fn form(same_as_owner: Option<&str>) -> SubmitContactsForm {
        SubmitContactsForm {
            owner_first_name: " Ada ".to_string(),
            owner_last_name: "Lovelace".to_string(),
            owner_email: "Ada@X.com".to_string(),
            owner_phone: "0102030405".to_string(),
            payer_first_name: "Grace".to_string(),
            payer_last_name: "Hopper".to_string(),
            payer_email: "grace@x.com".to_string(),
            payer_phone: String::new(),
            same_as_owner: same_as_owner.map(str::to_string),
        }
    }

    #[test]
    fn owner_fields_are_normalised() {
        let owner = form(None).owner();
        assert_eq!(owner.first_name, "Ada");
        assert_eq!(owner.email, "ada@x.com");
        assert!(owner.is_complete());
    }

    #[test]
    fn same_as_owner_copies_the_owner() {
        assert_eq!(form(Some("on")).payer(), form(None).owner());
        assert_eq!(form(None).payer().first_name, "Grace");
        assert_eq!(form(Some("off")).payer().first_name, "Grace");
    }

    #[test]
    fn empty_form_is_incomplete() {
        let empty = SubmitContactsForm::default();
        assert!(!empty.owner().is_complete());
        assert!(!empty.payer().is_complete());
    }

    #[tokio::test]
    async fn free_onboarding_ends_on_the_dashboard() {
        let mut stores = MockStores::default();
        let user_id = signed_in(&mut stores);
        stores
            .business_walls
            .expect_find_current_by_organisation()
            .times(1)
            .returning(|_| Ok(None));
        stores
            .business_walls
            .expect_create_free_business_wall()
            .withf(move |business_wall, _, owner_role| {
                business_wall.bw_type == "media"
                    && business_wall.owner_id == user_id
                    && owner_role.user_id == user_id
            })
            .times(1)
            .returning(|_, _, _| Ok(Uuid::new_v4()));
        let mut browser = Browser::new(stores.into_app(), user_id);

        let response = browser.post_form("/BW/select-subscription/media", "").await;
        assert_eq!(location(&response), "/BW/nominate-contacts");

        let response = browser.post_form("/BW/submit-contacts", CONTACTS).await;
        assert_eq!(location(&response), "/BW/activate-free/media");

        let response = browser.get("/BW/activate-free/media").await;
        assert_eq!(location(&response), "/BW/dashboard");

        // Already activated: straight to the dashboard, nothing written twice.
        let response = browser.get("/BW/activate-free/media").await;
        assert_eq!(location(&response), "/BW/dashboard");
    }

    #[tokio::test]
    async fn activation_without_contacts_goes_back_to_nomination() {
        let mut stores = MockStores::default();
        let user_id = signed_in(&mut stores);
        stores.business_walls.expect_create_free_business_wall().times(0);
        let mut browser = Browser::new(stores.into_app(), user_id);

        browser.post_form("/BW/select-subscription/media", "").await;
        let response = browser.get("/BW/activate-free/media").await;

        assert_eq!(location(&response), "/BW/nominate-contacts");
    }

    #[tokio::test]
    async fn failed_activation_leaves_the_flag_unset() {
        let mut stores = MockStores::default();
        let user_id = signed_in(&mut stores);
        stores
            .business_walls
            .expect_find_current_by_organisation()
            .times(2)
            .returning(|_| Ok(None));
        stores
            .business_walls
            .expect_create_free_business_wall()
            .times(2)
            .returning(|_, _, _| {
                Err(unique_violation(
                    "business_walls_one_active_per_organisation",
                ))
            });
        let mut browser = Browser::new(stores.into_app(), user_id);

        browser.post_form("/BW/select-subscription/union", "").await;
        browser.post_form("/BW/submit-contacts", CONTACTS).await;

        let response = browser.get("/BW/activate-free/union").await;
        assert_eq!(location(&response), "/BW/not-authorized");

        let body = json(browser.get("/BW/not-authorized").await).await;
        assert_eq!(body["error"], "activation_failed");

        // The retry reaches the store again instead of the dashboard.
        let response = browser.get("/BW/activate-free/union").await;
        assert_eq!(location(&response), "/BW/not-authorized");
    }
}
