//! Onboarding progress kept in a signed cookie, bound to the authenticated user.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use base64::{Engine as _, engine::general_purpose};
use cookie::{Cookie, SameSite};
use crates::domain::value_objects::bw_progress::BwProgress;
use tracing::warn;
use uuid::Uuid;

use crate::{
    axum_http::error_responses::AppError,
    usecases::{errors::BusinessWallError, stage_gate::Stage},
};

pub const BW_PROGRESS_COOKIE: &str = "bw_progress";

pub struct ProgressSession {
    jar: SignedCookieJar,
    pub progress: BwProgress,
    secure: bool,
}

impl ProgressSession {
    /// A missing, unreadable or foreign cookie yields a fresh progress.
    pub fn load(jar: SignedCookieJar, user_id: Uuid, secure: bool) -> Self {
        let progress = jar
            .get(BW_PROGRESS_COOKIE)
            .and_then(|cookie| decode_progress(cookie.value()))
            .filter(|progress| progress.belongs_to(user_id))
            .unwrap_or_else(|| BwProgress::for_user(user_id));

        Self {
            jar,
            progress,
            secure,
        }
    }

    pub fn redirect(self, location: &str) -> Response {
        self.respond(Redirect::to(location))
    }

    /// Redirect that keeps the method and body, used to forward a POST.
    pub fn forward(self, location: &str) -> Response {
        self.respond(Redirect::temporary(location))
    }

    pub fn respond(self, body: impl IntoResponse) -> Response {
        match self.into_jar() {
            Ok(jar) => (jar, body).into_response(),
            Err(err) => err.into_response(),
        }
    }

    /// Stores the error token and sends the caller to the not-authorized page.
    pub fn fail(mut self, err: BusinessWallError) -> Response {
        let token = err.error_token();
        match &err {
            BusinessWallError::Internal(cause) => {
                warn!(error = ?cause, %token, "session: request failed with internal error")
            }
            _ => warn!(%token, "session: request refused"),
        }

        self.progress.error = Some(token);
        self.redirect(&Stage::NotAuthorized.location(None))
    }

    fn into_jar(self) -> Result<SignedCookieJar, AppError> {
        let value = encode_progress(&self.progress)?;
        let cookie = Cookie::build((BW_PROGRESS_COOKIE, value))
            .path("/BW")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure);

        Ok(self.jar.add(cookie))
    }
}

fn encode_progress(progress: &BwProgress) -> Result<String, AppError> {
    let json = serde_json::to_vec(progress).map_err(anyhow::Error::from)?;
    Ok(general_purpose::URL_SAFE_NO_PAD.encode(json))
}

fn decode_progress(value: &str) -> Option<BwProgress> {
    let json = general_purpose::URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&json).ok()
}
