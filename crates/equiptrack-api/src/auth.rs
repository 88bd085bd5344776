use crate::{credential, error::Error, AppState};
use axum::{
    extract::{FromRequestParts, State},
    Json,
};
use equiptrack_db::models;
use http::{request::Parts, StatusCode};

/// The authenticated user behind a bearer token. Extraction fails with a
/// single `Unauthorized` outcome whatever the root cause: missing or
/// malformed header, rejected token, unknown subject, inactive account.
pub struct CurrentUser(pub models::User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(Error::Unauthorized("missing bearer token"))?;
        let subject = state
            .signer
            .verify(bearer)
            .map_err(|_| Error::Unauthorized("could not validate credentials"))?;
        let user = state
            .store
            .load_user_by_email(&subject)
            .await?
            .ok_or(Error::Unauthorized("could not validate credentials"))?;
        if !user.is_active {
            return Err(Error::Unauthorized("user is inactive"));
        }
        Ok(CurrentUser(user))
    }
}

#[derive(serde::Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: models::User,
}

fn issue_for(app_state: &AppState, user: &models::User) -> Result<String, Error> {
    app_state.signer.issue(&user.email).map_err(|err| {
        tracing::error!("issuing token: {err}");
        Error::Internal
    })
}

pub mod register {
    use super::*;

    #[derive(serde::Deserialize)]
    pub struct RegistrationForm {
        pub email: String,
        pub full_name: String,
        pub password: String,
        #[serde(default)]
        pub tenant_id: Option<String>,
    }

    pub async fn post(
        State(app_state): State<AppState>,
        Json(form): Json<RegistrationForm>,
    ) -> Result<(StatusCode, Json<TokenResponse>), Error> {
        if !email_address::EmailAddress::is_valid(&form.email) {
            return Err(Error::Validation("email address is not valid".to_owned()));
        }
        if form.password.is_empty() {
            return Err(Error::Validation("password must not be empty".to_owned()));
        }
        let password_hash = credential::hash(&form.password);
        let user = app_state
            .store
            .register_user(form.email, password_hash, form.full_name, form.tenant_id)
            .await
            .map_err(|err| match err {
                equiptrack_db::Error::NotFound => Error::NotFound("tenant"),
                other => other.into(),
            })?;
        let access_token = issue_for(&app_state, &user)?;
        Ok((
            StatusCode::CREATED,
            Json(TokenResponse {
                access_token,
                token_type: "bearer",
                user,
            }),
        ))
    }
}

pub mod login {
    use super::*;

    #[derive(serde::Deserialize)]
    pub struct Credentials {
        pub email: String,
        pub password: String,
    }

    /// Unknown email, wrong password, and inactive account all answer
    /// with the same `Unauthorized` class.
    pub async fn post(
        State(app_state): State<AppState>,
        Json(credentials): Json<Credentials>,
    ) -> Result<Json<TokenResponse>, Error> {
        let user = app_state
            .store
            .load_user_by_email(&credentials.email)
            .await?
            .ok_or(Error::Unauthorized("invalid email or password"))?;
        if !credential::verify(&credentials.password, &user.password_hash) {
            return Err(Error::Unauthorized("invalid email or password"));
        }
        if !user.is_active {
            return Err(Error::Unauthorized("user is inactive"));
        }
        let access_token = issue_for(&app_state, &user)?;
        Ok(Json(TokenResponse {
            access_token,
            token_type: "bearer",
            user,
        }))
    }
}

pub mod me {
    use super::*;

    pub async fn get(CurrentUser(user): CurrentUser) -> Json<models::User> {
        Json(user)
    }
}

pub mod logout {
    use super::*;

    /// Sessions are stateless; the client discards the bearer token.
    pub async fn post() -> Json<serde_json::Value> {
        Json(serde_json::json!({ "message": "session closed" }))
    }
}
