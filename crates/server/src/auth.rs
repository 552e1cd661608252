//! Registration, OTP verification, login and SSO endpoints.

use api_types::{
    Envelope,
    user::{AuthData, LoginRequest, OtpVerifyRequest, RegisterRequest, SsoData, TokenClaims, UserView},
};
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    ServerError,
    server::{ServerState, bearer_token},
    views,
};
use engine::{RegisterUserCmd, Role, SsoUserCmd};

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<UserView>>), ServerError> {
    let (user, otp) = state
        .engine
        .register_user(RegisterUserCmd::new(
            payload.email,
            payload.first_name,
            payload.last_name,
            payload.password,
        ))
        .await?;

    // The account still works if the mail bounces; the code can be
    // redelivered by support.
    match &state.integrations.mail {
        Some(mailer) => {
            if let Err(err) = mailer.send_otp(&user.email, &otp).await {
                tracing::warn!("failed to mail verification code to {}: {err}", user.email);
            }
        }
        None => tracing::warn!(
            "mail is not configured; verification code for {} was not sent",
            user.email
        ),
    }

    Ok((
        StatusCode::CREATED,
        Json(Envelope::message_data(
            "registered; check your email for the verification code",
            views::user_view(&user),
        )),
    ))
}

pub async fn verify_otp(
    State(state): State<ServerState>,
    Json(payload): Json<OtpVerifyRequest>,
) -> Result<Json<Envelope<UserView>>, ServerError> {
    let user = state.engine.verify_otp(&payload.email, &payload.otp).await?;

    Ok(Json(Envelope::message_data(
        "email verified",
        views::user_view(&user),
    )))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Envelope<AuthData>>, ServerError> {
    let user = state
        .engine
        .login_user(&payload.email, &payload.password)
        .await?;
    let token = state.auth.issue_token(&user)?;

    Ok(Json(Envelope::data(AuthData {
        token,
        user: views::user_view(&user),
    })))
}

/// Accepts a token signed by the origin SSO with the shared secret and
/// mirrors the account locally.
pub async fn sso(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<SsoData>>, ServerError> {
    let token = bearer_token(&auth_header)?;
    let claims = state.auth.decode_claims(token)?;

    let mut cmd = SsoUserCmd::new(claims.email.clone());
    if let Some(first_name) = &claims.first_name {
        cmd = cmd.first_name(first_name.clone());
    }
    if let Some(last_name) = &claims.last_name {
        cmd = cmd.last_name(last_name.clone());
    }
    if let Some(avatar) = &claims.avatar {
        cmd = cmd.avatar(avatar.clone());
    }
    if let Some(role) = claims.role.as_deref() {
        cmd = cmd.role(Role::try_from(role)?);
    }
    let user = state.engine.upsert_sso_user(cmd).await?;

    Ok(Json(Envelope::data(SsoData {
        claims,
        user: views::user_view(&user),
    })))
}

/// Decodes the presented bearer token without touching the database.
pub async fn verify(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<TokenClaims>>, ServerError> {
    let token = bearer_token(&auth_header)?;
    let claims = state.auth.decode_claims(token)?;

    Ok(Json(Envelope::data(claims)))
}
