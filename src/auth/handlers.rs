use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ForgotPasswordRequest, LoginRequest, LoginResponse, MeResponse, MessageResponse,
            ResetPasswordRequest, SafeUser, SignupRequest, VerifyEmailQuery,
        },
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::User,
        tokens::{self, TokenPurpose},
    },
    email::{
        render_password_reset_email, render_verification_email, PASSWORD_RESET_SUBJECT,
        VERIFICATION_SUBJECT,
    },
    error::ApiError,
    state::AppState,
    validation::{normalize_email, validate_institutional_email},
    wishlist,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/verify-email", get(verify_email))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/resend-verification", post(resend_verification))
        .route("/auth/logout", post(logout))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() || payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Name, email, and password are required".into(),
        ));
    }

    let email = normalize_email(&payload.email);
    validate_institutional_email(&email)?;

    if payload.password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "signup with already registered email");
        return Err(ApiError::Validation("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &name, &email, &hash).await?;

    let secret = tokens::issue(&state.db, user.id, TokenPurpose::EmailVerification).await?;
    send_verification_email(&state, &user, &secret).await;

    info!(user_id = %user.id, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok(
            "Account created successfully. Please check your email to verify your account.",
        )),
    ))
}

#[instrument(skip(state, query))]
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("Verification token is required".into()))?;

    let user_id = tokens::redeem(&state.db, &token, TokenPurpose::EmailVerification)
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid or expired verification token".into()))?;

    if !User::mark_verified(&state.db, user_id).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    info!(user_id = %user_id, "email verified");
    Ok(Json(MessageResponse::ok(
        "Email verified successfully. You can now login.",
    )))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Email and password are required".into()));
    }

    // Unknown email and wrong password must be indistinguishable.
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state).sign_session(&user)?;
    let wishlist = wishlist::repo::product_ids_for_user(&state.db, user.id).await?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".into(),
        token,
        user: SafeUser::from_user(user, wishlist),
    }))
}

#[instrument(skip(state, user))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let wishlist = wishlist::repo::product_ids_for_user(&state.db, user.id).await?;
    Ok(Json(MeResponse {
        success: true,
        user: SafeUser::from_user(user, wishlist),
    }))
}

const FORGOT_PASSWORD_BODY: &str = "If that email is registered, a password reset link has been sent.";

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = normalize_email(&payload.email);
    if email.is_empty() {
        return Err(ApiError::Validation("Email is required".into()));
    }

    // One body for registered and unknown emails alike.
    if let Some(user) = User::find_by_email(&state.db, &email).await? {
        let secret = tokens::issue(&state.db, user.id, TokenPurpose::PasswordReset).await?;
        send_password_reset_email(&state, &user, &secret).await;
        info!(user_id = %user.id, "password reset requested");
    }

    Ok(Json(MessageResponse::ok(FORGOT_PASSWORD_BODY)))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.token.is_empty() || payload.new_password.is_empty() {
        return Err(ApiError::Validation(
            "Token and new password are required".into(),
        ));
    }
    if payload.new_password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }

    let user_id = tokens::redeem(&state.db, &payload.token, TokenPurpose::PasswordReset)
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid or expired reset token".into()))?;

    let hash = hash_password(&payload.new_password)?;
    if !User::update_password(&state.db, user_id, &hash).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    // A successful reset retires every other outstanding reset token.
    tokens::invalidate_for_user(&state.db, user_id, TokenPurpose::PasswordReset).await?;

    info!(user_id = %user_id, "password reset completed");
    Ok(Json(MessageResponse::ok(
        "Password reset successfully. You can now login with your new password.",
    )))
}

#[instrument(skip(state, user))]
pub async fn resend_verification(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .resend_limiter
        .try_acquire(&user.email)
        .map_err(|retry_after| ApiError::RateLimited { retry_after })?;

    if user.is_verified {
        return Err(ApiError::Validation("Email is already verified".into()));
    }

    tokens::invalidate_for_user(&state.db, user.id, TokenPurpose::EmailVerification).await?;
    let secret = tokens::issue(&state.db, user.id, TokenPurpose::EmailVerification).await?;
    send_verification_email(&state, &user, &secret).await;

    info!(user_id = %user.id, "verification email resent");
    Ok(Json(MessageResponse::ok(
        "Verification email sent. Please check your inbox.",
    )))
}

#[instrument(skip(user))]
pub async fn logout(AuthUser(user): AuthUser) -> Json<MessageResponse> {
    // Sessions are stateless; the client discards the token.
    info!(user_id = %user.id, "user logged out");
    Json(MessageResponse::ok("Logged out successfully"))
}

async fn send_verification_email(state: &AppState, user: &User, secret: &str) {
    let link = format!(
        "{}/verify-email?token={}",
        state.config.frontend_url.trim_end_matches('/'),
        secret
    );
    let (html, text) = render_verification_email(&user.name, &link);
    if let Err(e) = state
        .mailer
        .send(&user.email, VERIFICATION_SUBJECT, &html, &text)
        .await
    {
        warn!(error = %e, user_id = %user.id, "failed to send verification email");
    }
}

async fn send_password_reset_email(state: &AppState, user: &User, secret: &str) {
    let link = format!(
        "{}/reset-password?token={}",
        state.config.frontend_url.trim_end_matches('/'),
        secret
    );
    let (html, text) = render_password_reset_email(&user.name, &link);
    if let Err(e) = state
        .mailer
        .send(&user.email, PASSWORD_RESET_SUBJECT, &html, &text)
        .await
    {
        warn!(error = %e, user_id = %user.id, "failed to send password reset email");
    }
}
