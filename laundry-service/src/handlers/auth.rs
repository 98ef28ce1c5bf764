use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use service_core::error::AppError;

use crate::{
    dtos::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    middleware::AuthUser,
    models::{User, UserResponse},
    services::is_duplicate_key,
    utils::{hash_password, verify_credentials, JsonBody, Password, PasswordHashString, ValidatedJson},
    AppState,
};

/// Exchange username and password for a bearer token.
///
/// Unknown user and wrong password give the same 401.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let users = state.repository::<User>();
    let user = users
        .find_one(doc! { "username": &payload.username })
        .await?;

    let password = Password::new(payload.password);
    let stored = user
        .as_ref()
        .map(|u| PasswordHashString::new(u.password.clone()));
    let legacy_hash = stored.as_ref().map_or(false, PasswordHashString::is_legacy);

    // Runs for unknown users too.
    let candidate = password.clone();
    let verified =
        tokio::task::spawn_blocking(move || verify_credentials(&candidate, stored.as_ref()))
            .await
            .map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("Password check panicked: {}", e))
            })?;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::warn!(username = %payload.username, "Failed login attempt");
            return Err(AppError::unauthorized("Invalid credentials"));
        }
    };

    if legacy_hash {
        if let Some(id) = user.id {
            upgrade_password_hash(&state, id, password).await;
        }
    }

    let user_id = user.id.map(|id| id.to_hex()).unwrap_or_default();
    let token = state
        .jwt
        .generate_token(&user_id, &user.username, user.role)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to generate token");
            AppError::InternalError(anyhow::anyhow!("Failed to generate token"))
        })?;

    tracing::info!(user_id = %user_id, username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: UserResponse::from(user).into(),
    }))
}

/// Replace a verified bcrypt hash with Argon2. Failure leaves the old hash usable.
async fn upgrade_password_hash(state: &AppState, id: ObjectId, password: Password) {
    let hashed = match tokio::task::spawn_blocking(move || hash_password(&password)).await {
        Ok(Ok(hash)) => hash,
        Ok(Err(e)) => {
            tracing::warn!(user_id = %id, error = %e, "Failed to rehash legacy password");
            return;
        }
        Err(e) => {
            tracing::warn!(user_id = %id, error = %e, "Password rehash task failed");
            return;
        }
    };

    match state
        .repository::<User>()
        .update_fields(id, doc! { "password": hashed.into_string() })
        .await
    {
        Ok(_) => tracing::info!(user_id = %id, "Upgraded legacy password hash"),
        Err(e) => tracing::warn!(user_id = %id, error = %e, "Failed to store rehashed password"),
    }
}

/// Create a user account. Admin only.
pub async fn register(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let users = state.repository::<User>();

    // Racy under concurrent registrations; the unique index on `username` is the backstop.
    if users.exists(doc! { "username": &payload.username }).await? {
        return Err(AppError::bad_request("Username already exists"));
    }

    let password = Password::new(payload.password);
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Password hashing panicked: {}", e)))?
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to hash password");
            AppError::InternalError(anyhow::anyhow!("Failed to hash password"))
        })?;

    let mut user = User {
        id: None,
        username: payload.username,
        password: password_hash.into_string(),
        role: payload.role,
        phone: payload.phone,
        address: payload.address,
        salary: payload.salary,
        salary_date: None,
        hired_date: mongodb::bson::DateTime::from_chrono(Utc::now()),
    };

    let id = users.insert(&mut user).await.map_err(|e| {
        if is_duplicate_key(&e) {
            AppError::bad_request("Username already exists")
        } else {
            e
        }
    })?;

    tracing::info!(
        user_id = %id,
        username = %user.username,
        role = %user.role,
        registered_by = %caller.username,
        "User registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: user.into(),
        }),
    ))
}
