//! Employees are users seen through the `user` collection.

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use mongodb::bson::{self, doc};
use service_core::error::AppError;
use validator::Validate;

use crate::{
    dtos::{EmployeeName, IdQuery, MessageResponse, UpdateEmployeeRequest},
    models::{User, UserResponse},
    services::is_duplicate_key,
    utils::{decode_json, parse_object_id},
    AppState,
};

pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.repository::<User>().find_all().await?;

    if users.is_empty() {
        return Err(AppError::not_found("No employees found"));
    }

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn list_employee_names(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeName>>, AppError> {
    let users = state.repository::<User>().find_all().await?;

    Ok(Json(
        users
            .into_iter()
            .map(|user| EmployeeName {
                id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
                name: user.username,
            })
            .collect(),
    ))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<UserResponse>, AppError> {
    let id = parse_object_id(query.id.as_deref())?;

    let user = state
        .repository::<User>()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    Ok(Json(user.into()))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_object_id(query.id.as_deref())?;
    let payload: UpdateEmployeeRequest = decode_json(&body, "Invalid input")?;
    payload.validate()?;

    let fields = doc! {
        "username": payload.username,
        "role": payload.role,
        "phone": payload.phone,
        "address": payload.address,
        "salary": payload.salary,
        "salary_date": payload.salary_date.map(bson::DateTime::from_chrono),
    };

    let matched = state
        .repository::<User>()
        .update_fields(id, fields)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::bad_request("Username already exists")
            } else {
                e
            }
        })?;
    if !matched {
        return Err(AppError::not_found("Employee not found"));
    }

    tracing::info!(user_id = %id, "Employee updated");
    Ok(Json(MessageResponse::new("Employee updated successfully")))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_object_id(query.id.as_deref())?;

    if !state.repository::<User>().delete(id).await? {
        return Err(AppError::not_found("Employee not found"));
    }

    tracing::info!(user_id = %id, "Employee deleted");
    Ok(Json(MessageResponse::new("Employee deleted successfully")))
}
