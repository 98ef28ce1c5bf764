//! Create/list/get/update/delete shared by every plain collection.
//!
//! Routes instantiate these per entity, e.g. `get(resource::list::<Customer>)`.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{Map, Value};
use service_core::error::AppError;

use crate::{
    dtos::{IdQuery, MessageResponse},
    models::Resource,
    utils::{decode_json, parse_object_id, ValidatedJson},
    AppState,
};

pub async fn create<T: Resource>(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<T::Create>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut entity = T::from_create(payload, Utc::now())?;
    let id = state.repository::<T>().insert(&mut entity).await?;

    tracing::info!(collection = T::COLLECTION, id = %id, "Created {}", T::KEY);

    let created = serde_json::to_value(entity.into_response())
        .map_err(|e| AppError::InternalError(e.into()))?;

    let mut body = Map::new();
    body.insert(
        "message".to_string(),
        Value::String(format!("{} created successfully", T::NAME)),
    );
    body.insert(T::KEY.to_string(), created);

    Ok((StatusCode::CREATED, Json(Value::Object(body))))
}

/// An empty collection is reported as 404.
pub async fn list<T: Resource>(
    State(state): State<AppState>,
) -> Result<Json<Vec<T::Response>>, AppError> {
    let entities = state.repository::<T>().find_all().await?;

    if entities.is_empty() {
        return Err(AppError::not_found(format!("No {} found", T::PLURAL)));
    }

    Ok(Json(entities.into_iter().map(T::into_response).collect()))
}

pub async fn get<T: Resource>(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<T::Response>, AppError> {
    let id = parse_object_id(query.id.as_deref())?;

    let entity = state
        .repository::<T>()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("{} not found", T::NAME)))?;

    Ok(Json(entity.into_response()))
}

pub async fn update<T: Resource>(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_object_id(query.id.as_deref())?;
    let payload: T::Update = decode_json(&body, "Invalid input")?;
    let update = T::update_document(payload)?;

    let matched = state.repository::<T>().apply(id, update).await?;
    if !matched {
        return Err(AppError::not_found(format!("{} not found", T::NAME)));
    }

    tracing::info!(collection = T::COLLECTION, id = %id, "Updated {}", T::KEY);
    Ok(Json(MessageResponse::new(format!(
        "{} updated successfully",
        T::NAME
    ))))
}

pub async fn delete<T: Resource>(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_object_id(query.id.as_deref())?;

    let deleted = state.repository::<T>().delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("{} not found", T::NAME)));
    }

    tracing::info!(collection = T::COLLECTION, id = %id, "Deleted {}", T::KEY);
    Ok(Json(MessageResponse::new(format!(
        "{} deleted successfully",
        T::NAME
    ))))
}
