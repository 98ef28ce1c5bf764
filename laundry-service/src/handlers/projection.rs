//! Slim read-only views used by the frontend's pickers.

use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{CustomerContact, CustomerName, IdQuery, ItemTransactionSummary},
    models::{Customer, ItemTransaction},
    utils::parse_object_id,
    AppState,
};

pub async fn customer_names(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerName>>, AppError> {
    let customers = state.repository::<Customer>().find_all().await?;

    if customers.is_empty() {
        return Err(AppError::not_found("No customers found"));
    }

    Ok(Json(
        customers
            .into_iter()
            .map(|c| CustomerName {
                id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
                name: c.name,
                phone: c.phone,
            })
            .collect(),
    ))
}

pub async fn customer_name(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<CustomerContact>, AppError> {
    let id = parse_object_id(query.id.as_deref())?;

    let customer = state
        .repository::<Customer>()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    Ok(Json(CustomerContact {
        name: customer.name,
        phone: customer.phone,
    }))
}

pub async fn item_transaction_summary(
    State(state): State<AppState>,
) -> Result<Json<Vec<ItemTransactionSummary>>, AppError> {
    let transactions = state.repository::<ItemTransaction>().find_all().await?;

    if transactions.is_empty() {
        return Err(AppError::not_found("No transactions found"));
    }

    Ok(Json(
        transactions
            .into_iter()
            .map(|t| ItemTransactionSummary {
                id: t.id.map(|id| id.to_hex()).unwrap_or_default(),
                item_id: t.item_id,
                item_name: t.item_name,
            })
            .collect(),
    ))
}
