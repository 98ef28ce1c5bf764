use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use service_core::error::AppError;

use crate::{
    dtos::{MessageResponse, SupplierIdQuery},
    models::{AddSupplierTransactionRequest, Supplier},
    services::metrics,
    utils::decode_json,
    AppState,
};

/// Append a purchase to a supplier's `transactions`.
///
/// The supplier is looked up before the body is decoded, so an unknown
/// supplier is a 404 whatever the body holds. Concurrent appends are all
/// kept; their relative order is not guaranteed.
pub async fn add_supplier_transaction(
    State(state): State<AppState>,
    Query(query): Query<SupplierIdQuery>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let raw_id = query
        .supplier_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request("Supplier ID tidak disediakan"))?;

    let supplier_id = ObjectId::parse_str(raw_id).map_err(|_| {
        tracing::warn!(supplier_id = %raw_id, "Invalid supplier id");
        AppError::bad_request("Supplier ID tidak valid")
    })?;

    let suppliers = state.repository::<Supplier>();

    if !suppliers.exists(doc! { "_id": supplier_id }).await? {
        tracing::warn!(supplier_id = %supplier_id, "Supplier not found");
        return Err(AppError::not_found("Supplier tidak ditemukan"));
    }

    let payload: AddSupplierTransactionRequest = decode_json(&body, "Input tidak valid")?;
    let transaction = payload.into_transaction(Utc::now());
    let transaction_id = transaction.transaction_id.clone();

    // The supplier may have been deleted since the lookup.
    if !suppliers
        .push(supplier_id, "transactions", &transaction)
        .await?
    {
        tracing::warn!(supplier_id = %supplier_id, "Supplier vanished before append");
        return Err(AppError::not_found("Supplier tidak ditemukan"));
    }

    metrics::record_supplier_transaction();
    tracing::info!(
        supplier_id = %supplier_id,
        transaction_id = %transaction_id,
        total_amount = transaction.total_amount,
        "Supplier transaction appended"
    );

    Ok(Json(MessageResponse::new("Transaksi berhasil ditambahkan")))
}
