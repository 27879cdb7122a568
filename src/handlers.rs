use crate::errors::AppError;
use crate::models::{Counter, PaymentRequest, PaymentResponse, UpdateCounterRequest};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use std::time::Duration;

// Stand-in for gateway settlement latency; no processor is consulted.
const SETTLEMENT_DELAY: Duration = Duration::from_millis(150);

pub async fn get_counter(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Counter>, AppError> {
    let store = state.store.lock().await;
    let counter = store
        .get(&user_id)
        .cloned()
        .ok_or_else(|| AppError::not_found("Payment counter not found"))?;
    Ok(Json(counter))
}

pub async fn add_payment(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Counter>, AppError> {
    let mut store = state.store.lock().await;
    let counter = store
        .increment(&user_id)
        .ok_or_else(|| AppError::not_found("Payment counter not found"))?;
    Ok(Json(counter))
}

pub async fn make_payment(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<PaymentResponse>, AppError> {
    let payment: PaymentRequest = serde_json::from_value(payload)
        .map_err(|err| AppError::bad_request(format!("Invalid payment data: {err}")))?;

    if payment.amount <= 0.0 {
        return Err(AppError::bad_request("Invalid payment data: amount must be positive"));
    }

    {
        let store = state.store.lock().await;
        match store.get(&user_id) {
            Some(counter) if counter.count > 0 => {}
            _ => return Err(AppError::bad_request("No payments remaining")),
        }
    }

    tokio::time::sleep(SETTLEMENT_DELAY).await;

    // The store refuses at zero, so a request that raced past the check
    // above fails here instead of driving the count negative.
    let mut store = state.store.lock().await;
    let counter = store
        .decrement(&user_id)
        .ok_or_else(|| AppError::internal("Failed to process payment"))?;

    Ok(Json(PaymentResponse {
        success: true,
        counter,
        payment_id: format!("pay_{}", Utc::now().timestamp_millis()),
        message: "Payment processed successfully".to_string(),
    }))
}

pub async fn set_counter(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<Counter>, AppError> {
    let update: UpdateCounterRequest = serde_json::from_value(payload)
        .map_err(|err| AppError::bad_request(format!("Invalid update data: {err}")))?;

    if update.count < 0 {
        return Err(AppError::bad_request(
            "Invalid update data: count must be greater than or equal to 0",
        ));
    }
    let count = u32::try_from(update.count)
        .map_err(|_| AppError::bad_request("Invalid update data: count is too large"))?;

    let mut store = state.store.lock().await;
    let counter = store
        .update(&user_id, count)
        .ok_or_else(|| AppError::not_found("Payment counter not found"))?;
    Ok(Json(counter))
}
