// --- File: crates/paygate_checkout/src/handlers.rs ---
use axum::{extract::State, http::StatusCode, response::Json};
use paygate_config::AppConfig;
use serde_json::Value;
use std::sync::Arc;

use crate::crypto::CipherEnvelope;
use crate::logic::{initiate_payment, PaymentResult};

// --- State for Checkout Handlers ---
// Holds the config and the envelope built from it at startup; the
// reqwest::Client is static in paygate_common.
#[derive(Clone)]
pub struct CheckoutState {
    pub config: Arc<AppConfig>,
    pub envelope: Arc<CipherEnvelope>,
}

/// Axum handler to initiate a payment.
///
/// The body is taken as a raw JSON value: the orchestrator itself handles
/// the payload-may-be-a-JSON-encoded-string case and all validation. The
/// handler only maps the normalized result to an HTTP status.
#[axum::debug_handler]
pub async fn initiate_payment_handler(
    State(state): State<Arc<CheckoutState>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<PaymentResult>) {
    let result = initiate_payment(&state.config.gateway, &state.envelope, payload).await;

    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    };
    (status, Json(result))
}
