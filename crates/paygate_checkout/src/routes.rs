// --- File: crates/paygate_checkout/src/routes.rs ---

use axum::{routing::post, Router};
use paygate_config::AppConfig;
use std::sync::Arc;

use crate::crypto::CipherEnvelope;
use crate::handlers::{initiate_payment_handler, CheckoutState};

/// Creates a router containing all routes for the checkout feature.
/// Initializes and applies the necessary CheckoutState.
///
/// # Arguments
/// * `config` - Shared application configuration (`Arc<AppConfig>`).
/// * `envelope` - The cipher envelope built from the config at startup.
///
/// # Returns
/// An Axum Router configured with checkout routes and state.
pub fn routes(config: Arc<AppConfig>, envelope: Arc<CipherEnvelope>) -> Router {
    let checkout_state = Arc::new(CheckoutState { config, envelope });

    Router::new()
        // API endpoint called by the merchant frontend/backend to start a payment
        .route("/checkout/initiate", post(initiate_payment_handler))
        .with_state(checkout_state) // Apply the specific state to this router fragment
}
