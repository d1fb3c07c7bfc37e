// --- File: crates/paygate_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Gateway Config ---
// One set of values per environment (sandbox or production); the whole set
// must come from the same environment, never mixed.
// Secrets may use the "secret_from_env" marker and are then resolved from
// PAYGATE_SECRET_GATEWAY_* (or legacy GATEWAY_*) env vars.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GatewayConfig {
    /// Merchant identifier assigned by the processor. Mandatory.
    pub merchant_code: String,
    /// Access code sent as the `accessCode` header on checkout calls. Mandatory.
    pub access_code: String,
    /// 32-character shared secret; its raw UTF-8 bytes are the AES key.
    pub secret_key: String,
    /// 16-character IV string; fixed for the process lifetime, a constraint
    /// imposed by the processor's protocol.
    pub iv_key: String,
    /// Full URL of the processor's checkout endpoint. Mandatory.
    pub checkout_url: String,
    /// Base URL of the hosted payment page; the token is appended as the
    /// `data` query parameter. Mandatory.
    pub payment_page_url: String,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,
    // The gateway section is mandatory: this service is the adapter,
    // there is nothing to run without it.
    pub gateway: GatewayConfig,
}
