// --- File: crates/paygate_checkout/src/error.rs ---
use paygate_common::PaygateError;
use thiserror::Error;

/// Errors produced by the cipher envelope.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key or IV string has the wrong length. Fatal at startup; never
    /// produced once the envelope has been constructed.
    #[error("invalid key material: {0}")]
    KeyMaterial(String),

    /// Input is not valid hex, not block-aligned, or not valid UTF-8.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Decrypted text failed the processor's padding-length sanity check.
    #[error("padding error: {0}")]
    Padding(String),
}

/// Checkout-specific error types, covering every failure the orchestrator
/// converts into a failed PaymentResult.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// The raw payload was a string that is not valid JSON.
    #[error("invalid JSON in request payload")]
    InvalidJson { raw: String },

    /// One or more mandatory fields were absent or empty.
    #[error("missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    /// Malformed hex / non-UTF-8 data in the envelope.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Decrypted text failed the padding-length sanity check.
    #[error("padding error: {0}")]
    Padding(String),

    /// The processor explicitly reported a failure status.
    #[error("{message}")]
    Processor { message: String, body: String },

    /// The processor reported success but no token was found. A contract
    /// violation upstream, treated as a local failure.
    #[error("processor response did not contain a payment token")]
    TokenMissing { body: String },

    /// Network or HTTP-level failure reaching the processor.
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        body: Option<String>,
        message: String,
    },
}

impl From<CryptoError> for CheckoutError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Encoding(msg) => CheckoutError::Encoding(msg),
            CryptoError::Padding(msg) => CheckoutError::Padding(msg),
            // Key material is validated at startup; if this shows up mid
            // request something rebuilt the envelope with bad config.
            CryptoError::KeyMaterial(msg) => CheckoutError::Encoding(msg),
        }
    }
}

/// Convert CheckoutError to PaygateError
impl From<CheckoutError> for PaygateError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::InvalidJson { .. } => {
                PaygateError::ParseError("invalid JSON in request payload".to_string())
            }
            CheckoutError::Validation { missing } => PaygateError::ValidationError(format!(
                "missing required fields: {}",
                missing.join(", ")
            )),
            CheckoutError::Encoding(msg) => PaygateError::InternalError(msg),
            CheckoutError::Padding(msg) => PaygateError::InternalError(msg),
            CheckoutError::Processor { message, .. } => PaygateError::ExternalServiceError {
                service_name: "processor checkout".to_string(),
                message,
            },
            CheckoutError::TokenMissing { .. } => PaygateError::ExternalServiceError {
                service_name: "processor checkout".to_string(),
                message: "response did not contain a payment token".to_string(),
            },
            CheckoutError::Transport { message, .. } => PaygateError::HttpError(message),
        }
    }
}
