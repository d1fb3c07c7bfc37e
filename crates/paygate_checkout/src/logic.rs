// --- File: crates/paygate_checkout/src/logic.rs ---
//! End-to-end handling of one payment-initiation request: validate the
//! caller payload, build the canonical processor payload, seal it, POST it
//! to the checkout endpoint, open the reply and extract the payment token.
//!
//! Every failure is converted into a `PaymentResult { success: false, .. }`;
//! nothing escapes to the caller as an error.

use paygate_common::HTTP_CLIENT;
use paygate_config::GatewayConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::crypto::CipherEnvelope;
use crate::error::CheckoutError;

// Protocol constants fixed by the processor.
/// Indirect payment: the customer is redirected to the hosted payment page.
pub const PAYMENT_TYPE_INDIRECT: u8 = 0;
pub const PROTOCOL_VERSION: &str = "2.0";
const ACCESS_CODE_HEADER: &str = "accessCode";

// --- Data Structures ---

/// A merchant's payment-initiation request as received from the caller.
///
/// All fields are optional at the type level so that validation can report
/// every missing mandatory field by name instead of failing on the first.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct PaymentRequest {
    /// Decimal amount as a string, e.g. "10.000". Mandatory.
    #[serde(default)]
    pub amount: Option<String>,
    /// Currency code, e.g. "KWD". Mandatory.
    #[serde(default)]
    pub currency: Option<String>,
    /// Merchant-unique order reference. Mandatory.
    #[serde(default, rename = "orderReferenceNumber")]
    pub order_reference_number: Option<String>,
    /// Redirect target after a successful payment. Mandatory.
    #[serde(default, rename = "responseUrl")]
    pub response_url: Option<String>,
    /// Redirect target after a failed payment. Mandatory.
    #[serde(default, rename = "failureUrl")]
    pub failure_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Server-to-server notification URL. `callbackUrl` is an alias that
    /// wins over `webhookUrl` when both are supplied.
    #[serde(default, rename = "webhookUrl")]
    pub webhook_url: Option<String>,
    #[serde(default, rename = "callbackUrl")]
    pub callback_url: Option<String>,
    // Free-form passthrough slots defined by the processor's protocol.
    #[serde(default)]
    pub variable1: Option<String>,
    #[serde(default)]
    pub variable2: Option<String>,
    #[serde(default)]
    pub variable3: Option<String>,
    #[serde(default)]
    pub variable4: Option<String>,
    #[serde(default)]
    pub variable5: Option<String>,
}

/// The canonical payload sealed and sent to the processor: the validated
/// request plus the fixed protocol constants. Built fresh per request.
#[derive(Serialize, Debug)]
pub struct CanonicalPayload {
    #[serde(rename = "merchantCode")]
    pub merchant_code: String,
    pub amount: String,
    pub currency: String,
    #[serde(rename = "orderReferenceNumber")]
    pub order_reference_number: String,
    #[serde(rename = "paymentType")]
    pub payment_type: u8,
    pub version: &'static str,
    #[serde(rename = "responseUrl")]
    pub response_url: String,
    #[serde(rename = "failureUrl")]
    pub failure_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "webhookUrl", skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable5: Option<String>,
}

/// Body of the outbound POST: the sealed canonical payload.
#[derive(Serialize, Debug)]
struct CheckoutRequestBody {
    data: String,
}

// --- Structures for the decrypted processor reply ---
#[derive(Deserialize, Debug)]
pub struct ProcessorReply {
    /// Truthy on success. The processor is not strictly typed here, so this
    /// is kept as a JSON value and checked with `is_truthy`.
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response: Option<ProcessorReplyBody>,
}

#[derive(Deserialize, Debug)]
pub struct ProcessorReplyBody {
    /// The opaque payment token, preferred over `token` when both exist.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// The normalized outward-facing result.
#[derive(Serialize, Debug)]
pub struct PaymentResult {
    pub success: bool,
    #[serde(rename = "paymentUrl", skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    #[serde(rename = "rawResponse", skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "rawErrorBody", skip_serializing_if = "Option::is_none")]
    pub raw_error_body: Option<String>,
    /// HTTP status the thin layer should answer with. Not serialized.
    #[serde(skip)]
    pub status_code: u16,
}

impl PaymentResult {
    fn succeeded(payment_url: String, raw_response: String) -> Self {
        PaymentResult {
            success: true,
            payment_url: Some(payment_url),
            raw_response: Some(raw_response),
            message: None,
            raw_error_body: None,
            status_code: 200,
        }
    }

    fn failed(message: String, raw_error_body: Option<String>, status_code: u16) -> Self {
        PaymentResult {
            success: false,
            payment_url: None,
            raw_response: None,
            message: Some(message),
            raw_error_body,
            status_code,
        }
    }
}

// --- Core Logic Functions ---

/// Handles one payment-initiation request from start to finish.
///
/// Never returns an error: every failure along the way is classified and
/// converted into a failed `PaymentResult` carrying a human-readable
/// message and, where available, a best-effort-decrypted diagnostic body.
pub async fn initiate_payment(
    config: &GatewayConfig,
    envelope: &CipherEnvelope,
    raw_payload: Value,
) -> PaymentResult {
    match run_checkout(config, envelope, raw_payload).await {
        Ok(result) => result,
        Err(err) => {
            error!("Payment initiation failed: {}", err);
            failure_result(envelope, err)
        }
    }
}

async fn run_checkout(
    config: &GatewayConfig,
    envelope: &CipherEnvelope,
    raw_payload: Value,
) -> Result<PaymentResult, CheckoutError> {
    let request = parse_request(raw_payload)?;
    let payload = build_canonical_payload(config, &request)?;

    let serialized = serde_json::to_string(&payload)
        .map_err(|e| CheckoutError::Encoding(format!("failed to serialize payload: {}", e)))?;
    let sealed = envelope.seal(&serialized)?;

    info!(
        order_reference = %payload.order_reference_number,
        "Sending checkout request to processor"
    );

    let response = HTTP_CLIENT
        .post(&config.checkout_url)
        .header(ACCESS_CODE_HEADER, &config.access_code)
        .header(reqwest::header::ACCEPT, "application/json")
        .json(&CheckoutRequestBody { data: sealed })
        .send()
        .await
        .map_err(|e| CheckoutError::Transport {
            status: e.status().map(|s| s.as_u16()),
            body: None,
            message: format!("checkout request failed: {}", e),
        })?;

    let status = response.status();
    // The body is an opaque hex string regardless of the declared content
    // type, so it is always read as raw text.
    let body_text = response.text().await.map_err(|e| CheckoutError::Transport {
        status: Some(status.as_u16()),
        body: None,
        message: format!("failed to read processor response body: {}", e),
    })?;

    if !status.is_success() {
        return Err(CheckoutError::Transport {
            status: Some(status.as_u16()),
            body: Some(body_text),
            message: format!("processor returned HTTP {}", status.as_u16()),
        });
    }

    let decrypted = envelope.open(body_text.trim())?;
    let token = interpret_reply(&decrypted)?;

    let payment_url = format!("{}?data={}", config.payment_page_url, token);
    info!("Checkout succeeded, redirecting to payment page");
    Ok(PaymentResult::succeeded(payment_url, decrypted))
}

/// Parses the raw payload into a `PaymentRequest`.
///
/// A JSON-encoded string is parsed a second time; failures carry the raw
/// text for diagnostics.
pub(crate) fn parse_request(raw_payload: Value) -> Result<PaymentRequest, CheckoutError> {
    let value = match raw_payload {
        Value::String(text) => serde_json::from_str::<Value>(&text)
            .map_err(|_| CheckoutError::InvalidJson { raw: text })?,
        other => other,
    };

    let raw = value.to_string();
    serde_json::from_value(value).map_err(|_| CheckoutError::InvalidJson { raw })
}

/// Checks that every mandatory field is present and non-empty, reporting
/// all missing names at once. Runs before any crypto or network activity.
pub(crate) fn validate(request: &PaymentRequest) -> Result<(), CheckoutError> {
    let required = [
        ("amount", &request.amount),
        ("currency", &request.currency),
        ("orderReferenceNumber", &request.order_reference_number),
        ("responseUrl", &request.response_url),
        ("failureUrl", &request.failure_url),
    ];

    let missing: Vec<String> = required
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CheckoutError::Validation { missing })
    }
}

/// First-non-empty-wins alias resolution: `callbackUrl` over `webhookUrl`.
pub(crate) fn resolve_webhook_url(request: &PaymentRequest) -> Option<String> {
    request
        .callback_url
        .clone()
        .filter(|url| !url.is_empty())
        .or_else(|| request.webhook_url.clone().filter(|url| !url.is_empty()))
}

/// Merges the validated request with the fixed protocol constants.
pub(crate) fn build_canonical_payload(
    config: &GatewayConfig,
    request: &PaymentRequest,
) -> Result<CanonicalPayload, CheckoutError> {
    validate(request)?;

    Ok(CanonicalPayload {
        merchant_code: config.merchant_code.clone(),
        amount: request.amount.clone().unwrap_or_default(),
        currency: request.currency.clone().unwrap_or_default(),
        order_reference_number: request.order_reference_number.clone().unwrap_or_default(),
        payment_type: PAYMENT_TYPE_INDIRECT,
        version: PROTOCOL_VERSION,
        response_url: request.response_url.clone().unwrap_or_default(),
        failure_url: request.failure_url.clone().unwrap_or_default(),
        name: request.name.clone(),
        mobile_number: request.mobile_number.clone(),
        email: request.email.clone(),
        webhook_url: resolve_webhook_url(request),
        variable1: request.variable1.clone(),
        variable2: request.variable2.clone(),
        variable3: request.variable3.clone(),
        variable4: request.variable4.clone(),
        variable5: request.variable5.clone(),
    })
}

/// Interprets the decrypted processor reply and extracts the payment token.
pub(crate) fn interpret_reply(decrypted: &str) -> Result<String, CheckoutError> {
    let reply: ProcessorReply =
        serde_json::from_str(decrypted).map_err(|e| CheckoutError::Processor {
            message: format!("unparseable processor response: {}", e),
            body: decrypted.to_string(),
        })?;

    if !is_truthy(&reply.status) {
        return Err(CheckoutError::Processor {
            message: reply
                .message
                .unwrap_or_else(|| "processor checkout failed".to_string()),
            body: decrypted.to_string(),
        });
    }

    reply
        .response
        .and_then(|body| body.data.or(body.token))
        .ok_or_else(|| CheckoutError::TokenMissing {
            body: decrypted.to_string(),
        })
}

/// Truthiness of the processor's loosely typed `status` field.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false"),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Classifies a checkout failure into a failed `PaymentResult`.
///
/// Transport failures that carried a response body get an opportunistic
/// decrypt of that body; if the decrypt fails the raw (still-encrypted)
/// body is surfaced rather than losing the error entirely.
pub(crate) fn failure_result(envelope: &CipherEnvelope, err: CheckoutError) -> PaymentResult {
    match err {
        CheckoutError::InvalidJson { raw } => {
            PaymentResult::failed("invalid JSON".to_string(), Some(raw), 400)
        }
        CheckoutError::Validation { ref missing } => {
            let message = format!("missing required fields: {}", missing.join(", "));
            PaymentResult::failed(message, None, 400)
        }
        CheckoutError::Transport {
            status,
            body,
            message,
        } => {
            let diagnostic = body.map(|raw| match envelope.open(raw.trim()) {
                Ok(decrypted) => decrypted,
                Err(open_err) => {
                    warn!("Could not decrypt processor error body: {}", open_err);
                    raw
                }
            });
            PaymentResult::failed(message, diagnostic, status.unwrap_or(500))
        }
        CheckoutError::Processor { message, body } => {
            PaymentResult::failed(message, Some(body), 500)
        }
        CheckoutError::TokenMissing { body } => PaymentResult::failed(
            "processor response did not contain a payment token".to_string(),
            Some(body),
            500,
        ),
        other => PaymentResult::failed(other.to_string(), None, 500),
    }
}
