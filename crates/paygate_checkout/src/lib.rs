// --- File: crates/paygate_checkout/src/lib.rs ---
// Declare modules within this crate
pub mod crypto;
#[cfg(test)]
mod crypto_test;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
pub mod routes;

pub use crypto::CipherEnvelope;
pub use error::{CheckoutError, CryptoError};
pub use logic::{initiate_payment, PaymentRequest, PaymentResult};
pub use routes::routes;
