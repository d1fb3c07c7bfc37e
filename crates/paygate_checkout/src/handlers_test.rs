#[cfg(test)]
mod tests {
    use crate::crypto::CipherEnvelope;
    use crate::handlers::{initiate_payment_handler, CheckoutState};
    use axum::{extract::State, http::StatusCode, Json};
    use paygate_config::{AppConfig, GatewayConfig, ServerConfig};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_SECRET: &str = "ABCDEF0123456789ABCDEF0123456789";
    const TEST_IV: &str = "0123456789ABCDEF";

    fn test_state(checkout_url: &str) -> Arc<CheckoutState> {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            gateway: GatewayConfig {
                merchant_code: "842217".to_string(),
                access_code: "acc-123".to_string(),
                secret_key: TEST_SECRET.to_string(),
                iv_key: TEST_IV.to_string(),
                checkout_url: checkout_url.to_string(),
                payment_page_url: "https://pay.example/payment".to_string(),
            },
        };
        let envelope = CipherEnvelope::from_config(&config.gateway).unwrap();
        Arc::new(CheckoutState {
            config: Arc::new(config),
            envelope: Arc::new(envelope),
        })
    }

    #[tokio::test]
    async fn test_handler_maps_validation_failure_to_400() {
        // No network activity happens for an invalid payload, so the
        // checkout URL can point anywhere.
        let state = test_state("https://unused.example/checkout");
        let (status, Json(result)) =
            initiate_payment_handler(State(state), Json(json!({"amount": "10.000"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_handler_maps_success_to_200() {
        let server = MockServer::start().await;
        let state = test_state(&format!("{}/checkout", server.uri()));

        let sealed_reply = state
            .envelope
            .seal(&json!({"status": true, "response": {"data": "tok"}}).to_string())
            .unwrap();
        Mock::given(method("POST"))
            .and(path("/checkout"))
            .respond_with(ResponseTemplate::new(200).set_body_string(sealed_reply))
            .mount(&server)
            .await;

        let payload = json!({
            "amount": "10.000",
            "currency": "KWD",
            "orderReferenceNumber": "BOOKING-1",
            "responseUrl": "https://x/ok",
            "failureUrl": "https://x/fail"
        });
        let (status, Json(result)) = initiate_payment_handler(State(state), Json(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            result.payment_url.as_deref(),
            Some("https://pay.example/payment?data=tok")
        );
    }

    #[tokio::test]
    async fn test_handler_propagates_upstream_status() {
        let server = MockServer::start().await;
        let state = test_state(&format!("{}/checkout", server.uri()));

        Mock::given(method("POST"))
            .and(path("/checkout"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let payload = json!({
            "amount": "10.000",
            "currency": "KWD",
            "orderReferenceNumber": "BOOKING-1",
            "responseUrl": "https://x/ok",
            "failureUrl": "https://x/fail"
        });
        let (status, Json(result)) = initiate_payment_handler(State(state), Json(payload)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(!result.success);
    }
}
