use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::warn;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Required length of the shared secret, in characters. Its raw UTF-8
/// bytes are used directly as the AES key.
pub const SECRET_KEY_LEN: usize = 32;
/// Required length of the IV string, in characters.
pub const IV_KEY_LEN: usize = 16;

/// Loads the application configuration.
///
/// Layering: `config/default` then `config/<RUN_ENV>` (sandbox, production),
/// then `PAYGATE__`-prefixed environment variables. `secret_from_env`
/// markers are resolved afterwards, and the resulting config is validated.
/// A validation failure here is fatal by design: the service must not
/// accept requests with missing or malformed key material.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "sandbox".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "PAYGATE".to_string());

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let workspace_root = manifest_dir
        .ancestors()
        .nth(2) // go from crates/paygate_config to workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_default();

    let default_path = workspace_root.join("config/default");
    let env_path = workspace_root.join(format!("config/{}", run_env));

    let builder = Config::builder()
        .add_source(File::with_name(default_path.to_str().unwrap_or("config/default")).required(false))
        .add_source(File::with_name(env_path.to_str().unwrap_or("config/sandbox")).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    let config = apply_env_overrides_from_marker(raw_config);
    validate(&config)?;
    Ok(config)
}

/// Validates the loaded configuration.
///
/// Key material has fixed lengths (32-character secret, 16-character IV);
/// anything else cannot produce a working cipher and must abort startup.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let gateway = &config.gateway;
    if gateway.secret_key.len() != SECRET_KEY_LEN {
        return Err(ConfigError::Message(format!(
            "gateway.secret_key must be {} characters, got {}",
            SECRET_KEY_LEN,
            gateway.secret_key.len()
        )));
    }
    if gateway.iv_key.len() != IV_KEY_LEN {
        return Err(ConfigError::Message(format!(
            "gateway.iv_key must be {} characters, got {}",
            IV_KEY_LEN,
            gateway.iv_key.len()
        )));
    }
    for (name, value) in [
        ("gateway.merchant_code", &gateway.merchant_code),
        ("gateway.access_code", &gateway.access_code),
        ("gateway.checkout_url", &gateway.checkout_url),
        ("gateway.payment_page_url", &gateway.payment_page_url),
    ] {
        if value.is_empty() || value == "secret_from_env" {
            return Err(ConfigError::Message(format!("{} is not set", name)));
        }
    }
    Ok(())
}

/// Recursively replaces all "secret_from_env" string values with environment variable values
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == "secret_from_env" => {
                let path_str = path.join(".");
                if let Some(env_val) = env_vars::get_secret_env_var(&path_str) {
                    *obj = Value::String(env_val);
                } else {
                    warn!("env var for {} not found for secret_from_env", path_str);
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config
pub fn apply_env_overrides_from_marker(config: AppConfig) -> AppConfig {
    let mut json = serde_json::to_value(&config).expect("AppConfig must be serializable");
    inject_env_secrets(&mut json);
    serde_json::from_value(json).expect("AppConfig must remain deserializable")
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// Loads the file named by DOTENV_OVERRIDE, or ".env", exactly once.
pub fn ensure_dotenv_loaded() {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });
}
