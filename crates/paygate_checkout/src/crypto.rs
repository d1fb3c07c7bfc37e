// --- File: crates/paygate_checkout/src/crypto.rs ---
//! The symmetric envelope for payloads exchanged with the processor.
//!
//! Seal: UTF-8 -> PKCS#7 (16-byte blocks) -> AES-256-CBC -> hex.
//! Open: hex -> AES-256-CBC decrypt -> UTF-8 -> the processor's own
//! length-based padding strip (see [`CipherEnvelope::open`]).
//!
//! The same key and IV are used for every operation for the lifetime of the
//! process. The fixed IV is a constraint of the processor's protocol, not a
//! choice made here; the IV is part of the shared credentials.

use aes::Aes256;
use cbc::cipher::{
    block_padding::{NoPadding, Pkcs7},
    BlockDecryptMut, BlockEncryptMut, KeyIvInit,
};
use paygate_config::GatewayConfig;

use crate::error::CryptoError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size; PKCS#7 padding rounds up to multiples of this.
const BLOCK_SIZE: usize = 16;
/// Raw UTF-8 bytes of the 32-character secret select AES-256.
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;
/// The processor rejects decrypted text shorter than this many characters,
/// and any padding-length value larger than it.
const PAD_THRESHOLD: usize = 32;

/// Owns the fixed key and IV shared with the processor.
///
/// Constructed once at startup and safe for unbounded concurrent readers;
/// both operations are pure and perform no I/O.
#[derive(Clone)]
pub struct CipherEnvelope {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

// Manual impl so key material never ends up in logs or test output.
impl std::fmt::Debug for CipherEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherEnvelope")
            .field("key", &"<redacted>")
            .field("iv", &"<redacted>")
            .finish()
    }
}

impl CipherEnvelope {
    /// Builds an envelope from the shared secret and IV strings.
    ///
    /// Fails with `KeyMaterial` if either has the wrong length; callers
    /// treat that as fatal before serving any request.
    pub fn new(secret_key: &str, iv_key: &str) -> Result<Self, CryptoError> {
        let key_bytes = secret_key.as_bytes();
        if key_bytes.len() != KEY_LEN {
            return Err(CryptoError::KeyMaterial(format!(
                "secret key must be {} bytes, got {}",
                KEY_LEN,
                key_bytes.len()
            )));
        }
        let iv_bytes = iv_key.as_bytes();
        if iv_bytes.len() != IV_LEN {
            return Err(CryptoError::KeyMaterial(format!(
                "IV must be {} bytes, got {}",
                IV_LEN,
                iv_bytes.len()
            )));
        }

        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(key_bytes);
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(iv_bytes);
        Ok(CipherEnvelope { key, iv })
    }

    /// Builds an envelope from the gateway configuration section.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, CryptoError> {
        Self::new(&config.secret_key, &config.iv_key)
    }

    /// Encrypts a plaintext into the hex envelope format.
    pub fn seal(&self, plaintext: &str) -> Result<String, CryptoError> {
        let data = plaintext.as_bytes();

        let mut buffer = Vec::with_capacity(data.len() + BLOCK_SIZE);
        buffer.extend_from_slice(data);
        buffer.resize(buffer.len() + BLOCK_SIZE, 0);

        let encryptor = Aes256CbcEnc::new(&self.key.into(), &self.iv.into());
        let encrypted_len = encryptor
            .encrypt_padded_mut::<Pkcs7>(&mut buffer, data.len())
            .map_err(|_| CryptoError::Encoding("AES-256-CBC encryption failed".to_string()))?
            .len();

        buffer.truncate(encrypted_len);
        Ok(hex::encode(buffer))
    }

    /// Decrypts a hex envelope back into plaintext.
    ///
    /// Padding is stripped using the processor's documented rule rather
    /// than PKCS#7: the final decoded *character*'s numeric value is the
    /// padding length; decrypted text shorter than 32 characters, or a
    /// padding value above 32, is rejected. This asymmetry with `seal` is
    /// the processor's behavior and must not be "fixed" locally, at the
    /// cost of rejecting plaintexts shorter than one full block.
    pub fn open(&self, hex_ciphertext: &str) -> Result<String, CryptoError> {
        let mut buffer = hex::decode(hex_ciphertext)
            .map_err(|e| CryptoError::Encoding(format!("invalid hex ciphertext: {}", e)))?;

        let decryptor = Aes256CbcDec::new(&self.key.into(), &self.iv.into());
        let decrypted = decryptor
            .decrypt_padded_mut::<NoPadding>(&mut buffer)
            .map_err(|_| {
                CryptoError::Encoding(
                    "ciphertext length is not a multiple of the block size".to_string(),
                )
            })?;

        let text = std::str::from_utf8(decrypted)
            .map_err(|e| CryptoError::Encoding(format!("decrypted data is not valid UTF-8: {}", e)))?;

        strip_padding(text)
    }
}

/// The processor's length-based padding strip.
fn strip_padding(text: &str) -> Result<String, CryptoError> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < PAD_THRESHOLD {
        return Err(CryptoError::Padding(format!(
            "decrypted text is {} characters, below the {}-character minimum",
            chars.len(),
            PAD_THRESHOLD
        )));
    }

    // Padding length comes from the decoded character value, not the raw byte.
    let pad_len = chars[chars.len() - 1] as usize;
    if pad_len > PAD_THRESHOLD {
        return Err(CryptoError::Padding(format!(
            "padding length {} exceeds the maximum of {}",
            pad_len, PAD_THRESHOLD
        )));
    }

    Ok(chars[..chars.len() - pad_len].iter().collect())
}
