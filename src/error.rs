use thiserror::Error;

/// Errors surfaced by the paaster client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no config directory on this platform")]
    NoConfigDir,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed")]
    Encrypt,

    // Covers both a wrong key and corrupted ciphertext; the AEAD gives no
    // further detail and CBC unpadding cannot tell the two apart.
    #[error("decryption failed")]
    Decrypt,

    #[error("malformed encrypted payload: {0}")]
    Malformed(&'static str),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}
