// Second-generation scheme: one-shot XChaCha20-Poly1305 over the whole
// paste. The nonce travels in the request path, the key in the fragment.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::RngCore;

use crate::error::Error;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 24;

/// Random paste key; its unpadded base64 form is the URL fragment.
pub fn generate_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// Random nonce, sent to the server as part of the create request.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

pub fn seal(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, Error> {
    let cipher = XChaCha20Poly1305::new(key.into());
    cipher
        .encrypt(XNonce::from_slice(nonce), plaintext)
        .map_err(|_| Error::Encrypt)
}

/// Authenticated decrypt; a wrong key or tampered ciphertext is an error,
/// never garbage plaintext.
pub fn open(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, Error> {
    let cipher = XChaCha20Poly1305::new(key.into());
    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| Error::Decrypt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let key = generate_key();
        let nonce = generate_nonce();
        let ciphertext = seal(&key, &nonce, b"clipboard contents").unwrap();
        assert_eq!(open(&key, &nonce, &ciphertext).unwrap(), b"clipboard contents");
    }

    #[test]
    fn ciphertext_carries_sixteen_byte_tag() {
        let key = generate_key();
        let nonce = generate_nonce();
        let ciphertext = seal(&key, &nonce, b"abc").unwrap();
        assert_eq!(ciphertext.len(), 3 + 16);
    }

    #[test]
    fn tampering_fails_authentication() {
        let key = generate_key();
        let nonce = generate_nonce();
        let mut ciphertext = seal(&key, &nonce, b"clipboard contents").unwrap();
        ciphertext[0] ^= 0x01;
        assert!(matches!(open(&key, &nonce, &ciphertext), Err(Error::Decrypt)));
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let key = generate_key();
        let nonce = generate_nonce();
        let ciphertext = seal(&key, &nonce, b"clipboard contents").unwrap();
        let other = generate_key();
        assert!(matches!(open(&other, &nonce, &ciphertext), Err(Error::Decrypt)));
    }
}
