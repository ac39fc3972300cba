// First-generation scheme: password-derived AES-256-CBC in the hex armor the
// original web frontend's crypto library reads (iv,salt,ciphertext).

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha1::Sha1;

use crate::error::Error;
use crate::misc::url_unpadded_base64;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const SALT_LEN: usize = 128;
const IV_LEN: usize = 16;
const KEY_LEN: usize = 32;
const PBKDF2_ROUNDS: u32 = 50_000;

/// Random 32-byte secret, URL-safe base64 without padding. This is the
/// fragment key for first-generation pastes.
pub fn generate_url_secret() -> String {
    let mut raw = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut raw);
    url_unpadded_base64(&raw)
}

fn derive_key(secret: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha1>(secret.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
    key
}

/// Encrypt with a password-derived key. Output is `iv,salt,ciphertext`,
/// each part hex encoded.
pub fn password_encrypt(secret: &str, raw_data: &[u8]) -> String {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut iv);

    let key = derive_key(secret, &salt);
    let ciphertext =
        Aes256CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(raw_data);

    format!(
        "{},{},{}",
        hex::encode(iv),
        hex::encode(salt),
        hex::encode(ciphertext)
    )
}

/// Decrypt an `iv,salt,ciphertext` payload. A wrong password surfaces as a
/// padding failure; CBC carries no authentication tag.
pub fn password_decrypt(secret: &str, payload: &str) -> Result<Vec<u8>, Error> {
    let parts: Vec<&str> = payload.split(',').collect();
    if parts.len() != 3 {
        return Err(Error::Malformed("expected iv,salt,ciphertext"));
    }

    let iv = hex::decode(parts[0]).map_err(|_| Error::Malformed("bad iv hex"))?;
    let salt = hex::decode(parts[1]).map_err(|_| Error::Malformed("bad salt hex"))?;
    let ciphertext = hex::decode(parts[2]).map_err(|_| Error::Malformed("bad ciphertext hex"))?;
    if ciphertext.is_empty() || ciphertext.len() % 16 != 0 {
        return Err(Error::Malformed("ciphertext not block aligned"));
    }

    let key = derive_key(secret, &salt);
    let cipher = Aes256CbcDec::new_from_slices(&key, &iv)
        .map_err(|_| Error::Malformed("iv must be 16 bytes"))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| Error::Decrypt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let secret = generate_url_secret();
        let payload = password_encrypt(&secret, b"a paste shared with a password");
        let plain = password_decrypt(&secret, &payload).unwrap();
        assert_eq!(plain, b"a paste shared with a password");
    }

    #[test]
    fn armor_has_three_hex_parts() {
        let payload = password_encrypt("secret", b"data");
        let parts: Vec<&str> = payload.split(',').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), IV_LEN * 2);
        assert_eq!(parts[1].len(), SALT_LEN * 2);
        // "data" pads to one full AES block
        assert_eq!(parts[2].len(), 16 * 2);
        assert!(payload.chars().all(|c| c.is_ascii_hexdigit() || c == ','));
    }

    #[test]
    fn derive_key_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        assert_eq!(derive_key("secret", &salt), derive_key("secret", &salt));
        assert_ne!(derive_key("secret", &salt), derive_key("other", &salt));
    }

    #[test]
    fn decrypt_rejects_wrong_part_count() {
        let err = password_decrypt("secret", "deadbeef,cafe").unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn decrypt_rejects_bad_hex() {
        let err = password_decrypt("secret", "zzzz,cafe,beef").unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn decrypt_rejects_unaligned_ciphertext() {
        let iv = hex::encode([0u8; IV_LEN]);
        let salt = hex::encode([0u8; SALT_LEN]);
        let payload = format!("{},{},{}", iv, salt, "beef");
        let err = password_decrypt("secret", &payload).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn url_secret_is_fragment_safe() {
        let secret = generate_url_secret();
        // 32 bytes -> 43 unpadded base64 chars
        assert_eq!(secret.len(), 43);
        assert!(secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
