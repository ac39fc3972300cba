// Third-generation scheme and the main upload path: Argon2id turns the
// random master key into the stream key, then each 1024-byte chunk is
// encrypted with XChaCha20-Poly1305 carrying an encrypted trailing tag byte.
// Wire form per chunk: u32-LE ciphertext length, then the ciphertext.

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::RngCore;

use crate::error::Error;

pub const KEY_LEN: usize = 32;
pub const SALT_LEN: usize = 16;
pub const HEADER_LEN: usize = 24;
pub const CHUNK_LEN: usize = 1024;

/// Tag byte appended to every chunk before encryption.
pub const TAG_MESSAGE: u8 = 0x00;
/// Tag byte marking the last chunk, so a truncated stream cannot pass as
/// complete.
pub const TAG_FINAL: u8 = 0x03;

const LEN_PREFIX: usize = 4;
const AEAD_TAG_LEN: usize = 16;

// Interactive Argon2id cost: 64 MiB, 2 passes. The web frontend re-derives
// the stream key with the same parameters.
const ARGON2_MEM_KIB: u32 = 65536;
const ARGON2_PASSES: u32 = 2;
const ARGON2_LANES: u32 = 1;

/// The salt and header travel to the server as form fields; the master key
/// rides the URL fragment only.
pub struct StreamCiphertext {
    pub salt: [u8; SALT_LEN],
    pub header: [u8; HEADER_LEN],
    pub body: Vec<u8>,
}

/// Random master key; its unpadded base64 form is the URL fragment.
pub fn generate_master_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// Argon2id over the master key.
pub fn derive_stream_key(master_key: &[u8], salt: &[u8; SALT_LEN]) -> Result<[u8; KEY_LEN], Error> {
    let params = Params::new(ARGON2_MEM_KIB, ARGON2_PASSES, ARGON2_LANES, Some(KEY_LEN))
        .map_err(|e| Error::KeyDerivation(e.to_string()))?;
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon
        .hash_password_into(master_key, salt, &mut key)
        .map_err(|e| Error::KeyDerivation(e.to_string()))?;
    Ok(key)
}

// Per-chunk nonce: the stream header with the little-endian chunk counter
// folded into its trailing 8 bytes.
fn chunk_nonce(header: &[u8; HEADER_LEN], counter: u64) -> XNonce {
    let mut nonce = *header;
    for (i, byte) in counter.to_le_bytes().iter().enumerate() {
        nonce[HEADER_LEN - 8 + i] ^= byte;
    }
    XNonce::from(nonce)
}

/// Encrypt a paste chunk by chunk under a fresh salt and header.
pub fn encrypt(master_key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<StreamCiphertext, Error> {
    let mut salt = [0u8; SALT_LEN];
    let mut header = [0u8; HEADER_LEN];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut header);

    let stream_key = derive_stream_key(master_key, &salt)?;
    let cipher = XChaCha20Poly1305::new(&stream_key.into());

    let chunk_count = plaintext.chunks(CHUNK_LEN).count();
    let mut body =
        Vec::with_capacity(plaintext.len() + chunk_count * (LEN_PREFIX + 1 + AEAD_TAG_LEN));
    for (i, chunk) in plaintext.chunks(CHUNK_LEN).enumerate() {
        let tag = if i + 1 == chunk_count {
            TAG_FINAL
        } else {
            TAG_MESSAGE
        };
        let mut buffer = Vec::with_capacity(chunk.len() + 1);
        buffer.extend_from_slice(chunk);
        buffer.push(tag);

        let encrypted = cipher
            .encrypt(&chunk_nonce(&header, i as u64), buffer.as_slice())
            .map_err(|_| Error::Encrypt)?;
        body.extend_from_slice(&(encrypted.len() as u32).to_le_bytes());
        body.extend_from_slice(&encrypted);
    }

    Ok(StreamCiphertext { salt, header, body })
}

/// Decrypt a framed stream. Chunks must authenticate in order and the final
/// tag must close the stream; truncated or trailing data is rejected.
pub fn decrypt(
    master_key: &[u8; KEY_LEN],
    salt: &[u8; SALT_LEN],
    header: &[u8; HEADER_LEN],
    body: &[u8],
) -> Result<Vec<u8>, Error> {
    let stream_key = derive_stream_key(master_key, salt)?;
    let cipher = XChaCha20Poly1305::new(&stream_key.into());

    let mut plaintext = Vec::new();
    let mut rest = body;
    let mut counter = 0u64;
    let mut finished = false;
    while !rest.is_empty() {
        if finished {
            return Err(Error::Malformed("data after final chunk"));
        }
        if rest.len() < LEN_PREFIX {
            return Err(Error::Malformed("truncated chunk length"));
        }
        let len = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        rest = &rest[LEN_PREFIX..];
        if rest.len() < len {
            return Err(Error::Malformed("truncated chunk"));
        }
        let (encrypted, tail) = rest.split_at(len);
        rest = tail;

        let mut buffer = cipher
            .decrypt(&chunk_nonce(header, counter), encrypted)
            .map_err(|_| Error::Decrypt)?;
        match buffer.pop() {
            Some(TAG_FINAL) => finished = true,
            Some(TAG_MESSAGE) => {}
            Some(_) => return Err(Error::Malformed("unknown chunk tag")),
            None => return Err(Error::Malformed("empty chunk")),
        }
        plaintext.extend_from_slice(&buffer);
        counter += 1;
    }

    if !finished && !body.is_empty() {
        return Err(Error::Malformed("stream missing final chunk"));
    }
    Ok(plaintext)
}
