// Shared helpers: endpoint normalization and the base64 flavor used in URLs.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Append a trailing slash if the value lacks one.
pub fn end_slash(value: &str) -> String {
    if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{}/", value)
    }
}

/// URL-safe base64 without padding, used for every key, salt, header and
/// nonce that travels inside a URL or form field.
pub fn url_unpadded_base64(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Assemble a share URL. The decryption key rides in the fragment, which
/// browsers never send to the server.
pub fn share_url(frontend_url: &str, paste_id: &str, fragment_key: &str) -> String {
    format!("{}{}#{}", frontend_url, paste_id, fragment_key)
}
