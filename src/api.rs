// HTTP client for the paaster API: one create operation per generation,
// plus the object-storage phase of the modern upload.

use std::collections::BTreeMap;

use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::Error;
use crate::misc::end_slash;

/// Client bound to one API base URL.
pub struct PasteApi {
    http: reqwest::Client,
    api_url: String,
}

/// Response to the modern create call; the body is uploaded in a second
/// phase against `signed_url`.
#[derive(Debug, Deserialize)]
pub struct CreatedPaste {
    #[serde(rename = "pasteId")]
    pub paste_id: String,
    #[serde(rename = "signedUrl")]
    pub signed_url: SignedUrl,
}

/// Pre-signed object-storage POST target.
#[derive(Debug, Deserialize)]
pub struct SignedUrl {
    pub url: String,
    pub fields: BTreeMap<String, String>,
}

/// Response to the sealed (second-generation) create call.
#[derive(Debug, Deserialize)]
pub struct SealedPaste {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner_secret: String,
}

/// Response to the legacy (first-generation) create call.
#[derive(Debug, Deserialize)]
pub struct LegacyPaste {
    #[serde(rename = "pasteId")]
    pub paste_id: String,
    #[serde(rename = "serverSecret")]
    pub server_secret: String,
}

impl PasteApi {
    pub fn new(api_url: &str) -> PasteApi {
        PasteApi {
            http: reqwest::Client::new(),
            api_url: end_slash(api_url),
        }
    }

    /// Modern create: register paste metadata, get back the id and a
    /// pre-signed upload target.
    pub async fn create_paste(
        &self,
        header_b64: &str,
        salt_b64: &str,
    ) -> Result<CreatedPaste, Error> {
        let form = [("codeHeader", header_b64), ("codeKeySalt", salt_b64)];
        let resp = self
            .http
            .post(format!("{}api/paste", self.api_url))
            .header("Referer", self.api_url.as_str())
            .header("Origin", self.api_url.trim_end_matches('/'))
            .form(&form)
            .send()
            .await?;
        debug!("create_paste: {}", resp.status());
        if !resp.status().is_success() {
            return Err(Error::UnexpectedStatus(resp.status()));
        }
        Ok(resp.json().await?)
    }

    /// Second phase of the modern upload: POST the encrypted body to object
    /// storage with every pre-signed field, file part last.
    pub async fn upload_object(&self, signed_url: &SignedUrl, body: Vec<u8>) -> Result<(), Error> {
        let mut form = Form::new();
        for (name, value) in &signed_url.fields {
            form = form.text(name.clone(), value.clone());
        }
        form = form.part("file", Part::bytes(body));

        let resp = self.http.post(&signed_url.url).multipart(form).send().await?;
        debug!("upload_object: {}", resp.status());
        if !resp.status().is_success() {
            return Err(Error::UnexpectedStatus(resp.status()));
        }
        Ok(())
    }

    /// Sealed create: raw ciphertext in the body, nonce in the path.
    pub async fn create_sealed_paste(
        &self,
        nonce_b64: &str,
        ciphertext: Vec<u8>,
    ) -> Result<SealedPaste, Error> {
        let resp = self
            .http
            .post(format!("{}controller/paste/{}", self.api_url, nonce_b64))
            .body(ciphertext)
            .send()
            .await?;
        debug!("create_sealed_paste: {}", resp.status());
        if resp.status() != StatusCode::CREATED {
            return Err(Error::UnexpectedStatus(resp.status()));
        }
        Ok(resp.json().await?)
    }

    /// Legacy create: hex-armored ciphertext as a text/plain PUT.
    pub async fn create_legacy_paste(&self, payload: String) -> Result<LegacyPaste, Error> {
        let resp = self
            .http
            .put(format!("{}api/paste/create", self.api_url))
            .header("Content-Type", "text/plain")
            .body(payload)
            .send()
            .await?;
        debug!("create_legacy_paste: {}", resp.status());
        if resp.status() != StatusCode::OK {
            return Err(Error::UnexpectedStatus(resp.status()));
        }
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_paste_parses_server_shape() {
        let raw = r#"{
            "pasteId": "noisy-otter-42",
            "signedUrl": {
                "url": "https://bucket.example/upload",
                "fields": {
                    "key": "pastes/noisy-otter-42",
                    "policy": "eyJleHBpcmF0aW9uIjoi...",
                    "x-amz-signature": "abc123"
                }
            }
        }"#;
        let paste: CreatedPaste = serde_json::from_str(raw).unwrap();
        assert_eq!(paste.paste_id, "noisy-otter-42");
        assert_eq!(paste.signed_url.url, "https://bucket.example/upload");
        assert_eq!(
            paste.signed_url.fields.get("key").map(String::as_str),
            Some("pastes/noisy-otter-42")
        );
    }

    #[test]
    fn sealed_paste_parses_underscored_id() {
        let raw = r#"{"_id": "abc123", "owner_secret": "shhh"}"#;
        let paste: SealedPaste = serde_json::from_str(raw).unwrap();
        assert_eq!(paste.id, "abc123");
        assert_eq!(paste.owner_secret, "shhh");
    }

    #[test]
    fn legacy_paste_parses_camel_case() {
        let raw = r#"{"pasteId": "abc123", "serverSecret": "shhh"}"#;
        let paste: LegacyPaste = serde_json::from_str(raw).unwrap();
        assert_eq!(paste.paste_id, "abc123");
        assert_eq!(paste.server_secret, "shhh");
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let api = PasteApi::new("https://api.paaster.io");
        assert_eq!(api.api_url, "https://api.paaster.io/");
    }
}
