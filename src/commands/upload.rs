// `upload` subcommand: gather input, encrypt client-side, upload, then act
// on the share URL (echo / clipboard / browser).

use std::fs;

use arboard::Clipboard;
use clap::ValueEnum;
use log::{debug, info};

use crate::api::PasteApi;
use crate::crypto::{password, sealed, stream};
use crate::error::Error;
use crate::misc::{share_url, url_unpadded_base64};
use crate::storage::{JsonStorage, Settings};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum InputMode {
    #[default]
    Clipboard,
    File,
    Inline,
}

/// API generation to speak; older self-hosted servers still run the earlier
/// surfaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Protocol {
    /// Chunked streaming encryption with a two-phase upload
    #[default]
    Modern,
    /// One-shot authenticated encryption
    Sealed,
    /// Password-derived AES-CBC
    Legacy,
}

/// Per-invocation overrides; `None` falls back to the stored setting.
#[derive(Clone, Copy, Debug, Default)]
pub struct UploadOverrides {
    pub copy_to_clipboard: Option<bool>,
    pub open_browser: Option<bool>,
    pub echo_url: Option<bool>,
}

struct UploadOutcome {
    paste_id: String,
    fragment_key: String,
    // Query parameter name and value of the one-time management credential,
    // for the generations that return one.
    management_secret: Option<(&'static str, String)>,
}

pub async fn run(
    storage: &JsonStorage,
    mode: InputMode,
    input: Option<&str>,
    protocol: Protocol,
    overrides: UploadOverrides,
) -> Result<(), Error> {
    let settings = Settings::load(storage);

    let plain_paste = match mode {
        InputMode::Clipboard => Clipboard::new()
            .and_then(|mut clipboard| clipboard.get_text())
            .map_err(|e| Error::Clipboard(e.to_string()))?,
        InputMode::File => match input {
            Some(path) => fs::read_to_string(path)?,
            None => {
                println!("--mode file requires input");
                return Ok(());
            }
        },
        InputMode::Inline => match input {
            Some(text) => text.to_string(),
            None => {
                println!("--mode inline requires input");
                return Ok(());
            }
        },
    };

    if plain_paste.trim().is_empty() {
        debug!("paste is blank, upload skipped");
        return Ok(());
    }

    let api = PasteApi::new(&settings.api_url);
    let outcome = match protocol {
        Protocol::Modern => upload_modern(&api, plain_paste.as_bytes()).await?,
        Protocol::Sealed => upload_sealed(&api, plain_paste.as_bytes()).await?,
        Protocol::Legacy => upload_legacy(&api, plain_paste.as_bytes()).await?,
    };
    info!("paste {} created", outcome.paste_id);

    let url = share_url(&settings.frontend_url, &outcome.paste_id, &outcome.fragment_key);

    if overrides.echo_url.unwrap_or(settings.echo_url) {
        println!("{}", url);
    }

    if overrides.copy_to_clipboard.unwrap_or(settings.copy_url_to_clipboard) {
        Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(url.clone()))
            .map_err(|e| Error::Clipboard(e.to_string()))?;
    }

    if overrides.open_browser.unwrap_or(settings.open_url_in_browser) {
        // The management secret rides only the browser URL; the frontend
        // strips it from the address bar right away. Copied links may be
        // shared with someone else, so they never carry it.
        let browser_url = match &outcome.management_secret {
            Some((param, secret)) => format!("{}&{}={}", url, param, secret),
            None => url.clone(),
        };
        open::that(browser_url)?;
    }

    Ok(())
}

async fn upload_modern(api: &PasteApi, plaintext: &[u8]) -> Result<UploadOutcome, Error> {
    let master_key = stream::generate_master_key();
    let encrypted = stream::encrypt(&master_key, plaintext)?;

    let created = api
        .create_paste(
            &url_unpadded_base64(&encrypted.header),
            &url_unpadded_base64(&encrypted.salt),
        )
        .await?;
    api.upload_object(&created.signed_url, encrypted.body).await?;

    Ok(UploadOutcome {
        paste_id: created.paste_id,
        fragment_key: url_unpadded_base64(&master_key),
        management_secret: None,
    })
}

async fn upload_sealed(api: &PasteApi, plaintext: &[u8]) -> Result<UploadOutcome, Error> {
    let key = sealed::generate_key();
    let nonce = sealed::generate_nonce();
    let ciphertext = sealed::seal(&key, &nonce, plaintext)?;

    let paste = api
        .create_sealed_paste(&url_unpadded_base64(&nonce), ciphertext)
        .await?;

    Ok(UploadOutcome {
        paste_id: paste.id,
        fragment_key: url_unpadded_base64(&key),
        management_secret: Some(("ownerSecret", paste.owner_secret)),
    })
}

async fn upload_legacy(api: &PasteApi, plaintext: &[u8]) -> Result<UploadOutcome, Error> {
    let secret = password::generate_url_secret();
    let payload = password::password_encrypt(&secret, plaintext);

    let paste = api.create_legacy_paste(payload).await?;

    Ok(UploadOutcome {
        paste_id: paste.paste_id,
        fragment_key: secret,
        management_secret: Some(("serverSecret", paste.server_secret)),
    })
}
