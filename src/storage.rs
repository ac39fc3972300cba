// Flat JSON key-value store under the platform config directory, plus the
// typed view of the settings the client reads at startup.

use std::fs;
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::error::Error;
use crate::misc::end_slash;

/// Keys the `set` command accepts.
pub const VALID_KEYS: [&str; 5] = [
    "API_URL",
    "FRONTEND_URL",
    "COPY_URL_TO_CLIPBOARD",
    "OPEN_URL_IN_BROWSER",
    "ECHO_URL",
];

pub const DEFAULT_API_URL: &str = "https://api.paaster.io/";
pub const DEFAULT_FRONTEND_URL: &str = "https://paaster.io/";

/// Handle on a config directory holding a single `config.json`.
pub struct JsonStorage {
    dir: PathBuf,
}

impl JsonStorage {
    /// Open the store in the platform config directory
    /// (`~/.config/paaster` on Linux), seeding defaults on first run.
    pub fn open() -> Result<JsonStorage, Error> {
        let dir = dirs::config_dir().ok_or(Error::NoConfigDir)?.join("paaster");
        JsonStorage::with_dir(dir)
    }

    /// Open the store against an explicit directory.
    pub fn with_dir(dir: PathBuf) -> Result<JsonStorage, Error> {
        let storage = JsonStorage { dir };
        if !storage.config_path().exists() {
            storage.seed_defaults()?;
        }
        Ok(storage)
    }

    fn config_path(&self) -> PathBuf {
        self.dir.join("config.json")
    }

    fn seed_defaults(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)?;
        self.set("API_URL", Value::from(DEFAULT_API_URL))?;
        self.set("FRONTEND_URL", Value::from(DEFAULT_FRONTEND_URL))?;
        self.set("COPY_URL_TO_CLIPBOARD", Value::from(true))?;
        self.set("OPEN_URL_IN_BROWSER", Value::from(false))?;
        self.set("NAME", Value::from("paaster"))?;
        self.set("ECHO_URL", Value::from(false))?;
        Ok(())
    }

    /// Full contents. A missing or unparseable file reads as empty; a broken
    /// config must never keep the client from starting.
    pub fn all(&self) -> Map<String, Value> {
        match fs::read_to_string(self.config_path()) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => Map::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.all().remove(key)
    }

    /// Write one key and persist the whole file immediately.
    pub fn set(&self, key: &str, value: Value) -> Result<(), Error> {
        let mut data = self.all();
        data.insert(key.to_string(), value);
        fs::write(self.config_path(), serde_json::to_string(&data)?)?;
        Ok(())
    }
}

/// Typed view of the stored preferences, with defaults for absent keys.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub frontend_url: String,
    pub copy_url_to_clipboard: bool,
    pub open_url_in_browser: bool,
    pub echo_url: bool,
}

impl Settings {
    pub fn load(storage: &JsonStorage) -> Settings {
        let data = storage.all();
        let str_key = |key: &str, fallback: &str| -> String {
            data.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string())
        };
        let bool_key = |key: &str, fallback: bool| -> bool {
            data.get(key).and_then(Value::as_bool).unwrap_or(fallback)
        };

        Settings {
            api_url: end_slash(&str_key("API_URL", DEFAULT_API_URL)),
            frontend_url: end_slash(&str_key("FRONTEND_URL", DEFAULT_FRONTEND_URL)),
            copy_url_to_clipboard: bool_key("COPY_URL_TO_CLIPBOARD", true),
            open_url_in_browser: bool_key("OPEN_URL_IN_BROWSER", false),
            echo_url: bool_key("ECHO_URL", false),
        }
    }
}
