// `set` subcommand: validate and persist a single config parameter.

use serde_json::Value;

use crate::error::Error;
use crate::misc::end_slash;
use crate::storage::{JsonStorage, VALID_KEYS};

const URL_KEYS: [&str; 2] = ["API_URL", "FRONTEND_URL"];

pub fn run(storage: &JsonStorage, name: &str, value: &str) -> Result<(), Error> {
    let name = name.to_uppercase();
    if !VALID_KEYS.contains(&name.as_str()) {
        println!("{} isn't a valid parameter.", name);
        return Ok(());
    }

    let to_set = if URL_KEYS.contains(&name.as_str()) {
        Value::from(end_slash(value))
    } else {
        match value.to_lowercase().as_str() {
            "true" => Value::from(true),
            "false" => Value::from(false),
            _ => {
                println!("{} expects true or false.", name);
                return Ok(());
            }
        }
    };

    storage.set(&name, to_set)
}
