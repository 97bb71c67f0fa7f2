use std::{collections::HashMap, fs};

/// Connection settings resolved outside the command line: an optional
/// `simcloud.toml` in the working directory, overridden by environment
/// variables. Flags override both.
#[derive(Debug, Default)]
pub struct Settings {
    pub host: Option<String>,
    pub api_key: Option<String>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("simcloud.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("host") {
                settings.host = Some(v.clone());
            }
            if let Some(v) = file_cfg.get("api_key") {
                settings.api_key = Some(v.clone());
            }
        }
    }

    if let Ok(v) = std::env::var("SIMCLOUD_HOST") {
        settings.host = Some(v);
    }
    if let Ok(v) = std::env::var("SIMCLOUD_API_KEY") {
        settings.api_key = Some(v);
    }

    settings
}
