use crate::config::Settings;

/// Settings to run with, plus the reason defaults were used instead of the
/// user's file, if they were. Logging is not up yet when this runs, so the
/// caller reports the reason once it is.
pub struct LoadedSettings {
    pub settings: Settings,
    pub fallback: Option<String>,
}

pub fn load_settings() -> LoadedSettings {
    let outcome = Settings::load()
        .map_err(|e| format!("failed to load config: {e}"))
        .and_then(|s| {
            s.validate()
                .map(|()| s)
                .map_err(|msg| format!("invalid config: {msg}"))
        });

    match outcome {
        Ok(settings) => LoadedSettings {
            settings,
            fallback: None,
        },
        Err(reason) => {
            eprintln!("stagefront: {reason}, using defaults");
            LoadedSettings {
                settings: Settings::default(),
                fallback: Some(reason),
            }
        }
    }
}

impl LoadedSettings {
    pub fn report(&self) {
        if let Some(reason) = &self.fallback {
            tracing::warn!(%reason, "running with default settings");
        }
    }
}
