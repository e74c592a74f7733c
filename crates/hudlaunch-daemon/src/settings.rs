use hudlaunch_core::{Properties, DEFAULT_TARGET_NAME, KEY_HUD_PATH, KEY_POLL_INTERVAL_MS, KEY_TARGET_NAME};
use tracing::warn;

/// Watcher settings resolved from the flat config store
///
/// The persisted format is the product's `key=value` file, so these are
/// plain string keys with defaults, not a structured config section.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Process name to look for (default: "TurboHUD")
    pub target_name: String,

    /// Absolute path of the executable to launch, when chosen
    pub hud_path: Option<String>,

    /// Poll interval in milliseconds (default: 1000)
    pub poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_name: DEFAULT_TARGET_NAME.to_string(),
            hud_path: None,
            poll_interval_ms: 1000,
        }
    }
}

impl Settings {
    /// Resolve settings from a loaded store, falling back to defaults
    /// for absent or unparseable values.
    pub fn from_properties(props: &Properties) -> Self {
        let defaults = Self::default();

        let target_name = props
            .get(KEY_TARGET_NAME)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.target_name);

        let hud_path = props
            .get(KEY_HUD_PATH)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let poll_interval_ms = match props.get(KEY_POLL_INTERVAL_MS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) => ms,
                Err(_) => {
                    warn!(
                        "Invalid {} value {:?}, using {}ms",
                        KEY_POLL_INTERVAL_MS, raw, defaults.poll_interval_ms
                    );
                    defaults.poll_interval_ms
                }
            },
            None => defaults.poll_interval_ms,
        };

        Self {
            target_name,
            hud_path,
            poll_interval_ms,
        }
    }

    /// Validate settings values
    pub fn validate(&self) -> Result<(), String> {
        if self.target_name.is_empty() {
            return Err("Target name must not be empty".to_string());
        }

        if self.poll_interval_ms == 0 {
            return Err("Poll interval must be > 0".to_string());
        }

        Ok(())
    }
}
