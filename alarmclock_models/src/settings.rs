use serde::Deserialize;

pub const DEFAULT_INTERPRETER_URL: &str =
    "https://mobileaialarmclock-production.up.railway.app/set-alarm";

fn default_interpreter_url() -> String {
    DEFAULT_INTERPRETER_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Debug, Clone)]
pub struct InterpreterSettings {
    #[serde(default = "default_interpreter_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            url: default_interpreter_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct TelegramSettings {
    pub token: String,
    pub chat_id: i64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AlarmSettings {
    /// IANA zone name used for timestamps without an offset. System local zone when absent.
    pub timezone: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub interpreter: InterpreterSettings,
    pub telegram: Option<TelegramSettings>,
    #[serde(default)]
    pub alarm: AlarmSettings,
}
