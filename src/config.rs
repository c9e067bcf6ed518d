use dotenvy::dotenv;
use log::error;
use serde::Deserialize;
use std::env;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub model_path: Option<String>,
    pub ml_service_url: Option<String>,
    #[serde(default = "default_feedback_path")]
    pub feedback_path: String,
    pub http_bind_address: Option<String>,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_feedback_board_size")]
    pub feedback_board_size: usize,
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,
}

fn default_feedback_path() -> String {
    "feedback.json".to_string()
}

fn default_currency_symbol() -> String {
    "₨".to_string()
}

fn default_feedback_board_size() -> usize {
    5
}

fn default_session_idle_minutes() -> u64 {
    60
}

pub fn create_test_config() -> Config {
    Config {
        model_path: None,
        ml_service_url: None,
        feedback_path: default_feedback_path(),
        http_bind_address: None,
        currency_symbol: default_currency_symbol(),
        feedback_board_size: default_feedback_board_size(),
        session_idle_minutes: default_session_idle_minutes(),
    }
}

pub fn read_config() -> Config {
    dotenv().ok();
    env::var(CONFIG_PATH_ENV)
        .map_err(|_| format!("{CONFIG_PATH_ENV} .env not set"))
        .and_then(|config_path| std::fs::read(config_path).map_err(|e| e.to_string()))
        .and_then(|bytes| toml::from_slice(&bytes).map_err(|e| e.to_string()))
        .unwrap_or_else(|err| {
            error!("failed to read config: {err}");
            std::process::exit(1);
        })
}
