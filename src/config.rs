// src/config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// May be empty; a missing key only surfaces when a call is attempted.
    pub gemini_api_key: String,
    pub analysis_model: String,
    pub editing_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            gemini_api_key: String::new(),
            analysis_model: "gemini-2.5-flash".to_string(),
            editing_model: "gemini-2.5-flash-image".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(v) = std::env::var("BIND_ADDR") {
            config.bind_addr = v;
        }
        if let Ok(v) = std::env::var("GEMINI_API_KEY") {
            config.gemini_api_key = v;
        } else if let Ok(v) = std::env::var("API_KEY") {
            config.gemini_api_key = v;
        }
        if let Ok(v) = std::env::var("GEMINI_ANALYSIS_MODEL") {
            config.analysis_model = v;
        }
        if let Ok(v) = std::env::var("GEMINI_EDITING_MODEL") {
            config.editing_model = v;
        }

        config
    }
}
