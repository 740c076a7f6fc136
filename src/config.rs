//! Client configuration.
//!
//! Loaded from environment variables (a `.env` file is honoured for local
//! development) and overridable from the command line.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SPEECH_LANG: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL. Empty means endpoints are used as relative paths.
    pub api_url: String,
    pub request_timeout: Duration,
    /// External text-to-speech program and its leading arguments.
    pub tts_command: Option<Vec<String>>,
    /// External speech-to-text program and its arguments.
    pub stt_command: Option<Vec<String>>,
    pub speech_lang: String,
    pub voice_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            tts_command: None,
            stt_command: None,
            speech_lang: DEFAULT_SPEECH_LANG.to_string(),
            voice_enabled: true,
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    // *   `EDUMATE_API_URL`: backend base URL. Defaults to "http://127.0.0.1:8000".
    // *   `EDUMATE_TIMEOUT_SECS`: per-request timeout. Defaults to 30.
    // *   `EDUMATE_TTS_COMMAND`: (Optional) e.g. "espeak -v en-us".
    // *   `EDUMATE_STT_COMMAND`: (Optional) program printing one transcript line.
    // *   `EDUMATE_SPEECH_LANG`: (Optional) Defaults to "en-US".
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("EDUMATE_API_URL")
            .map(|url| url.trim().to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout = match lookup("EDUMATE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidVar {
                    var: "EDUMATE_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let speech_lang = lookup("EDUMATE_SPEECH_LANG")
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SPEECH_LANG.to_string());

        Ok(Self {
            api_url,
            request_timeout,
            tts_command: lookup("EDUMATE_TTS_COMMAND").and_then(|c| split_command(&c)),
            stt_command: lookup("EDUMATE_STT_COMMAND").and_then(|c| split_command(&c)),
            speech_lang,
            voice_enabled: true,
        })
    }
}

fn split_command(raw: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    (!parts.is_empty()).then_some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("EDUMATE_API_URL", ""),
            ("EDUMATE_TIMEOUT_SECS", "5"),
            ("EDUMATE_TTS_COMMAND", "espeak -v en-us"),
            ("EDUMATE_STT_COMMAND", "   "),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.tts_command, Some(vec!["espeak".into(), "-v".into(), "en-us".into()]));
        assert_eq!(config.stt_command, None);
    }

    #[test]
    fn bad_timeout() {
        let err = Config::from_lookup(lookup(&[("EDUMATE_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for EDUMATE_TIMEOUT_SECS: soon");
    }
}
