//! Client options and loading.
//!
//! Options are loaded from a JSON file and environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options recognised by [`crate::Client`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    /// host:port the webhook listener binds to (default "127.0.0.1:8080").
    #[serde(default = "default_webhook_addr")]
    pub webhook_addr: String,

    /// When false, `run` never starts the webhook listener.
    #[serde(default)]
    pub enable_webhook: bool,

    /// Verbose per-event diagnostics. No effect on dispatch.
    #[serde(default)]
    pub debug: bool,

    /// After stop, how long open webhook connections may delay `run` (default 5000).
    #[serde(default = "default_drain_grace_ms")]
    pub drain_grace_ms: u64,
}

fn default_webhook_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_drain_grace_ms() -> u64 {
    5000
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            webhook_addr: default_webhook_addr(),
            enable_webhook: false,
            debug: false,
            drain_grace_ms: default_drain_grace_ms(),
        }
    }
}

impl ClientOptions {
    /// Apply PERCH_WEBHOOK_ADDR, PERCH_ENABLE_WEBHOOK and PERCH_DEBUG when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(addr) = env_non_empty("PERCH_WEBHOOK_ADDR") {
            self.webhook_addr = addr;
        }
        if let Some(v) = env_non_empty("PERCH_ENABLE_WEBHOOK") {
            self.enable_webhook = parse_flag(&v);
        }
        if let Some(v) = env_non_empty("PERCH_DEBUG") {
            self.debug = parse_flag(&v);
        }
        self
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Load options from a JSON file. Missing file => default options.
pub fn load_options(path: &Path) -> Result<ClientOptions> {
    if !path.exists() {
        log::debug!("options file not found, using defaults: {}", path.display());
        return Ok(ClientOptions::default());
    }
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("reading options from {}", path.display()))?;
    let options = serde_json::from_str(&s)
        .with_context(|| format!("parsing options from {}", path.display()))?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let o = ClientOptions::default();
        assert_eq!(o.webhook_addr, "127.0.0.1:8080");
        assert!(!o.enable_webhook);
        assert!(!o.debug);
        assert_eq!(o.drain_grace_ms, 5000);
    }

    #[test]
    fn parses_camel_case_keys() {
        let o: ClientOptions = serde_json::from_str(
            r#"{"webhookAddr":"0.0.0.0:9000","enableWebhook":true,"debug":true,"drainGraceMs":250}"#,
        )
        .unwrap();
        assert_eq!(o.webhook_addr, "0.0.0.0:9000");
        assert!(o.enable_webhook);
        assert!(o.debug);
        assert_eq!(o.drain_grace_ms, 250);
    }

    #[test]
    fn load_options_missing_file_is_default() {
        let path = std::env::temp_dir().join("perch-options-does-not-exist.json");
        let o = load_options(&path).unwrap();
        assert_eq!(o.webhook_addr, "127.0.0.1:8080");
    }

    #[test]
    fn load_options_reads_file() {
        let path = std::env::temp_dir().join(format!("perch-options-{}.json", uuid::Uuid::new_v4()));
        std::fs::File::create(&path)
            .and_then(|mut f| f.write_all(br#"{"enableWebhook":true}"#))
            .unwrap();
        let o = load_options(&path).unwrap();
        assert!(o.enable_webhook);
        assert_eq!(o.webhook_addr, "127.0.0.1:8080");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_options_bad_json_mentions_path() {
        let path = std::env::temp_dir().join(format!("perch-bad-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{").unwrap();
        let err = load_options(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing options"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn env_overrides_apply() {
        std::env::set_var("PERCH_WEBHOOK_ADDR", " 0.0.0.0:7000 ");
        std::env::set_var("PERCH_ENABLE_WEBHOOK", "true");
        std::env::set_var("PERCH_DEBUG", "");
        let o = ClientOptions::default().with_env_overrides();
        std::env::remove_var("PERCH_WEBHOOK_ADDR");
        std::env::remove_var("PERCH_ENABLE_WEBHOOK");
        std::env::remove_var("PERCH_DEBUG");
        assert_eq!(o.webhook_addr, "0.0.0.0:7000");
        assert!(o.enable_webhook);
        assert!(!o.debug);
    }

    #[test]
    fn flags() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }
}
