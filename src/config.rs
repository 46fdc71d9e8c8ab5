//! Client configuration: judge endpoint, editor defaults, and HTTP server settings.
//!
//! Loaded from the TOML file named by CLIENT_CONFIG_PATH (optional), then overridden
//! by environment variables. See `ClientConfig` for the schema.

use serde::Deserialize;
use tracing::{error, info, warn};

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct ClientConfig {
  #[serde(default)]
  pub judge: JudgeSettings,
  #[serde(default)]
  pub editor: EditorSettings,
  #[serde(default)]
  pub server: ServerSettings,
}

/// Where the judge collaborator lives and how long we wait for it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct JudgeSettings {
  pub base_url: String,
  pub timeout_secs: u64,
  pub user_agent: String,
}

impl Default for JudgeSettings {
  fn default() -> Self {
    Self {
      base_url: "http://127.0.0.1:8000".into(),
      timeout_secs: 20,
      user_agent: "leetclone-client/0.1".into(),
    }
  }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
  /// Language the editor opens with ("python" or "cpp").
  pub default_language: String,
}

impl Default for EditorSettings {
  fn default() -> Self {
    Self { default_language: "python".into() }
  }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
  pub port: u16,
  /// Directory holding the built view layer (SPA).
  pub static_dir: String,
}

impl Default for ServerSettings {
  fn default() -> Self {
    Self { port: 3000, static_dir: "./static".into() }
  }
}

impl ClientConfig {
  /// File (if any) then environment overrides.
  pub fn load() -> Self {
    let mut cfg = load_config_file_from_env().unwrap_or_default();
    cfg.apply_env(|k| std::env::var(k).ok());
    cfg
  }

  /// Apply overrides from a key lookup. Unparseable numbers are ignored with a warning.
  pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
    if let Some(v) = get("JUDGE_BASE_URL") {
      self.judge.base_url = v;
    }
    if let Some(v) = get("JUDGE_TIMEOUT_SECS") {
      match v.parse() {
        Ok(n) => self.judge.timeout_secs = n,
        Err(e) => warn!(target: "leetclone_client", value = %v, error = %e, "Ignoring JUDGE_TIMEOUT_SECS"),
      }
    }
    if let Some(v) = get("DEFAULT_LANGUAGE") {
      self.editor.default_language = v;
    }
    if let Some(v) = get("PORT") {
      match v.parse() {
        Ok(n) => self.server.port = n,
        Err(e) => warn!(target: "leetclone_client", value = %v, error = %e, "Ignoring PORT"),
      }
    }
    if let Some(v) = get("STATIC_DIR") {
      self.server.static_dir = v;
    }
  }
}

/// Attempt to load `ClientConfig` from CLIENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_file_from_env() -> Option<ClientConfig> {
  let path = std::env::var("CLIENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<ClientConfig>(&s) {
      Ok(cfg) => {
        info!(target: "leetclone_client", %path, "Loaded client config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "leetclone_client", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "leetclone_client", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
