//! Application state shared by HTTP and WebSocket handlers.
//!
//! This module owns:
//!   - the judge collaborator (behind the `Judge` trait)
//!   - the single editor state store
//!
//! Handlers take the store lock only for the synchronous transitions; it is never
//! held across a judge call.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::config::ClientConfig;
use crate::judge::{Judge, JudgeClient, JudgeError};
use crate::protocol::EditorView;
use crate::store::EditorState;

#[derive(Clone)]
pub struct AppState {
    pub judge: Arc<dyn Judge>,
    pub editor: Arc<RwLock<EditorState>>,
}

impl AppState {
    /// Build state from config: HTTP judge client plus an empty store.
    #[instrument(level = "info", skip_all)]
    pub fn from_config(cfg: &ClientConfig) -> Result<Self, JudgeError> {
        let judge = JudgeClient::new(&cfg.judge)?;
        info!(
            target: "leetclone_client",
            base_url = %judge.base_url,
            timeout_secs = cfg.judge.timeout_secs,
            default_language = %cfg.editor.default_language,
            "Judge client configured."
        );
        Ok(Self::with_judge(Arc::new(judge), &cfg.editor.default_language))
    }

    pub fn with_judge(judge: Arc<dyn Judge>, language: &str) -> Self {
        Self {
            judge,
            editor: Arc::new(RwLock::new(EditorState::new(language))),
        }
    }

    /// Snapshot of the display model.
    pub async fn view(&self) -> EditorView {
        EditorView::from_state(&*self.editor.read().await)
    }
}
