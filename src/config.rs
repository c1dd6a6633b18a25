//! Process configuration read from the environment

use crate::mail;
use crate::script::ScriptedEntry;
use crate::state_machine::{MailTemplate, WidgetContext};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_LOG_FILTER: &str = "hoverstate=info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Script {0} has no entries")]
    EmptyScript(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Overrides the inquiry destination
    pub mail_to: Option<String>,
    /// JSON file replacing the built-in quick queries
    pub script_path: Option<PathBuf>,
    /// Command plus leading arguments used to open `mailto:` URLs
    pub mail_opener: Vec<String>,
    pub log_filter: String,
    pub log_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mail_opener = var("HOVERSTATE_MAIL_OPENER")
            .map(|cmd| cmd.split_whitespace().map(str::to_string).collect())
            .unwrap_or_else(mail::default_opener);

        Self {
            mail_to: var("HOVERSTATE_MAIL_TO"),
            script_path: var("HOVERSTATE_SCRIPT").map(PathBuf::from),
            mail_opener,
            log_filter: var("HOVERSTATE_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_file: var("HOVERSTATE_LOG_FILE")
                .map_or_else(|| std::env::temp_dir().join("hoverstate.log"), PathBuf::from),
        }
    }

    /// Quick queries from the script file, or the built-in set
    pub fn load_entries(&self) -> Result<Vec<ScriptedEntry>, ConfigError> {
        let Some(path) = &self.script_path else {
            return Ok(crate::script::default_entries());
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let entries: Vec<ScriptedEntry> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
                path: path.clone(),
                source,
            })?;
        if entries.is_empty() {
            return Err(ConfigError::EmptyScript(path.clone()));
        }

        tracing::info!(path = %path.display(), count = entries.len(), "Loaded script");
        Ok(entries)
    }

    pub fn widget_context(&self) -> Result<WidgetContext, ConfigError> {
        let mut mail = MailTemplate::default();
        if let Some(to) = &self.mail_to {
            mail.to.clone_from(to);
        }
        Ok(WidgetContext::new("faq", self.load_entries()?).with_mail(mail))
    }
}
