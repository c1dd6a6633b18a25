//! Mail handoff
//!
//! Free-text inquiries leave the widget as a `mailto:` URL handed to the
//! desktop's URL opener. Delivery is outside this process: we only learn
//! whether the opener could be launched.

use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

/// A composed inquiry, ready to be opened in the user's mail client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailDraft {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// `mailto:` URL with subject and body percent-escaped
    pub fn mailto_url(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

/// Failure to hand a draft to the mail client
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Failed to launch URL opener `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("URL opener `{program}` exited with {status}")]
    OpenerFailed { program: String, status: ExitStatus },
    #[error("URL opener command is empty")]
    NoOpener,
}

/// Platform command that opens a URL with the default handler
pub fn default_opener() -> Vec<String> {
    if cfg!(target_os = "macos") {
        vec!["open".to_string()]
    } else if cfg!(target_os = "windows") {
        vec![
            "cmd".to_string(),
            "/C".to_string(),
            "start".to_string(),
            String::new(),
        ]
    } else {
        vec!["xdg-open".to_string()]
    }
}

/// Run `opener url` and wait for the opener itself to exit
pub async fn open_url(opener: &[String], url: &str) -> Result<(), MailError> {
    let (program, args) = opener.split_first().ok_or(MailError::NoOpener)?;

    tracing::debug!(program = %program, "Launching URL opener");
    let status = Command::new(program)
        .args(args)
        .arg(url)
        .status()
        .await
        .map_err(|source| MailError::Launch {
            program: program.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(MailError::OpenerFailed {
            program: program.clone(),
            status,
        })
    }
}
