//! Lighthouse CLI probe

use crate::audit::probe::{AuditError, Metrics, PerformanceProbe};
use crate::config::AuditConfig;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Runs `lighthouse <url> --output=json` and reads the report it writes
#[derive(Debug, Clone)]
pub struct LighthouseProbe {
    command: String,
    chrome_flags: String,
}

impl LighthouseProbe {
    pub fn new(command: impl Into<String>, chrome_flags: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            chrome_flags: chrome_flags.into(),
        }
    }

    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new(config.command.clone(), config.chrome_flags.clone())
    }
}

#[async_trait]
impl PerformanceProbe for LighthouseProbe {
    async fn measure(&self, url: &str) -> Result<Metrics, AuditError> {
        // Each invocation gets its own report file, removed on drop
        let report_file = tempfile::Builder::new()
            .prefix("lighthouse-")
            .suffix(".json")
            .tempfile()?;

        let output = Command::new(&self.command)
            .arg(url)
            .arg("--quiet")
            .arg(format!("--chrome-flags={}", self.chrome_flags))
            .arg("--output=json")
            .arg(format!("--output-path={}", report_file.path().display()))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AuditError::Spawn {
                command: self.command.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(AuditError::ToolFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let body = tokio::fs::read(report_file.path()).await?;
        let report: serde_json::Value = serde_json::from_slice(&body)?;
        Metrics::from_report(&report)
    }
}
