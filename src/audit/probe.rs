//! Page-performance probe interface and metrics record

use crate::rows::METRIC_COUNT;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from a single performance measurement
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Failed to launch {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audit tool exited with {status}: {stderr}")]
    ToolFailed { status: String, stderr: String },

    #[error("Invalid report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("Report has no performance score")]
    MissingScore,
}

/// The six measured values written back to a group
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    /// Performance score on a 0-100 scale, two decimals
    pub score: f64,
    pub cls: Option<f64>,
    pub lcp: Option<f64>,
    pub speed_index: Option<f64>,
    pub tbt: Option<f64>,
    pub fcp: Option<f64>,
}

impl Metrics {
    /// Extracts metrics from a Lighthouse JSON report
    ///
    /// The score is `categories.performance.score` scaled to 0-100 and
    /// rounded to two decimals; a missing or null score is an error. The
    /// other values are the audits' `numericValue`, left empty when absent.
    pub fn from_report(report: &Value) -> Result<Self, AuditError> {
        let score = report
            .pointer("/categories/performance/score")
            .and_then(Value::as_f64)
            .ok_or(AuditError::MissingScore)?;

        let numeric = |audit: &str| {
            report
                .pointer(&format!("/audits/{}/numericValue", audit))
                .and_then(Value::as_f64)
        };

        Ok(Self {
            score: (score * 100.0 * 100.0).round() / 100.0,
            cls: numeric("cumulative-layout-shift"),
            lcp: numeric("largest-contentful-paint"),
            speed_index: numeric("speed-index"),
            tbt: numeric("total-blocking-time"),
            fcp: numeric("first-contentful-paint"),
        })
    }

    /// Cell values in column order: score, CLS, LCP, SI, TBT, FCP
    pub fn cells(&self) -> [String; METRIC_COUNT] {
        let cell = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
        [
            self.score.to_string(),
            cell(self.cls),
            cell(self.lcp),
            cell(self.speed_index),
            cell(self.tbt),
            cell(self.fcp),
        ]
    }
}

/// Something that measures a page
#[async_trait]
pub trait PerformanceProbe: Send + Sync {
    async fn measure(&self, url: &str) -> Result<Metrics, AuditError>;
}
