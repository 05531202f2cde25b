// file: src/utils/telemetry.rs
// description: verify-command health report and per-stage timing of answers
// reference: https://docs.rs/tracing

use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The parts of a deployment that `verify` inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Configuration,
    UploadDirectory,
    RecordStore,
    Provider,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Component::Configuration => "configuration",
            Component::UploadDirectory => "upload directory",
            Component::RecordStore => "record store",
            Component::Provider => "provider",
        };
        f.write_str(label)
    }
}

/// Ordered by severity so a report takes the worst of its checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    fn marker(self) -> ColoredString {
        match self {
            HealthStatus::Healthy => "ok".green(),
            HealthStatus::Degraded => "warn".yellow(),
            HealthStatus::Unhealthy => "fail".red(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub component: Component,
    pub status: HealthStatus,
    pub detail: Option<String>,
    pub elapsed_ms: u64,
}

impl HealthCheck {
    fn at(component: Component, status: HealthStatus, detail: Option<String>, started: Instant) -> Self {
        Self {
            component,
            status,
            detail,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    pub fn passed(component: Component, started: Instant) -> Self {
        Self::at(component, HealthStatus::Healthy, None, started)
    }

    /// Usable, but running with a limitation worth reporting.
    pub fn limited(component: Component, detail: impl Into<String>, started: Instant) -> Self {
        Self::at(component, HealthStatus::Degraded, Some(detail.into()), started)
    }

    pub fn failed(component: Component, error: impl fmt::Display, started: Instant) -> Self {
        Self::at(component, HealthStatus::Unhealthy, Some(error.to_string()), started)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: &'static str,
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    pub fn new(checks: Vec<HealthCheck>, version: &'static str) -> Self {
        let status = checks
            .iter()
            .map(|check| check.status)
            .max()
            .unwrap_or(HealthStatus::Healthy);

        Self {
            status,
            version,
            checks,
        }
    }

    pub fn check(&self, component: Component) -> Option<&HealthCheck> {
        self.checks.iter().find(|check| check.component == component)
    }

    pub fn format(&self) -> String {
        let mut output = format!("pdf_qa {} [{}]\n", self.version, self.status.marker());

        for check in &self.checks {
            output.push_str(&format!(
                "  {:<5} {:<17} {:>5}ms",
                check.status.marker(),
                check.component.to_string(),
                check.elapsed_ms
            ));
            if let Some(detail) = &check.detail {
                output.push_str(&format!("  {}", detail.dimmed()));
            }
            output.push('\n');
        }

        output
    }
}

/// Times the stages of one question and logs them together when done.
pub struct StageTimer {
    started: Instant,
    last: Instant,
    stages: Vec<(&'static str, Duration)>,
}

impl StageTimer {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last: now,
            stages: Vec::new(),
        }
    }

    /// Closes the stage that ran since the previous lap.
    pub fn lap(&mut self, stage: &'static str) -> Duration {
        let now = Instant::now();
        let spent = now - self.last;
        self.last = now;
        self.stages.push((stage, spent));
        debug!(stage, elapsed_ms = spent.as_millis() as u64, "Stage done");
        spent
    }

    pub fn stages(&self) -> &[(&'static str, Duration)] {
        &self.stages
    }

    pub fn finish(self, chunks: usize) -> Duration {
        let total = self.started.elapsed();
        let breakdown = self
            .stages
            .iter()
            .map(|(stage, spent)| format!("{}={}ms", stage, spent.as_millis()))
            .collect::<Vec<_>>()
            .join(" ");
        info!(
            chunks,
            total_ms = total.as_millis() as u64,
            stages = %breakdown,
            "Answered question"
        );
        total
    }
}
