// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `campusmind doctor` command implementation.
//!
//! Checks configuration, the hosted model, the identity provider, the mail
//! relay and a running server, then prints one line per check.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use campusmind_config::model::CampusMindConfig;
use campusmind_core::CampusMindError;
use campusmind_core::traits::PluginAdapter;
use campusmind_core::types::HealthStatus;
use campusmind_gemini::GeminiModel;
use campusmind_identity::FirebaseIdentity;
use campusmind_mail::SmtpMailer;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn finish(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `campusmind doctor` command.
///
/// With `plain`, or when stdout is not a terminal, output is uncolored.
pub async fn run_doctor(config: &CampusMindConfig, plain: bool) -> Result<(), CampusMindError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_config().await,
        check_model(config).await,
        check_identity(config).await,
        check_mail(config).await,
        check_health_endpoint(config).await,
        check_memory().await,
    ];

    println!();
    println!("  campusmind doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", render(result, use_color));
    }
    println!();

    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn render(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!(
            "    {symbol} {:<20} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Maps an adapter health report onto a check line.
fn from_health(name: &str, health: Result<HealthStatus, CampusMindError>, start: Instant) -> CheckResult {
    match health {
        Ok(HealthStatus::Healthy) => CheckResult::finish(name, CheckStatus::Pass, "healthy", start),
        Ok(HealthStatus::Degraded(reason)) => {
            CheckResult::finish(name, CheckStatus::Warn, reason, start)
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::finish(name, CheckStatus::Fail, reason, start)
        }
        Err(e) => CheckResult::finish(name, CheckStatus::Fail, e.to_string(), start),
    }
}

/// Check configuration loads without errors.
async fn check_config() -> CheckResult {
    let start = Instant::now();
    match campusmind_config::load_and_validate() {
        Ok(_) => CheckResult::finish("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::finish(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Check the model API key resolves and the endpoint answers.
async fn check_model(config: &CampusMindConfig) -> CheckResult {
    let start = Instant::now();
    if let Err(e) = GeminiModel::new(&config.gemini) {
        return CheckResult::finish("Model API", CheckStatus::Fail, e.user_message(), start);
    }

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            return CheckResult::finish(
                "Model API",
                CheckStatus::Fail,
                format!("HTTP client error: {e}"),
                start,
            );
        }
    };

    match client.head(&config.gemini.base_url).send().await {
        Ok(_) => CheckResult::finish("Model API", CheckStatus::Pass, "reachable", start),
        Err(e) => {
            let msg = if e.is_timeout() {
                "timeout (5s)".to_string()
            } else if e.is_connect() {
                "connection refused".to_string()
            } else {
                format!("error: {e}")
            };
            CheckResult::finish("Model API", CheckStatus::Fail, msg, start)
        }
    }
}

/// Check the service account loads and can mint an access token.
async fn check_identity(config: &CampusMindConfig) -> CheckResult {
    let start = Instant::now();
    match FirebaseIdentity::from_config(&config.firebase) {
        Ok(Some(identity)) => from_health("Identity", identity.health_check().await, start),
        Ok(None) => CheckResult::finish(
            "Identity",
            CheckStatus::Warn,
            "not configured (sign-in and admin disabled)",
            start,
        ),
        Err(e) => CheckResult::finish("Identity", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Check the SMTP relay answers.
async fn check_mail(config: &CampusMindConfig) -> CheckResult {
    let start = Instant::now();
    match SmtpMailer::from_config(&config.mail) {
        Ok(Some(mailer)) => from_health("Mail relay", mailer.health_check().await, start),
        Ok(None) => CheckResult::finish(
            "Mail relay",
            CheckStatus::Warn,
            "not configured (support email disabled)",
            start,
        ),
        Err(e) => CheckResult::finish("Mail relay", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Check a running server's health endpoint.
async fn check_health_endpoint(config: &CampusMindConfig) -> CheckResult {
    let start = Instant::now();
    let url = format!("http://{}:{}/health", config.server.host, config.server.port);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            return CheckResult::finish(
                "Health endpoint",
                CheckStatus::Fail,
                format!("HTTP client error: {e}"),
                start,
            );
        }
    };

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            CheckResult::finish("Health endpoint", CheckStatus::Pass, "reachable", start)
        }
        Ok(resp) => CheckResult::finish(
            "Health endpoint",
            CheckStatus::Warn,
            format!("status {}", resp.status()),
            start,
        ),
        Err(_) => CheckResult::finish(
            "Health endpoint",
            CheckStatus::Warn,
            format!("not reachable at {url} (server may not be running)"),
            start,
        ),
    }
}

/// Heap and resident size as jemalloc sees them.
async fn check_memory() -> CheckResult {
    let start = Instant::now();

    #[cfg(not(target_env = "msvc"))]
    {
        let _ = tikv_jemalloc_ctl::epoch::advance();
        let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
        let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
        let allocated_mb = allocated as f64 / (1024.0 * 1024.0);
        let resident_mb = resident as f64 / (1024.0 * 1024.0);
        CheckResult::finish(
            "Memory",
            CheckStatus::Pass,
            format!("heap: {allocated_mb:.1} MB, resident: {resident_mb:.1} MB"),
            start,
        )
    }

    #[cfg(target_env = "msvc")]
    {
        CheckResult::finish(
            "Memory",
            CheckStatus::Warn,
            "jemalloc not available on MSVC",
            start,
        )
    }
}
