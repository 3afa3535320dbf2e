// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `campusmind serve` command implementation.
//!
//! Builds the model, flow, identity and mail adapters from configuration,
//! assembles the gateway state and serves until SIGINT or SIGTERM.

use std::sync::Arc;

use campusmind_config::model::CampusMindConfig;
use campusmind_core::CampusMindError;
use campusmind_core::traits::{FlowAdapter, IdentityAdapter, MailAdapter};
use campusmind_flows::{FlowService, PromptFlows};
use campusmind_gateway::AppState;
use campusmind_gemini::GeminiModel;
use campusmind_identity::FirebaseIdentity;
use campusmind_mail::SmtpMailer;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs the `campusmind serve` command.
pub async fn run_serve(config: CampusMindConfig) -> Result<(), CampusMindError> {
    init_tracing(&config.app.log_level);

    info!(name = %config.app.name, "starting campusmind serve");

    let server = config.server.clone();
    let state = build_state(config)?;
    let cancel = install_signal_handler();

    campusmind_gateway::serve(&server, state, cancel).await?;

    info!("campusmind serve shutdown complete");
    Ok(())
}

/// Builds every adapter and wraps them in the gateway state.
///
/// The model is required. Identity and mail are optional: when their
/// credentials are absent the features that need them answer with an
/// explanatory message instead.
pub fn build_state(config: CampusMindConfig) -> Result<AppState, CampusMindError> {
    let model = Arc::new(GeminiModel::new(&config.gemini)?);
    let flows: Arc<dyn FlowAdapter> =
        Arc::new(PromptFlows::new(model)?.with_temperature(config.gemini.temperature));
    let service = FlowService::new(flows, &config.flows);

    let identity = FirebaseIdentity::from_config(&config.firebase)?
        .map(|identity| Arc::new(identity) as Arc<dyn IdentityAdapter>);
    if identity.is_none() {
        warn!("identity provider not configured; sign-in and admin features are disabled");
    }

    let mail = SmtpMailer::from_config(&config.mail)?
        .map(|mailer| Arc::new(mailer) as Arc<dyn MailAdapter>);
    if mail.is_none() {
        warn!("mail relay not configured; support email is disabled");
    }

    Ok(AppState::new(config, service, identity, mail))
}

/// Installs SIGINT/SIGTERM handlers and returns a token cancelled on either.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                        _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "could not install SIGTERM handler; Ctrl+C only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("campusmind={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
