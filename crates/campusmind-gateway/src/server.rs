// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state.

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::{Router, middleware as axum_middleware};
use campusmind_chat::ChatRegistry;
use campusmind_config::model::{CampusMindConfig, ServerConfig};
use campusmind_core::{CampusMindError, IdentityAdapter, MailAdapter, PluginAdapter};
use campusmind_flows::FlowService;
use campusmind_identity::{NOT_CONFIGURED_MESSAGE, UserDirectory};
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::ForumBoard;
use crate::gate::{GateRules, session_gate};
use crate::handlers::{admin, auth, booking, chat, forum, health, profile, support, triage, views};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CampusMindConfig>,
    pub gate: Arc<GateRules>,
    pub flows: FlowService,
    pub chats: Arc<ChatRegistry>,
    /// `None` when no service account is configured.
    pub identity: Option<Arc<dyn IdentityAdapter>>,
    pub directory: Option<Arc<UserDirectory>>,
    /// `None` when no SMTP relay is configured.
    pub mail: Option<Arc<dyn MailAdapter>>,
    pub forum: Arc<ForumBoard>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: CampusMindConfig,
        flows: FlowService,
        identity: Option<Arc<dyn IdentityAdapter>>,
        mail: Option<Arc<dyn MailAdapter>>,
    ) -> Self {
        let directory = identity
            .as_ref()
            .map(|identity| Arc::new(UserDirectory::new(Arc::clone(identity))));
        Self {
            gate: Arc::new(GateRules::from_config(&config.session)),
            config: Arc::new(config),
            flows,
            chats: Arc::new(ChatRegistry::new()),
            identity,
            directory,
            mail,
            forum: Arc::new(ForumBoard::seeded(Utc::now())),
            started_at: Instant::now(),
        }
    }

    /// The identity provider, or the not-configured error.
    pub fn identity(&self) -> Result<&Arc<dyn IdentityAdapter>, CampusMindError> {
        self.identity
            .as_ref()
            .ok_or_else(|| CampusMindError::NotConfigured(NOT_CONFIGURED_MESSAGE.to_string()))
    }

    pub fn directory(&self) -> Result<&Arc<UserDirectory>, CampusMindError> {
        self.directory
            .as_ref()
            .ok_or_else(|| CampusMindError::NotConfigured(NOT_CONFIGURED_MESSAGE.to_string()))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("active_chats", &self.chats.len())
            .field("identity", &self.identity.as_ref().map(|i| i.name().to_string()))
            .field("mail", &self.mail.as_ref().map(|m| m.name().to_string()))
            .finish_non_exhaustive()
    }
}

/// Builds the full router: views, form actions, JSON API and health.
///
/// The session gate wraps everything; it only acts on `GET`/`HEAD` requests
/// for paths in its lists.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route("/health", get(health::get_health));

    let view_routes = Router::new()
        .route("/", get(views::home))
        .route("/chat", get(views::chat))
        .route("/booking", get(views::booking))
        // Older links to the scheduling pages land on the booking form.
        .route("/scheduling", get(views::booking))
        .route("/consultations", get(views::booking))
        .route("/resources", get(views::resources))
        .route("/forum", get(views::forum))
        .route("/profile", get(views::profile))
        .route("/admin", get(views::admin))
        .route("/auth/login", get(views::login_form).post(auth::login))
        .route("/auth/signup", get(views::signup_form).post(auth::signup))
        .route("/auth/logout", post(auth::logout));

    let api_routes = Router::new()
        .route("/api/chat", get(chat::get_transcript).post(chat::post_chat))
        .route("/api/triage", post(triage::post_triage))
        .route("/api/profile", post(profile::post_profile))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{uid}/disabled", post(admin::set_disabled))
        .route("/api/support", post(support::post_support))
        .route("/api/booking", post(booking::post_booking))
        .route("/api/forum", get(forum::list_posts).post(forum::post_forum));

    Router::new()
        .merge(public_routes)
        .merge(view_routes)
        .merge(api_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), session_gate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the configured address and serves until `shutdown` is cancelled.
pub async fn serve(
    config: &ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), CampusMindError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CampusMindError::Internal(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("CampusMind listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| CampusMindError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}
