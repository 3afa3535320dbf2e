// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON view models for the gated pages and the auth forms.
//!
//! Each view returns the data its page needs; markup is the client's job.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use campusmind_core::types::{Capabilities, ChatTurn, UserRecord};
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::admin::{self, ACCESS_DENIED, UserList};
use crate::catalog::resources::{self, Resource, ResourceTab};
use crate::catalog::{COUNSELORS, ForumPost, TIME_SLOTS};
use crate::error::ApiError;
use crate::server::AppState;
use crate::session::CurrentUser;

pub const CHAT_WELCOME: &str =
    "Hello! I'm CampusMind, your on-campus companion for mental wellness. How are you feeling today?";

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

const NAV: &[(NavItem, bool)] = &[
    (NavItem { label: "AI First-Aid", path: "/chat" }, false),
    (NavItem { label: "Booking", path: "/booking" }, false),
    (NavItem { label: "Resources", path: "/resources" }, false),
    (NavItem { label: "Forum", path: "/forum" }, false),
    (NavItem { label: "Admin", path: "/admin" }, true),
];

/// Navigation entries the user may see; admin-only entries need the capability.
pub fn navigation(user: &impl Capabilities) -> Vec<NavItem> {
    NAV.iter()
        .filter(|(_, admin_only)| !admin_only || user.can_administer())
        .map(|(item, _)| item.clone())
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ChatView {
    pub nav: Vec<NavItem>,
    pub welcome: &'static str,
    pub turns: Vec<ChatTurn>,
}

fn chat_view(state: &AppState, user: &CurrentUser) -> ChatView {
    ChatView {
        nav: navigation(user),
        welcome: CHAT_WELCOME,
        turns: state.chats.transcript(user.uid()),
    }
}

/// GET /
pub async fn home(State(state): State<AppState>, user: CurrentUser) -> Json<ChatView> {
    Json(chat_view(&state, &user))
}

/// GET /chat
pub async fn chat(State(state): State<AppState>, user: CurrentUser) -> Json<ChatView> {
    Json(chat_view(&state, &user))
}

#[derive(Debug, Serialize)]
pub struct CounselorOption {
    pub value: &'static str,
    pub label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub title: &'static str,
    pub description: &'static str,
    pub counselors: Vec<CounselorOption>,
    pub times: &'static [&'static str],
    pub earliest_date: NaiveDate,
    pub latest_date: NaiveDate,
}

/// GET /booking
pub async fn booking(State(state): State<AppState>) -> Json<BookingView> {
    let today = Utc::now().date_naive();
    let horizon = u64::from(state.config.booking.horizon_days);
    Json(BookingView {
        title: "Schedule an Appointment",
        description: "Choose a counselor and a time that works for you.",
        counselors: COUNSELORS
            .iter()
            .map(|c| CounselorOption {
                value: c.name,
                label: c.label(),
            })
            .collect(),
        times: TIME_SLOTS,
        earliest_date: today + Days::new(1),
        latest_date: today + Days::new(horizon),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    #[serde(default)]
    pub tab: ResourceTab,
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct ResourcesView {
    pub tab: ResourceTab,
    pub query: String,
    pub items: Vec<Resource>,
}

/// GET /resources?tab=videos&q=sleep
pub async fn resources(Query(query): Query<ResourceQuery>) -> Json<ResourcesView> {
    Json(ResourcesView {
        items: resources::search(query.tab, &query.q),
        tab: query.tab,
        query: query.q,
    })
}

#[derive(Debug, Serialize)]
pub struct ForumView {
    pub posts: Vec<ForumPost>,
}

/// GET /forum
pub async fn forum(State(state): State<AppState>) -> Json<ForumView> {
    Json(ForumView {
        posts: state.forum.list(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub user: UserRecord,
    pub email_editable: bool,
}

/// GET /profile
pub async fn profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ProfileView>, ApiError> {
    let record = state.identity()?.get_user(user.uid()).await?;
    Ok(Json(ProfileView {
        user: record,
        email_editable: false,
    }))
}

#[derive(Debug, Serialize)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

/// GET /admin
///
/// Non-admins get the access-denied notice with a 403.
pub async fn admin(State(state): State<AppState>, user: CurrentUser) -> Response {
    if !user.can_administer() {
        let notice = Notice {
            title: "Access Denied",
            description: ACCESS_DENIED,
        };
        return (StatusCode::FORBIDDEN, Json(notice)).into_response();
    }
    match admin::load_users(&state).await {
        Ok(list) => Json::<UserList>(list).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub kind: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
    pub fields: Vec<FormField>,
    pub alternate_path: &'static str,
}

fn credential_fields() -> Vec<FormField> {
    vec![
        FormField {
            name: "email",
            kind: "email",
            label: "Email",
            placeholder: "m@example.com",
        },
        FormField {
            name: "password",
            kind: "password",
            label: "Password",
            placeholder: "",
        },
    ]
}

/// GET /auth/login
pub async fn login_form() -> Json<FormView> {
    Json(FormView {
        title: "Login",
        description: "Use your email and password to sign in.",
        action: "/auth/login",
        fields: credential_fields(),
        alternate_path: "/auth/signup",
    })
}

/// GET /auth/signup
pub async fn signup_form() -> Json<FormView> {
    Json(FormView {
        title: "Sign Up",
        description: "Create your account using your email and password.",
        action: "/auth/signup",
        fields: credential_fields(),
        alternate_path: "/auth/login",
    })
}
