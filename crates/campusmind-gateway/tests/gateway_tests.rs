// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests: gate, auth actions, chat, admin and the form APIs.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use campusmind_config::model::{DEFAULT_FALLBACK_RESPONSE, GateMode};
use campusmind_core::types::{Role, TriageCategory, UserRecord};
use campusmind_test_utils::TestHarness;
use chrono::{Days, Utc};
use serde_json::json;

fn record(uid: &str, role: Role) -> UserRecord {
    UserRecord {
        uid: uid.into(),
        email: Some(format!("{uid}@campus.edu")),
        display_name: Some(format!("{uid} display")),
        photo_url: None,
        disabled: false,
        role,
    }
}

fn campus() -> TestHarness {
    TestHarness::builder()
        .with_users(vec![record("stu", Role::Student), record("root", Role::Admin)])
        .build()
}

// --- Session gate ---

#[tokio::test]
async fn anonymous_admin_view_redirects_to_login() {
    let h = campus();
    let resp = h.get("/admin", None).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/auth/login"));
}

#[tokio::test]
async fn signed_in_login_view_redirects_home() {
    let h = campus();
    let cookie = h.session_for("stu");
    let resp = h.get("/auth/login", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/"));
}

#[tokio::test]
async fn anonymous_login_view_is_served() {
    let h = campus();
    let resp = h.get("/auth/login", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["title"], "Login");
    assert_eq!(resp.body["alternatePath"], "/auth/signup");
}

#[tokio::test]
async fn presence_mode_lets_forged_cookie_past_gate_but_not_into_view() {
    let h = campus();
    let resp = h.get("/chat", Some("firebase-session=forged")).await;
    // The gate passes on presence; the view's own check sends it back.
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/auth/login"));
    assert!(resp.set_cookie().unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn verify_mode_clears_forged_cookie_at_gate() {
    let h = TestHarness::builder()
        .with_config(|c| c.session.gate_mode = GateMode::Verify)
        .build();
    let resp = h.get("/auth/login", Some("firebase-session=forged")).await;
    // Forged cookie counts as no session, so the login view is served.
    assert_eq!(resp.status, StatusCode::OK);

    let resp = h.get("/forum", Some("firebase-session=forged")).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/auth/login"));
    assert!(resp.set_cookie().unwrap().starts_with("firebase-session=;"));
}

#[tokio::test]
async fn health_is_public() {
    let h = campus();
    let resp = h.get("/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "ok");
    assert_eq!(resp.body["identity"], true);
}

// --- Auth actions ---

#[tokio::test]
async fn signup_login_chat_logout() {
    let h = TestHarness::builder()
        .with_replies(vec!["Hi there! How are you feeling today?".into()])
        .build();

    let resp = h
        .post("/auth/signup", json!({"email": "sam@campus.edu", "password": "secret1"}), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Signup successful! Please log in.");

    let resp = h
        .post("/auth/login", json!({"email": "sam@campus.edu", "password": "secret1"}), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);
    let set_cookie = resp.set_cookie().unwrap().to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=432000"));
    let cookie = resp.cookie_pair().unwrap();

    let resp = h.post("/api/chat", json!({"userInput": "hello"}), Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["response"], "Hi there! How are you feeling today?");

    let resp = h.get("/api/chat", Some(&cookie)).await;
    let turns = resp.body["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0]["sender"], "user");
    assert_eq!(turns[1]["sender"], "assistant");

    let resp = h.post("/auth/logout", json!({}), Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Logged out successfully.");
    assert!(resp.set_cookie().unwrap().contains("Max-Age=0"));
    assert!(h.state.chats.is_empty());
}

#[tokio::test]
async fn duplicate_signup_is_reported() {
    let h = campus();
    let body = json!({"email": "new@campus.edu", "password": "secret1"});
    h.post("/auth/signup", body.clone(), None).await;
    let resp = h.post("/auth/signup", body, None).await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(resp.body["message"], "An account with this email already exists.");
}

#[tokio::test]
async fn signup_validation_reports_all_fields() {
    let h = campus();
    let resp = h
        .post("/auth/signup", json!({"email": "nope", "password": "123"}), None)
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    let message = resp.body["message"].as_str().unwrap();
    assert!(message.contains("valid email"));
    assert!(message.contains("at least 6"));
    assert_eq!(h.identity.session_count(), 0);
}

#[tokio::test]
async fn bad_credentials_fail_login() {
    let h = campus();
    let resp = h
        .post("/auth/login", json!({"email": "stu@campus.edu", "password": "wrong-pass"}), None)
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.body["message"],
        "Login failed. Please check your credentials and try again."
    );
    assert!(resp.set_cookie().is_none());
}

#[tokio::test]
async fn id_token_login_sets_cookie() {
    let h = campus();
    let resp = h
        .post("/auth/login", json!({"idToken": "mock-id-token:stu"}), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let cookie = resp.cookie_pair().unwrap();
    assert_eq!(h.get("/chat", Some(&cookie)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn unconfigured_identity_explains_itself() {
    let h = TestHarness::builder().without_identity().build();
    let resp = h
        .post("/auth/login", json!({"idToken": "anything"}), None)
        .await;
    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(
        resp.body["message"]
            .as_str()
            .unwrap()
            .contains("FIREBASE_SERVICE_ACCOUNT_KEY")
    );
}

// --- Chat and triage ---

#[tokio::test]
async fn chat_requires_session() {
    let h = campus();
    let resp = h.post("/api/chat", json!({"userInput": "hello"}), None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(h.flows.respond_calls(), 0);
}

#[tokio::test]
async fn blank_chat_is_rejected_before_flow() {
    let h = campus();
    let cookie = h.session_for("stu");
    let resp = h.post("/api/chat", json!({"userInput": "   "}), Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Please enter a message.");
    assert_eq!(h.flows.respond_calls(), 0);
}

#[tokio::test]
async fn flow_failure_still_answers() {
    let h = campus();
    h.flows.fail(true);
    let cookie = h.session_for("stu");
    let resp = h.post("/api/chat", json!({"userInput": "hello"}), Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["response"], DEFAULT_FALLBACK_RESPONSE);
}

#[tokio::test]
async fn second_message_while_pending_is_conflict() {
    let h = Arc::new(
        TestHarness::builder()
            .with_users(vec![record("stu", Role::Student)])
            .with_flow_delay(Duration::from_millis(300))
            .build(),
    );
    let cookie = h.session_for("stu");

    let first = {
        let h = h.clone();
        let cookie = cookie.clone();
        tokio::spawn(async move {
            h.post("/api/chat", json!({"userInput": "one"}), Some(&cookie))
                .await
                .status
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = h.post("/api/chat", json!({"userInput": "two"}), Some(&cookie)).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(first.await.unwrap(), StatusCode::OK);
    assert_eq!(h.state.chats.transcript("stu").len(), 2);
}

#[tokio::test]
async fn dropped_request_does_not_lock_the_session() {
    let h = TestHarness::builder()
        .with_users(vec![record("stu", Role::Student)])
        .with_flow_delay(Duration::from_millis(200))
        .build();
    let cookie = h.session_for("stu");

    let dropped = tokio::time::timeout(
        Duration::from_millis(30),
        h.post("/api/chat", json!({"userInput": "one"}), Some(&cookie)),
    )
    .await;
    assert!(dropped.is_err());
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(h.state.chats.transcript("stu").len(), 2);

    let resp = h.post("/api/chat", json!({"userInput": "two"}), Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(h.state.chats.transcript("stu").len(), 4);
}

#[tokio::test]
async fn triage_reports_category() {
    let h = TestHarness::builder()
        .with_users(vec![record("stu", Role::Student)])
        .with_triage(TriageCategory::UrgentCrisis.canonical_output())
        .build();
    let cookie = h.session_for("stu");
    let resp = h
        .post("/api/triage", json!({"userInput": "I can't go on"}), Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["category"], "urgent_crisis");
    assert_eq!(resp.body["escalateToProfessional"], true);
    assert_eq!(resp.body["suggestedResources"], json!([]));
}

#[tokio::test]
async fn triage_failure_is_bad_gateway_by_default() {
    let h = campus();
    h.flows.fail(true);
    let cookie = h.session_for("stu");
    let resp = h
        .post("/api/triage", json!({"userInput": "hi"}), Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_GATEWAY);
}

// --- Admin ---

#[tokio::test]
async fn students_cannot_list_users() {
    let h = campus();
    let cookie = h.session_for("stu");
    let resp = h.get("/api/admin/users", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let view = h.get("/admin", Some(&cookie)).await;
    assert_eq!(view.status, StatusCode::FORBIDDEN);
    assert_eq!(view.body["title"], "Access Denied");
}

#[tokio::test]
async fn admin_lists_and_toggles() {
    let h = campus();
    let cookie = h.session_for("root");

    let resp = h.get("/api/admin/users", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["users"].as_array().unwrap().len(), 2);

    let resp = h
        .post("/api/admin/users/stu/disabled", json!({"disabled": true}), Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["applied"], true);
    assert_eq!(resp.body["user"]["disabled"], true);
    assert_eq!(resp.body["notification"]["description"], "User has been disabled.");
    assert!(h.identity.user("stu").unwrap().disabled);
}

#[tokio::test]
async fn failed_toggle_reverts() {
    let h = campus();
    let cookie = h.session_for("root");
    h.identity.fail_mutations(true);

    let resp = h
        .post("/api/admin/users/stu/disabled", json!({"disabled": true}), Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_GATEWAY);
    assert_eq!(resp.body["applied"], false);
    assert_eq!(resp.body["user"]["disabled"], false);
    assert_eq!(resp.body["notification"]["variant"], "destructive");
    assert!(!h.identity.user("stu").unwrap().disabled);
}

#[tokio::test]
async fn admins_cannot_be_disabled() {
    let h = campus();
    let cookie = h.session_for("root");
    let resp = h
        .post("/api/admin/users/root/disabled", json!({"disabled": true}), Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

// --- Profile, support, booking, forum, resources ---

#[tokio::test]
async fn profile_update_round_trip() {
    let h = campus();
    let cookie = h.session_for("stu");
    let resp = h
        .post("/api/profile", json!({"displayName": "Sam Lee"}), Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Profile updated successfully.");

    let view = h.get("/profile", Some(&cookie)).await;
    assert_eq!(view.body["displayName"], "Sam Lee");
    assert_eq!(view.body["emailEditable"], false);
}

#[tokio::test]
async fn profile_rejects_bad_photo_url() {
    let h = campus();
    let cookie = h.session_for("stu");
    let resp = h
        .post("/api/profile", json!({"photoURL": "not-a-url"}), Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["success"], false);
}

#[tokio::test]
async fn support_email_is_sent() {
    let h = campus();
    let cookie = h.session_for("stu");
    let body = json!({
        "toEmail": "counseling@campus.edu",
        "subject": "Need to talk",
        "body": "Could someone reach out this week?"
    });
    let resp = h.post("/api/support", body, Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Email sent successfully!");
    let sent = h.mail.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from_email.as_deref(), Some("support@campusmind.app"));
}

#[tokio::test]
async fn support_without_transport_degrades() {
    let h = TestHarness::builder()
        .with_users(vec![record("stu", Role::Student)])
        .without_mail()
        .build();
    let cookie = h.session_for("stu");
    let body = json!({"toEmail": "a@campus.edu", "subject": "s", "body": "b"});
    let resp = h.post("/api/support", body, Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(resp.body["success"], false);
}

#[tokio::test]
async fn booking_confirms_valid_request() {
    let h = campus();
    let cookie = h.session_for("stu");
    let date = Utc::now().date_naive() + Days::new(3);
    let body = json!({
        "counselor": "Dr. Emily Carter",
        "date": date.format("%Y-%m-%d").to_string(),
        "time": "10:00 AM"
    });
    let resp = h.post("/api/booking", body, Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["title"], "Booking Confirmed!");
    assert!(
        resp.body["description"]
            .as_str()
            .unwrap()
            .starts_with("Your appointment with Dr. Emily Carter on ")
    );
}

#[tokio::test]
async fn booking_rejects_past_dates() {
    let h = campus();
    let cookie = h.session_for("stu");
    let body = json!({"counselor": "Dr. Emily Carter", "date": "2000-01-01", "time": "10:00 AM"});
    let resp = h.post("/api/booking", body, Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["field"], "date");
}

#[tokio::test]
async fn forum_post_uses_display_name() {
    let h = campus();
    let cookie = h.session_for("stu");
    let resp = h
        .post(
            "/api/forum",
            json!({"title": "Study group?", "content": "Thursdays at the library."}),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["author"], "stu display");

    let view = h.get("/forum", Some(&cookie)).await;
    let posts = view.body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 4);
    assert_eq!(posts[0]["title"], "Study group?");
}

#[tokio::test]
async fn resources_view_filters() {
    let h = campus();
    let cookie = h.session_for("stu");
    let resp = h.get("/resources?tab=videos&q=SLEEP", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let items = resp.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "video-sleep");
}

#[tokio::test]
async fn booking_view_lists_roster() {
    let h = campus();
    let cookie = h.session_for("stu");
    let resp = h.get("/booking", Some(&cookie)).await;
    assert_eq!(resp.body["counselors"].as_array().unwrap().len(), 3);
    assert_eq!(
        resp.body["counselors"][0]["label"],
        "Dr. Emily Carter (Stress & Anxiety)"
    );
    assert_eq!(resp.body["times"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn scheduling_paths_serve_the_booking_view() {
    let h = campus();
    let cookie = h.session_for("stu");
    for path in ["/scheduling", "/consultations"] {
        let resp = h.get(path, Some(&cookie)).await;
        assert_eq!(resp.status, StatusCode::OK, "{path}");
        assert_eq!(resp.body["title"], "Schedule an Appointment");

        let anonymous = h.get(path, None).await;
        assert_eq!(anonymous.status, StatusCode::SEE_OTHER, "{path}");
    }
}
