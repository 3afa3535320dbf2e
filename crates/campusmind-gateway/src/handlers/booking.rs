// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::catalog::booking::{self, BookingConfirmation, BookingRequest};
use crate::error::ApiError;
use crate::server::AppState;
use crate::session::CurrentUser;

/// POST /api/booking
pub async fn post_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<BookingRequest>,
) -> Result<Json<BookingConfirmation>, ApiError> {
    let today = Utc::now().date_naive();
    let booking = booking::validate(&request, today, state.config.booking.horizon_days)?;
    tracing::info!(
        uid = user.uid(),
        counselor = %booking.counselor,
        date = %booking.date,
        time = %booking.time,
        "appointment booked"
    );
    Ok(Json(booking.into()))
}
