// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Counselor roster, time slots and booking validation.

use campusmind_core::CampusMindError;
use campusmind_core::validation;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A counselor who accepts appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counselor {
    pub name: &'static str,
    pub focus: &'static str,
}

impl Counselor {
    /// Label shown in the counselor picker.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.focus)
    }
}

pub const COUNSELORS: &[Counselor] = &[
    Counselor {
        name: "Dr. Emily Carter",
        focus: "Stress & Anxiety",
    },
    Counselor {
        name: "Dr. Ben Richards",
        focus: "Academic Pressure",
    },
    Counselor {
        name: "Dr. Olivia Chen",
        focus: "Relationships",
    },
];

/// Bookable start times. There is no noon slot.
pub const TIME_SLOTS: &[&str] = &[
    "09:00 AM", "10:00 AM", "11:00 AM", "01:00 PM", "02:00 PM", "03:00 PM", "04:00 PM",
];

/// Booking form as submitted. `date` is `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default)]
    pub counselor: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A validated appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub counselor: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Confirmation returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub title: String,
    pub description: String,
    pub detail: String,
    pub booking: Booking,
}

impl From<Booking> for BookingConfirmation {
    fn from(booking: Booking) -> Self {
        Self {
            title: "Booking Confirmed!".into(),
            description: format!(
                "Your appointment with {} on {} at {} is confirmed.",
                booking.counselor,
                long_date(booking.date),
                booking.time
            ),
            detail: "You will receive an email confirmation shortly. Please check your inbox."
                .into(),
            booking,
        }
    }
}

/// Validates a request against the roster, the slot list and the horizon.
///
/// The date must fall strictly after `today` and no more than
/// `horizon_days` ahead of it. All problems are reported together.
pub fn validate(
    request: &BookingRequest,
    today: NaiveDate,
    horizon_days: u32,
) -> Result<Booking, CampusMindError> {
    let counselor = COUNSELORS
        .iter()
        .find(|c| c.name == request.counselor.trim() || c.label() == request.counselor.trim());
    let time = TIME_SLOTS.iter().find(|t| **t == request.time.trim());
    let date = check_date(&request.date, today, horizon_days);

    validation::collect([
        counselor
            .map(|_| ())
            .ok_or_else(|| CampusMindError::validation("counselor", "Please select a counselor.")),
        time.map(|_| ())
            .ok_or_else(|| CampusMindError::validation("time", "Please select a time.")),
        date.as_ref().map(|_| ()).map_err(|e| {
            CampusMindError::validation("date", e.user_message())
        }),
    ])?;

    match (counselor, time, date) {
        (Some(counselor), Some(time), Ok(date)) => Ok(Booking {
            counselor: counselor.name.to_string(),
            date,
            time: time.to_string(),
            notes: request
                .notes
                .as_ref()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }),
        _ => Err(CampusMindError::Internal("booking validation out of sync".into())),
    }
}

fn check_date(raw: &str, today: NaiveDate, horizon_days: u32) -> Result<NaiveDate, CampusMindError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CampusMindError::validation(
            "date",
            "A date for the appointment is required.",
        ));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CampusMindError::validation("date", "Please choose a valid date."))?;
    if date <= today {
        return Err(CampusMindError::validation(
            "date",
            "Please choose a date after today.",
        ));
    }
    let latest = today + chrono::Days::new(u64::from(horizon_days));
    if date > latest {
        return Err(CampusMindError::validation(
            "date",
            format!("Appointments can be booked at most {horizon_days} days ahead."),
        ));
    }
    Ok(date)
}

/// `October 20th, 2026`.
pub fn long_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {day}{suffix}, {}", date.format("%B"), date.year())
}
