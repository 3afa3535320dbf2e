// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static and in-memory content behind the booking, resources and forum views.

pub mod booking;
pub mod forum;
pub mod resources;

pub use booking::{Booking, BookingConfirmation, BookingRequest, COUNSELORS, Counselor, TIME_SLOTS};
pub use forum::{ForumBoard, ForumPost, NewPost};
pub use resources::{LIBRARY, Resource, ResourceTab};
