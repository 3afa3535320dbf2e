// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static resource library.

use serde::{Deserialize, Serialize};

/// One library entry. The id prefix (`video-`, `audio-`, `guide-`) is its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    pub image_hint: &'static str,
}

pub const LIBRARY: &[Resource] = &[
    Resource {
        id: "video-breathing",
        description: "Box breathing in five minutes",
        image_url: "https://picsum.photos/seed/breathing/600/400",
        image_hint: "calm lake",
    },
    Resource {
        id: "video-sleep",
        description: "Building a better sleep routine",
        image_url: "https://picsum.photos/seed/sleep/600/400",
        image_hint: "night sky",
    },
    Resource {
        id: "video-study",
        description: "Study sessions without burnout",
        image_url: "https://picsum.photos/seed/study/600/400",
        image_hint: "library desk",
    },
    Resource {
        id: "audio-body-scan",
        description: "Guided body scan meditation",
        image_url: "https://picsum.photos/seed/bodyscan/600/400",
        image_hint: "meditation cushion",
    },
    Resource {
        id: "audio-exam-stress",
        description: "Podcast: talking through exam stress",
        image_url: "https://picsum.photos/seed/podcast/600/400",
        image_hint: "microphone",
    },
    Resource {
        id: "audio-rain",
        description: "Rain sounds for focus and sleep",
        image_url: "https://picsum.photos/seed/rain/600/400",
        image_hint: "rain window",
    },
    Resource {
        id: "guide-anxiety",
        description: "Understanding anxiety: a student guide",
        image_url: "https://picsum.photos/seed/anxiety/600/400",
        image_hint: "open notebook",
    },
    Resource {
        id: "guide-homesickness",
        description: "Coping with homesickness in your first year",
        image_url: "https://picsum.photos/seed/home/600/400",
        image_hint: "campus path",
    },
    Resource {
        id: "guide-friends",
        description: "Making friends on campus",
        image_url: "https://picsum.photos/seed/friends/600/400",
        image_hint: "students talking",
    },
];

/// Library tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceTab {
    #[default]
    All,
    Videos,
    Audios,
    Guides,
}

impl ResourceTab {
    fn prefix(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Videos => "video",
            Self::Audios => "audio",
            Self::Guides => "guide",
        }
    }
}

/// Entries in `tab` whose description contains `term`, ignoring case.
pub fn search(tab: ResourceTab, term: &str) -> Vec<Resource> {
    let needle = term.trim().to_lowercase();
    LIBRARY
        .iter()
        .filter(|r| r.id.starts_with(tab.prefix()))
        .filter(|r| r.description.to_lowercase().contains(&needle))
        .copied()
        .collect()
}
