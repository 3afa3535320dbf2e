// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Peer support forum: seeded posts plus in-memory new ones.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use campusmind_core::CampusMindError;
use campusmind_core::validation;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: u64,
    pub author: String,
    pub avatar: String,
    pub title: String,
    pub content: String,
    pub likes: u32,
    pub comments: u32,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/forum`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NewPost {
    /// Both fields must be non-blank.
    pub fn validate(&self) -> Result<(), CampusMindError> {
        validation::collect([
            validation::non_blank("title", &self.title, "Title is required."),
            validation::non_blank("content", &self.content, "Post content is required."),
        ])
    }
}

/// Avatar used when the author has no photo.
pub fn default_avatar(seed: &str) -> String {
    format!("https://i.pravatar.cc/150?u={seed}")
}

struct SeedPost {
    author: &'static str,
    avatar: &'static str,
    title: &'static str,
    content: &'static str,
    likes: u32,
    comments: u32,
    age_hours: i64,
}

const SEED: &[SeedPost] = &[
    SeedPost {
        author: "StudentStruggler",
        avatar: "https://i.pravatar.cc/150?u=a042581f4e29026704d",
        title: "Feeling overwhelmed with exam prep",
        content: "Exams are just around the corner and I feel like I can't keep up. Any tips for managing stress and staying focused?",
        likes: 12,
        comments: 5,
        age_hours: 2,
    },
    SeedPost {
        author: "CampusExplorer",
        avatar: "https://i.pravatar.cc/150?u=a042581f4e29026704e",
        title: "Tips for making new friends on campus?",
        content: "I'm a new student and finding it hard to connect with people. What are some good ways to make friends here?",
        likes: 25,
        comments: 10,
        age_hours: 24,
    },
    SeedPost {
        author: "ZenMaster",
        avatar: "https://i.pravatar.cc/150?u=a042581f4e29026704f",
        title: "My favorite quiet spots on campus for de-stressing",
        content: "Just wanted to share a few places I go to when I need a break from the noise. The campus garden and the top floor of the library are my go-tos. Where do you all go?",
        likes: 30,
        comments: 8,
        age_hours: 72,
    },
];

/// Most posts the board keeps; publishing past this drops the oldest.
pub const MAX_POSTS: usize = 500;

/// Forum posts held in memory for the life of the process, capped at
/// [`MAX_POSTS`].
pub struct ForumBoard {
    posts: RwLock<Vec<ForumPost>>,
    next_id: AtomicU64,
    limit: usize,
}

impl ForumBoard {
    /// A board holding the three welcome posts, aged relative to `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let posts: Vec<ForumPost> = SEED
            .iter()
            .zip(1u64..)
            .map(|(seed, id)| ForumPost {
                id,
                author: seed.author.into(),
                avatar: seed.avatar.into(),
                title: seed.title.into(),
                content: seed.content.into(),
                likes: seed.likes,
                comments: seed.comments,
                created_at: now - Duration::hours(seed.age_hours),
            })
            .collect();
        Self {
            next_id: AtomicU64::new(posts.len() as u64 + 1),
            posts: RwLock::new(posts),
            limit: MAX_POSTS,
        }
    }

    /// Overrides the post cap. A limit of zero is treated as one.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<ForumPost>> {
        self.posts.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<ForumPost>> {
        self.posts.write().unwrap_or_else(|e| e.into_inner())
    }

    /// All posts, newest first.
    pub fn list(&self) -> Vec<ForumPost> {
        let mut posts = self.read().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }

    /// Validates and appends a post.
    pub fn publish(
        &self,
        author: &str,
        avatar: String,
        post: &NewPost,
    ) -> Result<ForumPost, CampusMindError> {
        post.validate()?;
        let created = ForumPost {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            author: author.to_string(),
            avatar,
            title: post.title.trim().to_string(),
            content: post.content.trim().to_string(),
            likes: 0,
            comments: 0,
            created_at: Utc::now(),
        };
        {
            let mut posts = self.write();
            posts.push(created.clone());
            while posts.len() > self.limit {
                let Some(oldest) = posts
                    .iter()
                    .enumerate()
                    .min_by(|(_, a), (_, b)| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
                    .map(|(i, _)| i)
                else {
                    break;
                };
                let dropped = posts.remove(oldest);
                tracing::debug!(post_id = dropped.id, "forum board full, oldest post dropped");
            }
        }
        tracing::info!(post_id = created.id, "forum post published");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_board_is_newest_first() {
        let board = ForumBoard::seeded(Utc::now());
        let ids: Vec<_> = board.list().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn new_post_goes_on_top() {
        let board = ForumBoard::seeded(Utc::now() - Duration::minutes(5));
        let post = NewPost {
            title: " Study group? ".into(),
            content: "Anyone up for a quiet study group on Thursdays?".into(),
        };
        let created = board
            .publish("Sam", default_avatar("uid-1"), &post)
            .unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(created.title, "Study group?");
        assert_eq!(board.list()[0].id, 4);
    }

    #[test]
    fn blank_post_is_rejected() {
        let board = ForumBoard::seeded(Utc::now());
        let err = board
            .publish("Sam", default_avatar("x"), &NewPost::default())
            .unwrap_err();
        assert!(err.user_message().contains("Title is required."));
        assert!(err.user_message().contains("Post content is required."));
        assert_eq!(board.list().len(), 3);
    }

    #[test]
    fn full_board_drops_its_oldest_post() {
        let board = ForumBoard::seeded(Utc::now() - Duration::minutes(5)).with_limit(3);
        let post = NewPost {
            title: "Hello".into(),
            content: "First time posting here.".into(),
        };
        board.publish("Sam", default_avatar("uid-1"), &post).unwrap();
        board.publish("Kim", default_avatar("uid-2"), &post).unwrap();

        let ids: Vec<_> = board.list().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 4, 1]);
    }
}
