//! Payloads exchanged with the ComplexApp API.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Username shown while a profile is still loading.
pub const PROFILE_LOADING_SENTINEL: &str = "...";

/// Avatar shown while a profile is still loading.
pub const PLACEHOLDER_AVATAR: &str = "https://gravatar.com/avatar/placeholder?s=128";

/// A user reference: post authors, followers, and followed accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub username: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: Person,
    #[serde(rename = "createdDate")]
    pub created_date: DateTime<Utc>,
}

impl Post {
    /// Creation date as `M/D/YYYY`.
    #[must_use]
    pub fn formatted_date(&self) -> String {
        format_date(&self.created_date)
    }
}

/// Format a date as `M/D/YYYY` without zero padding.
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCounts {
    pub post_count: u64,
    pub follower_count: u64,
    pub following_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub profile_username: String,
    pub profile_avatar: String,
    pub is_following: bool,
    pub counts: ProfileCounts,
}

impl ProfileData {
    /// Whether real data has replaced the loading placeholder.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.profile_username != PROFILE_LOADING_SENTINEL
    }
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            profile_username: PROFILE_LOADING_SENTINEL.to_string(),
            profile_avatar: PLACEHOLDER_AVATAR.to_string(),
            is_following: false,
            counts: ProfileCounts::default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenBody<'a> {
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UsernameBody<'a> {
    pub username: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailBody<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostBody<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchBody<'a> {
    pub search_term: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_deserialize() {
        let json = r#"{
            "_id": "5f1",
            "title": "Hello",
            "body": "World",
            "author": {"username": "alice", "avatar": "https://gravatar.com/avatar/x?s=128"},
            "createdDate": "2020-07-04T15:30:00.000Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, "5f1");
        assert_eq!(post.author.username, "alice");
        assert_eq!(post.formatted_date(), "7/4/2020");
    }

    #[test]
    fn test_profile_deserialize() {
        let json = r#"{
            "profileUsername": "bob",
            "profileAvatar": "https://gravatar.com/avatar/y?s=128",
            "isFollowing": true,
            "counts": {"postCount": 3, "followerCount": 10, "followingCount": 2}
        }"#;
        let profile: ProfileData = serde_json::from_str(json).unwrap();
        assert!(profile.is_loaded());
        assert!(profile.is_following);
        assert_eq!(profile.counts.follower_count, 10);
    }

    #[test]
    fn test_profile_default_is_sentinel() {
        let profile = ProfileData::default();
        assert!(!profile.is_loaded());
        assert_eq!(profile.profile_avatar, PLACEHOLDER_AVATAR);
    }

    #[test]
    fn test_search_body_uses_camel_case() {
        let json = serde_json::to_string(&SearchBody { search_term: "rust" }).unwrap();
        assert_eq!(json, r#"{"searchTerm":"rust"}"#);
    }
}
