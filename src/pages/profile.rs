//! Profile page: header with follow controls, tab counts, and the tab list.
//!
//! Follow and unfollow are driven by request counters. Each bump starts one
//! request (cancelling the previous one for that direction). The profile is
//! only updated once the server has confirmed.

use maud::{html, Markup};
use tracing::{debug, info};

use super::{info as static_pages, report_failure};
use crate::api::{ApiClient, Person, Post, ProfileData};
use crate::components::{
    profile_tabs, Button, EmptyState, LoadingDots, PersonList, PostList, ProfileTabCounts,
};
use crate::router::ProfileTab;
use crate::runtime::{Mailbox, WatchedEffect};
use crate::store::{AppState, AppStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    /// Username from the route; `profile_data` carries the server's spelling.
    pub username: String,
    pub tab: ProfileTab,
    pub profile_data: ProfileData,
    pub not_found: bool,
    pub load_failed: bool,
    pub follow_action_loading: bool,
    pub start_following_request_count: u64,
    pub stop_following_request_count: u64,
    pub tab_loading: bool,
    pub posts: Vec<Post>,
    pub people: Vec<Person>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    ProfileLoaded(ProfileData),
    ProfileLoadFailed { not_found: bool },
    StartFollowing,
    StopFollowing,
    FollowActionStarted,
    FollowingStarted,
    FollowingStopped,
    FollowActionFailed,
    PostsLoaded(Vec<Post>),
    PeopleLoaded(Vec<Person>),
    TabLoadFailed,
}

#[must_use]
pub fn reduce(mut state: ProfileState, action: ProfileAction) -> ProfileState {
    match action {
        ProfileAction::ProfileLoaded(data) => state.profile_data = data,
        ProfileAction::ProfileLoadFailed { not_found } => {
            state.not_found = not_found;
            state.load_failed = true;
        }
        ProfileAction::StartFollowing => state.start_following_request_count += 1,
        ProfileAction::StopFollowing => state.stop_following_request_count += 1,
        ProfileAction::FollowActionStarted => state.follow_action_loading = true,
        ProfileAction::FollowingStarted => {
            state.profile_data.is_following = true;
            state.profile_data.counts.follower_count += 1;
            state.follow_action_loading = false;
        }
        ProfileAction::FollowingStopped => {
            state.profile_data.is_following = false;
            state.profile_data.counts.follower_count =
                state.profile_data.counts.follower_count.saturating_sub(1);
            state.follow_action_loading = false;
        }
        ProfileAction::FollowActionFailed => state.follow_action_loading = false,
        ProfileAction::PostsLoaded(posts) => {
            state.posts = posts;
            state.tab_loading = false;
        }
        ProfileAction::PeopleLoaded(people) => {
            state.people = people;
            state.tab_loading = false;
        }
        ProfileAction::TabLoadFailed => state.tab_loading = false,
    }
    state
}

/// Follow controls show only for a logged-in viewer looking at someone else's
/// loaded profile.
fn shows_follow_controls(state: &ProfileState, app: &AppState) -> bool {
    let data = &state.profile_data;
    app.logged_in && data.is_loaded() && app.user.username != data.profile_username
}

#[must_use]
pub fn can_follow(state: &ProfileState, app: &AppState) -> bool {
    shows_follow_controls(state, app) && !state.profile_data.is_following
}

#[must_use]
pub fn can_unfollow(state: &ProfileState, app: &AppState) -> bool {
    shows_follow_controls(state, app) && state.profile_data.is_following
}

#[derive(Clone, Copy)]
enum FollowDirection {
    Start,
    Stop,
}

/// Controller for `/profile/:username[/followers|/following]`.
#[derive(Debug)]
pub struct ProfilePage {
    state: ProfileState,
    api: ApiClient,
    store: AppStore,
    mailbox: Mailbox<ProfileAction>,
    profile_fetch: WatchedEffect<String>,
    tab_fetch: WatchedEffect<String>,
    start_following: WatchedEffect,
    stop_following: WatchedEffect,
}

impl ProfilePage {
    pub const TITLE: &'static str = "Profile Screen";

    /// Mount the page and load the profile summary and the active tab.
    #[must_use]
    pub fn open(username: impl Into<String>, tab: ProfileTab, api: ApiClient, store: AppStore) -> Self {
        let mut page = Self {
            state: ProfileState {
                username: username.into(),
                tab,
                tab_loading: true,
                ..ProfileState::default()
            },
            api,
            store,
            mailbox: Mailbox::new(),
            profile_fetch: WatchedEffect::new(String::new()),
            tab_fetch: WatchedEffect::new(String::new()),
            start_following: WatchedEffect::new(0),
            stop_following: WatchedEffect::new(0),
        };
        page.load();
        page
    }

    #[must_use]
    pub const fn state(&self) -> &ProfileState {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        let profile_pending = !self.state.load_failed && !self.state.profile_data.is_loaded();
        profile_pending || self.state.tab_loading
    }

    pub fn dispatch(&mut self, action: ProfileAction) {
        debug!(action = ?action, username = %self.state.username, "Profile action");
        let previous = std::mem::take(&mut self.state);
        self.state = reduce(previous.clone(), action);

        if self.state.start_following_request_count != previous.start_following_request_count {
            self.start_follow_request(FollowDirection::Start);
        }
        if self.state.stop_following_request_count != previous.stop_following_request_count {
            self.start_follow_request(FollowDirection::Stop);
        }
    }

    pub async fn next(&mut self) -> bool {
        match self.mailbox.recv().await {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    pub fn try_next(&mut self) -> bool {
        match self.mailbox.try_recv() {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Ask to follow this profile. Returns `false` when the control is hidden.
    ///
    /// Calling again before the first request resolves sends another request.
    pub fn start_following(&mut self) -> bool {
        if !can_follow(&self.state, &self.store.state()) {
            return false;
        }
        self.dispatch(ProfileAction::StartFollowing);
        true
    }

    /// Ask to stop following this profile. Returns `false` when the control is hidden.
    pub fn stop_following(&mut self) -> bool {
        if !can_unfollow(&self.state, &self.store.state()) {
            return false;
        }
        self.dispatch(ProfileAction::StopFollowing);
        true
    }

    fn load(&mut self) {
        let username = self.state.username.clone();
        let token = self.store.state().user.token;

        let api = self.api.clone();
        let tx = self.mailbox.sender();
        let store = self.store.clone();
        let name = username.clone();
        self.profile_fetch.watch(username.clone(), move |cancel| async move {
            let result = api.fetch_profile(&name, &token, &cancel).await;
            if cancel.is_cancelled() {
                return;
            }
            let action = match result {
                Ok(data) => ProfileAction::ProfileLoaded(data),
                Err(e) if e.is_not_found() => ProfileAction::ProfileLoadFailed { not_found: true },
                Err(e) => {
                    report_failure(&store, "Could not load this profile.", &e);
                    ProfileAction::ProfileLoadFailed { not_found: false }
                }
            };
            let _ = tx.send(action);
        });

        let api = self.api.clone();
        let tx = self.mailbox.sender();
        let store = self.store.clone();
        let tab = self.state.tab;
        self.tab_fetch.watch(username.clone(), move |cancel| async move {
            let action = match tab {
                ProfileTab::Posts => api
                    .fetch_profile_posts(&username, &cancel)
                    .await
                    .map(ProfileAction::PostsLoaded),
                ProfileTab::Followers => api
                    .fetch_followers(&username, &cancel)
                    .await
                    .map(ProfileAction::PeopleLoaded),
                ProfileTab::Following => api
                    .fetch_following(&username, &cancel)
                    .await
                    .map(ProfileAction::PeopleLoaded),
            };
            if cancel.is_cancelled() {
                return;
            }
            let action = action.unwrap_or_else(|e| {
                report_failure(&store, "Could not load this list.", &e);
                ProfileAction::TabLoadFailed
            });
            let _ = tx.send(action);
        });
    }

    fn start_follow_request(&mut self, direction: FollowDirection) {
        let api = self.api.clone();
        let store = self.store.clone();
        let tx = self.mailbox.sender();
        let target = self.state.profile_data.profile_username.clone();
        let token = store.state().user.token;

        let (effect, count) = match direction {
            FollowDirection::Start => (
                &mut self.start_following,
                self.state.start_following_request_count,
            ),
            FollowDirection::Stop => (
                &mut self.stop_following,
                self.state.stop_following_request_count,
            ),
        };

        let started = effect.watch(count, move |cancel| async move {
            let result = match direction {
                FollowDirection::Start => api.add_follow(&target, &token, &cancel).await,
                FollowDirection::Stop => api.remove_follow(&target, &token, &cancel).await,
            };
            if cancel.is_cancelled() {
                return;
            }
            let action = match (direction, result) {
                (FollowDirection::Start, Ok(())) => {
                    info!(target = %target, "Started following");
                    ProfileAction::FollowingStarted
                }
                (FollowDirection::Stop, Ok(())) => {
                    info!(target = %target, "Stopped following");
                    ProfileAction::FollowingStopped
                }
                (FollowDirection::Start, Err(e)) => {
                    report_failure(&store, &format!("Could not follow {target}."), &e);
                    ProfileAction::FollowActionFailed
                }
                (FollowDirection::Stop, Err(e)) => {
                    report_failure(&store, &format!("Could not stop following {target}."), &e);
                    ProfileAction::FollowActionFailed
                }
            };
            let _ = tx.send(action);
        });

        if started {
            self.dispatch(ProfileAction::FollowActionStarted);
        }
    }

    #[must_use]
    pub fn render(&self, app: &AppState) -> Markup {
        let state = &self.state;
        if state.not_found {
            return static_pages::render_not_found();
        }

        let data = &state.profile_data;
        let counts = if data.is_loaded() {
            ProfileTabCounts {
                posts: Some(data.counts.post_count),
                followers: Some(data.counts.follower_count),
                following: Some(data.counts.following_count),
            }
        } else {
            ProfileTabCounts::default()
        };

        html! {
            h2 {
                img class="avatar-small" src=(data.profile_avatar);
                " "
                (data.profile_username)
                @if can_follow(state, app) {
                    (Button::primary("Follow")
                        .r#type("button")
                        .name("follow")
                        .small()
                        .class("ml-2")
                        .disabled(state.follow_action_loading))
                }
                @if can_unfollow(state, app) {
                    (Button::danger("Stop Following")
                        .r#type("button")
                        .name("unfollow")
                        .small()
                        .class("ml-2")
                        .disabled(state.follow_action_loading))
                }
            }
            (profile_tabs(&data.profile_username, state.tab, counts))
            (self.render_tab())
        }
    }

    fn render_tab(&self) -> Markup {
        let state = &self.state;
        if state.tab_loading {
            return html! { (LoadingDots) };
        }
        let name = &state.username;
        let empty_message = match state.tab {
            ProfileTab::Posts if state.posts.is_empty() => {
                Some(format!("{name} hasn't created any posts yet."))
            }
            ProfileTab::Followers if state.people.is_empty() => {
                Some(format!("{name} doesn't have any followers yet."))
            }
            ProfileTab::Following if state.people.is_empty() => {
                Some(format!("{name} isn't following anyone yet."))
            }
            _ => None,
        };

        html! {
            @if let Some(message) = &empty_message {
                (EmptyState::new(message))
            } @else if state.tab == ProfileTab::Posts {
                (PostList::new(&state.posts).hide_author())
            } @else {
                (PersonList::new(&state.people))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProfileCounts;
    use crate::session::User;

    fn loaded(username: &str, is_following: bool, followers: u64) -> ProfileState {
        reduce(
            ProfileState::default(),
            ProfileAction::ProfileLoaded(ProfileData {
                profile_username: username.to_string(),
                profile_avatar: "a.png".to_string(),
                is_following,
                counts: ProfileCounts {
                    post_count: 2,
                    follower_count: followers,
                    following_count: 1,
                },
            }),
        )
    }

    fn viewer(username: &str) -> AppState {
        AppState {
            logged_in: true,
            user: User {
                token: "t".to_string(),
                username: username.to_string(),
                avatar: String::new(),
            },
            ..AppState::default()
        }
    }

    #[test]
    fn test_follow_resolution_updates_counts() {
        let state = reduce(loaded("bob", false, 4), ProfileAction::StartFollowing);
        assert_eq!(state.start_following_request_count, 1);
        // No optimistic update
        assert!(!state.profile_data.is_following);

        let state = reduce(state, ProfileAction::FollowActionStarted);
        assert!(state.follow_action_loading);

        let state = reduce(state, ProfileAction::FollowingStarted);
        assert!(state.profile_data.is_following);
        assert_eq!(state.profile_data.counts.follower_count, 5);
        assert!(!state.follow_action_loading);

        let state = reduce(state, ProfileAction::FollowingStopped);
        assert!(!state.profile_data.is_following);
        assert_eq!(state.profile_data.counts.follower_count, 4);
    }

    #[test]
    fn test_unfollow_never_underflows() {
        let state = reduce(loaded("bob", true, 0), ProfileAction::FollowingStopped);
        assert_eq!(state.profile_data.counts.follower_count, 0);
    }

    #[test]
    fn test_failure_clears_loading_only() {
        let state = reduce(loaded("bob", false, 4), ProfileAction::FollowActionStarted);
        let state = reduce(state, ProfileAction::FollowActionFailed);
        assert!(!state.follow_action_loading);
        assert!(!state.profile_data.is_following);
        assert_eq!(state.profile_data.counts.follower_count, 4);
    }

    #[test]
    fn test_follow_guards() {
        let app = viewer("alice");
        assert!(can_follow(&loaded("bob", false, 0), &app));
        assert!(!can_unfollow(&loaded("bob", false, 0), &app));
        assert!(can_unfollow(&loaded("bob", true, 0), &app));

        // Own profile
        assert!(!can_follow(&loaded("alice", false, 0), &app));
        // Still loading
        assert!(!can_follow(&ProfileState::default(), &app));
        // Logged out
        assert!(!can_follow(&loaded("bob", false, 0), &AppState::default()));
    }
}
