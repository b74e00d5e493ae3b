//! Logged-in home page showing posts from followed accounts.

use maud::{html, Markup};
use tracing::debug;

use super::report_failure;
use crate::api::{ApiClient, Post};
use crate::components::{LoadingDots, PostList};
use crate::runtime::{Mailbox, WatchedEffect};
use crate::store::{AppState, AppStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeState {
    pub is_loading: bool,
    pub feed: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedAction {
    FeedLoaded(Vec<Post>),
    FeedFailed,
}

#[must_use]
pub fn reduce(mut state: HomeState, action: FeedAction) -> HomeState {
    match action {
        FeedAction::FeedLoaded(feed) => state.feed = feed,
        FeedAction::FeedFailed => state.feed.clear(),
    }
    state.is_loading = false;
    state
}

#[derive(Debug)]
pub struct HomePage {
    state: HomeState,
    mailbox: Mailbox<FeedAction>,
    fetch: WatchedEffect,
}

impl HomePage {
    pub const TITLE: &'static str = "Your Feed";

    /// Mount the page and start loading the feed.
    #[must_use]
    pub fn open(api: ApiClient, store: AppStore) -> Self {
        let mut page = Self {
            state: HomeState {
                is_loading: true,
                feed: Vec::new(),
            },
            mailbox: Mailbox::new(),
            fetch: WatchedEffect::new(0),
        };

        let tx = page.mailbox.sender();
        page.fetch.run(move |cancel| async move {
            let token = store.state().user.token;
            let result = api.home_feed(&token, &cancel).await;
            if cancel.is_cancelled() {
                return;
            }
            let action = match result {
                Ok(feed) => FeedAction::FeedLoaded(feed),
                Err(e) => {
                    report_failure(&store, "Could not load your feed.", &e);
                    FeedAction::FeedFailed
                }
            };
            let _ = tx.send(action);
        });
        page
    }

    #[must_use]
    pub const fn state(&self) -> &HomeState {
        &self.state
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub async fn next(&mut self) -> bool {
        match self.mailbox.recv().await {
            Some(action) => {
                debug!(action = ?action, "Feed action");
                self.state = reduce(std::mem::take(&mut self.state), action);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn render(&self, app: &AppState) -> Markup {
        if self.state.is_loading {
            return html! { (LoadingDots) };
        }
        html! {
            @if self.state.feed.is_empty() {
                h2 class="text-center" {
                    "Hello " strong { (app.user.username) } ", your feed is empty."
                }
                p class="lead text-muted text-center" {
                    "Your feed displays the latest posts from the people you follow. If you don't have any friends to follow that's okay; you can use the \u{201c}Search\u{201d} feature in the top menu bar to find content written by people with similar interests and then follow them."
                }
            } @else {
                h2 class="text-center mb-4" { "The Latest From Those You Follow" }
                (PostList::new(&self.state.feed))
            }
        }
    }
}
