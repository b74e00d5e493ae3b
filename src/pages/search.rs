//! Live search overlay.
//!
//! Typing shows the loading state right away; the request itself waits for
//! the search delay and is keyed by `request_count`.

use std::time::Duration;

use maud::{html, Markup};
use tracing::debug;

use super::report_failure;
use crate::api::{ApiClient, Post};
use crate::components::{Input, LoadingDots, PostList};
use crate::runtime::{Debouncer, Mailbox, WatchedEffect};
use crate::store::{AppAction, AppStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchVisibility {
    #[default]
    Neither,
    Loading,
    Results,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub search_term: String,
    pub results: Vec<Post>,
    pub show: SearchVisibility,
    pub request_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    SearchKeyPressed(String),
    /// The term has been quiet for the search delay.
    SearchRequested,
    SearchResults(Vec<Post>),
    SearchFailed,
}

#[must_use]
pub fn reduce(mut state: SearchState, action: SearchAction) -> SearchState {
    match action {
        SearchAction::SearchKeyPressed(term) => {
            state.show = if term.trim().is_empty() {
                SearchVisibility::Neither
            } else {
                SearchVisibility::Loading
            };
            state.search_term = term;
        }
        SearchAction::SearchRequested => {
            if !state.search_term.trim().is_empty() {
                state.request_count += 1;
            }
        }
        SearchAction::SearchResults(results) => {
            state.results = results;
            state.show = SearchVisibility::Results;
        }
        SearchAction::SearchFailed => state.show = SearchVisibility::Neither,
    }
    state
}

/// Controller for the search overlay. Opening it dispatches `SearchOpened`;
/// [`close`](Self::close) dispatches `SearchClosed`.
#[derive(Debug)]
pub struct SearchOverlay {
    state: SearchState,
    api: ApiClient,
    store: AppStore,
    mailbox: Mailbox<SearchAction>,
    timer: Debouncer,
    request: WatchedEffect,
}

impl SearchOverlay {
    #[must_use]
    pub fn open(api: ApiClient, store: AppStore, search_delay: Duration) -> Self {
        store.dispatch(AppAction::SearchOpened);
        Self {
            state: SearchState::default(),
            api,
            store,
            mailbox: Mailbox::new(),
            timer: Debouncer::new(search_delay),
            request: WatchedEffect::new(0),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn dispatch(&mut self, action: SearchAction) {
        debug!(action = ?action, "Search action");
        let previous = std::mem::take(&mut self.state);
        self.state = reduce(previous.clone(), action);

        if self.state.search_term != previous.search_term {
            if self.state.search_term.trim().is_empty() {
                self.timer.cancel();
                self.request.cancel();
            } else {
                let tx = self.mailbox.sender();
                self.timer.schedule(move || {
                    let _ = tx.send(SearchAction::SearchRequested);
                });
            }
        }

        let api = self.api.clone();
        let store = self.store.clone();
        let tx = self.mailbox.sender();
        let term = self.state.search_term.clone();
        self.request.watch(self.state.request_count, move |cancel| async move {
            let result = api.search(&term, &cancel).await;
            if cancel.is_cancelled() {
                return;
            }
            let action = match result {
                Ok(results) => SearchAction::SearchResults(results),
                Err(e) => {
                    report_failure(&store, "Search is unavailable right now.", &e);
                    SearchAction::SearchFailed
                }
            };
            let _ = tx.send(action);
        });
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

    pub fn type_term(&mut self, term: impl Into<String>) {
        self.dispatch(SearchAction::SearchKeyPressed(term.into()));
    }

    /// Close the overlay, cancelling any pending search.
    pub fn close(mut self) {
        self.timer.cancel();
        self.request.cancel();
        self.store.dispatch(AppAction::SearchClosed);
    }

    #[must_use]
    pub fn render(&self) -> Markup {
        let state = &self.state;
        let results_class = if state.show == SearchVisibility::Results {
            "live-search-results live-search-results--visible"
        } else {
            "live-search-results"
        };
        let count = state.results.len();

        html! {
            div class="search-overlay" {
                div class="search-overlay-top shadow-sm" {
                    div class="container container--narrow" {
                        label for="live-search-field" class="search-overlay-icon" {
                            i class="fas fa-search" {}
                        }
                        (Input::text("search")
                            .id("live-search-field")
                            .class("live-search-field")
                            .placeholder("What are you interested in?")
                            .value(&state.search_term)
                            .no_autocomplete()
                            .autofocus())
                        span class="close-live-search" data-action="close-search" {
                            i class="fas fa-times-circle" {}
                        }
                    }
                }
                div class="search-overlay-bottom" {
                    div class="container container--narrow py-3" {
                        @if state.show == SearchVisibility::Loading {
                            (LoadingDots)
                        }
                        div class=(results_class) {
                            @if count > 0 {
                                div class="list-group shadow-sm" {
                                    div class="list-group-item active" {
                                        strong { "Search Results" }
                                        " (" (count) " " (if count == 1 { "item" } else { "items" }) " found)"
                                    }
                                    (PostList::new(&state.results))
                                }
                            } @else {
                                p class="alert alert-danger text-center shadow-sm" {
                                    "Sorry, we could not find any results for that search."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::storage::MemoryStorage;
    use crate::store::AppState;

    #[test]
    fn test_blank_term_shows_neither() {
        let state = reduce(SearchState::default(), SearchAction::SearchKeyPressed("rust".into()));
        assert_eq!(state.show, SearchVisibility::Loading);
        let state = reduce(state, SearchAction::SearchKeyPressed("   ".into()));
        assert_eq!(state.show, SearchVisibility::Neither);
        let state = reduce(state, SearchAction::SearchRequested);
        assert_eq!(state.request_count, 0);
    }

    #[test]
    fn test_results_shown() {
        let state = reduce(SearchState::default(), SearchAction::SearchKeyPressed("rust".into()));
        let state = reduce(state, SearchAction::SearchRequested);
        assert_eq!(state.request_count, 1);
        let state = reduce(state, SearchAction::SearchResults(Vec::new()));
        assert_eq!(state.show, SearchVisibility::Results);
    }

    #[test]
    fn test_open_and_close_toggle_global_flag() {
        let store = AppStore::new(AppState::default(), Arc::new(MemoryStorage::new()));
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();

        let overlay = SearchOverlay::open(api, store.clone(), Duration::from_millis(750));
        assert!(store.state().is_search_open);
        overlay.close();
        assert!(!store.state().is_search_open);
    }
}
