//! Edit-post page.
//!
//! fetching -> ready -> saving -> ready. The save request is keyed by
//! `send_count`, which only moves when both fields pass their rules.

use maud::{html, Markup};
use tracing::debug;

use super::field::FormField;
use super::{info, report_failure, BODY_REQUIRED, TITLE_REQUIRED};
use crate::api::{ApiClient, Post};
use crate::components::{Alert, Button, Form, FormGroup, Input, Label, LoadingDots, TextArea};
use crate::router::Route;
use crate::runtime::{Mailbox, WatchedEffect};
use crate::store::AppStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPostState {
    pub id: String,
    pub title: FormField,
    pub body: FormField,
    pub is_fetching: bool,
    pub is_saving: bool,
    pub not_found: bool,
    pub load_failed: bool,
    pub send_count: u64,
}

impl EditPostState {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_fetching: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPostAction {
    FetchCompleted(Post),
    FetchFailed { not_found: bool },
    TitleChanged(String),
    BodyChanged(String),
    /// Blur or submit check of the title the user currently sees.
    TitleRuleViolated(String),
    BodyRuleViolated(String),
    RequestSubmitted,
    SaveRequestStarted,
    SaveRequestFinished,
}

#[must_use]
pub fn reduce(mut state: EditPostState, action: EditPostAction) -> EditPostState {
    match action {
        EditPostAction::FetchCompleted(post) => {
            state.title.value = post.title;
            state.body.value = post.body;
            state.is_fetching = false;
        }
        EditPostAction::FetchFailed { not_found } => {
            state.is_fetching = false;
            state.not_found = not_found;
            state.load_failed = !not_found;
        }
        EditPostAction::TitleChanged(value) => state.title.set_value(value),
        EditPostAction::BodyChanged(value) => state.body.set_value(value),
        EditPostAction::TitleRuleViolated(value) => state.title.require(&value, TITLE_REQUIRED),
        EditPostAction::BodyRuleViolated(value) => state.body.require(&value, BODY_REQUIRED),
        EditPostAction::RequestSubmitted => {
            if !state.title.has_error && !state.body.has_error {
                state.send_count += 1;
            }
        }
        EditPostAction::SaveRequestStarted => state.is_saving = true,
        EditPostAction::SaveRequestFinished => state.is_saving = false,
    }
    state
}

/// Controller for `/post/:id/edit`.
#[derive(Debug)]
pub struct EditPostPage {
    state: EditPostState,
    api: ApiClient,
    store: AppStore,
    mailbox: Mailbox<EditPostAction>,
    fetch: WatchedEffect,
    save: WatchedEffect,
}

impl EditPostPage {
    /// Mount the page and start loading the post.
    #[must_use]
    pub fn open(id: impl Into<String>, api: ApiClient, store: AppStore) -> Self {
        let mut page = Self {
            state: EditPostState::new(id),
            api,
            store,
            mailbox: Mailbox::new(),
            fetch: WatchedEffect::new(0),
            save: WatchedEffect::new(0),
        };
        page.start_fetch();
        page
    }

    #[must_use]
    pub const fn state(&self) -> &EditPostState {
        &self.state
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.is_fetching
    }

    pub fn dispatch(&mut self, action: EditPostAction) {
        debug!(action = ?action, id = %self.state.id, "Edit post action");
        let previous_send_count = self.state.send_count;
        self.state = reduce(std::mem::take(&mut self.state), action);
        if self.state.send_count != previous_send_count {
            self.start_save();
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

    /// Check both fields, then ask for a save.
    pub fn submit(&mut self) {
        let title = self.state.title.value.clone();
        let body = self.state.body.value.clone();
        self.dispatch(EditPostAction::TitleRuleViolated(title));
        self.dispatch(EditPostAction::BodyRuleViolated(body));
        self.dispatch(EditPostAction::RequestSubmitted);
    }

    fn start_fetch(&mut self) {
        let api = self.api.clone();
        let store = self.store.clone();
        let id = self.state.id.clone();
        let tx = self.mailbox.sender();
        self.fetch.run(move |cancel| async move {
            let result = api.fetch_post(&id, &cancel).await;
            if cancel.is_cancelled() {
                return;
            }
            let action = match result {
                Ok(post) => EditPostAction::FetchCompleted(post),
                Err(e) if e.is_cancelled() => return,
                Err(e) if e.is_not_found() => {
                    debug!(id = %id, "Post not found");
                    EditPostAction::FetchFailed { not_found: true }
                }
                Err(e) => {
                    report_failure(&store, "Could not load this post.", &e);
                    EditPostAction::FetchFailed { not_found: false }
                }
            };
            let _ = tx.send(action);
        });
    }

    fn start_save(&mut self) {
        let api = self.api.clone();
        let store = self.store.clone();
        let tx = self.mailbox.sender();
        let id = self.state.id.clone();
        let title = self.state.title.value.clone();
        let body = self.state.body.value.clone();
        let token = store.state().user.token;

        let started = self.save.watch(self.state.send_count, move |cancel| async move {
            let result = api.edit_post(&id, &title, &body, &token, &cancel).await;
            if cancel.is_cancelled() {
                return;
            }
            match result {
                Ok(()) => store.flash("Post updated!"),
                Err(e) => {
                    report_failure(&store, "Could not save your changes. Please try again.", &e);
                }
            }
            let _ = tx.send(EditPostAction::SaveRequestFinished);
        });
        if started {
            self.dispatch(EditPostAction::SaveRequestStarted);
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        if self.state.is_fetching {
            "..."
        } else if self.state.not_found {
            info::NOT_FOUND_TITLE
        } else {
            "Edit Post"
        }
    }

    #[must_use]
    pub fn render(&self) -> Markup {
        let state = &self.state;
        if state.is_fetching {
            return html! { (LoadingDots) };
        }
        if state.not_found {
            return info::render_not_found();
        }
        if state.load_failed {
            return html! { (Alert::danger("Could not load this post. Please try again later.")) };
        }

        let back = Route::ViewPost {
            id: state.id.clone(),
        }
        .path();
        let action = Route::EditPost {
            id: state.id.clone(),
        }
        .path();
        let fields = html! {
            (post_fields(&state.title, &state.body))
            (Button::primary("Save Updates").disabled(state.is_saving))
        };

        html! {
            a class="small font-weight-bold" href=(back) { "« Back to post permalink" }
            (Form::post(&action, fields).class("mt-3"))
        }
    }
}

/// Title input and body textarea with their inline messages.
pub(super) fn post_fields(title: &FormField, body: &FormField) -> Markup {
    html! {
        (FormGroup::new(
            Label::new("Title", "post-title"),
            Input::text("title")
                .id("post-title")
                .class("form-control form-control-lg form-control-title")
                .value(&title.value)
                .no_autocomplete()
                .autofocus(),
        ).error(title.error()))
        (FormGroup::new(
            Label::new("Body Content", "post-body"),
            TextArea::new("body").id("post-body").value(&body.value),
        ).error(body.error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::api::Person;

    fn post() -> Post {
        Post {
            id: "p1".to_string(),
            title: "Original".to_string(),
            body: "Body".to_string(),
            author: Person {
                username: "alice".to_string(),
                avatar: "a.png".to_string(),
            },
            created_date: chrono::Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
        }
    }

    fn loaded() -> EditPostState {
        reduce(EditPostState::new("p1"), EditPostAction::FetchCompleted(post()))
    }

    #[test]
    fn test_fetch_completed_fills_fields() {
        let state = loaded();
        assert!(!state.is_fetching);
        assert_eq!(state.title.value, "Original");
        assert_eq!(state.body.value, "Body");
    }

    #[test]
    fn test_fetch_failed_not_found() {
        let state = reduce(
            EditPostState::new("p1"),
            EditPostAction::FetchFailed { not_found: true },
        );
        assert!(state.not_found);
        assert!(!state.load_failed);
        assert!(!state.is_fetching);
    }

    #[test]
    fn test_empty_title_blocks_submission() {
        let state = reduce(loaded(), EditPostAction::TitleChanged("   ".to_string()));
        let state = reduce(state, EditPostAction::TitleRuleViolated("   ".to_string()));
        let state = reduce(state, EditPostAction::BodyRuleViolated("Body".to_string()));
        let state = reduce(state, EditPostAction::RequestSubmitted);

        assert_eq!(state.send_count, 0);
        assert_eq!(state.title.error(), Some(TITLE_REQUIRED));
        assert!(!state.body.has_error);
    }

    #[test]
    fn test_valid_submission_increments_send_count() {
        let state = reduce(loaded(), EditPostAction::TitleRuleViolated("Original".to_string()));
        let state = reduce(state, EditPostAction::BodyRuleViolated("Body".to_string()));
        let state = reduce(state, EditPostAction::RequestSubmitted);
        assert_eq!(state.send_count, 1);
    }

    #[test]
    fn test_editing_clears_error() {
        let state = reduce(loaded(), EditPostAction::BodyRuleViolated(String::new()));
        assert_eq!(state.body.error(), Some(BODY_REQUIRED));
        let state = reduce(state, EditPostAction::BodyChanged("x".to_string()));
        assert!(!state.body.has_error);
    }

    #[test]
    fn test_saving_flag() {
        let state = reduce(loaded(), EditPostAction::SaveRequestStarted);
        assert!(state.is_saving);
        let state = reduce(state, EditPostAction::SaveRequestFinished);
        assert!(!state.is_saving);
    }
}
