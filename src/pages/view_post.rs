//! Single post page with owner-only edit and delete controls.

use maud::{html, Markup};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{info as static_pages, report_failure};
use crate::api::{ApiClient, Post};
use crate::components::{Alert, LoadingDots};
use crate::router::{ProfileTab, Route};
use crate::runtime::{Mailbox, WatchedEffect};
use crate::store::{AppState, AppStore};

/// The only response body that means the post is gone.
pub const DELETE_SUCCESS: &str = "Success";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewPostState {
    pub id: String,
    pub post: Option<Post>,
    pub is_loading: bool,
    pub not_found: bool,
    pub load_failed: bool,
    pub is_deleting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPostAction {
    FetchCompleted(Post),
    FetchFailed { not_found: bool },
    DeleteStarted,
    DeleteFinished,
}

#[must_use]
pub fn reduce(mut state: ViewPostState, action: ViewPostAction) -> ViewPostState {
    match action {
        ViewPostAction::FetchCompleted(post) => {
            state.post = Some(post);
            state.is_loading = false;
        }
        ViewPostAction::FetchFailed { not_found } => {
            state.is_loading = false;
            state.not_found = not_found;
            state.load_failed = !not_found;
        }
        ViewPostAction::DeleteStarted => state.is_deleting = true,
        ViewPostAction::DeleteFinished => state.is_deleting = false,
    }
    state
}

/// Controller for `/post/:id`.
#[derive(Debug)]
pub struct ViewPostPage {
    state: ViewPostState,
    api: ApiClient,
    store: AppStore,
    mailbox: Mailbox<ViewPostAction>,
    fetch: WatchedEffect,
}

impl ViewPostPage {
    /// Mount the page and start loading the post.
    #[must_use]
    pub fn open(id: impl Into<String>, api: ApiClient, store: AppStore) -> Self {
        let mut page = Self {
            state: ViewPostState {
                id: id.into(),
                is_loading: true,
                ..ViewPostState::default()
            },
            api,
            store,
            mailbox: Mailbox::new(),
            fetch: WatchedEffect::new(0),
        };

        let api = page.api.clone();
        let store = page.store.clone();
        let id = page.state.id.clone();
        let tx = page.mailbox.sender();
        page.fetch.run(move |cancel| async move {
            let result = api.fetch_post(&id, &cancel).await;
            if cancel.is_cancelled() {
                return;
            }
            let action = match result {
                Ok(post) => ViewPostAction::FetchCompleted(post),
                Err(e) if e.is_cancelled() => return,
                Err(e) if e.is_not_found() => {
                    debug!(id = %id, "Post not found");
                    ViewPostAction::FetchFailed { not_found: true }
                }
                Err(e) => {
                    report_failure(&store, "Could not load this post.", &e);
                    ViewPostAction::FetchFailed { not_found: false }
                }
            };
            let _ = tx.send(action);
        });
        page
    }

    #[must_use]
    pub const fn state(&self) -> &ViewPostState {
        &self.state
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn dispatch(&mut self, action: ViewPostAction) {
        debug!(action = ?action, "View post action");
        self.state = reduce(std::mem::take(&mut self.state), action);
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

    /// Whether the logged-in viewer wrote this post.
    #[must_use]
    pub fn is_owner(&self, app: &AppState) -> bool {
        self.state
            .post
            .as_ref()
            .is_some_and(|post| app.is_viewer(&post.author.username))
    }

    /// Delete the post once the user has confirmed.
    ///
    /// Returns where to navigate next. Only a literal `"Success"` answer
    /// navigates and flashes. Any other answer leaves the page as it is; a
    /// failed request is reported.
    pub async fn delete(&mut self, confirmed: bool) -> Option<String> {
        if !confirmed || self.state.is_deleting {
            return None;
        }
        let app = self.store.state();
        if !self.is_owner(&app) {
            return None;
        }

        self.dispatch(ViewPostAction::DeleteStarted);
        let cancel = CancellationToken::new();
        let result = self
            .api
            .delete_post(&self.state.id, &app.user.token, &cancel)
            .await;
        self.dispatch(ViewPostAction::DeleteFinished);

        match result {
            Ok(answer) if answer == DELETE_SUCCESS => {
                info!(id = %self.state.id, "Post deleted");
                self.store.flash("The post was successfully deleted.");
                Some(ProfileTab::Posts.href(&app.user.username))
            }
            Ok(answer) => {
                debug!(id = %self.state.id, answer = %answer, "Delete was not accepted");
                None
            }
            Err(e) => {
                report_failure(&self.store, "Could not delete this post. Please try again.", &e);
                None
            }
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match &self.state.post {
            Some(post) => post.title.as_str(),
            None if self.state.not_found => static_pages::NOT_FOUND_TITLE,
            None => "...",
        }
    }

    #[must_use]
    pub fn render(&self, app: &AppState) -> Markup {
        let state = &self.state;
        if state.is_loading {
            return html! { (LoadingDots) };
        }
        if state.not_found {
            return static_pages::render_not_found();
        }
        let Some(post) = &state.post else {
            return html! { (Alert::danger("Could not load this post. Please try again later.")) };
        };

        let author_href = ProfileTab::Posts.href(&post.author.username);
        let edit_href = Route::EditPost {
            id: post.id.clone(),
        }
        .path();

        html! {
            div class="d-flex justify-content-between" {
                h2 { (post.title) }
                @if self.is_owner(app) {
                    span class="pt-2" {
                        a href=(edit_href) data-tip="Edit" class="text-primary mr-2" {
                            i class="fas fa-edit" {}
                        }
                        " "
                        a data-action="delete-post" data-tip="Delete" class="delete-post-button text-danger" {
                            i class="fas fa-trash" {}
                        }
                    }
                }
            }
            p class="text-muted small mb-4" {
                a href=(author_href) {
                    img class="avatar-tiny" src=(post.author.avatar);
                }
                "Posted by "
                a href=(author_href) { (post.author.username) }
                " on " (post.formatted_date())
            }
            div class="body-content" {
                @for paragraph in paragraphs(&post.body) {
                    p { (paragraph) }
                }
            }
        }
    }
}

/// Split a post body into paragraphs on blank lines.
fn paragraphs(body: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}
