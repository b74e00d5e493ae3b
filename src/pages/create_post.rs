//! Create-post page. Same field rules as editing; a successful save
//! redirects to the new post.

use maud::{html, Markup, Render};
use tracing::{debug, info};

use super::edit_post::post_fields;
use super::field::FormField;
use super::{report_failure, BODY_REQUIRED, TITLE_REQUIRED};
use crate::api::ApiClient;
use crate::components::{Button, Form};
use crate::router::Route;
use crate::runtime::{Mailbox, WatchedEffect};
use crate::store::AppStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePostState {
    pub title: FormField,
    pub body: FormField,
    pub is_saving: bool,
    pub send_count: u64,
    /// Id of the created post once the server has accepted it.
    pub created_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePostAction {
    TitleChanged(String),
    BodyChanged(String),
    TitleRuleViolated(String),
    BodyRuleViolated(String),
    RequestSubmitted,
    SaveRequestStarted,
    PostCreated(String),
    SaveRequestFailed,
}

#[must_use]
pub fn reduce(mut state: CreatePostState, action: CreatePostAction) -> CreatePostState {
    match action {
        CreatePostAction::TitleChanged(value) => state.title.set_value(value),
        CreatePostAction::BodyChanged(value) => state.body.set_value(value),
        CreatePostAction::TitleRuleViolated(value) => state.title.require(&value, TITLE_REQUIRED),
        CreatePostAction::BodyRuleViolated(value) => state.body.require(&value, BODY_REQUIRED),
        CreatePostAction::RequestSubmitted => {
            if !state.title.has_error && !state.body.has_error {
                state.send_count += 1;
            }
        }
        CreatePostAction::SaveRequestStarted => state.is_saving = true,
        CreatePostAction::PostCreated(id) => {
            state.is_saving = false;
            state.created_id = Some(id);
        }
        CreatePostAction::SaveRequestFailed => state.is_saving = false,
    }
    state
}

/// Controller for `/create-post`.
#[derive(Debug)]
pub struct CreatePostPage {
    state: CreatePostState,
    api: ApiClient,
    store: AppStore,
    mailbox: Mailbox<CreatePostAction>,
    save: WatchedEffect,
}

impl CreatePostPage {
    pub const TITLE: &'static str = "Create New Post";

    #[must_use]
    pub fn new(api: ApiClient, store: AppStore) -> Self {
        Self {
            state: CreatePostState::default(),
            api,
            store,
            mailbox: Mailbox::new(),
            save: WatchedEffect::new(0),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &CreatePostState {
        &self.state
    }

    pub fn dispatch(&mut self, action: CreatePostAction) {
        debug!(action = ?action, "Create post action");
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

    pub fn submit(&mut self) {
        let title = self.state.title.value.clone();
        let body = self.state.body.value.clone();
        self.dispatch(CreatePostAction::TitleRuleViolated(title));
        self.dispatch(CreatePostAction::BodyRuleViolated(body));
        self.dispatch(CreatePostAction::RequestSubmitted);
    }

    /// Where to go once the post exists.
    #[must_use]
    pub fn redirect(&self) -> Option<String> {
        self.state
            .created_id
            .as_ref()
            .map(|id| Route::ViewPost { id: id.clone() }.path())
    }

    fn start_save(&mut self) {
        let api = self.api.clone();
        let store = self.store.clone();
        let tx = self.mailbox.sender();
        let title = self.state.title.value.clone();
        let body = self.state.body.value.clone();
        let token = store.state().user.token;

        let started = self.save.watch(self.state.send_count, move |cancel| async move {
            let result = api.create_post(&title, &body, &token, &cancel).await;
            if cancel.is_cancelled() {
                return;
            }
            match result {
                Ok(id) => {
                    info!(id = %id, "Post created");
                    store.flash("Congrats, you created a new post.");
                    let _ = tx.send(CreatePostAction::PostCreated(id));
                }
                Err(e) => {
                    report_failure(&store, "Could not create your post. Please try again.", &e);
                    let _ = tx.send(CreatePostAction::SaveRequestFailed);
                }
            }
        });
        if started {
            self.dispatch(CreatePostAction::SaveRequestStarted);
        }
    }

    #[must_use]
    pub fn render(&self) -> Markup {
        let fields = html! {
            (post_fields(&self.state.title, &self.state.body))
            (Button::primary("Save New Post").disabled(self.state.is_saving))
        };
        Form::post("/create-post", fields).id("create-post-form").render()
    }
}
