//! Guest home page with the registration form.
//!
//! Each field is validated in two phases. The immediate phase runs on every
//! keystroke. The delayed phase runs once the field has been quiet for the
//! validation delay and, for username and email, bumps `check_count` to ask
//! the server whether the value is already taken.

use std::time::Duration;

use maud::{html, Markup, PreEscaped};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use super::field::FormField;
use super::report_failure;
use crate::api::ApiClient;
use crate::components::{Form, FormGroup, Input, Label};
use crate::runtime::{Debouncer, Mailbox, WatchedEffect};
use crate::store::{AppAction, AppStore};

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-zA-Z0-9]+)$").unwrap());
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+@\S+$").unwrap());

pub const USERNAME_TOO_LONG: &str = "Username cannot exceed 30 characters.";
pub const USERNAME_CHARSET: &str = "Username can only contain letters and numbers.";
pub const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters.";
pub const USERNAME_TAKEN: &str = "That username has been already taken.";
pub const EMAIL_INVALID: &str = "You must provide a valid email address.";
pub const EMAIL_TAKEN: &str = "That email has been already taken.";
pub const PASSWORD_TOO_LONG: &str = "Password cannot exceed 50 characters!";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 12 characters.";

const USERNAME_MAX: usize = 30;
const USERNAME_MIN: usize = 3;
const PASSWORD_MAX: usize = 50;
const PASSWORD_MIN: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterState {
    pub username: FormField,
    pub email: FormField,
    pub password: FormField,
    /// Bumped once per accepted submission; the registration request watches it.
    pub submit_count: u64,
    pub is_submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterAction {
    UsernameImmediately(String),
    UsernameAfterDelay,
    UsernameUniqueResults(bool),
    EmailImmediately(String),
    EmailAfterDelay,
    EmailUniqueResults(bool),
    PasswordImmediately(String),
    PasswordAfterDelay,
    SubmitForm,
    RegistrationFinished,
    RegistrationFailed,
}

#[must_use]
pub fn reduce(mut state: RegisterState, action: RegisterAction) -> RegisterState {
    match action {
        RegisterAction::UsernameImmediately(value) => username_immediately(&mut state, value),
        RegisterAction::UsernameAfterDelay => username_after_delay(&mut state, true),
        RegisterAction::UsernameUniqueResults(exists) => {
            unique_results(&mut state.username, exists, USERNAME_TAKEN);
        }
        RegisterAction::EmailImmediately(value) => state.email.set_value(value),
        RegisterAction::EmailAfterDelay => email_after_delay(&mut state, true),
        RegisterAction::EmailUniqueResults(exists) => {
            unique_results(&mut state.email, exists, EMAIL_TAKEN);
        }
        RegisterAction::PasswordImmediately(value) => password_immediately(&mut state, value),
        RegisterAction::PasswordAfterDelay => password_after_delay(&mut state),
        RegisterAction::SubmitForm => {
            // Re-run every check on the current values without new server lookups
            let username_taken = state.username.error() == Some(USERNAME_TAKEN);
            let username = state.username.value.clone();
            username_immediately(&mut state, username);
            username_after_delay(&mut state, false);
            keep_taken(&mut state.username, username_taken, USERNAME_TAKEN);

            let email_taken = state.email.error() == Some(EMAIL_TAKEN);
            let email = state.email.value.clone();
            state.email.set_value(email);
            email_after_delay(&mut state, false);
            keep_taken(&mut state.email, email_taken, EMAIL_TAKEN);

            let password = state.password.value.clone();
            password_immediately(&mut state, password);
            password_after_delay(&mut state);

            if is_ready_to_submit(&state) {
                state.submit_count += 1;
                state.is_submitting = true;
            }
        }
        RegisterAction::RegistrationFinished | RegisterAction::RegistrationFailed => {
            state.is_submitting = false;
        }
    }
    state
}

fn username_immediately(state: &mut RegisterState, value: String) {
    let field = &mut state.username;
    field.set_value(value);
    if field.value.chars().count() > USERNAME_MAX {
        field.fail(USERNAME_TOO_LONG);
    }
    if !field.value.is_empty() && !USERNAME_PATTERN.is_match(&field.value) {
        field.fail(USERNAME_CHARSET);
    }
}

fn username_after_delay(state: &mut RegisterState, request_check: bool) {
    let field = &mut state.username;
    if field.value.chars().count() < USERNAME_MIN {
        field.fail(USERNAME_TOO_SHORT);
    }
    if request_check && !field.has_error {
        field.check_count += 1;
    }
}

fn email_after_delay(state: &mut RegisterState, request_check: bool) {
    let field = &mut state.email;
    if !EMAIL_PATTERN.is_match(&field.value) {
        field.fail(EMAIL_INVALID);
    }
    if request_check && !field.has_error {
        field.check_count += 1;
    }
}

fn password_immediately(state: &mut RegisterState, value: String) {
    let field = &mut state.password;
    field.set_value(value);
    if field.value.chars().count() > PASSWORD_MAX {
        field.fail(PASSWORD_TOO_LONG);
    }
}

fn password_after_delay(state: &mut RegisterState) {
    let field = &mut state.password;
    if field.value.chars().count() < PASSWORD_MIN {
        field.fail(PASSWORD_TOO_SHORT);
    }
}

fn unique_results(field: &mut FormField, exists: bool, taken_message: &str) {
    if exists {
        field.fail(taken_message);
        field.is_unique = false;
    } else {
        field.is_unique = true;
    }
}

/// The server already said this value is taken; the local rules cannot know.
fn keep_taken(field: &mut FormField, was_taken: bool, taken_message: &str) {
    if was_taken && !field.has_error {
        field.fail(taken_message);
    }
}

fn is_ready_to_submit(state: &RegisterState) -> bool {
    !state.username.has_error
        && state.username.is_unique
        && !state.email.has_error
        && state.email.is_unique
        && !state.password.has_error
}

/// Controller for the guest home page.
#[derive(Debug)]
pub struct RegisterPage {
    state: RegisterState,
    api: ApiClient,
    store: AppStore,
    mailbox: Mailbox<RegisterAction>,
    username_timer: Debouncer,
    email_timer: Debouncer,
    password_timer: Debouncer,
    username_check: WatchedEffect,
    email_check: WatchedEffect,
    submission: WatchedEffect,
}

impl RegisterPage {
    pub const TITLE: &'static str = "Welcome!";

    #[must_use]
    pub fn new(api: ApiClient, store: AppStore, validation_delay: Duration) -> Self {
        Self {
            state: RegisterState::default(),
            api,
            store,
            mailbox: Mailbox::new(),
            username_timer: Debouncer::new(validation_delay),
            email_timer: Debouncer::new(validation_delay),
            password_timer: Debouncer::new(validation_delay),
            username_check: WatchedEffect::new(0),
            email_check: WatchedEffect::new(0),
            submission: WatchedEffect::new(0),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &RegisterState {
        &self.state
    }

    /// Apply `action` and start or cancel whatever the change calls for.
    pub fn dispatch(&mut self, action: RegisterAction) {
        debug!(action = ?action, "Register action");
        let previous = std::mem::take(&mut self.state);
        self.state = reduce(previous.clone(), action);
        self.run_effects(&previous);
    }

    /// Wait for the next timer or request completion and apply it.
    pub async fn next(&mut self) -> bool {
        match self.mailbox.recv().await {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Apply a completion that has already arrived, if any.
    pub fn try_next(&mut self) -> bool {
        match self.mailbox.try_recv() {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    pub fn submit(&mut self) {
        self.dispatch(RegisterAction::SubmitForm);
    }

    fn run_effects(&mut self, previous: &RegisterState) {
        // An answer still in flight is about the old value
        if self.state.username.value != previous.username.value {
            self.username_check.cancel();
        }
        if self.state.email.value != previous.email.value {
            self.email_check.cancel();
        }

        let tx = self.mailbox.sender();
        debounce_field(
            &mut self.username_timer,
            &previous.username.value,
            &self.state.username.value,
            tx.clone(),
            RegisterAction::UsernameAfterDelay,
        );
        debounce_field(
            &mut self.email_timer,
            &previous.email.value,
            &self.state.email.value,
            tx.clone(),
            RegisterAction::EmailAfterDelay,
        );
        debounce_field(
            &mut self.password_timer,
            &previous.password.value,
            &self.state.password.value,
            tx.clone(),
            RegisterAction::PasswordAfterDelay,
        );

        let api = self.api.clone();
        let store = self.store.clone();
        let username = self.state.username.value.clone();
        let username_tx = tx.clone();
        self.username_check
            .watch(self.state.username.check_count, move |cancel| async move {
                let result = api.does_username_exist(&username, &cancel).await;
                if cancel.is_cancelled() {
                    return;
                }
                match result {
                    Ok(exists) => {
                        let _ = username_tx.send(RegisterAction::UsernameUniqueResults(exists));
                    }
                    Err(e) => report_failure(
                        &store,
                        "Could not check that username. Please try again.",
                        &e,
                    ),
                }
            });

        let api = self.api.clone();
        let store = self.store.clone();
        let email = self.state.email.value.clone();
        let email_tx = tx.clone();
        self.email_check
            .watch(self.state.email.check_count, move |cancel| async move {
                let result = api.does_email_exist(&email, &cancel).await;
                if cancel.is_cancelled() {
                    return;
                }
                match result {
                    Ok(exists) => {
                        let _ = email_tx.send(RegisterAction::EmailUniqueResults(exists));
                    }
                    Err(e) => report_failure(
                        &store,
                        "Could not check that email. Please try again.",
                        &e,
                    ),
                }
            });

        let api = self.api.clone();
        let store = self.store.clone();
        let username = self.state.username.value.clone();
        let email = self.state.email.value.clone();
        let password = self.state.password.value.clone();
        self.submission
            .watch(self.state.submit_count, move |cancel| async move {
                let result = api.register(&username, &email, &password, &cancel).await;
                if cancel.is_cancelled() {
                    return;
                }
                match result {
                    Ok(user) => {
                        info!(username = %user.username, "Registered new account");
                        store.dispatch(AppAction::Login(user));
                        store.flash("Congrats! Welcome to your new account.");
                        let _ = tx.send(RegisterAction::RegistrationFinished);
                    }
                    Err(e) => {
                        report_failure(&store, "Registration failed. Please try again.", &e);
                        let _ = tx.send(RegisterAction::RegistrationFailed);
                    }
                }
            });
    }

    #[must_use]
    pub fn render(&self) -> Markup {
        let state = &self.state;
        let fields = html! {
            (FormGroup::new(
                Label::new("Username", "username-register"),
                Input::text("username")
                    .id("username-register")
                    .placeholder("Pick a username")
                    .value(&state.username.value)
                    .no_autocomplete(),
            ).error(state.username.error()))
            (FormGroup::new(
                Label::new("Email", "email-register"),
                Input::text("email")
                    .id("email-register")
                    .placeholder("you@example.com")
                    .value(&state.email.value)
                    .no_autocomplete(),
            ).error(state.email.error()))
            (FormGroup::new(
                Label::new("Password", "password-register"),
                Input::password("password")
                    .id("password-register")
                    .placeholder("Create a password")
                    .value(&state.password.value),
            ).error(state.password.error()))
            button
                type="submit"
                class="py-3 mt-4 btn btn-lg btn-success btn-block"
                disabled[state.is_submitting]
            {
                "Sign up for ComplexApp"
            }
        };

        html! {
            div class="row align-items-center" {
                div class="col-lg-7 py-3 py-md-5" {
                    h1 class="display-3" { "Remember Writing?" }
                    p class="lead text-muted" {
                        "Are you sick of short tweets and impersonal "
                        (PreEscaped("&ldquo;shared&rdquo;"))
                        " posts that are reminiscent of the late 90"
                        (PreEscaped("&rsquo;"))
                        "s email forwards? We believe getting back to actually writing is the key to enjoying the internet again."
                    }
                }
                div class="col-lg-5 pl-lg-5 pb-3 py-lg-5" {
                    (Form::post("/register", fields).id("register-form"))
                }
            }
        }
    }
}

/// Restart the field's quiet-period timer when its value changes.
///
/// An empty value only cancels the pending timer.
fn debounce_field(
    timer: &mut Debouncer,
    previous: &str,
    current: &str,
    tx: tokio::sync::mpsc::UnboundedSender<RegisterAction>,
    action: RegisterAction,
) {
    if previous == current {
        return;
    }
    if current.is_empty() {
        timer.cancel();
        return;
    }
    timer.schedule(move || {
        let _ = tx.send(action);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::storage::MemoryStorage;
    use crate::store::AppState;

    fn apply(actions: impl IntoIterator<Item = RegisterAction>) -> RegisterState {
        actions.into_iter().fold(RegisterState::default(), reduce)
    }

    fn page() -> RegisterPage {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let store = AppStore::new(AppState::default(), Arc::new(MemoryStorage::new()));
        RegisterPage::new(api, store, Duration::from_millis(750))
    }

    #[test]
    fn test_username_too_long() {
        let state = apply([RegisterAction::UsernameImmediately("a".repeat(31))]);
        assert_eq!(state.username.error(), Some(USERNAME_TOO_LONG));

        let state = apply([RegisterAction::UsernameImmediately("a".repeat(30))]);
        assert!(!state.username.has_error);
    }

    #[test]
    fn test_username_charset_message_wins() {
        let state = apply([RegisterAction::UsernameImmediately(format!("{}!", "a".repeat(31)))]);
        assert_eq!(state.username.error(), Some(USERNAME_CHARSET));

        let state = apply([RegisterAction::UsernameImmediately("bob smith".to_string())]);
        assert_eq!(state.username.error(), Some(USERNAME_CHARSET));
    }

    #[test]
    fn test_empty_username_has_no_immediate_error() {
        let state = apply([
            RegisterAction::UsernameImmediately("bad!".to_string()),
            RegisterAction::UsernameImmediately(String::new()),
        ]);
        assert!(!state.username.has_error);
    }

    #[test]
    fn test_short_username_fails_after_delay_without_check() {
        let state = apply([
            RegisterAction::UsernameImmediately("ab".to_string()),
            RegisterAction::UsernameAfterDelay,
        ]);
        assert_eq!(state.username.error(), Some(USERNAME_TOO_SHORT));
        assert_eq!(state.username.check_count, 0);
    }

    #[test]
    fn test_invalid_username_never_increments_check_count() {
        let state = apply([
            RegisterAction::UsernameImmediately("no spaces".to_string()),
            RegisterAction::UsernameAfterDelay,
            RegisterAction::UsernameAfterDelay,
        ]);
        assert_eq!(state.username.check_count, 0);
    }

    #[test]
    fn test_valid_username_increments_check_count() {
        let state = apply([
            RegisterAction::UsernameImmediately("alice".to_string()),
            RegisterAction::UsernameAfterDelay,
        ]);
        assert!(!state.username.has_error);
        assert_eq!(state.username.check_count, 1);
    }

    #[test]
    fn test_unique_results() {
        let state = apply([
            RegisterAction::UsernameImmediately("alice".to_string()),
            RegisterAction::UsernameUniqueResults(true),
        ]);
        assert_eq!(state.username.error(), Some(USERNAME_TAKEN));
        assert!(!state.username.is_unique);

        let state = reduce(state, RegisterAction::UsernameUniqueResults(false));
        assert!(state.username.is_unique);
    }

    #[test]
    fn test_email_rules() {
        let state = apply([
            RegisterAction::EmailImmediately("not-an-email".to_string()),
            RegisterAction::EmailAfterDelay,
        ]);
        assert_eq!(state.email.error(), Some(EMAIL_INVALID));
        assert_eq!(state.email.check_count, 0);

        let state = apply([
            RegisterAction::EmailImmediately("a@b.com".to_string()),
            RegisterAction::EmailAfterDelay,
            RegisterAction::EmailUniqueResults(true),
        ]);
        assert_eq!(state.email.error(), Some(EMAIL_TAKEN));
        assert_eq!(state.email.check_count, 1);
    }

    #[test]
    fn test_password_rules() {
        let state = apply([RegisterAction::PasswordImmediately("x".repeat(51))]);
        assert_eq!(state.password.error(), Some(PASSWORD_TOO_LONG));

        let state = apply([
            RegisterAction::PasswordImmediately("short".to_string()),
            RegisterAction::PasswordAfterDelay,
        ]);
        assert_eq!(state.password.error(), Some(PASSWORD_TOO_SHORT));
        assert_eq!(state.password.check_count, 0);
    }

    #[test]
    fn test_submit_requires_confirmed_uniqueness() {
        let filled = [
            RegisterAction::UsernameImmediately("alice".to_string()),
            RegisterAction::EmailImmediately("alice@example.com".to_string()),
            RegisterAction::PasswordImmediately("correct horse battery".to_string()),
        ];

        let state = apply(filled.clone().into_iter().chain([RegisterAction::SubmitForm]));
        assert_eq!(state.submit_count, 0);
        assert_eq!(state.username.check_count, 0);

        let state = apply(filled.into_iter().chain([
            RegisterAction::UsernameUniqueResults(false),
            RegisterAction::EmailUniqueResults(false),
            RegisterAction::SubmitForm,
        ]));
        assert_eq!(state.submit_count, 1);
        assert!(state.is_submitting);

        let state = reduce(state, RegisterAction::RegistrationFinished);
        assert!(!state.is_submitting);
    }

    #[test]
    fn test_edit_after_confirmation_blocks_submit() {
        let state = apply([
            RegisterAction::UsernameImmediately("alice".to_string()),
            RegisterAction::UsernameAfterDelay,
            RegisterAction::UsernameUniqueResults(false),
            RegisterAction::EmailImmediately("alice@example.com".to_string()),
            RegisterAction::EmailAfterDelay,
            RegisterAction::EmailUniqueResults(false),
            RegisterAction::PasswordImmediately("correct horse battery".to_string()),
            RegisterAction::UsernameImmediately("alicetaken".to_string()),
            RegisterAction::SubmitForm,
        ]);
        assert!(!state.username.is_unique);
        assert_eq!(state.submit_count, 0);
        assert!(!state.is_submitting);

        let state = reduce(state, RegisterAction::EmailImmediately("other@example.com".to_string()));
        assert!(!state.email.is_unique);
    }

    #[test]
    fn test_taken_errors_survive_submit() {
        let state = apply([
            RegisterAction::UsernameImmediately("bob".to_string()),
            RegisterAction::UsernameAfterDelay,
            RegisterAction::UsernameUniqueResults(true),
            RegisterAction::EmailImmediately("bob@example.com".to_string()),
            RegisterAction::EmailAfterDelay,
            RegisterAction::EmailUniqueResults(true),
            RegisterAction::SubmitForm,
        ]);
        assert_eq!(state.username.error(), Some(USERNAME_TAKEN));
        assert_eq!(state.email.error(), Some(EMAIL_TAKEN));
        assert_eq!(state.submit_count, 0);
    }

    #[test]
    fn test_submit_surfaces_all_errors() {
        let state = apply([RegisterAction::SubmitForm]);
        assert_eq!(state.username.error(), Some(USERNAME_TOO_SHORT));
        assert_eq!(state.email.error(), Some(EMAIL_INVALID));
        assert_eq!(state.password.error(), Some(PASSWORD_TOO_SHORT));
        assert_eq!(state.submit_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_username_reports_after_quiet_period() {
        let mut page = page();
        page.dispatch(RegisterAction::UsernameImmediately("a".to_string()));
        page.dispatch(RegisterAction::UsernameImmediately("ab".to_string()));
        assert!(!page.state().username.has_error);

        assert!(page.next().await);
        assert_eq!(page.state().username.error(), Some(USERNAME_TOO_SHORT));
        assert_eq!(page.state().username.check_count, 0);
        assert!(!page.try_next());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_value_cancels_pending_timer() {
        let mut page = page();
        page.dispatch(RegisterAction::PasswordImmediately("abc".to_string()));
        page.dispatch(RegisterAction::PasswordImmediately(String::new()));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!page.try_next());
        assert!(!page.state().password.has_error);
    }

    #[test]
    fn test_render_shows_inline_errors() {
        let mut page = page();
        page.state.username.fail(USERNAME_TOO_SHORT);
        let html = page.render().into_string();

        assert!(html.contains("Remember Writing?"));
        assert!(html.contains(USERNAME_TOO_SHORT));
        assert!(html.contains("Sign up for ComplexApp"));
        assert!(html.contains(r#"id="email-register""#));
    }
}
