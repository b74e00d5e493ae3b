//! Page controllers.
//!
//! Each page owns a private state, a pure `reduce` over its own action enum,
//! and a [`Mailbox`](crate::runtime::Mailbox) that its timers and requests
//! post completions into. `dispatch` applies one action, then compares the new
//! state with the previous one to decide which effects to start or cancel.
//! Dropping a page cancels everything it started.

pub mod create_post;
pub mod edit_post;
pub mod field;
pub mod home;
pub mod info;
pub mod profile;
pub mod register;
pub mod search;
pub mod view_post;

pub use create_post::{CreatePostAction, CreatePostPage, CreatePostState};
pub use edit_post::{EditPostAction, EditPostPage, EditPostState};
pub use field::FormField;
pub use home::{FeedAction, HomePage, HomeState};
pub use info::{render_about, render_not_found, render_terms};
pub use profile::{ProfileAction, ProfilePage, ProfileState};
pub use register::{RegisterAction, RegisterPage, RegisterState};
pub use search::{SearchAction, SearchOverlay, SearchState, SearchVisibility};
pub use view_post::{ViewPostAction, ViewPostPage, ViewPostState};

use tracing::{debug, warn};

use crate::error::ClientError;
use crate::store::AppStore;

pub const TITLE_REQUIRED: &str = "You must provide a title!";
pub const BODY_REQUIRED: &str = "You must provide body content!";

/// Log a failed request and tell the user about it.
///
/// Cancellation is an expected outcome of unmounting or superseding a request
/// and is only logged.
pub(crate) fn report_failure(store: &AppStore, message: &str, error: &ClientError) {
    if error.is_cancelled() {
        debug!("Request cancelled: {message}");
        return;
    }
    warn!(error = %error, "{message}");
    store.flash(message);
}
