//! Maud HTML components shared by the client pages.
//!
//! - `layout`: page skeleton, header, footer, chat panel
//! - `alert`: flash messages and inline validation messages
//! - `button`: configurable button and link-button
//! - `card`: post and people lists
//! - `form`: form, inputs, and labelled form groups
//! - `loading`: loading indicator
//! - `tabs`: profile tab navigation
//!
//! # Example
//!
//! ```ignore
//! use maud::html;
//! use crate::components::{Alert, BaseLayout, LoadingDots};
//!
//! let content = html! {
//!     (Alert::danger("Could not load this post."))
//!     (LoadingDots)
//! };
//! BaseLayout::new("Post", &app_state).render(content)
//! ```

pub mod alert;
pub mod button;
pub mod card;
pub mod form;
pub mod layout;
pub mod loading;
pub mod tabs;

pub use alert::{Alert, FlashMessages, ValidationMessage};
pub use button::{Button, ButtonVariant};
pub use card::{EmptyState, PersonList, PostItem, PostList};
pub use form::{Form, FormGroup, Input, Label, TextArea};
pub use layout::BaseLayout;
pub use loading::LoadingDots;
pub use tabs::{profile_tabs, ProfileTabCounts, Tab, TabGroup};

/// Re-export maud for convenience
pub use maud::{html, Markup, PreEscaped, DOCTYPE};
