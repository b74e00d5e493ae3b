//! Alert components for flash messages and inline validation errors.

use std::time::Duration;

use maud::{html, Markup, Render};

/// A block error message.
///
/// # Example
///
/// ```ignore
/// use crate::components::alert::Alert;
///
/// let alert = Alert::danger("Could not load this post.");
/// ```
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub message: &'a str,
}

impl<'a> Alert<'a> {
    #[must_use]
    pub const fn danger(message: &'a str) -> Self {
        Self { message }
    }
}

impl Render for Alert<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="alert alert-danger" role="alert" {
                (self.message)
            }
        }
    }
}

/// Floating flash messages.
///
/// Every message carries its own dismiss delay; removing it after that delay
/// is left to the page script, the message list itself only ever grows.
#[derive(Debug, Clone)]
pub struct FlashMessages<'a> {
    pub messages: &'a [String],
    pub dismiss_after: Duration,
}

impl<'a> FlashMessages<'a> {
    #[must_use]
    pub const fn new(messages: &'a [String], dismiss_after: Duration) -> Self {
        Self {
            messages,
            dismiss_after,
        }
    }
}

impl Render for FlashMessages<'_> {
    fn render(&self) -> Markup {
        let dismiss_ms = self.dismiss_after.as_millis().to_string();
        html! {
            div class="floating-alerts" {
                @for message in self.messages {
                    div
                        class="alert alert-success text-center floating-alert shadow-sm"
                        data-dismiss-after-ms=(dismiss_ms)
                    {
                        (message)
                    }
                }
            }
        }
    }
}

/// Inline validation message rendered under an input.
#[derive(Debug, Clone, Copy)]
pub struct ValidationMessage<'a> {
    pub message: Option<&'a str>,
}

impl<'a> ValidationMessage<'a> {
    #[must_use]
    pub const fn new(message: Option<&'a str>) -> Self {
        Self { message }
    }
}

impl Render for ValidationMessage<'_> {
    fn render(&self) -> Markup {
        html! {
            @if let Some(message) = self.message {
                div class="alert alert-danger small liveValidateMessage" {
                    (message)
                }
            }
        }
    }
}
