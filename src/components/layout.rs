//! Base layout components for the client UI.
//!
//! This module provides the page skeleton: head, header with the login form
//! or the logged-in toolbar, flash messages, search/chat overlays, and footer.

use std::time::Duration;

use maud::{html, Markup, Render, DOCTYPE};

use super::alert::FlashMessages;
use super::button::Button;
use super::form::{Form, Input};
use crate::constants::APP_NAME;
use crate::store::AppState;

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h2 { "Hello" } };
/// let page = BaseLayout::new("Edit Post", &app_state).render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    app: &'a AppState,
    wide: bool,
    flash_duration: Duration,
    overlay: Option<Markup>,
}

impl<'a> BaseLayout<'a> {
    /// Create a layout for a page titled `title`, rendered for the viewer in `app`.
    #[must_use]
    pub fn new(title: &'a str, app: &'a AppState) -> Self {
        Self {
            title,
            app,
            wide: false,
            flash_duration: Duration::from_secs(3),
            overlay: None,
        }
    }

    /// Use the full-width container instead of the narrow reading column.
    #[must_use]
    pub fn wide(mut self, wide: bool) -> Self {
        self.wide = wide;
        self
    }

    /// How long each flash message stays on screen.
    #[must_use]
    pub fn flash_duration(mut self, duration: Duration) -> Self {
        self.flash_duration = duration;
        self
    }

    /// Markup drawn above the page, e.g. the search overlay.
    #[must_use]
    pub fn with_overlay(mut self, overlay: Option<Markup>) -> Self {
        self.overlay = overlay;
        self
    }

    /// Render the complete HTML document with the given content.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        let container = if self.wide {
            "container py-md-5"
        } else {
            "container container--narrow py-md-5"
        };

        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) " | " (APP_NAME) }
                    link rel="stylesheet" href="/main.css";
                }
                body {
                    (FlashMessages::new(&self.app.flash_messages, self.flash_duration))
                    (self.render_header())
                    main class=(container) {
                        (content)
                    }
                    (Self::render_footer())
                    @if let Some(overlay) = &self.overlay {
                        (overlay)
                    }
                    (self.render_chat())
                }
            }
        }
    }

    /// Render the page header with navigation.
    fn render_header(&self) -> Markup {
        html! {
            header class="header-bar bg-primary mb-3" {
                div class="container d-flex flex-column flex-md-row align-items-center p-3" {
                    h4 class="my-0 mr-md-auto font-weight-normal" {
                        a href="/" class="text-white" { (APP_NAME) }
                    }
                    @if self.app.logged_in {
                        (self.render_logged_in())
                    } @else {
                        (Self::render_logged_out())
                    }
                }
            }
        }
    }

    fn render_logged_in(&self) -> Markup {
        let user = &self.app.user;
        html! {
            div class="flex-row my-3 my-md-0" {
                a href="#search" class="text-white mr-2 header-search-icon" data-action="open-search" {
                    "Search"
                }
                " "
                span class="mr-2 header-chat-icon text-white" data-action="toggle-chat" {
                    "Chat"
                    @if self.app.unread_chat_count > 0 {
                        " "
                        span class="chat-count-badge text-white" {
                            @if self.app.unread_chat_count < 10 {
                                (self.app.unread_chat_count)
                            } @else {
                                "9+"
                            }
                        }
                    }
                }
                " "
                a href=(format!("/profile/{}", user.username)) class="mr-2" {
                    img class="small-header-avatar" src=(user.avatar) alt=(user.username);
                }
                (Button::success("Create Post").href("/create-post").small().class("mr-2"))
                " "
                (Form::post("/logout", html! {
                    (Button::secondary("Sign Out").small())
                }).class("d-inline"))
            }
        }
    }

    fn render_logged_out() -> Markup {
        let fields = html! {
            div class="row align-items-center" {
                div class="col-md mr-0 pr-md-0 mb-3 mb-md-0" {
                    (Input::text("username").class("form-control form-control-sm input-dark").placeholder("Username").no_autocomplete())
                }
                div class="col-md mr-0 pr-md-0 mb-3 mb-md-0" {
                    (Input::password("password").class("form-control form-control-sm input-dark").placeholder("Password"))
                }
                div class="col-md-auto" {
                    (Button::success("Sign In").small())
                }
            }
        };
        Form::post("/login", fields).class("mb-0 pt-2 pt-md-0").render()
    }

    fn render_chat(&self) -> Markup {
        let class = if self.app.is_chat_open {
            "chat-wrapper chat-wrapper--is-visible shadow border-top border-left border-right"
        } else {
            "chat-wrapper shadow border-top border-left border-right"
        };
        html! {
            @if self.app.logged_in {
                div id="chat-wrapper" class=(class) {
                    div class="chat-title-bar bg-primary" { "Chat" }
                }
            }
        }
    }

    /// Render the page footer.
    fn render_footer() -> Markup {
        html! {
            footer class="border-top text-center small text-muted py-3" {
                p {
                    a href="/" class="mx-1" { "Home" }
                    " | "
                    a class="mx-1" href="/about-us" { "About Us" }
                    " | "
                    a class="mx-1" href="/terms" { "Terms" }
                }
                p class="m-0" {
                    "Copyright © " (chrono::Utc::now().format("%Y").to_string()) " "
                    a href="/" class="text-muted" { (APP_NAME) }
                    ". All rights reserved."
                }
            }
        }
    }
}
