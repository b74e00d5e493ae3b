//! Tab navigation components.
//!
//! The profile page uses a tab group to switch between a user's posts,
//! followers, and followed accounts.

use maud::{html, Markup, Render};

use crate::router::ProfileTab;

/// A single tab in a tab group.
#[derive(Debug, Clone)]
pub struct Tab {
    /// Display label for the tab
    pub label: String,
    /// URL/href for the tab link
    pub href: String,
    /// Whether this tab is currently active
    pub active: bool,
}

impl Tab {
    /// Create a new tab.
    #[must_use]
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            active: false,
        }
    }

    /// Set whether the tab is active.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

impl Render for Tab {
    fn render(&self) -> Markup {
        let class = if self.active {
            "nav-item nav-link active"
        } else {
            "nav-item nav-link"
        };

        html! {
            a class=(class) href=(self.href) { (self.label) }
        }
    }
}

/// A group of tabs for navigation.
#[derive(Debug, Clone, Default)]
pub struct TabGroup {
    pub tabs: Vec<Tab>,
}

impl TabGroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pre-configured tab to the group.
    #[must_use]
    pub fn push_tab(mut self, tab: Tab) -> Self {
        self.tabs.push(tab);
        self
    }
}

impl Render for TabGroup {
    fn render(&self) -> Markup {
        html! {
            div class="profile-nav nav nav-tabs pt-2 mb-4" {
                @for tab in &self.tabs {
                    (tab)
                }
            }
        }
    }
}

/// Counts shown in the profile tabs. `None` while the profile is loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileTabCounts {
    pub posts: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
}

/// Build the Posts / Followers / Following tabs for `username`.
#[must_use]
pub fn profile_tabs(username: &str, active: ProfileTab, counts: ProfileTabCounts) -> TabGroup {
    let label = |name: &str, count: Option<u64>| match count {
        Some(count) => format!("{name}: {count}"),
        None => format!("{name}: "),
    };

    TabGroup::new()
        .push_tab(
            Tab::new(label("Posts", counts.posts), ProfileTab::Posts.href(username))
                .active(active == ProfileTab::Posts),
        )
        .push_tab(
            Tab::new(
                label("Followers", counts.followers),
                ProfileTab::Followers.href(username),
            )
            .active(active == ProfileTab::Followers),
        )
        .push_tab(
            Tab::new(
                label("Following", counts.following),
                ProfileTab::Following.href(username),
            )
            .active(active == ProfileTab::Following),
        )
}
