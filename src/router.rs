//! Client-side routes.
//!
//! Patterns are tried in declaration order and the first match wins; anything
//! unmatched resolves to [`Route::NotFound`].

use std::fmt;

/// Which list a profile page shows below its header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileTab {
    #[default]
    Posts,
    Followers,
    Following,
}

impl ProfileTab {
    /// Link to this tab of `username`'s profile.
    #[must_use]
    pub fn href(self, username: &str) -> String {
        Route::Profile {
            username: username.to_string(),
            tab: self,
        }
        .path()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    ViewPost { id: String },
    EditPost { id: String },
    CreatePost,
    Profile { username: String, tab: ProfileTab },
    About,
    Terms,
    NotFound,
}

impl Route {
    /// Resolve a URL path (query string and fragment are ignored).
    #[must_use]
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                urlencoding::decode(s)
                    .map_or_else(|_| s.to_string(), std::borrow::Cow::into_owned)
            })
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["post", id] => Self::ViewPost { id: (*id).to_string() },
            ["post", id, "edit"] => Self::EditPost { id: (*id).to_string() },
            ["create-post"] => Self::CreatePost,
            ["profile", username] => Self::Profile {
                username: (*username).to_string(),
                tab: ProfileTab::Posts,
            },
            ["profile", username, "followers"] => Self::Profile {
                username: (*username).to_string(),
                tab: ProfileTab::Followers,
            },
            ["profile", username, "following"] => Self::Profile {
                username: (*username).to_string(),
                tab: ProfileTab::Following,
            },
            ["about-us"] => Self::About,
            ["terms"] => Self::Terms,
            _ => Self::NotFound,
        }
    }

    /// Canonical path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::ViewPost { id } => format!("/post/{}", urlencoding::encode(id)),
            Self::EditPost { id } => format!("/post/{}/edit", urlencoding::encode(id)),
            Self::CreatePost => "/create-post".to_string(),
            Self::Profile { username, tab } => {
                let base = format!("/profile/{}", urlencoding::encode(username));
                match tab {
                    ProfileTab::Posts => base,
                    ProfileTab::Followers => format!("{base}/followers"),
                    ProfileTab::Following => format!("{base}/following"),
                }
            }
            Self::About => "/about-us".to_string(),
            Self::Terms => "/terms".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
