//! Static pages: about, terms, not found.

use maud::{html, Markup};

pub const ABOUT_TITLE: &str = "About Us";
pub const TERMS_TITLE: &str = "Terms and Conditions";
pub const NOT_FOUND_TITLE: &str = "Not Found";

#[must_use]
pub fn render_about() -> Markup {
    html! {
        h2 { "About Us" }
        p class="lead text-muted" {
            "ComplexApp is a place to write: longer posts, fewer distractions, and a feed made only of people you chose to follow."
        }
        p {
            "Create an account, write a post, and follow other writers from their profile pages. Use the search overlay to find posts on topics you care about."
        }
    }
}

#[must_use]
pub fn render_terms() -> Markup {
    html! {
        h2 { "Our Terms & Conditions" }
        p class="lead text-muted" {
            "By creating an account you agree to be polite and to only post content you have the right to share."
        }
        p {
            "Posts may be removed by their authors at any time. Accounts that abuse the service may be suspended."
        }
    }
}

#[must_use]
pub fn render_not_found() -> Markup {
    html! {
        div class="text-center" {
            h2 { "Whoops, we cannot find that page." }
            p class="lead text-muted" {
                "You can always visit the "
                a href="/" { "homepage" }
                " to get a fresh start."
            }
        }
    }
}
