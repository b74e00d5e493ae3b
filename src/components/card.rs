//! List components for posts and people.

use maud::{html, Markup, Render};

use crate::api::{Person, Post};

/// One post in a list, linking to the post page.
///
/// # Example
///
/// ```ignore
/// use crate::components::card::PostItem;
///
/// let item = PostItem::new(&post).hide_author();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PostItem<'a> {
    pub post: &'a Post,
    pub hide_author: bool,
}

impl<'a> PostItem<'a> {
    #[must_use]
    pub const fn new(post: &'a Post) -> Self {
        Self {
            post,
            hide_author: false,
        }
    }

    /// Leave out the "by author" part, e.g. on the author's own profile.
    #[must_use]
    pub const fn hide_author(mut self) -> Self {
        self.hide_author = true;
        self
    }
}

impl Render for PostItem<'_> {
    fn render(&self) -> Markup {
        let post = self.post;
        html! {
            a href=(format!("/post/{}", post.id)) class="list-group-item list-group-item-action" {
                img class="avatar-tiny" src=(post.author.avatar);
                " "
                strong { (post.title) }
                " "
                span class="text-muted small" {
                    @if !self.hide_author {
                        "by " (post.author.username) " "
                    }
                    "on " (post.formatted_date())
                }
            }
        }
    }
}

/// A list group of posts.
#[derive(Debug, Clone, Copy)]
pub struct PostList<'a> {
    pub posts: &'a [Post],
    pub hide_author: bool,
}

impl<'a> PostList<'a> {
    #[must_use]
    pub const fn new(posts: &'a [Post]) -> Self {
        Self {
            posts,
            hide_author: false,
        }
    }

    #[must_use]
    pub const fn hide_author(mut self) -> Self {
        self.hide_author = true;
        self
    }
}

impl Render for PostList<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="list-group" {
                @for post in self.posts {
                    @if self.hide_author {
                        (PostItem::new(post).hide_author())
                    } @else {
                        (PostItem::new(post))
                    }
                }
            }
        }
    }
}

/// A list group of people linking to their profiles.
#[derive(Debug, Clone, Copy)]
pub struct PersonList<'a> {
    pub people: &'a [Person],
}

impl<'a> PersonList<'a> {
    #[must_use]
    pub const fn new(people: &'a [Person]) -> Self {
        Self { people }
    }
}

impl Render for PersonList<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="list-group" {
                @for person in self.people {
                    a href=(format!("/profile/{}", person.username)) class="list-group-item list-group-item-action" {
                        img class="avatar-tiny" src=(person.avatar);
                        " "
                        (person.username)
                    }
                }
            }
        }
    }
}

/// Placeholder text for an empty list.
#[derive(Debug, Clone, Copy)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl<'a> EmptyState<'a> {
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="lead text-muted text-center" { (self.message) }
        }
    }
}
