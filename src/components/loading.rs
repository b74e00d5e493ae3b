use maud::{html, Markup, Render};

/// Animated three-dot loading indicator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadingDots;

impl Render for LoadingDots {
    fn render(&self) -> Markup {
        html! {
            div class="dots-loading" aria-label="Loading" {
                div {}
            }
        }
    }
}
