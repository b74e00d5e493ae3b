//! Button component for the web UI.
//!
//! Renders as a `<button>`, or as an `<a>` when an href is provided.

use maud::{html, Markup, Render};

/// Button style variants matching CSS classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Danger,
    Success,
    Secondary,
}

impl ButtonVariant {
    /// Returns the CSS class(es) for this variant.
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Danger => "btn btn-danger",
            Self::Success => "btn btn-success",
            Self::Secondary => "btn btn-secondary",
        }
    }
}

/// A configurable button component.
///
/// # Example
///
/// ```ignore
/// use crate::components::button::Button;
///
/// let save = Button::primary("Save Updates").disabled(state.is_saving);
/// let follow = Button::primary("Follow").small().name("follow");
/// ```
#[derive(Debug, Clone)]
pub struct Button<'a> {
    /// Button label text
    pub label: &'a str,
    /// Button style variant
    pub variant: ButtonVariant,
    /// Optional href (renders as `<a>` if present)
    pub href: Option<&'a str>,
    /// Disabled state
    pub disabled: bool,
    /// Button type attribute (for `<button>` elements)
    pub r#type: &'a str,
    /// Additional CSS classes
    pub class: Option<&'a str>,
    /// Form field name, so the submit handler can tell buttons apart
    pub name: Option<&'a str>,
    pub small: bool,
}

impl<'a> Button<'a> {
    /// Creates a new button with the given label and variant.
    #[must_use]
    pub fn new(label: &'a str, variant: ButtonVariant) -> Self {
        Self {
            label,
            variant,
            href: None,
            disabled: false,
            r#type: "submit",
            class: None,
            name: None,
            small: false,
        }
    }

    /// Creates a primary button.
    #[must_use]
    pub fn primary(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Primary)
    }

    /// Creates a danger button.
    #[must_use]
    pub fn danger(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Danger)
    }

    /// Creates a success button.
    #[must_use]
    pub fn success(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Success)
    }

    /// Creates a secondary button.
    #[must_use]
    pub fn secondary(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Secondary)
    }

    /// Render as a link to `href`.
    #[must_use]
    pub fn href(mut self, href: &'a str) -> Self {
        self.href = Some(href);
        self
    }

    /// Set the disabled state.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the `type` attribute.
    #[must_use]
    pub fn r#type(mut self, r#type: &'a str) -> Self {
        self.r#type = r#type;
        self
    }

    /// Add extra CSS classes.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    #[must_use]
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    #[must_use]
    pub fn small(mut self) -> Self {
        self.small = true;
        self
    }

    fn full_class(&self) -> String {
        let mut class = self.variant.class().to_string();
        if self.small {
            class.push_str(" btn-sm");
        }
        if let Some(extra) = self.class {
            class.push(' ');
            class.push_str(extra);
        }
        class
    }
}

impl Render for Button<'_> {
    fn render(&self) -> Markup {
        let class = self.full_class();
        html! {
            @if let Some(href) = self.href {
                a href=(href) class=(class) { (self.label) }
            } @else {
                button
                    type=(self.r#type)
                    class=(class)
                    name=[self.name]
                    disabled[self.disabled]
                { (self.label) }
            }
        }
    }
}
