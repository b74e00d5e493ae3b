//! Form components for maud templates.
//!
//! Inputs carry their current value and an optional validation message so a
//! page can render straight from its reducer state.

use maud::{html, Markup, Render};

use super::alert::ValidationMessage;

/// A form container element.
#[derive(Debug)]
pub struct Form<'a> {
    /// Form action URL
    pub action: &'a str,
    /// HTTP method ("get" or "post")
    pub method: &'a str,
    /// Form content (inputs, buttons, etc.)
    pub content: Markup,
    /// Optional CSS class
    pub class: Option<&'a str>,
    /// Optional form ID
    pub id: Option<&'a str>,
}

impl<'a> Form<'a> {
    /// Create a new form with the given action and method.
    #[must_use]
    pub fn new(action: &'a str, method: &'a str, content: Markup) -> Self {
        Self {
            action,
            method,
            content,
            class: None,
            id: None,
        }
    }

    /// Create a POST form.
    #[must_use]
    pub fn post(action: &'a str, content: Markup) -> Self {
        Self::new(action, "post", content)
    }

    /// Set the CSS class.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    /// Set the form ID.
    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }
}

impl Render for Form<'_> {
    fn render(&self) -> Markup {
        html! {
            form
                action=(self.action)
                method=(self.method)
                class=[self.class]
                id=[self.id]
            {
                (self.content)
            }
        }
    }
}

/// An input element.
#[derive(Debug, Clone)]
pub struct Input<'a> {
    /// Input name attribute
    pub name: &'a str,
    /// Input type ("text", "password", ...)
    pub r#type: &'a str,
    /// Current value
    pub value: Option<&'a str>,
    /// Placeholder text
    pub placeholder: Option<&'a str>,
    /// Optional ID attribute
    pub id: Option<&'a str>,
    /// Optional CSS class
    pub class: Option<&'a str>,
    /// Autocomplete attribute
    pub autocomplete: Option<&'a str>,
    /// Whether the input grabs focus on load
    pub autofocus: bool,
}

impl<'a> Input<'a> {
    /// Create a new input with the given name and type.
    #[must_use]
    pub fn new(name: &'a str, r#type: &'a str) -> Self {
        Self {
            name,
            r#type,
            value: None,
            placeholder: None,
            id: None,
            class: Some("form-control"),
            autocomplete: None,
            autofocus: false,
        }
    }

    /// Create a text input.
    #[must_use]
    pub fn text(name: &'a str) -> Self {
        Self::new(name, "text")
    }

    /// Create a password input.
    #[must_use]
    pub fn password(name: &'a str) -> Self {
        Self::new(name, "password")
    }

    /// Set the value.
    #[must_use]
    pub fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Set the ID.
    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the CSS class.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    /// Turn browser autocomplete off.
    #[must_use]
    pub fn no_autocomplete(mut self) -> Self {
        self.autocomplete = Some("off");
        self
    }

    #[must_use]
    pub fn autofocus(mut self) -> Self {
        self.autofocus = true;
        self
    }
}

impl Render for Input<'_> {
    fn render(&self) -> Markup {
        html! {
            input
                type=(self.r#type)
                name=(self.name)
                value=[self.value]
                placeholder=[self.placeholder]
                id=[self.id]
                class=[self.class]
                autocomplete=[self.autocomplete]
                autofocus[self.autofocus];
        }
    }
}

/// A textarea element.
#[derive(Debug)]
pub struct TextArea<'a> {
    /// Textarea name attribute
    pub name: &'a str,
    /// Current value/content
    pub value: Option<&'a str>,
    /// Optional ID attribute
    pub id: Option<&'a str>,
    /// Optional CSS class
    pub class: Option<&'a str>,
}

impl<'a> TextArea<'a> {
    /// Create a new textarea with the given name.
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            value: None,
            id: None,
            class: Some("body-content tall-textarea form-control"),
        }
    }

    /// Set the value/content.
    #[must_use]
    pub fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the ID.
    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }
}

impl Render for TextArea<'_> {
    fn render(&self) -> Markup {
        html! {
            textarea
                name=(self.name)
                id=[self.id]
                class=[self.class]
            {
                @if let Some(value) = self.value {
                    (value)
                }
            }
        }
    }
}

/// A small muted label above a control.
#[derive(Debug, Clone, Copy)]
pub struct Label<'a> {
    pub text: &'a str,
    pub for_id: &'a str,
}

impl<'a> Label<'a> {
    #[must_use]
    pub const fn new(text: &'a str, for_id: &'a str) -> Self {
        Self { text, for_id }
    }
}

impl Render for Label<'_> {
    fn render(&self) -> Markup {
        html! {
            label for=(self.for_id) class="text-muted mb-1" {
                small { (self.text) }
            }
        }
    }
}

/// A label, a control, and the control's validation message.
#[derive(Debug)]
pub struct FormGroup<'a> {
    pub label: Label<'a>,
    pub control: Markup,
    pub error: Option<&'a str>,
}

impl<'a> FormGroup<'a> {
    #[must_use]
    pub fn new(label: Label<'a>, control: impl Render) -> Self {
        Self {
            label,
            control: control.render(),
            error: None,
        }
    }

    /// Show `error` under the control when present.
    #[must_use]
    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

impl Render for FormGroup<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="form-group" {
                (self.label)
                (self.control)
                (ValidationMessage::new(self.error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_renders_value_and_flags() {
        let html = Input::text("title")
            .id("post-title")
            .value("Hello")
            .no_autocomplete()
            .autofocus()
            .render()
            .into_string();
        assert!(html.contains(r#"type="text""#));
        assert!(html.contains(r#"name="title""#));
        assert!(html.contains(r#"value="Hello""#));
        assert!(html.contains(r#"id="post-title""#));
        assert!(html.contains(r#"autocomplete="off""#));
        assert!(html.contains("autofocus"));
    }

    #[test]
    fn test_textarea_escapes_content() {
        let html = TextArea::new("body")
            .value("<script>")
            .render()
            .into_string();
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_form_group_with_error() {
        let group = FormGroup::new(Label::new("Title", "post-title"), Input::text("title"))
            .error(Some("You must provide a title!"));
        let html = group.render().into_string();
        assert!(html.contains(r#"<label for="post-title" class="text-muted mb-1">"#));
        assert!(html.contains("You must provide a title!"));
    }

    #[test]
    fn test_form_post() {
        let html = Form::post("/login", html! { "x" })
            .id("login")
            .render()
            .into_string();
        assert!(html.contains(r#"action="/login""#));
        assert!(html.contains(r#"method="post""#));
        assert!(html.contains(r#"id="login""#));
    }
}
