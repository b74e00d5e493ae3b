//! Form field state shared by every page with inputs.

/// One validated input.
///
/// `check_count` is an edge trigger: each increment requests exactly one more
/// remote check, even when the value has not changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormField {
    pub value: String,
    pub has_error: bool,
    pub message: String,
    pub is_unique: bool,
    pub check_count: u64,
}

impl FormField {
    /// Replace the value and clear any previous error.
    ///
    /// A different value also drops the uniqueness answer, which belonged to
    /// the old value.
    pub fn set_value(&mut self, value: String) {
        self.has_error = false;
        if self.value != value {
            self.is_unique = false;
            self.value = value;
        }
    }

    /// Mark the field invalid with `message`.
    pub fn fail(&mut self, message: &str) {
        self.has_error = true;
        self.message = message.to_string();
    }

    /// Message to render, if the field is currently invalid.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.has_error.then_some(self.message.as_str())
    }

    /// Fail with `message` when `value` is blank.
    ///
    /// Checks the value the caller saw rather than the stored one, matching
    /// blur and submit handlers that pass the input's current text.
    pub fn require(&mut self, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.fail(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_clears_error() {
        let mut field = FormField::default();
        field.fail("bad");
        assert_eq!(field.error(), Some("bad"));

        field.set_value("good".to_string());
        assert_eq!(field.error(), None);
        // The last message is kept for fade-out rendering
        assert_eq!(field.message, "bad");
    }

    #[test]
    fn test_new_value_drops_uniqueness() {
        let mut field = FormField {
            value: "alice".to_string(),
            is_unique: true,
            ..FormField::default()
        };
        field.set_value("alice".to_string());
        assert!(field.is_unique);

        field.set_value("alicetaken".to_string());
        assert!(!field.is_unique);
    }

    #[test]
    fn test_require() {
        let mut field = FormField::default();
        field.require("   ", "You must provide a title!");
        assert_eq!(field.error(), Some("You must provide a title!"));

        let mut field = FormField::default();
        field.require("Hello", "You must provide a title!");
        assert!(!field.has_error);
    }
}
