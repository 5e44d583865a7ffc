use secrecy::SecretString;

/// The elements the submit handler drives: a submit control, a password input
/// and the container that gets marked done once the flow completes.
pub trait Page {
    fn submit_disabled(&self) -> bool;

    fn set_submit_disabled(&mut self, disabled: bool);

    /// Current value of the password input.
    fn password(&self) -> SecretString;

    fn clear_password(&mut self);

    /// Flag the surrounding container as finished.
    fn mark_done(&mut self);
}

/// In-memory form, used by the terminal front end.
#[derive(Debug, Default)]
pub struct Form {
    password: SecretString,
    submit_disabled: bool,
    done: bool,
}

impl Form {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the password input's value.
    pub fn type_password(&mut self, password: impl Into<String>) {
        self.password = SecretString::from(password.into());
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }
}

impl Page for Form {
    fn submit_disabled(&self) -> bool {
        self.submit_disabled
    }

    fn set_submit_disabled(&mut self, disabled: bool) {
        self.submit_disabled = disabled;
    }

    fn password(&self) -> SecretString {
        self.password.clone()
    }

    fn clear_password(&mut self) {
        self.password = SecretString::default();
    }

    fn mark_done(&mut self) {
        self.done = true;
    }
}
