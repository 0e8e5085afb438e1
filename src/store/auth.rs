// src/store/auth.rs
use crate::domain::models::User;

/// State transition requests for the auth slice.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthIntent {
    LoginStart,
    LoginSuccess { token: String, user: User },
    LoginFailure(String),
    RegisterStart,
    /// Registration does not log the user in; it only stops the spinner.
    RegisterSuccess(User),
    RegisterFailure(String),
    ProfileUpdateStart,
    ProfileUpdateSuccess(User),
    ProfileUpdateFailure(String),
    /// Clears the in-memory session. The durable token slot is cleared by
    /// the logout effect, not here.
    Logout,
    ClearError,
}

/// Auth slice: current session plus request metadata. Unlike the entity
/// slices there is no collection, pagination or statistics here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    user: Option<User>,
    token: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl AuthState {
    // Selectors
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Restore a session persisted by a previous run.
    pub(crate) fn restore_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub(crate) fn reduce(&mut self, intent: AuthIntent) {
        match intent {
            AuthIntent::LoginStart
            | AuthIntent::RegisterStart
            | AuthIntent::ProfileUpdateStart => {
                self.loading = true;
                self.error = None;
            }
            AuthIntent::LoginSuccess { token, user } => {
                self.loading = false;
                self.token = Some(token);
                self.user = Some(user);
            }
            AuthIntent::RegisterSuccess(_) => {
                self.loading = false;
            }
            AuthIntent::ProfileUpdateSuccess(user) => {
                self.loading = false;
                self.user = Some(user);
            }
            AuthIntent::LoginFailure(message)
            | AuthIntent::RegisterFailure(message)
            | AuthIntent::ProfileUpdateFailure(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            AuthIntent::Logout => {
                self.user = None;
                self.token = None;
                self.error = None;
            }
            AuthIntent::ClearError => {
                self.error = None;
            }
        }
    }
}
