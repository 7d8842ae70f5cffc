use log::{error, info};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::api::{Authenticator, Session};
use crate::components::Render;
use crate::router::{Navigator, Route};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Schema-level checks only; credentials are verified by the server.
    pub fn field_errors(&self) -> Vec<FieldError> {
        let errors = match self.validate() {
            Ok(()) => return Vec::new(),
            Err(errors) => errors,
        };
        let mut out: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field)),
                })
            })
            .collect();
        // field_errors() is a HashMap; keep the form's field order.
        out.sort_by_key(|e| if e.field == "email" { 0 } else { 1 });
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Invalid(Vec<FieldError>),
    LoggedIn(Session),
    Failed(String),
}

pub struct LoginPage {
    auth: Arc<dyn Authenticator>,
    navigator: Navigator,
    is_loading: bool,
    errors: Vec<FieldError>,
}

impl LoginPage {
    pub fn new(auth: Arc<dyn Authenticator>, navigator: Navigator) -> Self {
        Self {
            auth,
            navigator,
            is_loading: false,
            errors: Vec::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// On failure the error is logged and the user stays on the form.
    pub async fn submit(&mut self, form: &LoginForm) -> LoginOutcome {
        self.errors = form.field_errors();
        if !self.errors.is_empty() {
            return LoginOutcome::Invalid(self.errors.clone());
        }

        self.is_loading = true;
        let result = self.auth.login(&form.email, &form.password).await;
        self.is_loading = false;

        match result {
            Ok(session) => {
                info!("Signed in as {}", form.email);
                self.navigator.navigate(Route::Dashboard).await;
                LoginOutcome::LoggedIn(session)
            }
            Err(e) => {
                error!("Login error: {}", e);
                LoginOutcome::Failed(e.user_message())
            }
        }
    }
}

impl Render for LoginPage {
    fn render(&self) -> String {
        let mut out = vec![
            "BitLend - Bitcoin P2P Lending Platform".to_string(),
            "Welcome Back".to_string(),
            "Sign in to your account to access your dashboard".to_string(),
        ];
        out.extend(self.errors.iter().map(|e| format!("  ! {}", e.message)));
        out.push(if self.is_loading {
            "[Signing in...]".to_string()
        } else {
            "[Sign In]".to_string()
        });
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockAuthenticator;
    use crate::error::Error;

    #[test]
    fn test_form_validation_messages() {
        let errors = LoginForm::new("not-an-email", "123").field_errors();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Please enter a valid email address",
                "Password must be at least 6 characters"
            ]
        );
        assert!(LoginForm::new("satoshi@example.com", "hunter22").field_errors().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_server() {
        let mut auth = MockAuthenticator::new();
        auth.expect_login().never();
        let mut page = LoginPage::new(Arc::new(auth), Navigator::new(Route::Login));

        let outcome = page.submit(&LoginForm::new("", "")).await;
        assert!(matches!(outcome, LoginOutcome::Invalid(ref e) if e.len() == 2));
        assert!(page.render().contains("! Please enter a valid email address"));
    }

    #[tokio::test]
    async fn test_success_navigates_to_dashboard() {
        let mut auth = MockAuthenticator::new();
        auth.expect_login()
            .times(1)
            .returning(|_, _| Ok(Session { cookie: Some("connect.sid=1".to_string()) }));
        let navigator = Navigator::new(Route::Login);
        let mut page = LoginPage::new(Arc::new(auth), navigator.clone());

        let outcome = page.submit(&LoginForm::new("satoshi@example.com", "hunter22")).await;
        assert!(matches!(outcome, LoginOutcome::LoggedIn(_)));
        assert_eq!(navigator.location().await, Route::Dashboard);
        assert!(!page.is_loading());
    }

    #[tokio::test]
    async fn test_failure_stays_on_login() {
        let mut auth = MockAuthenticator::new();
        auth.expect_login()
            .times(1)
            .returning(|_, _| Err(Error::ApiAuthFailed("401: Invalid credentials".to_string())));
        let navigator = Navigator::new(Route::Login);
        let mut page = LoginPage::new(Arc::new(auth), navigator.clone());

        let outcome = page.submit(&LoginForm::new("satoshi@example.com", "wrong-pass")).await;
        assert_eq!(outcome, LoginOutcome::Failed("401: Invalid credentials".to_string()));
        assert_eq!(navigator.location().await, Route::Login);
        assert!(!page.is_loading());
        assert!(page.render().ends_with("[Sign In]"));
    }
}
