//! Login, registration and logout flows

use std::time::Duration;

use super::validation::{validate_login, validate_registration, LoginForm, RegistrationForm};
use super::{Destination, Page, PageController, SubmitControl, ValidationError};
use crate::client::{AuthResponse, ClientError, ClientResult, RegisterRequest, User};
use crate::storage::LocalStorage;

pub const LOGIN_LABEL: &str = "Sign In";
pub const LOGIN_BUSY_LABEL: &str = "Signing in...";
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful! Redirecting...";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

pub const REGISTER_LABEL: &str = "Create Account";
pub const REGISTER_BUSY_LABEL: &str = "Creating account...";
pub const REGISTER_SUCCESS_MESSAGE: &str = "Account created successfully! Redirecting...";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

/// How a form submission ended
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Rejected before any request was sent
    Invalid(ValidationError),
    /// The request was sent and failed; `message` is what the banner shows
    Failed { message: String, transport: bool },
    /// Signed in; the user is stored and the dashboard redirect is scheduled
    Success(User),
}

impl FormOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FormOutcome::Success(_))
    }
}

/// Labels and messages of one auth form
struct AuthForm {
    label: &'static str,
    busy_label: &'static str,
    success_message: &'static str,
    failed_message: &'static str,
}

const LOGIN: AuthForm = AuthForm {
    label: LOGIN_LABEL,
    busy_label: LOGIN_BUSY_LABEL,
    success_message: LOGIN_SUCCESS_MESSAGE,
    failed_message: LOGIN_FAILED_MESSAGE,
};

const REGISTER: AuthForm = AuthForm {
    label: REGISTER_LABEL,
    busy_label: REGISTER_BUSY_LABEL,
    success_message: REGISTER_SUCCESS_MESSAGE,
    failed_message: REGISTER_FAILED_MESSAGE,
};

impl<P: Page, S: LocalStorage> PageController<P, S> {
    /// Validate and submit the login form.
    pub async fn submit_login(&mut self, form: &LoginForm) -> FormOutcome {
        if let Err(invalid) = validate_login(form) {
            return self.reject(invalid);
        }

        self.page
            .set_submit(SubmitControl::Busy(LOGIN.busy_label.to_string()));
        let result = self
            .client
            .auth()
            .login(form.email.trim(), &form.password, form.remember_me)
            .await;
        let outcome = self.complete_auth(result, &LOGIN);
        self.page
            .set_submit(SubmitControl::Ready(LOGIN.label.to_string()));
        outcome
    }

    /// Validate and submit the registration form.
    pub async fn submit_registration(&mut self, form: &RegistrationForm) -> FormOutcome {
        if let Err(invalid) = validate_registration(form) {
            return self.reject(invalid);
        }

        let request = RegisterRequest {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };

        self.page
            .set_submit(SubmitControl::Busy(REGISTER.busy_label.to_string()));
        let result = self.client.auth().register(&request).await;
        let outcome = self.complete_auth(result, &REGISTER);
        self.page
            .set_submit(SubmitControl::Ready(REGISTER.label.to_string()));
        outcome
    }

    /// End the session and return to the entry page.
    ///
    /// The server call is best effort: local state is cleared and the
    /// redirect happens whatever it returns.
    pub async fn logout(&mut self) {
        if let Err(e) = self.client.auth().logout().await {
            tracing::warn!(error = %e, "logout request failed");
        }
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to clear local storage");
        }
        self.page.navigate(Destination::Entry, Duration::ZERO);
    }

    /// Ask the backend whether the session is still valid and refresh the
    /// cached user when it is.
    pub async fn refresh_session(&mut self) -> ClientResult<Option<User>> {
        let check = self.client.auth().check().await?;
        let user = match check.user {
            Some(user) if check.authenticated => user,
            _ => return Ok(None),
        };
        if let Err(e) = self.storage.save_user(&user) {
            tracing::warn!(error = %e, "failed to store refreshed user");
        }
        Ok(Some(user))
    }

    fn reject(&mut self, invalid: ValidationError) -> FormOutcome {
        tracing::debug!(reason = %invalid, "form rejected");
        self.show_error(invalid.to_string());
        FormOutcome::Invalid(invalid)
    }

    fn complete_auth(&mut self, result: ClientResult<AuthResponse>, form: &AuthForm) -> FormOutcome {
        let failure = match result {
            Ok(AuthResponse {
                success: true,
                user: Some(user),
                ..
            }) => return self.signed_in(user, form),
            Ok(response) => FormOutcome::Failed {
                message: response
                    .error
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| form.failed_message.to_string()),
                transport: false,
            },
            Err(e) if e.is_transport() => FormOutcome::Failed {
                message: e.user_message(),
                transport: true,
            },
            Err(e @ ClientError::Api { .. }) => FormOutcome::Failed {
                message: e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| form.failed_message.to_string()),
                transport: false,
            },
            Err(e) => {
                tracing::warn!(error = %e, "unexpected auth response");
                FormOutcome::Failed {
                    message: form.failed_message.to_string(),
                    transport: false,
                }
            }
        };

        if let FormOutcome::Failed { message, .. } = &failure {
            self.show_error(message.clone());
        }
        failure
    }

    fn signed_in(&mut self, user: User, form: &AuthForm) -> FormOutcome {
        if let Err(e) = self.storage.save_user(&user) {
            tracing::warn!(error = %e, "failed to store signed-in user");
        }
        tracing::info!(user_id = user.id, "signed in");
        self.show_success(form.success_message);
        self.page
            .navigate(Destination::Dashboard, self.timings.redirect_delay);
        FormOutcome::Success(user)
    }
}
