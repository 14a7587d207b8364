use std::time::Duration;

use validator::Validate;

use crate::api::AdminApi;
use crate::config::LOGIN_REDIRECT_DELAY;
use crate::error::{AdminError, AdminResult};
use crate::models::Credentials;
use crate::mutation::{MutationExecutor, MutationMessages};
use crate::notify::{Notification, Notifier};
use crate::session::{Session, SessionHandle};
use crate::shell::Route;
use crate::AppContext;

const LOGIN_MESSAGES: MutationMessages = MutationMessages {
    success: "Login successful",
    failure: "Login failed",
};

#[derive(Debug, Clone, Validate)]
pub struct LoginForm {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Enter a valid email")
    )]
    pub email: String,
    #[validate(length(min = 6, message = "Password should be of minimum 6 characters length"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// First message per field, fields in name order.
    pub fn check(&self) -> AdminResult<()> {
        self.validate().map_err(|e| {
            let mut fields: Vec<_> = e.field_errors().into_iter().collect();
            fields.sort_by_key(|(field, _)| *field);
            let messages: Vec<String> = fields
                .into_iter()
                .filter_map(|(field, errors)| {
                    errors.first().map(|err| {
                        err.message
                            .clone()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field))
                    })
                })
                .collect();
            AdminError::Validation(messages.join(", "))
        })
    }
}

/// Where to go next, and how long to wait before going.
#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub to: Route,
    pub after: Duration,
}

pub struct LoginView {
    api: AdminApi,
    session: SessionHandle,
    notifier: Notifier,
    submit: MutationExecutor,
}

impl LoginView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: ctx.api.clone(),
            session: ctx.session.clone(),
            notifier: ctx.notifier.clone(),
            submit: MutationExecutor::new(ctx.cache.clone(), ctx.notifier.clone(), LOGIN_MESSAGES),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submit.is_pending()
    }

    /// Invalid forms are rejected before any request is made.
    pub async fn submit(&self, form: LoginForm) -> AdminResult<Redirect> {
        form.check()?;

        let api = self.api.clone();
        let credentials = Credentials {
            email: form.email,
            password: form.password,
        };
        let grant = self
            .submit
            .run(&[], move || async move { api.login(&credentials).await })
            .await?;

        self.session.set(Session::from(grant))?;
        self.notifier
            .publish(Notification::success(LOGIN_MESSAGES.success).with_ttl(LOGIN_REDIRECT_DELAY));
        Ok(Redirect {
            to: Route::Dashboard,
            after: LOGIN_REDIRECT_DELAY,
        })
    }
}
