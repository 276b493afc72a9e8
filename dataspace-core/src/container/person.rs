use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    ApiError, DataProductApi, PersonDetails, Settings, UserSession, ViewError,
    api::{DEFAULT_SOURCE, login_url, logout_url},
    component::{data_product_link, login_prompt, titled_box},
    lifecycle::Lifecycle,
    model::PERSON_DEFINITION,
};

use super::FetchOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonState {
    LoadingUser,
    Anonymous,
    /// Logged in; profile request in flight.
    CheckingPerson { session: UserSession },
    Ready { session: UserSession, details: PersonDetails },
    UserFailed(String),
    PersonFailed { session: UserSession, message: String },
}

/// Session check followed by an automatic profile fetch for logged-in users.
#[derive(Debug)]
pub struct PersonView {
    state: PersonState,
    lifecycle: Lifecycle,
}

impl Default for PersonView {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonView {
    pub fn new() -> Self {
        Self::with_lifecycle(Lifecycle::new())
    }

    pub fn with_lifecycle(lifecycle: Lifecycle) -> Self {
        Self { state: PersonState::LoadingUser, lifecycle }
    }

    pub fn state(&self) -> &PersonState {
        &self.state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }

    /// Applies the "who am I" response. Returns `true` when the profile must
    /// be fetched next.
    pub fn on_session(&mut self, result: Result<UserSession, ApiError>) -> bool {
        if self.lifecycle.is_torn_down() || self.state != PersonState::LoadingUser {
            debug!("dropping stale session response");
            return false;
        }

        match result {
            Ok(session) if session.logged_in => {
                info!(email = session.email.as_deref().unwrap_or_default(), "session resolved");
                self.state = PersonState::CheckingPerson { session };
                true
            }
            Ok(_) => {
                info!("no active session");
                self.state = PersonState::Anonymous;
                false
            }
            Err(err) => {
                warn!(error = %err, "session check failed");
                self.state = PersonState::UserFailed(err.to_string());
                false
            }
        }
    }

    /// Applies the profile response.
    pub fn on_person(&mut self, result: Result<Value, ApiError>) {
        if self.lifecycle.is_torn_down() {
            debug!("dropping profile response after teardown");
            return;
        }
        let PersonState::CheckingPerson { session } = &self.state else {
            debug!("dropping stale profile response");
            return;
        };
        let session = session.clone();

        let details = result
            .and_then(|body| serde_json::from_value::<PersonDetails>(body).map_err(ApiError::from));
        self.state = match details {
            Ok(details) => PersonState::Ready { session, details },
            Err(err) => {
                warn!(error = %err, "profile fetch failed");
                PersonState::PersonFailed { session, message: err.to_string() }
            }
        };
    }

    /// Mount: checks the session and, only for a logged-in user, fetches the
    /// profile. Does nothing once the session has been resolved.
    pub async fn load(&mut self, api: &dyn DataProductApi) -> Result<FetchOutcome, ViewError> {
        if self.lifecycle.is_torn_down() {
            return Err(ViewError::Unmounted);
        }
        if self.state != PersonState::LoadingUser {
            return Ok(FetchOutcome::Completed);
        }

        let Some(session) = self.lifecycle.run(api.get_user()).await else {
            debug!("session check cancelled by teardown");
            return Ok(FetchOutcome::Cancelled);
        };
        if !self.on_session(session) {
            return Ok(FetchOutcome::Completed);
        }

        let params = Value::Object(Default::default());
        let Some(details) = self.lifecycle.run(api.fetch_data_product(PERSON_DEFINITION, &params)).await
        else {
            debug!("profile fetch cancelled by teardown");
            return Ok(FetchOutcome::Cancelled);
        };
        self.on_person(details);

        Ok(FetchOutcome::Completed)
    }

    pub fn render(&self, settings: &Settings) -> String {
        let session = match &self.state {
            PersonState::LoadingUser => return titled_box("Authentication", "Loading...\n"),
            PersonState::Anonymous => {
                return titled_box("Authentication", &login_prompt(&login_url(settings)));
            }
            PersonState::UserFailed(message) => {
                return titled_box("Authentication", &format!("Error: {message}\n"));
            }
            PersonState::CheckingPerson { session }
            | PersonState::Ready { session, .. }
            | PersonState::PersonFailed { session, .. } => session,
        };

        let mut body = format!(
            "Logged in as {}\nLogout: {}\n\n",
            session.email.as_deref().unwrap_or_default(),
            logout_url(settings)
        );

        match &self.state {
            PersonState::Ready { details, .. } => {
                body.push_str(&format!("Name: {}\nAddress: {}\n", details.name, details.address));
            }
            PersonState::PersonFailed { message, .. } => {
                body.push_str(&format!("Error: {message}\n"));
            }
            _ => body.push_str("Fetching user information...\n"),
        }

        body.push_str("\nUser profile data is available only for authenticated users\n\n");
        body.push_str(&format!(
            "Profile data is based on an email and fetched automatically from {}\n",
            data_product_link(settings, PERSON_DEFINITION, DEFAULT_SOURCE)
        ));

        titled_box("Authentication", &body)
    }
}
