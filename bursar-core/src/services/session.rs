//! Session service - login lifecycle
//!
//! A `Session` is an explicit value owned by the caller and passed into
//! every session-dependent operation, rather than a process-wide singleton.
//! Two callers holding their own `Session` values cannot clobber each
//! other's identity, and tests get isolation for free.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{StudentRecord, User};
use crate::ports::BillingStore;

/// Per-caller session state
///
/// Holds the logged-in user by id only; `current_user` re-resolves against
/// the store on every call so store updates are visible immediately.
/// `overlays` holds temporary (non-permanent) record edits, which are
/// session data and vanish with it.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<String>,
    overlays: HashMap<String, StudentRecord>,
}

impl Session {
    /// Create an empty (logged-out) session
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the logged-in user, if any
    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Temporary record edit for a user, if one exists in this session
    pub fn overlay(&self, user_id: &str) -> Option<&StudentRecord> {
        self.overlays.get(user_id)
    }

    /// Stash a temporary record edit
    pub fn set_overlay(&mut self, record: StudentRecord) {
        self.overlays.insert(record.user_id.clone(), record);
    }
}

/// Session lifecycle operations
///
/// State machine: LOGGED_OUT -> LOGGED_IN on successful login, LOGGED_IN ->
/// LOGGED_OUT on logout. A failed login leaves the prior state untouched;
/// logging in while already logged in silently replaces the session.
pub struct SessionService {
    store: Arc<dyn BillingStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    /// Log in with a user id
    ///
    /// Identity is the sole token; there is no password. Unknown id fails
    /// with `UserNotFound` and the session keeps its previous state,
    /// including any temporary edits.
    pub fn login(&self, session: &mut Session, user_id: &str) -> Result<()> {
        let user = self
            .store
            .find_user(user_id)?
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;

        // Temporary edits belong to the identity that made them
        if session.current.as_deref() != Some(user.id.as_str()) {
            session.overlays.clear();
        }
        session.current = Some(user.id);
        Ok(())
    }

    /// Log out, clearing the identity and all session data
    ///
    /// Idempotent; never fails.
    pub fn logout(&self, session: &mut Session) {
        session.current = None;
        session.overlays.clear();
    }

    /// The logged-in user, re-resolved from the store
    pub fn current_user(&self, session: &Session) -> Result<User> {
        current_user_of(self.store.as_ref(), session)
    }
}

/// Resolve the session's user against a store
///
/// Shared by every service that needs the requester identity; keeps the
/// "re-resolve, never cache" rule in one place.
pub(crate) fn current_user_of(store: &dyn BillingStore, session: &Session) -> Result<User> {
    let id = session.current_id().ok_or(Error::NoActiveSession)?;
    store
        .find_user(id)?
        .ok_or_else(|| Error::UserNotFound(id.to_string()))
}
