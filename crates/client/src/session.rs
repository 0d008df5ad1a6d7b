//! Signed-in session state.
//!
//! [`SessionStore`] keeps who is signed in (token, user and, for vendors,
//! their restaurant) in the same [`KeyValueStore`] as the cart. Verifying
//! credentials is the API's concern; the store only records a user that has
//! already been identified.
//!
//! The route guard reads the session through the [`AuthContext`] trait.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, info};

use bocado_core::Role;
use bocado_core::models::{Restaurant, User};

use crate::storage::{KeyValueStore, StorageError, keys, load_json, save_json};

/// Errors that can occur while reading or updating the session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing persisted session state failed.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),

    /// The operation needs a signed-in user.
    #[error("no active session")]
    NotSignedIn,
}

/// What the route guard needs to know about the current user.
pub trait AuthContext {
    /// Returns `true` if a session token is present.
    fn is_authenticated(&self) -> bool;

    /// Role of the signed-in user, if any.
    fn role(&self) -> Option<Role>;
}

/// An active session.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    user: User,
    restaurant: Option<Restaurant>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .field("restaurant", &self.restaurant)
            .finish()
    }
}

impl Session {
    /// The session token.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// The vendor's restaurant, if one has been loaded.
    #[must_use]
    pub const fn restaurant(&self) -> Option<&Restaurant> {
        self.restaurant.as_ref()
    }
}

impl AuthContext for Session {
    fn is_authenticated(&self) -> bool {
        !self.token.expose_secret().is_empty()
    }

    fn role(&self) -> Option<Role> {
        Some(self.user.role)
    }
}

/// Persisted session for one store.
pub struct SessionStore<S> {
    store: S,
    session: Option<Session>,
}

impl<S> std::fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Create a session store over `store`. No state is loaded until
    /// [`restore`](Self::restore) is called.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            session: None,
        }
    }

    /// Load the persisted session.
    ///
    /// A session is active only if both the token and the user are stored;
    /// the vendor restaurant is loaded when present. Returns whether a
    /// session is active.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value cannot be read or decoded.
    pub fn restore(&mut self) -> Result<bool, SessionError> {
        let token = self.store.get(keys::SESSION_TOKEN)?;
        let user = load_json::<User>(&self.store, keys::SESSION_USER)?;

        let (Some(token), Some(user)) = (token, user) else {
            debug!("No active session");
            self.session = None;
            return Ok(false);
        };

        let restaurant = load_json::<Restaurant>(&self.store, keys::SESSION_RESTAURANT)?;
        debug!(user_id = %user.id, role = %user.role, "Session restored");
        self.session = Some(Session {
            token: SecretString::from(token),
            user,
            restaurant,
        });
        Ok(true)
    }

    /// Record `user` as signed in, issuing a fresh token.
    ///
    /// Any previously stored vendor restaurant is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted.
    pub fn sign_in(&mut self, user: User) -> Result<&Session, SessionError> {
        let token = format!("token-{}", Utc::now().timestamp_millis());

        self.store.set(keys::SESSION_TOKEN, &token)?;
        save_json(&mut self.store, keys::SESSION_USER, &user)?;
        self.store.remove(keys::SESSION_RESTAURANT)?;

        info!(user_id = %user.id, role = %user.role, "Signed in");
        Ok(self.session.insert(Session {
            token: SecretString::from(token),
            user,
            restaurant: None,
        }))
    }

    /// Record (or clear, with `None`) the signed-in vendor's restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotSignedIn`] without a session, or an error
    /// if the change cannot be persisted.
    pub fn set_restaurant(&mut self, restaurant: Option<Restaurant>) -> Result<(), SessionError> {
        let Some(session) = self.session.as_mut() else {
            return Err(SessionError::NotSignedIn);
        };

        match &restaurant {
            Some(r) => save_json(&mut self.store, keys::SESSION_RESTAURANT, r)?,
            None => self.store.remove(keys::SESSION_RESTAURANT)?,
        }
        session.restaurant = restaurant;
        Ok(())
    }

    /// Clear the session from memory and storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored keys cannot be removed.
    pub fn sign_out(&mut self) -> Result<(), SessionError> {
        self.session = None;
        self.store.remove(keys::SESSION_TOKEN)?;
        self.store.remove(keys::SESSION_USER)?;
        self.store.remove(keys::SESSION_RESTAURANT)?;
        info!("Signed out");
        Ok(())
    }
}

impl<S> SessionStore<S> {
    /// The active session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(Session::user)
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S> AuthContext for SessionStore<S> {
    fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(AuthContext::is_authenticated)
    }

    fn role(&self) -> Option<Role> {
        self.session.as_ref().and_then(AuthContext::role)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bocado_core::{Email, RestaurantId, UserId};

    use super::*;
    use crate::storage::MemoryStore;

    fn user(role: Role) -> User {
        User {
            id: UserId::new(3),
            name: "Ana".to_string(),
            email: Email::parse("ana@example.com").unwrap(),
            role,
            phone: None,
            address: None,
        }
    }

    fn restaurant() -> Restaurant {
        serde_json::from_str(r#"{"id": 8, "nombre": "Donde Ana", "idUsuario": 3}"#).unwrap()
    }

    #[test]
    fn test_restore_without_session() {
        let mut sessions = SessionStore::new(MemoryStore::new());
        assert!(!sessions.restore().unwrap());
        assert!(!sessions.is_authenticated());
        assert_eq!(sessions.role(), None);
    }

    #[test]
    fn test_sign_in_persists_and_restores() {
        let mut sessions = SessionStore::new(MemoryStore::new());
        let token = sessions
            .sign_in(user(Role::Vendor))
            .unwrap()
            .token()
            .expose_secret()
            .to_owned();
        assert!(token.starts_with("token-"));
        sessions.set_restaurant(Some(restaurant())).unwrap();

        let mut restored = SessionStore::new(sessions.store().clone());
        assert!(restored.restore().unwrap());
        assert_eq!(restored.role(), Some(Role::Vendor));
        let session = restored.session().unwrap();
        assert_eq!(session.token().expose_secret(), token);
        assert_eq!(session.restaurant().unwrap().id, RestaurantId::new(8));
    }

    #[test]
    fn test_token_without_user_is_not_a_session() {
        let mut store = MemoryStore::new();
        store.set(keys::SESSION_TOKEN, "token-1").unwrap();

        let mut sessions = SessionStore::new(store);
        assert!(!sessions.restore().unwrap());
        assert!(!sessions.is_authenticated());
    }

    #[test]
    fn test_sign_out_clears_storage() {
        let mut sessions = SessionStore::new(MemoryStore::new());
        sessions.sign_in(user(Role::Customer)).unwrap();
        sessions.set_restaurant(Some(restaurant())).unwrap();

        sessions.sign_out().unwrap();
        assert!(sessions.session().is_none());
        assert!(sessions.store().is_empty());
    }

    #[test]
    fn test_set_restaurant_requires_session() {
        let mut sessions = SessionStore::new(MemoryStore::new());
        assert!(matches!(
            sessions.set_restaurant(None),
            Err(SessionError::NotSignedIn)
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut sessions = SessionStore::new(MemoryStore::new());
        let session = sessions.sign_in(user(Role::Courier)).unwrap();
        let token = session.token().expose_secret().to_owned();

        let debug_output = format!("{session:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(&token));
    }
}
