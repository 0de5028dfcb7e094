use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::session::Session;

/// Signed-in sessions, shared by all workers.
///
/// The lock is only held for in-memory work; callers copy out what they need
/// before touching the database.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>, DomainError> {
        self.sessions
            .lock()
            .map_err(|e| DomainError::Internal(format!("session store poisoned: {}", e)))
    }

    pub fn insert(&self, session: Session) -> Result<Uuid, DomainError> {
        let id = session.id;
        self.lock()?.insert(id, session);
        Ok(id)
    }

    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, DomainError> {
        let mut sessions = self.lock()?;
        let session = sessions.get_mut(&id).ok_or(DomainError::SessionNotFound)?;
        Ok(f(session))
    }

    pub fn remove(&self, id: Uuid) -> Result<Session, DomainError> {
        self.lock()?.remove(&id).ok_or(DomainError::SessionNotFound)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().expect("session store lock").len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
