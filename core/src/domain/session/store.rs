use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::domain::{common::entities::app_errors::CoreError, session::entities::KitchenSession};

pub type SessionHandle = Arc<Mutex<KitchenSession>>;

/// In-memory registry of live kitchen sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    pub async fn insert(&self, session: KitchenSession) -> SessionHandle {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, Arc::clone(&handle));
        handle
    }

    pub async fn get(&self, session_id: Uuid) -> Result<SessionHandle, CoreError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(CoreError::NotFound)
    }

    pub async fn remove(&self, session_id: Uuid) -> Option<SessionHandle> {
        self.sessions.write().await.remove(&session_id)
    }

    /// Drop every session that [`is_expired`](KitchenSession::is_expired)
    /// at `cutoff`. Sessions locked by a running operation are kept.
    pub async fn remove_expired(&self, cutoff: DateTime<Utc>) -> Vec<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let mut expired = Vec::new();

        sessions.retain(|_, handle| {
            let is_expired = handle
                .try_lock()
                .map(|session| session.is_expired(cutoff))
                .unwrap_or(false);
            if is_expired {
                expired.push(Arc::clone(handle));
            }
            !is_expired
        });

        expired
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
