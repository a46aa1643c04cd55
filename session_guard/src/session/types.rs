use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credentials::Principal;
use crate::session::errors::SessionError;
use crate::storage::CacheData;

/// Principal information exposed to consumers of a resolved session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<Principal> for User {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            email: principal.email,
            name: principal.name,
        }
    }
}

/// Opaque server-side session identifier. Never interpreted by clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// CSRF token bound to exactly one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Session record as persisted in the cache store.
///
/// `principal_id` is `None` for the anonymous session established at CSRF
/// token issuance, before any credentials have been verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub(crate) principal_id: Option<String>,
    pub(crate) csrf_token: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) last_seen_at: DateTime<Utc>,
    pub(crate) expires_at: DateTime<Utc>,
    pub(crate) ttl: u64,
}

impl StoredSession {
    /// Id of the authenticated principal, `None` while the session is
    /// anonymous.
    pub fn principal_id(&self) -> Option<&str> {
        self.principal_id.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.principal_id.is_none()
    }

    pub(crate) fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

impl From<StoredSession> for CacheData {
    fn from(data: StoredSession) -> Self {
        Self {
            value: serde_json::to_string(&data).expect("Failed to serialize StoredSession"),
        }
    }
}

impl TryFrom<CacheData> for StoredSession {
    type Error = SessionError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| SessionError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_session(expires_offset: i64) -> StoredSession {
        let now = Utc::now();
        StoredSession {
            principal_id: Some("user-1".to_string()),
            csrf_token: "token".to_string(),
            created_at: now,
            last_seen_at: now,
            expires_at: now + Duration::seconds(expires_offset),
            ttl: 7200,
        }
    }

    #[test]
    fn test_stored_session_expiry() {
        let now = Utc::now();
        assert!(!sample_session(60).is_expired(now));
        assert!(sample_session(-60).is_expired(now));
    }

    #[test]
    fn test_stored_session_anonymous() {
        let mut session = sample_session(60);
        assert!(!session.is_anonymous());
        session.principal_id = None;
        assert!(session.is_anonymous());
    }

    #[test]
    fn test_stored_session_cache_round_trip() {
        let session = sample_session(60);
        let data: CacheData = session.clone().into();
        let restored: StoredSession = data.try_into().expect("Failed to restore session");
        assert_eq!(restored.principal_id, session.principal_id);
        assert_eq!(restored.csrf_token, session.csrf_token);
        assert_eq!(restored.expires_at, session.expires_at);
    }

    #[test]
    fn test_corrupt_cache_data_is_a_storage_error() {
        let data = CacheData {
            value: "not json".to_string(),
        };
        let result: Result<StoredSession, _> = data.try_into();
        assert!(matches!(result, Err(SessionError::Storage(_))));
    }

    #[test]
    fn test_user_from_principal() {
        let principal = Principal {
            id: "user-1".to_string(),
            email: "dev@example.com".to_string(),
            name: "Dev".to_string(),
        };
        let user = User::from(principal);
        assert_eq!(user.id, "user-1");
        assert_eq!(user.email, "dev@example.com");
        assert_eq!(user.name, "Dev");
    }
}
