use crate::error::Result;
use crate::storage::Storage;
use crate::types::{Credential, Session};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub scope: String,
    pub username: String,
    pub credential: Credential,
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn into_session(self) -> Session {
        Session {
            credential: self.credential,
            username: self.username,
            authenticated: true,
            created_at: self.created_at,
        }
    }
}

pub struct SessionRecordStore<'a> {
    storage: &'a Storage,
}

impl<'a> SessionRecordStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn save(&self, scope: &str, session: &Session) -> Result<()> {
        let conn = self.storage.get_connection().await;

        conn.execute(
            "INSERT OR REPLACE INTO sessions (scope, username, credential, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                scope,
                session.username,
                session.credential.as_str(),
                session.created_at.timestamp(),
            ],
        )?;

        Ok(())
    }

    pub async fn load(&self, scope: &str) -> Result<Option<SessionRecord>> {
        let conn = self.storage.get_connection().await;

        let record = conn
            .query_row(
                "SELECT username, credential, created_at FROM sessions WHERE scope = ?1",
                params![scope],
                |row| {
                    Ok(SessionRecord {
                        scope: scope.to_string(),
                        username: row.get(0)?,
                        credential: Credential::new(row.get::<_, String>(1)?),
                        created_at: DateTime::from_timestamp(row.get(2)?, 0)
                            .unwrap_or_else(Utc::now),
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    /// Returns whether a record existed for the scope.
    pub async fn delete(&self, scope: &str) -> Result<bool> {
        let conn = self.storage.get_connection().await;
        let removed = conn.execute("DELETE FROM sessions WHERE scope = ?1", params![scope])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("spinboard.db");

        {
            let storage = Storage::new(&db_path).await.unwrap();
            let store = SessionRecordStore::new(&storage);
            store
                .save("tab-1", &Session::new(Credential::new("T1"), "alice"))
                .await
                .unwrap();
        }

        let storage = Storage::new(&db_path).await.unwrap();
        let store = SessionRecordStore::new(&storage);
        let record = store.load("tab-1").await.unwrap().unwrap();
        assert_eq!(record.username, "alice");
        assert_eq!(record.credential, Credential::new("T1"));
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let storage = Storage::in_memory().await.unwrap();
        let store = SessionRecordStore::new(&storage);
        store
            .save("tab-1", &Session::new(Credential::new("T1"), "alice"))
            .await
            .unwrap();

        assert!(store.load("tab-2").await.unwrap().is_none());
        assert!(store.delete("tab-1").await.unwrap());
        assert!(!store.delete("tab-1").await.unwrap());
        assert!(store.load("tab-1").await.unwrap().is_none());
    }
}
