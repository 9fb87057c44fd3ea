// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the SessionStore trait.
//!
//! Sessions are whole-state JSON rows with a unix-seconds `expires_at`
//! column. An expired row is indistinguishable from an absent one; expired
//! rows are swept opportunistically on writes.

use std::time::Duration;

use async_trait::async_trait;
use rusqlite::params;
use tokio::sync::OnceCell;
use tracing::debug;

use sawari_config::model::StoreConfig;
use sawari_core::{
    AdapterType, ConversationState, HealthStatus, PluginAdapter, SawariError, SessionStore,
};

use crate::database::{map_tr_err, Database};

/// SQLite-backed session store.
///
/// Wraps a [`Database`] handle. The database is lazily initialized on the
/// first call to [`SqliteSessionStore::initialize`].
pub struct SqliteSessionStore {
    config: StoreConfig,
    db: OnceCell<Database>,
}

impl SqliteSessionStore {
    /// Create a new store with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: SqliteSessionStore::initialize
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Opens the database at the configured path and runs migrations.
    pub async fn initialize(&self) -> Result<(), SawariError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| SawariError::Store {
            source: "store already initialized".into(),
        })?;
        debug!(
            path = self.config.database_path.as_str(),
            "SQLite session store initialized"
        );
        Ok(())
    }

    /// The TTL applied on writes and refresh-on-read.
    fn ttl_default(&self) -> Duration {
        Duration::from_secs(self.config.session_ttl_secs)
    }

    fn db(&self) -> Result<&Database, SawariError> {
        self.db.get().ok_or_else(|| SawariError::Store {
            source: "store not initialized -- call initialize() first".into(),
        })
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

#[async_trait]
impl PluginAdapter for SqliteSessionStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SessionStore
    }

    async fn health_check(&self) -> Result<HealthStatus, SawariError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SawariError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, SawariError> {
        let db = self.db()?;
        let user_id = user_id.to_string();
        let refresh_to = now_unix() + self.ttl_default().as_secs() as i64;

        let json: Option<String> = db
            .connection()
            .call(move |conn| {
                let now = chrono::Utc::now().timestamp();
                let row: Option<(String, i64)> = conn
                    .query_row(
                        "SELECT state, expires_at FROM sessions WHERE user_id = ?1",
                        params![user_id],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )
                    .map(Some)
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        other => Err(other),
                    })?;

                match row {
                    Some((_, expires_at)) if expires_at <= now => {
                        // Expired entry: treat as absent and drop the row.
                        conn.execute(
                            "DELETE FROM sessions WHERE user_id = ?1",
                            params![user_id],
                        )?;
                        Ok(None)
                    }
                    Some((state, _)) => {
                        // Refresh-on-read keeps active conversations alive.
                        conn.execute(
                            "UPDATE sessions SET expires_at = ?2 WHERE user_id = ?1",
                            params![user_id, refresh_to],
                        )?;
                        Ok(Some(state))
                    }
                    None => Ok(None),
                }
            })
            .await
            .map_err(map_tr_err)?;

        match json {
            Some(json) => {
                let state = serde_json::from_str(&json).map_err(|e| SawariError::Store {
                    source: Box::new(e),
                })?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        user_id: &str,
        state: &ConversationState,
        ttl: Duration,
    ) -> Result<(), SawariError> {
        let db = self.db()?;
        let user_id = user_id.to_string();
        let json = serde_json::to_string(state).map_err(|e| SawariError::Store {
            source: Box::new(e),
        })?;
        let expires_at = now_unix() + ttl.as_secs() as i64;

        db.connection()
            .call(move |conn| {
                // Sweep expired rows while we hold the writer anyway.
                conn.execute(
                    "DELETE FROM sessions WHERE expires_at <= ?1",
                    params![chrono::Utc::now().timestamp()],
                )?;
                conn.execute(
                    "INSERT INTO sessions (user_id, state, expires_at)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(user_id) DO UPDATE
                     SET state = excluded.state, expires_at = excluded.expires_at",
                    params![user_id, json, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn delete(&self, user_id: &str) -> Result<bool, SawariError> {
        let db = self.db()?;
        let user_id = user_id.to_string();
        let deleted = db
            .connection()
            .call(move |conn| {
                let n = conn.execute(
                    "DELETE FROM sessions WHERE user_id = ?1",
                    params![user_id],
                )?;
                Ok(n > 0)
            })
            .await
            .map_err(map_tr_err)?;
        if deleted {
            debug!("session deleted");
        }
        Ok(deleted)
    }

    async fn extend_ttl(&self, user_id: &str, ttl: Duration) -> Result<bool, SawariError> {
        let db = self.db()?;
        let user_id = user_id.to_string();
        let expires_at = now_unix() + ttl.as_secs() as i64;
        db.connection()
            .call(move |conn| {
                let n = conn.execute(
                    "UPDATE sessions SET expires_at = ?2
                     WHERE user_id = ?1 AND expires_at > ?3",
                    params![user_id, expires_at, chrono::Utc::now().timestamp()],
                )?;
                Ok(n > 0)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn active_user_ids(&self) -> Result<Vec<String>, SawariError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT user_id FROM sessions WHERE expires_at > ?1 ORDER BY user_id",
                )?;
                let ids = stmt
                    .query_map(params![chrono::Utc::now().timestamp()], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(ids)
            })
            .await
            .map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sawari_core::{CustomerIdentity, Turn};
    use tempfile::tempdir;

    fn make_config(path: &std::path::Path) -> StoreConfig {
        StoreConfig {
            database_path: path.to_str().unwrap().to_string(),
            session_ttl_secs: 3600,
        }
    }

    async fn open_store(dir: &tempfile::TempDir) -> SqliteSessionStore {
        let store = SqliteSessionStore::new(make_config(&dir.path().join("test.db")));
        store.initialize().await.unwrap();
        store
    }

    fn sample_state() -> ConversationState {
        let mut state = ConversationState::new(
            CustomerIdentity {
                id: "c-1".into(),
                name: "Asha".into(),
                phone: "+911234567890".into(),
                profile_image: String::new(),
            },
            "app",
        );
        state.push_turn(Turn::User {
            text: "Jaipur to Delhi".into(),
        });
        state
    }

    #[tokio::test]
    async fn put_then_get_round_trips_the_full_state() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let state = sample_state();

        store
            .put("user-1", &state, Duration::from_secs(3600))
            .await
            .unwrap();
        let loaded = store.get("user-1").await.unwrap().expect("state present");
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn get_of_unknown_user_is_none() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        assert!(store.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_entry_reads_as_absent() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        store
            .put("user-1", &sample_state(), Duration::ZERO)
            .await
            .unwrap();
        assert!(store.get("user-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_replaces_whole_state() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let mut state = sample_state();

        store
            .put("user-1", &state, Duration::from_secs(3600))
            .await
            .unwrap();
        state.push_turn(Turn::Assistant {
            text: "where to?".into(),
        });
        store
            .put("user-1", &state, Duration::from_secs(3600))
            .await
            .unwrap();

        let loaded = store.get("user-1").await.unwrap().unwrap();
        assert_eq!(loaded.turn_log.len(), 2);
    }

    #[tokio::test]
    async fn delete_reports_whether_an_entry_existed() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        store
            .put("user-1", &sample_state(), Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(store.delete("user-1").await.unwrap());
        assert!(!store.delete("user-1").await.unwrap());
        assert!(store.get("user-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn extend_ttl_only_touches_live_entries() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        store
            .put("live", &sample_state(), Duration::from_secs(3600))
            .await
            .unwrap();
        store
            .put("dead", &sample_state(), Duration::ZERO)
            .await
            .unwrap();

        assert!(store.extend_ttl("live", Duration::from_secs(7200)).await.unwrap());
        assert!(!store.extend_ttl("dead", Duration::from_secs(7200)).await.unwrap());
        assert!(!store.extend_ttl("missing", Duration::from_secs(7200)).await.unwrap());
    }

    #[tokio::test]
    async fn active_user_ids_lists_only_live_sessions() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        store
            .put("alive-1", &sample_state(), Duration::from_secs(3600))
            .await
            .unwrap();
        store
            .put("alive-2", &sample_state(), Duration::from_secs(3600))
            .await
            .unwrap();
        store
            .put("expired", &sample_state(), Duration::ZERO)
            .await
            .unwrap();

        let ids = store.active_user_ids().await.unwrap();
        assert_eq!(ids, vec!["alive-1".to_string(), "alive-2".to_string()]);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        assert!(store.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_before_initialize_fail_cleanly() {
        let dir = tempdir().unwrap();
        let store = SqliteSessionStore::new(make_config(&dir.path().join("late.db")));
        assert!(store.get("user-1").await.is_err());
    }
}
