/// Record Store Seam
///
/// The refresh rotation manager consumes the relational store only as a
/// key-value record store keyed by user id, holding the single refresh
/// token id currently considered valid for that principal. This module
/// defines that seam and two implementations: the Postgres-backed store
/// used in production and an in-memory double for tests and embedding.

use std::collections::HashMap;
use std::sync::Mutex;

use sqlx::PgPool;

use crate::error::StoreError;

/// Store interface consumed by [`crate::auth::RefreshManager`].
#[allow(async_fn_in_trait)]
pub trait TokenStore {
    /// Read the principal's current refresh token id.
    ///
    /// Returns `Ok(None)` both when the principal is unknown and when it
    /// has no live refresh token — the two cases are deliberately
    /// indistinguishable to the caller.
    async fn current_token_id(&self, user_id: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the principal's current refresh token id, invalidating
    /// every previously issued refresh token for that principal.
    ///
    /// Returns the number of rows affected; zero means the principal
    /// does not exist.
    async fn set_current_token_id(
        &self,
        user_id: &str,
        token_id: &str,
    ) -> Result<u64, StoreError>;
}

/// Postgres-backed store over the membership `users` table
/// (`id TEXT PRIMARY KEY, refresh_token_id TEXT`).
#[derive(Clone)]
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TokenStore for PgTokenStore {
    async fn current_token_id(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query_as::<_, (Option<String>,)>(
            r#"
            SELECT refresh_token_id
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|(token_id,)| token_id))
    }

    async fn set_current_token_id(
        &self,
        user_id: &str,
        token_id: &str,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_id = $1
            WHERE id = $2
            "#,
        )
        .bind(token_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// In-memory store keyed by user id. Backs the integration tests and is
/// usable by embedders that keep principal records elsewhere.
#[derive(Default)]
pub struct InMemoryTokenStore {
    records: Mutex<HashMap<String, Option<String>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a principal with no live refresh token.
    pub fn insert_user(&self, user_id: &str) {
        self.records
            .lock()
            .unwrap()
            .insert(user_id.to_string(), None);
    }
}

impl TokenStore for InMemoryTokenStore {
    async fn current_token_id(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.get(user_id).cloned().flatten())
    }

    async fn set_current_token_id(
        &self,
        user_id: &str,
        token_id: &str,
    ) -> Result<u64, StoreError> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(user_id) {
            Some(slot) => {
                *slot = Some(token_id.to_string());
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_user_has_no_token() {
        let store = InMemoryTokenStore::new();
        assert_eq!(store.current_token_id("ghost").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_registered_user_starts_without_token() {
        let store = InMemoryTokenStore::new();
        store.insert_user("u1");
        assert_eq!(store.current_token_id("u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_overwrites_previous_token() {
        let store = InMemoryTokenStore::new();
        store.insert_user("u1");

        assert_eq!(store.set_current_token_id("u1", "token-a").await.unwrap(), 1);
        assert_eq!(
            store.current_token_id("u1").await.unwrap(),
            Some("token-a".to_string())
        );

        assert_eq!(store.set_current_token_id("u1", "token-b").await.unwrap(), 1);
        assert_eq!(
            store.current_token_id("u1").await.unwrap(),
            Some("token-b".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_for_unknown_user_affects_no_rows() {
        let store = InMemoryTokenStore::new();
        assert_eq!(store.set_current_token_id("ghost", "t").await.unwrap(), 0);
    }
}
