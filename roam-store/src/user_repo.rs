use async_trait::async_trait;
use roam_core::repository::{UserCredentials, UserRepository};
use roam_core::{RepoResult, User};
use sqlx::SqlitePool;

use crate::error::db_err;
use crate::hydrate::UserRow;

const USER_COLUMNS: &str = "guid, first_name, last_name, email, phone, password_hash";

pub struct StoreUserRepository {
    pool: SqlitePool,
}

impl StoreUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for StoreUserRepository {
    async fn add(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO users (guid, first_name, last_name, email, phone, password_hash) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.guid)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_all(&self) -> RepoResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE guid = ?"))
            .bind(guid)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(User::from))
    }

    async fn find_credentials(&self, email: &str) -> RepoResult<Option<UserCredentials>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(row.map(|row| {
            let password_hash = row.password_hash.clone();
            UserCredentials {
                user: User::from(row),
                password_hash,
            }
        }))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let found: Option<(String,)> = sqlx::query_as("SELECT guid FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(found.is_some())
    }

    async fn update(&self, user: &User, password_hash: Option<&str>) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET first_name = ?, last_name = ?, email = ?, phone = ?, \
             password_hash = COALESCE(?, password_hash) WHERE guid = ?",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(password_hash)
        .bind(&user.guid)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, guid: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE guid = ?")
            .bind(guid)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DbClient;
    use roam_core::RepositoryError;

    fn user(guid: &str, email: &str) -> User {
        User {
            guid: guid.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_credentials_round_trip() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreUserRepository::new(db.pool.clone());

        repo.add(&user("u-1", "ada@example.com"), "hash-1").await.unwrap();

        let creds = repo.find_credentials("ada@example.com").await.unwrap().unwrap();
        assert_eq!(creds.user.guid, "u-1");
        assert_eq!(creds.password_hash, "hash-1");
        assert!(repo.email_exists("ada@example.com").await.unwrap());
        assert!(!repo.email_exists("bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreUserRepository::new(db.pool.clone());

        repo.add(&user("u-1", "ada@example.com"), "h").await.unwrap();
        let err = repo.add(&user("u-2", "ada@example.com"), "h").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_hash_unless_given() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreUserRepository::new(db.pool.clone());
        repo.add(&user("u-1", "ada@example.com"), "old").await.unwrap();

        let mut changed = user("u-1", "ada@example.org");
        changed.phone = Some("+351 900 000 000".to_string());
        assert!(repo.update(&changed, None).await.unwrap());

        let creds = repo.find_credentials("ada@example.org").await.unwrap().unwrap();
        assert_eq!(creds.password_hash, "old");
        assert_eq!(creds.user.phone.as_deref(), Some("+351 900 000 000"));

        assert!(repo.update(&changed, Some("new")).await.unwrap());
        let creds = repo.find_credentials("ada@example.org").await.unwrap().unwrap();
        assert_eq!(creds.password_hash, "new");

        assert!(!repo.update(&user("u-404", "x@example.com"), None).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreUserRepository::new(db.pool.clone());
        repo.add(&user("u-1", "ada@example.com"), "h").await.unwrap();

        assert!(repo.delete("u-1").await.unwrap());
        assert!(repo.get_by_guid("u-1").await.unwrap().is_none());
        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
