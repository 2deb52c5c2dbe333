use crate::database::models::{Nickname, SettingKey};
use anyhow::Result;
use sqlx::SqlitePool;

// Nickname queries
pub async fn list_nicknames(pool: &SqlitePool) -> Result<Vec<String>> {
    let names: Vec<String> = sqlx::query_scalar("SELECT name FROM nicknames ORDER BY rowid")
        .fetch_all(pool)
        .await?;

    Ok(names)
}

pub async fn list_nickname_entries(pool: &SqlitePool) -> Result<Vec<Nickname>> {
    let entries = sqlx::query_as::<_, Nickname>(
        "SELECT author, target, name FROM nicknames ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn nickname_exists(pool: &SqlitePool, name: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM nicknames WHERE name = ?)")
        .bind(name)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

/// Insert a new nickname. The `UNIQUE` constraint on `name` rejects duplicates
/// that slipped past the caller's own check.
pub async fn add_nickname(pool: &SqlitePool, author: i64, target: i64, name: &str) -> Result<()> {
    tracing::debug!(author, target, name, "add_nickname");

    sqlx::query("INSERT INTO nicknames (author, target, name) VALUES (?, ?, ?)")
        .bind(author)
        .bind(target)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn remove_nickname(pool: &SqlitePool, name: &str) -> Result<u64> {
    tracing::debug!(name, "remove_nickname");

    let result = sqlx::query("DELETE FROM nicknames WHERE name = ?")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn truncate_nicknames(pool: &SqlitePool) -> Result<u64> {
    tracing::debug!("truncate_nicknames");

    let result = sqlx::query("DELETE FROM nicknames").execute(pool).await?;

    Ok(result.rows_affected())
}

// Setting queries
pub async fn get_setting(pool: &SqlitePool, key: SettingKey) -> Result<Option<i64>> {
    let value: Option<i64> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(value)
}

pub async fn set_setting(pool: &SqlitePool, key: SettingKey, value: i64) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key.as_str())
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Size of the database in bytes.
pub async fn database_size(pool: &SqlitePool) -> Result<i64> {
    let page_count: i64 = sqlx::query_scalar("PRAGMA page_count").fetch_one(pool).await?;
    let page_size: i64 = sqlx::query_scalar("PRAGMA page_size").fetch_one(pool).await?;

    Ok(page_count * page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;

    #[tokio::test]
    async fn nicknames_round_trip_through_the_table() {
        let pool = memory_pool().await;

        add_nickname(&pool, 1, 2, "Pickle").await.unwrap();
        add_nickname(&pool, 3, 2, "Noodle").await.unwrap();

        assert_eq!(list_nicknames(&pool).await.unwrap(), vec!["Pickle", "Noodle"]);
        assert!(nickname_exists(&pool, "Noodle").await.unwrap());
        assert!(!nickname_exists(&pool, "Steve").await.unwrap());

        let entries = list_nickname_entries(&pool).await.unwrap();
        assert_eq!(
            entries[1],
            Nickname {
                author: 3,
                target: 2,
                name: "Noodle".to_string()
            }
        );
    }

    #[tokio::test]
    async fn duplicate_nickname_is_rejected_by_storage() {
        let pool = memory_pool().await;

        add_nickname(&pool, 1, 2, "Pickle").await.unwrap();
        assert!(add_nickname(&pool, 5, 2, "Pickle").await.is_err());
        assert_eq!(list_nicknames(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remove_and_truncate_report_affected_rows() {
        let pool = memory_pool().await;
        for name in ["a", "b", "c"] {
            add_nickname(&pool, 1, 2, name).await.unwrap();
        }

        assert_eq!(remove_nickname(&pool, "b").await.unwrap(), 1);
        assert_eq!(remove_nickname(&pool, "b").await.unwrap(), 0);
        assert_eq!(truncate_nicknames(&pool).await.unwrap(), 2);
        assert!(list_nicknames(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn settings_upsert() {
        let pool = memory_pool().await;

        assert_eq!(get_setting(&pool, SettingKey::AnnounceRotation).await.unwrap(), None);
        set_setting(&pool, SettingKey::AnnounceRotation, 1).await.unwrap();
        set_setting(&pool, SettingKey::AnnounceRotation, 0).await.unwrap();
        assert_eq!(get_setting(&pool, SettingKey::AnnounceRotation).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn database_size_is_positive() {
        let pool = memory_pool().await;
        assert!(database_size(&pool).await.unwrap() > 0);
    }
}
