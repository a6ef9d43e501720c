mod embedded;
#[cfg(test)]
pub mod memory;

use embedded::migrations;

use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};

use crate::models::{Note, NoteChanges};

/// Storage operations the service layer relies on.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes, most recently created first.
    async fn list_all(&self) -> Result<Vec<Note>, tokio_postgres::Error>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Note>, tokio_postgres::Error>;

    async fn insert(&self, title: String, content: String) -> Result<Note, tokio_postgres::Error>;

    /// Returns `None` when no note has the given id.
    async fn update(
        &self,
        id: i64,
        changes: NoteChanges,
    ) -> Result<Option<Note>, tokio_postgres::Error>;

    /// Returns `false` when no note has the given id.
    async fn delete(&self, id: i64) -> Result<bool, tokio_postgres::Error>;
}

pub struct Repository {
    client: Client,
}

impl Repository {
    pub async fn new(database_dsn: &str) -> Result<Self, tokio_postgres::Error> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), refinery::Error> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteStore for Repository {
    async fn list_all(&self) -> Result<Vec<Note>, tokio_postgres::Error> {
        let rows = self
            .client
            .query(
                "SELECT id, title, content, created_at, updated_at FROM notes \
                 ORDER BY created_at DESC, id DESC",
                &[],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Note>, tokio_postgres::Error> {
        let row = self
            .client
            .query_opt(
                "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn insert(&self, title: String, content: String) -> Result<Note, tokio_postgres::Error> {
        let row = self
            .client
            .query_one(
                "INSERT INTO notes (title, content) VALUES ($1, $2) \
                 RETURNING id, title, content, created_at, updated_at",
                &[&title, &content],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn update(
        &self,
        id: i64,
        changes: NoteChanges,
    ) -> Result<Option<Note>, tokio_postgres::Error> {
        // updated_at only moves when a stored value actually differs
        let row = self
            .client
            .query_opt(
                "UPDATE notes SET \
                     title = COALESCE($2, title), \
                     content = COALESCE($3, content), \
                     updated_at = CASE \
                         WHEN COALESCE($2, title) IS DISTINCT FROM title \
                           OR COALESCE($3, content) IS DISTINCT FROM content \
                         THEN NOW() ELSE updated_at END \
                 WHERE id = $1 \
                 RETURNING id, title, content, created_at, updated_at",
                &[&id, &changes.title, &changes.content],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete(&self, id: i64) -> Result<bool, tokio_postgres::Error> {
        let rows = self
            .client
            .execute("DELETE FROM notes WHERE id = $1", &[&id])
            .await?;

        Ok(rows == 1)
    }
}
