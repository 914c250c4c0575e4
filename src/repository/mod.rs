use tokio_postgres::{NoTls, error::SqlState};

use crate::{config::DbConfig, models::Note};

const NOTE_COLUMNS: &str = "id, created_at, content, status";

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Note already exists")]
    Conflict,

    #[error("Database error: {0}")]
    Database(tokio_postgres::Error),
}

impl From<tokio_postgres::Error> for RepositoryError {
    fn from(e: tokio_postgres::Error) -> Self {
        Self::Database(e)
    }
}

/// A single open connection to the notes store.
///
/// The connection is closed when the repository is dropped.
pub struct Repository {
    client: tokio_postgres::Client,
}

impl Repository {
    pub async fn connect(config: &DbConfig) -> Result<Self, RepositoryError> {
        let (client, con) = config.pg_config().connect(NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.client.execute("SELECT 1", &[]).await?;
        Ok(())
    }

    pub async fn create_note(
        &self,
        content: &str,
        status: &str,
        created_at: Option<&str>,
    ) -> Result<Note, RepositoryError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO notes (created_at, content, status) \
                     VALUES (COALESCE($1, TO_CHAR(CURRENT_DATE, 'YYYY-MM-DD')), $2, $3) \
                     RETURNING {NOTE_COLUMNS}"
                ),
                &[&created_at, &content, &status],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    tracing::debug!("unique constraint violated: {e}");
                    RepositoryError::Conflict
                } else {
                    RepositoryError::Database(e)
                }
            })?;

        Ok(Note::try_from(&row)?)
    }

    pub async fn get_all_notes(&self, status: Option<&str>) -> Result<Vec<Note>, RepositoryError> {
        let rows = match status {
            Some(status) => {
                self.client
                    .query(
                        &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE status = $1 ORDER BY id"),
                        &[&status],
                    )
                    .await?
            }
            None => {
                self.client
                    .query(&format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY id"), &[])
                    .await?
            }
        };

        Ok(rows
            .iter()
            .map(Note::try_from)
            .collect::<Result<_, _>>()?)
    }

    pub async fn get_one_note(&self, id: i32) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"),
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(Note::try_from).transpose()?)
    }

    pub async fn update_note(
        &self,
        id: i32,
        content: &str,
        status: &str,
    ) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE notes SET content = $1, status = $2 WHERE id = $3 \
                     RETURNING {NOTE_COLUMNS}"
                ),
                &[&content, &status, &id],
            )
            .await?;

        Ok(row.as_ref().map(Note::try_from).transpose()?)
    }

    pub async fn delete_note(&self, id: i32) -> Result<Option<i32>, RepositoryError> {
        let row = self
            .client
            .query_opt("DELETE FROM notes WHERE id = $1 RETURNING id", &[&id])
            .await?;

        Ok(row.map(|row| row.try_get("id")).transpose()?)
    }

    #[cfg(test)]
    pub(crate) const fn client_for_tests(&self) -> &tokio_postgres::Client {
        &self.client
    }

    /// Creates the `notes` table from `schema.sql` if it is missing.
    #[cfg(test)]
    pub(crate) async fn create_table_for_tests(config: &DbConfig) {
        let repo = Self::connect(config).await.expect("database unreachable");
        // Concurrent tests may race on CREATE TABLE; a lost race leaves the
        // table in place.
        let _ = repo
            .client
            .batch_execute(include_str!("../../schema.sql"))
            .await;
    }
}
