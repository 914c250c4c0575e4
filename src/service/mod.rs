use crate::{
    config::DbConfig,
    dto::{CreateNoteRequest, NoteFilter, NoteResponse, UpdateNoteRequest},
    repository::{Repository, RepositoryError},
};

/// Note operations. Every call opens its own store connection and releases
/// it before returning.
#[derive(Clone)]
pub struct NoteService {
    db: DbConfig,
}

impl NoteService {
    pub const fn new(db: DbConfig) -> Self {
        Self { db }
    }

    async fn repo(&self) -> Result<Repository, RepositoryError> {
        Repository::connect(&self.db).await
    }

    pub async fn check_connection(&self) -> Result<(), RepositoryError> {
        self.repo().await?.ping().await
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, RepositoryError> {
        let note = self
            .repo()
            .await?
            .create_note(
                &request.content,
                &request.status,
                request.created_at.as_deref(),
            )
            .await?;

        tracing::info!(id = note.id, "note created");
        Ok(note.into())
    }

    pub async fn get_all_notes(
        &self,
        filter: &NoteFilter,
    ) -> Result<Vec<NoteResponse>, RepositoryError> {
        self.repo()
            .await?
            .get_all_notes(filter.status())
            .await
            .map(|notes| notes.into_iter().map(NoteResponse::from).collect())
    }

    pub async fn get_one_note(&self, id: i32) -> Result<Option<NoteResponse>, RepositoryError> {
        self.repo()
            .await?
            .get_one_note(id)
            .await
            .map(|note| note.map(NoteResponse::from))
    }

    pub async fn update_note(
        &self,
        id: i32,
        request: UpdateNoteRequest,
    ) -> Result<Option<NoteResponse>, RepositoryError> {
        let note = self
            .repo()
            .await?
            .update_note(id, &request.content, &request.status)
            .await?;

        if note.is_some() {
            tracing::info!(id, "note updated");
        }
        Ok(note.map(NoteResponse::from))
    }

    pub async fn delete_note(&self, id: i32) -> Result<Option<i32>, RepositoryError> {
        let deleted = self.repo().await?.delete_note(id).await?;

        if deleted.is_some() {
            tracing::info!(id, "note deleted");
        }
        Ok(deleted)
    }
}
