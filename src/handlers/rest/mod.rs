mod error;
mod extract;

pub use error::ApiError;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::{
    dto::{CreateNoteRequest, DeleteNoteResponse, NoteFilter, NoteResponse, UpdateNoteRequest},
    service::NoteService,
};

use extract::{ApiJson, ApiPath, ApiQuery};

#[derive(OpenApi)]
#[openapi(
    paths(create_note, get_all_notes, get_one_note, update_note, delete_note),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        DeleteNoteResponse
    )),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

/// Note routes plus the OpenAPI document (`/openapi.json`) and Swagger UI
/// (`/docs`).
pub fn router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/notes/", post(create_note).get(get_all_notes))
        .route("/notes", post(create_note).get(get_all_notes))
        .route(
            "/notes/{id}",
            get(get_one_note).put(update_note).delete(delete_note),
        )
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/notes/",
    request_body = CreateNoteRequest,
    responses(
        (status = 200, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Note already exists"),
        (status = 422, description = "Invalid request body"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    ApiJson(payload): ApiJson<CreateNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    payload.validate()?;
    let note = service.create_note(payload).await?;
    Ok(Json(note))
}

#[utoipa::path(
    get,
    path = "/notes/",
    params(NoteFilter),
    responses(
        (status = 200, description = "Notes matching the filter", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(
    State(service): State<Arc<NoteService>>,
    ApiQuery(filter): ApiQuery<NoteFilter>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let notes = service.get_all_notes(&filter).await?;
    Ok(Json(notes))
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = i32, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<NoteResponse>, ApiError> {
    service
        .get_one_note(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(
        ("id" = i32, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 404, description = "Note not found"),
        (status = 422, description = "Invalid request body"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<UpdateNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    service
        .update_note(id, payload)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = i32, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = DeleteNoteResponse),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<DeleteNoteResponse>, ApiError> {
    service
        .delete_note(id)
        .await?
        .map(|id| Json(DeleteNoteResponse::new(id)))
        .ok_or(ApiError::NotFound)
}
