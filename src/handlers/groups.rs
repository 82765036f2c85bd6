// src/handlers/groups.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{contact::Contact, group::Group},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório"))]
    #[schema(example = "Clientes VIP")]
    pub nome: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddGroupContactsPayload {
    #[validate(length(min = 1, message = "Informe ao menos um contato"))]
    pub contact_ids: Vec<Uuid>,
}

// POST /api/groups
#[utoipa::path(
    post,
    path = "/api/groups",
    tag = "Grupos",
    request_body = CreateGroupPayload,
    responses(
        (status = 201, description = "Grupo criado", body = Group),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_group(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateGroupPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let group = app_state
        .group_service
        .create_group(user.id, &payload.nome)
        .await?;

    Ok((StatusCode::CREATED, Json(group)))
}

// GET /api/groups
#[utoipa::path(
    get,
    path = "/api/groups",
    tag = "Grupos",
    responses(
        (status = 200, description = "Grupos do usuário autenticado", body = Vec<Group>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_groups(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let groups = app_state.group_service.list_groups(user.id).await?;

    Ok((StatusCode::OK, Json(groups)))
}

// DELETE /api/groups/{id}
#[utoipa::path(
    delete,
    path = "/api/groups/{id}",
    tag = "Grupos",
    params(("id" = Uuid, Path, description = "ID do grupo")),
    responses(
        (status = 204, description = "Grupo removido"),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_group(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.group_service.delete_group(id, user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/groups/{id}/contacts
#[utoipa::path(
    post,
    path = "/api/groups/{id}/contacts",
    tag = "Grupos",
    request_body = AddGroupContactsPayload,
    params(("id" = Uuid, Path, description = "ID do grupo")),
    responses(
        (status = 200, description = "Contatos vinculados"),
        (status = 404, description = "Grupo ou contato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_group_contacts(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddGroupContactsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let added = app_state
        .group_service
        .add_contacts(id, user.id, &payload.contact_ids)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "added": added }))))
}

// GET /api/groups/{id}/contacts
#[utoipa::path(
    get,
    path = "/api/groups/{id}/contacts",
    tag = "Grupos",
    params(("id" = Uuid, Path, description = "ID do grupo")),
    responses(
        (status = 200, description = "Contatos do grupo", body = Vec<Contact>),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_group_contacts(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let contacts = app_state
        .group_service
        .list_group_contacts(id, user.id)
        .await?;

    Ok((StatusCode::OK, Json(contacts)))
}
