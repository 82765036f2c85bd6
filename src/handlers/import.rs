// src/handlers/import.rs
//
// Os dois modos de importação em massa: upload de arquivo (CSV/planilha) e
// lista já parseada pelo cliente. A autenticação acontece na camada de
// middleware, antes de qualquer leitura de corpo.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::contact::{ImportSummary, ImportedContact},
};

// Só para o contrato documentado: o handler lê o corpo como Value para
// poder responder 400 quando 'contacts' não é um array.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportRecordsPayload {
    pub contacts: Vec<ImportedContact>,
}

// POST /api/contacts/import
#[utoipa::path(
    post,
    path = "/api/contacts/import",
    tag = "Importação",
    request_body(content = Vec<u8>, content_type = "multipart/form-data",
        description = "Campo 'file' com um CSV ou uma planilha (primeira aba)"),
    responses(
        (status = 200, description = "Resumo da importação", body = ImportSummary),
        (status = 400, description = "Arquivo ausente ou ilegível"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_file(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::MissingUploadFile)?
    {
        if field.name() == Some("file") {
            // A extensão decide o parser; sem nome assumimos CSV.
            let filename = field.file_name().unwrap_or("contatos.csv").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| AppError::MissingUploadFile)?;
            upload = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) = upload.ok_or(AppError::MissingUploadFile)?;

    let summary = app_state
        .import_service
        .import_upload(&filename, &data, user.id)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

// POST /api/contacts/import-json
#[utoipa::path(
    post,
    path = "/api/contacts/import-json",
    tag = "Importação",
    request_body = ImportRecordsPayload,
    responses(
        (status = 200, description = "Resumo da importação", body = ImportSummary),
        (status = 400, description = "Lista vazia ou que não é um array"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_records(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    // O cliente já parseou o arquivo; aqui só validamos a forma do array
    // antes de tocar no banco.
    let contacts = payload
        .get("contacts")
        .and_then(Value::as_array)
        .ok_or(AppError::EmptyImportBatch)?;

    if contacts.is_empty() {
        return Err(AppError::EmptyImportBatch);
    }

    let rows: Vec<ImportedContact> = contacts
        .iter()
        .map(|item| ImportedContact {
            nome: str_field(item, "nome"),
            telefone: str_field(item, "telefone"),
        })
        .collect();

    let summary = app_state.import_service.reconcile(&rows, user.id).await;

    Ok((StatusCode::OK, Json(summary)))
}

fn str_field(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string()
}
