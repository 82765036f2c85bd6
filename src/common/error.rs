use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Contato não encontrado")]
    ContactNotFound,

    #[error("Grupo não encontrado")]
    GroupNotFound,

    // Telefone que não sobra nenhum dígito depois da normalização.
    #[error("Telefone inválido")]
    InvalidPhone,

    // O multipart veio sem o campo `file`, ou o corpo era ilegível.
    #[error("Arquivo de importação ausente")]
    MissingUploadFile,

    // Bytes que não parseiam como CSV nem como planilha. Falha a requisição
    // inteira, antes de qualquer escrita.
    #[error("Arquivo de importação ilegível: {0}")]
    UnreadableUpload(String),

    // Payload do modo pré-parseado vazio ou que não é um array.
    #[error("Lista de contatos vazia ou inválida")]
    EmptyImportBatch,

    #[error("Conflito de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados (exemplo com sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente.".to_string())
            }
            AppError::ContactNotFound => (StatusCode::NOT_FOUND, "Contato não encontrado.".to_string()),
            AppError::GroupNotFound => (StatusCode::NOT_FOUND, "Grupo não encontrado.".to_string()),
            AppError::InvalidPhone => {
                (StatusCode::BAD_REQUEST, "O telefone precisa conter ao menos um dígito.".to_string())
            }
            AppError::MissingUploadFile => {
                (StatusCode::BAD_REQUEST, "Envie o arquivo no campo 'file'.".to_string())
            }
            AppError::UnreadableUpload(detail) => {
                (StatusCode::BAD_REQUEST, format!("Não foi possível ler o arquivo: {detail}"))
            }
            AppError::EmptyImportBatch => {
                (StatusCode::BAD_REQUEST, "Envie um array 'contacts' com ao menos um contato.".to_string())
            }
            AppError::UniqueConstraintViolation(detail) => (StatusCode::CONFLICT, detail),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
