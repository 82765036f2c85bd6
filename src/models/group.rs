// src/models/group.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Um grupo de contatos, usado para selecionar destinatários de uma campanha.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub owner_id: Uuid,

    #[schema(example = "Clientes VIP")]
    pub nome: String,

    pub created_at: DateTime<Utc>,
}
