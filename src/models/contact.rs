// src/models/contact.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Representa um destinatário endereçável. O `telefone` guardado aqui já está
// na forma canônica (só dígitos) e é único no sistema inteiro.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,

    // O dono atual. É reatribuído quando outra importação referencia o
    // mesmo telefone (ver ImportService).
    pub owner_id: Uuid,

    #[schema(example = "Maria da Silva")]
    pub nome: String,

    #[schema(example = "11912345678")]
    pub telefone: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Uma linha de importação já mapeada: nome + telefone cru (como veio do
// arquivo ou do cliente). Não é persistida; o motor de reconciliação a
// consome e descarta.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportedContact {
    #[schema(example = "Ana")]
    pub nome: String,

    #[schema(example = "(11) 91234-5678")]
    pub telefone: String,
}

// Detalhe de uma linha que falhou na persistência.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportFailure {
    pub telefone: String,
    pub error: String,
}

// Resumo devolvido por uma chamada de importação. `sample` ecoa as cinco
// primeiras linhas da entrada original, para a tela de confirmação.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportSummary {
    pub inserted: u64,
    pub updated: u64,
    pub failed: u64,
    pub failures: Vec<ImportFailure>,
    pub sample: Vec<ImportedContact>,
}

impl ImportSummary {
    pub fn empty() -> Self {
        Self {
            inserted: 0,
            updated: 0,
            failed: 0,
            failures: Vec::new(),
            sample: Vec::new(),
        }
    }
}
