// src/db/contact_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::contact::Contact};

// O armazenamento de contatos visto pelo motor de reconciliação: só estas
// três operações, mais a invariante de unicidade do telefone. A
// implementação real é o Postgres logo abaixo; os testes usam um dublê em
// memória.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Busca global pelo telefone canônico, independente do dono.
    async fn find_by_phone(&self, telefone: &str) -> Result<Option<Contact>, AppError>;

    async fn create(
        &self,
        owner_id: Uuid,
        nome: &str,
        telefone: &str,
    ) -> Result<Contact, AppError>;

    /// Atualiza o nome do contato existente e reatribui o dono.
    async fn update(&self, id: Uuid, owner_id: Uuid, nome: &str) -> Result<Contact, AppError>;
}

#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Contact>, AppError> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, owner_id, nome, telefone, created_at, updated_at
            FROM contacts
            WHERE owner_id = $1
            ORDER BY nome ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts)
    }

    pub async fn find_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Contact>, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, owner_id, nome, telefone, created_at, updated_at
            FROM contacts
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    /// Edição direta pelo dono (formulário de edição). O telefone já chega
    /// normalizado pelo serviço.
    pub async fn update_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
        nome: &str,
        telefone: &str,
    ) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET nome = $3, telefone = $4, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, nome, telefone, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(nome)
        .bind(telefone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            // Tratamento de erro de chave duplicada
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!(
                        "O telefone '{}' já está cadastrado.",
                        telefone
                    ));
                }
            }
            e.into()
        })?;

        contact.ok_or(AppError::ContactNotFound)
    }

    pub async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM contacts
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ContactStore for ContactRepository {
    async fn find_by_phone(&self, telefone: &str) -> Result<Option<Contact>, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, owner_id, nome, telefone, created_at, updated_at
            FROM contacts
            WHERE telefone = $1
            "#,
        )
        .bind(telefone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn create(
        &self,
        owner_id: Uuid,
        nome: &str,
        telefone: &str,
    ) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (owner_id, nome, telefone)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, nome, telefone, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(nome)
        .bind(telefone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!(
                        "O telefone '{}' já está cadastrado.",
                        telefone
                    ));
                }
            }
            e.into()
        })?;

        Ok(contact)
    }

    async fn update(&self, id: Uuid, owner_id: Uuid, nome: &str) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET nome = $2, owner_id = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, nome, telefone, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        contact.ok_or(AppError::ContactNotFound)
    }
}
