// src/db/group_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{contact::Contact, group::Group},
};

#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: Uuid, nome: &str) -> Result<Group, AppError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (owner_id, nome)
            VALUES ($1, $2)
            RETURNING id, owner_id, nome, created_at
            "#,
        )
        .bind(owner_id)
        .bind(nome)
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Group>, AppError> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, owner_id, nome, created_at
            FROM groups
            WHERE owner_id = $1
            ORDER BY nome ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    pub async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Group>, AppError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, owner_id, nome, created_at
            FROM groups
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    pub async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM groups
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Vincula um contato ao grupo. Vínculo repetido é ignorado.
    pub async fn add_contact(&self, group_id: Uuid, contact_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO group_contacts (group_id, contact_id)
            VALUES ($1, $2)
            ON CONFLICT (group_id, contact_id) DO NOTHING
            "#,
        )
        .bind(group_id)
        .bind(contact_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_contacts(&self, group_id: Uuid) -> Result<Vec<Contact>, AppError> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT c.id, c.owner_id, c.nome, c.telefone, c.created_at, c.updated_at
            FROM contacts c
            INNER JOIN group_contacts gc ON gc.contact_id = c.id
            WHERE gc.group_id = $1
            ORDER BY c.nome ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts)
    }
}
