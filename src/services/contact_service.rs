// src/services/contact_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ContactRepository, ContactStore},
    models::contact::Contact,
    services::import_service::normalize_phone,
};

#[derive(Clone)]
pub struct ContactService {
    repo: ContactRepository,
}

impl ContactService {
    pub fn new(repo: ContactRepository) -> Self {
        Self { repo }
    }

    /// O cadastro individual segue a mesma semântica da importação: o
    /// telefone é a chave global e um telefone já conhecido atualiza o nome
    /// e reatribui o dono em vez de duplicar o contato.
    pub async fn create_contact(
        &self,
        owner_id: Uuid,
        nome: &str,
        telefone_raw: &str,
    ) -> Result<Contact, AppError> {
        let telefone = normalize_phone(telefone_raw);
        if telefone.is_empty() {
            return Err(AppError::InvalidPhone);
        }

        match self.repo.find_by_phone(&telefone).await? {
            Some(existing) => self.repo.update(existing.id, owner_id, nome).await,
            None => self.repo.create(owner_id, nome, &telefone).await,
        }
    }

    pub async fn list_contacts(&self, owner_id: Uuid) -> Result<Vec<Contact>, AppError> {
        self.repo.list_by_owner(owner_id).await
    }

    pub async fn update_contact(
        &self,
        id: Uuid,
        owner_id: Uuid,
        nome: &str,
        telefone_raw: &str,
    ) -> Result<Contact, AppError> {
        let telefone = normalize_phone(telefone_raw);
        if telefone.is_empty() {
            return Err(AppError::InvalidPhone);
        }

        self.repo.update_owned(id, owner_id, nome, &telefone).await
    }

    pub async fn delete_contact(&self, id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
        let deleted = self.repo.delete_owned(id, owner_id).await?;
        if deleted == 0 {
            return Err(AppError::ContactNotFound);
        }
        Ok(())
    }
}
