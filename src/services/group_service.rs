// src/services/group_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ContactRepository, GroupRepository},
    models::{contact::Contact, group::Group},
};

#[derive(Clone)]
pub struct GroupService {
    groups: GroupRepository,
    contacts: ContactRepository,
}

impl GroupService {
    pub fn new(groups: GroupRepository, contacts: ContactRepository) -> Self {
        Self { groups, contacts }
    }

    pub async fn create_group(&self, owner_id: Uuid, nome: &str) -> Result<Group, AppError> {
        self.groups.create(owner_id, nome).await
    }

    pub async fn list_groups(&self, owner_id: Uuid) -> Result<Vec<Group>, AppError> {
        self.groups.list_by_owner(owner_id).await
    }

    pub async fn delete_group(&self, id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
        let deleted = self.groups.delete_owned(id, owner_id).await?;
        if deleted == 0 {
            return Err(AppError::GroupNotFound);
        }
        Ok(())
    }

    /// Vincula contatos do próprio dono ao grupo. Contato de outro usuário
    /// não pode entrar no grupo.
    pub async fn add_contacts(
        &self,
        group_id: Uuid,
        owner_id: Uuid,
        contact_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        self.groups
            .find_owned(group_id, owner_id)
            .await?
            .ok_or(AppError::GroupNotFound)?;

        let mut added = 0u64;
        for contact_id in contact_ids {
            self.contacts
                .find_owned(*contact_id, owner_id)
                .await?
                .ok_or(AppError::ContactNotFound)?;

            self.groups.add_contact(group_id, *contact_id).await?;
            added += 1;
        }

        Ok(added)
    }

    pub async fn list_group_contacts(
        &self,
        group_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<Contact>, AppError> {
        self.groups
            .find_owned(group_id, owner_id)
            .await?
            .ok_or(AppError::GroupNotFound)?;

        self.groups.list_contacts(group_id).await
    }
}
