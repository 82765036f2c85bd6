// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Contatos ---
        handlers::contacts::create_contact,
        handlers::contacts::list_contacts,
        handlers::contacts::update_contact,
        handlers::contacts::delete_contact,

        // --- Importação ---
        handlers::import::import_file,
        handlers::import::import_records,

        // --- Grupos ---
        handlers::groups::create_group,
        handlers::groups::list_groups,
        handlers::groups::delete_group,
        handlers::groups::add_group_contacts,
        handlers::groups::list_group_contacts,
    ),
    components(
        schemas(
            // --- Contatos ---
            models::contact::Contact,
            models::contact::ImportedContact,
            models::contact::ImportFailure,
            models::contact::ImportSummary,
            handlers::contacts::CreateContactPayload,
            handlers::contacts::UpdateContactPayload,
            handlers::import::ImportRecordsPayload,

            // --- Grupos ---
            models::group::Group,
            handlers::groups::CreateGroupPayload,
            handlers::groups::AddGroupContactsPayload,

            // --- Auth ---
            models::auth::User,
        )
    ),
    tags(
        (name = "Contatos", description = "Gestão de Contatos"),
        (name = "Importação", description = "Importação em massa de contatos (CSV/planilha/JSON)"),
        (name = "Grupos", description = "Grupos de contatos para campanhas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
