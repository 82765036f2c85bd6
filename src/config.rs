// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{ContactRepository, GroupRepository, UserRepository},
    services::{
        auth::AuthService,
        contact_service::ContactService,
        group_service::GroupService,
        import_service::{ImportService, OwnershipPolicy},
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub contact_service: ContactService,
    pub group_service: GroupService,
    pub import_service: ImportService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Política de dono em colisão de telefone: 'reassign' (padrão) ou
        // 'reject-conflict'.
        let ownership_policy =
            OwnershipPolicy::parse(&env::var("IMPORT_OWNERSHIP_POLICY").unwrap_or_default());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let contact_repo = ContactRepository::new(db_pool.clone());
        let group_repo = GroupRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let import_service =
            ImportService::new(Arc::new(contact_repo.clone()), ownership_policy);
        let contact_service = ContactService::new(contact_repo.clone());
        let group_service = GroupService::new(group_repo, contact_repo);

        Ok(Self {
            db_pool,
            auth_service,
            contact_service,
            group_service,
            import_service,
        })
    }
}
