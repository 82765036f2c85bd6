//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de contatos: CRUD + os dois modos de importação em massa
    let contact_routes = Router::new()
        .route("/"
               ,post(handlers::contacts::create_contact)
               .get(handlers::contacts::list_contacts)
        )
        .route("/{id}"
               ,put(handlers::contacts::update_contact)
               .delete(handlers::contacts::delete_contact)
        )
        .route("/import"
               ,post(handlers::import::import_file)
        )
        .route("/import-json"
               ,post(handlers::import::import_records)
        );

    let group_routes = Router::new()
        .route("/"
               ,post(handlers::groups::create_group)
               .get(handlers::groups::list_groups)
        )
        .route("/{id}"
               ,delete(handlers::groups::delete_group)
        )
        .route("/{id}/contacts"
               ,post(handlers::groups::add_group_contacts)
               .get(handlers::groups::list_group_contacts)
        );

    // A camada de auth barra requisições sem token válido antes de qualquer
    // parse de corpo (nenhum efeito colateral para chamadas não autenticadas)
    let protected_routes = Router::new()
        .nest("/api/contacts", contact_routes)
        .nest("/api/groups", group_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .merge(protected_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
