//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
use state_builders::build_http_state;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

use curio_backend::Trace;
#[cfg(debug_assertions)]
use curio_backend::doc::ApiDoc;
use curio_backend::inbound::http::health::{self, HealthState};
use curio_backend::inbound::http::{collections, comments, items, users};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Build and start the HTTP server; resolves once it is bound.
pub fn run(config: ServerConfig) -> std::io::Result<Server> {
    let state = build_http_state(config.db_pool);
    let health_state = HealthState::new();
    let ready_flag = health_state.clone();

    let key = config.key;
    let cookie_secure = config.cookie_secure;
    let same_site = config.same_site;

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(same_site)
            .build();

        let app = App::new()
            .wrap(Trace)
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(health_state.clone()))
            .service(health::live)
            .service(health::ready)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .service(users::sign_up)
                    .service(users::login)
                    .service(users::logout)
                    .service(users::current_user)
                    .service(users::list_users)
                    .service(users::block_user)
                    .service(users::unblock_user)
                    .service(users::grant_admin)
                    .service(users::revoke_admin)
                    .service(users::delete_user)
                    .service(collections::create_collection)
                    .service(collections::list_collections)
                    .service(collections::get_collection)
                    .service(collections::update_collection)
                    .service(collections::delete_collection)
                    .service(collections::add_field)
                    .service(collections::remove_field)
                    .service(items::create_item)
                    .service(items::list_items)
                    .service(items::get_item)
                    .service(items::update_item)
                    .service(items::delete_item)
                    .service(comments::add_comment)
                    .service(comments::list_comments),
            );

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

        app
    })
    .bind(config.bind_addr)?;

    ready_flag.mark_ready();
    Ok(server.run())
}
