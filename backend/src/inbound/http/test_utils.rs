//! Test helpers for inbound HTTP components.

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test as actix_test, web};
use serde_json::json;

use crate::domain::ports::{PasswordHasher as _, UserRepository};
use crate::domain::{Email, Fullname, PlainPassword, User, UserId};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{collections, comments, health, items, users};
use crate::outbound::memory::MemoryStore;
use crate::outbound::security::BcryptPasswordHasher;

/// Build a session middleware configured for tests.
///
/// Generates a fresh signing key per invocation and disables the `Secure`
/// flag for plain-HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// One in-memory store plus the HTTP state wired over it.
pub struct TestHarness {
    /// Direct access to the backing store for seeding and assertions.
    pub store: MemoryStore,
    state: HttpState,
}

impl TestHarness {
    /// Create a fresh harness with an empty store.
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let state = HttpState::with_memory_store(store.clone());
        Self { store, state }
    }

    /// App configuration registering state, session middleware, and every
    /// route under `/api/v1` plus the health endpoints.
    pub fn configure(&self) -> impl FnOnce(&mut web::ServiceConfig) + use<> {
        let state = self.state.clone();
        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(web::Data::new(state))
                .app_data(web::Data::new(health::HealthState::new()))
                .service(health::live)
                .service(health::ready)
                .service(
                    web::scope("/api/v1")
                        .wrap(test_session_middleware())
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
        }
    }

    /// Sign in and return the session cookie.
    pub async fn login<S, B>(&self, app: &S, email: &str, password: &str) -> Cookie<'static>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "email": email, "password": password }))
                .to_request(),
        )
        .await;
        assert!(
            response.status().is_success(),
            "login failed for {email}: {}",
            response.status()
        );
        response
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned()
    }
}

/// Insert a user directly into the store, bypassing the sign-up use-case.
///
/// Hashes at the bcrypt minimum cost to keep the suite fast; verification
/// reads the cost from the stored hash, so sign-in still works.
pub async fn seed_user(
    store: &MemoryStore,
    email: &str,
    password: &str,
    admin: bool,
    blocked: bool,
) -> User {
    let hasher = BcryptPasswordHasher::new(4);
    let hash = hasher
        .hash(&PlainPassword::new(password).expect("seed password satisfies policy"))
        .expect("seed password hashes");
    let user = User::new(
        UserId::random(),
        Email::new(email).expect("valid seed email"),
        Fullname::new("Seeded User").expect("valid seed fullname"),
        hash,
    )
    .with_admin(admin)
    .with_blocked(blocked);
    UserRepository::insert(store, &user)
        .await
        .expect("seed user inserts");
    user
}
