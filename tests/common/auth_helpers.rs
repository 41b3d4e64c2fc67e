//! Authentication test helpers

use axum::http::HeaderValue;
use cabalgata::backend::auth::users::create_user;
use cabalgata::backend::auth::TokenIssuer;
use sqlx::PgPool;
use uuid::Uuid;

use super::server::TEST_JWT_SECRET;

/// Test user credentials
pub struct TestUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Create an account directly in the database with a token for it
pub async fn create_test_user(pool: &PgPool, username: &str, password: &str) -> TestUser {
    let email = format!("{}@example.com", username);
    // Lowest cost keeps the suite fast; verify accepts any cost
    let password_hash = bcrypt::hash(password, 4).expect("Failed to hash password");
    let usuario = create_user(pool, username, &email, &password_hash)
        .await
        .expect("Failed to create test user");
    let token = TokenIssuer::new(TEST_JWT_SECRET, 24)
        .issue(&usuario)
        .expect("Failed to create test token");

    TestUser {
        id: usuario.id,
        username: usuario.username,
        email: usuario.email,
        password: password.to_string(),
        token,
    }
}

/// Username that does not collide across tests
pub fn unique_username() -> String {
    format!("u{}", &Uuid::new_v4().simple().to_string()[..12])
}

/// `Authorization` header value for a bearer token
pub fn auth_header(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).expect("invalid token header")
}
