/// Common test utilities for integration tests
///
/// Shared infrastructure:
/// - Test database setup and cleanup
/// - Test user/profile creation
/// - JWT token generation
/// - Request helpers

use axum::body::Body;
use axum::http::{Request, Response};
use fieldlog_api::app::{build_router, AppState};
use fieldlog_api::config::Config;
use fieldlog_shared::auth::jwt::{create_token, Claims, TokenType};
use fieldlog_shared::auth::password::hash_password;
use fieldlog_shared::models::profile::{CreateProfile, Profile, ProfileRole};
use fieldlog_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a member-role user
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_role(ProfileRole::Member).await
    }

    /// Creates a new test context whose user has the given role
    pub async fn with_role(role: ProfileRole) -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let user = User::create(
            &db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: hash_password("test_password_1")?,
            },
        )
        .await?;

        Profile::create(
            &db,
            CreateProfile {
                id: user.id,
                name: format!("Test User {}", &user.id.to_string()[..8]),
                role,
            },
        )
        .await?;

        let claims = Claims::new(user.id, TokenType::Access);
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Sends an authenticated JSON request through the router
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        use tower::Service as _;

        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", self.auth_header());

        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }

        let request = builder
            .body(match body {
                Some(json) => Body::from(json.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        self.app.clone().call(request).await.unwrap()
    }

    /// Cleans up test data
    ///
    /// Deleting the user cascades to its profile and reports. Clients are
    /// shared rows; tests that create them delete them explicitly.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Creates a uniquely named test client directly in the database
pub async fn create_test_client(
    ctx: &TestContext,
    prefix: &str,
) -> anyhow::Result<fieldlog_shared::models::client::Client> {
    let name = format!("{} {}", prefix, Uuid::new_v4());
    let client = fieldlog_shared::models::client::Client::create(&ctx.db, &name).await?;
    Ok(client)
}

/// Deletes a test client by ID
pub async fn delete_test_client(ctx: &TestContext, id: Uuid) -> anyhow::Result<()> {
    fieldlog_shared::models::client::Client::delete(&ctx.db, id).await?;
    Ok(())
}

/// Reads a response body as JSON
pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Reads a response body as a string
pub async fn response_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).to_string()
}
