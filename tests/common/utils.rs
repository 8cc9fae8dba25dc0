use secrecy::ExposeSecret;
use sqlx::{PgPool, PgConnection, Connection, Executor};
use std::net::TcpListener;
use uuid::Uuid;
use once_cell::sync::Lazy;
use reqwest::{header, redirect, Client};
use serde_json::{json, Value};

use prediction_pool::run;
use prediction_pool::auth::jwt::generate_token;
use prediction_pool::config::jwt::JwtSettings;
use prediction_pool::config::settings::{get_config, DatabaseSettings, get_jwt_settings};
use prediction_pool::config::tournament::TournamentSettings;
use prediction_pool::db::users;
use prediction_pool::models::user::UserRole;
use prediction_pool::services::{FootballDataClient, GoogleOAuthClient};
use prediction_pool::telemetry::{get_subscriber, init_subscriber};

use super::mock_sources::{spawn_mock_sources, MockSources};

pub const ALLOWED_DOMAIN: &str = "example.com";
pub const ADMIN_EMAIL: &str = "admin@example.com";

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub sources: MockSources,
    pub jwt_settings: JwtSettings,
    pub client: Client,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(TournamentSettings::default()).await
}

pub async fn spawn_app_with(tournament: TournamentSettings) -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let sources = spawn_mock_sources();

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    configuration.football_data.base_url = sources.address.clone();
    configuration.oauth.token_url = format!("{}/token", sources.address);
    configuration.oauth.userinfo_url = format!("{}/userinfo", sources.address);
    configuration.oauth.redirect_url = format!("{}/login/callback", address);
    configuration.oauth.client_id = "test-client".to_string();
    configuration.oauth.allowed_domains = ALLOWED_DOMAIN.to_string();
    configuration.oauth.admin_emails = vec![ADMIN_EMAIL.to_string()];

    let connection_pool = configure_db(&configuration.database).await;
    let jwt_settings = get_jwt_settings(&configuration);
    let football_client = FootballDataClient::new(&configuration.football_data)
        .expect("Failed to build football-data client");
    let oauth_client = GoogleOAuthClient::new(configuration.oauth.clone());

    let server = run(
        listener,
        connection_pool.clone(),
        jwt_settings.clone(),
        football_client,
        oauth_client,
        tournament,
        Vec::new(),
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
        sources,
        jwt_settings,
        client: Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client"),
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(
            &config.connection_string_without_db()
        )
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestApp {
    /// Insert a user directly and mint a token for them, skipping the OAuth round trip.
    pub async fn create_user(&self, name: &str, role: UserRole) -> TestUser {
        let email = format!("{}-{}@{}", name.to_lowercase(), Uuid::new_v4(), ALLOWED_DOMAIN);
        let user = users::insert_user(&self.db_pool, &email, name, role, None)
            .await
            .expect("Failed to insert user");
        let token = generate_token(&user, &self.jwt_settings).expect("Failed to generate token");
        TestUser { id: user.id, email, token }
    }

    pub async fn create_admin(&self) -> TestUser {
        self.create_user("Admin", UserRole::Admin).await
    }

    /// Run the whole login flow against the mock identity provider.
    pub async fn login(&self, email: &str, name: &str) -> reqwest::Response {
        self.login_with(email, name, true).await
    }

    pub async fn login_with(&self, email: &str, name: &str, email_verified: bool) -> reqwest::Response {
        let redirect = self.client
            .get(&format!("{}/login", self.address))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(redirect.status().as_u16(), 302);

        let state_cookie = state_cookie(&redirect).expect("No state cookie set");
        let location = redirect.headers()[header::LOCATION].to_str().unwrap().to_string();
        let state = query_param(&location, "state").expect("No state in authorization URL");

        let code = Uuid::new_v4().to_string();
        self.sources.register_profile_with(&code, email, name, email_verified);

        self.client
            .get(&format!("{}/login/callback", self.address))
            .query(&[("code", code.as_str()), ("state", state.as_str())])
            .header(header::COOKIE, format!("oauth_state={}", state_cookie))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login_token(&self, email: &str, name: &str) -> String {
        let response = self.login(email, name).await;
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        body["token"].as_str().expect("No token in response").to_string()
    }

    pub async fn get_authed(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_authed(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(&format!("{}{}", self.address, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn submit_predictions(&self, token: &str, predictions: Value) -> reqwest::Response {
        self.post_authed("/predictions", token, &json!({ "predictions": predictions })).await
    }

    pub async fn sync_results(&self, admin_token: &str) -> reqwest::Response {
        self.post_authed("/admin/results/sync", admin_token, &json!({})).await
    }
}

pub fn prediction(matchday: i32, home: &str, away: &str, home_score: i32, away_score: i32) -> Value {
    json!({
        "matchday": matchday,
        "home_team": home,
        "away_team": away,
        "home_score": home_score,
        "away_score": away_score
    })
}

fn state_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| cookie.strip_prefix("oauth_state="))
        .map(|rest| rest.split(';').next().unwrap_or_default().to_string())
}

fn query_param(url: &str, name: &str) -> Option<String> {
    let url = reqwest::Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
