use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use actix_web::{get, post, web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};

/// State behind the fake football-data and identity provider endpoints.
#[derive(Default)]
pub struct MockState {
    teams: Mutex<Vec<Value>>,
    fixtures: Mutex<Vec<Value>>,
    // authorization code -> userinfo profile
    profiles: Mutex<HashMap<String, Value>>,
    fixtures_down: AtomicBool,
}

pub struct MockSources {
    pub address: String,
    state: web::Data<MockState>,
}

impl MockSources {
    pub fn set_teams(&self, names: &[&str]) {
        *self.state.teams.lock().unwrap() = names
            .iter()
            .map(|name| json!({ "name": name, "crestUrl": format!("https://crests.test/{}.svg", name) }))
            .collect();
    }

    pub fn set_fixtures(&self, fixtures: Vec<Value>) {
        *self.state.fixtures.lock().unwrap() = fixtures;
    }

    pub fn set_fixtures_down(&self, down: bool) {
        self.state.fixtures_down.store(down, Ordering::SeqCst);
    }

    /// The next token exchange for `code` will sign in as this profile.
    pub fn register_profile(&self, code: &str, email: &str, name: &str) {
        self.register_profile_with(code, email, name, true);
    }

    pub fn register_profile_with(&self, code: &str, email: &str, name: &str, email_verified: bool) {
        self.state.profiles.lock().unwrap().insert(
            code.to_string(),
            json!({ "email": email, "name": name, "email_verified": email_verified }),
        );
    }
}

/// A fixture in the football-data v1 shape.
pub fn fixture(matchday: i32, home: &str, away: &str, status: &str, goals: Option<(i32, i32)>) -> Value {
    let (home_goals, away_goals) = match goals {
        Some((h, a)) => (json!(h), json!(a)),
        None => (Value::Null, Value::Null),
    };
    json!({
        "date": "2016-06-10T19:00:00Z",
        "status": status,
        "matchday": matchday,
        "homeTeamName": home,
        "awayTeamName": away,
        "result": { "goalsHomeTeam": home_goals, "goalsAwayTeam": away_goals }
    })
}

#[get("/soccerseasons/{season}/teams")]
async fn teams_route(state: web::Data<MockState>, req: HttpRequest) -> HttpResponse {
    if req.headers().get("X-Auth-Token").is_none() {
        return HttpResponse::Forbidden().finish();
    }
    let teams = state.teams.lock().unwrap().clone();
    HttpResponse::Ok().json(json!({ "count": teams.len(), "teams": teams }))
}

#[get("/soccerseasons/{season}/fixtures")]
async fn fixtures_route(state: web::Data<MockState>) -> HttpResponse {
    if state.fixtures_down.load(Ordering::SeqCst) {
        return HttpResponse::ServiceUnavailable().body("maintenance");
    }
    let fixtures = state.fixtures.lock().unwrap().clone();
    HttpResponse::Ok().json(json!({ "count": fixtures.len(), "fixtures": fixtures }))
}

#[post("/token")]
async fn token_route(state: web::Data<MockState>, form: web::Form<HashMap<String, String>>) -> HttpResponse {
    let code = form.get("code").cloned().unwrap_or_default();
    if form.get("grant_type").map(String::as_str) != Some("authorization_code")
        || !state.profiles.lock().unwrap().contains_key(&code)
    {
        return HttpResponse::BadRequest().json(json!({ "error": "invalid_grant" }));
    }
    HttpResponse::Ok().json(json!({ "access_token": code, "expires_in": 3600, "token_type": "Bearer" }))
}

#[get("/userinfo")]
async fn userinfo_route(state: web::Data<MockState>, req: HttpRequest) -> HttpResponse {
    let access_token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();
    match state.profiles.lock().unwrap().get(&access_token) {
        Some(profile) => HttpResponse::Ok().json(profile),
        None => HttpResponse::Unauthorized().finish(),
    }
}

pub fn spawn_mock_sources() -> MockSources {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let state = web::Data::new(MockState::default());

    let server_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .service(teams_route)
            .service(fixtures_route)
            .service(token_route)
            .service(userinfo_route)
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to bind mock sources")
    .run();
    let _ = tokio::spawn(server);

    MockSources {
        address: format!("http://127.0.0.1:{}", port),
        state,
    }
}
