//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_files::Files;
use actix_web::{
    get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use league_sim_web::{
    apply_event, group_table, simulate_round, start_competition, table, Competition,
    CompetitionConfig, CompetitionEvent, CompetitionId, GroupLabel, KnockoutStage, MatchId,
    RoundResults, Snapshot, Team, TeamId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-competition entry: competition data + last activity time (for auto-cleanup).
struct CompetitionEntry {
    competition: Competition,
    last_activity: Instant,
}

/// In-memory state: many competitions by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<CompetitionId, CompetitionEntry>>>;

/// Inactivity threshold: competitions not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Roster row for competition creation and CSV import.
#[derive(Clone, Deserialize, serde::Serialize)]
struct NewTeam {
    name: String,
    strength: u8,
}

#[derive(Deserialize)]
struct CreateCompetitionBody {
    config: CompetitionConfig,
    /// Omit to play with the built-in roster.
    #[serde(default)]
    teams: Option<Vec<NewTeam>>,
}

#[derive(Deserialize)]
struct EditResultBody {
    match_id: MatchId,
    home_score: u32,
    away_score: u32,
    #[serde(default)]
    penalty_winner: Option<TeamId>,
}

/// Path segment: competition id (e.g. /api/competitions/{id})
#[derive(Deserialize)]
struct CompetitionPath {
    id: CompetitionId,
}

#[derive(Deserialize)]
struct RoundPath {
    id: CompetitionId,
    round: u32,
}

#[derive(Deserialize)]
struct GroupPath {
    id: CompetitionId,
    group: GroupLabel,
}

#[derive(Deserialize)]
struct BracketPath {
    id: CompetitionId,
    stage: KnockoutStage,
}

/// The built-in roster used when a competition is created without one.
fn default_roster() -> Vec<NewTeam> {
    [
        ("Rio de Janeiro FC", 90),
        ("São Paulo United", 92),
        ("Minas Gerais Athletic", 85),
        ("Porto Alegre City", 82),
        ("Salvador Solar", 78),
        ("Curitiba Coxa", 79),
        ("Fortaleza Lions", 75),
        ("Recife Sharks", 74),
        ("Brasília Capital", 70),
        ("Santos Beach", 88),
    ]
    .into_iter()
    .map(|(name, strength)| NewTeam {
        name: name.to_string(),
        strength,
    })
    .collect()
}

/// Run `f` against the competition with `id`, refreshing its activity
/// clock. 404 when the id is unknown, 500 on a poisoned lock.
fn with_competition<F>(state: &AppState, id: CompetitionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Competition) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            f(&mut entry.competition)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    }
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "league-sim-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a competition: validates the config, seeds the opening
/// fixtures, and returns the full state (client keeps the id).
#[post("/api/competitions")]
async fn api_create_competition(state: AppState, body: Json<CreateCompetitionBody>) -> HttpResponse {
    let body = body.into_inner();
    let roster: Vec<Team> = body
        .teams
        .unwrap_or_else(default_roster)
        .into_iter()
        .map(|t| Team::new(t.name, t.strength))
        .collect();

    let competition = match start_competition(body.config, roster, &mut rand::thread_rng()) {
        Ok(c) => c,
        Err(e) => return bad_request(e),
    };
    let id = competition.id;
    log::info!("Created competition {} ({})", competition.config.name, id);

    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&competition);
    g.insert(
        id,
        CompetitionEntry {
            competition,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Get a competition by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/competitions/{id}")]
async fn api_get_competition(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    with_competition(&state, path.id, |c| HttpResponse::Ok().json(c))
}

/// Full standings table (league and group matches only).
#[get("/api/competitions/{id}/table")]
async fn api_table(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    with_competition(&state, path.id, |c| {
        HttpResponse::Ok().json(table(&c.teams, &c.matches))
    })
}

/// Standings for a single group.
#[get("/api/competitions/{id}/table/{group}")]
async fn api_group_table(state: AppState, path: Path<GroupPath>) -> HttpResponse {
    with_competition(&state, path.id, |c| {
        HttpResponse::Ok().json(group_table(&c.teams, &c.matches, path.group))
    })
}

/// Fixtures for one round.
#[get("/api/competitions/{id}/rounds/{round}")]
async fn api_round_fixtures(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    with_competition(&state, path.id, |c| {
        HttpResponse::Ok().json(c.matches_for_round(path.round))
    })
}

/// All fixtures of one knockout stage (bracket view).
#[get("/api/competitions/{id}/bracket/{stage}")]
async fn api_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    with_competition(&state, path.id, |c| {
        let fixtures: Vec<_> = c
            .matches
            .iter()
            .filter(|m| m.knockout_stage() == Some(path.stage))
            .collect();
        HttpResponse::Ok().json(fixtures)
    })
}

/// Simulate the current round. The body may carry score-source results
/// (`RoundResults`); without it, random fallback scores are used.
#[post("/api/competitions/{id}/simulate")]
async fn api_simulate_round(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Option<Json<RoundResults>>,
) -> HttpResponse {
    let provided = body.map(Json::into_inner);
    with_competition(&state, path.id, |c| {
        match simulate_round(c, provided.as_ref(), &mut rand::thread_rng()) {
            Ok(_) => HttpResponse::Ok().json(c),
            Err(e) => bad_request(e),
        }
    })
}

/// Manually edit one result. Runs the same stage-transition check as a
/// simulated round.
#[put("/api/competitions/{id}/matches/result")]
async fn api_edit_result(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<EditResultBody>,
) -> HttpResponse {
    with_competition(&state, path.id, |c| {
        let event = CompetitionEvent::ScoreSubmitted {
            match_id: body.match_id,
            home_score: body.home_score,
            away_score: body.away_score,
            penalty_winner: body.penalty_winner,
            commentary: Some("Result adjusted manually.".to_string()),
        };
        match apply_event(c, event) {
            Ok(_) => HttpResponse::Ok().json(c),
            Err(e) => bad_request(e),
        }
    })
}

/// Re-run the transition check without changing any score (no-op when
/// the next stage already exists).
#[post("/api/competitions/{id}/advance")]
async fn api_advance(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    with_competition(&state, path.id, |c| {
        match apply_event(c, CompetitionEvent::StageAdvanceRequested) {
            Ok(_) => HttpResponse::Ok().json(c),
            Err(e) => bad_request(e),
        }
    })
}

/// Move the round pointer forward (only onto rounds that have fixtures).
#[post("/api/competitions/{id}/round/next")]
async fn api_next_round(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    with_competition(&state, path.id, |c| {
        if c.matches.iter().any(|m| m.round == c.current_round + 1) {
            c.current_round += 1;
        }
        HttpResponse::Ok().json(c)
    })
}

/// Move the round pointer back.
#[post("/api/competitions/{id}/round/prev")]
async fn api_prev_round(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    with_competition(&state, path.id, |c| {
        if c.current_round > 1 {
            c.current_round -= 1;
        }
        HttpResponse::Ok().json(c)
    })
}

/// Export a save snapshot (config, teams, matches, news, round pointer).
#[get("/api/competitions/{id}/snapshot")]
async fn api_snapshot(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    with_competition(&state, path.id, |c| HttpResponse::Ok().json(c.snapshot()))
}

/// Import a snapshot, restoring the competition under its saved id.
#[post("/api/competitions/load")]
async fn api_load_snapshot(state: AppState, body: Json<Snapshot>) -> HttpResponse {
    let competition = Competition::from_snapshot(body.into_inner());
    let id = competition.id;
    log::info!("Loaded competition {} ({})", competition.config.name, id);

    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&competition);
    g.insert(
        id,
        CompetitionEntry {
            competition,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Parse a `name,strength` CSV roster (no header) into team rows for
/// the setup screen.
#[post("/api/roster/csv")]
async fn api_roster_csv(body: String) -> HttpResponse {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut roster = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => return bad_request(e),
        };
        let name = match record.get(0) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => return bad_request("CSV rows must be name,strength"),
        };
        let strength = match record.get(1).and_then(|s| s.parse::<u8>().ok()) {
            Some(s) if (1..=100).contains(&s) => s,
            _ => return bad_request("Strength must be a number between 1 and 100"),
        };
        roster.push(NewTeam { name, strength });
    }
    HttpResponse::Ok().json(roster)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<CompetitionId, CompetitionEntry>::new()));

    // Background task: every 30 minutes, remove competitions inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive competition(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_competition)
            .service(api_load_snapshot)
            .service(api_roster_csv)
            .service(api_get_competition)
            .service(api_table)
            .service(api_group_table)
            .service(api_round_fixtures)
            .service(api_bracket)
            .service(api_simulate_round)
            .service(api_edit_result)
            .service(api_advance)
            .service(api_next_round)
            .service(api_prev_round)
            .service(api_snapshot)
            .service(Files::new("/static", "static").show_files_listing())
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
