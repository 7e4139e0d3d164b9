// HTTP handler bindings for the game service
//
// Thin wrappers binding Rocket routes to per-match `Bot` instances.
// Handlers deserialize requests, look up the match's engine, delegate,
// and serialize the response.

use log::{error, info, warn};
use parking_lot::Mutex;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Build, Rocket, State};
use serde_json::{json, Value};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::bot::Bot;
use crate::config::Config;
use crate::types::{MoveRequest, SetupRequest};

type ApiError = (Status, String);

/// Engines of all running matches, one `Bot` per match id
pub struct Sessions {
    config: Config,
    games: Mutex<HashMap<String, Bot>>,
}

impl Sessions {
    pub fn new(config: Config) -> Self {
        Sessions {
            config,
            games: Mutex::new(HashMap::new()),
        }
    }

    fn len(&self) -> usize {
        self.games.lock().len()
    }

    /// Moves a match's engine out so it can be used without holding the lock
    fn take(&self, id: &str) -> Option<Bot> {
        self.games.lock().remove(id)
    }

    fn put(&self, id: &str, bot: Bot) {
        self.games.lock().insert(id.to_string(), bot);
    }

    /// Hands an engine back after a move unless the match was set up again meanwhile
    fn put_back(&self, id: &str, bot: Bot) {
        match self.games.lock().entry(id.to_string()) {
            Entry::Occupied(_) => {
                info!("Match {} was set up again during a move, keeping the new engine", id)
            }
            Entry::Vacant(slot) => {
                slot.insert(bot);
            }
        }
    }
}

/// Builds the Rocket instance serving the bot
pub fn build_rocket(config: Config) -> Rocket<Build> {
    rocket::build()
        .manage(Sessions::new(config))
        .mount("/", routes![index, setup, get_move, end])
}

/// GET / endpoint
/// Returns bot metadata
#[get("/")]
pub fn index(sessions: &State<Sessions>) -> Json<Value> {
    Json(json!({
        "apiversion": "1",
        "engine": "minimax-voronoi",
        "maxDepth": sessions.config.search.max_depth,
        "matches": sessions.len(),
    }))
}

/// POST /games/<id>/setup endpoint
/// Starts a match, replacing any previous one under the same id
#[post("/games/<id>/setup", format = "json", data = "<setup_req>")]
pub fn setup(
    sessions: &State<Sessions>,
    id: &str,
    setup_req: Json<SetupRequest>,
) -> Result<Status, ApiError> {
    let req = setup_req.into_inner();
    let rows = req.rows.unwrap_or(sessions.config.board.rows);
    let cols = req.cols.unwrap_or(sessions.config.board.cols);

    let mut bot = Bot::new(sessions.config.clone());
    bot.setup(rows, cols, req.player_position, req.opponent_position)
        .map_err(|e| (Status::UnprocessableEntity, e.to_string()))?;

    info!("Match {} started", id);
    sessions.put(id, bot);
    Ok(Status::Ok)
}

/// POST /games/<id>/move endpoint
/// Called each round to compute and return the bot's command
#[post("/games/<id>/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    sessions: &State<Sessions>,
    id: &str,
    move_req: Json<MoveRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut bot = sessions.take(id).ok_or_else(|| {
        warn!("Move requested for unknown match {}", id);
        (Status::NotFound, format!("match {} has not been set up", id))
    })?;
    let req = move_req.into_inner();

    let (bot, result) = tokio::task::spawn_blocking(move || {
        let result = bot.next_move(req.player_position, req.opponent_position);
        (bot, result)
    })
    .await
    .map_err(|e| {
        error!("Move computation for match {} failed: {}", id, e);
        (Status::InternalServerError, e.to_string())
    })?;

    sessions.put_back(id, bot);

    let command = result.map_err(|e| (Status::UnprocessableEntity, e.to_string()))?;
    Ok(Json(json!({ "move": command.as_str() })))
}

/// DELETE /games/<id> endpoint
/// Drops the match's engine
#[delete("/games/<id>")]
pub fn end(sessions: &State<Sessions>, id: &str) -> Status {
    match sessions.take(id) {
        Some(_) => {
            info!("Match {} over", id);
            Status::Ok
        }
        None => Status::NotFound,
    }
}
