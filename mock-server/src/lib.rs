use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// User id that always answers 401, to exercise error bodies.
pub const FORCE_ERROR_ID: &str = "forceerror";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub description: String,
}

/// JSON body sent with every non-2xx response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authenticate")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        tracing::warn!(error = %self, status = status.as_u16(), "request failed");
        let body = ErrorBody {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Default)]
pub struct Store {
    pub users: HashMap<String, User>,
    pub rooms: HashMap<String, Room>,
}

pub type Db = Arc<RwLock<Store>>;

/// Store preloaded with user `1` and two of their rooms.
pub fn seeded() -> Store {
    let mut store = Store::default();
    store.users.insert(
        "1".to_string(),
        User {
            id: "1".to_string(),
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            age: 36,
        },
    );
    for (id, city) in [("H151006172656205", "my city"), ("h123123", "London")] {
        store.rooms.insert(
            id.to_string(),
            Room {
                id: id.to_string(),
                user_id: "1".to_string(),
                city: city.to_string(),
                description: String::new(),
            },
        );
    }
    store
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(seeded()));
    Router::new()
        .route("/v1/users", get(list_users).post(create_user))
        .route(
            "/v1/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/v1/users/{user_id}/rooms", get(list_user_rooms))
        .route("/v1/users/{user_id}/rooms/{id}", get(get_user_room))
        .route("/v1/rooms", get(list_rooms))
        .route("/v1/rooms/{id}", get(get_room))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let store = db.read().await;
    Json(store.users.values().cloned().collect())
}

async fn create_user(State(db): State<Db>, Json(mut user): Json<User>) -> (StatusCode, Json<User>) {
    user.id = Uuid::new_v4().to_string();
    db.write().await.users.insert(user.id.clone(), user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<User>, ApiError> {
    if id == FORCE_ERROR_ID {
        return Err(ApiError::Unauthorized);
    }
    let store = db.read().await;
    store.users.get(&id).cloned().map(Json).ok_or(ApiError::NotFound("user"))
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(mut input): Json<User>,
) -> Result<Json<User>, ApiError> {
    let mut store = db.write().await;
    let user = store.users.get_mut(&id).ok_or(ApiError::NotFound("user"))?;
    input.id = id;
    *user = input;
    Ok(Json(user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    store
        .users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(ApiError::NotFound("user"))
}

async fn list_user_rooms(
    State(db): State<Db>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let store = db.read().await;
    if !store.users.contains_key(&user_id) {
        return Err(ApiError::NotFound("user"));
    }
    Ok(Json(
        store
            .rooms
            .values()
            .filter(|room| room.user_id == user_id)
            .cloned()
            .collect(),
    ))
}

async fn get_user_room(
    State(db): State<Db>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<Json<Room>, ApiError> {
    let store = db.read().await;
    store
        .rooms
        .get(&id)
        .filter(|room| room.user_id == user_id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound("room"))
}

async fn list_rooms(State(db): State<Db>) -> Json<Vec<Room>> {
    let store = db.read().await;
    Json(store.rooms.values().cloned().collect())
}

async fn get_room(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Room>, ApiError> {
    let store = db.read().await;
    store.rooms.get(&id).cloned().map(Json).ok_or(ApiError::NotFound("room"))
}
