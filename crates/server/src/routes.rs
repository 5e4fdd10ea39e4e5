use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

use common::types::Health;
use models::record::Record;
use service::errors::ServiceError;
use service::records::{CreateReply, ListShape, RecordService, UpdateOutcome, UpdateReply};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordService>,
}

impl AppState {
    pub fn new(records: RecordService) -> Self {
        Self { records: Arc::new(records) }
    }
}

type Body = Result<Json<Value>, JsonRejection>;
type IdPath = Result<Path<i64>, PathRejection>;

/// A path id that is not an integer names no record.
fn record_id(state: &AppState, path: IdPath) -> Result<i64, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(e) => {
            debug!(error = %e, "rejected record id");
            Err(ServiceError::not_found(state.records.profile().name).into())
        }
    }
}

/// Decode a request body into a record; anything but a JSON object is malformed.
fn decode(payload: Body) -> Result<Record, ApiError> {
    let Json(value) = payload?;
    Record::from_value(value).map_err(|_| ApiError::InvalidJson)
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(state.records.health())
}

async fn count(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let n = state.records.count().await?;
    Ok(Json(single(state.records.profile().count_key, n.into())))
}

async fn list_records(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let profile = state.records.profile();
    let items: Vec<Value> = state
        .records
        .list_all()
        .await?
        .iter()
        .map(|s| profile.render(s))
        .collect();
    let body = match profile.list_shape {
        ListShape::Bare => Value::Array(items),
        ListShape::Wrapped => single(profile.plural, Value::Array(items)),
    };
    Ok(Json(body))
}

async fn get_record(
    State(state): State<AppState>,
    path: IdPath,
) -> Result<Json<Value>, ApiError> {
    let id = record_id(&state, path)?;
    let stored = state.records.get_by_id(id).await?;
    Ok(Json(state.records.profile().render(&stored)))
}

async fn create_record(
    State(state): State<AppState>,
    payload: Body,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = decode(payload)?;
    let created = state.records.create(input).await?;
    let profile = state.records.profile();
    let body = match profile.create_reply {
        CreateReply::Record => created.record.into_value(),
        CreateReply::Reference => single("inserted id", created.reference.to_string().into()),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

async fn update_record(
    State(state): State<AppState>,
    path: IdPath,
    payload: Body,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = record_id(&state, path)?;
    let input = decode(payload)?;
    let profile = state.records.profile();
    match state.records.update(id, input).await? {
        UpdateOutcome::Unchanged => {
            let body = single("message", profile.no_change_message().into());
            Ok((StatusCode::OK, Json(body)))
        }
        UpdateOutcome::Updated(stored) => {
            let status = match profile.update_reply {
                UpdateReply::Created => StatusCode::CREATED,
                UpdateReply::Ok => StatusCode::OK,
            };
            Ok((status, Json(profile.render(&stored))))
        }
    }
}

async fn delete_record(
    State(state): State<AppState>,
    path: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = record_id(&state, path)?;
    state.records.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build the full application router for the state's collection.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let name = state.records.profile().name;
    let collection = format!("/{name}");
    let item = format!("/{name}/:id");

    Router::new()
        .route("/health", get(health))
        .route("/count", get(count))
        .route(&collection, get(list_records).post(create_record))
        .route(&item, get(get_record).put(update_record).delete(delete_record))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
