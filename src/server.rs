use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{DictionaryEntry, EntryKind, ResolveRequest, ResolveResponse, SessionResponse};
use crate::redirect::{phrase_of, slug_of};
use crate::resolver::{Resolution, ResolveError, Resolver, SearchSession};

#[derive(Clone)]
struct AppState {
    resolver: Resolver,
    sessions: Arc<Mutex<HashMap<String, Arc<SearchSession>>>>,
}

impl AppState {
    // Only ids minted by the session endpoint get a registry slot.
    // Unknown and absent ids get a throwaway session so a lookup still
    // works without the caller being able to grow the registry.
    fn session_for(&self, session_id: Option<&str>) -> Result<Arc<SearchSession>, ApiError> {
        let Some(id) = session_id else {
            return Ok(Arc::new(SearchSession::new()));
        };

        let sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::internal("session registry poisoned"))?;
        Ok(sessions
            .get(id)
            .cloned()
            .unwrap_or_else(|| Arc::new(SearchSession::new())))
    }
}

pub async fn run_server(config: AppConfig, resolver: Resolver) -> Result<()> {
    let state = AppState {
        resolver,
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/session", post(create_session))
        .route("/api/resolve", post(resolve_query))
        .route("/word/:word", get(word_page))
        .route("/lexical-unit/:slug", get(lexical_unit_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn create_session(State(state): State<AppState>) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = Uuid::new_v4().to_string();
    state
        .sessions
        .lock()
        .map_err(|_| ApiError::internal("session registry poisoned"))?
        .insert(session_id.clone(), Arc::new(SearchSession::new()));

    Ok(Json(SessionResponse { session_id }))
}

async fn resolve_query(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let session = state.session_for(request.session_id.as_deref())?;
    let resolution = state
        .resolver
        .resolve_query(&session, &request.query)
        .await?;

    Ok(Json(match resolution {
        Resolution::Redirect { to } => ResolveResponse {
            ok: true,
            redirect_to: Some(to),
            reason: None,
            note: None,
        },
        Resolution::Entry(entry) => ResolveResponse {
            ok: true,
            redirect_to: Some(entry_path(&entry)),
            reason: None,
            note: None,
        },
        Resolution::Suppressed { reason, note } => ResolveResponse {
            ok: false,
            redirect_to: None,
            reason: Some(reason.as_str().to_string()),
            note,
        },
    }))
}

#[derive(Debug, Deserialize)]
struct EntryParams {
    session_id: Option<String>,
    refresh: Option<bool>,
}

async fn word_page(
    State(state): State<AppState>,
    Path(word): Path<String>,
    Query(params): Query<EntryParams>,
) -> Result<Response, ApiError> {
    let word = word.trim().to_lowercase();
    let addressed = format!("/word/{word}");
    entry_response(&state, &addressed, &word, params).await
}

async fn lexical_unit_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<EntryParams>,
) -> Result<Response, ApiError> {
    let slug = slug.trim().to_lowercase();
    let addressed = format!("/lexical-unit/{slug}");
    let raw = phrase_of(&slug);
    entry_response(&state, &addressed, &raw, params).await
}

async fn entry_response(
    state: &AppState,
    addressed: &str,
    raw: &str,
    params: EntryParams,
) -> Result<Response, ApiError> {
    let session = state.session_for(params.session_id.as_deref())?;
    let refresh = params.refresh.unwrap_or(false);

    let resolution = match state
        .resolver
        .resolve_entry(&session, raw, addressed, refresh)
        .await
    {
        Ok(resolution) => resolution,
        // An address that cannot pass the guard can never hold an entry.
        Err(ResolveError::Rejected { reason }) => {
            return Err(ApiError {
                status: StatusCode::NOT_FOUND,
                message: format!("no entry at {addressed:?}"),
                reason: Some(reason.as_str()),
            })
        }
        Err(err) => return Err(ApiError::from(err)),
    };

    Ok(match resolution {
        Resolution::Entry(entry) => Json(entry.as_ref()).into_response(),
        Resolution::Redirect { to } => Redirect::temporary(&to).into_response(),
        Resolution::Suppressed { reason, note } => Json(ResolveResponse {
            ok: false,
            redirect_to: None,
            reason: Some(reason.as_str().to_string()),
            note,
        })
        .into_response(),
    })
}

fn entry_path(entry: &DictionaryEntry) -> String {
    match entry.kind {
        EntryKind::Word => format!("/word/{}", entry.normalized),
        EntryKind::LexicalUnit { .. } => format!("/lexical-unit/{}", slug_of(&entry.normalized)),
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
    reason: Option<&'static str>,
}

impl ApiError {
    fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
            reason: None,
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(value: ResolveError) -> Self {
        match &value {
            ResolveError::Rejected { reason } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: value.to_string(),
                reason: Some(reason.as_str()),
            },
            ResolveError::Generation(_) => Self {
                status: StatusCode::BAD_GATEWAY,
                message: value.to_string(),
                reason: Some("GENERATION_FAILED"),
            },
            ResolveError::Stale => Self {
                status: StatusCode::CONFLICT,
                message: value.to_string(),
                reason: Some("STALE"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.reason {
            Some(reason) => serde_json::json!({ "error": self.message, "reason": reason }),
            None => serde_json::json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}
