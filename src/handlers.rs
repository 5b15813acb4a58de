use crate::errors::AppError;
use crate::models::{
    LoginRequest, LoginResponse, RawRecord, RecordsQuery, SessionResponse, SummaryQuery, WeeklyRecord,
    WeeklySummary,
};
use crate::sessions::Session;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Html,
    Json,
};
use tracing::{info, warn};

pub async fn index() -> Html<&'static str> {
    Html(render_index())
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let identity = state.ledger.login(&payload.name, &payload.password).map_err(|err| {
        warn!("login rejected for '{}': {err}", payload.name.trim());
        err
    })?;

    let session = state.sessions.open(identity).await;
    info!("{} logged in", session.identity.name);

    Ok(Json(LoginResponse {
        token: session.token,
        name: session.identity.name,
        role: session.identity.role,
    }))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode, AppError> {
    let session = current_session(&state, &headers).await?;
    state.sessions.close(&session.token).await;
    info!("{} logged out", session.identity.name);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, AppError> {
    let session = current_session(&state, &headers).await?;
    Ok(Json(SessionResponse {
        name: session.identity.name,
        role: session.identity.role,
    }))
}

pub async fn create_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RawRecord>,
) -> Result<(StatusCode, Json<WeeklyRecord>), AppError> {
    let session = current_session(&state, &headers).await?;
    let record = state.ledger.submit(&session.identity, &payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<Vec<WeeklyRecord>>, AppError> {
    let session = current_session(&state, &headers).await?;
    let records = state
        .ledger
        .records(&session.identity, query.owner.as_deref())
        .await?;
    Ok(Json(records))
}

pub async fn get_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Vec<WeeklySummary>>, AppError> {
    let session = current_session(&state, &headers).await?;
    let summary = state
        .ledger
        .summary(&session.identity, query.group_by, query.owner.as_deref())
        .await?;
    Ok(Json(summary))
}

async fn current_session(state: &AppState, headers: &HeaderMap) -> Result<Session, AppError> {
    let token = bearer_token(headers).ok_or_else(|| AppError::unauthorized("login required"))?;
    state
        .sessions
        .get(token)
        .await
        .ok_or_else(|| AppError::unauthorized("session expired, log in again"))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
