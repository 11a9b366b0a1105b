use crate::errors::AppError;
use crate::models::{IndexParams, SaveRequest, SaveResponse, Score, ScoreRecord, ScoresResponse};
use crate::state::AppState;
use crate::storage::{persist_ledger, ScoreStore};
use crate::summary::build_summary;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use tracing::{error, info, warn};

pub async fn index<S: ScoreStore + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<IndexParams>,
) -> Html<String> {
    let today = state.clock.today();
    let ledger = state.ledger.lock().await;
    let score = ledger.get(today).map(|record| record.score).unwrap_or_default();
    let status = match params.saved {
        Some(outcome) => Some(outcome.status()),
        None => state.load_status.lock().await.clone(),
    };
    Html(render_index(today, score, status.as_ref()))
}

pub async fn list_scores<S: ScoreStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<ScoresResponse> {
    let ledger = state.ledger.lock().await;
    Json(ScoresResponse {
        date: state.clock.today().to_string(),
        records: ledger.records().to_vec(),
        summary: build_summary(ledger.records()),
        status: state.load_status.lock().await.clone(),
    })
}

pub async fn save_score<S: ScoreStore + 'static>(
    State(state): State<AppState<S>>,
    Json(payload): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    let score = parse_score(payload.score)?;
    let response = apply_save(&state, score).await?;
    Ok(Json(response))
}

pub async fn save_score_form<S: ScoreStore + 'static>(
    State(state): State<AppState<S>>,
    Form(payload): Form<SaveRequest>,
) -> Result<Redirect, AppError> {
    let score = parse_score(payload.score)?;
    let response = apply_save(&state, score).await?;
    Ok(Redirect::to(&format!("/?saved={}", response.outcome.as_str())))
}

pub async fn export<S: ScoreStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, AppError> {
    let ledger = state.ledger.lock().await;
    let artifact = ledger.export()?;
    info!(records = ledger.len(), "exporting scores");

    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.file_name),
            ),
        ],
        artifact.body,
    ))
}

/// Records `score` under today's date. Memory is only updated once the
/// full history has been written to the store.
pub async fn apply_save<S: ScoreStore>(
    state: &AppState<S>,
    score: Score,
) -> Result<SaveResponse, AppError> {
    let record = ScoreRecord {
        date: state.clock.today(),
        score,
    };

    let mut ledger = state.ledger.lock().await;
    let mut next = ledger.clone();
    let outcome = next.upsert(record);

    if let Err(err) = persist_ledger(&*state.store, &next).await {
        error!("failed to persist score data: {err}");
        return Err(err.into());
    }
    *ledger = next;
    *state.load_status.lock().await = None;
    info!(date = %record.date, score = %record.score, ?outcome, "score saved");

    Ok(SaveResponse {
        outcome,
        status: outcome.status(),
        record,
        records: ledger.records().to_vec(),
        summary: build_summary(ledger.records()),
    })
}

fn parse_score(value: i64) -> Result<Score, AppError> {
    Score::try_from(value).map_err(|err| {
        warn!("rejected score: {err}");
        AppError::bad_request(err.to_string())
    })
}
