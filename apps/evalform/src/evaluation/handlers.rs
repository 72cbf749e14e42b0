//! Axum route handlers for the evaluation session.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::evaluation::invite::invite_url;
use crate::evaluation::scorer::{summarize, ScoreSummary};
use crate::evaluation::session::{ResumeFile, SessionState, SubmissionPhase};
use crate::evaluation::submitter::{submit_detached, SubmissionReceipt};
use crate::models::candidate::CandidateInfo;
use crate::models::criteria::CriteriaTable;
use crate::models::record::ScoreSet;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: u8,
}

#[derive(Debug, Deserialize)]
pub struct CommentsRequest {
    pub comments: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeView {
    pub file_name: String,
    pub size: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub candidate: CandidateInfo,
    pub scores: ScoreSet,
    pub comments: String,
    pub resume: Option<ResumeView>,
    pub phase: SubmissionPhase,
    pub last_error: Option<String>,
    pub summary: ScoreSummary,
}

impl SessionView {
    fn of(session: &SessionState, criteria: &CriteriaTable) -> Self {
        Self {
            candidate: session.candidate.clone(),
            scores: session.scores.clone(),
            comments: session.comments.clone(),
            resume: session.resume.as_ref().map(|r| ResumeView {
                file_name: r.file_name.clone(),
                size: r.size,
            }),
            phase: session.phase,
            last_error: session.last_error.clone(),
            summary: summarize(&session.scores, criteria),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/criteria
pub async fn handle_get_criteria(State(state): State<AppState>) -> Json<CriteriaTable> {
    Json(state.criteria.as_ref().clone())
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::of(&session, &state.criteria))
}

/// PUT /api/v1/session/candidate
pub async fn handle_put_candidate(
    State(state): State<AppState>,
    Json(candidate): Json<CandidateInfo>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    session.set_candidate(candidate)?;
    Ok(Json(SessionView::of(&session, &state.criteria)))
}

/// PUT /api/v1/session/scores/:criterion
pub async fn handle_put_score(
    State(state): State<AppState>,
    Path(criterion): Path<String>,
    Json(req): Json<RatingRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    session.set_score(&state.criteria, &criterion, req.rating)?;
    Ok(Json(SessionView::of(&session, &state.criteria)))
}

/// PUT /api/v1/session/comments
pub async fn handle_put_comments(
    State(state): State<AppState>,
    Json(req): Json<CommentsRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    session.set_comments(req.comments)?;
    Ok(Json(SessionView::of(&session, &state.criteria)))
}

/// POST /api/v1/session/resume
///
/// Multipart upload; the `resume` field must carry a single .pdf file.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        if upload.is_some() {
            return Err(AppError::Validation("Only one résumé file may be uploaded".to_string()));
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("The résumé field has no file name".to_string()))?;
        ResumeFile::check_file_name(&file_name)?;

        let contents = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        upload = Some((file_name, contents));
    }

    let (file_name, contents) = upload
        .ok_or_else(|| AppError::Validation(format!("Missing multipart field '{RESUME_FIELD}'")))?;
    if contents.len() > state.max_resume_bytes {
        return Err(AppError::Validation(format!(
            "Résumé is {} bytes, the limit is {}",
            contents.len(),
            state.max_resume_bytes
        )));
    }

    let resume = tokio::task::spawn_blocking(move || ResumeFile::spool(file_name, contents))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Internal(e.into()))?;
    info!("Résumé attached: {} ({} bytes)", resume.file_name, resume.size);

    let mut session = state.session.lock().await;
    session.attach_resume(resume)?;
    Ok(Json(SessionView::of(&session, &state.criteria)))
}

/// DELETE /api/v1/session/resume
pub async fn handle_clear_resume(
    State(state): State<AppState>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    session.clear_resume()?;
    Ok(Json(SessionView::of(&session, &state.criteria)))
}

/// POST /api/v1/session/submit
///
/// Encodes the résumé, builds the record and relays it to the spreadsheet.
/// Success means the request went out; the endpoint's answer is not read.
/// The attempt runs on its own task and settles even if the client hangs up.
pub async fn handle_submit(
    State(state): State<AppState>,
) -> Result<Json<SubmissionReceipt>, AppError> {
    let receipt = submit_detached(
        state.session.clone(),
        state.criteria.clone(),
        state.sink.clone(),
    )
    .await?;
    Ok(Json(receipt))
}

/// POST /api/v1/session/reset
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    session.reset()?;
    info!("Session reset");
    Ok(Json(SessionView::of(&session, &state.criteria)))
}

/// GET /api/v1/session/invite
///
/// Deep link inviting the candidate to the second round.
pub async fn handle_invite(
    State(state): State<AppState>,
) -> Result<Json<InviteResponse>, AppError> {
    let session = state.session.lock().await;
    let url = invite_url(&session.candidate, &state.invite)?;
    Ok(Json(InviteResponse { url }))
}
