//! Session State: the one mutable copy of the form for the active evaluation.
//!
//! Lives in `AppState` behind a single `tokio::sync::Mutex`. Transitions are
//! made under the lock; the encode/dispatch awaits happen outside it, with the
//! `Submitting` phase keeping a second submit out.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tempfile::TempPath;
use thiserror::Error;

use crate::config::FormDefaults;
use crate::evaluation::scorer::scored_count;
use crate::models::candidate::CandidateInfo;
use crate::models::criteria::CriteriaTable;
use crate::models::record::{ScoreSet, MAX_RATING};

const RESUME_EXTENSION: &str = "pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Please complete all {total} competency assessments before submitting ({scored} scored)")]
    IncompleteAssessment { scored: usize, total: usize },

    #[error("Required fields are empty: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("This evaluation was already submitted; reset to start another")]
    AlreadySubmitted,

    #[error("The session cannot be edited while {0:?}")]
    Locked(SubmissionPhase),

    #[error("Unknown criterion '{0}'")]
    UnknownCriterion(String),

    #[error("Rating {0} is out of range (0-5)")]
    RatingOutOfRange(u8),

    #[error("Only .pdf files are accepted, got '{0}'")]
    UnsupportedFileType(String),
}

/// A résumé spooled to a temp file at upload time. The file is removed when
/// the last clone is dropped.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub size: usize,
    spool: Arc<TempPath>,
}

impl ResumeFile {
    /// Client-side filter: a single PDF, judged by extension.
    pub fn check_file_name(file_name: &str) -> Result<(), SessionError> {
        let is_pdf = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(RESUME_EXTENSION))
            .unwrap_or(false);

        if is_pdf {
            Ok(())
        } else {
            Err(SessionError::UnsupportedFileType(file_name.to_string()))
        }
    }

    /// Writes the upload to a fresh temp file. Blocking; call from
    /// `spawn_blocking` inside async code.
    pub fn spool(file_name: String, contents: Bytes) -> std::io::Result<Self> {
        use std::io::Write;

        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(&contents)?;
        file.flush()?;

        Ok(Self {
            file_name,
            size: contents.len(),
            spool: Arc::new(file.into_temp_path()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.spool
    }
}

impl PartialEq for ResumeFile {
    fn eq(&self, other: &Self) -> bool {
        self.file_name == other.file_name && self.size == other.size && self.path() == other.path()
    }
}

/// Everything the submitter needs, copied out under the lock.
#[derive(Debug, Clone)]
pub struct SubmissionSnapshot {
    pub candidate: CandidateInfo,
    pub scores: ScoreSet,
    pub comments: String,
    pub resume: Option<ResumeFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub candidate: CandidateInfo,
    pub scores: ScoreSet,
    pub comments: String,
    pub resume: Option<ResumeFile>,
    pub phase: SubmissionPhase,
    pub last_error: Option<String>,
    defaults: FormDefaults,
}

impl SessionState {
    pub fn new(defaults: FormDefaults) -> Self {
        Self {
            candidate: CandidateInfo::with_defaults(&defaults),
            scores: ScoreSet::new(),
            comments: String::new(),
            resume: None,
            phase: SubmissionPhase::Idle,
            last_error: None,
            defaults,
        }
    }

    /// Back to the state of a freshly opened form.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.phase == SubmissionPhase::Submitting {
            return Err(SessionError::Locked(self.phase));
        }
        *self = Self::new(self.defaults.clone());
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        match self.phase {
            SubmissionPhase::Idle | SubmissionPhase::Failed => Ok(()),
            phase => Err(SessionError::Locked(phase)),
        }
    }

    pub fn set_candidate(&mut self, candidate: CandidateInfo) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.candidate = candidate;
        Ok(())
    }

    pub fn set_score(
        &mut self,
        criteria: &CriteriaTable,
        criterion_id: &str,
        rating: u8,
    ) -> Result<(), SessionError> {
        self.ensure_editable()?;
        if !criteria.contains(criterion_id) {
            return Err(SessionError::UnknownCriterion(criterion_id.to_string()));
        }
        if rating > MAX_RATING {
            return Err(SessionError::RatingOutOfRange(rating));
        }
        self.scores.insert(criterion_id.to_string(), rating);
        Ok(())
    }

    pub fn set_comments(&mut self, comments: String) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.comments = comments;
        Ok(())
    }

    /// Replaces any previously attached résumé.
    pub fn attach_resume(&mut self, resume: ResumeFile) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.resume = Some(resume);
        Ok(())
    }

    pub fn clear_resume(&mut self) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.resume = None;
        Ok(())
    }

    /// `Idle`/`Failed` → `Submitting`, after the guards pass. On any error the
    /// phase is left as it was.
    pub fn begin_submission(
        &mut self,
        criteria: &CriteriaTable,
    ) -> Result<SubmissionSnapshot, SessionError> {
        match self.phase {
            SubmissionPhase::Submitting => return Err(SessionError::SubmissionInFlight),
            SubmissionPhase::Success => return Err(SessionError::AlreadySubmitted),
            SubmissionPhase::Idle | SubmissionPhase::Failed => {}
        }

        let scored = scored_count(&self.scores, criteria);
        if scored < criteria.len() {
            return Err(SessionError::IncompleteAssessment {
                scored,
                total: criteria.len(),
            });
        }

        let mut missing = self.candidate.missing_fields();
        if self.comments.trim().is_empty() {
            missing.push("comments");
        }
        if !missing.is_empty() {
            return Err(SessionError::MissingFields(missing));
        }

        self.phase = SubmissionPhase::Submitting;
        self.last_error = None;

        Ok(SubmissionSnapshot {
            candidate: self.candidate.clone(),
            scores: self.scores.clone(),
            comments: self.comments.clone(),
            resume: self.resume.clone(),
        })
    }

    pub fn complete_submission(&mut self) {
        self.phase = SubmissionPhase::Success;
        self.last_error = None;
    }

    pub fn fail_submission(&mut self, message: String) {
        self.phase = SubmissionPhase::Failed;
        self.last_error = Some(message);
    }
}
