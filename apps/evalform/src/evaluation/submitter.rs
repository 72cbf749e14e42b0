//! Submitter: drives one submission attempt through
//! `Idle|Failed → Submitting → Success|Failed`.
//!
//! Strictly sequential: guard (under lock) → encode → build → dispatch →
//! record outcome (under lock). No retries.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::evaluation::encoder::{encode_file, EncodeError};
use crate::evaluation::payload::build_record;
use crate::evaluation::session::{SessionError, SessionState, SubmissionPhase};
use crate::models::criteria::CriteriaTable;
use crate::models::record::FitLabel;
use crate::sheet_client::{Acknowledgment, RecordSink, SinkError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Could not read the résumé file: {0}")]
    FileRead(#[from] EncodeError),

    #[error("Error saving to the spreadsheet: {0}")]
    Transport(#[from] SinkError),

    #[error("Submission task ended abnormally: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub attempt_id: Uuid,
    pub weighted_score: String,
    pub performance_impression: FitLabel,
    pub acknowledgment: Acknowledgment,
}

/// Runs `submit` on its own task so the attempt always reaches `Success` or
/// `Failed`, even when the caller stops waiting (e.g. the HTTP client hangs up).
pub async fn submit_detached(
    session: Arc<Mutex<SessionState>>,
    criteria: Arc<CriteriaTable>,
    sink: Arc<dyn RecordSink>,
) -> Result<SubmissionReceipt, SubmitError> {
    let task_session = session.clone();
    let task = tokio::spawn(async move { submit(&task_session, &criteria, sink.as_ref()).await });

    match task.await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Submission task failed: {e}");
            let mut state = session.lock().await;
            if state.phase == SubmissionPhase::Submitting {
                state.fail_submission("The submission was interrupted".to_string());
            }
            Err(SubmitError::Aborted(e))
        }
    }
}

pub async fn submit(
    session: &Mutex<SessionState>,
    criteria: &CriteriaTable,
    sink: &dyn RecordSink,
) -> Result<SubmissionReceipt, SubmitError> {
    let snapshot = {
        let mut state = session.lock().await;
        state.begin_submission(criteria).map_err(|e| {
            warn!("Submission rejected: {e}");
            e
        })?
    };

    let attempt_id = Uuid::new_v4();
    info!(%attempt_id, candidate = %snapshot.candidate.name, "Submitting evaluation");

    let encoded = match &snapshot.resume {
        Some(resume) => match encode_file(resume.path()).await {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                error!(%attempt_id, "Résumé encoding failed: {e}");
                let err = SubmitError::FileRead(e);
                session.lock().await.fail_submission(err.to_string());
                return Err(err);
            }
        },
        None => None,
    };

    let record = build_record(
        &snapshot.candidate,
        &snapshot.scores,
        &snapshot.comments,
        encoded.as_deref(),
        snapshot.resume.as_ref().map(|r| r.file_name.as_str()),
        criteria,
    );

    match sink.dispatch(&record).await {
        Ok(acknowledgment) => {
            session.lock().await.complete_submission();
            info!(
                %attempt_id,
                weighted_score = %record.weighted_score,
                impression = %record.performance_impression,
                "Evaluation dispatched"
            );
            Ok(SubmissionReceipt {
                attempt_id,
                weighted_score: record.weighted_score,
                performance_impression: record.performance_impression,
                acknowledgment,
            })
        }
        Err(e) => {
            error!(%attempt_id, "Dispatch failed: {e}");
            let err = SubmitError::Transport(e);
            session.lock().await.fail_submission(err.to_string());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio::sync::{Mutex as AsyncMutex, Notify};

    use crate::config::FormDefaults;
    use crate::evaluation::session::ResumeFile;
    use crate::models::candidate::CandidateInfo;
    use crate::models::record::EvaluationRecord;

    /// Records dispatched rows; fails when `fail` is set.
    #[derive(Default)]
    struct FakeSink {
        records: AsyncMutex<Vec<EvaluationRecord>>,
        fail: bool,
    }

    #[async_trait]
    impl RecordSink for FakeSink {
        async fn dispatch(&self, record: &EvaluationRecord) -> Result<Acknowledgment, SinkError> {
            if self.fail {
                return Err(SinkError::Timeout);
            }
            self.records.lock().await.push(record.clone());
            Ok(Acknowledgment::Opaque)
        }
    }

    /// Holds every dispatch until released.
    struct GatedSink {
        entered: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecordSink for GatedSink {
        async fn dispatch(&self, _record: &EvaluationRecord) -> Result<Acknowledgment, SinkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(Acknowledgment::Opaque)
        }
    }

    fn ready_session(criteria: &CriteriaTable, rating: u8) -> SessionState {
        let mut session = SessionState::new(FormDefaults::default());
        session
            .set_candidate(CandidateInfo {
                name: "Jane Roe".to_string(),
                mobile: "+971 50 123 4567".to_string(),
                position: "Sales Executive".to_string(),
                interviewer: "Ahmed".to_string(),
                date: "2026-10-20".to_string(),
                time: "10:30".to_string(),
                current_salary: "50,000".to_string(),
                expected_salary: "65,000".to_string(),
                notice_period: "Other".to_string(),
                custom_notice_period: "45 days".to_string(),
            })
            .unwrap();
        for c in criteria.iter() {
            session.set_score(criteria, &c.id, rating).unwrap();
        }
        session.set_comments("Clear and confident".to_string()).unwrap();
        session
    }

    #[tokio::test]
    async fn test_successful_submit_dispatches_one_record() {
        let criteria = CriteriaTable::default();
        let mut state = ready_session(&criteria, 5);
        let resume =
            ResumeFile::spool("jane.pdf".to_string(), Bytes::from_static(b"%PDF-1.7")).unwrap();
        state.attach_resume(resume).unwrap();
        let session = Mutex::new(state);
        let sink = FakeSink::default();

        let receipt = submit(&session, &criteria, &sink).await.unwrap();
        assert_eq!(receipt.weighted_score, "100.00%");
        assert_eq!(receipt.performance_impression, FitLabel::StrongFit);
        assert_eq!(receipt.acknowledgment, Acknowledgment::Opaque);
        assert_eq!(session.lock().await.phase, SubmissionPhase::Success);

        let records = sink.records.lock().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].notice_period, "45 days");
        assert_eq!(records[0].cv_file, "JVBERi0xLjc=");
        assert_eq!(records[0].cv_file_name, "jane.pdf");
    }

    #[tokio::test]
    async fn test_incomplete_assessment_sends_nothing() {
        let criteria = CriteriaTable::default();
        let mut state = ready_session(&criteria, 3);
        state.scores.remove("business");
        let session = Mutex::new(state);
        let sink = FakeSink::default();

        let err = submit(&session, &criteria, &sink).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Session(SessionError::IncompleteAssessment { scored: 5, total: 6 })
        ));
        assert!(sink.records.lock().await.is_empty());
        assert_eq!(session.lock().await.phase, SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn test_unreadable_resume_fails_before_dispatch() {
        let criteria = CriteriaTable::default();
        let mut state = ready_session(&criteria, 4);
        let resume =
            ResumeFile::spool("jane.pdf".to_string(), Bytes::from_static(b"%PDF")).unwrap();
        std::fs::remove_file(resume.path()).unwrap();
        state.attach_resume(resume).unwrap();
        let session = Mutex::new(state);
        let sink = FakeSink::default();

        let err = submit(&session, &criteria, &sink).await.unwrap_err();
        assert!(matches!(err, SubmitError::FileRead(_)));
        assert!(sink.records.lock().await.is_empty());

        let state = session.lock().await;
        assert_eq!(state.phase, SubmissionPhase::Failed);
        assert!(state.last_error.is_some());
    }

    #[tokio::test]
    async fn test_transport_failure_allows_resubmission() {
        let criteria = CriteriaTable::default();
        let session = Mutex::new(ready_session(&criteria, 3));

        let failing = FakeSink {
            fail: true,
            ..FakeSink::default()
        };
        let err = submit(&session, &criteria, &failing).await.unwrap_err();
        assert!(matches!(err, SubmitError::Transport(SinkError::Timeout)));
        assert_eq!(session.lock().await.phase, SubmissionPhase::Failed);

        let working = FakeSink::default();
        let receipt = submit(&session, &criteria, &working).await.unwrap();
        assert_eq!(receipt.performance_impression, FitLabel::AverageFit);
        assert_eq!(working.records.lock().await.len(), 1);
        assert_eq!(session.lock().await.phase, SubmissionPhase::Success);
    }

    #[tokio::test]
    async fn test_concurrent_submit_is_rejected_while_in_flight() {
        let criteria = Arc::new(CriteriaTable::default());
        let session = Arc::new(Mutex::new(ready_session(&criteria, 4)));
        let sink = Arc::new(GatedSink {
            entered: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        });

        let first = {
            let (session, criteria, sink) = (session.clone(), criteria.clone(), sink.clone());
            tokio::spawn(async move { submit(&session, &criteria, sink.as_ref()).await })
        };
        sink.entered.notified().await;
        assert_eq!(session.lock().await.phase, SubmissionPhase::Submitting);

        let second = submit(&session, &criteria, sink.as_ref()).await.unwrap_err();
        assert!(matches!(
            second,
            SubmitError::Session(SessionError::SubmissionInFlight)
        ));

        sink.release.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.lock().await.phase, SubmissionPhase::Success);
    }

    async fn wait_until_settled(session: &Mutex<SessionState>) -> SubmissionPhase {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let phase = session.lock().await.phase;
                if phase != SubmissionPhase::Submitting {
                    return phase;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("submission never left Submitting")
    }

    #[tokio::test]
    async fn test_abandoned_detached_submit_still_settles() {
        let criteria = Arc::new(CriteriaTable::default());
        let session = Arc::new(Mutex::new(ready_session(&criteria, 4)));
        let sink = Arc::new(GatedSink {
            entered: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        });

        // The caller gives up while the dispatch is still in flight.
        let abandoned = tokio::time::timeout(
            Duration::from_millis(50),
            submit_detached(session.clone(), criteria.clone(), sink.clone()),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(session.lock().await.phase, SubmissionPhase::Submitting);

        sink.release.notify_one();
        assert_eq!(wait_until_settled(&session).await, SubmissionPhase::Success);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
        assert!(session.lock().await.reset().is_ok());
    }

    /// Panics mid-dispatch.
    struct PanickingSink;

    #[async_trait]
    impl RecordSink for PanickingSink {
        async fn dispatch(&self, _record: &EvaluationRecord) -> Result<Acknowledgment, SinkError> {
            panic!("sink blew up");
        }
    }

    #[tokio::test]
    async fn test_crashed_submit_task_leaves_session_resubmittable() {
        let criteria = Arc::new(CriteriaTable::default());
        let session = Arc::new(Mutex::new(ready_session(&criteria, 4)));

        let err = submit_detached(session.clone(), criteria.clone(), Arc::new(PanickingSink))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Aborted(_)));
        assert_eq!(session.lock().await.phase, SubmissionPhase::Failed);

        let working = Arc::new(FakeSink::default());
        let receipt = submit_detached(session.clone(), criteria.clone(), working.clone())
            .await
            .unwrap();
        assert_eq!(receipt.performance_impression, FitLabel::GoodFit);
        assert_eq!(working.records.lock().await.len(), 1);
        assert!(session.lock().await.reset().is_ok());
    }
}
