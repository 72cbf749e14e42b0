use crate::evaluation::scorer::{format_percentage, summarize};
use crate::models::candidate::CandidateInfo;
use crate::models::criteria::CriteriaTable;
use crate::models::record::{EvaluationRecord, ScoreSet, NO_CV_FILE_NAME};

/// Merges the session inputs into one outgoing record. Inputs are only read.
///
/// `encoded_file` and `file_name` are `None` when no résumé was attached; the
/// record then carries an empty `cvFile` and the "No CV" placeholder name.
/// Only ratings for criteria in the table are copied over.
pub fn build_record(
    candidate: &CandidateInfo,
    scores: &ScoreSet,
    comments: &str,
    encoded_file: Option<&str>,
    file_name: Option<&str>,
    criteria: &CriteriaTable,
) -> EvaluationRecord {
    let summary = summarize(scores, criteria);

    let scores = criteria
        .iter()
        .filter_map(|c| scores.get(&c.id).map(|r| (c.id.clone(), *r)))
        .collect();

    EvaluationRecord {
        candidate_name: candidate.name.clone(),
        candidate_mobile: candidate.mobile.clone(),
        position: candidate.position.clone(),
        interviewer: candidate.interviewer.clone(),
        interview_date: candidate.date.clone(),
        interview_time: candidate.time.clone(),
        current_salary: candidate.current_salary.clone(),
        expected_salary: candidate.expected_salary.clone(),
        notice_period: candidate.resolved_notice_period().to_string(),
        cv_file: encoded_file.unwrap_or_default().to_string(),
        cv_file_name: file_name.unwrap_or(NO_CV_FILE_NAME).to_string(),
        scores,
        weighted_score: format_percentage(summary.weighted_percentage),
        performance_impression: summary.fit,
        comments: comments.to_string(),
    }
}
