use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-criterion ratings keyed by criterion id.
pub type ScoreSet = BTreeMap<String, u8>;

pub const MAX_RATING: u8 = 5;

/// Placeholder file name sent when no résumé was attached.
pub const NO_CV_FILE_NAME: &str = "No CV";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FitLabel {
    #[serde(rename = "Pending All Scores")]
    Pending,
    #[serde(rename = "Low Fit")]
    LowFit,
    #[serde(rename = "Average Fit")]
    AverageFit,
    #[serde(rename = "Good Fit")]
    GoodFit,
    #[serde(rename = "Strong Fit")]
    StrongFit,
}

impl FitLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            FitLabel::Pending => "Pending All Scores",
            FitLabel::LowFit => "Low Fit",
            FitLabel::AverageFit => "Average Fit",
            FitLabel::GoodFit => "Good Fit",
            FitLabel::StrongFit => "Strong Fit",
        }
    }
}

impl fmt::Display for FitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The flat row posted to the spreadsheet endpoint. Field names match the
/// columns the sheet script reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    pub candidate_name: String,
    pub candidate_mobile: String,
    pub position: String,
    pub interviewer: String,
    pub interview_date: String,
    pub interview_time: String,
    pub current_salary: String,
    pub expected_salary: String,
    pub notice_period: String,
    pub cv_file: String,
    pub cv_file_name: String,
    #[serde(flatten)]
    pub scores: ScoreSet,
    pub weighted_score: String, // "NN.NN%"
    pub performance_impression: FitLabel,
    pub comments: String,
}
