use serde::{Deserialize, Serialize};

use crate::config::FormDefaults;

/// Notice-period option that defers to the free-text override.
pub const NOTICE_PERIOD_OTHER: &str = "Other";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateInfo {
    pub name: String,
    pub mobile: String,
    pub position: String,
    pub interviewer: String,
    pub date: String,
    pub time: String,
    pub current_salary: String,
    pub expected_salary: String,
    pub notice_period: String,
    /// Used instead of `notice_period` when that is "Other".
    pub custom_notice_period: String,
}

impl CandidateInfo {
    pub fn with_defaults(defaults: &FormDefaults) -> Self {
        Self {
            position: defaults.position.clone(),
            interviewer: defaults.interviewer.clone(),
            notice_period: defaults.notice_period.clone(),
            ..Self::default()
        }
    }

    /// The notice period as it goes out on the wire.
    pub fn resolved_notice_period(&self) -> &str {
        if self.notice_period == NOTICE_PERIOD_OTHER {
            &self.custom_notice_period
        } else {
            &self.notice_period
        }
    }

    /// Names of required fields that are blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let required = [
            ("name", &self.name),
            ("mobile", &self.mobile),
            ("position", &self.position),
            ("interviewer", &self.interviewer),
            ("date", &self.date),
            ("time", &self.time),
            ("current_salary", &self.current_salary),
            ("expected_salary", &self.expected_salary),
            ("notice_period", &self.notice_period),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                missing.push(field);
            }
        }
        if self.notice_period == NOTICE_PERIOD_OTHER && self.custom_notice_period.trim().is_empty()
        {
            missing.push("custom_notice_period");
        }
        missing
    }
}
