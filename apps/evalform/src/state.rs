use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::evaluation::invite::InviteTemplate;
use crate::evaluation::session::SessionState;
use crate::models::criteria::CriteriaTable;
use crate::sheet_client::RecordSink;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single evaluation session. Nothing else keeps a copy.
    pub session: Arc<Mutex<SessionState>>,
    /// Read-only after startup.
    pub criteria: Arc<CriteriaTable>,
    /// Default: SheetClient posting to SHEET_ENDPOINT_URL.
    pub sink: Arc<dyn RecordSink>,
    pub invite: InviteTemplate,
    pub max_resume_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config, criteria: CriteriaTable, sink: Arc<dyn RecordSink>) -> Self {
        Self {
            session: Arc::new(Mutex::new(SessionState::new(config.form_defaults.clone()))),
            criteria: Arc::new(criteria),
            sink,
            invite: InviteTemplate {
                base_url: config.invite_base_url.clone(),
                location_url: config.invite_location_url.clone(),
            },
            max_resume_bytes: config.max_resume_bytes,
        }
    }
}
