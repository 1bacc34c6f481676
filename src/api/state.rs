use chrono::{DateTime, Utc};

use crate::service::PlayerService;

#[derive(Clone)]
pub struct AppState {
    pub service: PlayerService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: PlayerService) -> Self {
        Self {
            service,
            started_at: Utc::now(),
        }
    }
}
