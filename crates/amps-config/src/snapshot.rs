//! Session snapshots: the wizard state saved between sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::migrate::LATEST_VERSION;
use crate::schema::RunConfiguration;
use crate::step::WizardStep;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub step: WizardStep,
    pub config: RunConfiguration,
}

impl SessionSnapshot {
    pub fn new(config: RunConfiguration) -> Self {
        Self {
            version: LATEST_VERSION,
            saved_at: Utc::now(),
            step: WizardStep::default(),
            config,
        }
    }
}
