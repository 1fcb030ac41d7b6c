use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::journey::{Journey, JourneyRecord};
use crate::journey_manager::JourneyManager;
use crate::viewport::ViewportRecord;

/// Everything needed to bring a measurement session back, as plain data.
///
/// The JSON layout is the on-disk format:
/// `{viewport, calibration, journeys, currentJourney}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub viewport: ViewportRecord,
    pub calibration: Calibration,
    pub journeys: Vec<JourneyRecord>,
    pub current_journey: usize,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A snapshot with its journeys turned back into live entities.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredSession {
    pub viewport: ViewportRecord,
    pub calibration: Calibration,
    pub journeys: JourneyManager,
    pub saved_at: Option<DateTime<Utc>>,
}

impl RestoredSession {
    pub fn from_snapshot(snapshot: SessionSnapshot, saved_at: Option<DateTime<Utc>>) -> Self {
        let journeys = snapshot.journeys.into_iter().map(Journey::from).collect();
        Self {
            viewport: snapshot.viewport,
            calibration: snapshot.calibration.sanitized(),
            journeys: JourneyManager::from_parts(journeys, snapshot.current_journey),
            saved_at,
        }
    }
}

/// Durable home of the session snapshot.
pub trait SessionStore {
    /// Replaces whatever was saved before.
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()>;

    /// `Ok(None)` when there is no usable saved session. A record that can
    /// not be parsed counts as no session.
    fn load(&self) -> Result<Option<RestoredSession>>;

    fn has_saved_session(&self) -> bool;

    fn clear(&self) -> Result<()>;
}
