use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateExtractionConfidence {
    High,
    Medium,
    Low,
}

/// Reconciled commencement/completion window for the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDateBounds {
    pub commencement_date: Option<String>,
    pub commencement_time: Option<String>,
    pub completion_date: Option<String>,
    pub completion_time: Option<String>,
    pub commencement_iso: Option<DateTime<Utc>>,
    pub completion_iso: Option<DateTime<Utc>>,
    pub extraction_confidence: DateExtractionConfidence,
    pub source_page_number: Option<u32>,
}

impl BatchDateBounds {
    pub fn empty() -> Self {
        Self {
            commencement_date: None,
            commencement_time: None,
            completion_date: None,
            completion_time: None,
            commencement_iso: None,
            completion_iso: None,
            extraction_confidence: DateExtractionConfidence::Low,
            source_page_number: None,
        }
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.commencement_iso.is_some() && self.completion_iso.is_some()
    }
}
