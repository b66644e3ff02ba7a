use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::core::input::MappingInput;

/// Metadata key: the identifier matcher recognized the model but none of its capacities
pub const META_CAPACITY_MISSING: &str = "capacity_missing_for_model";
/// Metadata key: model ids recognized by hardware identifier
pub const META_RECOGNIZED_MODELS: &str = "recognized_model_ids";
/// Metadata key: capacities (GB) the recognized models do have
pub const META_AVAILABLE_CAPACITIES: &str = "available_capacities_gb";
/// Metadata key: rule that emptied the candidate set
pub const META_ELIMINATED_BY: &str = "eliminated_by_rule";
/// Metadata key: matcher that produced the candidate set
pub const META_MATCHER: &str = "matcher";

/// Stage of the mapping pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Start,
    Extracting,
    Enriching,
    Matching,
    Filtering,
    Selecting,
    Success,
    NoMatch,
    /// Tied candidates the tie-break could not order
    Ambiguous,
    Error,
}

impl PipelineStage {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::NoMatch | Self::Ambiguous | Self::Error)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Extracting => "extracting",
            Self::Enriching => "enriching",
            Self::Matching => "matching",
            Self::Filtering => "filtering",
            Self::Selecting => "selecting",
            Self::Success => "success",
            Self::NoMatch => "no_match",
            Self::Ambiguous => "ambiguous",
            Self::Error => "error",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// One entry of the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub stage: PipelineStage,
    pub message: String,
}

/// Per-invocation state threaded through every stage of one mapping.
///
/// Owned by exactly one engine call; never shared between concurrent mappings.
#[derive(Debug, Clone, Serialize)]
pub struct MappingContext {
    input: MappingInput,
    stage: PipelineStage,
    entries: Vec<LogEntry>,
    metadata: BTreeMap<String, Value>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl MappingContext {
    pub fn new(input: MappingInput) -> Self {
        Self {
            input,
            stage: PipelineStage::Start,
            entries: Vec::new(),
            metadata: BTreeMap::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn input(&self) -> &MappingInput {
        &self.input
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Move to `stage`, recording the transition
    pub fn enter(&mut self, stage: PipelineStage) {
        self.stage = stage;
        self.push(Severity::Debug, format!("entered stage {stage}"));
        if stage.is_terminal() && self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.push(Severity::Debug, message.into());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    fn push(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Debug => tracing::debug!(stage = %self.stage, "{message}"),
            Severity::Info => tracing::info!(stage = %self.stage, "{message}"),
            Severity::Warning => tracing::warn!(stage = %self.stage, "{message}"),
            Severity::Error => tracing::error!(stage = %self.stage, "{message}"),
        }
        self.entries.push(LogEntry {
            timestamp: Utc::now(),
            severity,
            stage: self.stage,
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn set_metadata(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn metadata_map(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// True when `key` holds boolean `true`
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.metadata
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Milliseconds from start to finish (or to now, while still running)
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds()
    }
}
