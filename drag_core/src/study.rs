//! # Study Document
//!
//! A `DragStudy` is everything needed to reproduce a build-up apart from
//! the vehicle and its geometry snapshot. Studies serialize to `.dbu`
//! files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! DragStudy
//! ├── meta: StudyMetadata (version, name, timestamps)
//! ├── settings: BuildUpSettings (Sref, reference wing, correlations, units)
//! ├── flow: FlowCondition (freestream inputs)
//! └── excrescences: Vec<ExcrescenceSpec> (label, kind, raw input)
//! ```
//!
//! Only the raw excrescence inputs are stored. Loading replays them through
//! [`ExcrescenceLedger::add`](crate::calculations::ExcrescenceLedger::add),
//! so a hand-edited file with two margin items still loads with one.
//!
//! ## Example
//!
//! ```rust
//! use drag_core::calculations::ExcrescenceKind;
//! use drag_core::study::DragStudy;
//!
//! let mut study = DragStudy::new("Baseline cruise");
//! study.add_excrescence("Antenna", ExcrescenceKind::Count, 2.0);
//!
//! let build_up = study.into_build_up().unwrap();
//! assert_eq!(build_up.excrescences.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::{BuildUpSettings, DragBuildUp, ExcrescenceKind};
use crate::errors::DragResult;
use crate::flow::FlowCondition;

/// Current schema version for .dbu files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root study container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragStudy {
    pub meta: StudyMetadata,

    #[serde(default)]
    pub settings: BuildUpSettings,

    #[serde(default)]
    pub flow: FlowCondition,

    /// Excrescence inputs in ledger order
    #[serde(default)]
    pub excrescences: Vec<ExcrescenceSpec>,
}

/// Study metadata stored in the file header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub name: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Persisted form of one excrescence item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcrescenceSpec {
    pub label: String,
    pub kind: ExcrescenceKind,
    pub input: f64,
}

impl DragStudy {
    /// Create an empty study with default settings
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        DragStudy {
            meta: StudyMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                created: now,
                modified: now,
            },
            settings: BuildUpSettings::default(),
            flow: FlowCondition::default(),
            excrescences: Vec::new(),
        }
    }

    /// Capture the persisted part of a build-up.
    ///
    /// Derived ledger amounts are not stored; they are recomputed on load.
    pub fn from_build_up(name: impl Into<String>, build_up: &DragBuildUp) -> Self {
        let mut study = DragStudy::new(name);
        study.settings = build_up.settings.clone();
        study.flow = build_up.flow.clone();
        study.excrescences = build_up
            .excrescences
            .items()
            .iter()
            .map(|e| ExcrescenceSpec {
                label: e.label.clone(),
                kind: e.kind,
                input: e.input,
            })
            .collect();
        study
    }

    /// Rebuild a build-up, replaying every excrescence through the ledger.
    ///
    /// Fails if the settings or an excrescence input are out of range.
    pub fn into_build_up(&self) -> DragResult<DragBuildUp> {
        self.settings.validate()?;
        self.flow.validate()?;

        let mut build_up = DragBuildUp::new(self.settings.clone(), self.flow.clone());
        for spec in &self.excrescences {
            build_up
                .excrescences
                .add(Some(spec.label.as_str()), spec.kind, spec.input, self.settings.sref)?;
        }
        Ok(build_up)
    }

    /// Append an excrescence input
    pub fn add_excrescence(&mut self, label: impl Into<String>, kind: ExcrescenceKind, input: f64) {
        self.excrescences.push(ExcrescenceSpec {
            label: label.into(),
            kind,
            input,
        });
        self.touch();
    }

    /// Update the modified timestamp
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for DragStudy {
    fn default() -> Self {
        DragStudy::new("")
    }
}
