// src/model.rs
//! Extracted study records and the snapshot they are persisted in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ident::StudyId;

/// Data-type label → total sample count, for one substudy.
pub type SequenceCount = BTreeMap<String, u64>;

/// One component study whose counts roll up into its parent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstudyRecord {
    pub id: StudyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub seqs: SequenceCount,
}

impl SubstudyRecord {
    pub fn new(id: StudyId) -> Self {
        Self { id, name: None, seqs: SequenceCount::new() }
    }

    /// Sum over labels mentioning "whole genome".
    pub fn wgs(&self) -> u64 {
        self.sum_matching("whole genome")
    }

    /// Sum over labels mentioning "whole exome".
    pub fn wes(&self) -> u64 {
        self.sum_matching("whole exome")
    }

    fn sum_matching(&self, needle: &str) -> u64 {
        self.seqs
            .iter()
            .filter(|(label, _)| label.to_lowercase().contains(needle))
            .fold(0, |acc, (_, n)| acc.saturating_add(*n))
    }
}

/// Everything extracted for one study at its newest known version.
///
/// `seqs` is keyed by substudy base id. A study without true substudies keys
/// its own base id there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    pub id: StudyId,
    pub name: String,
    #[serde(default)]
    pub consent_groups: Vec<String>,
    pub seqs: BTreeMap<String, SubstudyRecord>,
}

impl StudyRecord {
    pub fn base(&self) -> &str { self.id.base() }

    pub fn version(&self) -> u32 { self.id.version() }

    /// The only substudy is the study itself.
    pub fn is_self_substudy(&self) -> bool {
        self.seqs.len() == 1 && self.seqs.contains_key(self.id.base())
    }

    /// Has at least one sequence count of interest.
    pub fn is_reportable(&self) -> bool {
        self.seqs.values().any(|sub| !sub.seqs.is_empty())
    }

    pub fn wgs(&self) -> u64 {
        self.seqs.values().fold(0, |acc, sub| acc.saturating_add(sub.wgs()))
    }

    pub fn wes(&self) -> u64 {
        self.seqs.values().fold(0, |acc, sub| acc.saturating_add(sub.wes()))
    }
}

/// The complete set of records from one run, in collection order.
pub type Snapshot = Vec<StudyRecord>;

/// What changed between two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub new_studies: Vec<StudyRecord>,
    pub updated_studies: Vec<StudyRecord>,
}
