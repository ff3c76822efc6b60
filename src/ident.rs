// src/ident.rs
//! Versioned study identifiers: `phs<digits>.v<int>.p<int>`.
//!
//! Parsing is pure. A string that does not match the whole pattern parses to
//! `None`, never to a half-filled value.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static VERSIONED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(phs\d+)\.v(\d+)\.p(\d+)$").unwrap());

static BASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^phs\d+$").unwrap());

/// A fully versioned study id, e.g. `phs1234567.v8.p1`.
///
/// Serialized as `{"full", "part", "version"}`; the participant version is
/// recovered from `full` on load.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StudyIdRepr", into = "StudyIdRepr")]
pub struct StudyId {
    full: String,
    base: String,
    version: u32,
    participant: u32,
}

impl StudyId {
    /// Parse a versioned id. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let caps = VERSIONED.captures(raw)?;
        let version: u32 = caps[2].parse().ok()?;
        let participant: u32 = caps[3].parse().ok()?;
        if version == 0 || participant == 0 {
            return None;
        }
        Some(Self {
            full: s!(raw),
            base: s!(&caps[1]),
            version,
            participant,
        })
    }

    /// The whole id exactly as it was parsed.
    pub fn full(&self) -> &str { &self.full }

    /// The unversioned id, stable across releases (`phs1234567`).
    pub fn base(&self) -> &str { &self.base }

    pub fn version(&self) -> u32 { self.version }

    pub fn participant_version(&self) -> u32 { self.participant }
}

impl fmt::Display for StudyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// `(base, version, participant_version)` of a versioned id, if it is one.
pub fn parse(raw: &str) -> Option<(String, u32, u32)> {
    StudyId::parse(raw).map(|id| (id.base, id.version, id.participant))
}

/// Version number of a versioned id, if it is one.
pub fn version_of(raw: &str) -> Option<u32> {
    StudyId::parse(raw).map(|id| id.version)
}

/// True for a bare unversioned id such as `phs000007`.
pub fn is_base_id(raw: &str) -> bool {
    BASE.is_match(raw.trim())
}

#[derive(Serialize, Deserialize)]
struct StudyIdRepr {
    full: String,
    part: String,
    version: u32,
}

impl TryFrom<StudyIdRepr> for StudyId {
    type Error = String;

    fn try_from(repr: StudyIdRepr) -> Result<Self, Self::Error> {
        let id = StudyId::parse(&repr.full)
            .ok_or_else(|| format!("not a versioned study id: {}", repr.full))?;
        if id.base != repr.part || id.version != repr.version {
            return Err(format!(
                "study id fields disagree: {} vs part={} version={}",
                repr.full, repr.part, repr.version
            ));
        }
        Ok(id)
    }
}

impl From<StudyId> for StudyIdRepr {
    fn from(id: StudyId) -> Self {
        Self { full: id.full, part: id.base, version: id.version }
    }
}
