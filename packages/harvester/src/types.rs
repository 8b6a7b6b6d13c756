//! Core data types for the harvester.
//!
//! These types represent one region's election results, the candidates on
//! the ballot, and the name-keyed views handed to presentation.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::error::{HarvesterError, Result};

/// Decoded results of one region or sub-region.
///
/// Immutable once constructed. Vote counts are unsigned, so every tally is
/// non-negative by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    region_id: String,
    region_name: String,
    tallies: BTreeMap<u32, u64>,
}

impl ResultRecord {
    pub fn new(
        region_id: impl Into<String>,
        region_name: impl Into<String>,
        tallies: BTreeMap<u32, u64>,
    ) -> Self {
        Self {
            region_id: region_id.into(),
            region_name: region_name.into(),
            tallies,
        }
    }

    /// NUTS code of the region (e.g. "CZ010" or "CZ0100" for a district).
    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    /// Human-readable region name, for display only.
    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    /// Candidate ordinal to vote count.
    ///
    /// A candidate may be absent if the region's report did not list them.
    pub fn tallies(&self) -> &BTreeMap<u32, u64> {
        &self.tallies
    }

    /// Votes recorded for one candidate, if listed.
    pub fn votes(&self, ordinal: u32) -> Option<u64> {
        self.tallies.get(&ordinal).copied()
    }
}

/// Candidate ordinals and display names, in ballot display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRegistry {
    entries: Vec<(u32, String)>,
}

impl CandidateRegistry {
    /// Build a registry; iteration follows the order of `entries`.
    ///
    /// # Errors
    /// `DuplicateCandidate` if an ordinal appears twice.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut collected = Vec::new();
        for (ordinal, name) in entries {
            if !seen.insert(ordinal) {
                return Err(HarvesterError::DuplicateCandidate(ordinal));
            }
            collected.push((ordinal, name.into()));
        }
        Ok(Self { entries: collected })
    }

    /// Candidates of the first round of the 2023 Czech presidential election.
    ///
    /// Ordinal 3 withdrew before the vote and is not listed.
    pub fn presidential_2023() -> Self {
        Self {
            entries: [
                (1, "Fischer"),
                (2, "Bašta"),
                (4, "Pavel"),
                (5, "Zima"),
                (6, "Nerudová"),
                (7, "Babiš"),
                (8, "Diviš"),
                (9, "Hilšer"),
            ]
            .into_iter()
            .map(|(ordinal, name)| (ordinal, name.to_string()))
            .collect(),
        }
    }

    /// Candidates of the 2023 runoff, keeping their first-round ordinals.
    pub fn presidential_2023_runoff() -> Self {
        Self {
            entries: vec![(4, "Pavel".to_string()), (7, "Babiš".to_string())],
        }
    }

    /// Registry matching the given round of the 2023 election.
    pub fn presidential_2023_round(round: u8) -> Self {
        if round == 2 {
            Self::presidential_2023_runoff()
        } else {
            Self::presidential_2023()
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(ordinal, name)| (*ordinal, name.as_str()))
    }

    /// Display name for an ordinal.
    pub fn name(&self, ordinal: u32) -> Option<&str> {
        self.iter().find(|(o, _)| *o == ordinal).map(|(_, name)| name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One labelled value of a [`DisplayView`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEntry {
    pub name: String,
    pub value: f64,
}

/// Candidate name to value (votes or percent), in registry order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct DisplayView {
    entries: Vec<ViewEntry>,
}

impl DisplayView {
    pub(crate) fn push(&mut self, name: impl Into<String>, value: f64) {
        self.entries.push(ViewEntry {
            name: name.into(),
            value,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.value))
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
