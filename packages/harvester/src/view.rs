//! Name-keyed views of a record for presentation.

use std::collections::BTreeMap;

use crate::error::{HarvesterError, Result};
use crate::types::{CandidateRegistry, DisplayView, ResultRecord};

/// Build a view in registry order with vote counts or percentages.
///
/// Every registry candidate must be present in the record; a missing entry is
/// an error rather than a zero.
///
/// # Errors
/// * `MissingCandidateData` when a registry ordinal has no tally
/// * `NoVotes` when percentages are requested for a record without votes
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use volby_harvester::{build_view, CandidateRegistry, ResultRecord};
///
/// let record = ResultRecord::new("CZ010", "Praha", BTreeMap::from([(1, 100), (2, 300)]));
/// let registry = CandidateRegistry::new([(1, "A"), (2, "B")]).unwrap();
///
/// let view = build_view(&record, &registry, true).unwrap();
/// assert_eq!(view.get("A"), Some(25.0));
/// assert_eq!(view.get("B"), Some(75.0));
/// ```
pub fn build_view(
    record: &ResultRecord,
    registry: &CandidateRegistry,
    use_percentages: bool,
) -> Result<DisplayView> {
    let source: BTreeMap<u32, f64> = if use_percentages {
        record.percentages()?
    } else {
        record
            .tallies()
            .iter()
            .map(|(ordinal, votes)| (*ordinal, *votes as f64))
            .collect()
    };

    let mut view = DisplayView::default();
    for (ordinal, name) in registry.iter() {
        let value = source
            .get(&ordinal)
            .copied()
            .ok_or_else(|| HarvesterError::MissingCandidateData {
                region: record.region_id().to_string(),
                candidate: name.to_string(),
                ordinal,
            })?;
        view.push(name, value);
    }

    Ok(view)
}
