//! Totals and percentages derived from a [`ResultRecord`].

use std::collections::BTreeMap;

use crate::error::{HarvesterError, Result};
use crate::types::ResultRecord;

impl ResultRecord {
    /// Sum of all tallies; 0 for a record without candidates.
    ///
    /// Saturates at `u64::MAX`. Decoded records never get there, since
    /// [`decode`](crate::decode::decode) rejects overflowing documents.
    #[must_use]
    pub fn total_votes(&self) -> u64 {
        self.tallies()
            .values()
            .fold(0, |total: u64, votes| total.saturating_add(*votes))
    }

    /// Share of the total for every listed candidate, in percent.
    ///
    /// # Errors
    /// `NoVotes` when the total is zero, since every share would be undefined.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeMap;
    /// use volby_harvester::ResultRecord;
    ///
    /// let record = ResultRecord::new("CZ010", "Praha", BTreeMap::from([(1, 100), (2, 300)]));
    /// let pct = record.percentages().unwrap();
    /// assert_eq!(pct[&1], 25.0);
    /// assert_eq!(pct[&2], 75.0);
    /// ```
    pub fn percentages(&self) -> Result<BTreeMap<u32, f64>> {
        let total = self.total_votes();
        if total == 0 {
            return Err(HarvesterError::NoVotes {
                region: self.region_id().to_string(),
            });
        }

        let total = total as f64;
        Ok(self
            .tallies()
            .iter()
            .map(|(ordinal, votes)| (*ordinal, *votes as f64 / total * 100.0))
            .collect())
    }

    /// Candidate with the most votes, lowest ordinal on a tie.
    ///
    /// `None` when no candidate is listed.
    #[must_use]
    pub fn leader(&self) -> Option<(u32, u64)> {
        self.tallies()
            .iter()
            .fold(None, |best: Option<(u32, u64)>, (ordinal, votes)| match best {
                Some((_, best_votes)) if best_votes >= *votes => best,
                _ => Some((*ordinal, *votes)),
            })
    }
}
