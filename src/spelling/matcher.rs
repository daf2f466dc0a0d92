//! Ranking dictionary candidates by edit distance to a query.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::spelling::levenshtein::{Strategy, levenshtein_distance_threshold};

/// Configuration for [`FuzzyMatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Largest edit distance a candidate may have to be reported.
    pub max_distance: usize,

    /// Maximum number of matches returned, `None` for all.
    pub limit: Option<usize>,

    /// Candidate count at which scoring switches to the rayon pool.
    pub parallel_threshold: usize,

    /// Layout used by [`FuzzyMatcher::distance`].
    pub strategy: Strategy,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            max_distance: 2,
            limit: None,
            parallel_threshold: 4096,
            strategy: Strategy::default(),
        }
    }
}

/// A candidate within the distance bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FuzzyMatch {
    /// Edit distance to the query.
    pub distance: usize,
    /// Position of the candidate in the scored slice.
    pub index: usize,
}

/// Scores candidate words against a fixed query.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    query: String,
    config: MatcherConfig,
}

impl FuzzyMatcher {
    pub fn new<S: Into<String>>(query: S, config: MatcherConfig) -> Self {
        FuzzyMatcher {
            query: query.into(),
            config,
        }
    }

    /// The query string candidates are scored against.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Full edit distance to a candidate.
    pub fn distance(&self, candidate: &str) -> Result<usize> {
        self.config.strategy.str_distance(&self.query, candidate)
    }

    /// Distance to a candidate if it is within `max_distance`.
    pub fn score(&self, candidate: &str) -> Result<Option<usize>> {
        levenshtein_distance_threshold(&self.query, candidate, self.config.max_distance)
    }

    /// Check if a candidate is within `max_distance`.
    pub fn is_match(&self, candidate: &str) -> Result<bool> {
        Ok(self.score(candidate)?.is_some())
    }

    /// Matches among `candidates`, closest first; ties keep candidate order.
    pub fn find<S: AsRef<str> + Sync>(&self, candidates: &[S]) -> Result<Vec<FuzzyMatch>> {
        let score_at = |(index, candidate): (usize, &S)| -> Result<Option<FuzzyMatch>> {
            Ok(self
                .score(candidate.as_ref())?
                .map(|distance| FuzzyMatch { distance, index }))
        };

        let scored: Vec<Option<FuzzyMatch>> = if candidates.len() >= self.config.parallel_threshold
        {
            candidates.par_iter().enumerate().map(score_at).collect::<Result<_>>()?
        } else {
            candidates.iter().enumerate().map(score_at).collect::<Result<_>>()?
        };

        let mut matches: Vec<FuzzyMatch> = scored.into_iter().flatten().collect();
        matches.sort_unstable();
        if let Some(limit) = self.config.limit {
            matches.truncate(limit);
        }

        debug!(
            query = %self.query,
            candidates = candidates.len(),
            matches = matches.len(),
            "fuzzy match"
        );
        Ok(matches)
    }

    /// Matching candidate words with their distances, closest first.
    pub fn find_words<'a, S: AsRef<str> + Sync>(
        &self,
        candidates: &'a [S],
    ) -> Result<Vec<(&'a str, usize)>> {
        Ok(self
            .find(candidates)?
            .into_iter()
            .map(|m| (candidates[m.index].as_ref(), m.distance))
            .collect())
    }

    /// The closest candidate, if any is within `max_distance`.
    pub fn best<S: AsRef<str> + Sync>(&self, candidates: &[S]) -> Result<Option<FuzzyMatch>> {
        Ok(self.find(candidates)?.into_iter().next())
    }
}
