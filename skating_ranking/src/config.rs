// ********* Input data structures ***********

use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;

/// A votable item of a room.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Candidate {
    /// Stable identifier, as stored by the room.
    pub id: String,
    /// Display title.
    pub title: String,
}

/// The position a participant gave to a candidate, as found in the stored ranking.
///
/// Stored rankings are not validated by the room. Anything that is not an integer
/// is kept as `Unparsed` and dropped by the normalizer.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Position {
    Rank(i64),
    Unparsed(String),
}

impl Position {
    /// Reads a position from its textual form. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Position {
        match s.trim().parse::<i64>() {
            Ok(x) => Position::Rank(x),
            Err(_) => Position::Unparsed(s.to_string()),
        }
    }
}

impl From<i64> for Position {
    fn from(x: i64) -> Position {
        Position::Rank(x)
    }
}

/// The ordered choices of one participant, best first.
///
/// Invariant: not empty, and no candidate appears twice.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Ballot {
    candidates: Vec<String>,
}

impl Ballot {
    pub fn new(candidates: Vec<String>) -> Result<Ballot, RankingErrors> {
        if candidates.is_empty() {
            return Err(RankingErrors::EmptyBallot);
        }
        let mut seen: HashSet<&String> = HashSet::new();
        for c in candidates.iter() {
            if !seen.insert(c) {
                return Err(RankingErrors::DuplicateCandidate(c.clone()));
            }
        }
        Ok(Ballot { candidates })
    }

    /// Convenience constructor, mostly for tests and fixtures.
    pub fn from_names(names: &[&str]) -> Result<Ballot, RankingErrors> {
        Ballot::new(names.iter().map(|s| s.to_string()).collect())
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the ballot without the candidates rejected by `keep`.
    /// The remaining candidates move up to close the gaps.
    pub(crate) fn restricted<F: Fn(&str) -> bool>(&self, keep: F) -> Option<Ballot> {
        let candidates: Vec<String> = self
            .candidates
            .iter()
            .filter(|c| keep(c.as_str()))
            .cloned()
            .collect();
        if candidates.is_empty() {
            None
        } else {
            Some(Ballot { candidates })
        }
    }
}

// ******** Output data structures *********

/// A candidate and its final rank, as decided by the skating system.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankedCandidate {
    pub id: String,
    pub rank: u32,
}

/// Statistics for one candidate of the room.
#[derive(PartialEq, Debug, Clone)]
pub struct CandidateStats {
    pub id: String,
    pub title: String,
    pub final_rank: u32,
    /// Mean ballot position, rounded to two decimals. Zero without votes.
    pub average_position: f64,
    pub vote_count: u64,
    /// (rank, number of ballots), ascending by rank. Ranks without votes are omitted.
    pub vote_distribution: Vec<(u32, u64)>,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct RankingResult {
    /// Ascending by final rank.
    pub stats: Vec<CandidateStats>,
}

impl RankingResult {
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CandidateStats> {
        self.stats.iter().find(|cs| cs.id == id)
    }
}

/// Errors when building a ballot by hand.
///
/// The normalizer never produces them: it resolves malformed rankings instead.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RankingErrors {
    EmptyBallot,
    DuplicateCandidate(String),
}

impl Error for RankingErrors {}

impl Display for RankingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingErrors::EmptyBallot => write!(f, "a ballot needs at least one candidate"),
            RankingErrors::DuplicateCandidate(c) => {
                write!(f, "candidate {} appears more than once in the ballot", c)
            }
        }
    }
}
