use log::{debug, warn};
use std::collections::HashSet;

pub use crate::config::*;

/// A builder for collecting the rankings of a room.
///
/// Each participant's stored ranking (candidate -> position) is turned into a
/// ballot when it is added. Participants without usable entries do not add a ballot.
///
/// ```
/// pub use skating_ranking::builder::Builder;
/// pub use skating_ranking::{Candidate, Position};
///
/// let mut builder = Builder::new().candidates(&[
///     Candidate { id: "1".to_string(), title: "Tom".to_string() },
///     Candidate { id: "2".to_string(), title: "Felix".to_string() },
/// ]);
///
/// builder.add_ranking(&[
///     ("2".to_string(), Position::Rank(1)),
///     ("1".to_string(), Position::Rank(2)),
/// ]);
///
/// let result = builder.run();
/// assert_eq!(result.stats[0].title, "Felix");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _candidates: Option<Vec<Candidate>>,
    pub(crate) _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _candidates: None,
            _ballots: Vec::new(),
        }
    }

    /// Registers the candidates of the room.
    ///
    /// Without registered candidates, the candidates are inferred from the ballots
    /// and their identifiers double as titles.
    pub fn candidates(self, cands: &[Candidate]) -> Builder {
        Builder {
            _candidates: Some(cands.to_vec()),
            _ballots: self._ballots,
        }
    }

    /// Adds the stored ranking of one participant.
    ///
    /// Entries are sorted by position. Entries sharing a position keep the order in
    /// which they are listed. Entries without an integer position are dropped, as
    /// are repeated candidates after their first entry.
    ///
    /// Returns true if a ballot was added.
    pub fn add_ranking(&mut self, positions: &[(String, Position)]) -> bool {
        match normalize_ranking(positions) {
            Some(ballot) => {
                self._ballots.push(ballot);
                true
            }
            None => false,
        }
    }

    /// Adds a ballot that is already ordered.
    pub fn add_ballot(&mut self, ballot: Ballot) {
        self._ballots.push(ballot);
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self._ballots
    }

    /// Runs the skating system over the ballots collected so far.
    pub fn run(&self) -> RankingResult {
        crate::run_ranking_stats(&self._ballots, &self._candidates)
    }
}

/// Turns a stored ranking into a ballot. Returns None when nothing usable is left.
pub fn normalize_ranking(positions: &[(String, Position)]) -> Option<Ballot> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries: Vec<(&String, i64)> = Vec::new();
    for (cand, pos) in positions.iter() {
        match pos {
            Position::Rank(r) => {
                if seen.insert(cand.as_str()) {
                    entries.push((cand, *r));
                } else {
                    warn!(
                        "normalize_ranking: candidate {:?} listed more than once, keeping the first entry",
                        cand
                    );
                }
            }
            Position::Unparsed(s) => {
                warn!(
                    "normalize_ranking: dropping candidate {:?} with position {:?}",
                    cand, s
                );
            }
        }
    }
    // Stable: equal positions stay in declaration order.
    entries.sort_by_key(|(_, r)| *r);
    debug!("normalize_ranking: sorted entries: {:?}", entries);

    let candidates: Vec<String> = entries.iter().map(|(c, _)| (*c).clone()).collect();
    Ballot::new(candidates).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(xs: &[(&str, Position)]) -> Vec<(String, Position)> {
        xs.iter().map(|(c, p)| (c.to_string(), p.clone())).collect()
    }

    fn names(b: &Ballot) -> Vec<&str> {
        b.candidates().iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn sorts_by_position() {
        let b = normalize_ranking(&entries(&[
            ("c", Position::Rank(30)),
            ("a", Position::Rank(-2)),
            ("b", Position::Rank(7)),
        ]))
        .unwrap();
        assert_eq!(names(&b), vec!["a", "b", "c"]);
    }

    #[test]
    fn equal_positions_keep_declaration_order() {
        let b = normalize_ranking(&entries(&[
            ("z", Position::Rank(2)),
            ("y", Position::Rank(1)),
            ("x", Position::Rank(2)),
        ]))
        .unwrap();
        assert_eq!(names(&b), vec!["y", "z", "x"]);
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let b = normalize_ranking(&entries(&[
            ("a", Position::Unparsed("first".to_string())),
            ("b", Position::Rank(2)),
            ("c", Position::Rank(1)),
            ("b", Position::Rank(0)),
        ]))
        .unwrap();
        assert_eq!(names(&b), vec!["c", "b"]);
    }

    #[test]
    fn empty_ranking_adds_no_ballot() {
        let mut builder = Builder::new();
        assert!(!builder.add_ranking(&[]));
        assert!(!builder.add_ranking(&entries(&[(
            "a",
            Position::Unparsed("".to_string())
        )])));
        assert!(builder.ballots().is_empty());
        assert!(builder.run().is_empty());
    }

    #[test]
    fn builder_runs_with_registered_candidates() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut builder = Builder::new().candidates(&[
            Candidate {
                id: "a".to_string(),
                title: "Alice".to_string(),
            },
            Candidate {
                id: "b".to_string(),
                title: "Bob".to_string(),
            },
        ]);
        assert!(builder.add_ranking(&entries(&[
            ("b", Position::Rank(2)),
            ("a", Position::Rank(1)),
        ])));
        let res = builder.run();
        let ranks: Vec<(&str, u32)> = res
            .stats
            .iter()
            .map(|cs| (cs.title.as_str(), cs.final_rank))
            .collect();
        assert_eq!(ranks, vec![("Alice", 1), ("Bob", 2)]);
    }
}
