mod config;

pub mod builder;
pub mod manual;

use log::{debug, info};

use std::{
    cmp::Reverse,
    collections::{BTreeSet, HashMap, HashSet},
    ops::AddAssign,
};

pub use crate::config::*;

// **** Private structures ****

// Index into the sorted candidates of a placement table.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CandidateId(u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl std::iter::Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.map(|vc| vc.0).sum())
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

/// The earliest rank at which the ballots of a candidate form a majority.
// Variant order matters: every reached rank sorts before Unreached.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
enum MajorityRank {
    Reached(u32),
    Unreached,
}

#[derive(Eq, PartialEq, Debug, Clone, PartialOrd, Ord, Hash)]
struct TieBreakKey {
    majority: MajorityRank,
    // Counts at ranks 1..=max_rank. Reversed: more votes at an earlier rank sort first.
    placements: Vec<Reverse<VoteCount>>,
}

/// How many ballots placed each candidate at each rank.
///
/// Candidates are the ones found in the ballots, sorted by identifier.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PlacementTable {
    candidates: Vec<String>,
    // placements[cid][r - 1] is the number of ballots placing cid at rank r.
    // Every row has max_rank entries.
    placements: Vec<Vec<VoteCount>>,
    max_rank: u32,
}

impl PlacementTable {
    pub fn from_ballots(ballots: &[Ballot]) -> PlacementTable {
        let universe: BTreeSet<&String> = ballots
            .iter()
            .flat_map(|b| b.candidates().iter())
            .collect();
        let candidates: Vec<String> = universe.into_iter().cloned().collect();
        let max_rank = ballots.iter().map(|b| b.len()).max().unwrap_or(0);

        let mut placements: Vec<Vec<VoteCount>> =
            vec![vec![VoteCount::EMPTY; max_rank]; candidates.len()];
        {
            let ids: HashMap<&str, CandidateId> = candidates
                .iter()
                .enumerate()
                .map(|(idx, c)| (c.as_str(), CandidateId(idx as u32)))
                .collect();
            for b in ballots.iter() {
                for (idx, c) in b.candidates().iter().enumerate() {
                    if let Some(cid) = ids.get(c.as_str()) {
                        placements[cid.0 as usize][idx] += VoteCount(1);
                    }
                }
            }
        }

        PlacementTable {
            candidates,
            placements,
            max_rank: max_rank as u32,
        }
    }

    /// The candidates appearing in at least one ballot, sorted by identifier.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The length of the longest ballot.
    pub fn max_rank(&self) -> u32 {
        self.max_rank
    }

    /// The number of ballots listing this candidate.
    pub fn appearances(&self, id: &str) -> u64 {
        self.cid(id).map(|cid| self.appearances_cid(cid).0).unwrap_or(0)
    }

    /// (rank, count) for every rank the candidate received, ascending by rank.
    pub fn distribution(&self, id: &str) -> Vec<(u32, u64)> {
        match self.cid(id) {
            Some(cid) => self
                .row(cid)
                .iter()
                .enumerate()
                .filter(|(_, vc)| **vc > VoteCount::EMPTY)
                .map(|(idx, vc)| (idx as u32 + 1, vc.0))
                .collect(),
            None => vec![],
        }
    }

    /// The mean position of the candidate in the ballots listing it.
    pub fn average_position(&self, id: &str) -> Option<f64> {
        let cid = self.cid(id)?;
        let appearances = self.appearances_cid(cid);
        if appearances == VoteCount::EMPTY {
            return None;
        }
        let total: u64 = self
            .row(cid)
            .iter()
            .enumerate()
            .map(|(idx, vc)| (idx as u64 + 1) * vc.0)
            .sum();
        Some(total as f64 / appearances.0 as f64)
    }

    fn cid(&self, id: &str) -> Option<CandidateId> {
        self.candidates
            .binary_search_by(|c| c.as_str().cmp(id))
            .ok()
            .map(|idx| CandidateId(idx as u32))
    }

    fn row(&self, cid: CandidateId) -> &[VoteCount] {
        &self.placements[cid.0 as usize]
    }

    fn appearances_cid(&self, cid: CandidateId) -> VoteCount {
        self.row(cid).iter().cloned().sum()
    }
}

fn majority_threshold(appearances: VoteCount) -> VoteCount {
    if appearances == VoteCount::EMPTY {
        VoteCount(1)
    } else {
        VoteCount(appearances.0 / 2 + 1)
    }
}

fn minimal_majority_rank(row: &[VoteCount], threshold: VoteCount) -> MajorityRank {
    let mut cumulative = VoteCount::EMPTY;
    for (idx, vc) in row.iter().enumerate() {
        cumulative += *vc;
        if cumulative >= threshold {
            return MajorityRank::Reached(idx as u32 + 1);
        }
    }
    MajorityRank::Unreached
}

fn tie_break_key(table: &PlacementTable, cid: CandidateId) -> TieBreakKey {
    let row = table.row(cid);
    let threshold = majority_threshold(table.appearances_cid(cid));
    TieBreakKey {
        majority: minimal_majority_rank(row, threshold),
        placements: row.iter().map(|vc| Reverse(*vc)).collect(),
    }
}

/// Orders the candidates of the table with the skating system.
///
/// Candidates are sorted by the earliest rank at which a majority of their ballots
/// is reached, then by their counts at each rank (more votes at an earlier rank
/// first). Candidates with identical keys share a rank and the following rank is
/// skipped, as in a competition ranking. Among them, the identifier decides the order.
pub fn rank_candidates(table: &PlacementTable) -> Vec<RankedCandidate> {
    let mut keyed: Vec<(CandidateId, TieBreakKey)> = (0..table.candidates.len())
        .map(|idx| {
            let cid = CandidateId(idx as u32);
            (cid, tie_break_key(table, cid))
        })
        .collect();
    // Stable, and the candidates are already sorted by identifier.
    keyed.sort_by(|(_, k1), (_, k2)| k1.cmp(k2));

    let mut res: Vec<RankedCandidate> = Vec::with_capacity(keyed.len());
    let mut previous: Option<(&TieBreakKey, u32)> = None;
    for (idx, (cid, key)) in keyed.iter().enumerate() {
        let rank = match previous {
            Some((prev_key, prev_rank)) if prev_key == key => prev_rank,
            _ => idx as u32 + 1,
        };
        let id = table.candidates[cid.0 as usize].clone();
        debug!("rank_candidates: {:?} key: {:?} rank: {:?}", id, key, rank);
        res.push(RankedCandidate { id, rank });
        previous = Some((key, rank));
    }
    res
}

fn round_position(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Attaches the vote statistics to the ranked candidates.
///
/// Registered candidates that no ballot lists are appended after the ranked ones,
/// all sharing the rank that follows the last ranked candidate.
pub fn summarize(
    table: &PlacementTable,
    ranked: &[RankedCandidate],
    candidates: &Option<Vec<Candidate>>,
) -> RankingResult {
    let titles: HashMap<&str, &str> = candidates
        .iter()
        .flatten()
        .map(|c| (c.id.as_str(), c.title.as_str()))
        .collect();

    let mut stats: Vec<CandidateStats> = ranked
        .iter()
        .map(|rc| CandidateStats {
            id: rc.id.clone(),
            title: titles
                .get(rc.id.as_str())
                .map(|t| t.to_string())
                .unwrap_or_else(|| rc.id.clone()),
            final_rank: rc.rank,
            average_position: table
                .average_position(&rc.id)
                .map(round_position)
                .unwrap_or(0.0),
            vote_count: table.appearances(&rc.id),
            vote_distribution: table.distribution(&rc.id),
        })
        .collect();

    if let Some(cands) = candidates {
        let trailing_rank = ranked.len() as u32 + 1;
        let mut seen: HashSet<&str> = ranked.iter().map(|rc| rc.id.as_str()).collect();
        for c in cands.iter() {
            if seen.insert(c.id.as_str()) {
                debug!("summarize: no vote for candidate {:?}", c.id);
                stats.push(CandidateStats {
                    id: c.id.clone(),
                    title: c.title.clone(),
                    final_rank: trailing_rank,
                    average_position: 0.0,
                    vote_count: 0,
                    vote_distribution: vec![],
                });
            }
        }
    }

    stats.sort_by_key(|cs| cs.final_rank);
    RankingResult { stats }
}

/// Runs the skating system over a set of ballots.
///
/// Arguments:
/// * `ballots` the ballots of the participants who confirmed their vote
/// * `candidates` the candidates of the room. If provided, ballot entries for
/// other candidates are ignored and candidates without any vote are reported
/// at the end. If not provided, the candidates are inferred from the ballots.
///
/// Without any ballot left to count, the result is empty.
pub fn run_ranking_stats(
    ballots: &[Ballot],
    candidates: &Option<Vec<Candidate>>,
) -> RankingResult {
    info!(
        "Processing {:?} ballots, candidates: {:?}",
        ballots.len(),
        candidates
    );

    let checked_ballots: Vec<Ballot> = match candidates {
        Some(cands) => {
            let known: HashSet<&str> = cands.iter().map(|c| c.id.as_str()).collect();
            ballots
                .iter()
                .filter_map(|b| {
                    let restricted = b.restricted(|c| known.contains(c));
                    if restricted.as_ref().map(|r| r.len()) != Some(b.len()) {
                        debug!(
                            "run_ranking_stats: ignoring unknown candidates in ballot {:?}",
                            b
                        );
                    }
                    restricted
                })
                .collect()
        }
        None => ballots.to_vec(),
    };

    if checked_ballots.is_empty() {
        info!("run_ranking_stats: no ballot to rank");
        return RankingResult::default();
    }

    let table = PlacementTable::from_ballots(&checked_ballots);
    debug!(
        "run_ranking_stats: max rank: {:?} placements: {:?}",
        table.max_rank, table.placements
    );

    let ranked = rank_candidates(&table);
    for rc in ranked.iter() {
        info!("Rank {}: {}", rc.rank, rc.id);
    }

    summarize(&table, &ranked, candidates)
}
