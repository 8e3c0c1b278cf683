use log::{debug, info, warn};

use skating_ranking::builder::Builder;
use skating_ranking::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::room::config_reader::*;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;

#[derive(Debug, Snafu)]
pub enum RoomError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Identifier {content} is neither a string nor an integer"))]
    ParsingJsonId { content: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Line {lineno} of CSV file is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Cannot find the directory of the config file"))]
    MissingParentDir {},
    #[snafu(display("Error writing results to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RoomResult<T> = Result<T, RoomError>;

/// A participant of the room, as read from the snapshot or from an export.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedParticipant {
    pub user: String,
    pub confirmed: bool,
    /// The stored ranking, in the order it was declared.
    pub positions: Vec<(String, Position)>,
}

fn result_to_json(rr: &RankingResult) -> JSValue {
    let mut results: JSMap<String, JSValue> = JSMap::new();
    for cs in rr.stats.iter() {
        let mut distribution: JSMap<String, JSValue> = JSMap::new();
        for (rank, count) in cs.vote_distribution.iter() {
            distribution.insert(rank.to_string(), json!(count));
        }
        results.insert(
            cs.id.clone(),
            json!({
                "final_rank": cs.final_rank,
                "average_position": cs.average_position,
                "vote_count": cs.vote_count,
                "title": cs.title,
                "vote_distribution": distribution,
            }),
        );
    }
    JSValue::Object(results)
}

fn build_summary_js(config: &RoomConfig, rr: &RankingResult) -> JSValue {
    json!({
        "room": config.room,
        "final_results": result_to_json(rr) })
}

fn room_candidates(config: &RoomConfig) -> RoomResult<Vec<Candidate>> {
    let mut res: Vec<Candidate> = Vec::new();
    for obj in config.objects.iter() {
        res.push(Candidate {
            id: obj.id_string()?,
            title: obj.title.clone(),
        });
    }
    Ok(res)
}

fn read_participants(root_path: &Path, config: &RoomConfig) -> RoomResult<Vec<ParsedParticipant>> {
    let mut res: Vec<ParsedParticipant> = config
        .participants
        .iter()
        .enumerate()
        .map(|(idx, p)| p.to_parsed(idx))
        .collect();

    for cfs in config.participant_file_sources.iter() {
        let p = root_path.join(&cfs.file_path).display().to_string();
        info!("Attempting to read ranking file {:?}", p);
        let mut file_data = match cfs.provider.as_str() {
            "csv" => io_csv::read_csv_rankings(p, cfs)?,
            x => whatever!("Provider not implemented {:?}", x),
        };
        res.append(&mut file_data);
    }
    Ok(res)
}

/// Adds the rankings of the participants who confirmed their vote.
/// Returns the number of ballots added.
fn add_confirmed_rankings(participants: &[ParsedParticipant], builder: &mut Builder) -> usize {
    let mut count = 0;
    for p in participants.iter() {
        if !p.confirmed {
            debug!("Skipping unconfirmed participant {:?}", p.user);
            continue;
        }
        debug!("Ranking of participant {:?}: {:?}", p.user, p.positions);
        if builder.add_ranking(&p.positions) {
            count += 1;
        } else {
            warn!("Participant {:?} has no usable ranking", p.user);
        }
    }
    count
}

/// Computes the summary of the room described in the given snapshot.
pub fn compute_summary(config_path: &str) -> RoomResult<JSValue> {
    let config_p = Path::new(config_path);
    let config_str = fs::read_to_string(config_p).context(OpeningJsonSnafu {
        path: config_path.to_string(),
    })?;
    let config: RoomConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    debug!("config: {:?}", config);

    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
    let participants = read_participants(root_p, &config)?;
    let candidates = room_candidates(&config)?;
    info!(
        "Room {:?}: {} objects, {} participants",
        config.room.id,
        candidates.len(),
        participants.len()
    );

    let mut builder = Builder::new().candidates(&candidates);
    let num_ballots = add_confirmed_rankings(&participants, &mut builder);
    info!("Counting {} confirmed ballots", num_ballots);

    let result = builder.run();
    debug!("result: {:?}", result);

    Ok(build_summary_js(&config, &result))
}

pub fn run_room(
    config_path: String,
    check_summary_path: Option<String>,
    out: Option<String>,
) -> RoomResult<()> {
    let result_js = compute_summary(&config_path)?;
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match out.as_deref() {
        None | Some("") | Some("stdout") => {
            println!("{}", pretty_js_stats);
        }
        Some(path) => {
            info!("Writing results to {:?}", path);
            fs::write(path, &pretty_js_stats).context(WritingOutputSnafu {
                path: path.to_string(),
            })?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between computed results and reference results")
        }
    }

    Ok(())
}

#[cfg(test)]
fn test_wrapper(test_name: &str) {
    let _ = env_logger::builder().is_test(true).try_init();
    let test_dir = format!("{}/test_data/{}", env!("CARGO_MANIFEST_DIR"), test_name);
    info!("Running test {}", test_name);
    let res = run_room(
        format!("{}/{}_config.json", test_dir, test_name),
        Some(format!("{}/{}_expected_summary.json", test_dir, test_name)),
        None,
    );
    if let Err(e) = res {
        panic!("Test {} failed: {}", test_name, e);
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn worked_example() {
        test_wrapper("worked_example");
    }

    #[test]
    fn tied_objects() {
        test_wrapper("tied_objects");
    }

    #[test]
    fn unconfirmed_and_malformed() {
        test_wrapper("unconfirmed_and_malformed");
    }

    #[test]
    fn no_confirmed_votes() {
        test_wrapper("no_confirmed_votes");
    }

    #[test]
    fn csv_source() {
        test_wrapper("csv_source");
    }

    #[test]
    fn missing_config() {
        let res = compute_summary("/nonexistent/room_config.json");
        assert!(matches!(res, Err(RoomError::OpeningJson { .. })));
    }

    #[test]
    fn unknown_provider() {
        let config: RoomConfig = serde_json::from_value(json!({
            "room": { "id": "r1" },
            "objects": [],
            "participantFileSources": [ { "provider": "xlsx", "filePath": "votes.xlsx" } ]
        }))
        .unwrap();
        let res = read_participants(Path::new("."), &config);
        assert!(matches!(res, Err(RoomError::Whatever { .. })));
    }

    #[test]
    fn unconfirmed_participants_are_skipped() {
        let participants = vec![
            ParsedParticipant {
                user: "a".to_string(),
                confirmed: false,
                positions: vec![("1".to_string(), Position::Rank(1))],
            },
            ParsedParticipant {
                user: "b".to_string(),
                confirmed: true,
                positions: vec![],
            },
            ParsedParticipant {
                user: "c".to_string(),
                confirmed: true,
                positions: vec![("1".to_string(), Position::Rank(1))],
            },
        ];
        let mut builder = Builder::new();
        assert_eq!(add_confirmed_rankings(&participants, &mut builder), 1);
        assert_eq!(builder.ballots().len(), 1);
    }

    #[test]
    fn results_keep_rank_order() {
        let mut builder = Builder::new();
        builder.add_ballot(Ballot::from_names(&["b", "a"]).unwrap());
        let js = result_to_json(&builder.run());
        let keys: Vec<&String> = js.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(js["b"]["vote_distribution"]["1"], json!(1));
        assert_eq!(js["a"]["average_position"], json!(2.0));
    }
}
