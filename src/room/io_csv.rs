// Primitives for reading ranking exports in CSV.

use std::collections::HashMap;

use crate::room::*;

/// Reads a CSV export with one row per ranked object: `user,object,position`.
/// The first row is a header.
pub fn read_csv_rankings(path: String, cfs: &FileSource) -> RoomResult<Vec<ParsedParticipant>> {
    let confirmed = cfs.vote_confirmed.unwrap_or(true);
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(&path)
        .context(CsvOpenSnafu { path: path.clone() })?;

    let mut res: Vec<ParsedParticipant> = Vec::new();
    // Position of each user in res.
    let mut users: HashMap<String, usize> = HashMap::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_rankings: lineno: {:?} row: {:?}", lineno, line);
        let user = line.get(0).context(CsvLineTooShortSnafu { lineno })?;
        let object = line.get(1).context(CsvLineTooShortSnafu { lineno })?;
        let position = line.get(2).context(CsvLineTooShortSnafu { lineno })?;

        let p_idx = *users.entry(user.to_string()).or_insert_with(|| {
            res.push(ParsedParticipant {
                user: user.to_string(),
                confirmed,
                positions: Vec::new(),
            });
            res.len() - 1
        });
        res[p_idx]
            .positions
            .push((object.to_string(), Position::parse(position)));
    }
    info!(
        "read_csv_rankings: {} rankings read from {:?}",
        res.len(),
        path
    );
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(vote_confirmed: Option<bool>) -> FileSource {
        FileSource {
            provider: "csv".to_string(),
            file_path: "votes.csv".to_string(),
            vote_confirmed,
        }
    }

    #[test]
    fn groups_rows_by_user() {
        let path = format!(
            "{}/test_data/csv_source/votes.csv",
            env!("CARGO_MANIFEST_DIR")
        );
        let res = read_csv_rankings(path, &source(None)).unwrap();
        let users: Vec<&str> = res.iter().map(|p| p.user.as_str()).collect();
        assert_eq!(users, vec!["dora", "emil", "fay"]);
        assert!(res.iter().all(|p| p.confirmed));
        assert_eq!(
            res[0].positions,
            vec![
                ("10".to_string(), Position::Rank(1)),
                ("20".to_string(), Position::Rank(2)),
                ("30".to_string(), Position::Rank(3)),
            ]
        );
        assert_eq!(res[2].positions.len(), 2);
    }

    #[test]
    fn unconfirmed_source() {
        let path = format!(
            "{}/test_data/csv_source/votes.csv",
            env!("CARGO_MANIFEST_DIR")
        );
        let res = read_csv_rankings(path, &source(Some(false))).unwrap();
        assert!(res.iter().all(|p| !p.confirmed));
    }

    #[test]
    fn missing_file() {
        let res = read_csv_rankings("/nonexistent/votes.csv".to_string(), &source(None));
        assert!(matches!(res, Err(RoomError::CsvOpen { .. })));
    }
}
