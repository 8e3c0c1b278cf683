use crate::room::io_common::{read_js_id, read_js_position};
use crate::room::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RoomSettings {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An object of the room that participants rank.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RoomObject {
    // Stored rooms use numeric ids, exports may use strings.
    #[serde(rename = "id")]
    _id: JSValue,
    pub title: String,
}

impl RoomObject {
    pub fn id_string(&self) -> RoomResult<String> {
        read_js_id(&self._id)
    }
}

/// A participant record, with the field names of the stored room.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub user: Option<String>,
    #[serde(default)]
    pub vote_confirmed: bool,
    pub vote_data: Option<JSMap<String, JSValue>>,
}

impl ParticipantRecord {
    pub fn to_parsed(&self, idx: usize) -> ParsedParticipant {
        let positions: Vec<(String, Position)> = self
            .vote_data
            .iter()
            .flatten()
            .map(|(cand, pos)| (cand.clone(), read_js_position(pos)))
            .collect();
        ParsedParticipant {
            user: self
                .user
                .clone()
                .unwrap_or_else(|| format!("participant-{:04}", idx + 1)),
            confirmed: self.vote_confirmed,
            positions,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "voteConfirmed")]
    pub vote_confirmed: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    pub room: RoomSettings,
    pub objects: Vec<RoomObject>,
    #[serde(default)]
    pub participants: Vec<ParticipantRecord>,
    #[serde(rename = "participantFileSources", default)]
    pub participant_file_sources: Vec<FileSource>,
}

pub fn read_summary(path: String) -> RoomResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {:?}", js);
    Ok(js)
}
