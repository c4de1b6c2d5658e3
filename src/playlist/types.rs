use serde::Deserialize;
use serde_json::Value;

/// Request payload for creating a playlist
#[derive(Debug, Default, Deserialize)]
pub struct CreatePlaylistRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request payload for adding a track to a playlist
///
/// `trackId` is kept as raw JSON so a present-but-malformed id can be told
/// apart from a missing one.
#[derive(Debug, Default, Deserialize)]
pub struct AddTrackRequest {
    #[serde(rename = "trackId", default)]
    pub track_id: Option<Value>,
}
