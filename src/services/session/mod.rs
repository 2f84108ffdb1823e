// Session service module
// Client-held state that never reaches the server: the viewer's chosen
// participant identity per meeting, the recently-visited meeting list, and
// the personalized-link query parameter

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Cap on the recently-visited list
pub const MAX_RECENT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentMeeting {
    pub id: String,
    pub title: String,
    pub last_visited: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SessionData {
    /// meeting id -> the participant the viewer identified as
    participant_ids: HashMap<String, String>,
    recent_meetings: Vec<RecentMeeting>,
}

/// JSON-file-backed session storage. Read errors degrade to an empty
/// session rather than failing the caller; the worst outcome of a corrupt
/// file is being asked to join again.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store under the platform data directory
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "tzmeet")
            .context("Could not determine a data directory")?;
        let dir = dirs.data_dir();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(Self {
            path: dir.join("session.json"),
        })
    }

    /// Store at an explicit path (tests, portable installs)
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> SessionData {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("Corrupt session file {}: {e}", self.path.display());
                SessionData::default()
            }),
            Err(_) => SessionData::default(),
        }
    }

    fn save(&self, data: &SessionData) -> Result<()> {
        let contents = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// The participant the viewer previously identified as in this meeting
    pub fn participant_for(&self, meeting_id: &str) -> Option<String> {
        self.load().participant_ids.get(meeting_id).cloned()
    }

    pub fn remember_participant(&self, meeting_id: &str, participant_id: &str) -> Result<()> {
        let mut data = self.load();
        data.participant_ids
            .insert(meeting_id.to_string(), participant_id.to_string());
        self.save(&data)
    }

    /// Record a visit: moves the meeting to the front and trims the list
    pub fn visit_meeting(&self, id: &str, title: &str, now: DateTime<Utc>) -> Result<()> {
        let mut data = self.load();
        data.recent_meetings.retain(|m| m.id != id);
        data.recent_meetings.insert(
            0,
            RecentMeeting {
                id: id.to_string(),
                title: title.to_string(),
                last_visited: now,
            },
        );
        data.recent_meetings.truncate(MAX_RECENT);
        self.save(&data)
    }

    /// Recently-visited meetings, most recent first
    pub fn recent_meetings(&self) -> Vec<RecentMeeting> {
        let mut meetings = self.load().recent_meetings;
        meetings.sort_by(|a, b| b.last_visited.cmp(&a.last_visited));
        meetings.truncate(MAX_RECENT);
        meetings
    }

    /// Keep a renamed meeting's entry in sync
    pub fn update_recent_title(&self, id: &str, title: &str) -> Result<()> {
        let mut data = self.load();
        for meeting in data.recent_meetings.iter_mut().filter(|m| m.id == id) {
            meeting.title = title.to_string();
        }
        self.save(&data)
    }
}

/// Pull the `participantId` parameter out of a shared personalized link.
/// Returns the decoded id and the URL with the parameter stripped; the
/// caller stores the id locally and replaces the address bar with the
/// cleaned URL, so the parameter is consumed exactly once.
pub fn take_participant_param(url: &str) -> Option<(String, String)> {
    let (without_fragment, fragment) = match url.split_once('#') {
        Some((base, frag)) => (base, Some(frag)),
        None => (url, None),
    };
    let (base, query) = without_fragment.split_once('?')?;

    let mut participant_id = None;
    let mut kept = Vec::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == "participantId" && participant_id.is_none() {
            participant_id = Some(urlencoding::decode(value).ok()?.into_owned());
        } else {
            kept.push(pair);
        }
    }
    let participant_id = participant_id?;

    let mut stripped = base.to_string();
    if !kept.is_empty() {
        stripped.push('?');
        stripped.push_str(&kept.join("&"));
    }
    if let Some(frag) = fragment {
        stripped.push('#');
        stripped.push_str(frag);
    }
    Some((participant_id, stripped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempdir().unwrap();
        let store = SessionStore::at_path(dir.path().join("session.json"));
        (dir, store)
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, minute, 0).unwrap()
    }

    #[test]
    fn test_participant_identity_round_trip() {
        let (_dir, store) = store();
        assert!(store.participant_for("m1").is_none());

        store.remember_participant("m1", "p1").unwrap();
        store.remember_participant("m2", "p9").unwrap();

        assert_eq!(store.participant_for("m1"), Some("p1".to_string()));
        assert_eq!(store.participant_for("m2"), Some("p9".to_string()));
    }

    #[test]
    fn test_missing_file_is_empty_session() {
        let (_dir, store) = store();
        assert!(store.recent_meetings().is_empty());
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let (_dir, store) = store();
        fs::write(&store.path, "not json at all").unwrap();
        assert!(store.recent_meetings().is_empty());
        // And the store stays usable
        store.remember_participant("m1", "p1").unwrap();
        assert_eq!(store.participant_for("m1"), Some("p1".to_string()));
    }

    #[test]
    fn test_visit_moves_to_front() {
        let (_dir, store) = store();
        store.visit_meeting("m1", "First", at(0)).unwrap();
        store.visit_meeting("m2", "Second", at(1)).unwrap();
        store.visit_meeting("m1", "First", at(2)).unwrap();

        let recents = store.recent_meetings();
        assert_eq!(recents.len(), 2);
        assert_eq!(recents[0].id, "m1");
        assert_eq!(recents[1].id, "m2");
    }

    #[test]
    fn test_recent_list_capped() {
        let (_dir, store) = store();
        for i in 0..15 {
            store
                .visit_meeting(&format!("m{i}"), "Meeting", at(i))
                .unwrap();
        }

        let recents = store.recent_meetings();
        assert_eq!(recents.len(), MAX_RECENT);
        assert_eq!(recents[0].id, "m14");
    }

    #[test]
    fn test_update_recent_title() {
        let (_dir, store) = store();
        store.visit_meeting("m1", "Old", at(0)).unwrap();
        store.update_recent_title("m1", "New").unwrap();
        assert_eq!(store.recent_meetings()[0].title, "New");
    }

    #[test]
    fn test_take_participant_param() {
        let (id, stripped) =
            take_participant_param("https://example.com/meet/m1?participantId=p1").unwrap();
        assert_eq!(id, "p1");
        assert_eq!(stripped, "https://example.com/meet/m1");
    }

    #[test]
    fn test_take_participant_param_keeps_other_params() {
        let (id, stripped) =
            take_participant_param("https://example.com/meet/m1?a=1&participantId=p%201&b=2#top")
                .unwrap();
        assert_eq!(id, "p 1");
        assert_eq!(stripped, "https://example.com/meet/m1?a=1&b=2#top");
    }

    #[test]
    fn test_take_participant_param_absent() {
        assert!(take_participant_param("https://example.com/meet/m1").is_none());
        assert!(take_participant_param("https://example.com/meet/m1?a=1").is_none());
    }
}
