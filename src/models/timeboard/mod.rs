// Timeboard module
// Explicit state container for the timezone comparison view

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A city card on the comparison board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub timezone: String,
}

/// State for the comparison view: the compared cities, the time scrub
/// offset, and display preferences. Owned by the view that created it and
/// passed by reference into whatever needs it; there is no global instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBoard {
    pub cities: Vec<City>,
    /// Scrub offset applied on top of the real clock, in minutes.
    /// Not persisted across sessions; a fresh board starts at "now".
    #[serde(skip, default)]
    pub offset_minutes: i64,
    pub use_24_hour: bool,
    pub user_timezone: String,
}

impl TimeBoard {
    pub fn new(user_timezone: impl Into<String>) -> Self {
        Self {
            cities: default_cities(),
            offset_minutes: 0,
            use_24_hour: false,
            user_timezone: user_timezone.into(),
        }
    }

    /// The displayed time: the real clock shifted by the scrub offset
    pub fn current_time(&self, real_now: DateTime<Utc>) -> DateTime<Utc> {
        real_now + Duration::minutes(self.offset_minutes)
    }

    pub fn add_city(&mut self, city: City) {
        self.cities.push(city);
    }

    pub fn remove_city(&mut self, id: &str) {
        self.cities.retain(|c| c.id != id);
    }

    pub fn update_city(&mut self, id: &str, updated: City) {
        if let Some(city) = self.cities.iter_mut().find(|c| c.id == id) {
            *city = updated;
        }
    }

    /// (name, timezone) pairs used to pre-populate a new meeting's roster
    /// from the current comparison view
    pub fn seed_participants(&self) -> Vec<(String, String)> {
        self.cities
            .iter()
            .map(|c| (c.name.clone(), c.timezone.clone()))
            .collect()
    }
}

fn default_cities() -> Vec<City> {
    [
        ("1", "Sydney", "Australia/Sydney"),
        ("2", "San Francisco", "America/Los_Angeles"),
        ("3", "New York", "America/New_York"),
        ("4", "London", "Europe/London"),
    ]
    .into_iter()
    .map(|(id, name, timezone)| City {
        id: id.to_string(),
        name: name.to_string(),
        timezone: timezone.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_board_has_default_cities() {
        let board = TimeBoard::new("UTC");
        assert_eq!(board.cities.len(), 4);
        assert_eq!(board.offset_minutes, 0);
    }

    #[test]
    fn test_current_time_applies_offset() {
        let mut board = TimeBoard::new("UTC");
        board.offset_minutes = 90;

        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(
            board.current_time(now),
            Utc.with_ymd_and_hms(2025, 3, 10, 13, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_city_crud() {
        let mut board = TimeBoard::new("UTC");
        board.add_city(City {
            id: "5".to_string(),
            name: "Tokyo".to_string(),
            timezone: "Asia/Tokyo".to_string(),
        });
        assert_eq!(board.cities.len(), 5);

        board.update_city(
            "5",
            City {
                id: "5".to_string(),
                name: "Osaka".to_string(),
                timezone: "Asia/Tokyo".to_string(),
            },
        );
        assert_eq!(board.cities.last().unwrap().name, "Osaka");

        board.remove_city("5");
        assert_eq!(board.cities.len(), 4);
    }

    #[test]
    fn test_seed_participants_mirrors_cities() {
        let board = TimeBoard::new("UTC");
        let seeds = board.seed_participants();
        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds[0], ("Sydney".to_string(), "Australia/Sydney".to_string()));
    }

    #[test]
    fn test_offset_not_serialized() {
        let mut board = TimeBoard::new("UTC");
        board.offset_minutes = 45;

        let json = serde_json::to_string(&board).unwrap();
        let restored: TimeBoard = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.offset_minutes, 0);
        assert_eq!(restored.cities, board.cities);
    }
}
