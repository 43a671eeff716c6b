use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Name of a bookable venue room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Room(String);

impl Room {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Room {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for Room {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The venue's fixed room set. Order is the calendar's column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Venue {
    rooms: Vec<Room>,
}

impl Venue {
    /// ## Summary
    /// Builds a venue from room names in column order.
    ///
    /// ## Errors
    /// Returns a configuration error if the list is empty, or a name is blank or repeated.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> CoreResult<Self> {
        let mut rooms: Vec<Room> = Vec::new();
        for name in names {
            let name = name.trim();
            if name.is_empty() {
                return Err(CoreError::ConfigError("room names must not be blank".into()));
            }
            if rooms.iter().any(|room| room.as_str() == name) {
                return Err(CoreError::ConfigError(format!("room '{name}' listed twice")));
            }
            rooms.push(Room::new(name));
        }
        if rooms.is_empty() {
            return Err(CoreError::ConfigError("venue has no rooms".into()));
        }
        Ok(Self { rooms })
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[must_use]
    pub fn contains(&self, room: &Room) -> bool {
        self.rooms.contains(room)
    }

    #[must_use]
    pub fn column_of(&self, room: &Room) -> Option<usize> {
        self.rooms.iter().position(|r| r == room)
    }

    #[must_use]
    pub fn room_at(&self, column: usize) -> Option<&Room> {
        self.rooms.get(column)
    }

    /// ## Summary
    /// Rejects rooms that are not part of this venue.
    ///
    /// ## Errors
    /// Returns a validation error naming the unknown room.
    pub fn require(&self, room: &Room) -> CoreResult<()> {
        if self.contains(room) {
            Ok(())
        } else {
            Err(CoreError::ValidationError(format!("unknown room '{room}'")))
        }
    }
}

impl Default for Venue {
    fn default() -> Self {
        Self {
            rooms: crate::config::DEFAULT_ROOMS.iter().copied().map(Room::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_keeps_column_order() {
        let venue = Venue::new(["Oost", "West", "Foyer"]).unwrap();
        assert_eq!(venue.column_of(&Room::from("West")), Some(1));
        assert_eq!(venue.room_at(2), Some(&Room::from("Foyer")));
        assert_eq!(venue.room_at(3), None);
    }

    #[test]
    fn test_venue_rejects_duplicates_and_blanks() {
        assert!(Venue::new(["Oost", "Oost"]).is_err());
        assert!(Venue::new(["Oost", "  "]).is_err());
        assert!(Venue::new(Vec::<&str>::new()).is_err());
    }

    #[test]
    fn test_require_unknown_room() {
        let venue = Venue::default();
        assert!(venue.require(&Room::from("Oost")).is_ok());
        assert!(venue.require(&Room::from("Kelder")).is_err());
    }
}
