//! Wall-clock to slot mapping for the venue's operating day.
//!
//! ## Summary
//! The operating day opens at 07:00 and runs past midnight until 01:45. Every
//! quarter hour is one slot. Hours 0 and 1 are placed behind hour 23, so all
//! overlap and duration arithmetic happens on slot indexes and never has to
//! reason about the date boundary.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const OPENING_HOUR: u8 = 7;
pub const SLOT_MINUTES: u8 = 15;
pub const SLOTS_PER_HOUR: u8 = 4;
/// Hour rows of the grid: 07 through 23 plus the post-midnight 00 and 01.
pub const HOURS_PER_DAY: u8 = 19;
pub const TOTAL_SLOTS: u8 = HOURS_PER_DAY * SLOTS_PER_HOUR;
/// Highest addressable slot; also the latest possible end of a booking.
pub const LAST_SLOT: u8 = TOTAL_SLOTS - 1;

const LAST_TAIL_HOUR: u8 = 1;

/// ## Summary
/// Maps an hour of the operating window to its row in the grid.
///
/// Hours before opening (only 0 and 1 are valid) wrap behind hour 23.
#[must_use]
pub const fn hour_to_index(hour: u8) -> u8 {
    if hour >= OPENING_HOUR {
        hour - OPENING_HOUR
    } else {
        hour + (24 - OPENING_HOUR)
    }
}

/// ## Summary
/// Returns the slot index of a wall-clock time.
///
/// ## Errors
/// Returns a validation error if the time is outside the operating window or
/// the minute is not on a quarter hour.
pub fn slot_index(hour: u8, minute: u8) -> CoreResult<u8> {
    WallTime::new(hour, minute).map(WallTime::slot)
}

/// ## Summary
/// Recovers `(hour, minute)` from a slot index, clamping to `[0, LAST_SLOT]`.
#[must_use]
pub const fn index_to_time(index: u8) -> (u8, u8) {
    let index = if index > LAST_SLOT { LAST_SLOT } else { index };
    let row = index / SLOTS_PER_HOUR;
    let hour = (row + OPENING_HOUR) % 24;
    (hour, (index % SLOTS_PER_HOUR) * SLOT_MINUTES)
}

const fn is_operating_hour(hour: u8) -> bool {
    (hour >= OPENING_HOUR && hour <= 23) || hour <= LAST_TAIL_HOUR
}

/// A quarter-hour aligned time inside the operating window.
///
/// Ordering follows the slot index, so 00:30 sorts after 23:45.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime {
    hour: u8,
    minute: u8,
}

impl WallTime {
    /// ## Summary
    /// Validates and builds a wall-clock time.
    ///
    /// ## Errors
    /// Returns a validation error for hours 2 through 6, hours above 23, or
    /// minutes other than 0, 15, 30 and 45.
    pub fn new(hour: u8, minute: u8) -> CoreResult<Self> {
        if !is_operating_hour(hour) {
            return Err(CoreError::ValidationError(format!(
                "hour {hour} is outside the operating window 07:00-01:45"
            )));
        }
        if minute >= 60 || minute % SLOT_MINUTES != 0 {
            return Err(CoreError::ValidationError(format!(
                "minute {minute} is not on a quarter hour"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Inverse of [`WallTime::slot`], clamped to the grid.
    #[must_use]
    pub const fn from_slot(index: u8) -> Self {
        let (hour, minute) = index_to_time(index);
        Self { hour, minute }
    }

    #[must_use]
    pub const fn hour(self) -> u8 {
        self.hour
    }

    #[must_use]
    pub const fn minute(self) -> u8 {
        self.minute
    }

    #[must_use]
    pub const fn slot(self) -> u8 {
        hour_to_index(self.hour) * SLOTS_PER_HOUR + self.minute / SLOT_MINUTES
    }

    #[must_use]
    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or_default()
    }
}

impl PartialOrd for WallTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WallTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.slot().cmp(&other.slot())
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for WallTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidInput(format!("'{s}' is not a HH:MM time"));
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = hour.parse::<u8>().map_err(|_err| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_err| invalid())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for WallTime {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WallTime> for String {
    fn from(value: WallTime) -> Self {
        value.to_string()
    }
}

/// Half-open `[start, end)` interval of slots.
///
/// Deserialization goes through [`SlotRange::new`], so ranges read back from
/// clients are as valid as freshly built ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSlotRange")]
pub struct SlotRange {
    pub start: u8,
    pub end: u8,
}

#[derive(Deserialize)]
struct RawSlotRange {
    start: u8,
    end: u8,
}

impl TryFrom<RawSlotRange> for SlotRange {
    type Error = CoreError;

    fn try_from(raw: RawSlotRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl SlotRange {
    /// ## Summary
    /// Builds a positive-length range inside the grid.
    ///
    /// ## Errors
    /// Returns a validation error if `end <= start` or `end` lies past the last slot.
    pub fn new(start: u8, end: u8) -> CoreResult<Self> {
        if end <= start {
            return Err(CoreError::ValidationError(format!(
                "end {} must be after start {}",
                WallTime::from_slot(end),
                WallTime::from_slot(start)
            )));
        }
        if end > LAST_SLOT {
            return Err(CoreError::ValidationError(format!(
                "end slot {end} is past the last slot {LAST_SLOT}"
            )));
        }
        Ok(Self { start, end })
    }

    /// ## Summary
    /// Builds the range covered by two wall-clock times.
    ///
    /// ## Errors
    /// Returns a validation error for zero-length or inverted intervals.
    pub fn between(start: WallTime, end: WallTime) -> CoreResult<Self> {
        Self::new(start.slot(), end.slot())
    }

    /// Length in slots.
    #[must_use]
    pub const fn duration_slots(self) -> u8 {
        self.end - self.start
    }

    /// Standard half-open overlap; touching ranges do not overlap.
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Same duration, new start.
    #[must_use]
    pub const fn with_start(self, start: u8) -> Self {
        Self {
            start,
            end: start + self.duration_slots(),
        }
    }

    /// Latest start that keeps a range of this duration inside the grid.
    #[must_use]
    pub const fn latest_start(self) -> u8 {
        LAST_SLOT.saturating_sub(self.duration_slots())
    }

    #[must_use]
    pub const fn start_time(self) -> WallTime {
        WallTime::from_slot(self.start)
    }

    #[must_use]
    pub const fn end_time(self) -> WallTime {
        WallTime::from_slot(self.end)
    }
}

impl fmt::Display for SlotRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_time(), self.end_time())
    }
}
