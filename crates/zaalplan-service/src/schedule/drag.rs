//! Drag-and-drop rescheduling as an explicit state machine.
//!
//! The client holds a serialized [`DragState`] and sends it back with every
//! pointer event. Each transition consumes the old state and returns the
//! next one, so there is no server-side session to leak.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use zaalplan_core::model::{Booking, Room};
use zaalplan_core::time::{LAST_SLOT, SlotRange, TOTAL_SLOTS};

use crate::error::{ConflictDetails, ServiceError, ServiceResult};
use crate::schedule::conflict::find_conflict;

/// Horizontal extent of one room column in client coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomColumn {
    pub room: Room,
    pub left: f64,
    pub right: f64,
}

/// Layout of the planner grid the pointer moves over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Y coordinate of the top edge of the first slot row.
    pub grid_top: f64,
    pub slot_height: f64,
    pub columns: Vec<RoomColumn>,
}

impl GridGeometry {
    /// Room whose column contains `x`, if any. Left edges are inclusive.
    #[must_use]
    pub fn room_at(&self, x: f64) -> Option<&Room> {
        self.columns
            .iter()
            .find(|column| x >= column.left && x < column.right)
            .map(|column| &column.room)
    }

    /// Slot row under `y`, or `None` above or below the grid.
    #[must_use]
    pub fn slot_at(&self, y: f64) -> Option<u8> {
        if !y.is_finite() || self.slot_height.is_nan() || self.slot_height <= 0.0 {
            return None;
        }
        if y < self.grid_top {
            return None;
        }
        let row = ((y - self.grid_top) / self.slot_height).floor();
        if row >= f64::from(TOTAL_SLOTS) {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "row is a whole number in 0..TOTAL_SLOTS"
        )]
        let row = row as u8;
        Some(row)
    }
}

/// Pointer position in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

/// Where a booking sits on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub room: Room,
    pub date: NaiveDate,
    pub slots: SlotRange,
}

impl From<&Booking> for Placement {
    fn from(booking: &Booking) -> Self {
        Self {
            room: booking.room.clone(),
            date: booking.date,
            slots: booking.slots(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Conflict { with: ConflictDetails },
}

/// Where the booking would land if released now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub placement: Placement,
    #[serde(flatten)]
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSession {
    pub booking_id: Uuid,
    pub original: Placement,
    pub duration: u8,
    /// Pointer slot minus booking start slot at grab time.
    pub grab_offset: i16,
    pub candidate: Option<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Request to move a booking, produced by a successful release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub booking_id: Uuid,
    pub target: Placement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReleaseOutcome {
    NoChange,
    Rejected { conflict: ConflictDetails },
    Move { request: MoveRequest },
}

fn judge(booking_id: Uuid, placement: &Placement, bookings: &[Booking]) -> Verdict {
    match find_conflict(
        bookings,
        &placement.room,
        placement.date,
        placement.slots,
        Some(booking_id),
    ) {
        Some(existing) => Verdict::Conflict {
            with: ConflictDetails::from(existing),
        },
        None => Verdict::Valid,
    }
}

impl DragState {
    /// ## Summary
    /// Starts dragging `booking`, grabbed at `pointer`.
    ///
    /// ## Errors
    /// Returns an invariant violation when a drag is already active and a
    /// validation error when the pointer is not over the grid.
    pub fn begin(
        &self,
        booking: &Booking,
        geometry: &GridGeometry,
        pointer: Pointer,
    ) -> ServiceResult<Self> {
        if matches!(self, Self::Dragging(_)) {
            return Err(ServiceError::InvariantViolation(
                "a drag is already in progress",
            ));
        }
        let grab_slot = geometry.slot_at(pointer.y).ok_or_else(|| {
            ServiceError::ValidationError("drag must start on the planner grid".into())
        })?;
        let original = Placement::from(booking);

        tracing::debug!(booking_id = %booking.id, grab_slot, "Drag started");

        Ok(Self::Dragging(DragSession {
            booking_id: booking.id,
            duration: original.slots.duration_slots(),
            grab_offset: i16::from(grab_slot) - i16::from(original.slots.start),
            original,
            candidate: None,
        }))
    }

    /// ## Summary
    /// Recomputes the candidate placement and its validity for a new pointer
    /// position. `bookings` should hold at least the bookings of the dragged
    /// booking's date. Idle states are returned unchanged.
    #[must_use]
    pub fn pointer_moved(
        self,
        geometry: &GridGeometry,
        pointer: Pointer,
        bookings: &[Booking],
    ) -> Self {
        let mut session = match self {
            Self::Dragging(session) => session,
            Self::Idle => return Self::Idle,
        };

        session.candidate = geometry
            .room_at(pointer.x)
            .zip(geometry.slot_at(pointer.y))
            .map(|(room, pointer_slot)| {
                let latest = LAST_SLOT.saturating_sub(session.duration);
                let wanted = (i16::from(pointer_slot) - session.grab_offset)
                    .clamp(0, i16::from(latest));
                let start = u8::try_from(wanted).unwrap_or(0);
                let placement = Placement {
                    room: room.clone(),
                    date: session.original.date,
                    slots: session.original.slots.with_start(start),
                };
                let verdict = judge(session.booking_id, &placement, bookings);
                Candidate { placement, verdict }
            });

        Self::Dragging(session)
    }

    /// ## Summary
    /// Ends the drag. The verdict is recomputed against `bookings` so a stale
    /// preview cannot let a conflicting move through.
    #[must_use]
    pub fn release(self, bookings: &[Booking]) -> (Self, ReleaseOutcome) {
        let session = match self {
            Self::Dragging(session) => session,
            Self::Idle => return (Self::Idle, ReleaseOutcome::NoChange),
        };
        let Some(candidate) = session.candidate else {
            return (Self::Idle, ReleaseOutcome::NoChange);
        };
        if candidate.placement == session.original {
            return (Self::Idle, ReleaseOutcome::NoChange);
        }

        let outcome = match judge(session.booking_id, &candidate.placement, bookings) {
            Verdict::Conflict { with } => {
                tracing::debug!(booking_id = %session.booking_id, "Drag released onto a conflict");
                ReleaseOutcome::Rejected { conflict: with }
            }
            Verdict::Valid => ReleaseOutcome::Move {
                request: MoveRequest {
                    booking_id: session.booking_id,
                    target: candidate.placement,
                },
            },
        };
        (Self::Idle, outcome)
    }

    #[must_use]
    pub fn cancel(self) -> Self {
        Self::Idle
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}
