use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Position of an inquiry in the sales pipeline, in funnel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    New,
    Contacted,
    Viewing,
    Option,
    Quoted,
    Negotiating,
    Reserved,
    Confirmed,
    Invoiced,
    AfterSales,
    Lost,
    Converted,
}

impl InquiryStatus {
    /// All stages in pipeline order.
    pub const ALL: [Self; 12] = [
        Self::New,
        Self::Contacted,
        Self::Viewing,
        Self::Option,
        Self::Quoted,
        Self::Negotiating,
        Self::Reserved,
        Self::Confirmed,
        Self::Invoiced,
        Self::AfterSales,
        Self::Lost,
        Self::Converted,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Viewing => "viewing",
            Self::Option => "option",
            Self::Quoted => "quoted",
            Self::Negotiating => "negotiating",
            Self::Reserved => "reserved",
            Self::Confirmed => "confirmed",
            Self::Invoiced => "invoiced",
            Self::AfterSales => "after_sales",
            Self::Lost => "lost",
            Self::Converted => "converted",
        }
    }

    /// Zero-based position in the funnel.
    #[must_use]
    pub fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or_default()
    }

    /// Terminal stages accept no further scheduling.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Lost | Self::Converted | Self::AfterSales)
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown inquiry status '{s}'")))
    }
}

/// A prospective event moving through the pipeline before it becomes bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: Uuid,
    pub status: InquiryStatus,
    pub contact_name: String,
    pub contact_id: Option<Uuid>,
    pub event_type: Option<String>,
    pub preferred_date: Option<NaiveDate>,
    pub guest_count: Option<i32>,
    pub budget: Option<i64>,
    pub room_preference: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inquiry {
    /// Title given to bookings created from this inquiry when none is supplied.
    #[must_use]
    pub fn default_booking_title(&self) -> String {
        match self.event_type.as_deref().map(str::trim) {
            Some(event_type) if !event_type.is_empty() => {
                format!("{event_type} - {}", self.contact_name)
            }
            _ => self.contact_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order() {
        assert_eq!(InquiryStatus::New.position(), 0);
        assert!(InquiryStatus::Option.position() < InquiryStatus::Reserved.position());
        assert_eq!(InquiryStatus::Converted.position(), 11);
    }

    #[test]
    fn test_terminal_stages() {
        let terminal: Vec<_> = InquiryStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(
            terminal,
            vec![
                InquiryStatus::AfterSales,
                InquiryStatus::Lost,
                InquiryStatus::Converted
            ]
        );
    }

    #[test]
    fn test_parse_all_stages() {
        for status in InquiryStatus::ALL {
            assert_eq!(status.as_str().parse::<InquiryStatus>().unwrap(), status);
        }
        assert!("archived".parse::<InquiryStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&InquiryStatus::AfterSales).unwrap();
        assert_eq!(json, "\"after_sales\"");
    }
}
