//! Expansion of a booking draft into its recurring instances.
//!
//! Periodic rules are evaluated as RFC 5545 recurrences. Monthly and
//! quarterly series anchored past the 28th select the last day of shorter
//! months, so a series starting on Jan 31 continues on Feb 29 (leap year).

use chrono::{Datelike, NaiveDate};
use rrule::{RRule, RRuleSet, Tz, Unvalidated};
use serde::{Deserialize, Serialize};

use zaalplan_core::model::BookingDraft;

use crate::error::{ServiceError, ServiceResult};

/// Largest number of instances a single series may produce.
pub const MAX_REPEAT_COUNT: u16 = 52;

/// Largest number of explicit dates accepted while converting an inquiry.
pub const MAX_INQUIRY_DATES: usize = 3;

/// How a booking repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    None,
    Weekly {
        repeat_count: u16,
    },
    Biweekly {
        repeat_count: u16,
    },
    Monthly {
        repeat_count: u16,
    },
    Quarterly {
        repeat_count: u16,
    },
    SpecificDates {
        dates: Vec<NaiveDate>,
    },
}

impl Recurrence {
    /// ## Summary
    /// Rejects rules the inquiry dialog cannot produce.
    ///
    /// ## Errors
    /// Returns a validation error for more than [`MAX_INQUIRY_DATES`] explicit dates.
    pub fn check_inquiry_limits(&self) -> ServiceResult<()> {
        match self {
            Self::SpecificDates { dates } if dates.len() > MAX_INQUIRY_DATES => {
                Err(ServiceError::ValidationError(format!(
                    "at most {MAX_INQUIRY_DATES} specific dates can be scheduled from an inquiry"
                )))
            }
            _ => Ok(()),
        }
    }

    fn rule(&self, base: NaiveDate) -> Option<(String, u16)> {
        let (freq, interval, count) = match *self {
            Self::None | Self::SpecificDates { .. } => return None,
            Self::Weekly { repeat_count } => ("WEEKLY", 1, repeat_count),
            Self::Biweekly { repeat_count } => ("WEEKLY", 2, repeat_count),
            Self::Monthly { repeat_count } => ("MONTHLY", 1, repeat_count),
            Self::Quarterly { repeat_count } => ("MONTHLY", 3, repeat_count),
        };

        let mut rule = format!("FREQ={freq};INTERVAL={interval};COUNT={count}");
        if freq == "MONTHLY" {
            let day = base.day();
            if day > 28 {
                rule.push_str(&format!(";BYMONTHDAY={day},-1;BYSETPOS=1"));
            } else {
                rule.push_str(&format!(";BYMONTHDAY={day}"));
            }
        }
        Some((rule, count))
    }
}

fn check_repeat_count(recurrence: &Recurrence) -> ServiceResult<()> {
    let count = match *recurrence {
        Recurrence::Weekly { repeat_count }
        | Recurrence::Biweekly { repeat_count }
        | Recurrence::Monthly { repeat_count }
        | Recurrence::Quarterly { repeat_count } => repeat_count,
        Recurrence::None | Recurrence::SpecificDates { .. } => return Ok(()),
    };
    if (1..=MAX_REPEAT_COUNT).contains(&count) {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(format!(
            "repeat count must be between 1 and {MAX_REPEAT_COUNT}, got {count}"
        )))
    }
}

fn build_rrule_set(rule: &str, base: NaiveDate) -> ServiceResult<RRuleSet> {
    let dt_start = base
        .and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .with_timezone(&Tz::UTC);
    rule.parse::<RRule<Unvalidated>>()
        .map_err(|err| ServiceError::ValidationError(err.to_string()))?
        .build(dt_start)
        .map_err(|err| ServiceError::ValidationError(err.to_string()))
}

/// ## Summary
/// Computes the dates a recurrence produces from `base`, ascending.
///
/// ## Errors
/// Returns a validation error for a repeat count outside `1..=52`, an empty
/// or oversized date list, or a rule the recurrence engine rejects.
pub fn occurrence_dates(base: NaiveDate, recurrence: &Recurrence) -> ServiceResult<Vec<NaiveDate>> {
    check_repeat_count(recurrence)?;

    match recurrence {
        Recurrence::None => Ok(vec![base]),
        Recurrence::SpecificDates { dates } => {
            if dates.is_empty() {
                return Err(ServiceError::ValidationError(
                    "at least one date is required".into(),
                ));
            }
            if dates.len() > usize::from(MAX_REPEAT_COUNT) {
                return Err(ServiceError::ValidationError(format!(
                    "at most {MAX_REPEAT_COUNT} specific dates are allowed"
                )));
            }
            let mut dates = dates.clone();
            dates.sort_unstable();
            dates.dedup();
            Ok(dates)
        }
        periodic => {
            let Some((rule, count)) = periodic.rule(base) else {
                return Ok(vec![base]);
            };
            tracing::trace!(%rule, %base, "Expanding recurrence");
            let result = build_rrule_set(&rule, base)?.all(count);
            Ok(result
                .dates
                .into_iter()
                .map(|occurrence| occurrence.date_naive())
                .collect())
        }
    }
}

/// ## Summary
/// Expands one draft into its instances. Everything but the date is copied.
///
/// ## Errors
/// See [`occurrence_dates`].
pub fn expand(base: &BookingDraft, recurrence: &Recurrence) -> ServiceResult<Vec<BookingDraft>> {
    Ok(occurrence_dates(base.date, recurrence)?
        .into_iter()
        .map(|date| base.on_date(date))
        .collect())
}

/// ## Summary
/// Expands several drafts with shared recurrence settings.
///
/// The result is ordered by date; instances on the same date keep the order
/// of their source drafts.
///
/// ## Errors
/// See [`occurrence_dates`].
pub fn expand_all(
    bases: &[BookingDraft],
    recurrence: &Recurrence,
) -> ServiceResult<Vec<BookingDraft>> {
    let mut instances = Vec::new();
    for base in bases {
        instances.extend(expand(base, recurrence)?);
    }
    instances.sort_by_key(|draft| draft.date);
    Ok(instances)
}
