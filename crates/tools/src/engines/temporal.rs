//! Temporal operation engine
//!
//! Date inputs accept RFC 3339 (`2024-01-31T10:00:00Z`, `2024-01-31T10:00:00+09:00`),
//! naive date-times (`2024-01-31T10:00:00`, `2024-01-31 10:00`) and plain dates
//! (`2024-01-31`). Naive values are read as wall-clock time in the operation's zone.
//!
//! Offsets: `days` move the calendar date in the zone keeping the wall-clock
//! time, `hours`/`minutes` are exact durations, `months`/`years` are calendar
//! arithmetic clamped to the last valid day (Jan 31 + 1 month = Feb 29 in 2024).
//! Clamping makes month/year offsets lossy: Jan 31 + 1 month - 1 month = Jan 29.

use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, TimeZone,
    Offset, Timelike, Utc,
};
use chrono_tz::Tz;
use serde::Serialize;
use std::str::FromStr;
use voice_dispatch_core::{ErrorCode, ToolError};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Offset unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Months,
    Years,
}

impl TimeUnit {
    pub const ALL: [&'static str; 5] = ["days", "hours", "minutes", "months", "years"];
}

impl FromStr for TimeUnit {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "days" => Ok(TimeUnit::Days),
            "hours" => Ok(TimeUnit::Hours),
            "minutes" => Ok(TimeUnit::Minutes),
            "months" => Ok(TimeUnit::Months),
            "years" => Ok(TimeUnit::Years),
            other => Err(ToolError::invalid_params(format!("unknown unit: {}", other))),
        }
    }
}

/// One temporal request, carrying exactly the fields its operation needs
#[derive(Debug, Clone, PartialEq)]
pub enum TemporalOperation {
    Current {
        timezone: Tz,
    },
    Format {
        date: String,
        timezone: Tz,
    },
    Add {
        date: String,
        amount: i64,
        unit: TimeUnit,
        timezone: Tz,
    },
    Subtract {
        date: String,
        amount: i64,
        unit: TimeUnit,
        timezone: Tz,
    },
    Compare {
        date: String,
        compare_date: String,
        timezone: Tz,
    },
}

impl TemporalOperation {
    pub const NAMES: [&'static str; 5] = ["current", "format", "add", "subtract", "compare"];

    pub fn name(&self) -> &'static str {
        match self {
            TemporalOperation::Current { .. } => "current",
            TemporalOperation::Format { .. } => "format",
            TemporalOperation::Add { .. } => "add",
            TemporalOperation::Subtract { .. } => "subtract",
            TemporalOperation::Compare { .. } => "compare",
        }
    }

    fn timezone(&self) -> Tz {
        match self {
            TemporalOperation::Current { timezone }
            | TemporalOperation::Format { timezone, .. }
            | TemporalOperation::Add { timezone, .. }
            | TemporalOperation::Subtract { timezone, .. }
            | TemporalOperation::Compare { timezone, .. } => *timezone,
        }
    }
}

/// Which side of a comparison is earlier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Earlier {
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "compareDate")]
    CompareDate,
    #[serde(rename = "same")]
    Same,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalOutput {
    /// `YYYY/M/D H:MM:SS` in the operation's zone, or the comparison summary
    pub result: String,
    pub operation: String,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<String>,
    /// `date - compareDate` in whole days, truncated toward zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_difference: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earlier: Option<Earlier>,
}

/// Run an operation against the system clock
pub fn execute(operation: &TemporalOperation) -> Result<TemporalOutput, ToolError> {
    execute_at(operation, Utc::now())
}

/// Run an operation with an explicit "now"
pub fn execute_at(
    operation: &TemporalOperation,
    now: DateTime<Utc>,
) -> Result<TemporalOutput, ToolError> {
    let tz = operation.timezone();

    let instant = match operation {
        TemporalOperation::Current { .. } => now.with_timezone(&tz),
        TemporalOperation::Format { date, .. } => parse_date(date, tz)?,
        TemporalOperation::Add {
            date, amount, unit, ..
        } => offset(parse_date(date, tz)?, *amount, *unit)?,
        TemporalOperation::Subtract {
            date, amount, unit, ..
        } => {
            let negated = amount
                .checked_neg()
                .ok_or_else(|| ToolError::invalid_params("amount out of range"))?;
            offset(parse_date(date, tz)?, negated, *unit)?
        }
        TemporalOperation::Compare {
            date, compare_date, ..
        } => return compare(date, compare_date, tz),
    };

    Ok(TemporalOutput {
        result: display(&instant),
        operation: operation.name().to_string(),
        timezone: tz.name().to_string(),
        iso: Some(instant.to_rfc3339_opts(SecondsFormat::Secs, true)),
        days_difference: None,
        earlier: None,
    })
}

fn compare(date: &str, compare_date: &str, tz: Tz) -> Result<TemporalOutput, ToolError> {
    let first = parse_date(date, tz)?;
    let second = parse_date(compare_date, tz)?;

    let days = (first - second).num_days();
    let earlier = match first.cmp(&second) {
        std::cmp::Ordering::Less => Earlier::Date,
        std::cmp::Ordering::Greater => Earlier::CompareDate,
        std::cmp::Ordering::Equal => Earlier::Same,
    };
    let relation = match earlier {
        Earlier::Date => "date is earlier than compareDate",
        Earlier::CompareDate => "date is later than compareDate",
        Earlier::Same => "date is the same instant as compareDate",
    };

    Ok(TemporalOutput {
        result: format!("{} day(s) apart ({})", days.abs(), relation),
        operation: "compare".to_string(),
        timezone: tz.name().to_string(),
        iso: None,
        days_difference: Some(days),
        earlier: Some(earlier),
    })
}

/// Fixed `YYYY/M/D H:MM:SS` representation
pub fn display(instant: &DateTime<Tz>) -> String {
    format!(
        "{}/{}/{} {}:{:02}:{:02}",
        instant.year(),
        instant.month(),
        instant.day(),
        instant.hour(),
        instant.minute(),
        instant.second()
    )
}

/// Parse a date input in the given zone
pub fn parse_date(input: &str, tz: Tz) -> Result<DateTime<Tz>, ToolError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ToolError::invalid_date(input, "empty value"));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&tz));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return localize(naive, tz)
                .ok_or_else(|| ToolError::invalid_date(input, format!("does not exist in {}", tz)));
        }
    }

    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            let midnight = date.and_time(chrono::NaiveTime::MIN);
            return localize(midnight, tz)
                .ok_or_else(|| ToolError::invalid_date(input, format!("does not exist in {}", tz)));
        }
    }

    Err(ToolError::invalid_date(
        input,
        "expected RFC 3339, YYYY-MM-DD HH:MM[:SS] or YYYY-MM-DD",
    ))
}

/// Earliest instant for a wall-clock time; `None` inside a DST gap
fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest()
}

/// Calendar results landing in a DST gap move forward by the gap's width
fn localize_forward(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    localize(naive, tz).or_else(|| localize(naive.checked_add_signed(gap_width(naive, tz)?)?, tz))
}

/// Offset change across the transition nearest `naive`; `None` if it is not a gap
fn gap_width(naive: NaiveDateTime, tz: Tz) -> Option<TimeDelta> {
    let offset_at = |at: NaiveDateTime| {
        i64::from(tz.offset_from_utc_datetime(&at).fix().local_minus_utc())
    };
    let before = offset_at(naive.checked_sub_signed(TimeDelta::days(1))?);
    let after = offset_at(naive.checked_add_signed(TimeDelta::days(1))?);
    (after > before).then(|| TimeDelta::seconds(after - before))
}

fn offset(instant: DateTime<Tz>, amount: i64, unit: TimeUnit) -> Result<DateTime<Tz>, ToolError> {
    let out_of_range = || {
        ToolError::new(
            ErrorCode::InvalidInput,
            format!("offset of {} {:?} is out of range", amount, unit).to_lowercase(),
        )
    };
    let tz = instant.timezone();
    let local = instant.naive_local();

    let shifted = match unit {
        TimeUnit::Minutes => {
            let delta = TimeDelta::try_minutes(amount).ok_or_else(out_of_range)?;
            return instant.checked_add_signed(delta).ok_or_else(out_of_range);
        }
        TimeUnit::Hours => {
            let delta = TimeDelta::try_hours(amount).ok_or_else(out_of_range)?;
            return instant.checked_add_signed(delta).ok_or_else(out_of_range);
        }
        TimeUnit::Days => {
            let days = Days::new(amount.unsigned_abs());
            if amount >= 0 {
                local.checked_add_days(days)
            } else {
                local.checked_sub_days(days)
            }
        }
        TimeUnit::Months | TimeUnit::Years => {
            let months = if unit == TimeUnit::Years {
                amount.checked_mul(12).ok_or_else(out_of_range)?
            } else {
                amount
            };
            let count = u32::try_from(months.unsigned_abs()).map_err(|_| out_of_range())?;
            if months >= 0 {
                local.checked_add_months(Months::new(count))
            } else {
                local.checked_sub_months(Months::new(count))
            }
        }
    }
    .ok_or_else(out_of_range)?;

    localize_forward(shifted, tz).ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> Tz {
        chrono_tz::Asia::Tokyo
    }

    fn add(date: &str, amount: i64, unit: TimeUnit) -> TemporalOutput {
        execute(&TemporalOperation::Add {
            date: date.to_string(),
            amount,
            unit,
            timezone: Tz::UTC,
        })
        .unwrap()
    }

    fn subtract(date: &str, amount: i64, unit: TimeUnit) -> TemporalOutput {
        execute(&TemporalOperation::Subtract {
            date: date.to_string(),
            amount,
            unit,
            timezone: Tz::UTC,
        })
        .unwrap()
    }

    #[test]
    fn test_current_uses_clock_and_zone() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 5, 9).unwrap();
        let output = execute_at(&TemporalOperation::Current { timezone: tokyo() }, now).unwrap();
        assert_eq!(output.result, "2024/3/1 9:05:09");
        assert_eq!(output.timezone, "Asia/Tokyo");
        assert_eq!(output.iso.as_deref(), Some("2024-03-01T09:05:09+09:00"));
        assert_eq!(output.operation, "current");
    }

    #[test]
    fn test_format_converts_zone() {
        let output = execute(&TemporalOperation::Format {
            date: "2024-01-31T10:00:00Z".to_string(),
            timezone: tokyo(),
        })
        .unwrap();
        assert_eq!(output.result, "2024/1/31 19:00:00");
    }

    #[test]
    fn test_naive_input_is_wall_clock_in_zone() {
        let output = execute(&TemporalOperation::Format {
            date: "2024-01-31".to_string(),
            timezone: tokyo(),
        })
        .unwrap();
        assert_eq!(output.result, "2024/1/31 0:00:00");
        assert_eq!(output.iso.as_deref(), Some("2024-01-31T00:00:00+09:00"));
    }

    #[test]
    fn test_invalid_date() {
        let err = execute(&TemporalOperation::Format {
            date: "next tuesday".to_string(),
            timezone: tokyo(),
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDate);
        assert!(err.message.contains("next tuesday"));
    }

    #[test]
    fn test_add_units() {
        assert_eq!(add("2024-01-01T00:00:00Z", 90, TimeUnit::Minutes).result, "2024/1/1 1:30:00");
        assert_eq!(add("2024-01-01T00:00:00Z", 25, TimeUnit::Hours).result, "2024/1/2 1:00:00");
        assert_eq!(add("2024-12-30T08:00:00Z", 3, TimeUnit::Days).result, "2025/1/2 8:00:00");
        assert_eq!(add("2024-11-15T00:00:00Z", 3, TimeUnit::Months).result, "2025/2/15 0:00:00");
        assert_eq!(add("2024-02-29T00:00:00Z", 1, TimeUnit::Years).result, "2025/2/28 0:00:00");
    }

    #[test]
    fn test_negative_amount_and_subtract_agree() {
        assert_eq!(
            add("2024-03-10T00:00:00Z", -10, TimeUnit::Days).result,
            subtract("2024-03-10T00:00:00Z", 10, TimeUnit::Days).result
        );
    }

    #[test]
    fn test_month_end_clamps() {
        assert_eq!(add("2024-01-31T12:00:00Z", 1, TimeUnit::Months).result, "2024/2/29 12:00:00");
        assert_eq!(add("2023-01-31T12:00:00Z", 1, TimeUnit::Months).result, "2023/2/28 12:00:00");
    }

    #[test]
    fn test_round_trip_restores_instant() {
        for unit in [TimeUnit::Minutes, TimeUnit::Hours, TimeUnit::Days, TimeUnit::Months] {
            let forward = add("2024-05-15T06:30:00Z", 7, unit);
            let back = subtract(forward.iso.as_deref().unwrap(), 7, unit);
            assert_eq!(back.iso.as_deref(), Some("2024-05-15T06:30:00Z"), "{:?}", unit);
        }
    }

    #[test]
    fn test_round_trip_is_lossy_after_clamping() {
        let forward = add("2024-01-31T00:00:00Z", 1, TimeUnit::Months);
        let back = subtract(forward.iso.as_deref().unwrap(), 1, TimeUnit::Months);
        assert_eq!(back.result, "2024/1/29 0:00:00");
    }

    #[test]
    fn test_days_keep_wall_clock_across_dst() {
        let output = execute(&TemporalOperation::Add {
            date: "2024-03-09T12:00:00".to_string(),
            amount: 1,
            unit: TimeUnit::Days,
            timezone: chrono_tz::America::New_York,
        })
        .unwrap();
        assert_eq!(output.result, "2024/3/10 12:00:00");
        assert_eq!(output.iso.as_deref(), Some("2024-03-10T12:00:00-04:00"));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = execute(&TemporalOperation::Add {
            date: "2024-01-01".to_string(),
            amount: i64::MAX,
            unit: TimeUnit::Years,
            timezone: Tz::UTC,
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_offset_near_calendar_limit_is_reported() {
        let err = execute(&TemporalOperation::Add {
            date: "2024-12-31T23:30:00".to_string(),
            amount: 262_142 - 2024,
            unit: TimeUnit::Years,
            timezone: chrono_tz::America::New_York,
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.message.contains("out of range"), "{}", err.message);
    }

    #[test]
    fn test_dst_gap_moves_forward_by_gap_width() {
        // New York skips 02:00-03:00 on 2024-03-10
        let output = execute(&TemporalOperation::Add {
            date: "2024-03-09T02:30:00".to_string(),
            amount: 1,
            unit: TimeUnit::Days,
            timezone: chrono_tz::America::New_York,
        })
        .unwrap();
        assert_eq!(output.iso.as_deref(), Some("2024-03-10T03:30:00-04:00"));

        // Lord Howe skips 02:00-02:30 on 2024-10-06
        let output = execute(&TemporalOperation::Add {
            date: "2024-10-05T02:15:00".to_string(),
            amount: 1,
            unit: TimeUnit::Days,
            timezone: chrono_tz::Australia::Lord_Howe,
        })
        .unwrap();
        assert_eq!(output.iso.as_deref(), Some("2024-10-06T02:45:00+11:00"));
    }

    #[test]
    fn test_compare_sign_convention() {
        let output = execute(&TemporalOperation::Compare {
            date: "2024-03-10".to_string(),
            compare_date: "2024-03-01".to_string(),
            timezone: tokyo(),
        })
        .unwrap();
        assert_eq!(output.days_difference, Some(9));
        assert_eq!(output.earlier, Some(Earlier::CompareDate));
        assert_eq!(output.result, "9 day(s) apart (date is later than compareDate)");
        assert!(output.iso.is_none());
    }

    #[test]
    fn test_compare_truncates_toward_zero() {
        let output = execute(&TemporalOperation::Compare {
            date: "2024-03-01T00:00:00Z".to_string(),
            compare_date: "2024-03-02T23:00:00Z".to_string(),
            timezone: Tz::UTC,
        })
        .unwrap();
        assert_eq!(output.days_difference, Some(-1));
        assert_eq!(output.earlier, Some(Earlier::Date));
    }

    #[test]
    fn test_compare_same_instant_across_offsets() {
        let output = execute(&TemporalOperation::Compare {
            date: "2024-03-01T09:00:00+09:00".to_string(),
            compare_date: "2024-03-01T00:00:00Z".to_string(),
            timezone: Tz::UTC,
        })
        .unwrap();
        assert_eq!(output.days_difference, Some(0));
        assert_eq!(output.earlier, Some(Earlier::Same));
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["earlier"], "same");
        assert_eq!(json["daysDifference"], 0);
    }
}
