//! Time and Timezone Utilities Module
//!
//! Resolves the instant used by the ephemeris sun model from user-facing
//! date/time strings and timezone choices.

use chrono::{DateTime, LocalResult, NaiveTime, TimeZone, Timelike, Utc};
use chrono_english::{Dialect, parse_date_string};
use chrono_tz::Tz;
use iana_time_zone::get_timezone;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

use crate::error::TwinError;

// tzf-rs DefaultFinder is pre-compiled and very fast
static TZF_FINDER: OnceLock<DefaultFinder> = OnceLock::new();

// ===================== TIME PARSING =====================

/// Parse a time string in HH:MM[:SS[.fffffffff]] format.
///
/// # Returns
/// Tuple of (hours, minutes, seconds, nanoseconds)
pub fn parse_time_ns(s: &str) -> Result<(u32, u32, u32, u32), TwinError> {
    let formats = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

    for fmt in formats {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            return Ok((t.hour(), t.minute(), t.second(), t.nanosecond()));
        }
    }
    Err(TwinError::Timestamp(format!(
        "'{}' is not a valid time; use HH:MM, HH:MM:SS, or HH:MM:SS.ns",
        s
    )))
}

/// Resolve the instant described by an optional date and an optional time
/// of day in `tz`.
///
/// * `date` - natural language date ("2025-06-21", "today", "next friday");
///   defaults to `now`
/// * `at` - time of day, or "now"; without it the date's own time is kept
pub fn resolve_instant(
    date: Option<&str>,
    at: Option<&str>,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<DateTime<Tz>, TwinError> {
    let anchor = now.with_timezone(&tz);
    let day = match date {
        Some(s) => parse_date_string(s, anchor, Dialect::Us)
            .map_err(|e| TwinError::Timestamp(format!("'{}': {}", s, e)))?
            .with_timezone(&tz),
        None => anchor,
    };

    let at = match at {
        None => return Ok(day),
        Some("now") => return Ok(anchor),
        Some(at) => at,
    };

    let (h, m, s, ns) = parse_time_ns(at)?;
    let naive = day
        .date_naive()
        .and_hms_nano_opt(h, m, s, ns)
        .ok_or_else(|| TwinError::Timestamp(format!("invalid time digits in '{}'", at)))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => Ok(t),
        LocalResult::Ambiguous(early, late) => {
            log::warn!(
                "time {} is ambiguous (DST transition); using {} rather than {}",
                at,
                early.format("%H:%M:%S %Z"),
                late.format("%H:%M:%S %Z")
            );
            Ok(early)
        }
        LocalResult::None => Err(TwinError::Timestamp(format!(
            "{} does not exist on {} in {} (DST gap)",
            at,
            day.date_naive(),
            tz
        ))),
    }
}

// ===================== TIMEZONE UTILITIES =====================

/// Get the system's configured timezone.
///
/// Falls back to UTC if the system timezone cannot be determined.
pub fn system_timezone() -> Tz {
    get_timezone().ok().and_then(|s| s.parse().ok()).unwrap_or(Tz::UTC)
}

/// Resolve timezone from geographic coordinates, or UTC if resolution fails.
pub fn resolve_timezone(lon: f64, lat: f64) -> Tz {
    let finder = TZF_FINDER.get_or_init(DefaultFinder::new);
    let tzid = finder.get_tz_name(lon, lat);
    tzid.parse::<Tz>().unwrap_or(Tz::UTC)
}

/// Pick a timezone from a CLI-style choice: "system", "location", or an
/// IANA name. "location" needs coordinates and falls back to UTC without.
pub fn choose_timezone(choice: &str, location: Option<(f64, f64)>) -> Result<Tz, TwinError> {
    match choice {
        "system" => Ok(system_timezone()),
        "location" => Ok(location.map(|(lon, lat)| resolve_timezone(lon, lat)).unwrap_or(Tz::UTC)),
        other => other
            .parse()
            .map_err(|_| TwinError::Timestamp(format!("unknown time zone '{}'", other))),
    }
}

// ===================== TESTS =====================
