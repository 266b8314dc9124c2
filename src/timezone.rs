//! Civil-time calendar for the fixed meter timezone
//!
//! Utility exports carry local wall-clock fields with no offset information,
//! so resolving them to absolute instants needs the zone's real offset table
//! rather than fixed-offset arithmetic. The [`Calendar`] trait is the single
//! seam for that: one production implementation backed by the IANA database
//! via `chrono-tz`, and a fixed-table fake for deterministic DST tests.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// The zone every export's wall-clock fields are interpreted in. Not
/// configurable per record.
pub const METER_TIMEZONE: Tz = Tz::America__Los_Angeles;

/// Timezone-aware calendar used for instant resolution and civil formatting
pub trait Calendar: Send + Sync {
    /// Resolve a local wall-clock (date, time) pair to the absolute instant
    /// it names in this calendar's zone.
    fn resolve_instant(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc>;

    /// Local calendar date an instant falls on.
    fn civil_date(&self, instant: DateTime<Utc>) -> NaiveDate;

    /// Local wall-clock time of an instant.
    fn civil_time(&self, instant: DateTime<Utc>) -> NaiveTime;

    /// Instant of local midnight on `date`.
    fn local_midnight(&self, date: NaiveDate) -> DateTime<Utc> {
        self.resolve_instant(date, NaiveTime::MIN)
    }
}

/// Production calendar backed by the host timezone database
#[derive(Debug, Clone, Copy)]
pub struct ZoneCalendar {
    tz: Tz,
}

impl ZoneCalendar {
    /// Create a calendar for an arbitrary zone (tests aside, callers use
    /// [`Default`], which pins [`METER_TIMEZONE`]).
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The zone this calendar resolves against
    pub fn tz(&self) -> Tz {
        self.tz
    }

    fn offset_seconds_at(&self, utc: chrono::NaiveDateTime) -> i64 {
        i64::from(self.tz.offset_from_utc_datetime(&utc).fix().local_minus_utc())
    }
}

impl Default for ZoneCalendar {
    fn default() -> Self {
        Self::new(METER_TIMEZONE)
    }
}

impl Calendar for ZoneCalendar {
    fn resolve_instant(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        // Guess the instant by reading the wall clock as if it were UTC, then
        // correct by the zone's actual offset. A first lookup at the guess can
        // land on the wrong side of a DST transition; one more lookup at the
        // corrected instant settles it.
        let naive = date.and_time(time);
        let guess = Utc.from_utc_datetime(&naive);
        let offset = self.offset_seconds_at(naive);
        let corrected = guess - Duration::seconds(offset);
        let settled = self.offset_seconds_at(corrected.naive_utc());
        if settled == offset {
            corrected
        } else {
            guess - Duration::seconds(settled)
        }
    }

    fn civil_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    fn civil_time(&self, instant: DateTime<Utc>) -> NaiveTime {
        instant.with_timezone(&self.tz).time()
    }
}
