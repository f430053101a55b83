//! # Tick Dispatch
//!
//! The host delivers one [`TickEvent`] per elapsed second. Each event says
//! which time units rolled over since the previous tick, and only the
//! renderers gated on those units run:
//!
//! | Unit   | Renderers                          | Gate           |
//! |--------|------------------------------------|----------------|
//! | SECOND | seconds text                       | `show_seconds` |
//! | MINUTE | minute row                         |                |
//! | HOUR   | hour row, AM/PM text               |                |
//! | DAY    | date text, moon text               | `show_date`, `show_moon` |
//! | MONTH  | month text                         | `show_date`    |
//!
//! The dispatcher keeps no state between ticks. What is on screen lives in
//! the slot cache and the host's text fields.

use crate::config::FeatureConfig;
use crate::fields;
use crate::host::Host;
use crate::slot_cache::DigitSlotCache;
use chrono::{Datelike, NaiveDateTime, Timelike};
use log::debug;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::time::Duration;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Set of time units, as a bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TimeUnits(u8);

impl TimeUnits {
    pub const SECOND: TimeUnits = TimeUnits(1 << 0);
    pub const MINUTE: TimeUnits = TimeUnits(1 << 1);
    pub const HOUR: TimeUnits = TimeUnits(1 << 2);
    pub const DAY: TimeUnits = TimeUnits(1 << 3);
    pub const MONTH: TimeUnits = TimeUnits(1 << 4);
    pub const YEAR: TimeUnits = TimeUnits(1 << 5);

    const NAMES: [(TimeUnits, &'static str); 6] = [
        (Self::SECOND, "SECOND"),
        (Self::MINUTE, "MINUTE"),
        (Self::HOUR, "HOUR"),
        (Self::DAY, "DAY"),
        (Self::MONTH, "MONTH"),
        (Self::YEAR, "YEAR"),
    ];

    pub const fn empty() -> Self {
        TimeUnits(0)
    }

    pub const fn all() -> Self {
        TimeUnits(0b11_1111)
    }

    /// Builds a set from raw bits, dropping unknown ones.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        TimeUnits(bits & Self::all().0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: TimeUnits) -> bool {
        self.0 & other.0 == other.0
    }

    /// Units that rolled over going from `prev` to `now`. A unit counts as
    /// changed when the two times differ once truncated to that unit, so a
    /// new hour also flags MINUTE and SECOND. Without a previous time every
    /// unit is flagged.
    pub fn between(prev: Option<&NaiveDateTime>, now: &NaiveDateTime) -> Self {
        let Some(prev) = prev else {
            return Self::all();
        };

        let key = |t: &NaiveDateTime| {
            [
                t.year() as i64,
                i64::from(t.month()),
                i64::from(t.day()),
                i64::from(t.hour()),
                i64::from(t.minute()),
                i64::from(t.second()),
            ]
        };
        let (a, b) = (key(prev), key(now));

        // coarsest first: YEAR, MONTH, DAY, HOUR, MINUTE, SECOND
        let ladder = [
            Self::YEAR,
            Self::MONTH,
            Self::DAY,
            Self::HOUR,
            Self::MINUTE,
            Self::SECOND,
        ];
        let mut units = Self::empty();
        for (depth, unit) in ladder.into_iter().enumerate() {
            if a[..=depth] != b[..=depth] {
                units |= unit;
            }
        }
        units
    }
}

/// Time left until the wall clock reaches the next whole second after
/// `now`. Tick loops sleep this long first so their ticks land just past
/// each second boundary.
pub fn until_next_second(now: &NaiveDateTime) -> Duration {
    // leap seconds report nanoseconds past 1e9
    let nanos = u64::from(now.nanosecond() % NANOS_PER_SECOND);
    Duration::from_nanos(u64::from(NANOS_PER_SECOND) - nanos)
}

impl BitOr for TimeUnits {
    type Output = TimeUnits;

    fn bitor(self, rhs: TimeUnits) -> TimeUnits {
        TimeUnits(self.0 | rhs.0)
    }
}

impl BitOrAssign for TimeUnits {
    fn bitor_assign(&mut self, rhs: TimeUnits) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for TimeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for (unit, name) in Self::NAMES {
            if self.contains(unit) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}

/// One clock tick: the time snapshot and the units that rolled over.
/// Consumed once and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    pub time: NaiveDateTime,
    pub units_changed: TimeUnits,
}

impl TickEvent {
    pub fn new(time: NaiveDateTime, units_changed: TimeUnits) -> Self {
        Self {
            time,
            units_changed,
        }
    }
}

/// Routes tick events to the field renderers.
#[derive(Debug, Clone, Copy)]
pub struct TickDispatcher {
    features: FeatureConfig,
}

impl TickDispatcher {
    pub fn new(features: FeatureConfig) -> Self {
        Self { features }
    }

    /// Runs the renderers for every unit in `event.units_changed`.
    pub fn dispatch<H: Host, const N: usize>(
        &self,
        event: &TickEvent,
        cache: &mut DigitSlotCache<H, N>,
        host: &mut H,
    ) {
        let units = event.units_changed;
        let time = &event.time;
        debug!("tick {time}: {units:?}");

        if units.contains(TimeUnits::SECOND) && self.features.show_seconds {
            fields::update_seconds(host, time);
        }

        if units.contains(TimeUnits::MINUTE) {
            fields::update_minutes(cache, host, time);
        }

        if units.contains(TimeUnits::HOUR) {
            fields::update_hours(cache, host, time);
        }

        if units.contains(TimeUnits::DAY) {
            if self.features.show_date {
                fields::update_date(host, time);
            }
            if self.features.show_moon {
                fields::update_moon(host, time);
            }
        }

        if units.contains(TimeUnits::MONTH) && self.features.show_date {
            fields::update_month(host, time);
        }
    }
}
