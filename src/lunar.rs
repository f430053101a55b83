//! Moon-phase bucket for the watch face (coarse 8-way approximation)
//!
//! Same closed-form shape as the Sky & Telescope phase routine: shift the
//! calendar to a March-based year, accumulate elapsed days from a reference
//! full moon, divide by the synodic month and keep the fractional part.
//! Accuracy: ±1 bucket. The epoch constant is calibrated against the
//! 2013-01-26 20:35 PST full moon, not derived from an ephemeris.

/// Days from the calendar origin to the reference full moon.
const JD_MOON_EPOCH_DELTA: f64 = 735_262.857_6;

/// Mean synodic month length in days.
const SYNODIC_MONTH: f64 = 29.530_59;

/// Average month length (365.25 / 12) used for the month term.
const MEAN_MONTH_DAYS: f64 = 30.438;

/// Return the phase index 0 – 7 (0 = new, 4 = full) for a Y-M-D date.
///
/// `month` is 1 = Jan … 12 = Dec. Any input is accepted; out-of-range
/// months or days just move the elapsed-day count along.
pub fn moon_phase(year: i32, month: u32, day: u32) -> u8 {
    // Jan/Feb count as months 13/14 of the previous year
    let (mut y, mut m) = (i64::from(year), i64::from(month));
    if m < 3 {
        y -= 1;
        m += 12;
    }
    m += 1;

    let c = (365.25 * y as f64).floor();
    let e = (MEAN_MONTH_DAYS * m as f64).floor();
    let days = c + e + f64::from(day) - JD_MOON_EPOCH_DELTA;

    let mut cycles = days / SYNODIC_MONTH;
    cycles -= cycles.floor(); // fractional part, always in [0, 1)

    // 0 and 8 are the same bucket
    (((cycles * 8.0) + 0.5) as u8) & 7
}

/// Named phase bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    const ALL: [MoonPhase; 8] = [
        MoonPhase::New,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::Full,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Phase on the given date, see [`moon_phase`].
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        Self::from_index(moon_phase(year, month, day))
    }

    /// Bucket for an index; indices wrap modulo 8.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[usize::from(index & 7)]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            MoonPhase::New => "new moon",
            MoonPhase::WaxingCrescent => "waxing crescent",
            MoonPhase::FirstQuarter => "first quarter",
            MoonPhase::WaxingGibbous => "waxing gibbous",
            MoonPhase::Full => "full moon",
            MoonPhase::WaningGibbous => "waning gibbous",
            MoonPhase::LastQuarter => "last quarter",
            MoonPhase::WaningCrescent => "waning crescent",
        }
    }
}
