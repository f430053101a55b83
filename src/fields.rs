//! # Display Field Renderers
//!
//! One function per time component. The hour and minute rows go through the
//! digit slot cache; everything else is text written into fixed-capacity
//! host fields.
//!
//! | Renderer          | Output                    | Example  |
//! |-------------------|---------------------------|----------|
//! | [`update_seconds`]| seconds field, `%S`       | `07`     |
//! | [`update_minutes`]| row 1, leading zero kept  | `05`     |
//! | [`update_hours`]  | row 0 + AM/PM field       | ` 9` PM  |
//! | [`update_date`]   | date field, `%m-%d`       | `03-14`  |
//! | [`update_month`]  | month field, `%b`         | `Mar`    |
//! | [`update_moon`]   | moon field, phase index   | `4`      |

use crate::host::{ClockSource, LayerTree, TextField, TextFields};
use crate::lunar::MoonPhase;
use crate::row::render_row;
use crate::slot_cache::DigitSlotCache;
use arrayvec::ArrayString;
use chrono::{Datelike, NaiveDateTime, Timelike};
use log::{debug, warn};
use std::fmt::{self, Write};

/// Stack buffer large enough for any text field.
pub type FieldText = ArrayString<8>;

/// Hour row index.
pub const HOUR_ROW: usize = 0;
/// Minute row index.
pub const MINUTE_ROW: usize = 1;

/// Hour as shown on the face: unchanged in 24-hour style, otherwise the
/// 12-hour wall-clock value (0 and 12 both show as 12).
pub fn display_hour(hour: u32, use_24h: bool) -> u32 {
    if use_24h {
        return hour;
    }
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

/// Writes into the buffer until the field's capacity is reached.
struct FieldWriter<'a> {
    buf: &'a mut FieldText,
    room: usize,
    truncated: bool,
}

impl Write for FieldWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.room == 0 || self.buf.try_push(ch).is_err() {
                self.truncated = true;
                break;
            }
            self.room -= 1;
        }
        Ok(())
    }
}

/// Formats `content` for `field`, cut to the field's capacity.
pub fn field_text(field: TextField, content: impl fmt::Display) -> FieldText {
    let mut buf = FieldText::new();
    let mut writer = FieldWriter {
        buf: &mut buf,
        room: field.capacity(),
        truncated: false,
    };
    if write!(writer, "{content}").is_err() {
        warn!("{field:?}: formatting failed");
    }
    if writer.truncated {
        warn!("{field:?}: text truncated to {} characters", field.capacity());
    }
    buf
}

pub fn update_seconds<H: TextFields>(host: &mut H, time: &NaiveDateTime) {
    let text = field_text(TextField::Seconds, time.format("%S"));
    host.set_text(TextField::Seconds, &text);
}

pub fn update_minutes<H: LayerTree, const N: usize>(
    cache: &mut DigitSlotCache<H, N>,
    host: &mut H,
    time: &NaiveDateTime,
) {
    render_row(cache, host, time.minute() as u16, MINUTE_ROW, true);
}

/// Hour row plus the AM/PM marker. The marker is left untouched in 24-hour
/// style.
pub fn update_hours<H, const N: usize>(
    cache: &mut DigitSlotCache<H, N>,
    host: &mut H,
    time: &NaiveDateTime,
) where
    H: LayerTree + TextFields + ClockSource,
{
    let use_24h = host.is_24h_style();
    let hour = display_hour(time.hour(), use_24h);
    render_row(cache, host, hour as u16, HOUR_ROW, false);

    if !use_24h {
        let text = field_text(TextField::AmPm, time.format("%p"));
        host.set_text(TextField::AmPm, &text);
    }
}

pub fn update_date<H: TextFields>(host: &mut H, time: &NaiveDateTime) {
    let text = field_text(TextField::Date, time.format("%m-%d"));
    host.set_text(TextField::Date, &text);
}

pub fn update_month<H: TextFields>(host: &mut H, time: &NaiveDateTime) {
    let text = field_text(TextField::Month, time.format("%b"));
    host.set_text(TextField::Month, &text);
}

pub fn update_moon<H: TextFields>(host: &mut H, time: &NaiveDateTime) {
    let phase = MoonPhase::on(time.year(), time.month(), time.day());
    debug!("moon: {} ({})", phase.name(), phase.index());
    let text = field_text(TextField::Moon, phase.index());
    host.set_text(TextField::Moon, &text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SLOT_POSITIONS;
    use crate::slot_cache::DigitResourceTable;
    use crate::tests::recording_host::{at, RecordingHost};

    #[test]
    fn test_display_hour() {
        assert_eq!(display_hour(0, false), 12);
        assert_eq!(display_hour(12, false), 12);
        assert_eq!(display_hour(13, false), 1);
        assert_eq!(display_hour(23, false), 11);
        assert_eq!(display_hour(9, false), 9);
        assert_eq!(display_hour(13, true), 13);
        assert_eq!(display_hour(0, true), 0);
    }

    #[test]
    fn test_field_text_truncates() {
        assert_eq!(field_text(TextField::Seconds, "07").as_str(), "07");
        assert_eq!(field_text(TextField::Seconds, "123").as_str(), "12");
        assert_eq!(field_text(TextField::Month, "September").as_str(), "Sep");
        assert_eq!(field_text(TextField::Moon, 4).as_str(), "4");
    }

    #[test]
    fn test_text_renderers() {
        let mut host = RecordingHost::default();
        let time = at(2024, 3, 14, 21, 5, 7);

        update_seconds(&mut host, &time);
        update_date(&mut host, &time);
        update_month(&mut host, &time);
        update_moon(&mut host, &time);

        assert_eq!(host.text(TextField::Seconds), Some("07"));
        assert_eq!(host.text(TextField::Date), Some("03-14"));
        assert_eq!(host.text(TextField::Month), Some("Mar"));
        let moon = host.text(TextField::Moon).map(str::to_string);
        assert_eq!(
            moon,
            Some(crate::lunar::moon_phase(2024, 3, 14).to_string())
        );
    }

    #[test]
    fn test_new_moon_text_is_zero() {
        let mut host = RecordingHost::default();
        update_moon(&mut host, &at(2000, 1, 6, 12, 0, 0));
        assert_eq!(host.text(TextField::Moon), Some("0"));
    }

    #[test]
    fn test_hours_twelve_hour_style() {
        let mut host = RecordingHost::default();
        let mut cache: DigitSlotCache<RecordingHost> =
            DigitSlotCache::new(SLOT_POSITIONS, DigitResourceTable::default());

        update_hours(&mut cache, &mut host, &at(2024, 3, 14, 21, 5, 7));
        assert_eq!(cache.digit_at(0), None);
        assert_eq!(cache.digit_at(1), Some(9));
        assert_eq!(host.text(TextField::AmPm), Some("PM"));

        update_hours(&mut cache, &mut host, &at(2024, 3, 15, 0, 0, 0));
        assert_eq!(cache.digit_at(0), Some(1));
        assert_eq!(cache.digit_at(1), Some(2));
        assert_eq!(host.text(TextField::AmPm), Some("AM"));
    }

    #[test]
    fn test_hours_twenty_four_hour_style() {
        let mut host = RecordingHost {
            use_24h: true,
            ..RecordingHost::default()
        };
        let mut cache: DigitSlotCache<RecordingHost> =
            DigitSlotCache::new(SLOT_POSITIONS, DigitResourceTable::default());

        update_hours(&mut cache, &mut host, &at(2024, 3, 14, 21, 5, 7));
        assert_eq!(cache.digit_at(0), Some(2));
        assert_eq!(cache.digit_at(1), Some(1));
        assert_eq!(host.text(TextField::AmPm), None);

        update_hours(&mut cache, &mut host, &at(2024, 3, 14, 7, 0, 0));
        assert_eq!(cache.digit_at(0), None);
        assert_eq!(cache.digit_at(1), Some(7));
    }

    #[test]
    fn test_minutes_row() {
        let mut host = RecordingHost::default();
        let mut cache: DigitSlotCache<RecordingHost> =
            DigitSlotCache::new(SLOT_POSITIONS, DigitResourceTable::default());
        update_minutes(&mut cache, &mut host, &at(2024, 3, 14, 21, 5, 7));
        assert_eq!(cache.digit_at(2), Some(0));
        assert_eq!(cache.digit_at(3), Some(5));
    }
}
