//! Two-digit rows on top of the slot cache.
//!
//! Rows are ordered on screen as row 0 (hours) above row 1 (minutes); the
//! slot for a column is `row * 2 + column`, column 0 being the tens digit.

use crate::host::LayerTree;
use crate::slot_cache::DigitSlotCache;

/// Columns per row.
pub const ROW_WIDTH: usize = 2;

/// Shows `value % 100` on `row`.
///
/// Every column is unloaded and then reloaded, even when the digit did not
/// change. The tens column stays blank for a zero tens digit unless
/// `show_leading_zero` is set, so 7 renders as " 7" instead of "07".
pub fn render_row<H: LayerTree, const N: usize>(
    cache: &mut DigitSlotCache<H, N>,
    host: &mut H,
    value: u16,
    row: usize,
    show_leading_zero: bool,
) {
    let Some(first) = row.checked_mul(ROW_WIDTH) else {
        return;
    };
    let mut value = value % 100;

    // least significant column first, it makes digit extraction easy
    for column in (0..ROW_WIDTH).rev() {
        let Some(slot) = first.checked_add(column) else {
            return;
        };
        cache.unload(host, slot);
        if !(value == 0 && column == 0 && !show_leading_zero) {
            cache.load(host, slot, (value % 10) as u8);
        }
        value /= 10;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SLOT_POSITIONS;
    use crate::slot_cache::DigitResourceTable;
    use crate::tests::recording_host::{Call, RecordingHost};

    fn setup() -> (DigitSlotCache<RecordingHost>, RecordingHost) {
        (
            DigitSlotCache::new(SLOT_POSITIONS, DigitResourceTable::default()),
            RecordingHost::default(),
        )
    }

    #[test]
    fn test_minutes_keep_leading_zero() {
        let (mut cache, mut host) = setup();
        render_row(&mut cache, &mut host, 5, 1, true);
        assert_eq!(cache.digit_at(2), Some(0));
        assert_eq!(cache.digit_at(3), Some(5));
        assert_eq!(cache.digit_at(0), None);
        assert_eq!(cache.digit_at(1), None);
    }

    #[test]
    fn test_hours_suppress_leading_zero() {
        let (mut cache, mut host) = setup();
        render_row(&mut cache, &mut host, 5, 0, false);
        assert_eq!(cache.digit_at(0), None);
        assert_eq!(cache.digit_at(1), Some(5));
        assert_eq!(host.resident_count(), 1);
    }

    #[test]
    fn test_zero_without_leading_zero() {
        let (mut cache, mut host) = setup();
        render_row(&mut cache, &mut host, 0, 0, false);
        assert_eq!(cache.digit_at(0), None);
        assert_eq!(cache.digit_at(1), Some(0));

        render_row(&mut cache, &mut host, 0, 1, true);
        assert_eq!(cache.digit_at(2), Some(0));
        assert_eq!(cache.digit_at(3), Some(0));
    }

    #[test]
    fn test_two_digit_value_ignores_suppression() {
        let (mut cache, mut host) = setup();
        render_row(&mut cache, &mut host, 12, 0, false);
        assert_eq!(cache.digit_at(0), Some(1));
        assert_eq!(cache.digit_at(1), Some(2));
    }

    #[test]
    fn test_value_wraps_at_hundred() {
        let (mut cache, mut host) = setup();
        render_row(&mut cache, &mut host, 1234, 1, true);
        assert_eq!(cache.digit_at(2), Some(3));
        assert_eq!(cache.digit_at(3), Some(4));

        render_row(&mut cache, &mut host, 100, 0, false);
        assert_eq!(cache.digit_at(0), None);
        assert_eq!(cache.digit_at(1), Some(0));
    }

    #[test]
    fn test_replaces_previous_digits() {
        let (mut cache, mut host) = setup();
        render_row(&mut cache, &mut host, 59, 1, true);
        render_row(&mut cache, &mut host, 0, 1, true);
        assert_eq!(cache.digit_at(2), Some(0));
        assert_eq!(cache.digit_at(3), Some(0));
        assert_eq!(host.resident_count(), 2);

        render_row(&mut cache, &mut host, 12, 0, false);
        render_row(&mut cache, &mut host, 1, 0, false);
        assert_eq!(cache.digit_at(0), None);
        assert_eq!(cache.digit_at(1), Some(1));
        assert_eq!(host.resident_count(), 3);
    }

    #[test]
    fn test_unchanged_value_still_reloads() {
        let (mut cache, mut host) = setup();
        render_row(&mut cache, &mut host, 42, 1, true);
        host.calls.clear();
        render_row(&mut cache, &mut host, 42, 1, true);

        let releases = host
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Release(_)))
            .count();
        let acquires = host
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Acquire(_)))
            .count();
        assert_eq!(releases, 2);
        assert_eq!(acquires, 2);
        assert_eq!(cache.digit_at(2), Some(4));
        assert_eq!(cache.digit_at(3), Some(2));
    }

    #[test]
    fn test_row_outside_cache_is_ignored() {
        let (mut cache, mut host) = setup();
        render_row(&mut cache, &mut host, 88, 2, true);
        assert!(host.calls.is_empty());
        assert_eq!(cache.occupied(), 0);
    }

    #[test]
    fn test_huge_row_is_ignored() {
        let (mut cache, mut host) = setup();
        render_row(&mut cache, &mut host, 12, usize::MAX, false);
        render_row(&mut cache, &mut host, 12, usize::MAX / ROW_WIDTH, true);
        assert!(host.calls.is_empty());
        assert_eq!(cache.occupied(), 0);
    }
}
