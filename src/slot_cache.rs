//! # Digit Slot Cache
//!
//! A fixed pool of display slots, each holding at most one digit bitmap.
//! The pool bounds how many digit images are resident at once: no matter how
//! many different values the face shows over its lifetime, never more than
//! `N` digit bitmaps are acquired from the provider.
//!
//! ## Contract
//! - [`DigitSlotCache::load`] ignores out-of-range slots, out-of-range digits
//!   and occupied slots. It never overwrites; callers unload first.
//! - [`DigitSlotCache::unload`] is idempotent.
//! - A slot is [`Slot::Empty`] exactly when it holds no handle.
//!
//! Host failures are logged and degrade to an empty slot; nothing is
//! reported to the caller, there is nobody on a watch face to report to.

use crate::host::{HostError, Layer, LayerTree, ResourceId, IMAGE_NUM};
use embedded_graphics::prelude::Point;
use log::{debug, warn};

/// Number of digit slots on the face: two rows of two columns.
pub const TOTAL_IMAGE_SLOTS: usize = 4;

/// A decimal digit, 0 – 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Digit(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Immutable digit → resource mapping, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitResourceTable([ResourceId; 10]);

impl DigitResourceTable {
    pub fn get(&self, digit: Digit) -> ResourceId {
        self.0[usize::from(digit.value())]
    }
}

impl Default for DigitResourceTable {
    fn default() -> Self {
        Self(IMAGE_NUM)
    }
}

/// State of one slot. The handle lives inside the occupied variant, so an
/// empty slot cannot hold a resource.
#[derive(Debug)]
pub enum Slot<T> {
    Empty,
    Occupied { digit: Digit, handle: T },
}

impl<T> Slot<T> {
    pub fn digit(&self) -> Option<Digit> {
        match self {
            Slot::Empty => None,
            Slot::Occupied { digit, .. } => Some(*digit),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// Fixed-size, array-backed slot pool.
pub struct DigitSlotCache<H: LayerTree, const N: usize = TOTAL_IMAGE_SLOTS> {
    slots: [Slot<H::Handle>; N],
    positions: [Point; N],
    resources: DigitResourceTable,
}

impl<H: LayerTree, const N: usize> DigitSlotCache<H, N> {
    /// Creates an all-empty cache. `positions[i]` is where slot `i` is drawn.
    pub fn new(positions: [Point; N], resources: DigitResourceTable) -> Self {
        Self {
            slots: std::array::from_fn(|_| Slot::Empty),
            positions,
            resources,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Digit bound to `slot`, `None` when empty or out of range.
    pub fn digit_at(&self, slot: usize) -> Option<u8> {
        self.slots
            .get(slot)
            .and_then(Slot::digit)
            .map(Digit::value)
    }

    /// Screen position of `slot`.
    pub fn position(&self, slot: usize) -> Option<Point> {
        self.positions.get(slot).copied()
    }

    /// Number of slots currently holding a bitmap.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// Binds the bitmap for `digit` into `slot` and attaches it to the window.
    pub fn load(&mut self, host: &mut H, slot: usize, digit: u8) {
        if slot >= N {
            return;
        }
        let Some(digit) = Digit::new(digit) else {
            return;
        };
        if !self.slots[slot].is_empty() {
            return;
        }

        let resource = self.resources.get(digit);
        let handle = match host.acquire(resource) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("slot {slot}: could not acquire digit {}: {e}", digit.value());
                return;
            }
        };

        if let Err(e) = host.attach(&handle, Layer::Window, self.positions[slot]) {
            warn!("slot {slot}: could not attach digit {}: {e}", digit.value());
            if let Err(e) = host.release(handle) {
                warn!("slot {slot}: release after failed attach: {e}");
            }
            return;
        }

        debug!("slot {slot}: loaded digit {}", digit.value());
        self.slots[slot] = Slot::Occupied { digit, handle };
    }

    /// Detaches and releases whatever `slot` holds. Empty or out-of-range
    /// slots are left alone.
    pub fn unload(&mut self, host: &mut H, slot: usize) {
        let Some(entry) = self.slots.get_mut(slot) else {
            return;
        };
        // the slot is empty from here on, whatever the host says
        let Slot::Occupied { digit, handle } = std::mem::replace(entry, Slot::Empty) else {
            return;
        };

        if let Err(e) = release_visual(host, handle) {
            warn!("slot {slot}: unloading digit {}: {e}", digit.value());
        }
        debug!("slot {slot}: unloaded digit {}", digit.value());
    }

    /// Unloads every slot.
    pub fn clear(&mut self, host: &mut H) {
        for slot in 0..N {
            self.unload(host, slot);
        }
    }
}

/// Detaches then releases a visual. Release is attempted even when detach
/// fails; the first error is returned.
pub(crate) fn release_visual<H: LayerTree>(host: &mut H, handle: H::Handle) -> Result<(), HostError> {
    let detached = host.detach(&handle);
    let released = host.release(handle);
    detached.and(released)
}
