//! # Watch Face Lifecycle
//!
//! [`WatchFace`] owns the slot cache and the separator glyph and borrows the
//! host for its whole life:
//!
//! 1. **Setup** ([`WatchFace::new`]): create the text fields, attach the
//!    separator, paint every field for the host's current time.
//! 2. **Ticks** ([`WatchFace::handle_tick`]): forward to the dispatcher.
//! 3. **Teardown** (`Drop`): release every slot and the separator, once.

use crate::config::Config;
use crate::dispatcher::{TickDispatcher, TickEvent, TimeUnits};
use crate::host::{Host, Layer, TextField, IMAGE_COLON};
use crate::layout::{COLON_POSITION, SLOT_POSITIONS};
use crate::slot_cache::{release_visual, DigitResourceTable, DigitSlotCache};
use log::{info, warn};

/// The display controller.
pub struct WatchFace<'h, H: Host> {
    host: &'h mut H,
    cache: DigitSlotCache<H>,
    dispatcher: TickDispatcher,
    separator: Option<H::Handle>,
}

impl<'h, H: Host> WatchFace<'h, H> {
    /// Builds the face on `host` and paints it for `host.now()`.
    pub fn new(host: &'h mut H, config: &Config) -> Self {
        let layout = config.display.layout;
        for field in TextField::ALL {
            host.init_field(field, layout.field_frame(field));
        }

        let separator = match host.acquire(IMAGE_COLON) {
            Ok(handle) => match host.attach(&handle, Layer::Face, COLON_POSITION) {
                Ok(()) => Some(handle),
                Err(e) => {
                    warn!("separator: attach failed: {e}");
                    if let Err(e) = host.release(handle) {
                        warn!("separator: release after failed attach: {e}");
                    }
                    None
                }
            },
            Err(e) => {
                warn!("separator: acquire failed: {e}");
                None
            }
        };

        let mut face = WatchFace {
            host,
            cache: DigitSlotCache::new(SLOT_POSITIONS, DigitResourceTable::default()),
            dispatcher: TickDispatcher::new(config.features),
            separator,
        };

        // avoids a blank screen until the first tick arrives
        let now = face.host.now();
        face.handle_tick(&TickEvent::new(now, TimeUnits::all()));
        info!("watch face ready ({layout:?} layout)");
        face
    }

    /// Updates the fields whose units changed.
    pub fn handle_tick(&mut self, event: &TickEvent) {
        self.dispatcher
            .dispatch(event, &mut self.cache, &mut *self.host);
    }

    pub fn cache(&self) -> &DigitSlotCache<H> {
        &self.cache
    }

    pub fn host(&self) -> &H {
        &*self.host
    }

    #[cfg(test)]
    pub(crate) fn host_mut(&mut self) -> &mut H {
        &mut *self.host
    }

    /// Releases every slot and the separator. Safe to call more than once.
    fn teardown(&mut self) {
        self.cache.clear(&mut *self.host);
        if let Some(handle) = self.separator.take() {
            if let Err(e) = release_visual(&mut *self.host, handle) {
                warn!("separator: teardown: {e}");
            }
        }
    }
}

impl<H: Host> Drop for WatchFace<'_, H> {
    fn drop(&mut self) {
        self.teardown();
        info!("watch face torn down");
    }
}
