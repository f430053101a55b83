//! # Lunar Watchface Core Library
//!
//! This library drives an always-on watch face: hours and minutes drawn with
//! digit bitmaps, seconds, date, month and a moon-phase glyph drawn as text.
//! It is built for a wearable whose RAM fits only a handful of bitmaps at
//! once.
//!
//! ## Design Philosophy
//!
//! ### Memory Budget
//! - **Fixed slot pool**: the four digit positions are the only places a digit
//!   bitmap can live, so at most four digit images are ever resident
//! - **Unload before load**: a slot is always emptied before it is refilled;
//!   the cache refuses to overwrite
//! - **Stack text**: field text is formatted into fixed-capacity buffers
//!
//! ### Selective Updates
//! The host ticks once a second with a mask of the units that rolled over.
//! Only the fields tied to those units are redrawn: a plain second touches
//! the seconds text and nothing else.
//!
//! ### Quiet Failure
//! A watch face has no error channel. Invalid slot or digit requests are
//! ignored, and host failures are logged and degrade to an empty slot.
//!
//! ## Data Flow
//! 1. **Host** delivers a [`TickEvent`] (time snapshot + [`TimeUnits`])
//! 2. **[`TickDispatcher`]** picks the field renderers for the set units
//! 3. **Renderers** write text fields or hand a two-digit row to [`row::render_row`]
//! 4. **[`DigitSlotCache`]** unloads and loads bitmaps through the host
//!
//! ## Example
//! ```
//! use watchface_lib::{config::Config, emulator::EmulatedHost, WatchFace};
//! use watchface_lib::{TickEvent, TimeUnits, TextField};
//! use chrono::NaiveDate;
//!
//! let config = Config::default();
//! let mut host = EmulatedHost::new(&config);
//! let now = NaiveDate::from_ymd_opt(2024, 3, 14)
//!     .unwrap()
//!     .and_hms_opt(9, 41, 0)
//!     .unwrap();
//! host.pin_time(now);
//!
//! let mut face = WatchFace::new(&mut host, &config);
//! assert_eq!(face.cache().digit_at(1), Some(9));
//!
//! let next = now + chrono::Duration::seconds(1);
//! face.handle_tick(&TickEvent::new(next, TimeUnits::SECOND));
//! assert_eq!(face.host().text(TextField::Seconds), Some("01"));
//! ```

pub mod config;
pub mod dispatcher;
pub mod emulator;
pub mod face;
pub mod fields;
pub mod host;
pub mod layout;
pub mod lunar;
pub mod row;
pub mod slot_cache;

#[cfg(test)]
mod tests;

pub use dispatcher::{TickDispatcher, TickEvent, TimeUnits};
pub use face::WatchFace;
pub use host::{Host, HostError, TextField};
pub use lunar::{moon_phase, MoonPhase};
pub use slot_cache::{DigitSlotCache, Slot};
