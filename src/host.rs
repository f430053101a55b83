//! # Host Collaborators
//!
//! The watch face never paints pixels, loads fonts or runs an event loop
//! itself. Those belong to the host platform, which is reached through the
//! traits in this module:
//!
//! - [`BitmapProvider`]: acquires and releases packaged bitmap resources
//! - [`LayerTree`]: attaches bitmaps to (and detaches them from) the screen
//! - [`TextFields`]: fixed-capacity text outputs
//! - [`ClockSource`]: wall-clock time and the 12h/24h preference
//!
//! [`Host`] is implemented for every type providing all four, so the face
//! only ever needs one `&mut H`.

use chrono::NaiveDateTime;
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;
use std::fmt;
use thiserror::Error;

/// Opaque identifier of a packaged bitmap resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(pub u32);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Packaged digit images, index = digit value.
pub const IMAGE_NUM: [ResourceId; 10] = [
    ResourceId(1),
    ResourceId(2),
    ResourceId(3),
    ResourceId(4),
    ResourceId(5),
    ResourceId(6),
    ResourceId(7),
    ResourceId(8),
    ResourceId(9),
    ResourceId(10),
];

/// Packaged separator glyph shown between hours and minutes.
pub const IMAGE_COLON: ResourceId = ResourceId(11);

/// Errors reported by a host implementation.
#[derive(Error, Debug)]
pub enum HostError {
    /// The resource is not part of the application package
    #[error("resource {0} is not packaged")]
    MissingResource(ResourceId),

    /// A handle the host does not know about (already released, or foreign)
    #[error("bitmap handle {0} is not resident")]
    UnknownHandle(u32),

    /// Attaching or detaching a visual failed
    #[error("layer operation failed: {0}")]
    Layer(String),
}

/// Layers the face attaches visuals to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Root window layer, holds the digit bitmaps
    Window,
    /// Face layer, holds the text fields and the separator
    Face,
}

/// Text outputs of the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextField {
    Month,
    Date,
    AmPm,
    Seconds,
    Moon,
}

impl TextField {
    pub const ALL: [TextField; 5] = [
        TextField::Month,
        TextField::Date,
        TextField::AmPm,
        TextField::Seconds,
        TextField::Moon,
    ];

    /// Number of characters the field's buffer holds.
    pub fn capacity(self) -> usize {
        match self {
            TextField::Month => 3,
            TextField::Date => 5,
            TextField::AmPm => 2,
            TextField::Seconds => 2,
            TextField::Moon => 2,
        }
    }
}

/// Source of packaged bitmaps. The provider owns the pixel data; callers
/// only own the handle until they give it back.
pub trait BitmapProvider {
    type Handle;

    fn acquire(&mut self, resource: ResourceId) -> Result<Self::Handle, HostError>;

    /// Gives the bitmap back. Consumes the handle so it cannot be released twice.
    fn release(&mut self, handle: Self::Handle) -> Result<(), HostError>;
}

/// Screen layer tree. Visuals are the bitmap handles themselves.
pub trait LayerTree: BitmapProvider {
    fn attach(&mut self, visual: &Self::Handle, parent: Layer, position: Point)
        -> Result<(), HostError>;

    fn detach(&mut self, visual: &Self::Handle) -> Result<(), HostError>;
}

/// Fixed-capacity text outputs.
pub trait TextFields {
    /// Creates the field at its frame. Called once during setup.
    fn init_field(&mut self, field: TextField, frame: Rectangle);

    /// Replaces the field's text. Text is never longer than [`TextField::capacity`].
    fn set_text(&mut self, field: TextField, text: &str);
}

/// Wall clock.
pub trait ClockSource {
    fn now(&self) -> NaiveDateTime;

    fn is_24h_style(&self) -> bool;
}

/// Everything the face needs from its platform.
pub trait Host: LayerTree + TextFields + ClockSource {}

impl<T: LayerTree + TextFields + ClockSource> Host for T {}
