//! Screen geometry of the face (144 × 168, black background).
//!
//! Digit slots and the separator sit at fixed positions; the text field
//! frames depend on the layout variant.

use crate::host::TextField;
use crate::slot_cache::TOTAL_IMAGE_SLOTS;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use serde::{Deserialize, Serialize};

pub const SCREEN_WIDTH: u32 = 144;
pub const SCREEN_HEIGHT: u32 = 168;

/// Top-left corner of each digit slot: hours tens, hours units, minutes
/// tens, minutes units.
pub const SLOT_POSITIONS: [Point; TOTAL_IMAGE_SLOTS] = [
    Point::new(2, 54),
    Point::new(34, 54),
    Point::new(72, 54),
    Point::new(103, 54),
];

/// Top-left corner of the hour/minute separator.
pub const COLON_POSITION: Point = Point::new(65, 60);

/// Arrangement of the text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    /// Seconds under the minutes, AM/PM beside them, moon top right
    #[default]
    Stough,
    /// Narrow date, AM/PM bottom left
    Classic,
}

fn frame(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
}

impl LayoutVariant {
    /// Frame of a text field. Frames may hang off the screen edge.
    pub fn field_frame(self, field: TextField) -> Rectangle {
        match (self, field) {
            (_, TextField::Month) => frame(-25, 25, 60, 30),
            (LayoutVariant::Stough, TextField::Date) => frame(45, 25, 60, 30),
            (LayoutVariant::Stough, TextField::AmPm) => frame(112, 48, 30, 30),
            (LayoutVariant::Stough, TextField::Seconds) => frame(92, 95, 60, 60),
            (LayoutVariant::Stough, TextField::Moon) => frame(108, 5, 40, 40),
            (LayoutVariant::Classic, TextField::Date) => frame(48, 25, 30, 30),
            (LayoutVariant::Classic, TextField::AmPm) => frame(5, 100, 30, 30),
            (LayoutVariant::Classic, TextField::Seconds) => frame(92, 94, 60, 60),
            (LayoutVariant::Classic, TextField::Moon) => frame(105, 5, 60, 60),
        }
    }
}
