//! # Desktop Emulator Host
//!
//! Implements every host collaborator in memory so the face can run on a
//! development machine:
//!
//! - bitmaps are bookkept per handle; a packaged resource draws as a glyph
//! - the layer tree is a list of attached handles with their positions
//! - text fields keep their frame and current text
//! - the clock is chrono's `Local`, or a pinned time for tests
//!
//! [`EmulatedHost::render`] composes the screen into a [`Framebuffer`], which
//! implements embedded-graphics' `DrawTarget` and prints as ASCII.

use crate::config::Config;
use crate::host::{
    BitmapProvider, ClockSource, HostError, Layer, LayerTree, ResourceId, TextField, TextFields,
    IMAGE_COLON, IMAGE_NUM,
};
use crate::layout::{SCREEN_HEIGHT, SCREEN_WIDTH};
use chrono::{Local, NaiveDateTime};
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::Rectangle,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use log::warn;
use std::collections::BTreeMap;

/// Handle to a resident emulated bitmap.
#[derive(Debug, PartialEq, Eq)]
pub struct BitmapHandle {
    id: u32,
    resource: ResourceId,
}

impl BitmapHandle {
    pub fn resource(&self) -> ResourceId {
        self.resource
    }
}

/// Glyph drawn for a packaged resource.
fn glyph_for(resource: ResourceId) -> Option<char> {
    if resource == IMAGE_COLON {
        return Some(':');
    }
    IMAGE_NUM
        .iter()
        .position(|&id| id == resource)
        .and_then(|digit| char::from_digit(digit as u32, 10))
}

#[derive(Debug)]
struct AttachedVisual {
    resource: ResourceId,
    layer: Layer,
    position: Point,
}

#[derive(Debug)]
struct FieldState {
    frame: Rectangle,
    text: String,
}

/// In-memory host for desktop runs.
#[derive(Debug)]
pub struct EmulatedHost {
    next_handle: u32,
    resident: BTreeMap<u32, ResourceId>,
    attached: BTreeMap<u32, AttachedVisual>,
    fields: BTreeMap<TextField, FieldState>,
    use_24h: bool,
    pinned: Option<NaiveDateTime>,
}

impl EmulatedHost {
    pub fn new(config: &Config) -> Self {
        Self {
            next_handle: 1,
            resident: BTreeMap::new(),
            attached: BTreeMap::new(),
            fields: BTreeMap::new(),
            use_24h: config.use_24h(),
            pinned: None,
        }
    }

    /// Freezes the clock at `time`.
    pub fn pin_time(&mut self, time: NaiveDateTime) {
        self.pinned = Some(time);
    }

    /// Bitmaps acquired and not yet released.
    pub fn resident_bitmaps(&self) -> usize {
        self.resident.len()
    }

    /// Resident digit bitmaps, the separator excluded.
    pub fn resident_digits(&self) -> usize {
        self.resident
            .values()
            .filter(|&&id| IMAGE_NUM.contains(&id))
            .count()
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        self.fields.get(&field).map(|f| f.text.as_str())
    }

    /// Characters shown by the attached window-layer bitmaps, left to right.
    pub fn window_glyphs(&self) -> String {
        let mut visuals: Vec<_> = self
            .attached
            .values()
            .filter(|v| v.layer == Layer::Window)
            .collect();
        visuals.sort_by_key(|v| (v.position.y, v.position.x));
        visuals
            .into_iter()
            .filter_map(|v| glyph_for(v.resource))
            .collect()
    }

    /// Draws the current screen.
    pub fn render(&self) -> Framebuffer {
        let mut fb = Framebuffer::default();
        let digit_style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        for visual in self.attached.values() {
            let Some(glyph) = glyph_for(visual.resource) else {
                continue;
            };
            let mut buf = [0u8; 4];
            Text::with_baseline(
                glyph.encode_utf8(&mut buf),
                visual.position,
                digit_style,
                Baseline::Top,
            )
            .draw(&mut fb)
            .ok();
        }

        for (&field, state) in &self.fields {
            if state.text.is_empty() {
                continue;
            }
            // the month hangs off the left edge and is right-aligned into view
            let (alignment, anchor) = match field {
                TextField::Month => (
                    Alignment::Right,
                    state.frame.top_left + Point::new(state.frame.size.width as i32 - 1, 0),
                ),
                _ => (Alignment::Left, state.frame.top_left),
            };
            let layout = TextStyleBuilder::new()
                .alignment(alignment)
                .baseline(Baseline::Top)
                .build();
            let mut clipped = fb.clipped(&state.frame);
            Text::with_text_style(&state.text, anchor, text_style, layout)
                .draw(&mut clipped)
                .ok();
        }

        fb
    }
}

impl BitmapProvider for EmulatedHost {
    type Handle = BitmapHandle;

    fn acquire(&mut self, resource: ResourceId) -> Result<BitmapHandle, HostError> {
        if glyph_for(resource).is_none() {
            return Err(HostError::MissingResource(resource));
        }
        let id = self.next_handle;
        self.next_handle += 1;
        self.resident.insert(id, resource);
        Ok(BitmapHandle { id, resource })
    }

    fn release(&mut self, handle: BitmapHandle) -> Result<(), HostError> {
        if self.attached.contains_key(&handle.id) {
            // still on screen; the pixels would dangle
            return Err(HostError::Layer(format!(
                "bitmap {} released while attached",
                handle.id
            )));
        }
        self.resident
            .remove(&handle.id)
            .map(|_| ())
            .ok_or(HostError::UnknownHandle(handle.id))
    }
}

impl LayerTree for EmulatedHost {
    fn attach(
        &mut self,
        visual: &BitmapHandle,
        parent: Layer,
        position: Point,
    ) -> Result<(), HostError> {
        if !self.resident.contains_key(&visual.id) {
            return Err(HostError::UnknownHandle(visual.id));
        }
        if self.attached.contains_key(&visual.id) {
            return Err(HostError::Layer(format!(
                "bitmap {} is already attached",
                visual.id
            )));
        }
        self.attached.insert(
            visual.id,
            AttachedVisual {
                resource: visual.resource,
                layer: parent,
                position,
            },
        );
        Ok(())
    }

    fn detach(&mut self, visual: &BitmapHandle) -> Result<(), HostError> {
        self.attached
            .remove(&visual.id)
            .map(|_| ())
            .ok_or_else(|| HostError::Layer(format!("bitmap {} is not attached", visual.id)))
    }
}

impl TextFields for EmulatedHost {
    fn init_field(&mut self, field: TextField, frame: Rectangle) {
        self.fields.insert(
            field,
            FieldState {
                frame,
                text: String::new(),
            },
        );
    }

    fn set_text(&mut self, field: TextField, text: &str) {
        match self.fields.get_mut(&field) {
            Some(state) => {
                state.text.clear();
                state.text.push_str(text);
            }
            None => warn!("{field:?}: set_text before init_field"),
        }
    }
}

impl ClockSource for EmulatedHost {
    fn now(&self) -> NaiveDateTime {
        self.pinned.unwrap_or_else(|| Local::now().naive_local())
    }

    fn is_24h_style(&self) -> bool {
        self.use_24h
    }
}

/// 1-bit framebuffer the size of the screen, `On` = lit (white on the
/// face's black background).
#[derive(Debug, Clone)]
pub struct Framebuffer {
    size: Size,
    pixels: Vec<bool>,
}

impl Framebuffer {
    pub fn pixel(&self, point: Point) -> bool {
        self.index(point).map(|i| self.pixels[i]).unwrap_or(false)
    }

    /// Number of lit pixels.
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (u32::try_from(point.x).ok()?, u32::try_from(point.y).ok()?);
        (x < self.size.width && y < self.size.height)
            .then(|| (y * self.size.width + x) as usize)
    }

    /// Half-resolution ASCII rendering: each character covers a 2×2 block
    /// and is `#` when any of its pixels is lit.
    pub fn to_ascii(&self) -> String {
        let cols = self.size.width.div_ceil(2) as i32;
        let rows = self.size.height.div_ceil(2) as i32;
        let mut out = String::with_capacity(((cols + 1) * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let lit = (0..2).any(|dy| {
                    (0..2).any(|dx| self.pixel(Point::new(col * 2 + dx, row * 2 + dy)))
                });
                out.push(if lit { '#' } else { ' ' });
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        let size = Size::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        Self {
            size,
            pixels: vec![false; SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize],
        }
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color.is_on();
            }
        }
        Ok(())
    }
}
