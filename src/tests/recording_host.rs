//! Host double that records every collaborator call.

use crate::host::{
    BitmapProvider, ClockSource, HostError, Layer, LayerTree, ResourceId, TextField, TextFields,
};
use chrono::{NaiveDate, NaiveDateTime};
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;
use std::collections::BTreeMap;

/// Builds a local time; panics on an invalid date.
pub(crate) fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .expect("valid test time")
}

#[derive(Debug)]
pub(crate) struct TestHandle {
    id: u32,
    resource: ResourceId,
}

/// One host call, in the order it happened. Failed calls are not recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Acquire(ResourceId),
    Release(ResourceId),
    Attach(ResourceId, Layer, Point),
    Detach(ResourceId),
    InitField(TextField),
    SetText(TextField, String),
}

impl Call {
    /// True for calls that touch bitmaps or the layer tree.
    pub(crate) fn is_bitmap_call(&self) -> bool {
        !matches!(self, Call::InitField(_) | Call::SetText(..))
    }
}

#[derive(Debug)]
pub(crate) struct RecordingHost {
    pub next_handle: u32,
    pub calls: Vec<Call>,
    pub resident: BTreeMap<u32, ResourceId>,
    pub attached: BTreeMap<u32, (ResourceId, Layer, Point)>,
    pub frames: BTreeMap<TextField, Rectangle>,
    pub texts: BTreeMap<TextField, String>,
    pub now: NaiveDateTime,
    pub use_24h: bool,
    pub fail_acquire: bool,
    pub fail_attach: bool,
    pub fail_detach: bool,
    pub fail_release: bool,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            next_handle: 1,
            calls: Vec::new(),
            resident: BTreeMap::new(),
            attached: BTreeMap::new(),
            frames: BTreeMap::new(),
            texts: BTreeMap::new(),
            now: at(2024, 3, 14, 21, 5, 7),
            use_24h: false,
            fail_acquire: false,
            fail_attach: false,
            fail_detach: false,
            fail_release: false,
        }
    }
}

impl RecordingHost {
    pub(crate) fn at(now: NaiveDateTime) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    pub(crate) fn resident_count(&self) -> usize {
        self.resident.len()
    }

    pub(crate) fn text(&self, field: TextField) -> Option<&str> {
        self.texts.get(&field).map(String::as_str)
    }

    /// Fields written since the call log was last cleared, in call order.
    pub(crate) fn texts_set(&self) -> Vec<TextField> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::SetText(field, _) => Some(*field),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn bitmap_calls(&self) -> usize {
        self.calls.iter().filter(|c| c.is_bitmap_call()).count()
    }
}

impl BitmapProvider for RecordingHost {
    type Handle = TestHandle;

    fn acquire(&mut self, resource: ResourceId) -> Result<TestHandle, HostError> {
        if self.fail_acquire {
            return Err(HostError::MissingResource(resource));
        }
        let id = self.next_handle;
        self.next_handle += 1;
        self.resident.insert(id, resource);
        self.calls.push(Call::Acquire(resource));
        Ok(TestHandle { id, resource })
    }

    fn release(&mut self, handle: TestHandle) -> Result<(), HostError> {
        if self.fail_release {
            return Err(HostError::UnknownHandle(handle.id));
        }
        self.resident
            .remove(&handle.id)
            .ok_or(HostError::UnknownHandle(handle.id))?;
        self.calls.push(Call::Release(handle.resource));
        Ok(())
    }
}

impl LayerTree for RecordingHost {
    fn attach(&mut self, visual: &TestHandle, parent: Layer, position: Point) -> Result<(), HostError> {
        if self.fail_attach {
            return Err(HostError::Layer("attach refused".into()));
        }
        self.attached
            .insert(visual.id, (visual.resource, parent, position));
        self.calls.push(Call::Attach(visual.resource, parent, position));
        Ok(())
    }

    fn detach(&mut self, visual: &TestHandle) -> Result<(), HostError> {
        if self.fail_detach {
            return Err(HostError::Layer("detach refused".into()));
        }
        self.attached
            .remove(&visual.id)
            .ok_or_else(|| HostError::Layer("not attached".into()))?;
        self.calls.push(Call::Detach(visual.resource));
        Ok(())
    }
}

impl TextFields for RecordingHost {
    fn init_field(&mut self, field: TextField, frame: Rectangle) {
        self.frames.insert(field, frame);
        self.calls.push(Call::InitField(field));
    }

    fn set_text(&mut self, field: TextField, text: &str) {
        assert!(
            text.chars().count() <= field.capacity(),
            "{field:?} overflow: {text:?}"
        );
        self.texts.insert(field, text.to_string());
        self.calls.push(Call::SetText(field, text.to_string()));
    }
}

impl ClockSource for RecordingHost {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn is_24h_style(&self) -> bool {
        self.use_24h
    }
}
