//! Drag-and-drop transfer protocol
//!
//! A drag carries a [`DragPayload`]: the ordered list of city ids being
//! moved. Hosts that go through a text-only drag data channel use
//! [`DragPayload::encode`] / [`DragPayload::parse`] (a JSON array).

use serde::Serialize;
use shared::models::CityId;
use shared::models::serde_helpers::FlexibleId;

use crate::selection::Selection;
use crate::zone::ZoneRef;

/// Where a transfer sends cities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransferTarget {
    Zone(ZoneRef),
    Unassigned,
}

/// City ids carried by one drag gesture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DragPayload(Vec<CityId>);

impl DragPayload {
    pub fn new(ids: Vec<CityId>) -> Self {
        Self(ids)
    }

    /// Payload for a drag starting on `city`
    ///
    /// Dragging a selected city drags the whole selection; dragging an
    /// unselected one drags only that city and leaves the selection alone.
    pub fn for_drag_start(selection: &Selection, city: CityId) -> Self {
        if selection.contains(city) {
            Self(selection.ids())
        } else {
            Self(vec![city])
        }
    }

    /// Payload for the "N selected" handle; `None` with nothing selected
    pub fn from_selection(selection: &Selection) -> Option<Self> {
        (!selection.is_empty()).then(|| Self(selection.ids()))
    }

    pub fn ids(&self) -> &[CityId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON array text, e.g. `[1601,1602]`
    pub fn encode(&self) -> String {
        let ids: Vec<String> = self.0.iter().map(|id| id.to_string()).collect();
        format!("[{}]", ids.join(","))
    }

    /// Parse drag data text
    ///
    /// Accepts numbers and numeric strings. Anything else, including an
    /// empty array, yields `None` and the drop is aborted.
    pub fn parse(raw: &str) -> Option<Self> {
        let ids: Vec<FlexibleId> = serde_json::from_str(raw).ok()?;
        if ids.is_empty() {
            return None;
        }
        Some(Self(ids.into_iter().map(|id| id.0).collect()))
    }
}

/// Keyboard shortcuts understood by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Escape,
    /// Ctrl+A / Cmd+A
    SelectAll,
}

impl EditorKey {
    /// Map a key event; `key` follows the DOM `KeyboardEvent.key` naming
    pub fn from_key_event(key: &str, ctrl: bool, meta: bool) -> Option<Self> {
        match key {
            "Escape" | "Esc" => Some(Self::Escape),
            "a" | "A" if ctrl || meta => Some(Self::SelectAll),
            _ => None,
        }
    }
}

/// What a key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    SelectionCleared,
    /// Escape with an empty selection: the host should close the editor
    CloseRequested,
    /// Number of cities now selected
    Selected(usize),
    Ignored,
}
