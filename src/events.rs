//! Notifications sent from the canvas to the host page.
//!
//! The host registers one callback when it constructs the app. Each event is
//! serialized to a JSON object tagged by `type` so the page can switch on it
//! without knowing any Rust types.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use serde::Serialize;

use crate::doc::ObjectId;
use crate::engine::Action;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    /// The active tool changed; toolbars should highlight `tool`.
    ToolChanged { tool: &'static str },
    /// Open the context menu at canvas-space coordinates.
    ContextMenu { x: f64, y: f64 },
    HideContextMenu,
    VideoToggled { id: ObjectId, playing: bool },
    ObjectRemoved { id: ObjectId },
    /// An upload was abandoned.
    UploadFailed { reason: String },
}

impl HostEvent {
    /// The event the host should see for an engine action, if any.
    ///
    /// Redraws, cursor changes, and video toggles are handled inside the
    /// canvas; toggles report back through [`HostEvent::VideoToggled`] once
    /// playback actually changed.
    #[must_use]
    pub fn from_action(action: &Action) -> Option<Self> {
        match action {
            Action::ToolChanged(tool) => Some(Self::ToolChanged { tool: tool.as_str() }),
            Action::ShowContextMenu { at } => Some(Self::ContextMenu { x: at.x, y: at.y }),
            Action::HideContextMenu => Some(Self::HideContextMenu),
            Action::ObjectRemoved { id, .. } => Some(Self::ObjectRemoved { id: *id }),
            Action::RenderNeeded | Action::SetCursor(_) | Action::ToggleVideo { .. } => None,
        }
    }

    /// Serialize for the host callback.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
