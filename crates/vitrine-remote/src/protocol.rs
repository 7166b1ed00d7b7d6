//! Remote protocol - JSON command/response definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands sent by a remote client to the inspector host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum RemoteCommand {
    /// Jump the camera to a named view preset
    SetView { name: String },
    /// Step through the view presets (+1 or -1)
    CycleView { step: i32 },
    /// Flip between default zoom and fill-frame zoom
    ToggleZoom,
    /// Switch projection model ("orthographic" or "perspective")
    SetProjection { mode: String },
    /// Flip the exploded-view target
    ToggleExplode,
    /// Feed a scroll delta to the context transition engine
    Scroll { delta: f32 },
    /// Jump directly to a context preset
    JumpToContext { index: i32 },
    /// Select one of the eight wipe directions (0..=7)
    SetWipeDirection { direction: u8 },
    /// Pointer moved to a pixel position
    PointerMove { x: f32, y: f32 },
    /// Pointer clicked at a pixel position
    Click { x: f32, y: f32 },
    /// Toggle a hotspot card directly, bypassing hit testing
    ToggleHotspot { index: usize },
    /// Replace the active model
    LoadModel { key: String },
    /// Get the current inspector snapshot
    GetState,
    /// Ping (health check)
    Ping,
}

/// Responses from the remote server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum RemoteResponse {
    #[serde(rename = "ok")]
    Ok { data: ResponseData },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Response data variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Pong { message: String },
    Queued { command: String },
    State(InspectorSnapshot),
}

/// Camera portion of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraSnapshot {
    pub view: String,
    pub projection: String,
    pub azimuth: f32,
    pub elevation: f32,
    pub frustum_size: f32,
    pub zoomed: bool,
    pub position: [f32; 3],
}

/// Hotspot portion of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotspotSnapshot {
    pub title: String,
    pub open: bool,
    pub marker_visible: bool,
    pub screen: [f32; 2],
}

/// Point-in-time view of the inspector, refreshed by the host once per frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InspectorSnapshot {
    pub frame: u64,
    pub model: Option<String>,
    pub status: Option<String>,
    /// A model request is still in flight
    pub loading: bool,
    pub camera: CameraSnapshot,
    pub exploded: bool,
    pub explode_t: f32,
    pub context_position: f32,
    pub context_name: String,
    pub hidden_parts: Vec<String>,
    pub hovered: Vec<String>,
    pub hotspots: Vec<HotspotSnapshot>,
}

/// Errors from the remote server and its request decoding
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Remote control IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid command JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Empty command line")]
    Empty,
}

/// Decode one request line into a command
pub fn parse_command(line: &str) -> Result<RemoteCommand, RemoteError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(RemoteError::Empty);
    }
    Ok(serde_json::from_str(trimmed)?)
}

impl RemoteResponse {
    pub fn ok(data: ResponseData) -> Self {
        Self::Ok { data }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error {
            message: msg.into(),
        }
    }

    pub fn pong() -> Self {
        Self::ok(ResponseData::Pong {
            message: "pong".into(),
        })
    }

    pub fn queued(command: &RemoteCommand) -> Self {
        Self::ok(ResponseData::Queued {
            command: format!("{:?}", command),
        })
    }
}
