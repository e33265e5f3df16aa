// Observable load state of the portal's assets.
//
// Loading never aborts the page: a failed asset stays `Failed` and the
// features depending on it stay inert.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("{url} answered HTTP {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("could not decode {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("{url} contains no animation")]
    NoAnimation { url: String },
    #[error("{url} contains no drawable geometry")]
    Empty { url: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum AssetStatus {
    Pending,
    Loading { progress: Option<f32> },
    Ready,
    Failed(AssetError),
}

impl AssetStatus {
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, AssetStatus::Ready)
    }

    pub fn error(&self) -> Option<&AssetError> {
        match self {
            AssetStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Status of every asset the page loads.
#[derive(Clone, Debug)]
pub struct AssetBoard {
    pub model: AssetStatus,
    pub audio: AssetStatus,
}

impl Default for AssetBoard {
    fn default() -> Self {
        Self {
            model: AssetStatus::Pending,
            audio: AssetStatus::Pending,
        }
    }
}

/// Whole-percent progress of a download, `None` while the total is unknown.
pub fn loader_percent(loaded: f64, total: f64) -> Option<u32> {
    if total.is_nan() || total <= 0.0 {
        return None;
    }
    Some(((loaded / total).clamp(0.0, 1.0) * 100.0).floor() as u32)
}

pub fn loader_label(percent: u32) -> String {
    format!("Loading {}%", percent)
}
