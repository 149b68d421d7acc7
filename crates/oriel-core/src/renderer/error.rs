// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the hierarchy of error types for the rendering subsystem.

use std::fmt;

/// An error raised by the graphics device or one of the objects it created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The device (or a device-owned object) could not be created, e.g.
    /// because no graphics adapter is available. Fatal at startup; no
    /// fallback adapter search is attempted.
    CreationFailed(String),
    /// The device was removed while in use. Recoverable: every
    /// device-dependent object must be torn down and recreated.
    Lost(String),
    /// A handle passed to the device does not refer to a live object.
    InvalidHandle(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::CreationFailed(msg) => {
                write!(f, "Failed to create graphics device object: {msg}")
            }
            DeviceError::Lost(reason) => {
                write!(f, "The graphics device was lost: {reason}")
            }
            DeviceError::InvalidHandle(msg) => {
                write!(f, "Invalid device object handle: {msg}")
            }
        }
    }
}

impl std::error::Error for DeviceError {}

/// An error returned by a swap-chain present.
///
/// Device loss is distinguished from every other present failure by
/// construction, mirroring the removed-device result code of the underlying
/// API: on `DeviceLost` the backend must rebuild all device-dependent state
/// and must not retry the same buffers; any other failure just drops the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentError {
    /// The device was removed; carries the removal reason reported by it.
    DeviceLost(String),
    /// The present failed for a reason other than device loss.
    Other {
        /// The backend-specific result code of the failed present.
        code: i32,
        /// A human-readable description of the failure.
        message: String,
    },
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentError::DeviceLost(reason) => {
                write!(f, "Present failed, device lost: {reason}")
            }
            PresentError::Other { code, message } => {
                write!(f, "Present failed (code {code}): {message}")
            }
        }
    }
}

impl std::error::Error for PresentError {}

/// An error raised while recording or closing a command buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// `close` was called on a recorder that is already closed.
    AlreadyClosed,
    /// An operation that requires an open recorder was attempted while closed.
    NotRecording,
    /// A backend-specific recording failure.
    Backend(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::AlreadyClosed => {
                write!(f, "Command recorder is already closed.")
            }
            RecordError::NotRecording => {
                write!(f, "Command recorder is not recording.")
            }
            RecordError::Backend(msg) => {
                write!(f, "Backend-specific recording error: {msg}")
            }
        }
    }
}

impl std::error::Error for RecordError {}

/// A high-level error that can occur within the rendering system or a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A rendering operation was attempted before a backend was bound to the
    /// facade. This is a precondition violation, not a recoverable runtime
    /// condition.
    NotBound,
    /// A device-level failure occurred.
    Device(DeviceError),
    /// A present failed; see [`PresentError`] for the device-lost distinction.
    Present(PresentError),
    /// A command-recording failure occurred.
    Record(RecordError),
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotBound => {
                write!(f, "No rendering backend is bound to the rendering system.")
            }
            RenderError::Device(err) => write!(f, "Device error: {err}"),
            RenderError::Present(err) => write!(f, "Present error: {err}"),
            RenderError::Record(err) => write!(f, "Recording error: {err}"),
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Device(err) => Some(err),
            RenderError::Present(err) => Some(err),
            RenderError::Record(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DeviceError> for RenderError {
    fn from(err: DeviceError) -> Self {
        RenderError::Device(err)
    }
}

impl From<PresentError> for RenderError {
    fn from(err: PresentError) -> Self {
        RenderError::Present(err)
    }
}

impl From<RecordError> for RenderError {
    fn from(err: RecordError) -> Self {
        RenderError::Record(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn device_error_display() {
        let err = DeviceError::CreationFailed("no adapter available".to_string());
        assert_eq!(
            format!("{err}"),
            "Failed to create graphics device object: no adapter available"
        );

        let lost = DeviceError::Lost("driver reset".to_string());
        assert_eq!(format!("{lost}"), "The graphics device was lost: driver reset");
    }

    #[test]
    fn present_error_distinguishes_device_loss() {
        let lost = PresentError::DeviceLost("hung".to_string());
        let other = PresentError::Other {
            code: -3,
            message: "occluded".to_string(),
        };
        assert_ne!(lost, other);
        assert_eq!(format!("{other}"), "Present failed (code -3): occluded");
    }

    #[test]
    fn render_error_wraps_sources() {
        let err: RenderError = DeviceError::Lost("removed".to_string()).into();
        assert_eq!(
            format!("{err}"),
            "Device error: The graphics device was lost: removed"
        );
        assert!(err.source().is_some());

        let not_bound = RenderError::NotBound;
        assert!(not_bound.source().is_none());
    }
}
