use derive_more::{Display, Error};

/// Fatal setup errors. An engine can not be created while any of these apply.
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum ConfigurationError {
    #[display(
        "Camera not found. Make sure there is a camera in the scene or supply one explicitly"
    )]
    CameraNotFound,
    #[display("The camera is missing a device tracking capability")]
    MissingTracking,
    #[display("Loop delay must be a non-negative number of seconds, was {seconds}")]
    InvalidLoopDelay { seconds: f64 },
    #[display("Invalid tuning: {reason}")]
    InvalidTuning { reason: String },
}
