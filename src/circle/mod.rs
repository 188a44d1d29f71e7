mod angle;
mod center;
pub mod config;
mod core;
pub mod progress;
mod radius;
pub mod types;

use config::{CircleGestureConfig, ConfigError};
use types::{
    FailureReason, GestureUpdate, Point, RecognizerState, TouchSample, WindingDirection,
};

/// A recognizer driven one touch sample at a time.
pub trait GestureRecognizer {
    fn handle(&mut self, sample: TouchSample) -> GestureUpdate;

    fn state(&self) -> RecognizerState;

    fn progress(&self) -> f32;

    /// Drop any in-flight gesture and return to the initial state.
    fn reset(&mut self);
}

pub struct CircleGestureRecognizer {
    config: CircleGestureConfig,
    inner: core::GestureEngine,
    state: RecognizerState,
    failure: Option<FailureReason>,
    snapshot: core::GestureSnapshot,
}

impl Default for CircleGestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CircleGestureRecognizer {
    pub fn new() -> Self {
        Self::from_valid_config(CircleGestureConfig::default())
    }

    pub fn with_config(config: CircleGestureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: CircleGestureConfig) -> Self {
        Self {
            inner: core::GestureEngine::new(&config),
            config,
            state: RecognizerState::Possible,
            failure: None,
            snapshot: core::GestureSnapshot::default(),
        }
    }

    pub fn config(&self) -> &CircleGestureConfig {
        &self.config
    }

    /// Set only while the state is [`RecognizerState::Failed`].
    pub fn failure(&self) -> Option<FailureReason> {
        self.failure
    }

    /// Signed angle traced around the center, in radians.
    pub fn accumulated_angle(&self) -> f32 {
        self.snapshot.accumulated_angle
    }

    pub fn winding(&self) -> WindingDirection {
        self.snapshot.winding
    }

    /// Radius the path is held to, known once the first point around the
    /// center was accepted.
    pub fn reference_radius(&self) -> Option<f32> {
        self.snapshot.reference_radius
    }

    pub fn center(&self) -> Option<Point> {
        self.snapshot
            .center
            .established
            .then_some(self.snapshot.center.point)
    }
}

impl GestureRecognizer for CircleGestureRecognizer {
    fn handle(&mut self, sample: TouchSample) -> GestureUpdate {
        let previous = self.state;
        let output = self.inner.handle(sample);

        if let Some(state) = output.entered {
            self.state = state;
            self.failure = output.failure;
        }
        if let Some(snapshot) = output.snapshot {
            self.snapshot = snapshot;
        }
        if previous != self.state {
            tracing::debug!(
                from = previous.label(),
                to = self.state.label(),
                progress = self.progress(),
                "circle gesture state changed"
            );
        }

        GestureUpdate {
            previous,
            state: self.state,
            progress: self.progress(),
            failure: self.failure,
            advanced: output.advanced,
        }
    }

    fn state(&self) -> RecognizerState {
        self.state
    }

    fn progress(&self) -> f32 {
        progress::progress(self.snapshot.accumulated_angle, self.config.progress_policy)
    }

    fn reset(&mut self) {
        *self = Self::from_valid_config(self.config);
    }
}
