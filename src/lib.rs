//! Single-touch circular gesture recognition.
//!
//! Feed [`TouchSample`]s for one touch into a [`CircleGestureRecognizer`] and
//! read back the recognizer state together with a progress value describing
//! how much of a revolution the finger has traced around its pivot.

pub mod circle;

pub use circle::{
    config::{CenterWindow, CircleGestureConfig, ConfigError, ProgressPolicy},
    progress::progress,
    types::{
        FailureReason, GestureCenter, GestureUpdate, Point, RecognizerState, TouchPhase,
        TouchSample, WindingDirection,
    },
    CircleGestureRecognizer, GestureRecognizer,
};
