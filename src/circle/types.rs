/// Position in host view coordinates. `y` grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        squared_distance(self, other).sqrt()
    }
}

pub(crate) fn squared_distance(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Begin,
    Move,
    End,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSample {
    pub position: Point,
    pub t_ms: u64,
    pub phase: TouchPhase,
}

impl TouchSample {
    pub const fn new(phase: TouchPhase, t_ms: u64, x: f32, y: f32) -> Self {
        Self {
            position: Point::new(x, y),
            t_ms,
            phase,
        }
    }

    pub const fn begin(t_ms: u64, x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Begin, t_ms, x, y)
    }

    pub const fn moved(t_ms: u64, x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Move, t_ms, x, y)
    }

    pub const fn ended(t_ms: u64, x: f32, y: f32) -> Self {
        Self::new(TouchPhase::End, t_ms, x, y)
    }

    pub const fn cancelled(t_ms: u64, x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Cancel, t_ms, x, y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecognizerState {
    #[default]
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl RecognizerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled | Self::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Possible => "possible",
            Self::Began => "began",
            Self::Changed => "changed",
            Self::Ended => "ended",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "possible" => Some(Self::Possible),
            "began" => Some(Self::Began),
            "changed" => Some(Self::Changed),
            "ended" => Some(Self::Ended),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Rotational sense in screen coordinates: increasing `atan2` angle with `y`
/// pointing down is clockwise on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindingDirection {
    #[default]
    Unknown,
    Clockwise,
    CounterClockwise,
}

impl WindingDirection {
    pub(crate) fn from_delta(delta: f32) -> Self {
        if delta > 0.0 {
            Self::Clockwise
        } else if delta < 0.0 {
            Self::CounterClockwise
        } else {
            Self::Unknown
        }
    }

    pub(crate) fn sign(self) -> Option<f32> {
        match self {
            Self::Unknown => None,
            Self::Clockwise => Some(1.0),
            Self::CounterClockwise => Some(-1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureCenter {
    pub point: Point,
    pub established: bool,
}

/// Why a gesture ended up in [`RecognizerState::Failed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// The establishment window closed on too few or collinear points.
    NoCenter,
    TooCloseToCenter,
    RadiusOutOfBand,
    DirectionReversed,
    /// The touch lifted before any angle was traced.
    EndedBeforeMotion,
}

impl FailureReason {
    pub fn label(self) -> &'static str {
        match self {
            Self::NoCenter => "no_center",
            Self::TooCloseToCenter => "too_close_to_center",
            Self::RadiusOutOfBand => "radius_out_of_band",
            Self::DirectionReversed => "direction_reversed",
            Self::EndedBeforeMotion => "ended_before_motion",
        }
    }
}

/// Outcome of handling a single [`TouchSample`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureUpdate {
    pub previous: RecognizerState,
    pub state: RecognizerState,
    pub progress: f32,
    pub failure: Option<FailureReason>,
    /// Accumulated angle moved on this sample.
    pub advanced: bool,
}

impl GestureUpdate {
    /// True when the host should observe a transition, including the
    /// Changed self-loop.
    pub fn is_transition(&self) -> bool {
        self.previous != self.state || (self.state == RecognizerState::Changed && self.advanced)
    }
}
