use statig::{blocking::IntoStateMachineExt as _, prelude::*};
use tracing::{debug, trace, warn};

use super::{
    angle::{AngleStep, AngleTracker},
    center::{CenterEstimator, CenterObservation},
    config::CircleGestureConfig,
    radius::{RadiusCheck, RadiusValidator},
    types::{
        FailureReason, GestureCenter, Point, RecognizerState, TouchPhase, TouchSample,
        WindingDirection,
    },
};

#[derive(Clone, Copy, Debug)]
enum GestureHsmEvent {
    Sample(TouchSample),
}

/// Angle state as last seen by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct GestureSnapshot {
    pub(crate) accumulated_angle: f32,
    pub(crate) winding: WindingDirection,
    pub(crate) center: GestureCenter,
    pub(crate) reference_radius: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GestureEngineOutput {
    pub(crate) entered: Option<RecognizerState>,
    pub(crate) snapshot: Option<GestureSnapshot>,
    pub(crate) failure: Option<FailureReason>,
    pub(crate) advanced: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    output: GestureEngineOutput,
}

impl DispatchContext {
    fn enter(&mut self, state: RecognizerState) {
        self.output.entered = Some(state);
    }

    fn publish(&mut self, snapshot: GestureSnapshot) {
        self.output.snapshot = Some(snapshot);
    }

    fn finish(self) -> GestureEngineOutput {
        self.output
    }
}

pub(crate) struct GestureEngine {
    machine: statig::blocking::StateMachine<GestureHsm>,
}

impl GestureEngine {
    pub(crate) fn new(config: &CircleGestureConfig) -> Self {
        Self {
            machine: GestureHsm::new(config).state_machine(),
        }
    }

    pub(crate) fn handle(&mut self, sample: TouchSample) -> GestureEngineOutput {
        trace!(
            phase = ?sample.phase,
            t_ms = sample.t_ms,
            x = sample.position.x,
            y = sample.position.y,
            "circle gesture sample"
        );
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&GestureHsmEvent::Sample(sample), &mut context);
        context.finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TrackOutcome {
    Idle,
    Advanced,
    Rejected(FailureReason),
}

struct GestureHsm {
    center: CenterEstimator,
    radius: RadiusValidator,
    angle: AngleTracker,
}

impl GestureHsm {
    fn new(config: &CircleGestureConfig) -> Self {
        Self {
            center: CenterEstimator::new(
                config.center_window,
                config.min_sample_spacing,
                config.min_window_bow,
            ),
            radius: RadiusValidator::new(config.radius_tolerance, config.min_radius),
            angle: AngleTracker::new(
                config.angle_noise,
                config.reversal_max_samples,
                config.reversal_max_angle,
            ),
        }
    }

    fn snapshot(&self) -> GestureSnapshot {
        GestureSnapshot {
            accumulated_angle: self.angle.accumulated(),
            winding: self.angle.winding(),
            center: self.center.center(),
            reference_radius: self.radius.reference(),
        }
    }

    fn begin_gesture(&mut self, context: &mut DispatchContext, sample: &TouchSample) {
        self.discard_gesture();
        self.center.begin(sample.t_ms, sample.position);
        context.publish(self.snapshot());
        context.enter(RecognizerState::Possible);
    }

    fn discard_gesture(&mut self) {
        self.center.reset();
        self.radius.reset();
        self.angle.reset();
    }

    fn observe_window(&mut self, sample: &TouchSample) -> TrackOutcome {
        match self.center.observe(sample.t_ms, sample.position) {
            CenterObservation::Pending => TrackOutcome::Idle,
            CenterObservation::Degenerate => TrackOutcome::Rejected(FailureReason::NoCenter),
            CenterObservation::Established(center) => {
                debug!(
                    x = center.point.x,
                    y = center.point.y,
                    window = self.center.window_points().len(),
                    "circle gesture center established"
                );
                self.replay_window(center.point)
            }
        }
    }

    // The arc traced while the window was open counts toward the gesture.
    fn replay_window(&mut self, center: Point) -> TrackOutcome {
        let mut outcome = TrackOutcome::Idle;
        for &point in self.center.window_points() {
            match track_point(&mut self.radius, &mut self.angle, center, point) {
                TrackOutcome::Rejected(reason) => return TrackOutcome::Rejected(reason),
                TrackOutcome::Advanced => outcome = TrackOutcome::Advanced,
                TrackOutcome::Idle => {}
            }
        }
        outcome
    }

    fn track(&mut self, point: Point) -> TrackOutcome {
        let center = self.center.center().point;
        track_point(&mut self.radius, &mut self.angle, center, point)
    }

    fn advance_to_changed(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        context.publish(self.snapshot());
        context.output.advanced = true;
        context.enter(RecognizerState::Changed);
        Transition(State::changed())
    }

    fn fail(&mut self, context: &mut DispatchContext, reason: FailureReason) -> Outcome<State> {
        debug!(
            reason = reason.label(),
            accumulated_angle = self.angle.accumulated(),
            "circle gesture failed"
        );
        context.publish(self.snapshot());
        context.output.failure = Some(reason);
        context.enter(RecognizerState::Failed);
        self.discard_gesture();
        Transition(State::failed())
    }

    fn end(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        debug!(
            accumulated_angle = self.angle.accumulated(),
            "circle gesture ended"
        );
        context.publish(self.snapshot());
        context.enter(RecognizerState::Ended);
        self.discard_gesture();
        Transition(State::ended())
    }

    fn cancel(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        debug!(
            accumulated_angle = self.angle.accumulated(),
            "circle gesture cancelled"
        );
        context.publish(self.snapshot());
        context.enter(RecognizerState::Cancelled);
        self.discard_gesture();
        Transition(State::cancelled())
    }

    fn handle_tracking_sample(
        &mut self,
        context: &mut DispatchContext,
        sample: &TouchSample,
    ) -> Outcome<State> {
        match sample.phase {
            TouchPhase::Begin => {
                warn!("circle gesture: begin while a touch is tracked, ignoring");
                Handled
            }
            TouchPhase::Move => match self.track(sample.position) {
                TrackOutcome::Idle => Handled,
                TrackOutcome::Advanced => self.advance_to_changed(context),
                TrackOutcome::Rejected(reason) => self.fail(context, reason),
            },
            TouchPhase::End => self.end(context),
            TouchPhase::Cancel => self.cancel(context),
        }
    }

    fn handle_terminal_sample(
        &mut self,
        context: &mut DispatchContext,
        sample: &TouchSample,
    ) -> Outcome<State> {
        if sample.phase == TouchPhase::Begin {
            self.begin_gesture(context, sample);
            Transition(State::possible())
        } else {
            Handled
        }
    }
}

#[state_machine(initial = "State::idle()")]
impl GestureHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(sample) => {
                if sample.phase == TouchPhase::Begin {
                    self.begin_gesture(context, sample);
                    return Transition(State::possible());
                }
                trace!(phase = ?sample.phase, "circle gesture: no touch began, ignoring");
                Handled
            }
        }
    }

    #[state]
    fn possible(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(sample) => match sample.phase {
                TouchPhase::Begin => {
                    self.begin_gesture(context, sample);
                    Handled
                }
                TouchPhase::Move => {
                    let outcome = if self.center.center().established {
                        self.track(sample.position)
                    } else {
                        self.observe_window(sample)
                    };
                    match outcome {
                        TrackOutcome::Idle => Handled,
                        TrackOutcome::Advanced => {
                            context.publish(self.snapshot());
                            context.output.advanced = true;
                            context.enter(RecognizerState::Began);
                            Transition(State::began())
                        }
                        TrackOutcome::Rejected(reason) => self.fail(context, reason),
                    }
                }
                TouchPhase::End => {
                    let reason = if self.center.center().established {
                        FailureReason::EndedBeforeMotion
                    } else {
                        FailureReason::NoCenter
                    };
                    self.fail(context, reason)
                }
                TouchPhase::Cancel => self.cancel(context),
            },
        }
    }

    #[state]
    fn began(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(sample) => self.handle_tracking_sample(context, sample),
        }
    }

    #[state]
    fn changed(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(sample) => self.handle_tracking_sample(context, sample),
        }
    }

    #[state]
    fn ended(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(sample) => self.handle_terminal_sample(context, sample),
        }
    }

    #[state]
    fn cancelled(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(sample) => self.handle_terminal_sample(context, sample),
        }
    }

    #[state]
    fn failed(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(sample) => self.handle_terminal_sample(context, sample),
        }
    }
}

fn track_point(
    radius: &mut RadiusValidator,
    angle: &mut AngleTracker,
    center: Point,
    point: Point,
) -> TrackOutcome {
    match radius.validate(point, center) {
        RadiusCheck::Accept(_) => {}
        RadiusCheck::TooClose(distance) => {
            trace!(distance, "circle gesture: point too close to center");
            return TrackOutcome::Rejected(FailureReason::TooCloseToCenter);
        }
        RadiusCheck::OutOfBand { radius, reference } => {
            trace!(radius, reference, "circle gesture: radius out of band");
            return TrackOutcome::Rejected(FailureReason::RadiusOutOfBand);
        }
    }

    match angle.update(point, center) {
        AngleStep::Anchored | AngleStep::Jitter => TrackOutcome::Idle,
        AngleStep::Contrary(delta) => {
            trace!(delta, "circle gesture: contrary motion discarded");
            TrackOutcome::Idle
        }
        AngleStep::Advanced(_) => TrackOutcome::Advanced,
        AngleStep::Reversed(delta) => {
            trace!(delta, "circle gesture: winding reversed");
            TrackOutcome::Rejected(FailureReason::DirectionReversed)
        }
    }
}
