//! Coach: one workout session
//!
//! frame → signal strategy → RepCounter → cues → FeedbackSink
//!
//! Posture is judged on every frame but only reported when it turns poor,
//! so a rounded back produces one cue rather than one per frame.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::core::angle::{classify_back, classify_knee, landmark_angle};
use crate::core::feedback::{FeedbackSink, TracingSink};
use crate::core::rep_counter::RepCounter;
use crate::core::signal::SignalStrategy;
use crate::error::ThresholdError;
use crate::types::{
    Cue, FrameOutput, Joint, ObserveOutput, PoseFrame, PostureVerdict, Sample,
    SessionRecord, SignalStrategyKind, Thresholds,
};
use crate::{BACK_MIN_ANGLE_DEG, DEEP_KNEE_ANGLE_DEG};

static SESSION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Angle limits for the qualitative checks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureLimits {
    pub back_min_deg: f64,
    pub deep_knee_deg: f64,
}

impl Default for PostureLimits {
    fn default() -> Self {
        Self {
            back_min_deg: BACK_MIN_ANGLE_DEG,
            deep_knee_deg: DEEP_KNEE_ANGLE_DEG,
        }
    }
}

/// Per-session coaching state
#[derive(Debug)]
pub struct Coach<S: FeedbackSink = TracingSink> {
    id: String,
    strategy: SignalStrategy,
    counter: RepCounter,
    limits: PostureLimits,
    sink: S,
    started_at: DateTime<Utc>,
    last_posture: PostureVerdict,
    posture_warnings: u32,
}

impl<S: FeedbackSink> Coach<S> {
    /// Start a session; `None` thresholds use the strategy's defaults
    pub fn new(
        kind: SignalStrategyKind,
        thresholds: Option<Thresholds>,
        limits: PostureLimits,
        sink: S,
    ) -> Result<Self, ThresholdError> {
        let strategy = SignalStrategy::new(kind);
        let thresholds = thresholds.unwrap_or_else(|| strategy.default_thresholds());
        thresholds.validate_for(kind.direction())?;
        let counter = RepCounter::new(thresholds)?;
        Ok(Self::from_parts(strategy, counter, limits, sink))
    }

    fn from_parts(strategy: SignalStrategy, counter: RepCounter, limits: PostureLimits, sink: S) -> Self {
        let started_at = Utc::now();
        let seq = SESSION_SEQ.fetch_add(1, Ordering::Relaxed);
        let id = format!(
            "session_{:x}_{}",
            started_at.timestamp_nanos_opt().unwrap_or_default(),
            seq
        );
        info!(
            session = %id,
            strategy = %strategy.kind(),
            down_enter = counter.thresholds().down_enter,
            up_enter = counter.thresholds().up_enter,
            "session started"
        );
        Self {
            id,
            strategy,
            counter,
            limits,
            sink,
            started_at,
            last_posture: PostureVerdict::Unknown,
            posture_warnings: 0,
        }
    }

    /// Process one estimated pose
    pub fn process(&mut self, frame: &PoseFrame) -> FrameOutput {
        let derived = self.strategy.derive(frame);
        let observed = self.counter.observe_detailed(derived.sample);

        let back_angle = match (
            frame.get(Joint::LeftShoulder),
            frame.get(Joint::LeftHip),
            frame.get(Joint::LeftKnee),
        ) {
            (Some(shoulder), Some(hip), Some(knee)) => landmark_angle(shoulder, hip, knee),
            _ => None,
        };
        let knee_angle = match (
            frame.get(Joint::LeftHip),
            frame.get(Joint::LeftKnee),
            frame.get(Joint::LeftAnkle),
        ) {
            (Some(hip), Some(knee), Some(ankle)) => landmark_angle(hip, knee, ankle),
            _ => None,
        };
        let posture = classify_back(back_angle, self.limits.back_min_deg);
        let depth = classify_knee(knee_angle, self.limits.deep_knee_deg);

        let mut phrases = Vec::new();
        if let Some(event) = observed.event {
            phrases.push(self.emit(Cue::from(event)));
        }
        if posture == PostureVerdict::Poor && self.last_posture != PostureVerdict::Poor {
            self.posture_warnings += 1;
            phrases.push(self.emit(Cue::Posture(posture)));
        }
        if posture != PostureVerdict::Unknown {
            self.last_posture = posture;
        }

        FrameOutput {
            detected: derived.reason.is_none(),
            reps: observed.rep_count,
            feedback: phrases.join(". "),
            phase: observed.phase,
            signal: observed.signal,
            event: observed.event,
            back_angle,
            knee_angle,
            posture,
            depth,
            reason: derived.reason.unwrap_or(observed.reason),
        }
    }

    /// Feed a scalar directly, bypassing landmarks
    pub fn observe_signal(&mut self, sample: impl Into<Sample>) -> ObserveOutput {
        let output = self.counter.observe_detailed(sample);
        if let Some(event) = output.event {
            self.emit(Cue::from(event));
        }
        output
    }

    fn emit(&mut self, cue: Cue) -> String {
        debug!(session = %self.id, cue = ?cue, "cue");
        self.sink.report(&cue);
        cue.phrase()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn reps(&self) -> u32 {
        self.counter.rep_count()
    }

    pub fn counter(&self) -> &RepCounter {
        &self.counter
    }

    pub fn strategy(&self) -> SignalStrategyKind {
        self.strategy.kind()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed_secs(&self) -> f64 {
        (Utc::now() - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Summary of the session so far
    pub fn summary(&self) -> SessionRecord {
        let ended_at = Utc::now();
        SessionRecord {
            id: self.id.clone(),
            started_at: self.started_at,
            ended_at,
            duration_secs: (ended_at - self.started_at).num_milliseconds() as f64 / 1000.0,
            reps: self.counter.rep_count(),
            strategy: self.strategy.kind(),
            frames_observed: self.counter.samples_observed(),
            frames_missing: self.counter.samples_missing(),
            posture_warnings: self.posture_warnings,
        }
    }

    /// End the session
    pub fn finish(self) -> SessionRecord {
        let record = self.summary();
        info!(
            session = %record.id,
            reps = record.reps,
            duration_secs = record.duration_secs,
            "session finished"
        );
        record
    }
}
