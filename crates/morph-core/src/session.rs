//! One morph session: particle sets, render clock, camera status and the
//! control state shared between the render and gesture ticks.
//!
//! The render tick reads a snapshot of [`SharedControl`] and never waits on
//! gesture work. The gesture tick runs through a [`GestureHandle`], which can
//! be cloned onto another thread and admits at most one frame at a time.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Vec3;
use tracing::{debug, error, info, warn};

use crate::camera::Camera;
use crate::config::MorphConfig;
use crate::error::MorphError;
use crate::gesture::{FrameKind, GestureController, GestureUpdate, Landmark};
use crate::morph::{MorphRenderer, MorphUniforms, MorphVertex};
use crate::overlay::{landmark_dots, DotBuffer, OverlayCommand, OverlaySurface};
use crate::particle::ParticleBuffer;
use crate::shapes::ShapeKind;
use crate::state::{ControlState, SharedControl};

// ---------- external collaborators ----------

/// Camera device lifecycle. Device selection and permissions stay with the
/// implementor.
pub trait CameraDevice {
    fn start(&mut self) -> Result<(), MorphError>;
    fn stop(&mut self) -> Result<(), MorphError>;
}

/// Detector settings handed to the hand tracker at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorOptions {
    pub max_hands: u32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl DetectorOptions {
    pub fn from_config(config: &MorphConfig) -> Self {
        Self {
            max_hands: config.max_hands,
            min_detection_confidence: config.min_detection_confidence,
            min_tracking_confidence: config.min_tracking_confidence,
        }
    }
}

/// Hand landmark detector over frames of type `F`.
pub trait HandDetector<F> {
    fn configure(&mut self, options: DetectorOptions) -> Result<(), MorphError>;

    /// Landmarks of the first tracked hand, or `None` if no hand is visible.
    fn detect(&mut self, frame: &F) -> Result<Option<Vec<Landmark>>, MorphError>;
}

// ---------- status ----------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Running,
    /// Camera or detector failure. Visuals keep rendering without gesture input.
    Failed(String),
}

impl SessionStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, SessionStatus::Running)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => f.write_str("Camera stopped"),
            SessionStatus::Running => f.write_str("Tracking hand - pinch to morph"),
            SessionStatus::Failed(msg) => write!(f, "Error: {msg}"),
        }
    }
}

// ---------- gesture tick ----------

#[derive(Debug, Default)]
struct GestureGate {
    running: AtomicBool,
    in_flight: AtomicBool,
}

/// Held while one gesture frame is processed.
struct FrameTicket<'a> {
    gate: &'a GestureGate,
}

impl FrameTicket<'_> {
    fn still_running(&self) -> bool {
        self.gate.running.load(Ordering::Acquire)
    }
}

impl Drop for FrameTicket<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::Release);
    }
}

impl GestureGate {
    fn try_enter(&self) -> Option<FrameTicket<'_>> {
        if !self.running.load(Ordering::Acquire) {
            return None;
        }
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(FrameTicket { gate: self })
    }
}

/// Result of offering one camera frame to the gesture tick.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameResult {
    /// The frame was processed.
    Processed(GestureUpdate),
    /// Another frame was still in flight.
    Dropped,
    /// The camera is not running, or stopped while the frame was processed.
    Inactive,
}

/// Writer side of the shared control state.
#[derive(Clone)]
pub struct GestureHandle {
    controller: GestureController,
    control: Arc<SharedControl>,
    gate: Arc<GestureGate>,
    video_size: (u32, u32),
}

impl GestureHandle {
    /// Apply one detector result.
    ///
    /// `Err` results count as transient frame errors: logged at debug level,
    /// state untouched.
    pub fn on_detection(
        &self,
        detection: Result<Option<Vec<Landmark>>, MorphError>,
        overlay: &mut dyn OverlaySurface,
    ) -> FrameResult {
        let Some(ticket) = self.gate.try_enter() else {
            return self.refused();
        };
        self.finish(&ticket, detection, overlay)
    }

    /// Run the detector on `frame` and apply its result.
    pub fn process_frame<F>(
        &self,
        detector: &mut dyn HandDetector<F>,
        frame: &F,
        overlay: &mut dyn OverlaySurface,
    ) -> FrameResult {
        let Some(ticket) = self.gate.try_enter() else {
            return self.refused();
        };
        let detection = detector.detect(frame);
        self.finish(&ticket, detection, overlay)
    }

    fn refused(&self) -> FrameResult {
        if self.gate.running.load(Ordering::Acquire) {
            FrameResult::Dropped
        } else {
            FrameResult::Inactive
        }
    }

    fn finish(
        &self,
        ticket: &FrameTicket<'_>,
        detection: Result<Option<Vec<Landmark>>, MorphError>,
        overlay: &mut dyn OverlaySurface,
    ) -> FrameResult {
        if !ticket.still_running() {
            OverlayCommand::Clear.apply(overlay);
            return FrameResult::Inactive;
        }

        let hand = match detection {
            Ok(hand) => hand,
            Err(err) => {
                debug!(%err, "detector result dropped");
                OverlayCommand::Clear.apply(overlay);
                return FrameResult::Processed(GestureUpdate {
                    state: self.control.load(),
                    kind: FrameKind::Skipped(err),
                });
            }
        };

        let prev = self.control.load();
        let update = self.controller.on_frame(prev, hand.as_deref());
        if update.has_hand() {
            self.control.store(update.state);
        }

        let command = match hand.as_deref() {
            Some(landmarks) if update.has_hand() => {
                let (w, h) = self.video_size;
                OverlayCommand::Dots(landmark_dots(landmarks, w, h))
            }
            _ => OverlayCommand::Clear,
        };
        command.apply(overlay);

        FrameResult::Processed(update)
    }
}

// ---------- session ----------

pub struct MorphSession {
    config: MorphConfig,
    buffer: ParticleBuffer,
    renderer: MorphRenderer,
    camera: Camera,
    gesture: GestureHandle,
    overlay: DotBuffer,
    status: SessionStatus,
    camera_on: bool,
    /// Last detector configuration failure. Gesture input stays off until
    /// the detector configures again.
    detector_error: Option<MorphError>,
    frames_rendered: u64,
}

impl MorphSession {
    /// Validate `config`, sample both shapes and set up a `width` x `height`
    /// surface.
    pub fn new(config: MorphConfig, width: u32, height: u32) -> Result<Self, MorphError> {
        config.validate()?;

        let buffer = ParticleBuffer::build(config.source_shape, config.target_shape, config.particle_count);

        let gesture = GestureHandle {
            controller: GestureController::from_config(&config),
            control: Arc::new(SharedControl::default()),
            gate: Arc::new(GestureGate::default()),
            video_size: (width.max(1), height.max(1)),
        };

        info!(
            particles = config.particle_count,
            from = %config.source_shape,
            to = %config.target_shape,
            "morph session created"
        );

        Ok(Self {
            renderer: MorphRenderer::new(&config),
            camera: Camera::from_config(&config, width, height),
            config,
            buffer,
            gesture,
            overlay: DotBuffer::default(),
            status: SessionStatus::Idle,
            camera_on: false,
            detector_error: None,
            frames_rendered: 0,
        })
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &MorphRenderer {
        &self.renderer
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn control(&self) -> ControlState {
        self.gesture.control.load()
    }

    pub fn overlay(&self) -> &DotBuffer {
        &self.overlay
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Clone of the gesture writer, for driving the gesture tick elsewhere.
    pub fn gesture_handle(&self) -> GestureHandle {
        self.gesture.clone()
    }

    pub fn detector_options(&self) -> DetectorOptions {
        DetectorOptions::from_config(&self.config)
    }

    // ---------- render tick ----------

    /// Advance the clock one frame and return the uniforms to draw it with.
    pub fn render_tick(&mut self) -> MorphUniforms {
        let control = self.gesture.control.load();
        self.renderer.advance();
        self.frames_rendered += 1;
        self.renderer.uniforms(&self.camera, control)
    }

    /// Morphed positions at the current clock, for CPU-side drawing.
    pub fn morph_positions(&mut self) -> &[Vec3] {
        let transition = self.gesture.control.transition();
        self.renderer.compute_positions(&self.buffer, transition)
    }

    pub fn vertices(&self) -> Vec<MorphVertex> {
        MorphRenderer::vertices(&self.buffer)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
        debug!(width, height, aspect = self.camera.aspect, "surface resized");
    }

    /// Replace both particle sets. The particle count is unchanged.
    pub fn set_shapes(&mut self, source: ShapeKind, target: ShapeKind) {
        self.buffer.rebuild(source, target);
        self.config.source_shape = source;
        self.config.target_shape = target;
        info!(from = %source, to = %target, "particle shapes replaced");
    }

    pub fn set_shapes_by_name(&mut self, source: &str, target: &str) -> Result<(), MorphError> {
        let source: ShapeKind = source.parse()?;
        let target: ShapeKind = target.parse()?;
        self.set_shapes(source, target);
        Ok(())
    }

    // ---------- gesture tick ----------

    /// Size of the video the detector runs on; scales the overlay dots.
    pub fn set_video_size(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.gesture.video_size = (width, height);
        }
    }

    /// Apply one detector result on the calling thread.
    pub fn on_camera_frame(&mut self, hand: Option<&[Landmark]>) -> FrameResult {
        let detection = Ok(hand.map(<[Landmark]>::to_vec));
        self.gesture.on_detection(detection, &mut self.overlay)
    }

    pub fn on_detection(&mut self, detection: Result<Option<Vec<Landmark>>, MorphError>) -> FrameResult {
        self.gesture.on_detection(detection, &mut self.overlay)
    }

    // ---------- lifecycle ----------

    /// Configure the detector. A failure is reported, not returned as fatal,
    /// and keeps gesture input off across camera restarts.
    pub fn init_detector<F, D>(&mut self, detector: &mut D) -> Result<(), MorphError>
    where
        D: HandDetector<F> + ?Sized,
    {
        let options = self.detector_options();
        match detector.configure(options) {
            Ok(()) => {
                if self.detector_error.take().is_some() {
                    info!("hand detector recovered");
                    if self.camera_on {
                        self.gesture.gate.running.store(true, Ordering::Release);
                        self.status = SessionStatus::Running;
                    } else {
                        self.status = SessionStatus::Idle;
                    }
                }
                Ok(())
            }
            Err(err) => {
                error!(%err, "hand detector unavailable");
                self.fail(&err);
                self.detector_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn detector_ready(&self) -> bool {
        self.detector_error.is_none()
    }

    pub fn start_camera(&mut self, camera: &mut dyn CameraDevice) -> Result<(), MorphError> {
        self.on_camera_started(camera.start())
    }

    pub fn stop_camera(&mut self, camera: &mut dyn CameraDevice) -> Result<(), MorphError> {
        self.on_camera_stopped(camera.stop())
    }

    /// Record the outcome of a camera start performed by the host.
    pub fn on_camera_started(&mut self, result: Result<(), MorphError>) -> Result<(), MorphError> {
        match result {
            Ok(()) => {
                self.camera_on = true;
                if let Some(err) = self.detector_error.clone() {
                    warn!(%err, "camera started without a hand detector");
                    self.status = SessionStatus::Failed(err.to_string());
                    return Err(err);
                }
                self.gesture.gate.running.store(true, Ordering::Release);
                self.status = SessionStatus::Running;
                info!("camera started");
                Ok(())
            }
            Err(err) => {
                error!(%err, "camera failed to start");
                self.camera_on = false;
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Record a camera stop performed by the host.
    ///
    /// New gesture frames are refused at once. A frame already in flight
    /// finishes but its result is discarded. Control state keeps its value.
    pub fn on_camera_stopped(&mut self, result: Result<(), MorphError>) -> Result<(), MorphError> {
        self.camera_on = false;
        self.gesture.gate.running.store(false, Ordering::Release);
        OverlayCommand::Clear.apply(&mut self.overlay);
        match result {
            Ok(()) => {
                self.status = SessionStatus::Idle;
                info!("camera stopped");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "camera failed to stop cleanly");
                self.status = SessionStatus::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Surface an initialization failure. Gesture input stops; rendering
    /// continues with the last control state.
    pub fn fail(&mut self, err: &MorphError) {
        self.gesture.gate.running.store(false, Ordering::Release);
        OverlayCommand::Clear.apply(&mut self.overlay);
        self.status = SessionStatus::Failed(err.to_string());
    }

    /// Stop gesture input and return to idle.
    pub fn shutdown(&mut self) {
        self.camera_on = false;
        self.gesture.gate.running.store(false, Ordering::Release);
        OverlayCommand::Clear.apply(&mut self.overlay);
        self.status = SessionStatus::Idle;
        info!(frames = self.frames_rendered, "morph session shut down");
    }
}
