//! Frame-driven animation scheduler
//!
//! `progress = ease(clamp((now - start) / duration, 0, 1))`, where `start` is
//! the timestamp of the first frame. Frames stop once linear progress reaches
//! 1. Each [`Animation`] owns its own state; restarting cancels the frame that
//! is still outstanding.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

// ============================================================================
// EASING
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    /// Map linear progress in `[0, 1]` to eased progress in `[0, 1]`
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => t * (2.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
        }
    }
}

/// Linear interpolation between `from` and `to`
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub enabled: bool,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 400.0,
            easing: Easing::EaseOutCubic,
        }
    }
}

impl AnimationConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn fast() -> Self {
        Self {
            duration_ms: 150.0,
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Whether animating would request any frame at all
    pub fn is_animated(&self) -> bool {
        self.enabled && self.duration_ms > 0.0
    }
}

// ============================================================================
// STRATEGY PATTERN: Frame Driver
// ============================================================================

/// Opaque id of a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Source of animation frames
pub trait FrameDriver {
    /// Schedule `callback` with the frame timestamp in milliseconds.
    /// `None` when no frame could be requested.
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<FrameHandle>;

    fn cancel_frame(&self, handle: FrameHandle);
}

/// `window.requestAnimationFrame`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserFrameDriver;

impl FrameDriver for BrowserFrameDriver {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<FrameHandle> {
        let window = web_sys::window()?;
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));

        match window.request_animation_frame(closure.unchecked_ref()) {
            Ok(id) => Some(FrameHandle(id)),
            Err(err) => {
                tracing::error!("requestAnimationFrame failed: {:?}", err);
                None
            }
        }
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(err) = window.cancel_animation_frame(handle.0) {
            tracing::error!("cancelAnimationFrame failed: {:?}", err);
        }
    }
}

// ============================================================================
// SCHEDULER
// ============================================================================

#[derive(Debug, Default)]
struct AnimationState {
    /// Bumped on every start/cancel; stale frame callbacks compare against it
    generation: u64,
    start: Option<f64>,
    linear: f64,
    handle: Option<FrameHandle>,
    running: bool,
}

/// One animation instance (entrance or data update of a single renderer)
pub struct Animation<D: FrameDriver + 'static> {
    config: AnimationConfig,
    driver: Rc<D>,
    state: Rc<RefCell<AnimationState>>,
}

impl<D: FrameDriver + 'static> Clone for Animation<D> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            driver: Rc::clone(&self.driver),
            state: Rc::clone(&self.state),
        }
    }
}

impl Animation<BrowserFrameDriver> {
    pub fn browser(config: AnimationConfig) -> Self {
        Self::new(config, BrowserFrameDriver)
    }
}

impl<D: FrameDriver + 'static> Animation<D> {
    pub fn new(config: AnimationConfig, driver: D) -> Self {
        Self::with_shared_driver(config, Rc::new(driver))
    }

    pub fn with_shared_driver(config: AnimationConfig, driver: Rc<D>) -> Self {
        Self {
            config,
            driver,
            state: Rc::new(RefCell::new(AnimationState::default())),
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Eased progress; 1 for a disabled animation, 0 before the first start
    pub fn progress(&self) -> f64 {
        if !self.config.is_animated() {
            return 1.0;
        }
        self.config.easing.apply(self.state.borrow().linear)
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// (Re)start from zero. `on_progress` receives eased progress once per
    /// frame, ending with exactly 1.0.
    pub fn start(&self, on_progress: impl Fn(f64) + 'static) {
        self.cancel();

        let generation = {
            let mut state = self.state.borrow_mut();
            state.start = None;
            if self.config.is_animated() {
                state.linear = 0.0;
                state.running = true;
            } else {
                state.linear = 1.0;
            }
            state.generation
        };

        if !self.config.is_animated() {
            on_progress(1.0);
            return;
        }

        let on_progress: Rc<dyn Fn(f64)> = Rc::new(on_progress);
        on_progress(self.config.easing.apply(0.0));
        schedule(
            Rc::clone(&self.driver),
            Rc::clone(&self.state),
            self.config,
            generation,
            on_progress,
        );
    }

    /// Stop without completing; progress keeps its last value
    pub fn cancel(&self) {
        let handle = {
            let mut state = self.state.borrow_mut();
            state.generation = state.generation.wrapping_add(1);
            state.running = false;
            state.handle.take()
        };
        if let Some(handle) = handle {
            self.driver.cancel_frame(handle);
        }
    }
}

fn schedule<D: FrameDriver + 'static>(
    driver: Rc<D>,
    state: Rc<RefCell<AnimationState>>,
    config: AnimationConfig,
    generation: u64,
    on_progress: Rc<dyn Fn(f64)>,
) {
    let frame = {
        let driver = Rc::clone(&driver);
        let state = Rc::clone(&state);
        let on_progress = Rc::clone(&on_progress);
        move |now: f64| {
            let (linear, done) = {
                let mut s = state.borrow_mut();
                if s.generation != generation {
                    return;
                }
                s.handle = None;
                let start = *s.start.get_or_insert(now);
                let t = ((now - start) / config.duration_ms).clamp(0.0, 1.0);
                s.linear = s.linear.max(t);
                let done = s.linear >= 1.0;
                if done {
                    s.running = false;
                }
                (s.linear, done)
            };

            on_progress(config.easing.apply(linear));
            if !done {
                schedule(driver, state, config, generation, on_progress);
            }
        }
    };

    match driver.request_frame(Box::new(frame)) {
        Some(handle) => {
            let mut s = state.borrow_mut();
            if s.generation == generation && s.running {
                s.handle = Some(handle);
            }
        }
        None => {
            // no frame source: jump straight to the end state
            {
                let mut s = state.borrow_mut();
                if s.generation != generation {
                    return;
                }
                s.linear = 1.0;
                s.running = false;
            }
            tracing::warn!("no animation frame available; finishing immediately");
            on_progress(1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Frames fire only when the test calls `tick`
    #[derive(Default)]
    struct ManualDriver {
        pending: RefCell<Vec<(i32, Box<dyn FnOnce(f64)>)>>,
        next_id: Cell<i32>,
        requested: Cell<usize>,
        cancelled: RefCell<Vec<i32>>,
    }

    impl ManualDriver {
        fn tick(&self, now: f64) {
            let frames = std::mem::take(&mut *self.pending.borrow_mut());
            for (_, frame) in frames {
                frame(now);
            }
        }
    }

    impl FrameDriver for ManualDriver {
        fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<FrameHandle> {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            self.requested.set(self.requested.get() + 1);
            self.pending.borrow_mut().push((id, callback));
            Some(FrameHandle(id))
        }

        fn cancel_frame(&self, handle: FrameHandle) {
            self.cancelled.borrow_mut().push(handle.0);
            self.pending.borrow_mut().retain(|(id, _)| *id != handle.0);
        }
    }

    struct NoFrames;

    impl FrameDriver for NoFrames {
        fn request_frame(&self, _callback: Box<dyn FnOnce(f64)>) -> Option<FrameHandle> {
            None
        }

        fn cancel_frame(&self, _handle: FrameHandle) {}
    }

    fn recorder() -> (Rc<RefCell<Vec<f64>>>, impl Fn(f64) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |p| sink.borrow_mut().push(p))
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseInQuad,
            Easing::EaseOutQuad,
            Easing::EaseInOutQuad,
            Easing::EaseOutCubic,
            Easing::EaseInOutCubic,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
            assert_eq!(easing.apply(2.0), easing.apply(1.0));
        }
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
        assert_eq!(Easing::EaseInQuad.apply(0.5), 0.25);
    }

    #[test]
    fn test_disabled_completes_without_frames() {
        let driver = Rc::new(ManualDriver::default());
        let animation = Animation::with_shared_driver(AnimationConfig::disabled(), Rc::clone(&driver));
        assert_eq!(animation.progress(), 1.0);

        let (seen, sink) = recorder();
        animation.start(sink);
        assert_eq!(*seen.borrow(), vec![1.0]);
        assert_eq!(driver.requested.get(), 0);
        assert!(!animation.is_running());
    }

    #[test]
    fn test_zero_duration_completes_without_frames() {
        let driver = Rc::new(ManualDriver::default());
        let config = AnimationConfig::default().with_duration(0.0);
        let animation = Animation::with_shared_driver(config, Rc::clone(&driver));
        animation.start(|_| {});
        assert_eq!(animation.progress(), 1.0);
        assert_eq!(driver.requested.get(), 0);
    }

    #[test]
    fn test_progress_runs_to_completion() {
        let driver = Rc::new(ManualDriver::default());
        let config = AnimationConfig::default()
            .with_duration(100.0)
            .with_easing(Easing::Linear);
        let animation = Animation::with_shared_driver(config, Rc::clone(&driver));
        assert_eq!(animation.progress(), 0.0);

        let (seen, sink) = recorder();
        animation.start(sink);
        assert!(animation.is_running());

        // first frame fixes the start time
        driver.tick(1_000.0);
        driver.tick(1_050.0);
        assert_eq!(animation.progress(), 0.5);
        driver.tick(1_200.0);
        assert_eq!(animation.progress(), 1.0);
        assert!(!animation.is_running());

        // nothing scheduled after completion
        let requested = driver.requested.get();
        driver.tick(1_300.0);
        assert_eq!(driver.requested.get(), requested);

        assert_eq!(*seen.borrow(), vec![0.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_progress_is_monotone() {
        let driver = Rc::new(ManualDriver::default());
        let config = AnimationConfig::default()
            .with_duration(100.0)
            .with_easing(Easing::Linear);
        let animation = Animation::with_shared_driver(config, Rc::clone(&driver));
        animation.start(|_| {});

        driver.tick(100.0);
        driver.tick(160.0);
        // clock going backwards never lowers progress
        driver.tick(120.0);
        assert_eq!(animation.progress(), 0.6);
    }

    #[test]
    fn test_restart_cancels_outstanding_frame() {
        let driver = Rc::new(ManualDriver::default());
        let config = AnimationConfig::default()
            .with_duration(100.0)
            .with_easing(Easing::Linear);
        let animation = Animation::with_shared_driver(config, Rc::clone(&driver));

        let (first, sink) = recorder();
        animation.start(sink);
        driver.tick(0.0);
        driver.tick(50.0);

        animation.start(|_| {});
        assert_eq!(driver.cancelled.borrow().len(), 1);
        assert_eq!(animation.progress(), 0.0);

        driver.tick(500.0);
        driver.tick(550.0);
        assert_eq!(animation.progress(), 0.5);
        // the first run saw nothing after the restart
        assert_eq!(*first.borrow(), vec![0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_instances_are_independent() {
        let driver = Rc::new(ManualDriver::default());
        let config = AnimationConfig::default()
            .with_duration(100.0)
            .with_easing(Easing::Linear);
        let a = Animation::with_shared_driver(config, Rc::clone(&driver));
        let b = Animation::with_shared_driver(config, Rc::clone(&driver));

        a.start(|_| {});
        driver.tick(0.0);
        b.start(|_| {});
        driver.tick(50.0);

        assert_eq!(a.progress(), 0.5);
        assert_eq!(b.progress(), 0.0);

        a.cancel();
        driver.tick(100.0);
        assert_eq!(a.progress(), 0.5);
        assert_eq!(b.progress(), 0.5);
    }

    #[test]
    fn test_missing_frame_source_finishes() {
        let animation = Animation::new(AnimationConfig::default(), NoFrames);
        let (seen, sink) = recorder();
        animation.start(sink);
        assert_eq!(animation.progress(), 1.0);
        assert_eq!(seen.borrow().last(), Some(&1.0));
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
    }
}
