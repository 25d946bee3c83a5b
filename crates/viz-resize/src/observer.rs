//! Resize observer adapter with debounced delivery

use crate::{DebouncePolicy, Delivery, ResizeConfig};
use gloo_timers::callback::Timeout;
use leptos::html::Div;
use leptos::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use viz_core::ContainerSize;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, ResizeObserver, ResizeObserverEntry};

// ============================================================================
// STRATEGY PATTERN: Timer Driver
// ============================================================================

/// Source of one-shot timers and the current time
pub trait TimerDriver {
    type Handle;

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Self::Handle;

    fn clear(&self, handle: Self::Handle);

    fn now_ms(&self) -> f64;
}

/// Browser timers via `gloo-timers`
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimerDriver;

impl TimerDriver for GlooTimerDriver {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, callback)
    }

    fn clear(&self, handle: Timeout) {
        let _ = handle.cancel();
    }

    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

// ============================================================================
// DEBOUNCER
// ============================================================================

struct DebounceState<H, V> {
    pending: Option<H>,
    latest: Option<V>,
    last_delivery: Option<f64>,
    /// Bumped whenever the pending timer is replaced or cancelled
    generation: u64,
}

/// Rate-limits values on their way to a sink.
///
/// At most one timer is ever pending: it is cleared before a replacement is
/// scheduled, so only the latest value of a burst is delivered.
pub struct Debouncer<V: 'static, P: DebouncePolicy, T: TimerDriver + 'static> {
    policy: P,
    driver: Rc<T>,
    sink: Rc<dyn Fn(V)>,
    state: Rc<RefCell<DebounceState<T::Handle, V>>>,
}

impl<V: 'static, P: DebouncePolicy, T: TimerDriver + 'static> Clone for Debouncer<V, P, T> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
            driver: Rc::clone(&self.driver),
            sink: Rc::clone(&self.sink),
            state: Rc::clone(&self.state),
        }
    }
}

impl<V: 'static, P: DebouncePolicy, T: TimerDriver + 'static> Debouncer<V, P, T> {
    pub fn new(policy: P, driver: Rc<T>, sink: impl Fn(V) + 'static) -> Self {
        Self {
            policy,
            driver,
            sink: Rc::new(sink),
            state: Rc::new(RefCell::new(DebounceState {
                pending: None,
                latest: None,
                last_delivery: None,
                generation: 0,
            })),
        }
    }

    pub fn push(&self, value: V) {
        let now = self.driver.now_ms();
        let last = self.state.borrow().last_delivery;

        match self.policy.schedule(now, last) {
            Delivery::Now => {
                self.clear_pending();
                self.state.borrow_mut().last_delivery = Some(now);
                (self.sink)(value);
            }
            Delivery::After(delay_ms) => {
                let generation = self.clear_pending();
                self.state.borrow_mut().latest = Some(value);

                let state = Rc::clone(&self.state);
                let sink = Rc::clone(&self.sink);
                let driver = Rc::clone(&self.driver);
                let handle = self.driver.schedule(
                    delay_ms,
                    Box::new(move || {
                        let value = {
                            let mut s = state.borrow_mut();
                            if s.generation != generation {
                                return;
                            }
                            s.pending = None;
                            s.last_delivery = Some(driver.now_ms());
                            s.latest.take()
                        };
                        if let Some(value) = value {
                            sink(value);
                        }
                    }),
                );

                let mut s = self.state.borrow_mut();
                if s.generation == generation && s.latest.is_some() {
                    s.pending = Some(handle);
                }
            }
        }
    }

    /// Drop any pending delivery
    pub fn cancel(&self) {
        self.clear_pending();
        self.state.borrow_mut().latest = None;
    }

    pub fn has_pending(&self) -> bool {
        self.state.borrow().pending.is_some()
    }

    /// Clear the pending timer (if any); returns the new generation
    fn clear_pending(&self) -> u64 {
        let (handle, generation) = {
            let mut s = self.state.borrow_mut();
            s.generation = s.generation.wrapping_add(1);
            (s.pending.take(), s.generation)
        };
        if let Some(handle) = handle {
            self.driver.clear(handle);
        }
        generation
    }
}

// ============================================================================
// RESIZE HANDLE (Send + Sync)
// ============================================================================

/// Handle for stopping resize notifications
#[derive(Clone)]
pub struct ResizeHandle {
    stopped: Arc<AtomicBool>,
}

impl ResizeHandle {
    fn new() -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        !self.is_stopped()
    }
}

// ============================================================================
// MEASUREMENT
// ============================================================================

/// Current border-box size of an element
pub fn measure(element: &Element) -> ContainerSize {
    let rect = element.get_bounding_client_rect();
    ContainerSize::new(rect.width(), rect.height())
}

fn entry_size(entry: &ResizeObserverEntry) -> ContainerSize {
    let rect = entry.content_rect();
    ContainerSize::new(rect.width(), rect.height())
}

type ObserverCallback = Closure<dyn FnMut(js_sys::Array)>;

// ============================================================================
// LEPTOS INTEGRATION
// ============================================================================

/// Observe the size of `target`, calling `on_resize` with each (rate-limited)
/// measurement. The first measurement after mount is delivered synchronously.
///
/// The observer is disconnected and any pending timer cleared when the owning
/// component is cleaned up.
pub fn use_resize_observer_with<F>(
    target: NodeRef<Div>,
    config: ResizeConfig,
    on_resize: F,
) -> ResizeHandle
where
    F: Fn(ContainerSize) + 'static,
{
    let handle = ResizeHandle::new();
    let on_resize: Rc<dyn Fn(ContainerSize)> = Rc::new(on_resize);

    let debouncer = {
        let handle = handle.clone();
        let on_resize = Rc::clone(&on_resize);
        Debouncer::new(config.policy, Rc::new(GlooTimerDriver), move |size| {
            if handle.is_running() {
                on_resize(size);
            }
        })
    };

    let debouncer_slot = StoredValue::new_local(debouncer.clone());
    let observer_slot: StoredValue<Option<(ResizeObserver, ObserverCallback)>, LocalStorage> =
        StoredValue::new_local(None);

    {
        let handle = handle.clone();
        Effect::new(move |_| {
            let Some(element) = target.get() else {
                return;
            };
            if handle.is_stopped() {
                return;
            }
            disconnect(observer_slot);

            if config.initial_measure {
                on_resize(measure(&element));
            }

            let debouncer = debouncer.clone();
            let callback: ObserverCallback = Closure::new(move |entries: js_sys::Array| {
                let last = entries.length().checked_sub(1).map(|i| entries.get(i));
                if let Some(entry) = last.and_then(|e| e.dyn_into::<ResizeObserverEntry>().ok()) {
                    debouncer.push(entry_size(&entry));
                }
            });

            match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
                Ok(observer) => {
                    observer.observe(&element);
                    tracing::debug!("resize observer attached");
                    observer_slot.set_value(Some((observer, callback)));
                }
                Err(err) => {
                    tracing::error!("ResizeObserver unavailable, keeping initial size: {:?}", err);
                }
            }
        });
    }

    {
        let handle = handle.clone();
        on_cleanup(move || {
            handle.stop();
            disconnect(observer_slot);
            debouncer_slot.try_with_value(|d| d.cancel());
            tracing::debug!("resize observer detached");
        });
    }

    handle
}

/// Observe the size of `target` as a signal (starts at zero until mounted)
pub fn use_resize_observer(target: NodeRef<Div>, config: ResizeConfig) -> ReadSignal<ContainerSize> {
    let (size, set_size) = signal(ContainerSize::default());
    use_resize_observer_with(target, config, move |measured| {
        if size.get_untracked() != measured {
            set_size.set(measured);
        }
    });
    size
}

fn disconnect(slot: StoredValue<Option<(ResizeObserver, ObserverCallback)>, LocalStorage>) {
    slot.try_update_value(|current| {
        if let Some((observer, _callback)) = current.take() {
            observer.disconnect();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Debounce, Immediate, Throttle};
    use std::cell::Cell;

    /// Timers fire only when the test advances the clock
    #[derive(Default)]
    struct ManualTimers {
        now: Cell<f64>,
        next_id: Cell<u32>,
        pending: RefCell<Vec<(u32, f64, Box<dyn FnOnce()>)>>,
        cleared: Cell<usize>,
    }

    impl ManualTimers {
        fn advance(&self, ms: f64) {
            let now = self.now.get() + ms;
            self.now.set(now);
            let due: Vec<_> = {
                let mut pending = self.pending.borrow_mut();
                let (due, rest): (Vec<_>, Vec<_>) =
                    pending.drain(..).partition(|(_, at, _)| *at <= now);
                *pending = rest;
                due
            };
            for (_, _, callback) in due {
                callback();
            }
        }

        fn outstanding(&self) -> usize {
            self.pending.borrow().len()
        }
    }

    impl TimerDriver for ManualTimers {
        type Handle = u32;

        fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> u32 {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            let at = self.now.get() + delay_ms as f64;
            self.pending.borrow_mut().push((id, at, callback));
            id
        }

        fn clear(&self, handle: u32) {
            self.cleared.set(self.cleared.get() + 1);
            self.pending.borrow_mut().retain(|(id, _, _)| *id != handle);
        }

        fn now_ms(&self) -> f64 {
            self.now.get()
        }
    }

    fn collect<P: DebouncePolicy>(
        policy: P,
    ) -> (Rc<ManualTimers>, Debouncer<ContainerSize, P, ManualTimers>, Rc<RefCell<Vec<ContainerSize>>>) {
        let timers = Rc::new(ManualTimers::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let debouncer = Debouncer::new(policy, Rc::clone(&timers), move |size| sink.borrow_mut().push(size));
        (timers, debouncer, seen)
    }

    #[test]
    fn test_debounce_delivers_latest_only() {
        let (timers, debouncer, seen) = collect(Debounce { delay_ms: 100 });

        debouncer.push(ContainerSize::new(100.0, 100.0));
        timers.advance(50.0);
        debouncer.push(ContainerSize::new(200.0, 100.0));
        timers.advance(50.0);
        debouncer.push(ContainerSize::new(300.0, 100.0));

        // each replacement cleared the previous timer first
        assert_eq!(timers.cleared.get(), 2);
        assert_eq!(timers.outstanding(), 1);
        assert!(seen.borrow().is_empty());

        timers.advance(100.0);
        assert_eq!(*seen.borrow(), vec![ContainerSize::new(300.0, 100.0)]);
        assert!(!debouncer.has_pending());
    }

    #[test]
    fn test_immediate_delivers_synchronously() {
        let (timers, debouncer, seen) = collect(Immediate);
        debouncer.push(ContainerSize::new(400.0, 300.0));
        debouncer.push(ContainerSize::new(500.0, 300.0));
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(timers.outstanding(), 0);
    }

    #[test]
    fn test_throttle_trailing_delivery() {
        let (timers, debouncer, seen) = collect(Throttle { interval_ms: 50 });

        debouncer.push(ContainerSize::new(1.0, 1.0));
        debouncer.push(ContainerSize::new(2.0, 1.0));
        debouncer.push(ContainerSize::new(3.0, 1.0));
        assert_eq!(seen.borrow().len(), 1);

        timers.advance(50.0);
        assert_eq!(
            *seen.borrow(),
            vec![ContainerSize::new(1.0, 1.0), ContainerSize::new(3.0, 1.0)]
        );
    }

    #[test]
    fn test_cancel_drops_pending() {
        let (timers, debouncer, seen) = collect(Debounce::default());
        debouncer.push(ContainerSize::new(100.0, 100.0));
        debouncer.cancel();
        assert_eq!(timers.outstanding(), 0);

        timers.advance(500.0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_resize_handle() {
        let handle = ResizeHandle::new();
        assert!(handle.is_running());

        handle.stop();
        assert!(handle.is_stopped());
        assert!(!handle.is_running());
    }
}
