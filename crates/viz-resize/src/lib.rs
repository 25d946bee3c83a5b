//! # viz-resize
//!
//! Container size observation for charts, with optional debouncing.
//! Uses Strategy pattern for the debounce policy and the timer source.

pub mod observer;

pub use observer::*;

/// Default debounce delay for resize notifications
pub const DEFAULT_DEBOUNCE_MS: u32 = 100;

// ============================================================================
// STRATEGY PATTERN: Debounce Policy
// ============================================================================

/// What to do with a size notification that just arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Deliver right away (cancelling anything pending)
    Now,
    /// Deliver after the delay; a newer notification replaces this one
    After(u32),
}

/// Strategy trait for rate-limiting resize notifications
pub trait DebouncePolicy: Send + Sync + Clone {
    /// Decide for a notification at `now_ms`, given when the last one was delivered
    fn schedule(&self, now_ms: f64, last_delivery_ms: Option<f64>) -> Delivery;
}

/// Trailing-edge debounce: deliver once notifications have been quiet for `delay_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    pub delay_ms: u32,
}

impl Default for Debounce {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl DebouncePolicy for Debounce {
    fn schedule(&self, _now_ms: f64, _last_delivery_ms: Option<f64>) -> Delivery {
        if self.delay_ms == 0 {
            Delivery::Now
        } else {
            Delivery::After(self.delay_ms)
        }
    }
}

/// No rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Immediate;

impl DebouncePolicy for Immediate {
    fn schedule(&self, _now_ms: f64, _last_delivery_ms: Option<f64>) -> Delivery {
        Delivery::Now
    }
}

/// At most one delivery per `interval_ms`; the last notification of a burst
/// is delivered when the interval ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    pub interval_ms: u32,
}

impl Default for Throttle {
    fn default() -> Self {
        Self { interval_ms: 50 }
    }
}

impl DebouncePolicy for Throttle {
    fn schedule(&self, now_ms: f64, last_delivery_ms: Option<f64>) -> Delivery {
        let interval = self.interval_ms as f64;
        match last_delivery_ms {
            Some(last) if now_ms - last < interval => {
                Delivery::After((interval - (now_ms - last)).ceil().max(1.0) as u32)
            }
            _ => Delivery::Now,
        }
    }
}

/// Policy selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePolicy {
    Debounce(Debounce),
    Immediate(Immediate),
    Throttle(Throttle),
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self::Debounce(Debounce::default())
    }
}

impl DebouncePolicy for ResizePolicy {
    fn schedule(&self, now_ms: f64, last_delivery_ms: Option<f64>) -> Delivery {
        match self {
            Self::Debounce(p) => p.schedule(now_ms, last_delivery_ms),
            Self::Immediate(p) => p.schedule(now_ms, last_delivery_ms),
            Self::Throttle(p) => p.schedule(now_ms, last_delivery_ms),
        }
    }
}

// ============================================================================
// RESIZE CONFIGURATION
// ============================================================================

/// Resize observer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeConfig {
    pub policy: ResizePolicy,
    /// Measure synchronously once the element is mounted
    pub initial_measure: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            policy: ResizePolicy::default(),
            initial_measure: true,
        }
    }
}

impl ResizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debounce(mut self, delay_ms: u32) -> Self {
        self.policy = ResizePolicy::Debounce(Debounce { delay_ms });
        self
    }

    pub fn immediate(mut self) -> Self {
        self.policy = ResizePolicy::Immediate(Immediate);
        self
    }

    pub fn throttle(mut self, interval_ms: u32) -> Self {
        self.policy = ResizePolicy::Throttle(Throttle { interval_ms });
        self
    }

    pub fn initial_measure(mut self, enabled: bool) -> Self {
        self.initial_measure = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_policy() {
        let policy = Debounce::default();
        assert_eq!(policy.schedule(0.0, None), Delivery::After(100));
        assert_eq!(policy.schedule(500.0, Some(450.0)), Delivery::After(100));
        assert_eq!(Debounce { delay_ms: 0 }.schedule(0.0, None), Delivery::Now);
    }

    #[test]
    fn test_throttle_policy() {
        let policy = Throttle { interval_ms: 50 };
        assert_eq!(policy.schedule(0.0, None), Delivery::Now);
        assert_eq!(policy.schedule(20.0, Some(0.0)), Delivery::After(30));
        assert_eq!(policy.schedule(60.0, Some(0.0)), Delivery::Now);
    }

    #[test]
    fn test_resize_config() {
        let config = ResizeConfig::new();
        assert_eq!(config.policy, ResizePolicy::Debounce(Debounce { delay_ms: 100 }));
        assert!(config.initial_measure);

        let config = ResizeConfig::new().throttle(16).initial_measure(false);
        assert_eq!(config.policy.schedule(0.0, None), Delivery::Now);
        assert!(!config.initial_measure);

        assert_eq!(ResizeConfig::new().immediate().policy.schedule(5.0, Some(4.0)), Delivery::Now);
    }
}
