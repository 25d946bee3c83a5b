//! Entrance and update animation hooks

use leptos::prelude::*;
use viz_kit::{Animation, AnimationConfig};

/// Progress in [0, 1] of an animation that restarts whenever `trigger`'s
/// reactive dependencies change.
///
/// Starts at 0 when animated, so renderers grow out of their baseline on
/// mount. A restart cancels the running frame loop first.
pub fn use_animation_progress(
    config: AnimationConfig,
    trigger: impl Fn() + 'static,
) -> ReadSignal<f64> {
    let initial = if config.is_animated() { 0.0 } else { 1.0 };
    let (progress, set_progress) = signal(initial);
    let animation = StoredValue::new_local(Animation::browser(config));

    Effect::new(move |_| {
        trigger();
        animation.with_value(|a| a.start(move |t| set_progress.set(t)));
    });

    on_cleanup(move || {
        animation.try_with_value(|a| a.cancel());
    });

    progress
}

/// Remembers the value a memo held before its latest change.
///
/// Renderers interpolate from this towards the new geometry; `None` until
/// the memo has changed at least once (first render animates from the
/// baseline instead).
pub fn use_previous<T>(current: Memo<T>) -> StoredValue<Option<T>>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let previous = StoredValue::new(None::<T>);
    Effect::new(move |last: Option<T>| {
        let now = current.get();
        previous.set_value(last);
        now
    });
    previous
}
