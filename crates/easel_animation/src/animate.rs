//! Property animation
//!
//! An [`Animate`] interpolates named properties of an [`AnimationTarget`] from
//! their current values (or explicit `from` overrides) to configured end
//! values over a duration, driven by a scheduler subscription while playing.
//!
//! The target is held weakly. If it is dropped while the animation plays, the
//! animation keeps ticking without visible effect until it completes.
//!
//! The shape flavour ([`Animate::shape`]) additionally calls
//! [`AnimationTarget::mark_for_redraw`] after every update, which is how
//! interpolated properties reach the scheduler's redraw queue.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use easel_core::{AnimationTarget, PropertyValue};
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::scheduler::SchedulerHandle;
use crate::ticked::{TickCallback, TickedSubscription};

/// Shared, mutable animation target
pub type TargetRef = Rc<RefCell<dyn AnimationTarget>>;

/// Called after every update with the elapsed seconds of that update
pub type UpdateFn = Box<dyn FnMut(f32)>;

/// Called when an animation reaches its end
pub type CompleteFn = Box<dyn FnMut(&Animate)>;

type Values = SmallVec<[(String, PropertyValue); 4]>;
type Starts = SmallVec<[(usize, PropertyValue); 4]>;

/// Observer notified after an animation's own completion logic has run
pub trait CompletionListener {
    fn animation_completed(&self, animation: &Animate);
}

// ============================================================================
// Configuration
// ============================================================================

/// Builder for an [`Animate`]
///
/// ```
/// use easel_animation::{AnimateConfig, Easing};
/// use easel_core::PropertyBag;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let bag = Rc::new(RefCell::new(PropertyBag::new().with("x", 0.0)));
/// let config = AnimateConfig::new(&bag)
///     .to("x", 100.0)
///     .duration(0.5)
///     .easing(Easing::QuadOut);
/// ```
pub struct AnimateConfig {
    target: Option<Weak<RefCell<dyn AnimationTarget>>>,
    to: Values,
    from: Values,
    duration: f32,
    easing: Easing,
    looped: bool,
    on_update: Option<UpdateFn>,
    on_complete: Option<CompleteFn>,
}

impl AnimateConfig {
    /// Animate properties of `target`
    pub fn new<T: AnimationTarget + 'static>(target: &Rc<RefCell<T>>) -> Self {
        let target: TargetRef = target.clone();
        Self::with_target(&target)
    }

    /// Animate properties of a type-erased target
    pub fn with_target(target: &TargetRef) -> Self {
        Self {
            target: Some(Rc::downgrade(target)),
            ..Self::detached()
        }
    }

    /// A configuration without a target; the animation only measures time
    pub fn detached() -> Self {
        Self {
            target: None,
            to: SmallVec::new(),
            from: SmallVec::new(),
            duration: 0.0,
            easing: Easing::Linear,
            looped: false,
            on_update: None,
            on_complete: None,
        }
    }

    /// End value of a property
    pub fn to(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        set_value(&mut self.to, name.into(), value.into());
        self
    }

    /// Start value of a property, used instead of the target's current value
    pub fn from(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        set_value(&mut self.from, name.into(), value.into());
        self
    }

    /// Length in seconds; negative and NaN become 0
    pub fn duration(mut self, secs: f32) -> Self {
        self.duration = if secs.is_nan() { 0.0 } else { secs.max(0.0) };
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    pub fn on_update(mut self, callback: impl FnMut(f32) + 'static) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn on_complete(mut self, callback: impl FnMut(&Animate) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

fn set_value(values: &mut Values, name: String, value: PropertyValue) {
    match values.iter_mut().find(|(existing, _)| *existing == name) {
        Some(slot) => slot.1 = value,
        None => values.push((name, value)),
    }
}

// ============================================================================
// Animate
// ============================================================================

struct Track {
    name: String,
    end: PropertyValue,
}

#[derive(Default)]
struct PlaybackState {
    looped: bool,
    elapsed: f32,
    progress: f32,
    starts: Starts,
    /// Present while playing
    subscription: Option<TickedSubscription>,
    /// Bumped on every play, stale ticks carry an older value
    generation: u64,
}

struct AnimateShared {
    scheduler: SchedulerHandle,
    target: Option<Weak<RefCell<dyn AnimationTarget>>>,
    tracks: SmallVec<[Track; 4]>,
    overrides: Values,
    duration: f32,
    easing: Easing,
    redraw_target: bool,
    state: RefCell<PlaybackState>,
    on_update: RefCell<Option<UpdateFn>>,
    on_complete: RefCell<Option<CompleteFn>>,
    listeners: RefCell<Vec<Weak<dyn CompletionListener>>>,
}

impl Drop for AnimateShared {
    fn drop(&mut self) {
        if let Some(subscription) = self.state.get_mut().subscription.take() {
            subscription.remove();
        }
    }
}

/// A property animation
///
/// Cloning yields another handle to the same animation. Dropping the last
/// handle stops it.
#[derive(Clone)]
pub struct Animate {
    inner: Rc<AnimateShared>,
}

impl Animate {
    /// Create an animation that writes properties only
    pub fn new(scheduler: &SchedulerHandle, config: AnimateConfig) -> Self {
        Self::build(scheduler, config, false)
    }

    /// Create an animation that also marks its target for redraw after every
    /// update
    pub fn shape(scheduler: &SchedulerHandle, config: AnimateConfig) -> Self {
        Self::build(scheduler, config, true)
    }

    fn build(scheduler: &SchedulerHandle, config: AnimateConfig, redraw_target: bool) -> Self {
        let tracks = config
            .to
            .into_iter()
            .map(|(name, end)| Track { name, end })
            .collect();

        Self {
            inner: Rc::new(AnimateShared {
                scheduler: scheduler.clone(),
                target: config.target,
                tracks,
                overrides: config.from,
                duration: config.duration,
                easing: config.easing,
                redraw_target,
                state: RefCell::new(PlaybackState {
                    looped: config.looped,
                    ..PlaybackState::default()
                }),
                on_update: RefCell::new(config.on_update),
                on_complete: RefCell::new(config.on_complete),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Start playing from the beginning; no-op while playing
    pub fn play(&self) {
        if self.is_playing() {
            return;
        }
        let starts = self.capture_starts();
        self.start(starts);
    }

    /// Stop playing and discard the start values; no-op while idle
    pub fn stop(&self) {
        let subscription = {
            let mut state = self.inner.state.borrow_mut();
            state.starts.clear();
            state.subscription.take()
        };
        if let Some(subscription) = subscription {
            subscription.remove();
        }
    }

    fn start(&self, starts: Starts) {
        let Some(scheduler) = self.inner.scheduler.upgrade() else {
            tracing::debug!("Animate: scheduler is gone, not playing");
            return;
        };

        let generation = {
            let mut state = self.inner.state.borrow_mut();
            state.starts = starts;
            state.elapsed = 0.0;
            state.progress = 0.0;
            state.generation += 1;
            state.generation
        };

        let weak = Rc::downgrade(&self.inner);
        let callback: TickCallback = Rc::new(move |elapsed_secs: f32| {
            if let Some(inner) = weak.upgrade() {
                Animate { inner }.on_tick(generation, elapsed_secs);
            }
        });

        let subscription = scheduler.add_ticked(callback, 0);
        self.inner.state.borrow_mut().subscription = Some(subscription);
    }

    /// Apply `from` overrides the target lacks and snapshot interpolation
    /// origins
    fn capture_starts(&self) -> Starts {
        let mut starts = Starts::new();
        let Some(target) = self.target() else {
            return starts;
        };
        let Ok(mut target) = target.try_borrow_mut() else {
            tracing::warn!("Animate: target is borrowed elsewhere, nothing to animate");
            return starts;
        };

        let mut applied: SmallVec<[&str; 4]> = SmallVec::new();
        for (name, value) in &self.inner.overrides {
            if target.property(name).is_some() {
                continue;
            }
            match target.set_property(name, *value) {
                Ok(()) => applied.push(name.as_str()),
                Err(err) => {
                    tracing::warn!(property = %name, %err, "Animate: cannot apply start value")
                }
            }
        }

        for (index, track) in self.inner.tracks.iter().enumerate() {
            let start = if applied.contains(&track.name.as_str()) {
                self.inner
                    .overrides
                    .iter()
                    .find(|(name, _)| *name == track.name)
                    .map(|(_, value)| *value)
            } else {
                target.property(&track.name)
            };

            match start {
                Some(start) if start.kind() == track.end.kind() => starts.push((index, start)),
                Some(start) => tracing::warn!(
                    property = %track.name,
                    expected = %track.end.kind(),
                    found = %start.kind(),
                    "Animate: skipping property of mismatched kind"
                ),
                None => tracing::debug!(
                    property = %track.name,
                    "Animate: target has no value to animate from"
                ),
            }
        }

        starts
    }

    fn on_tick(&self, generation: u64, elapsed_secs: f32) {
        {
            let state = self.inner.state.borrow();
            if state.generation != generation || state.subscription.is_none() {
                return;
            }
        }
        if self.update(elapsed_secs) {
            self.complete();
        }
    }

    /// Advance by `elapsed_secs` and write the interpolated values
    ///
    /// Returns `true` once progress has reached 1.
    pub fn update(&self, elapsed_secs: f32) -> bool {
        let (progress, values) = {
            let mut state = self.inner.state.borrow_mut();
            state.elapsed += elapsed_secs;
            let progress = if self.inner.duration <= 0.0 {
                1.0
            } else {
                (state.elapsed / self.inner.duration).min(1.0)
            };
            state.progress = progress;

            let easing = self.inner.easing;
            let values: Starts = state
                .starts
                .iter()
                .filter_map(|(index, start)| {
                    start
                        .combine(&self.inner.tracks[*index].end, |b, c| {
                            easing.apply(progress, b, c)
                        })
                        .map(|value| (*index, value))
                })
                .collect();
            (progress, values)
        };

        if let Some(target) = self.target() {
            match target.try_borrow_mut() {
                Ok(mut target) => {
                    for (index, value) in values {
                        let name = &self.inner.tracks[index].name;
                        if let Err(err) = target.set_property(name, value) {
                            tracing::warn!(property = %name, %err, "Animate: skipping property");
                        }
                    }
                    if self.inner.redraw_target {
                        target.mark_for_redraw();
                    }
                }
                Err(_) => {
                    tracing::warn!("Animate: target is borrowed elsewhere, skipping update")
                }
            }
        }

        let callback = self.inner.on_update.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(elapsed_secs);
            let mut slot = self.inner.on_update.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }

        progress >= 1.0
    }

    /// Finish the current cycle
    ///
    /// A non-looping animation stops, then runs its completion callback. A
    /// looping one runs the callback and replays from the same origin, unless
    /// the callback stopped it, replayed it, or switched looping off. Listeners
    /// are notified last. No-op while idle.
    pub fn complete(&self) {
        let (looped, generation, origin) = {
            let state = self.inner.state.borrow();
            if state.subscription.is_none() {
                return;
            }
            (state.looped, state.generation, state.starts.clone())
        };

        if !looped {
            self.stop();
        }

        let callback = self.inner.on_complete.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(self);
            let mut slot = self.inner.on_complete.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }

        if looped {
            let untouched = {
                let state = self.inner.state.borrow();
                state.subscription.is_some() && state.generation == generation
            };
            if untouched {
                self.stop();
                if self.is_looped() {
                    self.start(origin);
                }
            }
        }

        self.notify_listeners();
    }

    fn notify_listeners(&self) {
        let listeners: SmallVec<[Rc<dyn CompletionListener>; 2]> = {
            let mut listeners = self.inner.listeners.borrow_mut();
            listeners.retain(|listener| listener.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in listeners {
            listener.animation_completed(self);
        }
    }

    /// Register an observer of completions
    ///
    /// Listeners are held weakly. Returns `false` if already registered.
    pub fn add_completion_listener(&self, listener: &Rc<dyn CompletionListener>) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let weak = Rc::downgrade(listener);
        if listeners.iter().any(|existing| existing.ptr_eq(&weak)) {
            return false;
        }
        listeners.push(weak);
        true
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn is_playing(&self) -> bool {
        self.inner.state.borrow().subscription.is_some()
    }

    /// Change looping; takes effect at the next completion
    pub fn set_looped(&self, looped: bool) {
        self.inner.state.borrow_mut().looped = looped;
    }

    pub fn is_looped(&self) -> bool {
        self.inner.state.borrow().looped
    }

    /// Normalized progress of the current cycle in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.inner.state.borrow().progress
    }

    /// Seconds accumulated in the current cycle
    pub fn elapsed(&self) -> f32 {
        self.inner.state.borrow().elapsed
    }

    pub fn duration(&self) -> f32 {
        self.inner.duration
    }

    pub fn easing(&self) -> Easing {
        self.inner.easing
    }

    /// Whether this animation marks its target for redraw
    pub fn is_shape(&self) -> bool {
        self.inner.redraw_target
    }

    pub fn target(&self) -> Option<TargetRef> {
        self.inner.target.as_ref().and_then(Weak::upgrade)
    }

    /// Whether both handles refer to the same animation
    pub fn ptr_eq(&self, other: &Animate) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Animate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Animate")
            .field("duration", &self.inner.duration)
            .field("easing", &self.inner.easing)
            .field("looped", &state.looped)
            .field("playing", &state.subscription.is_some())
            .field("elapsed", &state.elapsed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scheduler;
    use easel_core::{PropertyBag, Vec2};
    use easel_platform::ManualTimeSource;
    use std::cell::Cell;

    const EPSILON: f32 = 1e-4;

    fn setup() -> (Rc<ManualTimeSource>, Scheduler) {
        let source = Rc::new(ManualTimeSource::new());
        let scheduler = Scheduler::new(source.clone());
        (source, scheduler)
    }

    fn bag(x: f32) -> Rc<RefCell<PropertyBag>> {
        Rc::new(RefCell::new(PropertyBag::new().with("x", x)))
    }

    fn x(target: &Rc<RefCell<PropertyBag>>) -> f32 {
        target.borrow().scalar("x").unwrap()
    }

    #[test]
    fn test_linear_midpoint_and_end() {
        let (_source, scheduler) = setup();
        let target = bag(0.0);
        let anim = Animate::new(
            &scheduler.handle(),
            AnimateConfig::new(&target).to("x", 10.0).duration(1.0),
        );

        anim.play();
        assert!(!anim.update(0.5));
        assert!((x(&target) - 5.0).abs() < EPSILON);

        assert!(anim.update(0.6));
        anim.complete();
        assert_eq!(x(&target), 10.0);
        assert!(!anim.is_playing());
    }

    #[test]
    fn test_driven_by_scheduler() {
        let (source, scheduler) = setup();
        let target = bag(0.0);
        let completions = Rc::new(Cell::new(0));

        let c = completions.clone();
        let anim = Animate::new(
            &scheduler.handle(),
            AnimateConfig::new(&target)
                .to("x", 10.0)
                .duration(1.0)
                .on_complete(move |_| c.set(c.get() + 1)),
        );
        anim.play();
        assert_eq!(scheduler.subscription_count(), 1);

        // First tick is one nominal frame
        source.advance(0.0);
        for _ in 0..4 {
            source.advance(125.0);
        }
        let expected = (1.0 / 60.0 + 0.5) * 10.0;
        assert!((x(&target) - expected).abs() < 1e-3);

        for _ in 0..5 {
            source.advance(125.0);
        }
        assert_eq!(x(&target), 10.0);
        assert!(!anim.is_playing());
        assert_eq!(completions.get(), 1);
        assert_eq!(scheduler.subscription_count(), 0);
        assert!(!scheduler.is_loop_enabled());
    }

    #[test]
    fn test_zero_duration_completes_on_first_update() {
        let (_source, scheduler) = setup();
        let target = bag(2.0);
        let anim = Animate::new(
            &scheduler.handle(),
            AnimateConfig::new(&target).to("x", 4.0).duration(0.0),
        );

        anim.play();
        assert!(anim.update(0.0));
        assert_eq!(anim.progress(), 1.0);
        assert_eq!(x(&target), 4.0);
    }

    #[test]
    fn test_negative_and_nan_duration_clamp_to_zero() {
        let (_source, scheduler) = setup();
        let handle = scheduler.handle();
        let negative = Animate::new(&handle, AnimateConfig::detached().duration(-3.0));
        let nan = Animate::new(&handle, AnimateConfig::detached().duration(f32::NAN));

        assert_eq!(negative.duration(), 0.0);
        assert_eq!(nan.duration(), 0.0);
        nan.play();
        assert!(nan.update(0.016));
    }

    #[test]
    fn test_loop_restarts_from_origin() {
        let (source, scheduler) = setup();
        let target = bag(0.0);
        let completions = Rc::new(Cell::new(0));

        let c = completions.clone();
        let anim = Animate::new(
            &scheduler.handle(),
            AnimateConfig::new(&target)
                .to("x", 10.0)
                .duration(1.0)
                .looped(true)
                .on_complete(move |_| c.set(c.get() + 1)),
        );
        anim.play();

        source.advance(0.0);
        source.advance(1000.0);
        assert_eq!(completions.get(), 1);
        assert_eq!(x(&target), 10.0);
        assert!(anim.is_playing());
        assert_eq!(anim.elapsed(), 0.0);

        source.advance(250.0);
        assert!((x(&target) - 2.5).abs() < EPSILON);
        assert!(anim.is_playing());
    }

    #[test]
    fn test_completion_callback_can_disable_looping() {
        let (_source, scheduler) = setup();
        let target = bag(0.0);
        let anim = Animate::new(
            &scheduler.handle(),
            AnimateConfig::new(&target)
                .to("x", 1.0)
                .duration(1.0)
                .looped(true)
                .on_complete(|anim: &Animate| anim.set_looped(false)),
        );

        anim.play();
        anim.update(1.0);
        anim.complete();
        assert!(!anim.is_playing());
        assert!(!anim.is_looped());
    }

    #[test]
    fn test_completion_callback_replay_is_honored() {
        let (_source, scheduler) = setup();
        let target = bag(0.0);
        let anim = Animate::new(
            &scheduler.handle(),
            AnimateConfig::new(&target)
                .to("x", 1.0)
                .duration(1.0)
                .on_complete(|anim: &Animate| anim.play()),
        );

        anim.play();
        anim.update(1.0);
        anim.complete();
        assert!(anim.is_playing());
        assert_eq!(scheduler.subscription_count(), 1);
    }

    #[test]
    fn test_from_only_seeds_missing_properties() {
        let (_source, scheduler) = setup();
        let target = Rc::new(RefCell::new(PropertyBag::new().with("x", 50.0)));
        let anim = Animate::new(
            &scheduler.handle(),
            AnimateConfig::new(&target)
                .from("x", 0.0)
                .from("alpha", 0.0)
                .to("x", 10.0)
                .to("alpha", 1.0)
                .duration(1.0),
        );

        anim.play();
        // x already exists, so it keeps its value and animates from there
        assert_eq!(x(&target), 50.0);
        assert_eq!(target.borrow().scalar("alpha"), Some(0.0));

        anim.update(0.0001);
        assert!((x(&target) - 50.0).abs() < 0.01);

        anim.update(0.4999);
        assert!((x(&target) - 30.0).abs() < EPSILON);
        assert!((target.borrow().scalar("alpha").unwrap() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_vec2_and_mismatched_properties() {
        let (_source, scheduler) = setup();
        let target = Rc::new(RefCell::new(
            PropertyBag::new()
                .with("position", Vec2::new(0.0, 100.0))
                .with("x", 0.0),
        ));
        let anim = Animate::new(
            &scheduler.handle(),
            AnimateConfig::new(&target)
                .to("position", Vec2::new(100.0, 0.0))
                .to("x", Vec2::ONE)
                .to("missing", 3.0)
                .duration(2.0),
        );

        anim.play();
        anim.update(1.0);

        let target = target.borrow();
        assert_eq!(
            target.get("position"),
            Some(PropertyValue::Vec2(Vec2::new(50.0, 50.0)))
        );
        assert_eq!(target.scalar("x"), Some(0.0));
        assert_eq!(target.get("missing"), None);
    }

    #[test]
    fn test_dropped_target_still_completes() {
        let (_source, scheduler) = setup();
        let target = bag(0.0);
        let anim = Animate::shape(
            &scheduler.handle(),
            AnimateConfig::new(&target).to("x", 1.0).duration(0.5),
        );

        anim.play();
        drop(target);
        assert!(!anim.update(0.25));
        assert!(anim.update(0.25));
    }

    #[test]
    fn test_shape_marks_target_for_redraw() {
        let (_source, scheduler) = setup();
        let target = bag(0.0);
        let handle = scheduler.handle();

        let plain = Animate::new(&handle, AnimateConfig::new(&target).to("x", 1.0).duration(1.0));
        plain.play();
        plain.update(0.1);
        assert_eq!(target.borrow().redraw_requests(), 0);
        plain.stop();

        let shape = Animate::shape(&handle, AnimateConfig::new(&target).to("x", 1.0).duration(1.0));
        assert!(shape.is_shape());
        shape.play();
        shape.update(0.1);
        shape.update(0.1);
        assert_eq!(target.borrow().redraw_requests(), 2);
    }

    #[test]
    fn test_update_callback_receives_elapsed() {
        let (_source, scheduler) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        let anim = Animate::new(
            &scheduler.handle(),
            AnimateConfig::detached()
                .duration(1.0)
                .on_update(move |dt| s.borrow_mut().push(dt)),
        );
        anim.play();
        anim.update(0.25);
        anim.update(0.5);

        assert_eq!(*seen.borrow(), vec![0.25, 0.5]);
    }

    #[test]
    fn test_play_and_stop_are_idempotent() {
        let (_source, scheduler) = setup();
        let anim = Animate::new(&scheduler.handle(), AnimateConfig::detached().duration(1.0));

        anim.play();
        anim.play();
        assert_eq!(scheduler.subscription_count(), 1);

        anim.stop();
        anim.stop();
        assert!(!anim.is_playing());
        assert_eq!(scheduler.subscription_count(), 0);

        // Completing an idle animation does nothing
        anim.complete();
        assert!(!anim.is_playing());
    }

    #[test]
    fn test_dropping_last_handle_unsubscribes() {
        let (source, scheduler) = setup();
        let anim = Animate::new(&scheduler.handle(), AnimateConfig::detached().duration(1.0));
        anim.play();
        assert_eq!(scheduler.subscription_count(), 1);

        drop(anim);
        assert_eq!(scheduler.subscription_count(), 0);
        source.advance(16.0);
        assert!(!scheduler.is_loop_enabled());
    }

    #[test]
    fn test_no_scheduler_means_no_playback() {
        let handle = {
            let (_source, scheduler) = setup();
            scheduler.handle()
        };
        let anim = Animate::new(&handle, AnimateConfig::detached().duration(1.0));
        anim.play();
        assert!(!anim.is_playing());
    }

    #[test]
    fn test_listener_runs_after_completion() {
        struct Recorder {
            playing_when_notified: Cell<Option<bool>>,
        }

        impl CompletionListener for Recorder {
            fn animation_completed(&self, animation: &Animate) {
                self.playing_when_notified.set(Some(animation.is_playing()));
            }
        }

        let (_source, scheduler) = setup();
        let anim = Animate::new(&scheduler.handle(), AnimateConfig::detached().duration(1.0));
        let recorder = Rc::new(Recorder {
            playing_when_notified: Cell::new(None),
        });
        let listener: Rc<dyn CompletionListener> = recorder.clone();

        assert!(anim.add_completion_listener(&listener));
        assert!(!anim.add_completion_listener(&listener));

        anim.play();
        anim.update(1.0);
        anim.complete();
        assert_eq!(recorder.playing_when_notified.get(), Some(false));
    }
}
