//! Frame scheduler
//!
//! One scheduler exists per application. It owns:
//! - the priority-ordered list of tick subscriptions
//! - the redraw queue of invalidated nodes
//! - the on/off lifecycle of the frame loop
//!
//! It is the only component that talks to the [`TimeSource`]. The loop runs
//! while there is a subscription or a pending redraw and deschedules itself
//! as soon as there is neither; there is no idle polling.
//!
//! Everything runs on one thread. No borrow of the scheduler state is held
//! while subscription callbacks or `draw` run, so they may freely add and
//! remove subscriptions or request redraws from inside a tick.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use easel_core::Drawable;
use easel_platform::{FrameCallback, TimeSource};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::config::SchedulerConfig;
use crate::ticked::{SubscriptionId, TickCallback, TickedSubscription};

/// Slack allowed when deciding whether a full interval has passed, so timers
/// due at `last + interval` are not throttled by float rounding
const THROTTLE_TOLERANCE_MS: f64 = 1e-6;

// ============================================================================
// Frame bookkeeping
// ============================================================================

/// Timing of the most recent tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInfo {
    /// Accumulated ticked time in milliseconds
    pub time_ms: f64,
    /// Time between the last two ticks in milliseconds
    pub delta_ms: f64,
    /// Wall-clock time of the last tick
    pub last_ms: f64,
    /// Number of ticks run since the scheduler was created
    pub frame_count: u64,
}

impl FrameInfo {
    fn advance(&mut self, now_ms: f64, delta_ms: f64) {
        self.time_ms += delta_ms;
        self.delta_ms = delta_ms;
        self.last_ms = now_ms;
        self.frame_count += 1;
    }
}

// ============================================================================
// Scheduler state
// ============================================================================

struct TickEntry {
    callback: TickCallback,
}

struct SchedulerInner {
    entries: SlotMap<SubscriptionId, TickEntry>,
    /// Sorted ascending by priority, insertion order among equals
    order: Vec<(i32, SubscriptionId)>,
    redraw_queue: VecDeque<Weak<dyn Drawable>>,
    /// The loop should keep scheduling itself
    loop_enabled: bool,
    /// A tick is executing right now
    loop_active: bool,
    /// A TimeSource callback is outstanding
    frame_requested: bool,
    frame_interval_ms: f64,
    last_tick_ms: Option<f64>,
    frame: FrameInfo,
    time_source: Rc<dyn TimeSource>,
    timer_fallback: bool,
}

impl SchedulerInner {
    fn has_work(&self) -> bool {
        !self.order.is_empty() || !self.redraw_queue.is_empty()
    }
}

/// The frame scheduler
///
/// Cloning yields another strong reference to the same scheduler. Components
/// that should not keep it alive hold a [`SchedulerHandle`] instead.
///
/// ```
/// use easel_animation::{Scheduler, TickCallback};
/// use easel_platform::ManualTimeSource;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let source = Rc::new(ManualTimeSource::new());
/// let scheduler = Scheduler::new(source.clone());
///
/// let total = Rc::new(Cell::new(0.0f32));
/// let t = total.clone();
/// let callback: TickCallback = Rc::new(move |dt: f32| t.set(t.get() + dt));
/// let sub = scheduler.add_ticked(callback, 0);
///
/// source.advance(16.0);
/// assert!(total.get() > 0.0);
///
/// sub.remove();
/// assert!(!scheduler.is_loop_enabled());
/// ```
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Scheduler {
    /// Create a scheduler with [`SchedulerConfig::standard`]
    pub fn new(time_source: Rc<dyn TimeSource>) -> Self {
        Self::with_config(time_source, &SchedulerConfig::standard())
    }

    /// Create a scheduler from a configuration
    ///
    /// An invalid frame rate falls back to the standard one.
    pub fn with_config(time_source: Rc<dyn TimeSource>, config: &SchedulerConfig) -> Self {
        let frame_interval_ms = match config.validate() {
            Ok(()) => config.frame_interval_ms(),
            Err(err) => {
                tracing::warn!("Scheduler: {err}, using the standard frame rate");
                SchedulerConfig::standard().frame_interval_ms()
            }
        };
        let timer_fallback = !(config.prefer_refresh && time_source.supports_refresh());

        tracing::debug!(
            frame_interval_ms,
            timer_fallback,
            "Scheduler: created"
        );

        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                entries: SlotMap::with_key(),
                order: Vec::new(),
                redraw_queue: VecDeque::new(),
                loop_enabled: false,
                loop_active: false,
                frame_requested: false,
                frame_interval_ms,
                last_tick_ms: None,
                frame: FrameInfo::default(),
                time_source,
                timer_fallback,
            })),
        }
    }

    /// Get a weak handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a periodic callback
    ///
    /// Lower priorities run first; equal priorities run in the order they
    /// were added. A subscription added during a tick first runs on the next
    /// tick.
    pub fn add_ticked(&self, callback: TickCallback, priority: i32) -> TickedSubscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.entries.insert(TickEntry {
                callback: callback.clone(),
            });
            let at = inner.order.partition_point(|(p, _)| *p <= priority);
            inner.order.insert(at, (priority, id));
            id
        };

        self.update_loop_state();

        TickedSubscription {
            id,
            priority,
            callback,
            scheduler: self.handle(),
        }
    }

    /// Remove the first subscription registered with exactly this callback
    /// and priority
    ///
    /// Returns `false` if there was none.
    pub fn remove_ticked(&self, callback: &TickCallback, priority: i32) -> bool {
        let removed = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let position = inner.order.iter().position(|(p, id)| {
                *p == priority
                    && inner
                        .entries
                        .get(*id)
                        .map(|entry| Rc::ptr_eq(&entry.callback, callback))
                        .unwrap_or(false)
            });
            match position {
                Some(position) => {
                    let (_, id) = inner.order.remove(position);
                    inner.entries.remove(id);
                    true
                }
                None => false,
            }
        };

        if removed {
            self.update_loop_state();
        }
        removed
    }

    /// Remove a subscription by its handle
    ///
    /// Returns `false` if it was already removed.
    pub fn remove_subscription(&self, subscription: &TickedSubscription) -> bool {
        self.remove_id(subscription.id)
    }

    fn remove_id(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            if inner.entries.remove(id).is_some() {
                inner.order.retain(|(_, entry)| *entry != id);
                true
            } else {
                false
            }
        };

        if removed {
            self.update_loop_state();
        }
        removed
    }

    pub(crate) fn contains(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().entries.contains_key(id)
    }

    // =========================================================================
    // Redraw queue
    // =========================================================================

    /// Queue a node for redraw on the next tick
    ///
    /// Returns `false` if the node was already queued. Stage nodes go to the
    /// front of the queue, everything else to the back.
    pub fn enqueue_redraw<D: Drawable + 'static>(&self, node: &Rc<D>) -> bool {
        let weak: Weak<dyn Drawable> = Rc::downgrade(node) as Weak<dyn Drawable>;
        self.push_redraw(node.as_ref(), weak)
    }

    /// [`enqueue_redraw`](Scheduler::enqueue_redraw) for type-erased nodes
    pub fn enqueue_redraw_dyn(&self, node: &Rc<dyn Drawable>) -> bool {
        self.push_redraw(node.as_ref(), Rc::downgrade(node))
    }

    fn push_redraw(&self, node: &dyn Drawable, weak: Weak<dyn Drawable>) -> bool {
        if !node.redraw_flag().mark() {
            return false;
        }

        {
            let mut inner = self.inner.borrow_mut();
            if node.is_stage() {
                inner.redraw_queue.push_front(weak);
            } else {
                inner.redraw_queue.push_back(weak);
            }
        }

        self.update_loop_state();
        true
    }

    // =========================================================================
    // Frame rate
    // =========================================================================

    /// Set the target ticks per second
    ///
    /// Takes effect at the next scheduling decision. Non-positive or
    /// non-finite rates are ignored.
    pub fn set_frame_rate(&self, hz: f64) {
        if !hz.is_finite() || hz <= 0.0 {
            tracing::warn!(hz, "Scheduler: ignoring invalid frame rate");
            return;
        }
        self.set_frame_interval_ms(1000.0 / hz);
    }

    /// Set the target spacing between ticks in milliseconds
    pub fn set_frame_interval_ms(&self, ms: f64) {
        if !ms.is_finite() || ms <= 0.0 {
            tracing::warn!(ms, "Scheduler: ignoring invalid frame interval");
            return;
        }
        self.inner.borrow_mut().frame_interval_ms = ms;
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.inner.borrow().frame_interval_ms
    }

    // =========================================================================
    // Loop lifecycle
    // =========================================================================

    /// Start or stop the loop to match the pending work
    ///
    /// Deferred while a tick is executing; the end of the tick makes the
    /// decision instead.
    fn update_loop_state(&self) {
        let request = {
            let mut inner = self.inner.borrow_mut();
            if inner.loop_active {
                return;
            }

            let wanted = inner.has_work();
            if wanted && !inner.loop_enabled {
                inner.loop_enabled = true;
                tracing::debug!(
                    subscriptions = inner.order.len(),
                    redraws = inner.redraw_queue.len(),
                    "Scheduler: frame loop started"
                );
                !inner.frame_requested
            } else if !wanted && inner.loop_enabled {
                inner.loop_enabled = false;
                inner.last_tick_ms = None;
                tracing::debug!("Scheduler: frame loop stopped");
                false
            } else {
                false
            }
        };

        if request {
            self.request_frame();
        }
    }

    fn request_frame(&self) {
        self.schedule_frame(None);
    }

    /// Ask the time source for the next tick
    ///
    /// `timer_delay_ms` overrides the timer delay, used when a throttled tick
    /// only has to wait for the rest of the interval.
    fn schedule_frame(&self, timer_delay_ms: Option<f64>) {
        let (source, timer_fallback, interval) = {
            let mut inner = self.inner.borrow_mut();
            inner.frame_requested = true;
            (
                inner.time_source.clone(),
                inner.timer_fallback,
                inner.frame_interval_ms,
            )
        };

        let handle = self.handle();
        let callback: FrameCallback = Box::new(move |now_ms| {
            if let Some(scheduler) = handle.upgrade() {
                scheduler.on_frame(now_ms);
            }
        });

        if timer_fallback {
            source.set_timeout(timer_delay_ms.unwrap_or(interval), callback);
        } else {
            source.request_refresh(callback);
        }
    }

    /// Run one tick
    ///
    /// Called by the [`TimeSource`] callback the scheduler requested. Calls
    /// that arrive while the loop is disabled are ignored.
    pub fn on_frame(&self, now_ms: f64) {
        let elapsed_secs = {
            let mut inner = self.inner.borrow_mut();
            if inner.loop_active {
                return;
            }
            inner.frame_requested = false;

            if !inner.loop_enabled {
                tracing::trace!(now_ms, "Scheduler: ignoring stale frame callback");
                return;
            }

            let last = inner
                .last_tick_ms
                .unwrap_or(now_ms - inner.frame_interval_ms);

            let since_last = now_ms - last;
            if inner.timer_fallback
                && since_last + THROTTLE_TOLERANCE_MS < inner.frame_interval_ms
            {
                let remaining = inner.frame_interval_ms - since_last;
                inner.last_tick_ms = Some(last);
                drop(inner);
                self.schedule_frame(Some(remaining));
                return;
            }

            let delta_ms = (now_ms - last).max(0.0);
            inner.last_tick_ms = Some(now_ms);
            inner.frame.advance(now_ms, delta_ms);
            inner.loop_active = true;

            tracing::trace!(
                now_ms,
                delta_ms,
                frame = inner.frame.frame_count,
                "Scheduler: tick"
            );
            (delta_ms / 1000.0) as f32
        };

        let snapshot: SmallVec<[TickCallback; 8]> = {
            let inner = self.inner.borrow();
            inner
                .order
                .iter()
                .filter_map(|(_, id)| inner.entries.get(*id).map(|e| e.callback.clone()))
                .collect()
        };
        for callback in &snapshot {
            callback(elapsed_secs);
        }

        let drained = std::mem::take(&mut self.inner.borrow_mut().redraw_queue);
        for node in drained {
            let Some(node) = node.upgrade() else {
                continue;
            };
            node.redraw_flag().clear();
            if node.is_attached() {
                node.draw();
            }
        }

        let request = {
            let mut inner = self.inner.borrow_mut();
            inner.loop_active = false;

            if inner.has_work() {
                !inner.frame_requested
            } else {
                inner.loop_enabled = false;
                inner.last_tick_ms = None;
                tracing::debug!(
                    frame = inner.frame.frame_count,
                    "Scheduler: frame loop stopped"
                );
                false
            }
        };

        if request {
            self.request_frame();
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn subscription_count(&self) -> usize {
        self.inner.borrow().order.len()
    }

    /// Priorities in the order the next tick will run them
    pub fn subscription_priorities(&self) -> Vec<i32> {
        self.inner.borrow().order.iter().map(|(p, _)| *p).collect()
    }

    pub fn pending_redraws(&self) -> usize {
        self.inner.borrow().redraw_queue.len()
    }

    /// Whether the loop is scheduling itself
    pub fn is_loop_enabled(&self) -> bool {
        self.inner.borrow().loop_enabled
    }

    /// Whether a tick is executing right now
    pub fn is_loop_active(&self) -> bool {
        self.inner.borrow().loop_active
    }

    /// Whether ticks are driven by the fixed-delay timer instead of a
    /// refresh callback
    pub fn uses_timer_fallback(&self) -> bool {
        self.inner.borrow().timer_fallback
    }

    pub fn frame_info(&self) -> FrameInfo {
        self.inner.borrow().frame
    }
}

// ============================================================================
// Weak handle
// ============================================================================

/// A weak handle to the scheduler
///
/// This is passed to components that need to schedule work. It won't keep
/// the scheduler alive; every operation is a silent no-op once it is gone.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// A handle that is not attached to any scheduler
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn upgrade(&self) -> Option<Scheduler> {
        self.inner.upgrade().map(|inner| Scheduler { inner })
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Register a periodic callback, `None` if the scheduler is gone
    pub fn add_ticked(&self, callback: TickCallback, priority: i32) -> Option<TickedSubscription> {
        self.upgrade().map(|s| s.add_ticked(callback, priority))
    }

    pub fn remove_ticked(&self, callback: &TickCallback, priority: i32) -> bool {
        self.upgrade()
            .map(|s| s.remove_ticked(callback, priority))
            .unwrap_or(false)
    }

    pub fn remove_subscription(&self, subscription: &TickedSubscription) -> bool {
        self.upgrade()
            .map(|s| s.remove_subscription(subscription))
            .unwrap_or(false)
    }

    pub fn enqueue_redraw<D: Drawable + 'static>(&self, node: &Rc<D>) -> bool {
        self.upgrade()
            .map(|s| s.enqueue_redraw(node))
            .unwrap_or(false)
    }

    pub fn enqueue_redraw_dyn(&self, node: &Rc<dyn Drawable>) -> bool {
        self.upgrade()
            .map(|s| s.enqueue_redraw_dyn(node))
            .unwrap_or(false)
    }
}

impl Default for SchedulerHandle {
    fn default() -> Self {
        Self::detached()
    }
}
