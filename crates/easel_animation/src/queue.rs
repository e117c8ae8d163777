//! Sequential animation queue
//!
//! An [`AnimateQueue`] plays its entries one after another. It observes each
//! entry as a [`CompletionListener`], so an entry's own completion logic
//! (callback, loop restart) always runs before the queue decides whether to
//! advance. An entry that loops holds the queue at that entry for as long as
//! it keeps looping.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::animate::{Animate, AnimateConfig, CompletionListener};
use crate::scheduler::SchedulerHandle;

/// Called when the last entry of a queue completes
pub type QueueCompleteFn = Box<dyn FnMut(&AnimateQueue)>;

#[derive(Default)]
struct QueueState {
    entries: Vec<Animate>,
    /// `None` while idle
    play_index: Option<usize>,
    looped: bool,
    generation: u64,
}

struct QueueShared {
    scheduler: SchedulerHandle,
    self_ref: Weak<QueueShared>,
    state: RefCell<QueueState>,
    on_complete: RefCell<Option<QueueCompleteFn>>,
}

impl CompletionListener for QueueShared {
    fn animation_completed(&self, animation: &Animate) {
        if let Some(shared) = self.self_ref.upgrade() {
            AnimateQueue { shared }.entry_completed(animation);
        }
    }
}

/// A sequence of animations played in order
#[derive(Clone)]
pub struct AnimateQueue {
    shared: Rc<QueueShared>,
}

impl AnimateQueue {
    pub fn new(scheduler: &SchedulerHandle) -> Self {
        Self {
            shared: Rc::new_cyclic(|self_ref| QueueShared {
                scheduler: scheduler.clone(),
                self_ref: self_ref.clone(),
                state: RefCell::new(QueueState::default()),
                on_complete: RefCell::new(None),
            }),
        }
    }

    /// Set the callback run when the queue completes
    pub fn with_on_complete(self, callback: impl FnMut(&AnimateQueue) + 'static) -> Self {
        *self.shared.on_complete.borrow_mut() = Some(Box::new(callback));
        self
    }

    /// Append a property animation
    pub fn add_animation(&self, config: AnimateConfig) -> Animate {
        let animation = Animate::new(&self.shared.scheduler, config);
        self.push(animation.clone());
        animation
    }

    /// Append a shape animation, which marks its target for redraw
    pub fn add_shape_animation(&self, config: AnimateConfig) -> Animate {
        let animation = Animate::shape(&self.shared.scheduler, config);
        self.push(animation.clone());
        animation
    }

    /// Append an existing animation
    pub fn push(&self, animation: Animate) {
        let listener: Rc<dyn CompletionListener> = self.shared.clone();
        animation.add_completion_listener(&listener);
        self.shared.state.borrow_mut().entries.push(animation);
    }

    /// Start from the first entry; no-op while playing
    ///
    /// An empty queue completes at once and stays idle.
    pub fn play(&self) {
        let first = {
            let mut state = self.shared.state.borrow_mut();
            if state.play_index.is_some() {
                return;
            }
            match state.entries.first().cloned() {
                Some(first) => {
                    state.play_index = Some(0);
                    state.generation += 1;
                    Some(first)
                }
                None => None,
            }
        };

        match first {
            Some(first) => {
                tracing::trace!(entries = self.len(), "AnimateQueue: playing");
                first.play();
            }
            None => self.run_on_complete(),
        }
    }

    /// Stop the current entry and go idle; no-op while idle
    pub fn stop(&self) {
        let current = {
            let mut state = self.shared.state.borrow_mut();
            let current = state
                .play_index
                .and_then(|index| state.entries.get(index).cloned());
            state.play_index = None;
            current
        };
        if let Some(current) = current {
            current.stop();
        }
    }

    fn entry_completed(&self, animation: &Animate) {
        let next = {
            let state = self.shared.state.borrow();
            let Some(index) = state.play_index else {
                return;
            };
            match state.entries.get(index) {
                Some(current) if current.ptr_eq(animation) => {}
                _ => return,
            }
            if animation.is_looped() {
                return;
            }
            if index + 1 < state.entries.len() {
                Some(index + 1)
            } else {
                None
            }
        };

        match next {
            Some(index) => {
                let entry = {
                    let mut state = self.shared.state.borrow_mut();
                    state.play_index = Some(index);
                    state.entries[index].clone()
                };
                tracing::trace!(index, "AnimateQueue: advancing");
                entry.play();
            }
            None => self.complete(),
        }
    }

    /// Finish the queue
    ///
    /// A non-looping queue stops, then runs its completion callback. A looping
    /// one runs the callback and restarts at the first entry unless the
    /// callback changed playback. No-op while idle.
    pub fn complete(&self) {
        let (looped, generation) = {
            let state = self.shared.state.borrow();
            if state.play_index.is_none() {
                return;
            }
            (state.looped, state.generation)
        };

        if !looped {
            self.stop();
        }

        self.run_on_complete();

        if looped {
            let untouched = {
                let state = self.shared.state.borrow();
                state.play_index.is_some() && state.generation == generation
            };
            if untouched {
                self.stop();
                if self.is_looped() {
                    self.play();
                }
            }
        }
    }

    fn run_on_complete(&self) {
        let callback = self.shared.on_complete.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(self);
            let mut slot = self.shared.on_complete.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.shared.state.borrow().play_index.is_some()
    }

    /// Index of the entry playing now
    pub fn play_index(&self) -> Option<usize> {
        self.shared.state.borrow().play_index
    }

    /// The entry playing now
    pub fn current(&self) -> Option<Animate> {
        let state = self.shared.state.borrow();
        state
            .play_index
            .and_then(|index| state.entries.get(index).cloned())
    }

    pub fn set_looped(&self, looped: bool) {
        self.shared.state.borrow_mut().looped = looped;
    }

    pub fn is_looped(&self) -> bool {
        self.shared.state.borrow().looped
    }

    pub fn len(&self) -> usize {
        self.shared.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.borrow().entries.is_empty()
    }

    /// Whether both handles refer to the same queue
    pub fn ptr_eq(&self, other: &AnimateQueue) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl fmt::Debug for AnimateQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("AnimateQueue")
            .field("entries", &state.entries.len())
            .field("play_index", &state.play_index)
            .field("looped", &state.looped)
            .finish()
    }
}
