//! Per-node animation support
//!
//! A node that wants `animate(...)` embeds an [`AnimationFacet`] and
//! implements [`Animated`]. Each `animate` call appends a shape animation to
//! the node's queue, so successive calls play in sequence. The queue exists
//! only while there is something to play.

use std::cell::RefCell;
use std::rc::Rc;

use crate::animate::{Animate, AnimateConfig};
use crate::queue::AnimateQueue;
use crate::scheduler::SchedulerHandle;

/// The animation queue slot of one node
pub struct AnimationFacet {
    scheduler: SchedulerHandle,
    queue: Rc<RefCell<Option<AnimateQueue>>>,
}

impl AnimationFacet {
    pub fn new(scheduler: SchedulerHandle) -> Self {
        Self {
            scheduler,
            queue: Rc::new(RefCell::new(None)),
        }
    }

    /// Append a shape animation and make sure the queue is playing
    pub fn animate(&self, config: AnimateConfig) -> Animate {
        let queue = {
            let mut slot = self.queue.borrow_mut();
            match slot.as_ref() {
                Some(queue) => queue.clone(),
                None => {
                    let queue = self.new_queue();
                    *slot = Some(queue.clone());
                    queue
                }
            }
        };

        let animation = queue.add_shape_animation(config);
        queue.play();
        animation
    }

    fn new_queue(&self) -> AnimateQueue {
        let slot = Rc::downgrade(&self.queue);
        AnimateQueue::new(&self.scheduler).with_on_complete(move |finished| {
            let Some(slot) = slot.upgrade() else {
                return;
            };
            let discarded = {
                let mut slot = slot.borrow_mut();
                match slot.as_ref() {
                    Some(held) if held.ptr_eq(finished) => slot.take(),
                    _ => None,
                }
            };
            if discarded.is_some() {
                tracing::trace!("AnimationFacet: queue finished, discarded");
            }
        })
    }

    /// Stop and discard the queue, if any
    pub fn clear_animations(&self) {
        let queue = self.queue.borrow_mut().take();
        if let Some(queue) = queue {
            queue.stop();
        }
    }

    /// Whether a queue is held
    pub fn is_animating(&self) -> bool {
        self.queue.borrow().is_some()
    }

    /// Number of animations in the held queue
    pub fn queue_len(&self) -> usize {
        self.queue.borrow().as_ref().map_or(0, AnimateQueue::len)
    }

    pub fn queue(&self) -> Option<AnimateQueue> {
        self.queue.borrow().clone()
    }
}

/// Animation methods for nodes that carry an [`AnimationFacet`]
pub trait Animated {
    fn animation_facet(&self) -> &AnimationFacet;

    /// Queue a shape animation behind any already running
    fn animate(&self, config: AnimateConfig) -> &Self
    where
        Self: Sized,
    {
        self.animation_facet().animate(config);
        self
    }

    fn clear_animations(&self) {
        self.animation_facet().clear_animations();
    }

    fn is_animating(&self) -> bool {
        self.animation_facet().is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scheduler;
    use easel_core::{
        AnimationTarget, DirtyFlag, Drawable, PropertyBag, PropertyError, PropertyValue,
    };
    use easel_platform::ManualTimeSource;
    use std::cell::Cell;
    use std::rc::Weak;

    struct DotProps {
        values: PropertyBag,
        node: Weak<Dot>,
        scheduler: SchedulerHandle,
    }

    impl AnimationTarget for DotProps {
        fn property(&self, name: &str) -> Option<PropertyValue> {
            self.values.property(name)
        }

        fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
            self.values.set_property(name, value)
        }

        fn mark_for_redraw(&mut self) {
            if let Some(node) = self.node.upgrade() {
                self.scheduler.enqueue_redraw(&node);
            }
        }
    }

    struct Dot {
        facet: AnimationFacet,
        props: Rc<RefCell<DotProps>>,
        flag: DirtyFlag,
        draws: Cell<u32>,
    }

    impl Dot {
        fn new(scheduler: &Scheduler) -> Rc<Self> {
            Rc::new_cyclic(|me| Dot {
                facet: AnimationFacet::new(scheduler.handle()),
                props: Rc::new(RefCell::new(DotProps {
                    values: PropertyBag::new().with("radius", 1.0),
                    node: me.clone(),
                    scheduler: scheduler.handle(),
                })),
                flag: DirtyFlag::new(),
                draws: Cell::new(0),
            })
        }

        fn radius(&self) -> f32 {
            self.props.borrow().values.scalar("radius").unwrap()
        }

        fn grow(&self, to: f32) -> AnimateConfig {
            AnimateConfig::new(&self.props).to("radius", to).duration(0.1)
        }
    }

    impl Animated for Dot {
        fn animation_facet(&self) -> &AnimationFacet {
            &self.facet
        }
    }

    impl Drawable for Dot {
        fn redraw_flag(&self) -> &DirtyFlag {
            &self.flag
        }

        fn draw(&self) {
            self.draws.set(self.draws.get() + 1);
        }
    }

    fn setup() -> (Rc<ManualTimeSource>, Scheduler) {
        let source = Rc::new(ManualTimeSource::new());
        let scheduler = Scheduler::new(source.clone());
        (source, scheduler)
    }

    #[test]
    fn test_animate_chains_into_one_queue() {
        let (_source, scheduler) = setup();
        let dot = Dot::new(&scheduler);
        assert!(!dot.is_animating());

        dot.animate(dot.grow(5.0)).animate(dot.grow(2.0));

        assert!(dot.is_animating());
        assert_eq!(dot.facet.queue_len(), 2);
        assert_eq!(scheduler.subscription_count(), 1);
    }

    #[test]
    fn test_queue_is_discarded_on_completion() {
        let (source, scheduler) = setup();
        let dot = Dot::new(&scheduler);
        dot.animate(dot.grow(5.0)).animate(dot.grow(2.0));

        source.advance(0.0);
        for _ in 0..20 {
            source.advance(25.0);
        }

        assert!(!dot.is_animating());
        assert_eq!(dot.radius(), 2.0);
        assert!(dot.draws.get() > 0);
        assert!(!scheduler.is_loop_enabled());
    }

    #[test]
    fn test_updates_redraw_the_node_once_per_tick() {
        let (source, scheduler) = setup();
        let dot = Dot::new(&scheduler);
        dot.animate(dot.grow(5.0));

        source.advance(0.0);
        source.advance(25.0);
        source.advance(25.0);
        assert_eq!(dot.draws.get(), 3);
    }

    #[test]
    fn test_clear_animations_stops_playback() {
        let (source, scheduler) = setup();
        let dot = Dot::new(&scheduler);
        dot.animate(dot.grow(5.0));

        source.advance(0.0);
        let radius = dot.radius();
        dot.clear_animations();

        assert!(!dot.is_animating());
        assert_eq!(scheduler.subscription_count(), 0);
        source.advance(25.0);
        assert_eq!(dot.radius(), radius);

        // Clearing twice is fine
        dot.clear_animations();
    }

    #[test]
    fn test_animate_after_completion_starts_fresh_queue() {
        let (source, scheduler) = setup();
        let dot = Dot::new(&scheduler);
        dot.animate(dot.grow(5.0));
        let first = dot.facet.queue().unwrap();

        source.advance(0.0);
        for _ in 0..10 {
            source.advance(25.0);
        }
        assert!(!dot.is_animating());

        dot.animate(dot.grow(1.0));
        let second = dot.facet.queue().unwrap();
        assert!(!first.ptr_eq(&second));
        assert_eq!(dot.facet.queue_len(), 1);
    }

    #[test]
    fn test_stale_queue_completion_keeps_new_queue() {
        let (_source, scheduler) = setup();
        let dot = Dot::new(&scheduler);
        dot.animate(dot.grow(5.0));
        let old = dot.facet.queue().unwrap();

        dot.clear_animations();
        dot.animate(dot.grow(3.0));

        old.play();
        old.complete();
        assert!(dot.is_animating());
        assert!(!dot.facet.queue().unwrap().ptr_eq(&old));
    }
}
