//! Demo scene node
//!
//! A sprite with a position and a scale. Animating it marks it dirty, and
//! the scheduler redraws it once per tick by logging its state.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use easel_animation::{AnimateConfig, AnimationFacet, Animated, SchedulerHandle};
use easel_core::{
    AnimationTarget, DirtyFlag, Drawable, PropertyBag, PropertyError, PropertyValue, Vec2,
};

pub struct SpriteProps {
    values: PropertyBag,
    node: Weak<Sprite>,
    scheduler: SchedulerHandle,
}

impl AnimationTarget for SpriteProps {
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

pub struct Sprite {
    name: String,
    props: Rc<RefCell<SpriteProps>>,
    facet: AnimationFacet,
    flag: DirtyFlag,
    draws: Cell<u64>,
}

impl Sprite {
    pub fn new(name: impl Into<String>, scheduler: SchedulerHandle) -> Rc<Self> {
        let name = name.into();
        Rc::new_cyclic(|me| Sprite {
            name,
            props: Rc::new(RefCell::new(SpriteProps {
                values: PropertyBag::new()
                    .with("x", 0.0)
                    .with("scale", Vec2::ONE),
                node: me.clone(),
                scheduler: scheduler.clone(),
            })),
            facet: AnimationFacet::new(scheduler),
            flag: DirtyFlag::new(),
            draws: Cell::new(0),
        })
    }

    /// Start building an animation of this sprite's properties
    pub fn tween(&self) -> AnimateConfig {
        AnimateConfig::new(&self.props)
    }

    pub fn x(&self) -> f32 {
        self.props.borrow().values.scalar("x").unwrap_or_default()
    }

    pub fn scale(&self) -> Vec2 {
        self.props
            .borrow()
            .values
            .get("scale")
            .and_then(|v| v.as_vec2())
            .unwrap_or(Vec2::ONE)
    }

    pub fn draws(&self) -> u64 {
        self.draws.get()
    }
}

impl Animated for Sprite {
    fn animation_facet(&self) -> &AnimationFacet {
        &self.facet
    }
}

impl Drawable for Sprite {
    fn redraw_flag(&self) -> &DirtyFlag {
        &self.flag
    }

    fn draw(&self) {
        self.draws.set(self.draws.get() + 1);
        let scale = self.scale();
        tracing::trace!(
            sprite = %self.name,
            x = self.x(),
            scale_x = scale.x,
            scale_y = scale.y,
            "draw"
        );
    }
}
