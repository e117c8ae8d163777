//! Tick subscriptions
//!
//! A subscription is a periodic callback registered with the
//! [`Scheduler`](crate::Scheduler). It receives the elapsed seconds since the
//! previous tick. Whatever the closure captures is its invocation context.

use std::fmt;
use std::rc::Rc;

use slotmap::new_key_type;

use crate::scheduler::SchedulerHandle;

new_key_type! {
    /// Handle to a registered tick subscription
    pub struct SubscriptionId;
}

/// Periodic callback, called with the elapsed seconds since the previous tick
pub type TickCallback = Rc<dyn Fn(f32)>;

/// A cancellable registration of a [`TickCallback`]
///
/// Dropping the handle does not unsubscribe; call
/// [`remove`](TickedSubscription::remove). Removing twice, or after the
/// scheduler is gone, is a no-op.
#[derive(Clone)]
pub struct TickedSubscription {
    pub(crate) id: SubscriptionId,
    pub(crate) priority: i32,
    pub(crate) callback: TickCallback,
    pub(crate) scheduler: SchedulerHandle,
}

impl TickedSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn callback(&self) -> &TickCallback {
        &self.callback
    }

    /// Unsubscribe, returning `true` if this call removed the entry
    pub fn remove(&self) -> bool {
        self.scheduler.remove_subscription(self)
    }

    /// Invoke the callback directly, outside of the scheduler loop
    pub fn tick(&self, elapsed_secs: f32) {
        (self.callback)(elapsed_secs);
    }

    /// Whether the subscription is still in its scheduler's list
    pub fn is_registered(&self) -> bool {
        self.scheduler
            .upgrade()
            .map(|s| s.contains(self.id))
            .unwrap_or(false)
    }
}

impl fmt::Debug for TickedSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickedSubscription")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
