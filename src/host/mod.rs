//! Interfaces between the dispatcher and the animation system it drives.
//!
//! The host owns animatable objects, batches changes into transactions and,
//! whenever an animatable property changes, asks its installed
//! [`AnimationResolver`] which animation (if any) should carry the change.
//! [`DispatchContext`](crate::DispatchContext) installs its interceptor as
//! that resolver the first time a batch runs.
//!
//! [`headless`] contains an in-process host used by the tests and demos.

pub mod headless;

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::action_table::ActionTable;
use crate::animation::AnimationHandle;

/// Identity of an animatable object.
///
/// Configuration is attached to identity, never to value: two objects with
/// equal property values are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate a new process-unique ID.
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        ObjectId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value (for debugging/logging).
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// An object whose property changes are routed through the resolver.
pub trait AnimatableObject {
    fn object_id(&self) -> ObjectId;

    /// Per-action animation overrides, or `None` if the object was never configured
    fn action_table(&self) -> Option<&ActionTable>;
}

/// What a resolver decided for one property change
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedAction {
    /// Carry the change with this animation
    Animate(AnimationHandle),
    /// Apply the change without any animation
    Suppress,
}

/// Strategy consulted by the host for every animatable property change.
///
/// Returning `None` means "no opinion": the host falls back to its own
/// default implicit animation.
pub trait AnimationResolver {
    fn action_for(&self, object: &dyn AnimatableObject, key: &str) -> Option<ResolvedAction>;
}

/// One-shot callback fired when every animation in a transaction has finished
pub type Completion = Box<dyn FnOnce()>;

/// Transaction and resolver surface the dispatcher needs from a host.
///
/// All methods take `&self`: hosts are shared between the dispatcher and the
/// objects being mutated inside a batch, so they use interior mutability.
pub trait AnimationHost {
    /// Open a (possibly nested) transaction
    fn begin_transaction(&self);

    /// Set the completion callback of the innermost open transaction
    fn set_completion(&self, completion: Completion);

    /// Close the innermost open transaction, starting its animations
    fn commit_transaction(&self);

    /// Currently installed resolver
    fn resolver(&self) -> Option<Rc<dyn AnimationResolver>>;

    /// Replace the installed resolver
    fn set_resolver(&self, resolver: Rc<dyn AnimationResolver>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ids_are_unique() {
        let a = ObjectId::next();
        let b = ObjectId::next();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }
}
