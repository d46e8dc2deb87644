//! Action-scoped animation overrides.
//!
//! Objects declare, per named action, how each of their properties should
//! animate. Running a batch under one or more action names makes every
//! property change inside the batch animate with the declared
//! configuration instead of the host's default.
//!
//! ```ignore
//! use std::time::Duration;
//! use cue::prelude::*;
//!
//! let host = HeadlessHost::new();
//! let ctx = DispatchContext::new(host.clone());
//!
//! let mut button = host.layer().with_controlled_actions(action_table! {
//!     "press" => {
//!         "opacity" => AnimationSpec::ease_in_out(Duration::from_millis(300)),
//!         "scale" => AnimationSpec::spring(300.0, 20.0),
//!     },
//! });
//!
//! animate!(ctx, "press" => {
//!     button.set("opacity", 0.5);
//!     button.set("scale", 0.95);
//! });
//! ```

pub mod action_table;
pub mod active;
pub mod animation;
pub mod dispatch;
pub mod error;
pub mod host;

pub use action_table::ActionTable;
pub use active::ActiveActionSet;
pub use animation::{AnimationHandle, AnimationSpec, FillMode, TimingCurve};
pub use cue_macros::AnimatableObject;
pub use dispatch::{DispatchConfig, DispatchContext, MissPolicy};
pub use error::{Error, Result};
pub use host::{AnimatableObject, ObjectId};

pub mod prelude {
    pub use crate::action_table::ActionTable;
    pub use crate::animation::{AnimationHandle, AnimationSpec, FillMode, TimingCurve};
    pub use crate::dispatch::{DispatchConfig, DispatchContext, MissPolicy};
    pub use crate::host::headless::{HeadlessConfig, HeadlessHost, Layer};
    pub use crate::host::{
        AnimatableObject, AnimationHost, AnimationResolver, ObjectId, ResolvedAction,
    };
    pub use crate::{action_table, animate};
}

/// Run a batch with one or more action names.
///
/// ```ignore
/// animate!(ctx, "fade", "slide" => {
///     card.set("opacity", 0.0);
///     card.set("x", 120.0);
/// });
///
/// animate!(ctx, "fade" => { card.set("opacity", 1.0); } then {
///     log::info!("faded in");
/// });
/// ```
#[macro_export]
macro_rules! animate {
    ($ctx:expr, $($action:expr),+ => $mutate:block then $done:block) => {
        $ctx.animate_then([$($action),+], || $mutate, move || $done)
    };
    ($ctx:expr, $($action:expr),+ => $mutate:block) => {
        $ctx.animate([$($action),+], || $mutate)
    };
}
