use std::rc::Rc;

use super::{DispatchState, MissPolicy};
use crate::animation::{AnimationSpec, FillMode};
use crate::host::{AnimatableObject, AnimationResolver, ResolvedAction};

enum Lookup {
    /// No action is active, or the object carries no table
    Unclaimed,
    /// Actions are active but none configures the key
    Miss,
    Hit(AnimationSpec),
}

/// Resolver installed into the host by a [`DispatchContext`](super::DispatchContext).
///
/// For each property change it joins the active action names against the
/// changed object's action table. The first active action (in priority
/// order) that configures the property supplies the animation.
pub struct Interceptor {
    state: Rc<DispatchState>,
    fallback: Option<Rc<dyn AnimationResolver>>,
}

impl Interceptor {
    pub(crate) fn new(
        state: Rc<DispatchState>,
        fallback: Option<Rc<dyn AnimationResolver>>,
    ) -> Self {
        Self { state, fallback }
    }

    fn defer(&self, object: &dyn AnimatableObject, key: &str) -> Option<ResolvedAction> {
        self.fallback
            .as_ref()
            .and_then(|resolver| resolver.action_for(object, key))
    }

    fn lookup(&self, object: &dyn AnimatableObject, key: &str) -> Lookup {
        let active = self.state.active.borrow();
        if active.is_empty() {
            return Lookup::Unclaimed;
        }
        let Some(table) = object.action_table() else {
            return Lookup::Unclaimed;
        };

        let mut winner: Option<(&str, &AnimationSpec)> = None;
        for action in active.iter() {
            let Some(spec) = table.get(action, key) else {
                log::trace!(
                    "No controlled animation for object {}, action '{}', key '{}'",
                    object.object_id().raw(),
                    action,
                    key
                );
                continue;
            };
            match winner {
                None => winner = Some((action, spec)),
                Some((first, _)) => {
                    if self.state.config.strict_overlap {
                        panic!(
                            "actions '{}' and '{}' both configure '{}' on object {}",
                            first,
                            action,
                            key,
                            object.object_id().raw()
                        );
                    }
                    log::debug!(
                        "Action '{}' shadows '{}' for key '{}' on object {}",
                        first,
                        action,
                        key,
                        object.object_id().raw()
                    );
                }
            }
        }
        match winner {
            Some((_, spec)) => Lookup::Hit(*spec),
            None => Lookup::Miss,
        }
    }
}

impl AnimationResolver for Interceptor {
    fn action_for(&self, object: &dyn AnimatableObject, key: &str) -> Option<ResolvedAction> {
        match self.lookup(object, key) {
            Lookup::Hit(spec) => {
                let mut animation = spec.build();
                animation.set_fill_mode(FillMode::BOTH);
                animation.set_removed_on_completion(true);
                animation.set_key_path(key);
                Some(ResolvedAction::Animate(animation))
            }
            Lookup::Miss => match self.state.config.miss_policy {
                MissPolicy::Suppress => Some(ResolvedAction::Suppress),
                MissPolicy::Defer => self.defer(object, key),
            },
            Lookup::Unclaimed => self.defer(object, key),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::time::Duration;

    use super::*;
    use crate::action_table::ActionTable;
    use crate::active::ActiveActionSet;
    use crate::animation::TimingCurve;
    use crate::dispatch::DispatchConfig;
    use crate::host::ObjectId;

    struct Object {
        id: ObjectId,
        table: Option<ActionTable>,
    }

    impl AnimatableObject for Object {
        fn object_id(&self) -> ObjectId {
            self.id
        }

        fn action_table(&self) -> Option<&ActionTable> {
            self.table.as_ref()
        }
    }

    struct Fixed;

    impl AnimationResolver for Fixed {
        fn action_for(&self, _: &dyn AnimatableObject, _: &str) -> Option<ResolvedAction> {
            Some(ResolvedAction::Animate(
                AnimationSpec::linear(Duration::from_secs(1)).build(),
            ))
        }
    }

    fn interceptor(config: DispatchConfig, active: &[&str]) -> Interceptor {
        let mut set = ActiveActionSet::new();
        set.activate(active.iter().copied());
        let state = Rc::new(DispatchState {
            config,
            active: RefCell::new(set),
        });
        Interceptor::new(state, Some(Rc::new(Fixed)))
    }

    fn object(table: Option<ActionTable>) -> Object {
        Object {
            id: ObjectId::next(),
            table,
        }
    }

    fn fade() -> AnimationSpec {
        AnimationSpec::ease_in_out(Duration::from_millis(300))
    }

    fn fallback_animation() -> Option<ResolvedAction> {
        Fixed.action_for(&object(None), "opacity")
    }

    #[test]
    fn test_defers_when_nothing_active() {
        let interceptor = interceptor(DispatchConfig::default(), &[]);
        let obj = object(Some(ActionTable::new().with("fade", "opacity", fade())));
        assert_eq!(interceptor.action_for(&obj, "opacity"), fallback_animation());
    }

    #[test]
    fn test_defers_when_object_has_no_table() {
        let interceptor = interceptor(DispatchConfig::default(), &["fade"]);
        assert_eq!(
            interceptor.action_for(&object(None), "opacity"),
            fallback_animation()
        );
    }

    #[test]
    fn test_match_builds_configured_animation() {
        let interceptor = interceptor(DispatchConfig::default(), &["fade"]);
        let obj = object(Some(ActionTable::new().with("fade", "opacity", fade())));

        let Some(ResolvedAction::Animate(anim)) = interceptor.action_for(&obj, "opacity") else {
            panic!("expected an animation");
        };
        assert_eq!(anim.key_path(), Some("opacity"));
        assert_eq!(anim.fill_mode(), FillMode::BOTH);
        assert!(anim.is_removed_on_completion());
        assert_eq!(anim.timing_curve(), Some(TimingCurve::EaseInOut));
        assert_eq!(anim.duration(), Duration::from_millis(300));
    }

    #[test]
    fn test_miss_suppresses_by_default() {
        let interceptor = interceptor(DispatchConfig::default(), &["fade"]);
        let obj = object(Some(ActionTable::new().with("fade", "opacity", fade())));
        assert_eq!(
            interceptor.action_for(&obj, "bounds"),
            Some(ResolvedAction::Suppress)
        );
    }

    #[test]
    fn test_empty_table_still_suppresses() {
        let interceptor = interceptor(DispatchConfig::default(), &["fade"]);
        let obj = object(Some(ActionTable::new()));
        assert_eq!(
            interceptor.action_for(&obj, "opacity"),
            Some(ResolvedAction::Suppress)
        );
    }

    #[test]
    fn test_miss_can_defer() {
        let config = DispatchConfig::new().miss_policy(MissPolicy::Defer);
        let interceptor = interceptor(config, &["fade"]);
        let obj = object(Some(ActionTable::new().with("fade", "opacity", fade())));
        assert_eq!(interceptor.action_for(&obj, "bounds"), fallback_animation());
    }

    #[test]
    fn test_first_active_action_wins() {
        let spring = AnimationSpec::spring(300.0, 20.0);
        let table = ActionTable::new()
            .with("a", "opacity", fade())
            .with("b", "opacity", spring);
        let obj = object(Some(table));

        let a_first = interceptor(DispatchConfig::default(), &["a", "b"]);
        let Some(ResolvedAction::Animate(anim)) = a_first.action_for(&obj, "opacity") else {
            panic!("expected an animation");
        };
        assert_eq!(anim.timing_curve(), Some(TimingCurve::EaseInOut));

        let b_first = interceptor(DispatchConfig::default(), &["b", "a"]);
        let Some(ResolvedAction::Animate(anim)) = b_first.action_for(&obj, "opacity") else {
            panic!("expected an animation");
        };
        assert!(anim.spring().is_some());
    }

    #[test]
    #[should_panic(expected = "both configure 'opacity'")]
    fn test_strict_overlap_panics() {
        let table = ActionTable::new()
            .with("a", "opacity", fade())
            .with("b", "opacity", fade());
        let interceptor = interceptor(DispatchConfig::new().strict_overlap(true), &["a", "b"]);
        let _ = interceptor.action_for(&object(Some(table)), "opacity");
    }

    #[test]
    fn test_strict_overlap_allows_disjoint_keys() {
        let table = ActionTable::new()
            .with("a", "opacity", fade())
            .with("b", "bounds", fade());
        let interceptor = interceptor(DispatchConfig::new().strict_overlap(true), &["a", "b"]);
        let obj = object(Some(table));
        assert!(matches!(
            interceptor.action_for(&obj, "bounds"),
            Some(ResolvedAction::Animate(_))
        ));
    }
}
