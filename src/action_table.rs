//! Per-object animation configuration, keyed by action name then property key.
//!
//! ```ignore
//! let table = action_table! {
//!     "press" => {
//!         "opacity" => AnimationSpec::ease_in_out(Duration::from_millis(300)),
//!         "bounds" => AnimationSpec::spring(300.0, 20.0),
//!     },
//! };
//! ```

use std::collections::HashMap;

use crate::animation::AnimationSpec;

/// Mapping action name → property key → [`AnimationSpec`].
///
/// Owned by an animatable object and read (never written) while a batch
/// is being dispatched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionTable {
    actions: HashMap<String, HashMap<String, AnimationSpec>>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The spec configured for `key` under `action`, if any.
    ///
    /// Absence is not an error: it means this action does not override
    /// the property.
    pub fn get(&self, action: &str, key: &str) -> Option<&AnimationSpec> {
        self.actions.get(action).and_then(|props| props.get(key))
    }

    /// Configure `key` under `action`, returning the spec it replaced
    pub fn insert(
        &mut self,
        action: impl Into<String>,
        key: impl Into<String>,
        spec: AnimationSpec,
    ) -> Option<AnimationSpec> {
        self.actions
            .entry(action.into())
            .or_default()
            .insert(key.into(), spec)
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(
        mut self,
        action: impl Into<String>,
        key: impl Into<String>,
        spec: AnimationSpec,
    ) -> Self {
        self.insert(action, key, spec);
        self
    }

    /// Drop every property configured under `action`
    pub fn remove_action(&mut self, action: &str) -> Option<HashMap<String, AnimationSpec>> {
        self.actions.remove(action)
    }

    pub fn contains_action(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    /// Action names with at least one entry (unordered)
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Property keys and specs configured under `action` (unordered)
    pub fn properties<'a>(
        &'a self,
        action: &str,
    ) -> impl Iterator<Item = (&'a str, &'a AnimationSpec)> + 'a {
        self.actions
            .get(action)
            .into_iter()
            .flat_map(|props| props.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Number of actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<A, K> FromIterator<(A, K, AnimationSpec)> for ActionTable
where
    A: Into<String>,
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (A, K, AnimationSpec)>>(iter: I) -> Self {
        let mut table = ActionTable::new();
        for (action, key, spec) in iter {
            table.insert(action, key, spec);
        }
        table
    }
}

/// Build an [`ActionTable`] literal.
#[macro_export]
macro_rules! action_table {
    ($($action:expr => { $($key:expr => $spec:expr),* $(,)? }),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut table = $crate::ActionTable::new();
            $(
                $(
                    table.insert($action, $key, $spec);
                )*
            )*
            table
        }
    };
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn fade() -> AnimationSpec {
        AnimationSpec::ease_in_out(Duration::from_millis(300))
    }

    #[test]
    fn test_get_missing_is_none() {
        let table = ActionTable::new().with("fade", "opacity", fade());
        assert!(table.get("fade", "bounds").is_none());
        assert!(table.get("slide", "opacity").is_none());
        assert_eq!(table.get("fade", "opacity"), Some(&fade()));
    }

    #[test]
    fn test_insert_replaces_existing_entry() {
        let mut table = ActionTable::new();
        assert!(table.insert("fade", "opacity", fade()).is_none());
        let spring = AnimationSpec::spring(200.0, 15.0);
        assert_eq!(table.insert("fade", "opacity", spring), Some(fade()));
        assert_eq!(table.get("fade", "opacity"), Some(&spring));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_action() {
        let mut table = ActionTable::new()
            .with("fade", "opacity", fade())
            .with("slide", "position", fade());
        assert!(table.remove_action("fade").is_some());
        assert!(!table.contains_action("fade"));
        assert!(table.contains_action("slide"));
    }

    #[test]
    fn test_properties_of_unknown_action_is_empty() {
        let table = ActionTable::new();
        assert_eq!(table.properties("nope").count(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_macro_and_from_iter_agree() {
        let spring = AnimationSpec::spring(300.0, 20.0);
        let from_macro = crate::action_table! {
            "press" => {
                "opacity" => fade(),
                "bounds" => spring,
            },
            "release" => { "opacity" => fade() },
        };
        let collected: ActionTable = [
            ("press", "opacity", fade()),
            ("press", "bounds", spring),
            ("release", "opacity", fade()),
        ]
        .into_iter()
        .collect();
        assert_eq!(from_macro, collected);
        let mut actions: Vec<_> = from_macro.actions().collect();
        actions.sort_unstable();
        assert_eq!(actions, ["press", "release"]);
    }
}
