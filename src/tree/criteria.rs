//! Bulk query criteria for trees with collection support

use crate::tree::role::{Role, State, StateSet};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How a criteria component is matched against a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// At least one listed item must match
    #[default]
    Any,
    /// Every listed item must match
    All,
    /// No listed item may match
    None,
}

impl MatchType {
    fn evaluate<T>(self, items: &[T], mut hit: impl FnMut(&T) -> bool) -> bool {
        if items.is_empty() {
            return true;
        }
        match self {
            Self::Any => items.iter().any(&mut hit),
            Self::All => items.iter().all(&mut hit),
            Self::None => !items.iter().any(&mut hit),
        }
    }
}

/// Declarative descriptor for a bulk collection query
///
/// An empty component places no constraint on the node. When
/// `apply_predicate` is set the bulk query only narrows the candidate set
/// and the category classifier must still run on every result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub role_match: MatchType,
    #[serde(default)]
    pub states: Vec<State>,
    #[serde(default)]
    pub state_match: MatchType,
    /// `(key, value)` object attribute pairs
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    #[serde(default)]
    pub attribute_match: MatchType,
    #[serde(default)]
    pub apply_predicate: bool,
}

impl SearchCriteria {
    /// Criteria matching any of the given roles
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Builder method: set the role match type
    pub fn with_role_match(mut self, match_type: MatchType) -> Self {
        self.role_match = match_type;
        self
    }

    /// Builder method: set state constraints
    pub fn with_states(mut self, states: impl IntoIterator<Item = State>, match_type: MatchType) -> Self {
        self.states = states.into_iter().collect();
        self.state_match = match_type;
        self
    }

    /// Builder method: set attribute constraints
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder method: set the attribute match type
    pub fn with_attribute_match(mut self, match_type: MatchType) -> Self {
        self.attribute_match = match_type;
        self
    }

    /// Builder method: require the classifier to run on every result
    pub fn with_predicate(mut self) -> Self {
        self.apply_predicate = true;
        self
    }

    /// Evaluate the criteria against one node's properties
    pub fn evaluate(&self, role: Role, states: &StateSet, attributes: &IndexMap<String, String>) -> bool {
        self.role_match.evaluate(&self.roles, |r| *r == role)
            && self.state_match.evaluate(&self.states, |s| states.contains(*s))
            && self
                .attribute_match
                .evaluate(&self.attributes, |(k, v)| attributes.get(k) == Some(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_role_match() {
        let criteria = SearchCriteria::roles([Role::Button, Role::ToggleButton]);
        let none = StateSet::new();
        assert!(criteria.evaluate(Role::ToggleButton, &none, &attrs(&[])));
        assert!(!criteria.evaluate(Role::Link, &none, &attrs(&[])));

        let excluded = criteria.with_role_match(MatchType::None);
        assert!(excluded.evaluate(Role::Link, &none, &attrs(&[])));
    }

    #[test]
    fn test_state_and_attribute_match() {
        let criteria = SearchCriteria::roles([Role::Table])
            .with_states([State::Focusable, State::Showing], MatchType::All)
            .with_attribute("layout-guess", "true")
            .with_attribute_match(MatchType::None);

        let states = StateSet::new().with(State::Focusable).with(State::Showing);
        assert!(criteria.evaluate(Role::Table, &states, &attrs(&[("tag", "TABLE")])));
        assert!(!criteria.evaluate(Role::Table, &states, &attrs(&[("layout-guess", "true")])));

        let partial = StateSet::new().with(State::Focusable);
        assert!(!criteria.evaluate(Role::Table, &partial, &attrs(&[])));
    }

    #[test]
    fn test_empty_criteria_matches_everything() {
        let criteria = SearchCriteria::default();
        assert!(criteria.evaluate(Role::Unknown, &StateSet::new(), &attrs(&[])));
        assert!(!criteria.apply_predicate);
        assert!(criteria.with_predicate().apply_predicate);
    }
}
