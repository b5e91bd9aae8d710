//! Immutable rule store with structural sharing.
//!
//! A [`RuleStore`] is an ordered snapshot of rules. Filtering a store yields a
//! new store that shares the rule records with the original and keeps every
//! rule's [`RuleId`], so narrowed snapshots can be compared and intersected
//! with the full table.

use std::ops::Deref;
use std::sync::Arc;

use ratescope_foundation::{Error, Result, Rule, RuleId};

/// A rule together with its identity in the full store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredRule {
    id: RuleId,
    rule: Arc<Rule>,
}

impl StoredRule {
    /// Returns the rule's id.
    #[must_use]
    pub const fn id(&self) -> RuleId {
        self.id
    }

    /// Returns the rule record.
    #[must_use]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }
}

impl Deref for StoredRule {
    type Target = Rule;

    fn deref(&self) -> &Rule {
        &self.rule
    }
}

/// Ordered, immutable snapshot of rules.
///
/// Cloning is O(1). Filters return new snapshots that preserve store order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleStore {
    rules: im::Vector<StoredRule>,
}

impl RuleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from records, assigning ids in order.
    ///
    /// # Errors
    ///
    /// Returns an error if there are more records than ids.
    pub fn from_rules<I>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = Rule>,
    {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| {
                let index = u32::try_from(index)
                    .map_err(|_| Error::internal("rule table exceeds u32::MAX records"))?;
                Ok(StoredRule {
                    id: RuleId::new(index),
                    rule: Arc::new(rule),
                })
            })
            .collect::<Result<im::Vector<_>>>()?;
        Ok(Self { rules })
    }

    /// Returns the number of rules in this snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the snapshot holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates the rules in store order.
    pub fn iter(&self) -> impl Iterator<Item = &StoredRule> {
        self.rules.iter()
    }

    /// Returns the ids in store order.
    #[must_use]
    pub fn ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(StoredRule::id).collect()
    }

    /// Looks up a rule by id.
    ///
    /// Snapshots keep ids ascending, so this is a binary search.
    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&StoredRule> {
        self.rules
            .binary_search_by(|stored| stored.id.cmp(&id))
            .ok()
            .and_then(|pos| self.rules.get(pos))
    }

    /// Returns true if the snapshot contains the rule.
    #[must_use]
    pub fn contains(&self, id: RuleId) -> bool {
        self.get(id).is_some()
    }

    /// Returns a new snapshot with the rules matching `predicate`.
    #[must_use]
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Rule) -> bool,
    {
        Self {
            rules: self
                .rules
                .iter()
                .filter(|stored| predicate(&stored.rule))
                .cloned()
                .collect(),
        }
    }

    /// Narrows to one subscription tier; `None` keeps every rule.
    #[must_use]
    pub fn for_tier(&self, tier: Option<&str>) -> Self {
        match tier {
            Some(tier) => self.filter(|r| r.subscription_type == tier),
            None => self.clone(),
        }
    }

    /// Narrows to one API group; `None` keeps every rule.
    #[must_use]
    pub fn for_api(&self, api: Option<&str>) -> Self {
        match api {
            Some(api) => self.filter(|r| r.api == api),
            None => self.clone(),
        }
    }

    /// Narrows to one endpoint type; `None` keeps every rule.
    #[must_use]
    pub fn for_endpoint_type(&self, endpoint_type: Option<&str>) -> Self {
        match endpoint_type {
            Some(et) => self.filter(|r| r.endpoint_type == et),
            None => self.clone(),
        }
    }

    /// Narrows to rules listing the method token; `None` keeps every rule.
    #[must_use]
    pub fn for_method(&self, method: Option<&str>) -> Self {
        match method {
            Some(m) => self.filter(|r| r.has_method(m)),
            None => self.clone(),
        }
    }

    /// Returns the first rule whose path equals `path` exactly.
    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<&StoredRule> {
        self.rules.iter().find(|stored| stored.path == path)
    }
}

impl<'a> IntoIterator for &'a RuleStore {
    type Item = &'a StoredRule;
    type IntoIter = im::vector::Iter<'a, StoredRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
