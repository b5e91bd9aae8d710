//! The lookup engine: filters, derived views, and selection in one place.
//!
//! Every mutating operation applies its change to the [`FilterState`], then
//! refreshes the derived views before returning. Views are memoized on the
//! inputs they declare:
//!
//! | view        | key                                          |
//! |-------------|----------------------------------------------|
//! | tier slice  | tier                                         |
//! | options     | tier, api, endpoint type                     |
//! | suggestions | tier, normalized query                       |
//! | resolution  | tier, normalized query, api, endpoint, method|
//!
//! The automatic selection transitions run when the resolution is recomputed,
//! and after any operation that cleared the selection. Explicit picks and
//! clicks are applied after that, so they stick until the resolution's inputs
//! change again.

use ratescope_foundation::{Dimension, Error, ErrorKind, Result, RuleId};
use ratescope_storage::{RuleStore, StoredRule};

use crate::filter::{Dimensions, FilterState};
use crate::memo::Memo;
use crate::options::{FilterOptions, OptionDeriver, Readiness};
use crate::resolve::{GroupedResults, Outcome, Resolution, ResultResolver};
use crate::search::SearchMatcher;
use crate::selection::{SelectionCause, SelectionChange, SelectionController};

// =============================================================================
// View Keys
// =============================================================================

type OptionsKey = (Option<String>, Option<String>, Option<String>);
type SuggestionsKey = (Option<String>, String);

#[derive(Clone, Debug, PartialEq, Eq)]
struct ResolveKey {
    tier: Option<String>,
    needle: String,
    api: Option<String>,
    endpoint_type: Option<String>,
    method: Option<String>,
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn options_key(filters: &FilterState) -> OptionsKey {
    (
        owned(filters.tier()),
        owned(filters.api()),
        owned(filters.endpoint_type()),
    )
}

fn suggestions_key(filters: &FilterState) -> SuggestionsKey {
    (owned(filters.tier()), filters.normalized_query())
}

fn resolve_key(filters: &FilterState) -> ResolveKey {
    ResolveKey {
        tier: owned(filters.tier()),
        needle: filters.normalized_query(),
        api: owned(filters.api()),
        endpoint_type: owned(filters.endpoint_type()),
        method: owned(filters.method()),
    }
}

// =============================================================================
// Update
// =============================================================================

/// What one engine operation changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Update {
    /// Dimensions cleared by the reset cascade.
    pub cleared: Dimensions,
    /// Net change of the active selection, if any.
    pub selection: Option<SelectionChange>,
}

impl Update {
    fn new(cleared: Dimensions, selection: Option<SelectionChange>) -> Self {
        Self { cleared, selection }
    }

    /// Returns true if the selected rule differs from before the operation.
    #[must_use]
    pub fn selection_changed(&self) -> bool {
        self.selection.is_some()
    }
}

/// Folds two consecutive selection changes into their net effect.
fn chain(
    first: Option<SelectionChange>,
    second: Option<SelectionChange>,
) -> Option<SelectionChange> {
    match (first, second) {
        (None, change) | (change, None) => change,
        (Some(a), Some(b)) => (a.from != b.to).then_some(SelectionChange {
            from: a.from,
            to: b.to,
            cause: b.cause,
        }),
    }
}

/// How many times each view has been computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewStats {
    /// Tier slice computations.
    pub tier_slice: u64,
    /// Option list computations.
    pub options: u64,
    /// Suggestion computations.
    pub suggestions: u64,
    /// Resolution computations.
    pub resolution: u64,
}

// =============================================================================
// Lookup Engine
// =============================================================================

/// Filter state, derived views, and the selection state machine.
#[derive(Clone, Debug)]
pub struct LookupEngine {
    store: RuleStore,
    filters: FilterState,
    selection: SelectionController,
    tier_slice: Memo<Option<String>, RuleStore>,
    options: Memo<OptionsKey, FilterOptions>,
    suggestions: Memo<SuggestionsKey, Vec<String>>,
    resolution: Memo<ResolveKey, Resolution>,
}

impl LookupEngine {
    /// Creates an engine over a rule store with nothing selected.
    #[must_use]
    pub fn new(store: RuleStore) -> Self {
        let filters = FilterState::new();
        let tier_slice = Memo::new(owned(filters.tier()), |tier| {
            store.for_tier(tier.as_deref())
        });
        let options = Memo::new(options_key(&filters), |(tier, api, endpoint)| {
            OptionDeriver::derive(&store, tier.as_deref(), api.as_deref(), endpoint.as_deref())
        });
        let suggestions = Memo::new(suggestions_key(&filters), |(_, needle)| {
            SearchMatcher::new(needle).suggestions(tier_slice.value())
        });
        let resolution = Memo::new(resolve_key(&filters), |_| {
            ResultResolver::resolve(tier_slice.value(), &filters)
        });

        let mut engine = Self {
            store,
            filters,
            selection: SelectionController::new(),
            tier_slice,
            options,
            suggestions,
            resolution,
        };
        engine.selection.evaluate(engine.resolution.value());
        engine
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Returns the full rule store.
    #[must_use]
    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Returns the current filter state.
    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Returns the store narrowed by the effective tier.
    #[must_use]
    pub fn tier_slice(&self) -> &RuleStore {
        self.tier_slice.value()
    }

    /// Returns the dropdown choices.
    #[must_use]
    pub fn options(&self) -> &FilterOptions {
        self.options.value()
    }

    /// Returns which controls are usable.
    #[must_use]
    pub fn readiness(&self) -> Readiness {
        Readiness::from_filters(&self.filters)
    }

    /// Returns the current path suggestions.
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        self.suggestions.value()
    }

    /// Returns the resolved result list.
    #[must_use]
    pub fn resolution(&self) -> &Resolution {
        self.resolution.value()
    }

    /// Returns the results grouped by API.
    #[must_use]
    pub fn grouped(&self) -> GroupedResults {
        self.resolution.value().grouped()
    }

    /// Classifies the results for presentation.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.resolution.value().outcome()
    }

    /// Returns the id of the selected rule.
    #[must_use]
    pub fn selected_id(&self) -> Option<RuleId> {
        self.selection.current()
    }

    /// Returns the selected rule.
    #[must_use]
    pub fn selected(&self) -> Option<&StoredRule> {
        self.selection.current().and_then(|id| self.store.get(id))
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn rule(&self, id: RuleId) -> Option<&StoredRule> {
        self.store.get(id)
    }

    /// Returns view computation counts.
    #[must_use]
    pub fn stats(&self) -> ViewStats {
        ViewStats {
            tier_slice: self.tier_slice.computations(),
            options: self.options.computations(),
            suggestions: self.suggestions.computations(),
            resolution: self.resolution.computations(),
        }
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Selects a dropdown value, or clears the dimension with `None`.
    ///
    /// Selecting a value fires the reset cascade for every narrower dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if a prerequisite dimension is not selected or the
    /// value is not among the current options. The state is unchanged.
    pub fn select(&mut self, dimension: Dimension, value: Option<&str>) -> Result<Update> {
        if dimension == Dimension::Query {
            return self.set_query(value.unwrap_or_default());
        }

        let value = value.filter(|v| !v.is_empty());
        if let Some(v) = value {
            if let Some(missing) = self.filters.first_missing(dimension) {
                return Err(Error::not_ready(dimension, missing));
            }
            if !self.options.value().offers(dimension, v) {
                return Err(Error::unknown_option(dimension, v));
            }
        }
        Ok(self.apply(dimension, value.map(str::to_string)))
    }

    /// Applies an effective tier without checking it against the tier list.
    ///
    /// A tier reported by the subscription service may have no rules; it
    /// still narrows the table (to nothing).
    pub fn apply_tier(&mut self, tier: Option<&str>) -> Update {
        self.apply(Dimension::Tier, owned(tier))
    }

    /// Replaces the search text.
    ///
    /// New text always clears the selection before results are re-evaluated.
    ///
    /// # Errors
    ///
    /// Returns an error if non-empty text is entered before a tier is chosen.
    pub fn set_query(&mut self, text: &str) -> Result<Update> {
        if !text.trim().is_empty() {
            if let Some(missing) = self.filters.first_missing(Dimension::Query) {
                return Err(Error::not_ready(Dimension::Query, missing));
            }
        }
        Ok(self.apply(Dimension::Query, Some(text.to_string())))
    }

    /// Picks a path suggestion.
    ///
    /// The search text becomes the path. If a rule in the tier slice has
    /// exactly this path, the first such rule is selected and its API and
    /// endpoint type are written into the dropdowns without cascading. A
    /// previously chosen method is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if no tier is chosen.
    pub fn pick_suggestion(&mut self, path: &str) -> Result<Update> {
        if let Some(missing) = self.filters.first_missing(Dimension::Query) {
            return Err(Error::not_ready(Dimension::Query, missing));
        }

        let matched = self
            .tier_slice
            .value()
            .find_by_path(path)
            .map(|stored| (stored.id(), stored.api.clone(), stored.endpoint_type.clone()));

        self.filters.set_query_silently(path);
        let cleared = match &matched {
            Some((_, api, endpoint_type)) => self.filters.backfill(api, endpoint_type),
            None => Dimensions::empty(),
        };

        let evaluated = self.refresh(false);
        let picked = self.selection.pick(matched.map(|(id, _, _)| id));
        tracing::debug!(path, matched = picked.is_some(), "suggestion picked");
        Ok(Update::new(cleared, chain(evaluated, picked)))
    }

    /// Picks the suggestion at `index` in the current suggestion list.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or no tier is chosen.
    pub fn pick_suggestion_at(&mut self, index: usize) -> Result<Update> {
        let Some(path) = self.suggestions.value().get(index).cloned() else {
            return Err(Error::new(ErrorKind::SuggestionOutOfRange {
                index,
                length: self.suggestions.value().len(),
            }));
        };
        self.pick_suggestion(&path)
    }

    /// Toggles a result card.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule is not in the current results.
    pub fn click(&mut self, id: RuleId) -> Result<Update> {
        if !self.resolution.value().rules.contains(id) {
            return Err(Error::rule_not_found(id));
        }
        Ok(Update::new(Dimensions::empty(), self.selection.toggle(id)))
    }

    /// Clears every filter, the search text, and the selection.
    pub fn reset(&mut self) -> Update {
        self.filters.reset();
        let cleared = self.selection.clear(SelectionCause::Reset);
        let evaluated = self.refresh(true);
        Update::new(Dimensions::all(), chain(cleared, evaluated))
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn apply(&mut self, dimension: Dimension, value: Option<String>) -> Update {
        let effect = self.filters.set(dimension, value);
        let cleared = if effect.clears_selection {
            self.selection.clear(SelectionCause::FilterChanged)
        } else {
            None
        };
        let evaluated = self.refresh(effect.clears_selection);

        tracing::debug!(
            %dimension,
            value = self.filters.value(dimension).unwrap_or(""),
            cleared = ?effect.resets,
            results = self.resolution.value().len(),
            "filter applied"
        );
        Update::new(effect.resets, chain(cleared, evaluated))
    }

    /// Brings every view up to date and runs the automatic transitions if the
    /// resolution changed or `reevaluate` is set.
    ///
    /// A cleared selection must be re-evaluated even when the normalized
    /// inputs are unchanged, or a still-unique result would stay unselected.
    fn refresh(&mut self, reevaluate: bool) -> Option<SelectionChange> {
        let store = &self.store;
        let filters = &self.filters;

        self.tier_slice
            .update(owned(filters.tier()), |tier| store.for_tier(tier.as_deref()));
        self.options
            .update(options_key(filters), |(tier, api, endpoint)| {
                OptionDeriver::derive(store, tier.as_deref(), api.as_deref(), endpoint.as_deref())
            });

        let tier_slice = self.tier_slice.value();
        self.suggestions
            .update(suggestions_key(filters), |(_, needle)| {
                SearchMatcher::new(needle).suggestions(tier_slice)
            });
        let recomputed = self
            .resolution
            .update(resolve_key(filters), |_| ResultResolver::resolve(tier_slice, filters));

        if recomputed || reevaluate {
            self.selection.evaluate(self.resolution.value())
        } else {
            None
        }
    }
}
