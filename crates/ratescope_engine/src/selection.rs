//! The selection state machine.
//!
//! At most one rule is selected at a time. Automatic transitions follow the
//! result list; explicit transitions follow suggestion picks and card clicks.
//!
//! ```text
//!                 unique result / pick / click
//!   Unselected ───────────────────────────────► Selected(rule)
//!       ▲                                            │
//!       └──── ambiguous / empty / toggle / reset ────┘
//! ```

use std::fmt;

use ratescope_foundation::RuleId;

use crate::resolve::{ResolveMode, Resolution};

/// Why the selection changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionCause {
    /// Exactly one result remained.
    UniqueResult,
    /// A search matched several rules; the user must pick one.
    AmbiguousSearch,
    /// Filters left zero or several results.
    NoUniqueResult,
    /// A path suggestion was picked.
    SuggestionPicked,
    /// A result card was clicked.
    CardClicked,
    /// The selected card was clicked again.
    CardToggledOff,
    /// A broader filter or the search text changed.
    FilterChanged,
    /// Authentication or tier changed.
    Reset,
}

impl fmt::Display for SelectionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UniqueResult => "unique result",
            Self::AmbiguousSearch => "ambiguous search",
            Self::NoUniqueResult => "no unique result",
            Self::SuggestionPicked => "suggestion picked",
            Self::CardClicked => "card clicked",
            Self::CardToggledOff => "card toggled off",
            Self::FilterChanged => "filter changed",
            Self::Reset => "reset",
        };
        f.write_str(text)
    }
}

/// A change of the active selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    /// Previously selected rule.
    pub from: Option<RuleId>,
    /// Newly selected rule.
    pub to: Option<RuleId>,
    /// What caused the change.
    pub cause: SelectionCause,
}

/// Tracks the single selected rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionController {
    current: Option<RuleId>,
}

impl SelectionController {
    /// Creates a controller in the unselected state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the selected rule.
    #[must_use]
    pub const fn current(&self) -> Option<RuleId> {
        self.current
    }

    /// Returns true if `id` is the selected rule.
    #[must_use]
    pub fn is_selected(&self, id: RuleId) -> bool {
        self.current == Some(id)
    }

    /// Applies the automatic transitions for a fresh result list.
    ///
    /// - search with one result, or filters with one result: select it
    /// - search with several results: clear
    /// - filters with zero or several results: clear
    /// - search with zero results: unchanged
    pub fn evaluate(&mut self, resolution: &Resolution) -> Option<SelectionChange> {
        if let Some(only) = resolution.unique() {
            return self.transition(Some(only.id()), SelectionCause::UniqueResult);
        }
        match resolution.mode {
            ResolveMode::Search if resolution.is_empty() => None,
            ResolveMode::Search => self.transition(None, SelectionCause::AmbiguousSearch),
            ResolveMode::Filter => self.transition(None, SelectionCause::NoUniqueResult),
        }
    }

    /// Selects the rule a picked suggestion resolved to, or clears.
    pub fn pick(&mut self, rule: Option<RuleId>) -> Option<SelectionChange> {
        self.transition(rule, SelectionCause::SuggestionPicked)
    }

    /// Toggles a clicked card.
    pub fn toggle(&mut self, rule: RuleId) -> Option<SelectionChange> {
        if self.is_selected(rule) {
            self.transition(None, SelectionCause::CardToggledOff)
        } else {
            self.transition(Some(rule), SelectionCause::CardClicked)
        }
    }

    /// Clears the selection.
    pub fn clear(&mut self, cause: SelectionCause) -> Option<SelectionChange> {
        self.transition(None, cause)
    }

    fn transition(&mut self, to: Option<RuleId>, cause: SelectionCause) -> Option<SelectionChange> {
        if self.current == to {
            return None;
        }
        let change = SelectionChange {
            from: self.current,
            to,
            cause,
        };
        self.current = to;
        Some(change)
    }
}
