//! Visibility and keyboard highlight of the suggestion list.
//!
//! The box only tracks presentation state. The list itself comes from the
//! engine, and the blur delay is a scheduler timer owned by the session.

/// What pressing Enter in the search box does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnterAction {
    /// Pick the suggestion at this position.
    Pick(usize),
    /// Hide the box and keep the typed text.
    Hide,
}

/// Suggestion box state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SuggestionBox {
    visible: bool,
    highlighted: Option<usize>,
}

impl SuggestionBox {
    /// Creates a hidden box with nothing highlighted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the box is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns the highlighted position.
    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// The user typed: show the box and drop the highlight.
    pub fn on_input(&mut self) {
        self.visible = true;
        self.highlighted = None;
    }

    /// The search box gained focus.
    pub fn on_focus(&mut self) {
        self.visible = true;
    }

    /// The blur delay elapsed.
    pub fn on_blur_elapsed(&mut self) {
        self.hide();
    }

    /// The pointer entered the entry at `index`.
    pub fn hover(&mut self, index: usize, len: usize) {
        if index < len {
            self.highlighted = Some(index);
        }
    }

    /// Moves the highlight down, wrapping to the top.
    pub fn move_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        });
    }

    /// Moves the highlight up, wrapping to the bottom.
    pub fn move_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i > 0 && i < len => i - 1,
            _ => len - 1,
        });
    }

    /// Resolves Enter against a list of `len` suggestions.
    ///
    /// Without a valid highlight the box is hidden.
    pub fn enter(&mut self, len: usize) -> EnterAction {
        match self.highlighted {
            Some(i) if i < len => EnterAction::Pick(i),
            _ => {
                self.visible = false;
                EnterAction::Hide
            }
        }
    }

    /// A suggestion was picked.
    pub fn on_pick(&mut self) {
        self.hide();
    }

    /// Hides the box and drops the highlight.
    pub fn hide(&mut self) {
        self.visible = false;
        self.highlighted = None;
    }
}
