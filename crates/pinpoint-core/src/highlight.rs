//! Highlight capture: the span of displayed text scoped to the next submission.

/// Holds the most recent non-collapsed selection.
///
/// The capture never clears itself on an empty selection; clearing happens
/// only when a submission completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightCapture {
    span: Option<String>,
}

impl HighlightCapture {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a selection change.
    ///
    /// An empty selection is a collapsed one (a single click) and leaves the
    /// previous span in place. Returns true if the span was replaced.
    pub fn on_selection_changed(&mut self, selected: &str) -> bool {
        if selected.is_empty() {
            return false;
        }
        self.span = Some(selected.to_string());
        true
    }

    /// The currently highlighted span, if any.
    pub fn current(&self) -> Option<&str> {
        self.span.as_deref()
    }

    /// Drop the current span.
    pub fn clear(&mut self) {
        self.span = None;
    }
}
