//! Row selection, independent of poll state.
//!
//! A selection survives a refresh as long as the selected identifier is still
//! present in the new data; otherwise the effective selection is none and the
//! view falls back to its neutral placeholder.

#[derive(Clone, Debug, Default)]
pub struct Selection {
    current: Option<String>,
}

impl Selection {
    pub fn select(&mut self, id: impl Into<String>) {
        self.current = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The selected id, filtered against the identifiers present in the
    /// latest data. Stale selections resolve to `None` without being erased,
    /// so an id that reappears later becomes effective again.
    pub fn effective<'a>(&'a self, present: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
        let current = self.current.as_deref()?;
        present.into_iter().find(|id| *id == current)
    }
}
