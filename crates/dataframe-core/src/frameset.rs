use std::collections::BTreeSet;

use crate::frame::DataFrame;

/// Rows of frames plus the union of their field names.
///
/// Useful when frames are treated as records of a table: [`columns`]
/// lists every name that appears in any row.
///
/// [`columns`]: FrameSet::columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSet {
    rows: Vec<DataFrame>,
    columns: BTreeSet<String>,
}

impl FrameSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, frame: DataFrame) {
        self.columns.extend(frame.names());
        self.rows.push(frame);
    }

    pub fn add_all(&mut self, frames: impl IntoIterator<Item = DataFrame>) {
        for frame in frames {
            self.add(frame);
        }
    }

    /// Every named field seen in any row, sorted.
    pub fn columns(&self) -> Vec<String> {
        self.columns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DataFrame> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[DataFrame] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataFrame> {
        self.rows.iter()
    }
}

impl FromIterator<DataFrame> for FrameSet {
    fn from_iter<I: IntoIterator<Item = DataFrame>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add_all(iter);
        set
    }
}

impl IntoIterator for FrameSet {
    type Item = DataFrame;
    type IntoIter = std::vec::IntoIter<DataFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
