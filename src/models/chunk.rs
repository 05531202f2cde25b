// file: src/models/chunk.rs
// description: transient text segment used as a unit of retrieval
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of the chunk in split order
    pub index: usize,
    pub text: String,
    /// Character offset of the first character in the source text
    pub start: usize,
    /// Character offset one past the last character in the source text
    pub end: usize,
}

impl Chunk {
    pub fn new(index: usize, text: String, start: usize, end: usize) -> Self {
        Self {
            index,
            text,
            start,
            end,
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
