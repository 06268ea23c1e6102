//! The shared memory timeline.
//!
//! Insertion order is display order. Entries are appended or removed by id,
//! never edited in place.

use crate::{
    error::{LoveError, LoveResult},
    types::{Memory, MemoryDraft, MemoryId},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    memories: Vec<Memory>,
}

impl Timeline {
    pub fn new(memories: Vec<Memory>) -> Self {
        Self { memories }
    }

    /// Append a new memory under a fresh UUID and return its id.
    /// (0, 0) is a valid place for a memory; only non-finite or
    /// out-of-range coordinates are rejected.
    pub fn add(&mut self, draft: MemoryDraft) -> LoveResult<MemoryId> {
        if !draft.location.is_valid() {
            return Err(LoveError::InvalidCoordinate {
                lat: draft.location.lat,
                lng: draft.location.lng,
            });
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.memories.push(draft.into_memory(id.clone()));
        Ok(id)
    }

    /// Remove the memory with `id`, keeping the others in order.
    pub fn delete(&mut self, id: &str) -> LoveResult<Memory> {
        let index = self
            .memories
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| LoveError::MemoryNotFound { id: id.to_string() })?;
        Ok(self.memories.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Memory> {
        self.memories.iter().find(|m| m.id == id)
    }

    pub fn memories(&self) -> &[Memory] {
        &self.memories
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}

/// `2024-01-05` → `"January 5, 2024"`.
pub fn display_date(memory: &Memory) -> String {
    memory.date.format("%B %-d, %Y").to_string()
}

/// Six decimal places, `"lat, lng"`.
pub fn display_coordinates(memory: &Memory) -> String {
    format!("{:.6}, {:.6}", memory.location.lat, memory.location.lng)
}
