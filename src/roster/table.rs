//! Slab-backed participant table.
//!
//! ## Architecture
//!
//! - **Slab**: participant storage, one slot per roster member
//! - **HashMap**: participant id to slab key for O(1) lookup
//! - **Vec**: slab keys in entry order, for stable iteration
//!
//! The roster is fixed at construction; nothing is ever removed.

use std::collections::HashMap;

use slab::Slab;

use crate::error::{EngineError, Result};
use crate::types::{Participant, ParticipantInfo};

#[derive(Debug, Clone)]
pub struct Roster {
    participants: Slab<Participant>,
    index: HashMap<String, usize>,
    order: Vec<usize>,
}

impl Roster {
    /// Build a roster from caller-supplied identities.
    ///
    /// Fails with `InvalidInput` for an empty roster, an empty id, or a
    /// duplicate id.
    ///
    /// ```
    /// use puzzle_arena::roster::Roster;
    /// use puzzle_arena::types::ParticipantInfo;
    ///
    /// let roster = Roster::new(vec![
    ///     ParticipantInfo::new("a", "Ada"),
    ///     ParticipantInfo::new("b", "Bo"),
    /// ]).unwrap();
    ///
    /// assert_eq!(roster.len(), 2);
    /// assert!(roster.contains("b"));
    /// ```
    pub fn new(members: Vec<ParticipantInfo>) -> Result<Self> {
        if members.is_empty() {
            return Err(EngineError::InvalidInput("roster is empty".to_string()));
        }

        let mut participants = Slab::with_capacity(members.len());
        let mut index = HashMap::with_capacity(members.len());
        let mut order = Vec::with_capacity(members.len());

        for info in members {
            if info.id.is_empty() {
                return Err(EngineError::InvalidInput(
                    "participant id must not be empty".to_string(),
                ));
            }
            if index.contains_key(&info.id) {
                return Err(EngineError::InvalidInput(format!(
                    "duplicate participant id {}",
                    info.id
                )));
            }
            let id = info.id.clone();
            let key = participants.insert(Participant::new(info));
            index.insert(id, key);
            order.push(key);
        }

        Ok(Self {
            participants,
            index,
            order,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        let key = *self.index.get(id)?;
        self.participants.get(key)
    }

    /// Mutable lookup, failing with `UnknownParticipant`.
    pub(crate) fn get_mut(&mut self, id: &str) -> Result<&mut Participant> {
        let key = *self
            .index
            .get(id)
            .ok_or_else(|| EngineError::UnknownParticipant(id.to_string()))?;
        self.participants
            .get_mut(key)
            .ok_or_else(|| EngineError::UnknownParticipant(id.to_string()))
    }

    /// Participants in entry order
    pub fn iter(&self) -> impl Iterator<Item = &Participant> + '_ {
        self.order.iter().filter_map(|&key| self.participants.get(key))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Participant> + '_ {
        self.participants.iter_mut().map(|(_, p)| p)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
