//! Selection state for a chain of dependent selects.
//!
//! [SelectionController] keeps, for every level of a [CascadePath], the selected
//! id and the candidate list the user can choose from. Changing a selection
//! clears everything below it and asks for the child level's candidates with a
//! [FetchTicket]. Results are only accepted while their ticket is current, so a
//! slow response for a selection the user has already moved away from is dropped
//! instead of overwriting newer candidates.

use crate::hierarchy::{CascadePath, Entity, EntityId, Level, Lookup};

/// Identifies one request for a level's candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    level: Level,
    generation: u64,
}

impl FetchTicket {
    #[cfg(test)]
    pub fn level(&self) -> Level {
        self.level
    }
}

/// A request for the candidates of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub lookup: Lookup,
    /// The selected id of the parent level, `None` for the first level.
    pub parent_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    selected: Option<EntityId>,
    candidates: Vec<Entity>,
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    path: CascadePath,
    slots: Vec<Slot>,
}

impl SelectionController {
    pub fn new(path: CascadePath) -> Self {
        Self {
            path,
            slots: vec![Slot::default(); path.steps().len()],
        }
    }

    fn index(&self, level: Level) -> Option<usize> {
        self.path.steps().iter().position(|step| step.level == level)
    }

    /// Ask for the candidates of the first level, which do not depend on any selection.
    pub fn root_request(&mut self) -> FetchRequest {
        let slot = &mut self.slots[0];
        slot.generation += 1;

        FetchRequest {
            ticket: FetchTicket {
                level: self.path.steps()[0].level,
                generation: slot.generation,
            },
            lookup: self.path.steps()[0].lookup,
            parent_id: None,
        }
    }

    /// Select `id` at `level`, or clear the level with `None`.
    ///
    /// Every level below `level` loses its selection and candidates, and any
    /// request still in flight for those levels becomes stale. Returns the
    /// request for the immediate child's candidates when there is a child and
    /// `id` is set.
    ///
    /// Selecting a level whose parent has no selection is ignored, as is a
    /// level that is not part of the path.
    pub fn set_selection(&mut self, level: Level, id: Option<EntityId>) -> Option<FetchRequest> {
        let index = self.index(level)?;

        if index > 0 && self.slots[index - 1].selected.is_none() {
            tracing::debug!("Ignoring selection of {level} without a parent selection");
            return None;
        }

        self.slots[index].selected = id;

        for slot in self.slots.iter_mut().skip(index + 1) {
            slot.selected = None;
            slot.candidates.clear();
            slot.generation += 1;
        }

        let parent_id = id?;
        let child = self.path.steps().get(index + 1)?;

        Some(FetchRequest {
            ticket: FetchTicket {
                level: child.level,
                generation: self.slots[index + 1].generation,
            },
            lookup: child.lookup,
            parent_id: Some(parent_id),
        })
    }

    /// Store the candidates fetched for `ticket`.
    ///
    /// Returns `false` and leaves the candidates untouched if the selection that
    /// produced the ticket has since changed.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, entities: Vec<Entity>) -> bool {
        let Some(index) = self.index(ticket.level) else {
            return false;
        };

        let slot = &mut self.slots[index];

        if slot.generation != ticket.generation {
            tracing::debug!("Discarding stale candidates for {}", ticket.level);
            return false;
        }

        slot.candidates = entities;
        true
    }

    pub fn selected(&self, level: Level) -> Option<EntityId> {
        self.index(level).and_then(|index| self.slots[index].selected)
    }

    pub fn candidates(&self, level: Level) -> &[Entity] {
        self.index(level)
            .map(|index| self.slots[index].candidates.as_slice())
            .unwrap_or_default()
    }

    /// Whether `level` can currently be chosen, i.e. it is the first level or
    /// its parent has a selection.
    pub fn is_enabled(&self, level: Level) -> bool {
        match self.index(level) {
            Some(0) => true,
            Some(index) => self.slots[index - 1].selected.is_some(),
            None => false,
        }
    }
}
