//! Cell events: one-time occurrences bound to cells, resolved at most once.
use std::collections::{BTreeMap, HashSet};

use super::error::{GameError, Result};
use super::types::{Cell, CellEvent, CellId, CellType, EventId, EventKind};
use crate::config::game::RUBBLE_EVENT_NAME;

/// Decides which resolved events hand the character over to an external combat session.
pub trait CombatTrigger: Send {
    fn triggers_combat(&self, event: &CellEvent) -> bool;
}

/// Default trigger: monsters start a fight, nothing else does.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonsterTrigger;

impl CombatTrigger for MonsterTrigger {
    fn triggers_combat(&self, event: &CellEvent) -> bool {
        event.kind == EventKind::Monster
    }
}

impl<F> CombatTrigger for F
where
    F: Fn(&CellEvent) -> bool + Send,
{
    fn triggers_combat(&self, event: &CellEvent) -> bool {
        self(event)
    }
}

/// Result of resolving a selection of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// One message per resolved event, in selection order.
    pub messages: Vec<String>,
    /// Resolved events that must continue as a combat session.
    pub combat_events: Vec<CellEvent>,
}

#[derive(Debug, Clone)]
pub struct EventResolver {
    events: BTreeMap<EventId, CellEvent>,
    next_id: EventId,
    /// Cells some character already entered.
    entered: HashSet<CellId>,
}

impl Default for EventResolver {
    fn default() -> Self {
        Self {
            events: BTreeMap::new(),
            next_id: 1,
            entered: HashSet::new(),
        }
    }
}

impl EventResolver {
    pub fn bind(&mut self, cell_id: CellId, name: &str, kind: EventKind) -> EventId {
        let id = self.next_id;
        self.next_id += 1;
        self.events.insert(
            id,
            CellEvent {
                id,
                cell_id,
                name: name.to_string(),
                kind,
                resolved: false,
            },
        );
        id
    }

    pub fn event(&self, id: EventId) -> Option<&CellEvent> {
        self.events.get(&id)
    }

    /// Unresolved events on `cell_id`, in id order.
    pub fn events_at(&self, cell_id: CellId) -> Vec<&CellEvent> {
        self.events
            .values()
            .filter(|e| e.cell_id == cell_id && !e.resolved)
            .collect()
    }

    pub fn has_unresolved(&self, cell_id: CellId) -> bool {
        self.events.values().any(|e| e.cell_id == cell_id && !e.resolved)
    }

    /// Record that a character entered `cell`. The first entry into a rubble cell
    /// uncovers a search event there.
    pub(crate) fn seed_on_first_entry(&mut self, cell: &Cell) -> Option<EventId> {
        if !self.entered.insert(cell.id) || cell.cell_type != CellType::Blocked {
            return None;
        }
        Some(self.bind(cell.id, RUBBLE_EVENT_NAME, EventKind::Rubble))
    }

    /// Resolve `selected` events on `cell_id` on behalf of `actor`.
    ///
    /// Every id must name a distinct unresolved event on that cell, otherwise nothing
    /// is resolved and the first offending id is reported.
    pub(crate) fn resolve(
        &mut self,
        cell_id: CellId,
        selected: &[EventId],
        actor: &str,
        trigger: &dyn CombatTrigger,
    ) -> Result<Resolution> {
        let mut seen = HashSet::with_capacity(selected.len());
        for id in selected {
            let valid = self
                .events
                .get(id)
                .is_some_and(|e| e.cell_id == cell_id && !e.resolved);
            if !valid || !seen.insert(*id) {
                return Err(GameError::UnknownEvent(*id));
            }
        }

        let mut resolution = Resolution::default();
        for id in selected {
            let Some(event) = self.events.get_mut(id) else {
                continue;
            };
            event.resolved = true;
            resolution.messages.push(outcome_message(actor, event));
            if trigger.triggers_combat(event) {
                resolution.combat_events.push(event.clone());
            }
        }
        Ok(resolution)
    }
}

fn outcome_message(actor: &str, event: &CellEvent) -> String {
    match event.kind {
        EventKind::Treasure => format!("{} opened {} and collected its loot.", actor, event.name),
        EventKind::Trap => format!("{} sprung {} and got hurt.", actor, event.name),
        EventKind::Shrine => format!("{} prayed at {}.", actor, event.name),
        EventKind::Monster => format!("{} engaged {} in combat!", actor, event.name),
        EventKind::Rubble => format!("{} searched the rubble.", actor),
    }
}
