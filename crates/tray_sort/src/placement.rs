use bevy::prelude::*;

use crate::GameState;
use crate::error::TraySortError;
use crate::tray::{TrayColor, TrayMotion};

/// A fixed spot outside the board where a tray of `color` ends up.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlacementSlot {
    pub color: TrayColor,
    occupant: Option<Entity>,
}

impl PlacementSlot {
    pub const fn new(color: TrayColor) -> Self {
        Self {
            color,
            occupant: None,
        }
    }

    pub const fn occupant(&self) -> Option<Entity> {
        self.occupant
    }

    pub const fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    /// Claims the slot for `tray`. Fails if another tray already sits there.
    pub fn occupy(&mut self, tray: Entity) -> bool {
        match self.occupant {
            Some(current) => current == tray,
            None => {
                self.occupant = Some(tray);
                true
            }
        }
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraySnapped {
    pub tray: Entity,
    pub slot: Entity,
}

/// Sent once per session when the last tray snaps.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllTraysPlaced;

/// The trays of the current session and whether they have all been placed.
///
/// Built once when the level spawns; the registry never changes afterwards.
#[derive(Resource, Debug, Default)]
pub struct PlacementTracker {
    trays: Vec<Entity>,
    completed: bool,
}

impl PlacementTracker {
    pub const fn new(trays: Vec<Entity>) -> Self {
        Self {
            trays,
            completed: false,
        }
    }

    pub fn trays(&self) -> &[Entity] {
        &self.trays
    }

    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns `true` the first time every registered tray reports snapped.
    pub fn check(&mut self, is_snapped: impl Fn(Entity) -> bool) -> bool {
        if self.completed {
            return false;
        }
        if self.trays.iter().all(|&tray| is_snapped(tray)) {
            self.completed = true;
            return true;
        }
        false
    }
}

pub fn check_completion(
    mut snapped: EventReader<TraySnapped>,
    tracker: Option<ResMut<PlacementTracker>>,
    trays: Query<&TrayMotion>,
    mut all_placed: EventWriter<AllTraysPlaced>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut tracker) = tracker else {
        for event in snapped.read() {
            warn!("{}", TraySortError::MissingTracker(format!("{}", event.tray)));
        }
        return;
    };

    for event in snapped.read() {
        debug!("Tray {} placed in slot {}", event.tray, event.slot);
        let all_done = tracker.check(|tray| trays.get(tray).is_ok_and(TrayMotion::is_snapped));
        if all_done {
            info!("All {} trays placed", tracker.trays().len());
            all_placed.send(AllTraysPlaced);
            next_state.set(GameState::Won);
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::utils::HashSet;

    use super::*;

    fn trays(count: u32) -> Vec<Entity> {
        (0..count).map(Entity::from_raw).collect()
    }

    #[test]
    fn completes_once_when_the_last_tray_snaps() {
        let registry = trays(4);
        let mut tracker = PlacementTracker::new(registry.clone());
        let mut snapped = HashSet::new();

        let mut signals = 0;
        for tray in &registry {
            snapped.insert(*tray);
            if tracker.check(|t| snapped.contains(&t)) {
                signals += 1;
            }
        }
        assert_eq!(signals, 1, "one signal for the whole session");
        assert!(tracker.is_completed(), "completion recorded");

        assert!(
            !tracker.check(|_| true),
            "checking again after completion is a no-op"
        );
    }

    #[test]
    fn incomplete_sets_do_not_signal() {
        let registry = trays(3);
        let mut tracker = PlacementTracker::new(registry.clone());
        let first = registry.first().copied().expect("three trays");

        assert!(!tracker.check(|t| t == first), "two trays still out");
        assert!(!tracker.is_completed(), "not complete yet");
    }

    #[test]
    fn slots_are_exclusive() {
        let mut slot = PlacementSlot::new(TrayColor::Blue);
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);

        assert!(slot.occupy(a), "free slot");
        assert!(slot.occupy(a), "same tray again");
        assert!(!slot.occupy(b), "taken by another tray");
        assert_eq!(slot.occupant(), Some(a), "first tray keeps it");
        assert!(!slot.is_free(), "occupied");
    }
}
