//! Live portrait instances and their position slots

use crate::error::{Diagnostic, Diagnostics};
use crate::stage::registry::{AssetRegistry, asset_key};
use crate::stage::{Anchor, Stage, VisualHandle};
use std::collections::HashMap;

/// A live portrait visual bound to a portrait key
#[derive(Debug, Clone, PartialEq)]
pub struct PortraitInstance {
    key: String,
    handle: VisualHandle,
    slot: Option<i32>,
}

impl PortraitInstance {
    /// Normalized portrait key
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn handle(&self) -> VisualHandle {
        self.handle
    }

    /// Occupied position slot, `None` when unassigned
    pub fn slot(&self) -> Option<i32> {
        self.slot
    }
}

/// Owns every live portrait instance and the slot each one occupies
///
/// At most one instance lives per key and at most one instance occupies a
/// slot. An instance is listed in the slot map exactly when its own slot is
/// set, and that entry points back at it.
#[derive(Debug, Clone, Default)]
pub struct PortraitSlots {
    live: HashMap<String, PortraitInstance>,
    occupancy: HashMap<i32, String>,
}

impl PortraitSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live instance for `key`, creating it from its template if needed
    ///
    /// A key with no registered template yields `None` and a diagnostic.
    pub fn ensure(
        &mut self,
        key: &str,
        registry: &AssetRegistry,
        stage: &mut dyn Stage,
        diagnostics: &mut Diagnostics,
    ) -> Option<&PortraitInstance> {
        let normalized = asset_key(key);
        if normalized.is_empty() {
            return None;
        }

        if !self.live.contains_key(&normalized) {
            let Some(template) = registry.portrait(&normalized) else {
                diagnostics.report(Diagnostic::MissingTemplate {
                    key: key.trim().to_string(),
                });
                return None;
            };
            let handle = stage.spawn(template);
            log::debug!("[Portrait] Created '{}' as {}", normalized, handle);
            self.live.insert(
                normalized.clone(),
                PortraitInstance {
                    key: normalized.clone(),
                    handle,
                    slot: None,
                },
            );
        }

        self.live.get(&normalized)
    }

    /// Move a live instance into `slot`, evicting a different occupant first
    ///
    /// Returns `false` when `key` has no live instance.
    pub fn assign_slot(
        &mut self,
        key: &str,
        slot: i32,
        anchor: &Anchor,
        stage: &mut dyn Stage,
    ) -> bool {
        let normalized = asset_key(key);
        if !self.live.contains_key(&normalized) {
            return false;
        }

        if let Some(occupant) = self.occupancy.get(&slot).cloned()
            && occupant != normalized
        {
            log::debug!(
                "[Portrait] Slot {} taken by '{}', evicting for '{}'",
                slot,
                occupant,
                normalized
            );
            self.evict(&occupant, stage);
        }

        let Some(instance) = self.live.get_mut(&normalized) else {
            return false;
        };
        if let Some(previous) = instance.slot
            && previous != slot
        {
            self.occupancy.remove(&previous);
        }
        instance.slot = Some(slot);
        self.occupancy.insert(slot, normalized.clone());
        stage.attach(instance.handle, anchor);

        log::trace!("[Portrait] '{}' -> slot {} ({})", normalized, slot, anchor.name);
        true
    }

    /// Remove an instance from both maps and destroy its visual
    pub fn evict(&mut self, key: &str, stage: &mut dyn Stage) -> bool {
        let normalized = asset_key(key);
        let Some(instance) = self.live.remove(&normalized) else {
            return false;
        };
        if let Some(slot) = instance.slot {
            self.occupancy.remove(&slot);
        }
        stage.destroy(instance.handle);
        log::debug!("[Portrait] Evicted '{}' ({})", normalized, instance.handle);
        true
    }

    /// Evict every live instance, returning how many were released
    pub fn cleanup_all(&mut self, stage: &mut dyn Stage) -> usize {
        let mut keys: Vec<String> = self.live.keys().cloned().collect();
        keys.sort();
        let count = keys.len();
        for key in keys {
            self.evict(&key, stage);
        }
        if count > 0 {
            log::debug!("[Portrait] Cleaned up {} portraits", count);
        }
        count
    }

    pub fn get(&self, key: &str) -> Option<&PortraitInstance> {
        self.live.get(&asset_key(key))
    }

    /// Instance occupying `slot`
    pub fn occupant(&self, slot: i32) -> Option<&PortraitInstance> {
        self.occupancy.get(&slot).and_then(|key| self.live.get(key))
    }

    pub fn instances(&self) -> impl Iterator<Item = &PortraitInstance> {
        self.live.values()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Whether the key and slot maps agree with each other
    pub fn is_consistent(&self) -> bool {
        let forward = self.live.values().all(|instance| match instance.slot {
            Some(slot) => self.occupancy.get(&slot) == Some(&instance.key),
            None => true,
        });
        let backward = self.occupancy.iter().all(|(slot, key)| {
            self.live
                .get(key)
                .is_some_and(|instance| instance.slot == Some(*slot))
        });
        forward && backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{MemoryStage, PortraitTemplate};
    use glam::Vec3;

    fn registry() -> AssetRegistry {
        let mut registry = AssetRegistry::new();
        registry.register_portrait(PortraitTemplate::new("p1", "p1.png"));
        registry.register_portrait(PortraitTemplate::new("p2", "p2.png"));
        registry
    }

    fn anchor(name: &str) -> Anchor {
        Anchor::new(name, Vec3::ZERO)
    }

    #[test]
    fn ensure_creates_once_per_key() {
        let registry = registry();
        let mut stage = MemoryStage::new();
        let mut diagnostics = Diagnostics::new();
        let mut slots = PortraitSlots::new();

        let first = slots
            .ensure("P1", &registry, &mut stage, &mut diagnostics)
            .unwrap()
            .handle();
        let second = slots
            .ensure(" p1 ", &registry, &mut stage, &mut diagnostics)
            .unwrap()
            .handle();

        assert_eq!(first, second);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.get("p1").unwrap().slot(), None);
        assert_eq!(stage.visual_count(), 1);
    }

    #[test]
    fn ensure_unregistered_key_is_soft_failure() {
        let registry = registry();
        let mut stage = MemoryStage::new();
        let mut diagnostics = Diagnostics::new();
        let mut slots = PortraitSlots::new();

        assert!(
            slots
                .ensure("ghost", &registry, &mut stage, &mut diagnostics)
                .is_none()
        );
        assert_eq!(
            diagnostics.take(),
            vec![Diagnostic::MissingTemplate {
                key: "ghost".to_string()
            }]
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn assigning_occupied_slot_evicts_previous_occupant() {
        let registry = registry();
        let mut stage = MemoryStage::new();
        let mut diagnostics = Diagnostics::new();
        let mut slots = PortraitSlots::new();

        let p1 = slots
            .ensure("p1", &registry, &mut stage, &mut diagnostics)
            .unwrap()
            .handle();
        let p2 = slots
            .ensure("p2", &registry, &mut stage, &mut diagnostics)
            .unwrap()
            .handle();
        assert!(slots.assign_slot("p1", 0, &anchor("center"), &mut stage));
        stage.set_local_position(p2, Vec3::new(9.0, 9.0, 0.0));

        assert!(slots.assign_slot("p2", 0, &anchor("center"), &mut stage));

        assert!(slots.get("p1").is_none());
        assert!(!stage.is_alive(p1));
        assert_eq!(slots.occupant(0).unwrap().handle(), p2);
        let visual = stage.visual(p2).unwrap();
        assert_eq!(visual.parent.as_deref(), Some("center"));
        assert!(visual.is_neutral());
        assert!(slots.is_consistent());
    }

    #[test]
    fn moving_instance_clears_old_slot_without_teardown() {
        let registry = registry();
        let mut stage = MemoryStage::new();
        let mut diagnostics = Diagnostics::new();
        let mut slots = PortraitSlots::new();

        let p1 = slots
            .ensure("p1", &registry, &mut stage, &mut diagnostics)
            .unwrap()
            .handle();
        slots.assign_slot("p1", 0, &anchor("left"), &mut stage);
        slots.assign_slot("p1", 2, &anchor("right"), &mut stage);

        assert!(slots.occupant(0).is_none());
        assert_eq!(slots.occupant(2).unwrap().handle(), p1);
        assert!(stage.is_alive(p1));
        assert!(stage.destroyed().is_empty());
        assert!(slots.is_consistent());
    }

    #[test]
    fn reassigning_same_slot_keeps_instance() {
        let registry = registry();
        let mut stage = MemoryStage::new();
        let mut diagnostics = Diagnostics::new();
        let mut slots = PortraitSlots::new();

        slots.ensure("p1", &registry, &mut stage, &mut diagnostics);
        slots.assign_slot("p1", 1, &anchor("mid"), &mut stage);
        slots.assign_slot("p1", 1, &anchor("mid"), &mut stage);

        assert_eq!(slots.len(), 1);
        assert_eq!(slots.get("p1").unwrap().slot(), Some(1));
        assert!(slots.is_consistent());
    }

    #[test]
    fn assign_slot_for_unknown_key_is_rejected() {
        let mut stage = MemoryStage::new();
        let mut slots = PortraitSlots::new();
        assert!(!slots.assign_slot("nobody", 0, &anchor("left"), &mut stage));
        assert!(slots.occupant(0).is_none());
    }

    #[test]
    fn cleanup_all_destroys_everything() {
        let registry = registry();
        let mut stage = MemoryStage::new();
        let mut diagnostics = Diagnostics::new();
        let mut slots = PortraitSlots::new();

        slots.ensure("p1", &registry, &mut stage, &mut diagnostics);
        slots.ensure("p2", &registry, &mut stage, &mut diagnostics);
        slots.assign_slot("p2", 3, &anchor("far"), &mut stage);

        assert_eq!(slots.cleanup_all(&mut stage), 2);
        assert!(slots.is_empty());
        assert!(slots.occupant(3).is_none());
        assert_eq!(stage.visual_count(), 0);
        assert_eq!(slots.cleanup_all(&mut stage), 0);
    }
}
