//! Entity annotation store
//!
//! Owns every entity of a run, in load order, and the bundles attached to
//! them. Only the active scheduler mutates it.

use std::collections::HashMap;

use crate::classifier::strategy::SUPERFAMILY;
use crate::models::{Bundle, Entity};

/// Positional category shown by default for structural-domain bundles
pub const DEFAULT_DISPLAY_CATEGORY: &str = "miscellaneous";

#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
}

impl AnnotationStore {
    pub fn new(entities: Vec<Entity>) -> Self {
        let mut store = Self::default();
        for entity in entities {
            store.insert(entity);
        }
        store
    }

    /// Add an entity, replacing any earlier entity with the same id in place
    pub fn insert(&mut self, entity: Entity) {
        match self.index.get(&entity.id) {
            Some(&idx) => self.entities[idx] = entity,
            None => {
                self.index.insert(entity.id.clone(), self.entities.len());
                self.entities.push(entity);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&idx| &self.entities[idx])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.index.get(id).map(|&idx| &mut self.entities[idx])
    }

    /// Entities in load order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Attach a source's bundle to the entity at `idx`
    ///
    /// A later bundle for the same source replaces the earlier one.
    pub fn attach_bundle(&mut self, idx: usize, source: &str, bundle: Bundle) {
        let Some(entity) = self.entities.get_mut(idx) else {
            return;
        };

        if source == SUPERFAMILY && !entity.has_custom_annotations() {
            if let Some(features) = bundle
                .positional()
                .and_then(|p| p.get(DEFAULT_DISPLAY_CATEGORY))
            {
                entity.displayed_features = Some(features.clone());
            }
        }

        entity.bundles.insert(source.to_string(), bundle);
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }
}
