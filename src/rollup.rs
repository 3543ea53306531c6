//! Cross-entity category rollup and selection menus
//!
//! Counts, per source and category, how many entities carry at least one
//! feature of that category. The rollup is always rebuilt from the current
//! bundles, never patched, so two builds over the same entities are equal.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Bundle, Entity};
use crate::store::DEFAULT_DISPLAY_CATEGORY;

/// source → category → entity count
pub type Rollup = BTreeMap<String, BTreeMap<String, usize>>;

/// Value of the "no category selected" menu entry
pub const NONE_SELECTION: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFamily {
    Keywords,
    Positional,
}

impl CategoryFamily {
    fn categories<'b>(&self, bundle: &'b Bundle) -> Box<dyn Iterator<Item = &'b String> + 'b> {
        match self {
            Self::Keywords => Box::new(bundle.keywords().into_iter().flat_map(|m| m.keys())),
            Self::Positional => Box::new(bundle.positional().into_iter().flat_map(|m| m.keys())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationRollup {
    pub positional: Rollup,
    pub keywords: Rollup,

    /// Whether any entity carries manually curated positional features
    pub has_custom_annotations: bool,
}

impl AnnotationRollup {
    pub fn build(entities: &[Entity]) -> Self {
        Self {
            positional: count(entities, CategoryFamily::Positional),
            keywords: count(entities, CategoryFamily::Keywords),
            has_custom_annotations: entities.iter().any(Entity::has_custom_annotations),
        }
    }

    pub fn family(&self, family: CategoryFamily) -> &Rollup {
        match family {
            CategoryFamily::Keywords => &self.keywords,
            CategoryFamily::Positional => &self.positional,
        }
    }

    /// Positional category menu
    ///
    /// Curated annotations take precedence as the default display, otherwise
    /// the structural `miscellaneous` category is preselected when present.
    pub fn positional_menu(&self) -> Menu {
        let none_label = if self.has_custom_annotations {
            "None or custom"
        } else {
            "None"
        };

        let has_default = self
            .positional
            .values()
            .any(|categories| categories.contains_key(DEFAULT_DISPLAY_CATEGORY));
        let default_selection = if !self.has_custom_annotations && has_default {
            DEFAULT_DISPLAY_CATEGORY
        } else {
            NONE_SELECTION
        };

        Menu::from_rollup(&self.positional, none_label, default_selection)
    }

    pub fn keyword_menu(&self) -> Menu {
        Menu::from_rollup(&self.keywords, "None", NONE_SELECTION)
    }
}

fn count(entities: &[Entity], family: CategoryFamily) -> Rollup {
    let mut rollup = Rollup::new();
    for entity in entities {
        for (source, bundle) in &entity.bundles {
            for category in family.categories(bundle) {
                *rollup
                    .entry(source.clone())
                    .or_default()
                    .entry(category.clone())
                    .or_default() += 1;
            }
        }
    }
    rollup
}

/// Grouped listing handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub none_label: String,
    pub default_selection: String,
    pub groups: Vec<MenuGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuGroup {
    pub source: String,
    pub options: Vec<MenuOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuOption {
    pub category: String,
    pub count: usize,
    pub label: String,
}

impl Menu {
    fn from_rollup(rollup: &Rollup, none_label: &str, default_selection: &str) -> Self {
        let groups = rollup
            .iter()
            .map(|(source, categories)| MenuGroup {
                source: source.clone(),
                options: categories
                    .iter()
                    .map(|(category, &count)| MenuOption {
                        category: category.clone(),
                        count,
                        label: format!("{count} annotated proteins"),
                    })
                    .collect(),
            })
            .collect();

        Self {
            none_label: none_label.to_string(),
            default_selection: default_selection.to_string(),
            groups,
        }
    }
}
