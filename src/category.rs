//! Category registry: user labels with a display colour.
//!
//! Tasks reference categories by id only. Nothing here cascades into the task
//! collection, so deleting a category leaves any references dangling.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::db::Storage;
use crate::store::Lookup;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Hex colour such as `#3B82F6`.
    pub color: String,
}

impl Category {
    fn new(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// Colour given to a category created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6B7280";

/// The five categories present before any user action.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("default_1", "Work", "#3B82F6"),
        Category::new("default_2", "Personal", "#10B981"),
        Category::new("default_3", "Study", "#8B5CF6"),
        Category::new("default_4", "Exercise", "#F59E0B"),
        Category::new("default_5", "Hobby", "#EF4444"),
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Accepts `#RGB` or `#RRGGBB`.
pub fn is_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

pub struct CategoryRegistry {
    categories: Vec<Category>,
    storage: Rc<dyn Storage>,
    clock: Rc<dyn Clock>,
    next_seq: u64,
}

impl CategoryRegistry {
    /// Load from storage; an empty or unreadable collection yields the defaults.
    pub fn load(storage: Rc<dyn Storage>, clock: Rc<dyn Clock>) -> Self {
        let categories = match storage.categories() {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => default_categories(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load categories, using defaults");
                default_categories()
            }
        };
        Self {
            categories,
            storage,
            clock,
            next_seq: 1,
        }
    }

    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Display name for a category id, if it still resolves.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }

    pub fn add(&mut self, name: &str, color: &str) -> String {
        let id = self.generate_id();
        self.categories.push(Category::new(&id, name, color));
        tracing::debug!(%id, name, "category added");
        self.save();
        id
    }

    pub fn update(&mut self, id: &str, patch: CategoryPatch) -> Lookup<()> {
        let Some(category) = self.categories.iter_mut().find(|c| c.id == id) else {
            return Lookup::NotFound;
        };
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(color) = patch.color {
            category.color = color;
        }
        self.save();
        Lookup::Found(())
    }

    pub fn delete(&mut self, id: &str) -> Lookup<()> {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        if self.categories.len() == before {
            return Lookup::NotFound;
        }
        tracing::debug!(%id, "category deleted");
        self.save();
        Lookup::Found(())
    }

    /// Re-read the collection, e.g. after an import.
    pub fn reload(&mut self) {
        let fresh = Self::load(Rc::clone(&self.storage), Rc::clone(&self.clock));
        self.categories = fresh.categories;
    }

    fn generate_id(&mut self) -> String {
        loop {
            let id = format!("category_{}_{}", self.clock.now_ms(), self.next_seq);
            self.next_seq += 1;
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn save(&self) {
        if let Err(e) = self.storage.set_categories(&self.categories) {
            tracing::error!(error = %e, "failed to save categories");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::db::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn registry() -> (Rc<MemoryStorage>, CategoryRegistry) {
        let storage = Rc::new(MemoryStorage::default());
        let clock = Rc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap()));
        let reg = CategoryRegistry::load(storage.clone(), clock);
        (storage, reg)
    }

    #[test]
    fn defaults_present_before_any_action() {
        let (_, reg) = registry();
        let ids: Vec<&str> = reg.all().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["default_1", "default_2", "default_3", "default_4", "default_5"]);
    }

    #[test]
    fn add_update_delete_write_through() {
        let (storage, mut reg) = registry();
        let id = reg.add("Errands", "#123456");
        assert!(id.starts_with("category_"));
        assert_eq!(storage.categories().unwrap().len(), 6);

        let found = reg.update(
            &id,
            CategoryPatch {
                color: Some("#abcdef".into()),
                ..CategoryPatch::default()
            },
        );
        assert!(found.is_found());
        assert_eq!(reg.get(&id).unwrap().color, "#abcdef");
        assert_eq!(reg.get(&id).unwrap().name, "Errands");

        assert!(reg.delete("default_2").is_found());
        assert!(reg.delete("default_2").is_not_found());
        let stored = storage.categories().unwrap();
        assert_eq!(stored.len(), 5);
        assert!(stored.iter().all(|c| c.id != "default_2"));
    }

    #[test]
    fn ids_are_unique_within_one_millisecond() {
        let (_, mut reg) = registry();
        let a = reg.add("A", "#000");
        let b = reg.add("B", "#fff");
        assert_ne!(a, b);
    }

    #[test]
    fn stored_collection_replaces_defaults() {
        let storage = Rc::new(MemoryStorage::default());
        storage
            .set_categories(&[Category::new("c1", "Only", "#111111")])
            .unwrap();
        let clock = Rc::new(ManualClock::new(Utc::now()));
        let reg = CategoryRegistry::load(storage, clock);
        assert_eq!(reg.all().len(), 1);
        assert_eq!(reg.name_of("c1"), Some("Only"));
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#3B82F6"));
        assert!(is_hex_color("#fff"));
        assert!(!is_hex_color("3B82F6"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#zzzzzz"));
    }
}
