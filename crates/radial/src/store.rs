use sectors::{CommandToken, ItemId, MenuConfiguration, MenuItem};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A named list of items that can be dragged onto the ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteGroup {
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// Bounds on the number of sectors a ring may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingPolicy {
    pub min_items: usize,
    pub max_items: usize,
}

impl RingPolicy {
    pub fn new(min_items: usize, max_items: usize) -> Self {
        Self {
            min_items,
            max_items,
        }
    }

    pub fn can_remove(&self, count: usize) -> bool {
        count > self.min_items
    }

    pub fn can_insert(&self, count: usize) -> bool {
        count < self.max_items
    }
}

impl Default for RingPolicy {
    fn default() -> Self {
        Self::new(2, 12)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("No menu configuration at index {0}")]
    IndexOutOfRange(usize),
    #[error("Cannot delete the last menu configuration")]
    LastConfiguration,
    #[error("Ring already holds the maximum of {0} items")]
    RingFull(usize),
    #[error("Ring must keep at least {0} items")]
    RingMinimum(usize),
    #[error("Item '{0}' is already on the ring")]
    DuplicateItem(ItemId),
}

/// All editable menu state: the configurations, which one is active, and the
/// palette. The active ring is read and written only through
/// [`MenuStore::menu_items`] and [`MenuStore::set_menu_items`].
#[derive(Debug, Clone)]
pub struct MenuStore {
    configurations: Vec<MenuConfiguration>,
    active: usize,
    palette: Vec<PaletteGroup>,
    template: Vec<MenuItem>,
    policy: RingPolicy,
    // Never pruned: a deleted id that comes back keeps its old position.
    render_keys: HashMap<ItemId, u64>,
    next_key: u64,
}

impl MenuStore {
    pub fn new(
        configurations: Vec<MenuConfiguration>,
        palette: Vec<PaletteGroup>,
        template: Vec<MenuItem>,
        policy: RingPolicy,
    ) -> Self {
        let mut store = Self {
            configurations,
            active: 0,
            palette,
            template,
            policy,
            render_keys: HashMap::new(),
            next_key: 0,
        };
        if store.configurations.is_empty() {
            store.add_configuration();
        }
        let ids: Vec<ItemId> = store
            .configurations
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.id.clone()))
            .collect();
        store.assign_render_keys(ids);
        store
    }

    pub fn menu_items(&self) -> &[MenuItem] {
        &self.active_menu().items
    }

    pub fn set_menu_items(&mut self, items: Vec<MenuItem>) {
        self.assign_render_keys(items.iter().map(|i| i.id.clone()).collect());
        self.configurations[self.active].items = items;
    }

    pub fn active_menu(&self) -> &MenuConfiguration {
        &self.configurations[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn configurations(&self) -> &[MenuConfiguration] {
        &self.configurations
    }

    pub fn switch_active(&mut self, index: usize) -> Result<(), StoreError> {
        if index >= self.configurations.len() {
            return Err(StoreError::IndexOutOfRange(index));
        }
        self.active = index;
        Ok(())
    }

    /// Appends a configuration seeded from the template and returns its index.
    pub fn add_configuration(&mut self) -> usize {
        let n = self.configurations.len();
        self.configurations.push(MenuConfiguration {
            name: format!("New Radial Menu-{n}"),
            command: CommandToken::new(format!("radial: menu-{n}")),
            items: self.template.clone(),
        });
        self.assign_render_keys(self.template.iter().map(|i| i.id.clone()).collect());
        n
    }

    pub fn delete_configuration(&mut self, index: usize) -> Result<MenuConfiguration, StoreError> {
        if index >= self.configurations.len() {
            return Err(StoreError::IndexOutOfRange(index));
        }
        if self.configurations.len() == 1 {
            return Err(StoreError::LastConfiguration);
        }
        let removed = self.configurations.remove(index);
        if index < self.active || self.active >= self.configurations.len() {
            self.active -= 1;
        }
        Ok(removed)
    }

    pub fn palette(&self) -> &[PaletteGroup] {
        &self.palette
    }

    pub fn find_palette_item(&self, id: &ItemId) -> Option<&MenuItem> {
        self.palette
            .iter()
            .flat_map(|g| g.items.iter())
            .find(|item| &item.id == id)
    }

    pub fn policy(&self) -> RingPolicy {
        self.policy
    }

    /// Replaces everything that comes from configuration while keeping the
    /// edited menus.
    pub fn reconfigure(
        &mut self,
        palette: Vec<PaletteGroup>,
        template: Vec<MenuItem>,
        policy: RingPolicy,
    ) {
        self.palette = palette;
        self.template = template;
        self.policy = policy;
    }

    pub fn add_item(&mut self, item: MenuItem) -> Result<(), StoreError> {
        let count = self.menu_items().len();
        if !self.policy.can_insert(count) {
            return Err(StoreError::RingFull(self.policy.max_items));
        }
        if self.active_menu().contains(&item.id) {
            return Err(StoreError::DuplicateItem(item.id));
        }
        let mut items = self.menu_items().to_vec();
        items.push(item);
        self.set_menu_items(items);
        Ok(())
    }

    pub fn remove_last_item(&mut self) -> Result<MenuItem, StoreError> {
        let mut items = self.menu_items().to_vec();
        if !self.policy.can_remove(items.len()) {
            return Err(StoreError::RingMinimum(self.policy.min_items));
        }
        let removed = items.pop().ok_or(StoreError::RingMinimum(self.policy.min_items))?;
        self.set_menu_items(items);
        Ok(removed)
    }

    /// Insertion-order key of an item id, fixed the first time the id was
    /// seen. Used to keep render order stable across reorders.
    pub fn render_key(&self, id: &ItemId) -> Option<u64> {
        self.render_keys.get(id).copied()
    }

    fn assign_render_keys(&mut self, ids: Vec<ItemId>) {
        for id in ids {
            if !self.render_keys.contains_key(&id) {
                self.render_keys.insert(id, self.next_key);
                self.next_key += 1;
            }
        }
    }
}
