//! In-memory board state.
//!
//! Implements `PinboardStoreTrait`: create, update, delete and reorder services
//! and categories, category tag vocabularies, the shared flag vocabulary and
//! per-category tag filters. The store performs no input validation and never
//! touches storage; [`PinboardManager`](super::pinboard_manager::PinboardManager)
//! persists after each call.

use std::collections::{BTreeSet, HashMap, HashSet};

use uuid::Uuid;

use crate::types::category::{Category, CategoryUpdate};
use crate::types::errors::StoreError;
use crate::types::pinboard::PinboardData;
use crate::types::service::{NewService, Service, ServiceUpdate};

/// Filter key for the implicit section of services with no category.
pub const UNCATEGORIZED_ID: &str = "uncategorized";

/// Trait defining board mutation and query operations.
pub trait PinboardStoreTrait {
    fn data(&self) -> &PinboardData;
    fn set_title(&mut self, title: &str);
    fn replace_data(&mut self, data: PinboardData);

    fn add_service(&mut self, service: NewService) -> String;
    fn update_service(&mut self, id: &str, update: ServiceUpdate) -> Result<(), StoreError>;
    fn delete_service(&mut self, id: &str) -> Result<Service, StoreError>;
    fn reorder_services(&mut self, category_name: &str, ordered_ids: &[String]);
    fn reorder_uncategorized(&mut self, ordered_ids: &[String]);
    /// Sets a star rating; selecting the current rating (or 0) clears it. Returns the new rating.
    fn set_rating(&mut self, service_id: &str, category: &str, stars: u8) -> Result<Option<u8>, StoreError>;

    fn add_category(&mut self, name: &str) -> Result<String, StoreError>;
    fn update_category(&mut self, id: &str, update: CategoryUpdate) -> Result<(), StoreError>;
    fn rename_category(&mut self, id: &str, new_name: &str) -> Result<(), StoreError>;
    fn delete_category(&mut self, id: &str) -> Result<Category, StoreError>;
    fn reorder_categories(&mut self, ordered_ids: &[String]);

    fn add_tag_to_category(&mut self, category_id: &str, tag: &str) -> Result<bool, StoreError>;
    fn add_tags_to_category(&mut self, category_id: &str, tags: &[String]) -> Result<Vec<String>, StoreError>;
    fn remove_tag_from_category(&mut self, category_id: &str, tag: &str) -> Result<(), StoreError>;
    fn reorder_category_tags(&mut self, category_id: &str, tags: Vec<String>) -> Result<(), StoreError>;

    fn add_flag(&mut self, flag: &str) -> bool;

    fn toggle_tag_filter(&mut self, category_id: &str, tag: &str) -> bool;
    fn selected_tags(&self, category_id: &str) -> &[String];
    fn clear_tag_filter(&mut self, category_id: &str);

    fn get_service(&self, id: &str) -> Option<&Service>;
    fn get_category(&self, id: &str) -> Option<&Category>;
    fn sorted_categories(&self) -> Vec<&Category>;
    fn services_in_category(&self, category_name: &str) -> Vec<&Service>;
    fn filtered_services(&self, category_id: &str) -> Result<Vec<&Service>, StoreError>;
    fn uncategorized_services(&self) -> Vec<&Service>;
    fn category_members(&self, category_id: &str) -> Result<Vec<String>, StoreError>;
    fn available_service_tags(&self, category_id: &str) -> Result<Vec<String>, StoreError>;
    fn used_flags(&self) -> Vec<String>;
}

/// Board state plus the transient tag filter selections.
pub struct PinboardStore {
    data: PinboardData,
    selected_tags: HashMap<String, Vec<String>>,
}

impl PinboardStore {
    pub fn new(data: PinboardData) -> Self {
        Self {
            data,
            selected_tags: HashMap::new(),
        }
    }

    pub fn into_data(self) -> PinboardData {
        self.data
    }

    fn service_mut(&mut self, id: &str) -> Result<&mut Service, StoreError> {
        self.data
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::ServiceNotFound(id.to_string()))
    }

    fn category_mut(&mut self, id: &str) -> Result<&mut Category, StoreError> {
        self.data
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))
    }

    fn category(&self, id: &str) -> Result<&Category, StoreError> {
        self.get_category(id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))
    }

    /// Drops every available flag no service references anymore. Never adds flags.
    fn prune_flags(&mut self) {
        let used: HashSet<&str> = self
            .data
            .services
            .iter()
            .flat_map(|s| s.flags.iter().map(String::as_str))
            .collect();
        let before = self.data.available_flags.len();
        self.data.available_flags.retain(|f| used.contains(f.as_str()));
        let pruned = before - self.data.available_flags.len();
        if pruned > 0 {
            tracing::debug!(pruned, "pruned unused flags");
        }
    }

    /// Moves the services matching `in_group` to the end of the collection,
    /// in `ordered_ids` order followed by unlisted members, numbered from 0.
    fn reorder_group(&mut self, in_group: impl Fn(&Service) -> bool, ordered_ids: &[String]) {
        let (mut members, others): (Vec<Service>, Vec<Service>) =
            std::mem::take(&mut self.data.services)
                .into_iter()
                .partition(|s| in_group(s));

        let mut reordered = Vec::with_capacity(members.len());
        for id in ordered_ids {
            if let Some(pos) = members.iter().position(|s| &s.id == id) {
                reordered.push(members.remove(pos));
            }
        }
        reordered.append(&mut members);

        for (index, service) in reordered.iter_mut().enumerate() {
            service.order = index as i64;
        }

        self.data.services = others;
        self.data.services.extend(reordered);
    }

    fn sorted_by_order<'a>(mut services: Vec<&'a Service>) -> Vec<&'a Service> {
        services.sort_by_key(|s| s.order);
        services
    }
}

impl Default for PinboardStore {
    fn default() -> Self {
        Self::new(PinboardData::default())
    }
}

impl PinboardStoreTrait for PinboardStore {
    fn data(&self) -> &PinboardData {
        &self.data
    }

    fn set_title(&mut self, title: &str) {
        self.data.title = title.to_string();
    }

    /// Replaces the whole board, as an import does. Filter selections are reset.
    fn replace_data(&mut self, data: PinboardData) {
        self.data = data;
        self.selected_tags.clear();
    }

    /// Appends a service with a fresh id. Its order is the number of services
    /// already sharing any of its categories.
    fn add_service(&mut self, service: NewService) -> String {
        let id = Uuid::new_v4().to_string();
        let order = self
            .data
            .services
            .iter()
            .filter(|s| s.categories.iter().any(|c| service.categories.contains(c)))
            .count() as i64;

        self.data.services.push(Service {
            id: id.clone(),
            name: service.name,
            url: service.url,
            description: service.description,
            categories: service.categories,
            flags: service.flags,
            tags: service.tags,
            category_tags: service.category_tags,
            ratings: service.ratings,
            order,
            color_intensity: service.color_intensity,
        });
        tracing::debug!(%id, order, "added service");
        id
    }

    fn update_service(&mut self, id: &str, update: ServiceUpdate) -> Result<(), StoreError> {
        update.apply_to(self.service_mut(id)?);
        self.prune_flags();
        Ok(())
    }

    fn delete_service(&mut self, id: &str) -> Result<Service, StoreError> {
        let pos = self
            .data
            .services
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::ServiceNotFound(id.to_string()))?;
        let removed = self.data.services.remove(pos);
        self.prune_flags();
        Ok(removed)
    }

    fn reorder_services(&mut self, category_name: &str, ordered_ids: &[String]) {
        self.reorder_group(|s| s.in_category(category_name), ordered_ids);
    }

    fn reorder_uncategorized(&mut self, ordered_ids: &[String]) {
        self.reorder_group(Service::is_uncategorized, ordered_ids);
    }

    fn set_rating(&mut self, service_id: &str, category: &str, stars: u8) -> Result<Option<u8>, StoreError> {
        let service = self.service_mut(service_id)?;
        if stars == 0 || service.rating_in(category) == Some(stars) {
            service.ratings.remove(category);
            return Ok(None);
        }
        service.ratings.insert(category.to_string(), stars);
        Ok(Some(stars))
    }

    /// Appends a category. Names are the join key, so a name already in use is rejected.
    fn add_category(&mut self, name: &str) -> Result<String, StoreError> {
        if self.data.categories.iter().any(|c| c.name == name) {
            return Err(StoreError::DuplicateCategory(name.to_string()));
        }
        let id = Uuid::new_v4().to_string();
        self.data.categories.push(Category {
            id: id.clone(),
            name: name.to_string(),
            order: self.data.categories.len() as i64,
            hue: None,
            tags: Vec::new(),
        });
        Ok(id)
    }

    /// Merges `update` into the category. A name change goes through [`rename_category`].
    ///
    /// [`rename_category`]: PinboardStoreTrait::rename_category
    fn update_category(&mut self, id: &str, update: CategoryUpdate) -> Result<(), StoreError> {
        self.category(id)?;
        if let Some(name) = update.name.as_deref() {
            self.rename_category(id, name)?;
        }
        let category = self.category_mut(id)?;
        if let Some(order) = update.order {
            category.order = order;
        }
        if let Some(hue) = update.hue {
            category.hue = hue;
        }
        if let Some(tags) = update.tags {
            category.tags = tags;
        }
        Ok(())
    }

    /// Renames a category and migrates every service's membership, per-category
    /// tags and ratings from the old name to the new one.
    fn rename_category(&mut self, id: &str, new_name: &str) -> Result<(), StoreError> {
        let old_name = self.category(id)?.name.clone();
        if old_name == new_name {
            return Ok(());
        }
        if self
            .data
            .categories
            .iter()
            .any(|c| c.id != id && c.name == new_name)
        {
            return Err(StoreError::DuplicateCategory(new_name.to_string()));
        }

        self.category_mut(id)?.name = new_name.to_string();

        let mut migrated = 0usize;
        for service in self.data.services.iter_mut() {
            if !service.in_category(&old_name) {
                continue;
            }
            migrated += 1;
            let already_member = service.in_category(new_name);
            service.categories.retain(|c| c != &old_name || !already_member);
            for c in service.categories.iter_mut().filter(|c| **c == old_name) {
                *c = new_name.to_string();
            }

            if let Some(tags) = service.category_tags.remove(&old_name) {
                let target = service.category_tags.entry(new_name.to_string()).or_default();
                for tag in tags {
                    if !target.contains(&tag) {
                        target.push(tag);
                    }
                }
            }
            if let Some(rating) = service.ratings.remove(&old_name) {
                service.ratings.entry(new_name.to_string()).or_insert(rating);
            }
        }
        tracing::info!(%old_name, %new_name, migrated, "renamed category");
        Ok(())
    }

    /// Removes a category and detaches its name from every service. Services are kept.
    fn delete_category(&mut self, id: &str) -> Result<Category, StoreError> {
        let pos = self
            .data
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))?;
        let removed = self.data.categories.remove(pos);
        for service in self.data.services.iter_mut() {
            service.categories.retain(|c| c != &removed.name);
        }
        self.selected_tags.remove(id);
        Ok(removed)
    }

    fn reorder_categories(&mut self, ordered_ids: &[String]) {
        let mut remaining = std::mem::take(&mut self.data.categories);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in ordered_ids {
            if let Some(pos) = remaining.iter().position(|c| &c.id == id) {
                reordered.push(remaining.remove(pos));
            }
        }
        reordered.append(&mut remaining);
        for (index, category) in reordered.iter_mut().enumerate() {
            category.order = index as i64;
        }
        self.data.categories = reordered;
    }

    fn add_tag_to_category(&mut self, category_id: &str, tag: &str) -> Result<bool, StoreError> {
        let added = self.add_tags_to_category(category_id, &[tag.to_string()])?;
        Ok(!added.is_empty())
    }

    /// Appends trimmed, non-empty tags not already in the vocabulary. Returns the tags added.
    fn add_tags_to_category(&mut self, category_id: &str, tags: &[String]) -> Result<Vec<String>, StoreError> {
        let category = self.category_mut(category_id)?;
        let mut added = Vec::new();
        for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !category.tags.iter().any(|t| t == tag) {
                category.tags.push(tag.to_string());
                added.push(tag.to_string());
            }
        }
        Ok(added)
    }

    /// Removes a tag from the vocabulary and from the category's filter selection.
    /// Services keep the tag in their `categoryTags`.
    fn remove_tag_from_category(&mut self, category_id: &str, tag: &str) -> Result<(), StoreError> {
        self.category_mut(category_id)?.tags.retain(|t| t != tag);
        if let Some(selected) = self.selected_tags.get_mut(category_id) {
            selected.retain(|t| t != tag);
        }
        Ok(())
    }

    fn reorder_category_tags(&mut self, category_id: &str, tags: Vec<String>) -> Result<(), StoreError> {
        self.category_mut(category_id)?.tags = tags;
        Ok(())
    }

    /// Registers a flag in the shared vocabulary. Returns `false` if it was already present.
    fn add_flag(&mut self, flag: &str) -> bool {
        if self.data.available_flags.iter().any(|f| f == flag) {
            return false;
        }
        self.data.available_flags.push(flag.to_string());
        true
    }

    /// Toggles `tag` in the category's filter selection. Returns whether it is now selected.
    fn toggle_tag_filter(&mut self, category_id: &str, tag: &str) -> bool {
        let selected = self.selected_tags.entry(category_id.to_string()).or_default();
        if let Some(pos) = selected.iter().position(|t| t == tag) {
            selected.remove(pos);
            false
        } else {
            selected.push(tag.to_string());
            true
        }
    }

    fn selected_tags(&self, category_id: &str) -> &[String] {
        self.selected_tags
            .get(category_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn clear_tag_filter(&mut self, category_id: &str) {
        self.selected_tags.remove(category_id);
    }

    fn get_service(&self, id: &str) -> Option<&Service> {
        self.data.services.iter().find(|s| s.id == id)
    }

    fn get_category(&self, id: &str) -> Option<&Category> {
        self.data.categories.iter().find(|c| c.id == id)
    }

    fn sorted_categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.data.categories.iter().collect();
        categories.sort_by_key(|c| c.order);
        categories
    }

    fn services_in_category(&self, category_name: &str) -> Vec<&Service> {
        Self::sorted_by_order(
            self.data
                .services
                .iter()
                .filter(|s| s.in_category(category_name))
                .collect(),
        )
    }

    /// A section's services after its tag filter: with tags selected, a service
    /// is shown when any of its tags is selected.
    fn filtered_services(&self, category_id: &str) -> Result<Vec<&Service>, StoreError> {
        let services = if category_id == UNCATEGORIZED_ID {
            self.uncategorized_services()
        } else {
            let name = &self.category(category_id)?.name;
            self.services_in_category(name)
        };
        let selected = self.selected_tags(category_id);
        if selected.is_empty() {
            return Ok(services);
        }
        Ok(services
            .into_iter()
            .filter(|s| s.tags.iter().any(|t| selected.contains(t)))
            .collect())
    }

    fn uncategorized_services(&self) -> Vec<&Service> {
        Self::sorted_by_order(
            self.data
                .services
                .iter()
                .filter(|s| s.is_uncategorized())
                .collect(),
        )
    }

    /// Ids of the services joined to the category by name, in display order.
    fn category_members(&self, category_id: &str) -> Result<Vec<String>, StoreError> {
        let name = &self.category(category_id)?.name;
        Ok(self
            .services_in_category(name)
            .into_iter()
            .map(|s| s.id.clone())
            .collect())
    }

    /// Sorted tags carried by the category's services that its vocabulary lacks.
    fn available_service_tags(&self, category_id: &str) -> Result<Vec<String>, StoreError> {
        let category = self.category(category_id)?;
        let tags: BTreeSet<&String> = self
            .services_in_category(&category.name)
            .into_iter()
            .flat_map(|s| s.tags.iter())
            .filter(|t| !category.tags.contains(t))
            .collect();
        Ok(tags.into_iter().cloned().collect())
    }

    /// Available flags that at least one service carries, in vocabulary order.
    fn used_flags(&self) -> Vec<String> {
        self.data
            .available_flags
            .iter()
            .filter(|f| self.data.services.iter().any(|s| s.flags.contains(f)))
            .cloned()
            .collect()
    }
}
