//! Asset Registry - Append-Only Tables and Derived Indices
//!
//! The registry owns every primary table (assets, parts, interned names)
//! and every derived index. Registration is the single mutating entry
//! point for content; all checks run before the first write, so a failed
//! registration leaves the registry exactly as it found it. Disabling an
//! asset flips a visibility flag and nothing else.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::access::AllowList;
use crate::error::{RegistryError, Result};
use crate::interner::StringTable;
use crate::validation::Validator;

pub type GroupId = u32;
pub type CategoryId = u32;
pub type AssetId = u32;
pub type PartId = u32;

/// One colored path fragment as submitted for registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDefinition {
    pub body: Vec<u8>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A complete asset submission.
///
/// `parts` order is rendering z-order and is preserved exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDefinition {
    pub group: String,
    pub category: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub minter: String,
    #[serde(default)]
    pub soulbound: Option<String>,
    pub parts: Vec<PartDefinition>,
}

impl AssetDefinition {
    /// Load every readable `*.json` definition in `dir`, in file-name
    /// order. Unreadable or malformed entries are skipped.
    pub fn load_dir(dir: &Path) -> std::io::Result<Vec<AssetDefinition>> {
        let mut definitions = Vec::new();
        if dir.exists() {
            let mut paths: Vec<_> = fs::read_dir(dir)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().map_or(false, |e| e == "json"))
                .collect();
            paths.sort();
            for path in paths {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(definition) = serde_json::from_str::<AssetDefinition>(&content) {
                        definitions.push(definition);
                    }
                }
            }
        }
        Ok(definitions)
    }
}

/// A registered asset. Immutable except for the visibility flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    pub group: GroupId,
    pub category: CategoryId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub minter: String,
    pub soulbound: Option<String>,
    pub parts: Vec<PartId>,
    pub disabled: bool,
}

/// A registered path fragment. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub body: Vec<u8>,
    pub color: Option<String>,
}

/// Registration notification for external observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationEvent {
    pub asset_id: AssetId,
    pub submitter: String,
    pub at: DateTime<Utc>,
}

/// Per-(group, category) derived index: ordered asset ids plus a direct
/// name lookup. Updated only while registering.
#[derive(Debug, Clone, Default, PartialEq)]
struct CategoryIndex {
    ordered: Vec<AssetId>,
    by_name: HashMap<String, AssetId>,
}

/// The shared, append-only asset store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetRegistry {
    groups: StringTable,
    /// Category table for group id `g` lives at `g - 1`.
    categories: Vec<StringTable>,
    assets: Vec<Asset>,
    parts: Vec<Part>,
    index: HashMap<(GroupId, CategoryId), CategoryIndex>,
    allow_list: AllowList,
    events: Vec<RegistrationEvent>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one asset.
    ///
    /// Every fallible check (access, charset, duplicate, group/category
    /// pre-flight) runs before the first write. Group and category names
    /// are charset-checked here only when not already interned; a name
    /// the table has accepted before is never re-validated.
    pub fn register(
        &mut self,
        definition: &AssetDefinition,
        submitter: &str,
        validator: &dyn Validator,
    ) -> Result<AssetId> {
        if !self.allow_list.permits(submitter) {
            return Err(RegistryError::AccessDenied(submitter.to_string()));
        }

        if !validator.validate(definition.name.as_bytes()) {
            return Err(RegistryError::Validation(definition.name.clone()));
        }
        for part in &definition.parts {
            if let Some(color) = &part.color {
                if !validator.validate(color.as_bytes()) {
                    return Err(RegistryError::Validation(color.clone()));
                }
            }
        }

        let group_id = self.groups.id_of(&definition.group).ok();
        let category_id = match group_id {
            Some(g) => self.category_table(g).id_of(&definition.category).ok(),
            None => {
                if !validator.validate(definition.group.as_bytes()) {
                    return Err(RegistryError::Validation(definition.group.clone()));
                }
                None
            }
        };
        if category_id.is_none()
            && !validator.validate(definition.category.as_bytes())
        {
            return Err(RegistryError::Validation(definition.category.clone()));
        }

        if let (Some(g), Some(c)) = (group_id, category_id) {
            let taken = self
                .index
                .get(&(g, c))
                .map_or(false, |idx| idx.by_name.contains_key(&definition.name));
            if taken {
                return Err(RegistryError::Duplicate(format!(
                    "{}/{}/{}",
                    definition.group, definition.category, definition.name
                )));
            }
        }

        // All checks passed; everything below is infallible.
        let (group_id, created) = self
            .groups
            .intern_or_create(&definition.group, validator)?;
        if created {
            self.categories.push(StringTable::new());
        }
        let (category_id, _) = self.categories[(group_id - 1) as usize]
            .intern_or_create(&definition.category, validator)?;

        let mut part_ids = Vec::with_capacity(definition.parts.len());
        for part in &definition.parts {
            self.parts.push(Part {
                body: part.body.clone(),
                color: part.color.clone(),
            });
            part_ids.push(self.parts.len() as PartId);
        }

        let asset_id = (self.assets.len() + 1) as AssetId;
        self.assets.push(Asset {
            group: group_id,
            category: category_id,
            name: definition.name.clone(),
            width: definition.width,
            height: definition.height,
            minter: definition.minter.clone(),
            soulbound: definition.soulbound.clone(),
            parts: part_ids,
            disabled: false,
        });

        let entry = self.index.entry((group_id, category_id)).or_default();
        entry.ordered.push(asset_id);
        entry.by_name.insert(definition.name.clone(), asset_id);

        self.events.push(RegistrationEvent {
            asset_id,
            submitter: submitter.to_string(),
            at: Utc::now(),
        });
        info!(
            asset = asset_id,
            coordinate = %format!(
                "{}/{}/{}",
                definition.group, definition.category, definition.name
            ),
            submitter = %submitter,
            "Registered asset"
        );

        Ok(asset_id)
    }

    /// Register several assets, one outcome per item.
    ///
    /// Each item is atomic on its own; the batch is deliberately not.
    /// A failed item contributes nothing, and items before and after it
    /// stand or fall independently.
    pub fn register_batch(
        &mut self,
        definitions: &[AssetDefinition],
        submitter: &str,
        validator: &dyn Validator,
    ) -> Vec<Result<AssetId>> {
        definitions
            .iter()
            .map(|definition| self.register(definition, submitter, validator))
            .collect()
    }

    // --- Enumeration and lookup (all pure) ---

    pub fn group_count(&self) -> u32 {
        self.groups.len()
    }

    /// Group name at 0-based position `index`.
    pub fn group_name_at(&self, index: u32) -> Result<&str> {
        self.groups.name_at(index)
    }

    pub fn category_count(&self, group: &str) -> Result<u32> {
        let g = self.groups.id_of(group)?;
        Ok(self.category_table(g).len())
    }

    /// Category name at 0-based position `index` within `group`.
    pub fn category_name_at(&self, group: &str, index: u32) -> Result<&str> {
        let g = self.groups.id_of(group)?;
        self.category_table(g).name_at(index)
    }

    pub fn asset_count(&self, group: &str, category: &str) -> Result<u32> {
        let key = self.coordinate(group, category)?;
        Ok(self.index.get(&key).map_or(0, |idx| idx.ordered.len() as u32))
    }

    /// Asset id at 0-based ordinal `index` within (group, category).
    pub fn asset_id_at(&self, group: &str, category: &str, index: u32) -> Result<AssetId> {
        let key = self.coordinate(group, category)?;
        let ordered = self
            .index
            .get(&key)
            .map(|idx| idx.ordered.as_slice())
            .unwrap_or_default();
        ordered
            .get(index as usize)
            .copied()
            .ok_or(RegistryError::OutOfRange {
                index,
                count: ordered.len() as u32,
            })
    }

    /// Direct lookup by (group, category, name).
    pub fn asset_id(&self, group: &str, category: &str, name: &str) -> Result<AssetId> {
        let key = self.coordinate(group, category)?;
        self.index
            .get(&key)
            .and_then(|idx| idx.by_name.get(name))
            .copied()
            .ok_or_else(|| {
                RegistryError::NotFound(format!("{}/{}/{}", group, category, name))
            })
    }

    /// Administrative read: ignores the visibility flag.
    pub fn asset_raw(&self, id: AssetId) -> Result<&Asset> {
        id.checked_sub(1)
            .and_then(|i| self.assets.get(i as usize))
            .ok_or_else(|| RegistryError::NotFound(format!("asset {}", id)))
    }

    /// Public read: a disabled asset is reported exactly like a missing
    /// one.
    pub fn visible_asset(&self, id: AssetId) -> Result<&Asset> {
        let asset = self.asset_raw(id)?;
        if asset.disabled {
            return Err(RegistryError::NotFound(format!("asset {}", id)));
        }
        Ok(asset)
    }

    pub fn part(&self, id: PartId) -> Result<&Part> {
        id.checked_sub(1)
            .and_then(|i| self.parts.get(i as usize))
            .ok_or_else(|| RegistryError::NotFound(format!("part {}", id)))
    }

    pub fn total_assets(&self) -> u32 {
        self.assets.len() as u32
    }

    pub fn total_parts(&self) -> u32 {
        self.parts.len() as u32
    }

    pub fn group_name(&self, group: GroupId) -> Result<&str> {
        group
            .checked_sub(1)
            .and_then(|i| self.groups.name_at(i).ok())
            .ok_or_else(|| RegistryError::NotFound(format!("group id {}", group)))
    }

    pub fn category_name(&self, group: GroupId, category: CategoryId) -> Result<&str> {
        let table = group
            .checked_sub(1)
            .and_then(|i| self.categories.get(i as usize))
            .ok_or_else(|| RegistryError::NotFound(format!("group id {}", group)))?;
        category
            .checked_sub(1)
            .and_then(|i| table.name_at(i).ok())
            .ok_or_else(|| RegistryError::NotFound(format!("category id {}", category)))
    }

    /// Human-readable `group/category/name` path for an asset.
    pub fn describe(&self, id: AssetId) -> Result<String> {
        let asset = self.asset_raw(id)?;
        Ok(format!(
            "{}/{}/{}",
            self.group_name(asset.group)?,
            self.category_name(asset.group, asset.category)?,
            asset.name
        ))
    }

    pub fn events(&self) -> &[RegistrationEvent] {
        &self.events
    }

    // --- Administration ---

    /// Flip an asset's visibility flag. Content is untouched.
    pub fn set_disabled(&mut self, id: AssetId, disabled: bool) -> Result<()> {
        let asset = id
            .checked_sub(1)
            .and_then(|i| self.assets.get_mut(i as usize))
            .ok_or_else(|| RegistryError::NotFound(format!("asset {}", id)))?;
        asset.disabled = disabled;
        info!(asset = id, disabled, "Toggled asset visibility");
        Ok(())
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn allow_list_mut(&mut self) -> &mut AllowList {
        &mut self.allow_list
    }

    // --- Internals ---

    fn category_table(&self, group: GroupId) -> &StringTable {
        &self.categories[(group - 1) as usize]
    }

    fn coordinate(&self, group: &str, category: &str) -> Result<(GroupId, CategoryId)> {
        let g = self.groups.id_of(group)?;
        let c = self.category_table(g).id_of(category)?;
        Ok((g, c))
    }
}
