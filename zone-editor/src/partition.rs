//! Partition of a destination region's cities into zones
//!
//! The partition keeps the city catalog, the ordered zone list and one
//! `city → zone` assignment map. A city appears in at most one zone because
//! the map holds a single owner per city; cities without an entry form the
//! unassigned pool, which is recomputed on every read.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use shared::models::{City, CityId};

use crate::error::{EditorError, EditorResult};
use crate::money::coerce_price;
use crate::transfer::TransferTarget;
use crate::zone::{Zone, ZoneRef};

/// Cities rejected while restoring a zone from the backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Not part of the catalog
    pub unknown: Vec<CityId>,
    /// Already owned by an earlier zone
    pub contested: Vec<CityId>,
}

#[derive(Debug, Clone, Default)]
pub struct Partition {
    catalog: Vec<City>,
    zones: Vec<Zone>,
    assignment: BTreeMap<CityId, ZoneRef>,
}

impl Partition {
    /// Partition with every city unassigned
    ///
    /// Duplicate catalog entries keep the first occurrence.
    pub fn new(catalog: Vec<City>) -> Self {
        let mut seen = HashSet::new();
        let catalog = catalog.into_iter().filter(|c| seen.insert(c.id)).collect();
        Self {
            catalog,
            zones: Vec::new(),
            assignment: BTreeMap::new(),
        }
    }

    // ==================== Catalog ====================

    pub fn catalog(&self) -> &[City] {
        &self.catalog
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.catalog.iter().find(|c| c.id == id)
    }

    pub fn contains_city(&self, id: CityId) -> bool {
        self.city(id).is_some()
    }

    // ==================== Zones ====================

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, zone_ref: ZoneRef) -> Option<&Zone> {
        self.zones.iter().find(|z| z.zone_ref == zone_ref)
    }

    pub fn zone_index(&self, zone_ref: ZoneRef) -> Option<usize> {
        self.zones.iter().position(|z| z.zone_ref == zone_ref)
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    fn zone_mut(&mut self, zone_ref: ZoneRef) -> EditorResult<&mut Zone> {
        self.zones
            .iter_mut()
            .find(|z| z.zone_ref == zone_ref)
            .ok_or(EditorError::UnknownZone(zone_ref))
    }

    /// Append an empty zone with a fresh local id
    pub fn create_zone(&mut self, title: impl Into<String>, price: f64) -> ZoneRef {
        let zone_ref = ZoneRef::new_local();
        self.zones
            .push(Zone::new(zone_ref, title, coerce_price(price)));
        zone_ref
    }

    /// Append a zone loaded from the backend and assign its cities
    ///
    /// Cities outside the catalog, or already owned by another zone, are
    /// skipped and reported. A `zone_ref` that is already present is
    /// replaced by a fresh local id.
    pub fn restore_zone(
        &mut self,
        mut zone: Zone,
        city_ids: impl IntoIterator<Item = CityId>,
    ) -> (ZoneRef, RestoreReport) {
        if self.zone(zone.zone_ref).is_some() {
            zone.zone_ref = ZoneRef::new_local();
        }
        zone.price = coerce_price(zone.price);
        let zone_ref = zone.zone_ref;
        self.zones.push(zone);

        let mut report = RestoreReport::default();
        for id in city_ids {
            if !self.contains_city(id) {
                report.unknown.push(id);
            } else if self.assignment.get(&id).is_some_and(|owner| *owner != zone_ref) {
                report.contested.push(id);
            } else {
                self.assignment.insert(id, zone_ref);
            }
        }
        (zone_ref, report)
    }

    /// Remove a zone; its cities fall back to the unassigned pool
    pub fn delete_zone(&mut self, zone_ref: ZoneRef) -> EditorResult<Zone> {
        let index = self
            .zone_index(zone_ref)
            .ok_or(EditorError::UnknownZone(zone_ref))?;
        self.assignment.retain(|_, owner| *owner != zone_ref);
        Ok(self.zones.remove(index))
    }

    pub fn rename_zone(&mut self, zone_ref: ZoneRef, title: impl Into<String>) -> EditorResult<()> {
        self.zone_mut(zone_ref)?.title = title.into();
        Ok(())
    }

    /// Set a zone price; returns the coerced value actually stored
    pub fn set_zone_price(&mut self, zone_ref: ZoneRef, price: f64) -> EditorResult<f64> {
        let price = coerce_price(price);
        self.zone_mut(zone_ref)?.price = price;
        Ok(price)
    }

    /// Drop every zone, keeping the catalog
    pub fn clear_zones(&mut self) {
        self.zones.clear();
        self.assignment.clear();
    }

    // ==================== Assignment ====================

    /// Move cities to `target` in one step
    ///
    /// Ids outside the catalog are ignored; cities already at the target
    /// are left alone. An unknown target zone fails before anything moves.
    /// Returns the number of cities that changed owner.
    pub fn transfer(&mut self, city_ids: &[CityId], target: TransferTarget) -> EditorResult<usize> {
        if let TransferTarget::Zone(zone_ref) = target
            && self.zone(zone_ref).is_none()
        {
            return Err(EditorError::UnknownZone(zone_ref));
        }

        let mut moved = 0;
        for &id in city_ids {
            if !self.contains_city(id) {
                continue;
            }
            let changed = match target {
                TransferTarget::Zone(zone_ref) => self.assignment.insert(id, zone_ref) != Some(zone_ref),
                TransferTarget::Unassigned => self.assignment.remove(&id).is_some(),
            };
            if changed {
                moved += 1;
            }
        }
        Ok(moved)
    }

    /// Send one city of `zone_ref` back to the unassigned pool
    ///
    /// Returns false when the city is not in that zone.
    pub fn remove_city(&mut self, zone_ref: ZoneRef, city: CityId) -> EditorResult<bool> {
        if self.zone(zone_ref).is_none() {
            return Err(EditorError::UnknownZone(zone_ref));
        }
        if self.owner_of(city) != Some(zone_ref) {
            return Ok(false);
        }
        self.transfer(&[city], TransferTarget::Unassigned)
            .map(|moved| moved > 0)
    }

    pub fn owner_of(&self, city: CityId) -> Option<ZoneRef> {
        self.assignment.get(&city).copied()
    }

    /// Cities of a zone in catalog order
    pub fn zone_cities(&self, zone_ref: ZoneRef) -> Vec<CityId> {
        self.catalog
            .iter()
            .filter(|c| self.owner_of(c.id) == Some(zone_ref))
            .map(|c| c.id)
            .collect()
    }

    pub fn zone_city_set(&self, zone_ref: ZoneRef) -> BTreeSet<CityId> {
        self.assignment
            .iter()
            .filter(|(_, owner)| **owner == zone_ref)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Cities in no zone, in catalog order
    pub fn unassigned(&self) -> Vec<CityId> {
        self.catalog
            .iter()
            .filter(|c| !self.assignment.contains_key(&c.id))
            .map(|c| c.id)
            .collect()
    }

    /// Cities shown under a tab
    pub fn cities_at(&self, target: TransferTarget) -> Vec<CityId> {
        match target {
            TransferTarget::Zone(zone_ref) => self.zone_cities(zone_ref),
            TransferTarget::Unassigned => self.unassigned(),
        }
    }
}
