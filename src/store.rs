//! Fleet state store.
//!
//! Single owner of the drone list and the selection set. Every change to the
//! drone list is mirrored to [`Storage`] before the mutating call returns; the
//! selection is kept in memory only.

use crate::models::{Drone, FlightStatus};
use crate::persistence::Storage;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

pub struct FleetStore {
    drones: Vec<Drone>,
    selected: HashSet<Uuid>,
    storage: Option<Storage>,
}

impl FleetStore {
    /// Store without a durable mirror
    pub fn in_memory() -> Self {
        Self {
            drones: Vec::new(),
            selected: HashSet::new(),
            storage: None,
        }
    }

    /// Restore the drone list from `storage`. Unreadable data yields an empty fleet.
    pub fn open(storage: Storage) -> Self {
        let drones = match storage.load() {
            Ok(drones) => drones,
            Err(e) => {
                warn!(path = %storage.path().display(), "discarding unreadable fleet state: {:#}", e);
                Vec::new()
            }
        };

        Self {
            drones,
            selected: HashSet::new(),
            storage: Some(storage),
        }
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn get(&self, id: Uuid) -> Option<&Drone> {
        self.drones.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.drones.iter().any(|d| d.id == id)
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_ids(&self) -> &HashSet<Uuid> {
        &self.selected
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Addresses of the given drones, in fleet order
    pub fn addresses_for(&self, ids: &HashSet<Uuid>) -> Vec<String> {
        self.drones
            .iter()
            .filter(|d| ids.contains(&d.id))
            .map(|d| d.address.clone())
            .collect()
    }

    pub fn connected_count(&self) -> usize {
        self.drones.iter().filter(|d| d.connected).count()
    }

    pub fn any_connected(&self) -> bool {
        self.drones.iter().any(|d| d.connected)
    }

    /// Append a grounded, disconnected drone. Addresses are neither validated
    /// nor deduplicated here.
    pub fn add_drone(&mut self, address: String) -> Uuid {
        let drone = Drone::new(address);
        let id = drone.id;
        debug!(%id, address = %drone.address, "adding drone");
        self.drones.push(drone);
        self.persist();
        id
    }

    pub fn remove_drone(&mut self, id: Uuid) {
        let Some(idx) = self.drones.iter().position(|d| d.id == id) else {
            return;
        };
        self.drones.remove(idx);
        self.selected.remove(&id);
        debug!(%id, "removed drone");
        self.persist();
    }

    /// Ids that are not in the fleet are ignored.
    pub fn set_selected(&mut self, id: Uuid, selected: bool) {
        if selected {
            if self.contains(id) {
                self.selected.insert(id);
            }
        } else {
            self.selected.remove(&id);
        }
    }

    pub fn toggle_selected(&mut self, id: Uuid) {
        let selected = self.is_selected(id);
        self.set_selected(id, !selected);
    }

    /// Overwrite connection state: exactly the drones in `targets` end up
    /// connected, everything else is disconnected.
    pub fn apply_connect_result(&mut self, targets: &HashSet<Uuid>) {
        for drone in self.drones.iter_mut() {
            drone.connected = targets.contains(&drone.id);
            if drone.connected {
                drone.touch();
            }
        }
        self.persist();
    }

    pub fn apply_disconnect_all(&mut self) {
        for drone in self.drones.iter_mut() {
            drone.connected = false;
            drone.touch();
        }
        self.persist();
    }

    /// Drones missing from `levels` go back to unknown. Every drone is touched.
    pub fn apply_battery_levels(&mut self, levels: &HashMap<String, u8>) {
        for drone in self.drones.iter_mut() {
            drone.battery_level = levels.get(&drone.address).copied();
            drone.touch();
        }
        self.persist();
    }

    pub fn apply_takeoff(&mut self) {
        self.set_connected_flight_status(FlightStatus::Airborne);
    }

    pub fn apply_land(&mut self) {
        self.set_connected_flight_status(FlightStatus::Grounded);
    }

    fn set_connected_flight_status(&mut self, status: FlightStatus) {
        for drone in self.drones.iter_mut().filter(|d| d.connected) {
            drone.flight_status = status;
            drone.touch();
        }
        self.persist();
    }

    /// Add a drone for every discovered address not already in the fleet and
    /// return the ids of all drones whose address was discovered.
    pub fn merge_discovered(&mut self, addresses: &[String]) -> HashSet<Uuid> {
        let mut added = false;
        for address in addresses {
            if !self.drones.iter().any(|d| &d.address == address) {
                let drone = Drone::new(address.clone());
                debug!(id = %drone.id, %address, "adding discovered drone");
                self.drones.push(drone);
                added = true;
            }
        }
        if added {
            self.persist();
        }

        self.drones
            .iter()
            .filter(|d| addresses.contains(&d.address))
            .map(|d| d.id)
            .collect()
    }

    fn persist(&self) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save(&self.drones) {
                warn!(path = %storage.path().display(), "failed to save fleet state: {:#}", e);
            }
        }
    }
}

impl Default for FleetStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::fs;
    use tempfile::TempDir;

    fn fleet_of(addresses: &[&str]) -> (FleetStore, Vec<Uuid>) {
        let mut store = FleetStore::in_memory();
        let ids = addresses
            .iter()
            .map(|a| store.add_drone(a.to_string()))
            .collect();
        (store, ids)
    }

    fn set(ids: &[Uuid]) -> HashSet<Uuid> {
        ids.iter().copied().collect()
    }

    // ==================== Fleet membership ====================

    #[test]
    fn test_add_drone_to_empty_fleet() {
        let mut store = FleetStore::in_memory();
        let id = store.add_drone("10.0.0.5".to_string());

        assert_eq!(store.len(), 1);
        let drone = store.get(id).unwrap();
        assert_eq!(drone.address, "10.0.0.5");
        assert_eq!(drone.flight_status, FlightStatus::Grounded);
        assert!(!drone.connected);
        assert!(drone.battery_level.is_none());
        assert!(drone.last_contact_at.is_none());
    }

    #[test]
    fn test_manual_add_allows_duplicate_addresses() {
        let (store, ids) = fleet_of(&["10.0.0.5", "10.0.0.5"]);
        assert_eq!(store.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_ids_stay_unique_across_add_and_remove() {
        let mut store = FleetStore::in_memory();
        let mut seen = HashSet::new();

        for round in 0..20 {
            let id = store.add_drone(format!("10.0.0.{}", round));
            assert!(seen.insert(id), "id reused");
            if round % 3 == 0 {
                store.remove_drone(id);
            }
        }

        let live: HashSet<Uuid> = store.drones().iter().map(|d| d.id).collect();
        assert_eq!(live.len(), store.len());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let (mut store, _) = fleet_of(&["10.0.0.1"]);
        store.remove_drone(Uuid::new_v4());
        assert_eq!(store.len(), 1);
    }

    // ==================== Selection ====================

    #[test]
    fn test_remove_prunes_selection() {
        let (mut store, ids) = fleet_of(&["10.0.0.1", "10.0.0.2"]);
        store.set_selected(ids[0], true);
        store.set_selected(ids[1], true);

        store.remove_drone(ids[0]);

        assert!(!store.is_selected(ids[0]));
        assert!(store.is_selected(ids[1]));
        for id in store.selected_ids() {
            assert!(store.contains(*id));
        }
    }

    #[test]
    fn test_selecting_unknown_id_is_ignored() {
        let (mut store, ids) = fleet_of(&["10.0.0.1"]);
        store.remove_drone(ids[0]);

        store.set_selected(ids[0], true);
        store.set_selected(Uuid::new_v4(), true);

        assert!(!store.has_selection());
    }

    #[test]
    fn test_toggle_selected() {
        let (mut store, ids) = fleet_of(&["10.0.0.1"]);
        store.toggle_selected(ids[0]);
        assert!(store.is_selected(ids[0]));
        store.toggle_selected(ids[0]);
        assert!(!store.is_selected(ids[0]));
    }

    #[test]
    fn test_selection_survives_connect_and_disconnect() {
        let (mut store, ids) = fleet_of(&["10.0.0.1"]);
        store.set_selected(ids[0], true);

        store.apply_connect_result(&set(&ids));
        store.apply_disconnect_all();

        assert!(store.is_selected(ids[0]));
    }

    // ==================== Backend results ====================

    #[test]
    fn test_connect_result_overwrites_connection_state() {
        let (mut store, ids) = fleet_of(&["10.0.0.1", "10.0.0.2"]);
        let (a, b) = (ids[0], ids[1]);
        store.apply_connect_result(&set(&[a]));
        let a_contact = store.get(a).unwrap().last_contact_at;

        let before = Utc::now();
        store.apply_connect_result(&set(&[b]));

        assert!(!store.get(a).unwrap().connected);
        assert!(store.get(b).unwrap().connected);
        assert_eq!(store.get(a).unwrap().last_contact_at, a_contact);
        assert!(store.get(b).unwrap().last_contact_at.unwrap() >= before);
    }

    #[test]
    fn test_disconnect_all_touches_every_drone() {
        let (mut store, ids) = fleet_of(&["10.0.0.1", "10.0.0.2"]);
        store.apply_connect_result(&set(&[ids[0]]));

        let before = Utc::now();
        store.apply_disconnect_all();

        for drone in store.drones() {
            assert!(!drone.connected);
            assert!(drone.last_contact_at.unwrap() >= before);
        }
    }

    #[test]
    fn test_battery_levels_touch_drones_missing_from_map() {
        let (mut store, ids) = fleet_of(&["10.0.0.1", "10.0.0.2"]);
        store.get_mut_for_test(ids[1]).battery_level = Some(90);

        let before = Utc::now();
        let levels = HashMap::from([("10.0.0.1".to_string(), 42u8)]);
        store.apply_battery_levels(&levels);

        let first = store.get(ids[0]).unwrap();
        let second = store.get(ids[1]).unwrap();
        assert_eq!(first.battery_level, Some(42));
        assert_eq!(second.battery_level, None);
        assert!(first.last_contact_at.unwrap() >= before);
        assert!(second.last_contact_at.unwrap() >= before);
    }

    #[test]
    fn test_takeoff_only_moves_connected_drones() {
        let (mut store, ids) = fleet_of(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
        store.apply_connect_result(&set(&[ids[0]]));
        let others: Vec<Drone> = store.drones()[1..].to_vec();

        store.apply_takeoff();

        assert_eq!(store.get(ids[0]).unwrap().flight_status, FlightStatus::Airborne);
        assert_eq!(&store.drones()[1..], others.as_slice());
    }

    #[test]
    fn test_land_only_moves_connected_drones() {
        let (mut store, ids) = fleet_of(&["10.0.0.1", "10.0.0.2"]);
        store.apply_connect_result(&set(&ids));
        store.apply_takeoff();
        store.apply_connect_result(&set(&[ids[0]]));

        store.apply_land();

        assert_eq!(store.get(ids[0]).unwrap().flight_status, FlightStatus::Grounded);
        assert_eq!(store.get(ids[1]).unwrap().flight_status, FlightStatus::Airborne);
    }

    #[test]
    fn test_merge_discovered_dedups_by_address() {
        let (mut store, ids) = fleet_of(&["10.0.0.1"]);
        let discovered = vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()];

        let targets = store.merge_discovered(&discovered);

        assert_eq!(store.len(), 2);
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&ids[0]));
        assert_eq!(store.drones()[1].address, "10.0.0.2");
    }

    #[test]
    fn test_merge_discovered_ignores_repeats_in_scan() {
        let mut store = FleetStore::in_memory();
        let discovered = vec!["10.0.0.7".to_string(), "10.0.0.7".to_string()];

        let targets = store.merge_discovered(&discovered);

        assert_eq!(store.len(), 1);
        assert_eq!(targets.len(), 1);
    }

    // ==================== Persistence ====================

    #[test]
    fn test_every_mutation_is_mirrored() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("fleet.json"));
        let mut store = FleetStore::open(storage.clone());

        let id = store.add_drone("10.0.0.1".to_string());
        assert_eq!(storage.load().unwrap().len(), 1);

        store.apply_connect_result(&set(&[id]));
        assert!(storage.load().unwrap()[0].connected);

        store.apply_battery_levels(&HashMap::from([("10.0.0.1".to_string(), 77u8)]));
        assert_eq!(storage.load().unwrap()[0].battery_level, Some(77));

        store.apply_takeoff();
        assert_eq!(storage.load().unwrap()[0].flight_status, FlightStatus::Airborne);

        store.apply_land();
        assert_eq!(storage.load().unwrap()[0].flight_status, FlightStatus::Grounded);

        store.apply_disconnect_all();
        assert!(!storage.load().unwrap()[0].connected);

        store.merge_discovered(&["10.0.0.2".to_string()]);
        let saved = storage.load().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].address, "10.0.0.2");

        store.remove_drone(id);
        assert_eq!(storage.load().unwrap().len(), 1);

        assert_eq!(storage.load().unwrap(), store.drones());
    }

    #[test]
    fn test_open_restores_drones_but_not_selection() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("fleet.json"));
        let mut store = FleetStore::open(storage.clone());
        let id = store.add_drone("10.0.0.1".to_string());
        store.set_selected(id, true);

        let restored = FleetStore::open(storage);

        assert_eq!(restored.drones(), store.drones());
        assert!(!restored.has_selection());
    }

    #[test]
    fn test_open_malformed_state_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fleet.json");
        fs::write(&path, "[[[").unwrap();

        let store = FleetStore::open(Storage::new(path));
        assert!(store.is_empty());
    }

    impl FleetStore {
        fn get_mut_for_test(&mut self, id: Uuid) -> &mut Drone {
            self.drones.iter_mut().find(|d| d.id == id).unwrap()
        }
    }
}
