//! Flight-path buffer
//!
//! Bounded, ordered sequence of waypoints backed by a fixed-capacity
//! [`heapless::Vec`]. Occupied slots always form the contiguous prefix
//! `[0, len)`; [`WaypointBuffer::status_of`] exposes the per-slot
//! occupancy view of the underlying fixed array.
//!
//! # Invariants
//!
//! - For every interior slot `i`: `slot[i].previous == Some(slot[i-1].id)`
//!   and `slot[i-1].next == Some(slot[i].id)`; endpoint outer links are
//!   `None`.
//! - Ids are unique within the buffer and never reused until `clear`.
//! - No operation partially mutates the buffer on failure.

use heapless::Vec;

use super::error::WaypointError;
use super::{Waypoint, WaypointId, PATH_BUFFER_SIZE};

/// Occupancy of one buffer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// Slot holds no waypoint
    Free,
    /// Slot holds a waypoint
    Full,
}

/// Bounded, doubly-linked flight-path buffer
#[derive(Debug)]
pub struct WaypointBuffer {
    waypoints: Vec<Waypoint, PATH_BUFFER_SIZE>,
    current_index: usize,
}

impl WaypointBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            waypoints: Vec::new(),
            current_index: 0,
        }
    }

    /// Number of waypoints currently in the buffer
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Check if the buffer holds no waypoints
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Check if the buffer is at capacity
    pub fn is_full(&self) -> bool {
        self.waypoints.is_full()
    }

    /// Occupancy of the slot at `index`
    pub fn status_of(&self, index: usize) -> SlotStatus {
        if index < self.waypoints.len() {
            SlotStatus::Full
        } else {
            SlotStatus::Free
        }
    }

    /// Waypoint at `index`, if the slot is occupied
    pub fn waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// All occupied slots in order
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Index of the waypoint navigation is currently flying from
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Waypoint navigation is currently flying from
    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.current_index)
    }

    /// Resolve a waypoint id to its slot index
    ///
    /// Linear scan over the occupied prefix; returns `None` when the id is
    /// not in the buffer.
    pub fn index_of(&self, id: WaypointId) -> Option<usize> {
        self.waypoints.iter().position(|wp| wp.id == id)
    }

    /// Successor of `waypoint`, resolved through its id link
    pub fn next_of(&self, waypoint: &Waypoint) -> Option<&Waypoint> {
        waypoint
            .next
            .and_then(|id| self.index_of(id))
            .and_then(|index| self.waypoints.get(index))
    }

    /// Predecessor of `waypoint`, resolved through its id link
    pub fn previous_of(&self, waypoint: &Waypoint) -> Option<&Waypoint> {
        waypoint
            .previous
            .and_then(|id| self.index_of(id))
            .and_then(|index| self.waypoints.get(index))
    }

    /// Install an initial flight path into an empty buffer
    ///
    /// Places the given waypoints in order and sets every cross-link.
    /// Fails with [`WaypointError::UndefinedFailure`] when the buffer is
    /// not empty, and with [`WaypointError::InvalidParameters`] when the
    /// path does not fit.
    pub fn initialize(&mut self, initial: &[Waypoint]) -> Result<(), WaypointError> {
        if !self.waypoints.is_empty() {
            return Err(WaypointError::UndefinedFailure);
        }
        if initial.len() > PATH_BUFFER_SIZE {
            return Err(WaypointError::InvalidParameters);
        }

        self.waypoints
            .extend_from_slice(initial)
            .map_err(|_| WaypointError::InvalidParameters)?;
        self.relink_all();
        Ok(())
    }

    /// Append a waypoint to the end of the flight path
    ///
    /// Fails when the buffer is full or when the new waypoint duplicates
    /// the latitude and longitude of its immediate predecessor.
    pub fn append(&mut self, mut waypoint: Waypoint) -> Result<(), WaypointError> {
        if self.waypoints.is_full() {
            return Err(WaypointError::InvalidParameters);
        }

        let previous = self.waypoints.last().copied();
        if let Some(last) = previous {
            if last.latitude == waypoint.latitude && last.longitude == waypoint.longitude {
                return Err(WaypointError::InvalidParameters);
            }
        }

        waypoint.previous = previous.map(|wp| wp.id);
        waypoint.next = None;
        let id = waypoint.id;
        // Push cannot fail: capacity was checked above
        let _ = self.waypoints.push(waypoint);

        let len = self.waypoints.len();
        if len > 1 {
            self.waypoints[len - 2].next = Some(id);
        }
        Ok(())
    }

    /// Insert a waypoint between two adjacent waypoints
    ///
    /// `previous_id` and `next_id` must resolve to adjacent slots, in that
    /// order; the suffix starting at the successor is shifted right and the
    /// four affected links are rewired.
    pub fn insert(
        &mut self,
        mut waypoint: Waypoint,
        previous_id: WaypointId,
        next_id: WaypointId,
    ) -> Result<(), WaypointError> {
        if self.waypoints.is_full() {
            return Err(WaypointError::InvalidParameters);
        }

        let previous_index = self
            .index_of(previous_id)
            .ok_or(WaypointError::InvalidParameters)?;
        let next_index = self
            .index_of(next_id)
            .ok_or(WaypointError::InvalidParameters)?;
        if next_index != previous_index + 1 {
            return Err(WaypointError::InvalidParameters);
        }

        waypoint.previous = Some(previous_id);
        waypoint.next = Some(next_id);
        let id = waypoint.id;
        // Insert cannot fail: capacity was checked above
        let _ = self.waypoints.insert(next_index, waypoint);

        self.waypoints[previous_index].next = Some(id);
        self.waypoints[next_index + 1].previous = Some(id);
        Ok(())
    }

    /// Replace the waypoint with the given id in place
    ///
    /// The replacement inherits the displaced record's position and links;
    /// both neighbours are rewired to point at the replacement's id. The
    /// displaced record is destroyed.
    pub fn update(
        &mut self,
        mut waypoint: Waypoint,
        id: WaypointId,
    ) -> Result<(), WaypointError> {
        let index = self.index_of(id).ok_or(WaypointError::InvalidParameters)?;

        let displaced = self.waypoints[index];
        waypoint.previous = displaced.previous;
        waypoint.next = displaced.next;
        let new_id = waypoint.id;
        self.waypoints[index] = waypoint;

        if index > 0 {
            self.waypoints[index - 1].next = Some(new_id);
        }
        if index + 1 < self.waypoints.len() {
            self.waypoints[index + 1].previous = Some(new_id);
        }
        Ok(())
    }

    /// Remove the waypoint with the given id
    ///
    /// Rewires the neighbours across the gap and compacts the suffix left
    /// by one slot.
    pub fn delete(&mut self, id: WaypointId) -> Result<(), WaypointError> {
        let index = self.index_of(id).ok_or(WaypointError::InvalidParameters)?;

        let removed = self.waypoints.remove(index);
        if index > 0 {
            self.waypoints[index - 1].next = removed.next;
        }
        if index < self.waypoints.len() {
            self.waypoints[index].previous = removed.previous;
        }
        Ok(())
    }

    /// Destroy every waypoint and reset the buffer
    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.current_index = 0;
    }

    /// Move the current index to the waypoint with the given id
    ///
    /// Succeeds only when the id resolves and the waypoint has both a
    /// successor and a successor-of-successor, mirroring the two-waypoint
    /// look-ahead the transition planner requires.
    pub fn change_current_index(&mut self, id: WaypointId) -> Result<(), WaypointError> {
        let index = self.index_of(id).ok_or(WaypointError::InvalidParameters)?;

        let next_id = self.waypoints[index]
            .next
            .ok_or(WaypointError::InvalidParameters)?;
        let next_index = self
            .index_of(next_id)
            .ok_or(WaypointError::InvalidParameters)?;
        let after_id = self.waypoints[next_index]
            .next
            .ok_or(WaypointError::InvalidParameters)?;
        if self.index_of(after_id).is_none() {
            return Err(WaypointError::InvalidParameters);
        }

        self.current_index = index;
        Ok(())
    }

    /// Rebuild every link from slot adjacency
    fn relink_all(&mut self) {
        let len = self.waypoints.len();
        for i in 0..len {
            self.waypoints[i].previous = if i > 0 {
                Some(self.waypoints[i - 1].id)
            } else {
                None
            };
            self.waypoints[i].next = if i + 1 < len {
                Some(self.waypoints[i + 1].id)
            } else {
                None
            };
        }
    }
}

impl Default for WaypointBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec as StdVec;

    use super::*;
    use crate::mission::{WaypointFactory, WaypointKind};

    fn path(factory: &mut WaypointFactory, coords: &[(f64, f64)]) -> StdVec<Waypoint> {
        coords
            .iter()
            .map(|&(lat, lon)| factory.waypoint(lat, lon, 100.0, WaypointKind::PathFollow))
            .collect()
    }

    /// Packing, linking, and id-uniqueness invariants from the buffer doc
    fn assert_invariants(buffer: &WaypointBuffer) {
        let len = buffer.len();
        for i in 0..len {
            assert_eq!(buffer.status_of(i), SlotStatus::Full, "slot {} packed", i);
        }
        for i in len..PATH_BUFFER_SIZE {
            assert_eq!(buffer.status_of(i), SlotStatus::Free, "slot {} free", i);
            assert!(buffer.waypoint(i).is_none());
        }

        let waypoints = buffer.waypoints();
        for i in 0..len {
            let expected_previous = if i > 0 { Some(waypoints[i - 1].id) } else { None };
            let expected_next = if i + 1 < len {
                Some(waypoints[i + 1].id)
            } else {
                None
            };
            assert_eq!(waypoints[i].previous, expected_previous, "previous of {}", i);
            assert_eq!(waypoints[i].next, expected_next, "next of {}", i);
        }

        for i in 0..len {
            for j in (i + 1)..len {
                assert_ne!(waypoints[i].id, waypoints[j].id, "ids distinct");
            }
        }
    }

    fn ids(buffer: &WaypointBuffer) -> StdVec<WaypointId> {
        buffer.waypoints().iter().map(|wp| wp.id).collect()
    }

    // ========== Initialize ==========

    #[test]
    fn test_initialize_links_path() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0), (43.1, -80.1), (43.2, -80.2)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();

        assert_eq!(buffer.len(), 3);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_initialize_fails_when_not_empty() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();
        assert_eq!(
            buffer.initialize(&initial),
            Err(WaypointError::UndefinedFailure)
        );
        assert_eq!(buffer.len(), 1);
    }

    // ========== Append ==========

    #[test]
    fn test_append_links_to_predecessor() {
        let mut factory = WaypointFactory::new();
        let mut buffer = WaypointBuffer::new();

        buffer
            .append(factory.waypoint(43.0, -80.0, 100.0, WaypointKind::PathFollow))
            .unwrap();
        buffer
            .append(factory.waypoint(43.1, -80.1, 100.0, WaypointKind::PathFollow))
            .unwrap();

        assert_eq!(buffer.len(), 2);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_append_rejects_duplicate_of_predecessor() {
        let mut factory = WaypointFactory::new();
        let mut buffer = WaypointBuffer::new();

        buffer
            .append(factory.waypoint(43.0, -80.0, 100.0, WaypointKind::PathFollow))
            .unwrap();
        let duplicate = factory.waypoint(43.0, -80.0, 100.0, WaypointKind::PathFollow);
        assert_eq!(
            buffer.append(duplicate),
            Err(WaypointError::InvalidParameters)
        );
        assert_eq!(buffer.len(), 1);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_append_allows_non_adjacent_duplicate() {
        let mut factory = WaypointFactory::new();
        let mut buffer = WaypointBuffer::new();

        buffer
            .append(factory.waypoint(43.0, -80.0, 100.0, WaypointKind::PathFollow))
            .unwrap();
        buffer
            .append(factory.waypoint(43.1, -80.1, 100.0, WaypointKind::PathFollow))
            .unwrap();
        // Same coordinates as the first waypoint, but not its neighbour
        buffer
            .append(factory.waypoint(43.0, -80.0, 100.0, WaypointKind::PathFollow))
            .unwrap();

        assert_eq!(buffer.len(), 3);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_append_fails_when_full() {
        let mut factory = WaypointFactory::new();
        let mut buffer = WaypointBuffer::new();

        for i in 0..PATH_BUFFER_SIZE {
            buffer
                .append(factory.waypoint(
                    i as f64 * 0.001,
                    -80.0,
                    100.0,
                    WaypointKind::PathFollow,
                ))
                .unwrap();
        }
        assert!(buffer.is_full());

        let overflow = factory.waypoint(44.0, -81.0, 100.0, WaypointKind::PathFollow);
        assert_eq!(
            buffer.append(overflow),
            Err(WaypointError::InvalidParameters)
        );
        assert_eq!(buffer.len(), PATH_BUFFER_SIZE);
    }

    // ========== Insert ==========

    #[test]
    fn test_insert_between_adjacent() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0), (43.1, -80.1), (43.2, -80.2)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();

        let new = factory.waypoint(43.05, -80.05, 100.0, WaypointKind::PathFollow);
        let new_id = new.id;
        buffer.insert(new, 0, 1).unwrap();

        assert_eq!(ids(&buffer), [0, new_id, 1, 2]);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_insert_then_delete_matches_expected_order() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0), (43.1, -80.1), (43.2, -80.2)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();

        let new = factory.waypoint(43.05, -80.05, 100.0, WaypointKind::PathFollow);
        let new_id = new.id;
        buffer.insert(new, 0, 1).unwrap();
        buffer.delete(1).unwrap();

        assert_eq!(ids(&buffer), [0, new_id, 2]);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_insert_rejects_non_adjacent_anchors() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0), (43.1, -80.1), (43.2, -80.2)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();
        let before: StdVec<Waypoint> = buffer.waypoints().to_vec();

        let new = factory.waypoint(43.05, -80.05, 100.0, WaypointKind::PathFollow);
        assert_eq!(
            buffer.insert(new, 0, 2),
            Err(WaypointError::InvalidParameters)
        );
        assert_eq!(buffer.waypoints(), &before[..]);
    }

    #[test]
    fn test_insert_rejects_unresolved_anchor() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0), (43.1, -80.1)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();

        let new = factory.waypoint(43.05, -80.05, 100.0, WaypointKind::PathFollow);
        assert_eq!(
            buffer.insert(new, 7, 1),
            Err(WaypointError::InvalidParameters)
        );
        assert_eq!(buffer.len(), 2);
        assert_invariants(&buffer);
    }

    // ========== Update ==========

    #[test]
    fn test_update_replaces_in_place() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0), (43.1, -80.1), (43.2, -80.2)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();

        let replacement = factory.waypoint(43.15, -80.15, 120.0, WaypointKind::Hold);
        let replacement_id = replacement.id;
        buffer.update(replacement, 1).unwrap();

        assert_eq!(ids(&buffer), [0, replacement_id, 2]);
        assert_eq!(buffer.waypoint(1).unwrap().kind, WaypointKind::Hold);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_update_idempotence() {
        // update(w, id) then update(w', w.id) must leave the buffer in the
        // same shape as a single update(w', id)
        let make_initial = || {
            let mut factory = WaypointFactory::new();
            let mut buffer = WaypointBuffer::new();
            buffer
                .initialize(&path(
                    &mut factory,
                    &[(43.0, -80.0), (43.1, -80.1), (43.2, -80.2)],
                ))
                .unwrap();
            (factory, buffer)
        };

        let (mut factory_a, mut two_step) = make_initial();
        let w = factory_a.waypoint(43.15, -80.15, 110.0, WaypointKind::PathFollow);
        let w_id = w.id;
        two_step.update(w, 1).unwrap();
        let w_prime = factory_a.waypoint(43.16, -80.16, 115.0, WaypointKind::PathFollow);
        two_step.update(w_prime, w_id).unwrap();

        let (mut factory_b, mut one_step) = make_initial();
        let _ = factory_b.blank(); // keep id sequences aligned
        let w_prime = factory_b.waypoint(43.16, -80.16, 115.0, WaypointKind::PathFollow);
        one_step.update(w_prime, 1).unwrap();

        assert_eq!(two_step.waypoints(), one_step.waypoints());
        assert_invariants(&two_step);
    }

    #[test]
    fn test_update_unresolved_id() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();
        let before: StdVec<Waypoint> = buffer.waypoints().to_vec();

        let replacement = factory.waypoint(43.5, -80.5, 100.0, WaypointKind::PathFollow);
        assert_eq!(
            buffer.update(replacement, 42),
            Err(WaypointError::InvalidParameters)
        );
        assert_eq!(buffer.waypoints(), &before[..]);
    }

    // ========== Delete ==========

    #[test]
    fn test_delete_interior_compacts() {
        let mut factory = WaypointFactory::new();
        let initial = path(
            &mut factory,
            &[(43.0, -80.0), (43.1, -80.1), (43.2, -80.2), (43.3, -80.3)],
        );

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();
        buffer.delete(1).unwrap();

        assert_eq!(ids(&buffer), [0, 2, 3]);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_delete_endpoints() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0), (43.1, -80.1), (43.2, -80.2)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();

        buffer.delete(0).unwrap();
        assert_eq!(ids(&buffer), [1, 2]);
        assert_invariants(&buffer);

        buffer.delete(2).unwrap();
        assert_eq!(ids(&buffer), [1]);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_delete_unresolved_id() {
        let mut buffer = WaypointBuffer::new();
        assert_eq!(buffer.delete(0), Err(WaypointError::InvalidParameters));
    }

    // ========== Clear ==========

    #[test]
    fn test_clear_resets_buffer() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0), (43.1, -80.1)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.current_index(), 0);
        assert_invariants(&buffer);
    }

    // ========== Current index ==========

    #[test]
    fn test_change_current_index_requires_two_look_ahead() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0), (43.1, -80.1), (43.2, -80.2)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();

        // id 0 has a successor (1) and a successor-of-successor (2)
        buffer.change_current_index(0).unwrap();
        assert_eq!(buffer.current_index(), 0);

        // id 1's successor has no successor of its own
        assert_eq!(
            buffer.change_current_index(1),
            Err(WaypointError::InvalidParameters)
        );
        assert_eq!(buffer.current_index(), 0);

        // unresolved id
        assert_eq!(
            buffer.change_current_index(9),
            Err(WaypointError::InvalidParameters)
        );
    }

    // ========== Lookup ==========

    #[test]
    fn test_index_of_and_neighbour_resolution() {
        let mut factory = WaypointFactory::new();
        let initial = path(&mut factory, &[(43.0, -80.0), (43.1, -80.1), (43.2, -80.2)]);

        let mut buffer = WaypointBuffer::new();
        buffer.initialize(&initial).unwrap();

        assert_eq!(buffer.index_of(1), Some(1));
        assert_eq!(buffer.index_of(9), None);

        let middle = *buffer.waypoint(1).unwrap();
        assert_eq!(buffer.next_of(&middle).unwrap().id, 2);
        assert_eq!(buffer.previous_of(&middle).unwrap().id, 0);

        let first = *buffer.waypoint(0).unwrap();
        assert!(buffer.previous_of(&first).is_none());
    }
}
