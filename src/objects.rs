//! Object table maintenance.
//!
//! The generator consumes the object table as a plain slice of
//! [`ObjectRecord`]s; it does not care who builds it. [`ObjectTable`] is
//! the host-side owner of that slice: scene code inserts one entry per
//! renderable instance and gets back a stable generational handle, while
//! the records themselves stay densely packed for upload. Removal
//! swap-removes within the dense array, so record positions move but
//! handles stay valid.

use crate::types::ObjectRecord;

/// Bit width of the slot index inside a handle.
const INDEX_BITS: u32 = 22;
/// Mask extracting the slot index.
const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;
/// Mask extracting the generation.
const GENERATION_MASK: u32 = !INDEX_MASK;
/// Mask keeping a slot's generation counter within its 10 bits.
const GENERATION_FIELD: u32 = GENERATION_MASK >> INDEX_BITS;

/// Position sentinel for a free slot.
const FREE: u32 = u32::MAX;

/// A generational handle to an object table entry.
///
/// Packs a 22-bit slot index with a 10-bit generation, so a handle fits in
/// a single `u32` and can be carried through GPU buffers unchanged (it is
/// the value stored in [`ObjectRecord::object_handle`]). A slot's
/// generation is bumped when its entry is removed, which invalidates every
/// outstanding handle to it; the raw bits of a stale handle never
/// accidentally address a recycled slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(u32);

impl ObjectHandle {
    /// Maximum number of simultaneously live objects a table can address.
    pub const MAX_OBJECTS: usize = 1 << INDEX_BITS;

    fn new(slot: u32, generation: u32) -> Self {
        Self((generation << INDEX_BITS) & GENERATION_MASK | (slot & INDEX_MASK))
    }

    /// The raw handle bits, as stored in the object record.
    pub fn to_bits(self) -> u32 {
        self.0
    }

    /// Reconstruct a handle from raw bits (e.g. read back from a GPU
    /// buffer). No validity check; pass it to [`ObjectTable::contains`].
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    fn slot(self) -> u32 {
        self.0 & INDEX_MASK
    }

    fn generation(self) -> u32 {
        (self.0 & GENERATION_MASK) >> INDEX_BITS
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    /// Current generation; handles with any other generation are stale.
    generation: u32,
    /// Position of the slot's record in the dense array, or [`FREE`].
    position: u32,
}

/// Dense object table with generational handles.
///
/// # Example
///
/// ```
/// use drawgen::ObjectTable;
///
/// let mut table = ObjectTable::new();
/// let cube = table.insert(0);
/// let sphere = table.insert(1);
///
/// assert_eq!(table.records().len(), 2);
/// assert!(table.remove(cube));
/// assert!(!table.contains(cube));
///
/// // The table stays dense: the sphere's record moved into slot 0.
/// assert_eq!(table.records()[0].mesh_index, 1);
/// assert!(table.contains(sphere));
/// ```
#[derive(Debug, Default)]
pub struct ObjectTable {
    /// Dense records, in upload order.
    records: Vec<ObjectRecord>,
    /// Slot metadata, indexed by handle slot.
    slots: Vec<Slot>,
    /// For each dense position, the slot owning the record there.
    slot_of_position: Vec<u32>,
    /// Recycled slot indices.
    free: Vec<u32>,
}

impl ObjectTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no live objects.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The dense record array, ready for upload.
    ///
    /// Position `i` here is position `i` of the generated draw-argument
    /// buffer. Order is not stable across [`remove`](Self::remove) calls.
    pub fn records(&self) -> &[ObjectRecord] {
        &self.records
    }

    /// Insert an object referencing `mesh_index`.
    ///
    /// The mesh index is stored as given; whether it addresses a valid
    /// mesh registry slot at dispatch time is the caller's contract.
    ///
    /// # Panics
    ///
    /// Panics when the table already holds
    /// [`ObjectHandle::MAX_OBJECTS`] live objects.
    pub fn insert(&mut self, mesh_index: u32) -> ObjectHandle {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                assert!(
                    self.slots.len() < ObjectHandle::MAX_OBJECTS,
                    "object table is full"
                );
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 1,
                    position: FREE,
                });
                slot
            }
        };

        let position = self.records.len() as u32;
        self.slots[slot as usize].position = position;

        let handle = ObjectHandle::new(slot, self.slots[slot as usize].generation);
        self.records
            .push(ObjectRecord::new(handle.to_bits(), mesh_index));
        self.slot_of_position.push(slot);
        handle
    }

    /// Remove the object behind `handle`.
    ///
    /// Swap-removes its record to keep the table dense; the record that
    /// moved keeps its own handle. Returns `false` for a stale or unknown
    /// handle, which is not an error: a double remove is a no-op.
    pub fn remove(&mut self, handle: ObjectHandle) -> bool {
        let Some(position) = self.position_of(handle) else {
            return false;
        };

        let slot = handle.slot();
        // Invalidate outstanding handles. The generation wraps within its
        // 10 bits so it always round-trips through the packed handle.
        self.slots[slot as usize].generation =
            (self.slots[slot as usize].generation + 1) & GENERATION_FIELD;
        self.slots[slot as usize].position = FREE;
        self.free.push(slot);

        self.records.swap_remove(position);
        self.slot_of_position.swap_remove(position);
        if (position as usize) < self.records.len() {
            let moved_slot = self.slot_of_position[position];
            self.slots[moved_slot as usize].position = position as u32;
        }
        true
    }

    /// Whether `handle` refers to a live object.
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.position_of(handle).is_some()
    }

    /// The record behind `handle`, if it is live.
    pub fn record(&self, handle: ObjectHandle) -> Option<&ObjectRecord> {
        self.position_of(handle).map(|pos| &self.records[pos])
    }

    /// Point the object behind `handle` at a different mesh.
    ///
    /// Returns `false` for a stale or unknown handle. This is the
    /// host-side seam for LOD or asset-reload systems that retarget
    /// objects between dispatches.
    pub fn set_mesh_index(&mut self, handle: ObjectHandle, mesh_index: u32) -> bool {
        match self.position_of(handle) {
            Some(pos) => {
                self.records[pos].mesh_index = mesh_index;
                true
            }
            None => false,
        }
    }

    fn position_of(&self, handle: ObjectHandle) -> Option<usize> {
        let slot = self.slots.get(handle.slot() as usize)?;
        if slot.position == FREE || slot.generation != handle.generation() {
            return None;
        }
        Some(slot.position as usize)
    }
}

static_assertions::assert_impl_all!(ObjectTable: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_packs_densely() {
        let mut table = ObjectTable::new();
        let a = table.insert(10);
        let b = table.insert(20);
        let c = table.insert(30);

        assert_eq!(table.len(), 3);
        assert_eq!(table.records()[0].mesh_index, 10);
        assert_eq!(table.records()[1].mesh_index, 20);
        assert_eq!(table.records()[2].mesh_index, 30);
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn test_record_carries_handle_bits() {
        let mut table = ObjectTable::new();
        let handle = table.insert(4);
        let record = table.record(handle).unwrap();
        assert_eq!(record.object_handle, handle.to_bits());
        assert_eq!(record.mesh_index, 4);
    }

    #[test]
    fn test_remove_keeps_table_dense() {
        let mut table = ObjectTable::new();
        let a = table.insert(10);
        let b = table.insert(20);
        let c = table.insert(30);

        assert!(table.remove(a));
        assert_eq!(table.len(), 2);
        // c's record was swapped into a's position and is still reachable.
        assert_eq!(table.record(c).unwrap().mesh_index, 30);
        assert_eq!(table.record(b).unwrap().mesh_index, 20);
        assert!(!table.contains(a));
    }

    #[test]
    fn test_stale_handle_rejected_after_recycle() {
        let mut table = ObjectTable::new();
        let old = table.insert(1);
        assert!(table.remove(old));

        // The freed slot is recycled with a new generation.
        let new = table.insert(2);
        assert_eq!(
            ObjectHandle::from_bits(new.to_bits()).slot(),
            ObjectHandle::from_bits(old.to_bits()).slot()
        );
        assert_ne!(old, new);

        assert!(!table.contains(old));
        assert!(!table.remove(old));
        assert!(table.contains(new));
        assert_eq!(table.record(new).unwrap().mesh_index, 2);
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut table = ObjectTable::new();
        let handle = table.insert(0);
        assert!(table.remove(handle));
        assert!(!table.remove(handle));
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_mesh_index() {
        let mut table = ObjectTable::new();
        let handle = table.insert(0);
        assert!(table.set_mesh_index(handle, 7));
        assert_eq!(table.record(handle).unwrap().mesh_index, 7);

        table.remove(handle);
        assert!(!table.set_mesh_index(handle, 9));
    }

    #[test]
    fn test_handle_roundtrip_through_bits() {
        let mut table = ObjectTable::new();
        let handle = table.insert(3);
        let restored = ObjectHandle::from_bits(handle.to_bits());
        assert_eq!(handle, restored);
        assert!(table.contains(restored));
    }
}
