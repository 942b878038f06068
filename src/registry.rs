//! Mesh registry maintenance.
//!
//! The generator consumes the mesh registry as a plain slice of
//! [`MeshDescriptor`]s addressed by raw index from object records.
//! [`MeshRegistry`] is the host-side owner of that slice, fed by whatever
//! loads geometry into the shared index and vertex buffers. Because object
//! records hold raw indices, registry slots must be index-stable: freed
//! slots are zeroed in place and recycled through a free list instead of
//! being compacted away.

use crate::types::MeshDescriptor;

/// A generational handle to a mesh registry slot.
///
/// Two `u32`s so the whole handle fits a 64-bit register. The `index`
/// field is the raw mesh index object records carry; the generation only
/// exists host-side, to catch handles that outlive their mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle {
    index: u32,
    generation: u32,
}

impl MeshHandle {
    /// The raw registry index, as stored in object records.
    pub fn index(self) -> u32 {
        self.index
    }
}

/// Dense, index-stable mesh descriptor table.
///
/// # Example
///
/// ```
/// use drawgen::MeshRegistry;
///
/// let mut registry = MeshRegistry::new();
/// let cube = registry.register(0, 36, 0);
/// let quad = registry.register(36, 6, 24);
///
/// assert_eq!(cube.index(), 0);
/// assert_eq!(quad.index(), 1);
/// assert_eq!(registry.descriptors()[1].index_count, 6);
///
/// registry.unregister(cube);
/// // The slot is tombstoned, not removed: quad's index is unchanged.
/// assert_eq!(registry.descriptors().len(), 2);
/// assert_eq!(registry.descriptors()[1].index_count, 6);
/// ```
#[derive(Debug, Default)]
pub struct MeshRegistry {
    /// Descriptor table, in registry-index order. Freed slots stay in
    /// place as zeroed tombstones.
    descriptors: Vec<MeshDescriptor>,
    /// Generation per slot, bumped when the slot's mesh is unregistered.
    generations: Vec<u32>,
    /// Recycled slot indices.
    free: Vec<u32>,
}

impl MeshRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots in the descriptor table, tombstones included.
    ///
    /// This is the length the generator's mesh-index contract is checked
    /// against, not the number of live meshes.
    pub fn slot_count(&self) -> usize {
        self.descriptors.len()
    }

    /// The descriptor table, ready for upload.
    ///
    /// Slot `i` belongs to the mesh registered under index `i`; freed
    /// slots read as zeroed descriptors until recycled.
    pub fn descriptors(&self) -> &[MeshDescriptor] {
        &self.descriptors
    }

    /// Register a mesh's geometry ranges, returning its handle.
    ///
    /// `index_offset` and `index_count` are in index-buffer elements;
    /// `vertex_offset` is the base vertex added when fetching attributes.
    /// Freed slots are reused before the table grows.
    pub fn register(
        &mut self,
        index_offset: u32,
        index_count: u32,
        vertex_offset: i32,
    ) -> MeshHandle {
        let descriptor = MeshDescriptor::new(index_offset, index_count, vertex_offset);
        match self.free.pop() {
            Some(index) => {
                self.descriptors[index as usize] = descriptor;
                MeshHandle {
                    index,
                    generation: self.generations[index as usize],
                }
            }
            None => {
                let index = self.descriptors.len() as u32;
                self.descriptors.push(descriptor);
                self.generations.push(1);
                MeshHandle {
                    index,
                    generation: 1,
                }
            }
        }
    }

    /// Drop the mesh behind `handle`, tombstoning its slot.
    ///
    /// Outstanding object records still naming this index will, from the
    /// next dispatch on, produce draw arguments with an index count of
    /// zero (an empty draw) rather than stale geometry. Returns `false`
    /// for a stale or unknown handle.
    pub fn unregister(&mut self, handle: MeshHandle) -> bool {
        if !self.contains(handle) {
            return false;
        }
        self.generations[handle.index as usize] += 1;
        self.descriptors[handle.index as usize] = MeshDescriptor::default();
        self.free.push(handle.index);
        true
    }

    /// Whether `handle` refers to a live mesh.
    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.generations
            .get(handle.index as usize)
            .is_some_and(|generation| *generation == handle.generation)
    }

    /// The descriptor behind `handle`, if it is live.
    pub fn get(&self, handle: MeshHandle) -> Option<&MeshDescriptor> {
        if !self.contains(handle) {
            return None;
        }
        Some(&self.descriptors[handle.index as usize])
    }
}

static_assertions::assert_impl_all!(MeshRegistry: Send, Sync);
