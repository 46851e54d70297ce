//! Slot arena with last-in-first-out recycling.
//!
//! Storage is a list of fixed-capacity buffers. A buffer is never resized
//! after allocation and never freed before teardown, so a slot keeps its
//! position for the whole life of the arena. Handles are
//! `(arena id, index, generation)` triples: releasing a slot bumps its
//! generation, which turns every copy of the old handle stale. A slot whose
//! generation reaches `u32::MAX` is retired instead of recycled, so a
//! generation is never issued twice for the same slot.

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::debug;

use crate::stats::PoolStats;

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(1);

/// Errors reported by [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    /// Growing one of the arena's containers failed.
    #[error("allocation failed while growing the {0}")]
    Allocation(&'static str),

    /// The handle's slot was released after the handle was issued.
    #[error("handle refers to a released slot")]
    StaleHandle,

    /// The handle was issued by another arena.
    #[error("handle was issued by a different arena")]
    ForeignHandle,

    /// The arena was torn down; no handle is valid any more.
    #[error("arena has been torn down")]
    TornDown,
}

/// Non-owning reference to a slot of a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    arena: u32,
    index: u32,
    generation: u32,
}

impl SlotHandle {
    /// Position of the slot across all buffers of its arena.
    #[must_use]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Number of times the slot had been released when this handle was issued.
    #[must_use]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    value: T,
    generation: u32,
    occupied: bool,
}

/// Arena of `T` values addressed through generation-tagged handles.
///
/// Acquisition order is: the most recently released slot, then the next
/// unused slot of the newest buffer, then the first slot of a freshly
/// allocated buffer.
#[derive(Debug)]
pub struct SlotArena<T> {
    id: u32,
    buffer_capacity: usize,
    buffers: Vec<Vec<Slot<T>>>,
    free: Vec<u32>,
    live: usize,
    torn_down: bool,
    stats: PoolStats,
}

impl<T> SlotArena<T> {
    /// Create an arena and allocate its first buffer of `buffer_capacity` slots.
    ///
    /// A zero capacity is treated as one.
    pub fn new(buffer_capacity: usize) -> Result<Self, ArenaError> {
        let mut arena = Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            buffer_capacity: buffer_capacity.max(1),
            buffers: Vec::new(),
            free: Vec::new(),
            live: 0,
            torn_down: false,
            stats: PoolStats::new(),
        };
        arena.grow()?;
        Ok(arena)
    }

    /// Store `value` in a slot and return its handle.
    pub fn insert(&mut self, value: T) -> Result<SlotHandle, ArenaError> {
        if self.torn_down {
            return Err(ArenaError::TornDown);
        }

        if let Some(index) = self.free.pop() {
            let (buffer, offset) = self.locate(index);
            let slot = &mut self.buffers[buffer][offset];
            slot.value = value;
            slot.occupied = true;
            let generation = slot.generation;
            self.live += 1;
            self.stats.record_reuse();
            return Ok(SlotHandle {
                arena: self.id,
                index,
                generation,
            });
        }

        let newest_full = self
            .buffers
            .last()
            .map_or(true, |buffer| buffer.len() == self.buffer_capacity);
        if newest_full {
            self.grow()?;
        }

        let buffer_index = self.buffers.len() - 1;
        let capacity = self.buffer_capacity;
        let Some(buffer) = self.buffers.last_mut() else {
            return Err(ArenaError::Allocation("slot buffer"));
        };
        let index = u32::try_from(buffer_index * capacity + buffer.len())
            .map_err(|_| ArenaError::Allocation("slot index space"))?;
        buffer.push(Slot {
            value,
            generation: 0,
            occupied: true,
        });
        self.live += 1;
        self.stats.record_fresh();
        Ok(SlotHandle {
            arena: self.id,
            index,
            generation: 0,
        })
    }

    /// Return the handle's slot to the free-list.
    ///
    /// The stored value stays in place until the slot is reused. A slot that
    /// has exhausted its generations is retired and never handed out again.
    pub fn release(&mut self, handle: SlotHandle) -> Result<(), ArenaError> {
        let slot = self.slot_mut(handle)?;
        slot.occupied = false;
        // Live slots always have a generation below `u32::MAX`.
        slot.generation += 1;
        if slot.generation == u32::MAX {
            debug!(arena = self.id, index = handle.index, "retired exhausted slot");
        } else {
            // Capacity for every slot was reserved in `grow`.
            self.free.push(handle.index);
        }
        self.live -= 1;
        self.stats.record_release();
        Ok(())
    }

    /// Borrow the value behind `handle`.
    pub fn get(&self, handle: SlotHandle) -> Result<&T, ArenaError> {
        self.slot(handle).map(|slot| &slot.value)
    }

    /// Mutably borrow the value behind `handle`.
    pub fn get_mut(&mut self, handle: SlotHandle) -> Result<&mut T, ArenaError> {
        self.slot_mut(handle).map(|slot| &mut slot.value)
    }

    /// Check whether `handle` still refers to a live slot of this arena.
    #[must_use]
    pub fn contains(&self, handle: SlotHandle) -> bool {
        self.slot(handle).is_ok()
    }

    /// Drop every buffer at once. Every outstanding handle becomes invalid.
    ///
    /// Calling this on a torn-down arena does nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        debug!(
            arena = self.id,
            buffers = self.buffers.len(),
            live = self.live,
            "tearing down slot arena"
        );
        self.buffers = Vec::new();
        self.free = Vec::new();
        self.live = 0;
        self.torn_down = true;
    }

    /// Identifier stamped into every handle this arena issues.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Number of slots in each buffer.
    #[must_use]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Number of buffers allocated so far.
    #[must_use]
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Total number of slots across all buffers.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffers.len() * self.buffer_capacity
    }

    /// Number of slots currently handed out.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live
    }

    /// Number of released slots waiting for reuse.
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Snapshot of the usage counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    fn grow(&mut self) -> Result<(), ArenaError> {
        let total = (self.buffers.len() + 1)
            .checked_mul(self.buffer_capacity)
            .filter(|&total| u32::try_from(total).is_ok())
            .ok_or(ArenaError::Allocation("slot index space"))?;

        self.buffers
            .try_reserve(1)
            .map_err(|_| ArenaError::Allocation("buffer list"))?;
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(self.buffer_capacity)
            .map_err(|_| ArenaError::Allocation("slot buffer"))?;
        self.free
            .try_reserve_exact(total - self.free.len())
            .map_err(|_| ArenaError::Allocation("free-list"))?;

        self.buffers.push(buffer);
        self.stats.record_buffer();
        debug!(
            arena = self.id,
            buffers = self.buffers.len(),
            capacity = total,
            "allocated slot buffer"
        );
        Ok(())
    }

    fn locate(&self, index: u32) -> (usize, usize) {
        let index = index as usize;
        (index / self.buffer_capacity, index % self.buffer_capacity)
    }

    fn check_owner(&self, handle: SlotHandle) -> Result<(), ArenaError> {
        if handle.arena != self.id {
            Err(ArenaError::ForeignHandle)
        } else if self.torn_down {
            Err(ArenaError::TornDown)
        } else {
            Ok(())
        }
    }

    fn slot(&self, handle: SlotHandle) -> Result<&Slot<T>, ArenaError> {
        self.check_owner(handle)?;
        let (buffer, offset) = self.locate(handle.index);
        self.buffers
            .get(buffer)
            .and_then(|buffer| buffer.get(offset))
            .filter(|slot| slot.occupied && slot.generation == handle.generation)
            .ok_or(ArenaError::StaleHandle)
    }

    fn slot_mut(&mut self, handle: SlotHandle) -> Result<&mut Slot<T>, ArenaError> {
        self.check_owner(handle)?;
        let (buffer, offset) = self.locate(handle.index);
        self.buffers
            .get_mut(buffer)
            .and_then(|buffer| buffer.get_mut(offset))
            .filter(|slot| slot.occupied && slot.generation == handle.generation)
            .ok_or(ArenaError::StaleHandle)
    }
}
