/// Hands out bounded `u32` slot indices, lowest free slot first.
///
/// Models a fixed bank of backend units (light slots, texture units) that are
/// probed from 0 upward: allocation returns the first slot not in use, or
/// `None` once the bank is full.
///
/// # Example
///
/// ```ignore
/// let mut slots = SlotAllocator::new(2);
/// let a = slots.alloc();  // Some(0)
/// let b = slots.alloc();  // Some(1)
/// slots.alloc();          // None, bank full
/// slots.free(0);
/// slots.alloc();          // Some(0)
/// ```
#[derive(Debug, Clone)]
pub struct SlotAllocator {
    in_use: Vec<bool>,
    len: u32,
}

impl SlotAllocator {
    /// Create an allocator over slots `0..capacity`
    pub fn new(capacity: u32) -> Self {
        Self {
            in_use: vec![false; capacity as usize],
            len: 0,
        }
    }

    /// Allocate the lowest free slot, or `None` when every slot is taken
    pub fn alloc(&mut self) -> Option<u32> {
        let id = self.in_use.iter().position(|used| !used)?;
        self.in_use[id] = true;
        self.len += 1;
        Some(id as u32)
    }

    /// Return a slot to the pool. Returns `false` if it was not allocated.
    pub fn free(&mut self, id: u32) -> bool {
        match self.in_use.get_mut(id as usize) {
            Some(used) if *used => {
                *used = false;
                self.len -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn is_allocated(&self, id: u32) -> bool {
        self.in_use.get(id as usize).copied().unwrap_or(false)
    }

    /// Total number of slots
    pub fn capacity(&self) -> u32 {
        self.in_use.len() as u32
    }

    /// Number of currently allocated slots
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether no slots are currently allocated
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "slot_allocator_tests.rs"]
mod tests;
