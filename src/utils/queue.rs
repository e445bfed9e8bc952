use alloc::boxed::Box;

/// A fixed-size FIFO ring of arena slots
///
/// Breadth-first walks never hold more slots than the tree has live nodes, so
/// the ring is sized once and never grows or evicts.
#[derive(Debug, Clone)]
pub struct SlotQueue {
    /// The ring storage, allocated once on the heap.
    buf: Box<[usize]>,
    /// The index of the oldest slot in the ring
    front: usize,
    /// The current number of queued slots
    len: usize,
}

impl SlotQueue {
    /// Creates a new `SlotQueue` able to hold `cap` slots.
    ///
    /// # Arguments
    ///
    /// * `cap` - The capacity of the queue, at least one
    ///
    /// # Returns
    ///
    /// * `Self` - The `SlotQueue` instance
    #[inline]
    pub fn new(cap: usize) -> Self {
        assert!(cap > 0, "capacity must be > 0");
        Self {
            buf: vec![0; cap].into_boxed_slice(),
            front: 0,
            len: 0,
        }
    }

    /// Returns true if no slot is queued
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current number of queued slots
    #[inline]
    #[allow(dead_code)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Appends a slot at the back of the queue
    ///
    /// # Arguments
    ///
    /// * `slot` - The arena index to enqueue
    ///
    /// # Panics
    ///
    /// Panics if the queue is already full, which means the caller sized it
    /// below the number of nodes it walks.
    #[inline]
    pub fn push_back(&mut self, slot: usize) {
        let cap = self.buf.len();
        assert!(self.len < cap, "slot queue overflow");
        self.buf[(self.front + self.len) % cap] = slot;
        self.len += 1;
    }

    /// Removes the oldest slot from the queue
    ///
    /// # Returns
    ///
    /// * `Option<usize>` - The slot at the front, if any
    #[inline]
    pub fn pop_front(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        let slot = self.buf[self.front];
        self.front = (self.front + 1) % self.buf.len();
        self.len -= 1;
        Some(slot)
    }
}
