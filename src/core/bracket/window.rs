//! Fixed-capacity ring buffer holding the most recent candidates.

/// Ordered buffer of at most `capacity` items; pushing into a full window
/// evicts the oldest item.
///
/// Slots are a fixed arena indexed from `head`, so a push never shifts
/// existing items.
#[derive(Debug)]
pub struct Window<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> Window<T> {
    /// Create an empty window. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    /// Maximum number of items held
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current occupancy
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Append `item`, returning the evicted oldest item when the window was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let capacity = self.capacity();
        if self.len < capacity {
            let tail = (self.head + self.len) % capacity;
            self.slots[tail] = Some(item);
            self.len += 1;
            None
        } else {
            // Full: the oldest slot becomes the newest.
            let evicted = self.slots[self.head].replace(item);
            self.head = (self.head + 1) % capacity;
            evicted
        }
    }

    /// Items from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let capacity = self.capacity();
        (0..self.len).filter_map(move |offset| self.slots[(self.head + offset) % capacity].as_ref())
    }

    /// Oldest item
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Remove every item, keeping the capacity
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Take every item out, oldest first, leaving the window empty
    pub fn drain(&mut self) -> Vec<T> {
        let capacity = self.capacity();
        let items = (0..self.len)
            .filter_map(|offset| self.slots[(self.head + offset) % capacity].take())
            .collect();
        self.head = 0;
        self.len = 0;
        items
    }
}
