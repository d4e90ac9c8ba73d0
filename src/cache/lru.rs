//! LRU List Module
//!
//! Recency-ordered sequence used for LRU eviction.
//!
//! Nodes live in a slab (`Vec` of slots) and link to each other by slot
//! index, giving a doubly linked list without `unsafe`. A [`Slot`] stays
//! valid until its node is removed; vacated slots are reused by later pushes.

// == Slot ==
/// Stable handle to a node in an [`LruList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot(usize);

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU List ==
/// Doubly linked list ordered by access time.
///
/// - Front = Least recently used
/// - Back = Most recently used
///
/// Push, remove, move-to-back and pop-front are all O(1).
#[derive(Debug)]
pub struct LruList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    // == Push Back ==
    /// Appends a value at the most recently used end.
    pub fn push_back(&mut self, value: T) -> Slot {
        let node = Node {
            value,
            prev: self.tail,
            next: None,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;

        Slot(idx)
    }

    // == Remove ==
    /// Unlinks and returns the value at `slot`.
    ///
    /// Returns None if the slot is vacant.
    pub fn remove(&mut self, slot: Slot) -> Option<T> {
        if !self.is_occupied(slot.0) {
            return None;
        }
        self.unlink(slot.0);

        let node = self.slots[slot.0].take()?;
        self.free.push(slot.0);
        self.len -= 1;
        Some(node.value)
    }

    // == Move To Back ==
    /// Marks the node at `slot` as most recently used.
    pub fn move_to_back(&mut self, slot: Slot) {
        let idx = slot.0;
        if !self.is_occupied(idx) || self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);

        let old_tail = self.tail;
        {
            let node = self.node_mut(idx);
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(tail) => self.node_mut(tail).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    // == Front ==
    /// Returns the least recently used value without removing it.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|idx| self.get(Slot(idx)))
    }

    // == Pop Front ==
    /// Removes and returns the least recently used value.
    ///
    /// Returns None if the list is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        self.remove(Slot(head))
    }

    // == Access ==
    pub fn get(&self, slot: Slot) -> Option<&T> {
        self.slots
            .get(slot.0)
            .and_then(Option::as_ref)
            .map(|node| &node.value)
    }

    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut T> {
        self.slots
            .get_mut(slot.0)
            .and_then(Option::as_mut)
            .map(|node| &mut node.value)
    }

    // == Length ==
    /// Returns the number of linked values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every value and releases all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iterate ==
    /// Iterates values from least to most recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }

    fn is_occupied(&self, idx: usize) -> bool {
        matches!(self.slots.get(idx), Some(Some(_)))
    }

    // Callers check occupancy first; links only ever point at occupied slots.
    fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
        match self.slots[idx].as_mut() {
            Some(node) => node,
            None => unreachable!("linked slot {idx} is vacant"),
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node_mut(idx);
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
/// Front-to-back iterator over an [`LruList`].
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let node = list.slots.get(self.next?)?.as_ref()?;
        self.next = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
