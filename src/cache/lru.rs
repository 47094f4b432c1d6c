//! LRU List Module
//!
//! Recency-ordered storage: a key index pointing into an arena of entries that
//! are doubly linked from most to least recently used.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::mem;

use crate::cache::CacheEntry;

// == Node ==
/// One arena slot: the key, its entry, and the recency links.
#[derive(Debug)]
struct Node<K, V> {
    key: K,
    entry: CacheEntry<V>,
    /// Neighbour closer to the front (more recently used)
    prev: Option<usize>,
    /// Neighbour closer to the back (less recently used)
    next: Option<usize>,
}

// == LRU List ==
/// Entries ordered by access time, addressable by key in O(1).
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Nodes live in a slab of `Option<Node>` and are linked by slot index, so
/// moving an entry to the front or unlinking it never touches other slots.
/// Freed slots are recycled through `free`.
#[derive(Debug)]
pub struct LruList<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K, V> Default for LruList<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }
}

impl<K, V> LruList<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Length ==
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks if a key is present, without changing its position.
    #[cfg(test)]
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Peek ==
    /// Returns the entry for `key` without changing its position.
    pub fn peek<Q>(&self, key: &Q) -> Option<&CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        Some(&self.node(idx).entry)
    }

    // == Touch ==
    /// Marks a key as recently used (moves to front) and returns its entry.
    ///
    /// Returns None if the key is not present.
    pub fn touch<Q>(&mut self, key: &Q) -> Option<&mut CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(&mut self.node_mut(idx).entry)
    }

    // == Push Front ==
    /// Inserts `key` at the front.
    ///
    /// If the key is already present its entry is replaced, it is moved to
    /// the front, and the previous entry is returned.
    pub fn push_front(&mut self, key: K, entry: CacheEntry<V>) -> Option<CacheEntry<V>> {
        if let Some(&idx) = self.index.get(&key) {
            self.move_to_front(idx);
            return Some(mem::replace(&mut self.node_mut(idx).entry, entry));
        }

        let node = Node {
            key: key.clone(),
            entry,
            prev: None,
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

        self.index.insert(key, idx);
        self.link_front(idx);
        None
    }

    // == Remove ==
    /// Removes a key, returning its entry.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        Some(self.remove_slot(idx).1)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn evict_oldest(&mut self) -> Option<(K, CacheEntry<V>)> {
        let idx = self.tail?;
        Some(self.remove_slot(idx))
    }

    // == Peek Oldest ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_oldest(&self) -> Option<(&K, &CacheEntry<V>)> {
        let node = self.node(self.tail?);
        Some((&node.key, &node.entry))
    }

    // == Clear ==
    /// Drops every entry and resets the arena.
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    // == Iter ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    // == Internal Linking ==
    fn node(&self, idx: usize) -> &Node<K, V> {
        match self.slots.get(idx) {
            Some(Some(node)) => node,
            _ => unreachable!("slot {idx} is linked but vacant"),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        match self.slots.get_mut(idx) {
            Some(Some(node)) => node,
            _ => unreachable!("slot {idx} is linked but vacant"),
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head) => self.node_mut(head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
        let node = self.node_mut(idx);
        node.prev = None;
        node.next = None;
    }

    fn remove_slot(&mut self, idx: usize) -> (K, CacheEntry<V>) {
        self.unlink(idx);
        let node = match self.slots[idx].take() {
            Some(node) => node,
            None => unreachable!("slot {idx} is indexed but vacant"),
        };
        self.free.push(idx);
        self.index.remove(&node.key);
        (node.key, node.entry)
    }
}

// == Iterator ==
/// Front-to-back iterator over an [`LruList`].
pub struct Iter<'a, K, V> {
    list: &'a LruList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (&'a K, &'a CacheEntry<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?);
        self.cursor = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
