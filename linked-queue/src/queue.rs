use std::fmt;

use log::{trace, warn};

use crate::error::QueueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

pub(crate) type Link = Option<NodeId>;

#[derive(Debug)]
struct Node {
    value: String,
    next: Link,
}

#[derive(Debug)]
enum Slot {
    Occupied(Node),
    Vacant { next_free: Option<usize> },
}

/// Owns every node of a queue. Links between nodes are slot indices, and
/// released slots are threaded into a free list so later inserts reuse them.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Option<usize>,
}

impl Arena {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: None,
        }
    }

    fn try_insert(&mut self, node: Node) -> Result<NodeId, QueueError> {
        match self.free {
            Some(index) => {
                self.free = match self.slots[index] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at occupied slot {index}"),
                };
                self.slots[index] = Slot::Occupied(node);
                Ok(NodeId(index))
            }
            None => {
                self.slots.try_reserve(1).map_err(|_| QueueError::Alloc)?;
                self.slots.push(Slot::Occupied(node));
                Ok(NodeId(self.slots.len() - 1))
            }
        }
    }

    fn remove(&mut self, id: NodeId) -> Node {
        let vacant = Slot::Vacant {
            next_free: self.free,
        };
        match std::mem::replace(&mut self.slots[id.0], vacant) {
            Slot::Occupied(node) => {
                self.free = Some(id.0);
                node
            }
            Slot::Vacant { .. } => unreachable!("node {} was already released", id.0),
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
    }

    fn node(&self, id: NodeId) -> &Node {
        match &self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("link to released node {}", id.0),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match &mut self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("link to released node {}", id.0),
        }
    }

    pub(crate) fn value(&self, id: NodeId) -> &str {
        &self.node(id).value
    }

    pub(crate) fn next(&self, id: NodeId) -> Link {
        self.node(id).next
    }

    pub(crate) fn set_next(&mut self, id: NodeId, next: Link) {
        self.node_mut(id).next = next;
    }

    /// Follows links from `id` until the node with no successor.
    pub(crate) fn last(&self, mut id: NodeId) -> NodeId {
        while let Some(next) = self.next(id) {
            id = next;
        }
        id
    }

    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

/// A queue of owned strings backed by a singly linked list.
///
/// Elements can be inserted at either end and removed from the front, so the
/// queue serves both FIFO (`insert_back` + `remove_front`) and LIFO
/// (`insert_front` + `remove_front`) access.
#[derive(Default)]
pub struct Queue {
    nodes: Arena,
    head: Link,
    tail: Link,
    size: usize,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            head: None,
            tail: None,
            size: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn front(&self) -> Option<&str> {
        self.head.map(|id| self.nodes.value(id))
    }

    pub fn back(&self) -> Option<&str> {
        self.tail.map(|id| self.nodes.value(id))
    }

    /// Copies `text` into a new element linked before the current head.
    ///
    /// On allocation failure the queue is left untouched.
    pub fn insert_front(&mut self, text: &str) -> Result<(), QueueError> {
        let value = copy_text(text)?;
        let id = self.nodes.try_insert(Node {
            value,
            next: self.head,
        })?;

        if self.head.is_none() {
            self.tail = Some(id);
        }
        self.head = Some(id);
        self.size += 1;
        Ok(())
    }

    /// Copies `text` into a new element linked after the current tail.
    ///
    /// On allocation failure the queue is left untouched.
    pub fn insert_back(&mut self, text: &str) -> Result<(), QueueError> {
        let value = copy_text(text)?;
        let id = self.nodes.try_insert(Node { value, next: None })?;

        match self.tail {
            Some(tail) => self.nodes.set_next(tail, Some(id)),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.size += 1;
        Ok(())
    }

    /// Unlinks the head element and hands its value to the caller.
    pub fn pop_front(&mut self) -> Option<String> {
        let id = self.head?;
        let node = self.nodes.remove(id);

        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        self.size -= 1;
        Some(node.value)
    }

    /// Removes the head element.
    ///
    /// If `buf` is supplied, up to `buf.len() - 1` bytes of the removed value
    /// are copied into it and every remaining byte is set to `0`. Values that
    /// do not fit are truncated without error.
    pub fn remove_front(&mut self, buf: Option<&mut [u8]>) -> Result<(), QueueError> {
        let value = self.pop_front().ok_or(QueueError::Empty)?;
        if let Some(buf) = buf {
            copy_truncated(&value, buf);
        }
        Ok(())
    }

    /// Reverses the order of the elements by rewriting links only.
    pub fn reverse(&mut self) {
        let mut prev = None;
        let mut current = self.head;
        self.tail = self.head;

        while let Some(id) = current {
            current = self.nodes.next(id);
            self.nodes.set_next(id, prev);
            prev = Some(id);
        }
        self.head = prev;
    }

    /// Releases every element, keeping the queue itself usable.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
        self.size = 0;
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            current: self.head,
            remaining: self.size,
        }
    }

    /// Hands the chain starting at `head` to `f` and installs the chain it
    /// returns, then restores `tail` to the new last node.
    pub(crate) fn relink<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Arena, Link, usize) -> Link,
    {
        self.head = f(&mut self.nodes, self.head.take(), self.size);
        self.tail = self.head.map(|head| self.nodes.last(head));
    }

    #[cfg(test)]
    pub(crate) fn links(&self) -> Vec<(NodeId, Link)> {
        let mut links = Vec::with_capacity(self.size);
        let mut current = self.head;
        while let Some(id) = current {
            current = self.nodes.next(id);
            links.push((id, current));
        }
        links
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        trace!("releasing queue with {} elements", self.size);
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterates the values of a [`Queue`] from head to tail.
pub struct Iter<'a> {
    nodes: &'a Arena,
    current: Link,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.nodes.next(id);
        self.remaining -= 1;
        Some(self.nodes.value(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

fn copy_text(text: &str) -> Result<String, QueueError> {
    let mut value = String::new();
    value.try_reserve_exact(text.len()).map_err(|_| {
        warn!("failed to allocate {} bytes for a new element", text.len());
        QueueError::Alloc
    })?;
    value.push_str(text);
    Ok(value)
}

fn copy_truncated(value: &str, buf: &mut [u8]) {
    let Some(capacity) = buf.len().checked_sub(1) else {
        return;
    };
    let copied = value.len().min(capacity);
    buf[..copied].copy_from_slice(&value.as_bytes()[..copied]);
    buf[copied..].fill(0);
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rstest::rstest;

    use super::Queue;
    use crate::error::QueueError;

    fn queue_of(values: &[&str]) -> Queue {
        let mut queue = Queue::new();
        for value in values {
            queue.insert_back(value).unwrap();
        }
        queue
    }

    fn contents(queue: &Queue) -> Vec<&str> {
        queue.iter().collect_vec()
    }

    #[test]
    fn test_new_queue_is_empty() {
        let queue = Queue::new();
        assert_eq!(queue.size(), 0);
        assert!(queue.is_empty());
        assert_eq!(queue.front(), None);
        assert_eq!(queue.back(), None);
        assert!(queue.links().is_empty());
    }

    #[test]
    fn test_insert_front_then_remove() {
        let mut queue = Queue::new();
        queue.insert_front("b").unwrap();
        queue.insert_front("a").unwrap();
        assert_eq!(contents(&queue), vec!["a", "b"]);

        let mut buf = [0xff_u8; 8];
        queue.remove_front(Some(&mut buf[..])).unwrap();
        assert_eq!(&buf, b"a\0\0\0\0\0\0\0");
        assert_eq!(queue.size(), 1);
        assert_eq!(queue.front(), Some("b"));
        assert_eq!(queue.back(), Some("b"));
    }

    #[test]
    fn test_first_insert_sets_head_and_tail() {
        let mut queue = Queue::new();
        queue.insert_back("only").unwrap();
        assert_eq!(queue.front(), Some("only"));
        assert_eq!(queue.back(), Some("only"));

        let mut queue = Queue::new();
        queue.insert_front("only").unwrap();
        assert_eq!(queue.front(), Some("only"));
        assert_eq!(queue.back(), Some("only"));
    }

    #[test]
    fn test_insert_copies_caller_buffer() {
        let mut text = String::from("hello");
        let mut queue = Queue::new();
        queue.insert_back(&text).unwrap();
        text.push_str(" world");
        assert_eq!(queue.front(), Some("hello"));
    }

    #[test]
    fn test_removing_last_element_resets_tail() {
        let mut queue = queue_of(&["x"]);
        queue.remove_front(None).unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.back(), None);

        queue.insert_back("y").unwrap();
        assert_eq!(contents(&queue), vec!["y"]);
        assert_eq!(queue.front(), queue.back());
    }

    #[test]
    fn test_remove_from_empty_queue_fails() {
        let mut queue = Queue::new();
        let mut buf = [0_u8; 4];
        assert_eq!(queue.remove_front(Some(&mut buf[..])), Err(QueueError::Empty));
        assert_eq!(queue.pop_front(), None);
        assert_eq!(queue.size(), 0);
    }

    #[rstest]
    #[case("", 8, "")]
    #[case("abc", 4, "abc")]
    #[case("abcd", 4, "abc")]
    #[case("abcdefgh", 1, "")]
    fn test_remove_truncates_to_capacity(
        #[case] value: &str,
        #[case] capacity: usize,
        #[case] expected: &str,
    ) {
        let mut queue = Queue::new();
        queue.insert_front(value).unwrap();

        let mut buf = vec![0xff_u8; capacity];
        queue.remove_front(Some(&mut buf[..])).unwrap();

        assert_eq!(&buf[..expected.len()], expected.as_bytes());
        assert!(buf[expected.len()..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_remove_into_zero_capacity_buffer() {
        let mut queue = queue_of(&["value"]);
        let mut buf: [u8; 0] = [];
        queue.remove_front(Some(&mut buf[..])).unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_size_tracks_inserts_and_removes() {
        let mut queue = Queue::new();
        let mut expected = 0;
        for i in 0..20 {
            if i % 3 == 2 {
                if queue.remove_front(None).is_ok() {
                    expected -= 1;
                }
            } else if i % 2 == 0 {
                queue.insert_front(&i.to_string()).unwrap();
                expected += 1;
            } else {
                queue.insert_back(&i.to_string()).unwrap();
                expected += 1;
            }
            assert_eq!(queue.size(), expected);
            assert_eq!(queue.links().len(), expected);
        }
    }

    #[test]
    fn test_reverse() {
        let mut queue = queue_of(&["a", "b", "c", "d"]);
        queue.reverse();
        assert_eq!(contents(&queue), vec!["d", "c", "b", "a"]);
        assert_eq!(queue.front(), Some("d"));
        assert_eq!(queue.back(), Some("a"));

        queue.insert_back("z").unwrap();
        assert_eq!(contents(&queue), vec!["d", "c", "b", "a", "z"]);
    }

    #[test]
    fn test_reverse_is_its_own_inverse() {
        let mut queue = queue_of(&["1", "2", "3", "4", "5"]);
        let before = queue.links();
        queue.reverse();
        queue.reverse();
        assert_eq!(queue.links(), before);
    }

    #[rstest]
    #[case(&[])]
    #[case(&["single"])]
    fn test_reverse_short_queue_is_noop(#[case] values: &[&str]) {
        let mut queue = queue_of(values);
        queue.reverse();
        assert_eq!(contents(&queue), values.to_vec());
        assert_eq!(queue.back(), values.last().copied());
    }

    #[test]
    fn test_released_slots_are_reused() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.remove_front(None).unwrap();
        queue.remove_front(None).unwrap();
        queue.insert_front("d").unwrap();
        queue.insert_back("e").unwrap();

        assert_eq!(queue.nodes.slot_count(), 3);
        assert_eq!(contents(&queue), vec!["d", "c", "e"]);
    }

    #[test]
    fn test_clear() {
        let mut queue = queue_of(&["a", "b"]);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.front(), None);
        queue.insert_back("c").unwrap();
        assert_eq!(contents(&queue), vec!["c"]);
    }

    #[test]
    fn test_debug_lists_values() {
        let queue = queue_of(&["a", "b"]);
        assert_eq!(format!("{queue:?}"), r#"["a", "b"]"#);
        assert_eq!(queue.iter().len(), 2);
    }
}
