//! Flat `u32` buffers backing the adjacency list.
//!
//! Both tables store fixed-stride records in a single `Vec<u32>`. Edge records
//! are referenced by *address*: `slot + 1`, so that `0` can mean "no edge" in
//! every link field and freshly grown buffers are already correctly empty.

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Null edge address.
pub(crate) const NIL: u32 = 0;

/// Fields of a node record.
pub(crate) const NODE_STRIDE: usize = 4;
const FIRST_OUT: usize = 0;
const LAST_OUT: usize = 1;
const FIRST_IN: usize = 2;
const LAST_IN: usize = 3;

/// Fields of an edge record.
pub(crate) const EDGE_STRIDE: usize = 8;
pub(crate) const TYPE: usize = 0;
pub(crate) const FROM: usize = 1;
pub(crate) const TO: usize = 2;
const NEXT_HASH: usize = 3;
const NEXT_OUT: usize = 4;
const PREV_OUT: usize = 5;
const NEXT_IN: usize = 6;
const PREV_IN: usize = 7;

/// Smallest bucket array we allocate. Keeps the hash shift below 64.
pub(crate) const MIN_BUCKETS: usize = 2;

#[inline]
pub(crate) fn slot_of(addr: u32) -> usize {
    debug_assert_ne!(addr, NIL);
    addr as usize - 1
}

#[inline]
pub(crate) fn addr_of(slot: usize) -> u32 {
    (slot + 1) as u32
}

/// Chain direction relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Outgoing,
    Incoming,
}

/// Per-node chain heads and tails.
#[derive(Debug, Clone)]
pub(crate) struct NodeTable {
    pub(crate) data: Vec<u32>,
    pub(crate) count: usize,
}

impl NodeTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![NIL; capacity * NODE_STRIDE],
            count: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.data.len() / NODE_STRIDE
    }

    pub(crate) fn grow(&mut self, capacity: usize) {
        self.data.resize(capacity * NODE_STRIDE, NIL);
    }

    /// Drop every chain pointer, keeping node slots allocated.
    pub(crate) fn clear_links(&mut self) {
        self.data.fill(NIL);
    }

    #[inline]
    pub(crate) fn first(&self, node: usize, dir: Direction) -> u32 {
        let field = match dir {
            Direction::Outgoing => FIRST_OUT,
            Direction::Incoming => FIRST_IN,
        };
        self.data[node * NODE_STRIDE + field]
    }

    #[inline]
    fn last(&self, node: usize, dir: Direction) -> u32 {
        let field = match dir {
            Direction::Outgoing => LAST_OUT,
            Direction::Incoming => LAST_IN,
        };
        self.data[node * NODE_STRIDE + field]
    }

    #[inline]
    fn set_first(&mut self, node: usize, dir: Direction, addr: u32) {
        let field = match dir {
            Direction::Outgoing => FIRST_OUT,
            Direction::Incoming => FIRST_IN,
        };
        self.data[node * NODE_STRIDE + field] = addr;
    }

    #[inline]
    fn set_last(&mut self, node: usize, dir: Direction, addr: u32) {
        let field = match dir {
            Direction::Outgoing => LAST_OUT,
            Direction::Incoming => LAST_IN,
        };
        self.data[node * NODE_STRIDE + field] = addr;
    }
}

/// Edge records plus the bucket array of the hash index.
#[derive(Debug, Clone)]
pub(crate) struct EdgeTable {
    pub(crate) data: Vec<u32>,
    pub(crate) buckets: Vec<u32>,
    /// Next never-used slot. Slots below this are live or tombstones.
    pub(crate) next_slot: usize,
    pub(crate) live: usize,
    pub(crate) deleted: usize,
    bucket_shift: u32,
}

impl EdgeTable {
    pub(crate) fn new(capacity: usize, bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(MIN_BUCKETS).next_power_of_two();
        Self {
            data: vec![NIL; capacity * EDGE_STRIDE],
            buckets: vec![NIL; bucket_count],
            next_slot: 0,
            live: 0,
            deleted: 0,
            bucket_shift: 64 - bucket_count.trailing_zeros(),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.data.len() / EDGE_STRIDE
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.next_slot >= self.capacity()
    }

    #[inline]
    pub(crate) fn field(&self, addr: u32, field: usize) -> u32 {
        self.data[slot_of(addr) * EDGE_STRIDE + field]
    }

    #[inline]
    fn set_field(&mut self, addr: u32, field: usize, value: u32) {
        self.data[slot_of(addr) * EDGE_STRIDE + field] = value;
    }

    #[inline]
    pub(crate) fn next(&self, addr: u32, dir: Direction) -> u32 {
        match dir {
            Direction::Outgoing => self.field(addr, NEXT_OUT),
            Direction::Incoming => self.field(addr, NEXT_IN),
        }
    }

    #[inline]
    pub(crate) fn next_in_bucket(&self, addr: u32) -> u32 {
        self.field(addr, NEXT_HASH)
    }

    /// Bucket index for an edge triple.
    #[inline]
    pub(crate) fn bucket_of(&self, from: u32, to: u32, edge_type: u32) -> usize {
        let mut hasher = FxHasher::default();
        hasher.write_u32(from);
        hasher.write_u32(to);
        hasher.write_u32(edge_type);
        // Fibonacci hashing: take the well-mixed high bits.
        (hasher.finish().wrapping_mul(0x9E37_79B9_7F4A_7C15) >> self.bucket_shift) as usize
    }

    /// Find the live edge with this exact triple.
    pub(crate) fn find(&self, from: u32, to: u32, edge_type: u32) -> Option<u32> {
        let mut addr = self.buckets[self.bucket_of(from, to, edge_type)];
        while addr != NIL {
            if self.field(addr, TYPE) == edge_type
                && self.field(addr, FROM) == from
                && self.field(addr, TO) == to
            {
                return Some(addr);
            }
            addr = self.next_in_bucket(addr);
        }
        None
    }

    /// Write a new record into the next free slot and link it everywhere.
    ///
    /// The caller guarantees a free slot exists and the triple is not present.
    pub(crate) fn insert(&mut self, nodes: &mut NodeTable, from: u32, to: u32, edge_type: u32) {
        debug_assert!(!self.is_full());
        let addr = addr_of(self.next_slot);
        self.next_slot += 1;
        self.live += 1;

        self.set_field(addr, TYPE, edge_type);
        self.set_field(addr, FROM, from);
        self.set_field(addr, TO, to);

        let bucket = self.bucket_of(from, to, edge_type);
        self.set_field(addr, NEXT_HASH, self.buckets[bucket]);
        self.buckets[bucket] = addr;

        self.append_to_chain(nodes, addr, from as usize, Direction::Outgoing);
        self.append_to_chain(nodes, addr, to as usize, Direction::Incoming);
    }

    fn append_to_chain(&mut self, nodes: &mut NodeTable, addr: u32, node: usize, dir: Direction) {
        let (next_field, prev_field) = match dir {
            Direction::Outgoing => (NEXT_OUT, PREV_OUT),
            Direction::Incoming => (NEXT_IN, PREV_IN),
        };
        let tail = nodes.last(node, dir);
        self.set_field(addr, prev_field, tail);
        self.set_field(addr, next_field, NIL);
        if tail == NIL {
            nodes.set_first(node, dir, addr);
        } else {
            self.set_field(tail, next_field, addr);
        }
        nodes.set_last(node, dir, addr);
    }

    fn unlink_from_chain(&mut self, nodes: &mut NodeTable, addr: u32, node: usize, dir: Direction) {
        let (next_field, prev_field) = match dir {
            Direction::Outgoing => (NEXT_OUT, PREV_OUT),
            Direction::Incoming => (NEXT_IN, PREV_IN),
        };
        let prev = self.field(addr, prev_field);
        let next = self.field(addr, next_field);
        if prev == NIL {
            nodes.set_first(node, dir, next);
        } else {
            self.set_field(prev, next_field, next);
        }
        if next == NIL {
            nodes.set_last(node, dir, prev);
        } else {
            self.set_field(next, prev_field, prev);
        }
    }

    fn unlink_from_bucket(&mut self, addr: u32) {
        let bucket = self.bucket_of(
            self.field(addr, FROM),
            self.field(addr, TO),
            self.field(addr, TYPE),
        );
        let mut cursor = self.buckets[bucket];
        if cursor == addr {
            self.buckets[bucket] = self.next_in_bucket(addr);
            return;
        }
        while cursor != NIL {
            let next = self.next_in_bucket(cursor);
            if next == addr {
                self.set_field(cursor, NEXT_HASH, self.next_in_bucket(addr));
                return;
            }
            cursor = next;
        }
    }

    /// Unlink a live edge and leave a tombstone in its slot.
    ///
    /// Returns `false` and does nothing if the slot is already a tombstone.
    pub(crate) fn remove(&mut self, nodes: &mut NodeTable, addr: u32) -> bool {
        if self.field(addr, TYPE) == NIL {
            return false;
        }
        let from = self.field(addr, FROM) as usize;
        let to = self.field(addr, TO) as usize;

        self.unlink_from_bucket(addr);
        self.unlink_from_chain(nodes, addr, from, Direction::Outgoing);
        self.unlink_from_chain(nodes, addr, to, Direction::Incoming);

        let start = slot_of(addr) * EDGE_STRIDE;
        self.data[start..start + EDGE_STRIDE].fill(NIL);
        self.live -= 1;
        self.deleted += 1;
        true
    }

    /// Rebuild the bucket array with a new size. Edge slots are untouched.
    pub(crate) fn rehash(&mut self, bucket_count: usize) {
        let bucket_count = bucket_count.max(MIN_BUCKETS).next_power_of_two();
        self.buckets = vec![NIL; bucket_count];
        self.bucket_shift = 64 - bucket_count.trailing_zeros();

        for slot in 0..self.next_slot {
            let addr = addr_of(slot);
            let edge_type = self.field(addr, TYPE);
            if edge_type == NIL {
                continue;
            }
            let bucket = self.bucket_of(self.field(addr, FROM), self.field(addr, TO), edge_type);
            self.set_field(addr, NEXT_HASH, self.buckets[bucket]);
            self.buckets[bucket] = addr;
        }
    }

    /// Live `(type, from, to)` triples in slot order.
    pub(crate) fn live_triples(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.data[..self.next_slot * EDGE_STRIDE]
            .chunks_exact(EDGE_STRIDE)
            .filter(|record| record[TYPE] != NIL)
            .map(|record| (record[TYPE], record[FROM], record[TO]))
    }

    /// Length of every non-empty hash chain.
    pub(crate) fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().filter(|&&head| head != NIL).map(|&head| {
            let mut len = 0;
            let mut addr = head;
            while addr != NIL {
                len += 1;
                addr = self.next_in_bucket(addr);
            }
            len
        })
    }
}
