//! A polymorphic vertex-set abstraction with three interchangeable
//! representations: a sorted array, a chunked bitmap, and an
//! open-addressed (Robin Hood) hash set.
//!
//! Every representation implements [`VertexSet`] with the same value
//! semantics, so kernels that are generic over `S: VertexSet<NI>` can be
//! instantiated with whichever variant suits the graph's neighborhood
//! sizes, without changing a line of kernel code.

use ahash::RandomState;
use bitvec::prelude::{BitVec, Lsb0};
use std::collections::BTreeMap;
use std::marker::PhantomData;

use graph_builder::index::Idx;

/// Common contract for all vertex-set representations.
///
/// All binary operations (`intersect`, `union`, `difference`) return a new
/// set and leave both operands untouched; the `_inplace` variants mutate
/// `self` in place and require exclusive access, matching the value
/// semantics kernels rely on when cloning candidate/finished sets during
/// recursive search.
pub trait VertexSet<NI: Idx>: Clone + Send + Sync + Sized {
    type Iter<'a>: Iterator<Item = NI> + 'a
    where
        Self: 'a;

    fn empty() -> Self;
    fn singleton(v: NI) -> Self;
    fn range(n: NI) -> Self;
    fn from_sorted_slice(sorted: &[NI]) -> Self;

    fn cardinality(&self) -> u64;
    fn contains(&self, v: NI) -> bool;
    fn add(&mut self, v: NI);
    fn remove(&mut self, v: NI);

    fn intersect(&self, other: &Self) -> Self;
    fn intersect_count(&self, other: &Self) -> u64;
    fn union(&self, other: &Self) -> Self;
    fn union_inplace(&mut self, other: &Self);
    fn difference(&self, other: &Self) -> Self;
    fn difference_inplace(&mut self, other: &Self);

    fn iter(&self) -> Self::Iter<'_>;

    fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }
}

// ---------------------------------------------------------------------
// Sorted array
// ---------------------------------------------------------------------

/// Sorted-array vertex set. The reference implementation: fastest for
/// small neighborhoods, and the one other variants are tested against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortedVertexSet<NI> {
    items: Vec<NI>,
}

impl<NI: Idx> VertexSet<NI> for SortedVertexSet<NI> {
    type Iter<'a> = std::iter::Copied<std::slice::Iter<'a, NI>> where NI: 'a;

    fn empty() -> Self {
        SortedVertexSet { items: Vec::new() }
    }

    fn singleton(v: NI) -> Self {
        SortedVertexSet { items: vec![v] }
    }

    fn range(n: NI) -> Self {
        SortedVertexSet {
            items: NI::zero().range(n).collect(),
        }
    }

    fn from_sorted_slice(sorted: &[NI]) -> Self {
        debug_assert!(sorted.windows(2).all(|w| w[0] < w[1]));
        SortedVertexSet {
            items: sorted.to_vec(),
        }
    }

    fn cardinality(&self) -> u64 {
        self.items.len() as u64
    }

    fn contains(&self, v: NI) -> bool {
        self.items.binary_search(&v).is_ok()
    }

    fn add(&mut self, v: NI) {
        if let Err(pos) = self.items.binary_search(&v) {
            self.items.insert(pos, v);
        }
    }

    fn remove(&mut self, v: NI) {
        if let Ok(pos) = self.items.binary_search(&v) {
            self.items.remove(pos);
        }
    }

    fn intersect(&self, other: &Self) -> Self {
        SortedVertexSet {
            items: sorted_intersect(&self.items, &other.items),
        }
    }

    fn intersect_count(&self, other: &Self) -> u64 {
        sorted_intersect_count(&self.items, &other.items)
    }

    fn union(&self, other: &Self) -> Self {
        SortedVertexSet {
            items: sorted_union(&self.items, &other.items),
        }
    }

    fn union_inplace(&mut self, other: &Self) {
        self.items = sorted_union(&self.items, &other.items);
    }

    fn difference(&self, other: &Self) -> Self {
        SortedVertexSet {
            items: sorted_difference(&self.items, &other.items),
        }
    }

    fn difference_inplace(&mut self, other: &Self) {
        self.items = sorted_difference(&self.items, &other.items);
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.items.iter().copied()
    }
}

fn sorted_intersect<NI: Idx>(a: &[NI], b: &[NI]) -> Vec<NI> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

fn sorted_intersect_count<NI: Idx>(a: &[NI], b: &[NI]) -> u64 {
    let mut count = 0u64;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}

fn sorted_union<NI: Idx>(a: &[NI], b: &[NI]) -> Vec<NI> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

fn sorted_difference<NI: Idx>(a: &[NI], b: &[NI]) -> Vec<NI> {
    let mut out = Vec::with_capacity(a.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out
}

// ---------------------------------------------------------------------
// Compressed bitmap
// ---------------------------------------------------------------------

const CHUNK_BITS: usize = 1 << 16;

/// Block-structured bitmap vertex set, keyed by the high bits of the
/// vertex id. Each chunk covers `CHUNK_BITS` consecutive ids and is
/// stored as a dense bit-vector, giving word-at-a-time `intersect_count`
/// via AND + popcount on overlapping chunks.
#[derive(Clone, Debug, Default)]
pub struct RoaringVertexSet<NI> {
    chunks: BTreeMap<u32, BitVec<usize, Lsb0>>,
    len: u64,
    _marker: PhantomData<NI>,
}

fn chunk_key_offset<NI: Idx>(v: NI) -> (u32, usize) {
    let idx = v.index();
    ((idx / CHUNK_BITS) as u32, idx % CHUNK_BITS)
}

impl<NI> RoaringVertexSet<NI> {
    fn chunk_origin(key: u32) -> usize {
        key as usize * CHUNK_BITS
    }
}

impl<NI: Idx> VertexSet<NI> for RoaringVertexSet<NI> {
    type Iter<'a> = std::vec::IntoIter<NI> where NI: 'a;

    fn empty() -> Self {
        RoaringVertexSet {
            chunks: BTreeMap::new(),
            len: 0,
            _marker: PhantomData,
        }
    }

    fn singleton(v: NI) -> Self {
        let mut s = Self::empty();
        s.add(v);
        s
    }

    fn range(n: NI) -> Self {
        let mut s = Self::empty();
        for v in NI::zero().range(n) {
            s.add(v);
        }
        s
    }

    fn from_sorted_slice(sorted: &[NI]) -> Self {
        let mut s = Self::empty();
        for &v in sorted {
            s.add(v);
        }
        s
    }

    fn cardinality(&self) -> u64 {
        self.len
    }

    fn contains(&self, v: NI) -> bool {
        let (key, offset) = chunk_key_offset(v);
        self.chunks
            .get(&key)
            .map(|chunk| chunk[offset])
            .unwrap_or(false)
    }

    fn add(&mut self, v: NI) {
        let (key, offset) = chunk_key_offset(v);
        let chunk = self
            .chunks
            .entry(key)
            .or_insert_with(|| BitVec::repeat(false, CHUNK_BITS));
        if !chunk[offset] {
            chunk.set(offset, true);
            self.len += 1;
        }
    }

    fn remove(&mut self, v: NI) {
        let (key, offset) = chunk_key_offset(v);
        if let Some(chunk) = self.chunks.get_mut(&key) {
            if chunk[offset] {
                chunk.set(offset, false);
                self.len -= 1;
            }
        }
    }

    fn intersect(&self, other: &Self) -> Self {
        let mut out = Self::empty();
        for (key, chunk) in &self.chunks {
            if let Some(other_chunk) = other.chunks.get(key) {
                let mut merged = chunk.clone();
                merged &= other_chunk.clone();
                let ones = merged.count_ones() as u64;
                if ones > 0 {
                    out.len += ones;
                    out.chunks.insert(*key, merged);
                }
            }
        }
        out
    }

    fn intersect_count(&self, other: &Self) -> u64 {
        let (small, large) = if self.chunks.len() <= other.chunks.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut count = 0u64;
        for (key, chunk) in &small.chunks {
            if let Some(other_chunk) = large.chunks.get(key) {
                for (a, b) in chunk
                    .as_raw_slice()
                    .iter()
                    .zip(other_chunk.as_raw_slice().iter())
                {
                    count += (a & b).count_ones() as u64;
                }
            }
        }
        count
    }

    fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.union_inplace(other);
        out
    }

    fn union_inplace(&mut self, other: &Self) {
        for (key, other_chunk) in &other.chunks {
            match self.chunks.get_mut(key) {
                Some(chunk) => {
                    let before = chunk.count_ones() as u64;
                    *chunk |= other_chunk.clone();
                    self.len += chunk.count_ones() as u64 - before;
                }
                None => {
                    self.len += other_chunk.count_ones() as u64;
                    self.chunks.insert(*key, other_chunk.clone());
                }
            }
        }
    }

    fn difference(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.difference_inplace(other);
        out
    }

    fn difference_inplace(&mut self, other: &Self) {
        for (key, other_chunk) in &other.chunks {
            if let Some(chunk) = self.chunks.get_mut(key) {
                let before = chunk.count_ones() as u64;
                let mut negated = other_chunk.clone();
                negated = !negated;
                *chunk &= negated;
                self.len -= before - chunk.count_ones() as u64;
            }
        }
    }

    fn iter(&self) -> Self::Iter<'_> {
        let mut out = Vec::with_capacity(self.len as usize);
        for (&key, chunk) in &self.chunks {
            let origin = Self::chunk_origin(key);
            out.extend(chunk.iter_ones().map(|offset| NI::new(origin + offset)));
        }
        out.into_iter()
    }
}

// ---------------------------------------------------------------------
// Open-addressed (Robin Hood) hash set
// ---------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Slot<NI> {
    Empty,
    Occupied { value: NI, probe_len: u32 },
}

impl<NI> Default for Slot<NI> {
    fn default() -> Self {
        Slot::Empty
    }
}

/// Open-addressed vertex set with Robin Hood displacement, giving O(1)
/// amortized membership with bounded worst-case probe length. Iteration
/// order is unspecified and not sorted.
#[derive(Clone, Debug)]
pub struct HashVertexSet<NI> {
    table: Vec<Slot<NI>>,
    len: usize,
    hasher: RandomState,
}

const HASH_SET_SEEDS: (u64, u64, u64, u64) = (0x5eed_1, 0x5eed_2, 0x5eed_3, 0x5eed_4);

impl<NI: Idx> HashVertexSet<NI> {
    fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.next_power_of_two().max(8);
        HashVertexSet {
            table: (0..capacity).map(|_| Slot::Empty).collect(),
            len: 0,
            hasher: RandomState::with_seeds(
                HASH_SET_SEEDS.0,
                HASH_SET_SEEDS.1,
                HASH_SET_SEEDS.2,
                HASH_SET_SEEDS.3,
            ),
        }
    }

    fn slot_for(&self, v: NI) -> usize {
        use std::hash::{BuildHasher, Hash, Hasher};
        let mut hasher = self.hasher.build_hasher();
        v.index().hash(&mut hasher);
        (hasher.finish() as usize) & (self.table.len() - 1)
    }

    fn load_factor(&self) -> f64 {
        self.len as f64 / self.table.len() as f64
    }

    fn grow(&mut self) {
        let old = std::mem::replace(&mut self.table, Vec::new());
        *self = Self::with_capacity(old.len() * 2);
        for slot in old {
            if let Slot::Occupied { value, .. } = slot {
                self.raw_insert(value);
            }
        }
    }

    fn raw_insert(&mut self, mut value: NI) {
        let mut pos = self.slot_for(value);
        let mut probe_len = 0u32;
        loop {
            match &mut self.table[pos] {
                Slot::Empty => {
                    self.table[pos] = Slot::Occupied { value, probe_len };
                    self.len += 1;
                    return;
                }
                Slot::Occupied {
                    value: existing,
                    probe_len: existing_probe,
                } => {
                    if *existing == value {
                        return;
                    }
                    if *existing_probe < probe_len {
                        std::mem::swap(existing, &mut value);
                        std::mem::swap(existing_probe, &mut probe_len);
                    }
                }
            }
            pos = (pos + 1) & (self.table.len() - 1);
            probe_len += 1;
        }
    }

    fn find_pos(&self, v: NI) -> Option<usize> {
        let mut pos = self.slot_for(v);
        let mut probe_len = 0u32;
        loop {
            match &self.table[pos] {
                Slot::Empty => return None,
                Slot::Occupied {
                    value,
                    probe_len: existing_probe,
                } => {
                    if *value == v {
                        return Some(pos);
                    }
                    if *existing_probe < probe_len {
                        return None;
                    }
                }
            }
            pos = (pos + 1) & (self.table.len() - 1);
            probe_len += 1;
        }
    }
}

impl<NI: Idx> VertexSet<NI> for HashVertexSet<NI> {
    type Iter<'a> = std::vec::IntoIter<NI> where NI: 'a;

    fn empty() -> Self {
        Self::with_capacity(8)
    }

    fn singleton(v: NI) -> Self {
        let mut s = Self::empty();
        s.add(v);
        s
    }

    fn range(n: NI) -> Self {
        let mut s = Self::with_capacity(n.index());
        for v in NI::zero().range(n) {
            s.add(v);
        }
        s
    }

    fn from_sorted_slice(sorted: &[NI]) -> Self {
        let mut s = Self::with_capacity(sorted.len());
        for &v in sorted {
            s.add(v);
        }
        s
    }

    fn cardinality(&self) -> u64 {
        self.len as u64
    }

    fn contains(&self, v: NI) -> bool {
        self.find_pos(v).is_some()
    }

    fn add(&mut self, v: NI) {
        if self.contains(v) {
            return;
        }
        if self.load_factor() > 0.75 {
            self.grow();
        }
        self.raw_insert(v);
    }

    fn remove(&mut self, v: NI) {
        let Some(mut pos) = self.find_pos(v) else {
            return;
        };
        self.table[pos] = Slot::Empty;
        self.len -= 1;
        // Backward-shift deletion keeps probe sequences intact.
        loop {
            let next = (pos + 1) & (self.table.len() - 1);
            match std::mem::take(&mut self.table[next]) {
                Slot::Empty => break,
                Slot::Occupied { value, probe_len } if probe_len > 0 => {
                    self.table[pos] = Slot::Occupied {
                        value,
                        probe_len: probe_len - 1,
                    };
                    pos = next;
                }
                occupied => {
                    self.table[next] = occupied;
                    break;
                }
            }
        }
    }

    fn intersect(&self, other: &Self) -> Self {
        let mut out = Self::empty();
        for v in self.iter() {
            if other.contains(v) {
                out.add(v);
            }
        }
        out
    }

    fn intersect_count(&self, other: &Self) -> u64 {
        self.iter().filter(|&v| other.contains(v)).count() as u64
    }

    fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.union_inplace(other);
        out
    }

    fn union_inplace(&mut self, other: &Self) {
        for v in other.iter() {
            self.add(v);
        }
    }

    fn difference(&self, other: &Self) -> Self {
        let mut out = Self::empty();
        for v in self.iter() {
            if !other.contains(v) {
                out.add(v);
            }
        }
        out
    }

    fn difference_inplace(&mut self, other: &Self) {
        for v in other.iter() {
            self.remove(v);
        }
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.table
            .iter()
            .filter_map(|slot| match slot {
                Slot::Occupied { value, .. } => Some(*value),
                Slot::Empty => None,
            })
            .collect::<Vec<_>>()
            .into_iter()
    }
}
