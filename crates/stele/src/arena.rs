//! Arena storage for expression nodes.
//!
//! Every expression node of a compilation unit lives in one
//! [`ExprArena`] and is addressed by an opaque [`ExprId`]. Allocation
//! is append-only: nothing is freed individually, and the whole arena
//! is released at once when it is dropped or cleared. Memory use is
//! monotonic for the arena's lifetime; the arena lives exactly as long
//! as the module built on top of it, so nothing outlives its storage.
//!
//! Storage is chunked. Each chunk is created with capacity [`CHUNK_LEN`]
//! and never reallocated, so the chunk count after N allocations is
//! exactly ceil(N / CHUNK_LEN) and existing nodes never move.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::expr::Expr;

/// Nodes per chunk.
pub const CHUNK_LEN: usize = 1024;

/// Opaque handle to an expression node in an [`ExprArena`].
///
/// Ids are minted only by [`ExprArena::alloc`] and are meaningless
/// outside the arena that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    fn new(index: u32) -> Self {
        ExprId(index)
    }

    /// The raw index.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// The raw index as usize.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Chunked slab owning every expression node of one compilation unit.
#[derive(Debug, Default)]
pub struct ExprArena {
    chunks: Vec<Vec<Expr>>,
}

impl ExprArena {
    /// Create an empty arena. The first chunk is created lazily on the
    /// first allocation.
    pub fn new() -> Self {
        ExprArena { chunks: Vec::new() }
    }

    /// Store a node and return its id.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(self.len() as u32);
        match self.chunks.last_mut() {
            Some(chunk) if chunk.len() < CHUNK_LEN => chunk.push(expr),
            _ => {
                let mut chunk = Vec::with_capacity(CHUNK_LEN);
                chunk.push(expr);
                self.chunks.push(chunk);
            }
        }
        id
    }

    /// Look up a node by id.
    pub fn get(&self, id: ExprId) -> Option<&Expr> {
        let idx = id.as_usize();
        self.chunks
            .get(idx / CHUNK_LEN)
            .and_then(|chunk| chunk.get(idx % CHUNK_LEN))
    }

    /// Look up a node by id, mutably.
    pub fn get_mut(&mut self, id: ExprId) -> Option<&mut Expr> {
        let idx = id.as_usize();
        self.chunks
            .get_mut(idx / CHUNK_LEN)
            .and_then(|chunk| chunk.get_mut(idx % CHUNK_LEN))
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        // Every chunk but the last is full.
        match self.chunks.last() {
            Some(last) => (self.chunks.len() - 1) * CHUNK_LEN + last.len(),
            None => 0,
        }
    }

    /// Whether the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of backing chunks currently allocated.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Drop every node and release all chunks at once.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Iterate over all nodes with their ids, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.chunks
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, expr)| (ExprId::new(i as u32), expr))
    }
}

impl Index<ExprId> for ExprArena {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        match self.get(id) {
            Some(expr) => expr,
            None => panic!("{} is not a node of this arena", id),
        }
    }
}

impl IndexMut<ExprId> for ExprArena {
    fn index_mut(&mut self, id: ExprId) -> &mut Expr {
        match self.get_mut(id) {
            Some(expr) => expr,
            None => panic!("{} is not a node of this arena", id),
        }
    }
}

// Formal verification harnesses for the arena's index arithmetic,
// using Kani's bounded model checker. Run with: cargo kani -p stele
#[cfg(kani)]
mod verification {
    use super::CHUNK_LEN;

    #[kani::proof]
    fn proof_id_decomposition_lossless() {
        let raw: u32 = kani::any();
        let idx = raw as usize;
        let chunk = idx / CHUNK_LEN;
        let slot = idx % CHUNK_LEN;
        kani::assert(
            chunk * CHUNK_LEN + slot == idx,
            "chunk/slot decomposition round-trips to the flat id",
        );
        kani::assert(slot < CHUNK_LEN, "slot stays inside its chunk");
    }

    #[kani::proof]
    fn proof_final_chunk_fill_bounds() {
        let n: u32 = kani::any();
        kani::assume(n > 0 && n as usize <= 8 * CHUNK_LEN);
        let chunks = (n as usize).div_ceil(CHUNK_LEN);
        let last_fill = n as usize - (chunks - 1) * CHUNK_LEN;
        kani::assert(
            last_fill >= 1 && last_fill <= CHUNK_LEN,
            "final chunk holds between 1 and CHUNK_LEN nodes",
        );
    }
}
