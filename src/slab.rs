//! Reusable scratch memory threaded through the match functions.
//!
//! The dynamic-programming matcher is called millions of times per query;
//! allocating its vectors fresh on every call would dominate the runtime.
//! Instead each worker owns a [`Slab`] and passes it to every call. The
//! matcher carves sub-slices off the slab and falls back to a fresh heap
//! allocation when a single request does not fit.
//!
//! A slab must not be shared between concurrent calls; give each worker
//! thread its own.

use std::ops::{Deref, DerefMut};

const SLAB_16_SIZE: usize = 100 * 1024;
const SLAB_32_SIZE: usize = 2048;

/// Caller-owned scratch arena: one pool of 16-bit and one of 32-bit
/// integers.
///
/// The pools are sized for the expected workload up front;
/// [`Slab::default`] matches a 100k-character DP budget. Carved sub-slices
/// are not zeroed between calls, so the algorithms initialize everything
/// they read.
#[derive(Debug)]
pub struct Slab {
    i16: Vec<i16>,
    i32: Vec<i32>,
}

impl Slab {
    /// Creates a slab with the given pool capacities.
    pub fn new(size16: usize, size32: usize) -> Self {
        Slab {
            i16: vec![0; size16],
            i32: vec![0; size32],
        }
    }

    pub(crate) fn cap16(&self) -> usize {
        self.i16.len()
    }
}

impl Default for Slab {
    fn default() -> Self {
        Slab::new(SLAB_16_SIZE, SLAB_32_SIZE)
    }
}

//------------------------------------------------------------------------------
// Carving

/// A scratch slice: either carved out of the slab or freshly allocated
/// when the slab could not accommodate the request.
pub(crate) enum Scratch<'a, T> {
    Slab(&'a mut [T]),
    Heap(Vec<T>),
}

impl<T> Deref for Scratch<'_, T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        match self {
            Scratch::Slab(s) => s,
            Scratch::Heap(v) => v,
        }
    }
}

impl<T> DerefMut for Scratch<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        match self {
            Scratch::Slab(s) => s,
            Scratch::Heap(v) => v,
        }
    }
}

/// Hands out disjoint sub-slices of a slab for the duration of one match
/// call.
///
/// An oversized request leaves the pool untouched and returns heap memory,
/// so later, smaller requests in the same call can still be served from
/// the slab.
pub(crate) struct SlabAlloc<'a> {
    i16: &'a mut [i16],
    i32: &'a mut [i32],
}

impl<'a> SlabAlloc<'a> {
    pub fn new(slab: Option<&'a mut Slab>) -> Self {
        match slab {
            Some(slab) => SlabAlloc {
                i16: &mut slab.i16,
                i32: &mut slab.i32,
            },
            None => SlabAlloc {
                i16: &mut [],
                i32: &mut [],
            },
        }
    }

    pub fn alloc16(&mut self, size: usize) -> Scratch<'a, i16> {
        if self.i16.len() >= size {
            let (head, tail) = std::mem::take(&mut self.i16).split_at_mut(size);
            self.i16 = tail;
            Scratch::Slab(head)
        } else {
            Scratch::Heap(vec![0; size])
        }
    }

    pub fn alloc32(&mut self, size: usize) -> Scratch<'a, i32> {
        if self.i32.len() >= size {
            let (head, tail) = std::mem::take(&mut self.i32).split_at_mut(size);
            self.i32 = tail;
            Scratch::Slab(head)
        } else {
            Scratch::Heap(vec![0; size])
        }
    }
}
