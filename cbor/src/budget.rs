/*!
Allocation accounting for the tree-building decoder.

Every heap allocation made while building an item tree is first offered to an
[`Allocator`], which may refuse it.  The default [`Budget`] enforces
[`Config::max_alloc`](crate::Config::max_alloc); tests substitute
implementations that fail on a chosen allocation.
*/

use super::*;

/// Grants or refuses the allocations made by [`load_with`](crate::load_with).
pub trait Allocator {
    /// Called before allocating `bytes` bytes.
    fn allocate(&mut self, bytes: usize) -> Result<(), Error>;
}

impl<A: Allocator + ?Sized> Allocator for &mut A {
    fn allocate(&mut self, bytes: usize) -> Result<(), Error> {
        (**self).allocate(bytes)
    }
}

/// An [`Allocator`] that grants allocations until a byte limit is reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct Budget {
    remaining: Option<usize>,
}

impl Budget {
    /// `None` grants everything.
    pub fn new(limit: Option<usize>) -> Self {
        Self { remaining: limit }
    }

    pub fn remaining(&self) -> Option<usize> {
        self.remaining
    }
}

impl Allocator for Budget {
    fn allocate(&mut self, bytes: usize) -> Result<(), Error> {
        if let Some(remaining) = &mut self.remaining {
            *remaining = remaining
                .checked_sub(bytes)
                .ok_or(Error::MemoryExhausted)?;
        }
        Ok(())
    }
}

/// Reserve room for `additional` more elements in `vec`, accounting the growth
/// against `allocator`.  On failure `vec` is unchanged.
pub(crate) fn reserve<T>(
    allocator: &mut dyn Allocator,
    vec: &mut Vec<T>,
    additional: usize,
) -> Result<(), Error> {
    if vec.capacity() - vec.len() >= additional {
        return Ok(());
    }

    // Grow geometrically, as Vec would
    let additional = additional.max(vec.capacity()).max(4);
    let bytes = additional
        .checked_mul(core::mem::size_of::<T>())
        .ok_or(Error::MemoryExhausted)?;
    allocator.allocate(bytes)?;
    vec.try_reserve_exact(additional)
        .map_err(|_| Error::MemoryExhausted)
}
