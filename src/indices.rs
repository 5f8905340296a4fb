//! Data structures to hold insertion ids that may be either `u16` or `u32` to
//! save space.

/// A vector of insertion ids that may be either `u16` or `u32`.
///
/// The narrow variant is chosen whenever the item count fits, halving the
/// memory spent tracking ids through the kd-sort on small inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Indices {
    /// An identity permutation of `num_items` ids.
    pub fn identity(num_items: usize) -> Self {
        if num_items < 65536 {
            Self::U16((0..num_items).map(|i| i as u16).collect())
        } else {
            Self::U32((0..num_items).map(|i| i as u32).collect())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U16(arr) => arr.len(),
            Self::U32(arr) => arr.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> usize {
        match self {
            Self::U16(arr) => arr[index] as usize,
            Self::U32(arr) => arr[index] as usize,
        }
    }

    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        match self {
            Self::U16(arr) => arr.swap(a, b),
            Self::U32(arr) => arr.swap(a, b),
        }
    }
}
