use std::fmt::Debug;

use num_traits::{Num, NumCast};

/// A trait for types that can be used as indexed coordinate scalars.
///
/// This trait is sealed and cannot be implemented for external types, so the
/// index can rely on every scalar behaving like a plain machine number
/// (copyable, totally comparable on the values that actually occur, with
/// ordinary arithmetic for squared distances).
pub trait IndexableNum:
    private::Sealed + Num + NumCast + PartialOrd + Copy + Debug + Send + Sync
{
}

impl IndexableNum for i8 {}
impl IndexableNum for u8 {}
impl IndexableNum for i16 {}
impl IndexableNum for u16 {}
impl IndexableNum for i32 {}
impl IndexableNum for u32 {}
impl IndexableNum for f32 {}
impl IndexableNum for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for i8 {}
    impl Sealed for u8 {}
    impl Sealed for i16 {}
    impl Sealed for u16 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
