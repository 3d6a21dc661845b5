//! Dense storage over a [`Box3`] with offset-aware indexing.

use crate::error::FieldError;
use whorl_core::{Box3, Coord};

/// A real-valued field, the common case throughout the framework.
pub type RealField = DistributedField<f64>;

/// A worker-local dense buffer over an inclusive index box.
///
/// Storage is contiguous in the column-major (x-fastest) order defined
/// by [`Box3::offset`]; the same order is assumed by transform engines
/// and results writers, so the raw buffer from [`data`] can be handed
/// to both without copying.
///
/// The buffer length always equals the box volume. There is no hidden
/// resizing: a field over a different box is a new field.
///
/// # Examples
///
/// ```
/// use whorl_core::Box3;
/// use whorl_field::DistributedField;
///
/// // The sub-domain of a worker whose box starts at x = 8.
/// let bounds = Box3::new([8, 0, 0], [15, 7, 7]).unwrap();
/// let mut field = DistributedField::<f64>::zeros(bounds);
/// *field.at_mut([8, 0, 0]).unwrap() = 1.0;
/// assert_eq!(field.data()[0], 1.0);
/// ```
///
/// [`data`]: DistributedField::data
#[derive(Clone, Debug, PartialEq)]
pub struct DistributedField<T> {
    bounds: Box3,
    data: Vec<T>,
}

impl<T: Clone + Default> DistributedField<T> {
    /// Allocate a field over `bounds` filled with `T::default()`.
    pub fn zeros(bounds: Box3) -> Self {
        Self {
            bounds,
            data: vec![T::default(); bounds.volume()],
        }
    }
}

impl<T> DistributedField<T> {
    /// Wrap an existing buffer.
    ///
    /// Fails with [`FieldError::SizeMismatch`] unless
    /// `data.len() == bounds.volume()`.
    pub fn from_vec(bounds: Box3, data: Vec<T>) -> Result<Self, FieldError> {
        if data.len() != bounds.volume() {
            return Err(FieldError::SizeMismatch {
                len: data.len(),
                expected: bounds.volume(),
            });
        }
        Ok(Self { bounds, data })
    }

    /// The index box this field covers.
    pub fn bounds(&self) -> Box3 {
        self.bounds
    }

    /// Number of stored values (`bounds().volume()`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: a `Box3` has positive volume by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value at global grid index `coord`.
    ///
    /// Fails with [`FieldError::IndexOutOfRange`] outside the box.
    pub fn at(&self, coord: Coord) -> Result<&T, FieldError> {
        let offset = self.bounds.offset(coord).ok_or(FieldError::IndexOutOfRange {
            coord,
            bounds: self.bounds,
        })?;
        Ok(&self.data[offset])
    }

    /// Mutable value at global grid index `coord`.
    pub fn at_mut(&mut self, coord: Coord) -> Result<&mut T, FieldError> {
        let offset = self.bounds.offset(coord).ok_or(FieldError::IndexOutOfRange {
            coord,
            bounds: self.bounds,
        })?;
        Ok(&mut self.data[offset])
    }

    /// Fill the field by evaluating `f` at every coordinate, in linear
    /// order.
    ///
    /// The coordinate passed to `f` is the global grid index, so a
    /// worker at offset `[8, 0, 0]` evaluates `f([8, 0, 0])` for its
    /// first stored value.
    pub fn apply<F: FnMut(Coord) -> T>(&mut self, mut f: F) {
        for (slot, coord) in self.data.iter_mut().zip(self.bounds.iter()) {
            *slot = f(coord);
        }
    }

    /// The raw contiguous buffer, in linear order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw buffer, in linear order.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate over `(coord, value)` pairs in linear order.
    pub fn indexed_iter(&self) -> impl Iterator<Item = (Coord, &T)> {
        self.bounds.iter().zip(self.data.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zeros_has_box_volume() {
        let b = Box3::new([0, 0, 0], [3, 2, 1]).unwrap();
        let f = DistributedField::<f64>::zeros(b);
        assert_eq!(f.len(), 24);
        assert!(f.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn from_vec_checks_volume() {
        let b = Box3::new([0, 0, 0], [1, 1, 1]).unwrap();
        let err = DistributedField::from_vec(b, vec![0.0f64; 7]).unwrap_err();
        assert_eq!(
            err,
            FieldError::SizeMismatch {
                len: 7,
                expected: 8
            }
        );
        assert!(DistributedField::from_vec(b, vec![0.0f64; 8]).is_ok());
    }

    #[test]
    fn offset_aware_access() {
        // Mirrors the two-process array example: a field whose box
        // starts at x = 8 addresses [8, 0, 0] as its first element.
        let b = Box3::new([8, 0, 0], [15, 7, 0]).unwrap();
        let mut f = DistributedField::<f64>::zeros(b);
        *f.at_mut([8, 0, 0]).unwrap() = 2.0;
        assert_eq!(f.data()[0], 2.0);
        assert_eq!(*f.at([8, 0, 0]).unwrap(), 2.0);

        let err = f.at([0, 0, 0]).unwrap_err();
        assert!(matches!(err, FieldError::IndexOutOfRange { .. }));
    }

    #[test]
    fn apply_sees_global_coordinates() {
        let b = Box3::new([4, 0, 0], [7, 1, 0]).unwrap();
        let mut f = DistributedField::<f64>::zeros(b);
        f.apply(|[i, j, _]| f64::from(i) + 10.0 * f64::from(j));
        assert_eq!(f.data()[0], 4.0);
        assert_eq!(*f.at([7, 1, 0]).unwrap(), 17.0);
    }

    #[test]
    fn apply_fills_in_linear_order() {
        let b = Box3::new([0, 0, 0], [1, 1, 0]).unwrap();
        let mut order = Vec::new();
        let mut f = DistributedField::<i32>::zeros(b);
        f.apply(|c| {
            order.push(c);
            0
        });
        assert_eq!(order, vec![[0, 0, 0], [1, 0, 0], [0, 1, 0], [1, 1, 0]]);
    }

    proptest! {
        #[test]
        fn at_agrees_with_linear_buffer(
            ext in prop::array::uniform3(1i32..5),
            lo in prop::array::uniform3(-4i32..4),
        ) {
            let hi = [lo[0] + ext[0] - 1, lo[1] + ext[1] - 1, lo[2] + ext[2] - 1];
            let b = Box3::new(lo, hi).unwrap();
            let mut f = DistributedField::<usize>::zeros(b);
            let len = f.len();
            for (n, slot) in f.data_mut().iter_mut().enumerate() {
                *slot = n;
            }
            for (n, coord) in b.iter().enumerate() {
                prop_assert_eq!(*f.at(coord).unwrap(), n);
            }
            prop_assert_eq!(len, b.volume());
        }
    }
}
