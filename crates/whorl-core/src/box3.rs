//! Inclusive axis-aligned 3-D index ranges.

use crate::error::BoxError;
use std::fmt;

/// A grid index triple `[i, j, k]`.
pub type Coord = [i32; 3];

/// An axis-aligned, inclusive integer index range in three dimensions.
///
/// `low <= high` componentwise is enforced at construction. A `Box3`
/// describes either a worker's real-space sub-domain (inbox) or its
/// spectral-space sub-domain (outbox).
///
/// # Linearization
///
/// Indices map to linear offsets in column-major (x-fastest) order:
/// `offset(i, j, k) = (i - low.0) + nx·(j - low.1) + nx·ny·(k - low.2)`.
/// This single convention is shared by field storage, the transform
/// engine contract, and results writers; [`Box3::offset`] and
/// [`Box3::iter`] are the only places that encode it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Box3 {
    low: Coord,
    high: Coord,
}

impl Box3 {
    /// Create a box from inclusive corner indices.
    ///
    /// Returns [`BoxError::InvertedRange`] if `low > high` on any axis.
    pub fn new(low: Coord, high: Coord) -> Result<Self, BoxError> {
        for axis in 0..3 {
            if low[axis] > high[axis] {
                return Err(BoxError::InvertedRange {
                    axis,
                    low: low[axis],
                    high: high[axis],
                });
            }
        }
        Ok(Self { low, high })
    }

    /// The box `[0,0,0]..=[dims[0]-1, dims[1]-1, dims[2]-1]`.
    ///
    /// This is the global real-space box of a grid with the given
    /// dimensions. All dimensions must be `>= 1`.
    pub fn from_dims(dims: [i32; 3]) -> Result<Self, BoxError> {
        Self::new([0, 0, 0], [dims[0] - 1, dims[1] - 1, dims[2] - 1])
    }

    /// Inclusive low corner.
    pub fn low(&self) -> Coord {
        self.low
    }

    /// Inclusive high corner.
    pub fn high(&self) -> Coord {
        self.high
    }

    /// Number of indices along `axis`: `high - low + 1`.
    pub fn extent(&self, axis: usize) -> i32 {
        self.high[axis] - self.low[axis] + 1
    }

    /// Extents along all three axes.
    pub fn extents(&self) -> [i32; 3] {
        [self.extent(0), self.extent(1), self.extent(2)]
    }

    /// Total number of indices in the box.
    pub fn volume(&self) -> usize {
        (0..3).map(|axis| self.extent(axis) as usize).product()
    }

    /// Whether `coord` lies inside the box (inclusive).
    pub fn contains(&self, coord: Coord) -> bool {
        (0..3).all(|axis| self.low[axis] <= coord[axis] && coord[axis] <= self.high[axis])
    }

    /// Intersection of two boxes, or `None` when they are disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let mut low = [0; 3];
        let mut high = [0; 3];
        for axis in 0..3 {
            low[axis] = self.low[axis].max(other.low[axis]);
            high[axis] = self.high[axis].min(other.high[axis]);
            if low[axis] > high[axis] {
                return None;
            }
        }
        Some(Self { low, high })
    }

    /// Whether two boxes share no indices.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.intersection(other).is_none()
    }

    /// Linear offset of `coord` within the box in column-major
    /// (x-fastest) order, or `None` if the coordinate is outside.
    pub fn offset(&self, coord: Coord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let nx = self.extent(0) as usize;
        let ny = self.extent(1) as usize;
        let di = (coord[0] - self.low[0]) as usize;
        let dj = (coord[1] - self.low[1]) as usize;
        let dk = (coord[2] - self.low[2]) as usize;
        Some(di + nx * (dj + ny * dk))
    }

    /// Coordinate at a linear offset, inverse of [`Box3::offset`].
    ///
    /// Returns `None` if `offset >= volume()`.
    pub fn coord_at(&self, offset: usize) -> Option<Coord> {
        if offset >= self.volume() {
            return None;
        }
        let nx = self.extent(0) as usize;
        let ny = self.extent(1) as usize;
        let i = offset % nx;
        let j = (offset / nx) % ny;
        let k = offset / (nx * ny);
        Some([
            self.low[0] + i as i32,
            self.low[1] + j as i32,
            self.low[2] + k as i32,
        ])
    }

    /// Iterate over all coordinates in linear (x-fastest) order.
    pub fn iter(&self) -> Box3Iter {
        Box3Iter {
            boxed: *self,
            next: 0,
            volume: self.volume(),
        }
    }

    /// Real-to-complex image of this box along `axis`.
    ///
    /// The spectral transform of real data is conjugate-symmetric, so
    /// the complex domain stores only `L/2 + 1` indices along the r2c
    /// axis. For a sub-range `[a, b]` of a non-negative index axis the
    /// image is `[a == 0 ? 0 : a/2 + 1, (b+1)/2]` (integer division).
    ///
    /// Applied to a global box `[0, L-1]` this yields `[0, L/2]`.
    /// Applied to the consecutive intervals of any partition of
    /// `[0, L-1]`, the images are consecutive and tile `[0, L/2]`
    /// exactly, which is what makes the per-rank inbox/outbox pairing
    /// consistent. The image of a narrow interval can be empty; that
    /// case returns `None` and is a decomposition-level error.
    pub fn r2c(&self, axis: usize) -> Option<Self> {
        let a = self.low[axis];
        let b = self.high[axis];
        let low = if a == 0 { 0 } else { a / 2 + 1 };
        let high = (b + 1) / 2;
        if low > high {
            return None;
        }
        let mut new_low = self.low;
        let mut new_high = self.high;
        new_low[axis] = low;
        new_high[axis] = high;
        Some(Self {
            low: new_low,
            high: new_high,
        })
    }
}

impl fmt::Display for Box3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}] x [{}, {}, {}]",
            self.low[0], self.low[1], self.low[2], self.high[0], self.high[1], self.high[2]
        )
    }
}

/// Iterator over the coordinates of a [`Box3`] in linear order.
pub struct Box3Iter {
    boxed: Box3,
    next: usize,
    volume: usize,
}

impl Iterator for Box3Iter {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.next >= self.volume {
            return None;
        }
        let coord = self.boxed.coord_at(self.next);
        self.next += 1;
        coord
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.volume - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Box3Iter {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn volume_and_extents() {
        let b = Box3::new([0, 0, 0], [3, 2, 1]).unwrap();
        assert_eq!(b.extents(), [4, 3, 2]);
        assert_eq!(b.volume(), 24);
    }

    #[test]
    fn inverted_range_rejected() {
        let err = Box3::new([0, 5, 0], [3, 2, 1]).unwrap_err();
        assert_eq!(
            err,
            BoxError::InvertedRange {
                axis: 1,
                low: 5,
                high: 2
            }
        );
    }

    #[test]
    fn intersection_and_disjoint() {
        let a = Box3::new([0, 0, 0], [3, 3, 3]).unwrap();
        let b = Box3::new([2, 2, 2], [5, 5, 5]).unwrap();
        let c = Box3::new([4, 0, 0], [5, 3, 3]).unwrap();
        assert_eq!(
            a.intersection(&b),
            Some(Box3::new([2, 2, 2], [3, 3, 3]).unwrap())
        );
        assert!(a.is_disjoint(&c));
    }

    #[test]
    fn offset_is_column_major() {
        let b = Box3::new([2, 1, 0], [5, 3, 1]).unwrap();
        // nx = 4, ny = 3
        assert_eq!(b.offset([2, 1, 0]), Some(0));
        assert_eq!(b.offset([3, 1, 0]), Some(1));
        assert_eq!(b.offset([2, 2, 0]), Some(4));
        assert_eq!(b.offset([2, 1, 1]), Some(12));
        assert_eq!(b.offset([6, 1, 0]), None);
    }

    #[test]
    fn iter_visits_in_linear_order() {
        let b = Box3::new([0, 0, 0], [1, 1, 1]).unwrap();
        let coords: Vec<Coord> = b.iter().collect();
        assert_eq!(
            coords,
            vec![
                [0, 0, 0],
                [1, 0, 0],
                [0, 1, 0],
                [1, 1, 0],
                [0, 0, 1],
                [1, 0, 1],
                [0, 1, 1],
                [1, 1, 1],
            ]
        );
    }

    #[test]
    fn r2c_of_global_box() {
        // Lx = 4: complex extent floor(4/2) + 1 = 3.
        let real = Box3::from_dims([4, 3, 2]).unwrap();
        let complex = real.r2c(0).unwrap();
        assert_eq!(complex, Box3::new([0, 0, 0], [2, 2, 1]).unwrap());

        // Odd axis size: Lx = 5 also reduces to [0, 2].
        let real = Box3::from_dims([5, 3, 2]).unwrap();
        assert_eq!(real.r2c(0).unwrap().high(), [2, 2, 1]);
    }

    #[test]
    fn r2c_images_of_a_partition_tile_the_complex_axis() {
        // [0,7] split into [0,1][2,3][4,5][6,7]: images must tile [0,4].
        let parts = [
            Box3::new([0, 0, 0], [1, 0, 0]).unwrap(),
            Box3::new([2, 0, 0], [3, 0, 0]).unwrap(),
            Box3::new([4, 0, 0], [5, 0, 0]).unwrap(),
            Box3::new([6, 0, 0], [7, 0, 0]).unwrap(),
        ];
        let images: Vec<Box3> = parts.iter().map(|b| b.r2c(0).unwrap()).collect();
        assert_eq!(images[0].low()[0], 0);
        assert_eq!(images[3].high()[0], 4);
        for w in images.windows(2) {
            assert_eq!(w[1].low()[0], w[0].high()[0] + 1);
        }
    }

    #[test]
    fn r2c_can_be_empty_for_narrow_interior_boxes() {
        // [2,2] maps to low 2, high 1: empty.
        let b = Box3::new([2, 0, 0], [2, 0, 0]).unwrap();
        assert!(b.r2c(0).is_none());
    }

    proptest! {
        #[test]
        fn offset_roundtrips_through_coord_at(
            lo in prop::array::uniform3(-8i32..8),
            ext in prop::array::uniform3(1i32..6),
            pick in prop::array::uniform3(0i32..6),
        ) {
            let hi = [lo[0] + ext[0] - 1, lo[1] + ext[1] - 1, lo[2] + ext[2] - 1];
            let b = Box3::new(lo, hi).unwrap();
            let coord = [
                lo[0] + pick[0] % ext[0],
                lo[1] + pick[1] % ext[1],
                lo[2] + pick[2] % ext[2],
            ];
            let off = b.offset(coord).unwrap();
            prop_assert!(off < b.volume());
            prop_assert_eq!(b.coord_at(off), Some(coord));
        }

        #[test]
        fn r2c_telescopes_over_fair_splits(l in 4i32..64, p in 1i32..8) {
            let p = p.min(l / 2).max(1);
            // Fair division of [0, l-1] into p parts.
            let mut prev_high = -1i32;
            for m in 0..p {
                let a = (i64::from(m) * i64::from(l) / i64::from(p)) as i32;
                let b = ((i64::from(m) + 1) * i64::from(l) / i64::from(p)) as i32 - 1;
                let part = Box3::new([a, 0, 0], [b, 0, 0]).unwrap();
                let image = part.r2c(0).unwrap();
                prop_assert_eq!(image.low()[0], prev_high + 1);
                prev_high = image.high()[0];
            }
            prop_assert_eq!(prev_high, l / 2);
        }
    }
}
