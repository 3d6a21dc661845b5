//! Partitioning the global grid across worker ranks.

use crate::error::DecompositionError;
use smallvec::SmallVec;
use std::fmt;
use whorl_core::{Box3, GridDescriptor};

/// The axis along which real-to-complex symmetry reduces the spectral
/// domain. Axis 0 (x) by convention; the transform engine contract
/// assumes the same axis.
pub const R2C_AXIS: usize = 0;

/// The domain decomposition for one worker rank.
///
/// Given the global grid and the worker group size, computes a
/// processor grid minimizing inter-worker boundary surface, partitions
/// the global real-space box into one sub-box per rank, and pairs each
/// real box with its spectral-space counterpart under the r2c mapping.
///
/// Construction is logically collective: every worker must call it with
/// identical `(grid, worker_count)` before allocating fields. No
/// communication happens here: the algorithm is deterministic, so
/// agreement follows from consistent inputs. A configuration mismatch
/// across workers is an external-caller fault this type cannot detect.
///
/// `Display` prints the full layout report for diagnostics.
///
/// # Examples
///
/// ```
/// use whorl_core::GridDescriptor;
/// use whorl_domain::Decomposition;
///
/// let grid = GridDescriptor::with_unit_spacing([4, 3, 2]).unwrap();
/// let decomp = Decomposition::new(&grid, 0, 1).unwrap();
/// assert_eq!(decomp.inbox().high(), [3, 2, 1]);
/// assert_eq!(decomp.outbox().high(), [2, 2, 1]); // Lx_c = 4/2 + 1 = 3
/// ```
#[derive(Clone, Debug)]
pub struct Decomposition {
    grid: GridDescriptor,
    rank: usize,
    worker_count: usize,
    proc_grid: [i32; 3],
    global_real: Box3,
    global_complex: Box3,
    real_boxes: Vec<Box3>,
    complex_boxes: Vec<Box3>,
}

impl Decomposition {
    /// Compute the decomposition for `rank` within a group of
    /// `worker_count` workers.
    ///
    /// Fails with [`DecompositionError`] on an empty group, an
    /// out-of-range rank, an axis that cannot be split into the chosen
    /// number of parts, or an inconsistent inbox/outbox pair (the last
    /// being a defect in the algorithm itself, fatal to the group).
    pub fn new(
        grid: &GridDescriptor,
        rank: usize,
        worker_count: usize,
    ) -> Result<Self, DecompositionError> {
        if worker_count == 0 {
            return Err(DecompositionError::NoWorkers);
        }
        if rank >= worker_count {
            return Err(DecompositionError::InvalidRank { rank, worker_count });
        }

        let dims = grid.dims();
        // GridDescriptor guarantees dims >= 1, so the global box is valid.
        let global_real = Box3::from_dims(dims).map_err(|e| {
            DecompositionError::InvariantViolated {
                rank,
                detail: format!("global real box: {e}"),
            }
        })?;
        let global_complex =
            global_real
                .r2c(R2C_AXIS)
                .ok_or_else(|| DecompositionError::InvariantViolated {
                    rank,
                    detail: format!("global complex image of {global_real} is empty"),
                })?;

        let proc_grid = min_surface_grid(global_real.extents(), worker_count);
        let real_boxes = split_box(&global_real, proc_grid)?;

        let mut complex_boxes = Vec::with_capacity(worker_count);
        for (r, real) in real_boxes.iter().enumerate() {
            let complex =
                real.r2c(R2C_AXIS)
                    .ok_or_else(|| DecompositionError::InvariantViolated {
                        rank: r,
                        detail: format!("r2c image of inbox {real} is empty"),
                    })?;
            complex_boxes.push(complex);
        }

        // Re-derive this rank's pair independently; a mismatch means the
        // partition algorithm is defective.
        let own_image = real_boxes[rank].r2c(R2C_AXIS);
        if own_image != Some(complex_boxes[rank]) {
            return Err(DecompositionError::InvariantViolated {
                rank,
                detail: format!(
                    "r2c({}) = {:?} does not match outbox {}",
                    real_boxes[rank], own_image, complex_boxes[rank]
                ),
            });
        }

        Ok(Self {
            grid: grid.clone(),
            rank,
            worker_count,
            proc_grid,
            global_real,
            global_complex,
            real_boxes,
            complex_boxes,
        })
    }

    /// The global grid this decomposition partitions.
    pub fn grid(&self) -> &GridDescriptor {
        &self.grid
    }

    /// This worker's rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Total number of workers in the group.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// The processor grid `(Px, Py, Pz)`, `Px·Py·Pz == worker_count`.
    pub fn proc_grid(&self) -> [i32; 3] {
        self.proc_grid
    }

    /// The global real-space box.
    pub fn global_real(&self) -> Box3 {
        self.global_real
    }

    /// The global spectral-space box after r2c reduction.
    pub fn global_complex(&self) -> Box3 {
        self.global_complex
    }

    /// This rank's real-space sub-box.
    pub fn inbox(&self) -> Box3 {
        self.real_boxes[self.rank]
    }

    /// This rank's spectral-space sub-box.
    pub fn outbox(&self) -> Box3 {
        self.complex_boxes[self.rank]
    }

    /// Real-space boxes for every rank, indexed by rank.
    pub fn real_boxes(&self) -> &[Box3] {
        &self.real_boxes
    }

    /// Spectral-space boxes for every rank, indexed by rank.
    pub fn complex_boxes(&self) -> &[Box3] {
        &self.complex_boxes
    }

    /// Local extents of this rank's inbox as `usize`, for writers.
    pub fn local_dims(&self) -> [usize; 3] {
        let e = self.inbox().extents();
        [e[0] as usize, e[1] as usize, e[2] as usize]
    }

    /// Offset of this rank's inbox within the global box, for writers.
    pub fn local_offset(&self) -> [usize; 3] {
        let lo = self.inbox().low();
        [lo[0] as usize, lo[1] as usize, lo[2] as usize]
    }

    /// Global grid dimensions as `usize`, for writers.
    pub fn global_dims(&self) -> [usize; 3] {
        let d = self.grid.dims();
        [d[0] as usize, d[1] as usize, d[2] as usize]
    }
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "***** DOMAIN DECOMPOSITION STATUS *****")?;
        writeln!(
            f,
            "Real-to-complex symmetry is used (r2c direction = {})",
            ["x", "y", "z"][R2C_AXIS]
        )?;
        writeln!(
            f,
            "Domain is split into {} parts (minimum surface processor grid: [{}, {}, {}])",
            self.worker_count, self.proc_grid[0], self.proc_grid[1], self.proc_grid[2]
        )?;
        writeln!(
            f,
            "Domain in real space: {} ({} indexes)",
            self.global_real,
            self.global_real.volume()
        )?;
        writeln!(
            f,
            "Domain in complex space: {} ({} indexes)",
            self.global_complex,
            self.global_complex.volume()
        )?;
        for r in 0..self.worker_count {
            let inbox = self.real_boxes[r];
            let outbox = self.complex_boxes[r];
            writeln!(
                f,
                "Domain {}/{}: {} ({} indexes) => {} ({} indexes)",
                r + 1,
                self.worker_count,
                inbox,
                inbox.volume(),
                outbox,
                outbox.volume()
            )?;
        }
        Ok(())
    }
}

/// Divisors of `n` in ascending order.
fn divisors(n: usize) -> SmallVec<[usize; 16]> {
    (1..=n).filter(|d| n % d == 0).collect()
}

/// Choose the processor grid `(Px, Py, Pz)` with `Px·Py·Pz == workers`
/// minimizing the per-part boundary surface of the real-domain split.
///
/// Score for a candidate is `ex·ey + ey·ez + ex·ez` with
/// `e_d = extent_d / P_d`, the halo area a part exposes to its
/// neighbours. Enumeration ascends `Px` then `Py` and only a strictly
/// smaller score replaces the incumbent, so ties keep the grid found
/// first. Deterministic: identical on every worker for identical
/// inputs.
fn min_surface_grid(extents: [i32; 3], workers: usize) -> [i32; 3] {
    let mut best = [1, 1, workers as i32];
    let mut best_score = f64::INFINITY;
    for &px in divisors(workers).iter() {
        let rest = workers / px;
        for &py in divisors(rest).iter() {
            let pz = rest / py;
            let ex = f64::from(extents[0]) / px as f64;
            let ey = f64::from(extents[1]) / py as f64;
            let ez = f64::from(extents[2]) / pz as f64;
            let score = ex * ey + ey * ez + ex * ez;
            if score < best_score {
                best_score = score;
                best = [px as i32, py as i32, pz as i32];
            }
        }
    }
    best
}

/// Fair division of the inclusive range `[low, high]` into `parts`
/// sub-ranges: part `m` spans `[low + m·L/p, low + (m+1)·L/p - 1]`
/// (integer division over the extent `L`).
fn split_axis(low: i32, high: i32, parts: i32) -> SmallVec<[(i32, i32); 8]> {
    let extent = i64::from(high) - i64::from(low) + 1;
    let parts64 = i64::from(parts);
    (0..parts64)
        .map(|m| {
            let a = i64::from(low) + m * extent / parts64;
            let b = i64::from(low) + (m + 1) * extent / parts64 - 1;
            (a as i32, b as i32)
        })
        .collect()
}

/// Split `global` along `proc_grid`, ordered by the x-fastest rank
/// linearization `rank = i + Px·(j + Py·k)`.
fn split_box(global: &Box3, proc_grid: [i32; 3]) -> Result<Vec<Box3>, DecompositionError> {
    let mut segments: [SmallVec<[(i32, i32); 8]>; 3] =
        [SmallVec::new(), SmallVec::new(), SmallVec::new()];
    for axis in 0..3 {
        segments[axis] = split_axis(global.low()[axis], global.high()[axis], proc_grid[axis]);
        if segments[axis].iter().any(|&(a, b)| a > b) {
            return Err(DecompositionError::UnsplittableAxis {
                axis,
                extent: global.extent(axis),
                parts: proc_grid[axis],
            });
        }
    }

    let mut boxes = Vec::with_capacity(proc_grid.iter().map(|&p| p as usize).product());
    for &(z0, z1) in segments[2].iter() {
        for &(y0, y1) in segments[1].iter() {
            for &(x0, x1) in segments[0].iter() {
                // Segments are validated non-empty above.
                let sub = Box3::new([x0, y0, z0], [x1, y1, z1]).map_err(|e| {
                    DecompositionError::InvariantViolated {
                        rank: boxes.len(),
                        detail: format!("sub-box construction: {e}"),
                    }
                })?;
                boxes.push(sub);
            }
        }
    }
    Ok(boxes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_grid(dims: [i32; 3]) -> GridDescriptor {
        GridDescriptor::with_unit_spacing(dims).unwrap()
    }

    /// The union of `boxes` covers `global` exactly with no overlap.
    fn assert_partition(global: Box3, boxes: &[Box3]) {
        let total: usize = boxes.iter().map(Box3::volume).sum();
        assert_eq!(total, global.volume(), "volumes must sum to the global box");
        for (a, lhs) in boxes.iter().enumerate() {
            assert!(
                global.intersection(lhs) == Some(*lhs),
                "box {a} must lie inside the global box"
            );
            for rhs in boxes.iter().skip(a + 1) {
                assert!(lhs.is_disjoint(rhs), "boxes {lhs} and {rhs} overlap");
            }
        }
    }

    #[test]
    fn single_worker_gets_whole_domain() {
        let d = Decomposition::new(&unit_grid([4, 3, 2]), 0, 1).unwrap();
        assert_eq!(d.proc_grid(), [1, 1, 1]);
        assert_eq!(d.inbox(), Box3::new([0, 0, 0], [3, 2, 1]).unwrap());
        assert_eq!(d.outbox(), Box3::new([0, 0, 0], [2, 2, 1]).unwrap());
    }

    #[test]
    fn partitions_cover_without_overlap() {
        for workers in [1usize, 2, 4, 8] {
            for dims in [[4, 4, 4], [8, 4, 6], [5, 9, 4], [16, 4, 4]] {
                let d = Decomposition::new(&unit_grid(dims), 0, workers).unwrap();
                assert_partition(d.global_real(), d.real_boxes());
                assert_partition(d.global_complex(), d.complex_boxes());
            }
        }
    }

    #[test]
    fn every_rank_pair_satisfies_r2c() {
        for workers in [1usize, 2, 4, 8] {
            let grid = unit_grid([8, 6, 4]);
            for rank in 0..workers {
                let d = Decomposition::new(&grid, rank, workers).unwrap();
                assert_eq!(
                    d.inbox().r2c(R2C_AXIS),
                    Some(d.outbox()),
                    "rank {rank}/{workers}"
                );
                assert!(d.outbox().volume() > 0);
            }
        }
    }

    #[test]
    fn construction_is_deterministic() {
        let grid = unit_grid([12, 8, 4]);
        let a = Decomposition::new(&grid, 1, 4).unwrap();
        let b = Decomposition::new(&grid, 1, 4).unwrap();
        assert_eq!(a.proc_grid(), b.proc_grid());
        assert_eq!(a.real_boxes(), b.real_boxes());
        assert_eq!(a.complex_boxes(), b.complex_boxes());
    }

    #[test]
    fn all_ranks_agree_on_the_layout() {
        let grid = unit_grid([8, 8, 8]);
        let reference = Decomposition::new(&grid, 0, 8).unwrap();
        for rank in 1..8 {
            let d = Decomposition::new(&grid, rank, 8).unwrap();
            assert_eq!(d.real_boxes(), reference.real_boxes());
            assert_eq!(d.complex_boxes(), reference.complex_boxes());
            assert_eq!(d.inbox(), reference.real_boxes()[rank]);
        }
    }

    #[test]
    fn min_surface_prefers_compact_parts() {
        // A long thin domain should be split along its long axis.
        assert_eq!(min_surface_grid([64, 4, 4], 4), [4, 1, 1]);
        assert_eq!(min_surface_grid([4, 64, 4], 4), [1, 4, 1]);
        // A cube with 8 workers splits evenly.
        assert_eq!(min_surface_grid([8, 8, 8], 8), [2, 2, 2]);
    }

    #[test]
    fn tie_break_keeps_first_enumerated_grid() {
        // On a cube with 2 workers, (1,1,2), (1,2,1) and (2,1,1) all
        // score identically; ascending-Px enumeration finds (1,1,2) first.
        assert_eq!(min_surface_grid([8, 8, 8], 2), [1, 1, 2]);
    }

    #[test]
    fn invalid_rank_and_empty_group_rejected() {
        let grid = unit_grid([8, 8, 8]);
        assert_eq!(
            Decomposition::new(&grid, 0, 0).unwrap_err(),
            DecompositionError::NoWorkers
        );
        assert_eq!(
            Decomposition::new(&grid, 4, 4).unwrap_err(),
            DecompositionError::InvalidRank {
                rank: 4,
                worker_count: 4
            }
        );
    }

    #[test]
    fn layout_report_lists_every_rank() {
        let d = Decomposition::new(&unit_grid([8, 4, 4]), 0, 2).unwrap();
        let report = d.to_string();
        assert!(report.contains("DOMAIN DECOMPOSITION STATUS"));
        assert!(report.contains("Domain 1/2"));
        assert!(report.contains("Domain 2/2"));
    }

    proptest! {
        #[test]
        fn partition_properties_hold(
            dims in prop::array::uniform3(4i32..24),
            workers in prop::sample::select(vec![1usize, 2, 4, 8]),
        ) {
            let d = Decomposition::new(&unit_grid(dims), 0, workers).unwrap();
            assert_partition(d.global_real(), d.real_boxes());
            assert_partition(d.global_complex(), d.complex_boxes());
            for rank in 0..workers {
                prop_assert_eq!(
                    d.real_boxes()[rank].r2c(R2C_AXIS),
                    Some(d.complex_boxes()[rank])
                );
                prop_assert!(d.complex_boxes()[rank].volume() > 0);
            }
        }

        #[test]
        fn split_axis_is_exhaustive(low in -16i32..16, extent in 1i32..64, parts in 1i32..8) {
            let parts = parts.min(extent);
            let high = low + extent - 1;
            let segments = split_axis(low, high, parts);
            prop_assert_eq!(segments[0].0, low);
            prop_assert_eq!(segments[segments.len() - 1].1, high);
            for w in segments.windows(2) {
                prop_assert_eq!(w[1].0, w[0].1 + 1);
            }
        }
    }
}
