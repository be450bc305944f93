//! First-order fast marching on a [`RectGrid`].
//!
//! Solves `|∇T| = 1/f` with `T = 0` on the seed cells.  Cells are finalised
//! in order of increasing `T`; ties are broken by raster key so the result is
//! bit-identical across runs and thread counts.
//!
//! Only finalised neighbours take part in an update:
//!
//! ```text
//! one axis:   T = a + h/f
//! two axes:   T = (a + b + sqrt(2(h/f)² − (a−b)²)) / 2     if |a−b| < h/f
//!             T = min(a, b) + h/f                            otherwise
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::grid::RectGrid;

/// Heap entry ordered by `(cost, key)`.
#[derive(Copy, Clone, PartialEq)]
struct Trial {
    cost: f64,
    key:  usize,
}

impl Eq for Trial {}

impl Ord for Trial {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost.total_cmp(&other.cost).then(self.key.cmp(&other.key))
    }
}

impl PartialOrd for Trial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Arrival times from `seeds` over the cells for which `passable` holds.
///
/// `speed[k]` must be positive for every passable cell.  Seeds need not be
/// passable themselves (the wall-distance pass seeds on wall cells).
/// Unreached cells stay at `f64::INFINITY`.
pub(crate) fn march<P>(grid: &RectGrid, passable: P, speed: &[f64], seeds: &[usize]) -> Vec<f64>
where
    P: Fn(usize) -> bool,
{
    let n = grid.len();
    let mut cost = vec![f64::INFINITY; n];
    let mut known = vec![false; n];
    let mut heap: BinaryHeap<Reverse<Trial>> = BinaryHeap::with_capacity(seeds.len() * 4);

    for &s in seeds {
        if s < n && cost[s] > 0.0 {
            cost[s] = 0.0;
            heap.push(Reverse(Trial { cost: 0.0, key: s }));
        }
    }

    while let Some(Reverse(Trial { cost: c, key })) = heap.pop() {
        if known[key] || c > cost[key] {
            continue;
        }
        known[key] = true;

        for nb in grid.neighbours(key) {
            if known[nb] || !passable(nb) {
                continue;
            }
            let t = local_update(grid, &cost, &known, nb, grid.h / speed[nb]);
            if t < cost[nb] {
                cost[nb] = t;
                heap.push(Reverse(Trial { cost: t, key: nb }));
            }
        }
    }
    cost
}

/// Upwind Eikonal update of `key` from its finalised neighbours.
fn local_update(grid: &RectGrid, cost: &[f64], known: &[bool], key: usize, step: f64) -> f64 {
    let axis_min = |(lo, hi): (Option<usize>, Option<usize>)| -> f64 {
        [lo, hi]
            .into_iter()
            .flatten()
            .filter(|&k| known[k])
            .map(|k| cost[k])
            .fold(f64::INFINITY, f64::min)
    };
    let a = axis_min(grid.x_neighbours(key));
    let b = axis_min(grid.y_neighbours(key));

    match (a.is_finite(), b.is_finite()) {
        (false, false) => f64::INFINITY,
        (true, false)  => a + step,
        (false, true)  => b + step,
        (true, true)   => {
            let diff = a - b;
            if diff.abs() < step {
                let disc = 2.0 * step * step - diff * diff;
                (a + b + disc.sqrt()) * 0.5
            } else {
                a.min(b) + step
            }
        }
    }
}

/// Negated, normalised finite-difference gradient of `cost`.  Zero where
/// the cell is unreached or has no finite neighbour.
pub(crate) fn gradient_directions(grid: &RectGrid, cost: &[f64]) -> Vec<nav_core::Point> {
    use nav_core::Point;

    let diff = |k: usize, (lo, hi): (Option<usize>, Option<usize>)| -> f64 {
        let c = cost[k];
        let lo = lo.map(|l| cost[l]).filter(|v| v.is_finite());
        let hi = hi.map(|h| cost[h]).filter(|v| v.is_finite());
        match (lo, hi) {
            (Some(l), Some(h)) => (h - l) / (2.0 * grid.h),
            (Some(l), None)    => (c - l) / grid.h,
            (None, Some(h))    => (h - c) / grid.h,
            (None, None)       => 0.0,
        }
    };

    (0..grid.len())
        .map(|k| {
            if !cost[k].is_finite() {
                return Point::ZERO;
            }
            let gx = diff(k, grid.x_neighbours(k));
            let gy = diff(k, grid.y_neighbours(k));
            Point::new(-gx, -gy).normalized()
        })
        .collect()
}
