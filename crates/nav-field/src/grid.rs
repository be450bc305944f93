//! Regular grid of sample points over an axis-aligned rectangle.
//!
//! Keys are raster indices `j * nx + i`.  Neighbour iteration order is fixed
//! (left, right, down, up) so every pass over the grid is deterministic.

use nav_core::Point;

#[derive(Clone, Debug, PartialEq)]
pub struct RectGrid {
    /// Position of key 0 (lower-left sample point).
    pub origin: Point,
    pub h:      f64,
    pub nx:     usize,
    pub ny:     usize,
}

impl RectGrid {
    /// Grid covering `[lo, hi]` with spacing `h`.
    pub fn covering(lo: Point, hi: Point, h: f64) -> Self {
        let nx = ((hi.x - lo.x) / h).ceil().max(0.0) as usize + 1;
        let ny = ((hi.y - lo.y) / h).ceil().max(0.0) as usize + 1;
        Self { origin: lo, h, nx, ny }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn key(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    #[inline]
    pub fn coords(&self, key: usize) -> (usize, usize) {
        (key % self.nx, key / self.nx)
    }

    #[inline]
    pub fn point(&self, key: usize) -> Point {
        let (i, j) = self.coords(key);
        Point::new(self.origin.x + i as f64 * self.h, self.origin.y + j as f64 * self.h)
    }

    /// Nearest sample point to `p`, or `None` if `p` lies off the grid.
    pub fn key_at(&self, p: Point) -> Option<usize> {
        let fi = ((p.x - self.origin.x) / self.h).round();
        let fj = ((p.y - self.origin.y) / self.h).round();
        if fi < 0.0 || fj < 0.0 || fi >= self.nx as f64 || fj >= self.ny as f64 {
            return None;
        }
        Some(self.key(fi as usize, fj as usize))
    }

    /// Horizontal neighbours `(left, right)`.
    #[inline]
    pub fn x_neighbours(&self, key: usize) -> (Option<usize>, Option<usize>) {
        let (i, _) = self.coords(key);
        ((i > 0).then(|| key - 1), (i + 1 < self.nx).then(|| key + 1))
    }

    /// Vertical neighbours `(down, up)`.
    #[inline]
    pub fn y_neighbours(&self, key: usize) -> (Option<usize>, Option<usize>) {
        let (_, j) = self.coords(key);
        ((j > 0).then(|| key - self.nx), (j + 1 < self.ny).then(|| key + self.nx))
    }

    /// 4-neighbourhood in fixed order: left, right, down, up.
    pub fn neighbours(&self, key: usize) -> impl Iterator<Item = usize> {
        let (l, r) = self.x_neighbours(key);
        let (d, u) = self.y_neighbours(key);
        [l, r, d, u].into_iter().flatten()
    }
}
