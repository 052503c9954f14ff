/// Depth of a cell nothing has been drawn into.
pub const EMPTY: f32 = f32::INFINITY;

/// Dense per-pixel depth store, row-major with row 0 at the bottom.
///
/// A write wins whenever the new depth is `≤` the stored one, so on ties the
/// most recently drawn primitive is the one left visible.
#[derive(Clone, Debug, Default)]
pub struct ZBuffer {
    width: usize,
    height: usize,
    depth: Vec<f32>,
}

impl ZBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth: vec![EMPTY; width * height],
        }
    }

    /// Resize (if needed) and reset every cell to [`EMPTY`].
    pub fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depth.clear();
        self.depth.resize(width * height, EMPTY);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Stored depth, [`EMPTY`] outside the buffer.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.index(x, y).map_or(EMPTY, |i| self.depth[i])
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.get(x, y) != EMPTY
    }

    /// Depth test with the `≤` rule; writes and returns `true` on success.
    #[inline]
    pub fn test_and_set(&mut self, x: usize, y: usize, depth: f32) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        if depth <= self.depth[i] {
            self.depth[i] = depth;
            true
        } else {
            false
        }
    }

    /// Write only into a cell that is still [`EMPTY`].
    #[inline]
    pub fn fill_empty(&mut self, x: usize, y: usize, depth: f32) -> bool {
        match self.index(x, y) {
            Some(i) if self.depth[i] == EMPTY => {
                self.depth[i] = depth;
                true
            }
            _ => false,
        }
    }

    /// Tight `(x_min, y_min, x_max, y_max)` around occupied cells.
    pub fn occupied_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut out: Option<(usize, usize, usize, usize)> = None;
        for (i, &d) in self.depth.iter().enumerate() {
            if d == EMPTY {
                continue;
            }
            let (x, y) = (i % self.width, i / self.width);
            out = Some(match out {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        out
    }

    pub fn occupied_count(&self) -> usize {
        self.depth.iter().filter(|&&d| d != EMPTY).count()
    }
}
