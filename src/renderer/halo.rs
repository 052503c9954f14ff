//! Outward-only glow around the silhouette of one figure.

use super::zbuf::ZBuffer;

/// Half-width, in pixels, of the square painted around each silhouette pixel.
pub const HALO_RADIUS: usize = 5;

/// True when some 8-connected neighbour of `(x, y)` is not recorded.
/// Cells beyond the raster edge count as not recorded.
fn on_silhouette(record: &ZBuffer, x: usize, y: usize) -> bool {
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            if nx < 0 || ny < 0 || !record.is_occupied(nx as usize, ny as usize) {
                return true;
            }
        }
    }
    false
}

/// Paint a halo into `primary` around every silhouette pixel of `record`.
///
/// Only cells of `primary` that are still empty are touched, each receiving
/// the depth of the silhouette pixel that reached it first; `paint` is called
/// for every such cell so the caller can colour it. Returns the painted count.
pub fn paint_halo(
    primary: &mut ZBuffer,
    record: &ZBuffer,
    radius: usize,
    mut paint: impl FnMut(usize, usize),
) -> usize {
    debug_assert_eq!(
        (primary.width(), primary.height()),
        (record.width(), record.height())
    );
    let Some((x0, y0, x1, y1)) = record.occupied_bounds() else {
        return 0;
    };

    let w = primary.width();
    let h = primary.height();
    let mut painted = 0;

    for y in y0..=y1 {
        for x in x0..=x1 {
            if !record.is_occupied(x, y) || !on_silhouette(record, x, y) {
                continue;
            }
            let depth = record.get(x, y);
            let (sx0, sx1) = (x.saturating_sub(radius), (x + radius).min(w - 1));
            let (sy0, sy1) = (y.saturating_sub(radius), (y + radius).min(h - 1));
            for sy in sy0..=sy1 {
                for sx in sx0..=sx1 {
                    if primary.fill_empty(sx, sy, depth) {
                        paint(sx, sy);
                        painted += 1;
                    }
                }
            }
        }
    }
    painted
}
