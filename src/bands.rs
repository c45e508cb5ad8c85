//! Splits a raster, and the rectangle of the complex plane it shows,
//! into horizontal bands, one per worker.
use planes::{PlaneRect, ViewportRect};

/// One horizontal slice of a raster, along with the slice of the
/// complex plane it displays.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Band {
    /// Position of the band within its partition, top to bottom.
    pub index: usize,
    /// Raster column the band starts at.
    pub raster_left: usize,
    /// Raster row the band starts at.
    pub raster_top: usize,
    /// Width of the band in pixels; always the full raster width.
    pub raster_width: usize,
    /// Height of the band in pixels.  May be zero for trailing bands
    /// of a raster shorter than the number of bands.
    pub raster_height: usize,
    /// The part of the complex plane the band displays.
    pub plane: PlaneRect,
}

impl Band {
    /// The band's footprint on the raster.
    pub fn raster(&self) -> ViewportRect {
        ViewportRect::new(
            self.raster_top,
            self.raster_left,
            self.raster_width,
            self.raster_height,
        )
    }

    /// Describes that the band covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.raster_width == 0 || self.raster_height == 0
    }
}

/// The height every band but the last one receives.
pub fn band_height(total_height: usize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (total_height + count - 1) / count
}

/// Given a raster, the plane rectangle it shows, and a band count,
/// return `count` bands that tile the raster exactly.  Every band is
/// `ceil(height / count)` rows tall except the trailing ones, which
/// take whatever remains and never reach past the bottom of the
/// raster.
pub fn partition(raster: &ViewportRect, plane: &PlaneRect, count: usize) -> Vec<Band> {
    let rows = band_height(raster.height, count);
    let units_per_row = if raster.height == 0 {
        0.0
    } else {
        plane.height / raster.height as f64
    };

    (0..count)
        .map(|index| {
            let offset = (index * rows).min(raster.height);
            let height = rows.min(raster.height - offset);
            Band {
                index,
                raster_left: raster.left,
                raster_top: raster.top + offset,
                raster_width: raster.width,
                raster_height: height,
                plane: PlaneRect {
                    top: plane.top - offset as f64 * units_per_row,
                    left: plane.left,
                    width: plane.width,
                    height: height as f64 * units_per_row,
                },
            }
        })
        .collect()
}
