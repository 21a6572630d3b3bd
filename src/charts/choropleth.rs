//! Choropleth of incident counts per neighbourhood.
//!
//! Neighbourhood outlines are concave, so the map is rasterised with plotters
//! into an RGB buffer that the dashboard uploads as a texture. The projected
//! rings are kept for hover hit-testing in image space.

use crate::aggregate::RegionCount;
use crate::charts::palette::{count_level, reds, to_plotters};
use crate::charts::renderer::ExportError;
use plotters::prelude::*;

const MAP_PADDING: f64 = 10.0;
const BACKGROUND: RGBColor = RGBColor(245, 245, 245);

/// One drawn neighbourhood in image coordinates.
#[derive(Debug, Clone)]
pub struct MapRegion {
    pub name: String,
    pub count: u64,
    rings: Vec<Vec<(f64, f64)>>,
}

impl MapRegion {
    /// Even-odd test over every ring of the region.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.rings.iter().any(|ring| ring_contains(ring, x, y))
    }
}

/// A rendered map plus the regions needed to resolve hovers.
pub struct ChoroplethMap {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB pixels.
    pub pixels: Vec<u8>,
    pub regions: Vec<MapRegion>,
    pub min_count: u64,
    pub max_count: u64,
}

/// Fits lon/lat into a pixel box, correcting longitude for latitude.
#[derive(Debug, Clone, Copy)]
struct Projection {
    min: [f64; 2],
    lon_scale: f64,
    scale: f64,
    offset: [f64; 2],
    height: f64,
}

impl Projection {
    fn fit(min: [f64; 2], max: [f64; 2], width: u32, height: u32) -> Self {
        let mid_lat = (min[1] + max[1]) / 2.0;
        let lon_scale = mid_lat.to_radians().cos();
        let span_x = ((max[0] - min[0]) * lon_scale).max(f64::EPSILON);
        let span_y = (max[1] - min[1]).max(f64::EPSILON);

        let avail_x = (width as f64 - 2.0 * MAP_PADDING).max(1.0);
        let avail_y = (height as f64 - 2.0 * MAP_PADDING).max(1.0);
        let scale = (avail_x / span_x).min(avail_y / span_y);

        Self {
            min,
            lon_scale,
            scale,
            offset: [
                MAP_PADDING + (avail_x - span_x * scale) / 2.0,
                MAP_PADDING + (avail_y - span_y * scale) / 2.0,
            ],
            height: height as f64,
        }
    }

    fn apply(&self, p: [f64; 2]) -> (f64, f64) {
        let x = self.offset[0] + (p[0] - self.min[0]) * self.lon_scale * self.scale;
        let y = self.height - (self.offset[1] + (p[1] - self.min[1]) * self.scale);
        (x, y)
    }
}

fn ring_contains(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn render_error<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Render(e.to_string())
}

impl ChoroplethMap {
    /// Rasterise `regions` into a `width` x `height` image.
    pub fn render(regions: &[RegionCount<'_>], width: u32, height: u32) -> Result<Self, ExportError> {
        let min_count = regions.iter().map(|r| r.count).min().unwrap_or(0);
        let max_count = regions.iter().map(|r| r.count).max().unwrap_or(0);

        let bounds = regions
            .iter()
            .filter_map(|r| r.boundary.bounds())
            .reduce(|(lo, hi), (l, h)| {
                (
                    [lo[0].min(l[0]), lo[1].min(l[1])],
                    [hi[0].max(h[0]), hi[1].max(h[1])],
                )
            });

        let projected: Vec<MapRegion> = match bounds {
            Some((lo, hi)) => {
                let projection = Projection::fit(lo, hi, width, height);
                regions
                    .iter()
                    .map(|r| MapRegion {
                        name: r.boundary.area_name.clone(),
                        count: r.count,
                        rings: r
                            .boundary
                            .rings
                            .iter()
                            .map(|ring| ring.iter().map(|p| projection.apply(*p)).collect())
                            .collect(),
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            root.fill(&BACKGROUND).map_err(render_error)?;

            for region in &projected {
                let shade = to_plotters(reds(0.1 + 0.9 * count_level(region.count, min_count, max_count)));
                for ring in &region.rings {
                    let points: Vec<(i32, i32)> = ring
                        .iter()
                        .map(|&(x, y)| (x.round() as i32, y.round() as i32))
                        .collect();
                    root.draw(&Polygon::new(points.clone(), shade.filled()))
                        .map_err(render_error)?;
                    root.draw(&PathElement::new(points, WHITE.stroke_width(1)))
                        .map_err(render_error)?;
                }
            }
            root.present().map_err(render_error)?;
        }

        log::debug!("Rendered choropleth with {} regions", projected.len());
        Ok(Self {
            width,
            height,
            pixels,
            regions: projected,
            min_count,
            max_count,
        })
    }

    /// Region under image pixel `(x, y)`.
    pub fn region_at(&self, x: f64, y: f64) -> Option<&MapRegion> {
        self.regions.iter().find(|r| r.contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NeighbourhoodBoundary;

    fn square(code: &str, x0: f64, y0: f64) -> NeighbourhoodBoundary {
        NeighbourhoodBoundary {
            area_code: code.to_string(),
            area_name: format!("Area {}", code),
            rings: vec![vec![
                [x0, y0],
                [x0 + 0.1, y0],
                [x0 + 0.1, y0 + 0.1],
                [x0, y0 + 0.1],
                [x0, y0],
            ]],
        }
    }

    #[test]
    fn ring_test_handles_concave_outline() {
        let l_shape = vec![
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 2.0),
            (2.0, 2.0),
            (2.0, 10.0),
            (0.0, 10.0),
        ];
        assert!(ring_contains(&l_shape, 1.0, 5.0));
        assert!(ring_contains(&l_shape, 5.0, 1.0));
        assert!(!ring_contains(&l_shape, 5.0, 5.0));
    }

    #[test]
    fn projection_keeps_north_up() {
        let projection = Projection::fit([-79.6, 43.6], [-79.1, 43.9], 400, 300);
        let (_, south) = projection.apply([-79.4, 43.6]);
        let (_, north) = projection.apply([-79.4, 43.9]);
        assert!(north < south);
        let (west, _) = projection.apply([-79.6, 43.7]);
        assert!(west >= MAP_PADDING - 1e-9);
    }

    #[test]
    fn hover_resolves_the_region_under_the_pointer() {
        let west = square("1", -79.5, 43.7);
        let east = square("2", -79.3, 43.7);
        let regions = vec![
            RegionCount { boundary: &west, count: 4 },
            RegionCount { boundary: &east, count: 9 },
        ];

        let map = ChoroplethMap::render(&regions, 200, 100).unwrap();
        assert_eq!(map.pixels.len(), 200 * 100 * 3);
        assert_eq!((map.min_count, map.max_count), (4, 9));

        let (x, y) = {
            let ring = &map.regions[1].rings[0];
            let cx = ring.iter().map(|p| p.0).sum::<f64>() / ring.len() as f64;
            let cy = ring.iter().map(|p| p.1).sum::<f64>() / ring.len() as f64;
            (cx, cy)
        };
        assert_eq!(map.region_at(x, y).map(|r| r.name.as_str()), Some("Area 2"));
        assert!(map.region_at(0.0, 0.0).is_none());
    }

    #[test]
    fn empty_map_still_renders_background() {
        let map = ChoroplethMap::render(&[], 10, 10).unwrap();
        assert!(map.regions.is_empty());
        assert_eq!(&map.pixels[..3], &[245, 245, 245]);
    }
}
