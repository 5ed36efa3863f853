//! # Contour Extraction
//!
//! Border following (Suzuki & Abe, 1985) over a binary mask, producing the
//! full contour forest with outer/hole typing and parent links, and the
//! two-level interpretation used to build planar regions.
//!
//! ## Labels
//!
//! The mask is copied into a zero-padded `i32` grid. The padding frame is
//! border 1 and counts as a hole. Each new border gets the next number
//! (NBD); traced pixels are relabeled `NBD` or `-NBD` (when the pixel's
//! east neighbor was examined and found empty), which lets the raster scan
//! find the last border it crossed (LNBD) and derive the parent.

use glam::{DVec2, IVec2};
use log::debug;
use serde::{Deserialize, Serialize};

use config::constants::{DEFAULT_EPSILON_RATIO, DEFAULT_MIN_AREA_RATIO};

use crate::error::SilhouetteError;
use crate::mask::Mask;
use crate::sanitize::signed_area;
use crate::simplify::{perimeter, simplify_closed};

/// Neighbor offsets, clockwise in image coordinates (y down), starting east.
const DIRECTIONS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const EAST: usize = 0;
const WEST: usize = 4;

/// A traced border in pixel space (origin top-left, y down).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    /// Border pixels in tracing order
    pub points: Vec<IVec2>,
    /// True for a hole border
    pub is_hole: bool,
    /// Index of the enclosing contour, `None` for top-level borders
    pub parent: Option<usize>,
}

impl Contour {
    /// Enclosed area through the pixel centers.
    pub fn area(&self) -> f64 {
        signed_area(&self.points_f64()).abs()
    }

    /// Points as floating-point pixel coordinates.
    pub fn points_f64(&self) -> Vec<DVec2> {
        self.points.iter().map(|p| p.as_dvec2()).collect()
    }
}

struct Grid {
    stride: usize,
    labels: Vec<i32>,
}

impl Grid {
    fn new(mask: &Mask) -> Self {
        let stride = mask.width() as usize + 2;
        let rows = mask.height() as usize + 2;
        let mut labels = vec![0; stride * rows];
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask.get(i64::from(x), i64::from(y)) {
                    labels[(y as usize + 1) * stride + x as usize + 1] = 1;
                }
            }
        }
        Self { stride, labels }
    }

    #[inline]
    fn neighbor(&self, index: usize, direction: usize) -> usize {
        let (dx, dy) = DIRECTIONS[direction];
        (index as isize + dy * self.stride as isize + dx) as usize
    }

    #[inline]
    fn pixel(&self, index: usize) -> IVec2 {
        IVec2::new(
            (index % self.stride) as i32 - 1,
            (index / self.stride) as i32 - 1,
        )
    }

    /// Follows the border starting at `start`, whose empty neighbor lies in
    /// direction `from`.
    fn follow(&mut self, start: usize, from: usize, nbd: i32) -> Vec<IVec2> {
        // First non-zero neighbor, clockwise from the empty one
        let first = (0..8)
            .map(|k| (from + k) % 8)
            .find(|&d| self.labels[self.neighbor(start, d)] != 0);
        let Some(first) = first else {
            // Isolated pixel
            self.labels[start] = -nbd;
            return vec![self.pixel(start)];
        };

        let p1 = self.neighbor(start, first);
        let mut current = start;
        // Direction from `current` back to the previous border pixel
        let mut back = first;
        let mut points = Vec::new();

        loop {
            points.push(self.pixel(current));

            // Counter-clockwise from just past the previous pixel
            let mut east_empty = false;
            let mut next_dir = back;
            for k in 1..=8 {
                let d = (back + 8 - k) % 8;
                if self.labels[self.neighbor(current, d)] != 0 {
                    next_dir = d;
                    break;
                }
                if d == EAST {
                    east_empty = true;
                }
            }

            if east_empty {
                self.labels[current] = -nbd;
            } else if self.labels[current] == 1 {
                self.labels[current] = nbd;
            }

            let next = self.neighbor(current, next_dir);
            if next == start && current == p1 {
                break;
            }
            current = next;
            back = (next_dir + 4) % 8;
        }

        points
    }
}

/// Extracts every border of `mask` with its hierarchy.
///
/// Contours are returned in raster discovery order; `parent` indexes into
/// the returned list.
pub fn find_contours(mask: &Mask) -> Vec<Contour> {
    let mut grid = Grid::new(mask);
    let (w, h) = (mask.width() as usize, mask.height() as usize);

    let mut contours: Vec<Contour> = Vec::new();
    // (is_hole, parent NBD) per border, NBD 1 is the frame
    let mut borders: Vec<(bool, Option<i32>)> = vec![(true, None)];
    let mut nbd = 1;

    for y in 1..=h {
        let mut lnbd = 1;
        for x in 1..=w {
            let index = y * grid.stride + x;
            let value = grid.labels[index];
            if value == 0 {
                continue;
            }

            let start = if value == 1 && grid.labels[index - 1] == 0 {
                Some((false, WEST))
            } else if value >= 1 && grid.labels[index + 1] == 0 {
                if value > 1 {
                    lnbd = value;
                }
                Some((true, EAST))
            } else {
                None
            };

            if let Some((is_hole, from)) = start {
                nbd += 1;
                let (last_is_hole, last_parent) = borders[(lnbd - 1) as usize];
                let parent = if is_hole == last_is_hole {
                    last_parent
                } else {
                    Some(lnbd)
                };
                borders.push((is_hole, parent));

                let points = grid.follow(index, from, nbd);
                contours.push(Contour {
                    points,
                    is_hole,
                    parent: parent.filter(|&p| p > 1).map(|p| (p - 2) as usize),
                });
            }

            let label = grid.labels[index];
            if label != 1 {
                lnbd = label.abs();
            }
        }
    }

    contours
}

// =============================================================================
// REGIONS
// =============================================================================

/// How many candidate regions the extractor returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourPolicy {
    /// Only the region with the greatest area
    #[default]
    LargestOnly,
    /// Every region, largest first
    All,
}

/// Parameters for [`extract_regions`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContourParams {
    /// Douglas-Peucker tolerance as a fraction of each contour's perimeter
    pub epsilon_ratio: f64,
    /// Contours enclosing less than this fraction of the image are dropped
    pub min_area_ratio: f64,
    pub policy: ContourPolicy,
}

impl Default for ContourParams {
    fn default() -> Self {
        Self {
            epsilon_ratio: DEFAULT_EPSILON_RATIO,
            min_area_ratio: DEFAULT_MIN_AREA_RATIO,
            policy: ContourPolicy::default(),
        }
    }
}

/// A candidate planar region in the centered, y-up frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Outer ring, counter-clockwise
    pub outer: Vec<DVec2>,
    /// Hole rings, clockwise
    pub holes: Vec<Vec<DVec2>>,
    /// Traced area (outer minus holes) in square pixels
    pub area: f64,
}

impl Region {
    /// Vertex count of the outer ring followed by each hole.
    pub fn vertex_counts(&self) -> Vec<usize> {
        std::iter::once(self.outer.len())
            .chain(self.holes.iter().map(Vec::len))
            .collect()
    }
}

/// Simplifies a traced ring and moves it into the centered, y-up frame with
/// the requested winding.
fn prepare_ring(contour: &Contour, epsilon_ratio: f64, size: DVec2, ccw: bool) -> Vec<DVec2> {
    let points = contour.points_f64();
    let epsilon = epsilon_ratio * perimeter(&points);
    let half = size / 2.0;

    let mut ring: Vec<DVec2> = simplify_closed(&points, epsilon)
        .into_iter()
        .map(|p| DVec2::new(p.x - half.x, half.y - p.y))
        .collect();

    if (signed_area(&ring) > 0.0) != ccw {
        ring.reverse();
    }
    ring
}

/// Extracts candidate regions from `mask`.
///
/// Every outer border is a candidate; each hole border attaches to the
/// outer border directly enclosing it. Borders enclosing less than
/// `min_area_ratio` of the mask are discarded.
///
/// # Errors
///
/// `NoContour` if no outer border survives filtering.
pub fn extract_regions(mask: &Mask, params: &ContourParams) -> Result<Vec<Region>, SilhouetteError> {
    let contours = find_contours(mask);
    let min_area = params.min_area_ratio * mask.area() as f64;
    let size = DVec2::new(f64::from(mask.width()), f64::from(mask.height()));

    let areas: Vec<f64> = contours.iter().map(Contour::area).collect();
    let kept = |i: usize| areas[i] >= min_area;

    let mut regions: Vec<Region> = contours
        .iter()
        .enumerate()
        .filter(|&(i, c)| !c.is_hole && kept(i))
        .map(|(i, outer)| {
            let hole_ids: Vec<usize> = contours
                .iter()
                .enumerate()
                .filter(|&(j, c)| c.is_hole && c.parent == Some(i) && kept(j))
                .map(|(j, _)| j)
                .collect();

            Region {
                outer: prepare_ring(outer, params.epsilon_ratio, size, true),
                holes: hole_ids
                    .iter()
                    .map(|&j| prepare_ring(&contours[j], params.epsilon_ratio, size, false))
                    .collect(),
                area: areas[i] - hole_ids.iter().map(|&j| areas[j]).sum::<f64>(),
            }
        })
        .collect();

    debug!(
        "contours: {} traced, {} candidate regions (min area {min_area:.2})",
        contours.len(),
        regions.len()
    );

    if regions.is_empty() {
        return Err(SilhouetteError::NoContour {
            foreground: mask.foreground_count(),
        });
    }

    regions.sort_by(|a, b| b.area.total_cmp(&a.area));
    if params.policy == ContourPolicy::LargestOnly {
        regions.truncate(1);
    }

    Ok(regions)
}
