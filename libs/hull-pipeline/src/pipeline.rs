//! # Reconstruction Pipeline
//!
//! Three encoded view images in, one normalized mesh out.
//!
//! ```text
//! ViewImages ──rayon──► per view: decode → binarize → extract_regions → sanitize
//!                                   ↓ (front, top, side)
//!                        build_solids (shared depth) → intersect_solids → normalize
//! ```
//!
//! Views are prepared in parallel but collected in fixed order, so the first
//! reported error and the output mesh do not depend on scheduling.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use hull_mesh::{build_solids, intersect_solids, normalize, Mesh, Polygon2D, View};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use silhouette::{binarize, extract_regions, load_image, sanitize_regions, Shape, SilhouetteParams};

use crate::error::{PipelineError, Stage};
use crate::params::ReconstructionParams;

/// Encoded images for the three views. A view may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ViewImages {
    pub front: Option<Vec<u8>>,
    pub top: Option<Vec<u8>>,
    pub side: Option<Vec<u8>>,
}

impl ViewImages {
    /// Creates a complete set of view images.
    pub fn new(front: Vec<u8>, top: Vec<u8>, side: Vec<u8>) -> Self {
        Self {
            front: Some(front),
            top: Some(top),
            side: Some(side),
        }
    }

    /// Reads the three view images from disk.
    pub fn from_files(
        front: impl AsRef<Path>,
        top: impl AsRef<Path>,
        side: impl AsRef<Path>,
    ) -> std::io::Result<Self> {
        Ok(Self::new(
            std::fs::read(front)?,
            std::fs::read(top)?,
            std::fs::read(side)?,
        ))
    }

    /// Image bytes for `view`, if present.
    pub fn get(&self, view: View) -> Option<&[u8]> {
        match view {
            View::Front => self.front.as_deref(),
            View::Top => self.top.as_deref(),
            View::Side => self.side.as_deref(),
        }
    }

    /// Views with no image, in pipeline order.
    pub fn missing(&self) -> Vec<View> {
        View::ALL
            .into_iter()
            .filter(|&view| self.get(view).is_none())
            .collect()
    }
}

/// Diagnostics gathered during one reconstruction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Shared extrusion depth
    pub depth: f64,
    /// Regions extruded per view
    pub parts: BTreeMap<View, usize>,
    /// Wall-clock milliseconds per stage, summed over views
    pub timings_ms: BTreeMap<Stage, f64>,
}

impl Report {
    fn record(&mut self, stage: Stage, elapsed: Duration) {
        *self.timings_ms.entry(stage).or_default() += elapsed.as_secs_f64() * 1000.0;
    }
}

struct PreparedView {
    view: View,
    shapes: Vec<Shape>,
    timings: [(Stage, Duration); 3],
}

fn prepare_view(
    view: View,
    bytes: &[u8],
    params: &SilhouetteParams,
) -> Result<PreparedView, PipelineError> {
    let tag = |err| PipelineError::from_silhouette(view, err);

    let start = Instant::now();
    let image = load_image(bytes).map_err(tag)?;
    let mask = binarize(&image, &params.binarize);
    drop(image);
    let rasterized = start.elapsed();

    let start = Instant::now();
    let regions = extract_regions(&mask, &params.contour).map_err(tag)?;
    drop(mask);
    let extracted = start.elapsed();

    let start = Instant::now();
    let shapes = sanitize_regions(&regions).map_err(tag)?;
    let sanitized = start.elapsed();

    debug!(
        "{view}: {} regions, {} shapes, {} vertices in largest",
        regions.len(),
        shapes.len(),
        shapes.first().map_or(0, Shape::vertex_count)
    );

    Ok(PreparedView {
        view,
        shapes,
        timings: [
            (Stage::Rasterize, rasterized),
            (Stage::ExtractContours, extracted),
            (Stage::Sanitize, sanitized),
        ],
    })
}

fn to_polygon(shape: Shape) -> Polygon2D {
    let (outer, holes) = shape.into_rings();
    Polygon2D::with_holes(outer, holes)
}

/// Picks the regions to extrude: every shape in compound mode, otherwise
/// the largest one that survived sanitization.
fn select_parts(shapes: Vec<Shape>, compound: bool) -> Vec<Polygon2D> {
    let take = if compound { shapes.len() } else { 1 };
    shapes.into_iter().take(take).map(to_polygon).collect()
}

/// Runs the full pipeline.
///
/// # Errors
///
/// The first failing stage, tagged with its view where one applies. Views
/// are checked in the order front, top, side.
pub fn reconstruct(
    images: &ViewImages,
    params: &ReconstructionParams,
) -> Result<Mesh, PipelineError> {
    reconstruct_with_report(images, params).map(|(mesh, _)| mesh)
}

/// Runs the full pipeline and returns stage diagnostics with the mesh.
pub fn reconstruct_with_report(
    images: &ViewImages,
    params: &ReconstructionParams,
) -> Result<(Mesh, Report), PipelineError> {
    params.validate()?;

    let inputs: Vec<(View, &[u8])> = View::ALL
        .into_iter()
        .filter_map(|view| images.get(view).map(|bytes| (view, bytes)))
        .collect();
    if inputs.len() < View::ALL.len() {
        return Err(PipelineError::MissingInput {
            views: images.missing(),
        });
    }

    let silhouette_params = params.silhouette_params();
    // Collect every view before picking an error so the first failure in
    // view order is reported
    let prepared = inputs
        .par_iter()
        .map(|&(view, bytes)| prepare_view(view, bytes, &silhouette_params))
        .collect::<Vec<_>>()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    let mut report = Report::default();
    let mut parts: BTreeMap<View, Vec<Polygon2D>> = BTreeMap::new();
    for view in prepared {
        for (stage, elapsed) in view.timings {
            report.record(stage, elapsed);
        }
        let selected = select_parts(view.shapes, params.compound_parts);
        report.parts.insert(view.view, selected.len());
        parts.insert(view.view, selected);
    }

    let start = Instant::now();
    let solids = build_solids(
        parts.get(&View::Front).map(Vec::as_slice),
        parts.get(&View::Top).map(Vec::as_slice),
        parts.get(&View::Side).map(Vec::as_slice),
    )
    .map_err(PipelineError::from_build)?;
    report.depth = solids.depth;
    report.record(Stage::BuildSolids, start.elapsed());

    let start = Instant::now();
    let raw = intersect_solids(&solids).map_err(PipelineError::from_intersect)?;
    drop(solids);
    report.record(Stage::Intersect, start.elapsed());

    if raw.is_empty() {
        warn!("silhouettes do not overlap, result is empty");
    }

    let start = Instant::now();
    let mesh = normalize(raw, params.target_max_dimension);
    report.record(Stage::Normalize, start.elapsed());

    info!(
        "reconstructed {} vertices, {} triangles (depth {})",
        mesh.vertex_count(),
        mesh.triangle_count(),
        report.depth
    );

    Ok((mesh, report))
}

/// Runs [`reconstruct`] on the rayon pool and delivers the result on the
/// returned channel.
///
/// Dropping the receiver discards the result; the computation is not
/// interrupted.
pub fn reconstruct_in_background(
    images: ViewImages,
    params: ReconstructionParams,
) -> mpsc::Receiver<Result<Mesh, PipelineError>> {
    let (sender, receiver) = mpsc::channel();
    rayon::spawn(move || {
        let result = reconstruct(&images, &params);
        if sender.send(result).is_err() {
            debug!("background reconstruction finished with no receiver");
        }
    });
    receiver
}
