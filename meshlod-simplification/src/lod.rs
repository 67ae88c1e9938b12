//! LOD chain generation
//!
//! Decimates one source mesh once per requested reduction ratio and rejects
//! levels that lose too much geometry to be usable. Levels are independent
//! transforms of the same immutable source and run in parallel.

use crate::params::DecimationParams;
use crate::quadric_error::decimate;
use crate::report::DecimationReport;
use meshlod_core::{Error, Result, TriangleMesh};
use rayon::prelude::*;
use std::fmt;
use tracing::info;

/// Settings for a chain of LOD levels.
#[derive(Debug, Clone, PartialEq)]
pub struct LodSettings {
    /// Reduction ratio of each level, LOD1 first
    pub ratios: Vec<f32>,
    /// Levels with fewer triangles are rejected. Default: 4
    pub min_viable_triangles: usize,
    pub params: DecimationParams,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            ratios: vec![0.5, 0.75],
            min_viable_triangles: 4,
            params: DecimationParams::default(),
        }
    }
}

impl LodSettings {
    pub fn with_ratios(ratios: Vec<f32>) -> Self {
        Self {
            ratios,
            ..Default::default()
        }
    }

    pub fn with_min_viable_triangles(mut self, min_viable_triangles: usize) -> Self {
        self.min_viable_triangles = min_viable_triangles;
        self
    }

    pub fn with_params(mut self, params: DecimationParams) -> Self {
        self.params = params;
        self
    }
}

/// One decimated level of a LOD chain.
#[derive(Debug, Clone)]
pub struct LodLevel {
    /// 1-based level number (LOD0 is the source mesh)
    pub level: usize,
    pub reduction_ratio: f32,
    pub mesh: TriangleMesh,
    pub report: DecimationReport,
}

impl fmt::Display for LodLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LOD{} (ratio {:.2}): {}",
            self.level, self.reduction_ratio, self.report
        )
    }
}

/// Generate every level of `settings` from `mesh`.
///
/// Fails with [`Error::InvalidData`] on a malformed mesh or a ratio outside
/// `[0, 1]`, and with [`Error::Algorithm`] when a level ends up with fewer
/// than `min_viable_triangles` triangles.
pub fn generate_lod_chain(mesh: &TriangleMesh, settings: &LodSettings) -> Result<Vec<LodLevel>> {
    mesh.validate()?;
    if let Some(bad) = settings.ratios.iter().find(|r| !(0.0..=1.0).contains(*r)) {
        return Err(Error::InvalidData(format!(
            "LOD reduction ratio must be between 0.0 and 1.0, got {}",
            bad
        )));
    }

    let levels: Vec<LodLevel> = settings
        .ratios
        .par_iter()
        .enumerate()
        .map(|(i, &ratio)| {
            let (simplified, report) = decimate(mesh, ratio, &settings.params);
            LodLevel {
                level: i + 1,
                reduction_ratio: ratio,
                mesh: simplified,
                report,
            }
        })
        .collect();

    for lod in &levels {
        let triangles = lod.mesh.face_count();
        if triangles == 0 {
            return Err(Error::Algorithm(format!(
                "LOD{} decimation produced no triangles",
                lod.level
            )));
        }
        if triangles < settings.min_viable_triangles {
            return Err(Error::Algorithm(format!(
                "LOD{} decimation produced {} triangles, fewer than the minimum of {}",
                lod.level, triangles, settings.min_viable_triangles
            )));
        }
        info!(%lod, "LOD level generated");
    }

    Ok(levels)
}
