//! Surface reconstruction hand-off
//!
//! Reconstruction itself (normal estimation, Poisson surface fitting, mesh
//! repair, mesh export) belongs to an external geometry library. This module
//! defines what is passed across: the cloud, the user's parameters, and the
//! preconditions checked before the backend is called.

use gcodecloud_core::constants::DEFAULT_MIN_RECONSTRUCTION_POINTS;
use gcodecloud_core::ReconstructionError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::PointCloud;

/// User-tunable parameters forwarded to the backend untouched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionParams {
    /// Octree depth for Poisson reconstruction
    pub depth: u32,
    /// Ratio between the reconstruction cube and the cloud's bounding cube
    pub scale: f64,
    pub linear_fit: bool,
    /// Target sample count for backends that resample the surface
    pub num_samples: usize,
    /// Neighbourhood radius for normal estimation
    pub normal_radius: f64,
    /// Neighbour cap for normal estimation
    pub max_neighbours: usize,
    /// Refuse to reconstruct from fewer points than this
    pub min_points: usize,
}

impl Default for ReconstructionParams {
    fn default() -> Self {
        Self {
            depth: 8,
            scale: 1.1,
            linear_fit: false,
            num_samples: 10_000,
            normal_radius: 0.1,
            max_neighbours: 30,
            min_points: DEFAULT_MIN_RECONSTRUCTION_POINTS,
        }
    }
}

impl ReconstructionParams {
    pub fn validate(&self) -> Result<(), ReconstructionError> {
        let invalid = |param: &str, reason: &str| ReconstructionError::InvalidParameter {
            param: param.to_string(),
            reason: reason.to_string(),
        };

        if !(1..=16).contains(&self.depth) {
            return Err(invalid("depth", "must be between 1 and 16"));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(invalid("scale", "must be > 0"));
        }
        if self.num_samples == 0 {
            return Err(invalid("num_samples", "must be > 0"));
        }
        if !(self.normal_radius.is_finite() && self.normal_radius > 0.0) {
            return Err(invalid("normal_radius", "must be > 0"));
        }
        if self.max_neighbours == 0 {
            return Err(invalid("max_neighbours", "must be > 0"));
        }
        Ok(())
    }
}

/// External surface reconstruction backend
pub trait SurfaceReconstructor {
    /// Mesh type produced by the backend
    type Mesh;

    /// Name used in logs
    fn name(&self) -> &str;

    /// Build a surface from an ordered point cloud
    fn reconstruct(
        &self,
        cloud: &PointCloud,
        params: &ReconstructionParams,
    ) -> Result<Self::Mesh, ReconstructionError>;
}

/// Check that `cloud` and `params` are fit to hand to a backend
pub fn check_preconditions(
    cloud: &PointCloud,
    params: &ReconstructionParams,
) -> Result<(), ReconstructionError> {
    params.validate()?;

    if cloud.len() < params.min_points.max(1) {
        return Err(ReconstructionError::TooFewPoints {
            actual: cloud.len(),
            required: params.min_points.max(1),
        });
    }
    if !cloud.has_deposits() {
        return Err(ReconstructionError::MissingBounds);
    }
    Ok(())
}

/// Run `backend` on `cloud` after the precondition checks
pub fn reconstruct_surface<R: SurfaceReconstructor>(
    backend: &R,
    cloud: &PointCloud,
    params: &ReconstructionParams,
) -> Result<R::Mesh, ReconstructionError> {
    check_preconditions(cloud, params)?;
    info!(
        "Reconstructing surface from {} points with {} (depth {}, scale {})",
        cloud.len(),
        backend.name(),
        params.depth,
        params.scale
    );
    let mesh = backend.reconstruct(cloud, params)?;
    debug!("{} finished", backend.name());
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcodecloud_core::{Bounds, Point3};
    use std::cell::Cell;

    struct CountingBackend {
        calls: Cell<usize>,
    }

    impl SurfaceReconstructor for CountingBackend {
        type Mesh = usize;

        fn name(&self) -> &str {
            "counting"
        }

        fn reconstruct(
            &self,
            cloud: &PointCloud,
            _params: &ReconstructionParams,
        ) -> Result<usize, ReconstructionError> {
            self.calls.set(self.calls.get() + 1);
            Ok(cloud.len())
        }
    }

    fn cloud_with(n: usize) -> PointCloud {
        let points: Vec<_> = (0..n).map(|i| Point3::new(i as f64, 0.0, 0.2)).collect();
        let mut bounds = Bounds::new();
        points.iter().for_each(|p| bounds.update(p));
        PointCloud::from_parts(points, bounds)
    }

    #[test]
    fn test_default_params_valid() {
        let params = ReconstructionParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.depth, 8);
        assert_eq!(params.scale, 1.1);
    }

    #[test]
    fn test_invalid_params() {
        let params = ReconstructionParams {
            depth: 0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ReconstructionError::InvalidParameter { ref param, .. }) if param == "depth"
        ));

        let params = ReconstructionParams {
            scale: -1.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_empty_cloud_is_precondition_failure() {
        let backend = CountingBackend { calls: Cell::new(0) };
        let result = reconstruct_surface(&backend, &PointCloud::new(), &Default::default());
        assert_eq!(
            result,
            Err(ReconstructionError::TooFewPoints {
                actual: 0,
                required: DEFAULT_MIN_RECONSTRUCTION_POINTS,
            })
        );
        assert_eq!(backend.calls.get(), 0);
    }

    #[test]
    fn test_cloud_without_deposits_rejected() {
        let cloud = PointCloud::from_parts(vec![Point3::ORIGIN; 64], Bounds::new());
        assert_eq!(
            check_preconditions(&cloud, &Default::default()),
            Err(ReconstructionError::MissingBounds)
        );
    }

    #[test]
    fn test_backend_called_once_preconditions_hold() {
        let backend = CountingBackend { calls: Cell::new(0) };
        let params = ReconstructionParams {
            min_points: 4,
            ..Default::default()
        };
        let mesh = reconstruct_surface(&backend, &cloud_with(4), &params).unwrap();
        assert_eq!(mesh, 4);
        assert_eq!(backend.calls.get(), 1);
    }
}
