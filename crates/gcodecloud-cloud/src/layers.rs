//! Z-layer grouping of deposit segments
//!
//! Plots of a print usually alternate colours per layer, which only works
//! if layers come out in traversal order. A new layer starts whenever a
//! deposit segment begins at a different Z than the current layer.

use gcodecloud_core::Bounds;
use gcodecloud_decoder::MotionSegment;
use serde::{Deserialize, Serialize};

/// Consecutive deposit segments sharing a starting Z
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Position in traversal order, starting at 0
    pub index: usize,
    pub z: f64,
    pub segments: Vec<MotionSegment>,
}

impl Layer {
    /// Total deposited path length in this layer
    pub fn path_length(&self) -> f64 {
        self.segments.iter().map(MotionSegment::length).sum()
    }

    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::new();
        for segment in &self.segments {
            bounds.update(&segment.start);
            bounds.update(&segment.end);
        }
        bounds
    }

    /// Every other layer, for two-tone plotting
    pub fn is_odd(&self) -> bool {
        self.index % 2 == 1
    }
}

/// Group deposit segments into layers, travel segments are skipped
pub fn group_layers<I>(segments: I) -> Vec<Layer>
where
    I: IntoIterator<Item = MotionSegment>,
{
    let mut layers: Vec<Layer> = Vec::new();

    for segment in segments.into_iter().filter(|s| s.is_deposit) {
        match layers.last_mut() {
            Some(layer) if layer.z == segment.start.z => layer.segments.push(segment),
            _ => {
                let index = layers.len();
                layers.push(Layer {
                    index,
                    z: segment.start.z,
                    segments: vec![segment],
                });
            }
        }
    }

    layers
}
