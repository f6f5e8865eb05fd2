//! See-through occlusion: fades voxels standing between the camera and a
//! subject.
//!
//! A weighted cone of segments is marched from the viewpoint toward points
//! around the subject. Every cell a segment crosses receives an alpha; the
//! renderer draws those blocks translucent so the subject stays visible.

use std::f32::consts::TAU;

use glam::{IVec3, Vec3};
use rustc_hash::FxHashMap;
use tessera_voxel::march_segment;

/// Per-cell alpha, `1.0` meaning normal opaque shading.
pub type OcclusionMap = FxHashMap<IVec3, f32>;

/// Vertical span of the sample heights, as a fraction of the cone height.
const HEIGHT_SPAN: f32 = 0.35;

/// Shape and strength of the sampling cone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OcclusionCone {
    /// Radius of the outermost ring around the subject centre.
    pub radius: f32,
    /// Vertical extent scaled by the height fractions.
    pub height: f32,
    /// Angular samples per ring.
    pub samples_per_ring: u32,
    /// Number of rings; ring `r` sits at `r / rings` of the radius.
    pub rings: u32,
    /// Number of height fractions spread over `[-0.35, 0.35]`.
    pub height_steps: u32,
    /// Alpha of a cell hit by a full-weight ray.
    pub base_alpha: f32,
    /// Distance from the sample point beyond which a ray stops fading
    /// cells. `0` disables the falloff.
    pub fade_distance: f32,
}

impl Default for OcclusionCone {
    fn default() -> Self {
        Self {
            radius: 0.6,
            height: 1.6,
            samples_per_ring: 8,
            rings: 2,
            height_steps: 3,
            base_alpha: 0.25,
            fade_distance: 6.0,
        }
    }
}

impl OcclusionCone {
    /// Height fractions: `[0]` for one step or fewer, otherwise evenly
    /// spaced from `-0.35` to `0.35`.
    pub fn height_fractions(&self) -> Vec<f32> {
        if self.height_steps <= 1 {
            return vec![0.0];
        }
        let last = (self.height_steps - 1) as f32;
        (0..self.height_steps)
            .map(|k| -HEIGHT_SPAN + 2.0 * HEIGHT_SPAN * k as f32 / last)
            .collect()
    }

    /// Secondary sample points around `center` with their weights.
    ///
    /// Samples whose weight is not positive are omitted.
    pub fn samples(&self, center: Vec3) -> Vec<(Vec3, f32)> {
        let heights = self.height_fractions();
        let mut samples = Vec::new();
        for r in 1..=self.rings {
            let r_frac = r as f32 / self.rings as f32;
            for i in 0..self.samples_per_ring {
                let angle = TAU * i as f32 / self.samples_per_ring as f32;
                for &h_frac in &heights {
                    let weight = (1.0 - (r_frac * r_frac + h_frac * h_frac).sqrt()).max(0.0);
                    if weight <= 0.0 {
                        continue;
                    }
                    let offset = Vec3::new(
                        angle.cos() * self.radius * r_frac,
                        self.height * h_frac,
                        angle.sin() * self.radius * r_frac,
                    );
                    samples.push((center + offset, weight));
                }
            }
        }
        samples
    }
}

/// Computes see-through alphas for one subject and viewpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct OcclusionSampler {
    /// Cone configuration.
    pub cone: OcclusionCone,
}

impl OcclusionSampler {
    /// Creates a sampler with the given cone.
    pub fn new(cone: OcclusionCone) -> Self {
        Self { cone }
    }

    /// Builds a fresh alpha map.
    ///
    /// `subject_anchor` is the subject's feet position; its centre is
    /// `subject_offset_y` above it. A missing or non-finite anchor, or a
    /// non-finite viewpoint, yields an empty map. When several rays cross
    /// the same cell the lowest alpha wins.
    pub fn compute(
        &self,
        subject_anchor: Option<Vec3>,
        subject_offset_y: f32,
        viewpoint: Vec3,
    ) -> OcclusionMap {
        let mut map = OcclusionMap::default();
        let Some(anchor) = subject_anchor else {
            return map;
        };
        let center = anchor + Vec3::Y * subject_offset_y;
        if !center.is_finite() || !viewpoint.is_finite() {
            tracing::warn!(?anchor, ?viewpoint, "non-finite occlusion query ignored");
            return map;
        }

        self.cast(&mut map, viewpoint, center, 1.0);
        for (point, weight) in self.cone.samples(center) {
            self.cast(&mut map, viewpoint, point, weight);
        }
        map
    }

    fn cast(&self, map: &mut OcclusionMap, from: Vec3, to: Vec3, weight: f32) {
        let base_alpha = self.cone.base_alpha.clamp(0.0, 1.0);
        let fade = self.cone.fade_distance;

        march_segment(from, to, |cell, _| {
            let mut combined = weight;
            if fade > 0.0 {
                let center = cell.as_vec3() + Vec3::splat(0.5);
                combined *= (1.0 - center.distance(to) / fade).max(0.0);
            }
            if combined <= 0.0 {
                return;
            }
            let alpha = (1.0 - (1.0 - base_alpha) * combined.min(1.0)).clamp(0.0, 1.0);
            map.entry(cell)
                .and_modify(|a| *a = a.min(alpha))
                .or_insert(alpha);
        });
    }
}

/// Convenience wrapper over [`OcclusionSampler::compute`].
pub fn compute_occlusion(
    subject_anchor: Option<Vec3>,
    subject_offset_y: f32,
    viewpoint: Vec3,
    cone: &OcclusionCone,
) -> OcclusionMap {
    OcclusionSampler::new(*cone).compute(subject_anchor, subject_offset_y, viewpoint)
}
