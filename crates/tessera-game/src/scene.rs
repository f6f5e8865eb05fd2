//! The scene: one voxel store, its AO cache, and the bodies moving in it.

use std::fmt;

use glam::{IVec3, Vec3};
use tessera_mesh::{AoCache, BlockShade, OcclusionMap, compute_occlusion};
use tessera_physics::{
    Body, SweptCollisionResolver, VoxelRay, VoxelRaycastHit, apply_gravity, clamp_frame_dt,
    voxel_raycast,
};
use tessera_voxel::{VoxelEditBuffer, VoxelStore, move_voxel, place_voxel, remove_voxel};

use crate::error::SceneError;
use crate::settings::SceneSettings;

/// Shading returned for every face when AO is disabled.
const FULL_BRIGHT: BlockShade = [[1.0; 4]; 6];

/// Handle to a body in a [`VoxelScene`]. Ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u32);

impl BodyId {
    /// Raw slot index.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of looking a body up.
///
/// Distinguishes a body that exists but cannot be used (non-finite state)
/// from one that does not exist at all.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyLookup<'a> {
    /// The body exists and its state is finite.
    Present(&'a Body),
    /// The id is live but the body's position or velocity is non-finite.
    Invalid,
    /// No body has this id, or it was despawned.
    Absent,
}

impl<'a> BodyLookup<'a> {
    /// The body, if present and valid.
    pub fn present(self) -> Option<&'a Body> {
        match self {
            Self::Present(body) => Some(body),
            Self::Invalid | Self::Absent => None,
        }
    }
}

/// Owns the voxel world and its bodies and wires edits, physics, picking,
/// and shading together.
///
/// Every block edit goes through the scene so that the AO cache is
/// invalidated around the edited cell before the next shading query.
#[derive(Debug)]
pub struct VoxelScene {
    store: VoxelStore,
    edits: VoxelEditBuffer,
    ao_cache: AoCache,
    bodies: Vec<Option<Body>>,
    resolver: SweptCollisionResolver,
    settings: SceneSettings,
    accumulator: f32,
}

impl Default for VoxelScene {
    fn default() -> Self {
        Self::new(SceneSettings::default())
    }
}

impl VoxelScene {
    /// Creates an empty scene.
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            store: VoxelStore::new(),
            edits: VoxelEditBuffer::new(),
            ao_cache: AoCache::new(settings.ambient_occlusion.unwrap_or_default()),
            bodies: Vec::new(),
            resolver: SweptCollisionResolver::new(),
            settings,
            accumulator: 0.0,
        }
    }

    /// Read-only access to the occupancy grid.
    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    /// Settings the scene currently runs with.
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Replaces the settings. Cached shading is invalidated if the AO
    /// curve changed.
    pub fn set_settings(&mut self, settings: SceneSettings) {
        if let Some(ao) = settings.ambient_occlusion
            && *self.ao_cache.settings() != ao
        {
            self.ao_cache.set_settings(ao);
        }
        self.settings = settings;
    }

    // --- Blocks ---

    /// Occupies `cell`. Returns `false` if it was already occupied.
    pub fn place_block(&mut self, cell: IVec3) -> bool {
        let changed = place_voxel(&mut self.store, cell, &mut self.edits);
        self.flush_edits();
        changed
    }

    /// Clears `cell`. Returns `false` if it was already empty.
    pub fn remove_block(&mut self, cell: IVec3) -> bool {
        let changed = remove_voxel(&mut self.store, cell, &mut self.edits);
        self.flush_edits();
        changed
    }

    /// Moves the block at `from` to `to`. Returns `false` if `from` is empty
    /// or equal to `to`.
    pub fn move_block(&mut self, from: IVec3, to: IVec3) -> bool {
        let changed = move_voxel(&mut self.store, from, to, &mut self.edits);
        self.flush_edits();
        changed
    }

    fn flush_edits(&mut self) {
        self.ao_cache.apply_edits(self.edits.drain());
    }

    // --- Bodies ---

    /// Adds a body and returns its handle.
    pub fn spawn_body(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        tracing::debug!(%id, position = ?body.position, "spawned body");
        self.bodies.push(Some(body));
        id
    }

    /// Adds a body at `position` with the configured default dimensions.
    pub fn spawn_default_body(&mut self, position: Vec3) -> BodyId {
        let p = self.settings.physics;
        self.spawn_body(Body::new(position, p.half_width, p.half_depth, p.height))
    }

    /// Looks a body up.
    pub fn body(&self, id: BodyId) -> BodyLookup<'_> {
        match self.bodies.get(id.0 as usize) {
            Some(Some(body)) if body.is_finite() => BodyLookup::Present(body),
            Some(Some(_)) => BodyLookup::Invalid,
            _ => BodyLookup::Absent,
        }
    }

    /// Like [`body`](Self::body) but as a `Result`.
    pub fn require_body(&self, id: BodyId) -> Result<&Body, SceneError> {
        match self.body(id) {
            BodyLookup::Present(body) => Ok(body),
            BodyLookup::Invalid => Err(SceneError::InvalidBody(id)),
            BodyLookup::Absent => Err(SceneError::UnknownBody(id)),
        }
    }

    /// Mutable access, including to bodies with non-finite state so they can
    /// be repaired.
    pub fn body_mut(&mut self, id: BodyId) -> Result<&mut Body, SceneError> {
        self.bodies
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(SceneError::UnknownBody(id))
    }

    /// Removes a body and returns it.
    pub fn despawn_body(&mut self, id: BodyId) -> Result<Body, SceneError> {
        let body = self
            .bodies
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .ok_or(SceneError::UnknownBody(id))?;
        tracing::debug!(%id, "despawned body");
        Ok(body)
    }

    /// Iterates over live bodies, valid or not.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|body| (BodyId(i as u32), body)))
    }

    // --- Simulation ---

    /// Advances every body by one tick of `dt` seconds.
    ///
    /// `dt` is clamped to `[0, max_frame_dt]`. Gravity is added to each
    /// body's velocity, then the swept resolver moves it. Bodies with
    /// non-finite state are skipped.
    pub fn step(&mut self, dt: f32) {
        let dt = clamp_frame_dt(dt, self.settings.physics.max_frame_dt);
        if dt == 0.0 {
            return;
        }
        let physics = self.settings.physics;

        for (index, body) in self.bodies.iter_mut().enumerate() {
            let Some(body) = body else { continue };
            if !body.is_finite() {
                tracing::warn!(id = %BodyId(index as u32), "skipping body with non-finite state");
                continue;
            }
            apply_gravity(body, physics.gravity, dt, physics.terminal_velocity);
            self.resolver.resolve(&self.store, body, dt);
        }
    }

    /// Feeds a measured frame time into a fixed-step accumulator and runs as
    /// many `fixed_dt` ticks as it covers. Returns the number of ticks run.
    ///
    /// The tick is capped at `max_frame_dt` so clamped frames still add up
    /// to whole ticks.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let physics = self.settings.physics;
        let fixed_dt = physics.fixed_dt.min(physics.max_frame_dt);
        if fixed_dt.is_nan() || fixed_dt <= 0.0 {
            tracing::warn!(fixed_dt, "fixed tick length must be positive");
            return 0;
        }

        self.accumulator += clamp_frame_dt(frame_dt, physics.max_frame_dt);
        let mut ticks = 0;
        while self.accumulator >= fixed_dt {
            self.step(fixed_dt);
            self.accumulator -= fixed_dt;
            ticks += 1;
        }
        ticks
    }

    // --- Queries ---

    /// First occupied cell along a ray, within the configured pick distance.
    pub fn pick(&self, origin: Vec3, direction: Vec3) -> Option<VoxelRaycastHit> {
        let ray = VoxelRay::new(origin, direction, self.settings.picking.max_distance);
        voxel_raycast(&ray, &self.store)
    }

    /// See-through alphas for cells between `viewpoint` and body `id`.
    ///
    /// Empty when occlusion is disabled or the body is absent or invalid.
    pub fn occlusion_for(&self, id: BodyId, viewpoint: Vec3) -> OcclusionMap {
        let Some(cone) = self.settings.occlusion else {
            return OcclusionMap::default();
        };
        let anchor = self.body(id).present().map(|body| body.position);
        compute_occlusion(anchor, self.settings.subject_offset_y, viewpoint, &cone)
    }

    /// Per-vertex shading for all six faces of the block at `cell`.
    pub fn face_shading(&mut self, cell: IVec3) -> BlockShade {
        if self.settings.ambient_occlusion.is_none() {
            return FULL_BRIGHT;
        }
        *self.ao_cache.get_or_compute(&self.store, cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_ids_are_not_reused() {
        let mut scene = VoxelScene::default();
        let a = scene.spawn_default_body(Vec3::ZERO);
        scene.despawn_body(a).unwrap();
        let b = scene.spawn_default_body(Vec3::ZERO);
        assert_ne!(a, b);
        assert_eq!(scene.body(a), BodyLookup::Absent);
        assert!(scene.body(b).present().is_some());
    }

    #[test]
    fn test_lookup_distinguishes_invalid_from_absent() {
        let mut scene = VoxelScene::default();
        let id = scene.spawn_default_body(Vec3::new(0.5, 2.0, 0.5));
        scene.body_mut(id).unwrap().position.y = f32::NAN;

        assert_eq!(scene.body(id), BodyLookup::Invalid);
        assert!(matches!(scene.require_body(id), Err(SceneError::InvalidBody(_))));
        assert!(matches!(
            scene.require_body(BodyId(99)),
            Err(SceneError::UnknownBody(_))
        ));
        assert!(matches!(scene.despawn_body(BodyId(99)), Err(SceneError::UnknownBody(_))));
    }

    #[test]
    fn test_default_body_uses_configured_dimensions() {
        let mut scene = VoxelScene::default();
        let id = scene.spawn_default_body(Vec3::ZERO);
        let body = scene.require_body(id).unwrap();
        assert_eq!(body.half_width, 0.3);
        assert_eq!(body.half_depth, 0.3);
        assert_eq!(body.height, 1.6);
    }

    #[test]
    fn test_step_skips_invalid_bodies() {
        let mut scene = VoxelScene::default();
        let bad = scene.spawn_default_body(Vec3::new(f32::INFINITY, 0.0, 0.0));
        let good = scene.spawn_default_body(Vec3::new(0.5, 10.0, 0.5));
        scene.step(1.0 / 30.0);

        assert_eq!(scene.body(bad), BodyLookup::Invalid);
        let good = scene.require_body(good).unwrap();
        assert!(good.position.y < 10.0, "valid body still falls");
    }

    #[test]
    fn test_step_clamps_large_dt() {
        let mut clamped = VoxelScene::default();
        let mut reference = VoxelScene::default();
        let a = clamped.spawn_default_body(Vec3::new(0.5, 100.0, 0.5));
        let b = reference.spawn_default_body(Vec3::new(0.5, 100.0, 0.5));

        clamped.step(5.0);
        reference.step(1.0 / 30.0);
        assert_eq!(clamped.require_body(a).unwrap(), reference.require_body(b).unwrap());
    }

    #[test]
    fn test_advance_runs_whole_fixed_ticks() {
        let mut scene = VoxelScene::default();
        let fixed = scene.settings().physics.fixed_dt;
        assert_eq!(scene.advance(fixed * 0.5), 0);
        assert_eq!(scene.advance(fixed * 0.6), 1);
        assert_eq!(scene.advance(f32::NAN), 0);
    }

    #[test]
    fn test_advance_with_tick_longer_than_frame_clamp_keeps_time() {
        let mut settings = SceneSettings::default();
        settings.physics.max_frame_dt = 1.0 / 30.0;
        settings.physics.fixed_dt = 0.1;
        let mut scene = VoxelScene::new(settings);
        let mut reference = VoxelScene::new(settings);
        let id = scene.spawn_default_body(Vec3::new(0.5, 10.0, 0.5));
        let ref_id = reference.spawn_default_body(Vec3::new(0.5, 10.0, 0.5));

        let mut ticks = 0;
        for _ in 0..3 {
            ticks += scene.advance(1.0 / 30.0);
            reference.step(1.0 / 30.0);
        }
        assert_eq!(ticks, 3, "every clamped frame must run a tick");
        assert_eq!(
            scene.require_body(id).unwrap().position,
            reference.require_body(ref_id).unwrap().position,
            "advanced scene fell behind real time"
        );
    }

    #[test]
    fn test_disabled_ao_is_full_bright() {
        let mut settings = SceneSettings::default();
        settings.ambient_occlusion = None;
        let mut scene = VoxelScene::new(settings);
        scene.place_block(IVec3::ZERO);
        scene.place_block(IVec3::new(1, 1, 1));
        assert_eq!(scene.face_shading(IVec3::ZERO), FULL_BRIGHT);
    }
}
