//! Grid traversal using the DDA (Amanatides & Woo) algorithm.
//!
//! [`VoxelMarch`] lazily yields every cell a ray passes through, starting with
//! the cell containing the origin. Segment queries ([`march_segment`]) and
//! first-hit picking are both built on it.

use glam::{IVec3, Vec3};

/// One of the three lattice axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// Order in which tied boundary crossings are resolved.
    pub const TIE_ORDER: [Axis; 3] = [Axis::X, Axis::Z, Axis::Y];

    /// Component index (0=X, 1=Y, 2=Z).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit lattice vector along this axis.
    pub fn unit(self) -> IVec3 {
        match self {
            Axis::X => IVec3::X,
            Axis::Y => IVec3::Y,
            Axis::Z => IVec3::Z,
        }
    }
}

/// A single cell visited by a [`VoxelMarch`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchStep {
    /// The cell entered.
    pub cell: IVec3,
    /// Distance along the ray at which the cell was entered.
    pub distance: f32,
    /// Axis and sign (`±1`) of the step that entered this cell.
    /// `None` for the origin cell.
    pub entered_by: Option<(Axis, i32)>,
}

impl MarchStep {
    /// Normal of the face through which this cell was entered, pointing back
    /// toward the ray origin.
    pub fn entry_normal(&self) -> Option<IVec3> {
        self.entered_by.map(|(axis, step)| axis.unit() * -step)
    }
}

/// Per-axis stepping state. Axes with no direction component have none.
#[derive(Clone, Copy, Debug)]
struct AxisWalk {
    step: i32,
    /// Ray distance at which the next boundary on this axis is crossed.
    t_max: f32,
    /// Ray distance covered by one full cell on this axis.
    t_delta: f32,
}

impl AxisWalk {
    fn new(origin: f32, dir: f32) -> Option<Self> {
        if dir.abs() <= f32::EPSILON {
            return None;
        }
        let t_delta = 1.0 / dir.abs();
        let base = origin.floor();
        if dir > 0.0 {
            Some(Self {
                step: 1,
                t_max: (base + 1.0 - origin) * t_delta,
                t_delta,
            })
        } else {
            Some(Self {
                step: -1,
                t_max: (origin - base) * t_delta,
                t_delta,
            })
        }
    }
}

/// Longest distance a single march covers. Larger limits, including
/// infinity, are clamped to this.
pub const MAX_MARCH_DISTANCE: f32 = 65_536.0;

/// Upper bound on boundary crossings for a ray of the given length.
///
/// The length is clamped to `[0, MAX_MARCH_DISTANCE]`, so the bound is
/// always small enough to exhaust within one frame.
pub fn max_iterations(length: f32) -> u32 {
    let length = if length.is_nan() {
        0.0
    } else {
        length.clamp(0.0, MAX_MARCH_DISTANCE)
    };
    (length * 3.0).ceil() as u32 + 3
}

/// Lazy, finite DDA traversal.
///
/// The first item is always the origin cell at distance `0`. Iteration stops
/// once the next boundary lies beyond `limit`, after
/// [`max_iterations`]`(limit)` steps, or when the boundary distance stops
/// growing, whichever comes first.
#[derive(Clone, Debug)]
pub struct VoxelMarch {
    origin: Vec3,
    direction: Vec3,
    cell: IVec3,
    axes: [Option<AxisWalk>; 3],
    limit: f32,
    remaining: u32,
    started: bool,
}

impl VoxelMarch {
    /// Starts a march from `origin` along `direction` (any non-zero length).
    ///
    /// Returns `None` for a zero-length or non-finite direction, or a
    /// non-finite origin. `limit` is clamped to [`MAX_MARCH_DISTANCE`]; a NaN
    /// limit is treated as zero.
    pub fn new(origin: Vec3, direction: Vec3, limit: f32) -> Option<Self> {
        let length = direction.length();
        if !origin.is_finite() || !length.is_finite() || length <= f32::EPSILON {
            tracing::debug!(?origin, ?direction, "degenerate ray, march aborted");
            return None;
        }
        let direction = direction / length;
        let limit = if limit.is_nan() {
            0.0
        } else {
            limit.clamp(0.0, MAX_MARCH_DISTANCE)
        };

        Some(Self {
            origin,
            direction,
            cell: origin.floor().as_ivec3(),
            axes: [
                AxisWalk::new(origin.x, direction.x),
                AxisWalk::new(origin.y, direction.y),
                AxisWalk::new(origin.z, direction.z),
            ],
            limit,
            remaining: max_iterations(limit),
            started: false,
        })
    }

    /// The ray origin.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// The normalized ray direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point on the ray at distance `t`.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    fn next_axis(&self) -> Option<Axis> {
        let mut best: Option<(Axis, f32)> = None;
        for axis in Axis::TIE_ORDER {
            let Some(walk) = &self.axes[axis.index()] else {
                continue;
            };
            match best {
                Some((_, t)) if walk.t_max >= t => {}
                _ => best = Some((axis, walk.t_max)),
            }
        }
        best.map(|(axis, _)| axis)
    }
}

impl Iterator for VoxelMarch {
    type Item = MarchStep;

    fn next(&mut self) -> Option<MarchStep> {
        if !self.started {
            self.started = true;
            return Some(MarchStep {
                cell: self.cell,
                distance: 0.0,
                entered_by: None,
            });
        }
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let axis = self.next_axis()?;
        let walk = self.axes[axis.index()].as_mut()?;
        let t = walk.t_max;
        if t > self.limit {
            self.remaining = 0;
            return None;
        }
        let next_t = walk.t_max + walk.t_delta;
        if next_t <= t {
            // Precision exhausted: the boundary distance no longer advances.
            self.remaining = 0;
            return None;
        }
        walk.t_max = next_t;
        self.cell[axis.index()] += walk.step;

        Some(MarchStep {
            cell: self.cell,
            distance: t,
            entered_by: Some((axis, walk.step)),
        })
    }
}

/// Visits every cell strictly between the cell containing `start` and the
/// cell containing `end`, together with the distance from `start` at which it
/// was entered.
///
/// Neither endpoint cell is reported. A degenerate segment visits nothing.
pub fn march_segment(start: Vec3, end: Vec3, mut visit: impl FnMut(IVec3, f32)) {
    let end_cell = end.floor().as_ivec3();
    if start.floor().as_ivec3() == end_cell {
        return;
    }
    let delta = end - start;
    let Some(march) = VoxelMarch::new(start, delta, delta.length()) else {
        return;
    };
    for step in march.skip(1) {
        if step.cell == end_cell {
            break;
        }
        visit(step.cell, step.distance);
    }
}
