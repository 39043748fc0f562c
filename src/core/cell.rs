//! Grid cell for the staggered (MAC) layout
//!
//! Velocity is never stored at the cell center: the X component lives on the
//! cell's -X face and the Y component on its -Y face.

use crate::math::{Real, Vector};

/// Velocity component selector, also used to index `Cell::vel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X = 0,
    Y = 1,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Forward neighbors reachable from a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Neighbor {
    PosX,
    PosY,
    PosXY,
}

impl Neighbor {
    pub const ALL: [Neighbor; 3] = [Neighbor::PosX, Neighbor::PosY, Neighbor::PosXY];

    /// Coordinate offset of this neighbor
    #[inline(always)]
    pub fn offset(self) -> (usize, usize) {
        match self {
            Neighbor::PosX => (1, 0),
            Neighbor::PosY => (0, 1),
            Neighbor::PosXY => (1, 1),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellType {
    Fluid,
    #[default]
    Empty,
    Solid,
}

/// One grid cell. Topology is not stored here; `Grid` derives neighbors
/// from the cell's index, so copying a cell never copies links.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cell {
    /// Pressure, sampled at the cell center
    pub pressure: Real,
    /// Face velocities: `[X on the -X face, Y on the -Y face]`
    pub vel: [Real; 2],
    /// Next face velocities, written during a sweep and committed afterwards
    pub staged_vel: [Real; 2],
    pub cell_type: CellType,
}

impl Cell {
    #[inline(always)]
    pub fn zeroed() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn is_fluid(&self) -> bool {
        self.cell_type == CellType::Fluid
    }

    #[inline(always)]
    pub fn is_solid(&self) -> bool {
        self.cell_type == CellType::Solid
    }

    #[inline(always)]
    pub fn velocity(&self, axis: Axis) -> Real {
        self.vel[axis.index()]
    }

    #[inline(always)]
    pub fn set_velocity(&mut self, axis: Axis, value: Real) {
        self.vel[axis.index()] = value;
    }

    #[inline(always)]
    pub fn stage_velocity(&mut self, axis: Axis, value: Real) {
        self.staged_vel[axis.index()] = value;
    }

    /// Both face components as a vector. These are samples from two
    /// different faces, not a cell-centered velocity.
    #[inline(always)]
    pub fn face_velocities(&self) -> Vector {
        Vector::new(self.vel[0], self.vel[1])
    }

    /// Overwrite `vel` with `staged_vel`. The staged buffer is left as is,
    /// so a second commit without a new stage is a no-op.
    #[inline(always)]
    pub fn commit_staged_vel(&mut self) {
        self.vel = self.staged_vel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_zeroed_and_not_fluid() {
        let cell = Cell::default();
        assert_eq!(cell.pressure, 0.0);
        assert_eq!(cell.vel, [0.0, 0.0]);
        assert_eq!(cell.staged_vel, [0.0, 0.0]);
        assert!(!cell.is_fluid());
    }

    #[test]
    fn commit_is_idempotent() {
        let mut cell = Cell::zeroed();
        cell.vel = [3.0, -1.0];
        cell.stage_velocity(Axis::X, 0.5);
        cell.stage_velocity(Axis::Y, 0.25);

        cell.commit_staged_vel();
        assert_eq!(cell.vel, [0.5, 0.25]);
        assert_eq!(cell.staged_vel, [0.5, 0.25]);

        cell.commit_staged_vel();
        assert_eq!(cell.vel, [0.5, 0.25]);
    }

    #[test]
    fn copy_duplicates_scalar_fields() {
        let mut cell = Cell::zeroed();
        cell.pressure = 2.0;
        cell.vel = [1.0, 2.0];
        cell.staged_vel = [3.0, 4.0];
        cell.cell_type = CellType::Solid;

        let copy = cell;
        assert_eq!(copy, cell);
        assert!(copy.is_solid());
    }
}
