//! Passive tracer particles
//!
//! Tracers are bare positions advected by the grid for visualization. They
//! carry no mass and never feed back into the velocity field.

use rand::Rng;

use crate::math::{Point, Real, Vector, clamp_point};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSet {
    positions: Vec<Point>,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn push(&mut self, position: Point) -> usize {
        let index = self.positions.len();
        self.positions.push(position);
        index
    }

    pub fn insert_batch(&mut self, mut batch: Vec<Point>) {
        self.positions.append(&mut batch);
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.positions.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Point> {
        self.positions.iter_mut()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Place `per_axis * per_axis` tracers inside every cell of a
    /// `cols x rows` grid, at offsets `(i + 1) / (per_axis + 1)`.
    ///
    /// A non-zero `jitter` nudges each tracer by up to that many cells,
    /// drawn from `rng`; the tracer stays inside its cell.
    pub fn seed_cells<R: Rng>(
        &mut self,
        cols: usize,
        rows: usize,
        per_axis: u32,
        jitter: Real,
        rng: &mut R,
    ) {
        let spacing = 1.0 / (per_axis as Real + 1.0);
        self.positions
            .reserve(cols * rows * (per_axis as usize).pow(2));

        for y in 0..rows {
            for x in 0..cols {
                let corner = Vector::new(x as Real, y as Real);
                for i in 0..per_axis {
                    for j in 0..per_axis {
                        let mut offset =
                            Vector::new(spacing * (i + 1) as Real, spacing * (j + 1) as Real);
                        if jitter > 0.0 {
                            offset += Vector::new(
                                rng.random_range(-jitter..=jitter),
                                rng.random_range(-jitter..=jitter),
                            );
                            offset = clamp_point(offset, Vector::ONE);
                        }
                        self.positions.push(corner + offset);
                    }
                }
            }
        }
    }
}
