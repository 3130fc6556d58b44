use glam::Vec3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Point inside the box at per-axis fractions `f` in `[0, 1]`
    pub fn lerp(&self, f: Vec3) -> Vec3 {
        self.min + self.size() * f
    }

    /// Fold a moving point back inside the box, mirroring its velocity on every
    /// axis it crossed.
    pub fn reflect(&self, position: &mut Vec3, velocity: &mut Vec3) {
        for axis in 0..3 {
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if position[axis] < lo {
                position[axis] = (2.0 * lo - position[axis]).min(hi);
                velocity[axis] = velocity[axis].abs();
            } else if position[axis] > hi {
                position[axis] = (2.0 * hi - position[axis]).max(lo);
                velocity[axis] = -velocity[axis].abs();
            }
        }
    }
}
