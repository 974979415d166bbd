// Copyright @yucwang 2026

use crate::math::constants::Float;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayRole {
    View,
    Diffuse,
    Specular,
    FinalGather,
}

/// State carried down one recursive cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayState {
    pub depth: u32,
    pub importance: Float,
    pub role: RayRole,
    pub consider_emission: bool,
}

impl Default for RayState {
    fn default() -> Self {
        Self {
            depth: 1,
            importance: 1.0,
            role: RayRole::View,
            consider_emission: true,
        }
    }
}

impl RayState {
    /// State for a ray spawned from this one. `weight` is the max component of the
    /// path throughput, clamped so importance never grows along a path.
    pub fn spawn(&self, weight: Float, role: RayRole) -> Self {
        Self {
            depth: self.depth + 1,
            importance: self.importance * weight.max(0.0).min(1.0),
            role,
            consider_emission: true,
        }
    }

    pub fn without_emission(mut self) -> Self {
        self.consider_emission = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_never_raises_importance() {
        let rs = RayState::default();
        let child = rs.spawn(4.0, RayRole::Specular);
        assert_eq!(child.depth, 2);
        assert_eq!(child.importance, 1.0);

        let grandchild = child.spawn(0.25, RayRole::Diffuse);
        assert_eq!(grandchild.depth, 3);
        assert!((grandchild.importance - 0.25).abs() < 1e-6);
        assert!(!grandchild.without_emission().consider_emission);
    }
}
