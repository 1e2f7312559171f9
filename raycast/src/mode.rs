use worldcast_geometry::Vector3;

/// How the direction of the next cast is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CastMode {
    /// Along the camera's forward vector.
    #[default]
    Forward,
    /// Around the camera's forward vector, perturbed by a random offset.
    Random,
    /// Along an explicit world space direction.
    Direction(Vector3),
}

impl CastMode {
    /// Switches between forward and random casting. An explicit direction switches to forward.
    pub fn toggled(self) -> Self {
        match self {
            CastMode::Forward => CastMode::Random,
            CastMode::Random | CastMode::Direction(_) => CastMode::Forward,
        }
    }
}
