use bevy::prelude::*;

/// Marker for the entity that carries the weapon/hands offset.
/// Its `Transform` receives the composed rig pose every tick that it changes.
#[derive(Component, Debug, Default)]
pub struct RigPoseTarget;

/// Marker for the camera pivot. Its translation receives the camera offset.
#[derive(Component, Debug, Default)]
pub struct RigCameraTarget;
