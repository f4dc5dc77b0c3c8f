//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for the flight simulation.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Planets, moons and other static bodies.
    Environment = 1 << 0,
    /// The controlled craft.
    Craft = 1 << 1,
}

impl CollisionGroup {
    /// Create a collision group for environment.
    pub fn environment() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Environment as u32);
        let filter = Group::from_bits_retain(Self::Craft as u32);
        (membership, filter)
    }

    /// Create a collision group for the craft.
    pub fn craft() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Craft as u32);
        let filter = Group::from_bits_retain(Self::Environment as u32);
        (membership, filter)
    }

    pub fn interaction_groups(self) -> InteractionGroups {
        let (membership, filter) = match self {
            CollisionGroup::Environment => Self::environment(),
            CollisionGroup::Craft => Self::craft(),
        };
        InteractionGroups::new(membership, filter)
    }
}

/// Component linking an ECS entity to its physics handles.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: Option<ColliderHandle>,
}

impl PhysicsBody {
    pub fn with_collider(rigid_body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self {
            rigid_body,
            collider: Some(collider),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn craft_and_environment_collide() {
        let craft = CollisionGroup::Craft.interaction_groups();
        let env = CollisionGroup::Environment.interaction_groups();
        assert!(craft.test(env));
    }
}
