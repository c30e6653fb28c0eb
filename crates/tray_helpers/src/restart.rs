use bevy::prelude::*;

/// Marks entities that belong to one play session and go away on restart.
#[derive(Component, Default)]
pub struct CleanupMarker;

pub fn cleanup_marked_entities(mut commands: Commands, query: Query<Entity, With<CleanupMarker>>) {
    let mut count = 0_usize;
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
        count += 1;
    }
    debug!("Cleaned up {count} session entities");
}
