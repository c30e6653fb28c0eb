use avian3d::prelude::*;
use bevy::prelude::*;

use crate::config::TrayConfig;
use crate::placement::{PlacementSlot, TraySnapped};
use crate::tray::{CandidateSlots, CollisionOutcome, MotionStep, TrayColor, TrayMotion};

/// Collision detection only: trays are kinematic and move through [`advance_trays`].
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Gravity(Vec3::ZERO))
            .add_plugins(PhysicsPlugins::default());
    }
}

pub fn advance_trays(
    time: Res<Time>,
    config: Res<TrayConfig>,
    mut trays: Query<(Entity, &mut TrayMotion)>,
) {
    let dt = time.delta_secs();
    for (entity, mut motion) in &mut trays {
        if motion.is_snapped() {
            continue;
        }
        motion.settle(&config);
        if motion.advance(dt, &config) == MotionStep::Arrived {
            debug!("Tray {entity} reached {}", motion.position());
        }
    }
}

pub fn resolve_collisions(
    mut collisions: EventReader<CollisionStarted>,
    config: Res<TrayConfig>,
    colors: Query<&TrayColor>,
    mut trays: Query<(&mut TrayMotion, &TrayColor, &CandidateSlots)>,
    mut slots: Query<(&mut PlacementSlot, &GlobalTransform)>,
    mut snapped: EventWriter<TraySnapped>,
) {
    for CollisionStarted(first, second) in collisions.read() {
        for (tray, other) in [(*first, *second), (*second, *first)] {
            let Ok((mut motion, own, candidates)) = trays.get_mut(tray) else {
                continue;
            };
            if !motion.is_moving() {
                continue;
            }

            let other_color = colors.get(other).ok().copied();
            let free_slots: Vec<(Entity, Vec3)> = candidates
                .0
                .iter()
                .filter_map(|&slot| {
                    let (placement, transform) = slots.get(slot).ok()?;
                    placement
                        .is_free()
                        .then(|| (slot, transform.translation()))
                })
                .collect();

            match motion.collide(*own, other_color, free_slots, &config) {
                CollisionOutcome::Snapped(slot) => {
                    if let Ok((mut placement, _)) = slots.get_mut(slot) {
                        placement.occupy(tray);
                    }
                    info!("{own} tray {tray} snapped into place");
                    snapped.send(TraySnapped { tray, slot });
                }
                CollisionOutcome::Reverted => {
                    info!("{own} tray {tray} hit a wrong wall, moving back");
                }
                CollisionOutcome::Ignored => {}
            }
        }
    }
}

/// Writes the simulated tray positions back to the transforms the physics engine reads.
pub fn sync_tray_transforms(mut trays: Query<(&TrayMotion, &mut Transform)>) {
    for (motion, mut transform) in &mut trays {
        if transform.translation != motion.position() {
            transform.translation = motion.position();
        }
    }
}
