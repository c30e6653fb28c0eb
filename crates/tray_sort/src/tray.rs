use bevy::prelude::*;
use strum::{Display, EnumIter};

use crate::config::TrayConfig;
use crate::gesture::MoveIntent;

/// Category shared by trays, walls and slots. A tray only snaps on a wall of its own color.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[reflect(Component)]
pub enum TrayColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl TrayColor {
    pub const fn color(self) -> Color {
        match self {
            Self::Red => Color::srgb(0.9, 0.25, 0.25),
            Self::Blue => Color::srgb(0.25, 0.45, 0.95),
            Self::Green => Color::srgb(0.3, 0.8, 0.35),
            Self::Yellow => Color::srgb(0.95, 0.85, 0.25),
        }
    }
}

#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MotionState {
    #[default]
    Idle,
    Dragging,
    Moving,
    Snapped,
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStep {
    Still,
    Moved,
    Arrived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    Ignored,
    Snapped(Entity),
    Reverted,
}

/// Placement slots a tray may snap into.
#[derive(Component, Debug, Clone, Default)]
pub struct CandidateSlots(pub Vec<Entity>);

/// Motion state of one tray. `Snapped` is terminal: nothing moves the tray afterwards.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct TrayMotion {
    state: MotionState,
    position: Vec3,
    velocity: Vec3,
    target: Vec3,
    start_grid_position: Vec3,
}

impl TrayMotion {
    pub const fn new(position: Vec3) -> Self {
        Self {
            state: MotionState::Idle,
            position,
            velocity: Vec3::ZERO,
            target: position,
            start_grid_position: position,
        }
    }

    pub const fn state(&self) -> MotionState {
        self.state
    }

    pub const fn position(&self) -> Vec3 {
        self.position
    }

    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub const fn target(&self) -> Vec3 {
        self.target
    }

    pub const fn start_grid_position(&self) -> Vec3 {
        self.start_grid_position
    }

    pub const fn is_snapped(&self) -> bool {
        matches!(self.state, MotionState::Snapped)
    }

    pub const fn is_moving(&self) -> bool {
        matches!(self.state, MotionState::Moving)
    }

    /// A pointer went down on the tray.
    pub fn arm(&mut self) -> bool {
        match self.state {
            MotionState::Idle | MotionState::Dragging => {
                self.state = MotionState::Dragging;
                true
            }
            MotionState::Moving | MotionState::Snapped => false,
        }
    }

    pub fn disarm(&mut self) {
        if self.state == MotionState::Dragging {
            self.state = MotionState::Idle;
        }
    }

    /// Starts moving along `intent`. Returns the chosen target, or `None` if the tray can't move now.
    pub fn begin_move(
        &mut self,
        intent: MoveIntent,
        grid_points: &[Vec3],
        config: &TrayConfig,
    ) -> Option<Vec3> {
        if !matches!(self.state, MotionState::Idle | MotionState::Dragging) {
            return None;
        }

        let direction = intent.direction();
        self.start_grid_position = self.position;
        self.target = nearest_grid_point(
            self.position,
            direction,
            grid_points,
            config.direction_cone,
            config.min_step,
        )
        .unwrap_or_else(|| {
            debug!("No grid point toward {intent}, stepping {}", config.fallback_step);
            self.position + direction * config.fallback_step
        });
        self.velocity = Vec3::ZERO;
        self.state = MotionState::Moving;
        Some(self.target)
    }

    /// Puts a tray that is not snapped back on the movement plane.
    pub fn settle(&mut self, config: &TrayConfig) {
        if !self.is_snapped() {
            self.position.y = config.fixed_y;
        }
    }

    /// Advances a moving tray by one fixed tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32, config: &TrayConfig) -> MotionStep {
        if self.state != MotionState::Moving {
            return MotionStep::Still;
        }

        self.position.y = config.fixed_y;

        let to_target = planar(self.target - self.position);
        let distance = to_target.length();
        if distance >= config.arrival_tolerance {
            let direction = to_target / distance;
            // Unit mass: the force is scaled by the tick length, then integrated over it.
            let acceleration = config.move_force * dt;
            let speed = acceleration
                .mul_add(dt, self.velocity.length())
                .min(config.max_speed);
            let step = (speed * dt).min(distance);

            self.position += direction * step;
            self.velocity = direction * speed;
        }

        if planar(self.target - self.position).length() < config.arrival_tolerance {
            self.velocity = Vec3::ZERO;
            self.position = Vec3::new(self.target.x, config.fixed_y, self.target.z);
            self.state = MotionState::Idle;
            return MotionStep::Arrived;
        }
        MotionStep::Moved
    }

    /// Reacts to the start of a contact with an object of category `other`.
    ///
    /// `free_slots` are the tray's candidate slots that nobody occupies yet.
    pub fn collide(
        &mut self,
        own: TrayColor,
        other: Option<TrayColor>,
        free_slots: impl IntoIterator<Item = (Entity, Vec3)>,
        config: &TrayConfig,
    ) -> CollisionOutcome {
        if self.state != MotionState::Moving {
            return CollisionOutcome::Ignored;
        }

        if other == Some(own) {
            if let Some((slot, position)) = nearest_slot(self.position, free_slots) {
                self.snap_to(position, config);
                return CollisionOutcome::Snapped(slot);
            }
            warn!("No free {own} slot left, sending the tray back");
        }

        self.revert(config);
        CollisionOutcome::Reverted
    }

    pub fn snap_to(&mut self, slot_position: Vec3, config: &TrayConfig) {
        if self.is_snapped() {
            return;
        }
        self.velocity = Vec3::ZERO;
        self.position = Vec3::new(slot_position.x, config.placement_height, slot_position.z);
        self.target = self.position;
        self.state = MotionState::Snapped;
    }

    pub fn revert(&mut self, config: &TrayConfig) {
        if self.is_snapped() {
            return;
        }
        self.velocity = Vec3::ZERO;
        self.position = Vec3::new(
            self.start_grid_position.x,
            config.revert_height,
            self.start_grid_position.z,
        );
        self.target = self.position;
        self.state = MotionState::Idle;
    }
}

fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Closest grid point roughly along `direction`, ignoring the one the tray stands on.
pub fn nearest_grid_point(
    current: Vec3,
    direction: Vec3,
    points: &[Vec3],
    direction_cone: f32,
    min_step: f32,
) -> Option<Vec3> {
    points
        .iter()
        .copied()
        .filter(|point| {
            let to_point = planar(*point - current).normalize_or_zero();
            direction.dot(to_point) > direction_cone
        })
        .map(|point| (point, planar(point - current).length()))
        .filter(|(_, distance)| *distance > min_step)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(point, _)| point)
}

pub fn nearest_slot(
    position: Vec3,
    slots: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Option<(Entity, Vec3)> {
    slots
        .into_iter()
        .min_by(|(_, a), (_, b)| position.distance(*a).total_cmp(&position.distance(*b)))
}
