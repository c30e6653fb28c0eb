use bevy::prelude::*;
use strum::{Display, EnumIter};

/// A discrete move request, one grid step along a world axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MoveIntent {
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl MoveIntent {
    pub const fn direction(self) -> Vec3 {
        match self {
            Self::PosX => Vec3::X,
            Self::NegX => Vec3::NEG_X,
            Self::PosZ => Vec3::Z,
            Self::NegZ => Vec3::NEG_Z,
        }
    }

    /// Classifies a screen-space drag by its dominant axis.
    ///
    /// Screen y grows downward, so dragging down moves toward the camera (+Z).
    pub fn from_screen_delta(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 { Self::PosX } else { Self::NegX }
        } else if delta.y > 0.0 {
            Self::PosZ
        } else {
            Self::NegZ
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
}

/// Turns the stream of a single pointer into move intents.
#[derive(Debug, Clone, Copy)]
pub struct DragGesture {
    threshold: f32,
    last_position: Vec2,
    armed: bool,
}

impl DragGesture {
    pub const fn new(threshold: f32) -> Self {
        Self {
            threshold,
            last_position: Vec2::ZERO,
            armed: false,
        }
    }

    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    pub const fn last_position(&self) -> Vec2 {
        self.last_position
    }

    /// Arms the gesture unless the pointer landed somewhere it must be ignored.
    pub fn press(&mut self, position: Vec2, can_arm: bool) -> bool {
        if !can_arm {
            return false;
        }
        self.last_position = position;
        self.armed = true;
        true
    }

    pub fn drag(&mut self, position: Vec2) -> Option<MoveIntent> {
        if !self.armed {
            return None;
        }

        let delta = position - self.last_position;
        if delta.length() < self.threshold {
            return None;
        }

        self.last_position = position;
        Some(MoveIntent::from_screen_delta(delta))
    }

    pub fn release(&mut self) {
        self.armed = false;
    }

    /// Feeds one pointer event. `can_arm` is only consulted on `Down`.
    pub fn handle(&mut self, event: PointerEvent, can_arm: bool) -> Option<MoveIntent> {
        match event {
            PointerEvent::Down(position) => {
                self.press(position, can_arm);
                None
            }
            PointerEvent::Move(position) => self.drag(position),
            PointerEvent::Up => {
                self.release();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed_at(position: Vec2) -> DragGesture {
        let mut gesture = DragGesture::new(20.0);
        assert!(gesture.press(position, true), "gesture should arm");
        gesture
    }

    #[test]
    fn small_drags_emit_nothing_and_keep_the_anchor() {
        let mut gesture = armed_at(Vec2::new(100.0, 100.0));

        assert_eq!(gesture.drag(Vec2::new(110.0, 105.0)), None, "below threshold");
        assert_eq!(
            gesture.last_position(),
            Vec2::new(100.0, 100.0),
            "anchor only moves when an intent fires"
        );

        // The displacement accumulates from the anchor.
        assert_eq!(
            gesture.drag(Vec2::new(125.0, 100.0)),
            Some(MoveIntent::PosX),
            "accumulated past threshold"
        );
        assert_eq!(
            gesture.last_position(),
            Vec2::new(125.0, 100.0),
            "anchor resets after an intent"
        );
    }

    #[test]
    fn threshold_is_inclusive_and_horizontal_sign_wins() {
        let mut gesture = armed_at(Vec2::ZERO);
        assert_eq!(
            gesture.drag(Vec2::new(20.0, 0.0)),
            Some(MoveIntent::PosX),
            "exactly at threshold"
        );
        assert_eq!(
            gesture.drag(Vec2::new(-20.0, 5.0)),
            Some(MoveIntent::NegX),
            "dominant negative x"
        );
    }

    #[test]
    fn vertical_drags_map_to_z() {
        let mut gesture = armed_at(Vec2::ZERO);
        assert_eq!(
            gesture.drag(Vec2::new(3.0, 30.0)),
            Some(MoveIntent::PosZ),
            "dragging down the screen comes toward the camera"
        );
        assert_eq!(
            gesture.drag(Vec2::new(3.0, -10.0)),
            Some(MoveIntent::NegZ),
            "dragging up the screen goes away"
        );
        assert_eq!(
            MoveIntent::from_screen_delta(Vec2::new(25.0, -25.0)),
            MoveIntent::NegZ,
            "ties go to the vertical axis"
        );
    }

    #[test]
    fn unarmed_gestures_ignore_moves() {
        let mut gesture = DragGesture::new(20.0);
        assert!(
            !gesture.press(Vec2::ZERO, false),
            "pointer over UI or snapped tray"
        );
        assert_eq!(gesture.drag(Vec2::new(100.0, 0.0)), None, "never armed");

        let mut gesture = armed_at(Vec2::ZERO);
        assert_eq!(gesture.handle(PointerEvent::Up, true), None, "release");
        assert!(!gesture.is_armed(), "up disarms");
        assert_eq!(
            gesture.handle(PointerEvent::Move(Vec2::new(100.0, 0.0)), true),
            None,
            "moves after release are ignored"
        );
    }

    #[test]
    fn event_stream_produces_one_intent_per_threshold_crossing() {
        let mut gesture = DragGesture::new(20.0);
        let events = [
            PointerEvent::Down(Vec2::ZERO),
            PointerEvent::Move(Vec2::new(10.0, 0.0)),
            PointerEvent::Move(Vec2::new(21.0, 0.0)),
            PointerEvent::Move(Vec2::new(30.0, 0.0)),
            PointerEvent::Move(Vec2::new(30.0, -25.0)),
            PointerEvent::Up,
            PointerEvent::Move(Vec2::new(90.0, -25.0)),
        ];
        let intents: Vec<_> = events
            .into_iter()
            .filter_map(|event| gesture.handle(event, true))
            .collect();

        assert_eq!(
            intents,
            vec![MoveIntent::PosX, MoveIntent::NegZ],
            "one intent per crossing"
        );
    }

    #[test]
    fn intent_directions_are_unit_axes() {
        use strum::IntoEnumIterator;

        for intent in MoveIntent::iter() {
            let direction = intent.direction();
            assert!(
                (direction.length() - 1.0).abs() < f32::EPSILON,
                "{intent} is a unit vector"
            );
            assert!(direction.y.abs() < f32::EPSILON, "{intent} stays planar");
        }
    }
}
