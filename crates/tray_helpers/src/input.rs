use bevy::prelude::*;

/// Screen position of any pointer that went down this frame, mouse first.
pub fn just_pressed_screen_position(
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.just_pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else if touch_input.any_just_pressed() {
        let touch = touch_input.iter_just_pressed().next()?;
        Some(touch.position())
    } else {
        None
    }
}

/// The finger that drives a drag. Other fingers are ignored until it lifts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryTouch {
    id: Option<u64>,
}

impl PrimaryTouch {
    pub const fn id(&self) -> Option<u64> {
        self.id
    }

    /// Starts following a finger that went down this frame, unless one is already held.
    pub fn press(&mut self, touch_input: &Touches) -> Option<Vec2> {
        if let Some(id) = self.id {
            if touch_input.get_pressed(id).is_some() {
                return None;
            }
            // Lifted while nobody was listening
            self.id = None;
        }
        let touch = touch_input.iter_just_pressed().next()?;
        self.id = Some(touch.id());
        Some(touch.position())
    }

    pub fn position(&self, touch_input: &Touches) -> Option<Vec2> {
        touch_input.get_pressed(self.id?).map(|touch| touch.position())
    }

    /// Whether the followed finger was lifted or cancelled this frame.
    pub fn release(&mut self, touch_input: &Touches) -> bool {
        let Some(id) = self.id else {
            return false;
        };
        if touch_input.just_released(id) || touch_input.just_canceled(id) {
            self.id = None;
            return true;
        }
        false
    }
}

/// Screen position where the mouse or the primary finger went down this frame.
pub fn just_pressed_primary_position(
    button_input: &ButtonInput<MouseButton>,
    primary: &mut PrimaryTouch,
    touch_input: &Touches,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.just_pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else {
        primary.press(touch_input)
    }
}

/// Screen position of the mouse or the primary finger while held down.
pub fn pressed_screen_position(
    button_input: &ButtonInput<MouseButton>,
    primary: &PrimaryTouch,
    touch_input: &Touches,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else {
        primary.position(touch_input)
    }
}

/// Whether the mouse or the primary finger was lifted this frame.
pub fn just_released(
    button_input: &ButtonInput<MouseButton>,
    primary: &mut PrimaryTouch,
    touch_input: &Touches,
) -> bool {
    let touch_released = primary.release(touch_input);
    button_input.just_released(MouseButton::Left) || touch_released
}

/// Casts a ray from the camera through a screen position.
pub fn screen_ray(camera: &Query<(&Camera, &GlobalTransform)>, position: Vec2) -> Option<Ray3d> {
    let (camera, camera_transform) = camera.get_single().ok()?;

    camera.viewport_to_world(camera_transform, position).ok()
}

#[cfg(test)]
mod tests {
    use bevy::input::touch::{TouchInput, TouchPhase, touch_screen_input_system};

    use super::*;

    fn touch_app() -> App {
        let mut app = App::new();
        app.init_resource::<Touches>()
            .add_event::<TouchInput>()
            .add_systems(PreUpdate, touch_screen_input_system);
        app
    }

    fn touch(app: &mut App, id: u64, phase: TouchPhase, position: Vec2) {
        app.world_mut().send_event(TouchInput {
            phase,
            position,
            window: Entity::PLACEHOLDER,
            force: None,
            id,
        });
    }

    #[test]
    fn second_finger_neither_steals_nor_ends_the_drag() {
        let mut app = touch_app();
        let mut primary = PrimaryTouch::default();

        touch(&mut app, 1, TouchPhase::Started, Vec2::new(10.0, 10.0));
        app.update();
        let touches = app.world().resource::<Touches>();
        assert_eq!(
            primary.press(touches),
            Some(Vec2::new(10.0, 10.0)),
            "first finger starts the drag"
        );
        assert_eq!(primary.id(), Some(1), "first finger followed");

        touch(&mut app, 2, TouchPhase::Started, Vec2::new(200.0, 300.0));
        touch(&mut app, 1, TouchPhase::Moved, Vec2::new(40.0, 10.0));
        app.update();
        let touches = app.world().resource::<Touches>();
        assert_eq!(primary.press(touches), None, "second finger ignored");
        assert_eq!(
            primary.position(touches),
            Some(Vec2::new(40.0, 10.0)),
            "position follows the first finger"
        );

        touch(&mut app, 2, TouchPhase::Ended, Vec2::new(200.0, 300.0));
        app.update();
        let touches = app.world().resource::<Touches>();
        assert!(!primary.release(touches), "other finger lifting is ignored");
        assert_eq!(primary.id(), Some(1), "still following the first finger");

        touch(&mut app, 1, TouchPhase::Canceled, Vec2::new(40.0, 10.0));
        app.update();
        let touches = app.world().resource::<Touches>();
        assert!(primary.release(touches), "cancel ends the drag");
        assert_eq!(primary.id(), None, "free for the next finger");
    }
}
