use bevy::prelude::*;
use tray_helpers::input::just_pressed_screen_position;

use crate::GameState;
use crate::placement::AllTraysPlaced;
use crate::tray::TrayMotion;

const TUTORIAL: &str = "1. Move a tray by swiping left, right, up or down.\n\
    2. Push it into the wall of its own color to place it outside the grid.\n\
    3. Move all 4 trays out to win!";

/// Plugin for the welcome, tutorial and win overlays.
pub struct ScreenPlugin;

impl Plugin for ScreenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FirstPlay>()
            .add_systems(OnEnter(GameState::Welcome), spawn_welcome_screen)
            .add_systems(
                Update,
                start_on_tap.run_if(in_state(GameState::Welcome)),
            )
            .add_systems(OnExit(GameState::Welcome), despawn_screen::<WelcomeScreen>)
            .add_systems(OnEnter(GameState::Playing), show_tutorial)
            .add_systems(
                Update,
                hide_tutorial_once_moving.run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnExit(GameState::Playing), despawn_screen::<TutorialText>)
            .add_systems(Update, spawn_win_screen.run_if(on_event::<AllTraysPlaced>))
            .add_systems(Update, start_on_tap.run_if(in_state(GameState::Won)))
            .add_systems(OnExit(GameState::Won), despawn_screen::<WinScreen>);
    }
}

/// Whether the tutorial still has to be shown this session.
#[derive(Resource, Debug)]
pub struct FirstPlay(pub bool);

impl Default for FirstPlay {
    fn default() -> Self {
        Self(true)
    }
}

#[derive(Component)]
struct WelcomeScreen;

#[derive(Component)]
struct TutorialText;

#[derive(Component)]
struct WinScreen;

fn overlay_text(text: &str, font_size: f32, top: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(top),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
    )
}

fn spawn_welcome_screen(mut commands: Commands) {
    commands.spawn((overlay_text("Tray Sort", 40.0, 20.0), WelcomeScreen));
    commands.spawn((overlay_text("Tap to start", 28.0, 70.0), WelcomeScreen));
}

fn start_on_tap(
    mouse_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if just_pressed_screen_position(&mouse_input, &touch_input, &windows).is_some() {
        next_state.set(GameState::Playing);
    }
}

fn show_tutorial(mut commands: Commands, mut first_play: ResMut<FirstPlay>) {
    if !first_play.0 {
        return;
    }
    first_play.0 = false;
    commands.spawn((overlay_text(TUTORIAL, 16.0, 4.0), TutorialText));
}

fn hide_tutorial_once_moving(
    mut commands: Commands,
    tutorial: Query<Entity, With<TutorialText>>,
    trays: Query<&TrayMotion>,
) {
    if tutorial.is_empty() || !trays.iter().any(TrayMotion::is_moving) {
        return;
    }
    for entity in &tutorial {
        commands.entity(entity).despawn_recursive();
    }
}

fn spawn_win_screen(mut commands: Commands) {
    commands.spawn((overlay_text("All trays placed!", 36.0, 30.0), WinScreen));
    commands.spawn((overlay_text("Tap to play again", 24.0, 70.0), WinScreen));
}

fn despawn_screen<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
