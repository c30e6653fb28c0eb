use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{WgpuSettings, WgpuSettingsPriority};
use bevy::window::{WindowMode, WindowResolution};

// typical smartphone screen ratio (9:16)
pub const WINDOW_WIDTH: f32 = 360.0;
pub const WINDOW_HEIGHT: f32 = 640.0;

/// Physics ticks per second, matching a 0.02 s fixed step.
pub const FIXED_TIMESTEP_HZ: f64 = 50.0;

// Creates a Bevy app with the window, renderer and fixed timestep shared by every game
pub fn get_default_app(game_name: &str) -> App {
    let mut app = App::new();

    let resolution = WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT);

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: game_name.to_string(),
            present_mode: bevy::window::PresentMode::Fifo,
            resolution,
            canvas: Some("#game".into()),
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            // Tells wasm not to override default event handling, like F5, Ctrl+R etc.
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    };

    let render_plugin = RenderPlugin {
        render_creation: bevy::render::settings::RenderCreation::Automatic(WgpuSettings {
            backends: Some(
                bevy::render::settings::Backends::BROWSER_WEBGPU
                    | bevy::render::settings::Backends::GL
                    | bevy::render::settings::Backends::PRIMARY,
            ),
            power_preference: bevy::render::settings::PowerPreference::HighPerformance,
            priority: WgpuSettingsPriority::Functionality,
            ..Default::default()
        }),
        ..Default::default()
    };

    app.add_plugins(DefaultPlugins.set(window_plugin).set(render_plugin));

    // This plugin is useful to preserve battery life on mobile.
    // https://github.com/aevyrie/bevy_framepace
    app.add_plugins(bevy_framepace::FramepacePlugin);

    app.insert_resource(Time::<Fixed>::from_hz(FIXED_TIMESTEP_HZ));
    app.insert_resource(ClearColor(Color::srgb(0.08, 0.09, 0.12)));

    info!("Created app for {game_name}");

    app
}
