mod boat;
mod camera;
mod constants;
mod input;
mod remote;
mod scene;
mod ui;
mod water;

use bevy::{
    prelude::*,
    window::{ExitCondition, PresentMode},
};
use clap::Parser;
use constants::WINDOW_TITLE;
use input::keyboard::get_bindings;
use remote::AssetSource;
use shared::{
    get_data_folder_paths, sets::FrameSet, viewport::RenderSurface, BOAT_MODEL_URL,
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, WATER_NORMALS_URL,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(
        short,
        long,
        help = "Folder holding keybindings and the download cache, defaults to ./data"
    )]
    data_folder_path: Option<String>,

    #[arg(
        long,
        default_value = BOAT_MODEL_URL,
        help = "Boat model: an http(s) URL or a path inside the data folder"
    )]
    model: String,

    #[arg(
        long,
        default_value = WATER_NORMALS_URL,
        help = "Wave normal map: an http(s) URL or a path inside the data folder"
    )]
    water_normals: String,

    #[arg(long, default_value_t = DEFAULT_WINDOW_WIDTH)]
    width: f32,

    #[arg(long, default_value_t = DEFAULT_WINDOW_HEIGHT)]
    height: f32,

    #[arg(long, help = "Exit after rendering this many frames")]
    max_frames: Option<u32>,

    #[arg(long, help = "Never touch the network, only use cached or local assets")]
    offline: bool,
}

/// Where the boat model and the wave normal map come from.
#[derive(Resource, Debug, Clone)]
pub struct AssetSources {
    pub model: AssetSource,
    pub water_normals: AssetSource,
    pub offline: bool,
}

/// Optional frame budget after which the app exits on its own.
#[derive(Resource, Debug)]
pub struct FrameLimit {
    pub remaining: u32,
}

fn frame_limit_system(mut limit: ResMut<FrameLimit>, mut exit: EventWriter<AppExit>) {
    if limit.remaining == 0 {
        return;
    }
    limit.remaining -= 1;
    if limit.remaining == 0 {
        info!("Frame limit reached, exiting");
        exit.write(AppExit::Success);
    }
}

fn main() {
    let args = Args::parse();

    let data_folder_paths = get_data_folder_paths(args.data_folder_path);

    println!(
        "Starting application with data folder: {}",
        data_folder_paths.data_folder_path.display()
    );

    let asset_sources = AssetSources {
        model: AssetSource::parse(&args.model),
        water_normals: AssetSource::parse(&args.water_normals),
        offline: args.offline,
    };

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(AssetPlugin {
                file_path: data_folder_paths.data_folder_path.display().to_string(),
                ..Default::default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: WINDOW_TITLE.to_string(),
                    resolution: (args.width, args.height).into(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                // The frame loop has no stop condition of its own besides --max-frames
                exit_condition: ExitCondition::OnPrimaryClosed,
                ..default()
            }),
    );

    app.configure_sets(
        Update,
        (
            FrameSet::Loading,
            FrameSet::Input,
            FrameSet::Simulation,
            FrameSet::Camera,
            FrameSet::Ui,
        )
            .chain(),
    );

    if let Some(frames) = args.max_frames {
        app.insert_resource(FrameLimit { remaining: frames })
            .add_systems(Last, frame_limit_system);
    }

    app.insert_resource(get_bindings(&data_folder_paths))
        .insert_resource(data_folder_paths)
        .insert_resource(asset_sources)
        .insert_resource(RenderSurface::new(args.width, args.height))
        .add_plugins((
            scene::LightingPlugin,
            camera::CameraPlugin,
            water::OceanPlugin,
            boat::BoatPlugin,
            ui::LoadingUiPlugin,
        ))
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["sailboat"]);
        assert_eq!(args.model, BOAT_MODEL_URL);
        assert_eq!(args.water_normals, WATER_NORMALS_URL);
        assert_eq!(args.width, 800.0);
        assert_eq!(args.height, 600.0);
        assert!(!args.offline);
        assert_eq!(args.max_frames, None);
    }

    #[test]
    fn test_local_model_override() {
        let args = Args::parse_from(["sailboat", "--model", "models/boat.glb", "--offline"]);
        assert_eq!(
            AssetSource::parse(&args.model),
            AssetSource::Local("models/boat.glb".to_string())
        );
        assert!(args.offline);
    }

    #[test]
    fn test_frame_limit_exits_after_budget() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(FrameLimit { remaining: 3 })
            .add_systems(Last, frame_limit_system);

        for _ in 0..2 {
            app.update();
            assert!(app.should_exit().is_none());
        }
        app.update();
        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }
}
