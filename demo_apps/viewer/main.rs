//! Headless Marionette viewer
//!
//! Mounts one viewer preset (or a JSON config), waits for the model, then
//! plays a short scripted session at 60 fps and logs what the controller
//! and panel report.
//!
//! Run: `cargo run -p marionette_viewer -- robot ./public`
//!
//! Arguments:
//! - `robot` | `mecha` | `like` | path to a JSON `ViewerConfig` (default `robot`)
//! - asset directory the `/...glb` paths resolve against (default `public`)
//! - `--seconds N`: how long to run (default 6)

use anyhow::{Context, bail};
use marionette::panel::Control;
use marionette::{
    AssetLoader, HeadlessBackend, Viewer, ViewerCommand, ViewerConfig, Viewport,
};

const FRAME_DT: f32 = 1.0 / 60.0;

struct Args {
    config: ViewerConfig,
    asset_dir: String,
    seconds: f32,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut positional = Vec::new();
    let mut seconds = 6.0;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--seconds" {
            let value = args.next().context("--seconds needs a value")?;
            seconds = value.parse().with_context(|| format!("bad --seconds '{value}'"))?;
        } else {
            positional.push(arg);
        }
    }

    let which = positional.first().map_or("robot", String::as_str);
    let config = match ViewerConfig::preset(which) {
        Some(config) => config,
        None if which.ends_with(".json") => ViewerConfig::from_json_file(which)
            .with_context(|| format!("reading config {which}"))?,
        None => bail!("unknown preset '{which}' (expected robot, mecha, like or a .json file)"),
    };

    Ok(Args {
        config,
        asset_dir: positional.get(1).cloned().unwrap_or_else(|| "public".to_string()),
        seconds,
    })
}

/// Commands issued at given times (seconds) for each preset.
fn script(viewer: &Viewer) -> Vec<(f32, ViewerCommand)> {
    let mut steps = Vec::new();

    if viewer.controller().is_some() {
        steps.push((1.0, ViewerCommand::SelectState("Dance".into())));
        steps.push((2.0, ViewerCommand::TriggerEmote("Wave".into())));
        steps.push((2.2, ViewerCommand::SelectState("Running".into())));
        steps.push((4.0, ViewerCommand::TriggerEmote("Jump".into())));
    }

    let Some(panel) = viewer.panel() else {
        return steps;
    };
    let first_slider = panel
        .folders()
        .iter()
        .find_map(|f| {
            f.controls.iter().find_map(|c| match c {
                Control::Slider(s) => Some((f.title.clone(), s.label.clone())),
                _ => None,
            })
        });
    if let Some((folder, label)) = first_slider {
        if let Some(cmd) = panel.drag(&folder, &label, 0.75) {
            steps.push((1.5, cmd));
        }
        if let Some(cmd) = panel.drag(&folder, &label, 0.0) {
            steps.push((3.5, cmd));
        }
    }

    steps.sort_by(|a, b| a.0.total_cmp(&b.0));
    steps
}

fn log_state(viewer: &Viewer, time: f32) {
    let Some(mixer) = viewer.mixer() else {
        log::info!("[{time:5.2}s] no animation");
        return;
    };

    let weights: Vec<String> = mixer
        .contributing_actions()
        .into_iter()
        .filter_map(|key| mixer.action(key))
        .map(|a| format!("{}={:.2}", a.name(), a.effective_weight()))
        .collect();

    let state = viewer
        .controller()
        .map_or("-", |c| c.selected_state());

    log::info!("[{time:5.2}s] state={state} weights=[{}]", weights.join(", "));
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let loader = AssetLoader::from_dir(&args.asset_dir);

    let mut viewer = Viewer::mount(
        args.config,
        &loader,
        Box::new(HeadlessBackend::new()),
        Viewport::new(1280, 720, 1.0),
    )?;

    pollster::block_on(viewer.ready()).context("model did not load")?;

    if let Some(panel) = viewer.panel() {
        for folder in panel.folders() {
            let labels: Vec<&str> = folder.controls.iter().map(Control::label).collect();
            log::info!("Panel folder '{}': {labels:?}", folder.title);
        }
    }

    let mut pending = script(&viewer).into_iter().peekable();
    let frames = (args.seconds / FRAME_DT).round() as u32;
    let mut time = 0.0_f32;

    for frame in 0..frames {
        while let Some((_, command)) = pending.next_if(|(at, _)| *at <= time) {
            log::info!("[{time:5.2}s] {command:?}");
            viewer.dispatch_all([command]);
        }

        viewer.frame(FRAME_DT);
        time += FRAME_DT;

        if frame % 30 == 0 {
            log_state(&viewer, time);
        }
    }

    viewer.resize(1920, 1080, 2.0);
    viewer.frame(FRAME_DT);
    log::info!(
        "Rendered {} frames, camera aspect {:.3}",
        viewer.host().frames_rendered(),
        viewer.host().camera.aspect
    );

    viewer.unmount();
    Ok(())
}
