use anyhow::{bail, Context, Result};
use renderer::{RenderPolicy, Renderer, RendererConfig};
use scene::{LocalScene, Scene, SceneHandle};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let input = args.scene.as_deref().unwrap_or(scene::DEFAULT_SCENE);
    let handle = SceneHandle::from_input(input);
    tracing::info!(?handle, "loading scene");

    let mut selected = load_scene(&handle)?;
    apply_velocity_override(&mut selected, args.velocity)?;

    let config = renderer_config(&args)?;
    tracing::info!(
        scene = selected.name.as_str(),
        animated = selected.animates(),
        "starting renderer"
    );

    let mut renderer = Renderer::new(selected, config);
    renderer.run()
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_scene(handle: &SceneHandle) -> Result<Scene> {
    match handle {
        SceneHandle::Preset(preset) => Ok(preset.build()),
        SceneHandle::Directory(path) => {
            let local = LocalScene::load(path)
                .with_context(|| format!("failed to load scene from {}", path.display()))?;
            tracing::info!(
                root = %local.root().display(),
                name = %local.scene_name(),
                "loaded scene directory"
            );
            local
                .scene()
                .with_context(|| format!("failed to assemble scene from {}", path.display()))
        }
    }
}

fn apply_velocity_override(scene: &mut Scene, velocity: Option<f64>) -> Result<()> {
    let Some(value) = velocity else {
        return Ok(());
    };
    if !value.is_finite() {
        bail!("--velocity expects a finite number of degrees per second");
    }
    match scene.model.as_mut() {
        Some(model) => {
            // Zero stops the spin entirely so the scheduler can go idle.
            model.velocity = if value == 0.0 { None } else { Some(value) };
        }
        None => tracing::warn!("--velocity has no effect on a scene without geometry"),
    }
    Ok(())
}

fn renderer_config(args: &Args) -> Result<RendererConfig> {
    let defaults = RendererConfig::default();
    let surface_size = match args.size.as_deref() {
        Some(spec) => parse_surface_size(spec)?,
        None => defaults.surface_size,
    };
    Ok(RendererConfig {
        surface_size,
        window_title: args.window_title.clone().unwrap_or(defaults.window_title),
        policy: render_policy(args)?,
    })
}

fn render_policy(args: &Args) -> Result<RenderPolicy> {
    if let Some(time) = args.still {
        if !time.is_finite() || time < 0.0 {
            bail!("--still expects a non-negative time in seconds");
        }
        return Ok(RenderPolicy::Still { time: Some(time) });
    }
    Ok(RenderPolicy::Animate {
        target_fps: match args.fps {
            Some(v) if v > 0.0 => Some(v),
            _ => None,
        },
    })
}

fn parse_surface_size(spec: &str) -> Result<(u32, u32)> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow::anyhow!("expected WxH format, e.g. 800x600"))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid width in size specification"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid height in size specification"))?;

    if width == 0 || height == 0 {
        bail!("window dimensions must be greater than zero");
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::ScenePreset;
    use std::fs;
    use tempfile::tempdir;

    fn args() -> Args {
        Args {
            scene: None,
            still: None,
            fps: None,
            size: None,
            velocity: None,
            window_title: None,
        }
    }

    #[test]
    fn parses_window_sizes() {
        assert_eq!(parse_surface_size("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_surface_size(" 640 X 480 ").unwrap(), (640, 480));
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("0x600").is_err());
    }

    #[test]
    fn still_flag_freezes_the_policy() {
        let mut args = args();
        args.still = Some(2.5);
        assert_eq!(
            render_policy(&args).unwrap(),
            RenderPolicy::Still { time: Some(2.5) }
        );
    }

    #[test]
    fn negative_still_time_is_rejected() {
        let mut args = args();
        args.still = Some(-1.0);
        assert!(render_policy(&args).is_err());
    }

    #[test]
    fn fps_cap_passes_through_only_when_positive() {
        let mut args = args();
        args.fps = Some(60.0);
        assert_eq!(
            render_policy(&args).unwrap(),
            RenderPolicy::Animate {
                target_fps: Some(60.0)
            }
        );
        args.fps = Some(0.0);
        assert_eq!(
            render_policy(&args).unwrap(),
            RenderPolicy::Animate { target_fps: None }
        );
    }

    #[test]
    fn preset_handle_builds_the_logo() {
        let scene = load_scene(&SceneHandle::from_input("rotating-logo")).unwrap();
        assert!(scene.animates());
    }

    #[test]
    fn directory_handle_loads_a_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("logo.vert"), scene::LOGO_VERTEX_GLSL).unwrap();
        fs::write(dir.path().join("white.frag"), scene::WHITE_FRAGMENT_GLSL).unwrap();
        fs::write(
            dir.path().join("scene.toml"),
            r#"
[scene]
velocity = 45.0

[sources]
vertex = "logo.vert"
fragment = "white.frag"

[geometry]
vertices = [0.0, 0.0, 0.0, 0.5, 0.1, 0.0, 0.1, 0.5, 0.0]
"#,
        )
        .unwrap();

        let handle = SceneHandle::Directory(dir.path().to_path_buf());
        let scene = load_scene(&handle).unwrap();
        let model = scene.model.expect("drawable scene");
        assert_eq!(model.velocity, Some(45.0));
        assert_eq!(model.geometry.vertex_count(), 3);
    }

    #[test]
    fn velocity_override_spins_a_static_scene() {
        let mut scene = ScenePreset::StaticTriangle.build();
        apply_velocity_override(&mut scene, Some(30.0)).unwrap();
        assert_eq!(scene.model.as_ref().unwrap().velocity, Some(30.0));
        assert!(scene.animates());
    }

    #[test]
    fn zero_velocity_stops_the_spin() {
        let mut scene = ScenePreset::RotatingLogo.build();
        apply_velocity_override(&mut scene, Some(0.0)).unwrap();
        assert!(!scene.animates());
    }

    #[test]
    fn velocity_override_ignores_clear_scenes() {
        let mut scene = ScenePreset::ClearOnly.build();
        apply_velocity_override(&mut scene, Some(30.0)).unwrap();
        assert!(scene.model.is_none());
    }
}
