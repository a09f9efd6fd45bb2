use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "spinlogo",
    author,
    version,
    about = "Windowed wgpu demo that spins a GLSL logo",
    arg_required_else_help = false
)]
pub struct Args {
    /// Scene to render: a preset name (`rotating-logo`, `static-triangle`,
    /// `clear-only`) or a path to a scene directory.
    #[arg(value_name = "SCENE")]
    pub scene: Option<String>,

    /// Render one frame frozen at the given time instead of animating.
    #[arg(long, value_name = "SECONDS")]
    pub still: Option<f64>,

    /// Optional FPS cap for animated scenes (0=uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Override the window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Override the rotation velocity in degrees per second.
    #[arg(long, value_name = "DEG_PER_SEC")]
    pub velocity: Option<f64>,

    /// Title for the scene window.
    #[arg(long, value_name = "TITLE")]
    pub window_title: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
