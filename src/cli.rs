// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "subway-scene")]
#[command(about = "Procedural 3D subway map scene", long_about = None)]
pub struct Cli {
    /// JSON file overriding the default scene configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Background map image, replaces the configured one
    #[arg(long = "map-image")]
    pub map_image: Option<PathBuf>,

    /// Slow the train and damp floating motion
    #[arg(long = "reduced-motion", default_value = "false")]
    pub reduced_motion: bool,

    /// Render without a window
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Frames to render in headless mode
    #[arg(long, default_value_t = 240)]
    pub frames: u32,

    /// Headless output size
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Write the last headless frame to this image file
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Disable the label and FPS overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long = "dump-config", default_value = "false")]
    pub dump_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["subway-scene"]);
        assert!(!cli.headless);
        assert!(!cli.reduced_motion);
        assert_eq!(cli.frames, 240);
        assert!(cli.config.is_none());
    }

    #[test]
    fn headless_flags() {
        let cli = Cli::parse_from([
            "subway-scene",
            "--headless",
            "--frames",
            "12",
            "--snapshot",
            "out.png",
            "--reduced-motion",
        ]);
        assert!(cli.headless);
        assert!(cli.reduced_motion);
        assert_eq!(cli.frames, 12);
        assert_eq!(cli.snapshot, Some(PathBuf::from("out.png")));
    }
}
