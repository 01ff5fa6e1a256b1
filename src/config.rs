//! Command line flags.

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "cosmic-button", about = "A glowing pill button with a live camera mirror")]
pub struct Config {
    /// Camera device index (0 = default webcam)
    #[arg(long, default_value_t = 0)]
    pub camera_index: u32,

    /// Window width in pixels
    #[arg(long, default_value_t = 960, value_parser = clap::value_parser!(u32).range(320..))]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(240..))]
    pub height: u32,

    /// Resolution to ask the camera for (closest match is used)
    #[arg(long, default_value_t = 640)]
    pub capture_width: u32,

    #[arg(long, default_value_t = 480)]
    pub capture_height: u32,

    /// Start with camera mode switched off
    #[arg(long)]
    pub camera_off: bool,

    /// Button label
    #[arg(long, default_value = "Get Started")]
    pub label: String,

    /// Seed for the stars and sparkles (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::try_parse_from(["cosmic-button"]).unwrap();
        assert_eq!(cfg.camera_index, 0);
        assert_eq!((cfg.width, cfg.height), (960, 600));
        assert_eq!((cfg.capture_width, cfg.capture_height), (640, 480));
        assert!(!cfg.camera_off);
        assert_eq!(cfg.label, "Get Started");
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn test_overrides() {
        let cfg = Config::try_parse_from([
            "cosmic-button", "--camera-off", "--seed", "9", "--label", "Launch", "--camera-index", "2",
        ])
        .unwrap();
        assert!(cfg.camera_off);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.label, "Launch");
        assert_eq!(cfg.camera_index, 2);
    }

    #[test]
    fn test_rejects_tiny_window() {
        assert!(Config::try_parse_from(["cosmic-button", "--width", "10"]).is_err());
    }
}
