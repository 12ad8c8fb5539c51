// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

use crate::types::ModelKind;

#[derive(Parser, Debug, Clone)]
#[command(name = "bike-viewer")]
#[command(about = "Headless host for the interactive bike viewer", long_about = None)]
pub struct Cli {
    /// Viewer configuration as JSON
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Bike kind: road, mountain, electric or racing
    #[arg(long)]
    pub kind: Option<ModelKind>,

    /// Model file to load instead of the procedural bike
    #[arg(long = "asset-url")]
    pub asset_url: Option<String>,

    /// Number of frames to drive
    #[arg(long, default_value = "300")]
    pub frames: u64,

    #[arg(long, default_value = "60")]
    pub fps: f32,

    /// Frame at which the pointer enters the model
    #[arg(long = "hover-at")]
    pub hover_at: Option<u64>,

    /// Frame at which the model is clicked
    #[arg(long = "click-at")]
    pub click_at: Option<u64>,

    /// Frame at which the pointer leaves the model
    #[arg(long = "leave-at")]
    pub leave_at: Option<u64>,

    /// Seed for the hover particles
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the last frame's shape instances as JSON
    #[arg(long)]
    pub dump: Option<PathBuf>,
}

impl Cli {
    /// Pointer events scheduled for `frame`, in enter, click, leave order
    pub fn events_at(&self, frame: u64) -> Vec<crate::core::PointerEvent> {
        use crate::core::PointerEvent;

        [
            (self.hover_at, PointerEvent::Enter),
            (self.click_at, PointerEvent::Click),
            (self.leave_at, PointerEvent::Leave),
        ]
        .into_iter()
        .filter(|(at, _)| *at == Some(frame))
        .map(|(_, event)| event)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PointerEvent;

    #[test]
    fn test_parses_script() {
        let cli = Cli::try_parse_from([
            "bike-viewer",
            "--kind",
            "Mountain",
            "--hover-at",
            "10",
            "--click-at",
            "10",
            "--leave-at",
            "40",
        ])
        .unwrap();

        assert_eq!(cli.kind, Some(ModelKind::Mountain));
        assert_eq!(cli.frames, 300);
        assert_eq!(cli.events_at(10), vec![PointerEvent::Enter, PointerEvent::Click]);
        assert_eq!(cli.events_at(40), vec![PointerEvent::Leave]);
        assert!(cli.events_at(11).is_empty());
    }

    #[test]
    fn test_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["bike-viewer", "--kind", "unicycle"]).is_err());
    }
}
