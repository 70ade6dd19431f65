// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use crate::download::DEFAULT_MODEL;
use clap::{Args, Parser, Subcommand};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Run Options:
    --model, -m <MODEL>    Path to ONNX pose model [default: human-pose-estimation.onnx]
    --source, -s <SOURCE>  Webcam index or video file [default: 0]
    --conf <CONF>          Heatmap confidence threshold [default: 0.1]
    --assets <DIR>         Mascot sprite directory [default: assets/mascot]
    --no-mascot            Disable the mascot window
    --device <DEVICE>      Device (cpu, cuda:0, coreml, openvino, tensorrt:0)
    --verbose              Show verbose output

Examples:
    pose-mirror run
    pose-mirror run --source 1 --conf 0.2
    pose-mirror run --model human-pose-estimation.onnx --source clip.mp4
    pose-mirror run --device cuda:0 --no-mascot"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run pose detection on a webcam or video and animate the mascot
    Run(RunArgs),
}

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to ONNX pose model file
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Input source (webcam index or video file)
    #[arg(short, long, default_value = "0")]
    pub source: String,

    /// Heatmap confidence threshold
    #[arg(long, default_value_t = 0.1)]
    pub conf: f32,

    /// Mascot sprite directory
    #[arg(long, default_value = "assets/mascot")]
    pub assets: String,

    /// Disable the mascot window
    #[arg(long, default_value_t = false)]
    pub no_mascot: bool,

    /// Device to use (cpu, cuda:0, coreml, openvino, tensorrt:0)
    #[arg(long)]
    pub device: Option<String>,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args_defaults() {
        let args = Cli::parse_from(["app", "run"]);
        match args.command {
            Commands::Run(run_args) => {
                assert_eq!(run_args.model, DEFAULT_MODEL);
                assert_eq!(run_args.source, "0");
                assert!((run_args.conf - 0.1).abs() < f32::EPSILON);
                assert!(!run_args.no_mascot);
                assert!(run_args.verbose);
                assert!(run_args.device.is_none());
            }
        }
    }

    #[test]
    fn test_run_args_custom() {
        let args = Cli::parse_from([
            "app",
            "run",
            "--model",
            "custom.onnx",
            "--source",
            "clip.mp4",
            "--conf",
            "0.3",
            "--no-mascot",
            "--verbose",
            "false",
        ]);
        match args.command {
            Commands::Run(run_args) => {
                assert_eq!(run_args.model, "custom.onnx");
                assert_eq!(run_args.source, "clip.mp4");
                assert!((run_args.conf - 0.3).abs() < f32::EPSILON);
                assert!(run_args.no_mascot);
                assert!(!run_args.verbose);
            }
        }
    }
}
