use anyhow::Context;
use camscene_capture::{CaptureSource, PendingCapture, TestPattern, Unavailable};
use camscene_render::DebugTextRenderer;
use camscene_scene::SceneObject;
use camscene_session::{FakeClock, SceneSession};
use camscene_tools::{SceneInspector, SliderBinding};
use camscene_variants::VariantKind;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "camscene-cli", about = "Headless runs of the camscene variants")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the available variants
    Info,
    /// Run frames at scripted times and print what was rendered
    Frames {
        /// Scene variant: lights or orbit
        #[arg(long, default_value = "lights")]
        variant: VariantKind,
        /// Comma-separated elapsed times in seconds
        #[arg(long, value_delimiter = ',', default_value = "0,1,2")]
        times: Vec<f32>,
        /// Simulate a capture device that fails to open
        #[arg(long)]
        no_camera: bool,
        /// Print object transforms as JSON instead of text frames
        #[arg(long)]
        json: bool,
    },
    /// List the debug panel sliders of a variant
    Panel {
        /// Scene variant: lights or orbit
        #[arg(long, default_value = "lights")]
        variant: VariantKind,
    },
}

#[derive(Serialize)]
struct FrameDump {
    frame: u64,
    elapsed: f32,
    video_version: Option<u64>,
    objects: Vec<ObjectDump>,
}

#[derive(Serialize)]
struct ObjectDump {
    name: String,
    kind: &'static str,
    position: [f32; 3],
    rotation: [f32; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    intensity: Option<f32>,
}

#[derive(Serialize)]
struct PanelDump<'a> {
    variant: VariantKind,
    sliders: Vec<SliderDump<'a>>,
}

#[derive(Serialize)]
struct SliderDump<'a> {
    #[serde(flatten)]
    binding: &'a SliderBinding,
    value: f32,
}

fn dump_objects(session: &SceneSession) -> Vec<ObjectDump> {
    let mut objects: Vec<ObjectDump> = session
        .scene()
        .nodes()
        .values()
        .map(|node| {
            let (kind, intensity) = match &node.object {
                SceneObject::Light(light) => (light.kind_name(), Some(light.intensity)),
                SceneObject::Mesh(mesh) => (mesh.geometry.name(), None),
            };
            ObjectDump {
                name: node.name.clone(),
                kind,
                position: node.transform.position.to_array(),
                rotation: node.transform.rotation.to_array(),
                intensity,
            }
        })
        .collect();
    objects.sort_by(|a, b| a.name.cmp(&b.name));
    objects
}

fn run_frames(variant: VariantKind, times: &[f32], no_camera: bool, json: bool) -> anyhow::Result<()> {
    let source: Box<dyn CaptureSource> = if no_camera {
        Box::new(Unavailable)
    } else {
        Box::new(TestPattern::new(64, 48))
    };
    let clock = FakeClock::new(times.iter().copied());
    let mut session = SceneSession::new(variant, PendingCapture::spawn(source), Box::new(clock));
    if let Some(Err(e)) = session.wait_capture() {
        tracing::warn!("running without screen: {e}");
    }

    let mut renderer = DebugTextRenderer::new();
    let mut dumps = Vec::new();
    for _ in times {
        let Some(report) = session.tick(&mut renderer) else {
            break;
        };
        if json {
            dumps.push(FrameDump {
                frame: report.frame,
                elapsed: report.elapsed,
                video_version: report.video_version,
                objects: dump_objects(&session),
            });
        } else {
            print!("{}", report.output);
        }
    }
    session.stop();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&dumps).context("serialize frames")?
        );
    } else {
        println!("{}", SceneInspector::summary(session.scene()));
    }
    Ok(())
}

fn show_panel(variant: VariantKind) -> anyhow::Result<()> {
    let session = SceneSession::new(
        variant,
        PendingCapture::resolved("none", Err(camscene_capture::CaptureError::PermissionDenied)),
        Box::new(FakeClock::default()),
    );
    let sliders = session
        .panel()
        .bindings()
        .iter()
        .enumerate()
        .map(|(i, binding)| {
            Ok(SliderDump {
                binding,
                value: session.slider_value(i)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let dump = PanelDump { variant, sliders };
    println!(
        "{}",
        serde_json::to_string_pretty(&dump).context("serialize panel")?
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("camscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", camscene_scene::crate_info());
            println!("capture: {}", camscene_capture::crate_info());
            println!("render: {}", camscene_render::crate_info());
            println!("tools: {}", camscene_tools::crate_info());
            println!("variants: {}", camscene_variants::crate_info());
            println!("session: {}", camscene_session::crate_info());
            for kind in VariantKind::ALL {
                let rig = kind.rig();
                let screen = rig.screen();
                let cam = rig.camera();
                println!(
                    "{kind}: camera=({:.2}, {:.2}, {:.2}) fov={} screen={:.3}{}",
                    cam.position.x,
                    cam.position.y,
                    cam.position.z,
                    cam.fov_degrees,
                    screen.aspect(),
                    if screen.is_mirrored() { " mirrored" } else { "" },
                );
            }
        }
        Commands::Frames {
            variant,
            times,
            no_camera,
            json,
        } => run_frames(variant, &times, no_camera, json)?,
        Commands::Panel { variant } => show_panel(variant)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_args() {
        let cli = Cli::parse_from([
            "camscene-cli",
            "frames",
            "--variant",
            "orbit",
            "--times",
            "0,0.5,1",
            "--json",
        ]);
        match cli.command {
            Commands::Frames {
                variant,
                times,
                json,
                no_camera,
            } => {
                assert_eq!(variant, VariantKind::Orbit);
                assert_eq!(times, [0.0, 0.5, 1.0]);
                assert!(json);
                assert!(!no_camera);
            }
            _ => panic!("expected frames"),
        }
    }

    #[test]
    fn bad_variant_is_rejected() {
        assert!(Cli::try_parse_from(["camscene-cli", "panel", "--variant", "nope"]).is_err());
    }

    #[test]
    fn dump_is_sorted_and_tagged() {
        let session = SceneSession::new(
            VariantKind::Lights,
            PendingCapture::resolved("none", Err(camscene_capture::CaptureError::PermissionDenied)),
            Box::new(FakeClock::default()),
        );
        let objects = dump_objects(&session);
        assert_eq!(objects.len(), 8);
        assert!(objects.windows(2).all(|w| w[0].name <= w[1].name));
        let ambient = objects.iter().find(|o| o.name == "ambient");
        assert_eq!(ambient.and_then(|o| o.intensity), Some(0.5));
        let cube = objects.iter().find(|o| o.name == "cube");
        assert_eq!(cube.map(|o| o.kind), Some("box"));
    }
}
