use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use roamfield_input::{KeyDispatcher, KeyEvent};
use roamfield_kernel::SimConfig;
use roamfield_render::DebugTextRenderer;
use roamfield_session::{Frame, Session};
use roamfield_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roamfield-cli", about = "Headless runner for the roamfield scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML scene config; defaults are used for anything it leaves out
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info and the default config
    Info,
    /// Run a scripted session with keys held from the first frame
    Run {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        ticks: u64,
        /// Keys held down from the start, comma separated
        #[arg(long, value_delimiter = ',', default_value = "w")]
        hold: Vec<String>,
        /// Release the held keys before this frame
        #[arg(long)]
        release_at: Option<u64>,
        /// Print the text frame every K frames (0 prints only the last)
        #[arg(long, default_value = "0")]
        render_every: u64,
        /// Print the event log as JSON instead of text frames
        #[arg(long)]
        json: bool,
        /// Override the config seed
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Run the same script twice and compare state hashes
    Replay {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// RNG seed for deterministic replay
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Keys held down from the start, comma separated
        #[arg(long, value_delimiter = ',', default_value = "a,w")]
        hold: Vec<String>,
    },
}

/// Held keys and when to let go of them.
struct Script {
    ticks: u64,
    hold: Vec<String>,
    release_at: Option<u64>,
}

impl Script {
    /// Mount a session and drive it frame by frame. `on_frame` sees every
    /// drawn frame's text.
    fn run(
        &self,
        config: SimConfig,
        mut on_frame: impl FnMut(u64, &str),
    ) -> anyhow::Result<Session> {
        let dispatcher = KeyDispatcher::new();
        let mut session = Session::mount(config, &dispatcher)?;
        let mut renderer = DebugTextRenderer::new();

        for key in &self.hold {
            dispatcher.dispatch(&KeyEvent::down(key.as_str()));
        }
        for frame in 1..=self.ticks {
            if self.release_at == Some(frame) {
                for key in &self.hold {
                    dispatcher.dispatch(&KeyEvent::up(key.as_str()));
                }
                tracing::debug!(frame, "released held keys");
            }
            match session.frame(&mut renderer) {
                Frame::Drawn { output, .. } => on_frame(frame, &output),
                Frame::Halted => break,
            }
        }
        Ok(session)
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SimConfig> {
    match path {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SimConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("roamfield-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", roamfield_render::crate_info());
            println!("tools: {}", roamfield_tools::crate_info());
            println!("--- config ---");
            print!("{}", config.to_yaml()?);
        }
        Commands::Run {
            ticks,
            hold,
            release_at,
            render_every,
            json,
            seed,
        } => {
            if let Some(seed) = seed {
                config.seed = seed;
            }
            let script = Script {
                ticks,
                hold,
                release_at,
            };
            let mut session = script.run(config, |frame, text| {
                let due = render_every > 0 && frame % render_every == 0;
                if !json && (due || frame == ticks) {
                    print!("{text}");
                }
            })?;

            if json {
                let events = serde_json::to_string_pretty(session.world().events())?;
                println!("{events}");
            } else {
                println!("{}", SceneInspector::summary(session.world()));
            }
            session.unmount();
        }
        Commands::Replay { ticks, seed, hold } => {
            config.seed = seed;
            println!("Deterministic replay: seed={seed}, ticks={ticks}, hold={hold:?}");
            let script = Script {
                ticks,
                hold,
                release_at: None,
            };

            let first = script.run(config.clone(), |_, _| {})?;
            let second = script.run(config, |_, _| {})?;
            let a = SceneInspector::summary(first.world());
            let b = SceneInspector::summary(second.world());

            println!("Run 1: {a} hash={:#018x}", a.state_hash);
            println!("Run 2: {b} hash={:#018x}", b.state_hash);
            if a.state_hash == b.state_hash {
                println!("Match: OK");
            } else {
                anyhow::bail!("replay diverged: {:#x} != {:#x}", a.state_hash, b.state_hash);
            }
        }
    }

    Ok(())
}
