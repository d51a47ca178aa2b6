use async_channel::Receiver;
use clap::{Parser, Subcommand};
use radial::config;
use radial::editor::{Editor, EditorMsg, EditorUpdate};
use radial::events::AppEvent;
use radial::script::{ScriptStep, parse_script};
use radial::sys::runtime;
use radial::sys::server::DEFAULT_SOCKET_PATH;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Virtual time that passes between two replayed events.
const REPLAY_FRAME: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "radial", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the per-user one
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the scene of the active menu as JSON
    Layout,
    /// Apply a drag event script (a file, or stdin) and report each step
    Replay {
        script: Option<PathBuf>,
        /// Print the final scene instead of the per-step ring
        #[arg(long)]
        scene: bool,
    },
    /// Write the default config file if it does not exist yet
    InitConfig,
    /// Watch the config file and report every reload
    Watch,
    /// Run the editor, reading drag events from a unix socket
    Serve {
        #[arg(short, long, default_value = DEFAULT_SOCKET_PATH)]
        socket: PathBuf,
    },
    /// Send event lines to a running `radial serve`
    Send {
        #[arg(short, long, default_value = DEFAULT_SOCKET_PATH)]
        socket: PathBuf,
        #[arg(required = true)]
        lines: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    match cli.command {
        Commands::Layout => {
            let editor = open_editor(&config_path);
            println!("{}", serde_json::to_string_pretty(&editor.scene())?);
            Ok(())
        }
        Commands::Replay { script, scene } => replay(&config_path, script.as_deref(), scene),
        Commands::InitConfig => {
            let path = config::write_default_config(&config_path)?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Watch => {
            let (tx, rx) = async_channel::bounded(32);
            runtime::start_background_services(config_path.clone(), None, tx);
            run_loop(open_editor(&config_path), rx)
        }
        Commands::Serve { socket } => {
            let (tx, rx) = async_channel::bounded(32);
            runtime::start_background_services(config_path.clone(), Some(socket), tx);
            run_loop(open_editor(&config_path), rx)
        }
        Commands::Send { socket, lines } => send_lines(&socket, &lines),
    }
}

fn open_editor(config_path: &Path) -> Editor {
    let config = config::load_or_default(config_path);
    Editor::new(config, Some(config_path.to_path_buf()))
}

fn replay(config_path: &Path, script: Option<&Path>, print_scene: bool) -> anyhow::Result<()> {
    let source = match script {
        Some(path) => fs_err::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    let steps = parse_script(&source)?;

    let mut editor = open_editor(config_path);
    let mut now = Instant::now();

    for step in steps {
        let msg = match step.step {
            ScriptStep::Wait(duration) => {
                now += duration;
                EditorMsg::Tick
            }
            ScriptStep::Event(event) => {
                now += REPLAY_FRAME;
                report(step.line, &editor.update(EditorMsg::Tick, now), &editor, print_scene);
                EditorMsg::from(event)
            }
        };
        let update = editor.update(msg, now);
        report(step.line, &update, &editor, print_scene);
    }

    if print_scene {
        println!("{}", serde_json::to_string_pretty(&editor.scene())?);
    }
    Ok(())
}

fn report(line: usize, update: &EditorUpdate, editor: &Editor, quiet: bool) {
    if quiet || *update == EditorUpdate::Idle {
        return;
    }
    println!(
        "{:>4}  {:<40} [{}]",
        line,
        update.to_string(),
        editor.ring_ids().join(", ")
    );
}

fn run_loop(mut editor: Editor, rx: Receiver<AppEvent>) -> anyhow::Result<()> {
    while let Ok(event) = rx.recv_blocking() {
        let update = editor.update(EditorMsg::from(event), Instant::now());
        match update {
            EditorUpdate::Idle => {}
            EditorUpdate::Reloaded => println!(
                "reloaded: {} menu(s), ring radius {}, {} palette group(s)",
                editor.store.configurations().len(),
                editor.config.ring.radius,
                editor.store.palette().len()
            ),
            update => println!("{}  [{}]", update, editor.ring_ids().join(", ")),
        }
    }
    Ok(())
}

fn send_lines(socket: &Path, lines: &[String]) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to radial at {}: {}. Is `radial serve` running?",
            socket.display(),
            e
        )
    })?;

    for line in lines {
        writeln!(stream, "{}", line)?;
    }
    Ok(())
}
