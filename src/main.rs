use std::io::BufRead;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use arkacia_lib::events::{InputState, UiAction, UiSignal};
use arkacia_lib::metadata::HttpMetadataSource;
use arkacia_lib::network::{PacketOutbox, UiBridge};
use arkacia_lib::render::SceneGraph;
use arkacia_lib::session::runtime::{self, SessionStatus};
use arkacia_lib::settings::Settings;
use arkacia_lib::world::{Identity, Ports, SpawnPoint, TransitionTarget, WorldClient};
use clap::Parser;
use game_types::TilePos;

#[derive(Parser)]
#[command(name = "arkacia")]
#[command(about = "Headless Arkacia world client")]
struct Cli {
    /// Character to play
    #[arg(long)]
    character_id: u32,
    #[arg(long, default_value = "")]
    name: String,
    /// Map to enter on startup
    #[arg(long, default_value = "worldmap")]
    map: String,
    /// Start tile; defaults to the map's start position
    #[arg(long, requires = "y")]
    x: Option<i32>,
    #[arg(long, requires = "x")]
    y: Option<i32>,
    /// World socket address, overrides settings
    #[arg(long)]
    server: Option<String>,
    /// Metadata API base URL, overrides settings
    #[arg(long)]
    api: Option<String>,
}

/// Lines typed on stdin.
enum Command {
    Ui(UiAction),
    Input(InputState),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let mut words = line.split_whitespace();
    match words.next()? {
        "/bgm" => Some(Command::Ui(UiAction::ToggleBgm)),
        "/close" => Some(Command::Ui(UiAction::NpcDialogClosed)),
        "/quit" => Some(Command::Quit),
        "/stop" => Some(Command::Input(InputState::default())),
        "/move" => {
            let dirs = words.next().unwrap_or_default();
            Some(Command::Input(InputState {
                up: dirs.contains('u'),
                down: dirs.contains('d'),
                left: dirs.contains('l'),
                right: dirs.contains('r'),
            }))
        }
        _ => Some(Command::Ui(UiAction::SendChat(line.to_string()))),
    }
}

fn log_signal(signal: &UiSignal) {
    match signal {
        UiSignal::Coords { x, y } => tracing::trace!(x, y, "coords"),
        UiSignal::MapKey(name) => tracing::info!(map = %name, "Entered map"),
        UiSignal::OpenNpcDialog(npc) => {
            tracing::info!(npc = %npc.name, dialog = %npc.dialog, "NPC dialog (type /close)")
        }
        UiSignal::ChatMessage(msg) => tracing::info!(sender = %msg.sender, "{}", msg.text),
        UiSignal::TransitionFailed { map_key, reason } => {
            tracing::error!(map_key = %map_key, %reason, "Could not enter map")
        }
        other => tracing::debug!(?other, "ui"),
    }
}

fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load();
    if let Some(server) = cli.server {
        settings.server.address = server;
    }
    if let Some(api) = cli.api {
        settings.server.api_base_url = api;
    }

    let (receiver, sender) = async_std::task::block_on(network::connect(&settings.server.address))
        .with_context(|| format!("connecting to {}", settings.server.address))?;
    tracing::info!(address = %settings.server.address, "Connected");

    let (net_tx, net_rx) = crossbeam_channel::unbounded();
    let (outbox, outbox_rx) = PacketOutbox::channel();
    let _tasks = runtime::spawn_io(receiver, sender, net_tx.clone(), outbox_rx);
    let _ = net_tx.send(arkacia_lib::events::NetworkEvent::Connected);

    let (ui, ui_rx) = UiBridge::channel();
    let identity = Identity {
        character_id: cli.character_id,
        name: cli.name,
    };
    let ports = Ports {
        outbox,
        render: Box::new(SceneGraph::new()),
        ui,
        metadata: Arc::new(HttpMetadataSource::new(settings.server.api_base_url.clone())),
    };
    let mut world = WorldClient::new(identity, ports, &settings);

    let spawn = match (cli.x, cli.y) {
        (Some(x), Some(y)) => SpawnPoint::Tile(TilePos::new(x, y)),
        _ => SpawnPoint::MapStart,
    };
    world.initialize(TransitionTarget {
        map_key: cli.map,
        spawn,
    });

    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if let Some(command) = parse_command(&line) {
                if cmd_tx.send(command).is_err() {
                    break;
                }
            }
        }
    });

    let tick = Duration::from_secs_f64(1.0 / settings.tick_rate_hz.max(1) as f64);
    let mut input = InputState::default();
    let mut last = Instant::now();

    loop {
        let started = Instant::now();

        if runtime::drain_net_events(&net_rx, &mut world) == SessionStatus::Closed {
            break;
        }
        let mut quit = false;
        while let Ok(command) = cmd_rx.try_recv() {
            match command {
                Command::Ui(action) => world.handle_ui(action),
                Command::Input(state) => input = state,
                Command::Quit => quit = true,
            }
        }
        if quit {
            break;
        }

        let dt = last.elapsed().as_secs_f32();
        last = Instant::now();
        world.tick(dt, input);

        for signal in ui_rx.try_iter() {
            if let UiSignal::BgmState(enabled) = signal {
                settings.audio.bgm_enabled = enabled;
                settings.save();
            }
            log_signal(&signal);
        }

        if let Some(rest) = tick.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    world.teardown();
    Ok(())
}
