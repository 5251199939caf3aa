use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use meshcall_client::{ChannelConfig, ChannelEvent, RelayClient, SignalSink};
use meshcall_core::{ClientMessage, RoomId, ServerMessage};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const DEFAULT_RELAY_URL: &str = "ws://localhost:3000/ws";

#[derive(Parser)]
#[command(name = "meshcall", version, about = "Inspect a meshcall relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the discoverable rooms and exit.
    Rooms {
        #[arg(long, env = "MESHCALL_RELAY_URL", default_value = DEFAULT_RELAY_URL)]
        url: String,

        /// Seconds to wait for the relay to answer.
        #[arg(long, default_value_t = 5)]
        timeout: u64,
    },
    /// Print every room list update until interrupted.
    Watch {
        #[arg(long, env = "MESHCALL_RELAY_URL", default_value = DEFAULT_RELAY_URL)]
        url: String,
    },
    /// Generate a fresh room id and its link.
    Create {
        #[arg(long, default_value = "http://localhost:5173")]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match Cli::parse().command {
        Commands::Rooms { url, timeout } => {
            let rooms = tokio::time::timeout(Duration::from_secs(timeout), fetch_rooms(&url))
                .await
                .context("Relay did not answer in time")??;
            print_rooms(&rooms);
        }
        Commands::Watch { url } => watch_rooms(&url).await?,
        Commands::Create { base_url } => {
            let room = RoomId::new();
            println!("{}", room.to_string().green().bold());
            println!("   🔗 {}", room_link(&base_url, &room));
        }
    }

    Ok(())
}

async fn fetch_rooms(url: &str) -> Result<Vec<RoomId>> {
    let config = ChannelConfig {
        reconnect_attempts: 0,
        ..ChannelConfig::new(url)
    };
    let (client, mut events) = RelayClient::spawn(config);

    let rooms = loop {
        match next_event(&mut events).await? {
            ChannelEvent::Connected => client
                .send(ClientMessage::GetRooms)
                .context("Failed to request rooms")?,
            ChannelEvent::Message(ServerMessage::ShareRooms { rooms }) => break rooms,
            ChannelEvent::Message(_) => {}
            ChannelEvent::Disconnected | ChannelEvent::GaveUp => {
                bail!("Could not reach relay at {}", url)
            }
        }
    };

    client.close();
    Ok(rooms)
}

async fn watch_rooms(url: &str) -> Result<()> {
    let (_client, mut events) = RelayClient::spawn(ChannelConfig::new(url));
    println!("{} {}", "👀 Watching".cyan(), url);

    loop {
        match next_event(&mut events).await? {
            ChannelEvent::Connected => println!("{}", "Connected".green()),
            ChannelEvent::Message(ServerMessage::ShareRooms { rooms }) => print_rooms(&rooms),
            ChannelEvent::Message(_) => {}
            ChannelEvent::Disconnected => println!("{}", "Connection lost, retrying...".yellow()),
            ChannelEvent::GaveUp => bail!("Gave up reconnecting to {}", url),
        }
    }
}

async fn next_event(events: &mut mpsc::UnboundedReceiver<ChannelEvent>) -> Result<ChannelEvent> {
    events.recv().await.context("Relay connection task stopped")
}

fn print_rooms(rooms: &[RoomId]) {
    if rooms.is_empty() {
        println!("{}", "No open rooms".dimmed());
        return;
    }

    println!("{} {}", "📂 Rooms:".cyan().bold(), rooms.len());
    for room in rooms {
        println!("   {}", room);
    }
}

fn room_link(base_url: &str, room: &RoomId) -> String {
    format!("{}/room/{}", base_url.trim_end_matches('/'), room)
}
