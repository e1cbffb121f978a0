use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use dialtone::prelude::*;
use std::net::IpAddr;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dialtone")]
#[command(about = "Peer-to-peer calls over a websocket signaling server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling server.
    Serve {
        /// Overrides HOST.
        #[arg(long)]
        host: Option<IpAddr>,

        /// Overrides PORT.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Connect to a signaling server and place or take calls.
    Dial {
        /// Overrides SIGNALING_URL.
        #[arg(long)]
        url: Option<String>,

        /// Overrides STUN_URL.
        #[arg(long)]
        stun: Option<String>,

        #[arg(long)]
        no_video: bool,

        #[arg(long)]
        no_audio: bool,

        /// Call this peer right away.
        #[arg(long)]
        to: Option<PeerId>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve { host, port } => {
            let mut config = ServerConfig::from_env()?;
            if let Some(host) = host {
                config.listen_addr.set_ip(host);
            }
            if let Some(port) = port {
                config.listen_addr.set_port(port);
            }

            println!(
                "{} {}",
                "📡 Signaling server on".green().bold(),
                config.listen_addr
            );
            serve(config).await?;
        }

        Commands::Dial {
            url,
            stun,
            no_video,
            no_audio,
            to,
        } => {
            let mut config = ClientConfig::from_env();
            if let Some(url) = url {
                config.signaling_url = url;
            }
            if let Some(stun) = stun {
                config.transport.ice_servers = vec![stun];
            }
            config.transport.media = MediaConstraints {
                audio: !no_audio,
                video: !no_video,
            };

            dial(config, to).await?;
        }
    }

    Ok(())
}

/// How one signaling session came to an end.
enum Ended {
    HungUp,
    Disconnected,
}

async fn dial(config: ClientConfig, mut to: Option<PeerId>) -> Result<()> {
    loop {
        println!("{} {}", "⏳ Connecting to".dimmed(), config.signaling_url);
        let call = dialtone::connect(&config)
            .await
            .with_context(|| format!("Failed to connect to {}", config.signaling_url))?;

        println!(
            "{} {}",
            "🟢 Connected. Your id:".green(),
            call.peer_id.to_string().bold()
        );

        match run_session(call, to.take()).await? {
            Ended::HungUp => return Ok(()),
            Ended::Disconnected => {
                println!("{}", "🔴 Disconnected from signaling server".red());
            }
        }
    }
}

async fn run_session(call: Call, to: Option<PeerId>) -> Result<Ended> {
    let Call {
        handle,
        mut events,
        task,
        ..
    } = call;

    if let Some(to) = to {
        handle
            .start_call(to)
            .await
            .context("Call machine stopped")?;
    }

    let mut ringing = Ringing::default();
    let mut prompt: Option<Prompt> = None;

    let ended = loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    break Ended::Disconnected;
                };
                ringing.observe(&event);
                if let (CallEvent::IncomingCall { from }, None) = (&event, &prompt) {
                    prompt = Some(Prompt::ask(*from));
                }
                show(event);
            }

            (from, answer) = answered(&mut prompt) => {
                prompt = None;
                // Ctrl-C while the prompt owns the terminal lands here.
                let Ok(accept) = answer else {
                    let _ = handle.hangup().await;
                    println!("{}", "👋 Hung up".yellow());
                    break Ended::HungUp;
                };

                if !ringing.is_waiting(from) {
                    println!("{}", format!("   Call from {from} is no longer waiting").dimmed());
                } else if accept {
                    handle.accept().await.context("Call machine stopped")?;
                } else {
                    handle.reject().await.context("Call machine stopped")?;
                }

                if let Some(next) = ringing.caller().filter(|peer| *peer != from) {
                    prompt = Some(Prompt::ask(next));
                }
            }

            _ = tokio::signal::ctrl_c() => {
                let _ = handle.hangup().await;
                println!("{}", "👋 Hung up".yellow());
                break Ended::HungUp;
            }
        }
    };

    drop(handle);
    task.await.context("Call machine panicked")?;
    Ok(ended)
}

/// Who is ringing us right now, as far as the machine's events tell.
#[derive(Debug, Default)]
struct Ringing(Option<PeerId>);

impl Ringing {
    fn observe(&mut self, event: &CallEvent) {
        match event {
            CallEvent::IncomingCall { from } => self.0 = Some(*from),
            CallEvent::StateChanged { to, .. } if *to != CallState::Ringing => self.0 = None,
            _ => {}
        }
    }

    fn caller(&self) -> Option<PeerId> {
        self.0
    }

    /// An answer to `from` still means something.
    fn is_waiting(&self, from: PeerId) -> bool {
        self.0 == Some(from)
    }
}

/// An accept/reject question waiting on the terminal.
struct Prompt {
    from: PeerId,
    answer: JoinHandle<Result<bool, dialoguer::Error>>,
}

impl Prompt {
    fn ask(from: PeerId) -> Self {
        let text = format!("Incoming call from {from}. Accept?");
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new().with_prompt(text).default(true).interact()
        });
        Self { from, answer }
    }
}

/// Resolves once the pending prompt is answered; never resolves without one.
async fn answered(prompt: &mut Option<Prompt>) -> (PeerId, Result<bool>) {
    let Some(prompt) = prompt else {
        return std::future::pending().await;
    };
    let answer = match (&mut prompt.answer).await {
        Ok(Ok(accept)) => Ok(accept),
        Ok(Err(e)) => Err(e.into()),
        Err(e) => Err(e.into()),
    };
    (prompt.from, answer)
}

fn show(event: CallEvent) {
    match event {
        CallEvent::StateChanged { from, to } => {
            println!("{}", format!("   {from} → {to}").dimmed());
        }

        CallEvent::IncomingCall { from } => {
            println!("{} {}", "📞 Incoming call from".cyan().bold(), from);
        }

        CallEvent::Rejected { by } => {
            println!("{} {}", "❌ Rejected by".red(), by);
        }

        CallEvent::RemoteTrack { from, stream } => {
            for track in &stream.tracks {
                println!(
                    "{}",
                    format!("🎧 Receiving {:?} track '{}' from {}", track.kind, track.id, from)
                        .cyan()
                );
            }
        }

        CallEvent::Notice(text) => println!("{}", text.green().bold()),

        CallEvent::Error(e) => println!("{} {}", "⚠️ ".yellow(), e.to_string().red()),
    }
}
