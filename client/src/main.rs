use clap::{Parser, Subcommand};
use client::{config::DEFAULT_PORT, ClientConfig, RconClient};
use log::info;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use translator::CommandTranslator;

#[derive(Parser, Debug)]
#[command(author, version, about = "Remote console client", long_about = None)]
struct Args {
    /// Console host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Console port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Console password
    #[arg(short = 'P', long, default_value = "")]
    password: String,

    /// Round-trip timeout in milliseconds
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send one command line verbatim and print the reply
    Exec {
        #[arg(required = true, trailing_var_arg = true)]
        words: Vec<String>,
    },
    /// List online players
    Players {
        /// Include player UUIDs
        #[arg(long)]
        uuids: bool,
    },
    /// Print the world seed
    Seed,
    /// Read command lines from stdin until `exit` or end of input
    Shell,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=debug to see every command sent");
    }

    let args = Args::parse();
    let config = ClientConfig::new(format!("{}:{}", args.host, args.port), args.password)
        .with_timeout(Duration::from_millis(args.timeout_ms));
    let console = CommandTranslator::new(RconClient::connect(config).await?);

    match args.command {
        Command::Exec { words } => {
            let reply = console.execute_raw(&words.join(" ")).await?;
            println!("{reply}");
        }
        Command::Players { uuids } => {
            let list = console.list_players(uuids).await?;
            println!("{} of {} players online", list.online, list.max);
            for player in list.players {
                println!("  {player}");
            }
        }
        Command::Seed => println!("{}", console.seed().await?),
        Command::Shell => shell(&console).await?,
    }

    console.transport().close().await;
    Ok(())
}

async fn shell(console: &CommandTranslator<RconClient>) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        match console.execute_raw(line.trim_start_matches('/')).await {
            Ok(reply) => println!("{reply}"),
            Err(e) if e.is_transport() => return Err(e.into()),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    info!("Shell closed");
    Ok(())
}
