use clap::Parser;
use log::info;
use server::{ReplyScript, StubServer};

/// Runs a scripted stand-in console.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Port to listen on
    #[clap(short, long, default_value = "25575")]
    port: u16,
    /// Password clients must authenticate with
    #[clap(short = 'P', long, default_value = "")]
    password: String,
    /// Scripted reply as `command=>reply`; repeatable
    #[clap(short, long = "reply")]
    replies: Vec<String>,
    /// Reply to commands without a script entry
    #[clap(long)]
    fallback: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let mut script = ReplyScript::new();
    for pair in &args.replies {
        script.add_pair(pair)?;
    }
    if let Some(fallback) = args.fallback {
        script = script.with_fallback(fallback);
    }
    info!("Loaded {} scripted replies", script.len());

    let address = format!("{}:{}", args.host, args.port);
    let server = StubServer::bind(&address, &args.password, script).await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
