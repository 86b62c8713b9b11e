use clap::Parser;
use runkang_admin::mock;
use runkang_admin::utils::logger;
use std::net::SocketAddr;

#[derive(Parser)]
#[command(name = "mock-backend")]
#[command(about = "Serve sample customer data for local development")]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:5320")]
    listen: SocketAddr,

    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON logs
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if args.json {
        logger::init_json_logger(None);
    } else {
        logger::init_cli_logger(args.verbose, None);
    }

    if let Err(e) = mock::serve(args.listen).await {
        tracing::error!("❌ Mock backend stopped: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    Ok(())
}
