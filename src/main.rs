use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mysql_wrapper::cli::Args;
use mysql_wrapper::db::{Database, MysqlDatabase};

fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| eprintln!("Error initializing the global logger: {err}"))
        .ok();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let args = Args::parse();
    let config = args.connection.resolve()?;
    let mut db = MysqlDatabase::connect(&config)?;
    let output = args.command.run(&mut db, args.format);
    db.close_connection();
    println!("{}", output?);
    Ok(())
}
