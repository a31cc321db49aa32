use std::{error::Error, io, path::PathBuf};

use clap::Parser;
use log::info;
use minirdb::{Config, Database, shell};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the database directory
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,
    /// Database name; files live under <data_dir>/db_<name>
    #[arg(short, long, default_value = "mydb")]
    name: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::new(cli.data_dir, cli.name);
    let mut db = Database::open_config(&config)?;
    info!("database directory {:?}", config.database_dir());

    println!("Simple RDBMS - Type 'help' for commands");
    println!("========================================");

    shell::run(&mut db, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
