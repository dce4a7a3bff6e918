mod cli;

use anyhow::Result;
use finarc::{config::Config, db::Database, logging};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut stdout = std::io::stdout().lock();
    if cli::as_info(&args, &mut stdout)? {
        return Ok(());
    }

    let config = Config::from_env()?;
    logging::init(&config.log_filter)?;

    let mut db = Database::open(&config.db_path)?;
    db.seed_default_categories(config.user_id)?;
    cli::as_cli(&args, &db, config.user_id, &mut stdout)
}
