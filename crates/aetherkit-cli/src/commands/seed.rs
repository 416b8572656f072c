use std::path::Path;

use crate::commands::common::open_database;
use crate::error::CliError;

pub async fn run_seed(db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let seeded = db.ensure_seeded().await?;

    if seeded == 0 {
        println!("Database already has templates; nothing seeded");
    } else {
        println!("Seeded {seeded} starter templates");
    }
    Ok(())
}
