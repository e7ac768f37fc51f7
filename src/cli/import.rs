use colored::Colorize;

use crate::db::get_connection;
use crate::error::{Result, TallyError};
use crate::importer::{import_account, SyncRegistry};
use crate::settings::db_path;

pub fn run(account: &str) -> Result<()> {
    let mut conn = get_connection(&db_path())?;

    // No sync collaborators ship with the CLI; api-sourced accounts need
    // their institution's service registered by the embedding caller.
    let registry = SyncRegistry::new();

    match import_account(&mut conn, account, &registry) {
        Ok(outcome) if outcome.synced => {
            println!("Synced account {account} via its institution collaborator.");
            Ok(())
        }
        Ok(outcome) => {
            println!(
                "{} rows imported, {} duplicates removed, {} already archived as splits",
                outcome.imported, outcome.deduped, outcome.archived
            );
            Ok(())
        }
        Err(TallyError::NotFound(what)) => {
            println!("{}", format!("Could not find {what}; nothing imported.").yellow());
            Ok(())
        }
        Err(e) => Err(e),
    }
}
