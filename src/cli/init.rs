use std::path::PathBuf;

use colored::Colorize;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{load_settings, save_settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
        settings.accounts_dir = PathBuf::from(&settings.data_dir)
            .join("accounts")
            .to_string_lossy()
            .to_string();
    }
    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;
    std::fs::create_dir_all(&settings.accounts_dir)?;

    let conn = get_connection(&resolved.join("tally.db"))?;
    init_db(&conn)?;

    println!("{} {}", "Initialized tally at".green(), resolved.display());
    Ok(())
}

fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    // the data dir usually does not exist yet, so canonicalize fails; a
    // relative path must still be pinned to the current directory or the db
    // path would drift with each invocation's cwd
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| {
            let p = PathBuf::from(path);
            if p.is_absolute() {
                p
            } else {
                std::env::current_dir().map(|cwd| cwd.join(&p)).unwrap_or(p)
            }
        })
        .to_string_lossy()
        .to_string()
}
