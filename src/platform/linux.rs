// PageTrim platform paths for Linux
// Data: ~/.local/share/pagetrim

use std::env;
use std::path::PathBuf;

/// Returns the data directory for PageTrim on Linux.
/// Uses `$XDG_DATA_HOME/pagetrim` if set, otherwise `~/.local/share/pagetrim`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("pagetrim")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("pagetrim")
    }
}
