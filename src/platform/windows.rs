// PageTrim platform paths for Windows
// Data: %APPDATA%/PageTrim

use std::env;
use std::path::PathBuf;

/// Returns the data directory for PageTrim on Windows.
pub fn get_data_dir() -> PathBuf {
    let appdata = env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Temp"));
    PathBuf::from(appdata).join("PageTrim")
}
