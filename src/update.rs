//! Self-update against the published release manifest.

use crate::error::Error;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::{env, fs};

const RELEASES_URL: &str =
    "https://raw.githubusercontent.com/Oh-Hell-Naw/UniConvert/main/releases.json";

#[derive(Deserialize)]
struct Release {
    url: String,
    version: String,
}

pub enum UpdateStatus {
    UpToDate,
    Updated { from: String, to: String },
}

/// Compares the newest published release against this build and, when it is
/// newer, downloads it next to the current executable and renames it over.
pub fn check_and_update() -> Result<UpdateStatus, Error> {
    let client = Client::new();

    let manifest = client
        .get(RELEASES_URL)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|e| Error::Update(format!("could not fetch release manifest ({e}).")))?;

    let releases: Vec<Release> = serde_json::from_str(&manifest)
        .map_err(|e| Error::Update(format!("could not parse release manifest ({e}).")))?;

    let Some(latest) = releases.first() else {
        return Err(Error::Update("release manifest is empty.".to_owned()));
    };

    let current = env!("CARGO_PKG_VERSION");
    if latest.version == current {
        return Ok(UpdateStatus::UpToDate);
    }

    let binary = client
        .get(&latest.url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .map_err(|e| Error::Update(format!("could not download release ({e}).")))?;

    let exe = env::current_exe()?;
    let staged = exe.with_extension("new");
    fs::write(&staged, &binary)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&staged, fs::Permissions::from_mode(0o755))?;
    }

    // Windows refuses to rename over a running binary; park the old one.
    #[cfg(windows)]
    {
        let parked = exe.with_extension("old");
        let _ = fs::remove_file(&parked);
        fs::rename(&exe, &parked)?;
    }

    fs::rename(&staged, &exe)?;

    Ok(UpdateStatus::Updated {
        from: current.to_owned(),
        to: latest.version.clone(),
    })
}
