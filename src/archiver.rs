use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::SearchArchive;

pub fn save_to_file(archive: &SearchArchive, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(archive)?;
    let mut file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    tracing::info!(path = %path.display(), "search archived");
    Ok(())
}
