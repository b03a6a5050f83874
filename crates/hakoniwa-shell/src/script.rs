//! Startup scripts: one command per line, `#` starts a comment line.

use std::path::Path;

/// Commands in a script, skipping blank and comment lines.
pub fn parse_script(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> std::io::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    let lines = parse_script(&text);
    tracing::info!(path = %path.display(), commands = lines.len(), "Loaded startup script");
    Ok(lines)
}
