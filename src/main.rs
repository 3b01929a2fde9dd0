use anyhow::{Context, Result};
use driftfield::FieldConfig;

fn main() -> Result<()> {
    let _logger = driftfield::logging::setup().context("unable to start logging")?;

    let config = match std::env::args().nth(1) {
        Some(path) => FieldConfig::from_json_file(&path)
            .with_context(|| format!("unable to load config from {}", path))?,
        None => FieldConfig::default(),
    };

    driftfield::window::run(config).context("window host failed")?;
    Ok(())
}
