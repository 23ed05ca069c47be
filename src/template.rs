use std::path::PathBuf;

use anyhow::{Context, Result};
use question_uploader::template::write_template;

pub fn template(output: PathBuf) -> Result<()> {
    write_template(&output).with_context(|| format!("writing {}", output.display()))?;

    println!("Template written to {}", output.display());

    Ok(())
}
