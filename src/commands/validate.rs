use std::path::Path;

use anyhow::{bail, Context, Result};
use strata::domain::ports::ModelLoader;

use super::Runtime;

pub fn cmd_validate(rt: &Runtime, file: &Path) -> Result<()> {
    let report = rt
        .loader()
        .validate(file)
        .with_context(|| format!("failed to read model from {}", file.display()))?;

    print!("{}", rt.renderer.validation(file, &report));

    if !report.is_valid() {
        bail!(
            "{} has {} validation error(s)",
            file.display(),
            report.errors.len()
        );
    }
    Ok(())
}
