use std::path::Path;

use anyhow::{bail, Result};
use strata::presentation::factory;
use strata::{ReconcileContext, ReconcileOptions, StrataError};

use super::Runtime;

pub fn cmd_apply(rt: &Runtime, file: &Path, dry_run: bool, continue_on_error: bool) -> Result<()> {
    let model = rt.load_model(file)?;
    let reconciler = factory::create_reconciler(&rt.config);

    let ctx = ReconcileContext::new(model);
    let instance_id = ctx.instance_id().to_string();
    let options = ReconcileOptions::new()
        .with_dry_run(dry_run)
        .with_continue_on_error(continue_on_error);

    match reconciler.reconcile_and_record(&ctx, &options) {
        Ok(result) => {
            print!("{}", rt.renderer.reconcile(&instance_id, &result));
            if !result.is_success() {
                bail!(
                    "reconciliation finished with {} error(s)",
                    result.errors.len()
                );
            }
            Ok(())
        }
        Err(StrataError::Aborted(failure)) => {
            print!("{}", rt.renderer.reconcile(&instance_id, &failure.result));
            Err(anyhow::Error::new(failure.error).context("reconciliation aborted"))
        }
        Err(err) => Err(anyhow::Error::new(err)
            .context(format!("failed to save status of instance [{instance_id}]"))),
    }
}
