use std::path::Path;

use anyhow::Result;
use strata::presentation::factory;
use strata::ReconcileContext;

use super::Runtime;

pub fn cmd_plan(rt: &Runtime, file: &Path) -> Result<()> {
    let model = rt.load_model(file)?;
    let reconciler = factory::create_reconciler(&rt.config);
    let ctx = ReconcileContext::new(model);

    let diff = reconciler.get_diff(&ctx);
    print!("{}", rt.renderer.diff(ctx.instance_id(), &diff));
    Ok(())
}
