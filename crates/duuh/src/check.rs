//! Check mode: inspect the current filesystem and print the report
//!
//! This runs inside the checked container. Stdout carries nothing but the
//! JSON report; progress goes to stderr through tracing.

use std::io::Write;

use color_eyre::Result;
use duuh_pkg::{ManagerContext, Probe};
use eyre::WrapErr;
use tracing::info;

/// Collect upgrades, log what was found and write the report to `out`
pub async fn run(ctx: ManagerContext, out: &mut impl Write) -> Result<()> {
    let report = Probe::new(ctx)
        .run()
        .await
        .wrap_err("upgrade check failed")?;

    info!(
        os_type = report.distro_family.map_or("", |f| f.as_str()),
        "detected os type"
    );
    for upgrade in &report.upgrades {
        info!(upgrade = %upgrade, "detected upgrade");
    }

    let payload = report.to_json()?;
    out.write_all(payload.as_bytes())?;
    out.flush()?;
    Ok(())
}
