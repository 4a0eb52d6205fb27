use crate::component::{PackagerMode, SegmentPackager};
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_segment_packager(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
    mode: PackagerMode,
) -> Result<()> {
    let packager = SegmentPackager::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = packager.run(mode) {
        eprintln!("{} {:#}", style(t!("common.error_prefix")).red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
