use anyhow::{Context, Result};
use log::warn;
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn setup_shutdown_signal() -> Result<Arc<AtomicBool>> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    ctrlc::set_handler(move || {
        signal_clone.store(true, Ordering::SeqCst);
        warn!("收到中斷信號");
        eprintln!("\n{}", t!("common.interrupted"));
    })
    .context("無法設定 Ctrl-C 處理器")?;

    Ok(shutdown_signal)
}
