//! Memory headroom check. The pipeline loads the whole input before any
//! store interaction, so a dump near the size of available memory deserves
//! a warning up front.

use std::path::Path;
use sysinfo::{System, SystemExt};

/// Fraction of total memory currently available, in [0.0, 1.0].
pub fn available_memory_fraction() -> f64 {
    let mut sys = System::new();
    sys.refresh_memory();
    let total = sys.total_memory().max(1);
    sys.available_memory() as f64 / total as f64
}

pub fn warn_if_tight(input: &Path) {
    let Ok(meta) = std::fs::metadata(input) else { return };
    let mut sys = System::new();
    sys.refresh_memory();
    let available = sys.available_memory();
    if available > 0 && meta.len() > available / 2 {
        tracing::warn!(
            input_bytes = meta.len(),
            available_bytes = available,
            "input is large relative to available memory; the full dump is loaded before ingest"
        );
    }
}
