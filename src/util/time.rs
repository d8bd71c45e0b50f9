/// Get the current time in seconds since the UNIX epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn current_time_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Get the current time in seconds since the UNIX epoch
#[cfg(target_arch = "wasm32")]
pub fn current_time_secs() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| (perf.time_origin() + perf.now()) / 1000.0)
        .unwrap_or(0.0)
}

/// Milliseconds since the UNIX epoch, as stored in snapshots and exports
pub fn timestamp_millis() -> u64 {
    secs_to_millis(current_time_secs())
}

/// Convert a clock reading in seconds to epoch milliseconds
pub fn secs_to_millis(secs: f64) -> u64 {
    if secs <= 0.0 {
        0
    } else {
        (secs * 1000.0) as u64
    }
}
