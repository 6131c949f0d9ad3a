// src/utils/log.rs

//! Sweep progress layout on top of the `log` facade.
//!
//! Headers frame each phase, sub-items are indented under them and a
//! summary closes the run. Levels and timestamps come from the installed
//! logger.

const RULE_WIDTH: usize = 60;

/// Log a framed section header.
pub fn header(title: &str) {
    let border = "═".repeat(RULE_WIDTH);
    log::info!("{border}");
    log::info!("  {title}");
    log::info!("{border}");
}

/// Log an indented line under the current header.
pub fn sub_item(message: &str) {
    log::info!("    {message}");
}

/// Log a titled list of key/value pairs.
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {title}");
    for (key, value) in items {
        log::info!("    {key}: {value}");
    }
}
