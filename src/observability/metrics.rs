//! Metrics collection.
//!
//! # Metrics
//! - `lwm2m_profile_projections_total` (counter)
//! - `lwm2m_profile_unresolved_paths_total` (counter): paths skipped during projection
//! - `lwm2m_profile_tree_objects` (gauge): objects in the last projected tree
//! - `lwm2m_profile_flatten_total` (counter)
//! - `lwm2m_profile_reported_paths` (gauge): attribute + telemetry paths after the last flatten
//! - `lwm2m_profile_objects_removed_total` (counter)
//! - `lwm2m_profile_catalog_fetch_total` (counter): by result
//! - `lwm2m_profile_stale_fetch_discarded_total` (counter)
//!
//! Recording is gated by a process-wide switch set from configuration.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, gauge};

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Turn metric recording on or off.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn record_projection(objects: usize, unresolved: usize) {
    if !enabled() {
        return;
    }
    counter!("lwm2m_profile_projections_total").increment(1);
    counter!("lwm2m_profile_unresolved_paths_total").increment(unresolved as u64);
    gauge!("lwm2m_profile_tree_objects").set(objects as f64);
}

pub fn record_flatten(attribute: usize, telemetry: usize) {
    if !enabled() {
        return;
    }
    counter!("lwm2m_profile_flatten_total").increment(1);
    gauge!("lwm2m_profile_reported_paths").set((attribute + telemetry) as f64);
}

pub fn record_object_removed() {
    if !enabled() {
        return;
    }
    counter!("lwm2m_profile_objects_removed_total").increment(1);
}

pub fn record_catalog_fetch(result: &'static str) {
    if !enabled() {
        return;
    }
    counter!("lwm2m_profile_catalog_fetch_total", "result" => result).increment(1);
}

pub fn record_stale_fetch() {
    if !enabled() {
        return;
    }
    counter!("lwm2m_profile_stale_fetch_discarded_total").increment(1);
}
