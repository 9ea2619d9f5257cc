use crate::defaults::ENV_LOG;

const QUIET_FILTER: &str = "error";
const VERBOSE_FILTER: &str = "debug";

/// Picks the tracing filter directive: `ANCHORPATCH_LOG`, then `RUST_LOG`,
/// then a default keyed on `verbose`.
pub fn resolve_log_filter(verbose: bool) -> String {
    [ENV_LOG, "RUST_LOG"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| {
            if verbose {
                VERBOSE_FILTER.to_string()
            } else {
                QUIET_FILTER.to_string()
            }
        })
}
