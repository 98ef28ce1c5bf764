use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const SUPPLIER_TRANSACTIONS_APPENDED: &str = "supplier_transactions_appended_total";

/// Install the global Prometheus recorder. Call once at startup.
pub fn init_metrics() -> Result<(), anyhow::Error> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("Metrics recorder already initialized"))?;

    metrics::describe_counter!(
        SUPPLIER_TRANSACTIONS_APPENDED,
        "Transactions appended to supplier records"
    );
    Ok(())
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

pub fn record_supplier_transaction() {
    metrics::counter!(SUPPLIER_TRANSACTIONS_APPENDED).increment(1);
}
