//! 业务与客户端指标
//!
//! 只通过 `metrics` 门面记录；`telemetry.metrics` 打开时 CLI 安装 Prometheus 记录器。

use metrics::{counter, histogram};
use std::time::Duration;

// ============================================================================
// HTTP
// ============================================================================

/// 记录一次后端请求
pub fn record_api_request(method: &str, status: u16, elapsed: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    counter!("qm_api_requests_total", &labels).increment(1);
    histogram!("qm_api_request_duration_seconds", &labels).record(elapsed.as_secs_f64());
}

/// 记录传输层失败（超时、连接失败）
pub fn record_api_transport_error(method: &str) {
    let labels = [("method", method.to_string())];
    counter!("qm_api_transport_errors_total", &labels).increment(1);
}

// ============================================================================
// 缓存
// ============================================================================

pub fn record_cache_hit(resource: &str) {
    let labels = [("resource", resource.to_string())];
    counter!("qm_cache_hits_total", &labels).increment(1);
}

pub fn record_cache_miss(resource: &str) {
    let labels = [("resource", resource.to_string())];
    counter!("qm_cache_misses_total", &labels).increment(1);
}

pub fn record_cache_invalidation(scope: &str) {
    let labels = [("scope", scope.to_string())];
    counter!("qm_cache_invalidations_total", &labels).increment(1);
}

// ============================================================================
// 业务
// ============================================================================

/// 记录专家评价提交
pub fn record_evaluation_submitted(success: bool) {
    let labels = [("success", success.to_string())];
    counter!("qm_evaluations_submitted_total", &labels).increment(1);
}

/// 记录本地校验拒绝（未发出请求）
pub fn record_validation_rejected(operation: &str) {
    let labels = [("operation", operation.to_string())];
    counter!("qm_validation_rejected_total", &labels).increment(1);
}

/// 记录数据写入（新建/修改/删除）
pub fn record_data_mutation(resource: &str, action: &str) {
    let labels = [
        ("resource", resource.to_string()),
        ("action", action.to_string()),
    ];
    counter!("qm_data_mutations_total", &labels).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_reach_installed_recorder() {
        let recorder = telemetry::metrics_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            record_evaluation_submitted(true);
            record_cache_hit("process");
            record_api_request("GET", 200, Duration::from_millis(12));
        });

        let rendered = handle.render();
        assert!(rendered.contains("qm_evaluations_submitted_total{success=\"true\"} 1"));
        assert!(rendered.contains("qm_cache_hits_total{resource=\"process\"} 1"));
        assert!(rendered.contains("qm_api_request_duration_seconds"));
    }
}
