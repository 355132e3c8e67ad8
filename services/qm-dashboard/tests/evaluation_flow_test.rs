//! 专家评价流程测试

mod support;

use std::sync::atomic::Ordering;

use async_trait::async_trait;
use common::types::Pagination;
use errors::{AppError, AppResult};
use mockall::mock;

use qm_dashboard::application::forms::EvaluationDialog;
use qm_dashboard::application::{EvaluateQualityRecordCommand, GetQualityRecordQuery};
use qm_dashboard::domain::entities::{QualityRecord, RecordQueryParams, UserRole};
use qm_dashboard::domain::repositories::EvaluationSink;
use qm_dashboard::domain::value_objects::QualityRecordId;
use qm_dashboard::infrastructure::cache::QueryCache;

use support::{FakeBackend, context, context_with, record};

mock! {
    pub Sink {}

    #[async_trait]
    impl EvaluationSink for Sink {
        async fn submit_evaluation(&self, id: QualityRecordId, text: &str) -> AppResult<QualityRecord>;
    }
}

fn flagged_backend() -> FakeBackend {
    let mut flagged = record(1, "2024-01-01", 1, 10, 990, 10);
    flagged.evaluation_required = true;
    FakeBackend::with_records(vec![flagged, record(2, "2024-01-01", 1, 20, 1000, 0)])
}

// ============ 本地校验 ============

#[tokio::test]
async fn test_blank_evaluation_never_reaches_sink() {
    let mut sink = MockSink::new();
    sink.expect_submit_evaluation().never();
    let sink = std::sync::Arc::new(sink);

    let ctx = context_with(flagged_backend(), Some(UserRole::Manager), |mut repos| {
        repos.evaluations = sink.clone();
        repos
    });

    for text in ["", "   ", "\n\t "] {
        let err = ctx
            .handler
            .evaluate(EvaluateQualityRecordCommand::new(QualityRecordId(1), text))
            .await
            .unwrap_err();
        assert!(err.is_field_error());
        assert_eq!(
            err.field_errors().and_then(|f| f.get("evaluation")),
            Some("请输入评价内容")
        );
    }
    assert!(ctx.cache.deleted_keys.lock().is_empty());
}

#[tokio::test]
async fn test_blank_text_keeps_dialog_open() {
    let ctx = context(flagged_backend(), Some(UserRole::Manager));
    let record = ctx
        .handler
        .get_record(GetQualityRecordQuery {
            record_id: QualityRecordId(1),
        })
        .await
        .unwrap();

    let mut dialog = EvaluationDialog::new();
    dialog.open(&record);
    dialog.set_text("   ");
    assert!(dialog.submit(&ctx.handler).await.is_none());

    assert!(dialog.is_open());
    assert_eq!(dialog.text(), "   ");
    assert_eq!(dialog.field_error(), Some("请输入评价内容"));
    assert_eq!(dialog.submit_error(), None);
    assert!(ctx.backend.evaluations.lock().is_empty());
}

// ============ 提交成功 ============

#[tokio::test]
async fn test_successful_evaluation_invalidates_record_caches() {
    let ctx = context(flagged_backend(), Some(UserRole::Manager));
    let params = RecordQueryParams::new(Pagination::new(0, 10));

    // 预热缓存
    ctx.handler.list_records(&params).await.unwrap();
    ctx.handler.list_records(&params).await.unwrap();
    assert_eq!(ctx.backend.list_calls(), 1);
    let queue = ctx.handler.evaluation_required().await.unwrap();
    assert_eq!(queue.len(), 1);
    ctx.handler
        .get_record(GetQualityRecordQuery {
            record_id: QualityRecordId(1),
        })
        .await
        .unwrap();
    ctx.cache.reset_log();

    let updated = ctx
        .handler
        .evaluate(EvaluateQualityRecordCommand::new(
            QualityRecordId(1),
            "  需要返工，已通知产线  ",
        ))
        .await
        .unwrap();
    assert_eq!(updated.expert_evaluation.as_deref(), Some("需要返工，已通知产线"));

    let submitted = ctx.backend.evaluations.lock().clone();
    assert_eq!(submitted, vec![(QualityRecordId(1), "需要返工，已通知产线".to_string())]);

    let list_key = QueryCache::record_list_key(&params);
    assert!(
        ctx.cache
            .deleted_prefixes
            .lock()
            .iter()
            .any(|prefix| list_key.starts_with(prefix.as_str()))
    );
    let deleted = ctx.cache.deleted_keys.lock().clone();
    assert!(deleted.contains(&QueryCache::record_key(QualityRecordId(1))));
    assert!(deleted.contains(&QueryCache::evaluation_required_key().to_string()));

    // 失效后重新请求
    ctx.handler.list_records(&params).await.unwrap();
    assert_eq!(ctx.backend.list_calls(), 2);
    let detail = ctx
        .handler
        .get_record(GetQualityRecordQuery {
            record_id: QualityRecordId(1),
        })
        .await
        .unwrap();
    assert!(detail.is_evaluated());
}

#[tokio::test]
async fn test_dialog_closes_after_success() {
    let ctx = context(flagged_backend(), Some(UserRole::Admin));
    let record = ctx
        .handler
        .get_record(GetQualityRecordQuery {
            record_id: QualityRecordId(1),
        })
        .await
        .unwrap();

    let mut dialog = EvaluationDialog::new();
    dialog.open(&record);
    dialog.set_text("确认为材料批次问题");
    let saved = dialog.submit(&ctx.handler).await.unwrap();

    assert_eq!(saved.expert_evaluation.as_deref(), Some("确认为材料批次问题"));
    assert!(!dialog.is_open());
    assert_eq!(dialog.text(), "");
}

// ============ 提交失败 ============

#[tokio::test]
async fn test_remote_failure_keeps_text_and_reports_single_message() {
    let ctx = context(flagged_backend(), Some(UserRole::Manager));
    ctx.backend.fail_evaluation.store(true, Ordering::SeqCst);
    let record = ctx
        .handler
        .get_record(GetQualityRecordQuery {
            record_id: QualityRecordId(1),
        })
        .await
        .unwrap();
    ctx.cache.reset_log();

    let mut dialog = EvaluationDialog::new();
    dialog.open(&record);
    dialog.set_text("需要返工");
    assert!(dialog.submit(&ctx.handler).await.is_none());

    assert!(dialog.is_open());
    assert_eq!(dialog.text(), "需要返工");
    assert_eq!(dialog.field_error(), None);
    assert_eq!(dialog.submit_error(), Some("评价服务暂时不可用"));
    assert!(ctx.cache.deleted_keys.lock().is_empty());
    assert!(ctx.cache.deleted_prefixes.lock().is_empty());
}

// ============ 权限 ============

#[tokio::test]
async fn test_plain_user_cannot_evaluate() {
    let ctx = context(flagged_backend(), Some(UserRole::User));
    let err = ctx
        .handler
        .evaluate(EvaluateQualityRecordCommand::new(QualityRecordId(1), "ok"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(ctx.backend.evaluations.lock().is_empty());
}

#[tokio::test]
async fn test_signed_out_user_cannot_evaluate() {
    let ctx = context(flagged_backend(), None);
    let err = ctx
        .handler
        .evaluate(EvaluateQualityRecordCommand::new(QualityRecordId(1), "ok"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated(_)));
}
