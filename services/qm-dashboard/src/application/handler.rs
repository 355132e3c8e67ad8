//! Business logic handler

use std::sync::Arc;

use common::dates::DateRange;
use common::types::{PagedResult, Pagination};
use errors::AppResult;
use secrecy::SecretString;
use tracing::{info, warn};

use crate::domain::entities::{
    DailyProduction, DailyProductionQueryParams, Item, ItemStatistic, Process, ProcessStatistic,
    QualityRecord, RecordQueryParams, SessionUser, SystemCode, UserRole,
};
use crate::domain::repositories::{
    AuthRepository, DailyProductionRepository, EvaluationSink, ItemRepository,
    ProcessRepository, QualityRecordSource, QualityRecordWriter, StatisticsRepository,
    ThresholdSource,
};
use crate::domain::value_objects::{
    DailyProductionId, IndustryThreshold, ItemId, ProcessId, THRESHOLD_CODE_GROUP,
};
use crate::infrastructure::cache::QueryCache;
use crate::infrastructure::observability::metrics;

use super::commands::*;
use super::queries::*;
use super::session::SharedSession;
use super::views::{
    DailyProductionRow, FilterMode, NgRateChart, QualityRecordListView, QualityRecordRow,
    RecordFilter, ReferenceLookup, SortState, StatisticsView, transform_productions,
    transform_records,
};

/// 本地筛选模式下一次取回的最大记录数
pub const LOCAL_FETCH_LIMIT: u32 = 5_000;

/// 处理器依赖的全部数据来源
#[derive(Clone)]
pub struct Repositories {
    pub records: Arc<dyn QualityRecordSource>,
    pub record_writer: Arc<dyn QualityRecordWriter>,
    pub evaluations: Arc<dyn EvaluationSink>,
    pub thresholds: Arc<dyn ThresholdSource>,
    pub items: Arc<dyn ItemRepository>,
    pub processes: Arc<dyn ProcessRepository>,
    pub productions: Arc<dyn DailyProductionRepository>,
    pub statistics: Arc<dyn StatisticsRepository>,
    pub auth: Arc<dyn AuthRepository>,
}

pub struct ServiceHandler {
    repos: Repositories,
    cache: QueryCache,
    session: SharedSession,
}

impl ServiceHandler {
    pub fn new(repos: Repositories, cache: QueryCache, session: SharedSession) -> Self {
        Self {
            repos,
            cache,
            session,
        }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// 检查权限；不在 await 期间持有锁
    fn authorize(&self, allowed: impl Fn(&UserRole) -> bool, action: &str) -> AppResult<SessionUser> {
        self.session.read().require(allowed, action).cloned()
    }

    // ========== 认证 ==========

    pub async fn login(&self, cmd: LoginCommand) -> AppResult<SessionUser> {
        cmd.validate()
            .inspect_err(|_| metrics::record_validation_rejected("login"))?;

        let response = self.repos.auth.login(&cmd.to_request()).await?;
        let user = response.user.clone();
        self.session
            .write()
            .sign_in(user.clone(), SecretString::new(response.token));
        // 不同用户看到的数据可能不同
        self.cache.clear().await;

        info!("User {} logged in as {}", user.username, user.role);
        Ok(user)
    }

    pub async fn logout(&self) {
        let username = self
            .session
            .read()
            .user()
            .map(|u| u.username.clone());
        self.session.write().clear();
        self.cache.clear().await;
        info!("User {} logged out", username.as_deref().unwrap_or("-"));
    }

    pub async fn signup(&self, cmd: SignupCommand) -> AppResult<()> {
        cmd.validate()
            .inspect_err(|_| metrics::record_validation_rejected("signup"))?;
        self.repos.auth.signup(&cmd.to_request()).await?;
        info!("Signed up user {} with role {}", cmd.username.trim(), cmd.role);
        Ok(())
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.session.read().user().cloned()
    }

    // ========== 质量记录 ==========

    pub async fn list_records(
        &self,
        params: &RecordQueryParams,
    ) -> AppResult<PagedResult<QualityRecord>> {
        let key = QueryCache::record_list_key(params);
        self.cache
            .get_or_fetch("quality_records", &key, self.cache.records_ttl(), || {
                self.repos.records.fetch_records(params)
            })
            .await
    }

    pub async fn get_record(&self, query: GetQualityRecordQuery) -> AppResult<QualityRecord> {
        let key = QueryCache::record_key(query.record_id);
        self.cache
            .get_or_fetch("quality_record", &key, self.cache.records_ttl(), || {
                self.repos.records.fetch_record(query.record_id)
            })
            .await
    }

    pub async fn evaluation_required(&self) -> AppResult<Vec<QualityRecord>> {
        self.cache
            .get_or_fetch(
                "evaluation_required",
                QueryCache::evaluation_required_key(),
                self.cache.records_ttl(),
                || self.repos.records.fetch_evaluation_required(),
            )
            .await
    }

    pub async fn create_record(&self, cmd: CreateQualityRecordCommand) -> AppResult<QualityRecord> {
        self.authorize(UserRole::can_enter_data, "录入质量记录")?;
        info!(
            "Creating quality record: production {} process {}",
            cmd.daily_production_id, cmd.process_id
        );

        let batch = self
            .repos
            .productions
            .get_daily_production(cmd.daily_production_id)
            .await?;
        cmd.validate(&batch)
            .inspect_err(|_| metrics::record_validation_rejected("create_record"))?;

        let record = self.repos.record_writer.create_record(&cmd.to_request()).await?;
        self.cache.invalidate_records().await;
        self.cache.invalidate_statistics().await;
        metrics::record_data_mutation("quality_record", "create");

        info!("Quality record created: {}", record.id);
        Ok(record)
    }

    pub async fn update_record(&self, cmd: UpdateQualityRecordCommand) -> AppResult<QualityRecord> {
        self.authorize(UserRole::can_enter_data, "修改质量记录")?;
        info!("Updating quality record: {}", cmd.record_id);

        let current = self.repos.records.fetch_record(cmd.record_id).await?;
        let batch = self
            .repos
            .productions
            .get_daily_production(current.daily_production_id)
            .await?;
        cmd.validate(&batch)
            .inspect_err(|_| metrics::record_validation_rejected("update_record"))?;

        let record = self
            .repos
            .record_writer
            .update_record(cmd.record_id, &cmd.to_request())
            .await?;
        self.cache.invalidate_records().await;
        self.cache.invalidate_statistics().await;
        metrics::record_data_mutation("quality_record", "update");
        Ok(record)
    }

    pub async fn delete_record(&self, cmd: DeleteQualityRecordCommand) -> AppResult<()> {
        self.authorize(UserRole::can_delete, "删除质量记录")?;
        info!("Deleting quality record: {}", cmd.record_id);

        self.repos.record_writer.delete_record(cmd.record_id).await?;
        self.cache.invalidate_records().await;
        self.cache.invalidate_statistics().await;
        metrics::record_data_mutation("quality_record", "delete");
        Ok(())
    }

    /// 提交专家评价
    ///
    /// 评价内容为空时直接拒绝，不发请求。成功后使记录列表、该记录与评价需求列表的缓存失效。
    pub async fn evaluate(&self, cmd: EvaluateQualityRecordCommand) -> AppResult<QualityRecord> {
        let text = cmd
            .validate()
            .inspect_err(|_| metrics::record_validation_rejected("evaluate"))?;
        self.authorize(UserRole::can_evaluate, "专家评价")?;
        info!("Submitting evaluation for quality record: {}", cmd.record_id);

        let record = match self.repos.evaluations.submit_evaluation(cmd.record_id, text).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Evaluation for record {} failed: {}", cmd.record_id, e);
                metrics::record_evaluation_submitted(false);
                return Err(e);
            }
        };

        self.cache.invalidate_record_lists().await;
        self.cache.invalidate_record(cmd.record_id).await;
        self.cache.invalidate_evaluation_required().await;
        metrics::record_evaluation_submitted(true);

        info!("Evaluation saved for quality record: {}", record.id);
        Ok(record)
    }

    // ========== 阈值 ==========

    pub async fn system_codes(&self, code_group: Option<&str>) -> AppResult<Vec<SystemCode>> {
        let key = QueryCache::system_codes_key(code_group);
        self.cache
            .get_or_fetch("system_codes", &key, self.cache.system_codes_ttl(), || {
                self.repos.thresholds.fetch_system_codes(code_group)
            })
            .await
    }

    /// 行业平均阈值；取不到时使用默认值，只影响高亮
    pub async fn industry_threshold(&self) -> IndustryThreshold {
        match self.system_codes(Some(THRESHOLD_CODE_GROUP)).await {
            Ok(codes) => IndustryThreshold::from_system_codes(&codes),
            Err(e) => {
                warn!("Failed to load industry threshold, using default: {}", e);
                IndustryThreshold::default()
            }
        }
    }

    // ========== 部品 / 工序 ==========

    pub async fn list_items(&self) -> AppResult<Vec<Item>> {
        self.cache
            .get_or_fetch(
                "items",
                &QueryCache::items_key(),
                self.cache.reference_ttl(),
                || self.repos.items.list_items(),
            )
            .await
    }

    pub async fn get_item(&self, id: ItemId) -> AppResult<Item> {
        self.cache
            .get_or_fetch(
                "item",
                &QueryCache::item_key(id),
                self.cache.reference_ttl(),
                || self.repos.items.get_item(id),
            )
            .await
    }

    pub async fn create_item(&self, cmd: CreateItemCommand) -> AppResult<Item> {
        self.authorize(UserRole::can_manage_items, "登记部品")?;
        cmd.validate()
            .inspect_err(|_| metrics::record_validation_rejected("create_item"))?;
        info!("Creating item: {}", cmd.code.trim());

        let item = self.repos.items.create_item(&cmd.to_request()).await?;
        self.cache.invalidate_items().await;
        metrics::record_data_mutation("item", "create");
        Ok(item)
    }

    pub async fn update_item(&self, cmd: UpdateItemCommand) -> AppResult<Item> {
        self.authorize(UserRole::can_manage_items, "修改部品")?;
        cmd.validate()
            .inspect_err(|_| metrics::record_validation_rejected("update_item"))?;
        info!("Updating item: {}", cmd.item_id);

        let item = self
            .repos
            .items
            .update_item(cmd.item_id, &cmd.to_request())
            .await?;
        self.cache.invalidate_items().await;
        metrics::record_data_mutation("item", "update");
        Ok(item)
    }

    pub async fn delete_item(&self, cmd: DeleteItemCommand) -> AppResult<()> {
        self.authorize(UserRole::can_delete_items, "删除部品")?;
        info!("Deleting item: {}", cmd.item_id);

        self.repos.items.delete_item(cmd.item_id).await?;
        self.cache.invalidate_items().await;
        metrics::record_data_mutation("item", "delete");
        Ok(())
    }

    pub async fn list_processes(&self) -> AppResult<Vec<Process>> {
        self.cache
            .get_or_fetch(
                "processes",
                QueryCache::processes_key(),
                self.cache.reference_ttl(),
                || self.repos.processes.list_processes(),
            )
            .await
    }

    pub async fn get_process(&self, id: ProcessId) -> AppResult<Process> {
        self.cache
            .get_or_fetch(
                "process",
                &QueryCache::process_key(id),
                self.cache.reference_ttl(),
                || self.repos.processes.get_process(id),
            )
            .await
    }

    pub async fn reference_lookup(&self) -> AppResult<ReferenceLookup> {
        let (items, processes) = tokio::try_join!(self.list_items(), self.list_processes())?;
        Ok(ReferenceLookup::new(items, processes))
    }

    // ========== 日产量 ==========

    pub async fn list_daily_productions(
        &self,
        params: &DailyProductionQueryParams,
    ) -> AppResult<PagedResult<DailyProduction>> {
        let key = QueryCache::daily_production_list_key(params);
        self.cache
            .get_or_fetch("daily_productions", &key, self.cache.records_ttl(), || {
                self.repos.productions.list_daily_productions(params)
            })
            .await
    }

    pub async fn get_daily_production(&self, id: DailyProductionId) -> AppResult<DailyProduction> {
        self.cache
            .get_or_fetch(
                "daily_production",
                &QueryCache::daily_production_key(id),
                self.cache.records_ttl(),
                || self.repos.productions.get_daily_production(id),
            )
            .await
    }

    pub async fn create_daily_production(
        &self,
        cmd: CreateDailyProductionCommand,
    ) -> AppResult<DailyProduction> {
        self.authorize(UserRole::can_enter_data, "录入日产量")?;
        info!(
            "Creating daily production: item {} on {}",
            cmd.item_id, cmd.production_date
        );

        let production = self
            .repos
            .productions
            .create_daily_production(&cmd.to_request())
            .await?;
        self.cache.invalidate_daily_productions().await;
        metrics::record_data_mutation("daily_production", "create");
        Ok(production)
    }

    pub async fn update_daily_production(
        &self,
        cmd: UpdateDailyProductionCommand,
    ) -> AppResult<DailyProduction> {
        self.authorize(UserRole::can_enter_data, "修改日产量")?;
        info!("Updating daily production: {}", cmd.production_id);

        let production = self
            .repos
            .productions
            .update_daily_production(cmd.production_id, &cmd.to_request())
            .await?;
        self.cache.invalidate_daily_productions().await;
        metrics::record_data_mutation("daily_production", "update");
        Ok(production)
    }

    /// 后端会级联删除该批次的质量记录
    pub async fn delete_daily_production(&self, cmd: DeleteDailyProductionCommand) -> AppResult<()> {
        self.authorize(UserRole::can_delete, "删除日产量")?;
        info!("Deleting daily production: {}", cmd.production_id);

        self.repos
            .productions
            .delete_daily_production(cmd.production_id)
            .await?;
        self.cache.invalidate_daily_productions().await;
        self.cache.invalidate_records().await;
        self.cache.invalidate_statistics().await;
        metrics::record_data_mutation("daily_production", "delete");
        Ok(())
    }

    // ========== 统计 ==========

    pub async fn statistics_by_process(&self, range: &DateRange) -> AppResult<Vec<ProcessStatistic>> {
        let key = QueryCache::statistics_key("by_process", range);
        self.cache
            .get_or_fetch("statistics", &key, self.cache.records_ttl(), || {
                self.repos.statistics.statistics_by_process(range)
            })
            .await
    }

    pub async fn statistics_by_item(&self, range: &DateRange) -> AppResult<Vec<ItemStatistic>> {
        let key = QueryCache::statistics_key("by_item", range);
        self.cache
            .get_or_fetch("statistics", &key, self.cache.records_ttl(), || {
                self.repos.statistics.statistics_by_item(range)
            })
            .await
    }

    // ========== 视图 ==========

    /// 质量记录列表
    pub async fn quality_record_view(
        &self,
        query: &QualityRecordViewQuery,
    ) -> AppResult<QualityRecordListView> {
        let (lookup, threshold) = tokio::join!(self.reference_lookup(), self.industry_threshold());
        let lookup = lookup?;

        match query.mode {
            FilterMode::ServerApplied => {
                let params = query.filter().to_query_params(query.pagination);
                let page = self.list_records(&params).await?;
                Ok(QualityRecordListView::build(
                    page,
                    &lookup,
                    threshold,
                    query.filter(),
                    &query.sort,
                    query.mode,
                ))
            }
            FilterMode::Local => {
                let params = RecordQueryParams::new(Pagination::new(0, LOCAL_FETCH_LIMIT));
                let fetched = self.list_records(&params).await?;
                Ok(QualityRecordListView::paginate_local(
                    fetched,
                    &lookup,
                    threshold,
                    query.filter(),
                    &query.sort,
                    query.pagination,
                ))
            }
        }
    }

    /// 待评价记录，按默认顺序
    pub async fn evaluation_required_view(&self) -> AppResult<Vec<QualityRecordRow>> {
        let (lookup, threshold) = tokio::join!(self.reference_lookup(), self.industry_threshold());
        let lookup = lookup?;
        let records = self.evaluation_required().await?;
        Ok(transform_records(
            records,
            &lookup,
            threshold,
            &RecordFilter::new(),
            &SortState::default(),
            FilterMode::Local,
        ))
    }

    pub async fn daily_production_view(
        &self,
        query: &DailyProductionViewQuery,
    ) -> AppResult<PagedResult<DailyProductionRow>> {
        let params = DailyProductionQueryParams::new(query.pagination)
            .with_item(query.filter.item_id)
            .with_date_range(query.filter.date_range);
        let (lookup, page) =
            tokio::try_join!(self.reference_lookup(), self.list_daily_productions(&params))?;

        let PagedResult {
            items,
            total_count,
            page_index,
            page_size,
        } = page;
        Ok(PagedResult {
            items: transform_productions(items, &lookup, &query.filter, &query.sort),
            total_count,
            page_index,
            page_size,
        })
    }

    pub async fn process_statistics_view(
        &self,
        query: &StatisticsQuery,
    ) -> AppResult<StatisticsView<ProcessStatistic>> {
        let (statistics, threshold) = tokio::join!(
            self.statistics_by_process(&query.range),
            self.industry_threshold()
        );
        Ok(StatisticsView::build(statistics?, threshold, &query.sort))
    }

    pub async fn item_statistics_view(
        &self,
        query: &StatisticsQuery,
    ) -> AppResult<StatisticsView<ItemStatistic>> {
        let (statistics, threshold) = tokio::join!(
            self.statistics_by_item(&query.range),
            self.industry_threshold()
        );
        Ok(StatisticsView::build(statistics?, threshold, &query.sort))
    }

    /// 按部品的 NG 率图表
    pub async fn ng_rate_chart(&self, range: &DateRange) -> AppResult<NgRateChart> {
        let (statistics, threshold) =
            tokio::join!(self.statistics_by_item(range), self.industry_threshold());
        Ok(NgRateChart::from_item_statistics(&statistics?, threshold))
    }
}
