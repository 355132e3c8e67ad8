//! 集成测试共用的内存实现

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::dates::DateRange;
use common::types::PagedResult;
use errors::{AppError, AppResult};
use parking_lot::Mutex;
use ports::CachePort;
use secrecy::SecretString;

use qm_dashboard::application::{Repositories, ServiceHandler, SessionContext, SharedSession};
use qm_dashboard::domain::entities::*;
use qm_dashboard::domain::repositories::*;
use qm_dashboard::domain::value_objects::*;
use qm_dashboard::infrastructure::cache::{MokaCachePort, QueryCache};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn record(id: i64, day: &str, item: i64, process: i64, ok: u64, ng: u64) -> QualityRecord {
    QualityRecord {
        id: QualityRecordId(id),
        daily_production_id: DailyProductionId(id),
        production_date: Some(date(day)),
        item_id: Some(ItemId(item)),
        process_id: ProcessId(process),
        ok_quantity: ok,
        ng_quantity: ng,
        evaluation_required: false,
        expert_evaluation: None,
    }
}

pub fn item(id: i64, code: &str) -> Item {
    Item {
        id: ItemId(id),
        code: code.to_string(),
        name: format!("{} 部品", code),
        description: None,
        category: None,
    }
}

pub fn process(id: i64, code: &str, sequence: Option<u32>) -> Process {
    Process {
        id: ProcessId(id),
        code: code.to_string(),
        name: code.to_lowercase(),
        description: None,
        sequence,
    }
}

pub fn threshold_code(value: &str) -> SystemCode {
    SystemCode {
        code_group: THRESHOLD_CODE_GROUP.to_string(),
        code_key: THRESHOLD_CODE_KEY.to_string(),
        code_value: value.to_string(),
        description: None,
    }
}

// ============ 内存后端 ============

#[derive(Default)]
pub struct FakeBackend {
    pub records: Mutex<Vec<QualityRecord>>,
    pub productions: Mutex<Vec<DailyProduction>>,
    pub items: Mutex<Vec<Item>>,
    pub processes: Vec<Process>,
    pub system_codes: Vec<SystemCode>,
    pub item_statistics: Vec<ItemStatistic>,
    pub process_statistics: Vec<ProcessStatistic>,
    pub evaluations: Mutex<Vec<(QualityRecordId, String)>>,
    pub fail_evaluation: AtomicBool,
    pub record_list_calls: AtomicUsize,
    pub threshold_calls: AtomicUsize,
    pub item_detail_calls: AtomicUsize,
    pub process_detail_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn with_records(records: Vec<QualityRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            items: Mutex::new(vec![item(1, "A"), item(2, "B")]),
            processes: vec![
                process(10, "CUT", Some(1)),
                process(20, "WELD", Some(2)),
                process(30, "PACK", None),
            ],
            system_codes: vec![threshold_code("0.5")],
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.record_list_calls.load(Ordering::SeqCst)
    }
}

fn matches_params(record: &QualityRecord, params: &RecordQueryParams) -> bool {
    if params.item_id.is_some() && record.item_id != params.item_id {
        return false;
    }
    let range = DateRange::new(params.start_date, params.end_date);
    if !range.is_unbounded() && !record.production_date.is_some_and(|d| range.contains(d)) {
        return false;
    }
    true
}

#[async_trait]
impl QualityRecordSource for FakeBackend {
    async fn fetch_records(&self, params: &RecordQueryParams) -> AppResult<PagedResult<QualityRecord>> {
        self.record_list_calls.fetch_add(1, Ordering::SeqCst);
        let matched: Vec<QualityRecord> = self
            .records
            .lock()
            .iter()
            .filter(|r| matches_params(r, params))
            .cloned()
            .collect();
        let total = matched.len() as u64;
        let pagination = params.pagination();
        let items = matched
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.page_size as usize)
            .collect();
        Ok(PagedResult::new(items, total, &pagination))
    }

    async fn fetch_record(&self, id: QualityRecordId) -> AppResult<QualityRecord> {
        self.records
            .lock()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("质量记录不存在"))
    }

    async fn fetch_evaluation_required(&self) -> AppResult<Vec<QualityRecord>> {
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|r| r.evaluation_required)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl QualityRecordWriter for FakeBackend {
    async fn create_record(&self, new: &NewQualityRecord) -> AppResult<QualityRecord> {
        let mut records = self.records.lock();
        let id = records.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
        let record = QualityRecord {
            id: QualityRecordId(id),
            daily_production_id: new.daily_production_id,
            production_date: None,
            item_id: None,
            process_id: new.process_id,
            ok_quantity: new.ok_quantity,
            ng_quantity: new.ng_quantity,
            evaluation_required: false,
            expert_evaluation: None,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        id: QualityRecordId,
        counts: &QualityRecordCounts,
    ) -> AppResult<QualityRecord> {
        let mut records = self.records.lock();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found("质量记录不存在"))?;
        record.ok_quantity = counts.ok_quantity;
        record.ng_quantity = counts.ng_quantity;
        Ok(record.clone())
    }

    async fn delete_record(&self, id: QualityRecordId) -> AppResult<()> {
        self.records.lock().retain(|r| r.id != id);
        Ok(())
    }
}

#[async_trait]
impl EvaluationSink for FakeBackend {
    async fn submit_evaluation(&self, id: QualityRecordId, text: &str) -> AppResult<QualityRecord> {
        if self.fail_evaluation.load(Ordering::SeqCst) {
            return Err(AppError::external_service("评价服务暂时不可用"));
        }
        self.evaluations.lock().push((id, text.to_string()));
        let mut records = self.records.lock();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found("质量记录不存在"))?;
        record.expert_evaluation = Some(text.to_string());
        Ok(record.clone())
    }
}

#[async_trait]
impl ThresholdSource for FakeBackend {
    async fn fetch_system_codes(&self, code_group: Option<&str>) -> AppResult<Vec<SystemCode>> {
        self.threshold_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .system_codes
            .iter()
            .filter(|c| code_group.is_none_or(|g| c.code_group == g))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ItemRepository for FakeBackend {
    async fn list_items(&self) -> AppResult<Vec<Item>> {
        Ok(self.items.lock().clone())
    }

    async fn get_item(&self, id: ItemId) -> AppResult<Item> {
        self.item_detail_calls.fetch_add(1, Ordering::SeqCst);
        self.items
            .lock()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("部品不存在"))
    }

    async fn create_item(&self, new: &NewItem) -> AppResult<Item> {
        let mut items = self.items.lock();
        if items.iter().any(|i| i.code == new.code) {
            return Err(AppError::conflict("部品代码已存在"));
        }
        let created = Item {
            id: ItemId(items.len() as i64 + 1),
            code: new.code.clone(),
            name: new.name.clone(),
            description: new.description.clone(),
            category: new.category.clone(),
        };
        items.push(created.clone());
        Ok(created)
    }

    async fn update_item(&self, id: ItemId, update: &ItemUpdate) -> AppResult<Item> {
        let mut items = self.items.lock();
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::not_found("部品不存在"))?;
        item.name = update.name.clone();
        item.description = update.description.clone();
        item.category = update.category.clone();
        Ok(item.clone())
    }

    async fn delete_item(&self, id: ItemId) -> AppResult<()> {
        self.items.lock().retain(|i| i.id != id);
        Ok(())
    }
}

#[async_trait]
impl ProcessRepository for FakeBackend {
    async fn list_processes(&self) -> AppResult<Vec<Process>> {
        Ok(self.processes.clone())
    }

    async fn get_process(&self, id: ProcessId) -> AppResult<Process> {
        self.process_detail_calls.fetch_add(1, Ordering::SeqCst);
        self.processes
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("工序不存在"))
    }
}

#[async_trait]
impl DailyProductionRepository for FakeBackend {
    async fn list_daily_productions(
        &self,
        params: &DailyProductionQueryParams,
    ) -> AppResult<PagedResult<DailyProduction>> {
        let all = self.productions.lock().clone();
        Ok(PagedResult::new(all.clone(), all.len() as u64, &params.pagination()))
    }

    async fn get_daily_production(&self, id: DailyProductionId) -> AppResult<DailyProduction> {
        self.productions
            .lock()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("日产量不存在"))
    }

    async fn create_daily_production(&self, new: &NewDailyProduction) -> AppResult<DailyProduction> {
        let mut productions = self.productions.lock();
        let created = DailyProduction {
            id: DailyProductionId(productions.len() as i64 + 1),
            item_id: new.item_id,
            production_date: new.production_date,
            total_quantity: new.total_quantity,
        };
        productions.push(created.clone());
        Ok(created)
    }

    async fn update_daily_production(
        &self,
        id: DailyProductionId,
        update: &DailyProductionUpdate,
    ) -> AppResult<DailyProduction> {
        let mut productions = self.productions.lock();
        let production = productions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found("日产量不存在"))?;
        production.total_quantity = update.total_quantity;
        Ok(production.clone())
    }

    async fn delete_daily_production(&self, id: DailyProductionId) -> AppResult<()> {
        self.productions.lock().retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl StatisticsRepository for FakeBackend {
    async fn statistics_by_process(&self, _range: &DateRange) -> AppResult<Vec<ProcessStatistic>> {
        Ok(self.process_statistics.clone())
    }

    async fn statistics_by_item(&self, _range: &DateRange) -> AppResult<Vec<ItemStatistic>> {
        Ok(self.item_statistics.clone())
    }
}

#[async_trait]
impl AuthRepository for FakeBackend {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        if request.password != "secret" {
            return Err(AppError::unauthenticated("用户名或密码错误"));
        }
        Ok(LoginResponse {
            token: "token-123".to_string(),
            user: SessionUser {
                id: UserId(7),
                username: request.username.clone(),
                role: UserRole::Manager,
            },
        })
    }

    async fn signup(&self, _request: &SignupRequest) -> AppResult<()> {
        Ok(())
    }
}

// ============ 记录失效操作的缓存 ============

pub struct RecordingCache {
    inner: MokaCachePort,
    pub deleted_keys: Mutex<Vec<String>>,
    pub deleted_prefixes: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self {
            inner: MokaCachePort::new(1_000, Duration::from_secs(600)),
            deleted_keys: Mutex::new(Vec::new()),
            deleted_prefixes: Mutex::new(Vec::new()),
        }
    }

    pub fn reset_log(&self) {
        self.deleted_keys.lock().clear();
        self.deleted_prefixes.lock().clear();
    }
}

#[async_trait]
impl CachePort for RecordingCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.deleted_keys.lock().push(key.to_string());
        self.inner.delete(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<()> {
        self.deleted_prefixes.lock().push(prefix.to_string());
        self.inner.delete_prefix(prefix).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }
}

// ============ 组装 ============

pub fn repositories(backend: Arc<FakeBackend>) -> Repositories {
    Repositories {
        records: backend.clone(),
        record_writer: backend.clone(),
        evaluations: backend.clone(),
        thresholds: backend.clone(),
        items: backend.clone(),
        processes: backend.clone(),
        productions: backend.clone(),
        statistics: backend.clone(),
        auth: backend,
    }
}

pub fn session_as(role: Option<UserRole>) -> SharedSession {
    let mut session = SessionContext::new();
    if let Some(role) = role {
        session.sign_in(
            SessionUser {
                id: UserId(1),
                username: "inspector".to_string(),
                role,
            },
            SecretString::new("token-abc".to_string()),
        );
    }
    session.shared()
}

pub struct TestContext {
    pub handler: ServiceHandler,
    pub backend: Arc<FakeBackend>,
    pub cache: Arc<RecordingCache>,
}

pub fn context(backend: FakeBackend, role: Option<UserRole>) -> TestContext {
    context_with(backend, role, |repos| repos)
}

/// 可替换部分数据来源
pub fn context_with(
    backend: FakeBackend,
    role: Option<UserRole>,
    customize: impl FnOnce(Repositories) -> Repositories,
) -> TestContext {
    let backend = Arc::new(backend);
    let cache = Arc::new(RecordingCache::new());
    let handler = ServiceHandler::new(
        customize(repositories(backend.clone())),
        QueryCache::new(cache.clone()),
        session_as(role),
    );
    TestContext {
        handler,
        backend,
        cache,
    }
}
