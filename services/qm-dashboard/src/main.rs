use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use common::dates::{DateRange, YearMonth};
use common::types::Pagination;
use config::AppConfig;
use errors::{AppError, FieldErrors};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use qm_dashboard::application::forms::{DailyProductionForm, EvaluationDialog, QualityRecordForm};
use qm_dashboard::application::views::{
    FilterMode, ProductionFilter, RecordFilter, RecordSortColumn, SortDirection, SortState,
    StatisticSortColumn, ViewState,
};
use qm_dashboard::application::{
    CreateItemCommand, DailyProductionViewQuery, DeleteDailyProductionCommand, DeleteItemCommand,
    DeleteQualityRecordCommand, GetQualityRecordQuery, LoginCommand, QualityRecordViewQuery,
    Repositories, ServiceHandler, SessionContext, SignupCommand, StatisticsQuery,
    UpdateItemCommand,
};
use qm_dashboard::domain::entities::UserRole;
use qm_dashboard::domain::value_objects::{DailyProductionId, ItemId, ProcessId, QualityRecordId};
use qm_dashboard::infrastructure::cache::{MokaCachePort, QueryCache, QueryCacheConfig};
use qm_dashboard::infrastructure::http::{
    ApiClient, HttpAuthRepository, HttpDailyProductionRepository, HttpItemRepository,
    HttpProcessRepository, HttpQualityRecordRepository, HttpStatisticsRepository,
    HttpSystemCodeRepository,
};
use qm_dashboard::presentation;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config_dir).context("failed to load configuration")?;
    telemetry::init(&config.telemetry.log_level, config.telemetry.json);
    let metrics = if config.telemetry.metrics {
        Some(telemetry::init_metrics().context("failed to install metrics recorder")?)
    } else {
        None
    };

    let session_file = config.session.file.clone();
    let session = SessionContext::load(&session_file)
        .map_err(|e| anyhow!(e.user_message()))?
        .shared();
    let handler = build_handler(&config, session.clone())?;

    let outcome = run(&handler, &config, cli.command, cli.json).await;

    // 401 也会清空会话，无论成功与否都同步到文件
    session
        .read()
        .save(&session_file)
        .map_err(|e| anyhow!(e.user_message()))?;
    debug!("Session file synced: {}", session_file.display());

    if let Some(handle) = metrics {
        eprint!("{}", handle.render());
    }

    outcome
}

fn build_handler(
    config: &AppConfig,
    session: qm_dashboard::application::SharedSession,
) -> Result<ServiceHandler> {
    let client = Arc::new(
        ApiClient::new(&config.api, session.clone()).map_err(|e| anyhow!(e.user_message()))?,
    );
    let records = Arc::new(HttpQualityRecordRepository::new(client.clone()));
    let repos = Repositories {
        records: records.clone(),
        record_writer: records.clone(),
        evaluations: records,
        thresholds: Arc::new(HttpSystemCodeRepository::new(client.clone())),
        items: Arc::new(HttpItemRepository::new(client.clone())),
        processes: Arc::new(HttpProcessRepository::new(client.clone())),
        productions: Arc::new(HttpDailyProductionRepository::new(client.clone())),
        statistics: Arc::new(HttpStatisticsRepository::new(client.clone())),
        auth: Arc::new(HttpAuthRepository::new(client)),
    };

    let cache_config = QueryCacheConfig::from(&config.cache);
    let max_ttl = Duration::from_secs(
        config
            .cache
            .records_ttl_secs
            .max(config.cache.reference_ttl_secs)
            .max(config.cache.system_codes_ttl_secs),
    );
    let port = Arc::new(MokaCachePort::new(config.cache.max_capacity, max_ttl));
    let cache = QueryCache::new(port).with_config(cache_config);

    Ok(ServiceHandler::new(repos, cache, session))
}

#[derive(Parser)]
#[command(name = "qm", about = "Quality dashboard CLI: NG rates, evaluations and data entry", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[arg(long, global = true, default_value = "config", help = "Directory holding default.toml and {APP_ENV}.toml")]
    config_dir: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login(LoginArgs),
    /// Register a new account
    Signup(SignupArgs),
    /// Clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List quality records
    Records(RecordsArgs),
    /// Manage a single quality record
    #[command(subcommand)]
    Record(RecordCommands),
    /// Records flagged by the backend for expert evaluation
    EvaluationRequired,
    /// Submit an expert evaluation
    Evaluate(EvaluateArgs),
    /// Daily production batches
    #[command(subcommand)]
    Production(ProductionCommands),
    /// Parts (lists when no subcommand is given)
    Items {
        #[command(subcommand)]
        command: Option<ItemCommands>,
    },
    /// Inspection processes (lists when no subcommand is given)
    Processes {
        #[command(subcommand)]
        command: Option<ProcessCommands>,
    },
    /// Aggregate statistics
    Stats(StatsArgs),
    /// NG rate per part as a bar chart
    Chart(RangeArgs),
    /// Industry-average NG rate threshold
    Threshold,
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long, help = "Username; defaults to auth.username from config")]
    username: Option<String>,
    #[arg(long, help = "Password; defaults to auth.password from config")]
    password: Option<String>,
}

#[derive(Args)]
struct SignupArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    #[arg(long, value_enum, default_value_t = RoleArg::User)]
    role: RoleArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    User,
    Manager,
    Admin,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::User => UserRole::User,
            RoleArg::Manager => UserRole::Manager,
            RoleArg::Admin => UserRole::Admin,
        }
    }
}

#[derive(Args, Default)]
struct RangeArgs {
    #[arg(long, value_parser = parse_date, help = "Start date (yyyy-MM-dd), inclusive")]
    from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date, help = "End date (yyyy-MM-dd), inclusive")]
    to: Option<NaiveDate>,
}

impl RangeArgs {
    fn range(&self) -> DateRange {
        DateRange::new(self.from, self.to)
    }
}

#[derive(Args)]
struct RecordsArgs {
    #[arg(long, help = "Part id")]
    item: Option<i64>,
    #[command(flatten)]
    range: RangeArgs,
    #[arg(long, conflicts_with_all = ["from", "to"], help = "Month (yyyy-MM)")]
    month: Option<YearMonth>,
    #[arg(long, action = ArgAction::SetTrue, help = "Only records that require evaluation")]
    evaluation_only: bool,
    #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
    page: u32,
    #[arg(long, default_value_t = 10)]
    size: u32,
    #[arg(long, value_enum)]
    sort: Option<RecordSortArg>,
    #[arg(long, action = ArgAction::SetTrue, requires = "sort", help = "Sort ascending instead of descending")]
    asc: bool,
    #[arg(long, action = ArgAction::SetTrue, help = "Let the backend apply part and date filters with paging")]
    server: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordSortArg {
    Date,
    Item,
    Process,
    Ok,
    Ng,
    Rate,
    Eval,
}

impl From<RecordSortArg> for RecordSortColumn {
    fn from(arg: RecordSortArg) -> Self {
        match arg {
            RecordSortArg::Date => RecordSortColumn::ProductionDate,
            RecordSortArg::Item => RecordSortColumn::ItemCode,
            RecordSortArg::Process => RecordSortColumn::Process,
            RecordSortArg::Ok => RecordSortColumn::OkQuantity,
            RecordSortArg::Ng => RecordSortColumn::NgQuantity,
            RecordSortArg::Rate => RecordSortColumn::NgRate,
            RecordSortArg::Eval => RecordSortColumn::EvaluationRequired,
        }
    }
}

fn direction(asc: bool) -> SortDirection {
    if asc { SortDirection::Asc } else { SortDirection::Desc }
}

#[derive(Subcommand)]
enum RecordCommands {
    Show {
        id: i64,
    },
    Create {
        #[arg(long, help = "Daily production batch id")]
        production: String,
        #[arg(long, help = "Process id")]
        process: String,
        #[arg(long)]
        ok: String,
        #[arg(long)]
        ng: String,
    },
    /// Amend counts; batch and process stay fixed
    Update {
        id: i64,
        #[arg(long)]
        ok: String,
        #[arg(long)]
        ng: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args)]
struct EvaluateArgs {
    id: i64,
    #[arg(long, help = "Evaluation text")]
    text: String,
}

#[derive(Subcommand)]
enum ProductionCommands {
    List {
        #[arg(long)]
        item: Option<i64>,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
    Create {
        #[arg(long)]
        item: String,
        #[arg(long, help = "Production date (yyyy-MM-dd)")]
        date: String,
        #[arg(long)]
        total: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        total: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum ItemCommands {
    List,
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum ProcessCommands {
    List,
    Show {
        id: i64,
    },
}

#[derive(Args)]
struct StatsArgs {
    #[arg(value_enum)]
    by: StatsBy,
    #[command(flatten)]
    range: RangeArgs,
    #[arg(long, value_enum)]
    sort: Option<StatsSortArg>,
    #[arg(long, action = ArgAction::SetTrue, requires = "sort")]
    asc: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatsBy {
    Process,
    Item,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatsSortArg {
    Total,
    Ng,
    Rate,
}

impl From<StatsSortArg> for StatisticSortColumn {
    fn from(arg: StatsSortArg) -> Self {
        match arg {
            StatsSortArg::Total => StatisticSortColumn::TotalQuantity,
            StatsSortArg::Ng => StatisticSortColumn::TotalNgQuantity,
            StatsSortArg::Rate => StatisticSortColumn::NgRate,
        }
    }
}

async fn run(handler: &ServiceHandler, config: &AppConfig, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Login(args) => handle_login(handler, config, args, json).await,
        Commands::Signup(args) => {
            let cmd = SignupCommand {
                username: args.username,
                password: SecretString::new(args.password),
                role: args.role.into(),
            };
            handler.signup(cmd).await.map_err(report)?;
            println!("Account created. Sign in with `qm login`.");
            Ok(())
        }
        Commands::Logout => {
            handler.logout().await;
            println!("Signed out; session file cleared.");
            Ok(())
        }
        Commands::Whoami => {
            match handler.current_user() {
                Some(user) if json => print_json(&user)?,
                Some(user) => println!("{} (id {}, role {})", user.username, user.id, user.role),
                None => println!("Not signed in."),
            }
            Ok(())
        }
        Commands::Records(args) => handle_records(handler, args, json).await,
        Commands::Record(command) => handle_record_command(handler, command, json).await,
        Commands::EvaluationRequired => {
            let state = ViewState::from_list(handler.evaluation_required_view().await);
            if let Some(message) = state.error() {
                return Err(anyhow!(message.to_string()));
            }
            if json {
                print_json(&state.items())?;
            } else {
                print!("{}", presentation::render_evaluation_queue(state.items()));
            }
            Ok(())
        }
        Commands::Evaluate(args) => handle_evaluate(handler, args, json).await,
        Commands::Production(command) => handle_production_command(handler, command, json).await,
        Commands::Items { command } => {
            handle_item_command(handler, command.unwrap_or(ItemCommands::List), json).await
        }
        Commands::Processes { command } => {
            handle_process_command(handler, command.unwrap_or(ProcessCommands::List), json).await
        }
        Commands::Stats(args) => handle_stats(handler, args, json).await,
        Commands::Chart(args) => {
            let chart = handler.ng_rate_chart(&args.range()).await.map_err(report)?;
            if json {
                print_json(&chart.bars)?;
            } else {
                print!("{}", presentation::render_chart(&chart));
            }
            Ok(())
        }
        Commands::Threshold => {
            let threshold = handler.industry_threshold().await;
            if json {
                print_json(&serde_json::json!({ "threshold": threshold.percent() }))?;
            } else {
                println!("Industry-average NG rate threshold: {:.2}%", threshold.percent());
            }
            Ok(())
        }
    }
}

async fn handle_login(handler: &ServiceHandler, config: &AppConfig, args: LoginArgs, json: bool) -> Result<()> {
    let username = args
        .username
        .or_else(|| config.auth.username.clone())
        .unwrap_or_default();
    let password = match args.password {
        Some(password) => SecretString::new(password),
        None => config
            .auth
            .password
            .as_ref()
            .map(|p| SecretString::new(p.expose_secret().clone()))
            .unwrap_or_else(|| SecretString::new(String::new())),
    };

    let user = handler
        .login(LoginCommand { username, password })
        .await
        .map_err(report)?;

    if json {
        print_json(&user)?;
    } else {
        println!("Signed in as {} (role {})", user.username, user.role);
        println!("Session saved to: {}", config.session.file.display());
    }
    Ok(())
}

async fn handle_records(handler: &ServiceHandler, args: RecordsArgs, json: bool) -> Result<()> {
    let filter = RecordFilter::new()
        .with_item(args.item.map(ItemId))
        .with_date_range(args.range.range())
        .with_month(args.month)
        .with_evaluation_required_only(args.evaluation_only);
    let sort = match args.sort {
        Some(column) => SortState::by(column.into(), direction(args.asc)),
        None => SortState::default(),
    };
    let mode = if args.server {
        FilterMode::ServerApplied
    } else {
        FilterMode::Local
    };
    let query = QualityRecordViewQuery::new(filter)
        .with_mode(mode)
        .with_sort(sort)
        .with_pagination(Pagination::new(args.page.saturating_sub(1), args.size));

    let view = handler.quality_record_view(&query).await.map_err(report)?;
    if json {
        print_json(&view.page)?;
        if let Some(notice) = presentation::incomplete_notice(&view) {
            eprintln!("{}", notice);
        }
    } else {
        print!("{}", presentation::render_records(&view));
    }
    Ok(())
}

async fn handle_record_command(handler: &ServiceHandler, command: RecordCommands, json: bool) -> Result<()> {
    match command {
        RecordCommands::Show { id } => {
            let record = handler
                .get_record(GetQualityRecordQuery {
                    record_id: QualityRecordId(id),
                })
                .await
                .map_err(report)?;
            if json {
                print_json(&record)?;
            } else {
                println!(
                    "Record {}: OK {} / NG {} -> NG rate {}%",
                    record.id,
                    record.ok_quantity,
                    record.ng_quantity,
                    record.ng_rate()
                );
                println!(
                    "Evaluation required: {}",
                    if record.evaluation_required { "yes" } else { "no" }
                );
                if let Some(evaluation) = &record.expert_evaluation {
                    println!("Expert evaluation: {}", evaluation);
                }
            }
        }
        RecordCommands::Create {
            production,
            process,
            ok,
            ng,
        } => {
            let mut form = QualityRecordForm::for_create();
            form.daily_production_id = production;
            form.process_id = process;
            form.ok_quantity = ok;
            form.ng_quantity = ng;
            let record = form
                .submit(handler)
                .await
                .ok_or_else(|| form_failure(form.errors()))?;
            if json {
                print_json(&record)?;
            } else {
                println!("Created quality record {} (NG rate {}%)", record.id, record.ng_rate());
            }
        }
        RecordCommands::Update { id, ok, ng } => {
            let current = handler
                .get_record(GetQualityRecordQuery {
                    record_id: QualityRecordId(id),
                })
                .await
                .map_err(report)?;
            let mut form = QualityRecordForm::for_edit(&current);
            form.ok_quantity = ok;
            form.ng_quantity = ng;
            let record = form
                .submit(handler)
                .await
                .ok_or_else(|| form_failure(form.errors()))?;
            if json {
                print_json(&record)?;
            } else {
                println!("Updated quality record {} (NG rate {}%)", record.id, record.ng_rate());
            }
        }
        RecordCommands::Delete { id } => {
            handler
                .delete_record(DeleteQualityRecordCommand {
                    record_id: QualityRecordId(id),
                })
                .await
                .map_err(report)?;
            println!("Deleted quality record {}", id);
        }
    }
    Ok(())
}

async fn handle_evaluate(handler: &ServiceHandler, args: EvaluateArgs, json: bool) -> Result<()> {
    let record = handler
        .get_record(GetQualityRecordQuery {
            record_id: QualityRecordId(args.id),
        })
        .await
        .map_err(report)?;

    let mut dialog = EvaluationDialog::new();
    dialog.open(&record);
    dialog.set_text(args.text);

    match dialog.submit(handler).await {
        Some(record) if json => print_json(&record)?,
        Some(record) => println!("Evaluation saved for record {}", record.id),
        None => {
            let message = dialog
                .field_error()
                .or(dialog.submit_error())
                .unwrap_or("评价提交失败")
                .to_string();
            return Err(anyhow!(message));
        }
    }
    Ok(())
}

async fn handle_production_command(
    handler: &ServiceHandler,
    command: ProductionCommands,
    json: bool,
) -> Result<()> {
    match command {
        ProductionCommands::List {
            item,
            range,
            page,
            size,
        } => {
            let query = DailyProductionViewQuery {
                filter: ProductionFilter {
                    item_id: item.map(ItemId),
                    date_range: range.range(),
                },
                pagination: Pagination::new(page.saturating_sub(1), size),
                ..DailyProductionViewQuery::default()
            };
            let rows = handler.daily_production_view(&query).await.map_err(report)?;
            if json {
                print_json(&rows)?;
            } else {
                print!("{}", presentation::render_productions(&rows));
            }
        }
        ProductionCommands::Create { item, date, total } => {
            let mut form = DailyProductionForm::for_create();
            form.item_id = item;
            form.production_date = date;
            form.total_quantity = total;
            let production = form
                .submit(handler)
                .await
                .ok_or_else(|| form_failure(form.errors()))?;
            if json {
                print_json(&production)?;
            } else {
                println!(
                    "Created daily production {} ({} on {})",
                    production.id, production.total_quantity, production.production_date
                );
            }
        }
        ProductionCommands::Update { id, total } => {
            let current = handler
                .get_daily_production(DailyProductionId(id))
                .await
                .map_err(report)?;
            let mut form = DailyProductionForm::for_edit(&current);
            form.total_quantity = total;
            let production = form
                .submit(handler)
                .await
                .ok_or_else(|| form_failure(form.errors()))?;
            if json {
                print_json(&production)?;
            } else {
                println!(
                    "Updated daily production {} (total {})",
                    production.id, production.total_quantity
                );
            }
        }
        ProductionCommands::Delete { id } => {
            handler
                .delete_daily_production(DeleteDailyProductionCommand {
                    production_id: DailyProductionId(id),
                })
                .await
                .map_err(report)?;
            println!("Deleted daily production {}", id);
        }
    }
    Ok(())
}

async fn handle_item_command(handler: &ServiceHandler, command: ItemCommands, json: bool) -> Result<()> {
    match command {
        ItemCommands::List => {
            let items = handler.list_items().await.map_err(report)?;
            if json {
                print_json(&items)?;
            } else {
                print!("{}", presentation::render_items(&items));
            }
        }
        ItemCommands::Show { id } => {
            let item = handler.get_item(ItemId(id)).await.map_err(report)?;
            if json {
                print_json(&item)?;
            } else {
                print!("{}", presentation::render_item_detail(&item));
            }
        }
        ItemCommands::Create {
            code,
            name,
            description,
            category,
        } => {
            let item = handler
                .create_item(CreateItemCommand {
                    code,
                    name,
                    description,
                    category,
                })
                .await
                .map_err(report)?;
            if json {
                print_json(&item)?;
            } else {
                println!("Created item {} ({})", item.id, item.label());
            }
        }
        ItemCommands::Update {
            id,
            name,
            description,
            category,
        } => {
            let item = handler
                .update_item(UpdateItemCommand {
                    item_id: ItemId(id),
                    name,
                    description,
                    category,
                })
                .await
                .map_err(report)?;
            if json {
                print_json(&item)?;
            } else {
                println!("Updated item {} ({})", item.id, item.label());
            }
        }
        ItemCommands::Delete { id } => {
            handler
                .delete_item(DeleteItemCommand { item_id: ItemId(id) })
                .await
                .map_err(report)?;
            println!("Deleted item {}", id);
        }
    }
    Ok(())
}

async fn handle_process_command(handler: &ServiceHandler, command: ProcessCommands, json: bool) -> Result<()> {
    match command {
        ProcessCommands::List => {
            let processes = handler.list_processes().await.map_err(report)?;
            if json {
                print_json(&processes)?;
            } else {
                print!("{}", presentation::render_processes(&processes));
            }
        }
        ProcessCommands::Show { id } => {
            let process = handler.get_process(ProcessId(id)).await.map_err(report)?;
            if json {
                print_json(&process)?;
            } else {
                print!("{}", presentation::render_process_detail(&process));
            }
        }
    }
    Ok(())
}

async fn handle_stats(handler: &ServiceHandler, args: StatsArgs, json: bool) -> Result<()> {
    let sort = match args.sort {
        Some(column) => SortState::by(column.into(), direction(args.asc)),
        None => SortState::default(),
    };
    let query = StatisticsQuery::new(args.range.range()).with_sort(sort);
    match args.by {
        StatsBy::Process => {
            let view = handler.process_statistics_view(&query).await.map_err(report)?;
            if json {
                print_json(&view.rows)?;
            } else {
                print!("{}", presentation::render_statistics(&view));
            }
        }
        StatsBy::Item => {
            let view = handler.item_statistics_view(&query).await.map_err(report)?;
            if json {
                print_json(&view.rows)?;
            } else {
                print!("{}", presentation::render_statistics(&view));
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 字段错误逐条列出，其它错误只给出一条消息
fn report(error: AppError) -> anyhow::Error {
    match error.field_errors() {
        Some(fields) => form_failure(fields),
        None => anyhow!(error.user_message()),
    }
}

fn form_failure(errors: &FieldErrors) -> anyhow::Error {
    for (field, message) in errors.iter() {
        eprintln!("  {}: {}", field, message);
    }
    anyhow!("输入有误，请修改后重试")
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected yyyy-MM-dd", raw))
}
