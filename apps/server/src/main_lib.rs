use std::sync::Arc;

use propdesk_core::{
    accounts::{AccountService, AccountServiceTrait},
    backup::{BackupService, BackupServiceTrait},
    events::DomainEventSink,
    firms::{FirmService, FirmServiceTrait},
    goals::{GoalService, GoalServiceTrait},
    payouts::{PayoutService, PayoutServiceTrait},
    settings::{SettingsService, SettingsServiceTrait},
    store::RecordStore,
    tags::{TagService, TagServiceTrait},
    trades::{TradeService, TradeServiceTrait},
};
use propdesk_storage_sqlite::{
    db::{self, write_actor},
    DocumentRepository, LocalBackupProvider,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::Config,
    domain_events::{QueueWorkerDeps, WebDomainEventSink},
    events::EventBus,
};

pub struct AppState {
    pub store: Arc<RecordStore>,
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub trade_service: Arc<dyn TradeServiceTrait>,
    pub payout_service: Arc<dyn PayoutServiceTrait>,
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub firm_service: Arc<dyn FirmServiceTrait>,
    pub tag_service: Arc<dyn TagServiceTrait>,
    pub settings_service: Arc<dyn SettingsServiceTrait>,
    pub backup_service: Arc<dyn BackupServiceTrait>,
    pub event_bus: EventBus,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("PD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let repository = Arc::new(DocumentRepository::new(pool.clone(), writer));
    let store = Arc::new(RecordStore::open(repository)?);

    // Phase 1: the sink buffers events until the worker starts.
    let domain_event_sink = Arc::new(WebDomainEventSink::new());
    store.subscribe(domain_event_sink.clone() as Arc<dyn DomainEventSink>);

    let account_service = Arc::new(AccountService::new(store.clone()));
    let trade_service = Arc::new(TradeService::new(store.clone()));
    let payout_service = Arc::new(PayoutService::new(store.clone()));
    let goal_service: Arc<dyn GoalServiceTrait> = Arc::new(GoalService::new(store.clone()));
    let firm_service = Arc::new(FirmService::new(store.clone()));
    let tag_service = Arc::new(TagService::new(store.clone()));
    let settings_service = Arc::new(SettingsService::new(store.clone()));

    tracing::info!("Backups go to {}", config.backup_dir);
    let backup_provider = Arc::new(LocalBackupProvider::new(&config.backup_dir));
    let backup_service = Arc::new(BackupService::new(store.clone(), backup_provider));

    let event_bus = EventBus::new(256);

    // Phase 2: start the worker now that the goal service exists.
    domain_event_sink.start_worker(QueueWorkerDeps {
        goal_service: goal_service.clone(),
        event_bus: event_bus.clone(),
    });

    Ok(Arc::new(AppState {
        store,
        account_service,
        trade_service,
        payout_service,
        goal_service,
        firm_service,
        tag_service,
        settings_service,
        backup_service,
        event_bus,
        db_path,
    }))
}
