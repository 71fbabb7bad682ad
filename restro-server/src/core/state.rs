use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::core::{Config, Result, ServerError, StoreBackend};
use crate::db::{DbService, MemoryStore, QueryContext, RecordStore, SqliteStore, Store};
use crate::views::{InvoiceViewBuilder, OrderViewPipeline};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | store | 记录存储 (读写) |
/// | pipeline | 订单汇总视图 |
/// | invoices | 发票视图 |
/// | shutdown | 关闭信号，取消所有进行中的计算 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub pipeline: OrderViewPipeline,
    pub invoices: InvoiceViewBuilder,
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// 根据配置初始化存储和视图引擎
    pub async fn initialize(config: &Config) -> Result<Self> {
        match config.store_backend {
            StoreBackend::Sqlite => {
                if let Some(parent) = Path::new(&config.database_path).parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent)?;
                }
                let db = DbService::new(&config.database_path)
                    .await
                    .map_err(|e| ServerError::Storage(e.message))?;
                Ok(Self::from_store(config.clone(), Arc::new(SqliteStore::new(db))))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store, data is lost on shutdown");
                Ok(Self::from_store(config.clone(), Arc::new(MemoryStore::new())))
            }
        }
    }

    /// Wire the view engine over an existing store
    pub fn from_store<S: Store + 'static>(config: Config, store: Arc<S>) -> Self {
        let reader: Arc<dyn RecordStore> = store.clone();
        let pipeline = OrderViewPipeline::new(reader.clone(), config.amount_policy);
        let invoices = InvoiceViewBuilder::new(reader, pipeline.clone(), config.grouping_policy);

        tracing::info!(
            backend = store.backend(),
            amount_policy = %config.amount_policy,
            grouping_policy = %config.grouping_policy,
            "Server state initialized"
        );

        Self {
            config,
            store,
            pipeline,
            invoices,
            shutdown: CancellationToken::new(),
        }
    }

    /// Context for one request: canceled on shutdown, expires after
    /// `REQUEST_TIMEOUT_MS`
    pub fn query_context(&self) -> QueryContext {
        QueryContext::with_timeout(
            self.shutdown.child_token(),
            Duration::from_millis(self.config.request_timeout_ms),
        )
    }
}
