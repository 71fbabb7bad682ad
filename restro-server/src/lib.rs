//! Restro Server - 餐厅订单视图服务
//!
//! # 架构概述
//!
//! - **存储** (`db`): 记录存储抽象 (SQLite / 内存)，以及创建规则 (repository)
//! - **视图** (`views`): 订单明细关联汇总、发票视图
//! - **金额** (`money`): 基于 rust_decimal 的金额计算
//! - **HTTP API** (`api`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! restro-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── db/            # 存储、查询上下文、repository
//! ├── views/         # 订单汇总和发票视图
//! ├── money/         # 金额计算
//! ├── api/           # HTTP 路由和处理器
//! ├── middleware/    # 请求日志
//! └── utils/         # 错误类型、日志
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod middleware;
pub mod money;
pub mod utils;
pub mod views;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use views::{AmountPolicy, GroupingPolicy, InvoiceViewBuilder, OrderViewPipeline, ViewError};

// Re-export unified error types from shared
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env、创建工作目录、初始化日志
pub fn setup_environment() -> std::io::Result<Config> {
    // .env 不存在时忽略
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        Some(&config.log_dir),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____            __
   / __ \___  _____/ /__________
  / /_/ / _ \/ ___/ __/ ___/ __ \
 / _, _/  __(__  ) /_/ /  / /_/ /
/_/ |_|\___/____/\__/_/   \____/
    "#
    );
}
