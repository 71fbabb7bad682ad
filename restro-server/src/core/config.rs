use std::fmt;
use std::str::FromStr;

use crate::views::{AmountPolicy, GroupingPolicy};

/// Record store backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 8000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | STORE_BACKEND | sqlite | sqlite / memory |
/// | DATABASE_PATH | {WORK_DIR}/restro.db | SQLite 文件 |
/// | REQUEST_TIMEOUT_MS | 30000 | 视图计算超时(毫秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | LOG_DIR | {WORK_DIR}/logs | 滚动日志目录 (存在时启用) |
/// | AMOUNT_POLICY | unit_price | unit_price / extended |
/// | GROUPING_POLICY | first | first / reject |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/restro HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub store_backend: StoreBackend,
    pub database_path: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: String,
    pub amount_policy: AmountPolicy,
    pub grouping_policy: GroupingPolicy,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let work_dir = lookup("WORK_DIR").unwrap_or_else(|| "./data".into());
        let database_path =
            lookup("DATABASE_PATH").unwrap_or_else(|| format!("{work_dir}/restro.db"));
        let log_dir = lookup("LOG_DIR").unwrap_or_else(|| format!("{work_dir}/logs"));

        Self {
            http_port: parse_or(&lookup, "HTTP_PORT", 8000),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            store_backend: parse_or(&lookup, "STORE_BACKEND", StoreBackend::default()),
            database_path,
            request_timeout_ms: parse_or(&lookup, "REQUEST_TIMEOUT_MS", 30000),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parse_or(&lookup, "LOG_JSON", false),
            log_dir,
            amount_policy: parse_or(&lookup, "AMOUNT_POLICY", AmountPolicy::default()),
            grouping_policy: parse_or(&lookup, "GROUPING_POLICY", GroupingPolicy::default()),
            work_dir,
        }
    }

    /// In-memory configuration for tests and demos
    pub fn in_memory() -> Self {
        let mut config = Self::from_lookup(|_| None);
        config.store_backend = StoreBackend::Memory;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unrecognized configuration value, using default");
            default
        }),
        None => default,
    }
}
