//! Nacos 配置客户端接口
//!
//! 连接管理、重试和 RPC 由具体客户端负责, 这里只约定适配器需要的最小能力。

use async_trait::async_trait;
use infrastructure_common::{RemoteConfigError, RemoteConfigResult};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// 客户端配置环境变量默认前缀
pub const DEFAULT_ENV_PREFIX: &str = "NACOS_CLIENT";

/// 服务端连接参数
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerConfig {
    /// 协议
    pub scheme: String,
    /// 主机名或 IP
    pub host: String,
    /// 端口
    pub port: u64,
    /// 上下文路径
    pub context_path: String,
}

impl ServerConfig {
    /// 服务端地址, 用于日志
    pub fn address(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host_port(), self.context_path)
    }

    /// `host:port`, IPv6 主机加方括号
    pub fn host_port(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// 客户端配置
///
/// 默认值与适配器一直使用的固定参数一致, 可通过环境变量覆盖。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 命名空间
    pub namespace_id: String,
    /// 请求超时（毫秒）
    pub timeout_ms: u64,
    /// 启动时不加载本地缓存
    pub not_load_cache_at_start: bool,
    /// 日志目录
    pub log_dir: PathBuf,
    /// 缓存目录
    pub cache_dir: PathBuf,
    /// 日志轮转周期
    pub rotate_time: String,
    /// 日志保留份数
    pub max_age: u32,
    /// 日志级别
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            namespace_id: String::new(),
            timeout_ms: 5000,
            not_load_cache_at_start: true,
            log_dir: PathBuf::from("/tmp/nacos/log"),
            cache_dir: PathBuf::from("/tmp/nacos/cache"),
            rotate_time: "1h".to_string(),
            max_age: 3,
            log_level: "debug".to_string(),
        }
    }
}

impl ClientConfig {
    /// 从 `NACOS_CLIENT_*` 环境变量加载, 未设置的字段取默认值
    pub fn from_env() -> RemoteConfigResult<Self> {
        Self::from_env_prefix(DEFAULT_ENV_PREFIX)
    }

    /// 从指定前缀的环境变量加载, 例如 `{prefix}_TIMEOUT_MS`
    pub fn from_env_prefix(prefix: &str) -> RemoteConfigResult<Self> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(prefix).try_parsing(true))
            .build()
            .and_then(|settings| settings.try_deserialize::<Self>())
            .map_err(|e| RemoteConfigError::InvalidClientConfig {
                message: e.to_string(),
            })
    }

    /// 设置命名空间
    pub fn with_namespace(mut self, namespace_id: impl Into<String>) -> Self {
        self.namespace_id = namespace_id.into();
        self
    }

    /// 请求超时
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// 配置变更内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChange {
    /// 命名空间
    pub namespace: String,
    /// 分组
    pub group: String,
    /// 配置 ID
    pub data_id: String,
    /// 新的配置内容
    pub content: String,
}

/// 配置变更回调
///
/// 由客户端在自己的线程上调用, 实现不应阻塞。
pub type ChangeListener = Arc<dyn Fn(ConfigChange) + Send + Sync>;

/// 配置客户端 trait
///
/// 实现必须可以被多个任务并发使用。
#[async_trait]
pub trait ConfigClient: Send + Sync {
    /// 获取配置内容
    async fn fetch_config(&self, data_id: &str, group: &str) -> RemoteConfigResult<String>;

    /// 注册配置变更回调
    async fn listen_config(
        &self,
        data_id: &str,
        group: &str,
        listener: ChangeListener,
    ) -> RemoteConfigResult<()>;

    /// 取消配置监听
    async fn cancel_listen(&self, data_id: &str, group: &str) -> RemoteConfigResult<()>;
}

/// 配置客户端连接器 trait
#[async_trait]
pub trait ConfigClientConnector: Send + Sync {
    /// 按服务端列表和客户端配置创建客户端
    async fn connect(
        &self,
        servers: Vec<ServerConfig>,
        client_config: ClientConfig,
    ) -> RemoteConfigResult<Arc<dyn ConfigClient>>;
}
