//! 错误类型定义

use thiserror::Error;

/// 远程配置错误类型
#[derive(Error, Debug)]
pub enum RemoteConfigError {
    #[error("远程配置地址无效: {endpoint}, 原因: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("远程配置地址端口无效: {endpoint}")]
    InvalidPort { endpoint: String },

    #[error("远程配置地址未指定端口, 协议 {scheme} 没有默认端口: {endpoint}")]
    MissingPort { endpoint: String, scheme: String },

    #[error("不支持的配置管理器: {provider}")]
    UnsupportedProvider { provider: String },

    #[error("不支持的远程配置提供者: {provider}")]
    UnsupportedRemoteProvider { provider: String },

    #[error("连接配置中心失败: {message}")]
    BackendConnectError { message: String },

    #[error("获取配置失败: dataId={data_id}, group={group}, 原因: {message}")]
    BackendFetchError {
        data_id: String,
        group: String,
        message: String,
    },

    #[error("监听配置失败: dataId={data_id}, group={group}, 原因: {message}")]
    BackendListenError {
        data_id: String,
        group: String,
        message: String,
    },

    #[error("客户端配置无效: {message}")]
    InvalidClientConfig { message: String },

    #[error("配置读取失败: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置监听任务异常退出: {message}")]
    WatchTaskFailed { message: String },
}

impl RemoteConfigError {
    /// 创建地址无效错误
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// 创建配置管理器不支持错误
    pub fn unsupported_provider(provider: impl Into<String>) -> Self {
        Self::UnsupportedProvider {
            provider: provider.into(),
        }
    }

    /// 创建连接失败错误
    pub fn connect(message: impl Into<String>) -> Self {
        Self::BackendConnectError {
            message: message.into(),
        }
    }

    /// 创建获取配置失败错误
    pub fn fetch(
        data_id: impl Into<String>,
        group: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::BackendFetchError {
            data_id: data_id.into(),
            group: group.into(),
            message: message.into(),
        }
    }

    /// 创建监听配置失败错误
    pub fn listen(
        data_id: impl Into<String>,
        group: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::BackendListenError {
            data_id: data_id.into(),
            group: group.into(),
            message: message.into(),
        }
    }

    /// 是否为端口解析错误
    pub fn is_port_error(&self) -> bool {
        matches!(self, Self::InvalidPort { .. } | Self::MissingPort { .. })
    }
}

/// 结果类型别名
pub type RemoteConfigResult<T> = Result<T, RemoteConfigError>;
