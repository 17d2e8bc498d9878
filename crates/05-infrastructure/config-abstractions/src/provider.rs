//! 远程配置提供者抽象接口

use crate::watcher::{WatchStopper, WatchStream};
use async_trait::async_trait;
use infrastructure_common::{RemoteConfigError, RemoteConfigResult};
use secrecy::SecretString;
use std::io::Read;

/// 远程配置源描述
///
/// 由调用方提供, 指明配置中心类型、地址、路径和密钥。
pub trait RemoteProvider: Send + Sync {
    /// 提供者名称, 例如 `nacos`
    fn provider(&self) -> &str;

    /// 配置中心地址
    fn endpoint(&self) -> &str;

    /// 配置路径
    fn path(&self) -> &str;

    /// 密钥
    fn secret_keyring(&self) -> &SecretString;
}

/// 远程配置源描述的默认实现
#[derive(Debug, Clone)]
pub struct RemoteDescriptor {
    provider: String,
    endpoint: String,
    path: String,
    secret: SecretString,
}

impl RemoteDescriptor {
    /// 创建新的远程配置源描述
    pub fn new(
        provider: impl Into<String>,
        endpoint: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            endpoint: endpoint.into(),
            path: path.into(),
            secret: SecretString::new(String::new()),
        }
    }

    /// 设置密钥
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = SecretString::new(secret.into());
        self
    }
}

impl RemoteProvider for RemoteDescriptor {
    fn provider(&self) -> &str {
        &self.provider
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn secret_keyring(&self) -> &SecretString {
        &self.secret
    }
}

/// 配置内容读取器
pub type RemoteReader = Box<dyn Read + Send + Sync>;

/// 远程配置工厂 trait
///
/// 通用配置库通过它读取和监听远程配置。实现可以包装另一个工厂,
/// 对自己不支持的提供者原样转交。
#[async_trait]
pub trait RemoteConfigFactory: Send + Sync {
    /// 读取一次配置
    async fn get(&self, rp: &dyn RemoteProvider) -> RemoteConfigResult<RemoteReader>;

    /// 读取一次配置, 供轮询式监听使用
    async fn watch(&self, rp: &dyn RemoteProvider) -> RemoteConfigResult<RemoteReader>;

    /// 订阅配置变更
    async fn watch_channel(
        &self,
        rp: &dyn RemoteProvider,
    ) -> RemoteConfigResult<(WatchStream, WatchStopper)>;

    /// 工厂名称
    fn name(&self) -> &str;
}

/// 不支持任何提供者的工厂
///
/// 全局注册表的初始值, 位于转交链的末端。
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRemoteConfig;

#[async_trait]
impl RemoteConfigFactory for UnsupportedRemoteConfig {
    async fn get(&self, rp: &dyn RemoteProvider) -> RemoteConfigResult<RemoteReader> {
        Err(RemoteConfigError::unsupported_provider(rp.provider()))
    }

    async fn watch(&self, rp: &dyn RemoteProvider) -> RemoteConfigResult<RemoteReader> {
        Err(RemoteConfigError::unsupported_provider(rp.provider()))
    }

    async fn watch_channel(
        &self,
        rp: &dyn RemoteProvider,
    ) -> RemoteConfigResult<(WatchStream, WatchStopper)> {
        Err(RemoteConfigError::unsupported_provider(rp.provider()))
    }

    fn name(&self) -> &str {
        "UnsupportedRemoteConfig"
    }
}
