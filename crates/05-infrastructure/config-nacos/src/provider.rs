//! Nacos 远程配置工厂
//!
//! 处理 `nacos` 提供者, 其余提供者原样转交给被包装的工厂。

use crate::client::{ClientConfig, ConfigClientConnector};
use crate::manager::{get_config_manager, PROVIDER_NAME};
use async_trait::async_trait;
use config_abstractions::{
    stop_channel, RemoteConfigFactory, RemoteConfigManager, RemoteProvider, RemoteReader,
    WatchStopper, WatchStream,
};
use dashmap::DashMap;
use infrastructure_common::RemoteConfigResult;
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// 管理器缓存键: (提供者名称, 地址)
type ManagerKey = (String, String);

/// Nacos 远程配置工厂
pub struct NacosProvider {
    /// 被包装的工厂
    delegate: Arc<dyn RemoteConfigFactory>,
    /// 配置中心连接器
    connector: Arc<dyn ConfigClientConnector>,
    /// 基础客户端配置
    client_config: ClientConfig,
    /// 支持的提供者名称
    supported_providers: Vec<String>,
    /// 每个配置源一个管理器
    managers: DashMap<ManagerKey, Arc<dyn RemoteConfigManager>>,
}

impl std::fmt::Debug for NacosProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NacosProvider")
            .field("delegate", &self.delegate.name())
            .field("client_config", &self.client_config)
            .field("supported_providers", &self.supported_providers)
            .field("managers_count", &self.managers.len())
            .finish()
    }
}

impl NacosProvider {
    /// 创建新的 Nacos 远程配置工厂
    pub fn new(
        delegate: Arc<dyn RemoteConfigFactory>,
        connector: Arc<dyn ConfigClientConnector>,
    ) -> Self {
        Self {
            delegate,
            connector,
            client_config: ClientConfig::default(),
            supported_providers: vec![PROVIDER_NAME.to_string()],
            managers: DashMap::new(),
        }
    }

    /// 设置基础客户端配置
    pub fn with_client_config(mut self, client_config: ClientConfig) -> Self {
        self.client_config = client_config;
        self
    }

    /// 是否处理该提供者
    pub fn supports(&self, provider: &str) -> bool {
        self.supported_providers.iter().any(|p| p == provider)
    }

    /// 已创建的管理器数量
    pub fn manager_count(&self) -> usize {
        self.managers.len()
    }

    /// 获取或创建配置源对应的管理器
    ///
    /// 并发首次访问同一配置源时可能各自创建, 只有先写入缓存的那个被保留。
    async fn manager_for(
        &self,
        rp: &dyn RemoteProvider,
    ) -> RemoteConfigResult<Arc<dyn RemoteConfigManager>> {
        let key = (rp.provider().to_string(), rp.endpoint().to_string());
        let cached = self.managers.get(&key).map(|m| Arc::clone(m.value()));
        if let Some(manager) = cached {
            return Ok(manager);
        }

        debug!("创建配置管理器: {}", rp.endpoint());
        let manager =
            get_config_manager(rp, self.connector.as_ref(), &self.client_config).await?;
        let manager = Arc::clone(self.managers.entry(key).or_insert(manager).value());
        Ok(manager)
    }
}

#[async_trait]
impl RemoteConfigFactory for NacosProvider {
    async fn get(&self, rp: &dyn RemoteProvider) -> RemoteConfigResult<RemoteReader> {
        if !self.supports(rp.provider()) {
            return self.delegate.get(rp).await;
        }

        let manager = self.manager_for(rp).await?;
        let data = manager.get(rp.path()).await?;
        Ok(Box::new(Cursor::new(data)))
    }

    async fn watch(&self, rp: &dyn RemoteProvider) -> RemoteConfigResult<RemoteReader> {
        if !self.supports(rp.provider()) {
            return self.delegate.watch(rp).await;
        }

        self.get(rp).await
    }

    /// 订阅配置变更
    ///
    /// 同一配置源的多个会话共用一个管理器和客户端。任一会话停止时按
    /// `(dataId, group)` 取消监听, 该配置项上其他会话的通知流也随之结束。
    async fn watch_channel(
        &self,
        rp: &dyn RemoteProvider,
    ) -> RemoteConfigResult<(WatchStream, WatchStopper)> {
        if !self.supports(rp.provider()) {
            return self.delegate.watch_channel(rp).await;
        }

        let manager = self.manager_for(rp).await?;
        let (stopper, signal) = stop_channel();
        let stream = manager.watch(rp.path(), signal).await?;
        Ok((stream, stopper))
    }

    fn name(&self) -> &str {
        "NacosProvider"
    }
}
