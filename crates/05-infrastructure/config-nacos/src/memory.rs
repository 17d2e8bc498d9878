//! 内存配置中心
//!
//! 不依赖 Nacos 服务端的 [`ConfigClient`] 实现, 用于测试和本地开发。

use crate::client::{
    ChangeListener, ClientConfig, ConfigChange, ConfigClient, ConfigClientConnector, ServerConfig,
};
use async_trait::async_trait;
use dashmap::DashMap;
use infrastructure_common::{RemoteConfigError, RemoteConfigResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// 配置项键: (data_id, group)
type ItemKey = (String, String);

fn item_key(data_id: &str, group: &str) -> ItemKey {
    (data_id.to_string(), group.to_string())
}

/// 内存配置客户端
#[derive(Default)]
pub struct InMemoryConfigClient {
    namespace: String,
    configs: DashMap<ItemKey, String>,
    listeners: DashMap<ItemKey, Vec<ChangeListener>>,
    fetch_count: AtomicUsize,
    cancelled: Mutex<Vec<ItemKey>>,
}

impl std::fmt::Debug for InMemoryConfigClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryConfigClient")
            .field("namespace", &self.namespace)
            .field("configs_count", &self.configs.len())
            .field("listened_items", &self.listeners.len())
            .finish()
    }
}

impl InMemoryConfigClient {
    /// 创建指定命名空间的内存客户端
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// 写入配置, 不通知监听者
    pub fn set_config(&self, data_id: &str, group: &str, content: impl Into<String>) {
        self.configs.insert(item_key(data_id, group), content.into());
    }

    /// 发布配置并通知监听者, 返回被通知的监听者数量
    pub fn publish_config(&self, data_id: &str, group: &str, content: impl Into<String>) -> usize {
        let key = item_key(data_id, group);
        let content = content.into();
        self.configs.insert(key.clone(), content.clone());

        // 复制回调列表后再调用, 回调内可以再访问客户端
        let listeners = self
            .listeners
            .get(&key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        debug!(
            "发布配置: dataId={}, group={}, 监听者 {} 个",
            data_id,
            group,
            listeners.len()
        );

        for listener in &listeners {
            listener(ConfigChange {
                namespace: self.namespace.clone(),
                group: group.to_string(),
                data_id: data_id.to_string(),
                content: content.clone(),
            });
        }
        listeners.len()
    }

    /// 删除配置
    pub fn remove_config(&self, data_id: &str, group: &str) -> Option<String> {
        self.configs
            .remove(&item_key(data_id, group))
            .map(|(_, content)| content)
    }

    /// 某配置项上的监听者数量
    pub fn listener_count(&self, data_id: &str, group: &str) -> usize {
        self.listeners
            .get(&item_key(data_id, group))
            .map_or(0, |entry| entry.value().len())
    }

    /// 累计读取次数
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::Relaxed)
    }

    /// 按调用顺序记录的取消监听请求
    pub fn cancelled_listens(&self) -> Vec<(String, String)> {
        self.cancelled.lock().clone()
    }
}

#[async_trait]
impl ConfigClient for InMemoryConfigClient {
    async fn fetch_config(&self, data_id: &str, group: &str) -> RemoteConfigResult<String> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        self.configs
            .get(&item_key(data_id, group))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RemoteConfigError::fetch(data_id, group, "配置不存在"))
    }

    async fn listen_config(
        &self,
        data_id: &str,
        group: &str,
        listener: ChangeListener,
    ) -> RemoteConfigResult<()> {
        self.listeners
            .entry(item_key(data_id, group))
            .or_default()
            .push(listener);
        Ok(())
    }

    async fn cancel_listen(&self, data_id: &str, group: &str) -> RemoteConfigResult<()> {
        let key = item_key(data_id, group);
        self.listeners.remove(&key);
        self.cancelled.lock().push(key);
        Ok(())
    }
}

/// 内存配置中心连接器
///
/// 所有连接共享同一个 [`InMemoryConfigClient`], 并记录每次连接参数。
pub struct InMemoryConnector {
    client: Arc<InMemoryConfigClient>,
    failure: Mutex<Option<String>>,
    connections: Mutex<Vec<(Vec<ServerConfig>, ClientConfig)>>,
}

impl std::fmt::Debug for InMemoryConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryConnector")
            .field("client", &self.client)
            .field("failure", &*self.failure.lock())
            .field("connections_count", &self.connections.lock().len())
            .finish()
    }
}

impl InMemoryConnector {
    /// 创建连接器
    pub fn new(client: Arc<InMemoryConfigClient>) -> Self {
        Self {
            client,
            failure: Mutex::new(None),
            connections: Mutex::new(Vec::new()),
        }
    }

    /// 共享的内存客户端
    pub fn client(&self) -> Arc<InMemoryConfigClient> {
        Arc::clone(&self.client)
    }

    /// 让后续连接失败
    pub fn fail_connect(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    /// 恢复连接
    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    /// 成功建立的连接数
    pub fn connect_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// 每次成功连接时的参数
    pub fn connections(&self) -> Vec<(Vec<ServerConfig>, ClientConfig)> {
        self.connections.lock().clone()
    }
}

#[async_trait]
impl ConfigClientConnector for InMemoryConnector {
    async fn connect(
        &self,
        servers: Vec<ServerConfig>,
        client_config: ClientConfig,
    ) -> RemoteConfigResult<Arc<dyn ConfigClient>> {
        let failure = self.failure.lock().clone();
        if let Some(message) = failure {
            return Err(RemoteConfigError::connect(message));
        }
        if servers.is_empty() {
            return Err(RemoteConfigError::connect("服务端列表为空"));
        }

        self.connections.lock().push((servers, client_config));
        Ok(self.client())
    }
}
