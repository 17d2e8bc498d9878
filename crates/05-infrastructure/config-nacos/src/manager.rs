//! Nacos 配置管理器实现

use crate::client::{ChangeListener, ClientConfig, ConfigChange, ConfigClient, ConfigClientConnector};
use crate::endpoint::parse_endpoint;
use crate::key::ConfigKey;
use async_trait::async_trait;
use config_abstractions::{
    RemoteConfigManager, RemoteProvider, RemoteResponse, SessionState, StopSignal, WatchState,
    WatchStream,
};
use infrastructure_common::{RemoteConfigError, RemoteConfigResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 提供者名称
pub const PROVIDER_NAME: &str = "nacos";

/// 按提供者名称创建配置管理器
pub async fn get_config_manager(
    rp: &dyn RemoteProvider,
    connector: &dyn ConfigClientConnector,
    base_config: &ClientConfig,
) -> RemoteConfigResult<Arc<dyn RemoteConfigManager>> {
    match rp.provider() {
        PROVIDER_NAME => {
            let manager = NacosConfigManager::connect(rp, connector, base_config).await?;
            Ok(Arc::new(manager))
        }
        other => Err(RemoteConfigError::unsupported_provider(other)),
    }
}

/// Nacos 配置管理器
///
/// 独占一个配置中心客户端, `data_id` 和 `group` 在创建时确定。
pub struct NacosConfigManager {
    client: Arc<dyn ConfigClient>,
    data_id: String,
    group: String,
}

impl std::fmt::Debug for NacosConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NacosConfigManager")
            .field("data_id", &self.data_id)
            .field("group", &self.group)
            .finish()
    }
}

impl NacosConfigManager {
    /// 解析地址并连接配置中心
    pub async fn connect(
        rp: &dyn RemoteProvider,
        connector: &dyn ConfigClientConnector,
        base_config: &ClientConfig,
    ) -> RemoteConfigResult<Self> {
        if rp.provider() != PROVIDER_NAME {
            return Err(RemoteConfigError::unsupported_provider(rp.provider()));
        }

        let endpoint = parse_endpoint(rp.endpoint())?;
        let client_config = endpoint.client_config(base_config);

        info!(
            "连接 Nacos 配置中心: {}, namespace={}, dataId={}, group={}",
            endpoint.server.address(),
            endpoint.namespace,
            endpoint.data_id,
            endpoint.group
        );

        let client = connector
            .connect(vec![endpoint.server.clone()], client_config)
            .await
            .map_err(|e| match e {
                RemoteConfigError::BackendConnectError { .. } => e,
                other => RemoteConfigError::connect(other.to_string()),
            })?;

        Ok(Self::with_client(client, endpoint.data_id, endpoint.group))
    }

    /// 使用已有客户端创建管理器
    pub fn with_client(
        client: Arc<dyn ConfigClient>,
        data_id: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            client,
            data_id: data_id.into(),
            group: group.into(),
        }
    }

    /// 配置 ID
    pub fn data_id(&self) -> &str {
        &self.data_id
    }

    /// 分组
    pub fn group(&self) -> &str {
        &self.group
    }

    fn target(&self, key: &str) -> (String, String) {
        ConfigKey::parse(key).resolve(&self.data_id, &self.group)
    }
}

#[async_trait]
impl RemoteConfigManager for NacosConfigManager {
    async fn get(&self, key: &str) -> RemoteConfigResult<Vec<u8>> {
        let (data_id, group) = self.target(key);
        debug!("获取配置: dataId={}, group={}", data_id, group);

        let content = self
            .client
            .fetch_config(&data_id, &group)
            .await
            .map_err(|e| match e {
                RemoteConfigError::BackendFetchError { .. } => e,
                other => RemoteConfigError::fetch(&data_id, &group, other.to_string()),
            })?;

        Ok(content.into_bytes())
    }

    async fn watch(&self, key: &str, stop: StopSignal) -> RemoteConfigResult<WatchStream> {
        let (data_id, group) = self.target(key);
        let session_id = Uuid::new_v4();
        let state = SessionState::new();
        let (sender, receiver) = mpsc::unbounded_channel();

        let listener_state = state.clone();
        let listener: ChangeListener = Arc::new(move |change: ConfigChange| {
            debug!(
                "收到配置变更: session={}, dataId={}, group={}",
                session_id, change.data_id, change.group
            );
            listener_state.mark_notified();
            if sender.send(RemoteResponse::value(change.content)).is_err() {
                debug!("通知接收端已关闭, 丢弃变更: session={}", session_id);
            }
        });

        // 回调可能在注册返回前就被触发
        state.set(WatchState::Registered);
        self.client
            .listen_config(&data_id, &group, listener)
            .await
            .map_err(|e| match e {
                RemoteConfigError::BackendListenError { .. } => e,
                other => RemoteConfigError::listen(&data_id, &group, other.to_string()),
            })?;

        info!(
            "开始监听配置: session={}, dataId={}, group={}",
            session_id, data_id, group
        );

        let client = Arc::clone(&self.client);
        let task_state = state.clone();
        let task = tokio::spawn(async move {
            stop.wait().await;

            task_state.set(WatchState::Unsubscribing);
            debug!("取消监听配置: session={}", session_id);
            if let Err(e) = client.cancel_listen(&data_id, &group).await {
                warn!(
                    "取消监听配置失败: session={}, dataId={}, group={}, 原因: {}",
                    session_id, data_id, group, e
                );
            }

            task_state.set(WatchState::Terminated);
            info!("配置监听已结束: session={}", session_id);
        });

        Ok(WatchStream::new(receiver, Some(task), state))
    }
}
