//! 基于 nacos-sdk 的配置中心连接
//!
//! [`SdkClientProps`] 总是可用; 真正连接 Nacos 服务端的 [`NacosSdkConnector`]
//! 需要启用 `nacos-sdk` feature。

use crate::client::{ClientConfig, ServerConfig};
use infrastructure_common::{RemoteConfigError, RemoteConfigResult};
use std::time::Duration;

#[cfg(feature = "nacos-sdk")]
pub use self::remote::{NacosSdkClient, NacosSdkConnector};

/// 传给 nacos-sdk 的客户端参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkClientProps {
    /// 逗号分隔的 `host:port` 列表
    pub server_addr: String,
    /// 命名空间
    pub namespace: String,
    /// 单次请求超时
    pub timeout: Duration,
}

impl SdkClientProps {
    /// 由服务端列表和客户端配置得到连接参数
    pub fn from_configs(
        servers: &[ServerConfig],
        client_config: &ClientConfig,
    ) -> RemoteConfigResult<Self> {
        if servers.is_empty() {
            return Err(RemoteConfigError::connect("服务端列表为空"));
        }

        let server_addr = servers
            .iter()
            .map(ServerConfig::host_port)
            .collect::<Vec<_>>()
            .join(",");

        Ok(Self {
            server_addr,
            namespace: client_config.namespace_id.clone(),
            timeout: client_config.timeout(),
        })
    }
}

#[cfg(feature = "nacos-sdk")]
mod remote {
    use super::SdkClientProps;
    use crate::client::{
        ChangeListener, ClientConfig, ConfigChange, ConfigClient, ConfigClientConnector,
        ServerConfig,
    };
    use async_trait::async_trait;
    use dashmap::DashMap;
    use infrastructure_common::{RemoteConfigError, RemoteConfigResult};
    use nacos_sdk::api::config::{
        ConfigChangeListener, ConfigResponse, ConfigService, ConfigServiceBuilder,
    };
    use nacos_sdk::api::props::ClientProps;
    use std::fmt::Display;
    use std::future::Future;
    use std::sync::Arc;
    use std::time::Duration;
    use tracing::{debug, info};

    type SdkListener = Arc<dyn ConfigChangeListener + Send + Sync>;

    impl SdkClientProps {
        fn client_props(&self) -> ClientProps {
            ClientProps::new()
                .server_addr(self.server_addr.clone())
                .namespace(self.namespace.clone())
        }
    }

    /// 把 nacos-sdk 的变更回调转成 [`ConfigChange`]
    struct ListenerAdapter {
        listener: ChangeListener,
    }

    impl ConfigChangeListener for ListenerAdapter {
        fn notify(&self, config_resp: ConfigResponse) {
            (self.listener)(ConfigChange {
                namespace: config_resp.namespace().to_string(),
                group: config_resp.group().to_string(),
                data_id: config_resp.data_id().to_string(),
                content: config_resp.content().to_string(),
            });
        }
    }

    /// 包装 nacos-sdk `ConfigService` 的配置客户端
    ///
    /// 取消监听时移除该配置项上登记过的所有回调。
    pub struct NacosSdkClient<S> {
        service: S,
        timeout: Duration,
        listeners: DashMap<(String, String), Vec<SdkListener>>,
    }

    impl<S> NacosSdkClient<S>
    where
        S: ConfigService + Send + Sync + 'static,
    {
        /// 使用已构建的 `ConfigService` 创建客户端
        pub fn new(service: S, timeout: Duration) -> Self {
            Self {
                service,
                timeout,
                listeners: DashMap::new(),
            }
        }

        async fn bounded<T, E, F>(&self, request: F) -> Result<T, String>
        where
            F: Future<Output = Result<T, E>>,
            E: Display,
        {
            match tokio::time::timeout(self.timeout, request).await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("请求超时: {:?}", self.timeout)),
            }
        }
    }

    #[async_trait]
    impl<S> ConfigClient for NacosSdkClient<S>
    where
        S: ConfigService + Send + Sync + 'static,
    {
        async fn fetch_config(&self, data_id: &str, group: &str) -> RemoteConfigResult<String> {
            let response = self
                .bounded(
                    self.service
                        .get_config(data_id.to_string(), group.to_string()),
                )
                .await
                .map_err(|message| RemoteConfigError::fetch(data_id, group, message))?;
            Ok(response.content().to_string())
        }

        async fn listen_config(
            &self,
            data_id: &str,
            group: &str,
            listener: ChangeListener,
        ) -> RemoteConfigResult<()> {
            let adapter: SdkListener = Arc::new(ListenerAdapter { listener });
            self.bounded(self.service.add_listener(
                data_id.to_string(),
                group.to_string(),
                Arc::clone(&adapter) as Arc<dyn ConfigChangeListener>,
            ))
            .await
            .map_err(|message| RemoteConfigError::listen(data_id, group, message))?;

            self.listeners
                .entry((data_id.to_string(), group.to_string()))
                .or_default()
                .push(adapter);
            Ok(())
        }

        async fn cancel_listen(&self, data_id: &str, group: &str) -> RemoteConfigResult<()> {
            let removed = self
                .listeners
                .remove(&(data_id.to_string(), group.to_string()))
                .map(|(_, listeners)| listeners)
                .unwrap_or_default();
            debug!(
                "移除配置监听: dataId={}, group={}, 回调 {} 个",
                data_id,
                group,
                removed.len()
            );

            let mut first_error = None;
            for listener in removed {
                let result = self
                    .bounded(self.service.remove_listener(
                        data_id.to_string(),
                        group.to_string(),
                        listener as Arc<dyn ConfigChangeListener>,
                    ))
                    .await;
                if let Err(message) = result {
                    first_error.get_or_insert(message);
                }
            }

            match first_error {
                Some(message) => Err(RemoteConfigError::listen(data_id, group, message)),
                None => Ok(()),
            }
        }
    }

    /// 通过 nacos-sdk 连接 Nacos 服务端
    #[derive(Debug, Default, Clone, Copy)]
    pub struct NacosSdkConnector;

    #[async_trait]
    impl ConfigClientConnector for NacosSdkConnector {
        async fn connect(
            &self,
            servers: Vec<ServerConfig>,
            client_config: ClientConfig,
        ) -> RemoteConfigResult<Arc<dyn ConfigClient>> {
            let props = SdkClientProps::from_configs(&servers, &client_config)?;
            info!(
                "创建 Nacos 配置客户端: servers={}, namespace={}",
                props.server_addr, props.namespace
            );

            let service = ConfigServiceBuilder::new(props.client_props())
                .build()
                .map_err(|e| RemoteConfigError::connect(e.to_string()))?;
            Ok(Arc::new(NacosSdkClient::new(service, props.timeout)))
        }
    }
}
