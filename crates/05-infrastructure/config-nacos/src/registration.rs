//! 注册 Nacos 提供者
//!
//! 由宿主程序在启动时显式调用, 每个进程只生效一次, 不提供注销。

use crate::client::{ClientConfig, ConfigClientConnector};
use crate::manager::PROVIDER_NAME;
use crate::provider::NacosProvider;
use config_abstractions::{
    add_supported_remote_provider, wrap_global_remote_config, RemoteConfigFactory,
};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info};

static REGISTRATION: OnceCell<()> = OnceCell::new();

/// 使用默认客户端配置注册 Nacos 提供者
///
/// 返回本次调用是否完成了注册。
pub fn register(connector: Arc<dyn ConfigClientConnector>) -> bool {
    register_with(connector, ClientConfig::default())
}

/// 使用指定客户端配置注册 Nacos 提供者
///
/// 把 `nacos` 加入全局提供者列表, 并用 [`NacosProvider`] 包装当前全局工厂。
pub fn register_with(
    connector: Arc<dyn ConfigClientConnector>,
    client_config: ClientConfig,
) -> bool {
    let mut registered = false;
    REGISTRATION.get_or_init(|| {
        add_supported_remote_provider(PROVIDER_NAME);
        wrap_global_remote_config(|previous| {
            let provider = NacosProvider::new(previous, connector).with_client_config(client_config);
            Arc::new(provider) as Arc<dyn RemoteConfigFactory>
        });
        registered = true;
    });

    if registered {
        info!("Nacos 远程配置提供者注册完成");
    } else {
        debug!("Nacos 远程配置提供者已注册, 忽略重复注册");
    }
    registered
}

/// 是否已注册
pub fn is_registered() -> bool {
    REGISTRATION.get().is_some()
}
