//! 全局远程配置注册表
//!
//! 保存进程内可识别的提供者名称列表和当前生效的 [`RemoteConfigFactory`]。
//! 各配置中心适配器在初始化时把自己包装到现有工厂之外, 形成转交链。

use crate::provider::{RemoteConfigFactory, RemoteProvider, UnsupportedRemoteConfig};
use crate::watcher::{WatchStopper, WatchStream};
use infrastructure_common::{RemoteConfigError, RemoteConfigResult};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info};

/// 已识别的远程配置提供者名称
static SUPPORTED_REMOTE_PROVIDERS: Lazy<RwLock<Vec<String>>> =
    Lazy::new(|| RwLock::new(Vec::new()));

/// 全局远程配置工厂
static GLOBAL_REMOTE_CONFIG: Lazy<RwLock<Arc<dyn RemoteConfigFactory>>> =
    Lazy::new(|| RwLock::new(Arc::new(UnsupportedRemoteConfig)));

/// 获取已识别的提供者名称
pub fn supported_remote_providers() -> Vec<String> {
    SUPPORTED_REMOTE_PROVIDERS.read().clone()
}

/// 提供者名称是否已识别
pub fn is_supported_remote_provider(name: &str) -> bool {
    SUPPORTED_REMOTE_PROVIDERS.read().iter().any(|p| p == name)
}

/// 追加提供者名称, 已存在时返回 `false`
pub fn add_supported_remote_provider(name: impl Into<String>) -> bool {
    let name = name.into();
    let mut providers = SUPPORTED_REMOTE_PROVIDERS.write();
    if providers.contains(&name) {
        return false;
    }
    info!("注册远程配置提供者: {}", name);
    providers.push(name);
    true
}

/// 获取全局远程配置工厂
pub fn get_global_remote_config() -> Arc<dyn RemoteConfigFactory> {
    Arc::clone(&GLOBAL_REMOTE_CONFIG.read())
}

/// 设置全局远程配置工厂
pub fn set_global_remote_config(factory: Arc<dyn RemoteConfigFactory>) {
    info!("设置全局远程配置工厂: {}", factory.name());
    *GLOBAL_REMOTE_CONFIG.write() = factory;
}

/// 用新工厂包装当前全局工厂
///
/// `wrap` 收到替换前的工厂, 整个替换在写锁内完成。
pub fn wrap_global_remote_config<F>(wrap: F)
where
    F: FnOnce(Arc<dyn RemoteConfigFactory>) -> Arc<dyn RemoteConfigFactory>,
{
    let mut current = GLOBAL_REMOTE_CONFIG.write();
    let previous = Arc::clone(&current);
    let wrapped = wrap(previous);
    info!(
        "包装全局远程配置工厂: {} -> {}",
        current.name(),
        wrapped.name()
    );
    *current = wrapped;
}

fn ensure_supported(rp: &dyn RemoteProvider) -> RemoteConfigResult<()> {
    if is_supported_remote_provider(rp.provider()) {
        Ok(())
    } else {
        Err(RemoteConfigError::UnsupportedRemoteProvider {
            provider: rp.provider().to_string(),
        })
    }
}

fn read_all(mut reader: impl Read) -> RemoteConfigResult<Vec<u8>> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content)?;
    Ok(content)
}

/// 通过全局工厂读取远程配置
pub async fn read_remote_config(rp: &dyn RemoteProvider) -> RemoteConfigResult<Vec<u8>> {
    ensure_supported(rp)?;
    debug!("读取远程配置: provider={}, path={}", rp.provider(), rp.path());
    let reader = get_global_remote_config().get(rp).await?;
    read_all(reader)
}

/// 通过全局工厂以监听方式读取远程配置
pub async fn watch_remote_config(rp: &dyn RemoteProvider) -> RemoteConfigResult<Vec<u8>> {
    ensure_supported(rp)?;
    let reader = get_global_remote_config().watch(rp).await?;
    read_all(reader)
}

/// 通过全局工厂订阅远程配置变更
pub async fn watch_remote_channel(
    rp: &dyn RemoteProvider,
) -> RemoteConfigResult<(WatchStream, WatchStopper)> {
    ensure_supported(rp)?;
    get_global_remote_config().watch_channel(rp).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{RemoteDescriptor, RemoteReader};
    use async_trait::async_trait;
    use std::io::Cursor;

    /// 只处理 `echo` 提供者的测试工厂, 把地址作为配置内容返回
    struct EchoFactory {
        delegate: Arc<dyn RemoteConfigFactory>,
    }

    #[async_trait]
    impl RemoteConfigFactory for EchoFactory {
        async fn get(&self, rp: &dyn RemoteProvider) -> RemoteConfigResult<RemoteReader> {
            if rp.provider() != "echo" {
                return self.delegate.get(rp).await;
            }
            Ok(Box::new(Cursor::new(rp.endpoint().as_bytes().to_vec())))
        }

        async fn watch(&self, rp: &dyn RemoteProvider) -> RemoteConfigResult<RemoteReader> {
            self.get(rp).await
        }

        async fn watch_channel(
            &self,
            rp: &dyn RemoteProvider,
        ) -> RemoteConfigResult<(WatchStream, WatchStopper)> {
            self.delegate.watch_channel(rp).await
        }

        fn name(&self) -> &str {
            "EchoFactory"
        }
    }

    /// 注册表是进程级状态, 相关断言集中在一个测试里
    #[tokio::test]
    async fn test_global_registry_chain() {
        let echo = RemoteDescriptor::new("echo", "hello", "");
        let unknown = RemoteDescriptor::new("unknown-registry-test", "x", "");

        // 未登记的提供者在到达工厂前被拒绝
        assert!(matches!(
            read_remote_config(&echo).await,
            Err(RemoteConfigError::UnsupportedRemoteProvider { .. })
        ));

        assert!(add_supported_remote_provider("echo"));
        assert!(!add_supported_remote_provider("echo"));
        assert!(is_supported_remote_provider("echo"));
        assert!(supported_remote_providers().contains(&"echo".to_string()));

        wrap_global_remote_config(|previous| {
            Arc::new(EchoFactory { delegate: previous }) as Arc<dyn RemoteConfigFactory>
        });
        assert_eq!(get_global_remote_config().name(), "EchoFactory");

        assert_eq!(read_remote_config(&echo).await.unwrap(), b"hello".to_vec());
        assert_eq!(watch_remote_config(&echo).await.unwrap(), b"hello".to_vec());

        // 登记但无工厂处理的提供者落到链尾
        add_supported_remote_provider("unknown-registry-test");
        assert!(matches!(
            read_remote_config(&unknown).await,
            Err(RemoteConfigError::UnsupportedProvider { .. })
        ));
        assert!(watch_remote_channel(&echo).await.is_err());

        // 整体替换全局工厂后不再经过转交链
        set_global_remote_config(Arc::new(UnsupportedRemoteConfig));
        assert_eq!(get_global_remote_config().name(), "UnsupportedRemoteConfig");
        assert!(matches!(
            read_remote_config(&echo).await,
            Err(RemoteConfigError::UnsupportedProvider { .. })
        ));
    }
}
