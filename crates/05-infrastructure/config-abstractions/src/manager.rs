//! 远程配置管理器抽象接口

use crate::watcher::{StopSignal, WatchStream};
use async_trait::async_trait;
use infrastructure_common::RemoteConfigResult;

/// 远程配置管理器 trait
///
/// 包装一个配置中心客户端, 负责单个配置项的读取与监听。
#[async_trait]
pub trait RemoteConfigManager: Send + Sync {
    /// 读取配置内容, 原样返回配置中心下发的字节
    async fn get(&self, key: &str) -> RemoteConfigResult<Vec<u8>>;

    /// 监听配置变更, 直到收到停止信号
    async fn watch(&self, key: &str, stop: StopSignal) -> RemoteConfigResult<WatchStream>;
}
