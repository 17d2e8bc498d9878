//! # Configuration Abstractions
//!
//! 远程配置抽象层，定义通用配置库与各配置中心适配器之间的接口和约定。
//!
//! ## 核心接口
//!
//! - [`RemoteProvider`] - 远程配置源描述
//! - [`RemoteConfigFactory`] - 远程配置工厂接口
//! - [`RemoteConfigManager`] - 远程配置管理器接口
//! - [`WatchStream`] - 配置变更通知流
//!
//! ## 全局注册表
//!
//! [`registry`] 模块保存进程内的提供者名称列表和全局工厂。适配器通过
//! [`wrap_global_remote_config`] 把自己接到现有工厂之前。

pub mod events;
pub mod manager;
pub mod provider;
pub mod registry;
pub mod watcher;

pub use events::*;
pub use manager::*;
pub use provider::*;
pub use registry::*;
pub use watcher::*;
