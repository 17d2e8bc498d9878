//! # Nacos Configuration Provider
//!
//! 让通用配置库从 Nacos 配置中心读取和监听配置。
//!
//! ## 主要组件
//!
//! - [`parse_endpoint`] - 解析 `scheme://host[:port]/contextPath?namespace=..&group=..&dataId=..`
//! - [`NacosConfigManager`] - 包装配置中心客户端, 读取和监听单个配置项
//! - [`NacosProvider`] - 远程配置工厂, 不支持的提供者转交给被包装的工厂
//! - [`register`] - 把 Nacos 提供者接入全局注册表
//! - [`InMemoryConfigClient`] - 内存配置中心
//! - `NacosSdkConnector` - 通过 nacos-sdk 连接 Nacos 服务端 (`nacos-sdk` feature)
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use config_abstractions::{read_remote_config, RemoteDescriptor};
//! use config_nacos::{register, InMemoryConfigClient, InMemoryConnector};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(InMemoryConfigClient::new("dev"));
//!     client.set_config("app.yaml", "DEFAULT_GROUP", "name: demo");
//!
//!     // 启动时注册一次
//!     register(Arc::new(InMemoryConnector::new(client)));
//!
//!     let rp = RemoteDescriptor::new(
//!         "nacos",
//!         "http://127.0.0.1:8848/nacos?namespace=dev&dataId=app.yaml&group=DEFAULT_GROUP",
//!         "",
//!     );
//!     let content = read_remote_config(&rp).await?;
//!     println!("{}", String::from_utf8_lossy(&content));
//!     Ok(())
//! }
//! ```
//!
//! 连接真实的 Nacos 服务端时启用 `nacos-sdk` feature, 注册 `NacosSdkConnector`:
//!
//! ```rust,ignore
//! config_nacos::register(Arc::new(config_nacos::NacosSdkConnector));
//! ```

pub mod client;
pub mod endpoint;
pub mod key;
pub mod manager;
pub mod memory;
pub mod provider;
pub mod registration;
pub mod sdk;

#[cfg(test)]
mod tests;

pub use client::*;
pub use endpoint::*;
pub use key::*;
pub use manager::*;
pub use memory::*;
pub use provider::*;
pub use registration::*;
pub use sdk::*;
