//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 远程配置层共用的错误类型。
//!
//! ## 核心组件
//!
//! - [`RemoteConfigError`] - 远程配置错误
//! - [`RemoteConfigResult`] - 远程配置结果类型别名

pub mod errors;

pub use errors::*;
