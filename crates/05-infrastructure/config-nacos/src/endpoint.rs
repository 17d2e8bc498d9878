//! Nacos 地址解析
//!
//! 地址格式: `scheme://host[:port]/contextPath?namespace=NS&group=G&dataId=ID`

use crate::client::{ClientConfig, ServerConfig};
use infrastructure_common::{RemoteConfigError, RemoteConfigResult};
use std::str::FromStr;
use url::{Host, Url};

/// 从地址解析出的连接参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NacosEndpoint {
    /// 服务端连接参数
    pub server: ServerConfig,
    /// 命名空间
    pub namespace: String,
    /// 配置 ID
    pub data_id: String,
    /// 分组
    pub group: String,
}

impl NacosEndpoint {
    /// 在基础客户端配置上套用地址中的命名空间
    pub fn client_config(&self, base: &ClientConfig) -> ClientConfig {
        base.clone().with_namespace(self.namespace.clone())
    }
}

impl FromStr for NacosEndpoint {
    type Err = RemoteConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_endpoint(s)
    }
}

fn default_port(scheme: &str) -> Option<u64> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

/// 地址中显式写出的端口
fn written_port(endpoint: &str) -> Option<u16> {
    let (_, rest) = endpoint.split_once("://")?;
    let authority = rest.split(|c: char| matches!(c, '/' | '?' | '#')).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let (host, port) = host_port.rsplit_once(':')?;
    // IPv6 字面量内部的冒号
    if host.starts_with('[') && !host.ends_with(']') {
        return None;
    }
    port.parse().ok()
}

/// 解析 Nacos 地址
pub fn parse_endpoint(endpoint: &str) -> RemoteConfigResult<NacosEndpoint> {
    let url = Url::parse(endpoint).map_err(|e| match e {
        url::ParseError::InvalidPort => RemoteConfigError::InvalidPort {
            endpoint: endpoint.to_string(),
        },
        other => RemoteConfigError::invalid_endpoint(endpoint, other.to_string()),
    })?;

    let host = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => return Err(RemoteConfigError::invalid_endpoint(endpoint, "缺少主机名")),
    };

    let port = match (url.port(), url.port_or_known_default()) {
        (Some(port), _) => u64::from(port),
        // url 会省略与协议默认值相同的显式端口
        (None, Some(known)) if written_port(endpoint) == Some(known) => u64::from(known),
        (None, _) => default_port(url.scheme()).ok_or_else(|| RemoteConfigError::MissingPort {
            endpoint: endpoint.to_string(),
            scheme: url.scheme().to_string(),
        })?,
    };

    let query = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default()
    };

    Ok(NacosEndpoint {
        server: ServerConfig {
            scheme: url.scheme().to_string(),
            host,
            port,
            context_path: url.path().to_string(),
        },
        namespace: query("namespace"),
        data_id: query("dataId"),
        group: query("group"),
    })
}
