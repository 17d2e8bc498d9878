//! 管理器与工厂测试


use crate::memory::{InMemoryConfigClient, InMemoryConnector};
use std::sync::Arc;

pub(crate) const ENDPOINT: &str =
    "http://console.example.io:8848/nacos?namespace=test&dataId=test.yaml&group=DEFAULT_GROUP";

/// 创建预置了 `test.yaml` 的内存配置中心
pub(crate) fn memory_backend() -> (Arc<InMemoryConfigClient>, Arc<InMemoryConnector>) {
    let client = Arc::new(InMemoryConfigClient::new("test"));
    client.set_config("test.yaml", "DEFAULT_GROUP", "test: hello\n");
    let connector = Arc::new(InMemoryConnector::new(Arc::clone(&client)));
    (client, connector)
}
