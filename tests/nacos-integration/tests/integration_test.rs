//! Centralized integration tests for the Nacos remote configuration provider
use config_abstractions::{
    get_global_remote_config, read_remote_config, supported_remote_providers,
    watch_remote_channel, watch_remote_config, RemoteDescriptor, WatchState,
};
use config_nacos::{is_registered, register, InMemoryConfigClient, InMemoryConnector};
use futures::StreamExt;
use infrastructure_common::RemoteConfigError;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// 进程内共享的内存配置中心, 首次访问时完成注册
static BACKEND: Lazy<Arc<InMemoryConfigClient>> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let client = Arc::new(InMemoryConfigClient::new("test"));
    let connector = Arc::new(InMemoryConnector::new(Arc::clone(&client)));
    assert!(register(connector), "首次注册应该生效");
    client
});

fn backend() -> Arc<InMemoryConfigClient> {
    Arc::clone(&BACKEND)
}

fn endpoint(data_id: &str) -> String {
    format!("http://console.example.io:8848/nacos?namespace=test&dataId={data_id}&group=DEFAULT_GROUP")
}

/// 应用配置
#[derive(Debug, Deserialize, PartialEq)]
struct AppConfig {
    test: String,
    replicas: u32,
}

#[tokio::test]
async fn test_registration_is_one_time() {
    let _ = backend();
    assert!(is_registered());

    let connector = Arc::new(InMemoryConnector::new(Arc::new(InMemoryConfigClient::default())));
    assert!(!register(connector.clone()));
    assert!(!register(connector.clone()));
    assert_eq!(connector.connect_count(), 0);

    let providers = supported_remote_providers();
    assert_eq!(providers.iter().filter(|p| *p == "nacos").count(), 1);
    assert_eq!(get_global_remote_config().name(), "NacosProvider");
}

#[tokio::test]
async fn test_read_remote_yaml() -> anyhow::Result<()> {
    let client = backend();
    client.set_config("app.yaml", "DEFAULT_GROUP", "test: hello\nreplicas: 3\n");

    let rp = RemoteDescriptor::new("nacos", endpoint("app.yaml"), "");
    let content = read_remote_config(&rp).await?;
    let config: AppConfig = serde_yaml::from_slice(&content)?;

    assert_eq!(
        config,
        AppConfig {
            test: "hello".to_string(),
            replicas: 3,
        }
    );

    // watch 返回同一份内容
    assert_eq!(watch_remote_config(&rp).await?, content);
    Ok(())
}

#[tokio::test]
async fn test_unregistered_provider_is_rejected() {
    let _ = backend();
    let rp = RemoteDescriptor::new("etcd", "http://127.0.0.1:2379", "/config/app.yaml");

    assert!(matches!(
        read_remote_config(&rp).await,
        Err(RemoteConfigError::UnsupportedRemoteProvider { provider }) if provider == "etcd"
    ));
}

#[tokio::test]
async fn test_remote_errors_surface_to_caller() {
    let _ = backend();

    let missing = RemoteDescriptor::new("nacos", endpoint("missing.yaml"), "");
    assert!(matches!(
        read_remote_config(&missing).await,
        Err(RemoteConfigError::BackendFetchError { .. })
    ));

    let no_port = RemoteDescriptor::new("nacos", "udp://console.example.io/nacos?dataId=a", "");
    assert!(matches!(
        watch_remote_channel(&no_port).await,
        Err(RemoteConfigError::MissingPort { .. })
    ));
}

#[tokio::test]
async fn test_watch_remote_channel() -> anyhow::Result<()> {
    let client = backend();
    client.set_config("watch.yaml", "DEFAULT_GROUP", "test: v1\nreplicas: 1\n");

    let rp = RemoteDescriptor::new("nacos", endpoint("watch.yaml"), "");
    let (mut stream, stopper) = watch_remote_channel(&rp).await?;
    assert_eq!(stream.state(), WatchState::Registered);

    client.publish_config("watch.yaml", "DEFAULT_GROUP", "test: v2\nreplicas: 2\n");
    let update = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await?
        .expect("应该收到配置变更");
    let config: AppConfig = serde_yaml::from_slice(&update.value)?;
    assert_eq!(config.replicas, 2);

    assert!(stopper.stop());
    tokio::time::timeout(Duration::from_secs(1), stream.join()).await??;
    assert_eq!(stream.state(), WatchState::Terminated);
    assert!(client
        .cancelled_listens()
        .contains(&("watch.yaml".to_string(), "DEFAULT_GROUP".to_string())));
    assert_eq!(client.listener_count("watch.yaml", "DEFAULT_GROUP"), 0);
    Ok(())
}
