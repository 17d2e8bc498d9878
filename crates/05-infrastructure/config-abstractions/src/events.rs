//! 远程配置变更事件定义

/// 远程配置变更通知
///
/// 每次配置中心推送变更时产生一条，`value` 为配置中心下发的原始内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    /// 配置内容
    pub value: Vec<u8>,
    /// 错误信息
    pub error: Option<String>,
    /// 接收时间
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl RemoteResponse {
    /// 创建携带配置内容的通知
    pub fn value(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
            error: None,
            received_at: chrono::Utc::now(),
        }
    }

    /// 创建携带错误的通知
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            value: Vec::new(),
            error: Some(message.into()),
            received_at: chrono::Utc::now(),
        }
    }

    /// 是否为错误通知
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
