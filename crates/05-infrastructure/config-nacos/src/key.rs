//! 配置键解析
//!
//! 键可以写成 `DataId=..&Group=..`（名称不区分大小写）, 用来在单次调用中
//! 指定与管理器默认值不同的配置项。

/// 键中的配置 ID 参数名
pub const KEY_DATA_ID: &str = "DataId";
/// 键中的分组参数名
pub const KEY_GROUP: &str = "Group";

/// 解析后的配置键
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigKey {
    /// 配置 ID
    pub data_id: String,
    /// 分组
    pub group: String,
}

impl ConfigKey {
    /// 解析配置键, 无法识别的片段被忽略
    pub fn parse(key: &str) -> Self {
        let mut parsed = Self::default();
        for item in key.split('&') {
            let Some((name, value)) = item.split_once('=') else {
                continue;
            };
            if name.eq_ignore_ascii_case(KEY_DATA_ID) {
                parsed.data_id = value.to_string();
            } else if name.eq_ignore_ascii_case(KEY_GROUP) {
                parsed.group = value.to_string();
            }
        }
        parsed
    }

    /// 以键中的非空字段覆盖默认的 `(data_id, group)`
    pub fn resolve(&self, data_id: &str, group: &str) -> (String, String) {
        let pick = |own: &str, fallback: &str| {
            if own.is_empty() {
                fallback.to_string()
            } else {
                own.to_string()
            }
        };
        (pick(&self.data_id, data_id), pick(&self.group, group))
    }
}
