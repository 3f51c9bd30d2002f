//! 错误类型 (Error types)

use thiserror::Error;

/// 检测负载与配置错误
#[derive(Debug, Error)]
pub enum Error {
    /// 负载缺少 `predictions` 数组
    #[error("detection payload has no `predictions` array")]
    MissingPredictions,

    /// 某个预测缺少字符串类型的 `classId`
    #[error("prediction {index} has no string `classId`")]
    MissingClassId { index: usize },

    /// base64 解码失败
    #[error("invalid base64 in `{field}`: {source}")]
    Base64 {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    /// JSON 解析失败
    #[error("invalid JSON in `{field}`: {source}")]
    Json {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// 参数不合法
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    /// 多边形顶点不足
    #[error("polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
