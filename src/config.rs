//! 事件监控配置 - 通过JSON文件或base64用例参数调整

use std::fs;

use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::detection::alert::DEFAULT_ALERT_CLASSES;
use crate::error::{Error, Result};

/// 事件监控参数配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    // === 事件参数 ===
    pub required_frame_count: u32, // 开始事件所需检测帧数
    pub time_to_live: u32,         // 允许缺席帧数

    // === 区域参数 ===
    pub region: Option<Vec<[f64; 2]>>, // 多边形顶点,None 表示不限制

    // === 告警参数 ===
    pub alert_classes: Vec<String>,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            required_frame_count: 3,
            time_to_live: 5,
            region: None,
            alert_classes: DEFAULT_ALERT_CLASSES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl SentinelConfig {
    /// 从JSON文件加载配置
    pub fn load(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    info!("✅ 配置已从 {} 加载", path);
                    config
                }
                Err(e) => {
                    warn!("⚠️  配置文件解析失败: {}, 使用默认值", e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("📝 配置文件不存在,创建默认配置...");
                let config = Self::default();
                config.save(path);
                config
            }
        }
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: &str) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!("❌ 保存配置失败: {}", e);
                } else {
                    info!("💾 配置已保存到 {}", path);
                }
            }
            Err(e) => warn!("❌ 序列化配置失败: {}", e),
        }
    }

    /// 由base64用例参数构建 (覆盖事件与区域参数,保留告警参数)
    pub fn from_use_case(use_case: &UseCaseConfig) -> Result<Self> {
        let decoded = use_case.decode()?;
        let config = Self {
            required_frame_count: decoded.params.min_occurrences,
            time_to_live: decoded.params.max_outliers,
            region: Some(decoded.polygon),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.required_frame_count == 0 {
            return Err(Error::InvalidParam {
                name: "required_frame_count",
                reason: "must be at least 1".into(),
            });
        }
        if self.time_to_live == 0 {
            return Err(Error::InvalidParam {
                name: "time_to_live",
                reason: "must be at least 1".into(),
            });
        }
        if let Some(region) = &self.region {
            if region.len() < 3 {
                return Err(Error::InvalidParam {
                    name: "region",
                    reason: format!("needs at least 3 vertices, got {}", region.len()),
                });
            }
        }
        Ok(())
    }

    /// 打印当前配置
    pub fn log_summary(&self) {
        info!("🎛️  当前事件配置:");
        info!("  开始阈值(帧): {}", self.required_frame_count);
        info!("  结束容忍(帧): {}", self.time_to_live);
        match &self.region {
            Some(region) => info!("  区域顶点数: {}", region.len()),
            None => info!("  区域: 不限制"),
        }
        info!("  告警类别: {:?}", self.alert_classes);
    }
}

// ========== base64 用例参数 ==========

/// 上游下发的用例参数 (base64编码的JSON)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCaseConfig {
    pub area_of_interest: String,
    pub params: String,
}

/// 业务参数 (字段拼写与上游一致)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessParams {
    #[serde(rename = "minOcurrences")]
    pub min_occurrences: u32,
    #[serde(rename = "maxOutliers")]
    pub max_outliers: u32,
}

#[derive(Deserialize)]
struct AreaOfInterest {
    polygon: PolygonSpec,
}

#[derive(Deserialize)]
struct PolygonSpec {
    coordinates: Coordinates,
}

/// 单环 `[[x, y], ...]` 或 GeoJSON 多环 `[[[x, y], ...], ...]`
#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinates {
    Ring(Vec<[f64; 2]>),
    Rings(Vec<Vec<[f64; 2]>>),
}

impl Coordinates {
    fn outer_ring(self) -> Vec<[f64; 2]> {
        match self {
            Coordinates::Ring(ring) => ring,
            Coordinates::Rings(rings) => rings.into_iter().next().unwrap_or_default(),
        }
    }
}

/// 解码后的用例参数
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedUseCase {
    pub polygon: Vec<[f64; 2]>,
    pub params: BusinessParams,
}

impl UseCaseConfig {
    pub fn decode(&self) -> Result<DecodedUseCase> {
        let area: AreaOfInterest = decode_b64_json("area_of_interest", &self.area_of_interest)?;
        let params: BusinessParams = decode_b64_json("params", &self.params)?;
        Ok(DecodedUseCase {
            polygon: area.polygon.coordinates.outer_ring(),
            params,
        })
    }
}

fn decode_b64_json<T: DeserializeOwned>(field: &'static str, encoded: &str) -> Result<T> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|source| Error::Base64 { field, source })?;
    serde_json::from_slice(&bytes).map_err(|source| Error::Json { field, source })
}
