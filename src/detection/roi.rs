// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 感兴趣区域过滤 (Region of interest filter)
//!
//! 在事件追踪之前运行,只保留检测框中心落在多边形内的预测。

use serde_json::Value;

use super::types::Detection;
use crate::error::{Error, Result};

/// 区域过滤 Trait
pub trait RegionFilter {
    fn filter(&self, detection: Detection) -> Detection;
}

/// 不限制区域,负载原样返回
#[derive(Clone, Copy, Debug, Default)]
pub struct Unrestricted;

impl RegionFilter for Unrestricted {
    fn filter(&self, detection: Detection) -> Detection {
        detection
    }
}

/// 多边形区域
#[derive(Clone, Debug, PartialEq)]
pub struct RegionOfInterest {
    vertices: Vec<[f64; 2]>,
}

impl RegionOfInterest {
    pub fn new(vertices: Vec<[f64; 2]>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::DegeneratePolygon(vertices.len()));
        }
        Ok(Self { vertices })
    }

    /// 射线法 (even-odd) 判断点是否在多边形内
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let [xi, yi] = self.vertices[i];
            let [xj, yj] = self.vertices[j];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    fn keeps(&self, prediction: &Value) -> bool {
        box_center(prediction).is_some_and(|(cx, cy)| self.contains(cx, cy))
    }
}

impl RegionFilter for RegionOfInterest {
    fn filter(&self, mut detection: Detection) -> Detection {
        detection.retain_predictions(|pred| self.keeps(pred));
        detection
    }
}

/// 检测框中心 `boundingBox: {x, y, width, height}`
fn box_center(prediction: &Value) -> Option<(f64, f64)> {
    let bbox = prediction.get("boundingBox")?;
    let field = |name: &str| bbox.get(name).and_then(Value::as_f64);
    let (x, y, w, h) = (field("x")?, field("y")?, field("width")?, field("height")?);
    Some((x + w / 2.0, y + h / 2.0))
}
