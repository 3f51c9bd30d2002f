/// 区域事件系统数据结构定义
/// Data structures for the region event system
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

// ========== 检测负载 ==========

/// 单帧检测负载 (Per-frame detection payload)
///
/// 只有 `predictions[].classId` 对事件追踪有意义,其余字段原样透传。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Detection {
    raw: Value,
    class_ids: Vec<String>,
}

impl TryFrom<Value> for Detection {
    type Error = Error;

    fn try_from(raw: Value) -> Result<Self> {
        let predictions = raw
            .get("predictions")
            .and_then(Value::as_array)
            .ok_or(Error::MissingPredictions)?;

        let class_ids = predictions
            .iter()
            .enumerate()
            .map(|(index, pred)| {
                pred.get("classId")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .ok_or(Error::MissingClassId { index })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { raw, class_ids })
    }
}

impl From<Detection> for Value {
    fn from(detection: Detection) -> Self {
        detection.raw
    }
}

impl Detection {
    /// 每个预测的类别 (按负载顺序,保留重复)
    pub fn class_ids(&self) -> &[String] {
        &self.class_ids
    }

    pub fn predictions(&self) -> &[Value] {
        self.raw
            .get("predictions")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// 原地过滤预测,同步更新类别列表
    pub fn retain_predictions<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Value) -> bool,
    {
        if let Some(predictions) = self
            .raw
            .get_mut("predictions")
            .and_then(Value::as_array_mut)
        {
            predictions.retain(|pred| keep(pred));
            // 构造时已校验,classId 必然存在
            self.class_ids = predictions
                .iter()
                .filter_map(|pred| pred.get("classId").and_then(Value::as_str))
                .map(str::to_owned)
                .collect();
        }
    }
}

// ========== 事件信号 ==========

/// 事件信号 (追踪器 → 调用方)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventSignal {
    Started {
        #[serde(rename = "eventId")]
        event_id: String,
        detection: Arc<Detection>,
    },
    Ended {
        #[serde(rename = "eventId")]
        event_id: String,
        detection: Arc<Detection>,
    },
}

impl EventSignal {
    pub fn event_id(&self) -> &str {
        match self {
            EventSignal::Started { event_id, .. } | EventSignal::Ended { event_id, .. } => {
                event_id
            }
        }
    }

    pub fn detection(&self) -> &Detection {
        match self {
            EventSignal::Started { detection, .. } | EventSignal::Ended { detection, .. } => {
                detection
            }
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, EventSignal::Started { .. })
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, EventSignal::Ended { .. })
    }
}

/// 单帧输出: 无事件 与 空列表 明确区分
#[derive(Clone, Debug, PartialEq, Default)]
pub enum FrameSignals {
    #[default]
    NoSignals,
    Signals(Vec<EventSignal>),
}

impl From<Vec<EventSignal>> for FrameSignals {
    fn from(signals: Vec<EventSignal>) -> Self {
        if signals.is_empty() {
            FrameSignals::NoSignals
        } else {
            FrameSignals::Signals(signals)
        }
    }
}

impl FrameSignals {
    pub fn is_none(&self) -> bool {
        matches!(self, FrameSignals::NoSignals)
    }

    pub fn as_slice(&self) -> &[EventSignal] {
        match self {
            FrameSignals::NoSignals => &[],
            FrameSignals::Signals(signals) => signals,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventSignal> {
        self.as_slice().iter()
    }

    pub fn into_vec(self) -> Vec<EventSignal> {
        match self {
            FrameSignals::NoSignals => Vec::new(),
            FrameSignals::Signals(signals) => signals,
        }
    }
}

impl IntoIterator for FrameSignals {
    type Item = EventSignal;
    type IntoIter = std::vec::IntoIter<EventSignal>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}
