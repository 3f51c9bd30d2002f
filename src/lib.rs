// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
pub mod config; // 事件配置参数
pub mod detection; // 区域事件检测系统
pub mod error; // 错误类型
pub mod pipeline; // 单帧处理流水线

pub use crate::config::{SentinelConfig, UseCaseConfig};
pub use crate::detection::{
    AlertRule, BusinessLogic, Detection, Event, EventSignal, EventTracker, FrameSignals,
    RegionFilter, RegionOfInterest, Unrestricted,
};
pub use crate::error::{Error, Result};
pub use crate::pipeline::Pipeline;
