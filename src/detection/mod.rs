/// 区域事件检测系统 (Region Event Detection)
///
/// 每帧一次,负责事件生命周期判定
/// - Roi:     感兴趣区域过滤
/// - Alert:   关注类别告警
/// - Tracker: 事件开始/结束追踪
pub mod alert;
pub mod event;
pub mod roi;
pub mod tracker;
pub mod types;

pub use alert::AlertRule;
pub use event::Event;
pub use roi::{RegionFilter, RegionOfInterest, Unrestricted};
pub use tracker::{BusinessLogic, EventTracker};
pub use types::{Detection, EventSignal, FrameSignals};
