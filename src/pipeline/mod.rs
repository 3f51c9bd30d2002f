/// 事件处理流水线 (Event Processing Pipeline)
///
/// 每帧依次执行:
/// - Alert:   原始负载告警检查
/// - Roi:     区域过滤
/// - Tracker: 事件开始/结束判定
use tracing::{debug, warn};

use crate::config::SentinelConfig;
use crate::detection::{
    AlertRule, BusinessLogic, Detection, EventTracker, FrameSignals, RegionFilter,
    RegionOfInterest, Unrestricted,
};
use crate::error::{Error, Result};

pub struct Pipeline {
    region: Box<dyn RegionFilter>,
    logic: Box<dyn BusinessLogic>,
    alert: AlertRule,

    // 统计
    frame_count: u64,
}

impl Pipeline {
    pub fn new(config: &SentinelConfig) -> Result<Self> {
        config.validate()?;

        let region: Box<dyn RegionFilter> = match &config.region {
            Some(vertices) => Box::new(RegionOfInterest::new(vertices.clone())?),
            None => Box::new(Unrestricted),
        };
        let logic = Box::new(EventTracker::new(
            config.required_frame_count,
            config.time_to_live,
        ));
        let alert = AlertRule::new(config.alert_classes.iter().cloned());

        Ok(Self::with_components(region, logic, alert))
    }

    pub fn with_components(
        region: Box<dyn RegionFilter>,
        logic: Box<dyn BusinessLogic>,
        alert: AlertRule,
    ) -> Self {
        Self {
            region,
            logic,
            alert,
            frame_count: 0,
        }
    }

    /// 解析一行JSON负载并处理; 无效负载被拒绝,不计帧,不触碰追踪状态
    pub fn process_line(&mut self, line: &str) -> Result<FrameSignals> {
        let detection: Detection = serde_json::from_str(line).map_err(|source| Error::Json {
            field: "detection",
            source,
        })?;
        Ok(self.process_detection(detection))
    }

    pub fn process_detection(&mut self, detection: Detection) -> FrameSignals {
        self.frame_count += 1;

        // 1. 告警 (过滤前的原始负载)
        for class_id in self.alert.matches(&detection) {
            warn!("🚨 帧 {}: 发现 {}!", self.frame_count, class_id);
        }

        // 2. 区域过滤
        let filtered = self.region.filter(detection);
        debug!(
            "帧 {}: 区域内预测 {} 个",
            self.frame_count,
            filtered.class_ids().len()
        );

        // 3. 事件判定
        self.logic.process(filtered)
    }

    /// 清空追踪状态与帧计数
    pub fn reset(&mut self) {
        self.logic.reset();
        self.frame_count = 0;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn event_count(&self) -> usize {
        self.logic.event_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(predictions: serde_json::Value) -> Detection {
        Detection::try_from(json!({ "predictions": predictions })).unwrap()
    }

    fn inside(class_id: &str) -> serde_json::Value {
        json!({ "classId": class_id, "boundingBox": { "x": 1.0, "y": 1.0, "width": 2.0, "height": 2.0 } })
    }

    fn outside(class_id: &str) -> serde_json::Value {
        json!({ "classId": class_id, "boundingBox": { "x": 50.0, "y": 50.0, "width": 2.0, "height": 2.0 } })
    }

    fn config() -> SentinelConfig {
        SentinelConfig {
            required_frame_count: 2,
            time_to_live: 1,
            region: Some(vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]),
            ..SentinelConfig::default()
        }
    }

    #[test]
    fn test_only_region_predictions_start_events() {
        let mut pipeline = Pipeline::new(&config()).unwrap();

        assert!(pipeline
            .process_detection(frame(json!([inside("car"), outside("dog")])))
            .is_none());
        let signals = pipeline
            .process_detection(frame(json!([inside("car"), outside("dog")])))
            .into_vec();

        assert_eq!(signals.len(), 1);
        assert!(signals[0].is_started());
        assert_eq!(signals[0].detection().class_ids(), ["car"]);
        assert_eq!(pipeline.event_count(), 1);
        assert_eq!(pipeline.frame_count(), 2);
    }

    #[test]
    fn test_leaving_region_ends_event() {
        let mut pipeline = Pipeline::new(&config()).unwrap();
        pipeline.process_detection(frame(json!([inside("car")])));
        pipeline.process_detection(frame(json!([inside("car")])));

        let signals = pipeline
            .process_detection(frame(json!([outside("car")])))
            .into_vec();
        assert_eq!(signals.len(), 1);
        assert!(signals[0].is_ended());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = SentinelConfig {
            time_to_live: 0,
            ..config()
        };
        assert!(Pipeline::new(&bad).is_err());
    }

    #[test]
    fn test_reset() {
        let mut pipeline = Pipeline::new(&SentinelConfig::default()).unwrap();
        pipeline.process_detection(frame(json!([{ "classId": "car" }])));
        pipeline.reset();
        assert_eq!(pipeline.frame_count(), 0);
        assert_eq!(pipeline.event_count(), 0);
    }

    #[test]
    fn test_rejected_line_leaves_state_untouched() {
        let config = SentinelConfig {
            required_frame_count: 3,
            time_to_live: 1,
            region: None,
            ..SentinelConfig::default()
        };
        let mut pipeline = Pipeline::new(&config).unwrap();
        let car = r#"{"predictions":[{"classId":"car"}]}"#;

        assert!(pipeline.process_line(car).unwrap().is_none());
        assert!(pipeline.process_line(car).unwrap().is_none());

        // 缺少 classId 的预测使整帧无效
        let bad = r#"{"predictions":[{"classId":"car"},{"score":0.4}]}"#;
        assert!(matches!(
            pipeline.process_line(bad),
            Err(Error::Json { field: "detection", .. })
        ));
        assert!(pipeline.process_line("{not json").is_err());
        assert_eq!(pipeline.frame_count(), 2);
        assert_eq!(pipeline.event_count(), 1);

        // 拒绝的行不算缺席,第三次检测即开始事件
        let signals = pipeline.process_line(car).unwrap().into_vec();
        assert_eq!(signals.len(), 1);
        assert!(signals[0].is_started());
        assert_eq!(pipeline.frame_count(), 3);
    }
}
