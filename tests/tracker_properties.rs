use std::collections::HashMap;

use proptest::prelude::*;
use roi_events::{BusinessLogic, Detection, EventSignal, EventTracker};
use serde_json::json;

const CLASSES: [&str; 3] = ["car", "dog", "person"];

fn frame(present: &[bool]) -> Detection {
    let predictions: Vec<_> = CLASSES
        .iter()
        .zip(present)
        .filter(|(_, p)| **p)
        .map(|(c, _)| json!({ "classId": c }))
        .collect();
    Detection::try_from(json!({ "predictions": predictions })).unwrap()
}

proptest! {
    #[test]
    fn started_and_ended_alternate_per_class(
        required in 1u32..5,
        ttl in 1u32..5,
        frames in prop::collection::vec(prop::collection::vec(any::<bool>(), 3), 0..60),
    ) {
        let mut tracker = EventTracker::new(required, ttl);
        let mut open: HashMap<String, String> = HashMap::new();

        for present in &frames {
            let signals = tracker.process(frame(present));
            prop_assert!(signals.is_none() || signals.len() > 0);

            // 同一帧内所有开始信号先于结束信号
            let first_end = signals.iter().position(EventSignal::is_ended);
            if let Some(idx) = first_end {
                prop_assert!(signals.iter().skip(idx).all(EventSignal::is_ended));
            }

            for signal in signals {
                match signal {
                    EventSignal::Started { event_id, .. } => {
                        prop_assert!(!open.values().any(|id| id == &event_id));
                        let class_id = CLASSES
                            .iter()
                            .find(|c| tracker.active_event_id(c) == Some(event_id.as_str()))
                            .map(|c| c.to_string());
                        prop_assert!(class_id.is_some());
                        let class_id = class_id.unwrap();
                        prop_assert!(!open.contains_key(&class_id));
                        open.insert(class_id, event_id);
                    }
                    EventSignal::Ended { event_id, .. } => {
                        let class_id = open
                            .iter()
                            .find(|(_, id)| **id == event_id)
                            .map(|(c, _)| c.clone());
                        prop_assert!(class_id.is_some());
                        open.remove(&class_id.unwrap());
                    }
                }
            }

            // 活跃类别是追踪类别的子集,存活帧数不超过上限
            for class_id in CLASSES {
                if tracker.active_event_id(class_id).is_some() {
                    prop_assert!(tracker.event(class_id).is_some());
                }
                if let Some(event) = tracker.event(class_id) {
                    prop_assert!(event.remaining_ttl() <= i64::from(ttl));
                    prop_assert!(!event.is_expired());
                }
            }
            prop_assert_eq!(open.len(), tracker.active_count());
        }
    }
}
