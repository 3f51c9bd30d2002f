// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 区域事件追踪器
//! Event lifecycle tracking over per-frame detection payloads

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::event::Event;
use super::types::{Detection, EventSignal, FrameSignals};

// ========== 业务逻辑统一接口 ==========

/// 业务逻辑 Trait
///
/// 每帧接收一次 (已经过区域过滤的) 检测负载,返回该帧产生的事件信号。
/// 实现不做内部加锁,多路视频流应各自持有独立实例。
pub trait BusinessLogic {
    /// 处理一帧检测负载
    fn process(&mut self, detection: Detection) -> FrameSignals;

    /// 重置 (清除所有事件,不发送结束信号)
    fn reset(&mut self);

    /// 获取当前追踪中的类别数量
    fn event_count(&self) -> usize;
}

// ========== 事件追踪器 ==========

/// 按类别追踪检测事件
///
/// - 类别连续检测达到 `required_frames` 帧 → `Started`
/// - 已开始的类别连续缺席 `ttl` 帧 → `Ended`,随后遗忘该类别
pub struct EventTracker {
    /// 开始事件所需的检测帧数
    required_frames: u32,

    /// 允许缺席的帧数
    ttl: u32,

    /// 类别 → 事件 (插入顺序)
    events: IndexMap<String, Event>,

    /// 已开始未结束的类别 → 事件ID
    active_ids: HashMap<String, String>,
}

impl EventTracker {
    pub fn new(required_frames: u32, ttl: u32) -> Self {
        Self {
            required_frames,
            ttl,
            events: IndexMap::new(),
            active_ids: HashMap::new(),
        }
    }

    pub fn event(&self, class_id: &str) -> Option<&Event> {
        self.events.get(class_id)
    }

    /// 已开始事件的ID
    pub fn active_event_id(&self, class_id: &str) -> Option<&str> {
        self.active_ids.get(class_id).map(String::as_str)
    }

    pub fn active_count(&self) -> usize {
        self.active_ids.len()
    }

    fn is_start_event(&self, class_id: &str, event: &Event) -> bool {
        event.detected_frames() >= self.required_frames && !self.active_ids.contains_key(class_id)
    }

    /// 达到阈值且尚未开始的类别
    fn starting_events(&mut self) -> Vec<EventSignal> {
        let starting: Vec<(String, Arc<Detection>)> = self
            .events
            .iter()
            .filter(|(class_id, event)| self.is_start_event(class_id, event))
            .map(|(class_id, event)| (class_id.clone(), Arc::clone(event.detection())))
            .collect();

        starting
            .into_iter()
            .map(|(class_id, detection)| {
                let event_id = Uuid::new_v4().to_string();
                info!("🟢 事件开始: class={} id={}", class_id, event_id);
                self.active_ids.insert(class_id, event_id.clone());
                EventSignal::Started {
                    event_id,
                    detection,
                }
            })
            .collect()
    }

    /// 过期类别: 已开始的发送结束信号,全部移出追踪 (单次遍历,保持顺序)
    fn ending_events(&mut self) -> Vec<EventSignal> {
        let active_ids = &mut self.active_ids;
        let mut ended = Vec::new();

        self.events.retain(|class_id, event| {
            if !event.is_expired() {
                return true;
            }

            match active_ids.remove(class_id) {
                Some(event_id) => {
                    info!("🔴 事件结束: class={} id={}", class_id, event_id);
                    ended.push(EventSignal::Ended {
                        event_id,
                        detection: Arc::clone(event.detection()),
                    });
                }
                None => debug!("类别 {} 未达阈值即过期,静默移除", class_id),
            }
            false
        });

        ended
    }
}

impl BusinessLogic for EventTracker {
    fn process(&mut self, detection: Detection) -> FrameSignals {
        let detection = Arc::new(detection);

        // 1. 更新: 每个预测一次 (同帧重复类别会多次累加)
        let mut current_classes: HashSet<&str> = HashSet::new();
        for class_id in detection.class_ids() {
            current_classes.insert(class_id);
            match self.events.get_mut(class_id) {
                Some(event) => event.new_detection(Arc::clone(&detection)),
                None => {
                    debug!("新类别: {}", class_id);
                    self.events
                        .insert(class_id.clone(), Event::new(Arc::clone(&detection), self.ttl));
                }
            }
        }

        // 2. 衰减: 本帧缺席的类别
        for (class_id, event) in self.events.iter_mut() {
            if !current_classes.contains(class_id.as_str()) {
                event.no_detection();
            }
        }

        // 3/4. 先开始后结束
        let mut signals = self.starting_events();
        signals.extend(self.ending_events());

        FrameSignals::from(signals)
    }

    fn reset(&mut self) {
        self.events.clear();
        self.active_ids.clear();
    }

    fn event_count(&self) -> usize {
        self.events.len()
    }
}
