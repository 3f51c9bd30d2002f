//! 单类别检测事件 (Per-class detection event)

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::types::Detection;

/// 某一类别的连续检测记录
///
/// 出现时重置存活帧数,缺席时递减,`remaining_ttl <= 0` 即过期。
#[derive(Clone, Debug)]
pub struct Event {
    /// 最近一次关联的检测负载
    detection: Arc<Detection>,

    /// 已检测帧数 (含创建帧)
    detected_frames: u32,

    /// 创建时间 (仅供展示)
    creation_time: DateTime<Utc>,

    /// 允许缺席的帧数上限
    ttl: u32,

    /// 剩余存活帧数,不做下限截断
    remaining_ttl: i64,
}

impl Event {
    pub fn new(detection: Arc<Detection>, ttl: u32) -> Self {
        Self {
            detection,
            detected_frames: 1,
            creation_time: Utc::now(),
            ttl,
            remaining_ttl: i64::from(ttl),
        }
    }

    fn reset_ttl(&mut self) {
        self.remaining_ttl = i64::from(self.ttl);
    }

    /// 本帧未检测到该类别
    pub fn no_detection(&mut self) {
        self.remaining_ttl -= 1;
    }

    /// 本帧再次检测到该类别: 更新负载,累加帧数,重置存活帧数
    pub fn new_detection(&mut self, detection: Arc<Detection>) {
        self.detection = detection;
        self.detected_frames = self.detected_frames.saturating_add(1);
        self.reset_ttl();
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ttl <= 0
    }

    pub fn detection(&self) -> &Arc<Detection> {
        &self.detection
    }

    pub fn detected_frames(&self) -> u32 {
        self.detected_frames
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn remaining_ttl(&self) -> i64 {
        self.remaining_ttl
    }
}
