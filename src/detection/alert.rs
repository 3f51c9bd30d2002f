//! 告警规则: 原始负载中出现关注类别即告警,不影响事件追踪

use std::collections::HashSet;

use super::types::Detection;

pub const DEFAULT_ALERT_CLASSES: [&str; 2] = ["backpack", "handbag"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlertRule {
    watched: HashSet<String>,
}

impl Default for AlertRule {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_CLASSES)
    }
}

impl AlertRule {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            watched: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// 不告警
    pub fn disabled() -> Self {
        Self {
            watched: HashSet::new(),
        }
    }

    pub fn is_watched(&self, class_id: &str) -> bool {
        self.watched.contains(class_id)
    }

    /// 负载中出现的关注类别 (按负载顺序,去重)
    pub fn matches<'a>(&self, detection: &'a Detection) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        detection
            .class_ids()
            .iter()
            .map(String::as_str)
            .filter(|class_id| self.is_watched(class_id) && seen.insert(*class_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(classes: &[&str]) -> Detection {
        let predictions: Vec<_> = classes.iter().map(|c| json!({ "classId": c })).collect();
        Detection::try_from(json!({ "predictions": predictions })).unwrap()
    }

    #[test]
    fn test_default_watch_list() {
        let rule = AlertRule::default();
        assert!(rule.is_watched("backpack"));
        assert!(rule.is_watched("handbag"));
        assert!(!rule.is_watched("car"));
    }

    #[test]
    fn test_matches_any_prediction() {
        let rule = AlertRule::default();
        let detection = frame(&["car", "handbag", "person", "handbag", "backpack"]);
        assert_eq!(rule.matches(&detection), vec!["handbag", "backpack"]);
        assert!(rule.matches(&frame(&["car"])).is_empty());
    }

    #[test]
    fn test_disabled_never_matches() {
        assert!(AlertRule::disabled().matches(&frame(&["backpack"])).is_empty());
    }
}
