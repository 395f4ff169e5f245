//! In-app banners: newest first, dismissed by a timer, clickable to mark read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::BannerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banners {
    items: Vec<Banner>,
    last_id: i64,
}

impl Banners {
    /// Adds a banner at the front and returns its id so the caller can
    /// schedule the expiry.
    pub fn push(&mut self, message: impl Into<String>, now: DateTime<Utc>) -> BannerId {
        let id = now.timestamp_millis().max(self.last_id.saturating_add(1));
        self.last_id = id;
        let id = BannerId(id);
        self.items.insert(
            0,
            Banner {
                id,
                message: message.into(),
                timestamp: now,
                read: false,
            },
        );
        id
    }

    pub fn mark_read(&mut self, id: BannerId) -> bool {
        match self.items.iter_mut().find(|b| b.id == id) {
            Some(banner) => {
                banner.read = true;
                true
            }
            None => false,
        }
    }

    /// Removes the banner; a no-op when it is already gone.
    pub fn expire(&mut self, id: BannerId) -> Option<Banner> {
        let index = self.items.iter().position(|b| b.id == id)?;
        Some(self.items.remove(index))
    }

    /// Most recent unread banners, at most `max`.
    pub fn visible(&self, max: usize) -> impl Iterator<Item = &Banner> {
        self.items.iter().filter(|b| !b.read).take(max)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn newest_first_with_distinct_ids() {
        let mut banners = Banners::default();
        let a = banners.push("first", at(1_000));
        let b = banners.push("second", at(1_000));
        assert_ne!(a, b);

        let messages: Vec<&str> = banners.visible(3).map(|b| b.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn shows_three_most_recent_unread() {
        let mut banners = Banners::default();
        let ids: Vec<BannerId> = (0..5)
            .map(|i| banners.push(format!("m{i}"), at(i)))
            .collect();
        banners.mark_read(ids[4]);

        let messages: Vec<&str> = banners.visible(3).map(|b| b.message.as_str()).collect();
        assert_eq!(messages, vec!["m3", "m2", "m1"]);
        assert_eq!(banners.len(), 5);
    }

    #[test]
    fn expiry_removes_once() {
        let mut banners = Banners::default();
        let id = banners.push("bye", at(10));
        assert!(banners.expire(id).is_some());
        assert!(banners.expire(id).is_none());
        assert!(!banners.mark_read(id));
        assert!(banners.is_empty());
    }
}
