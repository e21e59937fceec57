use chrono::Utc;

/// Hands out creation-time ids (Unix milliseconds) that never repeat within a
/// run, even when two are requested in the same millisecond.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure later ids land above an id that already exists.
    pub fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }

    pub fn next(&mut self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.next_at(now)
    }

    pub fn next_at(&mut self, now_millis: u64) -> u64 {
        let id = now_millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_within_the_same_millisecond() {
        let mut ids = IdGenerator::new();
        let first = ids.next_at(1_000);
        let second = ids.next_at(1_000);
        let third = ids.next_at(999);
        assert_eq!(first, 1_000);
        assert_eq!(second, 1_001);
        assert_eq!(third, 1_002);
    }

    #[test]
    fn observed_ids_are_never_reissued() {
        let mut ids = IdGenerator::new();
        ids.observe(5_000);
        assert_eq!(ids.next_at(10), 5_001);
    }
}
