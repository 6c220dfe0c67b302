//! Identity minting for replacement steps.

use uuid::Uuid;

/// Produces a fresh id for a logical step rescheduled to a new time.
pub trait IdGenerator {
    fn mint(&mut self, base_id: &str) -> String;
}

/// Random ids for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn mint(&mut self, _base_id: &str) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<base>#<n>` ids, counting from 1.
#[derive(Debug, Clone, Default)]
pub struct SequentialIdGenerator {
    issued: u64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn mint(&mut self, base_id: &str) -> String {
        self.issued += 1;
        format!("{base_id}#{}", self.issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_are_unique() {
        let mut ids = SequentialIdGenerator::new();
        assert_eq!(ids.mint("s2"), "s2#1");
        assert_eq!(ids.mint("s2"), "s2#2");
        assert_eq!(ids.mint("s3"), "s3#3");
    }

    #[test]
    fn test_uuid_ids_differ() {
        let mut ids = UuidIdGenerator;
        assert_ne!(ids.mint("a"), ids.mint("a"));
    }
}
