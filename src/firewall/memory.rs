//! In-memory firewall backend for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::backend::FirewallBackend;
use super::error::FirewallResult;
use super::types::BlockRule;

/// Synchronously-persisting backend backed by a map.
///
/// # Warning
///
/// Blocks no traffic. Only use this for testing the enforcement contract.
#[derive(Debug, Default)]
pub struct MemoryFirewall {
    rules: RwLock<HashMap<String, BlockRule>>,
}

impl MemoryFirewall {
    /// Creates an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of rules held, regardless of prefix.
    pub async fn rule_count(&self) -> usize {
        self.rules.read().await.len()
    }
}

#[async_trait]
impl FirewallBackend for MemoryFirewall {
    async fn list_rules(&self, name_prefix: &str) -> FirewallResult<Vec<BlockRule>> {
        let rules = self.rules.read().await;
        Ok(rules
            .values()
            .filter(|rule| rule.name.starts_with(name_prefix))
            .cloned()
            .collect())
    }

    async fn add_rule(&self, rule: BlockRule) -> FirewallResult<()> {
        let mut rules = self.rules.write().await;
        rules.insert(rule.name.clone(), rule);
        Ok(())
    }

    async fn remove_rule(&self, name: &str) -> FirewallResult<()> {
        let mut rules = self.rules.write().await;
        rules.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_then_list_finds_rule() {
        let backend = MemoryFirewall::new();
        backend
            .add_rule(BlockRule::new("RelayPicker-Frankfurt 1", "1.2.3.4", "1-2"))
            .await
            .expect("add succeeds");

        let rules = backend.list_rules("RelayPicker-").await.expect("list succeeds");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "RelayPicker-Frankfurt 1");
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let backend = MemoryFirewall::new();
        backend
            .add_rule(BlockRule::new("RelayPicker-Frankfurt 1", "1.2.3.4", "1-2"))
            .await
            .expect("add succeeds");
        backend
            .add_rule(BlockRule::new("Unrelated rule", "5.6.7.8", "3-4"))
            .await
            .expect("add succeeds");

        let rules = backend.list_rules("RelayPicker-").await.expect("list succeeds");
        assert_eq!(rules.len(), 1, "unprefixed rules must not be listed");
        assert_eq!(backend.rule_count().await, 2);
    }

    #[tokio::test]
    async fn remove_of_absent_rule_succeeds() {
        let backend = MemoryFirewall::new();
        backend
            .remove_rule("RelayPicker-Never Existed")
            .await
            .expect("removing an absent rule is not an error");
    }

    #[tokio::test]
    async fn add_with_same_name_replaces() {
        let backend = MemoryFirewall::new();
        backend
            .add_rule(BlockRule::new("RelayPicker-Frankfurt 1", "1.2.3.4", "1-2"))
            .await
            .expect("add succeeds");
        backend
            .add_rule(BlockRule::new("RelayPicker-Frankfurt 1", "9.9.9.9", "5-6"))
            .await
            .expect("add succeeds");

        let rules = backend.list_rules("RelayPicker-").await.expect("list succeeds");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].remote_address, "9.9.9.9");
    }
}
