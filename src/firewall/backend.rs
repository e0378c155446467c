//! The firewall backend trait and the null implementation.

use async_trait::async_trait;

use super::error::FirewallResult;
use super::types::BlockRule;

/// Capability for managing named outbound block rules.
///
/// All three operations are safe to call repeatedly: listing is a pure
/// read, adding an already-present rule replaces nothing the core relies
/// on, and removing an absent rule succeeds.
#[async_trait]
pub trait FirewallBackend: Send + Sync {
    /// Returns every rule whose name starts with `name_prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`FirewallError::Backend`](super::FirewallError::Backend) if
    /// the backend cannot be enumerated.
    async fn list_rules(&self, name_prefix: &str) -> FirewallResult<Vec<BlockRule>>;

    /// Creates one outbound UDP block rule.
    ///
    /// # Errors
    ///
    /// Returns [`FirewallError::Backend`](super::FirewallError::Backend) if
    /// the rule cannot be created.
    async fn add_rule(&self, rule: BlockRule) -> FirewallResult<()>;

    /// Removes the rule with exactly this name; absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`FirewallError::Backend`](super::FirewallError::Backend) if
    /// the backend fails for a reason other than the rule not existing.
    async fn remove_rule(&self, name: &str) -> FirewallResult<()>;
}

/// Backend for platforms with no enforcement capability.
///
/// Every operation is a well-defined no-op: listing is always empty and
/// mutations succeed without effect. This keeps "unsupported platform" a
/// single code path instead of a branch per operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFirewall;

#[async_trait]
impl FirewallBackend for NullFirewall {
    async fn list_rules(&self, _name_prefix: &str) -> FirewallResult<Vec<BlockRule>> {
        Ok(Vec::new())
    }

    async fn add_rule(&self, _rule: BlockRule) -> FirewallResult<()> {
        Ok(())
    }

    async fn remove_rule(&self, _name: &str) -> FirewallResult<()> {
        Ok(())
    }
}
