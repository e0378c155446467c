//! The route enforcer.

use std::sync::Arc;

use tracing::{debug, info};

use super::error::{EnforcementError, EnforcementResult};
use crate::firewall::{normalize_port_range, BlockRule, FirewallBackend};

/// Reserved name prefix for every rule this crate creates. Prefix scoping
/// is the safety boundary: enumeration and bulk deletion never reach past
/// it into unrelated firewall rules.
pub const DEFAULT_RULE_PREFIX: &str = "RelayPicker-";

/// Maps route display names to backend block rules.
///
/// One enforcer holds one backend reference for its whole lifetime; there
/// is no per-operation backend acquisition. All operations are idempotent.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use relaypicker_core::enforce::RouteEnforcer;
/// use relaypicker_core::firewall::NullFirewall;
///
/// let enforcer = RouteEnforcer::new(Arc::new(NullFirewall));
/// assert_eq!(enforcer.prefix(), "RelayPicker-");
/// ```
pub struct RouteEnforcer {
    backend: Arc<dyn FirewallBackend>,
    prefix: String,
}

impl RouteEnforcer {
    /// Creates an enforcer over the given backend with the default prefix.
    #[must_use]
    pub fn new(backend: Arc<dyn FirewallBackend>) -> Self {
        Self::with_prefix(backend, DEFAULT_RULE_PREFIX)
    }

    /// Creates an enforcer with a custom rule-name prefix.
    #[must_use]
    pub fn with_prefix(backend: Arc<dyn FirewallBackend>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    /// Returns the reserved rule-name prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn rule_name(&self, display_name: &str) -> String {
        format!("{}{display_name}", self.prefix)
    }

    /// Returns whether a backend rule named exactly `prefix + display_name`
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`EnforcementError::Backend`] if the backend cannot be
    /// enumerated.
    pub async fn is_blocked(&self, display_name: &str) -> EnforcementResult<bool> {
        let rule_name = self.rule_name(display_name);
        let rules = self
            .backend
            .list_rules(&self.prefix)
            .await
            .map_err(|source| EnforcementError::Backend {
                display_name: display_name.to_string(),
                source,
            })?;

        Ok(rules.iter().any(|rule| rule.name == rule_name))
    }

    /// Blocks outbound traffic to `address` on `port_range` for this route.
    ///
    /// Idempotent: any existing rule with the same name is deleted first, so
    /// repeated enables leave exactly one rule. The port range is normalized
    /// to the backend's dash syntax; already-normalized input is unchanged.
    /// Delete-then-create is the best-effort atomicity unit — a failure in
    /// between is reported, not rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`EnforcementError::Backend`] carrying the display name on
    /// any backend failure.
    pub async fn enable(
        &self,
        display_name: &str,
        address: &str,
        port_range: &str,
    ) -> EnforcementResult<()> {
        let rule_name = self.rule_name(display_name);

        self.backend
            .remove_rule(&rule_name)
            .await
            .map_err(|source| EnforcementError::Backend {
                display_name: display_name.to_string(),
                source,
            })?;

        let rule = BlockRule::new(rule_name, address, normalize_port_range(port_range));
        self.backend
            .add_rule(rule)
            .await
            .map_err(|source| EnforcementError::Backend {
                display_name: display_name.to_string(),
                source,
            })?;

        info!(route = display_name, address, "outbound block enabled");
        Ok(())
    }

    /// Removes this route's block rule; absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`EnforcementError::Backend`] carrying the display name if
    /// the backend fails.
    pub async fn disable(&self, display_name: &str) -> EnforcementResult<()> {
        let rule_name = self.rule_name(display_name);

        self.backend
            .remove_rule(&rule_name)
            .await
            .map_err(|source| EnforcementError::Backend {
                display_name: display_name.to_string(),
                source,
            })?;

        info!(route = display_name, "outbound block disabled");
        Ok(())
    }

    /// Removes every rule under the reserved prefix, regardless of which
    /// candidate created it. Rules outside the prefix are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`EnforcementError::Clear`] if enumeration or any removal
    /// fails; rules already removed stay removed.
    pub async fn clear_all(&self) -> EnforcementResult<usize> {
        let rules = self
            .backend
            .list_rules(&self.prefix)
            .await
            .map_err(|source| EnforcementError::Clear {
                prefix: self.prefix.clone(),
                source,
            })?;

        let mut removed = 0;
        for rule in &rules {
            self.backend
                .remove_rule(&rule.name)
                .await
                .map_err(|source| EnforcementError::Clear {
                    prefix: self.prefix.clone(),
                    source,
                })?;
            removed += 1;
        }

        debug!(removed, prefix = %self.prefix, "cleared prefixed rules");
        Ok(removed)
    }
}
