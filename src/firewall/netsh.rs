//! Windows Advanced Firewall backend via `netsh`.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::backend::FirewallBackend;
use super::error::{FirewallError, FirewallResult};
use super::types::BlockRule;

/// Message `netsh` prints when a delete/show matches nothing. Absence is
/// not an error for this capability, so it is filtered out of failures.
const NO_MATCH_MARKER: &str = "No rules match";

/// Production backend driving `netsh advfirewall firewall`.
///
/// Only selected on Windows (see
/// [`platform_default`](super::platform_default)); the command layer and
/// output parser compile everywhere so they stay testable.
///
/// # Locale Limitation
///
/// `netsh` prints localized output and exposes no machine-readable mode.
/// The `Rule Name`/`RemoteIP`/`RemotePort` keys and the no-match marker
/// here are the English forms: on a localized Windows install,
/// [`list_rules`](FirewallBackend::list_rules) parses zero rules (every
/// route reads as unblocked) and [`remove_rule`](FirewallBackend::remove_rule)
/// reports absence as a failure. Exit codes cannot disambiguate — `netsh`
/// returns the same nonzero status for "no rules match" and for real
/// errors. Deployments on non-English systems need a backend keyed to the
/// system locale or a different rule API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetshFirewall;

impl NetshFirewall {
    /// Creates the `netsh` backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn run(args: &[&str]) -> FirewallResult<(bool, String)> {
        let output = Command::new("netsh")
            .args(args)
            .output()
            .await
            .map_err(|e| FirewallError::Backend(format!("failed to spawn netsh: {e}")))?;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok((output.status.success(), text))
    }
}

#[async_trait]
impl FirewallBackend for NetshFirewall {
    async fn list_rules(&self, name_prefix: &str) -> FirewallResult<Vec<BlockRule>> {
        let (ok, text) =
            Self::run(&["advfirewall", "firewall", "show", "rule", "name=all"]).await?;

        if !ok {
            if text.contains(NO_MATCH_MARKER) {
                return Ok(Vec::new());
            }
            return Err(FirewallError::Backend(
                "netsh show rule failed".to_string(),
            ));
        }

        Ok(parse_show_output(&text, name_prefix))
    }

    async fn add_rule(&self, rule: BlockRule) -> FirewallResult<()> {
        let name = format!("name={}", rule.name);
        let remote_ip = format!("remoteip={}", rule.remote_address);
        let remote_port = format!("remoteport={}", rule.remote_ports);

        let (ok, text) = Self::run(&[
            "advfirewall",
            "firewall",
            "add",
            "rule",
            &name,
            "dir=out",
            "action=block",
            "protocol=UDP",
            &remote_ip,
            &remote_port,
            "enable=yes",
        ])
        .await?;

        if ok {
            debug!(rule = %rule.name, "block rule added");
            Ok(())
        } else {
            warn!(rule = %rule.name, "netsh add rule failed");
            Err(FirewallError::Backend(format!(
                "netsh add rule `{}` failed: {}",
                rule.name,
                text.trim()
            )))
        }
    }

    async fn remove_rule(&self, name: &str) -> FirewallResult<()> {
        let name_arg = format!("name={name}");
        let (ok, text) =
            Self::run(&["advfirewall", "firewall", "delete", "rule", &name_arg]).await?;

        if ok || text.contains(NO_MATCH_MARKER) {
            debug!(rule = %name, "block rule removed");
            Ok(())
        } else {
            Err(FirewallError::Backend(format!(
                "netsh delete rule `{name}` failed: {}",
                text.trim()
            )))
        }
    }
}

/// Parses `netsh advfirewall firewall show rule name=all` output into the
/// rules whose names start with `name_prefix`.
///
/// The output is a sequence of `Key: Value` blocks, one per rule, each
/// introduced by a `Rule Name:` line. Remote addresses may carry a mask
/// suffix (`155.133.248.39/32`), which is stripped.
fn parse_show_output(output: &str, name_prefix: &str) -> Vec<BlockRule> {
    let mut rules = Vec::new();
    let mut current: Option<BlockRule> = None;

    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "Rule Name" => {
                if let Some(rule) = current.take() {
                    rules.push(rule);
                }
                if value.starts_with(name_prefix) {
                    current = Some(BlockRule::new(value, "", ""));
                }
            }
            "RemoteIP" => {
                if let Some(rule) = current.as_mut() {
                    rule.remote_address = value
                        .split('/')
                        .next()
                        .unwrap_or(value)
                        .to_string();
                }
            }
            "RemotePort" => {
                if let Some(rule) = current.as_mut() {
                    rule.remote_ports = value.to_string();
                }
            }
            _ => {}
        }
    }

    if let Some(rule) = current.take() {
        rules.push(rule);
    }

    rules
}
