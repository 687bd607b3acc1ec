//! Value types describing units and their port rules.

use serde::{Deserialize, Serialize};

/// One port-forward or inter-container link rule.
///
/// Both ports must be in the range 1-65535. A `PortMap` is immutable once
/// constructed, and the daemon applies rules in the order supplied, so
/// sequences of `PortMap`s keep their caller-given order all the way to the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMap {
    /// Port inside the container.
    pub internal_port: u16,
    /// Port exposed on the host; for links, the host-side listening port.
    pub external_port: u16,
    /// Target address for a link rule, absent for a plain forward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_address: Option<String>,
}

impl PortMap {
    /// Create a plain port-forward rule.
    #[must_use]
    pub const fn new(internal_port: u16, external_port: u16) -> Self {
        Self {
            internal_port,
            external_port,
            internal_address: None,
        }
    }

    /// Set the link target address, turning this rule into a link.
    #[must_use]
    pub fn with_internal_address(mut self, address: impl Into<String>) -> Self {
        self.internal_address = Some(address.into());
        self
    }
}

/// A unit as reported by the daemon's container listing.
///
/// Lifecycle state is observed here, never stored: a unit "exists" as soon
/// as the daemon accepts it, and its workload reaches the `running`
/// sub-state some time later (or never).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Unit name, the daemon's container `Id`.
    pub name: String,
    /// Image reference, when the daemon includes it in the listing.
    pub image: Option<String>,
    /// Daemon-reported fine-grained lifecycle state, e.g. `"running"`.
    pub sub_state: String,
}

impl Unit {
    /// Whether the daemon reports this unit's workload as running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.sub_state == "running"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn forward_wire_shape() {
        let map = PortMap::new(8080, 9000);
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            json!({"internal_port": 8080, "external_port": 9000})
        );
    }

    #[test]
    fn link_wire_shape() {
        let map = PortMap::new(31337, 4001).with_internal_address("10.0.0.5");
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            json!({
                "internal_port": 31337,
                "external_port": 4001,
                "internal_address": "10.0.0.5"
            })
        );
    }

    #[test]
    fn sequences_keep_caller_order() {
        let rules = vec![PortMap::new(8080, 9000), PortMap::new(22, 2022)];
        assert_eq!(
            serde_json::to_value(&rules).unwrap(),
            json!([
                {"internal_port": 8080, "external_port": 9000},
                {"internal_port": 22, "external_port": 2022}
            ])
        );
    }

    #[test]
    fn missing_address_deserializes_as_none() {
        let map: PortMap =
            serde_json::from_value(json!({"internal_port": 8080, "external_port": 9000})).unwrap();
        assert_eq!(map, PortMap::new(8080, 9000));
    }

    #[test]
    fn running_sub_state() {
        let unit = Unit {
            name: "web1".to_string(),
            image: Some("busybox-http".to_string()),
            sub_state: "running".to_string(),
        };
        assert!(unit.is_running());

        let starting = Unit {
            sub_state: "start".to_string(),
            ..unit
        };
        assert!(!starting.is_running());
    }
}
