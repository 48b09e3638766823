use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Proto {
    Tcp,
    Udp,
    Icmp,
}

/*
* A single firewall exception.
* Rules are stored and handed over to the firewall component,
* tplvm never evaluates them.
*/
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FirewallRule {
    pub address: String,
    pub netmask: Option<u8>,
    pub proto: Option<Proto>,
    pub port: Option<u16>,
    /// Upper bound of a port range starting at `port`.
    pub to_port: Option<u16>,
}

/*
* The network policy of a vm:
* a default action plus ordered exceptions.
*/
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FirewallPolicy {
    pub rules: Vec<FirewallRule>,
    pub allow: bool,
    pub allow_dns: bool,
    pub allow_icmp: bool,
    /// Allow traffic to the update proxy,
    /// so templates can fetch packages while being denied anything else.
    pub allow_update_proxy: bool,
}

/// Policy of vms that are not based on a template.
impl Default for FirewallPolicy {
    fn default() -> Self {
        Self {
            rules: vec![],
            allow: true,
            allow_dns: true,
            allow_icmp: true,
            allow_update_proxy: false,
        }
    }
}

impl FirewallPolicy {
    /// Policy seeded into new vms attached to a template.
    pub fn template_defaults() -> Self {
        Self {
            rules: vec![],
            allow: false,
            allow_dns: false,
            allow_icmp: false,
            allow_update_proxy: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_to_json() -> miette::Result<()> {
        let json = serde_json::to_value(FirewallPolicy::template_defaults()).unwrap();
        let expected = serde_json::json!({
            "rules": [],
            "allow": false,
            "allow_dns": false,
            "allow_icmp": false,
            "allow_update_proxy": true,
        });
        assert_eq!(json, expected);
        Ok(())
    }

    #[test]
    fn rule_from_toml() {
        let toml = r#"
            address = "10.137.0.0"
            netmask = 16
            proto = "tcp"
            port = 443
        "#;
        let rule: FirewallRule = toml::from_str(toml).unwrap();
        assert_eq!(rule.proto, Some(Proto::Tcp));
        assert_eq!(rule.to_port, None);
    }
}
