//! Integration tests for reading load balancers as returned by the provider.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use armnet_core::{ArmClient, ArmContext, TopLevelResource};
use armnet_lb::{LoadBalancer, LoadBalancerInner, LoadDistribution, ProbeProtocol};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture() -> LoadBalancerInner {
    let path = fixtures_dir().join("load_balancer.json");
    let json = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture at {}: {}", path.display(), e));
    serde_json::from_str(&json).unwrap_or_else(|e| panic!("Failed to deserialize load balancer: {}", e))
}

/// Wrap the fixture with a context whose transport is never called.
fn load_balancer() -> LoadBalancer {
    let client = ArmClient::new("https://management.example.test").expect("valid URL");
    let context = ArmContext::new(Arc::new(client), "00000000-0000-0000-0000-000000000001");
    LoadBalancer::from_inner(context, load_fixture())
}

#[test]
fn test_envelope_fields() {
    let inner = load_fixture();
    assert_eq!(inner.location.as_deref(), Some("westus2"));
    assert_eq!(inner.sku.as_ref().and_then(|s| s.name.as_deref()), Some("Standard"));
    let props = inner.properties.as_ref().expect("properties");
    assert_eq!(props.provisioning_state.as_deref(), Some("Succeeded"));
}

#[test]
fn test_scope_comes_from_id() {
    let lb = load_balancer();
    assert_eq!(lb.name(), "web-lb");
    assert_eq!(lb.resource_group_name(), Some("web-rg"));
    assert_eq!(lb.region(), Some("westus2"));
}

#[test]
fn test_children_are_indexed() {
    let lb = load_balancer();
    assert_eq!(lb.frontends().len(), 1);
    assert_eq!(lb.backends().len(), 1);
    assert_eq!(lb.probes().len(), 1);
    assert_eq!(lb.load_balancing_rules().len(), 2);
    assert_eq!(lb.inbound_nat_rules().len(), 1);
}

#[test]
fn test_public_frontend() {
    let lb = load_balancer();
    let frontend = &lb.frontends()["public-fe"];
    assert!(frontend.is_public());
    assert!(lb.is_internet_facing());
    assert_eq!(lb.public_ip_address_ids().len(), 1);
    assert!(lb.public_ip_address_ids()[0].ends_with("/publicIPAddresses/web-pip"));
    assert_eq!(frontend.load_balancing_rule_names(), vec!["http", "https"]);
    assert_eq!(frontend.inbound_nat_rule_names(), vec!["ssh-vm1"]);
}

#[test]
fn test_rules_reference_siblings_by_name() {
    let lb = load_balancer();
    let https = &lb.load_balancing_rules()["https"];
    assert_eq!(https.frontend_name(), Some("public-fe"));
    assert_eq!(https.backend_name(), Some("web-pool"));
    assert_eq!(https.probe_name(), Some("http-probe"));
    assert_eq!(https.frontend_port(), Some(443));
    assert_eq!(https.backend_port(), Some(8443));
    assert_eq!(https.load_distribution(), Some(LoadDistribution::SourceIp));
    assert!(!https.is_floating_ip_enabled());
}

#[test]
fn test_probe_and_its_rules() {
    let lb = load_balancer();
    let probe = &lb.probes()["http-probe"];
    assert_eq!(probe.protocol(), Some(ProbeProtocol::Http));
    assert_eq!(probe.request_path(), Some("/healthz"));
    assert_eq!(probe.interval_in_seconds(), Some(5));

    let mut names: Vec<_> = lb.rules_for_probe("HTTP-PROBE").iter().map(|r| r.name()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["http", "https"]);
}

#[test]
fn test_backend_members_and_nat_target() {
    let lb = load_balancer();
    let pool = &lb.backends()["web-pool"];
    assert_eq!(pool.backend_ip_configuration_ids().len(), 2);

    let ssh = &lb.inbound_nat_rules()["ssh-vm1"];
    assert_eq!(ssh.frontend_port(), Some(50001));
    assert!(ssh
        .backend_ip_configuration_id()
        .is_some_and(|id| id.contains("/networkInterfaces/vm1-nic/")));
}

#[test]
fn test_read_only_fields_are_not_sent_back() {
    let value = serde_json::to_value(load_balancer().into_inner()).expect("serialize");
    let props = &value["properties"];
    assert!(props.get("provisioningState").is_none());
    assert!(props["backendAddressPools"][0]["properties"].get("backendIPConfigurations").is_none());
    assert_eq!(props["loadBalancingRules"].as_array().map(Vec::len), Some(2));
}
