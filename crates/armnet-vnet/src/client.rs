//! Collection operations on virtual networks.

use armnet_core::ResourceCollection;

use crate::network::Network;

/// Entry point for virtual networks in one subscription.
pub type NetworkClient = ResourceCollection<Network>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockTransport, SUB};
    use serde_json::json;

    #[tokio::test]
    async fn get_by_resource_group_builds_child_maps() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|path, _| {
                path == format!("/subscriptions/{SUB}/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet1")
            })
            .returning(|path, _| {
                Ok(json!({
                    "id": path,
                    "name": "vnet1",
                    "properties": {"subnets": [{"name": "s1", "properties": {"addressPrefix": "10.0.0.0/24"}}]}
                }))
            });

        let network = NetworkClient::new(context(transport))
            .get_by_resource_group("rg", "vnet1")
            .await
            .unwrap();
        assert_eq!(network.name(), "vnet1");
        assert!(network.subnets().contains_key("s1"));
    }

    #[tokio::test]
    async fn list_spans_subscription() {
        let mut transport = MockTransport::new();
        transport
            .expect_list()
            .withf(|path, _| path == format!("/subscriptions/{SUB}/providers/Microsoft.Network/virtualNetworks"))
            .returning(|_, _| Ok(vec![json!({"name": "a"}), json!({"name": "b"})]));

        let networks = NetworkClient::new(context(transport)).list().await.unwrap();
        assert_eq!(networks.len(), 2);
    }
}
