//! Collection operations on public IP addresses.

use armnet_core::ResourceCollection;

use crate::public_ip::PublicIpAddress;

/// Entry point for public IP addresses in one subscription.
pub type PublicIpClient = ResourceCollection<PublicIpAddress>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockTransport, SUB};
    use serde_json::json;

    #[tokio::test]
    async fn list_by_resource_group_wraps_items() {
        let mut transport = MockTransport::new();
        transport
            .expect_list()
            .withf(|path, query| {
                path == format!("/subscriptions/{SUB}/resourceGroups/rg/providers/Microsoft.Network/publicIPAddresses")
                    && query.pairs()[0].0 == "api-version"
            })
            .returning(|_, _| {
                Ok(vec![
                    json!({"id": format!("/subscriptions/{SUB}/resourceGroups/rg/providers/Microsoft.Network/publicIPAddresses/a"), "name": "a"}),
                    json!({"id": format!("/subscriptions/{SUB}/resourceGroups/rg/providers/Microsoft.Network/publicIPAddresses/b"), "name": "b"}),
                ])
            });

        let client = PublicIpClient::new(context(transport));
        let pips = client.list_by_resource_group("rg").await.unwrap();
        let names: Vec<_> = pips.iter().map(PublicIpAddress::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(pips.iter().all(|p| p.resource_group_name() == Some("rg")));
    }

    #[tokio::test]
    async fn define_starts_without_resource_group() {
        let client = PublicIpClient::new(context(MockTransport::new()));
        let pip = client.define("pip1");
        assert_eq!(pip.name(), "pip1");
        assert_eq!(pip.resource_group_name(), None);
    }

    #[tokio::test]
    async fn delete_by_resource_group_targets_resource_id() {
        let mut transport = MockTransport::new();
        transport
            .expect_delete()
            .withf(|path, _| path.ends_with("/publicIPAddresses/pip1"))
            .times(1)
            .returning(|_, _| Ok(()));

        PublicIpClient::new(context(transport))
            .delete_by_resource_group("rg", "pip1")
            .await
            .unwrap();
    }
}
