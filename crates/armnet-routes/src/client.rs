//! Collection operations on route tables.

use armnet_core::ResourceCollection;

use crate::route_table::RouteTable;

/// Entry point for route tables in one subscription.
pub type RouteTableClient = ResourceCollection<RouteTable>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockTransport, SUB};
    use serde_json::json;

    #[tokio::test]
    async fn get_by_id_rebuilds_routes() {
        let id = format!("/subscriptions/{SUB}/resourceGroups/rg/providers/Microsoft.Network/routeTables/rt");
        let mut transport = MockTransport::new();
        transport.expect_get().returning(|path, _| {
            Ok(json!({
                "id": path,
                "name": "rt",
                "properties": {"routes": [{"name": "r1", "properties": {"addressPrefix": "10.0.0.0/8", "nextHopType": "None"}}]}
            }))
        });

        let table = RouteTableClient::new(context(transport)).get_by_id(&id).await.unwrap();
        assert_eq!(table.resource_group_name(), Some("rg"));
        assert!(table.routes().contains_key("r1"));
    }
}
