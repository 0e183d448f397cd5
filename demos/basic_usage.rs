//! Basic usage example for supplygraph
//!
//! Run: cargo run --example basic_usage

use std::fs;

use serde_json::json;
use supplygraph::query;
use supplygraph::{GraphStore, Session, SessionConfig};
use tempfile::TempDir;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== supplygraph - Basic Usage ===\n");

    // Three daily snapshots of a tiny supply chain; demand and costs drift
    let dir = TempDir::new()?;
    for t in 0..3u32 {
        let drift = f64::from(t);
        let document = json!({
            "directed": true,
            "node_types": {
                "ProductOffering": ["name", "cost", "demand", "id"],
                "Facility": ["name", "operating_cost", "id"],
                "Parts": ["name", "subtype", "importance_factor", "valid_from", "valid_till", "id"],
                "Warehouse": ["name", "id"],
                "Supplier": ["name", "reliability", "supplied_part_types", "id"]
            },
            "node_values": {
                "ProductOffering": [["Pump S", 90.0 + drift, 20.0 + 10.0 * drift, "PO_001"]],
                "Facility": [["Plant A", 8000.0 + 2500.0 * drift, "F_001"]],
                "Parts": [
                    ["Bolt M8", "bolt", 0.9, "2024-01-01", "2024-02-15", "P_001"],
                    ["Gear 40T", "gear", 0.3, "2024-01-01", "2025-01-01", "P_002"]
                ],
                "Warehouse": [["North", "W_001"]],
                "Supplier": [["Acme", 0.6, ["bolt"], "S_001"]]
            },
            "relationship_types": {
                "SupplierToWarehouse": ["transportation_cost", "lead_time"],
                "WarehouseToParts": ["inventory_level"],
                "PartsToFacility": ["distance", "transport_cost"],
                "FacilityToProductOfferings": ["lead_time"]
            },
            "relationship_values": [
                ["SupplierToWarehouse", 150.0, 4, "S_001", "W_001"],
                ["WarehouseToParts", 300, "W_001", "P_001"],
                ["WarehouseToParts", 120, "W_001", "P_002"],
                ["PartsToFacility", 620.0, 240.0, "P_001", "F_001"],
                ["PartsToFacility", 40.0, 15.0, "P_002", "F_001"],
                ["FacilityToProductOfferings", 6, "F_001", "PO_001"]
            ]
        });
        fs::write(dir.path().join(format!("timestamp_{}.json", t)), serde_json::to_vec(&document)?)?;
    }

    println!("1. Opening session...");
    let mut session = Session::open(SessionConfig::new(dir.path()).cache_capacity(2))?;
    println!("   Timestamps: {:?}", session.timestamps());

    println!("\n2. Point-in-time queries at t=0...");
    let graph = session.select(0)?;
    println!("   {} nodes, {} edges", graph.node_count(), graph.edge_count());
    println!("   Parts for PO_001: {:?}", query::parts_for_product_offering(graph.as_ref(), "PO_001"));
    println!("   Suppliers for P_001: {:?}", query::suppliers_for_part(graph.as_ref(), "P_001"));
    println!(
        "   Transport cost S_001 -> W_001: {:?}",
        query::transportation_cost(graph.as_ref(), "S_001", "W_001")
    );

    let path = query::shortest_path(graph.as_ref(), "S_001", "PO_001")?;
    println!("   Path S_001 -> PO_001: {:?} (cost {})", path.path, path.cost);

    let lineage = query::ancestors_descendants(graph.as_ref(), "F_001")?;
    println!("   F_001 upstream: {:?}", lineage.ancestors);

    for part in query::bottleneck_parts(graph.as_ref(), 0.8, 60) {
        println!("   Bottleneck: {} ({} days)", part.id, part.expected_life_days);
    }

    println!("\n3. Trends across timestamps...");
    let analyzer = session.analyzer();
    for point in analyzer.node_attribute_trend("ProductOffering", "demand")? {
        println!("   t={} demand {:.1}", point.timestamp, point.value);
    }
    let report = analyzer.peak_classification("Facility", "operating_cost", 10000.0)?;
    println!("   Operating cost peaks at {:?}", report.peak);

    println!("\n=== Done ===");
    Ok(())
}
