//! Shared snapshot fixtures for unit tests

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::storage::SnapshotDocument;

pub fn write_snapshot(dir: &Path, token: u64, document: &Value) {
    let path = dir.join(format!("timestamp_{}.json", token));
    fs::write(path, serde_json::to_vec(document).unwrap()).unwrap();
}

/// Directed chain A -> B -> C; every `load` is scaled by `t + 1`
pub fn chain_document(t: usize) -> Value {
    let scale = (t + 1) as f64;
    json!({
        "directed": true,
        "node_types": {"Stage": ["load", "id"]},
        "node_values": {"Stage": [
            [0.5 * scale, "A"],
            [0.25 * scale, "B"],
            [0.1 * scale, "C"]
        ]},
        "relationship_types": {"Flow": ["capacity"]},
        "relationship_values": [
            ["Flow", 10.0 * scale, "A", "B"],
            ["Flow", 20.0 * scale, "B", "C"]
        ]
    })
}

pub fn write_chain_snapshots(dir: &Path, count: usize) {
    for t in 0..count {
        write_snapshot(dir, t as u64, &chain_document(t));
    }
}

/// ProductOffering documents whose `demand` values are given per timestamp
pub fn demand_document(demands: &[f64]) -> Value {
    let records: Vec<Value> = demands
        .iter()
        .enumerate()
        .map(|(i, demand)| json!([format!("Offering {}", i), 10.0, demand, format!("PO_{:03}", i)]))
        .collect();
    json!({
        "directed": true,
        "node_types": {"ProductOffering": ["name", "cost", "demand", "id"]},
        "node_values": {"ProductOffering": records},
        "relationship_types": {},
        "relationship_values": []
    })
}

pub fn supply_chain_value() -> Value {
    json!({
        "directed": true,
        "node_types": {
            "BusinessGroup": ["name", "revenue", "id"],
            "ProductFamily": ["name", "revenue", "id"],
            "ProductOffering": ["name", "cost", "demand", "id"],
            "Supplier": ["name", "reliability", "size", "supplied_part_types", "id"],
            "Warehouse": ["name", "max_capacity", "current_capacity", "safety_stock", "max_parts", "id"],
            "Facility": ["name", "max_capacity", "operating_cost", "id"],
            "Parts": ["name", "subtype", "cost", "importance_factor", "valid_from", "valid_till", "id"]
        },
        "node_values": {
            "BusinessGroup": [["Industrial", 1.0e7, "BG_001"]],
            "ProductFamily": [["Pumps", 4.0e6, "PF_001"]],
            "ProductOffering": [
                ["Pump S", 100.0, 10, "PO_001"],
                ["Pump M", 150.0, 50, "PO_002"],
                ["Pump L", 80.0, 5, "PO_003"]
            ],
            "Supplier": [
                ["Acme", 0.7, "large", ["bolt", "nut"], "S_001"],
                ["Globex", 0.95, "small", ["gear"], "S_002"],
                ["Initech", 0.5, "medium", ["bolt"], "S_003"]
            ],
            "Warehouse": [
                ["North", 1000, 800, 50, 20, "W_001"],
                ["South", 500, 120, 25, 10, "W_002"]
            ],
            "Facility": [
                ["Plant A", 300, 5000.0, "F_001"],
                ["Plant B", 900, 12000.0, "F_002"]
            ],
            "Parts": [
                ["Bolt M8", "bolt", 0.2, 0.9, "2024-01-01", "2024-03-01", "P_001"],
                ["Bolt M10", "bolt", 0.3, 0.4, "2024-01-01", "2025-01-01", "P_002"],
                ["Gear 40T", "gear", 12.0, 0.95, "not-a-date", "2024-02-01", "P_003"],
                ["Nut M8", "nut", 0.1, 0.8, "2023-01-01", "2023-06-30", "P_004"]
            ]
        },
        "relationship_types": {
            "BusinessGroupToProductFamily": [],
            "ProductFamilyToProductOffering": [],
            "SupplierToWarehouse": ["transportation_cost", "lead_time"],
            "WarehouseToParts": ["inventory_level", "storage_cost"],
            "PartsToFacility": ["quantity", "distance", "transport_cost", "lead_time"],
            "FacilityToParts": ["production_cost", "lead_time", "quantity"],
            "FacilityToProductOfferings": ["product_cost", "lead_time", "quantity"]
        },
        "relationship_values": [
            ["BusinessGroupToProductFamily", "BG_001", "PF_001"],
            ["ProductFamilyToProductOffering", "PF_001", "PO_001"],
            ["ProductFamilyToProductOffering", "PF_001", "PO_002"],
            ["SupplierToWarehouse", 120.0, 3, "S_001", "W_001"],
            ["SupplierToWarehouse", 80.0, 5, "S_002", "W_001"],
            ["SupplierToWarehouse", 200.0, 7, "S_003", "W_002"],
            ["WarehouseToParts", 400, 1.5, "W_001", "P_001"],
            ["WarehouseToParts", 250, 1.0, "W_001", "P_002"],
            ["WarehouseToParts", 100, 2.0, "W_002", "P_001"],
            ["WarehouseToParts", 30, 4.5, "W_002", "P_003"],
            ["PartsToFacility", 10, 500.0, 300.0, 2, "P_001", "F_001"],
            ["PartsToFacility", 5, 50.0, 20.0, 1, "P_002", "F_001"],
            ["PartsToFacility", 8, 900.0, 450.0, 4, "P_003", "F_002"],
            ["PartsToFacility", 1, 800.0, 100.0, 1, "P_004", "F_002"],
            ["FacilityToParts", 3.5, 2, 100, "F_001", "P_004"],
            ["FacilityToProductOfferings", 60.0, 6, 40, "F_001", "PO_001"],
            ["FacilityToProductOfferings", 55.0, 8, 25, "F_002", "PO_001"],
            ["FacilityToProductOfferings", 90.0, 9, 15, "F_002", "PO_002"]
        ]
    })
}

pub fn supply_chain_document() -> SnapshotDocument {
    SnapshotDocument::from_value(supply_chain_value()).unwrap()
}
