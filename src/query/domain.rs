//! Supply-chain questions asked against one decoded snapshot.
//!
//! Every query reads vertex and edge attributes by name through
//! [`GraphStore`], so it works on any graph whose schema declares the
//! supply-chain node and relationship types. Absent identifiers yield empty
//! results rather than errors, matching how the dashboard selectors behave.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::{GraphError, Result};
use crate::graph::GraphStore;
use crate::storage::{EdgeRecord, NodeRecord};

pub const PRODUCT_OFFERING: &str = "ProductOffering";
pub const FACILITY: &str = "Facility";
pub const PARTS: &str = "Parts";
pub const SUPPLIER: &str = "Supplier";

pub const FACILITY_TO_PRODUCT_OFFERINGS: &str = "FacilityToProductOfferings";
pub const PARTS_TO_FACILITY: &str = "PartsToFacility";
pub const WAREHOUSE_TO_PARTS: &str = "WarehouseToParts";
pub const SUPPLIER_TO_WAREHOUSE: &str = "SupplierToWarehouse";

/// Date layout of `valid_from` / `valid_till`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitableProduct {
    pub id: String,
    pub cost: f64,
    pub demand: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityCost {
    pub id: String,
    pub operating_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BottleneckPart {
    pub id: String,
    pub importance_factor: f64,
    pub expected_life_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierCost {
    pub supplier: String,
    pub warehouse: String,
    pub reliability: f64,
    pub transportation_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtypeCount {
    pub subtype: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shipment {
    pub part: String,
    pub facility: String,
    pub distance: f64,
    pub transport_cost: f64,
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| GraphError::DateParse {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Sources of `relationship_type` edges arriving at `id`
fn typed_sources<'g, G: GraphStore + ?Sized>(graph: &'g G, id: &str, relationship_type: &str) -> Vec<&'g str> {
    graph
        .get_incoming_edges(id)
        .into_iter()
        .filter(|edge| edge.is_type(relationship_type))
        .map(|edge| {
            if graph.is_directed() {
                edge.src.as_str()
            } else {
                edge.other_end(id)
            }
        })
        .collect()
}

fn typed_edge<'g, G: GraphStore + ?Sized>(
    graph: &'g G,
    src: &str,
    dst: &str,
    relationship_type: &str,
) -> Option<&'g EdgeRecord> {
    graph.get_edge(src, dst).filter(|edge| edge.is_type(relationship_type))
}

/// Parts feeding any facility that produces `offering_id`.
///
/// Facility -> ProductOffering, then Parts -> Facility. Sorted, de-duplicated.
pub fn parts_for_product_offering<G: GraphStore + ?Sized>(graph: &G, offering_id: &str) -> Vec<String> {
    let mut parts = BTreeSet::new();

    for facility in typed_sources(graph, offering_id, FACILITY_TO_PRODUCT_OFFERINGS) {
        if !graph.get_node(facility).map_or(false, |n| n.is_type(FACILITY)) {
            continue;
        }
        for part in typed_sources(graph, facility, PARTS_TO_FACILITY) {
            if graph.get_node(part).map_or(false, |n| n.is_type(PARTS)) {
                parts.insert(part.to_string());
            }
        }
    }

    parts.into_iter().collect()
}

/// Offerings with `cost <= cost_ceiling` and `demand >= demand_floor`.
/// Missing cost never qualifies; missing demand counts as zero.
pub fn profitable_products<G: GraphStore + ?Sized>(
    graph: &G,
    cost_ceiling: f64,
    demand_floor: f64,
) -> Vec<ProfitableProduct> {
    graph
        .find_by_type(PRODUCT_OFFERING)
        .into_iter()
        .filter_map(|node| {
            let cost = node.get_f64("cost").unwrap_or(f64::INFINITY);
            let demand = node.get_f64("demand").unwrap_or(0.0);
            (cost <= cost_ceiling && demand >= demand_floor).then(|| ProfitableProduct {
                id: node.id.clone(),
                cost,
                demand,
            })
        })
        .collect()
}

pub fn high_operating_cost_facilities<G: GraphStore + ?Sized>(graph: &G, threshold: f64) -> Vec<FacilityCost> {
    graph
        .find_by_type(FACILITY)
        .into_iter()
        .filter_map(|node| {
            let operating_cost = node.get_f64("operating_cost").unwrap_or(0.0);
            (operating_cost > threshold).then(|| FacilityCost {
                id: node.id.clone(),
                operating_cost,
            })
        })
        .collect()
}

/// Suppliers shipping to any warehouse that stocks `part_id`. Sorted.
pub fn suppliers_for_part<G: GraphStore + ?Sized>(graph: &G, part_id: &str) -> Vec<String> {
    let mut suppliers = BTreeSet::new();
    for warehouse in typed_sources(graph, part_id, WAREHOUSE_TO_PARTS) {
        for supplier in typed_sources(graph, warehouse, SUPPLIER_TO_WAREHOUSE) {
            suppliers.insert(supplier.to_string());
        }
    }
    suppliers.into_iter().collect()
}

fn node_date(node: &NodeRecord, field: &str) -> Option<Result<NaiveDate>> {
    node.get_str(field).filter(|s| !s.is_empty()).map(parse_date)
}

/// Both validity dates of a part, or `None` if either is missing.
/// Malformed dates are logged and also yield `None`.
fn validity_window(node: &NodeRecord) -> Option<(NaiveDate, NaiveDate)> {
    let from = node_date(node, "valid_from")?;
    let till = node_date(node, "valid_till")?;
    match (from, till) {
        (Ok(from), Ok(till)) => Some((from, till)),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("Skipping part {}: {}", node.id, e);
            None
        }
    }
}

/// Parts whose validity window overlaps `[start, end]`, in graph order
pub fn valid_parts_in_range<G: GraphStore + ?Sized>(graph: &G, start: NaiveDate, end: NaiveDate) -> Vec<String> {
    graph
        .find_by_type(PARTS)
        .into_iter()
        .filter(|node| match validity_window(node) {
            Some((from, till)) => from <= end && till >= start,
            None => false,
        })
        .map(|node| node.id.clone())
        .collect()
}

/// Important parts with a short validity window.
///
/// Parts without a usable window have unbounded life and never qualify.
pub fn bottleneck_parts<G: GraphStore + ?Sized>(
    graph: &G,
    importance_threshold: f64,
    max_life_days: i64,
) -> Vec<BottleneckPart> {
    graph
        .find_by_type(PARTS)
        .into_iter()
        .filter_map(|node| {
            let importance_factor = node.get_f64("importance_factor")?;
            if importance_factor < importance_threshold {
                return None;
            }
            let life = validity_window(node).map(|(from, till)| (till - from).num_days());
            match life {
                Some(days) if days <= max_life_days => Some(BottleneckPart {
                    id: node.id.clone(),
                    importance_factor,
                    expected_life_days: days,
                }),
                _ => None,
            }
        })
        .collect()
}

pub fn transportation_cost<G: GraphStore + ?Sized>(graph: &G, supplier_id: &str, warehouse_id: &str) -> Option<f64> {
    typed_edge(graph, supplier_id, warehouse_id, SUPPLIER_TO_WAREHOUSE)?.get_f64("transportation_cost")
}

pub fn lead_time<G: GraphStore + ?Sized>(graph: &G, supplier_id: &str, warehouse_id: &str) -> Option<f64> {
    typed_edge(graph, supplier_id, warehouse_id, SUPPLIER_TO_WAREHOUSE)?.get_f64("lead_time")
}

/// Supplier links costing at least `min_cost` whose supplier reliability is
/// at most `reliability_ceiling`. Missing values read as zero.
pub fn supplier_reliability_costing<G: GraphStore + ?Sized>(
    graph: &G,
    reliability_ceiling: f64,
    min_cost: f64,
) -> Vec<SupplierCost> {
    graph
        .get_all_edges()
        .into_iter()
        .filter(|edge| edge.is_type(SUPPLIER_TO_WAREHOUSE))
        .filter_map(|edge| {
            let transportation_cost = edge.get_f64("transportation_cost").unwrap_or(0.0);
            if transportation_cost < min_cost {
                return None;
            }
            let reliability = graph
                .get_node(&edge.src)
                .and_then(|n| n.get_f64("reliability"))
                .unwrap_or(0.0);
            (reliability <= reliability_ceiling).then(|| SupplierCost {
                supplier: edge.src.clone(),
                warehouse: edge.dst.clone(),
                reliability,
                transportation_cost,
            })
        })
        .collect()
}

/// `supplied_part_types` of a supplier; `None` unless `supplier_id` is a Supplier
pub fn supplied_part_types<'g, G: GraphStore + ?Sized>(graph: &'g G, supplier_id: &str) -> Option<&'g Value> {
    graph
        .get_node(supplier_id)
        .filter(|node| node.is_type(SUPPLIER))?
        .get("supplied_part_types")
}

/// The `n` most frequent part subtypes, most frequent first, ties by name
pub fn most_common_part_subtypes<G: GraphStore + ?Sized>(graph: &G, n: usize) -> Vec<SubtypeCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for node in graph.find_by_type(PARTS) {
        if let Some(subtype) = node.get_str("subtype").filter(|s| !s.is_empty()) {
            *counts.entry(subtype).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<SubtypeCount> = counts
        .into_iter()
        .map(|(subtype, count)| SubtypeCount {
            subtype: subtype.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.subtype.cmp(&b.subtype)));
    ranked.truncate(n);
    ranked
}

/// Part shipments at least `min_distance` long and `min_transport_cost` expensive
pub fn long_haul_shipments<G: GraphStore + ?Sized>(
    graph: &G,
    min_distance: f64,
    min_transport_cost: f64,
) -> Vec<Shipment> {
    graph
        .get_all_edges()
        .into_iter()
        .filter(|edge| edge.is_type(PARTS_TO_FACILITY))
        .filter_map(|edge| {
            let distance = edge.get_f64("distance")?;
            let transport_cost = edge.get_f64("transport_cost")?;
            (distance >= min_distance && transport_cost >= min_transport_cost).then(|| Shipment {
                part: edge.src.clone(),
                facility: edge.dst.clone(),
                distance,
                transport_cost,
            })
        })
        .collect()
}

/// Vertex ids per node type, sorted. Bare endpoint vertices are left out.
pub fn ids_by_node_type<G: GraphStore + ?Sized>(graph: &G) -> BTreeMap<String, Vec<String>> {
    let mut catalog: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for node in graph.get_all_nodes() {
        if let Some(node_type) = &node.node_type {
            catalog.entry(node_type.clone()).or_default().push(node.id.clone());
        }
    }
    for ids in catalog.values_mut() {
        ids.sort();
    }
    catalog
}
