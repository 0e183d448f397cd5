//! Positional row codec: schema field names zipped against record values

use serde_json::Value;

use super::Attributes;
use crate::error::{GraphError, Result};

/// Fail unless `values` holds exactly one entry per declared field.
///
/// A short or long record is a schema violation rather than something to
/// truncate.
pub fn check_arity(names: &[String], values: &[Value]) -> Result<()> {
    if names.len() != values.len() {
        return Err(GraphError::Schema(format!(
            "record has {} values but schema declares {} fields {:?}",
            values.len(),
            names.len(),
            names
        )));
    }
    Ok(())
}

/// Build an attribute bag from parallel name/value slices
pub fn zip_fields(names: &[String], values: &[Value]) -> Result<Attributes> {
    check_arity(names, values)?;

    Ok(names
        .iter()
        .cloned()
        .zip(values.iter().cloned())
        .collect())
}
