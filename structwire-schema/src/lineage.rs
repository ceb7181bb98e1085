//! Resolution order of record types (C3 linearization).

use std::sync::Arc;

use structwire_core::{Error, Result};

use crate::record_type::RecordType;

/// Computes the ancestors of a type named `name` with the given `parents`,
/// most specific first. The type itself is not included.
///
/// Every ancestor appears once, after all of its descendants, and the local
/// order of each parent list is preserved.
pub(crate) fn linearize(name: &str, parents: &[Arc<RecordType>]) -> Result<Vec<Arc<RecordType>>> {
    let mut sequences: Vec<Vec<Arc<RecordType>>> = parents
        .iter()
        .map(|parent| {
            std::iter::once(Arc::clone(parent))
                .chain(parent.resolution_order().iter().cloned())
                .collect()
        })
        .collect();
    sequences.push(parents.to_vec());

    let mut order = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Ok(order);
        }

        let candidate = sequences
            .iter()
            .map(|seq| &seq[0])
            .find(|head| {
                !sequences
                    .iter()
                    .any(|seq| seq[1..].iter().any(|t| Arc::ptr_eq(t, *head)))
            })
            .cloned()
            .ok_or_else(|| {
                Error::configuration(format!(
                    "cannot create a consistent resolution order for record '{name}'"
                ))
            })?;

        for seq in &mut sequences {
            if Arc::ptr_eq(&seq[0], &candidate) {
                seq.remove(0);
            }
        }
        order.push(candidate);
    }
}
