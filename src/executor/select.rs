//! Select operator: scan, optionally filter by one attribute, project.

use crate::catalog::RelationDesc;
use crate::error::Result;
use crate::heap_file::HeapFile;
use crate::types::AttrDesc;

/// Comparison operators available to [`select`]'s filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub(crate) fn matches(self, lhs: &[u8], rhs: &[u8]) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }
}

/// An equality/ordering filter over one attribute's raw bytes.
pub struct Filter<'a> {
    pub attr: &'a AttrDesc,
    pub op: CompareOp,
    pub value: &'a [u8],
}

/// Scans `heap`, keeping records that pass `filter` (if any), and projects
/// out `projection`'s attributes into fresh output records.
///
/// # Errors
///
/// Returns an error if scanning the heap file fails.
pub fn select(
    heap: &HeapFile,
    relation: &RelationDesc,
    filter: Option<&Filter>,
    projection: &[&str],
) -> Result<Vec<Vec<u8>>> {
    let proj_attrs: Vec<&AttrDesc> = projection
        .iter()
        .filter_map(|name| relation.attr(name))
        .collect();

    let mut out = Vec::new();
    for (_rid, record) in heap.scan()? {
        if let Some(f) = filter {
            let slice = &record[f.attr.offset..f.attr.offset + f.attr.length];
            if !f.op.matches(slice, f.value) {
                continue;
            }
        }

        let mut projected = Vec::with_capacity(proj_attrs.iter().map(|a| a.length).sum());
        for attr in &proj_attrs {
            projected.extend_from_slice(&record[attr.offset..attr.offset + attr.length]);
        }
        out.push(projected);
    }
    Ok(out)
}
