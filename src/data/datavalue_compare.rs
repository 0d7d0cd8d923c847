use crate::data::datatable::DataValue;
use std::cmp::Ordering;

/// Compare two DataValues for sorting.
///
/// Numbers compare numerically (integers and floats mix freely), strings
/// lexicographically, booleans false < true. Null sorts first. Values of
/// different kinds are ordered by kind: Null < Boolean < Number < String < Complex.
pub fn compare_datavalues(a: &DataValue, b: &DataValue) -> Ordering {
    match (a, b) {
        (DataValue::Integer(a), DataValue::Integer(b)) => a.cmp(b),
        (DataValue::Float(a), DataValue::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (DataValue::Integer(i), DataValue::Float(f)) => {
            (*i as f64).partial_cmp(f).unwrap_or(Ordering::Equal)
        }
        (DataValue::Float(f), DataValue::Integer(i)) => {
            f.partial_cmp(&(*i as f64)).unwrap_or(Ordering::Equal)
        }

        (DataValue::String(a), DataValue::String(b)) => a.cmp(b),
        (DataValue::Boolean(a), DataValue::Boolean(b)) => a.cmp(b),

        // Opaque values have no natural order; compare their JSON text so the
        // result is at least deterministic
        (DataValue::Complex(a), DataValue::Complex(b)) => a.to_string().cmp(&b.to_string()),

        (DataValue::Null, DataValue::Null) => Ordering::Equal,

        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &DataValue) -> u8 {
    match value {
        DataValue::Null => 0,
        DataValue::Boolean(_) => 1,
        DataValue::Integer(_) | DataValue::Float(_) => 2,
        DataValue::String(_) => 3,
        DataValue::Complex(_) => 4,
    }
}

/// Compare DataValues with optional values (handling None)
pub fn compare_optional_datavalues(a: Option<&DataValue>, b: Option<&DataValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_datavalues(a, b),
    }
}
