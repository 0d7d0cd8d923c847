use crate::data::datatable::Row;
use crate::data::datavalue_compare::compare_optional_datavalues;
use serde::Serialize;

/// Sort direction. `None` means the column is not sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
    #[default]
    #[serde(rename = "none")]
    None,
}

/// The single active sort column and its direction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SortState {
    pub key: Option<String>,
    pub order: SortOrder,
}

impl SortState {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(key: impl Into<String>, order: SortOrder) -> Self {
        if order == SortOrder::None {
            return Self::none();
        }
        Self {
            key: Some(key.into()),
            order,
        }
    }

    /// Next state after a click on `key`: the same column cycles
    /// asc → desc → none, any other column starts at asc.
    pub fn toggled(&self, key: &str) -> Self {
        let new_order = match self {
            SortState {
                key: Some(current),
                order,
            } if current == key => match order {
                SortOrder::Ascending => SortOrder::Descending,
                SortOrder::Descending => SortOrder::None,
                SortOrder::None => SortOrder::Ascending,
            },
            _ => SortOrder::Ascending,
        };

        Self::new(key, new_order)
    }

    pub fn is_active(&self) -> bool {
        self.key.is_some() && self.order != SortOrder::None
    }

    /// Direction of a particular column under this state
    pub fn order_for(&self, key: &str) -> SortOrder {
        match &self.key {
            Some(current) if current == key => self.order,
            _ => SortOrder::None,
        }
    }
}

/// Reorder `indices` (into `rows`) according to `state`. Stable: rows that
/// compare equal keep their incoming order.
pub fn sort_indices(rows: &[Row], indices: &mut [usize], state: &SortState) {
    let Some(key) = state.key.as_deref() else {
        return;
    };
    if state.order == SortOrder::None {
        return;
    }

    indices.sort_by(|&a, &b| {
        let val_a = rows.get(a).and_then(|r| r.get(key));
        let val_b = rows.get(b).and_then(|r| r.get(key));
        let cmp = compare_optional_datavalues(val_a, val_b);

        match state.order {
            SortOrder::Descending => cmp.reverse(),
            _ => cmp,
        }
    });
}
