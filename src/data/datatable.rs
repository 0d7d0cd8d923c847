use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key under which every row carries its identity
pub const ID_KEY: &str = "id";

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Complex,
}

/// Column metadata supplied by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    pub column_type: ColumnType,
    pub sortable: bool,
    pub filterable: bool,
    pub editable: bool,
    pub has_action: bool,
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            column_type: ColumnType::String,
            sortable: false,
            filterable: false,
            editable: false,
            has_action: false,
        }
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_action(mut self, has_action: bool) -> Self {
        self.has_action = has_action;
        self
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Nested arrays/objects, kept opaque
    Complex(JsonValue),
    Null,
}

impl DataValue {
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => DataValue::Null,
            JsonValue::Bool(b) => DataValue::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DataValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    DataValue::Float(f)
                } else {
                    DataValue::String(n.to_string())
                }
            }
            JsonValue::String(s) => DataValue::String(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => DataValue::Complex(json.clone()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Integer(i) => Some(*i as f64),
            DataValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::Boolean(b) => write!(f, "{}", b),
            DataValue::Complex(json) => write!(f, "{}", json),
            DataValue::Null => write!(f, ""),
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Integer(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Boolean(value)
    }
}

/// Stable identity of a row
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RowId {
    Text(String),
    Number(i64),
    /// Non-integral numeric id. Compared and hashed on its bit pattern.
    Float(f64),
}

impl RowId {
    /// Extract an id from a JSON field. Returns `None` for anything that
    /// cannot serve as an identity (empty strings, bools, objects).
    pub fn from_json(json: &JsonValue) -> Option<Self> {
        match json {
            JsonValue::String(s) if !s.is_empty() => Some(RowId::Text(s.clone())),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Some(RowId::Number(i)),
                None => n.as_f64().filter(|f| f.is_finite()).map(RowId::from),
            },
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RowId::Text(s) if s.is_empty())
    }

    pub fn to_value(&self) -> DataValue {
        match self {
            RowId::Text(s) => DataValue::String(s.clone()),
            RowId::Number(n) => DataValue::Integer(*n),
            RowId::Float(f) => DataValue::Float(*f),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            RowId::Number(_) => 0,
            RowId::Float(_) => 1,
            RowId::Text(_) => 2,
        }
    }
}

impl PartialEq for RowId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RowId::Text(a), RowId::Text(b)) => a == b,
            (RowId::Number(a), RowId::Number(b)) => a == b,
            (RowId::Float(a), RowId::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for RowId {}

impl Hash for RowId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_rank().hash(state);
        match self {
            RowId::Text(s) => s.hash(state),
            RowId::Number(n) => n.hash(state),
            RowId::Float(f) => f.to_bits().hash(state),
        }
    }
}

impl Ord for RowId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RowId::Text(a), RowId::Text(b)) => a.cmp(b),
            (RowId::Number(a), RowId::Number(b)) => a.cmp(b),
            (RowId::Float(a), RowId::Float(b)) => a.total_cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for RowId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Text(s) => write!(f, "{}", s),
            RowId::Number(n) => write!(f, "{}", n),
            RowId::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        RowId::Text(value.to_string())
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        RowId::Text(value)
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        RowId::Number(value)
    }
}

/// Integral values become `Number` so `2.0` and `2` name the same row.
/// `-0.0` is folded into `0`.
impl From<f64> for RowId {
    fn from(value: f64) -> Self {
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            RowId::Number(value as i64)
        } else {
            RowId::Float(value)
        }
    }
}

/// One record. The id is also stored under [`ID_KEY`] so it can be
/// displayed, searched and sorted like any other field. Fields keep the order
/// they were added in, id first.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    values: IndexMap<String, DataValue>,
}

impl Row {
    pub fn new(id: impl Into<RowId>) -> Self {
        let id = id.into();
        let mut values = IndexMap::new();
        values.insert(ID_KEY.to_string(), id.to_value());
        Self { id, values }
    }

    /// Builder-style field setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn id(&self) -> &RowId {
        &self.id
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.values.get(key)
    }

    /// Set a field. Writing [`ID_KEY`] is ignored; identity is fixed at creation.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<DataValue>) {
        let key = key.into();
        if key == ID_KEY {
            return;
        }
        self.values.insert(key, value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Insert `Null` for every key in `keys` the row does not have yet
    pub fn fill_missing<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            if !self.values.contains_key(key) {
                self.values.insert(key.to_string(), DataValue::Null);
            }
        }
    }

    pub fn values(&self) -> impl Iterator<Item = (&String, &DataValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All field values in field order, stringified, space-joined and
    /// lower-cased
    pub fn search_text(&self) -> String {
        self.values
            .values()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

/// Backing store for one table instance: column schema plus the row collection
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Row>,
}

impl DataTable {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn get_column(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn find_row(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn find_row_mut(&mut self, id: &RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_from_json() {
        assert_eq!(DataValue::from_json(&json!(3)), DataValue::Integer(3));
        assert_eq!(DataValue::from_json(&json!(2.5)), DataValue::Float(2.5));
        assert_eq!(
            DataValue::from_json(&json!("x")),
            DataValue::String("x".to_string())
        );
        assert_eq!(DataValue::from_json(&json!(null)), DataValue::Null);
        assert!(matches!(
            DataValue::from_json(&json!({"a": 1})),
            DataValue::Complex(_)
        ));
    }

    #[test]
    fn test_row_id_from_json() {
        assert_eq!(RowId::from_json(&json!("a1")), Some(RowId::from("a1")));
        assert_eq!(RowId::from_json(&json!(7)), Some(RowId::Number(7)));
        assert_eq!(RowId::from_json(&json!("")), None);
        assert_eq!(RowId::from_json(&json!(1.5)), Some(RowId::Float(1.5)));
        assert_eq!(RowId::from_json(&json!(2.0)), Some(RowId::Number(2)));
        assert_eq!(RowId::from_json(&json!(true)), None);
        assert_eq!(RowId::from_json(&json!({"id": 1})), None);
    }

    #[test]
    fn test_float_ids_hash_and_compare() {
        use std::collections::HashSet;

        let ids: HashSet<RowId> = [RowId::from(1.5), RowId::from(1.5), RowId::from(2.5)]
            .into_iter()
            .collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(RowId::from(-0.0), RowId::Number(0));
        assert!(RowId::Float(1.5) < RowId::Float(2.5));
        assert_eq!(RowId::Float(1.5).to_value(), DataValue::Float(1.5));
        assert_eq!(RowId::Float(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_row_keeps_id_field() {
        let mut row = Row::new(5i64).with("name", "Alice");
        row.set("id", 99i64);

        assert_eq!(row.id(), &RowId::Number(5));
        assert_eq!(row.get("id"), Some(&DataValue::Integer(5)));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_search_text_joins_lowercased_values() {
        let row = Row::new("r1")
            .with("name", "Alice")
            .with("age", 30i64)
            .with("note", DataValue::Null);

        assert_eq!(row.search_text(), "r1 alice 30 ");
    }

    #[test]
    fn test_search_text_follows_field_order() {
        let mut row = Row::new(1i64).with("name", "Alice").with("city", "Madrid");
        row.fill_missing(["age", "name"]);
        row.set("name", "Alicia");

        assert_eq!(row.search_text(), "1 alicia madrid ");
        assert!(row.search_text().contains("alicia madrid"));
    }

    #[test]
    fn test_row_serializes_as_flat_object() {
        let row = Row::new(1i64).with("name", "Bob");
        assert_eq!(row.to_json(), json!({"id": 1, "name": "Bob"}));
    }

    #[test]
    fn test_fill_missing() {
        let mut row = Row::new(1i64);
        row.fill_missing(["id", "name", "age"]);
        assert_eq!(row.get("name"), Some(&DataValue::Null));
        assert_eq!(row.get("age"), Some(&DataValue::Null));
        assert_eq!(row.get("id"), Some(&DataValue::Integer(1)));
    }
}
