//! Column-oriented accumulation of parsed records.
//!
//! A [`Table`] keeps every column the same length at all times: a record
//! is checked against the established column set before anything is
//! written, so a rejected record leaves the table untouched.

use crate::error::{FieldLogError, Result};
use std::collections::HashSet;

/// Ordered column names for one mode, fixed before parsing begins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    columns: Vec<String>,
}

impl FieldSchema {
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in columns {
            if !seen.insert(column.as_ref()) {
                return Err(FieldLogError::configuration(format!(
                    "duplicate column '{}' in field schema",
                    column.as_ref()
                )));
            }
        }

        Ok(Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        })
    }

    /// Schema from a compile-time column list
    pub fn from_static(columns: &'static [&'static str]) -> Self {
        debug_assert!(
            columns.iter().collect::<HashSet<_>>().len() == columns.len(),
            "static schema has duplicate columns"
        );
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Assign values to columns by position. The value count must equal the schema length.
    pub fn record<S: Into<String>>(&self, values: impl IntoIterator<Item = S>) -> Result<Record> {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.len() != self.columns.len() {
            return Err(FieldLogError::SchemaMismatch {
                expected: self.columns.len(),
                found: values.len(),
            });
        }

        Ok(Record {
            fields: self.columns.iter().cloned().zip(values).collect(),
        })
    }
}

/// One output row: column name to textual value, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any existing value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Column-oriented table with columns fixed up front, either from a
/// [`FieldSchema`] or from the union of a batch of records.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    values: Vec<Vec<String>>,
}

impl Table {
    pub fn with_schema(schema: &FieldSchema) -> Self {
        Self {
            columns: schema.columns().to_vec(),
            values: vec![Vec::new(); schema.len()],
        }
    }

    /// Table over the union of the records' fields, in first-seen order.
    /// Fields a record lacks are filled with an empty value.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for record in &records {
            for name in record.names() {
                if seen.insert(name) {
                    names.push(name.to_string());
                }
            }
        }

        let mut table = Self::with_schema(&FieldSchema::new(&names)?);
        for mut record in records {
            for name in &names {
                if record.get(name).is_none() {
                    record.insert(name.as_str(), "");
                }
            }
            table.append(record)?;
        }
        Ok(table)
    }

    /// Append one record to every column, or reject it without writing anything
    pub fn append(&mut self, record: Record) -> Result<()> {
        if record.len() != self.columns.len() {
            return Err(FieldLogError::InvalidRecord {
                reason: format!(
                    "record has {} fields, table has {} columns",
                    record.len(),
                    self.columns.len()
                ),
            });
        }

        let mut ordered = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = record.get(column).ok_or_else(|| FieldLogError::InvalidRecord {
                reason: format!("record is missing column '{}'", column),
            })?;
            ordered.push(value.to_string());
        }

        for (column_values, value) in self.values.iter_mut().zip(ordered) {
            column_values.push(value);
        }
        Ok(())
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|index| self.values[index].as_slice())
    }

    /// Column names paired with their values, in insertion order
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }

    pub fn num_rows(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_aligned(table: &Table) {
        let rows = table.num_rows();
        for (name, values) in table.iter_columns() {
            assert_eq!(values.len(), rows, "column {} misaligned", name);
        }
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        assert!(FieldSchema::new(&["time", "a", "time"]).is_err());
        assert_eq!(FieldSchema::new(&["time", "a"]).unwrap().len(), 2);
    }

    #[test]
    fn test_schema_record_requires_exact_count() {
        let schema = FieldSchema::new(&["time", "a", "b"]).unwrap();
        assert!(schema.record(["t", "1", "2"]).is_ok());

        let err = schema.record(["t", "1"]).unwrap_err();
        assert!(matches!(
            err,
            FieldLogError::SchemaMismatch {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_fixed_schema_append() {
        let schema = FieldSchema::new(&["time", "a"]).unwrap();
        let mut table = Table::with_schema(&schema);
        assert_eq!(table.num_columns(), 2);
        assert!(table.is_empty());

        table.append(schema.record(["t0", "1"]).unwrap()).unwrap();
        table.append(schema.record(["t1", "2"]).unwrap()).unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("a").unwrap(), ["1", "2"]);
        assert_aligned(&table);
    }

    #[test]
    fn test_rejected_record_leaves_table_untouched() {
        let schema = FieldSchema::new(&["time", "a"]).unwrap();
        let mut table = Table::with_schema(&schema);
        table.append(schema.record(["t0", "1"]).unwrap()).unwrap();

        let mut wrong = Record::new();
        wrong.insert("time", "t1");
        wrong.insert("b", "2");
        assert!(table.append(wrong).is_err());

        let mut short = Record::new();
        short.insert("time", "t1");
        assert!(table.append(short).is_err());

        assert_eq!(table.num_rows(), 1);
        assert_aligned(&table);
    }

    #[test]
    fn test_field_order_within_record_does_not_matter() {
        let mut first = Record::new();
        first.insert("pci", "100");
        first.insert("rsrp", "-90");
        let mut second = Record::new();
        second.insert("rsrp", "-91");
        second.insert("pci", "101");

        let table = Table::from_records(vec![first, second]).unwrap();

        assert_eq!(table.column_names(), ["pci", "rsrp"]);
        assert_eq!(table.column("pci").unwrap(), ["100", "101"]);
        assert_aligned(&table);
    }

    #[test]
    fn test_from_records_takes_union_of_fields() {
        let mut first = Record::new();
        first.insert("pci", "100");
        first.insert("companion_abs_time", "1686738063500");
        let mut second = Record::new();
        second.insert("pci", "101");
        let mut third = Record::new();
        third.insert("rssnr", "12");
        third.insert("pci", "102");

        let table = Table::from_records(vec![first, second, third]).unwrap();

        assert_eq!(table.column_names(), ["pci", "companion_abs_time", "rssnr"]);
        assert_eq!(table.column("pci").unwrap(), ["100", "101", "102"]);
        assert_eq!(table.column("companion_abs_time").unwrap(), ["1686738063500", "", ""]);
        assert_eq!(table.column("rssnr").unwrap(), ["", "", "12"]);
        assert_aligned(&table);

        assert!(Table::from_records(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_record_insert_replaces() {
        let mut record = Record::new();
        record.insert("a", "1");
        record.insert("a", "2");
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("a"), Some("2"));
    }
}
