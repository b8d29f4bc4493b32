use derive_setters::Setters;

use crate::value::CellValue;

/// Horizontal alignment hint for a column's cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// How one record field is labeled, extracted, formatted and sorted.
///
/// Descriptors are fixed once handed to the engine, except for the
/// `hidden` flag which the engine flips through its visibility
/// operations. Defaults: not sortable, left aligned, visible, no
/// formatter.
#[derive(Debug, Setters)]
#[setters(strip_option)]
pub struct Column<T> {
    #[setters(skip)]
    pub(crate) field: String,
    #[setters(skip)]
    pub(crate) label: String,
    pub(crate) sortable: bool,
    pub(crate) align: Align,
    pub(crate) hidden: bool,
    #[setters(skip)]
    pub(crate) accessor: fn(&T) -> CellValue,
    pub(crate) formatter: Option<fn(&CellValue) -> String>,
}

impl<T> Column<T> {
    pub fn new(
        field: impl Into<String>,
        label: impl Into<String>,
        accessor: fn(&T) -> CellValue,
    ) -> Self {
        Column {
            field: field.into(),
            label: label.into(),
            sortable: false,
            align: Align::Left,
            hidden: false,
            accessor,
            formatter: None,
        }
    }

    /// Field name used to address this column in engine operations.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Raw value for ordering.
    pub(crate) fn value(&self, record: &T) -> CellValue {
        (self.accessor)(record)
    }

    /// Display text: formatter output if present, otherwise the value's
    /// default stringification. Filtering matches against this text.
    pub(crate) fn cell_text(&self, record: &T) -> String {
        let value = (self.accessor)(record);
        match self.formatter {
            Some(format) => format(&value),
            None => value.to_string(),
        }
    }
}

/// Ordered collection of column descriptors for one record type.
#[derive(Debug)]
pub struct Schema<T> {
    columns: Vec<Column<T>>,
}

impl<T> Schema<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Schema { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub(crate) fn get(&self, field: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub(crate) fn get_mut(&mut self, field: &str) -> Option<&mut Column<T>> {
        self.columns.iter_mut().find(|c| c.field == field)
    }

    pub(crate) fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column<T>] {
        &mut self.columns
    }

    pub(crate) fn visible(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns.iter().filter(|c| !c.hidden)
    }
}

impl<T> From<Vec<Column<T>>> for Schema<T> {
    fn from(columns: Vec<Column<T>>) -> Self {
        Schema::new(columns)
    }
}
