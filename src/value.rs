use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

/// Raw cell content extracted from a record by a column accessor.
///
/// The variant decides the ordering used while sorting: integers and
/// floats compare numerically (including across the two variants), dates
/// chronologically, text lexicographically. A column mixing variants
/// falls back to comparing display strings.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
}

impl CellValue {
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (CellValue::Int(a), CellValue::Float(b)) => {
                (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (CellValue::Float(a), CellValue::Int(b)) => {
                a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
            }
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(
            CellValue::Int(9).compare(&CellValue::Int(10)),
            Ordering::Less
        );
        // Lexicographic order would put "9" after "10".
        assert_eq!(
            CellValue::Text("9".into()).compare(&CellValue::Text("10".into())),
            Ordering::Greater
        );
        assert_eq!(
            CellValue::Int(2).compare(&CellValue::Float(1.5)),
            Ordering::Greater
        );
    }

    #[test]
    fn dates_compare_chronologically() {
        let earlier = NaiveDate::from_ymd_opt(2023, 8, 12).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(
            CellValue::Date(earlier).compare(&CellValue::Date(later)),
            Ordering::Less
        );
    }

    #[test]
    fn default_stringification() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(CellValue::Date(date).to_string(), "2024-03-15");
        assert_eq!(CellValue::Float(316.0).to_string(), "316");
        assert_eq!(CellValue::Text("local".into()).to_string(), "local");
    }

    #[test]
    fn mixed_variants_fall_back_to_display_order() {
        let a = CellValue::Text("aardvark".into());
        let b = CellValue::Int(7);
        assert_eq!(a.compare(&b), "aardvark".cmp("7"));
    }
}
