//! The bundled dashboard collections: payments, uploads and stored
//! files, each with its column schema. These are the in-memory samples
//! the front-end browses and the tests run against.

use std::fmt;

use chrono::NaiveDate;

use crate::schema::{Align, Column, Schema};
use crate::value::CellValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Processing,
    Success,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Where an upload or file entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Local,
    Web,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Local => "local",
            Source::Web => "web",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Txt,
    Md,
    Html,
    Other,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileKind::Pdf => "pdf",
            FileKind::Txt => "txt",
            FileKind::Md => "md",
            FileKind::Html => "html",
            FileKind::Other => "other",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub id: u32,
    pub upload_name: String,
    pub source: Source,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: u32,
    pub file_name: String,
    pub upload_name: String,
    pub source: Source,
    pub kind: FileKind,
    pub created_at: NaiveDate,
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid sample date")
}

fn payment(id: &str, amount: f64, status: PaymentStatus, email: &str) -> Payment {
    Payment {
        id: id.to_string(),
        amount,
        status,
        email: email.to_string(),
    }
}

pub fn payments() -> Vec<Payment> {
    let mut data = vec![
        payment("m5gr84i9", 316.0, PaymentStatus::Success, "ken99@yahoo.com"),
        payment("3u1reuv4", 242.0, PaymentStatus::Success, "Abe45@gmail.com"),
        payment(
            "derv1ws0",
            837.0,
            PaymentStatus::Processing,
            "Monserrat44@gmail.com",
        ),
        payment("5kma53ae", 874.0, PaymentStatus::Success, "Silas22@gmail.com"),
        payment(
            "bhqecj4p",
            721.0,
            PaymentStatus::Failed,
            "carmella@hotmail.com",
        ),
    ];
    // A hundred copies of the first row pad the sample so pagination has
    // something to page through.
    for _ in 0..100 {
        data.push(payment("m5gr84i9", 316.0, PaymentStatus::Success, "ken99@yahoo.com"));
    }
    data
}

pub fn payment_columns() -> Schema<Payment> {
    Schema::new(vec![
        Column::new("status", "Status", |p: &Payment| {
            CellValue::Text(p.status.to_string())
        }),
        Column::new("email", "Email", |p: &Payment| {
            CellValue::from(p.email.as_str())
        })
        .sortable(true),
        Column::new("amount", "Amount", |p: &Payment| CellValue::Float(p.amount))
            .sortable(true)
            .align(Align::Right)
            .formatter(usd),
    ])
}

pub fn uploads() -> Vec<Upload> {
    let upload = |id, name: &str, source, created_at| Upload {
        id,
        upload_name: name.to_string(),
        source,
        created_at,
    };
    vec![
        upload(1, "Project Report", Source::Local, ymd(2023, 8, 12)),
        upload(2, "Profile Picture", Source::Web, ymd(2023, 9, 5)),
        upload(3, "Sales Data", Source::Local, ymd(2024, 1, 10)),
        upload(4, "Company Logo", Source::Web, ymd(2024, 2, 20)),
        upload(5, "Presentation Slides", Source::Local, ymd(2024, 3, 15)),
    ]
}

pub fn upload_columns() -> Schema<Upload> {
    Schema::new(vec![
        Column::new("upload_name", "Upload Name", |u: &Upload| {
            CellValue::from(u.upload_name.as_str())
        }),
        Column::new("source", "Source", |u: &Upload| {
            CellValue::Text(u.source.to_string())
        })
        .sortable(true),
        Column::new("created_at", "Creation date", |u: &Upload| {
            CellValue::Date(u.created_at)
        })
        .sortable(true)
        .formatter(en_us_date),
    ])
}

pub fn files() -> Vec<StoredFile> {
    let file = |id, file_name: &str, upload_name: &str, source, kind, created_at| StoredFile {
        id,
        file_name: file_name.to_string(),
        upload_name: upload_name.to_string(),
        source,
        kind,
        created_at,
    };
    vec![
        file(
            1,
            "project_report.pdf",
            "Project Report",
            Source::Local,
            FileKind::Pdf,
            ymd(2023, 8, 12),
        ),
        file(
            2,
            "profile_picture.jpg",
            "Profile Picture",
            Source::Web,
            FileKind::Other,
            ymd(2023, 9, 5),
        ),
        file(
            3,
            "sales_data.txt",
            "Sales Data",
            Source::Local,
            FileKind::Txt,
            ymd(2024, 1, 10),
        ),
        file(
            4,
            "company_logo.png",
            "Company Logo",
            Source::Web,
            FileKind::Other,
            ymd(2024, 2, 20),
        ),
        file(
            5,
            "presentation.md",
            "Presentation Slides",
            Source::Local,
            FileKind::Md,
            ymd(2024, 3, 15),
        ),
    ]
}

pub fn file_columns() -> Schema<StoredFile> {
    Schema::new(vec![
        Column::new("file_name", "File Name", |f: &StoredFile| {
            CellValue::from(f.file_name.as_str())
        })
        .sortable(true),
        Column::new("upload_name", "Upload Name", |f: &StoredFile| {
            CellValue::from(f.upload_name.as_str())
        }),
        Column::new("file_type", "File Type", |f: &StoredFile| {
            CellValue::Text(f.kind.to_string())
        })
        .sortable(true),
        Column::new("source", "Source", |f: &StoredFile| {
            CellValue::Text(f.source.to_string())
        })
        .sortable(true),
        Column::new("created_at", "Creation date", |f: &StoredFile| {
            CellValue::Date(f.created_at)
        })
        .sortable(true)
        .formatter(en_us_date),
    ])
}

/// "$1,234.50" in the en-US style of the reference dashboard.
pub fn usd(value: &CellValue) -> String {
    let amount = match value {
        CellValue::Float(v) => *v,
        CellValue::Int(v) => *v as f64,
        other => return other.to_string(),
    };
    let total_cents = (amount.abs() * 100.0).round() as i64;
    let (dollars, cents) = (total_cents / 100, total_cents % 100);

    let mut digits = dollars.to_string();
    let mut grouped = String::new();
    while digits.len() > 3 {
        let rest = digits.split_off(digits.len() - 3);
        grouped = format!(",{rest}{grouped}");
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${digits}{grouped}.{cents:02}")
}

/// "8/12/2023", the en-US short date of the reference dashboard.
pub fn en_us_date(value: &CellValue) -> String {
    match value {
        CellValue::Date(d) => d.format("%-m/%-d/%Y").to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_sizes() {
        assert_eq!(payments().len(), 105);
        assert_eq!(uploads().len(), 5);
        assert_eq!(files().len(), 5);
    }

    #[test]
    fn schemas_cover_their_records() {
        assert_eq!(payment_columns().len(), 3);
        assert!(upload_columns().contains("created_at"));
        assert!(file_columns().contains("file_type"));
        assert!(!upload_columns().contains("uploadName"));
    }

    #[test]
    fn usd_formatting() {
        assert_eq!(usd(&CellValue::Float(316.0)), "$316.00");
        assert_eq!(usd(&CellValue::Float(1234.5)), "$1,234.50");
        assert_eq!(usd(&CellValue::Float(-42.135)), "-$42.14");
        assert_eq!(usd(&CellValue::Int(1_000_000)), "$1,000,000.00");
        // Non-numeric values pass through untouched.
        assert_eq!(usd(&CellValue::Text("n/a".into())), "n/a");
    }

    #[test]
    fn en_us_date_formatting() {
        assert_eq!(en_us_date(&CellValue::Date(ymd(2023, 8, 12))), "8/12/2023");
        assert_eq!(en_us_date(&CellValue::Date(ymd(2024, 11, 3))), "11/3/2024");
    }
}
