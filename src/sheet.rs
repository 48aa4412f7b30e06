//! CSV import/export. Import validates the header row against the
//! template headers the frontend publishes, then maps rows with the
//! same defaults the spreadsheet template documents.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use csv::StringRecord;

use crate::model::attendance::AttendanceStatus;
use crate::model::employee::EmployeeStatus;

pub const EMPLOYEE_HEADERS: [&str; 10] = [
    "name",
    "nip",
    "position",
    "unit",
    "email",
    "whatsappNumber",
    "joinDate",
    "status",
    "bankName",
    "accountNumber",
];

pub const ATTENDANCE_HEADERS: [&str; 6] =
    ["employeeId", "date", "clockIn", "clockOut", "status", "shift"];

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("File kosong atau tidak ada data.")]
    Empty,
    #[error("Header kolom tidak sesuai. Kolom yang hilang: {0}")]
    MissingHeaders(String),
    #[error("Setiap baris harus memiliki {0}.")]
    MissingField(&'static str),
    #[error("Format tanggal tidak valid: {0}")]
    InvalidDate(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct EmployeeRow {
    pub name: String,
    pub nip: String,
    pub position: String,
    pub unit: String,
    pub email: String,
    pub whatsapp_number: String,
    pub join_date: NaiveDate,
    pub status: EmployeeStatus,
    pub bank_name: String,
    pub account_number: String,
}

#[derive(Debug, Clone)]
pub struct AttendanceRow {
    pub employee_id: String,
    pub date: NaiveDate,
    pub clock_in: String,
    pub clock_out: String,
    pub status: AttendanceStatus,
    pub shift: String,
}

fn read_records(
    data: &[u8],
    required: &[&str],
) -> Result<(StringRecord, Vec<StringRecord>), SheetError> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = reader.headers()?.clone();
    let records = reader
        .records()
        .collect::<Result<Vec<StringRecord>, csv::Error>>()?;
    if records.is_empty() {
        return Err(SheetError::Empty);
    }

    let missing: Vec<&str> = required
        .iter()
        .filter(|name| !headers.iter().any(|h| h.trim() == **name))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(SheetError::MissingHeaders(missing.join(", ")));
    }
    Ok((headers, records))
}

fn column<'r>(headers: &StringRecord, record: &'r StringRecord, name: &str) -> &'r str {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .and_then(|i| record.get(i))
        .unwrap_or("")
        .trim()
}

fn parse_date(value: &str) -> Result<NaiveDate, SheetError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| SheetError::InvalidDate(value.to_string()))
}

pub fn parse_employee_rows(data: &[u8]) -> Result<Vec<EmployeeRow>, SheetError> {
    let (headers, records) = read_records(data, &EMPLOYEE_HEADERS)?;
    let today = Utc::now().date_naive();

    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        let get = |name: &str| column(&headers, record, name).to_string();
        let name = get("name");
        let nip = get("nip");
        if name.is_empty() || nip.is_empty() {
            return Err(SheetError::MissingField("'name' dan 'nip'"));
        }

        let join_date = match column(&headers, record, "joinDate") {
            "" => today,
            value => parse_date(value)?,
        };
        let status = EmployeeStatus::from_str(&get("status")).unwrap_or(EmployeeStatus::Active);

        rows.push(EmployeeRow {
            name,
            nip,
            position: get("position"),
            unit: get("unit"),
            email: get("email"),
            whatsapp_number: get("whatsappNumber"),
            join_date,
            status,
            bank_name: get("bankName"),
            account_number: get("accountNumber"),
        });
    }
    Ok(rows)
}

pub fn parse_attendance_rows(data: &[u8]) -> Result<Vec<AttendanceRow>, SheetError> {
    let (headers, records) = read_records(data, &ATTENDANCE_HEADERS)?;

    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        let get = |name: &str| column(&headers, record, name).to_string();
        let employee_id = get("employeeId");
        let date_value = get("date");
        if employee_id.is_empty() || date_value.is_empty() {
            return Err(SheetError::MissingField("'employeeId' dan 'date'"));
        }

        let status =
            AttendanceStatus::from_str(&get("status")).unwrap_or(AttendanceStatus::Absent);
        let or_default = |value: String, fallback: &str| {
            if value.is_empty() {
                fallback.to_string()
            } else {
                value
            }
        };

        rows.push(AttendanceRow {
            employee_id,
            date: parse_date(&date_value)?,
            clock_in: or_default(get("clockIn"), "N/A"),
            clock_out: or_default(get("clockOut"), "N/A"),
            status,
            shift: or_default(get("shift"), "Regular"),
        });
    }
    Ok(rows)
}

pub fn write_csv(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, SheetError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPLOYEE_CSV: &str = "\
name,nip,position,unit,email,whatsappNumber,joinDate,status,bankName,accountNumber
Dr. Ahmad Dahlan,198001012005011001,Dosen,Fakultas Teknik,ahmad.d@unugha.ac.id,6281234567893,2020-01-15,Active,Bank Mandiri,1234567890
Siti Aminah,198502152010012002,Staf,BAU,siti.a@unugha.ac.id,6281234567894,,,Bank BRI,987654321
";

    #[test]
    fn employee_rows_apply_template_defaults() {
        let rows = parse_employee_rows(EMPLOYEE_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Dr. Ahmad Dahlan");
        assert_eq!(
            rows[0].join_date,
            NaiveDate::from_ymd_opt(2020, 1, 15).unwrap()
        );
        // blank joinDate falls back to today, blank status to Active
        assert_eq!(rows[1].join_date, Utc::now().date_naive());
        assert_eq!(rows[1].status, EmployeeStatus::Active);
    }

    #[test]
    fn missing_columns_are_listed() {
        let csv = "name,nip\nBudi,123\n";
        let err = parse_employee_rows(csv.as_bytes()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Header kolom tidak sesuai."));
        assert!(message.contains("position"));
        assert!(message.contains("accountNumber"));
        assert!(!message.contains("name,"));
    }

    #[test]
    fn header_only_file_counts_as_empty() {
        let csv = "name,nip,position,unit,email,whatsappNumber,joinDate,status,bankName,accountNumber\n";
        let err = parse_employee_rows(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SheetError::Empty));
        assert_eq!(err.to_string(), "File kosong atau tidak ada data.");
    }

    #[test]
    fn row_without_nip_aborts_the_import() {
        let csv = "\
name,nip,position,unit,email,whatsappNumber,joinDate,status,bankName,accountNumber
Budi,,Dosen,FT,b@unugha.ac.id,628,2020-01-01,Active,Bank,123
";
        let err = parse_employee_rows(csv.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "Setiap baris harus memiliki 'name' dan 'nip'.");
    }

    #[test]
    fn attendance_rows_normalize_status_and_blanks() {
        let csv = "\
employeeId,date,clockIn,clockOut,status,shift
E001,2023-10-26,07:55,16:02,On Time,Regular
E002,2023-10-26,,,Sakit,
";
        let rows = parse_attendance_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].status, AttendanceStatus::OnTime);
        assert_eq!(rows[1].status, AttendanceStatus::Absent);
        assert_eq!(rows[1].clock_in, "N/A");
        assert_eq!(rows[1].clock_out, "N/A");
        assert_eq!(rows[1].shift, "Regular");
    }

    #[test]
    fn attendance_row_without_date_is_rejected() {
        let csv = "employeeId,date,clockIn,clockOut,status,shift\nE001,,08:00,16:00,Late,Pagi\n";
        let err = parse_attendance_rows(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Setiap baris harus memiliki 'employeeId' dan 'date'."
        );
    }

    #[test]
    fn garbled_date_is_reported() {
        let csv =
            "employeeId,date,clockIn,clockOut,status,shift\nE001,26-10-2023,08:00,16:00,Late,Pagi\n";
        let err = parse_attendance_rows(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SheetError::InvalidDate(_)));
    }

    #[test]
    fn export_quotes_values_with_commas() {
        let bytes = write_csv(
            &["Nama Pegawai", "Jabatan"],
            &[vec!["Budi Santoso, S.Kom.".to_string(), "Dosen".to_string()]],
        )
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"Budi Santoso, S.Kom.\""));
        assert!(text.starts_with("Nama Pegawai,Jabatan\n"));
    }
}
