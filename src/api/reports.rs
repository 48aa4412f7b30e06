//! CSV report downloads. Column labels and file names match the report
//! screens; every endpoint refuses to emit an empty sheet.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::role::Capability;
use crate::sheet;
use crate::store::HrisStore;

const EMPLOYEE_REPORT_HEADERS: [&str; 10] = [
    "Nama Pegawai",
    "NIP",
    "Jabatan",
    "Unit Kerja",
    "Email",
    "No. WhatsApp",
    "Tanggal Bergabung",
    "Status",
    "Bank",
    "No. Rekening",
];

const PAYROLL_REPORT_HEADERS: [&str; 5] = [
    "Nama Pegawai",
    "Periode",
    "Pendapatan Kotor (IDR)",
    "Total Potongan (IDR)",
    "Gaji Bersih (IDR)",
];

const BANK_TRANSFER_HEADERS: [&str; 4] = [
    "Nama Pegawai",
    "Nama Bank",
    "Nomor Rekening",
    "Jumlah Transfer (IDR)",
];

const ATTENDANCE_REPORT_HEADERS: [&str; 6] = [
    "Nama Pegawai",
    "Tanggal",
    "Jam Masuk",
    "Jam Keluar",
    "Shift",
    "Status",
];

#[derive(Debug, Deserialize, ToSchema)]
pub struct PeriodQuery {
    #[schema(example = "Oktober 2023")]
    pub period: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BankTransferQuery {
    #[schema(example = "Oktober 2023")]
    pub period: Option<String>,
    #[schema(example = "Bank Mandiri")]
    pub bank: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DateRangeQuery {
    #[schema(example = "2023-10-01", value_type = Option<String>, format = "date")]
    pub start: Option<NaiveDate>,
    #[schema(example = "2023-10-31", value_type = Option<String>, format = "date")]
    pub end: Option<NaiveDate>,
}

fn csv_attachment(
    file_name: &str,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<HttpResponse, ApiError> {
    if rows.is_empty() {
        return Err(ApiError::validation("Tidak ada data untuk diekspor."));
    }
    let body = sheet::write_csv(headers, rows).map_err(ApiError::internal)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(body))
}

#[utoipa::path(
    get,
    path = "/api/reports/employees",
    responses(
        (status = 200, description = "Employee roster as CSV", body = String, content_type = "text/csv"),
        (status = 400, description = "Nothing to export", body = Object, example = json!({
            "error": "Tidak ada data untuk diekspor."
        }))
    ),
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn employees_report(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Reports)?;
    let rows: Vec<Vec<String>> = store
        .list_employees()
        .await?
        .into_iter()
        .map(|e| {
            vec![
                e.name,
                e.nip,
                e.position,
                e.unit,
                e.email,
                e.whatsapp_number,
                e.join_date.to_string(),
                e.status.to_string(),
                e.bank_name,
                e.account_number,
            ]
        })
        .collect();
    csv_attachment("Laporan_Data_Pegawai.csv", &EMPLOYEE_REPORT_HEADERS, &rows)
}

#[utoipa::path(
    get,
    path = "/api/reports/payroll",
    params(
        ("period", Query, description = "Period label, e.g. Oktober 2023")
    ),
    responses(
        (status = 200, description = "Period payslips as CSV, closed by a TOTAL row", body = String, content_type = "text/csv"),
        (status = 400, description = "Nothing to export", body = Object, example = json!({
            "error": "Tidak ada data untuk diekspor."
        }))
    ),
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn payroll_report(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Reports)?;
    let Some(period) = query.period.as_deref().filter(|p| !p.is_empty()) else {
        return Err(ApiError::validation("Tidak ada data untuk diekspor."));
    };

    let slips = store.list_payslips(Some(period)).await?;
    let mut gross = 0i64;
    let mut deductions = 0i64;
    let mut net = 0i64;
    let mut rows: Vec<Vec<String>> = slips
        .into_iter()
        .map(|slip| {
            gross += slip.gross_salary;
            deductions += slip.total_deductions;
            net += slip.net_salary;
            vec![
                slip.employee_name,
                slip.period,
                slip.gross_salary.to_string(),
                slip.total_deductions.to_string(),
                slip.net_salary.to_string(),
            ]
        })
        .collect();
    if !rows.is_empty() {
        rows.push(vec![
            "TOTAL".to_string(),
            String::new(),
            gross.to_string(),
            deductions.to_string(),
            net.to_string(),
        ]);
    }

    let file_name = format!("Laporan_Penggajian_{}.csv", period.replace(' ', "_"));
    csv_attachment(&file_name, &PAYROLL_REPORT_HEADERS, &rows)
}

#[utoipa::path(
    get,
    path = "/api/reports/bank-transfer",
    params(
        ("period", Query, description = "Period label, e.g. Oktober 2023"),
        ("bank", Query, description = "Only transfers through this bank")
    ),
    responses(
        (status = 200, description = "Net-salary transfer list as CSV", body = String, content_type = "text/csv"),
        (status = 400, description = "Nothing to export", body = Object, example = json!({
            "error": "Tidak ada data untuk diekspor."
        }))
    ),
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn bank_transfer_report(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    query: web::Query<BankTransferQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Reports)?;
    let Some(period) = query.period.as_deref().filter(|p| !p.is_empty()) else {
        return Err(ApiError::validation("Tidak ada data untuk diekspor."));
    };

    let slips = store.list_payslips(Some(period)).await?;
    let employees = store.list_employees().await?;
    let bank_filter = query.bank.as_deref().filter(|b| !b.is_empty() && *b != "All");

    let rows: Vec<Vec<String>> = slips
        .into_iter()
        .filter_map(|slip| {
            let employee = employees.iter().find(|e| e.id == slip.employee_id);
            let bank_name = employee
                .map(|e| e.bank_name.clone())
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| "N/A".to_string());
            let account_number = employee
                .map(|e| e.account_number.clone())
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "N/A".to_string());
            if bank_filter.is_some_and(|wanted| bank_name != wanted) {
                return None;
            }
            Some(vec![
                slip.employee_name,
                bank_name,
                account_number,
                slip.net_salary.to_string(),
            ])
        })
        .collect();

    let file_name = format!("Laporan_Transfer_Bank_{}.csv", period.replace(' ', "_"));
    csv_attachment(&file_name, &BANK_TRANSFER_HEADERS, &rows)
}

#[utoipa::path(
    get,
    path = "/api/reports/attendance-summary",
    params(
        ("start", Query, description = "First day of the range, inclusive"),
        ("end", Query, description = "Last day of the range, inclusive")
    ),
    responses(
        (status = 200, description = "Attendance within the range as CSV, newest first", body = String, content_type = "text/csv"),
        (status = 400, description = "Nothing to export", body = Object, example = json!({
            "error": "Tidak ada data untuk diekspor."
        }))
    ),
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn attendance_summary_report(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Reports)?;
    let (Some(start), Some(end)) = (query.start, query.end) else {
        return Err(ApiError::validation("Tidak ada data untuk diekspor."));
    };

    let rows: Vec<Vec<String>> = store
        .list_attendance(None, None)
        .await?
        .into_iter()
        .filter(|r| r.date >= start && r.date <= end)
        .map(|r| {
            vec![
                r.employee_name,
                r.date.to_string(),
                r.clock_in,
                r.clock_out,
                r.shift,
                r.status.to_string(),
            ]
        })
        .collect();

    let file_name = format!("Laporan_Presensi_{start}_to_{end}.csv");
    csv_attachment(&file_name, &ATTENDANCE_REPORT_HEADERS, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_refused() {
        let err = csv_attachment("x.csv", &["A"], &[]).unwrap_err();
        assert_eq!(err.to_string(), "Tidak ada data untuk diekspor.");
    }

    #[test]
    fn attachment_carries_disposition_and_bom_free_csv() {
        let resp = csv_attachment(
            "Laporan_Data_Pegawai.csv",
            &["A", "B"],
            &[vec!["1".to_string(), "2".to_string()]],
        )
        .unwrap();
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(
            disposition,
            "attachment; filename=\"Laporan_Data_Pegawai.csv\""
        );
    }
}
