//! Sample data for demos and fresh installs, mirroring the dataset the
//! university uses in onboarding sessions. `load_sample_data` wipes
//! every collection except settings first, so it is safe to run twice.

use chrono::NaiveDate;

use crate::auth::password::hash_password;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::{Employee, EmployeeStatus, PositionHistory};
use crate::model::kpi::{Kpi, KpiStatus};
use crate::model::leave::{LeaveRequest, LeaveStatus};
use crate::model::master::{LeaveType, PartnerBank, Position, Unit};
use crate::model::payroll::{
    ComponentType, EmployeeSalaryComponent, PayItem, Payslip, PayrollComponent,
};
use crate::model::role::Role;
use crate::model::settings::{
    DATABASE_SETTINGS_KEY, DatabaseSettings, STORAGE_SETTINGS_KEY, StorageSettings,
    WAHA_SETTINGS_KEY, WahaSettings, WahaTriggers,
};
use crate::model::user::User;
use crate::store::HrisStore;

const SAMPLE_PASSWORD: &str = "password123";

fn d(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

/// Writes factory settings for any settings key that has never been
/// saved. Existing values are left untouched.
pub async fn ensure_default_settings(store: &dyn HrisStore) -> anyhow::Result<()> {
    if store.get_setting(WAHA_SETTINGS_KEY).await?.is_none() {
        let waha = WahaSettings {
            enabled: true,
            endpoint: "http://localhost:3000".into(),
            session_name: "default".into(),
            api_key: String::new(),
            triggers: WahaTriggers {
                leave_approved: true,
                leave_rejected: true,
                attendance_reminder: false,
                payslip_issued: true,
            },
        };
        store
            .put_setting(WAHA_SETTINGS_KEY, &serde_json::to_string(&waha)?)
            .await?;
    }
    if store.get_setting(DATABASE_SETTINGS_KEY).await?.is_none() {
        let database = DatabaseSettings::default();
        store
            .put_setting(DATABASE_SETTINGS_KEY, &serde_json::to_string(&database)?)
            .await?;
    }
    if store.get_setting(STORAGE_SETTINGS_KEY).await?.is_none() {
        let storage = StorageSettings::default();
        store
            .put_setting(STORAGE_SETTINGS_KEY, &serde_json::to_string(&storage)?)
            .await?;
    }
    Ok(())
}

pub async fn load_sample_data(store: &dyn HrisStore) -> anyhow::Result<()> {
    store.clear_all().await?;

    for user in sample_users() {
        store.save_user(user).await?;
    }
    for position in sample_positions() {
        store.create_position(position).await?;
    }
    for unit in sample_units() {
        store.create_unit(unit).await?;
    }
    for employee in sample_employees() {
        store.create_employee(employee).await?;
    }
    for entry in sample_position_history() {
        store.add_position_history(entry).await?;
    }
    store.add_attendance(sample_attendance()).await?;
    for request in sample_leave_requests() {
        store.create_leave_request(request).await?;
    }
    store.add_payslips(sample_payslips()).await?;
    for kpi in sample_kpis() {
        store.create_kpi(kpi).await?;
    }
    for leave_type in sample_leave_types() {
        store.create_leave_type(leave_type).await?;
    }
    for component in sample_payroll_components() {
        store.create_payroll_component(component).await?;
    }
    store
        .replace_salary_components("E001", sample_salary_components("E001"))
        .await?;
    store
        .replace_salary_components("E002", sample_salary_components("E002"))
        .await?;
    for bank in sample_partner_banks() {
        store.create_partner_bank(bank).await?;
    }

    log::info!("Sample data loaded");
    Ok(())
}

fn sample_users() -> Vec<User> {
    vec![
        User {
            name: "Budi Santoso".into(),
            email: "budi.santoso@unugha.ac.id".into(),
            whatsapp_number: "6281234567890".into(),
            avatar_url: "https://i.pravatar.cc/150?u=budi.santoso".into(),
            role: Role::AdminSdm,
            password_hash: hash_password(SAMPLE_PASSWORD),
        },
        User {
            name: "Super Admin".into(),
            email: "superadmin@unugha.ac.id".into(),
            whatsapp_number: "6281111111111".into(),
            avatar_url: "https://i.pravatar.cc/150?u=superadmin".into(),
            role: Role::Superadmin,
            password_hash: hash_password(SAMPLE_PASSWORD),
        },
        User {
            name: "Ani Keuangan".into(),
            email: "ani.keuangan@unugha.ac.id".into(),
            whatsapp_number: "6282222222222".into(),
            avatar_url: "https://i.pravatar.cc/150?u=ani.keuangan".into(),
            role: Role::AdminKeuangan,
            password_hash: hash_password(SAMPLE_PASSWORD),
        },
        // Staff account linked to employee E001 by email
        User {
            name: "Ahmad Dahlan".into(),
            email: "ahmad.d@unugha.ac.id".into(),
            whatsapp_number: "6281234567891".into(),
            avatar_url: "https://i.pravatar.cc/150?u=E001".into(),
            role: Role::Pegawai,
            password_hash: hash_password(SAMPLE_PASSWORD),
        },
    ]
}

fn sample_positions() -> Vec<Position> {
    [
        ("P001", "Rektor", "Pimpinan tertinggi universitas."),
        ("P002", "Dekan Fakultas Teknik", "Pimpinan Fakultas Teknik."),
        ("P003", "Dosen", "Tenaga pengajar."),
        ("P004", "Staf Administrasi", "Staf bagian administrasi."),
        ("P005", "Kepala Biro Keuangan", "Pimpinan Biro Keuangan."),
        ("P006", "Staf Pengajar", "Tenaga pengajar awal."),
    ]
    .into_iter()
    .map(|(id, name, description)| Position {
        id: id.into(),
        name: name.into(),
        description: description.into(),
    })
    .collect()
}

fn sample_units() -> Vec<Unit> {
    [
        ("U001", "Fakultas Teknik", "Fakultas"),
        ("U002", "Fakultas Ekonomi", "Fakultas"),
        ("U003", "Biro Administrasi Akademik", "Biro"),
        ("U004", "UPT Perpustakaan", "UPT"),
        ("U005", "Biro Keuangan", "Biro"),
    ]
    .into_iter()
    .map(|(id, name, category)| Unit {
        id: id.into(),
        name: name.into(),
        category: category.into(),
    })
    .collect()
}

fn sample_employees() -> Vec<Employee> {
    vec![
        Employee {
            id: "E001".into(),
            name: "Ahmad Dahlan".into(),
            nip: "198503152010011001".into(),
            position: "Dosen".into(),
            unit: "Fakultas Teknik".into(),
            email: "ahmad.d@unugha.ac.id".into(),
            whatsapp_number: "6281234567891".into(),
            status: EmployeeStatus::Active,
            avatar_url: "https://i.pravatar.cc/150?u=E001".into(),
            join_date: d("2010-01-15"),
            bank_name: "Bank Mandiri".into(),
            account_number: "1234567890".into(),
        },
        Employee {
            id: "E002".into(),
            name: "Siti Aminah".into(),
            nip: "199008202015032002".into(),
            position: "Staf Administrasi".into(),
            unit: "Biro Administrasi Akademik".into(),
            email: "siti.a@unugha.ac.id".into(),
            whatsapp_number: "6281234567892".into(),
            status: EmployeeStatus::Active,
            avatar_url: "https://i.pravatar.cc/150?u=E002".into(),
            join_date: d("2015-03-20"),
            bank_name: "Bank BRI".into(),
            account_number: "0987654321".into(),
        },
        Employee {
            id: "E003".into(),
            name: "Joko Susilo".into(),
            nip: "198211102008121003".into(),
            position: "Dekan Fakultas Teknik".into(),
            unit: "Fakultas Teknik".into(),
            email: "joko.s@unugha.ac.id".into(),
            whatsapp_number: "6281234567893".into(),
            status: EmployeeStatus::Active,
            avatar_url: "https://i.pravatar.cc/150?u=E003".into(),
            join_date: d("2008-12-01"),
            bank_name: "Bank BNI".into(),
            account_number: "1122334455".into(),
        },
        Employee {
            id: "E004".into(),
            name: "Dewi Lestari".into(),
            nip: "199205252018092004".into(),
            position: "Dosen".into(),
            unit: "Fakultas Ekonomi".into(),
            email: "dewi.l@unugha.ac.id".into(),
            whatsapp_number: "6281234567894".into(),
            status: EmployeeStatus::Active,
            avatar_url: "https://i.pravatar.cc/150?u=E004".into(),
            join_date: d("2018-09-01"),
            bank_name: "Bank BCA".into(),
            account_number: "5566778899".into(),
        },
        Employee {
            id: "E005".into(),
            name: "Bambang Pamungkas".into(),
            nip: "198006102005011005".into(),
            position: "Kepala Biro Keuangan".into(),
            unit: "Biro Keuangan".into(),
            email: "bambang.p@unugha.ac.id".into(),
            whatsapp_number: "6281234567895".into(),
            status: EmployeeStatus::Inactive,
            avatar_url: "https://i.pravatar.cc/150?u=E005".into(),
            join_date: d("2005-01-10"),
            bank_name: "Bank Mandiri".into(),
            account_number: "2233445566".into(),
        },
    ]
}

fn sample_position_history() -> Vec<PositionHistory> {
    vec![
        PositionHistory {
            id: "PH001".into(),
            employee_id: "E001".into(),
            position: "Staf Pengajar".into(),
            unit: "Fakultas Teknik".into(),
            start_date: d("2010-01-15"),
            end_date: Some(d("2014-12-31")),
        },
        PositionHistory {
            id: "PH002".into(),
            employee_id: "E001".into(),
            position: "Dosen".into(),
            unit: "Fakultas Teknik".into(),
            start_date: d("2015-01-01"),
            end_date: None,
        },
        PositionHistory {
            id: "PH003".into(),
            employee_id: "E003".into(),
            position: "Dosen".into(),
            unit: "Fakultas Teknik".into(),
            start_date: d("2008-12-01"),
            end_date: Some(d("2017-12-31")),
        },
        PositionHistory {
            id: "PH004".into(),
            employee_id: "E003".into(),
            position: "Dekan Fakultas Teknik".into(),
            unit: "Fakultas Teknik".into(),
            start_date: d("2018-01-01"),
            end_date: None,
        },
        PositionHistory {
            id: "PH005".into(),
            employee_id: "E002".into(),
            position: "Staf Administrasi".into(),
            unit: "Biro Administrasi Akademik".into(),
            start_date: d("2015-03-20"),
            end_date: None,
        },
        PositionHistory {
            id: "PH006".into(),
            employee_id: "E004".into(),
            position: "Dosen".into(),
            unit: "Fakultas Ekonomi".into(),
            start_date: d("2018-09-01"),
            end_date: None,
        },
    ]
}

fn sample_attendance() -> Vec<AttendanceRecord> {
    [
        ("A001", "E001", "Ahmad Dahlan", "2023-10-25", "08:00", "17:00", AttendanceStatus::OnTime),
        ("A002", "E002", "Siti Aminah", "2023-10-25", "08:15", "17:05", AttendanceStatus::Late),
        ("A003", "E003", "Joko Susilo", "2023-10-25", "07:55", "17:00", AttendanceStatus::OnTime),
        ("A004", "E004", "Dewi Lestari", "2023-10-25", "N/A", "N/A", AttendanceStatus::Absent),
        ("A005", "E001", "Ahmad Dahlan", "2023-10-26", "08:05", "17:02", AttendanceStatus::OnTime),
    ]
    .into_iter()
    .map(
        |(id, employee_id, employee_name, date, clock_in, clock_out, status)| AttendanceRecord {
            id: id.into(),
            employee_id: employee_id.into(),
            employee_name: employee_name.into(),
            date: d(date),
            clock_in: clock_in.into(),
            clock_out: clock_out.into(),
            status,
            shift: "Regular".into(),
        },
    )
    .collect()
}

fn sample_leave_requests() -> Vec<LeaveRequest> {
    vec![
        LeaveRequest {
            id: "L001".into(),
            employee_id: "E004".into(),
            employee_name: "Dewi Lestari".into(),
            leave_type: "Cuti Tahunan".into(),
            start_date: d("2023-10-25"),
            end_date: d("2023-10-26"),
            reason: "Acara keluarga".into(),
            status: LeaveStatus::Approved,
            approver: Some("Joko Susilo".into()),
            document_name: None,
            document_url: None,
        },
        LeaveRequest {
            id: "L002".into(),
            employee_id: "E002".into(),
            employee_name: "Siti Aminah".into(),
            leave_type: "Sakit".into(),
            start_date: d("2023-10-27"),
            end_date: d("2023-10-27"),
            reason: "Sakit demam".into(),
            status: LeaveStatus::Pending,
            approver: Some("Budi Santoso".into()),
            document_name: Some("surat_dokter.pdf".into()),
            document_url: None,
        },
        LeaveRequest {
            id: "L003".into(),
            employee_id: "E001".into(),
            employee_name: "Ahmad Dahlan".into(),
            leave_type: "Izin".into(),
            start_date: d("2023-10-28"),
            end_date: d("2023-10-28"),
            reason: "Keperluan mendadak".into(),
            status: LeaveStatus::Rejected,
            approver: Some("Joko Susilo".into()),
            document_name: None,
            document_url: None,
        },
    ]
}

fn payslip_items_e001() -> Vec<PayItem> {
    vec![
        PayItem { name: "Gaji Pokok".into(), kind: ComponentType::Earning, amount: 5_000_000 },
        PayItem { name: "Tunjangan Jabatan".into(), kind: ComponentType::Earning, amount: 1_500_000 },
        PayItem { name: "Tunjangan Transport".into(), kind: ComponentType::Earning, amount: 500_000 },
        PayItem { name: "Potongan BPJS".into(), kind: ComponentType::Deduction, amount: 200_000 },
        PayItem { name: "Potongan PPh 21".into(), kind: ComponentType::Deduction, amount: 150_000 },
    ]
}

fn payslip_items_e002() -> Vec<PayItem> {
    vec![
        PayItem { name: "Gaji Pokok".into(), kind: ComponentType::Earning, amount: 3_500_000 },
        PayItem { name: "Tunjangan Kinerja".into(), kind: ComponentType::Earning, amount: 750_000 },
        PayItem { name: "Tunjangan Makan".into(), kind: ComponentType::Earning, amount: 400_000 },
        PayItem { name: "Potongan BPJS".into(), kind: ComponentType::Deduction, amount: 150_000 },
    ]
}

fn sample_payslips() -> Vec<Payslip> {
    vec![
        Payslip {
            id: "PS001".into(),
            employee_id: "E001".into(),
            employee_name: "Ahmad Dahlan".into(),
            period: "Oktober 2023".into(),
            gross_salary: 7_000_000,
            total_deductions: 350_000,
            net_salary: 6_650_000,
            items: payslip_items_e001(),
        },
        Payslip {
            id: "PS002".into(),
            employee_id: "E002".into(),
            employee_name: "Siti Aminah".into(),
            period: "Oktober 2023".into(),
            gross_salary: 4_650_000,
            total_deductions: 150_000,
            net_salary: 4_500_000,
            items: payslip_items_e002(),
        },
        Payslip {
            id: "PS003".into(),
            employee_id: "E003".into(),
            employee_name: "Joko Susilo".into(),
            period: "Oktober 2023".into(),
            gross_salary: 9_000_000,
            total_deductions: 500_000,
            net_salary: 8_500_000,
            items: Vec::new(),
        },
        Payslip {
            id: "PS004".into(),
            employee_id: "E004".into(),
            employee_name: "Dewi Lestari".into(),
            period: "Oktober 2023".into(),
            gross_salary: 6_000_000,
            total_deductions: 300_000,
            net_salary: 5_700_000,
            items: Vec::new(),
        },
        Payslip {
            id: "PS005".into(),
            employee_id: "E001".into(),
            employee_name: "Ahmad Dahlan".into(),
            period: "September 2023".into(),
            gross_salary: 7_000_000,
            total_deductions: 350_000,
            net_salary: 6_650_000,
            items: payslip_items_e001(),
        },
    ]
}

fn sample_kpis() -> Vec<Kpi> {
    vec![
        Kpi {
            id: "K001".into(),
            employee_id: "E001".into(),
            employee_name: "Ahmad Dahlan".into(),
            title: "Publikasi Jurnal".into(),
            target: "2 Jurnal/Semester".into(),
            actual: "1 Jurnal".into(),
            progress: 50,
            period: "Semester Ganjil 2023".into(),
            status: KpiStatus::OnTrack,
        },
        Kpi {
            id: "K002".into(),
            employee_id: "E002".into(),
            employee_name: "Siti Aminah".into(),
            title: "Waktu Respon Email".into(),
            target: "< 24 jam".into(),
            actual: "18 jam".into(),
            progress: 100,
            period: "Q4 2023".into(),
            status: KpiStatus::Completed,
        },
        Kpi {
            id: "K003".into(),
            employee_id: "E004".into(),
            employee_name: "Dewi Lestari".into(),
            title: "Kepuasan Mahasiswa".into(),
            target: "Skor 4.5/5".into(),
            actual: "Skor 4.0/5".into(),
            progress: 80,
            period: "Semester Ganjil 2023".into(),
            status: KpiStatus::AtRisk,
        },
    ]
}

fn sample_leave_types() -> Vec<LeaveType> {
    [
        ("LT001", "Cuti Tahunan", 12),
        ("LT002", "Sakit dengan Surat Dokter", 3),
        ("LT003", "Cuti Melahirkan", 90),
        ("LT004", "Izin Keperluan Penting", 2),
    ]
    .into_iter()
    .map(|(id, name, default_days)| LeaveType {
        id: id.into(),
        name: name.into(),
        default_days,
    })
    .collect()
}

fn sample_payroll_components() -> Vec<PayrollComponent> {
    [
        ("PC001", "Gaji Pokok", ComponentType::Earning),
        ("PC002", "Tunjangan Jabatan", ComponentType::Earning),
        ("PC003", "Tunjangan Transport", ComponentType::Earning),
        ("PC004", "Tunjangan Makan", ComponentType::Earning),
        ("PC101", "Potongan BPJS", ComponentType::Deduction),
        ("PC102", "Potongan PPh 21", ComponentType::Deduction),
    ]
    .into_iter()
    .map(|(id, name, kind)| PayrollComponent {
        id: id.into(),
        name: name.into(),
        kind,
    })
    .collect()
}

fn sample_salary_components(employee_id: &str) -> Vec<EmployeeSalaryComponent> {
    let rows: &[(&str, &str, i64)] = match employee_id {
        "E001" => &[
            ("E001", "PC001", 5_000_000),
            ("E001", "PC002", 1_500_000),
            ("E001", "PC003", 500_000),
            ("E001", "PC101", 200_000),
            ("E001", "PC102", 150_000),
        ],
        "E002" => &[
            ("E002", "PC001", 350_000),
            ("E002", "PC004", 400_000),
            ("E002", "PC101", 150_000),
        ],
        _ => &[],
    };
    rows.iter()
        .map(|(employee_id, component_id, amount)| EmployeeSalaryComponent {
            employee_id: (*employee_id).into(),
            component_id: (*component_id).into(),
            amount: *amount,
        })
        .collect()
}

fn sample_partner_banks() -> Vec<PartnerBank> {
    [
        ("BANK001", "Bank Mandiri", "008"),
        ("BANK002", "Bank BRI", "002"),
        ("BANK003", "Bank BNI", "009"),
        ("BANK004", "Bank BCA", "014"),
        ("BANK005", "Bank Syariah Indonesia", "451"),
    ]
    .into_iter()
    .map(|(id, name, code)| PartnerBank {
        id: id.into(),
        name: name.into(),
        code: Some(code.into()),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::store::memory::MemoryStore;

    #[actix_web::test]
    async fn sample_data_fills_every_collection() {
        let store = MemoryStore::new();
        load_sample_data(&store).await.unwrap();

        assert_eq!(store.list_employees().await.unwrap().len(), 5);
        assert_eq!(store.list_leave_requests().await.unwrap().len(), 3);
        assert_eq!(store.list_payslips(None).await.unwrap().len(), 5);
        assert_eq!(store.list_kpis().await.unwrap().len(), 3);
        assert_eq!(store.list_positions().await.unwrap().len(), 6);
        assert_eq!(store.list_partner_banks().await.unwrap().len(), 5);
        assert_eq!(store.salary_components_for("E002").await.unwrap().len(), 3);

        let user = store
            .find_user("superadmin@unugha.ac.id")
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("password123", &user.password_hash).is_ok());
    }

    #[actix_web::test]
    async fn loading_twice_does_not_duplicate() {
        let store = MemoryStore::new();
        load_sample_data(&store).await.unwrap();
        load_sample_data(&store).await.unwrap();
        assert_eq!(store.list_employees().await.unwrap().len(), 5);
        assert_eq!(store.list_attendance(None, None).await.unwrap().len(), 5);
    }

    #[actix_web::test]
    async fn defaults_do_not_overwrite_saved_settings() {
        let store = MemoryStore::new();
        store
            .put_setting(WAHA_SETTINGS_KEY, r#"{"enabled":false}"#)
            .await
            .unwrap();
        ensure_default_settings(&store).await.unwrap();

        let raw = store.get_setting(WAHA_SETTINGS_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"{"enabled":false}"#);
        assert!(store.get_setting(DATABASE_SETTINGS_KEY).await.unwrap().is_some());
    }
}
