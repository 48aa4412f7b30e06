use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::employee::{Employee, EmployeeStatus};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
pub enum ComponentType {
    Earning,
    Deduction,
}

/// Master definition of a salary component, e.g. "Gaji Pokok".
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollComponent {
    #[schema(example = "PC001")]
    pub id: String,

    #[schema(example = "Gaji Pokok")]
    pub name: String,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    #[schema(example = "Earning")]
    pub kind: ComponentType,
}

/// Amount assigned to one employee for one component.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSalaryComponent {
    #[schema(example = "E001")]
    pub employee_id: String,

    #[schema(example = "PC001")]
    pub component_id: String,

    #[schema(example = 5000000)]
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayItem {
    #[schema(example = "Gaji Pokok")]
    pub name: String,

    #[serde(rename = "type")]
    #[schema(example = "Earning")]
    pub kind: ComponentType,

    #[schema(example = 5000000)]
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "PS001",
        "employeeId": "E001",
        "employeeName": "Ahmad Dahlan",
        "period": "Oktober 2023",
        "grossSalary": 7000000,
        "totalDeductions": 350000,
        "netSalary": 6650000,
        "items": [{ "name": "Gaji Pokok", "type": "Earning", "amount": 5000000 }]
    })
)]
pub struct Payslip {
    #[schema(example = "PS001")]
    pub id: String,

    #[schema(example = "E001")]
    pub employee_id: String,

    #[schema(example = "Ahmad Dahlan")]
    pub employee_name: String,

    #[schema(example = "Oktober 2023")]
    pub period: String,

    #[schema(example = 7000000)]
    pub gross_salary: i64,

    #[schema(example = 350000)]
    pub total_deductions: i64,

    #[schema(example = 6650000)]
    pub net_salary: i64,

    pub items: Vec<PayItem>,
}

/// Builds one payslip per Active employee for the given period.
///
/// Gross is the sum of the employee's Earning assignments, deductions
/// the sum of Deduction assignments, net the difference. Every
/// assignment is itemized on the slip; an assignment pointing at a
/// deleted component is kept as an "Unknown" earning so amounts still
/// add up. Employees with no assignments get a zero slip.
pub fn build_payslips(
    period: &str,
    employees: &[Employee],
    components: &[PayrollComponent],
    salary_components: &[EmployeeSalaryComponent],
) -> Vec<Payslip> {
    let by_id: HashMap<&str, &PayrollComponent> =
        components.iter().map(|c| (c.id.as_str(), c)).collect();

    employees
        .iter()
        .filter(|e| e.status == EmployeeStatus::Active)
        .map(|employee| {
            let mut gross = 0i64;
            let mut deductions = 0i64;
            let mut items = Vec::new();

            for assignment in salary_components
                .iter()
                .filter(|sc| sc.employee_id == employee.id)
            {
                let (name, kind) = match by_id.get(assignment.component_id.as_str()) {
                    Some(component) => (component.name.clone(), component.kind),
                    None => ("Unknown".to_string(), ComponentType::Earning),
                };
                match kind {
                    ComponentType::Earning => gross += assignment.amount,
                    ComponentType::Deduction => deductions += assignment.amount,
                }
                items.push(PayItem {
                    name,
                    kind,
                    amount: assignment.amount,
                });
            }

            Payslip {
                id: format!("PS-{}-{}", employee.id, Uuid::new_v4().simple()),
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
                period: period.to_string(),
                gross_salary: gross,
                total_deductions: deductions,
                net_salary: gross - deductions,
                items,
            }
        })
        .collect()
}

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Parses a payroll period label like "Oktober 2023" into (year, month).
pub fn parse_period(period: &str) -> Option<(i32, u32)> {
    let (month_name, year) = period.trim().split_once(' ')?;
    let month = MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;
    let year: i32 = year.trim().parse().ok()?;
    Some((year, month))
}

/// Orders period labels newest first. Labels that do not parse sort
/// after all recognized ones, alphabetically.
pub fn sort_periods_desc(periods: &mut [String]) {
    periods.sort_by(|a, b| match (parse_period(a), parse_period(b)) {
        (Some(ka), Some(kb)) => kb.cmp(&ka),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn employee(id: &str, name: &str, status: EmployeeStatus) -> Employee {
        Employee {
            id: id.into(),
            name: name.into(),
            nip: "0001".into(),
            position: "Dosen".into(),
            unit: "Fakultas Teknik".into(),
            email: format!("{}@unugha.ac.id", id.to_lowercase()),
            whatsapp_number: "6281234567890".into(),
            status,
            avatar_url: String::new(),
            join_date: NaiveDate::from_ymd_opt(2010, 1, 15).unwrap(),
            bank_name: "Bank Mandiri".into(),
            account_number: "1234567890".into(),
        }
    }

    fn component(id: &str, name: &str, kind: ComponentType) -> PayrollComponent {
        PayrollComponent {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    fn assignment(employee_id: &str, component_id: &str, amount: i64) -> EmployeeSalaryComponent {
        EmployeeSalaryComponent {
            employee_id: employee_id.into(),
            component_id: component_id.into(),
            amount,
        }
    }

    #[test]
    fn sums_earnings_and_deductions_per_employee() {
        let employees = vec![employee("E001", "Ahmad Dahlan", EmployeeStatus::Active)];
        let components = vec![
            component("PC001", "Gaji Pokok", ComponentType::Earning),
            component("PC002", "Tunjangan Jabatan", ComponentType::Earning),
            component("PC101", "Potongan BPJS", ComponentType::Deduction),
        ];
        let salary = vec![
            assignment("E001", "PC001", 5_000_000),
            assignment("E001", "PC002", 1_500_000),
            assignment("E001", "PC101", 200_000),
        ];

        let slips = build_payslips("Oktober 2023", &employees, &components, &salary);
        assert_eq!(slips.len(), 1);

        let slip = &slips[0];
        assert_eq!(slip.gross_salary, 6_500_000);
        assert_eq!(slip.total_deductions, 200_000);
        assert_eq!(slip.net_salary, 6_300_000);
        assert_eq!(slip.period, "Oktober 2023");
        assert_eq!(slip.items.len(), 3);
    }

    #[test]
    fn skips_inactive_employees() {
        let employees = vec![
            employee("E001", "Ahmad Dahlan", EmployeeStatus::Active),
            employee("E005", "Bambang Pamungkas", EmployeeStatus::Inactive),
        ];
        let slips = build_payslips("Oktober 2023", &employees, &[], &[]);
        assert_eq!(slips.len(), 1);
        assert_eq!(slips[0].employee_id, "E001");
    }

    #[test]
    fn employee_without_assignments_gets_zero_slip() {
        let employees = vec![employee("E002", "Siti Aminah", EmployeeStatus::Active)];
        let slips = build_payslips("Oktober 2023", &employees, &[], &[]);
        assert_eq!(slips[0].gross_salary, 0);
        assert_eq!(slips[0].net_salary, 0);
        assert!(slips[0].items.is_empty());
    }

    #[test]
    fn dangling_assignment_counts_as_unknown_earning() {
        let employees = vec![employee("E001", "Ahmad Dahlan", EmployeeStatus::Active)];
        let salary = vec![assignment("E001", "PC999", 100_000)];

        let slips = build_payslips("Oktober 2023", &employees, &[], &salary);
        assert_eq!(slips[0].gross_salary, 100_000);
        assert_eq!(slips[0].items[0].name, "Unknown");
        assert_eq!(slips[0].items[0].kind, ComponentType::Earning);
    }

    #[test]
    fn parses_indonesian_period_labels() {
        assert_eq!(parse_period("Oktober 2023"), Some((2023, 10)));
        assert_eq!(parse_period("Januari 2024"), Some((2024, 1)));
        assert_eq!(parse_period("October 2023"), None);
        assert_eq!(parse_period("Oktober"), None);
    }

    #[test]
    fn sorts_periods_newest_first_with_unknowns_last() {
        let mut periods = vec![
            "September 2023".to_string(),
            "Januari 2024".to_string(),
            "bogus".to_string(),
            "Oktober 2023".to_string(),
        ];
        sort_periods_desc(&mut periods);
        assert_eq!(
            periods,
            vec!["Januari 2024", "Oktober 2023", "September 2023", "bogus"]
        );
    }
}
