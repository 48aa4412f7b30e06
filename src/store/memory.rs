use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{HrisStore, StoreError};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::{Employee, PositionHistory};
use crate::model::kpi::Kpi;
use crate::model::leave::LeaveRequest;
use crate::model::master::{LeaveType, PartnerBank, Position, Unit};
use crate::model::payroll::{EmployeeSalaryComponent, PayrollComponent, Payslip};
use crate::model::user::User;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

fn sorted_by_id<T: Clone>(map: &HashMap<String, T>) -> Vec<T> {
    let mut ids: Vec<&String> = map.keys().collect();
    ids.sort();
    ids.into_iter().map(|id| map[id].clone()).collect()
}

/// Process-local backend. Used when no database is configured and in
/// the test suite; every collection lives behind its own lock.
#[derive(Default)]
pub struct MemoryStore {
    employees: RwLock<HashMap<String, Employee>>,
    position_history: RwLock<HashMap<String, PositionHistory>>,
    leave_requests: RwLock<HashMap<String, LeaveRequest>>,
    attendance: RwLock<HashMap<String, AttendanceRecord>>,
    payslips: RwLock<HashMap<String, Payslip>>,
    payroll_components: RwLock<HashMap<String, PayrollComponent>>,
    salary_components: RwLock<Vec<EmployeeSalaryComponent>>,
    kpis: RwLock<HashMap<String, Kpi>>,
    positions: RwLock<HashMap<String, Position>>,
    units: RwLock<HashMap<String, Unit>>,
    leave_types: RwLock<HashMap<String, LeaveType>>,
    partner_banks: RwLock<HashMap<String, PartnerBank>>,
    users: RwLock<HashMap<String, User>>,
    settings: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn update_in<T>(map: &RwLock<HashMap<String, T>>, id: &str, value: T) -> Result<(), StoreError> {
        let mut guard = write(map);
        match guard.get_mut(id) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete_in<T>(map: &RwLock<HashMap<String, T>>, id: &str) -> Result<(), StoreError> {
        match write(map).remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}

#[async_trait]
impl HrisStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(sorted_by_id(&read(&self.employees)))
    }

    async fn find_employee(&self, id: &str) -> Result<Option<Employee>, StoreError> {
        Ok(read(&self.employees).get(id).cloned())
    }

    async fn find_employee_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError> {
        let needle = email.to_lowercase();
        Ok(read(&self.employees)
            .values()
            .find(|e| e.email.to_lowercase() == needle)
            .cloned())
    }

    async fn create_employee(&self, employee: Employee) -> Result<(), StoreError> {
        write(&self.employees).insert(employee.id.clone(), employee);
        Ok(())
    }

    async fn update_employee(&self, employee: Employee) -> Result<(), StoreError> {
        Self::update_in(&self.employees, &employee.id.clone(), employee)
    }

    async fn delete_employee(&self, id: &str) -> Result<(), StoreError> {
        Self::delete_in(&self.employees, id)
    }

    async fn position_history_for(
        &self,
        employee_id: &str,
    ) -> Result<Vec<PositionHistory>, StoreError> {
        let mut rows: Vec<PositionHistory> = read(&self.position_history)
            .values()
            .filter(|h| h.employee_id == employee_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn add_position_history(&self, entry: PositionHistory) -> Result<(), StoreError> {
        write(&self.position_history).insert(entry.id.clone(), entry);
        Ok(())
    }

    async fn close_open_position(
        &self,
        employee_id: &str,
        end_date: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut guard = write(&self.position_history);
        for row in guard.values_mut() {
            if row.employee_id == employee_id && row.end_date.is_none() {
                row.end_date = Some(end_date);
            }
        }
        Ok(())
    }

    async fn delete_position_history_for(&self, employee_id: &str) -> Result<(), StoreError> {
        write(&self.position_history).retain(|_, h| h.employee_id != employee_id);
        Ok(())
    }

    async fn list_leave_requests(&self) -> Result<Vec<LeaveRequest>, StoreError> {
        Ok(sorted_by_id(&read(&self.leave_requests)))
    }

    async fn find_leave_request(&self, id: &str) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(read(&self.leave_requests).get(id).cloned())
    }

    async fn create_leave_request(&self, request: LeaveRequest) -> Result<(), StoreError> {
        write(&self.leave_requests).insert(request.id.clone(), request);
        Ok(())
    }

    async fn update_leave_request(&self, request: LeaveRequest) -> Result<(), StoreError> {
        Self::update_in(&self.leave_requests, &request.id.clone(), request)
    }

    async fn list_attendance(
        &self,
        date: Option<NaiveDate>,
        employee_id: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut rows: Vec<AttendanceRecord> = read(&self.attendance)
            .values()
            .filter(|r| date.is_none_or(|d| r.date == d))
            .filter(|r| employee_id.is_none_or(|id| r.employee_id == id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn add_attendance(&self, records: Vec<AttendanceRecord>) -> Result<(), StoreError> {
        let mut guard = write(&self.attendance);
        for record in records {
            guard.insert(record.id.clone(), record);
        }
        Ok(())
    }

    async fn list_payslips(&self, period: Option<&str>) -> Result<Vec<Payslip>, StoreError> {
        let mut rows: Vec<Payslip> = read(&self.payslips)
            .values()
            .filter(|s| period.is_none_or(|p| s.period == p))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }

    async fn payroll_periods(&self) -> Result<Vec<String>, StoreError> {
        let mut periods: Vec<String> = read(&self.payslips)
            .values()
            .map(|s| s.period.clone())
            .collect();
        periods.sort();
        periods.dedup();
        Ok(periods)
    }

    async fn add_payslips(&self, slips: Vec<Payslip>) -> Result<(), StoreError> {
        let mut guard = write(&self.payslips);
        for slip in slips {
            guard.insert(slip.id.clone(), slip);
        }
        Ok(())
    }

    async fn list_payroll_components(&self) -> Result<Vec<PayrollComponent>, StoreError> {
        Ok(sorted_by_id(&read(&self.payroll_components)))
    }

    async fn create_payroll_component(
        &self,
        component: PayrollComponent,
    ) -> Result<(), StoreError> {
        write(&self.payroll_components).insert(component.id.clone(), component);
        Ok(())
    }

    async fn update_payroll_component(
        &self,
        component: PayrollComponent,
    ) -> Result<(), StoreError> {
        Self::update_in(&self.payroll_components, &component.id.clone(), component)
    }

    async fn delete_payroll_component(&self, id: &str) -> Result<(), StoreError> {
        Self::delete_in(&self.payroll_components, id)
    }

    async fn list_salary_components(&self) -> Result<Vec<EmployeeSalaryComponent>, StoreError> {
        Ok(read(&self.salary_components).clone())
    }

    async fn salary_components_for(
        &self,
        employee_id: &str,
    ) -> Result<Vec<EmployeeSalaryComponent>, StoreError> {
        Ok(read(&self.salary_components)
            .iter()
            .filter(|row| row.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn replace_salary_components(
        &self,
        employee_id: &str,
        rows: Vec<EmployeeSalaryComponent>,
    ) -> Result<(), StoreError> {
        let mut guard = write(&self.salary_components);
        guard.retain(|row| row.employee_id != employee_id);
        guard.extend(rows);
        Ok(())
    }

    async fn list_kpis(&self) -> Result<Vec<Kpi>, StoreError> {
        Ok(sorted_by_id(&read(&self.kpis)))
    }

    async fn create_kpi(&self, kpi: Kpi) -> Result<(), StoreError> {
        write(&self.kpis).insert(kpi.id.clone(), kpi);
        Ok(())
    }

    async fn update_kpi(&self, kpi: Kpi) -> Result<(), StoreError> {
        Self::update_in(&self.kpis, &kpi.id.clone(), kpi)
    }

    async fn delete_kpi(&self, id: &str) -> Result<(), StoreError> {
        Self::delete_in(&self.kpis, id)
    }

    async fn list_positions(&self) -> Result<Vec<Position>, StoreError> {
        Ok(sorted_by_id(&read(&self.positions)))
    }

    async fn create_position(&self, position: Position) -> Result<(), StoreError> {
        write(&self.positions).insert(position.id.clone(), position);
        Ok(())
    }

    async fn update_position(&self, position: Position) -> Result<(), StoreError> {
        Self::update_in(&self.positions, &position.id.clone(), position)
    }

    async fn delete_position(&self, id: &str) -> Result<(), StoreError> {
        Self::delete_in(&self.positions, id)
    }

    async fn list_units(&self) -> Result<Vec<Unit>, StoreError> {
        Ok(sorted_by_id(&read(&self.units)))
    }

    async fn create_unit(&self, unit: Unit) -> Result<(), StoreError> {
        write(&self.units).insert(unit.id.clone(), unit);
        Ok(())
    }

    async fn update_unit(&self, unit: Unit) -> Result<(), StoreError> {
        Self::update_in(&self.units, &unit.id.clone(), unit)
    }

    async fn delete_unit(&self, id: &str) -> Result<(), StoreError> {
        Self::delete_in(&self.units, id)
    }

    async fn list_leave_types(&self) -> Result<Vec<LeaveType>, StoreError> {
        Ok(sorted_by_id(&read(&self.leave_types)))
    }

    async fn create_leave_type(&self, leave_type: LeaveType) -> Result<(), StoreError> {
        write(&self.leave_types).insert(leave_type.id.clone(), leave_type);
        Ok(())
    }

    async fn update_leave_type(&self, leave_type: LeaveType) -> Result<(), StoreError> {
        Self::update_in(&self.leave_types, &leave_type.id.clone(), leave_type)
    }

    async fn delete_leave_type(&self, id: &str) -> Result<(), StoreError> {
        Self::delete_in(&self.leave_types, id)
    }

    async fn list_partner_banks(&self) -> Result<Vec<PartnerBank>, StoreError> {
        Ok(sorted_by_id(&read(&self.partner_banks)))
    }

    async fn create_partner_bank(&self, bank: PartnerBank) -> Result<(), StoreError> {
        write(&self.partner_banks).insert(bank.id.clone(), bank);
        Ok(())
    }

    async fn update_partner_bank(&self, bank: PartnerBank) -> Result<(), StoreError> {
        Self::update_in(&self.partner_banks, &bank.id.clone(), bank)
    }

    async fn delete_partner_bank(&self, id: &str) -> Result<(), StoreError> {
        Self::delete_in(&self.partner_banks, id)
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        let needle = email.to_lowercase();
        Ok(read(&self.users)
            .values()
            .find(|u| u.email.to_lowercase() == needle)
            .cloned())
    }

    async fn save_user(&self, user: User) -> Result<(), StoreError> {
        write(&self.users).insert(user.email.to_lowercase(), user);
        Ok(())
    }

    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(read(&self.settings).get(key).cloned())
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        write(&self.settings).insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        write(&self.employees).clear();
        write(&self.position_history).clear();
        write(&self.leave_requests).clear();
        write(&self.attendance).clear();
        write(&self.payslips).clear();
        write(&self.payroll_components).clear();
        write(&self.salary_components).clear();
        write(&self.kpis).clear();
        write(&self.positions).clear();
        write(&self.units).clear();
        write(&self.leave_types).clear();
        write(&self.partner_banks).clear();
        write(&self.users).clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmployeeStatus;

    fn employee(id: &str, email: &str) -> Employee {
        Employee {
            id: id.into(),
            name: "Tes Pegawai".into(),
            nip: "199001012015031001".into(),
            position: "Dosen".into(),
            unit: "Fakultas Teknik".into(),
            email: email.into(),
            whatsapp_number: "6281234567890".into(),
            status: EmployeeStatus::Active,
            avatar_url: String::new(),
            join_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            bank_name: "Bank Mandiri".into(),
            account_number: "1234567890".into(),
        }
    }

    #[actix_web::test]
    async fn employee_roundtrip() {
        let store = MemoryStore::new();
        store
            .create_employee(employee("E001", "a@unugha.ac.id"))
            .await
            .unwrap();

        let found = store.find_employee("E001").await.unwrap();
        assert!(found.is_some());

        let mut updated = found.unwrap();
        updated.position = "Rektor".into();
        store.update_employee(updated).await.unwrap();
        assert_eq!(
            store.find_employee("E001").await.unwrap().unwrap().position,
            "Rektor"
        );

        store.delete_employee("E001").await.unwrap();
        assert!(store.find_employee("E001").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn update_missing_employee_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_employee(employee("E404", "x@unugha.ac.id"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[actix_web::test]
    async fn employee_email_lookup_ignores_case() {
        let store = MemoryStore::new();
        store
            .create_employee(employee("E001", "Budi.Santoso@unugha.ac.id"))
            .await
            .unwrap();
        let found = store
            .find_employee_by_email("budi.santoso@UNUGHA.AC.ID")
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, "E001");
    }

    #[actix_web::test]
    async fn close_open_position_leaves_closed_rows_alone() {
        let store = MemoryStore::new();
        let closed = PositionHistory {
            id: "PH001".into(),
            employee_id: "E001".into(),
            position: "Staf".into(),
            unit: "BAU".into(),
            start_date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            end_date: Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
        };
        let open = PositionHistory {
            id: "PH002".into(),
            employee_id: "E001".into(),
            position: "Dosen".into(),
            unit: "Fakultas Teknik".into(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            end_date: None,
        };
        store.add_position_history(closed.clone()).await.unwrap();
        store.add_position_history(open).await.unwrap();

        let today = NaiveDate::from_ymd_opt(2023, 10, 1).unwrap();
        store.close_open_position("E001", today).await.unwrap();

        let rows = store.position_history_for("E001").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].end_date, Some(today));
        assert_eq!(rows[1].end_date, closed.end_date);
    }

    #[actix_web::test]
    async fn replace_salary_components_only_touches_one_employee() {
        let store = MemoryStore::new();
        let row = |employee_id: &str, component_id: &str, amount: i64| EmployeeSalaryComponent {
            employee_id: employee_id.into(),
            component_id: component_id.into(),
            amount,
        };
        store
            .replace_salary_components("E001", vec![row("E001", "PC001", 5_000_000)])
            .await
            .unwrap();
        store
            .replace_salary_components("E002", vec![row("E002", "PC001", 4_000_000)])
            .await
            .unwrap();
        store
            .replace_salary_components("E001", vec![row("E001", "PC002", 750_000)])
            .await
            .unwrap();

        let e1 = store.salary_components_for("E001").await.unwrap();
        assert_eq!(e1.len(), 1);
        assert_eq!(e1[0].component_id, "PC002");
        assert_eq!(store.salary_components_for("E002").await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn clear_all_preserves_settings() {
        let store = MemoryStore::new();
        store
            .create_employee(employee("E001", "a@unugha.ac.id"))
            .await
            .unwrap();
        store.put_setting("waha", r#"{"enabled":true}"#).await.unwrap();

        store.clear_all().await.unwrap();

        assert!(store.list_employees().await.unwrap().is_empty());
        assert!(store.get_setting("waha").await.unwrap().is_some());
    }
}
