use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::{HrisStore, StoreError};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::{Employee, PositionHistory};
use crate::model::kpi::Kpi;
use crate::model::leave::LeaveRequest;
use crate::model::master::{LeaveType, PartnerBank, Position, Unit};
use crate::model::payroll::{EmployeeSalaryComponent, PayItem, PayrollComponent, Payslip};
use crate::model::user::User;

/// SQLite backend. The schema mirrors the Cloudflare D1 tables this
/// service replaces, so `DATABASE_URL` can point at a file or `:memory:`.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Payslip items are a JSON array in a TEXT column, so payslips go
/// through this row type instead of deriving `FromRow` directly.
#[derive(sqlx::FromRow)]
struct PayslipRow {
    id: String,
    employee_id: String,
    employee_name: String,
    period: String,
    gross_salary: i64,
    total_deductions: i64,
    net_salary: i64,
    items: String,
}

impl PayslipRow {
    fn into_payslip(self) -> Result<Payslip, StoreError> {
        let items: Vec<PayItem> = serde_json::from_str(&self.items)
            .map_err(|e| StoreError::Corrupt(format!("payslip {} items: {e}", self.id)))?;
        Ok(Payslip {
            id: self.id,
            employee_id: self.employee_id,
            employee_name: self.employee_name,
            period: self.period,
            gross_salary: self.gross_salary,
            total_deductions: self.total_deductions,
            net_salary: self.net_salary,
            items,
        })
    }
}

fn affected_or_not_found(result: sqlx::sqlite::SqliteQueryResult) -> Result<(), StoreError> {
    if result.rows_affected() == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl HrisStore for SqliteStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        let rows = sqlx::query_as::<_, Employee>(
            "SELECT id, name, nip, position, unit, email, whatsapp_number, status, avatar_url, \
             join_date, bank_name, account_number FROM employees ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_employee(&self, id: &str) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query_as::<_, Employee>(
            "SELECT id, name, nip, position, unit, email, whatsapp_number, status, avatar_url, \
             join_date, bank_name, account_number FROM employees WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_employee_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query_as::<_, Employee>(
            "SELECT id, name, nip, position, unit, email, whatsapp_number, status, avatar_url, \
             join_date, bank_name, account_number FROM employees WHERE LOWER(email) = LOWER(?)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_employee(&self, employee: Employee) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO employees (id, name, nip, position, unit, email, whatsapp_number, \
             status, avatar_url, join_date, bank_name, account_number) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(&employee.nip)
        .bind(&employee.position)
        .bind(&employee.unit)
        .bind(&employee.email)
        .bind(&employee.whatsapp_number)
        .bind(employee.status)
        .bind(&employee.avatar_url)
        .bind(employee.join_date)
        .bind(&employee.bank_name)
        .bind(&employee.account_number)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_employee(&self, employee: Employee) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE employees SET name = ?, nip = ?, position = ?, unit = ?, email = ?, \
             whatsapp_number = ?, status = ?, avatar_url = ?, join_date = ?, bank_name = ?, \
             account_number = ? WHERE id = ?",
        )
        .bind(&employee.name)
        .bind(&employee.nip)
        .bind(&employee.position)
        .bind(&employee.unit)
        .bind(&employee.email)
        .bind(&employee.whatsapp_number)
        .bind(employee.status)
        .bind(&employee.avatar_url)
        .bind(employee.join_date)
        .bind(&employee.bank_name)
        .bind(&employee.account_number)
        .bind(&employee.id)
        .execute(&self.pool)
        .await?;
        affected_or_not_found(result)
    }

    async fn delete_employee(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn position_history_for(
        &self,
        employee_id: &str,
    ) -> Result<Vec<PositionHistory>, StoreError> {
        let rows = sqlx::query_as::<_, PositionHistory>(
            "SELECT id, employee_id, position, unit, start_date, end_date FROM position_history \
             WHERE employee_id = ? ORDER BY start_date DESC, id DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn add_position_history(&self, entry: PositionHistory) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO position_history (id, employee_id, position, unit, start_date, end_date) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.id)
        .bind(&entry.employee_id)
        .bind(&entry.position)
        .bind(&entry.unit)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn close_open_position(
        &self,
        employee_id: &str,
        end_date: NaiveDate,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE position_history SET end_date = ? WHERE employee_id = ? AND end_date IS NULL",
        )
        .bind(end_date)
        .bind(employee_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_position_history_for(&self, employee_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM position_history WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_leave_requests(&self) -> Result<Vec<LeaveRequest>, StoreError> {
        let rows = sqlx::query_as::<_, LeaveRequest>(
            "SELECT id, employee_id, employee_name, leave_type, start_date, end_date, reason, \
             status, approver, document_name, document_url FROM leave_requests ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_leave_request(&self, id: &str) -> Result<Option<LeaveRequest>, StoreError> {
        let row = sqlx::query_as::<_, LeaveRequest>(
            "SELECT id, employee_id, employee_name, leave_type, start_date, end_date, reason, \
             status, approver, document_name, document_url FROM leave_requests WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_leave_request(&self, request: LeaveRequest) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO leave_requests (id, employee_id, employee_name, leave_type, start_date, \
             end_date, reason, status, approver, document_name, document_url) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.id)
        .bind(&request.employee_id)
        .bind(&request.employee_name)
        .bind(&request.leave_type)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.reason)
        .bind(request.status)
        .bind(&request.approver)
        .bind(&request.document_name)
        .bind(&request.document_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_leave_request(&self, request: LeaveRequest) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE leave_requests SET employee_id = ?, employee_name = ?, leave_type = ?, \
             start_date = ?, end_date = ?, reason = ?, status = ?, approver = ?, \
             document_name = ?, document_url = ? WHERE id = ?",
        )
        .bind(&request.employee_id)
        .bind(&request.employee_name)
        .bind(&request.leave_type)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.reason)
        .bind(request.status)
        .bind(&request.approver)
        .bind(&request.document_name)
        .bind(&request.document_url)
        .bind(&request.id)
        .execute(&self.pool)
        .await?;
        affected_or_not_found(result)
    }

    async fn list_attendance(
        &self,
        date: Option<NaiveDate>,
        employee_id: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut sql = String::from(
            "SELECT id, employee_id, employee_name, date, clock_in, clock_out, status, shift \
             FROM attendance WHERE 1 = 1",
        );
        if date.is_some() {
            sql.push_str(" AND date = ?");
        }
        if employee_id.is_some() {
            sql.push_str(" AND employee_id = ?");
        }
        sql.push_str(" ORDER BY date DESC, id");

        let mut query = sqlx::query_as::<_, AttendanceRecord>(&sql);
        if let Some(date) = date {
            query = query.bind(date);
        }
        if let Some(employee_id) = employee_id {
            query = query.bind(employee_id);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn add_attendance(&self, records: Vec<AttendanceRecord>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for record in records {
            sqlx::query(
                "INSERT INTO attendance (id, employee_id, employee_name, date, clock_in, \
                 clock_out, status, shift) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&record.id)
            .bind(&record.employee_id)
            .bind(&record.employee_name)
            .bind(record.date)
            .bind(&record.clock_in)
            .bind(&record.clock_out)
            .bind(record.status)
            .bind(&record.shift)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_payslips(&self, period: Option<&str>) -> Result<Vec<Payslip>, StoreError> {
        let mut sql = String::from(
            "SELECT id, employee_id, employee_name, period, gross_salary, total_deductions, \
             net_salary, items FROM payslips",
        );
        if period.is_some() {
            sql.push_str(" WHERE period = ?");
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query_as::<_, PayslipRow>(&sql);
        if let Some(period) = period {
            query = query.bind(period);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(PayslipRow::into_payslip).collect()
    }

    async fn payroll_periods(&self) -> Result<Vec<String>, StoreError> {
        let periods =
            sqlx::query_scalar::<_, String>("SELECT DISTINCT period FROM payslips ORDER BY period")
                .fetch_all(&self.pool)
                .await?;
        Ok(periods)
    }

    async fn add_payslips(&self, slips: Vec<Payslip>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for slip in slips {
            let items = serde_json::to_string(&slip.items)
                .map_err(|e| StoreError::Corrupt(format!("payslip {} items: {e}", slip.id)))?;
            sqlx::query(
                "INSERT INTO payslips (id, employee_id, employee_name, period, gross_salary, \
                 total_deductions, net_salary, items) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&slip.id)
            .bind(&slip.employee_id)
            .bind(&slip.employee_name)
            .bind(&slip.period)
            .bind(slip.gross_salary)
            .bind(slip.total_deductions)
            .bind(slip.net_salary)
            .bind(items)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_payroll_components(&self) -> Result<Vec<PayrollComponent>, StoreError> {
        let rows = sqlx::query_as::<_, PayrollComponent>(
            "SELECT id, name, type FROM payroll_components ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_payroll_component(
        &self,
        component: PayrollComponent,
    ) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO payroll_components (id, name, type) VALUES (?, ?, ?)")
            .bind(&component.id)
            .bind(&component.name)
            .bind(component.kind)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_payroll_component(
        &self,
        component: PayrollComponent,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE payroll_components SET name = ?, type = ? WHERE id = ?")
            .bind(&component.name)
            .bind(component.kind)
            .bind(&component.id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn delete_payroll_component(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM payroll_components WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn list_salary_components(&self) -> Result<Vec<EmployeeSalaryComponent>, StoreError> {
        let rows = sqlx::query_as::<_, EmployeeSalaryComponent>(
            "SELECT employee_id, component_id, amount FROM employee_salary_components \
             ORDER BY employee_id, component_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn salary_components_for(
        &self,
        employee_id: &str,
    ) -> Result<Vec<EmployeeSalaryComponent>, StoreError> {
        let rows = sqlx::query_as::<_, EmployeeSalaryComponent>(
            "SELECT employee_id, component_id, amount FROM employee_salary_components \
             WHERE employee_id = ? ORDER BY component_id",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn replace_salary_components(
        &self,
        employee_id: &str,
        rows: Vec<EmployeeSalaryComponent>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM employee_salary_components WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
        for row in rows {
            sqlx::query(
                "INSERT INTO employee_salary_components (employee_id, component_id, amount) \
                 VALUES (?, ?, ?)",
            )
            .bind(&row.employee_id)
            .bind(&row.component_id)
            .bind(row.amount)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_kpis(&self) -> Result<Vec<Kpi>, StoreError> {
        let rows = sqlx::query_as::<_, Kpi>(
            "SELECT id, employee_id, employee_name, title, target, actual, progress, period, \
             status FROM kpis ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_kpi(&self, kpi: Kpi) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kpis (id, employee_id, employee_name, title, target, actual, progress, \
             period, status) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&kpi.id)
        .bind(&kpi.employee_id)
        .bind(&kpi.employee_name)
        .bind(&kpi.title)
        .bind(&kpi.target)
        .bind(&kpi.actual)
        .bind(kpi.progress)
        .bind(&kpi.period)
        .bind(kpi.status)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_kpi(&self, kpi: Kpi) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE kpis SET employee_id = ?, employee_name = ?, title = ?, target = ?, \
             actual = ?, progress = ?, period = ?, status = ? WHERE id = ?",
        )
        .bind(&kpi.employee_id)
        .bind(&kpi.employee_name)
        .bind(&kpi.title)
        .bind(&kpi.target)
        .bind(&kpi.actual)
        .bind(kpi.progress)
        .bind(&kpi.period)
        .bind(kpi.status)
        .bind(&kpi.id)
        .execute(&self.pool)
        .await?;
        affected_or_not_found(result)
    }

    async fn delete_kpi(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM kpis WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn list_positions(&self) -> Result<Vec<Position>, StoreError> {
        let rows = sqlx::query_as::<_, Position>(
            "SELECT id, name, description FROM positions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_position(&self, position: Position) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO positions (id, name, description) VALUES (?, ?, ?)")
            .bind(&position.id)
            .bind(&position.name)
            .bind(&position.description)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_position(&self, position: Position) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE positions SET name = ?, description = ? WHERE id = ?")
            .bind(&position.name)
            .bind(&position.description)
            .bind(&position.id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn delete_position(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM positions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn list_units(&self) -> Result<Vec<Unit>, StoreError> {
        let rows =
            sqlx::query_as::<_, Unit>("SELECT id, name, category FROM units ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    async fn create_unit(&self, unit: Unit) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO units (id, name, category) VALUES (?, ?, ?)")
            .bind(&unit.id)
            .bind(&unit.name)
            .bind(&unit.category)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_unit(&self, unit: Unit) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE units SET name = ?, category = ? WHERE id = ?")
            .bind(&unit.name)
            .bind(&unit.category)
            .bind(&unit.id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn delete_unit(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM units WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn list_leave_types(&self) -> Result<Vec<LeaveType>, StoreError> {
        let rows = sqlx::query_as::<_, LeaveType>(
            "SELECT id, name, default_days FROM leave_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_leave_type(&self, leave_type: LeaveType) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO leave_types (id, name, default_days) VALUES (?, ?, ?)")
            .bind(&leave_type.id)
            .bind(&leave_type.name)
            .bind(leave_type.default_days)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_leave_type(&self, leave_type: LeaveType) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE leave_types SET name = ?, default_days = ? WHERE id = ?")
            .bind(&leave_type.name)
            .bind(leave_type.default_days)
            .bind(&leave_type.id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn delete_leave_type(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM leave_types WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn list_partner_banks(&self) -> Result<Vec<PartnerBank>, StoreError> {
        let rows = sqlx::query_as::<_, PartnerBank>(
            "SELECT id, name, code FROM partner_banks ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_partner_bank(&self, bank: PartnerBank) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO partner_banks (id, name, code) VALUES (?, ?, ?)")
            .bind(&bank.id)
            .bind(&bank.name)
            .bind(&bank.code)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_partner_bank(&self, bank: PartnerBank) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE partner_banks SET name = ?, code = ? WHERE id = ?")
            .bind(&bank.name)
            .bind(&bank.code)
            .bind(&bank.id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn delete_partner_bank(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM partner_banks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected_or_not_found(result)
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, User>(
            "SELECT email, name, whatsapp_number, avatar_url, role, password_hash FROM users \
             WHERE LOWER(email) = LOWER(?)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_user(&self, user: User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (email, name, whatsapp_number, avatar_url, role, password_hash) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(email) DO UPDATE SET name = excluded.name, \
             whatsapp_number = excluded.whatsapp_number, avatar_url = excluded.avatar_url, \
             role = excluded.role, password_hash = excluded.password_hash",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.whatsapp_number)
        .bind(&user.avatar_url)
        .bind(user.role)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for table in [
            "employees",
            "position_history",
            "leave_requests",
            "attendance",
            "payslips",
            "payroll_components",
            "employee_salary_components",
            "kpis",
            "positions",
            "units",
            "leave_types",
            "partner_banks",
            "users",
        ] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;
    use crate::model::leave::LeaveStatus;
    use crate::model::payroll::ComponentType;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_store() -> SqliteStore {
        // A pool with one connection, otherwise every connection gets
        // its own empty :memory: database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    #[actix_web::test]
    async fn payslip_items_survive_the_text_column() {
        let store = test_store().await;
        let slip = Payslip {
            id: "PS-E001-1".into(),
            employee_id: "E001".into(),
            employee_name: "Dr. Ahmad Dahlan".into(),
            period: "Oktober 2023".into(),
            gross_salary: 6_500_000,
            total_deductions: 200_000,
            net_salary: 6_300_000,
            items: vec![
                PayItem {
                    name: "Gaji Pokok".into(),
                    kind: ComponentType::Earning,
                    amount: 5_000_000,
                },
                PayItem {
                    name: "BPJS".into(),
                    kind: ComponentType::Deduction,
                    amount: 200_000,
                },
            ],
        };
        store.add_payslips(vec![slip.clone()]).await.unwrap();

        let loaded = store.list_payslips(Some("Oktober 2023")).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].items.len(), 2);
        assert_eq!(loaded[0].items[0].name, "Gaji Pokok");
        assert_eq!(loaded[0].net_salary, 6_300_000);

        assert!(store.list_payslips(Some("November 2023")).await.unwrap().is_empty());
        assert_eq!(store.payroll_periods().await.unwrap(), vec!["Oktober 2023"]);
    }

    #[actix_web::test]
    async fn leave_request_status_stored_as_text() {
        let store = test_store().await;
        let request = LeaveRequest {
            id: "L001".into(),
            employee_id: "E001".into(),
            employee_name: "Dr. Ahmad Dahlan".into(),
            leave_type: "Cuti Tahunan".into(),
            start_date: NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 11, 3).unwrap(),
            reason: "Acara keluarga".into(),
            status: LeaveStatus::Pending,
            approver: None,
            document_name: None,
            document_url: None,
        };
        store.create_leave_request(request.clone()).await.unwrap();

        let mut loaded = store.find_leave_request("L001").await.unwrap().unwrap();
        assert_eq!(loaded.status, LeaveStatus::Pending);
        assert!(loaded.approver.is_none());

        loaded.status = LeaveStatus::Approved;
        loaded.approver = Some("Budi Santoso, S.Kom.".into());
        store.update_leave_request(loaded).await.unwrap();

        let reloaded = store.find_leave_request("L001").await.unwrap().unwrap();
        assert_eq!(reloaded.status, LeaveStatus::Approved);
        assert_eq!(reloaded.approver.as_deref(), Some("Budi Santoso, S.Kom."));
    }

    #[actix_web::test]
    async fn attendance_filters_by_date_and_employee() {
        let store = test_store().await;
        let record = |id: &str, employee_id: &str, date: NaiveDate| AttendanceRecord {
            id: id.into(),
            employee_id: employee_id.into(),
            employee_name: "Pegawai".into(),
            date,
            clock_in: "08:00".into(),
            clock_out: "16:00".into(),
            status: AttendanceStatus::OnTime,
            shift: "Regular".into(),
        };
        let d1 = NaiveDate::from_ymd_opt(2023, 10, 26).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2023, 10, 27).unwrap();
        store
            .add_attendance(vec![
                record("A001", "E001", d1),
                record("A002", "E002", d1),
                record("A003", "E001", d2),
            ])
            .await
            .unwrap();

        assert_eq!(store.list_attendance(Some(d1), None).await.unwrap().len(), 2);
        assert_eq!(
            store.list_attendance(None, Some("E001")).await.unwrap().len(),
            2
        );
        let both = store.list_attendance(Some(d2), Some("E001")).await.unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, "A003");
        assert_eq!(both[0].status, AttendanceStatus::OnTime);
    }

    #[actix_web::test]
    async fn settings_upsert_overwrites() {
        let store = test_store().await;
        store.put_setting("waha", r#"{"enabled":false}"#).await.unwrap();
        store.put_setting("waha", r#"{"enabled":true}"#).await.unwrap();
        assert_eq!(
            store.get_setting("waha").await.unwrap().as_deref(),
            Some(r#"{"enabled":true}"#)
        );
        assert!(store.get_setting("d1").await.unwrap().is_none());
    }
}
