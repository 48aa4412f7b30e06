use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account roles, serialized with the labels the frontend displays.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
pub enum Role {
    Superadmin,
    #[serde(rename = "Admin HR")]
    #[sqlx(rename = "Admin HR")]
    #[strum(serialize = "Admin HR")]
    AdminSdm,
    #[serde(rename = "Admin Keuangan")]
    #[sqlx(rename = "Admin Keuangan")]
    #[strum(serialize = "Admin Keuangan")]
    AdminKeuangan,
    Pegawai,
}

/// Feature areas a role may touch. `PayrollInfo` is read access to the
/// caller's own payslips, as opposed to full `Payroll` management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Dashboard,
    Employees,
    Attendance,
    Leave,
    Payroll,
    PayrollInfo,
    Performance,
    Reports,
    Settings,
    MyProfile,
}

static ROLE_CAPABILITIES: Lazy<HashMap<Role, Vec<Capability>>> = Lazy::new(|| {
    use Capability::*;
    HashMap::from([
        (
            Role::Superadmin,
            vec![
                Dashboard, Employees, Attendance, Leave, Payroll, Performance, Reports, Settings,
            ],
        ),
        (
            Role::AdminSdm,
            vec![Dashboard, Employees, Attendance, Leave, Performance, Reports],
        ),
        (Role::AdminKeuangan, vec![Dashboard, Payroll, Reports]),
        (Role::Pegawai, vec![Dashboard, MyProfile, PayrollInfo, Leave]),
    ])
});

impl Role {
    pub fn can(&self, capability: Capability) -> bool {
        ROLE_CAPABILITIES
            .get(self)
            .is_some_and(|caps| caps.contains(&capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superadmin_holds_settings_but_not_my_profile() {
        assert!(Role::Superadmin.can(Capability::Settings));
        assert!(Role::Superadmin.can(Capability::Payroll));
        assert!(!Role::Superadmin.can(Capability::MyProfile));
    }

    #[test]
    fn finance_admin_cannot_touch_employees() {
        assert!(Role::AdminKeuangan.can(Capability::Payroll));
        assert!(Role::AdminKeuangan.can(Capability::Reports));
        assert!(!Role::AdminKeuangan.can(Capability::Employees));
        assert!(!Role::AdminKeuangan.can(Capability::Settings));
    }

    #[test]
    fn staff_can_request_leave_but_not_manage_payroll() {
        assert!(Role::Pegawai.can(Capability::Leave));
        assert!(Role::Pegawai.can(Capability::PayrollInfo));
        assert!(!Role::Pegawai.can(Capability::Payroll));
        assert!(!Role::Pegawai.can(Capability::Attendance));
    }

    #[test]
    fn role_labels_round_trip_through_serde() {
        let json = serde_json::to_string(&Role::AdminSdm).unwrap();
        assert_eq!(json, "\"Admin HR\"");
        let back: Role = serde_json::from_str("\"Admin Keuangan\"").unwrap();
        assert_eq!(back, Role::AdminKeuangan);
    }
}
