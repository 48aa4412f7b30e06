use uuid::Uuid;

pub mod attendance;
pub mod employee;
pub mod kpi;
pub mod leave;
pub mod master;
pub mod payroll;
pub mod reports;
pub mod settings;
pub mod storage;

/// Generates a collection-local identifier such as `E3f9c...` or `PH-b01d...`.
/// Seeded fixtures use short hand-written ids; everything created at runtime
/// gets a uuid suffix so ids never collide across restarts.
pub(crate) fn fresh_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_id_keeps_prefix() {
        let id = fresh_id("PH-");
        assert!(id.starts_with("PH-"));
        assert_eq!(id.len(), "PH-".len() + 32);
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = fresh_id("E");
        let b = fresh_id("E");
        assert_ne!(a, b);
    }
}
