use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::error::ApiError;
use crate::model::role::{Capability, Role};
use crate::models::Claims;

/// Identity decoded by the auth middleware. Handlers take this as an
/// extractor; it is only present on requests that passed the bearer
/// check.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl AuthUser {
    pub fn from_claims(claims: &Claims) -> Self {
        AuthUser {
            email: claims.sub.clone(),
            name: claims.name.clone(),
            role: claims.role,
        }
    }

    pub fn require(&self, capability: Capability) -> Result<(), ApiError> {
        if self.role.can(capability) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Akses ditolak."))
        }
    }

    pub fn is_staff_account(&self) -> bool {
        self.role == Role::Pegawai
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthUser>().cloned();
        ready(user.ok_or_else(|| {
            ApiError::Unauthorized("Token tidak valid atau kedaluwarsa.".into())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_cannot_reach_payroll() {
        let user = AuthUser {
            email: "ahmad.d@unugha.ac.id".into(),
            name: "Ahmad Dahlan".into(),
            role: Role::Pegawai,
        };
        assert!(user.require(Capability::Payroll).is_err());
        assert!(user.require(Capability::PayrollInfo).is_ok());
    }

    #[test]
    fn finance_admin_reaches_payroll_but_not_employees() {
        let user = AuthUser {
            email: "dewi.l@unugha.ac.id".into(),
            name: "Dewi Lestari".into(),
            role: Role::AdminKeuangan,
        };
        assert!(user.require(Capability::Payroll).is_ok());
        assert!(user.require(Capability::Employees).is_err());
    }
}
