use crate::auth::error::AuthError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Caller identity placed in request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AuthError::MissingHeader.into())),
        }
    }
}

impl AuthUser {
    pub fn require_supervisor_or_admin(&self) -> Result<(), AuthError> {
        if matches!(self.role, Role::Admin | Role::Supervisor) {
            Ok(())
        } else {
            Err(AuthError::Forbidden("Supervisor/Admin only"))
        }
    }

    /// Staff may only look at their own records.
    pub fn require_access_to(&self, employee_id: u64) -> Result<(), AuthError> {
        if self.require_supervisor_or_admin().is_ok() || self.employee_id == Some(employee_id) {
            Ok(())
        } else {
            Err(AuthError::Forbidden("Not allowed to view another employee"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, employee_id: Option<u64>) -> AuthUser {
        AuthUser {
            user_id: 1,
            username: "tester".into(),
            role,
            employee_id,
        }
    }

    #[test]
    fn staff_sees_only_own_records() {
        let staff = user(Role::Staff, Some(7));
        assert!(staff.require_access_to(7).is_ok());
        assert!(staff.require_access_to(8).is_err());
        assert!(staff.require_supervisor_or_admin().is_err());
    }

    #[test]
    fn supervisors_see_everyone() {
        let supervisor = user(Role::Supervisor, None);
        assert!(supervisor.require_access_to(8).is_ok());
        assert!(supervisor.require_supervisor_or_admin().is_ok());
        assert!(user(Role::Admin, None).require_supervisor_or_admin().is_ok());
    }
}
