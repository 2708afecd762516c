//! Access control engine
//!
//! Decides which student records a requester may see or touch. The rules
//! form a small closed decision table over (requester role, requester
//! college, target class status, target owner's college):
//!
//! 1. no requester                  -> deny
//! 2. requester id == owner id      -> allow (self-access, checked first)
//! 3. ADMIN @ GRADUATE_SCHOOL       -> allow any MASTERS/PHD target,
//!                                     or any target owned by its college
//! 4. ADMIN @ other college         -> allow targets owned by that college
//! 5. STUDENT, not self             -> deny
//!
//! Self-access deliberately precedes the role branch: a student reaching
//! their own record never depends on college or class status.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{ClassStatus, College, Role, StudentProfile, User};
use crate::ports::BillingStore;

use super::session::Session;

/// Pure access decision, no session or store dependency
pub fn can_access(requester: Option<&User>, target: &StudentProfile) -> bool {
    let Some(requester) = requester else {
        return false;
    };

    if requester.id == target.user.id {
        return true;
    }

    match requester.role {
        Role::Admin => {
            (requester.college == College::GraduateSchool && target.class_status.is_graduate())
                || requester.college == target.user.college
        }
        Role::Student => false,
    }
}

/// Session-aware access operations
pub struct AccessService {
    store: Arc<dyn BillingStore>,
}

impl AccessService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    /// Ids of every student visible to the logged-in admin
    ///
    /// A graduate-school admin sees all masters and PhD students
    /// system-wide; any other admin sees the students of their own college.
    /// The result carries no duplicates (first-seen order).
    pub fn visible_student_ids(&self, session: &Session) -> Result<Vec<String>> {
        let id = session.current_id().ok_or(Error::NoActiveSession)?;
        let user = self
            .store
            .find_user(id)?
            .ok_or_else(|| Error::UserNotFound(id.to_string()))?;

        if user.role != Role::Admin {
            return Err(Error::permission_denied(format!(
                "user {} has no administration role",
                user.id
            )));
        }

        let profiles = if user.college == College::GraduateSchool {
            self.store
                .profiles_by_class_status(ClassStatus::graduate_statuses())?
        } else {
            self.store.profiles_by_college(user.college)?
        };

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for profile in profiles {
            if seen.insert(profile.user.id.clone()) {
                ids.push(profile.user.id);
            }
        }
        Ok(ids)
    }

    /// Direct user lookup, no access check
    ///
    /// Callers are responsible for gating any record exposure built on the
    /// result with `can_access`.
    pub fn by_user_id(&self, id: &str) -> Result<Option<User>> {
        self.store.find_user(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClassStatus, College, Role, StudentProfile, User};

    fn student(id: &str, college: College, status: ClassStatus) -> StudentProfile {
        StudentProfile::new(User::new(id, Role::Student, college), status)
    }

    #[test]
    fn test_absent_requester_denied() {
        let target = student("s1", College::Engineering, ClassStatus::Junior);
        assert!(!can_access(None, &target));
    }

    #[test]
    fn test_self_access_always_allowed() {
        // Self-access wins before any role/college consideration
        let target = student("s1", College::Engineering, ClassStatus::Junior);
        assert!(can_access(Some(&target.user), &target));

        // Even an admin reaching their own hypothetical record goes through
        // the self branch, regardless of college mismatch
        let odd_admin = User::new("s1", Role::Admin, College::Business);
        assert!(can_access(Some(&odd_admin), &target));
    }

    #[test]
    fn test_student_cannot_reach_others() {
        let requester = User::new("s1", Role::Student, College::Engineering);
        let target = student("s2", College::Engineering, ClassStatus::Junior);
        assert!(!can_access(Some(&requester), &target));
    }

    #[test]
    fn test_admin_scoped_to_own_college() {
        let admin = User::new("a1", Role::Admin, College::Engineering);
        let same = student("s1", College::Engineering, ClassStatus::Senior);
        let other = student("s2", College::Business, ClassStatus::Senior);

        assert!(can_access(Some(&admin), &same));
        assert!(!can_access(Some(&admin), &other));
    }

    #[test]
    fn test_graduate_admin_reaches_graduate_students_anywhere() {
        let admin = User::new("g1", Role::Admin, College::GraduateSchool);
        let masters = student("s1", College::Engineering, ClassStatus::Masters);
        let phd = student("s2", College::Business, ClassStatus::Phd);
        let undergrad = student("s3", College::Engineering, ClassStatus::Junior);

        assert!(can_access(Some(&admin), &masters));
        assert!(can_access(Some(&admin), &phd));
        assert!(!can_access(Some(&admin), &undergrad));
    }

    #[test]
    fn test_graduate_admin_college_branch_still_applies() {
        // An undergraduate whose owning user sits in the graduate school
        // falls under the college-equality branch
        let admin = User::new("g1", Role::Admin, College::GraduateSchool);
        let target = student("s1", College::GraduateSchool, ClassStatus::Senior);
        assert!(can_access(Some(&admin), &target));
    }
}
