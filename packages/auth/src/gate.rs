// ABOUTME: Static role/module/level permission table consulted on every protected route
// ABOUTME: Total and side-effect free; unlisted combinations resolve to false

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Principal,
    Teacher,
    Accountant,
    Staff,
    Parent,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Principal,
        Role::Teacher,
        Role::Accountant,
        Role::Staff,
        Role::Parent,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Dashboard,
    Admissions,
    Students,
    Attendance,
    Fees,
    Payroll,
    Timetable,
    Homework,
    Results,
    Reports,
    Documents,
    Calendar,
}

impl Module {
    pub const ALL: [Module; 12] = [
        Module::Dashboard,
        Module::Admissions,
        Module::Students,
        Module::Attendance,
        Module::Fees,
        Module::Payroll,
        Module::Timetable,
        Module::Homework,
        Module::Results,
        Module::Reports,
        Module::Documents,
        Module::Calendar,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Read,
    Write,
    Admin,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 3] = [AccessLevel::Read, AccessLevel::Write, AccessLevel::Admin];
}

/// Whether `role` holds `level` access on `module`.
///
/// Pure lookup over the static table below; every combination resolves to
/// a boolean and anything not granted is denied.
pub fn has_module_access(role: Role, module: Module, level: AccessLevel) -> bool {
    use AccessLevel::*;
    use Module::*;
    use Role::*;

    match role {
        Role::Admin => true,
        Principal => match level {
            Read | Write => true,
            AccessLevel::Admin => matches!(module, Admissions | Students | Reports),
        },
        Teacher => match level {
            Read => matches!(
                module,
                Dashboard
                    | Students
                    | Attendance
                    | Timetable
                    | Homework
                    | Results
                    | Documents
                    | Calendar
            ),
            Write => matches!(module, Attendance | Homework | Results),
            AccessLevel::Admin => false,
        },
        Accountant => match level {
            Read => matches!(module, Dashboard | Fees | Payroll | Reports),
            Write => matches!(module, Fees | Payroll),
            AccessLevel::Admin => false,
        },
        Staff => match level {
            Read => matches!(
                module,
                Dashboard | Admissions | Students | Documents | Calendar
            ),
            Write => matches!(module, Admissions | Documents),
            AccessLevel::Admin => false,
        },
        Parent => match level {
            Read => matches!(
                module,
                Dashboard | Timetable | Homework | Results | Fees | Calendar
            ),
            Write | AccessLevel::Admin => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_total_over_all_combinations() {
        for role in Role::ALL {
            for module in Module::ALL {
                for level in AccessLevel::ALL {
                    // Must resolve without panicking for every combination.
                    let _ = has_module_access(role, module, level);
                }
            }
        }
    }

    #[test]
    fn admin_has_full_access() {
        for module in Module::ALL {
            for level in AccessLevel::ALL {
                assert!(has_module_access(Role::Admin, module, level));
            }
        }
    }

    #[test]
    fn write_implies_read_for_every_role() {
        for role in Role::ALL {
            for module in Module::ALL {
                if has_module_access(role, module, AccessLevel::Write) {
                    assert!(
                        has_module_access(role, module, AccessLevel::Read),
                        "{role:?} can write {module:?} but not read it"
                    );
                }
            }
        }
    }

    #[test]
    fn staff_process_admissions_but_teachers_do_not() {
        assert!(has_module_access(
            Role::Staff,
            Module::Admissions,
            AccessLevel::Write
        ));
        assert!(!has_module_access(
            Role::Teacher,
            Module::Admissions,
            AccessLevel::Read
        ));
    }

    #[test]
    fn parents_never_write() {
        for module in Module::ALL {
            assert!(!has_module_access(Role::Parent, module, AccessLevel::Write));
            assert!(!has_module_access(Role::Parent, module, AccessLevel::Admin));
        }
    }
}
