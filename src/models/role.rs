use diesel::prelude::*;
use jiff_diesel::DateTime;

/// A named role (`admin`, `staff`, `customer`), seeded by migration.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Role {
    pub id: i32,
    pub name: String,
}

/// A role grant. Temporary grants carry `is_temporary = true` and are
/// revoked by the sweep job once `assigned_at` falls outside the grace
/// window.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::user_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRole {
    pub id: i32,
    pub user_id: i32,
    pub role_id: i32,
    pub is_temporary: bool,
    pub assigned_at: DateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::user_roles)]
pub struct NewUserRole {
    pub user_id: i32,
    pub role_id: i32,
    pub is_temporary: bool,
    pub assigned_at: DateTime,
}
