use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use jiff_diesel::DateTime;
use serde::{Deserialize, Serialize};

/// Whether an offering books single-provider time slots or capacity-based
/// class sessions. Both variants share the same claim engine; the kind only
/// drives which creation flow and which reservation flow apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema, DbEnum)]
#[db_enum(existing_type_path = "crate::schema::sql_types::OfferingKind")]
#[serde(rename_all = "lowercase")]
pub enum OfferingKind {
    Service,
    Course,
}

impl std::fmt::Display for OfferingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferingKind::Service => write!(f, "service"),
            OfferingKind::Course => write!(f, "course"),
        }
    }
}

/// A bookable offering (service or course).
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::offerings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Offering {
    pub id: i32,
    pub kind: OfferingKind,
    pub title: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub category: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::offerings)]
pub struct NewOffering {
    pub kind: OfferingKind,
    pub title: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub category: Option<String>,
}

#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::offerings)]
pub struct UpdateOffering {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub category: Option<String>,
}

/// A named add-on with its own price, attachable to an offering.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::offering_options)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OfferingOption {
    pub id: i32,
    pub offering_id: i32,
    pub name: String,
    pub price: BigDecimal,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::offering_options)]
pub struct NewOfferingOption {
    pub offering_id: i32,
    pub name: String,
    pub price: BigDecimal,
}

#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::offering_options)]
pub struct UpdateOfferingOption {
    pub name: Option<String>,
    pub price: Option<BigDecimal>,
}
