use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::contact)]
#[diesel(check_for_backend(Pg))]
pub struct ContactRow {
    pub id: uuid::Uuid,
    pub first_name: String,
    pub last_name: String,
    pub company_id: Option<uuid::Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::company)]
#[diesel(check_for_backend(Pg))]
pub struct CompanyRow {
    pub id: uuid::Uuid,
    pub name: String,
}
