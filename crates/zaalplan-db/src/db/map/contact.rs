use zaalplan_core::model::{Company, Contact};

use crate::model::contact::{CompanyRow, ContactRow};

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            company_id: row.company_id,
        }
    }
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}
