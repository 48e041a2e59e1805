use chrono::NaiveDateTime;
use diesel::prelude::*;

/// One stored document row. The payload is the serialized document JSON.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentDB {
    pub document_key: String,
    pub payload: String,
    pub updated_at: NaiveDateTime,
}
