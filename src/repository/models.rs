//! Diesel ORM models for database tables.

use diesel::prelude::*;

use crate::schema;

/// Analysis log record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::analysis_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AnalysisLogRecord {
    pub id: i32,
    pub request_text: String,
    pub response_text: String,
    pub timestamp: String,
}

/// New analysis log row for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::analysis_logs)]
pub struct NewAnalysisLog<'a> {
    pub request_text: &'a str,
    pub response_text: &'a str,
    pub timestamp: &'a str,
}
