use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Event {0} not found")]
    EventNotFound(Uuid),

    #[error("Database error: {0}")]
    Db(#[from] database::DbError),
}
