use tokio_postgres::Row;

/// A row of the `notes` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i32,
    pub created_at: String,
    pub content: String,
    pub status: String,
}

// The table is owned by the store, so a NULL column is an error rather
// than a panic.
impl TryFrom<&Row> for Note {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            content: row.try_get("content")?,
            status: row.try_get("status")?,
        })
    }
}
