use crate::domain::errors::DomainError;

// Extended SQLite result codes.
const SQLITE_CONSTRAINT_CHECK: &str = "275";
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

const IDX_TITLE_LANGUAGE: &str = "article_titles.article_id, article_titles.language";
const IDX_PLACEHOLDER_SLOT: &str = "placeholders.article_id, placeholders.slot";
const IDX_ATTRIBUTE_NAME: &str = "attributes.name";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY => {
                        return DomainError::Conflict(unique_message(message));
                    }
                    SQLITE_CONSTRAINT_FOREIGNKEY => {
                        return DomainError::Integrity(format!(
                            "foreign key violation: {message}"
                        ));
                    }
                    SQLITE_CONSTRAINT_CHECK => {
                        return DomainError::Validation(format!(
                            "check constraint violated: {message}"
                        ));
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(message.to_string())
        }
        sqlx::Error::RowNotFound => DomainError::NotFound("row not found".into()),
        _ => DomainError::Persistence(err.to_string()),
    }
}

fn unique_message(message: &str) -> String {
    if message.contains(IDX_TITLE_LANGUAGE) {
        "a title for this language already exists".into()
    } else if message.contains(IDX_PLACEHOLDER_SLOT) {
        "placeholder slot already exists".into()
    } else if message.contains(IDX_ATTRIBUTE_NAME) {
        "attribute name already exists".into()
    } else {
        format!("unique constraint violated: {message}")
    }
}
