// src/common/db_utils.rs

use crate::common::error::AppError;

// ---
// Helpers de tradução de erros do Postgres
// ---

/// Converte violações de chave única (23505) e de chave estrangeira (23503)
/// em erros de domínio. `unique` recebe o nome da constraint violada e devolve
/// a mensagem de conflito; o resto vira `AppError::Database`.
pub(crate) fn map_write_error<F>(e: sqlx::Error, unique: F) -> AppError
where
    F: FnOnce(&str) -> String,
{
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            return AppError::Conflict(unique(constraint));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::Conflict(format!(
                "Referenced record is missing or still in use ({}).",
                db_err.constraint().unwrap_or("foreign key")
            ));
        }
    }
    e.into()
}

/// Mensagem padrão para as constraints únicas conhecidas do schema.
pub(crate) fn unique_message(constraint: &str) -> String {
    match constraint {
        "users_email_key" | "students_email_key" => "This email is already registered.".into(),
        "staff_phone_key" => "This phone number is already registered.".into(),
        "franchises_user_id_key" => "This account already owns a franchise.".into(),
        "staff_user_id_key" => "This account is already linked to a staff member.".into(),
        other => format!("Duplicate value violates '{}'.", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_constraints_have_friendly_messages() {
        assert_eq!(unique_message("users_email_key"), "This email is already registered.");
        assert_eq!(unique_message("staff_phone_key"), "This phone number is already registered.");
        assert!(unique_message("other_key").contains("other_key"));
    }

    #[test]
    fn non_database_errors_pass_through() {
        let err = map_write_error(sqlx::Error::RowNotFound, unique_message);
        assert!(matches!(err, AppError::Database(sqlx::Error::RowNotFound)));
    }
}
