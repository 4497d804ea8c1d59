//! Alias validation for the edit dialog.
//!
//! This lives outside the store on purpose: the store writes whatever
//! alias it is handed, and the UI runs these checks before calling it.

use thiserror::Error;

/// Minimum alias length after trimming
pub const MIN_ALIAS_LEN: usize = 3;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasError {
    #[error("An alias is required")]
    Required,

    #[error("Aliases need at least {MIN_ALIAS_LEN} characters")]
    TooShort,

    #[error("Only letters, numbers and spaces are allowed")]
    InvalidChars,

    #[error("Another favorite already uses that alias")]
    Taken,
}

/// Validate a candidate alias against the entry's current alias and the
/// aliases of every favorite (the entry's own may be included; it is
/// excluded from the collision check).
///
/// Uniqueness compares trimmed, case-folded values, so "  Buddy " collides
/// with "buddy". Re-submitting the current alias is always fine.
pub fn validate_alias(
    candidate: &str,
    current_alias: &str,
    existing_aliases: &[String],
) -> Result<(), AliasError> {
    let trimmed = candidate.trim();

    if trimmed.is_empty() {
        return Err(AliasError::Required);
    }

    if trimmed.chars().count() < MIN_ALIAS_LEN {
        return Err(AliasError::TooShort);
    }

    if !trimmed.chars().all(allowed_char) {
        return Err(AliasError::InvalidChars);
    }

    let normalized = normalize(candidate);
    let normalized_current = normalize(current_alias);

    if normalized == normalized_current {
        return Ok(());
    }

    let collides = existing_aliases
        .iter()
        .map(|alias| normalize(alias))
        .filter(|alias| !alias.is_empty() && *alias != normalized_current)
        .any(|alias| alias == normalized);

    if collides {
        return Err(AliasError::Taken);
    }

    Ok(())
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

// Letters (including the Spanish accented vowels and enie), digits, spaces
fn allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || "ÁÉÍÓÚáéíóúÑñ".contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn accepts_a_fresh_unique_alias() {
        let existing = aliases(&["pikachu", "bulbasaur"]);
        assert_eq!(validate_alias("Buddy", "pikachu", &existing), Ok(()));
    }

    #[test]
    fn accepts_resubmitting_the_current_alias() {
        let existing = aliases(&["pikachu", "bulbasaur"]);
        assert_eq!(validate_alias("pikachu", "pikachu", &existing), Ok(()));
        // also when cased or padded differently
        assert_eq!(validate_alias("  PIKACHU ", "pikachu", &existing), Ok(()));
    }

    #[test]
    fn rejects_a_collision_with_another_alias() {
        let existing = aliases(&["pikachu", "Buddy"]);
        assert_eq!(
            validate_alias("buddy", "pikachu", &existing),
            Err(AliasError::Taken)
        );
        assert_eq!(
            validate_alias(" BUDDY  ", "pikachu", &existing),
            Err(AliasError::Taken)
        );
    }

    #[test]
    fn blank_input_fails_required_not_uniqueness() {
        let existing = aliases(&["pikachu"]);
        assert_eq!(
            validate_alias("   ", "pikachu", &existing),
            Err(AliasError::Required)
        );
    }

    #[test]
    fn short_aliases_are_rejected() {
        assert_eq!(
            validate_alias("ab", "pikachu", &[]),
            Err(AliasError::TooShort)
        );
        assert_eq!(validate_alias(" ab ", "pikachu", &[]), Err(AliasError::TooShort));
    }

    #[test]
    fn punctuation_is_rejected() {
        assert_eq!(
            validate_alias("pika!", "pikachu", &[]),
            Err(AliasError::InvalidChars)
        );
        assert_eq!(
            validate_alias("pika_chu", "pikachu", &[]),
            Err(AliasError::InvalidChars)
        );
    }

    #[test]
    fn accented_letters_are_fine() {
        assert_eq!(validate_alias("Ñoño", "pikachu", &[]), Ok(()));
        assert_eq!(validate_alias("Canción 1", "pikachu", &[]), Ok(()));
    }
}
