// ABOUTME: Identifier derivation for applications and enrolled students
// ABOUTME: Roll numbers, application numbers and system-assigned record ids

/// Uppercase alphanumeric alphabet for human-readable tokens.
const TOKEN_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// System-assigned id for an admission application.
pub fn application_id() -> String {
    format!("app-{}", nanoid::nanoid!())
}

/// System-assigned id for an enrolled student.
pub fn student_id() -> String {
    format!("stu-{}", nanoid::nanoid!())
}

/// Client-visible id for a seeded placeholder document.
pub fn document_id() -> String {
    format!("doc-{}", nanoid::nanoid!(10))
}

/// Human-readable application number, e.g. `ADM-2026-7K2QX9`.
///
/// The random token keeps numbers unguessable; uniqueness is guaranteed by
/// the storage layer's unique index with insert retry, not by this function.
pub fn application_number(year: &str) -> String {
    format!("ADM-{}-{}", year, nanoid::nanoid!(6, &TOKEN_ALPHABET))
}

/// Roll number for the `sequence`-th student enrolled in a class for an
/// academic year: year, two-character class code, three-digit sequence.
///
/// The caller reads the sequence inside the enrolling transaction; a unique
/// index on (class, academic_year, roll_number) backs collisions under
/// concurrency.
pub fn roll_number(class: &str, academic_year: &str, sequence: i64) -> String {
    format!("{}{}{:03}", academic_year, class_code(class), sequence)
}

/// Normalizes a class label into a fixed-width code: numeric classes are
/// zero-padded to two digits, anything else keeps its alphanumerics
/// uppercased.
fn class_code(class: &str) -> String {
    let cleaned: String = class
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase();

    match cleaned.parse::<u32>() {
        Ok(n) => format!("{:02}", n),
        Err(_) => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roll_number_pads_class_and_sequence() {
        assert_eq!(roll_number("3", "2026", 1), "202603001");
        assert_eq!(roll_number("10", "2026", 42), "202610042");
    }

    #[test]
    fn roll_number_keeps_alphanumeric_class_codes() {
        assert_eq!(roll_number("LKG", "2026", 7), "2026LKG007");
    }

    #[test]
    fn application_number_carries_year_prefix() {
        let number = application_number("2026");
        assert!(number.starts_with("ADM-2026-"));
        assert_eq!(number.len(), "ADM-2026-".len() + 6);
    }

    #[test]
    fn application_numbers_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(application_number("2026")));
        }
    }

    #[test]
    fn record_ids_carry_prefixes() {
        assert!(application_id().starts_with("app-"));
        assert!(student_id().starts_with("stu-"));
        assert!(document_id().starts_with("doc-"));
    }
}
