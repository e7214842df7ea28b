/// Tests for Peruvian identity document validation
///
/// RUC: 11 digits. DNI: 8 digits. Passport: 6-12 of [A-Z0-9].
/// Foreigner id: 5-20 characters.

use negocio::modules::customers::models::{validate_document, DocumentType};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_any_eleven_digits_is_a_valid_ruc(ruc in "[0-9]{11}") {
        prop_assert!(validate_document(DocumentType::Ruc, &ruc));
    }

    #[test]
    fn test_wrong_length_ruc_rejected(ruc in "[0-9]{1,10}|[0-9]{12,15}") {
        prop_assert!(!validate_document(DocumentType::Ruc, &ruc));
    }

    #[test]
    fn test_any_eight_digits_is_a_valid_dni(dni in "[0-9]{8}") {
        prop_assert!(validate_document(DocumentType::Dni, &dni));
    }

    #[test]
    fn test_passport_alphabet(passport in "[A-Z0-9]{6,12}") {
        prop_assert!(validate_document(DocumentType::Passport, &passport));
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_ruc_boundaries() {
        assert!(validate_document(DocumentType::Ruc, "20123456789"));
        assert!(!validate_document(DocumentType::Ruc, "2012345678"));
        assert!(!validate_document(DocumentType::Ruc, "201234567890"));
        assert!(!validate_document(DocumentType::Ruc, "2012345678A"));
    }

    #[test]
    fn test_dni_rejects_letters_and_lengths() {
        assert!(!validate_document(DocumentType::Dni, "1234567"));
        assert!(!validate_document(DocumentType::Dni, "123456789"));
        assert!(!validate_document(DocumentType::Dni, "1234567X"));
    }

    #[test]
    fn test_passport_rejects_lowercase() {
        assert!(!validate_document(DocumentType::Passport, "ab12345"));
        assert!(!validate_document(DocumentType::Passport, "AB12"));
    }

    #[test]
    fn test_foreigner_id_length() {
        assert!(validate_document(DocumentType::ForeignerId, "CE001"));
        assert!(validate_document(DocumentType::ForeignerId, "CE001234567"));
        assert!(!validate_document(DocumentType::ForeignerId, "CE01"));
        assert!(!validate_document(DocumentType::ForeignerId, &"9".repeat(21)));
    }
}
