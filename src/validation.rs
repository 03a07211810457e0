//! Institutional email rules, shared by every request boundary.
//!
//! Pure classification: no state, no I/O. A student address is
//! `letters(.letters)*YYYY@vitstudent.ac.in` (exactly four trailing digits);
//! a faculty address is anything at `artvip.ac.in`.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

pub const STUDENT_DOMAIN: &str = "vitstudent.ac.in";
pub const FACULTY_DOMAIN: &str = "artvip.ac.in";

const PUBLIC_DOMAINS: [&str; 4] = ["gmail.com", "yahoo.com", "outlook.com", "hotmail.com"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Student,
    Faculty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailRuleError {
    #[error("Email is required")]
    Missing,
    #[error("Invalid email format")]
    Malformed,
    #[error("Student email must end with a 4-digit year (e.g., alex2024@{})", STUDENT_DOMAIN)]
    MissingYear,
    #[error("Public email addresses are not allowed. Use your institutional email.")]
    PublicProvider,
    #[error("Only {} and {} emails are allowed", STUDENT_DOMAIN, FACULTY_DOMAIN)]
    WrongDomain,
}

pub fn is_valid_student_email(email: &str) -> bool {
    lazy_static! {
        // Letters, optionally dot-separated, ending in exactly four digits.
        static ref STUDENT_LOCAL_RE: Regex =
            Regex::new(r"^[a-z]+(\.[a-z]+)*[0-9]{4}$").unwrap();
    }
    match email.rsplit_once('@') {
        Some((local, domain)) => domain == STUDENT_DOMAIN && STUDENT_LOCAL_RE.is_match(local),
        None => false,
    }
}

pub fn is_valid_faculty_email(email: &str) -> bool {
    match email.rsplit_once('@') {
        Some((local, domain)) => !local.is_empty() && domain == FACULTY_DOMAIN,
        None => false,
    }
}

/// Classify an address as student or faculty, or say why it is neither.
///
/// Normalizes (trim + lowercase) before applying any rule, so callers on
/// different boundaries cannot diverge on case or whitespace.
pub fn validate_institutional_email(email: &str) -> Result<EmailKind, EmailRuleError> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(EmailRuleError::Missing);
    }
    if !email.contains('@') || !email.contains('.') {
        return Err(EmailRuleError::Malformed);
    }

    if is_valid_student_email(&email) {
        return Ok(EmailKind::Student);
    }
    if is_valid_faculty_email(&email) {
        return Ok(EmailKind::Faculty);
    }

    let domain = email.rsplit_once('@').map(|(_, d)| d).unwrap_or("");

    if domain == STUDENT_DOMAIN {
        return Err(EmailRuleError::MissingYear);
    }
    if PUBLIC_DOMAINS.contains(&domain) {
        return Err(EmailRuleError::PublicProvider);
    }

    Err(EmailRuleError::WrongDomain)
}

/// Trim + lowercase, the canonical stored form of an email.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_student_with_four_trailing_digits() {
        assert_eq!(
            validate_institutional_email("alex.kumar2022@vitstudent.ac.in"),
            Ok(EmailKind::Student)
        );
        assert_eq!(
            validate_institutional_email("priya.s2024@vitstudent.ac.in"),
            Ok(EmailKind::Student)
        );
        assert_eq!(
            validate_institutional_email("rahul2021@vitstudent.ac.in"),
            Ok(EmailKind::Student)
        );
    }

    #[test]
    fn rejects_student_with_wrong_digit_count() {
        // Two, three or five digits all fail the exactly-four rule.
        assert_eq!(
            validate_institutional_email("alex22@vitstudent.ac.in"),
            Err(EmailRuleError::MissingYear)
        );
        assert_eq!(
            validate_institutional_email("alex222@vitstudent.ac.in"),
            Err(EmailRuleError::MissingYear)
        );
        assert_eq!(
            validate_institutional_email("alex22222@vitstudent.ac.in"),
            Err(EmailRuleError::MissingYear)
        );
    }

    #[test]
    fn rejects_student_with_trailing_non_digit() {
        assert_eq!(
            validate_institutional_email("alex2022x@vitstudent.ac.in"),
            Err(EmailRuleError::MissingYear)
        );
    }

    #[test]
    fn rejects_student_local_with_digits_before_year() {
        assert_eq!(
            validate_institutional_email("alex1.kumar2022@vitstudent.ac.in"),
            Err(EmailRuleError::MissingYear)
        );
    }

    #[test]
    fn accepts_faculty_with_any_local_part() {
        assert_eq!(
            validate_institutional_email("dean.of.students@artvip.ac.in"),
            Ok(EmailKind::Faculty)
        );
        assert_eq!(
            validate_institutional_email("a1b2c3@artvip.ac.in"),
            Ok(EmailKind::Faculty)
        );
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(
            validate_institutional_email("  Alex.Kumar2022@VITSTUDENT.AC.IN  "),
            Ok(EmailKind::Student)
        );
    }

    #[test]
    fn public_providers_get_specific_error() {
        for addr in [
            "someone@gmail.com",
            "someone@yahoo.com",
            "someone@outlook.com",
            "someone@hotmail.com",
        ] {
            assert_eq!(
                validate_institutional_email(addr),
                Err(EmailRuleError::PublicProvider),
                "{addr}"
            );
        }
    }

    #[test]
    fn other_domains_get_generic_error() {
        assert_eq!(
            validate_institutional_email("alex2022@example.edu"),
            Err(EmailRuleError::WrongDomain)
        );
    }

    #[test]
    fn malformed_addresses_rejected() {
        assert_eq!(
            validate_institutional_email(""),
            Err(EmailRuleError::Missing)
        );
        assert_eq!(
            validate_institutional_email("no-at-sign.ac.in"),
            Err(EmailRuleError::Malformed)
        );
        assert_eq!(
            validate_institutional_email("nodot@acin"),
            Err(EmailRuleError::Malformed)
        );
    }

    #[test]
    fn error_messages_are_user_facing() {
        let err = validate_institutional_email("alex22@vitstudent.ac.in").unwrap_err();
        assert!(err.to_string().contains("4-digit year"));

        let err = validate_institutional_email("x@gmail.com").unwrap_err();
        assert!(err.to_string().contains("institutional email"));

        let err = validate_institutional_email("x@corp.example.com").unwrap_err();
        assert!(err.to_string().contains("vitstudent.ac.in"));
        assert!(err.to_string().contains("artvip.ac.in"));
    }
}
