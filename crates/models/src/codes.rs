//! Public identifiers handed out to clients
//!
//! Rows keep integer primary keys internally; these short codes are what
//! URLs and payment redirects carry.

use rand::seq::SliceRandom;

const DIGITS: &[u8] = b"1234567890";
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// `prefix` followed by `len` characters drawn uniformly from `alphabet`
fn random_code(prefix: &str, alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(prefix.len() + len);
    code.push_str(prefix);
    code.extend(
        (0..len)
            .filter_map(|_| alphabet.choose(&mut rng))
            .map(|&byte| char::from(byte)),
    );

    code
}

/// Order and order item code, e.g. `D4KQ2M9Z0TA`
pub fn order_code() -> String {
    random_code("D", ALPHANUMERIC, 10)
}

/// Six digit course code
pub fn course_code() -> String {
    random_code("", DIGITS, 6)
}

pub fn variant_code() -> String {
    random_code("", DIGITS, 10)
}

pub fn variant_item_code() -> String {
    random_code("", DIGITS, 10)
}

pub fn enrollment_code() -> String {
    random_code("ENR", DIGITS, 20)
}

pub fn question_code() -> String {
    random_code("QA", DIGITS, 10)
}

pub fn message_code() -> String {
    random_code("QM", DIGITS, 10)
}

pub fn note_code() -> String {
    random_code("NT", DIGITS, 20)
}

pub fn certificate_code() -> String {
    random_code("CT", ALPHANUMERIC, 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_order_code_shape() {
        let code = order_code();
        assert_eq!(code.len(), 11);
        assert!(code.starts_with('D'));
        assert!(code[1..].bytes().all(|b| ALPHANUMERIC.contains(&b)));
    }

    #[test]
    fn test_numeric_codes() {
        let course = course_code();
        assert_eq!(course.len(), 6);
        assert!(course.bytes().all(|b| b.is_ascii_digit()));

        let enrollment = enrollment_code();
        assert_eq!(enrollment.len(), 23);
        assert!(enrollment.starts_with("ENR"));
        assert!(enrollment[3..].bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_certificate_code_shape() {
        let code = certificate_code();
        assert_eq!(code.len(), 12);
        assert!(code.starts_with("CT"));
        assert!(code[2..].bytes().all(|b| ALPHANUMERIC.contains(&b)));
    }

    #[test]
    fn test_codes_are_not_repeated() {
        let codes: HashSet<String> = (0..500).map(|_| order_code()).collect();
        assert_eq!(codes.len(), 500);
    }
}
