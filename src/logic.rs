//! Kleene three-valued logic.
//!
//! `Boolean` is a three-way enum rather than a `bool` plus a sentinel:
//! since it carries no payload, structural equality on the enum already
//! gives the identity equality the spec's singleton-object model asks for.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Boolean {
    True,
    False,
    Unknown,
}

impl Boolean {
    pub fn of(b: bool) -> Boolean {
        if b { Boolean::True } else { Boolean::False }
    }

    pub fn is_true(self) -> bool {
        self == Boolean::True
    }

    pub fn is_false(self) -> bool {
        self == Boolean::False
    }

    pub fn is_unknown(self) -> bool {
        self == Boolean::Unknown
    }

    pub fn and(self, other: Boolean) -> Boolean {
        match self {
            Boolean::True => other,
            Boolean::False => Boolean::False,
            Boolean::Unknown => {
                if other == Boolean::False {
                    Boolean::False
                } else {
                    Boolean::Unknown
                }
            }
        }
    }

    pub fn or(self, other: Boolean) -> Boolean {
        match self {
            Boolean::True => Boolean::True,
            Boolean::False => other,
            Boolean::Unknown => {
                if other == Boolean::True {
                    Boolean::True
                } else {
                    Boolean::Unknown
                }
            }
        }
    }

    pub fn not(self) -> Boolean {
        match self {
            Boolean::True => Boolean::False,
            Boolean::False => Boolean::True,
            Boolean::Unknown => Boolean::Unknown,
        }
    }

    pub fn xor(self, other: Boolean) -> Boolean {
        self.and(other.not()).or(other.and(self.not()))
    }

    /// Kleene biconditional: `eq(a, b) = if a { b } else if !a { ~b } else { unknown }`.
    pub fn eq(self, other: Boolean) -> Boolean {
        match self {
            Boolean::True => other,
            Boolean::False => other.not(),
            Boolean::Unknown => Boolean::Unknown,
        }
    }
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Boolean::True => "true",
            Boolean::False => "false",
            Boolean::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Boolean::*;

    #[test]
    fn and_truth_table() {
        assert_eq!(True.and(True), True);
        assert_eq!(True.and(False), False);
        assert_eq!(True.and(Unknown), Unknown);
        assert_eq!(False.and(True), False);
        assert_eq!(False.and(False), False);
        assert_eq!(False.and(Unknown), False);
        assert_eq!(Unknown.and(True), Unknown);
        assert_eq!(Unknown.and(False), False);
        assert_eq!(Unknown.and(Unknown), Unknown);
    }

    #[test]
    fn or_truth_table() {
        assert_eq!(True.or(True), True);
        assert_eq!(True.or(False), True);
        assert_eq!(True.or(Unknown), True);
        assert_eq!(False.or(True), True);
        assert_eq!(False.or(False), False);
        assert_eq!(False.or(Unknown), Unknown);
        assert_eq!(Unknown.or(True), True);
        assert_eq!(Unknown.or(False), Unknown);
        assert_eq!(Unknown.or(Unknown), Unknown);
    }

    #[test]
    fn not_table() {
        assert_eq!(True.not(), False);
        assert_eq!(False.not(), True);
        assert_eq!(Unknown.not(), Unknown);
    }

    #[test]
    fn xor_table() {
        assert_eq!(True.xor(True), False);
        assert_eq!(True.xor(False), True);
        assert_eq!(False.xor(False), False);
        assert_eq!(Unknown.xor(True), Unknown);
        assert_eq!(Unknown.xor(Unknown), Unknown);
    }

    #[test]
    fn eq_matches_spec_examples() {
        assert_eq!(Unknown.eq(True), Unknown);
        assert_eq!(True.eq(True), True);
        assert_eq!(False.eq(False), True);
        assert_eq!(False.eq(True), False);
    }
}
