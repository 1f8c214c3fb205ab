//! Conversion classification between primitive types

use crate::symbols::TypeSymbol;

/// How a value of one type may become another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// No rule exists
    None,
    /// Same type; never wrapped in a conversion node
    Identity,
    /// Safe widening, applied silently
    Implicit,
    /// Allowed only through a cast like `int(x)`
    Explicit,
}

impl Conversion {
    pub fn classify(from: TypeSymbol, to: TypeSymbol) -> Conversion {
        use TypeSymbol::*;

        if from == to {
            return Conversion::Identity;
        }
        match (from, to) {
            (Int, Float) => Conversion::Implicit,
            (Bool | Int | Float, String) => Conversion::Explicit,
            (String, Int | Float | Bool) => Conversion::Explicit,
            _ => Conversion::None,
        }
    }

    pub fn exists(self) -> bool {
        self != Conversion::None
    }

    pub fn is_implicit(self) -> bool {
        matches!(self, Conversion::Identity | Conversion::Implicit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TypeSymbol::*;

    #[test]
    fn test_identity() {
        for ty in [Bool, Int, Float, String] {
            assert_eq!(Conversion::classify(ty, ty), Conversion::Identity);
        }
    }

    #[test]
    fn test_only_int_to_float_is_implicit() {
        assert_eq!(Conversion::classify(Int, Float), Conversion::Implicit);
        assert_eq!(Conversion::classify(Float, Int), Conversion::None);
    }

    #[test]
    fn test_string_conversions_are_explicit() {
        for ty in [Bool, Int, Float] {
            assert_eq!(Conversion::classify(ty, String), Conversion::Explicit);
            assert_eq!(Conversion::classify(String, ty), Conversion::Explicit);
        }
    }

    #[test]
    fn test_no_conversion() {
        assert_eq!(Conversion::classify(Bool, Int), Conversion::None);
        assert_eq!(Conversion::classify(Int, Bool), Conversion::None);
        assert_eq!(Conversion::classify(Void, String), Conversion::None);
        assert!(!Conversion::classify(Bool, Float).exists());
        assert!(Conversion::classify(Int, Float).is_implicit());
        assert!(!Conversion::classify(Int, String).is_implicit());
    }
}
