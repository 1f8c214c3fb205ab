//! Symbols shared by the binder, lowerer and evaluator

mod builtins;

pub use builtins::Builtin;

use crate::syntax::Span;
use serde::Serialize;
use std::fmt;
use std::cell::Cell;
use std::rc::Rc;

/// Primitive type. `Error` marks a failed bind and silences follow-up diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeSymbol {
    Error,
    Any,
    Bool,
    Int,
    Float,
    String,
    Void,
}

impl TypeSymbol {
    pub fn name(self) -> &'static str {
        match self {
            TypeSymbol::Error => "unknown",
            TypeSymbol::Any => "any",
            TypeSymbol::Bool => "bool",
            TypeSymbol::Int => "int",
            TypeSymbol::Float => "float",
            TypeSymbol::String => "string",
            TypeSymbol::Void => "void",
        }
    }

    /// Resolve a type written in source (`var x: int`, `float(x)`)
    pub fn lookup(name: &str) -> Option<TypeSymbol> {
        match name {
            "bool" => Some(TypeSymbol::Bool),
            "int" => Some(TypeSymbol::Int),
            "float" => Some(TypeSymbol::Float),
            "string" => Some(TypeSymbol::String),
            _ => None,
        }
    }

    pub fn is_error(self) -> bool {
        self == TypeSymbol::Error
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of one variable declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VariableId(u32);

/// Id source for one session; clones share the counter
#[derive(Debug, Clone, Default)]
pub struct VariableIds(Rc<Cell<u32>>);

impl VariableIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> VariableId {
        let id = self.0.get();
        self.0.set(id + 1);
        VariableId(id)
    }
}

/// A declared variable. Its type is fixed here; values live in the
/// evaluator's store, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableSymbol {
    pub id: VariableId,
    pub name: String,
    pub ty: TypeSymbol,
    pub mutable: bool,
    pub span: Option<Span>,
}

pub type VariableRef = Rc<VariableSymbol>;

impl VariableSymbol {
    pub fn new(
        ids: &VariableIds,
        name: impl Into<String>,
        ty: TypeSymbol,
        mutable: bool,
        span: Option<Span>,
    ) -> VariableRef {
        Rc::new(VariableSymbol {
            id: ids.next(),
            name: name.into(),
            ty,
            mutable,
            span,
        })
    }
}

/// Function parameter; never mutable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSymbol {
    pub name: String,
    pub ty: TypeSymbol,
}

impl ParameterSymbol {
    pub fn new(name: impl Into<String>, ty: TypeSymbol) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSymbol {
    pub name: String,
    pub parameters: Vec<ParameterSymbol>,
    pub return_type: TypeSymbol,
    /// `None` for built-ins
    pub span: Option<Span>,
    pub builtin: Option<Builtin>,
}

pub type FunctionRef = Rc<FunctionSymbol>;

impl FunctionSymbol {
    /// Same name and same parameter types
    pub fn same_signature(&self, other: &FunctionSymbol) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.ty == b.ty)
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", p.name, p.ty)?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

/// Jump target created by the lowerer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LabelId(pub u32);

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(TypeSymbol::Error.to_string(), "unknown");
        assert_eq!(TypeSymbol::Float.to_string(), "float");
        assert_eq!(TypeSymbol::Void.to_string(), "void");
    }

    #[test]
    fn test_type_lookup_only_source_types() {
        assert_eq!(TypeSymbol::lookup("int"), Some(TypeSymbol::Int));
        assert_eq!(TypeSymbol::lookup("string"), Some(TypeSymbol::String));
        assert_eq!(TypeSymbol::lookup("any"), None);
        assert_eq!(TypeSymbol::lookup("void"), None);
        assert_eq!(TypeSymbol::lookup("Int"), None);
    }

    #[test]
    fn test_variable_ids_are_unique() {
        let ids = VariableIds::new();
        let a = VariableSymbol::new(&ids, "x", TypeSymbol::Int, false, None);
        let b = VariableSymbol::new(&ids, "x", TypeSymbol::Int, false, None);
        assert_ne!(a.id, b.id);
        assert_ne!(a, b);
    }

    #[test]
    fn test_variable_ids_are_per_session() {
        let session = VariableIds::new();
        let shared = session.clone();
        assert_eq!(session.next(), VariableId(0));
        assert_eq!(shared.next(), VariableId(1));
        // a separate session starts over
        assert_eq!(VariableIds::new().next(), VariableId(0));
    }

    #[test]
    fn test_function_display() {
        let f = FunctionSymbol {
            name: "clamp".to_string(),
            parameters: vec![
                ParameterSymbol::new("value", TypeSymbol::Int),
                ParameterSymbol::new("max", TypeSymbol::Int),
            ],
            return_type: TypeSymbol::Int,
            span: None,
            builtin: None,
        };
        assert_eq!(f.to_string(), "clamp(value: int, max: int) -> int");
    }

    #[test]
    fn test_same_signature_ignores_parameter_names() {
        let a = Builtin::RandomInt.symbol();
        let mut b = Builtin::RandomInt.symbol();
        b.parameters[0].name = "limit".to_string();
        assert!(a.same_signature(&b));
        assert!(!a.same_signature(&Builtin::RandomFloat.symbol()));
    }

    #[test]
    fn test_label_display() {
        assert_eq!(LabelId(3).to_string(), "Label3");
    }
}
