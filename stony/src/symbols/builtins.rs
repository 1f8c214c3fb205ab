//! Built-in function catalog

use super::{FunctionSymbol, ParameterSymbol, TypeSymbol};
use serde::Serialize;

/// Built-in functions, dispatched on by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Builtin {
    Print,
    PrintLn,
    Input,
    Stringify,
    RandomInt,
    RandomFloat,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Print,
        Builtin::PrintLn,
        Builtin::Input,
        Builtin::Stringify,
        Builtin::RandomInt,
        Builtin::RandomFloat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::PrintLn => "println",
            Builtin::Input => "input",
            Builtin::Stringify => "stringify",
            Builtin::RandomInt | Builtin::RandomFloat => "random",
        }
    }

    fn parameters(self) -> &'static [(&'static str, TypeSymbol)] {
        const VALUE: &[(&str, TypeSymbol)] = &[("value", TypeSymbol::Any)];
        const NONE: &[(&str, TypeSymbol)] = &[];
        const MAX_INT: &[(&str, TypeSymbol)] = &[("max", TypeSymbol::Int)];
        const MAX_FLOAT: &[(&str, TypeSymbol)] = &[("max", TypeSymbol::Float)];

        match self {
            Builtin::Print | Builtin::PrintLn | Builtin::Stringify => VALUE,
            Builtin::Input => NONE,
            Builtin::RandomInt => MAX_INT,
            Builtin::RandomFloat => MAX_FLOAT,
        }
    }

    pub fn return_type(self) -> TypeSymbol {
        match self {
            Builtin::Print | Builtin::PrintLn => TypeSymbol::Void,
            Builtin::Input | Builtin::Stringify => TypeSymbol::String,
            Builtin::RandomInt => TypeSymbol::Int,
            Builtin::RandomFloat => TypeSymbol::Float,
        }
    }

    pub fn symbol(self) -> FunctionSymbol {
        FunctionSymbol {
            name: self.name().to_string(),
            parameters: self
                .parameters()
                .iter()
                .map(|&(name, ty)| ParameterSymbol::new(name, ty))
                .collect(),
            return_type: self.return_type(),
            span: None,
            builtin: Some(self),
        }
    }
}
