//! Declaration attributes and type annotations.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Attributes attached to `let`, `def`, `class` and parameters.
    ///
    /// The front end writes them as `@pub`, `@const`, `@ref`.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Attrs: u8 {
        /// Visible through `module.name` / `instance.name` from outside.
        const PUB = 1 << 0;
        /// Binding cannot be reassigned or mutated.
        const CONST = 1 << 1;
        /// Parameter (or argument) aliases the caller's variable.
        const REF = 1 << 2;
    }
}

impl Attrs {
    #[inline]
    pub fn is_pub(self) -> bool {
        self.contains(Attrs::PUB)
    }

    #[inline]
    pub fn is_const(self) -> bool {
        self.contains(Attrs::CONST)
    }

    #[inline]
    pub fn is_ref(self) -> bool {
        self.contains(Attrs::REF)
    }
}

/// Type annotation as written after `:` in a binding or signature.
///
/// Annotations are checked when a value is bound, never inferred.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeAnn {
    Int,
    Float,
    Bool,
    Char,
    Str,
    List,
    Tuple,
    Dict,
    Option,
    File,
    Closure,
    Unit,
    /// Accepts every value.
    Any,
    /// A user class, by name.
    Class(String),
}

impl TypeAnn {
    /// Parse a type keyword; unknown names are treated as class names.
    pub fn from_name(name: &str) -> TypeAnn {
        match name {
            "int" => TypeAnn::Int,
            "float" => TypeAnn::Float,
            "bool" => TypeAnn::Bool,
            "char" => TypeAnn::Char,
            "str" => TypeAnn::Str,
            "list" => TypeAnn::List,
            "tuple" => TypeAnn::Tuple,
            "dict" => TypeAnn::Dict,
            "option" => TypeAnn::Option,
            "file" => TypeAnn::File,
            "closure" => TypeAnn::Closure,
            "unit" | "void" => TypeAnn::Unit,
            "any" => TypeAnn::Any,
            other => TypeAnn::Class(other.to_string()),
        }
    }
}

impl fmt::Display for TypeAnn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeAnn::Int => "int",
            TypeAnn::Float => "float",
            TypeAnn::Bool => "bool",
            TypeAnn::Char => "char",
            TypeAnn::Str => "str",
            TypeAnn::List => "list",
            TypeAnn::Tuple => "tuple",
            TypeAnn::Dict => "dict",
            TypeAnn::Option => "option",
            TypeAnn::File => "file",
            TypeAnn::Closure => "closure",
            TypeAnn::Unit => "unit",
            TypeAnn::Any => "any",
            TypeAnn::Class(name) => name,
        };
        f.write_str(name)
    }
}
