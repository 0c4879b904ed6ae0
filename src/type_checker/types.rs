use std::fmt::Display;

/// A checker-side type.
///
/// Equality is structural: the derived `PartialEq` compares function
/// parameter lists pairwise and then the return types.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Number,
    String,
    Bool,
    Void,
    Function {
        parameters: Vec<Type>,
        return_type: Box<Type>,
    },
    /// Placeholder produced after an error. Anything built on it is not reported again.
    Unknown,
}

impl Type {
    pub fn function(parameters: Vec<Type>, return_type: Type) -> Self {
        Type::Function {
            parameters,
            return_type: Box::new(return_type),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    /// Resolves an annotation name. `Bool` is accepted as an alias of `Boolean`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Number" => Some(Type::Number),
            "String" => Some(Type::String),
            "Boolean" | "Bool" => Some(Type::Bool),
            "Void" => Some(Type::Void),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Number => write!(f, "Number"),
            Type::String => write!(f, "String"),
            Type::Bool => write!(f, "Boolean"),
            Type::Void => write!(f, "Void"),
            Type::Unknown => write!(f, "Unknown"),
            Type::Function {
                parameters,
                return_type,
            } => {
                let parameters = parameters
                    .iter()
                    .map(|parameter| parameter.to_string())
                    .collect::<Vec<String>>();

                write!(f, "({}) -> {}", parameters.join(", "), return_type)
            }
        }
    }
}
