//! Symbol definitions.
//!
//! Symbols are reference-counted handles with a process-unique id. Two
//! handles denote the same symbol only when their ids match; names are used
//! for lookup and display.

use quill_core::text::TextLocation;
use quill_core::value::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_SYMBOL_ID: AtomicU32 = AtomicU32::new(1);

/// Unique identifier for a variable or function symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    fn next() -> Self {
        SymbolId(NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// ============================================================================
// Types
// ============================================================================

/// The built-in types. `Error` is the recovery type: once an expression has
/// failed to bind, anything involving it is accepted silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSymbol {
    Error,
    Bool,
    Int,
    String,
    Void,
}

impl TypeSymbol {
    pub fn name(self) -> &'static str {
        match self {
            TypeSymbol::Error => "?",
            TypeSymbol::Bool => "bool",
            TypeSymbol::Int => "int",
            TypeSymbol::String => "string",
            TypeSymbol::Void => "void",
        }
    }

    /// Resolve a type name written in source. `void` cannot be written.
    pub fn lookup(name: &str) -> Option<TypeSymbol> {
        match name {
            "bool" => Some(TypeSymbol::Bool),
            "int" => Some(TypeSymbol::Int),
            "string" => Some(TypeSymbol::String),
            _ => None,
        }
    }

    pub fn is_error(self) -> bool {
        self == TypeSymbol::Error
    }

    /// The type of a literal value.
    pub fn of_value(value: &Value) -> TypeSymbol {
        match value {
            Value::Boolean(_) => TypeSymbol::Bool,
            Value::Integer(_) => TypeSymbol::Int,
            Value::String(_) => TypeSymbol::String,
        }
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Variables
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Global,
    Local,
    Parameter,
}

#[derive(Debug)]
pub struct VariableSymbol {
    id: SymbolId,
    pub name: String,
    pub kind: VariableKind,
    pub ty: TypeSymbol,
    pub is_read_only: bool,
    /// Set only for read-only variables whose initializer is constant.
    pub constant: Option<Value>,
    /// Introduced by the compiler rather than declared in source.
    pub is_synthesized: bool,
    /// Location of the declaring identifier.
    pub declaration: Option<TextLocation>,
}

impl VariableSymbol {
    pub fn new(
        name: impl Into<String>,
        kind: VariableKind,
        ty: TypeSymbol,
        is_read_only: bool,
        constant: Option<Value>,
        declaration: Option<TextLocation>,
    ) -> Rc<Self> {
        debug_assert!(constant.is_none() || is_read_only, "only read-only variables carry constants");
        Rc::new(Self {
            id: SymbolId::next(),
            name: name.into(),
            kind,
            ty,
            is_read_only,
            constant,
            is_synthesized: false,
            declaration,
        })
    }

    /// A compiler-introduced local, e.g. the cached upper bound of a `for`.
    pub fn synthesized(name: impl Into<String>, ty: TypeSymbol, is_read_only: bool, constant: Option<Value>) -> Rc<Self> {
        Rc::new(Self {
            id: SymbolId::next(),
            name: name.into(),
            kind: VariableKind::Local,
            ty,
            is_read_only,
            constant,
            is_synthesized: true,
            declaration: None,
        })
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }
}

impl PartialEq for VariableSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for VariableSymbol {}

impl Hash for VariableSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Functions provided by the host rather than written in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    Print,
    Input,
    Random,
}

impl BuiltinFunction {
    pub const ALL: [BuiltinFunction; 3] = [BuiltinFunction::Print, BuiltinFunction::Input, BuiltinFunction::Random];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinFunction::Print => "print",
            BuiltinFunction::Input => "input",
            BuiltinFunction::Random => "random",
        }
    }

    /// Create the symbol for this built-in.
    pub fn symbol(self) -> Rc<FunctionSymbol> {
        let parameter = |name: &str, ty| VariableSymbol::new(name, VariableKind::Parameter, ty, false, None, None);
        let (parameters, ty) = match self {
            BuiltinFunction::Print => (vec![parameter("text", TypeSymbol::String)], TypeSymbol::Void),
            BuiltinFunction::Input => (Vec::new(), TypeSymbol::String),
            BuiltinFunction::Random => (vec![parameter("maximum", TypeSymbol::Int)], TypeSymbol::Int),
        };
        Rc::new(FunctionSymbol {
            id: SymbolId::next(),
            name: self.name().to_string(),
            parameters,
            ty,
            declaration: None,
            builtin: Some(self),
            is_synthesized: false,
        })
    }
}

#[derive(Debug)]
pub struct FunctionSymbol {
    id: SymbolId,
    pub name: String,
    pub parameters: Vec<Rc<VariableSymbol>>,
    /// The return type; `Void` when none is declared.
    pub ty: TypeSymbol,
    /// Location of the function's name in its declaration.
    pub declaration: Option<TextLocation>,
    pub builtin: Option<BuiltinFunction>,
    /// `main` or `$eval` wrapping the global statements.
    pub is_synthesized: bool,
}

impl FunctionSymbol {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<Rc<VariableSymbol>>,
        ty: TypeSymbol,
        declaration: Option<TextLocation>,
    ) -> Rc<Self> {
        Rc::new(Self {
            id: SymbolId::next(),
            name: name.into(),
            parameters,
            ty,
            declaration,
            builtin: None,
            is_synthesized: false,
        })
    }

    /// A parameterless function holding the global statements.
    pub fn synthesized(name: impl Into<String>, ty: TypeSymbol) -> Rc<Self> {
        Rc::new(Self {
            id: SymbolId::next(),
            name: name.into(),
            parameters: Vec::new(),
            ty,
            declaration: None,
            builtin: None,
            is_synthesized: true,
        })
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }
}

impl PartialEq for FunctionSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FunctionSymbol {}

impl Hash for FunctionSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ============================================================================
// Symbol
// ============================================================================

/// Anything a name in scope can resolve to.
#[derive(Debug, Clone)]
pub enum Symbol {
    Variable(Rc<VariableSymbol>),
    Function(Rc<FunctionSymbol>),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(v) => &v.name,
            Symbol::Function(f) => &f.name,
        }
    }

    /// How the symbol is described when it is the one being declared.
    pub fn declared_description(&self) -> &'static str {
        match self {
            Symbol::Variable(v) => match v.kind {
                VariableKind::Global => "Global variable",
                VariableKind::Local => "Local variable",
                VariableKind::Parameter => "Parameter",
            },
            Symbol::Function(_) => "Function",
        }
    }

    /// How the symbol is described when a new declaration hides it.
    pub fn hidden_description(&self) -> &'static str {
        match self {
            Symbol::Function(_) => "existing function",
            Symbol::Variable(_) => self.kind_name(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbol::Variable(v) => match v.kind {
                VariableKind::Global => "global variable",
                VariableKind::Local => "local variable",
                VariableKind::Parameter => "parameter",
            },
            Symbol::Function(_) => "function",
        }
    }
}
