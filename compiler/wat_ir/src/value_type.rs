//! Value types and type vectors (spec §3 "Value Type", "Type Vector").

use std::fmt;

/// Primitive operand kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValType {
    I32,
    I64,
    F32,
    F64,
}

impl fmt::Display for ValType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValType::I32 => "i32",
            ValType::I64 => "i64",
            ValType::F32 => "f32",
            ValType::F64 => "f64",
        };
        f.write_str(s)
    }
}

/// Ordered sequence of value types: parameter lists, result lists, local
/// lists, block signatures.
pub type TypeVector = Vec<ValType>;

/// A function signature. The text front-end accepts at most one result
/// unless the multi-value extension is enabled; invariant enforced by the
/// type-use grammar (spec §3 "Function Signature"), not by this type.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct FuncSig {
    pub params: TypeVector,
    pub results: TypeVector,
}

impl FuncSig {
    pub fn new(params: TypeVector, results: TypeVector) -> Self {
        FuncSig { params, results }
    }
}
