//! Raw token definition: the `logos`-derived tokenizer output before
//! span translation and conversion to `wat_lexer_core::Token`.

use logos::{Lexer, Logos, Skip};

/// Skip a `(; ... ;)` block comment, counting nesting depth so a nested
/// `(; ... ;)` inside a comment does not close the outer one.
fn skip_block_comment(lex: &mut Lexer<RawToken>) -> Skip {
    let rem = lex.remainder();
    let mut depth = 1usize;
    let mut i = 0usize;
    let bytes = rem.as_bytes();
    while i < bytes.len() {
        if rem[i..].starts_with("(;") {
            depth += 1;
            i += 2;
        } else if rem[i..].starts_with(";)") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                break;
            }
        } else {
            i += 1;
        }
    }
    lex.bump(i);
    Skip
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum RawToken {
    #[regex(r";;[^\n]*")]
    LineComment,
    #[token("(;", skip_block_comment)]
    BlockComment,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // --- Literals ---
    #[regex(r"(0x[0-9a-fA-F][0-9a-fA-F_]*)|([0-9][0-9_]*)")]
    Nat,
    #[regex(r"[+-](0x[0-9a-fA-F][0-9a-fA-F_]*|[0-9][0-9_]*)")]
    Int,
    #[regex(
        r"[+-]?inf|[+-]?nan|[+-]?nan:canonical|[+-]?nan:arithmetic|[+-]?nan:0x[0-9a-fA-F][0-9a-fA-F_]*|[+-]?[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9][0-9_]*)?|[+-]?[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*|[+-]?0x[0-9a-fA-F][0-9a-fA-F_]*\.?[0-9a-fA-F_]*([pP][+-]?[0-9][0-9_]*)?"
    )]
    Float,
    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    Text,
    #[regex(r"\$[0-9A-Za-z!#$%&'*+./:<=>?@\\^_`|~-]+")]
    Var,

    // --- Value types / table element type / mutability ---
    #[token("i32")]
    I32,
    #[token("i64")]
    I64,
    #[token("f32")]
    F32,
    #[token("f64")]
    F64,
    #[token("anyfunc")]
    #[token("funcref")]
    AnyFunc,
    #[token("mut")]
    Mut,

    // --- Module grammar keywords ---
    #[token("module")]
    Module,
    #[token("func")]
    Func,
    #[token("param")]
    Param,
    #[token("result")]
    Result,
    #[token("local")]
    Local,
    #[token("type")]
    TypeKw,
    #[token("import")]
    Import,
    #[token("export")]
    Export,
    #[token("table")]
    Table,
    #[token("memory")]
    Memory,
    #[token("global")]
    Global,
    #[token("elem")]
    Elem,
    #[token("data")]
    Data,
    #[token("start")]
    Start,
    #[token("offset")]
    Offset,
    #[regex(r"offset=(0x[0-9a-fA-F][0-9a-fA-F_]*|[0-9][0-9_]*)")]
    MemArgOffset,
    #[regex(r"align=(0x[0-9a-fA-F][0-9a-fA-F_]*|[0-9][0-9_]*)")]
    MemArgAlign,
    #[token("block")]
    Block,
    #[token("loop")]
    Loop,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("end")]
    End,

    // --- Script grammar keywords ---
    #[token("invoke")]
    Invoke,
    #[token("get")]
    Get,
    #[token("register")]
    Register,
    #[token("assert_return")]
    AssertReturn,
    #[token("assert_return_canonical_nan")]
    AssertReturnCanonicalNan,
    #[token("assert_return_arithmetic_nan")]
    AssertReturnArithmeticNan,
    #[token("assert_trap")]
    AssertTrap,
    #[token("assert_exhaustion")]
    AssertExhaustion,
    #[token("assert_malformed")]
    AssertMalformed,
    #[token("assert_invalid")]
    AssertInvalid,
    #[token("assert_unlinkable")]
    AssertUnlinkable,
    #[token("assert_uninstantiable")]
    AssertUninstantiable,
    #[token("quote")]
    Quote,
    #[token("binary")]
    BinaryKw,

    // --- Plain instructions ---
    #[token("unreachable")]
    Unreachable,
    #[token("nop")]
    NopKw,
    #[token("drop")]
    DropKw,
    #[token("select")]
    SelectKw,
    #[token("br")]
    Br,
    #[token("br_if")]
    BrIf,
    #[token("br_table")]
    BrTable,
    #[token("return")]
    ReturnKw,
    #[token("call")]
    Call,
    #[token("call_indirect")]
    CallIndirect,
    #[token("get_local")]
    GetLocal,
    #[token("set_local")]
    SetLocal,
    #[token("tee_local")]
    TeeLocal,
    #[token("get_global")]
    GetGlobal,
    #[token("set_global")]
    SetGlobal,
    #[token("current_memory")]
    CurrentMemory,
    #[token("grow_memory")]
    GrowMemory,

    // --- Exception-handling instructions (feature-gated) ---
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("catch_all")]
    CatchAll,
    #[token("throw")]
    Throw,
    #[token("rethrow")]
    Rethrow,

    // --- LOAD family ---
    #[token("i32.load")]
    I32Load,
    #[token("i64.load")]
    I64Load,
    #[token("f32.load")]
    F32Load,
    #[token("f64.load")]
    F64Load,
    #[token("i32.load8_s")]
    I32Load8S,
    #[token("i32.load8_u")]
    I32Load8U,
    #[token("i32.load16_s")]
    I32Load16S,
    #[token("i32.load16_u")]
    I32Load16U,
    #[token("i64.load8_s")]
    I64Load8S,
    #[token("i64.load8_u")]
    I64Load8U,
    #[token("i64.load16_s")]
    I64Load16S,
    #[token("i64.load16_u")]
    I64Load16U,
    #[token("i64.load32_s")]
    I64Load32S,
    #[token("i64.load32_u")]
    I64Load32U,

    // --- STORE family ---
    #[token("i32.store")]
    I32Store,
    #[token("i64.store")]
    I64Store,
    #[token("f32.store")]
    F32Store,
    #[token("f64.store")]
    F64Store,
    #[token("i32.store8")]
    I32Store8,
    #[token("i32.store16")]
    I32Store16,
    #[token("i64.store8")]
    I64Store8,
    #[token("i64.store16")]
    I64Store16,
    #[token("i64.store32")]
    I64Store32,

    // --- CONST family ---
    #[token("i32.const")]
    I32Const,
    #[token("i64.const")]
    I64Const,
    #[token("f32.const")]
    F32Const,
    #[token("f64.const")]
    F64Const,

    // --- UNARY family ---
    #[token("i32.clz")]
    I32Clz,
    #[token("i32.ctz")]
    I32Ctz,
    #[token("i32.popcnt")]
    I32Popcnt,
    #[token("i64.clz")]
    I64Clz,
    #[token("i64.ctz")]
    I64Ctz,
    #[token("i64.popcnt")]
    I64Popcnt,
    #[token("f32.abs")]
    F32Abs,
    #[token("f32.neg")]
    F32Neg,
    #[token("f32.ceil")]
    F32Ceil,
    #[token("f32.floor")]
    F32Floor,
    #[token("f32.trunc")]
    F32Trunc,
    #[token("f32.nearest")]
    F32Nearest,
    #[token("f32.sqrt")]
    F32Sqrt,
    #[token("f64.abs")]
    F64Abs,
    #[token("f64.neg")]
    F64Neg,
    #[token("f64.ceil")]
    F64Ceil,
    #[token("f64.floor")]
    F64Floor,
    #[token("f64.trunc")]
    F64Trunc,
    #[token("f64.nearest")]
    F64Nearest,
    #[token("f64.sqrt")]
    F64Sqrt,

    // --- BINARY family ---
    #[token("i32.add")]
    I32Add,
    #[token("i32.sub")]
    I32Sub,
    #[token("i32.mul")]
    I32Mul,
    #[token("i32.div_s")]
    I32DivS,
    #[token("i32.div_u")]
    I32DivU,
    #[token("i32.rem_s")]
    I32RemS,
    #[token("i32.rem_u")]
    I32RemU,
    #[token("i32.and")]
    I32And,
    #[token("i32.or")]
    I32Or,
    #[token("i32.xor")]
    I32Xor,
    #[token("i32.shl")]
    I32Shl,
    #[token("i32.shr_s")]
    I32ShrS,
    #[token("i32.shr_u")]
    I32ShrU,
    #[token("i32.rotl")]
    I32Rotl,
    #[token("i32.rotr")]
    I32Rotr,
    #[token("i64.add")]
    I64Add,
    #[token("i64.sub")]
    I64Sub,
    #[token("i64.mul")]
    I64Mul,
    #[token("i64.div_s")]
    I64DivS,
    #[token("i64.div_u")]
    I64DivU,
    #[token("i64.rem_s")]
    I64RemS,
    #[token("i64.rem_u")]
    I64RemU,
    #[token("i64.and")]
    I64And,
    #[token("i64.or")]
    I64Or,
    #[token("i64.xor")]
    I64Xor,
    #[token("i64.shl")]
    I64Shl,
    #[token("i64.shr_s")]
    I64ShrS,
    #[token("i64.shr_u")]
    I64ShrU,
    #[token("i64.rotl")]
    I64Rotl,
    #[token("i64.rotr")]
    I64Rotr,
    #[token("f32.add")]
    F32Add,
    #[token("f32.sub")]
    F32Sub,
    #[token("f32.mul")]
    F32Mul,
    #[token("f32.div")]
    F32Div,
    #[token("f32.min")]
    F32Min,
    #[token("f32.max")]
    F32Max,
    #[token("f32.copysign")]
    F32Copysign,
    #[token("f64.add")]
    F64Add,
    #[token("f64.sub")]
    F64Sub,
    #[token("f64.mul")]
    F64Mul,
    #[token("f64.div")]
    F64Div,
    #[token("f64.min")]
    F64Min,
    #[token("f64.max")]
    F64Max,
    #[token("f64.copysign")]
    F64Copysign,

    // --- COMPARE family ---
    #[token("i32.eqz")]
    I32Eqz,
    #[token("i32.eq")]
    I32Eq,
    #[token("i32.ne")]
    I32Ne,
    #[token("i32.lt_s")]
    I32LtS,
    #[token("i32.lt_u")]
    I32LtU,
    #[token("i32.gt_s")]
    I32GtS,
    #[token("i32.gt_u")]
    I32GtU,
    #[token("i32.le_s")]
    I32LeS,
    #[token("i32.le_u")]
    I32LeU,
    #[token("i32.ge_s")]
    I32GeS,
    #[token("i32.ge_u")]
    I32GeU,
    #[token("i64.eqz")]
    I64Eqz,
    #[token("i64.eq")]
    I64Eq,
    #[token("i64.ne")]
    I64Ne,
    #[token("i64.lt_s")]
    I64LtS,
    #[token("i64.lt_u")]
    I64LtU,
    #[token("i64.gt_s")]
    I64GtS,
    #[token("i64.gt_u")]
    I64GtU,
    #[token("i64.le_s")]
    I64LeS,
    #[token("i64.le_u")]
    I64LeU,
    #[token("i64.ge_s")]
    I64GeS,
    #[token("i64.ge_u")]
    I64GeU,
    #[token("f32.eq")]
    F32Eq,
    #[token("f32.ne")]
    F32Ne,
    #[token("f32.lt")]
    F32Lt,
    #[token("f32.gt")]
    F32Gt,
    #[token("f32.le")]
    F32Le,
    #[token("f32.ge")]
    F32Ge,
    #[token("f64.eq")]
    F64Eq,
    #[token("f64.ne")]
    F64Ne,
    #[token("f64.lt")]
    F64Lt,
    #[token("f64.gt")]
    F64Gt,
    #[token("f64.le")]
    F64Le,
    #[token("f64.ge")]
    F64Ge,

    // --- CONVERT family (legacy slash naming, matching get_local/current_memory era) ---
    #[token("i32.wrap/i64")]
    I32WrapI64,
    #[token("i32.trunc_s/f32")]
    I32TruncF32S,
    #[token("i32.trunc_u/f32")]
    I32TruncF32U,
    #[token("i32.trunc_s/f64")]
    I32TruncF64S,
    #[token("i32.trunc_u/f64")]
    I32TruncF64U,
    #[token("i64.extend_s/i32")]
    I64ExtendI32S,
    #[token("i64.extend_u/i32")]
    I64ExtendI32U,
    #[token("i64.trunc_s/f32")]
    I64TruncF32S,
    #[token("i64.trunc_u/f32")]
    I64TruncF32U,
    #[token("i64.trunc_s/f64")]
    I64TruncF64S,
    #[token("i64.trunc_u/f64")]
    I64TruncF64U,
    #[token("f32.convert_s/i32")]
    F32ConvertI32S,
    #[token("f32.convert_u/i32")]
    F32ConvertI32U,
    #[token("f32.convert_s/i64")]
    F32ConvertI64S,
    #[token("f32.convert_u/i64")]
    F32ConvertI64U,
    #[token("f32.demote/f64")]
    F32DemoteF64,
    #[token("f64.convert_s/i32")]
    F64ConvertI32S,
    #[token("f64.convert_u/i32")]
    F64ConvertI32U,
    #[token("f64.convert_s/i64")]
    F64ConvertI64S,
    #[token("f64.convert_u/i64")]
    F64ConvertI64U,
    #[token("f64.promote/f32")]
    F64PromoteF32,
    #[token("i32.reinterpret/f32")]
    I32ReinterpretF32,
    #[token("i64.reinterpret/f64")]
    I64ReinterpretF64,
    #[token("f32.reinterpret/i32")]
    F32ReinterpretI32,
    #[token("f64.reinterpret/i64")]
    F64ReinterpretI64,
}
