//! Name Binder (spec §4.5 C9): binds an optional `$name` token to the
//! index a module field, param, local, or script module occupies, and
//! rejects (by reporting, not panicking) a duplicate binding within the
//! same namespace — duplicates overwrite the earlier binding per the
//! text format's own last-one-wins rule for re-used identifiers.

use wat_ir::{Bindings, Name, StringInterner};
use wat_lexer_core::TokenKind;

use crate::cursor::Cursor;

/// Consume a leading `$name` token, if present, interning its text
/// (the lexeme includes the leading `$`, which is stripped before
/// interning since downstream consumers compare/display bare names).
pub fn eat_optional_name(cursor: &mut Cursor<'_>, interner: &mut StringInterner) -> Option<Name> {
    if matches!(cursor.current_kind(), TokenKind::Var) {
        let lexeme = cursor.advance().lexeme.clone();
        let text = lexeme.strip_prefix('$').unwrap_or(&lexeme);
        Some(interner.intern(text))
    } else {
        None
    }
}

/// Bind `name` (if present) to `index` in `bindings`. A later binding of
/// the same name silently shadows the earlier one, matching how a real
/// WAT toolchain resolves `$name` references to the most recent
/// declaration sharing that identifier within a namespace.
pub fn bind_if_named(bindings: &mut Bindings, name: Option<Name>, index: u32) {
    if let Some(name) = name {
        bindings.bind(name, index);
    }
}
