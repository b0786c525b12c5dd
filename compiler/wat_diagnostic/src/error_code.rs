//! Error taxonomy (spec §7): kinds, not type names — each corresponds to
//! one of the failure categories the grammar engine and its semantic
//! actions can report.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    /// Raised by the token source; surfaced verbatim (spec §7 "Lexical").
    Lexical,
    /// The grammar engine cannot match the current token (spec §7
    /// "Syntactic").
    Syntactic,
    /// An integer or float literal does not fit its declared type (spec
    /// §7 "Out-of-range literal").
    OutOfRangeLiteral,
    /// A block/loop/if's begin and end labels differ (spec §7 "Label
    /// mismatch", §4.3).
    LabelMismatch,
    /// An end-label appears with no matching begin-label (spec §9: this
    /// is reported distinctly from `LabelMismatch`, not silently
    /// ignored).
    UnexpectedLabel,
    /// A non-import definition of some kind precedes an import of that
    /// same kind (spec §7 "Import ordering", §4.4).
    ImportOrdering,
    /// The external Binary Reader rejected a binary-form module (spec
    /// §7 "Binary-submodule read error").
    BinarySubmoduleRead,
    /// Stack growth failed or the allocator refused (spec §7 "Memory
    /// exhaustion").
    MemoryExhaustion,
}

impl ErrorKind {
    /// A stable, greppable code string, in the spirit of the teacher's
    /// `ErrorCode` registry (`ori_diagnostic::ErrorCode`) but sized to
    /// this core's much smaller taxonomy.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Lexical => "wat::lexical",
            ErrorKind::Syntactic => "wat::syntax",
            ErrorKind::OutOfRangeLiteral => "wat::literal-range",
            ErrorKind::LabelMismatch => "wat::label-mismatch",
            ErrorKind::UnexpectedLabel => "wat::unexpected-label",
            ErrorKind::ImportOrdering => "wat::import-ordering",
            ErrorKind::BinarySubmoduleRead => "wat::binary-read",
            ErrorKind::MemoryExhaustion => "wat::memory-exhaustion",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
