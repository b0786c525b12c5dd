//! Type-level proof that an error was reported (spec §7: "the parse
//! returns `Err` iff any error was reported").

/// Can only be constructed by `Reporter::report`. A function that returns
/// `Result<T, ErrorGuaranteed>` is making a compile-time promise that it
/// never fails silently — every `Err` path goes through the diagnostic
/// queue first.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }
}
