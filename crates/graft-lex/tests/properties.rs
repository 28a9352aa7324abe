//! Property tests for the lexer's universal guarantees (`spec.md` §8).

use graft_lex::lex;
use quickcheck_macros::quickcheck;

/// Lexing is a pure function of its input: running it twice on the
/// same text always yields the same result.
#[quickcheck]
fn lexing_is_deterministic(src: String) -> bool {
    lex(&src) == lex(&src)
}

/// Lexing never panics on arbitrary text; it always resolves to either
/// a token stream or one of the documented hard errors.
#[quickcheck]
fn lexing_never_panics(src: String) -> bool {
    matches!(lex(&src), Ok(_) | Err(_))
}
