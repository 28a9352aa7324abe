//! Property tests for the parser's universal guarantees (`spec.md` §8).

use graft_par::parse;
use quickcheck_macros::quickcheck;

/// `parse(lex(P))` is deterministic for any input.
#[quickcheck]
fn parsing_is_deterministic(src: String) -> bool {
    parse(&src) == parse(&src)
}

/// Parsing never panics; it always resolves to `Ok` or a documented error.
#[quickcheck]
fn parsing_never_panics(src: String) -> bool {
    matches!(parse(&src), Ok(_) | Err(_))
}
