//! Binding powers for precedence-climbing expression parsing.
//!
//! Each infix operator carries a `(left, right)` binding-power pair; a
//! left-associative tier uses `right = left + 1`. Higher binds tighter.
//! The ladder, loosest to tightest:
//!
//! `OR` < `XOR` < `AND` < `NOT` < comparisons (`= <=> < <= > >= != <>`,
//! `IS LIKE REGEXP RLIKE IN BETWEEN`) < `|` < `&` < `<< >>` < `+ -`
//! < `DIV MOD %` < `* /` < `^` < unary `- ~ ! +` < `COLLATE`.

use crate::lexer::{Keyword, TokenKind};

/// Binding power of the prefix `NOT`, just above `AND`.
pub(crate) const NOT_BP: u8 = 7;

/// The comparison tier shared by `=`, `IN`, `BETWEEN`, `LIKE` and
/// friends.
pub(crate) const COMPARISON_BP: (u8, u8) = (9, 10);

/// Minimum binding power for the BETWEEN low operand, so the
/// separating `AND` terminates it instead of binding into it.
pub(crate) const BETWEEN_OPERAND_BP: u8 = 11;

/// Binding power of the unary prefix operators `- ~ ! +`.
pub(crate) const UNARY_BP: u8 = 27;

/// Returns the `(left, right)` binding power of an infix operator
/// token, or `None` when the token cannot continue an expression.
pub(crate) fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    let bp = match kind {
        TokenKind::Keyword(Keyword::Or) | TokenKind::OrOr => (1, 2),
        TokenKind::Keyword(Keyword::Xor) => (3, 4),
        TokenKind::Keyword(Keyword::And) | TokenKind::AndAnd => (5, 6),

        TokenKind::Eq
        | TokenKind::NullSafeEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq
        | TokenKind::NotEq
        | TokenKind::Keyword(
            Keyword::Is
            | Keyword::Like
            | Keyword::Regexp
            | Keyword::Rlike
            | Keyword::In
            | Keyword::Between,
        ) => COMPARISON_BP,

        TokenKind::Pipe => (13, 14),
        TokenKind::Amp => (15, 16),
        TokenKind::ShiftLeft | TokenKind::ShiftRight => (17, 18),
        TokenKind::Plus | TokenKind::Minus => (19, 20),
        TokenKind::Keyword(Keyword::Div | Keyword::Mod) | TokenKind::Percent => (21, 22),
        TokenKind::Star | TokenKind::Slash => (23, 24),
        TokenKind::Caret => (25, 26),
        TokenKind::Keyword(Keyword::Collate) => (29, 30),
        _ => return None,
    };
    Some(bp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_ordered() {
        let or = infix_binding_power(&TokenKind::Keyword(Keyword::Or)).unwrap();
        let and = infix_binding_power(&TokenKind::Keyword(Keyword::And)).unwrap();
        let cmp = infix_binding_power(&TokenKind::Eq).unwrap();
        let add = infix_binding_power(&TokenKind::Plus).unwrap();
        let int_div = infix_binding_power(&TokenKind::Keyword(Keyword::Div)).unwrap();
        let mul = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(or.0 < and.0);
        assert!(and.0 < cmp.0);
        assert!(cmp.0 < add.0);
        assert!(add.0 < int_div.0);
        assert!(int_div.0 < mul.0);
        assert!(mul.0 < UNARY_BP);
    }

    #[test]
    fn test_not_an_operator() {
        assert!(infix_binding_power(&TokenKind::Comma).is_none());
        assert!(infix_binding_power(&TokenKind::Keyword(Keyword::From)).is_none());
    }
}
