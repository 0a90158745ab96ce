use crate::r#move::Move;

/// `"e2e4"`, `"e7e8q"` for a promotion. No disambiguation, no check marks —
/// UCI moves are unambiguous by construction.
pub fn move_to_uci(mv: Move) -> String {
    let mut s = format!("{}{}", mv.from(), mv.to());
    if let Some(promo) = mv.promotion() {
        s.push(promo.uci_letter());
    }
    s
}
