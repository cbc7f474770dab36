use std::fmt;

/// Number of cards in a complete deck.
pub const DECK_SIZE: usize = 108;

const SUITS: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

// Composition table: copies per suit, and colourless copies for the wilds.
const ZERO_COPIES: u8 = 1;
const NUMBER_COPIES: u8 = 2; // ranks 1-9
const ACTION_COPIES: u8 = 2; // skip, reverse, draw two
const WILD_COPIES: u8 = 4; // wild, wild draw four

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    Wild,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Wild => "wild",
        }
    }

    /// Face colour of the card body.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Color::Red => [228, 39, 43],
            Color::Yellow => [253, 187, 48],
            Color::Green => [83, 175, 80],
            Color::Blue => [0, 116, 188],
            Color::Wild => [20, 20, 20],
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl CardKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CardKind::Number(_) => "number",
            CardKind::Skip => "skip",
            CardKind::Reverse => "reverse",
            CardKind::DrawTwo => "draw2",
            CardKind::Wild => "wild",
            CardKind::WildDrawFour => "wild_draw4",
        }
    }
}

/// The glyph printed in the card corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Digit(u8),
    Skip,
    Reverse,
    Star,
    PlusTwo,
    PlusFour,
}

/// One physical card of the deck. `copy` is 1-based and tells duplicates apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardSpec {
    pub color: Color,
    pub kind: CardKind,
    pub copy: u8,
}

impl CardSpec {
    pub fn new(color: Color, kind: CardKind, copy: u8) -> Self {
        CardSpec { color, kind, copy }
    }

    pub fn mark(&self) -> Mark {
        match self.kind {
            CardKind::Number(n) => Mark::Digit(n),
            CardKind::Skip => Mark::Skip,
            CardKind::Reverse => Mark::Reverse,
            CardKind::DrawTwo => Mark::PlusTwo,
            CardKind::Wild => Mark::Star,
            CardKind::WildDrawFour => Mark::PlusFour,
        }
    }

    /// PNG file name, unique within a deck, e.g. `red_number_7-x2.png`.
    pub fn file_name(&self) -> String {
        let mut base = format!("{}_{}", self.color, self.kind.as_str());
        if let CardKind::Number(n) = self.kind {
            base.push_str(&format!("_{}", n));
        }
        format!("{}-x{}.png", base, self.copy)
    }
}

impl fmt::Display for CardSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CardKind::Number(n) => write!(f, "{} {} {}", self.color, self.kind.as_str(), n),
            kind => write!(f, "{} {}", self.color, kind.as_str()),
        }
    }
}

/// Builds the full deck in its fixed output order.
///
/// Zeros for every suit come first, then ranks 1-9 per suit with both copies
/// adjacent, then the action cards per suit, then the wild pairs.
pub fn build_deck() -> Vec<CardSpec> {
    let mut deck = Vec::with_capacity(DECK_SIZE);

    for &color in &SUITS {
        for copy in 1..=ZERO_COPIES {
            deck.push(CardSpec::new(color, CardKind::Number(0), copy));
        }
    }

    for &color in &SUITS {
        for rank in 1..=9 {
            for copy in 1..=NUMBER_COPIES {
                deck.push(CardSpec::new(color, CardKind::Number(rank), copy));
            }
        }
    }

    for &color in &SUITS {
        for copy in 1..=ACTION_COPIES {
            deck.push(CardSpec::new(color, CardKind::Skip, copy));
            deck.push(CardSpec::new(color, CardKind::Reverse, copy));
            deck.push(CardSpec::new(color, CardKind::DrawTwo, copy));
        }
    }

    for copy in 1..=WILD_COPIES {
        deck.push(CardSpec::new(Color::Wild, CardKind::Wild, copy));
        deck.push(CardSpec::new(Color::Wild, CardKind::WildDrawFour, copy));
    }

    debug_assert_eq!(deck.len(), DECK_SIZE);
    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn count(deck: &[CardSpec], color: Color, kind: CardKind) -> usize {
        deck.iter()
            .filter(|c| c.color == color && c.kind == kind)
            .count()
    }

    #[test]
    fn test_deck_size() {
        assert_eq!(build_deck().len(), DECK_SIZE);
    }

    #[test]
    fn test_deck_composition() {
        let deck = build_deck();
        for color in SUITS {
            assert_eq!(count(&deck, color, CardKind::Number(0)), 1);
            for rank in 1..=9 {
                assert_eq!(count(&deck, color, CardKind::Number(rank)), 2);
            }
            assert_eq!(count(&deck, color, CardKind::Skip), 2);
            assert_eq!(count(&deck, color, CardKind::Reverse), 2);
            assert_eq!(count(&deck, color, CardKind::DrawTwo), 2);
            assert_eq!(deck.iter().filter(|c| c.color == color).count(), 25);
        }
        assert_eq!(count(&deck, Color::Wild, CardKind::Wild), 4);
        assert_eq!(count(&deck, Color::Wild, CardKind::WildDrawFour), 4);
    }

    #[test]
    fn test_deck_is_deterministic() {
        assert_eq!(build_deck(), build_deck());
    }

    #[test]
    fn test_deck_order() {
        let deck = build_deck();
        assert_eq!(deck[0], CardSpec::new(Color::Red, CardKind::Number(0), 1));
        assert_eq!(deck[3], CardSpec::new(Color::Blue, CardKind::Number(0), 1));
        assert_eq!(deck[4], CardSpec::new(Color::Red, CardKind::Number(1), 1));
        assert_eq!(deck[5], CardSpec::new(Color::Red, CardKind::Number(1), 2));
        assert_eq!(
            deck[DECK_SIZE - 1],
            CardSpec::new(Color::Wild, CardKind::WildDrawFour, 4)
        );
    }

    #[test]
    fn test_file_names_are_unique() {
        let deck = build_deck();
        let names: HashSet<String> = deck.iter().map(|c| c.file_name()).collect();
        assert_eq!(names.len(), DECK_SIZE);
    }

    #[test]
    fn test_file_name_format() {
        let seven = CardSpec::new(Color::Red, CardKind::Number(7), 2);
        assert_eq!(seven.file_name(), "red_number_7-x2.png");

        let wild = CardSpec::new(Color::Wild, CardKind::WildDrawFour, 3);
        assert_eq!(wild.file_name(), "wild_wild_draw4-x3.png");
    }

    #[test]
    fn test_marks() {
        assert_eq!(
            CardSpec::new(Color::Green, CardKind::Number(4), 1).mark(),
            Mark::Digit(4)
        );
        assert_eq!(
            CardSpec::new(Color::Blue, CardKind::DrawTwo, 1).mark(),
            Mark::PlusTwo
        );
        assert_eq!(
            CardSpec::new(Color::Wild, CardKind::Wild, 1).mark(),
            Mark::Star
        );
    }
}
