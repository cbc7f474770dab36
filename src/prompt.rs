//! Text prompts sent to the image API.

use crate::deck::{CardKind, CardSpec, Color};

const BASE_STYLE: &str = "cute bible illustration, cartoon style for children, soft shading, \
     bright colors, clean outlines, wholesome, friendly faces, high quality, \
     no text overlay, simple background";

struct Theme {
    concepts: &'static [&'static str],
}

// Stories of Jesus
const RED: Theme = Theme {
    concepts: &[
        "Jesus welcoming children in a sunny park",
        "Sermon on the Mount with smiling crowd",
        "Calming the storm gently while disciples watch",
        "Feeding the five thousand with bread and fish",
        "Walking on water in a peaceful sea scene",
        "Healing a child with kind smile, indoors",
        "Nativity with baby in manger and friendly animals",
        "Good Shepherd carrying a lamb on green hills",
        "Calling the disciples by the seaside",
        "Triumphal entry with children waving branches",
    ],
};

// Old Testament heroes
const YELLOW: Theme = Theme {
    concepts: &[
        "Moses parting the Red Sea, joyful style",
        "David with sling facing Goliath playfully",
        "Noah with animals near a bright rainbow",
        "Abraham looking at stars with Isaac",
        "Joseph with colorful coat smiling",
        "Jonah near a big friendly fish",
        "Daniel in the lions' den with cuddly lions",
        "Queen Esther brave before the king",
        "Ruth gathering wheat joyfully",
        "Young Samuel listening to God at night",
    ],
};

// Parables of Jesus
const GREEN: Theme = Theme {
    concepts: &[
        "Good Samaritan helping traveler on the road",
        "Wise and foolish builders, sun vs. rain",
        "Lost sheep found by smiling shepherd",
        "Mustard seed growing into a tree with birds",
        "Prodigal son hugged by his father happily",
        "Ten bridesmaids with glowing lamps",
        "Hidden treasure found in a field",
        "Pearl of great price in hands",
        "Sower scattering seeds with sprouts",
        "Vine and branches full of fruit",
    ],
};

// Miracles & key moments
const BLUE: Theme = Theme {
    concepts: &[
        "Multiplication of loaves picnic scene",
        "Healing of a blind man with happy crowd",
        "Raising Jairus's daughter gently",
        "Cleansing of a leper with gratitude",
        "Paralytic lowered through roof playfully",
        "Water turned into wine at Cana",
        "Miraculous catch of fish with nets",
        "Mary and Martha welcoming Jesus",
        "Zacchaeus waving from a tree branch",
        "Peter rescued from sinking, gentle help",
    ],
};

// Great moments of the Bible
const WILD: Theme = Theme {
    concepts: &[
        "Creation with sun, moon and smiling animals",
        "Empty tomb at sunrise, hopeful scene",
        "Pentecost with friendly flames above people",
        "Shining New Jerusalem with the river of life",
        "Ark of the Covenant stylized and bright",
        "Burning bush with warm glow",
        "Jacob's ladder with playful angels",
        "Baptism in the Jordan, peaceful waters",
    ],
};

fn theme(color: Color) -> &'static Theme {
    match color {
        Color::Red => &RED,
        Color::Yellow => &YELLOW,
        Color::Green => &GREEN,
        Color::Blue => &BLUE,
        Color::Wild => &WILD,
    }
}

fn color_hint(color: Color) -> &'static str {
    match color {
        Color::Red => "primary accent red tones",
        Color::Yellow => "primary accent yellow tones",
        Color::Green => "primary accent green tones",
        Color::Blue => "primary accent blue tones",
        Color::Wild => "balanced rainbow accents",
    }
}

/// Picks the illustration concept for a card.
///
/// Wild and wild draw four cards share one list: the eight copies map onto
/// the eight concepts so every wild card gets its own scene.
pub fn concept_for(card: &CardSpec) -> &'static str {
    let concepts = theme(card.color).concepts;
    let index = match card.kind {
        CardKind::Number(n) => n as usize,
        CardKind::Wild => card.copy.saturating_sub(1) as usize * 2,
        CardKind::WildDrawFour => card.copy.saturating_sub(1) as usize * 2 + 1,
        _ => card.copy as usize,
    };
    concepts[index % concepts.len()]
}

pub fn prompt_for(card: &CardSpec) -> String {
    format!(
        "{}, {}, {}",
        concept_for(card),
        BASE_STYLE,
        color_hint(card.color)
    )
}
