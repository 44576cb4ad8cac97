use crate::model::CardDraft;

/// Separator between a card's front and back within one chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TermDelimiter {
    #[default]
    Tab,
    Comma,
    Dash,
    Newline,
}

impl TermDelimiter {
    pub fn label(self) -> &'static str {
        match self {
            TermDelimiter::Tab => "Tab",
            TermDelimiter::Comma => "Comma",
            TermDelimiter::Dash => "Dash (-)",
            TermDelimiter::Newline => "New line",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            TermDelimiter::Tab => TermDelimiter::Comma,
            TermDelimiter::Comma => TermDelimiter::Dash,
            TermDelimiter::Dash => TermDelimiter::Newline,
            TermDelimiter::Newline => TermDelimiter::Tab,
        }
    }
}

/// Separator between one card's raw text and the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardDelimiter {
    #[default]
    Newline,
    Semicolon,
    DoubleLine,
}

impl CardDelimiter {
    pub fn label(self) -> &'static str {
        match self {
            CardDelimiter::Newline => "New line",
            CardDelimiter::Semicolon => "Semicolon",
            CardDelimiter::DoubleLine => "Double line",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            CardDelimiter::Newline => CardDelimiter::Semicolon,
            CardDelimiter::Semicolon => CardDelimiter::DoubleLine,
            CardDelimiter::DoubleLine => CardDelimiter::Newline,
        }
    }
}

/// Split pasted text into front/back pairs.
///
/// Chunks that don't yield a non-empty trimmed front AND back are dropped,
/// never reported as errors; the preview simply shows fewer cards. For tab,
/// comma and dash the split happens at the first occurrence so the back may
/// itself contain the delimiter. Deterministic for a given input and
/// delimiter choice.
pub fn parse_cards(input: &str, term: TermDelimiter, card: CardDelimiter) -> Vec<CardDraft> {
    let normalized = input.replace("\r\n", "\n");

    let chunks: Vec<&str> = match card {
        CardDelimiter::DoubleLine => normalized.split("\n\n").collect(),
        CardDelimiter::Semicolon => normalized.split(';').collect(),
        CardDelimiter::Newline => normalized.split('\n').collect(),
    };

    let mut cards = Vec::new();
    for chunk in chunks {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }

        let split: Option<(&str, String)> = match term {
            TermDelimiter::Tab => owned_back(chunk.split_once('\t')),
            TermDelimiter::Comma => owned_back(chunk.split_once(',')),
            TermDelimiter::Dash => owned_back(chunk.split_once('-')),
            TermDelimiter::Newline => split_first_line(chunk),
        };

        if let Some((front, back)) = split {
            let front = front.trim();
            let back = back.trim();
            if !front.is_empty() && !back.is_empty() {
                cards.push(CardDraft::new(front, back));
            }
        }
    }

    cards
}

/// First non-blank line is the front; remaining non-blank lines joined with
/// newlines form the back. Only meaningful when the card delimiter is not
/// itself a single newline.
fn split_first_line(chunk: &str) -> Option<(&str, String)> {
    let mut lines = chunk.lines().filter(|line| !line.trim().is_empty());
    let front = lines.next()?;
    let rest: Vec<&str> = lines.collect();
    if rest.is_empty() {
        return None;
    }
    Some((front, rest.join("\n")))
}

fn owned_back<'a>(split: Option<(&'a str, &'a str)>) -> Option<(&'a str, String)> {
    split.map(|(front, back)| (front, back.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(cards: &[CardDraft]) -> Vec<(&str, &str)> {
        cards
            .iter()
            .map(|c| (c.front.as_str(), c.back.as_str()))
            .collect()
    }

    #[test]
    fn test_tab_and_newline() {
        let cards = parse_cards(
            "cat\tgato\ndog\tperro",
            TermDelimiter::Tab,
            CardDelimiter::Newline,
        );
        assert_eq!(pairs(&cards), vec![("cat", "gato"), ("dog", "perro")]);
    }

    #[test]
    fn test_dash_and_semicolon() {
        let cards = parse_cards("a-1;b-2", TermDelimiter::Dash, CardDelimiter::Semicolon);
        assert_eq!(pairs(&cards), vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_back_keeps_extra_delimiters() {
        let cards = parse_cards(
            "greeting,hello, world",
            TermDelimiter::Comma,
            CardDelimiter::Newline,
        );
        assert_eq!(pairs(&cards), vec![("greeting", "hello, world")]);

        let cards = parse_cards(
            "a\tb\tc\td",
            TermDelimiter::Tab,
            CardDelimiter::Newline,
        );
        assert_eq!(pairs(&cards), vec![("a", "b\tc\td")]);
    }

    #[test]
    fn test_dash_splits_at_first_dash_only() {
        let cards = parse_cards(
            "well-known - famous",
            TermDelimiter::Dash,
            CardDelimiter::Newline,
        );
        assert_eq!(pairs(&cards), vec![("well", "known - famous")]);
    }

    #[test]
    fn test_newline_term_with_doubleline_cards() {
        let input = "cat\ngato\n\ndog\nperro\ncanine";
        let cards = parse_cards(input, TermDelimiter::Newline, CardDelimiter::DoubleLine);
        assert_eq!(pairs(&cards), vec![("cat", "gato"), ("dog", "perro\ncanine")]);
    }

    #[test]
    fn test_malformed_chunks_silently_dropped() {
        let input = "cat\tgato\nno delimiter here\n\tonly back\nfront only\t  \ndog\tperro";
        let cards = parse_cards(input, TermDelimiter::Tab, CardDelimiter::Newline);
        assert_eq!(pairs(&cards), vec![("cat", "gato"), ("dog", "perro")]);
    }

    #[test]
    fn test_no_blank_fields_ever_emitted() {
        let inputs = [
            "",
            "\n\n\n",
            ";;;",
            "-\n-\n-",
            "a-\n-b\n - ",
            "\t\t\t",
            "   ,   ",
        ];
        for input in inputs {
            for term in [
                TermDelimiter::Tab,
                TermDelimiter::Comma,
                TermDelimiter::Dash,
                TermDelimiter::Newline,
            ] {
                for card in [
                    CardDelimiter::Newline,
                    CardDelimiter::Semicolon,
                    CardDelimiter::DoubleLine,
                ] {
                    for draft in parse_cards(input, term, card) {
                        assert!(draft.is_complete(), "blank field from {input:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_crlf_normalized() {
        let cards = parse_cards(
            "cat\tgato\r\ndog\tperro",
            TermDelimiter::Tab,
            CardDelimiter::Newline,
        );
        assert_eq!(pairs(&cards), vec![("cat", "gato"), ("dog", "perro")]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let cards = parse_cards(
            "  cat  \t  gato  ",
            TermDelimiter::Tab,
            CardDelimiter::Newline,
        );
        assert_eq!(pairs(&cards), vec![("cat", "gato")]);
    }

    #[test]
    fn test_tab_newline_round_trip() {
        let original = vec![
            CardDraft::new("cat", "gato"),
            CardDraft::new("dog", "perro"),
            CardDraft::new("bird", "pájaro"),
        ];
        let joined: Vec<String> = original
            .iter()
            .map(|c| format!("{}\t{}", c.front, c.back))
            .collect();
        let reparsed = parse_cards(
            &joined.join("\n"),
            TermDelimiter::Tab,
            CardDelimiter::Newline,
        );
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_deterministic() {
        let input = "a,1;b,2;c,3";
        let first = parse_cards(input, TermDelimiter::Comma, CardDelimiter::Semicolon);
        let second = parse_cards(input, TermDelimiter::Comma, CardDelimiter::Semicolon);
        assert_eq!(first, second);
    }

    #[test]
    fn test_delimiter_cycles_cover_all_choices() {
        let mut term = TermDelimiter::Tab;
        let mut seen = vec![term];
        for _ in 0..3 {
            term = term.cycle();
            seen.push(term);
        }
        assert_eq!(seen.len(), 4);
        assert_eq!(term.cycle(), TermDelimiter::Tab);

        let mut card = CardDelimiter::Newline;
        for _ in 0..3 {
            card = card.cycle();
        }
        assert_eq!(card, CardDelimiter::Newline);
    }
}
