//! Search-term highlighting for rendered result text

use serde::Serialize;

/// A run of text, flagged when it matched the search term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

/// Split `text` into matched and unmatched runs of `term`.
///
/// Matching is case-insensitive and non-overlapping, scanning left to right.
/// A blank term yields the whole text as a single unmatched segment.
/// Concatenating the segments always reproduces `text`.
pub fn highlight<'a>(text: &'a str, term: &str) -> Vec<Segment<'a>> {
    let needle: Vec<char> = term.trim().chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() || text.is_empty() {
        return unmatched(text);
    }

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while cursor < text.len() {
        match match_len(&text[cursor..], &needle) {
            Some(len) => {
                if plain_start < cursor {
                    segments.push(Segment {
                        text: &text[plain_start..cursor],
                        matched: false,
                    });
                }
                segments.push(Segment {
                    text: &text[cursor..cursor + len],
                    matched: true,
                });
                cursor += len;
                plain_start = cursor;
            }
            None => {
                cursor += text[cursor..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < text.len() {
        segments.push(Segment {
            text: &text[plain_start..],
            matched: false,
        });
    }
    segments
}

fn unmatched(text: &str) -> Vec<Segment<'_>> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Segment {
            text,
            matched: false,
        }]
    }
}

/// Byte length of the prefix of `haystack` whose lowercase form equals `needle`
fn match_len(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, ch) in haystack.char_indices() {
        for lower in ch.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(offset + ch.len_utf8());
        }
    }
    None
}
