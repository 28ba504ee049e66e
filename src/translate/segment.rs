//! Utterance segmentation: flat text + entity spans → alternating
//! plain/entity segments.
//!
//! Offsets are character (Unicode scalar) offsets and span ends are
//! inclusive, so a span covers `end - start + 1` characters.

use std::collections::BTreeMap;

use crate::error::SegmentError;
use crate::permutation::EntitySpan;
use crate::target::Segment;

/// Namespace prefix on system entity tags (`sys.number`).
const SYSTEM_TAG_PREFIX: &str = "sys.";

/// Entity reference registered at a start offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRef {
    pub type_tag: String,
    /// `end - start`; the covered text is one character longer.
    pub length: usize,
}

/// Validated start offset → span table.
#[derive(Debug, Clone, Default)]
pub struct SpanIndex {
    spans: BTreeMap<usize, SpanRef>,
}

impl SpanIndex {
    /// Index `spans` for a text of `text_len` characters.
    ///
    /// Rejects inverted, out-of-bounds and overlapping spans. Input order
    /// does not matter.
    pub fn new<'a, I>(text_len: usize, spans: I) -> Result<Self, SegmentError>
    where
        I: IntoIterator<Item = &'a EntitySpan>,
    {
        let mut sorted: Vec<&EntitySpan> = spans.into_iter().collect();
        sorted.sort_by_key(|s| s.start_pos);

        let mut index = BTreeMap::new();
        let mut previous_end: Option<usize> = None;
        for span in sorted {
            let (start, end) = (span.start_pos, span.end_pos);
            if end < start {
                return Err(SegmentError::Inverted { start, end });
            }
            if end >= text_len {
                return Err(SegmentError::OutOfBounds {
                    start,
                    end,
                    len: text_len,
                });
            }
            if let Some(previous_end) = previous_end.filter(|&p| start <= p) {
                return Err(SegmentError::Overlap {
                    start,
                    previous_end,
                });
            }
            previous_end = Some(end);
            index.insert(
                start,
                SpanRef {
                    type_tag: span.type_tag.clone(),
                    length: end - start,
                },
            );
        }
        Ok(Self { spans: index })
    }

    pub fn get(&self, start: usize) -> Option<&SpanRef> {
        self.spans.get(&start)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Split `text` into segments at the given entity spans.
pub fn segment(text: &str, spans: &[EntitySpan]) -> Result<Vec<Segment>, SegmentError> {
    let chars: Vec<char> = text.chars().collect();
    let index = SpanIndex::new(chars.len(), spans)?;
    Ok(segment_indexed(&chars, &index))
}

/// Single left-to-right pass over pre-validated spans.
pub fn segment_indexed(chars: &[char], index: &SpanIndex) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(index.len() * 2 + 1);
    let mut buffer = String::new();
    let mut i = 0;

    while i < chars.len() {
        let Some(span) = index.get(i) else {
            buffer.push(chars[i]);
            i += 1;
            continue;
        };

        flush_plain(&mut buffer, &mut segments);

        let end = i + span.length;
        let sample: String = chars[i..=end].iter().collect();
        segments.push(Segment::Entity {
            text: sample.trim().to_string(),
            meta: format!("@{}", span.type_tag),
            alias: entity_alias(&span.type_tag).to_string(),
        });
        i = end + 1;
    }

    flush_plain(&mut buffer, &mut segments);
    segments
}

fn flush_plain(buffer: &mut String, segments: &mut Vec<Segment>) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        segments.push(Segment::Plain {
            text: trimmed.to_string(),
        });
    }
    buffer.clear();
}

/// Parameter alias for an entity tag: the tag without its system namespace.
pub fn entity_alias(type_tag: &str) -> &str {
    type_tag.strip_prefix(SYSTEM_TAG_PREFIX).unwrap_or(type_tag)
}
