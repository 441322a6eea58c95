//! Fixed-size byte chunking.
//!
//! A file's bytes are cut into windows of `chunk_size` bytes starting at
//! offset 0; only the last window may be shorter. Windows are cut on byte
//! offsets, not character boundaries, so a multi-byte UTF-8 character that
//! straddles a boundary decodes to U+FFFD on both sides.

use std::borrow::Cow;
use std::iter::FusedIterator;

use textload_core::{Error, Result, DEFAULT_CHUNK_SIZE};

/// Number of sections `len` bytes produce at `chunk_size` bytes per section.
pub fn expected_section_count(len: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    len.div_ceil(chunk_size)
}

/// Splits byte buffers into numbered fixed-size sections.
#[derive(Debug, Clone, Copy)]
pub struct ByteChunker {
    chunk_size: usize,
}

impl Default for ByteChunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ByteChunker {
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Lazily iterate the sections of `bytes`, numbered from 1.
    pub fn sections<'a>(&self, bytes: &'a [u8]) -> Sections<'a> {
        Sections {
            inner: bytes.chunks(self.chunk_size),
            next_number: 1,
        }
    }
}

/// One undecoded window of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSection<'a> {
    /// 1-based position within the file.
    pub number: u32,
    pub bytes: &'a [u8],
}

impl<'a> RawSection<'a> {
    /// Decode as UTF-8, substituting U+FFFD for each invalid byte sequence.
    pub fn decode(&self) -> DecodedSection<'a> {
        let mut chunks = self.bytes.utf8_chunks();
        let Some(first) = chunks.next() else {
            return DecodedSection::default();
        };
        // A chunk with no invalid tail is the last one.
        if first.invalid().is_empty() {
            return DecodedSection {
                text: Cow::Borrowed(first.valid()),
                replaced: 0,
            };
        }

        let mut text = String::with_capacity(self.bytes.len() + 2);
        let mut replaced = 0;
        for chunk in std::iter::once(first).chain(chunks) {
            text.push_str(chunk.valid());
            if !chunk.invalid().is_empty() {
                text.push(char::REPLACEMENT_CHARACTER);
                replaced += 1;
            }
        }
        DecodedSection {
            text: Cow::Owned(text),
            replaced,
        }
    }
}

/// Text of one section plus the substitutions made while decoding it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedSection<'a> {
    pub text: Cow<'a, str>,
    /// Number of U+FFFD characters inserted for invalid byte sequences.
    pub replaced: usize,
}

/// Iterator returned by [`ByteChunker::sections`].
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    inner: std::slice::Chunks<'a, u8>,
    next_number: u32,
}

impl<'a> Iterator for Sections<'a> {
    type Item = RawSection<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.inner.next()?;
        let number = self.next_number;
        self.next_number += 1;
        Some(RawSection { number, bytes })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Sections<'_> {}

impl FusedIterator for Sections<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths(chunker: &ByteChunker, data: &[u8]) -> Vec<usize> {
        chunker.sections(data).map(|s| s.bytes.len()).collect()
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(ByteChunker::new(0), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_chunk_size() {
        assert_eq!(ByteChunker::default().chunk_size(), 1024);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let chunker = ByteChunker::default();
        assert_eq!(chunker.sections(b"").count(), 0);
        assert_eq!(expected_section_count(0, 1024), 0);
    }

    #[test]
    fn test_report_sized_input() {
        let chunker = ByteChunker::default();
        let data = vec![b'a'; 2500];
        assert_eq!(lengths(&chunker, &data), vec![1024, 1024, 452]);
    }

    #[test]
    fn test_exact_multiple_has_full_last_section() {
        let chunker = ByteChunker::default();
        let data = vec![b'z'; 2048];
        assert_eq!(lengths(&chunker, &data), vec![1024, 1024]);
    }

    #[test]
    fn test_section_count_and_sizes_hold_for_small_sizes() {
        for chunk_size in 1..=7 {
            let chunker = ByteChunker::new(chunk_size).unwrap();
            for len in 0..=40 {
                let data: Vec<u8> = (0..len as u8).collect();
                let sizes = lengths(&chunker, &data);

                assert_eq!(sizes.len(), expected_section_count(len, chunk_size));
                assert_eq!(chunker.sections(&data).len(), sizes.len());
                if let Some((last, full)) = sizes.split_last() {
                    assert!(full.iter().all(|&s| s == chunk_size));
                    let tail = len % chunk_size;
                    assert_eq!(*last, if tail == 0 { chunk_size } else { tail });
                }
            }
        }
    }

    #[test]
    fn test_sections_cover_input_in_order() {
        let chunker = ByteChunker::new(10).unwrap();
        let data: Vec<u8> = (0..=255u8).cycle().take(1000 + 7).collect();

        let joined: Vec<u8> = chunker
            .sections(&data)
            .flat_map(|s| s.bytes.iter().copied())
            .collect();
        assert_eq!(joined, data);
    }

    #[test]
    fn test_numbers_are_contiguous_from_one() {
        let chunker = ByteChunker::new(3).unwrap();
        let numbers: Vec<u32> = chunker.sections(b"abcdefghij").map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_valid_utf8_decodes_unchanged() {
        let chunker = ByteChunker::new(6).unwrap();
        let text = "héllo wörld";
        let data = text.as_bytes();

        let decoded = chunker.sections(data).next().unwrap().decode();
        assert_eq!(decoded.text, std::str::from_utf8(&data[..6]).unwrap());
        assert_eq!(decoded.replaced, 0);
        assert!(matches!(decoded.text, Cow::Borrowed(_)));
    }

    #[test]
    fn test_invalid_bytes_become_replacement_char() {
        let section = RawSection {
            number: 1,
            bytes: b"ab\xffcd",
        };
        let decoded = section.decode();
        assert_eq!(decoded.text, "ab\u{FFFD}cd");
        assert_eq!(decoded.replaced, 1);
    }

    #[test]
    fn test_split_character_replaced_on_both_sides() {
        // "é" is C3 A9; put its first byte at the end of the first window.
        let mut data = vec![b'x'; 1023];
        data.extend_from_slice("é".as_bytes());
        data.extend_from_slice(b"yz");

        let chunker = ByteChunker::default();
        let sections: Vec<RawSection<'_>> = chunker.sections(&data).collect();
        assert_eq!(sections.len(), 2);
        let head = sections[0].decode();
        let tail = sections[1].decode();
        assert!(head.text.ends_with('\u{FFFD}'));
        assert_eq!(tail.text, "\u{FFFD}yz");
        assert_eq!(head.replaced, 1);
        assert_eq!(tail.replaced, 1);
    }

    #[test]
    fn test_literal_replacement_char_not_counted() {
        let section = RawSection {
            number: 1,
            bytes: "a\u{FFFD}b".as_bytes(),
        };
        let decoded = section.decode();
        assert_eq!(decoded.replaced, 0);
        assert_eq!(decoded.text, "a\u{FFFD}b");
    }

    #[test]
    fn test_decode_matches_lossy_conversion() {
        let inputs: [&[u8]; 5] = [
            b"",
            b"plain ascii",
            b"\xff\xfe trailing",
            b"mid \xe2\x82 cut \xf0\x9f\x92",
            "caf\u{e9} \u{1F4A9}".as_bytes(),
        ];
        for bytes in inputs {
            let decoded = RawSection { number: 1, bytes }.decode();
            let lossy = String::from_utf8_lossy(bytes);
            assert_eq!(decoded.text, lossy);
            let expected = lossy.matches('\u{FFFD}').count();
            assert_eq!(decoded.replaced, expected);
        }
    }
}
