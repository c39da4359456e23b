// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fast record scanner using SIMD-accelerated byte searching
//!
//! Finds instance records in the DATA section without decoding their
//! attributes.

use memchr::memchr;

/// An undecoded instance record: `#id=TYPE(...);`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// Instance number
    pub id: u32,
    /// Type name exactly as written
    pub type_name: &'a str,
    /// Byte offset of the leading `#`
    pub start: usize,
    /// Byte offset one past the terminating `;`
    pub end: usize,
}

impl<'a> RawRecord<'a> {
    /// Source text of the record
    pub fn text(&self, content: &'a str) -> &'a str {
        &content[self.start..self.end]
    }
}

/// Scanner over the DATA section of a STEP file
pub struct EntityScanner<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a scanner positioned after the `DATA;` keyword
    ///
    /// Returns `None` when the content has no DATA section.
    pub fn new(content: &'a str) -> Option<Self> {
        let pos = content.find("DATA;")? + "DATA;".len();
        Some(Self { content, pos })
    }

    /// Advance to the next instance record
    pub fn next_record(&mut self) -> Option<RawRecord<'a>> {
        let bytes = self.content.as_bytes();

        while self.pos < bytes.len() {
            let hash_pos = memchr(b'#', &bytes[self.pos..])?;
            self.pos += hash_pos;

            // Instance definitions start a statement; references inside an
            // attribute list never follow a newline, `;` or the section start.
            let prev = self.content[..self.pos]
                .bytes()
                .rev()
                .find(|b| !matches!(b, b' ' | b'\t'));
            let starts_statement = matches!(prev, None | Some(b'\n' | b'\r' | b';'));

            let start = self.pos;
            self.pos += 1;
            if !starts_statement {
                continue;
            }

            let id_len = bytes[self.pos..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count();
            if id_len == 0 {
                continue;
            }
            let Ok(id) = self.content[self.pos..self.pos + id_len].parse::<u32>() else {
                continue;
            };
            self.pos += id_len;

            self.skip_blanks();
            if bytes.get(self.pos) != Some(&b'=') {
                continue;
            }
            self.pos += 1;
            self.skip_blanks();

            let type_len = bytes[self.pos..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                .count();
            if type_len == 0 {
                continue;
            }
            let type_name = &self.content[self.pos..self.pos + type_len];
            self.pos += type_len;

            let end = self.find_record_end()?;
            return Some(RawRecord {
                id,
                type_name,
                start,
                end,
            });
        }

        None
    }

    fn skip_blanks(&mut self) {
        let bytes = self.content.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Find the terminating `;`, skipping quoted strings and comments
    fn find_record_end(&mut self) -> Option<usize> {
        let bytes = self.content.as_bytes();
        let mut in_string = false;

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\'' if in_string && bytes.get(self.pos + 1) == Some(&b'\'') => {
                    self.pos += 2;
                    continue;
                }
                b'\'' => in_string = !in_string,
                b'/' if !in_string && bytes.get(self.pos + 1) == Some(&b'*') => {
                    let close = self.content[self.pos + 2..].find("*/")?;
                    self.pos += close + 4;
                    continue;
                }
                b';' if !in_string => {
                    self.pos += 1;
                    return Some(self.pos);
                }
                _ => {}
            }
            self.pos += 1;
        }

        None
    }
}

impl<'a> Iterator for EntityScanner<'a> {
    type Item = RawRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}
