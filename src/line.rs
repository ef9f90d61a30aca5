//! The `LineBuffer` collects the bytes of one line as it is read, after the
//! `LinePolicy` has dropped the bytes outside its character class and
//! transformed the rest.
//!
//! Character classes and transforms work on single bytes, with the meaning
//! the C library gives them in the "C" locale. Bytes outside ASCII belong to
//! no class and are never transformed.
use clap::ValueEnum;

use crate::error::{Error, Result};
use crate::seq::{reserve_exact, Seq};

/// The named character classes a line can be filtered by
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CharClass {
    /// Letters and digits
    #[value(name = "isalnum")]
    Alnum,
    /// Letters
    #[value(name = "isalpha")]
    Alpha,
    /// Space and tab
    #[value(name = "isblank")]
    Blank,
    /// Control characters
    #[value(name = "iscntrl")]
    Cntrl,
    /// Decimal digits
    #[value(name = "isdigit")]
    Digit,
    /// Printable characters other than space
    #[value(name = "isgraph")]
    Graph,
    /// Lowercase letters
    #[value(name = "islower")]
    Lower,
    /// Printable characters, space included
    #[value(name = "isprint")]
    Print,
    /// Printable characters that are neither letters, digits nor space
    #[value(name = "ispunct")]
    Punct,
    /// Space, tab, newline, vertical tab, form feed and carriage return
    #[value(name = "isspace")]
    Space,
    /// Uppercase letters
    #[value(name = "isupper")]
    Upper,
    /// Hexadecimal digits
    #[value(name = "isxdigit")]
    Xdigit,
}

impl CharClass {
    /// Looks up a class by its C name (`"isdigit"`, `"isspace"`, ...)
    pub fn from_name(name: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(name, false)
            .map_err(|_| Error::InvalidOption(format!("unknown character class `{name}`")))
    }

    /// Does `byte` belong to the class?
    #[must_use]
    pub fn contains(self, byte: u8) -> bool {
        match self {
            CharClass::Alnum => byte.is_ascii_alphanumeric(),
            CharClass::Alpha => byte.is_ascii_alphabetic(),
            CharClass::Blank => byte == b' ' || byte == b'\t',
            CharClass::Cntrl => byte.is_ascii_control(),
            CharClass::Digit => byte.is_ascii_digit(),
            CharClass::Graph => byte.is_ascii_graphic(),
            CharClass::Lower => byte.is_ascii_lowercase(),
            CharClass::Print => byte.is_ascii_graphic() || byte == b' ',
            CharClass::Punct => byte.is_ascii_punctuation(),
            // `u8::is_ascii_whitespace` leaves out the vertical tab
            CharClass::Space => matches!(byte, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r'),
            CharClass::Upper => byte.is_ascii_uppercase(),
            CharClass::Xdigit => byte.is_ascii_hexdigit(),
        }
    }
}

/// The named transforms applied to each byte kept in a line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Transform {
    /// Map a-z to A-Z
    Uppercase,
    /// Map A-Z to a-z
    Lowercase,
}

impl Transform {
    /// Looks up a transform by name (`"uppercase"` or `"lowercase"`)
    pub fn from_name(name: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(name, false)
            .map_err(|_| Error::InvalidOption(format!("unknown transform `{name}`")))
    }

    /// The transformed byte
    #[must_use]
    pub fn apply(self, byte: u8) -> u8 {
        match self {
            Transform::Uppercase => byte.to_ascii_uppercase(),
            Transform::Lowercase => byte.to_ascii_lowercase(),
        }
    }
}

/// What happens to each byte before it is added to a line: bytes outside
/// `filter` are dropped, and `transform` is applied to the others.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinePolicy {
    /// Keep only the bytes in this class
    pub filter: Option<CharClass>,
    /// Transform each kept byte
    pub transform: Option<Transform>,
}

impl LinePolicy {
    /// `None` if `byte` is filtered out, otherwise the byte to store
    #[must_use]
    pub fn admit(self, byte: u8) -> Option<u8> {
        if let Some(class) = self.filter {
            if !class.contains(byte) {
                return None;
            }
        }
        Some(match self.transform {
            Some(transform) => transform.apply(byte),
            None => byte,
        })
    }
}

/// The bytes of the line being read. The buffer is cleared, not
/// reallocated, between lines.
#[derive(Debug)]
pub struct LineBuffer {
    bytes: Seq<u8>,
}

impl LineBuffer {
    /// An empty buffer
    pub fn new() -> Result<Self> {
        Ok(LineBuffer { bytes: Seq::empty()? })
    }

    /// Appends `byte` as is
    pub fn push(&mut self, byte: u8) -> Result<()> {
        self.bytes.push(byte)
    }

    /// Appends what `policy` makes of `byte`, if anything
    pub fn push_with(&mut self, byte: u8, policy: LinePolicy) -> Result<()> {
        match policy.admit(byte) {
            Some(byte) => self.push(byte),
            None => Ok(()),
        }
    }

    /// The line's content so far
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Length of the content
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Has nothing been kept yet?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// An owned copy of the content, sized exactly, to serve as a map key
    /// for the rest of the run
    pub fn to_key(&self) -> Result<Box<[u8]>> {
        let mut key = Vec::new();
        reserve_exact(&mut key, self.len())?;
        key.extend_from_slice(self.as_bytes());
        Ok(key.into_boxed_slice())
    }

    /// Forgets the content, ready for the next line
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

#[allow(clippy::pedantic)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::seq::fault;

    fn line_through(policy: LinePolicy, text: &[u8]) -> Vec<u8> {
        let mut line = LineBuffer::new().unwrap();
        for &b in text {
            line.push_with(b, policy).unwrap();
        }
        line.as_bytes().to_vec()
    }

    #[test]
    fn a_digit_filter_keeps_only_digits() {
        let policy = LinePolicy { filter: Some(CharClass::Digit), transform: None };
        assert_eq!(line_through(policy, b"ab12cd"), b"12");
    }

    #[test]
    fn uppercase_transforms_every_letter() {
        let policy = LinePolicy { filter: None, transform: Some(Transform::Uppercase) };
        assert_eq!(line_through(policy, b"abc"), b"ABC");
    }

    #[test]
    fn the_filter_sees_the_byte_before_the_transform() {
        let policy =
            LinePolicy { filter: Some(CharClass::Lower), transform: Some(Transform::Uppercase) };
        assert_eq!(line_through(policy, b"aBc-D"), b"AC");
    }

    #[test]
    fn the_default_policy_keeps_every_byte() {
        assert_eq!(line_through(LinePolicy::default(), b"a \t\xE9Z"), b"a \t\xE9Z");
    }

    #[test]
    fn classes_follow_the_c_locale() {
        assert!(CharClass::Space.contains(b'\x0B'));
        assert!(CharClass::Space.contains(b'\r'));
        assert!(!CharClass::Blank.contains(b'\n'));
        assert!(CharClass::Blank.contains(b'\t'));
        assert!(CharClass::Print.contains(b' '));
        assert!(!CharClass::Graph.contains(b' '));
        assert!(CharClass::Punct.contains(b'~'));
        assert!(!CharClass::Punct.contains(b'a'));
        assert!(CharClass::Cntrl.contains(b'\x7F'));
        assert!(CharClass::Xdigit.contains(b'F'));
        assert!(!CharClass::Xdigit.contains(b'g'));
    }

    #[test]
    fn bytes_outside_ascii_belong_to_no_class_and_are_not_transformed() {
        for class in CharClass::value_variants() {
            assert!(!class.contains(b'\xC3'), "for {class:?}");
        }
        assert_eq!(Transform::Uppercase.apply(b'\xE9'), b'\xE9');
        assert_eq!(Transform::Lowercase.apply(b'\xC9'), b'\xC9');
    }

    #[test]
    fn names_select_classes_and_transforms() {
        assert_eq!(CharClass::from_name("isxdigit").unwrap(), CharClass::Xdigit);
        assert_eq!(Transform::from_name("uppercase").unwrap(), Transform::Uppercase);
        assert!(matches!(CharClass::from_name("isvowel"), Err(Error::InvalidOption(_))));
        assert!(matches!(Transform::from_name("titlecase"), Err(Error::InvalidOption(_))));
    }

    #[test]
    fn a_key_outlives_the_cleared_buffer() {
        let mut line = LineBuffer::new().unwrap();
        for &b in b"hello" {
            line.push(b).unwrap();
        }
        let key = line.to_key().unwrap();
        line.clear();
        assert!(line.is_empty());
        assert_eq!(&key[..], b"hello");
    }

    #[test]
    fn copying_a_key_can_run_out_of_memory() {
        let mut line = LineBuffer::new().unwrap();
        line.push(b'x').unwrap();
        fault::fail_after(0);
        let result = line.to_key();
        fault::reset();
        assert!(matches!(result, Err(Error::OutOfMemory)));
        assert_eq!(line.as_bytes(), b"x");
    }
}
