//! Textual codec for the dialect's type syntax.
//!
//! Surface forms:
//!
//! - integers: `i8` (signless), `si8` (signed), `ui8` (unsigned)
//! - arrays: `array<4xi8>` — exactly one dimension
//! - mutable storage: `inout<i8>`
//!
//! Parsing validates through the registry's constructors, so an invalid
//! element type is reported at the parse location and yields no type.
//! Printing is the syntactic inverse: `parse(print(t)) == t` for every
//! valid `t`.

use crate::ids::TypeId;
use crate::types::{Signedness, Type, TypeDb, TypeError};
use kairo_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use kairo_source::{FileId, Span};
use std::fmt;

/// An error produced while parsing a type.
///
/// All variants are recoverable at the call site: the parse yields no type
/// and, except for [`UnrecognizedMnemonic`](ParseError::UnrecognizedMnemonic),
/// a diagnostic has been emitted at the offending location.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The array dimension list had zero or more than one entry.
    #[error("array type supports exactly one dimension")]
    UnsupportedDimensionality {
        /// The location of the dimension list.
        span: Span,
    },
    /// The leading keyword is not a type this dialect owns. Not an error for
    /// this component — the caller should try another codec. No diagnostic
    /// is emitted.
    #[error("unrecognized type mnemonic")]
    UnrecognizedMnemonic {
        /// The location of the mnemonic.
        span: Span,
    },
    /// Malformed type syntax.
    #[error("{message}")]
    Syntax {
        /// Description of what was expected.
        message: String,
        /// The offending location.
        span: Span,
    },
    /// The registry rejected an element type during construction.
    #[error(transparent)]
    InvalidElementType(#[from] TypeError),
}

/// Diagnostic code for an element type failing the value-type predicate.
const INVALID_ELEMENT: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 301,
};
/// Diagnostic code for an array dimension list that is not exactly one entry.
const BAD_DIMENSIONS: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 302,
};
/// Diagnostic code for generally malformed type syntax.
const BAD_SYNTAX: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 303,
};

/// Parses the textual form of a dialect type, interning it into `db`.
///
/// The whole of `src` must be consumed by the type. Validation failures and
/// malformed syntax are emitted to `sink` at their source location and
/// propagate as `Err`; an unrecognized leading mnemonic returns
/// [`ParseError::UnrecognizedMnemonic`] without emitting anything, so the
/// caller can treat the input as belonging to another dialect.
pub fn parse_type(
    src: &str,
    file: FileId,
    db: &mut TypeDb,
    sink: &DiagnosticSink,
) -> Result<TypeId, ParseError> {
    let mut parser = Parser {
        src: src.as_bytes(),
        pos: 0,
        file,
        db,
        sink,
    };
    let ty = parser.parse(0)?;
    parser.skip_whitespace();
    if parser.pos < parser.src.len() {
        let span = parser.span_from(parser.pos);
        return Err(parser.syntax_error("expected end of type", span));
    }
    Ok(ty)
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    file: FileId,
    db: &'a mut TypeDb,
    sink: &'a DiagnosticSink,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> u8 {
        if self.pos < self.src.len() {
            self.src[self.pos]
        } else {
            0
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    /// Builds a syntax error and emits it to the sink.
    fn syntax_error(&self, message: &str, span: Span) -> ParseError {
        self.sink
            .emit(Diagnostic::error(BAD_SYNTAX, message, span));
        ParseError::Syntax {
            message: message.to_string(),
            span,
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), ParseError> {
        self.skip_whitespace();
        if self.peek() == byte {
            self.pos += 1;
            Ok(())
        } else {
            let span = self.span_from(self.pos);
            Err(self.syntax_error(&format!("expected '{}'", byte as char), span))
        }
    }

    /// Reads a keyword-shaped word: a letter or underscore followed by
    /// alphanumerics and underscores.
    fn word(&mut self) -> (String, Span) {
        self.skip_whitespace();
        let start = self.pos;
        if self.peek().is_ascii_alphabetic() || self.peek() == b'_' {
            self.pos += 1;
            while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
                self.pos += 1;
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos])
            .expect("word bytes are ASCII")
            .to_string();
        (text, self.span_from(start))
    }

    /// Reads a decimal integer.
    fn decimal(&mut self) -> Result<(u64, Span), ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        let span = self.span_from(start);
        if span.is_empty() {
            return Err(self.syntax_error("expected a decimal integer", span));
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).expect("digits are ASCII");
        match text.parse::<u64>() {
            Ok(value) => Ok((value, span)),
            Err(_) => Err(self.syntax_error("integer too large", span)),
        }
    }

    /// Parses one type. `depth` distinguishes the top-level dispatch (where
    /// an unknown mnemonic means "not one of ours") from nested positions
    /// (where it is a hard syntax error).
    fn parse(&mut self, depth: u32) -> Result<TypeId, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let (mnemonic, span) = self.word();
        if mnemonic.is_empty() {
            return Err(self.syntax_error("expected a type", span));
        }
        match mnemonic.as_str() {
            "array" => self.parse_array(start, depth),
            "inout" => self.parse_inout(start, depth),
            _ => {
                if let Some(ty) = parse_int_mnemonic(&mnemonic) {
                    return Ok(self.db.intern(ty));
                }
                if depth == 0 {
                    Err(ParseError::UnrecognizedMnemonic { span })
                } else {
                    Err(self.syntax_error("expected a value type", span))
                }
            }
        }
    }

    /// Parses `<` dims `x` inner `>` after the `array` keyword.
    fn parse_array(&mut self, start: usize, depth: u32) -> Result<TypeId, ParseError> {
        self.expect(b'<')?;

        // Dimension list: decimal integers each followed by `x`. The inner
        // type begins at the first non-digit.
        let mut dims = Vec::new();
        let dims_start = self.pos;
        loop {
            self.skip_whitespace();
            if !self.peek().is_ascii_digit() {
                break;
            }
            let (dim, _) = self.decimal()?;
            self.expect(b'x')?;
            dims.push(dim);
        }
        let dims_span = self.span_from(dims_start);

        let inner = self.parse(depth + 1)?;
        self.expect(b'>')?;
        let span = self.span_from(start);

        if dims.len() != 1 {
            self.sink.emit(
                Diagnostic::error(BAD_DIMENSIONS, "array type supports exactly one dimension", span)
                    .with_label(Label::primary(dims_span, "dimension list here")),
            );
            return Err(ParseError::UnsupportedDimensionality { span: dims_span });
        }
        let size = dims[0];
        if size == 0 {
            return Err(self.syntax_error("array size must be positive", dims_span));
        }
        let size = u32::try_from(size)
            .map_err(|_| self.syntax_error("array size too large", dims_span))?;

        self.db.array_of(inner, size, span).map_err(|err| {
            self.sink.emit(
                Diagnostic::error(INVALID_ELEMENT, "invalid element type for array", span)
                    .with_note("array elements must be value types"),
            );
            err.into()
        })
    }

    /// Parses `<` inner `>` after the `inout` keyword.
    fn parse_inout(&mut self, start: usize, depth: u32) -> Result<TypeId, ParseError> {
        self.expect(b'<')?;
        let inner = self.parse(depth + 1)?;
        self.expect(b'>')?;
        let span = self.span_from(start);

        self.db.inout_of(inner, span).map_err(|err| {
            self.sink.emit(
                Diagnostic::error(INVALID_ELEMENT, "invalid element type for inout", span)
                    .with_note("inout wraps a value type; it cannot nest"),
            );
            err.into()
        })
    }
}

/// Recognizes `i8`/`si8`/`ui8`-shaped integer mnemonics.
fn parse_int_mnemonic(word: &str) -> Option<Type> {
    let (signedness, digits) = if let Some(rest) = word.strip_prefix("si") {
        (Signedness::Signed, rest)
    } else if let Some(rest) = word.strip_prefix("ui") {
        (Signedness::Unsigned, rest)
    } else if let Some(rest) = word.strip_prefix('i') {
        (Signedness::Signless, rest)
    } else {
        return None;
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let width = digits.parse::<u32>().ok()?;
    Some(Type::Int { width, signedness })
}

/// Writes the textual form of a type.
///
/// # Panics
///
/// Panics on aggregate types, which have no textual syntax in this version.
/// Printing is only ever invoked for types this codec itself produced, so an
/// unmatched type indicates a registry or dispatch bug, not a user error.
pub fn write_type(db: &TypeDb, id: TypeId, out: &mut impl fmt::Write) -> fmt::Result {
    match db.get(id) {
        Type::Int { width, signedness } => {
            let prefix = match signedness {
                Signedness::Signless => "i",
                Signedness::Signed => "si",
                Signedness::Unsigned => "ui",
            };
            write!(out, "{prefix}{width}")
        }
        Type::Array { element, size } => {
            write!(out, "array<{size}x")?;
            write_type(db, *element, out)?;
            write!(out, ">")
        }
        Type::InOut { element } => {
            write!(out, "inout<")?;
            write_type(db, *element, out)?;
            write!(out, ">")
        }
        Type::Struct { .. } => unreachable!("aggregate types have no textual syntax"),
    }
}

/// Returns the textual form of a type as a `String`.
///
/// # Panics
///
/// Panics on aggregate types; see [`write_type`].
pub fn print_type(db: &TypeDb, id: TypeId) -> String {
    let mut out = String::new();
    write_type(db, id, &mut out).expect("writing to a String cannot fail");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str, db: &mut TypeDb) -> TypeId {
        let sink = DiagnosticSink::new();
        let ty = parse_type(src, FileId::from_raw(0), db, &sink).unwrap();
        assert!(!sink.has_errors());
        ty
    }

    #[test]
    fn parse_signless_int() {
        let mut db = TypeDb::new();
        let ty = parse_ok("i8", &mut db);
        assert_eq!(ty, db.int(8));
    }

    #[test]
    fn parse_tagged_ints() {
        let mut db = TypeDb::new();
        let si = parse_ok("si16", &mut db);
        let ui = parse_ok("ui32", &mut db);
        assert_eq!(si, db.int_with_signedness(16, Signedness::Signed));
        assert_eq!(ui, db.int_with_signedness(32, Signedness::Unsigned));
    }

    #[test]
    fn parse_array() {
        let mut db = TypeDb::new();
        let ty = parse_ok("array<4xi8>", &mut db);
        let i8 = db.int(8);
        assert_eq!(db.element_type(ty), Some(i8));
        assert_eq!(db.array_size(ty), Some(4));
    }

    #[test]
    fn parse_nested_array() {
        let mut db = TypeDb::new();
        let outer = parse_ok("array<2xarray<4xi8>>", &mut db);
        let inner = db.element_type(outer).unwrap();
        assert_eq!(db.array_size(outer), Some(2));
        assert_eq!(db.array_size(inner), Some(4));
    }

    #[test]
    fn parse_inout() {
        let mut db = TypeDb::new();
        let ty = parse_ok("inout<i8>", &mut db);
        let i8 = db.int(8);
        assert_eq!(db.element_type(ty), Some(i8));
        assert!(!db.is_value_type(ty));
    }

    #[test]
    fn parse_inout_of_array() {
        let mut db = TypeDb::new();
        let ty = parse_ok("inout<array<4xi8>>", &mut db);
        let arr = db.element_type(ty).unwrap();
        assert_eq!(db.array_size(arr), Some(4));
    }

    #[test]
    fn whitespace_is_tolerated() {
        let mut db = TypeDb::new();
        let a = parse_ok("array< 4 x i8 >", &mut db);
        let b = parse_ok("array<4xi8>", &mut db);
        assert_eq!(a, b);
    }

    #[test]
    fn multi_dimension_is_rejected() {
        let mut db = TypeDb::new();
        let sink = DiagnosticSink::new();
        let err = parse_type("array<2x3xi8>", FileId::from_raw(0), &mut db, &sink).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedDimensionality { .. }));
        assert!(sink.has_errors());
    }

    #[test]
    fn zero_dimensions_is_rejected() {
        let mut db = TypeDb::new();
        let sink = DiagnosticSink::new();
        let err = parse_type("array<i8>", FileId::from_raw(0), &mut db, &sink).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedDimensionality { .. }));
        assert!(sink.has_errors());
    }

    #[test]
    fn array_of_inout_is_rejected_with_diagnostic() {
        let mut db = TypeDb::new();
        let sink = DiagnosticSink::new();
        let err =
            parse_type("array<4xinout<i8>>", FileId::from_raw(0), &mut db, &sink).unwrap_err();
        assert!(matches!(err, ParseError::InvalidElementType(_)));
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(format!("{}", diags[0].code), "E301");
    }

    #[test]
    fn nested_inout_is_rejected() {
        let mut db = TypeDb::new();
        let sink = DiagnosticSink::new();
        let err = parse_type("inout<inout<i8>>", FileId::from_raw(0), &mut db, &sink).unwrap_err();
        assert!(matches!(err, ParseError::InvalidElementType(_)));
        assert!(sink.has_errors());
    }

    #[test]
    fn unrecognized_mnemonic_is_silent() {
        let mut db = TypeDb::new();
        let sink = DiagnosticSink::new();
        let err = parse_type("signal<i8>", FileId::from_raw(0), &mut db, &sink).unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedMnemonic { .. }));
        assert!(sink.diagnostics().is_empty());
        assert_eq!(db.len(), 0);
    }

    #[test]
    fn nested_unknown_type_is_a_syntax_error() {
        let mut db = TypeDb::new();
        let sink = DiagnosticSink::new();
        let err = parse_type("array<4xwire>", FileId::from_raw(0), &mut db, &sink).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
        assert!(sink.has_errors());
    }

    #[test]
    fn zero_size_array_is_rejected() {
        let mut db = TypeDb::new();
        let sink = DiagnosticSink::new();
        let err = parse_type("array<0xi8>", FileId::from_raw(0), &mut db, &sink).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let mut db = TypeDb::new();
        let sink = DiagnosticSink::new();
        let err = parse_type("i8>", FileId::from_raw(0), &mut db, &sink).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn print_forms() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        let si4 = db.int_with_signedness(4, Signedness::Signed);
        let arr = db.array_of(i8, 4, Span::DUMMY).unwrap();
        let nested = db.array_of(arr, 2, Span::DUMMY).unwrap();
        let io = db.inout_of(arr, Span::DUMMY).unwrap();
        assert_eq!(print_type(&db, i8), "i8");
        assert_eq!(print_type(&db, si4), "si4");
        assert_eq!(print_type(&db, arr), "array<4xi8>");
        assert_eq!(print_type(&db, nested), "array<2xarray<4xi8>>");
        assert_eq!(print_type(&db, io), "inout<array<4xi8>>");
    }

    #[test]
    fn parse_print_roundtrip() {
        let mut db = TypeDb::new();
        let sink = DiagnosticSink::new();
        for src in [
            "i1",
            "i8",
            "si16",
            "ui32",
            "array<4xi8>",
            "array<2xarray<4xi8>>",
            "inout<i8>",
            "inout<array<16xi1>>",
        ] {
            let ty = parse_type(src, FileId::from_raw(0), &mut db, &sink).unwrap();
            assert_eq!(print_type(&db, ty), src);
            let again = parse_type(
                &print_type(&db, ty),
                FileId::from_raw(0),
                &mut db,
                &sink,
            )
            .unwrap();
            assert_eq!(again, ty);
        }
        assert!(!sink.has_errors());
    }
}
