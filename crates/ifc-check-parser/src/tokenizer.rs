// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP record tokenizer using nom combinators
//!
//! Parses instance records and header records into tokens.

use ifc_check_model::{AttributeValue, DecodedEntity, EntityId, IfcType};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{opt, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair},
    IResult, Parser,
};

/// Raw token from a STEP record (before conversion to AttributeValue)
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Entity reference (#123)
    EntityRef(u32),
    /// String value, still escaped ('it''s')
    String(&'a str),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Enumeration (.VALUE.)
    Enum(&'a str),
    /// List of tokens
    List(Vec<Token<'a>>),
    /// Typed value like IFCLABEL('text')
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value ($)
    Null,
    /// Derived value (*)
    Derived,
}

impl<'a> Token<'a> {
    /// Convert token to owned AttributeValue, unescaping strings
    pub fn to_attribute_value(&self) -> AttributeValue {
        match self {
            Token::EntityRef(id) => AttributeValue::EntityRef(EntityId(*id)),
            Token::String(s) => AttributeValue::String(decode_step_string(s)),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(s) => AttributeValue::Enum((*s).to_string()),
            Token::List(items) => {
                AttributeValue::List(items.iter().map(|t| t.to_attribute_value()).collect())
            }
            Token::TypedValue(name, args) => AttributeValue::TypedValue(
                name.to_ascii_uppercase(),
                args.iter().map(|t| t.to_attribute_value()).collect(),
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }
}

// ============================================================================
// Parsing Primitives
// ============================================================================

/// Parse whitespace and `/* ... */` comments
fn ws(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace0(input)?;
    let (input, _) = many0(pair(
        delimited(tag("/*"), take_until("*/"), tag("*/")),
        multispace0,
    ))
    .parse(input)?;
    Ok((input, ()))
}

/// Parse an entity reference (#123)
fn entity_ref(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('#')(input)?;
    let (input, digits) = take_while1(|c: char| c.is_ascii_digit())(input)?;
    let id = digits.parse::<u32>().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
    })?;
    Ok((input, Token::EntityRef(id)))
}

/// Parse a STEP string ('text' with '' for escaped quotes)
fn step_string(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('\'')(input)?;

    let bytes = input.as_bytes();
    let mut end = 0;
    loop {
        match bytes.get(end) {
            Some(b'\'') if bytes.get(end + 1) == Some(&b'\'') => end += 2,
            Some(b'\'') => break,
            Some(_) => end += 1,
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Char,
                )))
            }
        }
    }

    Ok((&input[end + 1..], Token::String(&input[..end])))
}

/// Parse a number (integer or float)
fn number(input: &str) -> IResult<&str, Token<'_>> {
    let (input, num_str) = recognize((
        opt(alt((char('-'), char('+')))),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))
    .parse(input)?;

    let bad_number =
        |_| nom::Err::Error(nom::error::Error::new(num_str, nom::error::ErrorKind::Float));

    if num_str.contains(['.', 'e', 'E']) {
        let f: f64 = lexical_core::parse(num_str.as_bytes()).map_err(bad_number)?;
        Ok((input, Token::Float(f)))
    } else {
        let i: i64 = lexical_core::parse(num_str.as_bytes()).map_err(bad_number)?;
        Ok((input, Token::Integer(i)))
    }
}

/// Parse an enumeration (.VALUE.)
fn enumeration(input: &str) -> IResult<&str, Token<'_>> {
    let (input, name) = delimited(
        char('.'),
        take_while1(|c: char| c.is_alphanumeric() || c == '_'),
        char('.'),
    )
    .parse(input)?;
    Ok((input, Token::Enum(name)))
}

/// Parse null ($)
fn null_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('$')(input)?;
    Ok((input, Token::Null))
}

/// Parse derived (*)
fn derived_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('*')(input)?;
    Ok((input, Token::Derived))
}

/// Parse a parenthesized, comma-separated token list
fn token_list(input: &str) -> IResult<&str, Vec<Token<'_>>> {
    delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), token),
        pair(ws, char(')')),
    )
    .parse(input)
}

/// Parse a list of tokens
fn list(input: &str) -> IResult<&str, Token<'_>> {
    let (input, items) = token_list(input)?;
    Ok((input, Token::List(items)))
}

/// Parse a typed value like IFCLABEL('text')
fn typed_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, type_name) = keyword(input)?;
    let (input, _) = ws(input)?;
    let (input, args) = token_list(input)?;
    Ok((input, Token::TypedValue(type_name, args)))
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Parse any token
fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        entity_ref,
        step_string,
        null_value,
        derived_value,
        enumeration,
        number,
        list,
        typed_value,
    ))
    .parse(input)
}

// ============================================================================
// Record Parsing
// ============================================================================

/// Parse a complete instance record
///
/// Format: `#123=IFCWALL(attr1,attr2,...);`
pub fn parse_entity(input: &str) -> Result<DecodedEntity, String> {
    let mut record = (
        ws,
        char('#'),
        take_while1(|c: char| c.is_ascii_digit()),
        (ws, char('='), ws),
        keyword,
        ws,
        token_list,
    );

    let (_, (_, _, id_str, _, type_name, _, tokens)) = record
        .parse(input)
        .map_err(|e: nom::Err<nom::error::Error<&str>>| format!("malformed record: {}", e))?;

    let id: u32 = id_str
        .parse()
        .map_err(|_| format!("invalid instance number '{}'", id_str))?;

    Ok(DecodedEntity {
        id: EntityId(id),
        ifc_type: IfcType::parse(type_name),
        attributes: tokens.iter().map(|t| t.to_attribute_value()).collect(),
    })
}

/// Parse a header record such as `FILE_SCHEMA(('IFC4'))`
///
/// Returns the upper-cased record name and its attributes.
pub fn parse_header_record(input: &str) -> Option<(String, Vec<AttributeValue>)> {
    let (_, (_, name, _, tokens)) = (ws, keyword, ws, token_list).parse(input).ok()?;
    Some((
        name.to_ascii_uppercase(),
        tokens.iter().map(|t| t.to_attribute_value()).collect(),
    ))
}

// ============================================================================
// String Decoding
// ============================================================================

/// Decode the ISO 10303-21 string escapes
///
/// Handles doubled quotes and backslashes, `\X2\...\X0\` (UTF-16) and
/// `\X4\...\X0\` (UTF-32) runs, `\X\hh` (ISO 8859-1) and `\S\c` (upper half
/// of the active code page, taken as ISO 8859-1). `\Px\` code page switches
/// are dropped. Malformed escapes are kept verbatim.
pub fn decode_step_string(raw: &str) -> String {
    if !raw.contains(['\\', '\'']) {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(c) = rest.chars().next() {
        if c == '\'' && rest.starts_with("''") {
            out.push('\'');
            rest = &rest[2..];
        } else if c == '\\' {
            let (decoded, consumed) = decode_escape(rest);
            out.push_str(&decoded);
            rest = &rest[consumed..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    out
}

/// Decode one escape at the start of `s`, returning the text and bytes consumed
fn decode_escape(s: &str) -> (String, usize) {
    let hex_run = |body: &str, width: usize| -> Option<String> {
        if !body.is_ascii() || body.len() % width != 0 {
            return None;
        }
        let units = (0..body.len())
            .step_by(width)
            .map(|i| u32::from_str_radix(&body[i..i + width], 16).ok())
            .collect::<Option<Vec<u32>>>()?;
        if width == 4 {
            let units: Vec<u16> = units.into_iter().map(|u| u as u16).collect();
            String::from_utf16(&units).ok()
        } else {
            units.into_iter().map(char::from_u32).collect()
        }
    };

    if s.starts_with("\\\\") {
        return ("\\".to_string(), 2);
    }
    for (prefix, width) in [("\\X2\\", 4), ("\\X4\\", 8)] {
        if let Some(body) = s.strip_prefix(prefix) {
            if let Some(close) = body.find("\\X0\\") {
                if let Some(text) = hex_run(&body[..close], width) {
                    return (text, prefix.len() + close + 4);
                }
            }
        }
    }
    if let Some(hex) = s.strip_prefix("\\X\\").and_then(|b| b.get(..2)) {
        if let Ok(byte) = u8::from_str_radix(hex, 16) {
            return ((byte as char).to_string(), 5);
        }
    }
    if let Some(c) = s.strip_prefix("\\S\\").and_then(|b| b.chars().next()) {
        if c.is_ascii() {
            return (((c as u8 + 0x80) as char).to_string(), 4);
        }
    }
    if s.len() >= 4 && s.starts_with("\\P") && s.as_bytes()[3] == b'\\' {
        return (String::new(), 4);
    }

    ("\\".to_string(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_ref() {
        let (remaining, token) = entity_ref("#123").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::EntityRef(123));
    }

    #[test]
    fn test_parse_string_keeps_escapes_until_decoded() {
        let (remaining, token) = step_string("'it''s a test',").unwrap();
        assert_eq!(remaining, ",");
        assert_eq!(token, Token::String("it''s a test"));
        assert_eq!(
            token.to_attribute_value(),
            AttributeValue::String("it's a test".into())
        );
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        assert!(step_string("'never closed").is_err());
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(number("42").unwrap().1, Token::Integer(42));
        assert_eq!(number("-5").unwrap().1, Token::Integer(-5));
        match number("1.5E-3").unwrap().1 {
            Token::Float(f) => assert!((f - 0.0015).abs() < 1e-12),
            other => panic!("Expected float, got {:?}", other),
        }
        match number("60.").unwrap().1 {
            Token::Float(f) => assert_eq!(f, 60.0),
            other => panic!("Expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_typed_value() {
        let (_, token) = typed_value("IFCLABEL('REI60')").unwrap();
        assert_eq!(
            token,
            Token::TypedValue("IFCLABEL", vec![Token::String("REI60")])
        );
    }

    #[test]
    fn test_parse_entity() {
        let entity =
            parse_entity("#10=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI60'),$);")
                .unwrap();
        assert_eq!(entity.id, EntityId(10));
        assert_eq!(entity.ifc_type, IfcType::IfcPropertySingleValue);
        assert_eq!(entity.attributes.len(), 4);
        assert_eq!(entity.get_string(0), Some("FireRating"));
        assert_eq!(entity.get_string(2), Some("REI60"));
    }

    #[test]
    fn test_parse_entity_with_comment_and_spaces() {
        let entity = parse_entity("#7 = IFCWALL( 'g' , /* owner */ $ , 'W' );").unwrap();
        assert_eq!(entity.ifc_type, IfcType::IfcWall);
        assert_eq!(entity.attributes.len(), 3);
    }

    #[test]
    fn test_parse_malformed_entity() {
        assert!(parse_entity("#7=IFCWALL('g',$").is_err());
        assert!(parse_entity("IFCWALL('g')").is_err());
    }

    #[test]
    fn test_parse_header_record() {
        let (name, attrs) = parse_header_record("FILE_SCHEMA(('IFC4'))").unwrap();
        assert_eq!(name, "FILE_SCHEMA");
        assert_eq!(
            attrs,
            vec![AttributeValue::List(vec![AttributeValue::String("IFC4".into())])]
        );
    }

    #[test]
    fn test_decode_step_string() {
        assert_eq!(decode_step_string("plain"), "plain");
        assert_eq!(decode_step_string("Geb\\X2\\00E4\\X0\\ude"), "Gebäude");
        assert_eq!(decode_step_string("Stra\\X\\DFe"), "Straße");
        assert_eq!(decode_step_string("a\\\\b"), "a\\b");
        assert_eq!(decode_step_string("\\PA\\Level"), "Level");
        assert_eq!(decode_step_string("dangling\\"), "dangling\\");
    }
}
