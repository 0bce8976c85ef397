//! parse document with structure like
//! ```text
//! title1
//!   key1: value1, value2
//!   key2: value3
//! title2
//!   key3: value4; value5
//! ```
//! into HashMap<String, HashMap<String, Option<Vec<Value>>>>. Every key sits on its own line,
//! a value runs up to the next `,`, `;` or end of line and may contain spaces, so an equation
//! like `dy/dx = x * y` is a single value. If a template is given, every title and key of the
//! template is present in the result, keys not found in the document are None.
//! Lines starting with `//`, `#` or `%` are comments.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, line_ending, multispace0, space0},
    combinator::{eof, map, map_res, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type SectionMap = HashMap<String, Option<Vec<Value>>>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// floats and integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// word characters without spaces
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

/// A title is an identifier alone on its line.
fn parse_title(input: &str) -> IResult<&str, String> {
    let mut parser = terminated(parse_identifier, (space0, line_ending));
    parser.parse(input)
}

fn parse_key(input: &str) -> IResult<&str, String> {
    parse_identifier(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    // everything up to a separator or the end of the line
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ';' | '\n' | '\r'));
    let mut value_parser = map_res(value_parser, |s: &str| -> Result<Value, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty value".to_string());
        }
        // Try parsing as different types in order
        if let Ok(val) = s.parse::<i64>() {
            Ok(Value::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(Value::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(Value::Boolean(val))
        } else {
            Ok(Value::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator = delimited(space0, alt((tag(","), tag(";"))), space0);
    let mut value_parser = separated_list0(separator, parse_value);
    value_parser.parse(input)
}

/// `key: value, value` up to the end of the line
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = terminated(
        preceded(
            space0,
            separated_pair(parse_key, colon_separator, parse_value_list),
        ),
        (space0, alt((line_ending, eof))),
    );
    parser.parse(input)
}

/// Parses a section with a title and one or more key-value lines
fn parse_section(input: &str) -> IResult<&str, (String, Vec<(String, Vec<Value>)>)> {
    let mut parser = preceded(
        space0,
        pair(
            parse_title,
            many1(terminated(parse_key_value_pair, multispace0)),
        ),
    );
    parser.parse(input)
}

/// Filters out comment lines (starting with //, # or %) and blank lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire document into a HashMap
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = preceded(multispace0, many1(parse_section));
    let (input, sections) = parser.parse(input)?;

    let mut result = HashMap::new();
    for (title, pairs) in sections {
        let section: &mut SectionMap = result.entry(title).or_default();
        for (key, values) in pairs {
            section.insert(key, Some(values));
        }
    }
    Ok((input, result))
}

/// Parses a document without comments and merges it with a template, ensuring all expected
/// titles and keys exist
pub fn parse_document_as(
    input: &str,
    template: Option<&DocumentMap>,
) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    let mut parsed = match parse_document(&filtered) {
        Ok((remaining, parsed)) => {
            if !remaining.trim().is_empty() {
                return Err(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining
                ));
            }
            parsed
        }
        Err(e) => return Err(format!("Parsing error: {:?}", e)),
    };
    if let Some(template) = template {
        for (title, keys_map) in template {
            let section_map = parsed.entry(title.clone()).or_default();
            for key in keys_map.keys() {
                section_map.entry(key.clone()).or_insert(None);
            }
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{Read, Write};
    use tempfile::tempdir;

    #[test]
    fn test_parse_title() {
        let (remaining, title) = parse_title("equation\n  text: dy/dx = x").unwrap();
        assert_eq!(title, "equation");
        assert_eq!(remaining, "  text: dy/dx = x");

        let (_, title) = parse_title("initial_2  \n").unwrap();
        assert_eq!(title, "initial_2");

        // a key line is not a title
        assert!(parse_title("x0: 1.0\n").is_err());
    }

    #[test]
    fn test_parse_value() {
        let (remaining, value) = parse_value("dy/dx = x * y, next").unwrap();
        assert_eq!(value, Value::String("dy/dx = x * y".to_string()));
        assert_eq!(remaining, ", next");

        let (_, value) = parse_value("160\n").unwrap();
        assert_eq!(value, Value::Integer(160));
        let (_, value) = parse_value("-0.5;").unwrap();
        assert_eq!(value, Value::Float(-0.5));
        let (_, value) = parse_value("true").unwrap();
        assert_eq!(value, Value::Boolean(true));
        assert!(parse_value("   \n").is_err());
    }

    #[test]
    fn test_parse_value_list() {
        let (remaining, values) = parse_value_list("info, 1 ; 2.5\nrest").unwrap();
        assert_eq!(
            values,
            vec![
                Value::String("info".to_string()),
                Value::Integer(1),
                Value::Float(2.5)
            ]
        );
        assert_eq!(remaining, "\nrest");

        let (remaining, values) = parse_value_list("\n").unwrap();
        assert_eq!(values, Vec::<Value>::new());
        assert_eq!(remaining, "\n");
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, values)) =
            parse_key_value_pair("  text : dy/dx = x + y\n  x0: 1").unwrap();
        assert_eq!(key, "text");
        assert_eq!(values, vec![Value::String("dy/dx = x + y".to_string())]);
        assert_eq!(remaining, "  x0: 1");

        let (remaining, (key, values)) = parse_key_value_pair("steps: 160").unwrap();
        assert_eq!(key, "steps");
        assert_eq!(values, vec![Value::Integer(160)]);
        assert_eq!(remaining, "");

        let (_, (key, values)) = parse_key_value_pair("csv:\n").unwrap();
        assert_eq!(key, "csv");
        assert!(values.is_empty());
    }

    #[test]
    fn test_parse_section() {
        let input = "initial\n  x0: 0.5\n  y0: 2\nsampler\n  span: 4";
        let (remaining, (title, pairs)) = parse_section(input).unwrap();
        assert_eq!(title, "initial");
        assert_eq!(
            pairs,
            vec![
                ("x0".to_string(), vec![Value::Float(0.5)]),
                ("y0".to_string(), vec![Value::Integer(2)])
            ]
        );
        assert_eq!(remaining, "sampler\n  span: 4");
    }

    #[test]
    fn test_parse_document() {
        let input = "equation\n text: dy/dx = x*y\ninitial\n x0: 0\n y0: 1.5\noutput\n loglevel: warn\n";
        let (remaining, doc) = parse_document(input).unwrap();
        assert_eq!(remaining, "");
        assert_eq!(doc.len(), 3);
        assert_eq!(
            doc["equation"]["text"],
            Some(vec![Value::String("dy/dx = x*y".to_string())])
        );
        assert_eq!(doc["initial"]["y0"], Some(vec![Value::Float(1.5)]));
        assert_eq!(
            doc["output"]["loglevel"],
            Some(vec![Value::String("warn".to_string())])
        );
    }

    #[test]
    fn test_parse_document_empty() {
        assert!(parse_document("").is_err());
        assert!(parse_document_as("// only a comment\n", None).is_err());
    }

    #[test]
    fn test_parse_document_with_comments_and_template() {
        let input = r#"
        // task file
        equation
          # the equation itself
          text: dy/dx = x + y

        % sampler settings
        sampler
          steps: 80
        "#;
        let mut template = DocumentMap::new();
        let mut sampler = SectionMap::new();
        sampler.insert("span".to_string(), None);
        sampler.insert("steps".to_string(), None);
        template.insert("sampler".to_string(), sampler);
        template.insert("output".to_string(), SectionMap::new());

        let doc = parse_document_as(input, Some(&template)).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc["sampler"]["steps"], Some(vec![Value::Integer(80)]));
        assert_eq!(doc["sampler"]["span"], None);
        assert!(doc["output"].is_empty());
        assert_eq!(
            doc["equation"]["text"].as_ref().unwrap()[0].as_string().unwrap(),
            "dy/dx = x + y"
        );
    }

    #[test]
    fn test_parse_document_malformed() {
        let input = "equation\n text: dy/dx = x\n this line has no colon\n";
        assert!(parse_document_as(input, None).is_err());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
        assert_eq!(Value::Float(0.5).as_float(), Some(0.5));
        assert_eq!(Value::Float(0.5).as_integer(), None);
        assert_eq!(Value::Boolean(true).as_boolean(), Some(true));
        assert_eq!(Value::String("a".to_string()).as_float(), None);
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_parse_document_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("task.txt");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "equation").unwrap();
        writeln!(file, "  text: dy/dx = 2*x").unwrap();
        writeln!(file, "output").unwrap();
        writeln!(file, "  csv: result.csv").unwrap();

        let mut file = File::open(&file_path).unwrap();
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();

        let doc = parse_document_as(&contents, None).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc["output"]["csv"],
            Some(vec![Value::String("result.csv".to_string())])
        );
    }
}
