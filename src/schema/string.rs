//! String schema validation.
//!
//! This module provides [`StringSchema`] for validating string values with
//! length, pattern, and format constraints.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{ErrorParams, SchemaError};
use crate::path::JsonPath;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::traits::{finish, type_error, ValueValidator};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S+$").expect("valid uri regex"));
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid date regex"));
static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d:([0-5]\d|60)(\.\d+)?([Zz]|[+\-]\d{2}:\d{2})?$")
        .expect("valid time regex")
});
static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid uuid regex")
});
static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(#([0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|(rgba?|hsla?|hwb|lab|lch|oklab|oklch)\([^()]*\))$",
    )
    .expect("valid color regex")
});

/// CSS named colors, plus the `transparent` and `currentcolor` keywords.
const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "currentcolor", "cyan",
    "darkblue", "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "transparent", "turquoise", "violet", "wheat", "white",
    "whitesmoke", "yellow", "yellowgreen",
];

/// A `format` the validator knows how to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Email,
    Uri,
    Date,
    Time,
    DateTime,
    Uuid,
    Ipv4,
    Color,
}

impl StringFormat {
    /// Maps a `format` keyword value; unknown formats are not checked.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "email" => Some(StringFormat::Email),
            "uri" | "url" => Some(StringFormat::Uri),
            "date" => Some(StringFormat::Date),
            "time" => Some(StringFormat::Time),
            "date-time" => Some(StringFormat::DateTime),
            "uuid" => Some(StringFormat::Uuid),
            "ipv4" => Some(StringFormat::Ipv4),
            "color" => Some(StringFormat::Color),
            _ => None,
        }
    }

    /// Returns true if `s` is well-formed.
    pub fn matches(self, s: &str) -> bool {
        match self {
            StringFormat::Email => EMAIL.is_match(s),
            StringFormat::Uri => URI.is_match(s),
            StringFormat::Date => is_date(s),
            StringFormat::Time => TIME.is_match(s),
            StringFormat::DateTime => s
                .split_once(['T', 't', ' '])
                .is_some_and(|(date, time)| is_date(date) && TIME.is_match(time)),
            StringFormat::Uuid => UUID.is_match(s),
            StringFormat::Ipv4 => s.parse::<Ipv4Addr>().is_ok(),
            StringFormat::Color => {
                let trimmed = s.trim();
                COLOR.is_match(trimmed)
                    || NAMED_COLORS
                        .iter()
                        .any(|name| name.eq_ignore_ascii_case(trimmed))
            }
        }
    }
}

fn is_date(s: &str) -> bool {
    let Some(caps) = DATE.captures(s) else {
        return false;
    };
    let field = |i: usize| caps[i].parse::<u32>().unwrap_or(0);
    let (year, month, day) = (field(1), field(2), field(3));
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let days = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if leap => 29,
        2 => 28,
        _ => return false,
    };
    (1..=days).contains(&day)
}

/// A constraint applied to string values.
#[derive(Clone)]
enum StringConstraint {
    MinLength(usize),
    MaxLength(usize),
    Pattern { regex: Regex, pattern_str: String },
    Format { format: StringFormat, name: String },
}

/// A schema for validating string values.
///
/// `StringSchema` validates that values are strings and applies constraints
/// like minimum/maximum length, regex patterns, and formats. All constraint
/// violations are accumulated rather than short-circuiting on the first failure.
///
/// # Example
///
/// ```rust
/// use schema_editor::schema::{StringSchema, ValueValidator};
/// use schema_editor::validation::ValidationContext;
/// use schema_editor::JsonPath;
/// use serde_json::json;
///
/// let schema = StringSchema::new()
///     .min_len(3)
///     .pattern(r"^[a-z]+$")
///     .unwrap();
///
/// // Reports both: too short AND pattern mismatch
/// let result = schema.validate_value(&json!("AB"), &JsonPath::root(), &ValidationContext::detached());
/// assert_eq!(result.into_result().unwrap_err().len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a minimum length constraint, counted in characters.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints.push(StringConstraint::MinLength(min));
        self
    }

    /// Adds a maximum length constraint, counted in characters.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints.push(StringConstraint::MaxLength(max));
        self
    }

    /// Adds a regex pattern constraint.
    ///
    /// Like JSON Schema's `pattern`, the regex is not anchored implicitly.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            pattern_str: pattern.to_string(),
        });
        Ok(self)
    }

    /// Adds a format constraint. Unknown format names are ignored.
    pub fn format(mut self, name: &str) -> Self {
        if let Some(format) = StringFormat::parse(name) {
            self.constraints.push(StringConstraint::Format {
                format,
                name: name.to_string(),
            });
        }
        self
    }
}

impl ValueValidator for StringSchema {
    fn validate_value(
        &self,
        value: &Value,
        path: &JsonPath,
        _context: &ValidationContext,
    ) -> ValidationResult<()> {
        let Some(s) = value.as_str() else {
            return finish(vec![type_error(value, path, "string")]);
        };

        finish(
            self.constraints
                .iter()
                .filter_map(|c| check_constraint(c, s, path))
                .collect(),
        )
    }
}

/// Checks a single constraint and returns an error if it fails.
fn check_constraint(
    constraint: &StringConstraint,
    value: &str,
    path: &JsonPath,
) -> Option<SchemaError> {
    match constraint {
        StringConstraint::MinLength(min) => {
            let len = value.chars().count();
            (len < *min).then(|| {
                SchemaError::new(
                    path.clone(),
                    format!("length must be at least {}, got {}", min, len),
                )
                .with_code("minLength")
                .with_expected(format!("at least {} characters", min))
                .with_got(format!("{} characters", len))
                .with_params(ErrorParams::MinLength { limit: *min })
            })
        }
        StringConstraint::MaxLength(max) => {
            let len = value.chars().count();
            (len > *max).then(|| {
                SchemaError::new(
                    path.clone(),
                    format!("length must be at most {}, got {}", max, len),
                )
                .with_code("maxLength")
                .with_expected(format!("at most {} characters", max))
                .with_got(format!("{} characters", len))
                .with_params(ErrorParams::MaxLength { limit: *max })
            })
        }
        StringConstraint::Pattern { regex, pattern_str } => (!regex.is_match(value)).then(|| {
            SchemaError::new(path.clone(), format!("must match pattern '{}'", pattern_str))
                .with_code("pattern")
                .with_expected(format!("string matching '{}'", pattern_str))
                .with_got(value.to_string())
                .with_params(ErrorParams::Pattern {
                    pattern: pattern_str.clone(),
                })
        }),
        StringConstraint::Format { format, name } => (!format.matches(value)).then(|| {
            SchemaError::new(path.clone(), format!("must match format '{}'", name))
                .with_code("format")
                .with_expected(name.clone())
                .with_got(value.to_string())
                .with_params(ErrorParams::Format {
                    format: name.clone(),
                })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(schema: &StringSchema, value: Value) -> ValidationResult<()> {
        schema.validate_value(&value, &JsonPath::root(), &ValidationContext::detached())
    }

    #[test]
    fn test_rejects_non_string() {
        let schema = StringSchema::new();
        let errors = check(&schema, json!(42)).into_result().unwrap_err();
        assert_eq!(errors.first().code, "type");
        assert_eq!(errors.first().got, Some("number".to_string()));
        assert!(check(&schema, json!(null)).is_failure());
    }

    #[test]
    fn test_length_counts_characters() {
        let schema = StringSchema::new().min_len(3).max_len(5);
        assert!(check(&schema, json!("日本語")).is_success());
        let errors = check(&schema, json!("🎉🎊")).into_result().unwrap_err();
        assert_eq!(errors.first().code, "minLength");
        assert_eq!(errors.first().params, Some(ErrorParams::MinLength { limit: 3 }));
    }

    #[test]
    fn test_pattern_is_unanchored() {
        let schema = StringSchema::new().pattern(r"\d").unwrap();
        assert!(check(&schema, json!("abc1")).is_success());
        assert!(check(&schema, json!("abc")).is_failure());
    }

    #[test]
    fn test_invalid_regex_pattern() {
        assert!(StringSchema::new().pattern(r"[invalid").is_err());
    }

    #[test]
    fn test_formats() {
        assert!(StringFormat::Email.matches("a@b.io"));
        assert!(!StringFormat::Email.matches("a@b"));
        assert!(StringFormat::Uri.matches("https://example.com/x"));
        assert!(!StringFormat::Uri.matches("example dot com"));
        assert!(StringFormat::Date.matches("2024-02-29"));
        assert!(!StringFormat::Date.matches("2023-02-29"));
        assert!(StringFormat::Time.matches("23:59:59Z"));
        assert!(StringFormat::DateTime.matches("2024-01-31T08:00:00+02:00"));
        assert!(!StringFormat::DateTime.matches("2024-01-31"));
        assert!(StringFormat::Ipv4.matches("10.0.0.1"));
        assert!(StringFormat::parse("hostname").is_none());
    }

    #[test]
    fn test_color_accepts_css_syntax() {
        for color in [
            "#ff00aa",
            "#fff",
            "red",
            "RebeccaPurple",
            "transparent",
            "rgb(255, 0, 0)",
            "rgba(0 0 0 / 50%)",
            "hsl(120, 50%, 50%)",
            "hsla(120deg 50% 50% / 0.3)",
            "oklch(70% 0.1 200)",
        ] {
            assert!(StringFormat::Color.matches(color), "{color} rejected");
        }
        for color in ["#ggg", "reddish", "hsl(1, 2", "rgb()()", ""] {
            assert!(!StringFormat::Color.matches(color), "{color} accepted");
        }

        let schema = StringSchema::new().format("color");
        assert!(check(&schema, json!("red")).is_success());
        assert!(check(&schema, json!("hsl(120, 50%, 50%)")).is_success());
    }

    #[test]
    fn test_unknown_format_ignored() {
        let schema = StringSchema::new().format("hostname");
        assert!(check(&schema, json!("not checked at all")).is_success());
    }

    #[test]
    fn test_format_failure_reports_format_name() {
        let schema = StringSchema::new().format("url");
        let errors = check(&schema, json!("nope")).into_result().unwrap_err();
        assert_eq!(
            errors.first().params,
            Some(ErrorParams::Format {
                format: "url".to_string()
            })
        );
    }
}
