//! Declarative value schemas with two-phase validation.
//!
//! A [`Schema`] is plain data: a structural [`Shape`] plus a list of
//! refinement predicates. Validation runs shape-first and short-circuits
//! on the first structural mismatch, then runs every refinement and
//! collects *all* failures, each tagged with the field path that failed.
//! The outcome is pure and deterministic for a given input.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// A single validation failure, tagged with the path of the field that
/// produced it. Paths are dot-separated (`"name"`, `"items.0.email"`);
/// the empty path refers to the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// The structural kind of a value a schema accepts.
#[derive(Clone)]
enum Shape {
    String,
    Number,
    Integer,
    Boolean,
    /// An RFC 3339 date-time carried as a JSON string.
    DateTime,
    Array(Box<Schema>),
    Object(Vec<Field>),
}

impl Shape {
    fn expected(&self) -> &'static str {
        match self {
            Shape::String => "expected a string",
            Shape::Number => "expected a number",
            Shape::Integer => "expected an integer",
            Shape::Boolean => "expected a boolean",
            Shape::DateTime => "expected an RFC 3339 date-time string",
            Shape::Array(_) => "expected an array",
            Shape::Object(_) => "expected an object",
        }
    }
}

/// A named child schema inside an object shape. Field order is the
/// declaration order, which makes issue ordering deterministic.
#[derive(Clone)]
struct Field {
    name: String,
    schema: Schema,
}

/// A business predicate layered on top of a shape. The predicate receives
/// the whole value the schema describes; `path` locates the reported
/// issue within it.
#[derive(Clone)]
struct Refinement {
    path: String,
    message: String,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("path", &self.path)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A composable description of acceptable values for one field or one
/// whole payload.
///
/// Schemas are built with the constructor methods and the chaining
/// transforms below; every transform produces a new schema and never
/// mutates its source.
///
/// ```
/// use accord_contract::Schema;
/// use serde_json::json;
///
/// let user = Schema::object()
///     .field("name", Schema::string().min_length(1))
///     .field("email", Schema::string().email());
///
/// assert!(user.validate(&json!({"name": "Ann", "email": "ann@example.com"})).is_ok());
/// ```
#[derive(Clone)]
pub struct Schema {
    shape: Shape,
    refinements: Vec<Refinement>,
    required: bool,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("shape", &self.shape.expected())
            .field("refinements", &self.refinements)
            .field("required", &self.required)
            .finish()
    }
}

impl Schema {
    fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            refinements: Vec::new(),
            required: true,
        }
    }

    /// Create a string schema
    pub fn string() -> Self {
        Self::with_shape(Shape::String)
    }

    /// Create a number schema (accepts any JSON number)
    pub fn number() -> Self {
        Self::with_shape(Shape::Number)
    }

    /// Create an integer schema (exact `i64` values only)
    pub fn integer() -> Self {
        Self::with_shape(Shape::Integer)
    }

    /// Create a boolean schema
    pub fn boolean() -> Self {
        Self::with_shape(Shape::Boolean)
    }

    /// Create a date-time schema (RFC 3339 string on the wire)
    pub fn date_time() -> Self {
        Self::with_shape(Shape::DateTime)
    }

    /// Create an array schema whose elements all match `item`
    pub fn array_of(item: Schema) -> Self {
        Self::with_shape(Shape::Array(Box::new(item)))
    }

    /// Create an empty object schema; add fields with [`Schema::field`]
    pub fn object() -> Self {
        Self::with_shape(Shape::Object(Vec::new()))
    }

    /// Add a named field to an object schema.
    ///
    /// # Panics
    /// Panics if called on a non-object schema; this is a construction
    /// bug, not a runtime condition.
    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        match &mut self.shape {
            Shape::Object(fields) => fields.push(Field {
                name: name.into(),
                schema,
            }),
            _ => panic!("Schema::field is only valid on object schemas"),
        }
        self
    }

    /// Mark this schema as optional: when used as an object field, the
    /// field may be absent (absent fields skip validation entirely).
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attach an arbitrary refinement. The predicate receives the whole
    /// value this schema describes; `path` (relative to that value, empty
    /// for the value itself) locates the reported issue.
    pub fn refine<F>(mut self, path: impl Into<String>, message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.refinements.push(Refinement {
            path: path.into(),
            message: message.into(),
            check: Arc::new(check),
        });
        self
    }

    /// Require at least `min` characters (string schemas)
    pub fn min_length(self, min: usize) -> Self {
        let message = format!("must contain at least {} character(s)", min);
        self.refine("", message, move |v| {
            v.as_str().is_none_or(|s| s.chars().count() >= min)
        })
    }

    /// Allow at most `max` characters (string schemas)
    pub fn max_length(self, max: usize) -> Self {
        let message = format!("must contain at most {} character(s)", max);
        self.refine("", message, move |v| {
            v.as_str().is_none_or(|s| s.chars().count() <= max)
        })
    }

    /// Require a plausible email address (string schemas)
    pub fn email(self) -> Self {
        self.refine("", "Invalid email format", |v| {
            v.as_str().is_none_or(|s| EMAIL_RE.is_match(s))
        })
    }

    /// Validate `value` against this schema.
    ///
    /// Structural mismatches short-circuit and return a single issue;
    /// once the shape holds, every refinement failure in the whole tree
    /// is collected before returning. No coercion happens in either
    /// phase: a string is never silently read as a number or date.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<Issue>> {
        if let Err(issue) = self.check_shape(value, "") {
            return Err(vec![issue]);
        }
        let mut issues = Vec::new();
        self.collect_refinement_issues(value, "", &mut issues);
        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }

    fn check_shape(&self, value: &Value, path: &str) -> Result<(), Issue> {
        match &self.shape {
            Shape::String if value.is_string() => Ok(()),
            Shape::Number if value.is_number() => Ok(()),
            Shape::Integer if value.as_i64().is_some() => Ok(()),
            Shape::Boolean if value.is_boolean() => Ok(()),
            Shape::DateTime
                if value
                    .as_str()
                    .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok()) =>
            {
                Ok(())
            }
            Shape::Array(item) => {
                let elements = value
                    .as_array()
                    .ok_or_else(|| Issue::new(path, self.shape.expected()))?;
                for (index, element) in elements.iter().enumerate() {
                    item.check_shape(element, &join_path(path, &index.to_string()))?;
                }
                Ok(())
            }
            Shape::Object(fields) => {
                let map = value
                    .as_object()
                    .ok_or_else(|| Issue::new(path, self.shape.expected()))?;
                for field in fields {
                    let field_path = join_path(path, &field.name);
                    match map.get(&field.name) {
                        Some(child) => field.schema.check_shape(child, &field_path)?,
                        None if field.schema.required => {
                            return Err(Issue::new(field_path, "is required"));
                        }
                        // Unknown keys are ignored; absent optional fields
                        // skip validation entirely.
                        None => {}
                    }
                }
                Ok(())
            }
            _ => Err(Issue::new(path, self.shape.expected())),
        }
    }

    fn collect_refinement_issues(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        for refinement in &self.refinements {
            if !(refinement.check)(value) {
                issues.push(Issue::new(
                    join_path(path, &refinement.path),
                    refinement.message.clone(),
                ));
            }
        }
        match &self.shape {
            Shape::Array(item) => {
                if let Some(elements) = value.as_array() {
                    for (index, element) in elements.iter().enumerate() {
                        item.collect_refinement_issues(
                            element,
                            &join_path(path, &index.to_string()),
                            issues,
                        );
                    }
                }
            }
            Shape::Object(fields) => {
                if let Some(map) = value.as_object() {
                    for field in fields {
                        if let Some(child) = map.get(&field.name) {
                            field.schema.collect_refinement_issues(
                                child,
                                &join_path(path, &field.name),
                                issues,
                            );
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn join_path(base: &str, leaf: &str) -> String {
    match (base.is_empty(), leaf.is_empty()) {
        (true, _) => leaf.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{}.{}", base, leaf),
    }
}
