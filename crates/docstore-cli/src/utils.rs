use std::{
    fmt::Display,
    sync::{LazyLock, RwLock},
};

use docstore_db::{Bson, Document};
use mongodb::options::UpdateModifications;
use nu_ansi_term::Color;
use serde_json::Value;

use crate::error::{CliError, Result};

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

pub fn color_enabled() -> bool {
    COLOR.read().map(|c| *c).unwrap_or(true)
}

pub fn disable_color() {
    if let Ok(mut color) = COLOR.write() {
        *color = false;
    }
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if color_enabled() {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

fn kind_of(value: &Bson) -> &'static str {
    match value {
        Bson::Document(_) => "an object",
        Bson::Array(_) => "an array",
        Bson::String(_) => "a string",
        Bson::Null => "null",
        Bson::Boolean(_) => "a boolean",
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => "a number",
        _ => "a scalar",
    }
}

/// Parses `input` as extended JSON into a BSON value.
pub fn parse_extjson(what: &'static str, input: &str) -> Result<Bson> {
    let value: Value =
        serde_json::from_str(input).map_err(|source| CliError::Json { what, source })?;
    Bson::try_from(value).map_err(|source| CliError::ExtJson { what, source })
}

/// Parses `input` as an extended JSON object.
pub fn parse_document(what: &'static str, input: &str) -> Result<Document> {
    match parse_extjson(what, input)? {
        Bson::Document(doc) => Ok(doc),
        other => {
            Err(CliError::Shape {
                what,
                expected: "an object",
                found: kind_of(&other),
            })
        }
    }
}

/// Parses an optional filter, where absence means "match everything".
pub fn parse_filter(input: Option<&str>) -> Result<Document> {
    input
        .map(|f| parse_document("filter", f))
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Parses `input` as an extended JSON array of objects.
pub fn parse_pipeline(what: &'static str, input: &str) -> Result<Vec<Document>> {
    let stages = match parse_extjson(what, input)? {
        Bson::Array(stages) => stages,
        other => {
            return Err(CliError::Shape {
                what,
                expected: "an array",
                found: kind_of(&other),
            })
        }
    };

    stages
        .into_iter()
        .map(|stage| {
            match stage {
                Bson::Document(doc) => Ok(doc),
                other => {
                    Err(CliError::Shape {
                        what,
                        expected: "an array of objects",
                        found: kind_of(&other),
                    })
                }
            }
        })
        .collect()
}

/// Parses an update given either as an operator document or as a pipeline.
pub fn parse_update(input: &str) -> Result<UpdateModifications> {
    match parse_extjson("update", input)? {
        Bson::Document(doc) => Ok(UpdateModifications::Document(doc)),
        Bson::Array(_) => Ok(UpdateModifications::Pipeline(parse_pipeline("update", input)?)),
        other => {
            Err(CliError::Shape {
                what: "update",
                expected: "an object or an array",
                found: kind_of(&other),
            })
        }
    }
}

/// Renders a document as one line of relaxed extended JSON.
pub fn to_relaxed_json(document: Document) -> String {
    Bson::Document(document).into_relaxed_extjson().to_string()
}
