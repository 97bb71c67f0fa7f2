use serde::{Deserialize, Serialize};

/// Declared type of an input or output value. The service encodes every value
/// as text; the tag decides how the text is interpreted on the client side.
///
/// Tags the platform may add in the future (statistics, histograms, data sets)
/// are carried verbatim in `Other` so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeTag {
    Boolean,
    Integer,
    Long,
    Double,
    String,
    DateTime,
    FixedRangeInteger,
    FixedRangeDouble,
    Other(std::string::String),
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::Integer => "INTEGER",
            TypeTag::Long => "LONG",
            TypeTag::Double => "DOUBLE",
            TypeTag::String => "STRING",
            TypeTag::DateTime => "DATE_TIME",
            TypeTag::FixedRangeInteger => "FIXED_RANGE_INTEGER",
            TypeTag::FixedRangeDouble => "FIXED_RANGE_DOUBLE",
            TypeTag::Other(tag) => tag,
        }
    }

    /// Scalar outputs are the only ones that can be tabulated per sweep point.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeTag::Boolean
                | TypeTag::Integer
                | TypeTag::Long
                | TypeTag::Double
                | TypeTag::String
                | TypeTag::DateTime
        )
    }

    /// A fixed-range input varies across runs instead of holding a point value.
    pub fn is_sweep(&self) -> bool {
        matches!(self, TypeTag::FixedRangeInteger | TypeTag::FixedRangeDouble)
    }
}

impl From<std::string::String> for TypeTag {
    fn from(tag: std::string::String) -> Self {
        match tag.as_str() {
            "BOOLEAN" => TypeTag::Boolean,
            "INTEGER" => TypeTag::Integer,
            "LONG" => TypeTag::Long,
            "DOUBLE" => TypeTag::Double,
            "STRING" => TypeTag::String,
            "DATE_TIME" => TypeTag::DateTime,
            "FIXED_RANGE_INTEGER" => TypeTag::FixedRangeInteger,
            "FIXED_RANGE_DOUBLE" => TypeTag::FixedRangeDouble,
            _ => TypeTag::Other(tag),
        }
    }
}

impl From<TypeTag> for std::string::String {
    fn from(tag: TypeTag) -> Self {
        tag.as_str().to_owned()
    }
}

/// Whether a request represents one execution or a parameter sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunKind {
    Simulation,
    ParameterVariation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Fresh,
    Running,
    Completed,
    Error,
    Stopped,
}

impl RunStatus {
    /// No further transition happens after a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Error | RunStatus::Stopped
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Fresh => "FRESH",
            RunStatus::Running => "RUNNING",
            RunStatus::Completed => "COMPLETED",
            RunStatus::Error => "ERROR",
            RunStatus::Stopped => "STOPPED",
        }
    }
}

/// How the server summarizes one output across the runs of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationType {
    Identity,
    Array,
}
