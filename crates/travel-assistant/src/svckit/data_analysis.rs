//! Data Analysis Tool
//!
//! Descriptive statistics over a comma-separated list of numbers.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use agent_core::{
    tool::ParameterSchema,
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

pub const TOOL_NAME: &str = "analyze_data";

const EMPTY_INPUT: &str = "Error: the list of numbers is empty.";
const INVALID_FORMAT: &str =
    "Error: invalid input format. Please provide a comma-separated string of numbers.";

#[derive(Deserialize)]
struct DataInput {
    numbers_str: String,
}

/// Why a number list could not be analyzed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    Empty,
    InvalidNumber(String),
}

/// Summary statistics for one list of numbers
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub sorted: Vec<f64>,
}

/// Parse `"15, 8, 23"` style input and compute the report.
///
/// Every comma-separated token must parse as a float; a single bad token
/// rejects the whole input.
pub fn analyze(numbers_str: &str) -> Result<AnalysisReport, AnalysisError> {
    if numbers_str.trim().is_empty() {
        return Err(AnalysisError::Empty);
    }

    let numbers = numbers_str
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f64>()
                .map_err(|_| AnalysisError::InvalidNumber(token.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let count = numbers.len();
    let sum: f64 = numbers.iter().sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / count as f64;
    let min = numbers.iter().copied().fold(f64::INFINITY, |a, b| nan_or(a, b, f64::min));
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, |a, b| nan_or(a, b, f64::max));

    let mut sorted = numbers;
    sorted.sort_by(f64::total_cmp);

    Ok(AnalysisReport { count, sum, mean, min, max, sorted })
}

/// `f64::min`/`f64::max` ignore NaN; a NaN anywhere in the list poisons
/// the extremes just like it poisons the sum.
fn nan_or(a: f64, b: f64, pick: fn(f64, f64) -> f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { pick(a, b) }
}

/// Render a float in float-repr style: shortest round-trip digits, whole
/// numbers keep one decimal place (`108.0`), and exponents below -4 or
/// from 16 up switch to scientific notation (`1e-05`, `1.5e+16`).
fn fmt_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return value.to_string();
    }
    if value == 0.0 {
        return format!("{value:.1}");
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') { plain } else { format!("{plain}.0") }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

fn fmt_mean(mean: f64) -> String {
    if mean.is_nan() { "nan".into() } else { format!("{mean:.2}") }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sorted = self
            .sorted
            .iter()
            .map(|v| fmt_number(*v))
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(f, "Data analysis results:")?;
        writeln!(f, "- Count: {}", self.count)?;
        writeln!(f, "- Sum: {}", fmt_number(self.sum))?;
        writeln!(f, "- Mean: {}", fmt_mean(self.mean))?;
        writeln!(f, "- Min: {}", fmt_number(self.min))?;
        writeln!(f, "- Max: {}", fmt_number(self.max))?;
        write!(f, "- Sorted ascending: [{sorted}]")
    }
}

/// Tool for analyzing user-supplied numbers
#[derive(Default)]
pub struct DataAnalysisTool;

impl DataAnalysisTool {
    pub const fn new() -> Self {
        Self
    }

    /// Analyze and render, folding every failure into its message.
    pub fn run(numbers_str: &str) -> Result<String, String> {
        match analyze(numbers_str) {
            Ok(report) => Ok(report.to_string()),
            Err(AnalysisError::Empty) => Err(EMPTY_INPUT.into()),
            Err(AnalysisError::InvalidNumber(token)) => {
                tracing::debug!(token, "Rejected non-numeric token");
                Err(INVALID_FORMAT.into())
            }
        }
    }
}

#[async_trait]
impl Tool for DataAnalysisTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: TOOL_NAME.into(),
            description: "Use this tool when the user provides a series of numbers and asks \
                to sort them, do calculations on them, or analyze them."
                .into(),
            parameters: vec![ParameterSchema::required_string(
                "numbers_str",
                "A comma-separated string of numbers, e.g. '10, 25, 5, 42'",
            )],
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let outcome = match call.parse_args::<DataInput>() {
            Ok(input) => Self::run(&input.numbers_str),
            Err(e) => Err(format!("Error while analyzing data: {e}")),
        };

        Ok(match outcome {
            Ok(report) => ToolResult::success(TOOL_NAME, report),
            Err(message) => ToolResult::failure(TOOL_NAME, message),
        })
    }
}
