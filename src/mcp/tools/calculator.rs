//! Arithmetic tools: `add` and `calculate`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::registry::{ToolHandler, ToolSpec};
use super::schema::{Arguments, ParamSpec, ParameterSchema};
use super::ToolError;

pub const ADD_TOOL: &str = "add";
pub const CALCULATE_TOOL: &str = "calculate";

pub const OPERATIONS: &[&str] = &["add", "subtract", "multiply", "divide"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Deserialize)]
struct Operands {
    a: f64,
    b: f64,
}

#[derive(Debug, Deserialize)]
struct CalculateArgs {
    operation: Operation,
    a: f64,
    b: f64,
}

/// Apply `operation`. Division by zero is an error rather than infinity.
pub fn calculate(operation: Operation, a: f64, b: f64) -> Result<f64, ToolError> {
    match operation {
        Operation::Add => Ok(a + b),
        Operation::Subtract => Ok(a - b),
        Operation::Multiply => Ok(a * b),
        Operation::Divide if b == 0.0 => {
            Err(ToolError::Arithmetic("Cannot divide by zero".to_string()))
        }
        Operation::Divide => Ok(a / b),
    }
}

/// Plain number text: `5`, `2.5`, `-0.25`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if value == 0.0 {
        // drops the sign of -0
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        // exponent notation with an explicit sign: 1e+21, 1.5e-7
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    } else {
        value.to_string()
    }
}

pub struct AddTool;

#[async_trait]
impl ToolHandler for AddTool {
    async fn call(&self, arguments: Arguments) -> Result<String, ToolError> {
        let Operands { a, b } = arguments.into_typed()?;
        Ok(format_number(a + b))
    }
}

pub struct CalculateTool;

#[async_trait]
impl ToolHandler for CalculateTool {
    async fn call(&self, arguments: Arguments) -> Result<String, ToolError> {
        let CalculateArgs { operation, a, b } = arguments.into_typed()?;
        calculate(operation, a, b).map(format_number)
    }
}

pub fn add_spec() -> ToolSpec {
    ToolSpec {
        name: ADD_TOOL.to_string(),
        description: "Add two numbers and return the sum.".to_string(),
        error_prefix: "Error".to_string(),
        schema: ParameterSchema::new(vec![
            ParamSpec::number("a").required(),
            ParamSpec::number("b").required(),
        ]),
        handler: Arc::new(AddTool),
    }
}

pub fn calculate_spec() -> ToolSpec {
    ToolSpec {
        name: CALCULATE_TOOL.to_string(),
        description: "Perform add, subtract, multiply or divide on two numbers.".to_string(),
        error_prefix: "Error".to_string(),
        schema: ParameterSchema::new(vec![
            ParamSpec::one_of("operation", OPERATIONS)
                .required()
                .describe("Arithmetic operation to apply"),
            ParamSpec::number("a").required().describe("Left operand"),
            ParamSpec::number("b").required().describe("Right operand"),
        ]),
        handler: Arc::new(CalculateTool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations() {
        assert_eq!(calculate(Operation::Add, 2.0, 3.0).unwrap(), 5.0);
        assert_eq!(calculate(Operation::Subtract, 2.0, 3.0).unwrap(), -1.0);
        assert_eq!(calculate(Operation::Multiply, 4.0, 5.0).unwrap(), 20.0);
        assert_eq!(calculate(Operation::Divide, 7.0, 2.0).unwrap(), 3.5);
    }

    #[test]
    fn test_divide_by_zero_is_an_error() {
        let err = calculate(Operation::Divide, 1.0, 0.0).unwrap_err();
        assert_eq!(err.to_string(), "Cannot divide by zero");

        let err = calculate(Operation::Divide, 0.0, -0.0).unwrap_err();
        assert_eq!(err.to_string(), "Cannot divide by zero");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(20.0), "20");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-3.25), "-3.25");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_format_number_extreme_magnitudes() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e300), "-2.5e+300");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(0.000001), "0.000001");
    }
}
