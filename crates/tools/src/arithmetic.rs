//! Arithmetic capabilities — add, subtract, multiply, divide.
//!
//! Division by zero is a capability error (fed back to the model as an
//! error observation), not a panic. Results with no fractional part are
//! rendered without a trailing `.0` so observations read like the
//! integers the model expects.

use async_trait::async_trait;
use reagent_core::capability::{ArgValue, Capability, ParamKind, ParamSpec};
use reagent_core::error::CapabilityError;

/// Extract exactly two numeric arguments.
fn numeric_pair(name: &str, args: &[ArgValue]) -> Result<(f64, f64), CapabilityError> {
    if args.len() != 2 {
        return Err(CapabilityError::InvalidArguments {
            name: name.into(),
            reason: format!("expected 2 numeric arguments, got {}", args.len()),
        });
    }
    let x = args[0]
        .as_f64()
        .ok_or_else(|| CapabilityError::InvalidArguments {
            name: name.into(),
            reason: format!("first argument is not a number: {}", args[0]),
        })?;
    let y = args[1]
        .as_f64()
        .ok_or_else(|| CapabilityError::InvalidArguments {
            name: name.into(),
            reason: format!("second argument is not a number: {}", args[1]),
        })?;
    Ok((x, y))
}

/// Format nicely: remove trailing .0 for integers.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

pub struct AddNumbers;

#[async_trait]
impl Capability for AddNumbers {
    fn name(&self) -> &str {
        "add_numbers"
    }

    fn signature(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new("x", ParamKind::Int),
            ParamSpec::new("y", ParamKind::Int),
        ]
    }

    fn description(&self) -> &str {
        "Adds two numbers and returns the sum. Example: add_numbers(4, 7)"
    }

    async fn invoke(&self, args: &[ArgValue]) -> Result<String, CapabilityError> {
        let (x, y) = numeric_pair(self.name(), args)?;
        Ok(format_number(x + y))
    }
}

pub struct SubtractNumbers;

#[async_trait]
impl Capability for SubtractNumbers {
    fn name(&self) -> &str {
        "subtract_numbers"
    }

    fn signature(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new("x", ParamKind::Int),
            ParamSpec::new("y", ParamKind::Int),
        ]
    }

    fn description(&self) -> &str {
        "Subtracts the second number from the first and returns the difference. Example: subtract_numbers(4, 7)"
    }

    async fn invoke(&self, args: &[ArgValue]) -> Result<String, CapabilityError> {
        let (x, y) = numeric_pair(self.name(), args)?;
        Ok(format_number(x - y))
    }
}

pub struct MultiplyNumbers;

#[async_trait]
impl Capability for MultiplyNumbers {
    fn name(&self) -> &str {
        "multiply_numbers"
    }

    fn signature(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new("x", ParamKind::Int),
            ParamSpec::new("y", ParamKind::Int),
        ]
    }

    fn description(&self) -> &str {
        "Multiplies two numbers and returns the product. Example: multiply_numbers(4, 7)"
    }

    async fn invoke(&self, args: &[ArgValue]) -> Result<String, CapabilityError> {
        let (x, y) = numeric_pair(self.name(), args)?;
        Ok(format_number(x * y))
    }
}

pub struct DivideNumbers;

#[async_trait]
impl Capability for DivideNumbers {
    fn name(&self) -> &str {
        "divide_numbers"
    }

    fn signature(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new("x", ParamKind::Float),
            ParamSpec::new("y", ParamKind::Float),
        ]
    }

    fn description(&self) -> &str {
        "Divides the first number by the second and returns the quotient. Example: divide_numbers(10, 3)"
    }

    async fn invoke(&self, args: &[ArgValue]) -> Result<String, CapabilityError> {
        let (x, y) = numeric_pair(self.name(), args)?;
        if y == 0.0 {
            return Err(CapabilityError::InvocationFailed {
                name: self.name().into(),
                reason: "division by zero".into(),
            });
        }
        Ok(format_number(x / y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add() {
        let out = AddNumbers
            .invoke(&[ArgValue::Int(30), ArgValue::Int(10)])
            .await
            .unwrap();
        assert_eq!(out, "40");
    }

    #[tokio::test]
    async fn subtract_negative_result() {
        let out = SubtractNumbers
            .invoke(&[ArgValue::Int(4), ArgValue::Int(7)])
            .await
            .unwrap();
        assert_eq!(out, "-3");
    }

    #[tokio::test]
    async fn multiply() {
        let out = MultiplyNumbers
            .invoke(&[ArgValue::Int(10), ArgValue::Int(3)])
            .await
            .unwrap();
        assert_eq!(out, "30");
    }

    #[tokio::test]
    async fn divide_formats_decimals() {
        let out = DivideNumbers
            .invoke(&[ArgValue::Int(10), ArgValue::Int(3)])
            .await
            .unwrap();
        assert!(out.starts_with("3.333"));
    }

    #[tokio::test]
    async fn divide_integer_result_has_no_fraction() {
        let out = DivideNumbers
            .invoke(&[ArgValue::Int(10), ArgValue::Int(2)])
            .await
            .unwrap();
        assert_eq!(out, "5");
    }

    #[tokio::test]
    async fn divide_by_zero_is_an_error() {
        let err = DivideNumbers
            .invoke(&[ArgValue::Int(1), ArgValue::Int(0)])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("division by zero"));
    }

    #[tokio::test]
    async fn mixed_int_and_float_arguments() {
        let out = AddNumbers
            .invoke(&[ArgValue::Float(1.5), ArgValue::Int(2)])
            .await
            .unwrap();
        assert_eq!(out, "3.5");
    }

    #[tokio::test]
    async fn wrong_arity_rejected() {
        let err = AddNumbers.invoke(&[ArgValue::Int(1)]).await.unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn string_argument_rejected() {
        let err = MultiplyNumbers
            .invoke(&[ArgValue::Str("ten".into()), ArgValue::Int(3)])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }
}
