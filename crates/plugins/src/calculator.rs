//! Calculator plugin — detects and evaluates arithmetic expressions.
//!
//! Detection is regex-based: an explicit `<number><op><number>` pattern, a
//! "calculate ..." prefix, or a "what is X op Y" phrasing. Evaluation uses
//! a recursive-descent parser over a restricted grammar (decimal numbers,
//! `+ - * /`, parentheses, unary minus). Characters outside the grammar are
//! rejected by the tokenizer before evaluation — there is no dynamic code
//! execution anywhere in this path.

use async_trait::async_trait;
use parley_core::{Plugin, PluginResult};
use regex::Regex;

pub struct CalculatorPlugin {
    /// Detection patterns, all of which imply arithmetic intent.
    detectors: Vec<Regex>,
    /// Lead-in phrases stripped before expression extraction.
    lead_in: Regex,
    /// The longest run of expression characters in the cleaned text.
    expression: Regex,
}

impl CalculatorPlugin {
    pub fn new() -> Self {
        let detectors = vec![
            Regex::new(r"\d+(?:\.\d+)?\s*[+\-*/]\s*\d+(?:\.\d+)?").expect("invalid number-op regex"),
            Regex::new(r"(?i)calculate\s+.+").expect("invalid calculate regex"),
            Regex::new(r"(?i)what\s+is\s+.+\s*[+\-*/]\s*.+").expect("invalid what-is regex"),
        ];
        Self {
            detectors,
            lead_in: Regex::new(r"(?i)\b(?:calculate|what\s+is|solve)\s+").expect("invalid lead-in regex"),
            expression: Regex::new(r"[0-9.+\-*/()\s]+").expect("invalid expression regex"),
        }
    }

    /// Pull the arithmetic candidate out of free text, if any.
    fn extract_expression(&self, text: &str) -> Option<String> {
        let cleaned = self.lead_in.replace_all(text, "");
        self.expression
            .find_iter(&cleaned)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .max_by_key(|s| s.len())
            .map(str::to_string)
    }
}

impl Default for CalculatorPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for CalculatorPlugin {
    fn name(&self) -> &str {
        "math"
    }

    fn matches(&self, text: &str) -> Option<String> {
        self.detectors
            .iter()
            .any(|d| d.is_match(text))
            .then(|| text.to_string())
    }

    async fn execute(&self, argument: &str) -> PluginResult {
        let Some(expression) = self.extract_expression(argument) else {
            return PluginResult::failed(
                self.name(),
                argument,
                "No valid mathematical expression found",
            );
        };

        match evaluate(&expression) {
            Ok(value) => PluginResult::ok(
                self.name(),
                argument,
                format!("{} = {}", expression, format_number(value)),
            ),
            Err(e) => {
                tracing::debug!(expression = %expression, error = %e, "expression evaluation failed");
                PluginResult::failed(
                    self.name(),
                    argument,
                    format!("Error evaluating mathematical expression: {e}"),
                )
            }
        }
    }
}

/// Format a result nicely: no trailing `.0` for integer values.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

// ── Recursive-descent expression evaluator ────────────────────────────────

/// Evaluate an arithmetic expression string.
///
/// Grammar: numbers, `+ - * /`, parentheses, unary minus. Anything else is
/// rejected during tokenization. Non-finite results are rejected.
pub fn evaluate(expr: &str) -> Result<f64, String> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser::new(&tokens);
    let result = parser.parse_expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(format!(
            "Unexpected token at position {}: {:?}",
            parser.pos, parser.tokens[parser.pos]
        ));
    }
    if !result.is_finite() {
        return Err("Result is not a finite number".into());
    }
    Ok(result)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '+' => { tokens.push(Token::Plus); i += 1; }
            '-' => { tokens.push(Token::Minus); i += 1; }
            '*' => { tokens.push(Token::Star); i += 1; }
            '/' => { tokens.push(Token::Slash); i += 1; }
            '(' => { tokens.push(Token::LParen); i += 1; }
            ')' => { tokens.push(Token::RParen); i += 1; }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let num_str: String = chars[start..i].iter().collect();
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| format!("Invalid number: {num_str}"))?;
                tokens.push(Token::Number(num));
            }
            c => return Err(format!("Unexpected character: '{c}'")),
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    // expr = term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<f64, String> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.consume();
                    left += self.parse_term()?;
                }
                Token::Minus => {
                    self.consume();
                    left -= self.parse_term()?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // term = unary (('*' | '/') unary)*
    fn parse_term(&mut self) -> Result<f64, String> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.consume();
                    left *= self.parse_unary()?;
                }
                Token::Slash => {
                    self.consume();
                    let right = self.parse_unary()?;
                    if right == 0.0 {
                        return Err("Division by zero".into());
                    }
                    left /= right;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // unary = '-' unary | primary
    fn parse_unary(&mut self) -> Result<f64, String> {
        if let Some(Token::Minus) = self.peek() {
            self.consume();
            let val = self.parse_unary()?;
            return Ok(-val);
        }
        self.parse_primary()
    }

    // primary = NUMBER | '(' expr ')'
    fn parse_primary(&mut self) -> Result<f64, String> {
        match self.consume() {
            Some(Token::Number(n)) => Ok(*n),
            Some(Token::LParen) => {
                let val = self.parse_expr()?;
                match self.consume() {
                    Some(Token::RParen) => Ok(val),
                    _ => Err("Expected closing parenthesis".into()),
                }
            }
            Some(tok) => Err(format!("Unexpected token: {tok:?}")),
            None => Err("Unexpected end of expression".into()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_addition() {
        assert_eq!(evaluate("2 + 3").unwrap(), 5.0);
    }

    #[test]
    fn operator_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
    }

    #[test]
    fn parentheses() {
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
    }

    #[test]
    fn division() {
        assert_eq!(evaluate("10 / 4").unwrap(), 2.5);
    }

    #[test]
    fn division_by_zero_rejected() {
        assert!(evaluate("1 / 0").is_err());
    }

    #[test]
    fn unary_negation() {
        assert_eq!(evaluate("-5 + 3").unwrap(), -2.0);
    }

    #[test]
    fn trailing_operator_rejected() {
        assert!(evaluate("2 +").is_err());
    }

    #[test]
    fn letters_rejected_before_evaluation() {
        assert!(evaluate("2 + abc").is_err());
    }

    #[test]
    fn empty_expression_rejected() {
        assert!(evaluate("").is_err());
    }

    #[test]
    fn detects_inline_expression() {
        let plugin = CalculatorPlugin::new();
        assert!(plugin.matches("25 + 17").is_some());
        assert!(plugin.matches("please add 3.5*2 for me").is_some());
    }

    #[test]
    fn detects_calculate_prefix() {
        let plugin = CalculatorPlugin::new();
        assert!(plugin.matches("Calculate the sum").is_some());
        assert!(plugin.matches("what is 5 * 6").is_some());
    }

    #[test]
    fn declines_plain_chat() {
        let plugin = CalculatorPlugin::new();
        assert!(plugin.matches("hello there").is_none());
    }

    #[tokio::test]
    async fn executes_basic_sum() {
        let plugin = CalculatorPlugin::new();
        let result = plugin.execute("calculate 2 + 2").await;
        assert!(result.success);
        assert_eq!(result.kind, "math");
        assert!(result.output.contains("2 + 2 = 4"));
    }

    #[tokio::test]
    async fn formats_fractional_results() {
        let plugin = CalculatorPlugin::new();
        let result = plugin.execute("calculate 10 / 4").await;
        assert!(result.success);
        assert!(result.output.contains("10 / 4 = 2.5"));
    }

    #[tokio::test]
    async fn what_is_phrasing_works() {
        let plugin = CalculatorPlugin::new();
        let result = plugin.execute("what is 15 * 8").await;
        assert!(result.success);
        assert!(result.output.contains("15 * 8 = 120"));
    }

    #[tokio::test]
    async fn no_expression_fails_gracefully() {
        let plugin = CalculatorPlugin::new();
        let result = plugin.execute("calculate the meaning of life").await;
        assert!(!result.success);
        assert!(result.output.contains("No valid mathematical expression"));
    }

    #[tokio::test]
    async fn malformed_expression_fails_gracefully() {
        let plugin = CalculatorPlugin::new();
        let result = plugin.execute("calculate 2 + + +").await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn division_by_zero_fails_gracefully() {
        let plugin = CalculatorPlugin::new();
        let result = plugin.execute("calculate 1 / 0").await;
        assert!(!result.success);
    }
}
