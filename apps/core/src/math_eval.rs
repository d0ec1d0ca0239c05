use std::fmt::{Display, Formatter};

const OPERATOR_CHARS: &str = "+-*/";
const CANDIDATE_CHARS: &str = "+-*/,. ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    InvalidCharacter(char),
    MalformedNumber(String),
    DivisionByZero,
    MalformedExpression,
}

impl Display for MathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCharacter(c) => write!(f, "invalid character in expression: {c:?}"),
            Self::MalformedNumber(num) => write!(f, "malformed number: {num}"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::MalformedExpression => write!(f, "malformed expression"),
        }
    }
}

impl std::error::Error for MathError {}

/// True when the input is worth handing to the evaluator: nothing but
/// digits and the math character set, with at least one non-digit from
/// that set. A bare number is not a candidate.
pub fn is_math_candidate(input: &str) -> bool {
    if input.is_empty() {
        return false;
    }

    let mut has_math_char = false;
    for c in input.chars() {
        if CANDIDATE_CHARS.contains(c) {
            has_math_char = true;
            continue;
        }
        if !c.is_ascii_digit() {
            return false;
        }
    }
    has_math_char
}

/// Evaluates an infix arithmetic expression and renders the result.
/// Commas are accepted as decimal separators.
pub fn eval(expr: &str) -> Result<String, MathError> {
    let normalized = expr.replace(',', ".");
    let tokens = tokenize(&normalized)?;
    let postfix = infix_to_postfix(tokens)?;
    let value = eval_postfix(&postfix)?;
    Ok(format_result(value))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Operator(char),
}

fn tokenize(expr: &str) -> Result<Vec<Token>, MathError> {
    let mut tokens = Vec::new();
    let mut number = String::new();

    for c in expr.chars() {
        if c.is_ascii_digit() {
            number.push(c);
        } else if c == '.' {
            if number.contains('.') {
                number.push(c);
                return Err(MathError::MalformedNumber(number));
            }
            number.push(c);
        } else if OPERATOR_CHARS.contains(c) {
            flush_number(&mut number, &mut tokens)?;
            tokens.push(Token::Operator(c));
        } else if c.is_whitespace() {
            flush_number(&mut number, &mut tokens)?;
        } else {
            return Err(MathError::InvalidCharacter(c));
        }
    }
    flush_number(&mut number, &mut tokens)?;

    Ok(tokens)
}

fn flush_number(number: &mut String, tokens: &mut Vec<Token>) -> Result<(), MathError> {
    if number.is_empty() {
        return Ok(());
    }

    let text = std::mem::take(number);
    let value = text
        .parse::<f64>()
        .map_err(|_| MathError::MalformedNumber(text))?;
    tokens.push(Token::Number(value));
    Ok(())
}

fn precedence(op: char) -> u8 {
    match op {
        '*' | '/' => 2,
        _ => 1,
    }
}

/// Shunting-yard. Operators pop while the stack top has precedence >= the
/// incoming operator's (left-associative tie-break).
fn infix_to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, MathError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<char> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) => output.push(token),
            Token::Operator(op) => {
                while let Some(&top) = stack.last() {
                    if precedence(top) >= precedence(op) {
                        output.push(Token::Operator(top));
                        stack.pop();
                    } else {
                        break;
                    }
                }
                stack.push(op);
            }
        }
    }

    while let Some(op) = stack.pop() {
        output.push(Token::Operator(op));
    }

    Ok(output)
}

fn eval_postfix(tokens: &[Token]) -> Result<f64, MathError> {
    let mut stack: Vec<f64> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(value) => stack.push(*value),
            Token::Operator(op) => {
                let b = stack.pop().ok_or(MathError::MalformedExpression)?;
                let a = stack.pop().ok_or(MathError::MalformedExpression)?;
                let result = match op {
                    '+' => a + b,
                    '-' => a - b,
                    '*' => a * b,
                    '/' => {
                        if b == 0.0 {
                            return Err(MathError::DivisionByZero);
                        }
                        a / b
                    }
                    _ => return Err(MathError::MalformedExpression),
                };
                stack.push(result);
            }
        }
    }

    if stack.len() != 1 {
        // Two numbers with no operator land here, among other shapes.
        return Err(MathError::MalformedExpression);
    }
    Ok(stack[0])
}

/// Two-decimal render with the zero tail trimmed: 4.00 -> "4", 2.50 -> "2.5".
fn format_result(value: f64) -> String {
    let rendered = format!("{value:.2}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
