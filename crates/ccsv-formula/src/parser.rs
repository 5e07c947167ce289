//! Formula parser
//!
//! Splits a formula body into operands and the four arithmetic operators,
//! then parses each operand into a literal, a reference or an aggregate call.
//!
//! A `-` only separates operands when it follows a complete operand: a minus
//! that starts an operand is a negation marker, a minus right after `#` is
//! the sign of an offset (`#-1`), and a minus after a numeric exponent
//! (`1e-3`) belongs to the number. Operators inside parentheses belong to
//! the enclosing function call.

use crate::ast::{
    AggregateCall, ColumnSpec, Formula, Operand, Operator, Param, RangeReference, Reference,
    RowSpec, Term,
};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::AggregateFunction;
use ccsv_core::{parse_number, FORMULA_MARKER};
use lazy_regex::regex_captures;

/// Separates aggregate parameters
pub const PARAM_SEPARATOR: char = ';';

/// Separates the endpoints of a range parameter
pub const RANGE_SEPARATOR: char = '>';

/// Wildcard that leaves the column or line part unspecified
pub const WHOLE_AXIS: &str = "##";

/// Parse a formula (with or without its leading `=`)
///
/// # Example
/// ```rust
/// use ccsv_formula::{parse_formula, Operator};
///
/// let formula = parse_formula("=price:1*#-1:#0").unwrap();
/// assert_eq!(formula.operand_count(), 2);
/// assert_eq!(formula.rest[0].0, Operator::Multiply);
/// ```
pub fn parse_formula(text: &str) -> FormulaResult<Formula> {
    let body = text.strip_prefix(FORMULA_MARKER).unwrap_or(text);

    let mut tokens = tokenize(body)?.into_iter();
    let first = match tokens.next() {
        Some(Token::Operand(operand)) => parse_operand(&operand)?,
        _ => return Err(FormulaError::malformed_formula(text, "empty formula")),
    };

    let mut rest = Vec::new();
    while let Some(token) = tokens.next() {
        match (token, tokens.next()) {
            (Token::Operator(op), Some(Token::Operand(operand))) => {
                rest.push((op, parse_operand(&operand)?));
            }
            _ => {
                return Err(FormulaError::malformed_formula(
                    text,
                    "operators and operands must alternate",
                ))
            }
        }
    }

    Ok(Formula { first, rest })
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Operand(String),
    Operator(Operator),
}

/// Split a formula body into alternating operands and operators
fn tokenize(body: &str) -> FormulaResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in body.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| FormulaError::malformed_formula(body, "unbalanced ')'"))?;
                current.push(c);
            }
            '*' | '/' if depth == 0 => {
                push_operand(&mut tokens, &mut current, body)?;
                tokens.extend(Operator::from_char(c).map(Token::Operator));
            }
            '+' | '-' if depth == 0 && ends_operand(&current) => {
                push_operand(&mut tokens, &mut current, body)?;
                tokens.extend(Operator::from_char(c).map(Token::Operator));
            }
            _ => current.push(c),
        }
    }

    if depth > 0 {
        return Err(FormulaError::malformed_formula(body, "unbalanced '('"));
    }
    push_operand(&mut tokens, &mut current, body)?;

    Ok(tokens)
}

fn push_operand(tokens: &mut Vec<Token>, current: &mut String, body: &str) -> FormulaResult<()> {
    let operand = current.trim();
    if operand.is_empty() {
        return Err(FormulaError::malformed_formula(body, "missing operand"));
    }
    tokens.push(Token::Operand(operand.to_string()));
    current.clear();
    Ok(())
}

/// Whether a `+`/`-` following this text is a binary operator
fn ends_operand(current: &str) -> bool {
    let text = current.trim();
    if text.is_empty() || text.ends_with('#') {
        return false;
    }
    // `1e-3`: the sign belongs to the exponent
    match text.strip_suffix(['e', 'E']) {
        Some(mantissa) => parse_number(mantissa).is_none(),
        None => true,
    }
}

/// Parse one operand: an aggregate call, a reference or a number
pub fn parse_operand(token: &str) -> FormulaResult<Operand> {
    let token = token.trim();

    if let Some((_, minus, name, params)) =
        regex_captures!(r"^(-?)\s*([A-Za-z_][A-Za-z0-9_]*)\s*\((.*)\)$"s, token)
    {
        let function = AggregateFunction::from_name(name)
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;
        return Ok(Operand::Aggregate(AggregateCall {
            function,
            negated: !minus.is_empty(),
            params: parse_params(token, params)?,
        }));
    }

    parse_term(token).map(Operand::Term)
}

fn parse_params(call: &str, params: &str) -> FormulaResult<Vec<Param>> {
    if params.trim().is_empty() {
        return Err(FormulaError::malformed_formula(
            call,
            "aggregate functions need at least one parameter",
        ));
    }

    params
        .split(PARAM_SEPARATOR)
        .map(|param| parse_param(param.trim()))
        .collect()
}

/// Parse one aggregate parameter: a term or a `from>to` range
pub fn parse_param(param: &str) -> FormulaResult<Param> {
    let Some((from, to)) = param.split_once(RANGE_SEPARATOR) else {
        return parse_term(param).map(Param::Single);
    };

    let endpoint = |text: &str| -> FormulaResult<Reference> {
        match parse_term(text.trim())? {
            Term::Reference(reference) => Ok(reference),
            Term::Literal(_) => Err(FormulaError::malformed_reference(
                param,
                "range endpoints must be references",
            )),
        }
    };

    Ok(Param::Range(RangeReference {
        from: endpoint(from)?,
        to: endpoint(to)?,
    }))
}

/// Parse a reference token
///
/// `token := ["-"] header [":" line]`. When the header part is a number the
/// whole token is a literal and the line part is ignored.
pub fn parse_term(token: &str) -> FormulaResult<Term> {
    let (header, line) = match token.split_once(':') {
        Some((header, line)) => (header, Some(line)),
        None => (token, None),
    };

    if let Some(n) = parse_number(header) {
        return Ok(Term::Literal(n));
    }

    let (negated, header) = match header.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, header),
    };

    let column = if header == WHOLE_AXIS {
        ColumnSpec::All
    } else if let Some(offset) = header.strip_prefix('#') {
        ColumnSpec::Offset(parse_offset(token, offset)?)
    } else {
        ColumnSpec::Name(header.to_string())
    };

    let row = match line {
        None => RowSpec::All,
        Some(WHOLE_AXIS) => RowSpec::All,
        Some(line) => match line.strip_prefix('#') {
            Some(offset) => RowSpec::Offset(parse_offset(token, offset)?),
            None => RowSpec::Line(line.trim().parse().map_err(|_| {
                FormulaError::malformed_reference(
                    token,
                    format!("line '{}' is not a line number", line),
                )
            })?),
        },
    };

    Ok(Term::Reference(Reference {
        token: token.to_string(),
        negated,
        column,
        row,
    }))
}

fn parse_offset(token: &str, offset: &str) -> FormulaResult<i64> {
    offset.trim().parse().map_err(|_| {
        FormulaError::malformed_reference(
            token,
            format!("offset '{}' is not an integer", offset),
        )
    })
}
