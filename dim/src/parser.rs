//! Recursive-descent parser
//!
//! ```text
//! input    := expr (('->' | 'to') unit)? End
//! expr     := term (('+' | '-') term)*
//! term     := factor (('*' | '/') factor)*
//! factor   := unary ('^' exponent)?
//! unary    := '-'? atom
//! atom     := number unit? | identifier | identifier '(' args ')' | '(' expr ')'
//! exponent := '-'? number | '(' '-'? number ('/' '-'? number)? ')'
//! unit     := symbol ('^' '-'? integer)? (('*' | '/') symbol ('^' '-'? integer)?)*
//! ```

use dim_core::rational;
use dim_core::{DimError, Power, Quantity};
use dim_units::{Unit, UNITS};
use crate::ast::{BinOp, Expr, UnaryOp};
use crate::lexer::{tokenize, Operator, Token, TokenKind};

/// Default limit on nested parentheses and function calls
pub const DEFAULT_MAX_DEPTH: usize = 48;

/// Limit on root-to-leaf tree depth, where every operand of an operator
/// chain adds a level
const MAX_TREE_DEPTH: usize = 2048;

/// Parse tokens into AST
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    nesting: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Result<Self, DimError> {
        Ok(Parser {
            source,
            tokens: tokenize(source)?,
            pos: 0,
            nesting: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn peek(&self) -> &TokenKind {
        &self.peek_token().kind
    }

    fn peek_token(&self) -> &Token {
        // tokenize always ends with End, and End is never consumed
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if !matches!(self.tokens[index].kind, TokenKind::End) {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    fn error(&self, expected: &str) -> DimError {
        let token = self.peek_token();
        DimError::parse(token.span.start, expected, token.describe(self.source))
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<(), DimError> {
        if *self.peek() == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    /// Parse a complete input, including an optional conversion target
    pub fn parse(&mut self) -> Result<Expr, DimError> {
        let mut expr = self.parse_expr()?;

        let convert = match self.peek() {
            TokenKind::Arrow => true,
            TokenKind::Identifier(word) => word == "to",
            _ => false,
        };
        if convert {
            self.advance();
            expr = Expr::Convert(Box::new(expr), self.parse_target()?);
        }

        if !matches!(self.peek(), TokenKind::End) {
            return Err(self.error("operator or end of input"));
        }
        Ok(expr)
    }

    fn parse_target(&mut self) -> Result<Unit, DimError> {
        if !self.at_unit(0) {
            return Err(self.error("unit"));
        }
        self.parse_unit()
    }

    /// Enter a parenthesized group or call. Each one costs several parser
    /// and evaluator frames, so `max_depth` keeps them within a default
    /// thread stack.
    fn enter(&mut self) -> Result<(), DimError> {
        self.nesting += 1;
        if self.nesting > self.max_depth {
            return Err(self.error(&format!("at most {} levels of nesting", self.max_depth)));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    /// Count one more level of tree depth. Chains are evaluated in a loop,
    /// but the tree is still dropped recursively.
    fn descend(&mut self) -> Result<(), DimError> {
        self.depth += 1;
        if self.depth > MAX_TREE_DEPTH {
            return Err(self.error(&format!("at most {} chained operands", MAX_TREE_DEPTH)));
        }
        Ok(())
    }

    // expr = term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<Expr, DimError> {
        let saved = self.depth;
        self.descend()?;
        let mut left = self.parse_term()?;

        loop {
            let op = match self.peek() {
                TokenKind::Operator(Operator::Plus) => BinOp::Add,
                TokenKind::Operator(Operator::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            self.descend()?;
            let right = self.parse_term()?;
            left = Expr::BinaryOp(Box::new(left), op, Box::new(right));
        }

        self.depth = saved;
        Ok(left)
    }

    // term = factor (('*' | '/') factor)*
    fn parse_term(&mut self) -> Result<Expr, DimError> {
        let saved = self.depth;
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.peek() {
                TokenKind::Operator(Operator::Star) => BinOp::Mul,
                TokenKind::Operator(Operator::Slash) => BinOp::Div,
                _ => break,
            };
            self.advance();
            self.descend()?;
            let right = self.parse_factor()?;
            left = Expr::BinaryOp(Box::new(left), op, Box::new(right));
        }

        self.depth = saved;
        Ok(left)
    }

    // factor = unary ('^' exponent)?  (non-associative)
    fn parse_factor(&mut self) -> Result<Expr, DimError> {
        let base = self.parse_unary()?;

        if !matches!(self.peek(), TokenKind::Operator(Operator::Caret)) {
            return Ok(base);
        }
        self.advance();
        let power = self.parse_exponent()?;

        if matches!(self.peek(), TokenKind::Operator(Operator::Caret)) {
            return Err(self.error("parentheses around a chained '^'"));
        }
        Ok(Expr::Power(Box::new(base), power))
    }

    // unary = '-'? atom
    fn parse_unary(&mut self) -> Result<Expr, DimError> {
        if matches!(self.peek(), TokenKind::Operator(Operator::Minus)) {
            self.advance();
            let operand = self.parse_atom()?;
            return Ok(Expr::UnaryOp(UnaryOp::Neg, Box::new(operand)));
        }
        self.parse_atom()
    }

    // atom = number unit? | identifier | identifier '(' args ')' | '(' expr ')'
    fn parse_atom(&mut self) -> Result<Expr, DimError> {
        match self.peek().clone() {
            TokenKind::Number(value) => {
                self.advance();
                if self.at_unit(0) {
                    let unit = self.parse_unit()?;
                    Ok(Expr::Literal(unit.quantity(value)))
                } else {
                    Ok(Expr::Literal(Quantity::dimensionless(value)))
                }
            }
            TokenKind::Identifier(name) => {
                self.advance();
                if matches!(self.peek(), TokenKind::LParen) {
                    self.enter()?;
                    self.advance();
                    let args = self.parse_args()?;
                    self.leave();
                    return Ok(Expr::Call(name, args));
                }
                Ok(Expr::Identifier(name))
            }
            TokenKind::LParen => {
                self.enter()?;
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                self.leave();
                Ok(expr)
            }
            _ => Err(self.error("number, identifier or '('")),
        }
    }

    // args = (expr (',' expr)*)? ')'
    fn parse_args(&mut self) -> Result<Vec<Expr>, DimError> {
        let mut args = Vec::new();
        if matches!(self.peek(), TokenKind::RParen) {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr()?);
            match self.peek() {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RParen => {
                    self.advance();
                    return Ok(args);
                }
                _ => return Err(self.error("',' or ')'")),
            }
        }
    }

    // exponent = '-'? number | '(' '-'? number ('/' '-'? number)? ')'
    fn parse_exponent(&mut self) -> Result<Power, DimError> {
        if !matches!(self.peek(), TokenKind::LParen) {
            return self.parse_signed_literal();
        }
        self.advance();

        let numerator = self.parse_signed_literal()?;
        let power = if matches!(self.peek(), TokenKind::Operator(Operator::Slash)) {
            self.advance();
            let denominator = self.parse_signed_literal()?;
            divide_powers(&numerator, &denominator)?
        } else {
            numerator
        };

        self.expect(TokenKind::RParen, "')'")?;
        Ok(power)
    }

    fn parse_signed_literal(&mut self) -> Result<Power, DimError> {
        let negative = matches!(self.peek(), TokenKind::Operator(Operator::Minus));
        if negative {
            self.advance();
        }

        let TokenKind::Number(value) = *self.peek() else {
            return Err(self.error("numeric exponent"));
        };
        let source = self.source;
        let text = self.advance().text(source);
        let power = match rational::parse_decimal(text) {
            Some(exact) => Power::ratio(exact),
            None => Power::real(value),
        };
        Ok(if negative { power.negate() } else { power })
    }

    /// Is the token at `offset` an identifier naming a unit?
    fn at_unit(&self, offset: usize) -> bool {
        matches!(self.peek_at(offset), TokenKind::Identifier(name) if UNITS.is_unit(name))
    }

    // unit = unit_pow (('*' | '/') unit_pow)*
    //
    // Only continues past '*' or '/' when a unit symbol follows, so in
    // `10 m / 2 s` the unit of `10` is just `m`.
    fn parse_unit(&mut self) -> Result<Unit, DimError> {
        let mut unit = self.parse_unit_pow()?;

        loop {
            let divide = match self.peek() {
                TokenKind::Operator(Operator::Star) => false,
                TokenKind::Operator(Operator::Slash) => true,
                _ => break,
            };
            if !self.at_unit(1) {
                break;
            }
            self.advance();
            let next = self.parse_unit_pow()?;
            unit = if divide { unit.divide(&next)? } else { unit.multiply(&next)? };
        }

        Ok(unit)
    }

    // unit_pow = symbol ('^' '-'? integer)?
    fn parse_unit_pow(&mut self) -> Result<Unit, DimError> {
        let unit = match self.peek() {
            TokenKind::Identifier(symbol) => UNITS.resolve(symbol),
            _ => None,
        };
        let Some(unit) = unit else {
            return Err(self.error("unit"));
        };
        self.advance();

        if !matches!(self.peek(), TokenKind::Operator(Operator::Caret)) {
            return Ok(unit);
        }
        self.advance();

        let negative = matches!(self.peek(), TokenKind::Operator(Operator::Minus));
        if negative {
            self.advance();
        }
        let exponent = match self.peek() {
            TokenKind::Number(_) => self.peek_token().text(self.source).parse::<i32>().ok(),
            _ => None,
        };
        let Some(exponent) = exponent else {
            return Err(self.error("integer unit exponent"));
        };
        self.advance();

        unit.power(if negative { -exponent } else { exponent })
    }
}

fn divide_powers(numerator: &Power, denominator: &Power) -> Result<Power, DimError> {
    if denominator.value == 0.0 {
        return Err(DimError::DivisionByZero);
    }
    let exact = match (numerator.exact, denominator.exact) {
        (Some(n), Some(d)) => rational::div(&n, &d),
        _ => None,
    };
    Ok(match exact {
        Some(r) => Power::ratio(r),
        None => Power::real(numerator.value / denominator.value),
    })
}

/// Parse an expression string into an AST
pub fn parse_expr(input: &str) -> Result<Expr, DimError> {
    Parser::new(input)?.parse()
}

/// Check that `name` is a single identifier, as required for constant names
pub fn parse_name(name: &str) -> Result<&str, DimError> {
    let tokens = tokenize(name)?;
    match tokens.as_slice() {
        [Token { kind: TokenKind::Identifier(_), .. }, Token { kind: TokenKind::End, .. }] => Ok(name.trim()),
        [first, ..] => Err(DimError::parse(first.span.start, "constant name", first.describe(name))),
        [] => Err(DimError::parse(0, "constant name", "end of input")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dim_core::Dimension;

    fn literal(expr: &Expr) -> Quantity {
        match expr {
            Expr::Literal(q) => *q,
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple() {
        let expr = parse_expr("1 + 2").unwrap();
        assert!(matches!(expr, Expr::BinaryOp(_, BinOp::Add, _)));
    }

    #[test]
    fn test_unit_attaches_to_literal() {
        let expr = parse_expr("5 km").unwrap();
        assert_eq!(literal(&expr), Quantity::new(5000.0, Dimension::LENGTH));
    }

    #[test]
    fn test_compound_unit() {
        let expr = parse_expr("9.8 m/s^2").unwrap();
        let q = literal(&expr);
        assert_eq!(q.value, 9.8);
        assert_eq!(q.dimension, Dimension::ACCELERATION);

        let expr = parse_expr("1 kg*m/s^2").unwrap();
        assert_eq!(literal(&expr).dimension, Dimension::FORCE);
    }

    #[test]
    fn test_unit_stops_before_number() {
        // 10 m / 2 s is (10 m) / (2 s), not 10 (m/2) s
        let expr = parse_expr("10 m / 2 s").unwrap();
        let Expr::BinaryOp(left, BinOp::Div, right) = expr else {
            panic!("expected division");
        };
        assert_eq!(literal(&left), Quantity::new(10.0, Dimension::LENGTH));
        assert_eq!(literal(&right), Quantity::new(2.0, Dimension::TIME));
    }

    #[test]
    fn test_unknown_identifier_is_not_a_unit() {
        let expr = parse_expr("2 * g").unwrap();
        let Expr::BinaryOp(_, BinOp::Mul, right) = expr else {
            panic!("expected multiplication");
        };
        assert_eq!(*right, Expr::Identifier("g".into()));

        // No implicit multiplication with constants
        let err = parse_expr("2 x").unwrap_err();
        assert!(matches!(err, DimError::Parse { position: 2, .. }));
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 groups the product
        let expr = parse_expr("1 + 2 * 3").unwrap();
        let Expr::BinaryOp(_, BinOp::Add, right) = expr else {
            panic!("expected addition at the root");
        };
        assert!(matches!(*right, Expr::BinaryOp(_, BinOp::Mul, _)));

        // unary minus binds tighter than ^
        let expr = parse_expr("-2^2").unwrap();
        let Expr::Power(base, _) = expr else {
            panic!("expected power at the root");
        };
        assert!(matches!(*base, Expr::UnaryOp(UnaryOp::Neg, _)));
    }

    #[test]
    fn test_left_associative() {
        let expr = parse_expr("8 - 4 - 2").unwrap();
        let Expr::BinaryOp(left, BinOp::Sub, _) = expr else {
            panic!("expected subtraction");
        };
        assert!(matches!(*left, Expr::BinaryOp(_, BinOp::Sub, _)));
    }

    #[test]
    fn test_exponents() {
        let Expr::Power(_, power) = parse_expr("x^2").unwrap() else {
            panic!("expected power");
        };
        assert_eq!(power, Power::integer(2));

        let Expr::Power(_, power) = parse_expr("x^-3").unwrap() else {
            panic!("expected power");
        };
        assert_eq!(power.exact, Some(rational::int(-3)));

        let Expr::Power(_, power) = parse_expr("x^(1/2)").unwrap() else {
            panic!("expected power");
        };
        assert_eq!(power.exact, rational::ratio(1, 2));

        let Expr::Power(_, power) = parse_expr("x^(-2/4)").unwrap() else {
            panic!("expected power");
        };
        assert_eq!(power.exact, rational::ratio(-1, 2));
    }

    #[test]
    fn test_exponent_must_be_literal() {
        let err = parse_expr("2^x").unwrap_err();
        assert!(matches!(err, DimError::Parse { ref expected, .. } if expected == "numeric exponent"));
    }

    #[test]
    fn test_power_is_non_associative() {
        let err = parse_expr("2^3^2").unwrap_err();
        assert!(matches!(err, DimError::Parse { position: 3, .. }));
    }

    #[test]
    fn test_calls() {
        let expr = parse_expr("max(1 m, 2 m)").unwrap();
        let Expr::Call(name, args) = expr else {
            panic!("expected call");
        };
        assert_eq!(name, "max");
        assert_eq!(args.len(), 2);

        assert!(matches!(parse_expr("f()").unwrap(), Expr::Call(_, ref a) if a.is_empty()));
    }

    #[test]
    fn test_conversion() {
        let expr = parse_expr("1500 m -> km").unwrap();
        let Expr::Convert(_, unit) = expr else {
            panic!("expected conversion");
        };
        assert_eq!(unit.symbol, "km");

        let expr = parse_expr("36 km/h to m/s").unwrap();
        let Expr::Convert(_, unit) = expr else {
            panic!("expected conversion");
        };
        assert_eq!(unit.symbol, "m/s");

        assert!(parse_expr("1 m -> x").is_err());
    }

    #[test]
    fn test_syntax_errors() {
        let err = parse_expr("(1 + 2").unwrap_err();
        assert_eq!(err, DimError::parse(6, "')'", "end of input"));

        let err = parse_expr("1 + 2)").unwrap_err();
        assert_eq!(err, DimError::parse(5, "operator or end of input", "')'"));

        let err = parse_expr("").unwrap_err();
        assert_eq!(err, DimError::parse(0, "number, identifier or '('", "end of input"));

        assert!(parse_expr("--2").is_err());
        assert!(parse_expr("2 m^1.5").is_err());
    }

    fn nested(levels: usize) -> String {
        format!("{}1{}", "(".repeat(levels), ")".repeat(levels))
    }

    #[test]
    fn test_nesting_limit() {
        assert!(parse_expr(&nested(DEFAULT_MAX_DEPTH)).is_ok());
        let err = parse_expr(&nested(DEFAULT_MAX_DEPTH + 1)).unwrap_err();
        assert!(matches!(err, DimError::Parse { position, .. } if position == DEFAULT_MAX_DEPTH));

        let err = Parser::new(&nested(20)).unwrap().with_max_depth(10).parse().unwrap_err();
        assert!(matches!(err, DimError::Parse { position: 10, .. }));

        // calls nest like parentheses
        let calls = format!("{}1{}", "abs(".repeat(11), ")".repeat(11));
        assert!(Parser::new(&calls).unwrap().with_max_depth(10).parse().is_err());
        assert!(Parser::new(&calls).unwrap().with_max_depth(11).parse().is_ok());

        // siblings do not add up
        let siblings = vec![nested(10); 20].join(" + ");
        assert!(Parser::new(&siblings).unwrap().with_max_depth(10).parse().is_ok());
    }

    #[test]
    fn test_chain_limit() {
        let chain = vec!["1"; 1000].join(" + ");
        assert!(Parser::new(&chain).unwrap().with_max_depth(1).parse().is_ok());

        let chain = vec!["2 m"; MAX_TREE_DEPTH + 10].join(" * ");
        let err = parse_expr(&chain).unwrap_err();
        assert!(matches!(err, DimError::Parse { ref expected, .. } if expected.contains("chained operands")));
    }

    #[test]
    fn test_parse_name() {
        assert_eq!(parse_name("g").unwrap(), "g");
        assert_eq!(parse_name(" speed_of_light ").unwrap(), "speed_of_light");
        assert!(parse_name("1x").is_err());
        assert!(parse_name("a b").is_err());
        assert!(parse_name("").is_err());
    }
}
