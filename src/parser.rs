use logos::Logos;

use crate::{config::MAX_NESTING, error::SchemeError};


#[derive(Debug, Clone, Copy, PartialEq, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r";[^\n]*")]
enum Token<'a> {
    #[token("(")]
    LeftParen,

    #[token("'(")]
    QuotedParen,

    #[token("'")]
    Quote,

    #[token(")")]
    RightParen,

    #[token("#t", |_| true)]
    #[token("#f", |_| false)]
    Boolean(bool),

    #[regex(r"-?[0-9]+", |lex| lex.slice())]
    Integer(&'a str),

    #[regex(r"-?[0-9]+\.[0-9]+", |lex| lex.slice())]
    Float(&'a str),

    #[regex(r#""[^"]*""#, |lex| { let slice = lex.slice(); &slice[1..slice.len() - 1] })]
    Str(&'a str),

    #[token("+", |lex| lex.slice())]
    #[token("-", |lex| lex.slice())]
    #[token("*", |lex| lex.slice())]
    #[token("**", |lex| lex.slice())]
    #[token("/", |lex| lex.slice())]
    #[token("<", |lex| lex.slice())]
    #[token(">", |lex| lex.slice())]
    #[token("=", |lex| lex.slice())]
    #[token("<=", |lex| lex.slice())]
    #[token(">=", |lex| lex.slice())]
    Operator(&'a str),

    #[regex(r#"[A-Za-z_!$%&:?^~|@][^\s()'";]*"#, |lex| lex.slice())]
    Identifier(&'a str),

    // Never produced by logos, appended once the input is exhausted
    End,
}

#[derive(Debug, Clone, Copy)]
struct Lexeme<'a> {
    token: Token<'a>,
    offset: usize,
}

/// A node of the syntax tree. Text-carrying nodes borrow from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Str(&'a str),
    Identifier(&'a str),
    Operator(&'a str),
    /// `( op arg ... )`. Empty only where a form expects a list, as in `(let () ...)`.
    Expression(Vec<Self>),
    /// `'( e ... )`
    QuotedList(Vec<Self>),
    /// `'atom`
    QuotedAtom(Box<Self>),
}

impl<'a> Node<'a> {
    /// Source text of a name-like node, used for definition names and parameters.
    pub fn name(&self) -> Option<&'a str> {
        match self {
            Self::Identifier(name) | Self::Operator(name) => Some(name),
            _ => None,
        }
    }
}

type ParseResult<O> = Result<O, SchemeError>;


fn lexer<'a>(input: &'a str) -> ParseResult<Vec<Lexeme<'a>>> {
    let mut lexemes = vec![];
    let mut tokenizer = Token::lexer(input);

    while let Some(result) = tokenizer.next() {
        match result {
            Ok(token) => lexemes.push(Lexeme { token, offset: tokenizer.span().start }),
            Err(_) => return Err(SchemeError::Syntax { offset: tokenizer.span().start })
        }
    }

    lexemes.push(Lexeme { token: Token::End, offset: input.len() });
    Ok(lexemes)
}

// `(let () ...)` and `' ()` are the only places an empty `()` may appear
fn empty_expression_allowed(before: &[Lexeme<'_>]) -> bool {
    matches!(
        before,
        [.., Lexeme { token: Token::Quote, .. }]
            | [.., Lexeme { token: Token::LeftParen, .. }, Lexeme { token: Token::Identifier("let"), .. }]
    )
}

/// Rejects stray empty expressions and nesting deeper than [`MAX_NESTING`] before any
/// tree is built, so no tree is ever too deep to walk or drop.
fn check_structure(lexemes: &[Lexeme<'_>]) -> ParseResult<()> {
    // Levels added by each open parenthesis, counting the quotes in front of it
    let mut open: Vec<usize> = vec![];
    let mut depth = 0;
    let mut quotes = 0;

    for (index, lexeme) in lexemes.iter().enumerate() {
        match lexeme.token {
            Token::Quote => quotes += 1,
            Token::LeftParen | Token::QuotedParen => {
                open.push(quotes + 1);
                depth += quotes + 1;
                quotes = 0;
            }
            Token::RightParen => {
                if index > 0 && lexemes[index - 1].token == Token::LeftParen
                    && !empty_expression_allowed(&lexemes[..index - 1]) {
                    return Err(SchemeError::Syntax { offset: lexemes[index - 1].offset });
                }
                depth -= open.pop().unwrap_or(0);
                quotes = 0;
            }
            _ => quotes = 0,
        }

        if depth + quotes > MAX_NESTING {
            return Err(SchemeError::Syntax { offset: lexeme.offset });
        }
    }

    Ok(())
}

fn syntax_error(lexemes: &[Lexeme<'_>]) -> SchemeError {
    SchemeError::Syntax { offset: lexemes.first().map_or(0, |lexeme| lexeme.offset) }
}

fn parse_token<'a, 'b: 'a>(token_recognizer: impl Fn(&Token<'b>) -> bool) -> impl Fn(&'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], Token<'b>)> {
    move |lexemes| {
        match lexemes.first() {
            Some(lexeme) if token_recognizer(&lexeme.token) => Ok((&lexemes[1..], lexeme.token)),
            _ => Err(syntax_error(lexemes))
        }
    }
}

fn parse_surrounds<'a, 'b: 'a, O>(
    start_recognizer: impl Fn(&Token<'b>) -> bool,
    internal_parser: impl Fn(&'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], O)>,
    end_recognizer: impl Fn(&Token<'b>) -> bool,
) -> impl Fn(&'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], O)> {
    let start_parser = parse_token(start_recognizer);
    let end_parser = parse_token(end_recognizer);

    move |lexemes| {
        let (lexemes, _) = start_parser(lexemes)?;
        let (lexemes, internal) = internal_parser(lexemes)?;
        let (lexemes, _) = end_parser(lexemes)?;

        Ok((lexemes, internal))
    }
}

fn parse_list<'a, 'b: 'a, O>(
    parser: impl Fn(&'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], O)>
) -> impl Fn(&'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], Vec<O>)> {
    move |mut lexemes| {
        let mut result = vec![];

        while let Ok((new_lexemes, value)) = parser(lexemes) {
            result.push(value);
            lexemes = new_lexemes
        }

        Ok((lexemes, result))
    }
}

fn parser_map<'a, 'b: 'a, I, O>(
    parser: impl Fn(&'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], I)>,
    f: impl Fn(I) -> O
) -> impl Fn(&'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], O)> {
    move |lexemes| {
        let (lexemes, value) = parser(lexemes)?;
        Ok((lexemes, f(value)))
    }
}

fn parse_atom<'a, 'b: 'a>(lexemes: &'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], Node<'b>)> {
    let (rest, token) = parse_token(|token| matches!(token,
        Token::Boolean(_) | Token::Integer(_) | Token::Float(_) | Token::Str(_) | Token::Operator(_) | Token::Identifier(_)
    ))(lexemes)?;

    let node = match token {
        Token::Boolean(value) => Node::Boolean(value),
        // Literals that do not fit the host types are rejected like any other bad token
        Token::Integer(text) => Node::Integer(text.parse().map_err(|_| syntax_error(lexemes))?),
        Token::Float(text) => Node::Float(text.parse().map_err(|_| syntax_error(lexemes))?),
        Token::Str(text) => Node::Str(text),
        Token::Operator(text) => Node::Operator(text),
        Token::Identifier(text) => Node::Identifier(text),
        _ => unreachable!("filtered by the recognizer")
    };
    Ok((rest, node))
}

fn parse_expression<'a, 'b: 'a>(lexemes: &'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], Node<'b>)> {
    parse_surrounds(
        |token| matches!(token, Token::LeftParen),
        parser_map(parse_list(parse_node), Node::Expression),
        |token| matches!(token, Token::RightParen)
    )(lexemes)
}

fn parse_quoted_list<'a, 'b: 'a>(lexemes: &'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], Node<'b>)> {
    parse_surrounds(
        |token| matches!(token, Token::QuotedParen),
        parser_map(parse_list(parse_node), Node::QuotedList),
        |token| matches!(token, Token::RightParen)
    )(lexemes)
}

fn parse_quoted_node<'a, 'b: 'a>(lexemes: &'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], Node<'b>)> {
    // `' (a b)` with a gap is the same as `'(a b)`
    let (lexemes, _) = parse_token(|token| matches!(token, Token::Quote))(lexemes)?;
    let (lexemes, node) = parse_node(lexemes)?;
    let node = match node {
        Node::Expression(nodes) => Node::QuotedList(nodes),
        atom => Node::QuotedAtom(Box::new(atom)),
    };
    Ok((lexemes, node))
}

fn parse_node<'a, 'b: 'a>(lexemes: &'a [Lexeme<'b>]) -> ParseResult<(&'a [Lexeme<'b>], Node<'b>)> {
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
        match lexemes.first().map(|lexeme| lexeme.token) {
            Some(Token::LeftParen) => parse_expression(lexemes),
            Some(Token::QuotedParen) => parse_quoted_list(lexemes),
            Some(Token::Quote) => parse_quoted_node(lexemes),
            _ => parse_atom(lexemes),
        }
    })
}

/// Parses a whole program into its top-level forms.
///
/// Parsing is all or nothing: on the first defect the whole parse fails with
/// [`SchemeError::Syntax`] and no partial tree is returned.
pub fn parse(input: &str) -> ParseResult<Vec<Node<'_>>> {
    let lexemes = lexer(input)?;
    check_structure(&lexemes)?;

    let (rest, nodes) = parse_list(parse_node)(&lexemes[..])?;
    match rest.first().map(|lexeme| lexeme.token) {
        Some(Token::End) => Ok(nodes),
        _ => Err(syntax_error(rest)),
    }
}
