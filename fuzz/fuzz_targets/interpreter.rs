#![no_main]

use core::fmt;
use std::io;

use itertools::Itertools;
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};

// Operators and names the generated programs draw from
#[derive(Arbitrary, Debug)]
enum SchemeAtom {
    Add, Sub, Mul, Pow, Div, Mod,
    Less, LessEq, Greater, GreaterEq, Eq,
    Not, And, Or,
    True, False, EmptyList,

    Identifier(String),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for SchemeAtom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            SchemeAtom::Add => "+",
            SchemeAtom::Sub => "-",
            SchemeAtom::Mul => "*",
            SchemeAtom::Pow => "**",
            SchemeAtom::Div => "/",
            SchemeAtom::Mod => "mod",
            SchemeAtom::Less => "<",
            SchemeAtom::LessEq => "<=",
            SchemeAtom::Greater => ">",
            SchemeAtom::GreaterEq => ">=",
            SchemeAtom::Eq => "=",
            SchemeAtom::Not => "not",
            SchemeAtom::And => "and",
            SchemeAtom::Or => "or",
            SchemeAtom::True => "#t",
            SchemeAtom::False => "#f",
            SchemeAtom::EmptyList => "'()",
            SchemeAtom::Identifier(identifier) => identifier.as_str(),
            SchemeAtom::Integer(value) => return write!(f, "{}", value),
            SchemeAtom::Float(value) => return write!(f, "{:?}", value),
            SchemeAtom::Text(text) => return write!(f, "\"{}\"", text.replace('"', "")),
        })
    }
}

#[derive(Arbitrary, Debug)]
enum SchemeCommand {
    Define(Vec<SchemeCommand>),
    If(Vec<SchemeCommand>),
    Cond(Vec<SchemeCommand>),
    Let(Vec<SchemeCommand>),
    Display(Vec<SchemeCommand>),
    Car(Vec<SchemeCommand>),
    Cdr(Vec<SchemeCommand>),
    Cons(Vec<SchemeCommand>),
    Null(Vec<SchemeCommand>),
    Call(Vec<SchemeCommand>),
    Quote(Vec<SchemeCommand>),
    Newline,
    Read,

    Atom(SchemeAtom),
}

fn stringify_arguments(values: &[SchemeCommand]) -> String {
    values.iter()
        .map(SchemeCommand::to_string)
        .join(" ")
}

impl fmt::Display for SchemeCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (head, args) = match self {
            SchemeCommand::Atom(atom) => return atom.fmt(f),
            SchemeCommand::Quote(args) => return write!(f, "'({})", stringify_arguments(args)),
            SchemeCommand::Call(args) => return write!(f, "({})", stringify_arguments(args)),
            SchemeCommand::Newline => return write!(f, "(newline)"),
            SchemeCommand::Read => return write!(f, "(read)"),
            SchemeCommand::Define(args) => ("define", args),
            SchemeCommand::If(args) => ("if", args),
            SchemeCommand::Cond(args) => ("cond", args),
            SchemeCommand::Let(args) => ("let", args),
            SchemeCommand::Display(args) => ("display", args),
            SchemeCommand::Car(args) => ("car", args),
            SchemeCommand::Cdr(args) => ("cdr", args),
            SchemeCommand::Cons(args) => ("cons", args),
            SchemeCommand::Null(args) => ("null?", args),
        };

        write!(f, "({} {})", head, stringify_arguments(args))
    }
}

fuzz_target!(|commands: Vec<SchemeCommand>| {
    let source = stringify_arguments(&commands);
    let options = schemer::Options::default().with_max_depth(64);
    let _ = schemer::run_source(&source, io::empty(), io::sink(), options);
});
