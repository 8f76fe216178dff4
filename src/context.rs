use std::io::{BufRead, Write};

use tracing::debug;

use crate::{
    config::Options,
    error::SchemeError,
    interpreter::{EvaluationResult, Interpreter},
    parser::{parse, Node},
};


/// A parsed program. The syntax tree borrows from the source text and is only ever
/// read after parsing.
#[derive(Debug)]
pub struct Program<'a> {
    forms: Vec<Node<'a>>,
}

impl<'a> Program<'a> {
    pub fn parse(source: &'a str) -> Result<Self, SchemeError> {
        let forms = parse(source)?;
        debug!(forms = forms.len(), "parsed program");
        Ok(Self { forms })
    }

    pub fn forms(&self) -> &[Node<'a>] {
        &self.forms
    }

    /// Evaluates every top-level form in source order, then calls the entry point with
    /// no arguments and returns its value.
    ///
    /// A program without an entry point only fails here, after its top-level forms ran.
    pub fn run<'p, R: BufRead, W: Write>(&'p self, interpreter: &mut Interpreter<'p, R, W>) -> EvaluationResult<'p> {
        for form in &self.forms {
            interpreter.evaluate(form)?;
        }

        let entry_point = interpreter.options().entry_point.clone();
        debug!(entry_point = %entry_point, "calling entry point");
        interpreter.call_function(&entry_point, &[])
    }
}

/// Parses and runs `source` against the given input and output, returning the output
/// once the entry point has returned.
pub fn run_source<R: BufRead, W: Write>(source: &str, input: R, output: W, options: Options) -> Result<W, SchemeError> {
    let program = Program::parse(source)?;
    let mut interpreter = Interpreter::new(input, output, options);
    program.run(&mut interpreter)?;
    Ok(interpreter.into_output())
}
