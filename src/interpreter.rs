use std::{borrow::Cow, io::{self, BufRead, Write}, rc::Rc};

use tracing::{debug, trace};

use crate::{
    builtin::HostOperator,
    config::{Options, MAX_NESTING},
    environment::Environment,
    error::EvalError,
    parser::Node,
    value::{Function, Value},
};

/// `Ok(None)` is an evaluation that produced no value, like `define` or `display`.
pub type EvaluationResult<'a> = Result<Option<Value<'a>>, EvalError>;

// Red zone and growth step for the recursive walk
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy)]
enum FrameKind {
    Call,
    Let,
}

fn nothing(form: &str) -> EvalError {
    EvalError::TypeMismatch {
        form: form.to_owned(),
        expected: "a value",
        found: "nothing".to_owned(),
    }
}

/// Wraps `values` in a list, failing if the result would nest deeper than [`MAX_NESTING`].
fn nested_list<'a>(values: Vec<Value<'a>>, deepest: usize) -> Result<Value<'a>, EvalError> {
    if deepest >= MAX_NESTING {
        return Err(EvalError::StackExhaustion { depth: MAX_NESTING });
    }
    Ok(Value::List(values))
}

fn argument<'a>(args: &'a [Node<'a>], index: usize, form: &str) -> Result<&'a Node<'a>, EvalError> {
    args.get(index).ok_or_else(|| EvalError::malformed(form, "missing operand"))
}

/// Tree-walking evaluator. Owns the frame stack and the program's input and output, so
/// independent interpreters can run side by side.
pub struct Interpreter<'a, R, W> {
    env: Environment<'a>,
    input: R,
    output: W,
    options: Options,
}

impl<'a> Interpreter<'a, io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(options: Options) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), options)
    }
}

impl<'a, R: BufRead, W: Write> Interpreter<'a, R, W> {
    pub fn new(input: R, output: W, options: Options) -> Self {
        Self {
            env: Environment::new(options.unbound),
            input,
            output,
            options,
        }
    }

    pub fn environment(&self) -> &Environment<'a> {
        &self.env
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Evaluates one node in the current frame.
    pub fn evaluate(&mut self, node: &'a Node<'a>) -> EvaluationResult<'a> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || self.evaluate_node(node))
    }

    fn evaluate_node(&mut self, node: &'a Node<'a>) -> EvaluationResult<'a> {
        trace!(?node, depth = self.env.depth(), "evaluate");
        match node {
            Node::Integer(value) => Ok(Some(Value::Integer(*value))),
            Node::Float(value) => Ok(Some(Value::Float(*value))),
            Node::Boolean(value) => Ok(Some(Value::Boolean(*value))),
            Node::Str(text) => Ok(Some(Value::String((*text).to_owned()))),
            Node::Identifier(name) => self.env.lookup_constant(name).map(Some),
            Node::Operator(name) => Ok(Some(Value::symbol(*name))),
            Node::QuotedList(nodes) => {
                let values = nodes.iter()
                    .map(|node| self.evaluate_value(node, "quote"))
                    .collect::<Result<Vec<_>, _>>()?;
                let deepest = values.iter().map(Value::nesting).max().unwrap_or(0);
                nested_list(values, deepest).map(Some)
            }
            Node::QuotedAtom(atom) => match atom.name() {
                Some(name) => Ok(Some(Value::symbol(name))),
                None => self.evaluate(atom),
            },
            Node::Expression(nodes) => self.evaluate_expression(nodes),
        }
    }

    /// Evaluates a node that must produce a value.
    fn evaluate_value(&mut self, node: &'a Node<'a>, form: &str) -> Result<Value<'a>, EvalError> {
        self.evaluate(node)?.ok_or_else(|| nothing(form))
    }

    fn evaluate_list(&mut self, node: &'a Node<'a>, form: &'static str) -> Result<Vec<Value<'a>>, EvalError> {
        match self.evaluate_value(node, form)? {
            Value::List(values) => Ok(values),
            other => Err(EvalError::TypeMismatch {
                form: form.to_owned(),
                expected: "a list",
                found: other.type_name().to_owned(),
            }),
        }
    }

    fn evaluate_arguments(&mut self, args: &'a [Node<'a>], form: &str) -> Result<Vec<Value<'a>>, EvalError> {
        args.iter()
            .map(|arg| self.evaluate_value(arg, form))
            .collect()
    }

    /// Evaluates a sequence in order and returns the last value.
    fn evaluate_body(&mut self, body: &'a [Node<'a>]) -> EvaluationResult<'a> {
        let mut result = None;
        for node in body {
            result = self.evaluate(node)?;
        }
        Ok(result)
    }

    /// Resolves the operator position to the name of a form, host operator or function.
    fn resolve_operator(&mut self, node: &'a Node<'a>) -> Result<Cow<'a, str>, EvalError> {
        let value = match node {
            Node::Operator(name) => return Ok(Cow::Borrowed(*name)),
            // Operator position always falls back to the bare name, even in strict mode
            Node::Identifier(name) => match self.env.get_constant(name) {
                Some(value) => value,
                None => return Ok(Cow::Borrowed(*name)),
            },
            other => self.evaluate_value(other, "call")?,
        };

        match value {
            Value::Symbol(name) | Value::String(name) => Ok(Cow::Owned(name)),
            other => Err(EvalError::UnboundCallable { name: other.to_string() }),
        }
    }

    fn evaluate_expression(&mut self, nodes: &'a [Node<'a>]) -> EvaluationResult<'a> {
        let Some((operator, args)) = nodes.split_first() else {
            return Err(EvalError::malformed("()", "empty expression"));
        };

        let name = self.resolve_operator(operator)?;
        if name == "define" {
            return self.evaluate_define(args);
        }
        if let Some(operator) = HostOperator::from_name(&name) {
            return self.evaluate_operator(operator, args);
        }

        match &*name {
            "if" => self.evaluate_if(args),
            "cond" => self.evaluate_cond(args),
            "display" => self.evaluate_display(args),
            "car" => self.evaluate_car(args),
            "cdr" => self.evaluate_cdr(args),
            "cons" => self.evaluate_cons(args),
            "null?" => self.evaluate_null(args),
            "let" => self.evaluate_let(args),
            "read" => self.evaluate_read(),
            "newline" => self.evaluate_newline(),
            _ => self.call_function(&name, args),
        }
    }

    fn evaluate_define(&mut self, args: &'a [Node<'a>]) -> EvaluationResult<'a> {
        match argument(args, 0, "define")? {
            // (define (name param ...) body ...)
            Node::Expression(signature) => {
                let Some((name, params)) = signature.split_first() else {
                    return Err(EvalError::malformed("define", "empty signature"));
                };
                let name = name.name()
                    .ok_or_else(|| EvalError::malformed("define", "function name must be an identifier"))?;
                let params = params.iter()
                    .map(Node::name)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| EvalError::malformed("define", "parameters must be identifiers"))?;

                debug!(name, ?params, "define function");
                self.env.define_function(name, Function::new(name, params, &args[1..]));
            }
            // (define name expression)
            target => {
                let name = target.name()
                    .ok_or_else(|| EvalError::malformed("define", "constant name must be an identifier"))?;
                let value = self.evaluate_value(argument(args, 1, "define")?, "define")?;

                debug!(name, %value, "define constant");
                self.env.define_constant(name, value);
            }
        }
        Ok(None)
    }

    fn evaluate_operator(&mut self, operator: HostOperator, args: &'a [Node<'a>]) -> EvaluationResult<'a> {
        // Operands past the operator's arity are never evaluated
        let operands = args.get(..operator.arity())
            .ok_or_else(|| EvalError::malformed(operator.name(), "missing operand"))?;
        let values = self.evaluate_arguments(operands, operator.name())?;
        operator.apply(values).map(Some)
    }

    fn evaluate_if(&mut self, args: &'a [Node<'a>]) -> EvaluationResult<'a> {
        let [condition, then, otherwise, ..] = args else {
            return Err(EvalError::malformed("if", "expected a condition and two branches"));
        };

        if self.evaluate_value(condition, "if")?.is_truthy() {
            self.evaluate(then)
        } else {
            self.evaluate(otherwise)
        }
    }

    fn evaluate_cond(&mut self, args: &'a [Node<'a>]) -> EvaluationResult<'a> {
        for clause in args {
            let Node::Expression(clause) = clause else {
                return Err(EvalError::malformed("cond", "clauses must be (test expression)"));
            };
            let [test, consequent, ..] = clause.as_slice() else {
                return Err(EvalError::malformed("cond", "clauses must be (test expression)"));
            };

            if self.evaluate_value(test, "cond")?.is_truthy() {
                return self.evaluate(consequent);
            }
        }
        Ok(None)
    }

    fn evaluate_display(&mut self, args: &'a [Node<'a>]) -> EvaluationResult<'a> {
        let value = self.evaluate_value(argument(args, 0, "display")?, "display")?;
        write!(self.output, "{}", value)?;
        self.output.flush()?;
        Ok(None)
    }

    fn evaluate_newline(&mut self) -> EvaluationResult<'a> {
        writeln!(self.output)?;
        self.output.flush()?;
        Ok(None)
    }

    fn evaluate_car(&mut self, args: &'a [Node<'a>]) -> EvaluationResult<'a> {
        let list = self.evaluate_list(argument(args, 0, "car")?, "car")?;
        match list.into_iter().next() {
            Some(head) => Ok(Some(head)),
            None => Err(EvalError::ListEmpty { form: "car" }),
        }
    }

    fn evaluate_cdr(&mut self, args: &'a [Node<'a>]) -> EvaluationResult<'a> {
        let list = self.evaluate_list(argument(args, 0, "cdr")?, "cdr")?;
        Ok(Some(Value::List(list.into_iter().skip(1).collect())))
    }

    fn evaluate_cons(&mut self, args: &'a [Node<'a>]) -> EvaluationResult<'a> {
        let head = self.evaluate_value(argument(args, 0, "cons")?, "cons")?;
        let tail = self.evaluate_list(argument(args, 1, "cons")?, "cons")?;

        // The tail already fits, so only the head can push the result past the limit
        let deepest = head.nesting();
        let mut list = Vec::with_capacity(tail.len() + 1);
        list.push(head);
        list.extend(tail);
        nested_list(list, deepest).map(Some)
    }

    fn evaluate_null(&mut self, args: &'a [Node<'a>]) -> EvaluationResult<'a> {
        let value = self.evaluate_value(argument(args, 0, "null?")?, "null?")?;
        Ok(Some(Value::Boolean(matches!(value, Value::List(list) if list.is_empty()))))
    }

    fn evaluate_let(&mut self, args: &'a [Node<'a>]) -> EvaluationResult<'a> {
        let Node::Expression(clauses) = argument(args, 0, "let")? else {
            return Err(EvalError::malformed("let", "bindings must be a list"));
        };

        // Every binding is evaluated in the enclosing frame before any is installed
        let mut bindings = Vec::with_capacity(clauses.len());
        for clause in clauses {
            let Node::Expression(clause) = clause else {
                return Err(EvalError::malformed("let", "bindings must be (name expression)"));
            };
            let [name, expression, ..] = clause.as_slice() else {
                return Err(EvalError::malformed("let", "bindings must be (name expression)"));
            };
            let name = name.name()
                .ok_or_else(|| EvalError::malformed("let", "binding name must be an identifier"))?;
            bindings.push((name, self.evaluate_value(expression, "let")?));
        }

        debug!(names = ?bindings.iter().map(|(name, _)| *name).collect::<Vec<_>>(), "let");
        self.in_frame(FrameKind::Let, bindings, &args[1..])
    }

    fn evaluate_read(&mut self) -> EvaluationResult<'a> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;

        let text = line.trim();
        text.parse::<i64>()
            .map(|value| Some(Value::Integer(value)))
            .map_err(|_| EvalError::Format { input: text.to_owned() })
    }

    /// Calls the user function `name`, evaluating `args` in the caller's frame.
    pub fn call_function(&mut self, name: &str, args: &'a [Node<'a>]) -> EvaluationResult<'a> {
        let function = match self.env.lookup_function(name) {
            Value::Function(function) => function,
            _ => return Err(EvalError::UnboundCallable { name: name.to_owned() }),
        };

        let values = self.evaluate_arguments(args, name)?;
        self.invoke(function, values)
    }

    fn invoke(&mut self, function: Rc<Function<'a>>, values: Vec<Value<'a>>) -> EvaluationResult<'a> {
        debug!(name = function.name, arguments = values.len(), "call");

        // Missing arguments leave their parameters unbound; extra ones are dropped
        let bindings = function.params.iter()
            .copied()
            .zip(values)
            .collect::<Vec<_>>();
        self.in_frame(FrameKind::Call, bindings, function.body)
    }

    /// Runs `body` in a fresh frame. The frame is popped on every exit path.
    fn in_frame(&mut self, kind: FrameKind, bindings: Vec<(&'a str, Value<'a>)>, body: &'a [Node<'a>]) -> EvaluationResult<'a> {
        if self.env.depth() >= self.options.max_depth {
            return Err(EvalError::StackExhaustion { depth: self.options.max_depth });
        }

        match kind {
            FrameKind::Call => self.env.push_call_frame(bindings),
            FrameKind::Let => self.env.push_let_frame(bindings),
        }
        let result = self.evaluate_body(body);
        self.env.pop_frame();
        result
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use crate::{config::Options, parser::parse};

    use super::*;

    /// Evaluates every form of `source` at the top level and returns the external
    /// representation of the last form's value (or `-` for none) with everything printed.
    fn evaluate_with(source: &str, stdin: &str, options: Options) -> Result<(String, String), EvalError> {
        let nodes = parse(source).expect("test sources parse");
        let mut interpreter = Interpreter::new(Cursor::new(stdin.to_owned()), Vec::new(), options);

        let mut last = None;
        for node in &nodes {
            last = interpreter.evaluate(node)?;
        }
        let last = last.map_or_else(|| "-".to_owned(), |value| value.to_string());
        let output = String::from_utf8(interpreter.into_output()).expect("utf-8 output");
        Ok((last, output))
    }

    fn evaluate(source: &str) -> Result<String, EvalError> {
        evaluate_with(source, "", Options::default()).map(|(value, _)| value)
    }

    fn printed(source: &str) -> Result<String, EvalError> {
        evaluate_with(source, "", Options::default()).map(|(_, output)| output)
    }

    #[test]
    fn literals_and_lists() -> anyhow::Result<()> {
        assert_eq!(evaluate("42")?, "42");
        assert_eq!(evaluate("#f")?, "#f");
        assert_eq!(evaluate("\"text\"")?, "text");
        assert_eq!(evaluate("'(1 (+ 1 1) \"x\")")?, "(1 2 x)");
        assert_eq!(evaluate("'()")?, "()");
        Ok(())
    }

    #[test]
    fn list_primitives() -> anyhow::Result<()> {
        assert_eq!(evaluate("(car (cons 1 '(2 3)))")?, "1");
        assert_eq!(evaluate("(cdr (cons 1 '(2 3)))")?, "(2 3)");
        assert_eq!(evaluate("(cdr '())")?, "()");
        assert_eq!(evaluate("(null? '())")?, "#t");
        assert_eq!(evaluate("(null? (cons 1 '()))")?, "#f");
        assert_eq!(evaluate("(null? 0)")?, "#f");
        Ok(())
    }

    #[test]
    fn car_cdr_cons_laws() -> anyhow::Result<()> {
        for head in ["7", "#t", "'(1 2)", "\"s\"", "'()"] {
            for tail in ["'()", "'(1)", "(cons 'a (cons (cons 'b '(c)) '()))"] {
                assert_eq!(evaluate(&format!("(car (cons {} {}))", head, tail))?, evaluate(head)?);
                assert_eq!(evaluate(&format!("(= (cdr (cons {} {})) {})", head, tail, tail))?, "#t");
            }
        }
        Ok(())
    }

    #[test]
    fn quoted_lists_evaluate_inner_expressions() -> anyhow::Result<()> {
        assert_eq!(evaluate("'(1 (car '(2 3)))")?, "(1 2)");
        assert_eq!(evaluate("(cons 1 (cons '(2 3) '()))")?, "(1 (2 3))");
        assert!(matches!(evaluate("'(1 (2 3))"), Err(EvalError::UnboundCallable { ref name }) if name == "2"));
        Ok(())
    }

    #[test]
    fn list_nesting_is_bounded() -> anyhow::Result<()> {
        let wrap = "(define (wrap n acc) (if (= n 0) acc (wrap (- n 1) (cons acc '()))))";
        assert_eq!(evaluate(&format!("{} (null? (wrap {} '()))", wrap, MAX_NESTING - 1))?, "#f");
        assert!(matches!(
            evaluate(&format!("{} (wrap 2000 '())", wrap)),
            Err(EvalError::StackExhaustion { depth: MAX_NESTING })
        ));

        // Top-level rebinding grows a list without any recursion
        let rebinds = "(define a '(a))".repeat(MAX_NESTING + 1);
        assert!(matches!(
            evaluate(&format!("(define a '()) {}", rebinds)),
            Err(EvalError::StackExhaustion { depth: MAX_NESTING })
        ));
        Ok(())
    }

    #[test]
    fn list_faults() {
        assert!(matches!(evaluate("(car '())"), Err(EvalError::ListEmpty { form: "car" })));
        assert!(matches!(evaluate("(car 5)"), Err(EvalError::TypeMismatch { .. })));
        assert!(matches!(evaluate("(cons 1 2)"), Err(EvalError::TypeMismatch { .. })));
    }

    #[test]
    fn if_treats_only_false_as_false() -> anyhow::Result<()> {
        assert_eq!(evaluate("(if 0 'yes 'no)")?, "yes");
        assert_eq!(evaluate("(if '() 'yes 'no)")?, "yes");
        assert_eq!(evaluate("(if #f 'yes 'no)")?, "no");
        assert_eq!(evaluate("(if (< 1 2) 1 (car '()))")?, "1");
        assert!(matches!(evaluate("(if #t 1)"), Err(EvalError::MalformedForm { .. })));
        Ok(())
    }

    #[test]
    fn cond_picks_first_truthy_clause() -> anyhow::Result<()> {
        assert_eq!(evaluate("(cond (#f 1) ((= 1 1) 2) (#t 3))")?, "2");
        assert_eq!(evaluate("(cond (#f 1) (#f 2))")?, "-");
        assert_eq!(evaluate("(cond (#f 1) (else 9))")?, "9");
        Ok(())
    }

    #[test]
    fn constants_and_functions() -> anyhow::Result<()> {
        assert_eq!(evaluate("(define (f x) (+ x 1)) (f 5)")?, "6");
        assert_eq!(evaluate("(define x 10) (define (g) x) (g)")?, "10");
        assert_eq!(evaluate("(define x 3)")?, "-");
        Ok(())
    }

    #[test]
    fn function_bodies_are_sequences() -> anyhow::Result<()> {
        let (value, output) = evaluate_with("(define (f) (display 1) (display 2) 3) (f)", "", Options::default())?;
        assert_eq!(value, "3");
        assert_eq!(output, "12");
        assert_eq!(evaluate("(define (empty)) (empty)")?, "-");
        Ok(())
    }

    #[test]
    fn functions_do_not_see_caller_locals() -> anyhow::Result<()> {
        assert_eq!(evaluate("(define (peek) x) (let ((x 100)) (peek))")?, "x");
        assert_eq!(evaluate("(define (peek) x) (define (outer x) (peek)) (outer 100)")?, "x");
        Ok(())
    }

    #[test]
    fn shadowed_parameter_does_not_leak() -> anyhow::Result<()> {
        assert_eq!(evaluate("(define x 1) (define (f x) (+ x 1)) (let ((x 50)) (f 5))")?, "6");
        assert_eq!(evaluate("(define x 1) (define (g) x) (let ((x 50)) (g))")?, "1");
        Ok(())
    }

    #[test]
    fn let_binds_in_parallel() -> anyhow::Result<()> {
        assert_eq!(evaluate("(let ((x 1) (y x)) y)")?, "x");
        assert_eq!(evaluate("(define x 7) (let ((x 1) (y x)) y)")?, "7");
        assert_eq!(evaluate("(let ((x 1)) (let ((y (+ x 1))) (+ x y)))")?, "3");
        assert_eq!(evaluate("(let () 5)")?, "5");
        Ok(())
    }

    #[test]
    fn let_frames_are_popped() -> anyhow::Result<()> {
        assert_eq!(evaluate("(let ((z 1)) z) z")?, "z");
        Ok(())
    }

    #[test]
    fn arity_is_lenient() -> anyhow::Result<()> {
        assert_eq!(evaluate("(define (f a b) b) (f 1)")?, "b");
        assert_eq!(evaluate("(define (f a) a) (f 1 2 3)")?, "1");
        Ok(())
    }

    #[test]
    fn logic_evaluates_both_operands() -> anyhow::Result<()> {
        let source = "(define (loud x) (display x) x)";
        let (value, output) = evaluate_with(&format!("{} (or (loud 1) (loud 2))", source), "", Options::default())?;
        assert_eq!(value, "1");
        assert_eq!(output, "12");

        let (value, output) = evaluate_with(&format!("{} (and (loud #f) (loud 3))", source), "", Options::default())?;
        assert_eq!(value, "#f");
        assert_eq!(output, "#f3");
        Ok(())
    }

    #[test]
    fn display_and_newline() -> anyhow::Result<()> {
        assert_eq!(printed("(display '(1 2 3))")?, "(1 2 3)");
        assert_eq!(printed("(display (/ 6 3)) (newline) (display (/ 7 2))")?, "2\n3.5");
        assert_eq!(printed("(display #t) (display \" \") (display 'sym)")?, "#t sym");
        Ok(())
    }

    #[test]
    fn read_parses_integers() -> anyhow::Result<()> {
        let (value, _) = evaluate_with("(+ (read) (read))", "4\n 38 \n", Options::default())?;
        assert_eq!(value, "42");

        assert!(matches!(
            evaluate_with("(read)", "forty\n", Options::default()),
            Err(EvalError::Format { .. })
        ));
        assert!(matches!(evaluate_with("(read)", "", Options::default()), Err(EvalError::Format { .. })));
        Ok(())
    }

    #[test]
    fn unknown_functions_fault_at_invocation() {
        assert!(matches!(evaluate("(nothing 1)"), Err(EvalError::UnboundCallable { .. })));
        assert!(matches!(evaluate("(5 1)"), Err(EvalError::UnboundCallable { .. })));
    }

    #[test]
    fn function_names_can_be_passed_as_symbols() -> anyhow::Result<()> {
        let source = "
            (define (twice f x) (f (f x)))
            (define (inc x) (+ x 1))
            (twice inc 5)";
        assert_eq!(evaluate(source)?, "7");
        Ok(())
    }

    #[test]
    fn recursion_is_bounded() -> anyhow::Result<()> {
        let source = "(define (count n) (if (= n 0) 0 (+ 1 (count (- n 1)))))";
        assert_eq!(evaluate(&format!("{} (count 500)", source))?, "500");

        let result = evaluate_with(&format!("{} (count 500)", source), "", Options::default().with_max_depth(100));
        assert!(matches!(result, Err(EvalError::StackExhaustion { depth: 100 })));
        Ok(())
    }

    #[test]
    fn frames_are_released_after_faults() -> anyhow::Result<()> {
        let nodes = parse("(define (bad) (car '())) (bad) (let ((x 1)) (car '()))")?;
        let mut interpreter = Interpreter::new(Cursor::new(String::new()), Vec::new(), Options::default());

        interpreter.evaluate(&nodes[0])?;
        assert!(interpreter.evaluate(&nodes[1]).is_err());
        assert_eq!(interpreter.environment().depth(), 0);
        assert!(interpreter.evaluate(&nodes[2]).is_err());
        assert_eq!(interpreter.environment().depth(), 0);
        Ok(())
    }

    #[test]
    fn strict_mode_rejects_unbound_names() -> anyhow::Result<()> {
        let strict = || Options::default().strict();
        assert!(matches!(evaluate_with("(display y)", "", strict()), Err(EvalError::UnboundName { .. })));
        let (value, _) = evaluate_with("(define y 2) (define (f) y) (f)", "", strict())?;
        assert_eq!(value, "2");
        Ok(())
    }

    #[test]
    fn interpreters_are_independent() -> anyhow::Result<()> {
        let nodes = parse("(define x 1) x")?;
        let mut first = Interpreter::new(Cursor::new(String::new()), Vec::new(), Options::default());
        let second = Interpreter::new(Cursor::new(String::new()), Vec::new(), Options::default());

        first.evaluate(&nodes[0])?;
        assert_eq!(first.evaluate(&nodes[1])?, Some(Value::Integer(1)));
        assert!(second.environment().get_constant("x").is_none());
        Ok(())
    }
}
