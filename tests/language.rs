use std::fs;
use std::path::Path;

use chiken::interpreter::evaluator::RuntimeError;
use chiken::interpreter::lexer::{tokenize, Lexer};
use chiken::interpreter::parser::{ParseError, Parser};
use chiken::Error;
use walkdir::WalkDir;

fn run_with_input(source: &str, input: &str) -> Result<String, Error> {
    let output = chiken::execute(source, Vec::<u8>::new(), input.as_bytes())?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}

fn assert_output(source: &str, expected: &str) {
    match run_with_input(source, "") {
        Ok(output) => assert_eq!(output, expected, "unexpected output for {:?}", source),
        Err(err) => panic!("{:?} failed: {}", source, err),
    }
}

fn assert_error(source: &str, expected: &str) {
    match run_with_input(source, "") {
        Ok(output) => panic!("{:?} should have failed, printed {:?}", source, output),
        Err(err) => assert_eq!(err.to_string(), expected, "unexpected error for {:?}", source),
    }
}

#[test]
fn demo_programs_work() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "chiken"))
    {
        let path = entry.path();
        let source = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected = fs::read_to_string(path.with_extension("out"))
            .unwrap_or_else(|e| panic!("Missing expected output for {path:?}: {e}"));

        count += 1;

        match run_with_input(&source, "") {
            Ok(output) => assert_eq!(output, expected, "demo {:?} printed unexpected output", path),
            Err(err) => panic!("demo {:?} failed: {}", path, err),
        }
    }

    assert!(count > 0, "No demo programs found in {:?}", Path::new("demos"));
}

#[test]
fn end_to_end_programs() {
    assert_output("have x = 5  say x + 3", "8\n");
    assert_output("func f(a,b){ have r = a+b  return r }  say f(2,3)", "5\n");
    assert_output("say 10 / 4", "2.5\n");
    assert_output("say 1 / 100000 say 100000000000000000 / 1", "1e-05\n1e+17\n");
    assert_output("say 17 % 5", "2\n");
    assert_output("have a = 10 have b = 3 have c = 2 say a - b - c", "5\n");
}

#[test]
fn newlines_are_not_statement_separators() {
    assert_output("have x =\n  1 +\n  2\nsay\nx", "3\n");
    assert_output("say 1 say 2 # comment say 3\nsay 4", "1\n2\n4\n");
}

#[test]
fn functions_do_not_mutate_caller_scope() {
    let source = "
        have count = 0
        func bump(count) {
            have count = count + 1
            have extra = 'x'
            return count
        }
        say bump(count)
        say bump(count)
        say count
    ";

    assert_output(source, "1\n1\n0\n");
}

#[test]
fn runtime_errors_abort_the_run() {
    match run_with_input("say 1 say 5 / 0 say 2", "") {
        Err(Error::Runtime(RuntimeError::DivisionByZero)) => {},
        other => panic!("unexpected result {:?}", other.map_err(|err| err.to_string())),
    }

    assert_error("say 5 % 0", "Modulo by zero");
    assert_error("say nofunc(1)", "Unknown function: nofunc");
    assert_error("say missing", "Variable 'missing' not defined");
    assert_error("func f(a) { return a } say f(1, 2)", "f() expects 1 arguments, got 2");
}

#[test]
fn syntax_errors_abort_before_running() {
    assert_error("say 1 have = 2", "Expected variable name [line 1 column 12]");
    assert_error("say 1\nsay @", "Invalid character: @ [line 2 column 5]");
    assert_error("say 'open", "Unterminated string [line 1 column 5]");

    assert!(matches!(run_with_input("say 1 have x 2", ""), Err(Error::Parse(ParseError::Expected { message: "Expected '='", .. }))));
}

#[test]
fn input_is_read_line_by_line() {
    let output = run_with_input("have a = input('a? ') have b = input('b? ') say a * b", "6\n7\n").expect("run failed");
    assert_eq!(output, "a? b? 42\n");
}

#[test]
fn reparsing_yields_identical_programs() {
    let source = fs::read_to_string("demos/basics.chiken").expect("demo is missing");

    let first = Parser::new(Lexer::new(&source)).parse().expect("parse failed");
    let second = Parser::new(Lexer::new(&source)).parse().expect("parse failed");

    assert_eq!(first, second);
}

#[test]
fn tokenize_ends_with_eof() {
    let tokens = tokenize("say 007").expect("lexing failed");

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].int_value(), Some(7));
}
