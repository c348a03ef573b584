use std::process::ExitCode;
use std::thread;
use clap::Parser as ClapParser;
use chiken::Config;

// Deep recursion in a script recurses in the evaluator too
const INTERPRETER_STACK_SIZE: usize = 256 * 1024 * 1024;

fn main() -> ExitCode {
    let config: Config = Config::parse();

    let interpreter = thread::Builder::new()
        .name(String::from("interpreter"))
        .stack_size(INTERPRETER_STACK_SIZE)
        .spawn(move || chiken::run(&config));

    let result = match interpreter {
        Ok(handle) => match handle.join() {
            Ok(result) => result,
            Err(_) => return ExitCode::FAILURE,
        },
        Err(err) => Err(chiken::Error::Io(err)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        },
    }
}
