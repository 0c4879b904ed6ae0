use std::{fs::read_to_string, io, path::PathBuf, process, thread, time::Instant};

use clap::Parser;
use sigil::{
    builtins::Builtins, check, display_error, interpreter::interpreter::execute,
    lexer::lexer::tokenize, Failure, STACK_SIZE,
};

/// Runs a Sigil program.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Source file to run
    file: PathBuf,

    /// Print the token stream and per-phase timings
    #[arg(short, long)]
    debug: bool,

    /// Stop after type checking
    #[arg(short, long)]
    check: bool,
}

fn main() {
    let cli = Cli::parse();

    // Programs recurse on the host stack
    let handle = thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(move || run_cli(cli));

    let code = match handle.map(|handle| handle.join()) {
        Ok(Ok(code)) => code,
        Ok(Err(_)) => 1,
        Err(error) => {
            eprintln!("Failed to start the interpreter thread: {}", error);
            1
        }
    };

    process::exit(code);
}

fn run_cli(cli: Cli) -> i32 {
    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", cli.file.display(), error);
            return 1;
        }
    };

    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.file.to_string_lossy().to_string());

    let start = Instant::now();

    if cli.debug {
        for token in tokenize(source.clone(), Some(file_name.clone())) {
            println!("{}", token);
        }
        println!("Tokenized in {:?}", start.elapsed());
    }

    let checked = match check(&source, Some(file_name)) {
        Ok(checked) => checked,
        Err(failure) => {
            report(&failure, &source);
            return 1;
        }
    };

    if cli.debug {
        println!("Parsed in {:?}", checked.parsed_in);
        println!("Type checked in {:?}", checked.checked_in);
    }

    if cli.check {
        println!("{}", checked.program_type);
        return 0;
    }

    let builtins = Builtins::new();
    let execute_start = Instant::now();
    let result = execute(&checked.program, &builtins, &mut io::stdout());

    if cli.debug {
        println!("Executed in {:?}", execute_start.elapsed());
        println!("Total time: {:?}", start.elapsed());
    }

    match result {
        Ok(value) => {
            println!("{}", value);
            0
        }
        Err(error) => {
            report(&Failure::Runtime(error), &source);
            1
        }
    }
}

fn report(failure: &Failure, source: &str) {
    match failure {
        Failure::Syntax(errors) | Failure::Type(errors) => {
            for error in errors {
                display_error(error, source);
            }
        }
        Failure::Runtime(error) => eprintln!("Runtime error: {}", error),
    }
}
