use calcbot::{evaluate_expression, parser, tokenize, CalcError};
use clap::{Parser, Subcommand};
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the token stream for an expression
    Tokenize { expression: String },
    /// Print the parsed expression tree
    Parse { expression: String },
    /// Interactive calculator prompt
    Calc,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tokenize { expression } => match tokenize(&expression) {
            Ok(tokens) => {
                for token in tokens {
                    println!("{token:?}");
                }
            }
            Err(err) => report(err, &expression),
        },
        Commands::Parse { expression } => {
            let mut parser = parser::Parser::new(&expression);
            match parser.parse() {
                Ok(expr) => println!("{expr}"),
                Err(err) => report(err, &expression),
            }
        }
        Commands::Calc => {
            loop {
                print!("calc> ");
                io::stdout().flush().unwrap();

                let mut input = String::new();
                if io::stdin().read_line(&mut input).expect("unexpected input") == 0 {
                    break;
                }
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }
                if input.eq_ignore_ascii_case("exit") {
                    break;
                }

                match evaluate_expression(input) {
                    Ok(result) => println!("{result}"),
                    Err(err) => report(err, input),
                }
            }
        }
    }

    Ok(())
}

fn report(err: CalcError, source: &str) {
    let report = miette::Report::new(err).with_source_code(source.to_string());
    eprintln!("{report:?}");
}
