use sha2::{Digest, Sha256};

use dfa_compiler::{compile, parse, to_table};
use dfa_runtime::json;

const USAGE: &str = "usage: regex2dfa \"<regular expression>\"";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(&args) {
        Ok(filename) => println!("{}", filename),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1)
        }
    }
}

fn run(args: &[String]) -> Result<String, String> {
    let pattern = match args {
        [pattern] => pattern,
        _ => return Err(USAGE.to_string()),
    };

    let expr = parse(pattern).map_err(|err| err.to_string())?;
    let dfa = compile(expr).map_err(|err| err.to_string())?;
    let table = to_table(&dfa, pattern);

    let filename = output_filename(pattern);
    json::write_file(&filename, &table).map_err(|err| err.to_string())?;

    Ok(filename)
}

/// Derives the artifact filename from the pattern so repeated runs over the
/// same pattern overwrite their previous output.
fn output_filename(pattern: &str) -> String {
    let digest = Sha256::digest(pattern.as_bytes());
    let prefix: String = digest[..4].iter().map(|byte| format!("{:02x}", byte)).collect();

    format!("dfa-{}.json", prefix)
}
