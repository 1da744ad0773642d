use serde::Serialize;

use crate::cmd::{read_frame, InputArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct DigestOutput {
    algorithm: &'static str,
    digest: String,
    fields: usize,
}

pub fn run(args: InputArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = read_frame(&args)?;
    let out = DigestOutput {
        algorithm: "SHA-256",
        digest: frame.digest_string(),
        fields: frame.field_count(),
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{} ({} fields): {}", out.algorithm, out.fields, out.digest);
        }
        OutputFormat::Raw => println!("{}", out.digest),
    }
    Ok(SUCCESS)
}
