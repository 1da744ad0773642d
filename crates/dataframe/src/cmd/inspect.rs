use crate::cmd::{read_frame, InputArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_fields, OutputFormat};

pub fn run(args: InputArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = read_frame(&args)?;
    print_fields(&frame, format);
    Ok(SUCCESS)
}
