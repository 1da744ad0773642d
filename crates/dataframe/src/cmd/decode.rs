use dataframe_json::{marshal_frame, to_formatted_string};

use crate::cmd::{read_frame, DecodeArgs};
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: DecodeArgs) -> CliResult<i32> {
    let frame = read_frame(&args.source)?;
    if args.pretty {
        println!("{}", to_formatted_string(&frame));
    } else {
        println!("{}", marshal_frame(&frame));
    }
    Ok(SUCCESS)
}
