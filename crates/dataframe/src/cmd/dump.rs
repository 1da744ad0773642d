use dataframe_core::byteutil::dump;

use crate::cmd::{read_bytes, DumpArgs};
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: DumpArgs) -> CliResult<i32> {
    let data = read_bytes(&args.source)?;
    print!("{}", dump(&data, args.limit));
    Ok(SUCCESS)
}
