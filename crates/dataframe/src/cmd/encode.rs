use std::fs;

use dataframe_core::byteutil::bytes_to_hex;
use tracing::debug;

use crate::cmd::{read_input, EncodeArgs};
use crate::exit::{io_error, json_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::write_raw;

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let data = read_input(args.input.as_deref())?;
    let text = String::from_utf8(data)
        .map_err(|err| CliError::new(DATA_INVALID, format!("input is not UTF-8: {err}")))?;

    let bytes = encode_text(&text)?;
    let rendered = if args.hex {
        let mut hex = bytes_to_hex(&bytes);
        hex.push('\n');
        hex.into_bytes()
    } else {
        bytes
    };

    match &args.output {
        Some(path) => fs::write(path, &rendered)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?,
        None => write_raw(&rendered)?,
    }
    Ok(SUCCESS)
}

/// Wire bytes of every root frame in `text`, concatenated.
fn encode_text(text: &str) -> CliResult<Vec<u8>> {
    let frames = dataframe_json::marshal(text).map_err(|err| json_error("encode failed", err))?;
    debug!(frames = frames.len(), "parsed JSON input");

    let mut bytes = Vec::new();
    for frame in &frames {
        bytes.extend_from_slice(&frame.to_wire_bytes());
    }
    Ok(bytes)
}
