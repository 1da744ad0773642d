use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use dataframe_core::DataFrame;
use serde::Serialize;

use crate::exit::{io_error, CliResult};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub struct FieldRow {
    pub index: usize,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub code: u8,
    pub length: usize,
    pub value: String,
}

pub fn field_rows(frame: &DataFrame) -> Vec<FieldRow> {
    frame
        .iter()
        .enumerate()
        .map(|(index, field)| FieldRow {
            index,
            name: field.name().map(str::to_string),
            type_name: field.type_name(),
            code: field.type_code(),
            length: field.len(),
            value: field.string_value(),
        })
        .collect()
}

pub fn print_fields(frame: &DataFrame, format: OutputFormat) {
    let rows = field_rows(frame);
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "NAME", "TYPE", "LENGTH", "VALUE"]);
            for row in &rows {
                table.add_row(vec![
                    row.index.to_string(),
                    row.name.clone().unwrap_or_default(),
                    format!("{}({})", row.type_name, row.code),
                    row.length.to_string(),
                    row.value.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!(
                    "{} name={} type={} length={} value={}",
                    row.index,
                    row.name.as_deref().unwrap_or("-"),
                    row.type_name,
                    row.length,
                    row.value
                );
            }
        }
        OutputFormat::Raw => println!("{frame}"),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn write_raw(data: &[u8]) -> CliResult<()> {
    let mut out = std::io::stdout();
    out.write_all(data)
        .and_then(|()| out.flush())
        .map_err(|err| io_error("failed writing stdout", err))
}
