use std::path::Path;

use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet};

use crate::error::TemplateError;

pub const TEMPLATE_SHEET_NAME: &str = "Questions";

/// Columns of the downloadable upload template, in sheet order.
pub const TEMPLATE_HEADERS: &[&str] = &[
    "Question Type",
    "Category",
    "Question",
    "Concepts",
    "Difficulty Level",
    "Max Score",
    "Time Limit",
    "Option 1",
    "Option 2",
    "Option 3",
    "Option 4",
    "Correct Answer",
    "Explanation",
];

#[derive(Clone, Copy, Debug)]
enum Value {
    Text(&'static str),
    Number(f64),
    Blank,
}

use Value::{Blank, Number, Text};

const EXAMPLE_ROWS: [[Value; 13]; 2] = [
    [
        Text("Single Choice"),
        Blank,
        Text("What is the capital of France?"),
        Text("Geography, Capitals"),
        Number(1.0),
        Number(1.0),
        Number(60.0),
        Text("Paris"),
        Text("London"),
        Text("Berlin"),
        Text("Madrid"),
        Text("Paris"),
        Text("Paris has been the capital of France since 987."),
    ],
    [
        Text("True/False"),
        Blank,
        Text("The Earth orbits the Sun."),
        Text("Astronomy"),
        Number(1.0),
        Number(1.0),
        Number(30.0),
        Text("True"),
        Text("False"),
        Blank,
        Blank,
        Text("True"),
        Blank,
    ],
];

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color("2C5F8A")
        .set_font_color("FFFFFF")
        .set_border(FormatBorder::Thin)
}

/// Builds the template: a bold header row and two example questions.
pub fn template_workbook() -> Result<Workbook, TemplateError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(TEMPLATE_SHEET_NAME)?;

    write_headers(worksheet)?;

    for (index, values) in EXAMPLE_ROWS.iter().enumerate() {
        let row = index as u32 + 1;

        for (col, value) in values.iter().enumerate() {
            let col = col as u16;

            match *value {
                Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                Number(number) => {
                    worksheet.write_number(row, col, number)?;
                }
                Blank => {}
            }
        }
    }

    Ok(workbook)
}

fn write_headers(worksheet: &mut Worksheet) -> Result<(), TemplateError> {
    let format = header_format();

    for (col, header) in TEMPLATE_HEADERS.iter().enumerate() {
        let col = col as u16;

        worksheet.write_string_with_format(0, col, *header, &format)?;
        worksheet.set_column_width(col, 18)?;
    }
    worksheet.set_column_width(2, 40)?;
    worksheet.set_freeze_panes(1, 0)?;

    Ok(())
}

pub fn template_bytes() -> Result<Vec<u8>, TemplateError> {
    Ok(template_workbook()?.save_to_buffer()?)
}

pub fn write_template(path: &Path) -> Result<(), TemplateError> {
    template_workbook()?.save(path)?;

    tracing::info!(path = %path.display(), "Wrote question upload template");

    Ok(())
}
