use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use super::{Cell, Sheet};
use crate::LabsyncError;

const COLUMN_WIDTH: f64 = 22.0;

pub(super) fn write_workbook(sheets: &[Sheet]) -> Result<Vec<u8>, LabsyncError> {
    write(sheets).map_err(|e| LabsyncError::Report(e.to_string()))
}

fn write(sheets: &[Sheet]) -> Result<Vec<u8>, XlsxError> {
    let title = Format::new().set_bold().set_font_size(12);
    let header = Format::new().set_bold().set_background_color("#D9E1F2");
    let percent = Format::new().set_num_format("0.00");

    let mut workbook = Workbook::new();
    for sheet in sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(&sheet.name)?;
        write_sheet(ws, sheet, &title, &header, &percent)?;
    }
    workbook.save_to_buffer()
}

fn write_sheet(
    ws: &mut Worksheet,
    sheet: &Sheet,
    title: &Format,
    header: &Format,
    percent: &Format,
) -> Result<(), XlsxError> {
    let mut row: u32 = 0;
    for line in &sheet.titles {
        ws.write_string_with_format(row, 0, line, title)?;
        row += 1;
    }
    for (col, name) in (0u16..).zip(&sheet.header) {
        ws.write_string_with_format(row, col, name, header)?;
        ws.set_column_width(col, COLUMN_WIDTH)?;
    }
    row += 1;
    for cells in &sheet.rows {
        for (col, cell) in (0u16..).zip(cells) {
            match cell {
                Cell::Text(s) => {
                    ws.write_string(row, col, s)?;
                }
                #[allow(clippy::cast_precision_loss)]
                Cell::Count(n) => {
                    ws.write_number(row, col, *n as f64)?;
                }
                Cell::Percent(p) => {
                    ws.write_number_with_format(row, col, *p, percent)?;
                }
                Cell::Empty => {}
            }
        }
        row += 1;
    }
    Ok(())
}
