//! Spreadsheet export of the product catalog.
//!
//! Produces a complete xlsx document in memory: one header row, one data
//! row per record in store order, the record's image embedded in its row,
//! and a clickable source link (or the literal "No Link").

use crate::error::{Error, Result};
use crate::images::ImageStore;
use crate::store::ProductRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, Image, Url, Workbook};
use tracing::debug;

const HEADERS: [&str; 9] =
    ["Id", "Name", "Brand", "Category", "Price", "Image", "Description", "Link", "Created"];

const IMAGE_COL: u16 = 5;
const LINK_COL: u16 = 7;

/// Fixed width for the image column; other columns autofit.
const IMAGE_COL_WIDTH: f64 = 18.0;

/// Fixed height for data rows so embedded images have room to render.
const DATA_ROW_HEIGHT: f64 = 60.0;

/// Serializes product records into an xlsx workbook.
pub struct SpreadsheetExporter<'a> {
    images: &'a ImageStore,
}

impl<'a> SpreadsheetExporter<'a> {
    pub fn new(images: &'a ImageStore) -> Self {
        Self { images }
    }

    /// Builds the workbook and returns its bytes. Nothing touches disk.
    pub fn export(&self, records: &[ProductRecord]) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet().set_name("Products")?;

        let center =
            Format::new().set_align(FormatAlign::Center).set_align(FormatAlign::VerticalCenter);
        let money = center.clone().set_num_format("0.00");

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &center)?;
        }

        for (i, record) in records.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet.set_row_height(row, DATA_ROW_HEIGHT)?;

            worksheet.write_number_with_format(row, 0, record.id as f64, &center)?;
            worksheet.write_string_with_format(row, 1, &record.name, &center)?;
            worksheet.write_string_with_format(row, 2, &record.brand, &center)?;
            worksheet.write_string_with_format(row, 3, &record.category, &center)?;
            let price = record
                .price
                .to_f64()
                .ok_or_else(|| Error::PriceParse(record.price.to_string()))?;
            worksheet.write_number_with_format(row, 4, price, &money)?;

            // Embedded in-cell, anchored to this row, same bytes as stored
            let bytes = self.images.read(&record.image_file_name)?;
            let image = Image::new_from_buffer(&bytes)?;
            worksheet.embed_image(row, IMAGE_COL, &image)?;

            worksheet.write_string_with_format(row, 6, &record.description, &center)?;

            match &record.source_link {
                Some(link) => {
                    worksheet.write_url_with_format(row, LINK_COL, Url::new(link.as_str()), &center)?;
                }
                None => {
                    worksheet.write_string_with_format(row, LINK_COL, "No Link", &center)?;
                }
            }

            worksheet.write_string_with_format(
                row,
                8,
                record.created_at.format("%m/%d/%Y").to_string(),
                &center,
            )?;
        }

        // Autofit text columns, then pin the image column to its fixed width
        worksheet.autofit();
        worksheet.set_column_width(IMAGE_COL, IMAGE_COL_WIDTH)?;

        let buffer = workbook.save_to_buffer()?;
        debug!("Exported {} records ({} bytes)", records.len(), buffer.len());
        Ok(buffer)
    }
}
