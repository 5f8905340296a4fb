//! Row parsing for the whitespace-delimited soil property table.
//!
//! Each data row is `lon lat <schema fields>`: eight numeric property fields
//! under the mineral-soil schema, a single categorical code under the
//! soil-code schema. The header line names the columns for human readers and
//! is never interpreted; which schema is active is caller configuration.

use std::str::FromStr;

use crate::dataset::Coord;
use crate::error::{Result, SoilIndexError};

/// Which payload schema the soil table carries.
///
/// A table is internally consistent only under one schema; the choice is
/// fixed when loading starts and is not inferred from the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoilSchema {
    /// Continuous mineral-soil properties, eight numeric fields per row.
    Mineral,
    /// A single categorical soil-class code per row.
    Code,
}

/// Soil properties stored for one grid-cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoilRecord {
    /// The continuous property tuple of the mineral-soil schema.
    Mineral(MineralSoil),
    /// The categorical class of the soil-code schema.
    Code(u32),
}

/// The continuous property tuple of the mineral-soil schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineralSoil {
    /// Sand fraction, percent.
    pub sand: f64,
    /// Silt fraction, percent.
    pub silt: f64,
    /// Clay fraction, percent.
    pub clay: f64,
    /// Organic carbon, percent.
    pub organic_carbon: f64,
    /// Bulk density.
    pub bulk_density: f64,
    /// pH.
    pub ph: f64,
    /// Soil carbon content.
    pub soil_carbon: f64,
    /// Carbon:nitrogen ratio; `-1` in the source table means "unused".
    /// Prefer [`cn_ratio`][MineralSoil::cn_ratio] over reading this raw.
    pub cn: f64,
}

impl MineralSoil {
    /// The carbon:nitrogen ratio, or `None` when the table carried the `-1`
    /// "not applicable" sentinel.
    pub fn cn_ratio(&self) -> Option<f64> {
        if self.cn == -1.0 {
            None
        } else {
            Some(self.cn)
        }
    }
}

const MINERAL_FIELDS: usize = 8;
const CODE_FIELDS: usize = 1;

/// Parse one data row under the active schema.
///
/// `line_number` is 1-based and only used for error reporting.
pub(crate) fn parse_row(
    schema: SoilSchema,
    line: &str,
    line_number: usize,
) -> Result<(Coord, SoilRecord)> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    let expected = 2 + match schema {
        SoilSchema::Mineral => MINERAL_FIELDS,
        SoilSchema::Code => CODE_FIELDS,
    };
    if fields.len() != expected {
        return Err(SoilIndexError::MalformedRecord {
            line: line_number,
            message: format!("expected {} fields, found {}", expected, fields.len()),
        });
    }

    let lon: f64 = parse_field(fields[0], "lon", line_number)?;
    let lat: f64 = parse_field(fields[1], "lat", line_number)?;

    let record = match schema {
        SoilSchema::Mineral => SoilRecord::Mineral(MineralSoil {
            sand: parse_field(fields[2], "sand", line_number)?,
            silt: parse_field(fields[3], "silt", line_number)?,
            clay: parse_field(fields[4], "clay", line_number)?,
            organic_carbon: parse_field(fields[5], "orgc", line_number)?,
            bulk_density: parse_field(fields[6], "bulkdensity", line_number)?,
            ph: parse_field(fields[7], "ph", line_number)?,
            soil_carbon: parse_field(fields[8], "soilc", line_number)?,
            cn: parse_field(fields[9], "cn", line_number)?,
        }),
        SoilSchema::Code => SoilRecord::Code(parse_field(fields[2], "soil code", line_number)?),
    };

    Ok((Coord::new(lon, lat), record))
}

fn parse_field<T: FromStr>(raw: &str, name: &str, line_number: usize) -> Result<T> {
    raw.parse().map_err(|_| SoilIndexError::MalformedRecord {
        line: line_number,
        message: format!("field `{}` is not a valid number: `{}`", name, raw),
    })
}
