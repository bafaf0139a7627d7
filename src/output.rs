//! Output formatting: csv, json, yaml, table, list.
//!
//! Table uses `tabled`, csv uses the `csv` writer, structured formats use
//! serde, and list emits one IP per line.

use crate::inventory::Address;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tabled::{settings::Style, Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
    Yaml,
    #[default]
    Table,
    List,
}

/// Top-level document for json and yaml output
#[derive(Serialize)]
struct AddressList<'a> {
    addresses: &'a [Address],
}

#[derive(Tabled)]
struct AddressRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Address Type")]
    address_type: String,
    #[tabled(rename = "Resource Type")]
    resource_type: String,
    #[tabled(rename = "Resource Name")]
    resource_name: String,
}

impl From<&Address> for AddressRow {
    fn from(a: &Address) -> Self {
        Self {
            address: a.address.to_string(),
            address_type: a.address_type.to_string(),
            resource_type: a.resource_type.to_string(),
            resource_name: a.resource_name.clone(),
        }
    }
}

/// Render addresses to `w` in the chosen format
pub fn render<W: Write>(format: OutputFormat, w: &mut W, addresses: &[Address]) -> Result<()> {
    match format {
        OutputFormat::Csv => render_csv(w, addresses),
        OutputFormat::Json => render_json(w, addresses),
        OutputFormat::Yaml => render_yaml(w, addresses),
        OutputFormat::Table => render_table(w, addresses),
        OutputFormat::List => render_list(w, addresses),
    }
}

fn render_csv<W: Write>(w: &mut W, addresses: &[Address]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    writer
        .write_record(["address", "address_type", "resource_type", "resource_name"])
        .context("error writing csv")?;

    for a in addresses {
        let ip = a.address.to_string();
        writer
            .write_record([
                ip.as_str(),
                a.address_type.as_str(),
                a.resource_type.as_str(),
                a.resource_name.as_str(),
            ])
            .context("error writing csv")?;
    }

    writer.flush().context("error writing csv")?;
    Ok(())
}

fn render_json<W: Write>(w: &mut W, addresses: &[Address]) -> Result<()> {
    serde_json::to_writer(&mut *w, &AddressList { addresses }).context("error writing json")?;
    writeln!(w).context("error writing json")?;
    Ok(())
}

fn render_yaml<W: Write>(w: &mut W, addresses: &[Address]) -> Result<()> {
    serde_yaml::to_writer(&mut *w, &AddressList { addresses }).context("error writing yaml")
}

fn render_table<W: Write>(w: &mut W, addresses: &[Address]) -> Result<()> {
    let rows: Vec<AddressRow> = addresses.iter().map(AddressRow::from).collect();
    let table = Table::new(rows).with(Style::ascii()).to_string();
    writeln!(w, "{}", table).context("error writing table")?;
    Ok(())
}

fn render_list<W: Write>(w: &mut W, addresses: &[Address]) -> Result<()> {
    for a in addresses {
        writeln!(w, "{}", a.address)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::AssetKind;

    fn sample() -> Vec<Address> {
        vec![
            Address::parse(
                "1.2.3.4",
                "//compute.googleapis.com/instance-1",
                AssetKind::ComputeInstance,
            )
            .unwrap(),
            Address::parse(
                "5.6.7.8",
                "//sqladmin.googleapis.com/instance-2",
                AssetKind::CloudSqlInstance,
            )
            .unwrap(),
        ]
    }

    fn rendered(format: OutputFormat, addresses: &[Address]) -> String {
        let mut buf = Vec::new();
        render(format, &mut buf, addresses).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_csv() {
        assert_eq!(
            rendered(OutputFormat::Csv, &sample()),
            "address,address_type,resource_type,resource_name\n\
             1.2.3.4,public,compute.googleapis.com/Instance,//compute.googleapis.com/instance-1\n\
             5.6.7.8,public,sqladmin.googleapis.com/Instance,//sqladmin.googleapis.com/instance-2\n"
        );
    }

    #[test]
    fn test_list() {
        assert_eq!(rendered(OutputFormat::List, &sample()), "1.2.3.4\n5.6.7.8\n");
    }

    #[test]
    fn test_json() {
        let output = rendered(OutputFormat::Json, &sample());
        assert!(output.ends_with('\n'));

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["addresses"].as_array().unwrap().len(), 2);
        assert_eq!(value["addresses"][1]["asset_type"], "sqladmin.googleapis.com/Instance");
        assert_eq!(value["addresses"][0]["type"], "public");
    }

    #[test]
    fn test_json_empty_list() {
        assert_eq!(rendered(OutputFormat::Json, &[]), "{\"addresses\":[]}\n");
    }

    #[test]
    fn test_yaml() {
        let output = rendered(OutputFormat::Yaml, &sample());
        let value: serde_yaml::Value = serde_yaml::from_str(&output).unwrap();
        assert_eq!(value["addresses"][0]["address"].as_str(), Some("1.2.3.4"));
    }

    #[test]
    fn test_table_has_headers_and_rows() {
        let output = rendered(OutputFormat::Table, &sample());
        assert!(output.contains("Address Type"));
        assert!(output.contains("Resource Name"));
        assert!(output.contains("//sqladmin.googleapis.com/instance-2"));
    }
}
