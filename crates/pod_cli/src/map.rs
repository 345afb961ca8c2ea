//! `pod map` and `pod report`: memory and register maps of bus masters.

use std::error::Error;

use pod_netlist::{InterfaceId, MapRow, Project, RegisterRow};
use serde_json::json;

use crate::{project, GlobalArgs, MapArgs, ReportFormat};

/// Runs `pod map`.
pub fn run_map(args: &MapArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let loaded = project::load(global)?;
    let p = &loaded.project;
    let mut tables = Vec::new();
    for master in selected_masters(p, args)? {
        tables.push((p.interface_path(master), p.mapping(master)?));
    }
    match args.format {
        ReportFormat::Text => {
            for (master, rows) in &tables {
                print!("{}", map_table(master, rows));
            }
        }
        ReportFormat::Json => {
            let value: Vec<_> = tables
                .iter()
                .map(|(master, rows)| json!({ "master": master, "rows": rows }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(0)
}

/// Runs `pod report`.
pub fn run_report(args: &MapArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let loaded = project::load(global)?;
    let p = &loaded.project;
    let mut tables = Vec::new();
    for master in selected_masters(p, args)? {
        tables.push((p.interface_path(master), p.register_map(master)?));
    }
    match args.format {
        ReportFormat::Text => {
            for (master, rows) in &tables {
                print!("{}", register_table(master, rows));
            }
        }
        ReportFormat::Json => {
            let value: Vec<_> = tables
                .iter()
                .map(|(master, rows)| json!({ "master": master, "registers": rows }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(0)
}

fn selected_masters(p: &Project, args: &MapArgs) -> Result<Vec<InterfaceId>, Box<dyn Error>> {
    match &args.master {
        Some(path) => Ok(vec![p.find_interface(path)?]),
        None => Ok(p.masters()),
    }
}

fn map_table(master: &str, rows: &[MapRow]) -> String {
    let mut out = format!("{master}\n");
    out.push_str(&format!("  {:<12} {:<24} {:>10}  {}\n", "address", "owner", "size", "id"));
    for row in rows {
        let id = row.id.map(|id| id.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "  {:<12} {:<24} {:>10}  {}\n",
            row.address, row.owner, row.size, id
        ));
    }
    out
}

fn register_table(master: &str, rows: &[RegisterRow]) -> String {
    let mut out = format!("{master}\n");
    out.push_str(&format!("  {:<12} {:<24} {:<16} {}\n", "address", "slave", "register", "access"));
    for row in rows {
        out.push_str(&format!(
            "  {:<12} {:<24} {:<16} {}\n",
            row.address, row.slave, row.register, row.access
        ));
    }
    out
}
